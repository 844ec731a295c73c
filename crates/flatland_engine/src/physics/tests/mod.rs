//! End-to-end scenarios driving the full collision pipeline

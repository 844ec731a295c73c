//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the engine:
//! - 2D math types and scalar helpers
//! - Logging utilities

pub mod math;
pub mod logging;

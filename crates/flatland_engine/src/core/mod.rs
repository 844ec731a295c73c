//! Core engine module
//!
//! Contains the typed configuration consumed by the collision pipeline,
//! perception and the driver.

pub mod config;

pub use config::{CollisionConfig, FlatlandConfig, VisionConfig, WorldConfig};

//! # Engine Configuration
//!
//! Typed configuration for the collision pipeline, the world boundary,
//! perception and logging. Every section derives `serde` with defaults so a
//! partial TOML or RON file only needs to name the values it overrides.
//!
//! ```toml
//! log_level = "debug"
//!
//! [collision]
//! line_radius = 1.5
//! spatial_hash_cell_size = 48.0
//!
//! [world]
//! width = 1024.0
//! height = 768.0
//! ```

use serde::{Deserialize, Serialize};

use crate::config::{Config, ConfigError};
use crate::foundation::math::constants::PI;
use crate::physics::collision::raycast::WorldBounds;

/// # Collision Configuration
///
/// Scalars consumed by the geometry engine each tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionConfig {
    /// Capsule radius applied to every segment shape
    pub line_radius: f64,
    /// Edge length of a broad-phase grid cell
    pub spatial_hash_cell_size: f64,
    /// Support-point tolerance, scaled by the shape's size
    pub support_epsilon: f64,
    /// Slack allowed between a contact point and a vertex for a sharp contact
    pub vertex_contact_epsilon: f64,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            line_radius: 1.0,
            spatial_hash_cell_size: 64.0,
            support_epsilon: 1e-3,
            vertex_contact_epsilon: 0.5,
        }
    }
}

impl CollisionConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.line_radius >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "line_radius must be non-negative, got {}",
                self.line_radius
            )));
        }
        if !(self.spatial_hash_cell_size > 0.0) || !self.spatial_hash_cell_size.is_finite() {
            return Err(ConfigError::Invalid(format!(
                "spatial_hash_cell_size must be positive, got {}",
                self.spatial_hash_cell_size
            )));
        }
        if !(self.support_epsilon >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "support_epsilon must be non-negative, got {}",
                self.support_epsilon
            )));
        }
        if !(self.vertex_contact_epsilon >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "vertex_contact_epsilon must be non-negative, got {}",
                self.vertex_contact_epsilon
            )));
        }
        Ok(())
    }
}

/// Rectangular world the agents live in, anchored at the origin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Extent along x
    pub width: f64,
    /// Extent along y
    pub height: f64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
        }
    }
}

impl WorldConfig {
    /// Boundary walls used by ray casting
    pub fn bounds(&self) -> WorldBounds {
        WorldBounds::new(0.0, 0.0, self.width, self.height)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.width > 0.0 && self.height > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "world extents must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        Ok(())
    }
}

/// Perception settings for vision cones and the flatlander view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisionConfig {
    /// Sample rays per vision cone
    pub ray_count: usize,
    /// Maximum sight distance
    pub range: f64,
    /// Total cone aperture in radians
    pub field_of_view: f64,
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            ray_count: 32,
            range: 300.0,
            field_of_view: 2.0 * PI / 3.0,
        }
    }
}

impl VisionConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ray_count == 0 {
            return Err(ConfigError::Invalid("ray_count must be at least 1".to_string()));
        }
        if !(self.range > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "vision range must be positive, got {}",
                self.range
            )));
        }
        if !(self.field_of_view > 0.0 && self.field_of_view <= 2.0 * PI) {
            return Err(ConfigError::Invalid(format!(
                "field_of_view must be in (0, 2π], got {}",
                self.field_of_view
            )));
        }
        Ok(())
    }
}

/// # Flatland Configuration
///
/// Top-level configuration file for the engine and the driver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlatlandConfig {
    /// Log level name (`error`, `warn`, `info`, `debug`, `trace`)
    pub log_level: String,
    /// Collision pipeline scalars
    pub collision: CollisionConfig,
    /// World boundary
    pub world: WorldConfig,
    /// Perception settings
    pub vision: VisionConfig,
}

impl Default for FlatlandConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            collision: CollisionConfig::default(),
            world: WorldConfig::default(),
            vision: VisionConfig::default(),
        }
    }
}

impl Config for FlatlandConfig {}

impl FlatlandConfig {
    /// Validate every section
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.collision.validate()?;
        self.world.validate()?;
        self.vision.validate()?;
        Ok(())
    }

    /// Load from file and validate in one step
    pub fn load_validated(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let config = Self::load_from_file(path)?;
        config.validate()?;
        Ok(config)
    }
}

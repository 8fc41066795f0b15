//! Engine Settings
//!
//! Tunables for the physics step, newly generated cameras and creatures, and
//! the registries' id scheme. Every field has a default, so a settings file
//! only needs to list what it overrides.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use kestrel::{Engine, EngineSettings};
//!
//! let settings = EngineSettings::from_json_str(r#"{ "physics": { "gravity": 9.81 } }"#)?;
//! let engine = Engine::new(settings, backend)?;
//! ```

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::errors::{EngineError, Result};
use crate::pool::IdPolicy;
use crate::scene::CameraDefaults;

/// Gravity magnitude applied to floating creatures, units per second squared.
pub const AP_G: f32 = 15.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsSettings {
    /// Magnitude of the downward acceleration
    pub gravity: f32,
    /// Creatures below this height are respawned
    pub fall_limit_y: f32,
    pub respawn_position: Vec3,
    /// Maximum vertical gap still counted as standing on a barrier
    pub on_top_tolerance: f32,
}

impl Default for PhysicsSettings {
    fn default() -> Self {
        Self {
            gravity: AP_G,
            fall_limit_y: -64.0,
            respawn_position: Vec3::new(0.0, 5.0, 0.0),
            on_top_tolerance: 0.01,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreatureDefaults {
    pub move_speed: f32,
    pub jump_speed: f32,
    /// Eye position relative to the box center
    pub camera_offset: Vec3,
}

impl Default for CreatureDefaults {
    fn default() -> Self {
        Self {
            move_speed: 4.0,
            jump_speed: 6.0,
            camera_offset: Vec3::ZERO,
        }
    }
}

/// Defaults to [`IdPolicy::Monotonic`]: ids held across frees (texture path
/// cache, creature cameras) must not be reissued.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistrySettings {
    pub id_policy: IdPolicy,
    /// Keep an id -> index map per registry instead of scanning
    pub indexed_lookup: bool,
}

impl Default for RegistrySettings {
    fn default() -> Self {
        Self {
            id_policy: IdPolicy::Monotonic,
            indexed_lookup: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    pub physics: PhysicsSettings,
    pub camera: CameraDefaults,
    pub creature: CreatureDefaults,
    pub registry: RegistrySettings,
}

impl EngineSettings {
    /// Parses settings from JSON and validates them.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("physics.gravity", self.physics.gravity),
            ("physics.on_top_tolerance", self.physics.on_top_tolerance),
            ("camera.speed", self.camera.speed),
            ("camera.sensitivity", self.camera.sensitivity),
            ("creature.move_speed", self.creature.move_speed),
            ("creature.jump_speed", self.creature.jump_speed),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(EngineError::invalid(format!("{name} must be positive, got {value}")));
            }
        }

        if !self.physics.fall_limit_y.is_finite() || !self.physics.respawn_position.is_finite() {
            return Err(EngineError::invalid("fall limit and respawn position must be finite"));
        }
        if self.physics.respawn_position.y <= self.physics.fall_limit_y {
            return Err(EngineError::invalid("respawn position lies below the fall limit"));
        }

        Ok(())
    }
}

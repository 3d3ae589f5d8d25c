//! Demo settings and preferences
//!
//! Persisted in LocalStorage. Missing fields fall back to their defaults so
//! older saved blobs keep loading.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Inputs to the scene builder
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneConfig {
    pub enemy_count: usize,
    pub enemy_radius: f32,
    pub move_speed: f32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            enemy_count: ENEMY_COUNT,
            enemy_radius: ENEMY_RADIUS,
            move_speed: MOVE_SPEED,
        }
    }
}

/// How orientation samples map onto the camera
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrientationConfig {
    pub yaw_scale: f32,
    pub suppress_horizon_roll: bool,
}

impl Default for OrientationConfig {
    fn default() -> Self {
        Self {
            yaw_scale: YAW_SCALE,
            suppress_horizon_roll: true,
        }
    }
}

/// Demo settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Movement ===
    /// Camera displacement per frame per held key
    pub move_speed: f32,

    // === Orientation ===
    /// Multiplier applied to sensor yaw
    pub yaw_scale: f32,
    /// Zero the roll while the device is held near upright (beta 85..95)
    pub suppress_horizon_roll: bool,

    // === Scene ===
    pub enemy_count: usize,
    pub enemy_radius: f32,
    /// Fixed scene seed (None = seed from the clock)
    pub seed: Option<u64>,

    // === Overlay ===
    /// Show the sensor readout
    pub show_overlay: bool,
    /// Integrate device motion into the readout
    pub motion_telemetry: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            move_speed: MOVE_SPEED,

            yaw_scale: YAW_SCALE,
            suppress_horizon_roll: true,

            enemy_count: ENEMY_COUNT,
            enemy_radius: ENEMY_RADIUS,
            seed: None,

            show_overlay: true,
            motion_telemetry: true,
        }
    }
}

impl Settings {
    pub fn scene_config(&self) -> SceneConfig {
        SceneConfig {
            enemy_count: self.enemy_count,
            enemy_radius: self.enemy_radius,
            move_speed: self.move_speed,
        }
    }

    pub fn orientation_config(&self) -> OrientationConfig {
        OrientationConfig {
            yaw_scale: self.yaw_scale,
            suppress_horizon_roll: self.suppress_horizon_roll,
        }
    }

    /// Parse a stored JSON blob, falling back to defaults when it is unusable
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str::<Self>(json) {
            Ok(settings) => settings.validated(),
            Err(e) => {
                log::warn!("Ignoring stored settings: {}", e);
                Self::default()
            }
        }
    }

    /// Pull hand-edited values back into the range the scene can handle
    ///
    /// Every enemy has to fit in the instance buffer, and no enemy may sit
    /// within collision range of the spawn point.
    pub fn validated(mut self) -> Self {
        let defaults = Self::default();

        if self.enemy_count > MAX_ENEMIES {
            log::warn!(
                "enemy_count {} exceeds {}, clamping",
                self.enemy_count,
                MAX_ENEMIES
            );
            self.enemy_count = MAX_ENEMIES;
        }

        if !self.enemy_radius.is_finite() {
            log::warn!("enemy_radius {} is not finite, using default", self.enemy_radius);
            self.enemy_radius = defaults.enemy_radius;
        } else if self.enemy_radius < MIN_ENEMY_RADIUS {
            log::warn!(
                "enemy_radius {} is inside spawn range, clamping to {}",
                self.enemy_radius,
                MIN_ENEMY_RADIUS
            );
            self.enemy_radius = MIN_ENEMY_RADIUS;
        }

        if !self.move_speed.is_finite() || self.move_speed < 0.0 {
            log::warn!("move_speed {} is invalid, using default", self.move_speed);
            self.move_speed = defaults.move_speed;
        }

        if !self.yaw_scale.is_finite() {
            log::warn!("yaw_scale {} is not finite, using default", self.yaw_scale);
            self.yaw_scale = defaults.yaw_scale;
        }

        self
    }

    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "gyro_room_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                log::info!("Loaded settings from LocalStorage");
                return Self::from_json(&json);
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_consts() {
        let s = Settings::default();
        assert_eq!(s.move_speed, MOVE_SPEED);
        assert_eq!(s.yaw_scale, YAW_SCALE);
        assert_eq!(s.scene_config(), SceneConfig::default());
        assert_eq!(s.orientation_config(), OrientationConfig::default());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let s = Settings::from_json(r#"{"move_speed": 0.5, "seed": 42}"#);
        assert_eq!(s.move_speed, 0.5);
        assert_eq!(s.seed, Some(42));
        assert_eq!(s.enemy_count, ENEMY_COUNT);
        assert!(s.motion_telemetry);
    }

    #[test]
    fn test_corrupt_json_falls_back() {
        let s = Settings::from_json("{not json");
        assert_eq!(s, Settings::default());
    }

    #[test]
    fn test_enemy_count_fits_instance_buffer() {
        let s = Settings::from_json(r#"{"enemy_count": 300}"#);
        assert_eq!(s.enemy_count, MAX_ENEMIES);

        // Everything the scene draws still fits
        let scene = crate::sim::build_scene(&s.scene_config(), 1);
        let instances = crate::renderer::instances::collect(&scene);
        assert!(instances.total() <= MAX_INSTANCES);
        assert_eq!(instances.spheres.len(), scene.enemies.len());
    }

    #[test]
    fn test_enemy_radius_cannot_trap_spawn() {
        let s = Settings::from_json(r#"{"enemy_radius": 1.5}"#);
        assert_eq!(s.enemy_radius, MIN_ENEMY_RADIUS);

        // Standing still at spawn never collides
        let mut scene = crate::sim::build_scene(&s.scene_config(), 7);
        let input = crate::sim::InputState::default();
        for _ in 0..10 {
            assert_eq!(crate::sim::frame_update(&mut scene, &input), None);
        }
    }

    #[test]
    fn test_bad_numbers_fall_back() {
        let s = Settings::from_json(r#"{"move_speed": -1.0, "enemy_radius": 12.0}"#);
        assert_eq!(s.move_speed, MOVE_SPEED);
        assert_eq!(s.enemy_radius, 12.0);

        let s = Settings {
            move_speed: f32::NAN,
            enemy_radius: f32::INFINITY,
            yaw_scale: f32::NAN,
            ..Default::default()
        }
        .validated();
        assert_eq!(s, Settings::default());
    }

    #[test]
    fn test_json_roundtrip() {
        let s = Settings {
            suppress_horizon_roll: false,
            show_overlay: false,
            ..Default::default()
        };
        let json = serde_json::to_string(&s).unwrap();
        assert_eq!(Settings::from_json(&json), s);
    }
}

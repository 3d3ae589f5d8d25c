//! Gyro Room - a first-person walk through a small walled room
//!
//! Core modules:
//! - `sim`: Scene state, input sampling and the per-frame update (no platform deps)
//! - `renderer`: WebGPU rendering pipeline
//! - `permission`: Sensor permission gate
//! - `overlay`: Debug readout text
//! - `settings`: Persisted configuration

pub mod error;
pub mod overlay;
pub mod permission;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use error::AppError;
pub use permission::{PermissionError, PermissionGate, PermissionState};
pub use settings::Settings;

use glam::Vec3;

/// Scene configuration constants
pub mod consts {
    use glam::Vec3;

    /// Where the camera starts and where it is sent back after a collision
    pub const SPAWN_POINT: Vec3 = Vec3::new(0.0, 1.6, 0.0);
    /// Camera displacement per frame while a movement key is held
    pub const MOVE_SPEED: f32 = 0.2;

    /// Enemy defaults
    pub const ENEMY_COUNT: usize = 30;
    pub const ENEMY_RADIUS: f32 = 10.0;
    pub const ENEMY_DIAMETER: f32 = 1.0;
    /// Camera-to-enemy distance below which the camera is reset
    pub const COLLISION_DISTANCE: f32 = 1.0;
    /// Enemies closer to the origin than this would touch the spawn point
    pub const MIN_ENEMY_RADIUS: f32 = 2.75;

    /// Instance buffer capacity (room boxes, enemies and arrows share it)
    pub const MAX_INSTANCES: usize = 256;
    /// Six room boxes and four arrows are always drawn
    pub const MAX_ENEMIES: usize = MAX_INSTANCES - 10;

    /// Room geometry
    pub const ROOM_HALF_EXTENT: f32 = 20.0;
    pub const WALL_HEIGHT: f32 = 12.0;
    pub const WALL_THICKNESS: f32 = 0.5;
    pub const GROUND_THICKNESS: f32 = 0.1;

    /// Direction arrows hang this far from the camera
    pub const ARROW_DISTANCE: f32 = 1.5;

    /// Orientation yaw multiplier (sensor yaw is nearly frozen at this value)
    pub const YAW_SCALE: f32 = 0.01;
    /// Beta band (degrees) treated as "held upright" when suppressing roll
    pub const HORIZON_BETA_MIN: f64 = 85.0;
    pub const HORIZON_BETA_MAX: f64 = 95.0;

    /// Pointer drag look, radians per CSS pixel
    pub const DRAG_LOOK_SCALE: f32 = 1.0 / 2000.0;
    /// Drag look stops just short of straight up or down
    pub const MAX_DRAG_PITCH: f32 = 1.55;

    /// Camera projection
    pub const FOV_Y: f32 = 0.8;
    pub const Z_NEAR: f32 = 0.1;
    pub const Z_FAR: f32 = 200.0;
}

/// Convert spherical (r, theta, phi) to cartesian, Y up
///
/// `theta` is the azimuth around Y, `phi` the polar angle from +Y.
#[inline]
pub fn spherical_to_cartesian(r: f32, theta: f32, phi: f32) -> Vec3 {
    Vec3::new(
        r * phi.sin() * theta.cos(),
        r * phi.cos(),
        r * phi.sin() * theta.sin(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_spherical_poles_and_equator() {
        let up = spherical_to_cartesian(10.0, 0.0, 0.0);
        assert!((up - Vec3::new(0.0, 10.0, 0.0)).length() < 1e-5);

        let x = spherical_to_cartesian(10.0, 0.0, FRAC_PI_2);
        assert!((x - Vec3::new(10.0, 0.0, 0.0)).length() < 1e-5);

        let z = spherical_to_cartesian(10.0, FRAC_PI_2, FRAC_PI_2);
        assert!((z - Vec3::new(0.0, 0.0, 10.0)).length() < 1e-5);

        let down = spherical_to_cartesian(10.0, 1.0, PI);
        assert!((down.y + 10.0).abs() < 1e-5);
    }

    #[test]
    fn test_min_enemy_radius_clears_spawn() {
        use consts::*;
        assert!(MIN_ENEMY_RADIUS >= SPAWN_POINT.length() + COLLISION_DISTANCE);
        // Nearest point of a minimum-radius shell to the spawn point
        let nearest = spherical_to_cartesian(MIN_ENEMY_RADIUS, 0.0, 0.0);
        assert!(nearest.distance(SPAWN_POINT) >= COLLISION_DISTANCE);
    }
}

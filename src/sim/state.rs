//! Scene state and core data model
//!
//! Everything the frame updater and renderer read lives here. Only the
//! camera moves; ground, walls and enemies are fixed once built.

use glam::{EulerRot, Quat, Vec3};

use crate::consts::*;

/// Camera lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraPhase {
    /// At the spawn point, nothing moved it yet
    Spawned,
    /// Translated by keyboard input at least once since spawning
    Moving,
    /// Sent back to spawn this frame after touching an enemy
    Reset,
}

/// Orientation angles in radians (YXZ order)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CameraEuler {
    pub yaw: f32,
    pub pitch: f32,
    pub roll: f32,
}

/// First-person camera
#[derive(Debug, Clone)]
pub struct CameraState {
    pub position: Vec3,
    pub orientation: CameraEuler,
    /// Displacement per frame per held movement key
    pub speed: f32,
    pub phase: CameraPhase,
}

impl CameraState {
    pub fn new(speed: f32) -> Self {
        Self {
            position: SPAWN_POINT,
            orientation: CameraEuler::default(),
            speed,
            phase: CameraPhase::Spawned,
        }
    }

    /// Rotation from local space (+Z forward, +X right, +Y up) to world space
    pub fn rotation(&self) -> Quat {
        let CameraEuler { yaw, pitch, roll } = self.orientation;
        Quat::from_euler(EulerRot::YXZ, yaw, pitch, roll)
    }

    pub fn forward(&self) -> Vec3 {
        self.rotation() * Vec3::Z
    }

    pub fn right(&self) -> Vec3 {
        self.rotation() * Vec3::X
    }

    pub fn up(&self) -> Vec3 {
        self.rotation() * Vec3::Y
    }

    /// Replace the orientation outright (sensor samples are not smoothed)
    pub fn apply_orientation(&mut self, orientation: CameraEuler) {
        self.orientation = orientation;
    }

    /// Back to the spawn point. Orientation is left alone.
    pub fn reset(&mut self) {
        self.position = SPAWN_POINT;
        self.phase = CameraPhase::Reset;
    }
}

/// A static sphere that resets the camera on contact
#[derive(Debug, Clone, PartialEq)]
pub struct Enemy {
    pub id: u32,
    pub position: Vec3,
    pub diameter: f32,
}

/// An axis-aligned box
#[derive(Debug, Clone, PartialEq)]
pub struct Slab {
    pub name: &'static str,
    pub center: Vec3,
    pub size: Vec3,
    pub color: [f32; 4],
}

/// Marker cone attached to the camera, pointing along one local axis
#[derive(Debug, Clone, PartialEq)]
pub struct DirectionArrow {
    pub name: &'static str,
    /// Unit direction in camera space
    pub local_dir: Vec3,
    pub color: [f32; 4],
}

impl DirectionArrow {
    /// Arrow tip direction and base position in world space
    pub fn world_placement(&self, camera: &CameraState) -> (Vec3, Vec3) {
        let dir = camera.rotation() * self.local_dir;
        (dir, camera.position + dir * ARROW_DISTANCE)
    }
}

/// Complete scene
#[derive(Debug, Clone)]
pub struct Scene {
    /// Seed the enemy layout was drawn from
    pub seed: u64,
    pub camera: CameraState,
    pub ground: Slab,
    pub walls: Vec<Slab>,
    /// In creation order; collision checks walk them in this order
    pub enemies: Vec<Enemy>,
    pub arrows: Vec<DirectionArrow>,
}

/// Material colors
pub mod colors {
    pub const GROUND: [f32; 4] = [0.35, 0.4, 0.35, 1.0];
    pub const WALL_NORTH: [f32; 4] = [0.8, 0.3, 0.3, 1.0];
    pub const WALL_SOUTH: [f32; 4] = [0.3, 0.8, 0.3, 1.0];
    pub const WALL_EAST: [f32; 4] = [0.3, 0.3, 0.8, 1.0];
    pub const WALL_WEST: [f32; 4] = [0.8, 0.8, 0.3, 1.0];
    pub const CEILING: [f32; 4] = [0.6, 0.6, 0.7, 1.0];
    pub const ENEMY: [f32; 4] = [1.0, 0.0, 0.0, 1.0];
    pub const ARROW_FORWARD: [f32; 4] = [0.0, 0.0, 1.0, 1.0];
    pub const ARROW_BACKWARD: [f32; 4] = [1.0, 0.0, 0.0, 1.0];
    pub const ARROW_LEFT: [f32; 4] = [0.0, 1.0, 0.0, 1.0];
    pub const ARROW_RIGHT: [f32; 4] = [1.0, 1.0, 0.0, 1.0];
    pub const BACKGROUND: [f32; 4] = [0.02, 0.02, 0.05, 1.0];
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_default_axes() {
        let cam = CameraState::new(MOVE_SPEED);
        assert!((cam.forward() - Vec3::Z).length() < 1e-6);
        assert!((cam.right() - Vec3::X).length() < 1e-6);
        assert!((cam.up() - Vec3::Y).length() < 1e-6);
    }

    #[test]
    fn test_yaw_turns_forward_toward_right() {
        let mut cam = CameraState::new(MOVE_SPEED);
        cam.apply_orientation(CameraEuler {
            yaw: FRAC_PI_2,
            ..Default::default()
        });
        assert!((cam.forward() - Vec3::X).length() < 1e-5);
        assert!((cam.right() + Vec3::Z).length() < 1e-5);
    }

    #[test]
    fn test_positive_pitch_looks_down() {
        let mut cam = CameraState::new(MOVE_SPEED);
        cam.apply_orientation(CameraEuler {
            pitch: 0.3,
            ..Default::default()
        });
        assert!(cam.forward().y < 0.0);
    }

    #[test]
    fn test_reset_keeps_orientation() {
        let mut cam = CameraState::new(MOVE_SPEED);
        let euler = CameraEuler {
            yaw: 0.2,
            pitch: -0.1,
            roll: 0.05,
        };
        cam.apply_orientation(euler);
        cam.position = Vec3::new(3.0, 1.6, -2.0);
        cam.reset();
        assert_eq!(cam.position, SPAWN_POINT);
        assert_eq!(cam.orientation, euler);
        assert_eq!(cam.phase, CameraPhase::Reset);
    }

    #[test]
    fn test_arrow_follows_camera() {
        let mut cam = CameraState::new(MOVE_SPEED);
        cam.position = Vec3::new(1.0, 2.0, 3.0);
        let arrow = DirectionArrow {
            name: "arrow-forward",
            local_dir: Vec3::Z,
            color: colors::ARROW_FORWARD,
        };
        let (dir, pos) = arrow.world_placement(&cam);
        assert!((dir - Vec3::Z).length() < 1e-6);
        assert!((pos - Vec3::new(1.0, 2.0, 4.5)).length() < 1e-5);
    }
}

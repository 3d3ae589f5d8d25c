//! Per-frame update
//!
//! Runs once per rendered frame: keyboard translation, then the enemy
//! proximity check. Displacement is per frame, so walking speed follows the
//! display refresh rate.

use super::input::InputState;
use super::state::{CameraPhase, Scene};
use crate::consts::*;

/// Something the caller has to surface to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameEvent {
    /// Camera came within range of an enemy and was sent back to spawn
    EnemyCollision { enemy_id: u32 },
}

/// Advance the scene by one rendered frame
pub fn frame_update(scene: &mut Scene, input: &InputState) -> Option<FrameEvent> {
    let camera = &mut scene.camera;

    if camera.phase == CameraPhase::Reset {
        camera.phase = CameraPhase::Spawned;
    }

    let local = input.local_move();
    if local != glam::Vec3::ZERO {
        camera.position += camera.rotation() * local * camera.speed;
        camera.phase = CameraPhase::Moving;
    }

    // First enemy in creation order wins
    let hit = scene
        .enemies
        .iter()
        .find(|e| e.position.distance(camera.position) < COLLISION_DISTANCE)?;

    log::debug!(
        "Enemy {} hit at {:?}, resetting camera",
        hit.id,
        camera.position
    );
    camera.reset();
    Some(FrameEvent::EnemyCollision { enemy_id: hit.id })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::SceneConfig;
    use crate::sim::scene::build_scene;
    use crate::sim::state::{CameraEuler, Enemy};
    use glam::Vec3;

    /// Scene with no enemies unless the test adds some
    fn empty_scene() -> Scene {
        let config = SceneConfig {
            enemy_count: 0,
            ..Default::default()
        };
        build_scene(&config, 1)
    }

    fn enemy_at(id: u32, position: Vec3) -> Enemy {
        Enemy {
            id,
            position,
            diameter: ENEMY_DIAMETER,
        }
    }

    fn single_key(key: &str) -> InputState {
        let mut input = InputState::default();
        input.key_down(key);
        input
    }

    #[test]
    fn test_each_key_moves_one_step_along_its_axis() {
        let mut scene = empty_scene();
        scene.camera.apply_orientation(CameraEuler {
            yaw: 0.7,
            pitch: -0.2,
            roll: 0.0,
        });
        let forward = scene.camera.forward();
        let right = scene.camera.right();

        for (key, expected) in [
            ("w", forward * MOVE_SPEED),
            ("s", -forward * MOVE_SPEED),
            ("a", -right * MOVE_SPEED),
            ("d", right * MOVE_SPEED),
        ] {
            scene.camera.position = SPAWN_POINT;
            let event = frame_update(&mut scene, &single_key(key));
            assert_eq!(event, None);
            let delta = scene.camera.position - SPAWN_POINT;
            assert!(
                (delta - expected).length() < 1e-5,
                "key {key}: moved {delta:?}, expected {expected:?}"
            );
            assert!((delta.length() - MOVE_SPEED).abs() < 1e-5);
        }
    }

    #[test]
    fn test_no_keys_no_motion() {
        let mut scene = empty_scene();
        frame_update(&mut scene, &InputState::default());
        assert_eq!(scene.camera.position, SPAWN_POINT);
        assert_eq!(scene.camera.phase, CameraPhase::Spawned);

        frame_update(&mut scene, &single_key("w"));
        assert_eq!(scene.camera.phase, CameraPhase::Moving);
    }

    #[test]
    fn test_safe_distance_leaves_camera_alone() {
        let mut scene = empty_scene();
        scene.enemies = vec![
            enemy_at(0, SPAWN_POINT + Vec3::new(1.0, 0.0, 0.0)),
            enemy_at(1, SPAWN_POINT + Vec3::new(0.0, 0.0, -3.0)),
        ];
        let start = Vec3::new(0.0, 1.6, 0.0);
        scene.camera.position = start;

        let event = frame_update(&mut scene, &InputState::default());
        assert_eq!(event, None);
        assert_eq!(scene.camera.position, start);
    }

    #[test]
    fn test_collision_resets_once_first_match_wins() {
        let mut scene = empty_scene();
        let camera_pos = Vec3::new(5.0, 1.6, 5.0);
        scene.enemies = vec![
            enemy_at(0, Vec3::new(-8.0, 0.0, 0.0)),
            enemy_at(1, camera_pos + Vec3::new(0.5, 0.0, 0.0)),
            enemy_at(2, camera_pos + Vec3::new(0.0, 0.2, 0.0)),
        ];
        scene.camera.position = camera_pos;
        scene.camera.phase = CameraPhase::Moving;

        let event = frame_update(&mut scene, &InputState::default());
        assert_eq!(event, Some(FrameEvent::EnemyCollision { enemy_id: 1 }));
        assert_eq!(scene.camera.position, Vec3::new(0.0, 1.6, 0.0));
        assert_eq!(scene.camera.phase, CameraPhase::Reset);

        // Spawn point is clear of every enemy, so the next frame is quiet
        let event = frame_update(&mut scene, &InputState::default());
        assert_eq!(event, None);
        assert_eq!(scene.camera.phase, CameraPhase::Spawned);
    }

    #[test]
    fn test_walking_into_enemy() {
        let mut scene = empty_scene();
        scene.enemies = vec![enemy_at(0, SPAWN_POINT + Vec3::new(0.0, 0.0, 2.0))];
        let input = single_key("w");

        let mut events = Vec::new();
        for _ in 0..10 {
            if let Some(event) = frame_update(&mut scene, &input) {
                events.push(event);
                break;
            }
        }
        assert_eq!(events, vec![FrameEvent::EnemyCollision { enemy_id: 0 }]);
        assert_eq!(scene.camera.position, SPAWN_POINT);
    }

    #[test]
    fn test_enemies_never_move() {
        let mut scene = build_scene(&SceneConfig::default(), 4242);
        let before = scene.enemies.clone();
        let input = single_key("w");
        for _ in 0..200 {
            frame_update(&mut scene, &input);
        }
        assert_eq!(scene.enemies, before);
    }
}

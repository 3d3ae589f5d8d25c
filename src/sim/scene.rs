//! Scene construction
//!
//! Builds the room, the camera and the seeded enemy layout in one go.

use std::f32::consts::{PI, TAU};

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::state::{CameraState, DirectionArrow, Enemy, Scene, Slab, colors};
use crate::consts::*;
use crate::settings::SceneConfig;
use crate::spherical_to_cartesian;

/// Build a fresh scene from the given seed
pub fn build_scene(config: &SceneConfig, seed: u64) -> Scene {
    let mut rng = Pcg32::seed_from_u64(seed);

    let enemies = place_enemies(&mut rng, config.enemy_count, config.enemy_radius);
    let walls = room_walls();

    log::info!(
        "Scene built: seed {}, {} enemies, {} walls",
        seed,
        enemies.len(),
        walls.len()
    );

    Scene {
        seed,
        camera: CameraState::new(config.move_speed),
        ground: ground(),
        walls,
        enemies,
        arrows: direction_arrows(),
    }
}

/// Scatter enemies on a sphere of radius `r` around the origin
///
/// theta is drawn from [0, 2pi) and phi from [0, pi) independently, so the
/// layout bunches up toward the poles.
pub fn place_enemies<R: Rng>(rng: &mut R, count: usize, r: f32) -> Vec<Enemy> {
    (0..count)
        .map(|i| {
            let theta = rng.random_range(0.0..TAU);
            let phi = rng.random_range(0.0..PI);
            Enemy {
                id: i as u32,
                position: spherical_to_cartesian(r, theta, phi),
                diameter: ENEMY_DIAMETER,
            }
        })
        .collect()
}

fn ground() -> Slab {
    let span = ROOM_HALF_EXTENT * 2.0;
    Slab {
        name: "ground",
        center: Vec3::new(0.0, -GROUND_THICKNESS / 2.0, 0.0),
        size: Vec3::new(span, GROUND_THICKNESS, span),
        color: colors::GROUND,
    }
}

/// Four side walls and a ceiling
fn room_walls() -> Vec<Slab> {
    let span = ROOM_HALF_EXTENT * 2.0;
    let mid_y = WALL_HEIGHT / 2.0;
    vec![
        Slab {
            name: "wall-north",
            center: Vec3::new(0.0, mid_y, ROOM_HALF_EXTENT),
            size: Vec3::new(span, WALL_HEIGHT, WALL_THICKNESS),
            color: colors::WALL_NORTH,
        },
        Slab {
            name: "wall-south",
            center: Vec3::new(0.0, mid_y, -ROOM_HALF_EXTENT),
            size: Vec3::new(span, WALL_HEIGHT, WALL_THICKNESS),
            color: colors::WALL_SOUTH,
        },
        Slab {
            name: "wall-east",
            center: Vec3::new(ROOM_HALF_EXTENT, mid_y, 0.0),
            size: Vec3::new(WALL_THICKNESS, WALL_HEIGHT, span),
            color: colors::WALL_EAST,
        },
        Slab {
            name: "wall-west",
            center: Vec3::new(-ROOM_HALF_EXTENT, mid_y, 0.0),
            size: Vec3::new(WALL_THICKNESS, WALL_HEIGHT, span),
            color: colors::WALL_WEST,
        },
        Slab {
            name: "ceiling",
            center: Vec3::new(0.0, WALL_HEIGHT, 0.0),
            size: Vec3::new(span, WALL_THICKNESS, span),
            color: colors::CEILING,
        },
    ]
}

fn direction_arrows() -> Vec<DirectionArrow> {
    vec![
        DirectionArrow {
            name: "arrow-forward",
            local_dir: Vec3::Z,
            color: colors::ARROW_FORWARD,
        },
        DirectionArrow {
            name: "arrow-backward",
            local_dir: Vec3::NEG_Z,
            color: colors::ARROW_BACKWARD,
        },
        DirectionArrow {
            name: "arrow-left",
            local_dir: Vec3::NEG_X,
            color: colors::ARROW_LEFT,
        },
        DirectionArrow {
            name: "arrow-right",
            local_dir: Vec3::X,
            color: colors::ARROW_RIGHT,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::CameraPhase;
    use proptest::prelude::*;

    #[test]
    fn test_scene_contents() {
        let scene = build_scene(&SceneConfig::default(), 12345);
        assert_eq!(scene.enemies.len(), ENEMY_COUNT);
        assert_eq!(scene.walls.len(), 5);
        assert_eq!(scene.arrows.len(), 4);
        assert_eq!(scene.camera.position, SPAWN_POINT);
        assert_eq!(scene.camera.speed, MOVE_SPEED);
        assert_eq!(scene.camera.phase, CameraPhase::Spawned);
    }

    #[test]
    fn test_enemy_ids_follow_creation_order() {
        let scene = build_scene(&SceneConfig::default(), 7);
        for (i, enemy) in scene.enemies.iter().enumerate() {
            assert_eq!(enemy.id, i as u32);
            assert_eq!(enemy.diameter, ENEMY_DIAMETER);
        }
    }

    #[test]
    fn test_same_seed_same_layout() {
        let a = build_scene(&SceneConfig::default(), 99);
        let b = build_scene(&SceneConfig::default(), 99);
        assert_eq!(a.enemies, b.enemies);

        let c = build_scene(&SceneConfig::default(), 100);
        assert_ne!(a.enemies, c.enemies);
    }

    #[test]
    fn test_walls_enclose_spawn() {
        let scene = build_scene(&SceneConfig::default(), 1);
        for wall in &scene.walls {
            let half = wall.size / 2.0;
            let min = wall.center - half;
            let max = wall.center + half;
            let inside = SPAWN_POINT.cmpge(min).all() && SPAWN_POINT.cmple(max).all();
            assert!(!inside, "{} overlaps the spawn point", wall.name);
        }
    }

    proptest! {
        #[test]
        fn prop_enemies_lie_on_sphere(seed in any::<u64>()) {
            let scene = build_scene(&SceneConfig::default(), seed);
            for enemy in &scene.enemies {
                let d = enemy.position.length();
                prop_assert!((d - ENEMY_RADIUS).abs() < 1e-4, "distance {}", d);
            }
        }

        #[test]
        fn prop_spherical_length_is_radius(theta in 0.0f32..TAU, phi in 0.0f32..PI) {
            let p = spherical_to_cartesian(ENEMY_RADIUS, theta, phi);
            prop_assert!((p.length() - ENEMY_RADIUS).abs() < 1e-4);
        }
    }
}

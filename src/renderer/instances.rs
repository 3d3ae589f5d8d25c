//! Scene to per-instance GPU data
//!
//! One instance per drawn object, grouped by the unit mesh it uses.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Quat, Vec3};

use crate::consts::*;
use crate::sim::{CameraState, Scene, Slab};

/// Arrow cones are this wide at the base
pub const ARROW_BASE_DIAMETER: f32 = 0.1;

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct InstanceData {
    pub model: [[f32; 4]; 4],
    pub color: [f32; 4],
}

impl InstanceData {
    pub fn new(model: Mat4, color: [f32; 4]) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            color,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        const ATTRIBUTES: [wgpu::VertexAttribute; 5] = wgpu::vertex_attr_array![
            2 => Float32x4,
            3 => Float32x4,
            4 => Float32x4,
            5 => Float32x4,
            6 => Float32x4,
        ];
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<InstanceData>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &ATTRIBUTES,
        }
    }
}

/// Instances grouped by mesh
#[derive(Debug, Default)]
pub struct SceneInstances {
    /// Ground and walls (unit box)
    pub boxes: Vec<InstanceData>,
    /// Enemies (unit sphere)
    pub spheres: Vec<InstanceData>,
    /// Direction arrows (unit cone)
    pub cones: Vec<InstanceData>,
}

impl SceneInstances {
    pub fn total(&self) -> usize {
        self.boxes.len() + self.spheres.len() + self.cones.len()
    }
}

fn slab_instance(slab: &Slab) -> InstanceData {
    InstanceData::new(
        Mat4::from_scale_rotation_translation(slab.size, Quat::IDENTITY, slab.center),
        slab.color,
    )
}

/// Build this frame's instances
pub fn collect(scene: &Scene) -> SceneInstances {
    let boxes = std::iter::once(&scene.ground)
        .chain(scene.walls.iter())
        .map(slab_instance)
        .collect();

    let spheres = scene
        .enemies
        .iter()
        .map(|e| {
            InstanceData::new(
                Mat4::from_scale_rotation_translation(
                    Vec3::splat(e.diameter),
                    Quat::IDENTITY,
                    e.position,
                ),
                crate::sim::state::colors::ENEMY,
            )
        })
        .collect();

    let cones = scene
        .arrows
        .iter()
        .map(|arrow| {
            let (dir, pos) = arrow.world_placement(&scene.camera);
            InstanceData::new(
                Mat4::from_rotation_translation(Quat::from_rotation_arc(Vec3::Y, dir), pos),
                arrow.color,
            )
        })
        .collect();

    SceneInstances {
        boxes,
        spheres,
        cones,
    }
}

/// Left-handed view-projection for the camera (+Z forward, depth 0..1)
pub fn view_projection(camera: &CameraState, aspect: f32) -> Mat4 {
    let view = Mat4::look_to_lh(camera.position, camera.forward(), camera.up());
    let proj = Mat4::perspective_lh(FOV_Y, aspect.max(1e-3), Z_NEAR, Z_FAR);
    proj * view
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::SceneConfig;
    use crate::sim::build_scene;
    use glam::Vec4;

    #[test]
    fn test_instance_counts() {
        let scene = build_scene(&SceneConfig::default(), 3);
        let instances = collect(&scene);
        assert_eq!(instances.boxes.len(), 6);
        assert_eq!(instances.spheres.len(), ENEMY_COUNT);
        assert_eq!(instances.cones.len(), 4);
        assert_eq!(instances.total(), 6 + ENEMY_COUNT + 4);
    }

    #[test]
    fn test_enemy_instance_translation() {
        let scene = build_scene(&SceneConfig::default(), 3);
        let instances = collect(&scene);
        let model = Mat4::from_cols_array_2d(&instances.spheres[0].model);
        let origin = model.transform_point3(Vec3::ZERO);
        assert!((origin - scene.enemies[0].position).length() < 1e-5);
    }

    #[test]
    fn test_forward_arrow_points_forward() {
        let scene = build_scene(&SceneConfig::default(), 3);
        let instances = collect(&scene);
        let model = Mat4::from_cols_array_2d(&instances.cones[0].model);
        let tip = model.transform_point3(Vec3::new(0.0, 0.5, 0.0));
        let expected = SPAWN_POINT + Vec3::Z * (ARROW_DISTANCE + 0.5);
        assert!((tip - expected).length() < 1e-4);
    }

    #[test]
    fn test_point_ahead_is_in_view() {
        let camera = CameraState::new(MOVE_SPEED);
        let vp = view_projection(&camera, 16.0 / 9.0);
        let ahead = camera.position + Vec3::new(0.0, 0.0, 5.0);
        let clip = vp * Vec4::new(ahead.x, ahead.y, ahead.z, 1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(clip.w > 0.0);
        assert!(ndc.x.abs() < 1e-4 && ndc.y.abs() < 1e-4);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);

        // Right of the camera lands on the right of the screen
        let right = camera.position + Vec3::new(1.0, 0.0, 5.0);
        let clip = vp * Vec4::new(right.x, right.y, right.z, 1.0);
        assert!(clip.x / clip.w > 0.0);
    }
}

//! WebGPU rendering module
//!
//! Instanced unit meshes (box, sphere, cone) drawn with a depth buffer and a
//! single hemispheric light.

pub mod instances;
pub mod mesh;
pub mod scene_pipeline;

pub use instances::{InstanceData, SceneInstances, view_projection};
pub use scene_pipeline::SceneRenderState;

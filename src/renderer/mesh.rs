//! Unit meshes shared by every instance
//!
//! Each mesh is centred on the origin and sized 1 so the instance transform
//! carries the real dimensions.

use std::f32::consts::{PI, TAU};

use bytemuck::{Pod, Zeroable};

/// Position + normal vertex
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl Vertex {
    pub const fn new(position: [f32; 3], normal: [f32; 3]) -> Self {
        Self { position, normal }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
            wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &ATTRIBUTES,
        }
    }
}

/// Indexed triangle list
#[derive(Debug, Clone)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u16>,
}

/// Unit cube (side 1)
pub fn unit_box() -> Mesh {
    let p = 0.5_f32;
    #[rustfmt::skip]
    let vertices = vec![
        // +Z face
        Vertex::new([-p, -p,  p], [0.0, 0.0, 1.0]),
        Vertex::new([ p, -p,  p], [0.0, 0.0, 1.0]),
        Vertex::new([ p,  p,  p], [0.0, 0.0, 1.0]),
        Vertex::new([-p,  p,  p], [0.0, 0.0, 1.0]),
        // -Z face
        Vertex::new([ p, -p, -p], [0.0, 0.0, -1.0]),
        Vertex::new([-p, -p, -p], [0.0, 0.0, -1.0]),
        Vertex::new([-p,  p, -p], [0.0, 0.0, -1.0]),
        Vertex::new([ p,  p, -p], [0.0, 0.0, -1.0]),
        // +X face
        Vertex::new([ p, -p,  p], [1.0, 0.0, 0.0]),
        Vertex::new([ p, -p, -p], [1.0, 0.0, 0.0]),
        Vertex::new([ p,  p, -p], [1.0, 0.0, 0.0]),
        Vertex::new([ p,  p,  p], [1.0, 0.0, 0.0]),
        // -X face
        Vertex::new([-p, -p, -p], [-1.0, 0.0, 0.0]),
        Vertex::new([-p, -p,  p], [-1.0, 0.0, 0.0]),
        Vertex::new([-p,  p,  p], [-1.0, 0.0, 0.0]),
        Vertex::new([-p,  p, -p], [-1.0, 0.0, 0.0]),
        // +Y face
        Vertex::new([-p,  p,  p], [0.0, 1.0, 0.0]),
        Vertex::new([ p,  p,  p], [0.0, 1.0, 0.0]),
        Vertex::new([ p,  p, -p], [0.0, 1.0, 0.0]),
        Vertex::new([-p,  p, -p], [0.0, 1.0, 0.0]),
        // -Y face
        Vertex::new([-p, -p, -p], [0.0, -1.0, 0.0]),
        Vertex::new([ p, -p, -p], [0.0, -1.0, 0.0]),
        Vertex::new([ p, -p,  p], [0.0, -1.0, 0.0]),
        Vertex::new([-p, -p,  p], [0.0, -1.0, 0.0]),
    ];
    let indices = (0..6u16)
        .flat_map(|face| {
            let b = face * 4;
            [b, b + 1, b + 2, b + 2, b + 3, b]
        })
        .collect();
    Mesh { vertices, indices }
}

/// UV sphere of diameter 1
pub fn unit_sphere(segments: u16, rings: u16) -> Mesh {
    let r = 0.5_f32;
    let mut vertices = Vec::with_capacity(((segments + 1) * (rings + 1)) as usize);
    for ring in 0..=rings {
        let phi = PI * ring as f32 / rings as f32;
        for seg in 0..=segments {
            let theta = TAU * seg as f32 / segments as f32;
            let n = [phi.sin() * theta.cos(), phi.cos(), phi.sin() * theta.sin()];
            vertices.push(Vertex::new([n[0] * r, n[1] * r, n[2] * r], n));
        }
    }

    let stride = segments + 1;
    let mut indices = Vec::with_capacity((segments * rings * 6) as usize);
    for ring in 0..rings {
        for seg in 0..segments {
            let a = ring * stride + seg;
            let b = a + stride;
            indices.extend_from_slice(&[a, b, a + 1, a + 1, b, b + 1]);
        }
    }
    Mesh { vertices, indices }
}

/// Cone of height 1 along +Y, centred on its mid-height
pub fn unit_cone(segments: u16, base_radius: f32) -> Mesh {
    let half = 0.5_f32;
    // Height is 1, so side normals lean up by base_radius
    let slope = base_radius;
    let mut vertices = Vec::new();
    let mut indices = Vec::new();

    for seg in 0..segments {
        let t0 = TAU * seg as f32 / segments as f32;
        let t1 = TAU * (seg + 1) as f32 / segments as f32;
        let mid = (t0 + t1) / 2.0;
        let n = glam::Vec3::new(mid.cos(), slope, mid.sin()).normalize().to_array();

        let base = vertices.len() as u16;
        vertices.push(Vertex::new(
            [base_radius * t0.cos(), -half, base_radius * t0.sin()],
            n,
        ));
        vertices.push(Vertex::new([0.0, half, 0.0], n));
        vertices.push(Vertex::new(
            [base_radius * t1.cos(), -half, base_radius * t1.sin()],
            n,
        ));
        indices.extend_from_slice(&[base, base + 1, base + 2]);
    }

    // Base cap
    let center = vertices.len() as u16;
    vertices.push(Vertex::new([0.0, -half, 0.0], [0.0, -1.0, 0.0]));
    for seg in 0..=segments {
        let t = TAU * seg as f32 / segments as f32;
        vertices.push(Vertex::new(
            [base_radius * t.cos(), -half, base_radius * t.sin()],
            [0.0, -1.0, 0.0],
        ));
    }
    for seg in 0..segments {
        indices.extend_from_slice(&[center, center + 1 + seg, center + 2 + seg]);
    }

    Mesh { vertices, indices }
}

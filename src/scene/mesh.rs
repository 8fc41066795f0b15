use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};
use smallvec::SmallVec;

use crate::errors::Result;
use crate::pool::{ElementKind, PoolElement};
use crate::render::backend::{MeshBuffers, RenderBackend};

/// Interleaved vertex layout uploaded to the backend as raw bytes.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub tex_coords: [f32; 2],
}

impl Vertex {
    #[must_use]
    pub fn new(position: Vec3, normal: Vec3, tex_coords: Vec2) -> Self {
        Self {
            position: position.to_array(),
            normal: normal.to_array(),
            tex_coords: tex_coords.to_array(),
        }
    }
}

/// Indexed triangle list plus the ids of the textures it samples.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    pub textures: SmallVec<[u32; 4]>,
    /// Set once [`setup`](Self::setup) uploaded the buffers
    pub gpu: Option<MeshBuffers>,
}

impl PoolElement for Mesh {
    const KIND: ElementKind = ElementKind::Mesh;
}

impl Mesh {
    #[must_use]
    pub fn new(vertices: Vec<Vertex>, indices: Vec<u32>) -> Self {
        Self {
            vertices,
            indices,
            textures: SmallVec::new(),
            gpu: None,
        }
    }

    #[must_use]
    pub fn with_textures(mut self, textures: impl IntoIterator<Item = u32>) -> Self {
        self.textures.extend(textures);
        self
    }

    /// Axis-aligned box centered on the origin, 24 vertices / 36 indices.
    #[must_use]
    pub fn cube(size: Vec3) -> Self {
        let h = size * 0.5;
        let faces: [(Vec3, Vec3, Vec3); 6] = [
            (Vec3::X, Vec3::Y, Vec3::NEG_Z),
            (Vec3::NEG_X, Vec3::Y, Vec3::Z),
            (Vec3::Y, Vec3::NEG_Z, Vec3::X),
            (Vec3::NEG_Y, Vec3::Z, Vec3::X),
            (Vec3::Z, Vec3::Y, Vec3::X),
            (Vec3::NEG_Z, Vec3::Y, Vec3::NEG_X),
        ];

        let mut vertices = Vec::with_capacity(24);
        let mut indices = Vec::with_capacity(36);
        for (normal, up, right) in faces {
            let base = vertices.len() as u32;
            let center = normal * h;
            let corners = [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)];
            for (u, v) in corners {
                let position = center + right * h * u + up * h * v;
                let uv = Vec2::new((u + 1.0) * 0.5, (v + 1.0) * 0.5);
                vertices.push(Vertex::new(position, normal, uv));
            }
            indices.extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
        }

        Self::new(vertices, indices)
    }

    #[inline]
    #[must_use]
    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }

    /// Uploads vertex and index data. Re-uploading replaces the old buffers.
    pub fn setup(&mut self, backend: &mut dyn RenderBackend) -> Result<MeshBuffers> {
        if let Some(old) = self.gpu.take() {
            backend.delete_mesh(old);
        }

        let buffers = backend.upload_mesh(bytemuck::cast_slice(&self.vertices), &self.indices)?;
        self.gpu = Some(buffers);
        Ok(buffers)
    }

    pub fn release(&mut self, backend: &mut dyn RenderBackend) {
        if let Some(buffers) = self.gpu.take() {
            backend.delete_mesh(buffers);
        }
    }
}

use glam::{EulerRot, Mat4, Quat, Vec3};

use crate::errors::Result;
use crate::pool::{TypedPool, impl_handled};
use crate::render::backend::RenderBackend;

use super::mesh::Mesh;

/// A named group of meshes drawn with one transform.
///
/// Mesh import lives outside the engine; models are assembled from meshes
/// that were already built by the host.
#[derive(Debug)]
pub struct Model {
    pub id: u32,
    pub name: String,
    pub meshes: TypedPool<Mesh>,

    pub position: Vec3,
    pub scale: Vec3,
    /// Euler angles in degrees, applied Y then X then Z
    pub rotation: Vec3,
}

impl_handled!(Model, Model);

impl Model {
    pub fn new(name: impl Into<String>, meshes: &[Mesh]) -> Result<Self> {
        let mut pool = TypedPool::new();
        pool.init()?;
        if !meshes.is_empty() {
            pool.insert_back(meshes)?;
        }

        Ok(Self {
            id: 0,
            name: name.into(),
            meshes: pool,
            position: Vec3::ZERO,
            scale: Vec3::ONE,
            rotation: Vec3::ZERO,
        })
    }

    #[must_use]
    pub fn model_matrix(&self) -> Mat4 {
        let rotation = Quat::from_euler(
            EulerRot::YXZ,
            self.rotation.y.to_radians(),
            self.rotation.x.to_radians(),
            self.rotation.z.to_radians(),
        );
        Mat4::from_scale_rotation_translation(self.scale, rotation, self.position)
    }

    /// Uploads every mesh that has no buffers yet.
    pub fn setup(&mut self, backend: &mut dyn RenderBackend) -> Result<()> {
        for mesh in self.meshes.iter_mut().filter(|mesh| mesh.gpu.is_none()) {
            mesh.setup(backend)?;
        }
        Ok(())
    }

    pub fn release(&mut self, backend: &mut dyn RenderBackend) {
        for mesh in self.meshes.iter_mut() {
            mesh.release(backend);
        }
        self.meshes.free();
    }
}

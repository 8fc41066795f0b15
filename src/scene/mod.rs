//! Scene Resources
//!
//! Handle-addressed resources managed by the [`Engine`](crate::Engine):
//! - [`Camera`]: Euler-angle viewer with mouse look and zoom
//! - [`Shader`]: linked program record
//! - [`Texture`]: uploaded image, de-duplicated by path
//! - [`Mesh`] / [`Model`]: indexed geometry and its transform
//! - [`Light`]: directional, point and spot lights

pub mod camera;
pub mod light;
pub mod mesh;
pub mod model;
pub mod shader;
pub mod texture;

pub use camera::{Camera, CameraDefaults, CameraMovement};
pub use light::{Attenuation, Light, LightKind};
pub use mesh::{Mesh, Vertex};
pub use model::Model;
pub use shader::Shader;
pub use texture::{Texture, TextureKind};

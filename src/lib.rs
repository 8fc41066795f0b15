#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod engine;
pub mod errors;
pub mod physics;
pub mod pool;
pub mod render;
pub mod scene;
pub mod settings;
pub mod utils;

pub use engine::{Engine, SharedEngine};
pub use errors::{EngineError, Result, SelectionKind};
pub use physics::{Barrier, BarrierKind, Creature, MoveDirection, PBall, PBox, TickReport};
pub use pool::{ElementKind, IdPolicy, Registry, TypedPool};
pub use render::{HeadlessBackend, RenderBackend, Renderer};
pub use scene::{Camera, CameraMovement, Light, Mesh, Model, Shader, Texture, TextureKind};
pub use settings::{AP_G, EngineSettings};
pub use utils::Timer;

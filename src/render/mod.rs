//! Frame Rendering
//!
//! [`Renderer`] turns the engine's registries into backend calls:
//!
//! 1. clear, bind the current shader
//! 2. upload camera matrices and light parameters
//! 3. per model: upload its model matrix, bind mesh textures, draw
//!
//! Drawing needs a current camera and a current shader; without either the
//! frame fails with [`EngineError::NotSet`](crate::errors::EngineError::NotSet)
//! and the caller decides whether to log and carry on.

pub mod backend;

use glam::Vec3;

use crate::errors::Result;
use crate::pool::Registry;
use crate::scene::{Camera, Light, LightKind, Model, Shader, Texture, TextureKind};

pub use backend::{
    BackendCall, CallLog, HeadlessBackend, MeshBuffers, ProgramHandle, RenderBackend,
    TextureHandle, UniformValue,
};

/// Counters for one rendered frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameStats {
    pub models: u32,
    pub draw_calls: u32,
}

pub struct Renderer {
    backend: Box<dyn RenderBackend>,
    aspect: f32,
    pub clear_color: Vec3,
}

impl Renderer {
    #[must_use]
    pub fn new(backend: impl RenderBackend + 'static) -> Self {
        Self {
            backend: Box::new(backend),
            aspect: 16.0 / 9.0,
            clear_color: Vec3::new(0.1, 0.1, 0.1),
        }
    }

    #[inline]
    pub fn backend_mut(&mut self) -> &mut dyn RenderBackend {
        self.backend.as_mut()
    }

    #[inline]
    #[must_use]
    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    /// Updates the projection aspect ratio. Zero-sized surfaces are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.aspect = width as f32 / height as f32;
    }

    /// Draws every model with the current camera and shader.
    pub fn render_frame(
        &mut self,
        cameras: &Registry<Camera>,
        shaders: &Registry<Shader>,
        models: &Registry<Model>,
        textures: &Registry<Texture>,
        lights: &Registry<Light>,
    ) -> Result<FrameStats> {
        let camera = cameras.current()?;
        let shader = shaders.current()?;

        self.backend.clear(self.clear_color);
        self.begin_pass(camera, shader, lights);

        let mut stats = FrameStats::default();
        for model in models.iter() {
            stats.draw_calls += self.draw_model(model, shader, textures);
            stats.models += 1;
        }
        Ok(stats)
    }

    /// Binds `shader` and uploads camera and light uniforms.
    pub fn begin_pass(&mut self, camera: &Camera, shader: &Shader, lights: &Registry<Light>) {
        let program = shader.program;
        self.backend.use_program(program);

        let backend = self.backend.as_mut();
        backend.set_uniform(
            program,
            "projection",
            UniformValue::Mat4(camera.projection_matrix(self.aspect)),
        );
        backend.set_uniform(program, "view", UniformValue::Mat4(camera.view_matrix()));
        backend.set_uniform(program, "view_pos", UniformValue::Vec3(camera.position));

        let mut point_count = 0;
        for light in lights.iter() {
            let prefix = match &light.kind {
                LightKind::Directional(_) => "dir_light".to_string(),
                LightKind::Spot(_) => "spot_light".to_string(),
                LightKind::Point(_) => {
                    point_count += 1;
                    format!("point_lights[{}]", point_count - 1)
                }
            };
            upload_light(backend, program, &prefix, light);
        }
        backend.set_uniform(program, "point_light_count", UniformValue::Int(point_count));
    }

    /// Issues the draw calls for one model. Returns how many were issued.
    pub fn draw_model(&mut self, model: &Model, shader: &Shader, textures: &Registry<Texture>) -> u32 {
        let program = shader.program;
        let backend = self.backend.as_mut();
        backend.set_uniform(program, "model", UniformValue::Mat4(model.model_matrix()));

        let mut draws = 0;
        for mesh in model.meshes.iter() {
            let Some(buffers) = mesh.gpu else {
                log::warn!("Model {} has a mesh without buffers, skipped", model.id);
                continue;
            };

            let mut counters = [0u32; 4];
            for (unit, texture_id) in mesh.textures.iter().enumerate() {
                let Some(texture) = textures.get(*texture_id) else {
                    log::warn!("Model {} references missing texture {texture_id}", model.id);
                    continue;
                };

                let slot = match texture.kind {
                    TextureKind::Diffuse => 0,
                    TextureKind::Specular => 1,
                    TextureKind::Normal => 2,
                    TextureKind::Height => 3,
                };
                counters[slot] += 1;
                let name = format!("{}{}", texture.kind.uniform_prefix(), counters[slot]);
                backend.set_uniform(program, &name, UniformValue::Int(unit as i32));
                backend.bind_texture(unit as u32, texture.gpu);
            }

            backend.draw_indexed(buffers, mesh.index_count());
            draws += 1;
        }
        draws
    }
}

fn upload_light(backend: &mut dyn RenderBackend, program: ProgramHandle, prefix: &str, light: &Light) {
    let mut set = |field: &str, value: UniformValue| {
        backend.set_uniform(program, &format!("{prefix}.{field}"), value);
    };

    set("ambient", UniformValue::Vec3(light.ambient));
    set("diffuse", UniformValue::Vec3(light.diffuse));
    set("specular", UniformValue::Vec3(light.specular));

    match &light.kind {
        LightKind::Directional(dir) => {
            set("direction", UniformValue::Vec3(dir.direction));
        }
        LightKind::Point(point) => {
            set("position", UniformValue::Vec3(point.position));
            set("constant", UniformValue::Float(point.attenuation.constant));
            set("linear", UniformValue::Float(point.attenuation.linear));
            set("quadratic", UniformValue::Float(point.attenuation.quadratic));
        }
        LightKind::Spot(spot) => {
            set("position", UniformValue::Vec3(spot.position));
            set("direction", UniformValue::Vec3(spot.direction));
            set("cut_off", UniformValue::Float(spot.cut_off.to_radians().cos()));
            set("outer_cut_off", UniformValue::Float(spot.outer_cut_off.to_radians().cos()));
            set("constant", UniformValue::Float(spot.attenuation.constant));
            set("linear", UniformValue::Float(spot.attenuation.linear));
            set("quadratic", UniformValue::Float(spot.attenuation.quadratic));
        }
    }
}

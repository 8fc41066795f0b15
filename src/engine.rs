//! Engine Core Module
//!
//! [`Engine`] is the single context object that owns every registry and the
//! renderer. All "operate on the current X" calls go through it, so there is
//! no process-wide selection state.
//!
//! # Frame flow
//!
//! ```text
//! input glue ──▶ process_move / jump / process_mouse_move
//!            ──▶ tick (creature physics against barriers, camera follow)
//!            ──▶ render_frame (current camera + current shader, all models)
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use kestrel::{Engine, EngineSettings, HeadlessBackend, BarrierKind};
//!
//! let (backend, _log) = HeadlessBackend::new();
//! let mut engine = Engine::new(EngineSettings::default(), backend)?;
//!
//! let floor = engine.generate_barrier(BarrierKind::Box)?;
//! engine.set_barrier_size(floor, Vec3::new(100.0, 1.0, 100.0))?;
//! engine.set_barrier_pos(floor, Vec3::new(0.0, -0.5, 0.0))?;
//!
//! let player = engine.generate_creature(Vec3::new(0.8, 1.8, 0.8))?;
//! engine.creature_use(player)?;
//!
//! loop {
//!     engine.tick();
//!     engine.render_frame()?;
//! }
//! ```

use std::sync::Arc;

use glam::{Mat4, Vec3};
use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use crate::errors::{EngineError, Result};
use crate::physics::creature::{self, MoveDirection, TickReport};
use crate::physics::{Barrier, BarrierKind, Creature};
use crate::pool::{Handled, Registry};
use crate::render::{FrameStats, RenderBackend, Renderer, UniformValue};
use crate::scene::{Camera, CameraMovement, Light, Mesh, Model, Shader, Texture, TextureKind};
use crate::settings::{EngineSettings, RegistrySettings};
use crate::utils::Timer;

/// Engine behind a single exclusive lock, for hosts that drive it from
/// several threads. Hold the lock for a whole tick.
pub type SharedEngine = Arc<Mutex<Engine>>;

pub struct Engine {
    settings: EngineSettings,
    renderer: Renderer,
    timer: Timer,
    delta_time: f32,

    cameras: Registry<Camera>,
    shaders: Registry<Shader>,
    models: Registry<Model>,
    textures: Registry<Texture>,
    lights: Registry<Light>,
    creatures: Registry<Creature>,
    barriers: Registry<Barrier>,

    texture_paths: FxHashMap<String, u32>,
}

fn registry<T: Handled>(settings: &RegistrySettings) -> Registry<T> {
    Registry::new(settings.id_policy).with_indexed_lookup(settings.indexed_lookup)
}

fn validate_extent(value: Vec3, what: &str) -> Result<()> {
    if value.is_finite() && value.cmpgt(Vec3::ZERO).all() {
        Ok(())
    } else {
        Err(EngineError::invalid(format!("{what} must be positive, got {value}")))
    }
}

impl Engine {
    /// Creates an engine drawing through `backend`. Registries stay empty
    /// until the first `generate_*` call.
    pub fn new(settings: EngineSettings, backend: impl RenderBackend + 'static) -> Result<Self> {
        settings.validate()?;
        let reg = settings.registry;

        Ok(Self {
            renderer: Renderer::new(backend),
            timer: Timer::new(),
            delta_time: 0.0,
            cameras: registry(&reg),
            shaders: registry(&reg),
            models: registry(&reg),
            textures: registry(&reg),
            lights: registry(&reg),
            creatures: registry(&reg),
            barriers: registry(&reg),
            texture_paths: FxHashMap::default(),
            settings,
        })
    }

    /// Same as [`new`](Self::new) but with a fixed-step clock.
    pub fn with_fixed_step(
        settings: EngineSettings,
        backend: impl RenderBackend + 'static,
        step: f32,
    ) -> Result<Self> {
        let mut engine = Self::new(settings, backend)?;
        engine.timer = Timer::fixed(step);
        Ok(engine)
    }

    #[must_use]
    pub fn into_shared(self) -> SharedEngine {
        Arc::new(Mutex::new(self))
    }

    #[inline]
    #[must_use]
    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    #[inline]
    pub fn renderer_mut(&mut self) -> &mut Renderer {
        &mut self.renderer
    }

    #[inline]
    #[must_use]
    pub fn cameras(&self) -> &Registry<Camera> {
        &self.cameras
    }

    #[inline]
    #[must_use]
    pub fn shaders(&self) -> &Registry<Shader> {
        &self.shaders
    }

    #[inline]
    #[must_use]
    pub fn models(&self) -> &Registry<Model> {
        &self.models
    }

    #[inline]
    #[must_use]
    pub fn textures(&self) -> &Registry<Texture> {
        &self.textures
    }

    #[inline]
    #[must_use]
    pub fn lights(&self) -> &Registry<Light> {
        &self.lights
    }

    #[inline]
    #[must_use]
    pub fn creatures(&self) -> &Registry<Creature> {
        &self.creatures
    }

    #[inline]
    #[must_use]
    pub fn barriers(&self) -> &Registry<Barrier> {
        &self.barriers
    }

    /// Seconds covered by the last tick.
    #[inline]
    #[must_use]
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    #[inline]
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.timer.frame_count
    }

    // ========================================================================
    // Frame
    // ========================================================================

    /// Advances the clock and runs one simulation step for the current creature.
    pub fn tick(&mut self) -> Option<TickReport> {
        let dt = self.timer.tick();
        self.step(dt)
    }

    /// Runs one simulation step of `dt` seconds for the current creature.
    /// Does nothing when no creature is selected.
    pub fn step(&mut self, dt: f32) -> Option<TickReport> {
        self.delta_time = dt;
        let id = self.creatures.current_id()?;
        self.update_creature(id, dt).ok()
    }

    /// Draws every model with the current camera and current shader.
    pub fn render_frame(&mut self) -> Result<FrameStats> {
        let Self {
            renderer,
            cameras,
            shaders,
            models,
            textures,
            lights,
            ..
        } = self;
        renderer.render_frame(cameras, shaders, models, textures, lights)
    }

    /// Draws only the current model with the current camera and shader.
    pub fn draw_current_model(&mut self) -> Result<u32> {
        let camera = self.cameras.current()?;
        let shader = self.shaders.current()?;
        let model = self.models.current()?;

        self.renderer.begin_pass(camera, shader, &self.lights);
        Ok(self.renderer.draw_model(model, shader, &self.textures))
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.renderer.resize(width, height);
    }

    // ========================================================================
    // Cameras
    // ========================================================================

    pub fn generate_camera(&mut self, position: Vec3) -> Result<u32> {
        self.cameras
            .generate(Camera::new(position, &self.settings.camera))
    }

    pub fn camera_use(&mut self, id: u32) -> Result<()> {
        self.cameras.use_id(id)
    }

    pub fn free_camera(&mut self, id: u32) -> Result<()> {
        self.cameras.free(id).map(drop)
    }

    pub fn free_all_cameras(&mut self) {
        self.cameras.free_all();
    }

    pub fn camera_set_position(&mut self, position: Vec3) -> Result<()> {
        self.cameras.current_mut()?.position = position;
        Ok(())
    }

    pub fn camera_get_position(&self) -> Result<Vec3> {
        Ok(self.cameras.current()?.position)
    }

    pub fn camera_get_front(&self) -> Result<Vec3> {
        Ok(self.cameras.current()?.front)
    }

    pub fn camera_get_zoom(&self) -> Result<f32> {
        Ok(self.cameras.current()?.zoom)
    }

    pub fn camera_get_view_matrix(&self) -> Result<Mat4> {
        Ok(self.cameras.current()?.view_matrix())
    }

    pub fn camera_get_projection_matrix(&self) -> Result<Mat4> {
        Ok(self.cameras.current()?.projection_matrix(self.renderer.aspect()))
    }

    pub fn camera_set_yaw_pitch(&mut self, yaw: f32, pitch: f32) -> Result<()> {
        self.cameras.current_mut()?.set_yaw_pitch(yaw, pitch);
        Ok(())
    }

    /// Free-fly movement of the current camera over the last tick's delta.
    pub fn camera_process_keyboard(&mut self, direction: CameraMovement) -> Result<()> {
        let dt = self.delta_time;
        self.cameras.current_mut()?.process_keyboard(direction, dt);
        Ok(())
    }

    pub fn process_mouse_move(&mut self, x_offset: f32, y_offset: f32, constrain_pitch: bool) -> Result<()> {
        self.cameras
            .current_mut()?
            .process_mouse_move(x_offset, y_offset, constrain_pitch);
        Ok(())
    }

    pub fn process_scroll(&mut self, y_offset: f32) -> Result<()> {
        self.cameras.current_mut()?.process_scroll(y_offset);
        Ok(())
    }

    // ========================================================================
    // Shaders
    // ========================================================================

    pub fn generate_shader(&mut self, name: &str, vertex_path: &str, fragment_path: &str) -> Result<u32> {
        if vertex_path.is_empty() || fragment_path.is_empty() {
            return Err(EngineError::InvalidPointer("shader source path is empty"));
        }

        let program = self
            .renderer
            .backend_mut()
            .compile_program(name, vertex_path, fragment_path)?;
        let shader = Shader::new(name, vertex_path, fragment_path, program);

        match self.shaders.generate(shader) {
            Ok(id) => Ok(id),
            Err(err) => {
                self.renderer.backend_mut().delete_program(program);
                Err(err)
            }
        }
    }

    pub fn shader_use(&mut self, id: u32) -> Result<()> {
        self.shaders.use_id(id)?;
        if let Ok(shader) = self.shaders.current() {
            self.renderer.backend_mut().use_program(shader.program);
        }
        Ok(())
    }

    pub fn free_shader(&mut self, id: u32) -> Result<()> {
        let shader = self.shaders.free(id)?;
        self.renderer.backend_mut().delete_program(shader.program);
        Ok(())
    }

    fn set_uniform(&mut self, name: &str, value: UniformValue) -> Result<()> {
        let program = self.shaders.current()?.program;
        self.renderer.backend_mut().set_uniform(program, name, value);
        Ok(())
    }

    pub fn shader_set_bool(&mut self, name: &str, value: bool) -> Result<()> {
        self.set_uniform(name, UniformValue::Bool(value))
    }

    pub fn shader_set_int(&mut self, name: &str, value: i32) -> Result<()> {
        self.set_uniform(name, UniformValue::Int(value))
    }

    pub fn shader_set_float(&mut self, name: &str, value: f32) -> Result<()> {
        self.set_uniform(name, UniformValue::Float(value))
    }

    pub fn shader_set_vec3(&mut self, name: &str, value: Vec3) -> Result<()> {
        self.set_uniform(name, UniformValue::Vec3(value))
    }

    pub fn shader_set_mat4(&mut self, name: &str, value: Mat4) -> Result<()> {
        self.set_uniform(name, UniformValue::Mat4(value))
    }

    // ========================================================================
    // Textures
    // ========================================================================

    /// Loads the texture at `path`. Loading a path twice returns the first id.
    pub fn load_texture(&mut self, path: &str, kind: TextureKind) -> Result<u32> {
        if path.is_empty() {
            return Err(EngineError::InvalidPointer("texture path is empty"));
        }
        if let Some(&id) = self.texture_paths.get(path) {
            if self.textures.get(id).is_some_and(|texture| texture.path == path) {
                return Ok(id);
            }
            log::warn!("Texture cache entry for '{path}' points at texture {id}, reloading");
            self.texture_paths.remove(path);
        }

        let gpu = self.renderer.backend_mut().upload_texture(path)?;
        let id = match self.textures.generate(Texture::new(path, kind, gpu)) {
            Ok(id) => id,
            Err(err) => {
                self.renderer.backend_mut().delete_texture(gpu);
                return Err(err);
            }
        };
        self.texture_paths.insert(path.to_string(), id);
        Ok(id)
    }

    pub fn free_texture(&mut self, id: u32) -> Result<()> {
        let texture = self.textures.free(id)?;
        self.texture_paths.remove(&texture.path);
        self.renderer.backend_mut().delete_texture(texture.gpu);
        Ok(())
    }

    // ========================================================================
    // Models
    // ========================================================================

    /// Builds a model from `meshes` and uploads their buffers. The model is
    /// registered first so a failed registration leaves nothing on the backend.
    pub fn generate_model(&mut self, name: &str, meshes: &[Mesh]) -> Result<u32> {
        let model = Model::new(name, meshes)?;
        let backend = self.renderer.backend_mut();
        let result = self.models.generate_with(model, |model| {
            if let Err(err) = model.setup(&mut *backend) {
                model.release(&mut *backend);
                return Err(err);
            }
            Ok(())
        });

        if let Err(err) = &result {
            log::error!("Failed to generate model '{name}': {err}");
        }
        result
    }

    pub fn model_use(&mut self, id: u32) -> Result<()> {
        self.models.use_id(id)
    }

    pub fn free_model(&mut self, id: u32) -> Result<()> {
        let mut model = self.models.free(id)?;
        model.release(self.renderer.backend_mut());
        Ok(())
    }

    pub fn model_set_position(&mut self, position: Vec3) -> Result<()> {
        self.models.current_mut()?.position = position;
        Ok(())
    }

    pub fn model_set_scale(&mut self, scale: Vec3) -> Result<()> {
        self.models.current_mut()?.scale = scale;
        Ok(())
    }

    /// Euler angles in degrees.
    pub fn model_set_rotation(&mut self, rotation: Vec3) -> Result<()> {
        self.models.current_mut()?.rotation = rotation;
        Ok(())
    }

    // ========================================================================
    // Lights
    // ========================================================================

    pub fn generate_light(&mut self, light: Light) -> Result<u32> {
        self.lights.generate(light)
    }

    pub fn light(&self, id: u32) -> Result<&Light> {
        self.lights.try_get(id)
    }

    pub fn light_mut(&mut self, id: u32) -> Result<&mut Light> {
        self.lights.try_get_mut(id)
    }

    pub fn free_light(&mut self, id: u32) -> Result<()> {
        self.lights.free(id).map(drop)
    }

    // ========================================================================
    // Barriers
    // ========================================================================

    pub fn generate_barrier(&mut self, kind: BarrierKind) -> Result<u32> {
        self.barriers.generate(Barrier::new(kind))
    }

    pub fn set_barrier_pos(&mut self, id: u32, pos: Vec3) -> Result<()> {
        if !pos.is_finite() {
            return Err(EngineError::invalid(format!("barrier position must be finite, got {pos}")));
        }
        self.barriers.try_get_mut(id)?.set_pos(pos);
        Ok(())
    }

    pub fn set_barrier_size(&mut self, id: u32, size: Vec3) -> Result<()> {
        validate_extent(size, "barrier size")?;
        self.barriers.try_get_mut(id)?.set_size(size);
        Ok(())
    }

    pub fn set_barrier_radius(&mut self, id: u32, radius: f32) -> Result<()> {
        if !radius.is_finite() || radius <= 0.0 {
            return Err(EngineError::invalid(format!("barrier radius must be positive, got {radius}")));
        }
        self.barriers.try_get_mut(id)?.set_radius(radius);
        Ok(())
    }

    pub fn free_barrier(&mut self, id: u32) -> Result<()> {
        self.barriers.free(id).map(drop)
    }

    pub fn free_all_barriers(&mut self) {
        self.barriers.free_all();
    }

    // ========================================================================
    // Creatures
    // ========================================================================

    /// Generates a creature of `size` together with the camera that follows it.
    pub fn generate_creature(&mut self, size: Vec3) -> Result<u32> {
        validate_extent(size, "creature size")?;

        let camera_id = self.generate_camera(self.settings.creature.camera_offset)?;
        let creature = Creature::new(size, camera_id, &self.settings.creature);
        match self.creatures.generate(creature) {
            Ok(id) => Ok(id),
            Err(err) => {
                // don't leave an orphan camera behind
                if let Err(free_err) = self.cameras.free(camera_id) {
                    log::warn!("Failed to free camera {camera_id}: {free_err}");
                }
                Err(err)
            }
        }
    }

    /// Selects the creature and makes its camera the current camera.
    pub fn creature_use(&mut self, id: u32) -> Result<()> {
        self.creatures.use_id(id)?;
        if let Ok(creature) = self.creatures.current()
            && creature.camera_id != 0
        {
            self.cameras.use_id(creature.camera_id)?;
        }
        Ok(())
    }

    /// Removes the creature and its linked camera.
    pub fn free_creature(&mut self, id: u32) -> Result<()> {
        let creature = self.creatures.free(id)?;
        if creature.camera_id != 0 && self.cameras.contains(creature.camera_id) {
            self.cameras.free(creature.camera_id)?;
        }
        Ok(())
    }

    pub fn set_camera_offset(&mut self, offset: Vec3) -> Result<()> {
        self.creatures.current_mut()?.camera_offset = offset;
        Ok(())
    }

    pub fn set_creature_position(&mut self, position: Vec3) -> Result<()> {
        self.creatures.current_mut()?.pbox.pos = position;
        Ok(())
    }

    pub fn set_move_speed(&mut self, speed: f32) -> Result<()> {
        self.creatures.current_mut()?.move_speed = speed;
        Ok(())
    }

    pub fn set_jump_speed(&mut self, speed: f32) -> Result<()> {
        self.creatures.current_mut()?.jump_speed = speed;
        Ok(())
    }

    /// Runs one physics step for the creature `id`. The current camera
    /// selection is left as it was.
    pub fn update_creature(&mut self, id: u32, dt: f32) -> Result<TickReport> {
        let Self {
            settings,
            cameras,
            creatures,
            barriers,
            ..
        } = self;
        let creature = creatures.try_get_mut(id)?;
        Ok(creature::update(creature, cameras, barriers, &settings.physics, dt))
    }

    /// Walks the current creature relative to the camera's yaw. Ignored when
    /// no creature is selected.
    pub fn process_move(&mut self, direction: MoveDirection, speed_scale: f32) {
        let linked_front = || {
            let creature = self.creatures.current().ok()?;
            self.cameras.get(creature.camera_id).map(|camera| camera.front)
        };
        let front = self
            .cameras
            .current()
            .map(|camera| camera.front)
            .ok()
            .or_else(linked_front)
            .unwrap_or(Vec3::NEG_Z);

        let dt = self.delta_time;
        if let Ok(creature) = self.creatures.current_mut() {
            creature::process_move(creature, front, direction, speed_scale, dt);
        }
    }

    /// Makes the current creature jump if it stands on something.
    pub fn jump(&mut self) -> bool {
        self.creatures
            .current_mut()
            .is_ok_and(creature::jump)
    }

    // ========================================================================
    // Teardown
    // ========================================================================

    /// Frees every registry and releases all backend resources.
    pub fn free_all(&mut self) {
        let backend = self.renderer.backend_mut();
        for mut model in self.models.free_all() {
            model.release(backend);
        }
        for texture in self.textures.free_all() {
            backend.delete_texture(texture.gpu);
        }
        for shader in self.shaders.free_all() {
            backend.delete_program(shader.program);
        }
        self.texture_paths.clear();

        self.cameras.free_all();
        self.lights.free_all();
        self.creatures.free_all();
        self.barriers.free_all();
        log::info!("All engine registries freed");
    }
}

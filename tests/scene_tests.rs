//! Scene Resource Tests
//!
//! Tests for:
//! - Camera orientation, mouse look limits, zoom clamping
//! - Shader generation, selection and uniform calls
//! - Texture loading and path de-duplication
//! - Model / mesh upload and release
//! - Light construction and lookup

use glam::{Mat4, Vec3};

use kestrel::errors::{EngineError, SelectionKind};
use kestrel::render::{BackendCall, CallLog, UniformValue};
use kestrel::scene::camera::{PITCH_LIMIT, ZOOM_RANGE};
use kestrel::scene::{Camera, CameraDefaults, CameraMovement, Light, Mesh, Model};
use kestrel::{Engine, EngineSettings, HeadlessBackend, TextureKind};

fn approx_vec(a: Vec3, b: Vec3) -> bool {
    (a - b).abs().max_element() < 1e-5
}

fn engine() -> (Engine, CallLog) {
    let (backend, calls) = HeadlessBackend::new();
    let engine = Engine::new(EngineSettings::default(), backend).unwrap();
    (engine, calls)
}

fn count(calls: &CallLog, pred: impl Fn(&BackendCall) -> bool) -> usize {
    calls.snapshot().iter().filter(|&call| pred(call)).count()
}

// ============================================================================
// Camera
// ============================================================================

#[test]
fn default_camera_looks_down_negative_z() {
    let camera = Camera::new(Vec3::ZERO, &CameraDefaults::default());
    assert!(approx_vec(camera.front, Vec3::NEG_Z));
    assert!(approx_vec(camera.right, Vec3::X));
    assert!(approx_vec(camera.up, Vec3::Y));
}

#[test]
fn keyboard_moves_along_camera_basis() {
    let mut camera = Camera::new(Vec3::ZERO, &CameraDefaults::default());
    camera.process_keyboard(CameraMovement::Forward, 1.0);
    assert!(approx_vec(camera.position, Vec3::new(0.0, 0.0, -2.5)));

    camera.process_keyboard(CameraMovement::Right, 2.0);
    assert!(approx_vec(camera.position, Vec3::new(5.0, 0.0, -2.5)));
}

#[test]
fn constrained_mouse_look_clamps_pitch() {
    let mut camera = Camera::new(Vec3::ZERO, &CameraDefaults::default());

    camera.process_mouse_move(0.0, 1000.0, true);
    assert_eq!(camera.pitch, PITCH_LIMIT);

    camera.process_mouse_move(0.0, -3000.0, true);
    assert_eq!(camera.pitch, -PITCH_LIMIT);
}

#[test]
fn unconstrained_mouse_look_keeps_pitch() {
    let mut camera = Camera::new(Vec3::ZERO, &CameraDefaults::default());
    camera.process_mouse_move(0.0, 1000.0, false);
    assert!((camera.pitch - 100.0).abs() < 1e-3);
    assert!(camera.right.is_finite());
}

#[test]
fn scroll_clamps_zoom() {
    let mut camera = Camera::new(Vec3::ZERO, &CameraDefaults::default());

    camera.process_scroll(-10.0);
    assert_eq!(camera.zoom, ZOOM_RANGE.1);

    camera.process_scroll(20.0);
    assert_eq!(camera.zoom, 25.0);

    camera.process_scroll(100.0);
    assert_eq!(camera.zoom, ZOOM_RANGE.0);
}

#[test]
fn view_matrix_moves_camera_to_origin() {
    let camera = Camera::new(Vec3::new(1.0, 2.0, 3.0), &CameraDefaults::default());
    let eye = camera.view_matrix().transform_point3(camera.position);
    assert!(approx_vec(eye, Vec3::ZERO));
}

#[test]
fn camera_calls_need_a_current_camera() {
    let (mut engine, _calls) = engine();
    assert!(matches!(
        engine.camera_get_position(),
        Err(EngineError::NotSet(SelectionKind::Camera))
    ));
    assert!(engine.process_scroll(1.0).is_err());

    let id = engine.generate_camera(Vec3::ONE).unwrap();
    engine.camera_use(id).unwrap();
    engine.camera_set_position(Vec3::new(0.0, 3.0, 0.0)).unwrap();
    assert_eq!(engine.camera_get_position().unwrap(), Vec3::new(0.0, 3.0, 0.0));
    assert_eq!(engine.camera_get_zoom().unwrap(), 45.0);
}

// ============================================================================
// Shader
// ============================================================================

#[test]
fn shader_use_binds_program_and_sets_uniforms() {
    let (mut engine, calls) = engine();
    let id = engine.generate_shader("lit", "lit.vs", "lit.fs").unwrap();
    engine.shader_use(id).unwrap();
    engine.shader_set_float("shininess", 32.0).unwrap();

    let program = engine.shaders().get(id).unwrap().program;
    let log = calls.snapshot();
    assert!(log.contains(&BackendCall::UseProgram(program)));
    assert!(log.contains(&BackendCall::SetUniform {
        program,
        name: "shininess".to_string(),
        value: UniformValue::Float(32.0),
    }));
}

#[test]
fn uniform_setters_need_a_current_shader() {
    let (mut engine, _calls) = engine();
    engine.generate_shader("lit", "lit.vs", "lit.fs").unwrap();

    assert!(matches!(
        engine.shader_set_mat4("model", Mat4::IDENTITY),
        Err(EngineError::NotSet(SelectionKind::Shader))
    ));
    assert!(engine.shader_set_bool("flag", true).is_err());
}

#[test]
fn shader_with_missing_source_is_not_registered() {
    let (backend, _calls) = HeadlessBackend::new();
    let backend = backend.with_missing_path("missing.fs");
    let mut engine = Engine::new(EngineSettings::default(), backend).unwrap();

    assert!(matches!(
        engine.generate_shader("broken", "ok.vs", "missing.fs"),
        Err(EngineError::Backend(_))
    ));
    assert!(engine.shaders().is_empty());
}

#[test]
fn shader_with_empty_path_is_rejected() {
    let (mut engine, _calls) = engine();
    assert!(matches!(
        engine.generate_shader("broken", "", "lit.fs"),
        Err(EngineError::InvalidPointer(_))
    ));
}

#[test]
fn free_shader_deletes_program() {
    let (mut engine, calls) = engine();
    let id = engine.generate_shader("lit", "lit.vs", "lit.fs").unwrap();
    let program = engine.shaders().get(id).unwrap().program;

    engine.free_shader(id).unwrap();

    assert!(calls.snapshot().contains(&BackendCall::DeleteProgram(program)));
    assert!(engine.shaders().is_empty());
}

// ============================================================================
// Texture
// ============================================================================

#[test]
fn loading_a_path_twice_reuses_the_texture() {
    let (mut engine, calls) = engine();

    let first = engine.load_texture("stone.png", TextureKind::Diffuse).unwrap();
    let second = engine.load_texture("stone.png", TextureKind::Diffuse).unwrap();
    let other = engine.load_texture("moss.png", TextureKind::Specular).unwrap();

    assert_eq!(first, second);
    assert_ne!(first, other);
    assert_eq!(engine.textures().len(), 2);
    assert_eq!(
        count(&calls, |call| matches!(call, BackendCall::UploadTexture { .. })),
        2
    );
}

#[test]
fn freed_texture_is_loaded_again() {
    let (mut engine, calls) = engine();
    let id = engine.load_texture("stone.png", TextureKind::Diffuse).unwrap();

    engine.free_texture(id).unwrap();
    engine.load_texture("stone.png", TextureKind::Diffuse).unwrap();

    assert_eq!(
        count(&calls, |call| matches!(call, BackendCall::DeleteTexture(_))),
        1
    );
    assert_eq!(
        count(&calls, |call| matches!(call, BackendCall::UploadTexture { .. })),
        2
    );
}

#[test]
fn cached_path_resolves_to_its_own_texture_after_a_free() {
    let (mut engine, _calls) = engine();
    let a = engine.load_texture("a.png", TextureKind::Diffuse).unwrap();
    let b = engine.load_texture("b.png", TextureKind::Diffuse).unwrap();
    engine.free_texture(a).unwrap();

    let c = engine.load_texture("c.png", TextureKind::Diffuse).unwrap();
    let again = engine.load_texture("c.png", TextureKind::Diffuse).unwrap();

    assert_eq!(c, again);
    assert_ne!(c, b);
    assert_eq!(engine.textures().get(c).unwrap().path, "c.png");
    assert_eq!(engine.textures().get(b).unwrap().path, "b.png");
}

#[test]
fn missing_texture_reports_backend_error() {
    let (backend, _calls) = HeadlessBackend::new();
    let mut engine =
        Engine::new(EngineSettings::default(), backend.with_missing_path("gone.png")).unwrap();

    assert!(matches!(
        engine.load_texture("gone.png", TextureKind::Diffuse),
        Err(EngineError::Backend(_))
    ));
    assert!(engine.textures().is_empty());
}

#[test]
fn texture_kind_names_sampler_uniforms() {
    assert_eq!(TextureKind::Diffuse.uniform_prefix(), "texture_diffuse");
    assert_eq!(TextureKind::Height.uniform_prefix(), "texture_height");
}

// ============================================================================
// Mesh / Model
// ============================================================================

#[test]
fn cube_mesh_has_four_vertices_per_face() {
    let cube = Mesh::cube(Vec3::splat(2.0));
    assert_eq!(cube.vertices.len(), 24);
    assert_eq!(cube.index_count(), 36);
    for vertex in &cube.vertices {
        let p = Vec3::from_array(vertex.position);
        assert!(approx_vec(p.abs(), Vec3::ONE), "corner {p} off the unit cube");
    }
}

#[test]
fn generate_model_uploads_every_mesh() {
    let (mut engine, calls) = engine();
    let cube = Mesh::cube(Vec3::ONE);

    let id = engine.generate_model("pair", &[cube.clone(), cube]).unwrap();

    let model = engine.models().get(id).unwrap();
    assert_eq!(model.meshes.len(), 2);
    assert!(model.meshes.iter().all(|mesh| mesh.gpu.is_some()));

    let uploads: Vec<_> = calls
        .snapshot()
        .into_iter()
        .filter_map(|call| match call {
            BackendCall::UploadMesh { vertex_bytes, index_count, .. } => {
                Some((vertex_bytes, index_count))
            }
            _ => None,
        })
        .collect();
    assert_eq!(uploads, vec![(24 * 32, 36), (24 * 32, 36)]);
}

#[test]
fn failed_mesh_upload_releases_the_partial_model() {
    let (backend, calls) = HeadlessBackend::new();
    let mut engine =
        Engine::new(EngineSettings::default(), backend.with_mesh_budget(1)).unwrap();
    let cube = Mesh::cube(Vec3::ONE);

    let result = engine.generate_model("pair", &[cube.clone(), cube]);

    assert!(matches!(result, Err(EngineError::Backend(_))));
    assert!(engine.models().is_empty());
    let uploaded: Vec<_> = calls
        .snapshot()
        .into_iter()
        .filter_map(|call| match call {
            BackendCall::UploadMesh { buffers, .. } => Some(buffers),
            _ => None,
        })
        .collect();
    let deleted: Vec<_> = calls
        .snapshot()
        .into_iter()
        .filter_map(|call| match call {
            BackendCall::DeleteMesh(buffers) => Some(buffers),
            _ => None,
        })
        .collect();
    assert_eq!(uploaded.len(), 1);
    assert_eq!(deleted, uploaded);
}

#[test]
fn free_model_releases_mesh_buffers() {
    let (mut engine, calls) = engine();
    let id = engine.generate_model("cube", &[Mesh::cube(Vec3::ONE)]).unwrap();

    engine.free_model(id).unwrap();

    assert!(engine.models().is_empty());
    assert_eq!(count(&calls, |call| matches!(call, BackendCall::DeleteMesh(_))), 1);
}

#[test]
fn model_transform_setters_need_a_current_model() {
    let (mut engine, _calls) = engine();
    let id = engine.generate_model("cube", &[Mesh::cube(Vec3::ONE)]).unwrap();

    assert!(matches!(
        engine.model_set_position(Vec3::ONE),
        Err(EngineError::NotSet(SelectionKind::Model))
    ));

    engine.model_use(id).unwrap();
    engine.model_set_position(Vec3::new(1.0, 2.0, 3.0)).unwrap();
    engine.model_set_scale(Vec3::splat(2.0)).unwrap();

    let matrix = engine.models().get(id).unwrap().model_matrix();
    assert!(approx_vec(matrix.transform_point3(Vec3::ONE), Vec3::new(3.0, 4.0, 5.0)));
}

#[test]
fn model_rotation_is_in_degrees() {
    let mut model = Model::new("empty", &[]).unwrap();
    model.rotation = Vec3::new(0.0, 90.0, 0.0);
    let rotated = model.model_matrix().transform_vector3(Vec3::X);
    assert!(approx_vec(rotated, Vec3::NEG_Z));
}

// ============================================================================
// Light
// ============================================================================

#[test]
fn light_positions_by_kind() {
    let mut sun = Light::new_directional(Vec3::new(0.0, -2.0, 0.0));
    assert_eq!(sun.position(), None);
    sun.set_position(Vec3::ONE);
    assert_eq!(sun.position(), None);

    let mut lamp = Light::new_point(Vec3::ZERO);
    lamp.set_position(Vec3::new(1.0, 4.0, 0.0));
    assert_eq!(lamp.position(), Some(Vec3::new(1.0, 4.0, 0.0)));
}

#[test]
fn engine_lights_can_be_edited_by_id() {
    let (mut engine, _calls) = engine();
    let id = engine.generate_light(Light::new_point(Vec3::ZERO)).unwrap();

    engine.light_mut(id).unwrap().diffuse = Vec3::new(1.0, 0.0, 0.0);
    assert_eq!(engine.lights().get(id).unwrap().diffuse, Vec3::new(1.0, 0.0, 0.0));

    engine.free_light(id).unwrap();
    assert!(matches!(
        engine.light_mut(id),
        Err(EngineError::NotFound { kind: SelectionKind::Light, .. })
    ));
}

// ============================================================================
// Teardown
// ============================================================================

#[test]
fn free_all_releases_backend_resources() {
    let (mut engine, calls) = engine();
    engine.generate_shader("lit", "lit.vs", "lit.fs").unwrap();
    engine.load_texture("stone.png", TextureKind::Diffuse).unwrap();
    engine.generate_model("cube", &[Mesh::cube(Vec3::ONE)]).unwrap();
    engine.generate_camera(Vec3::ZERO).unwrap();
    calls.clear();

    engine.free_all();

    let log = calls.snapshot();
    assert!(log.iter().any(|call| matches!(call, BackendCall::DeleteMesh(_))));
    assert!(log.iter().any(|call| matches!(call, BackendCall::DeleteTexture(_))));
    assert!(log.iter().any(|call| matches!(call, BackendCall::DeleteProgram(_))));
    assert!(engine.cameras().is_empty());
    assert!(engine.models().is_empty());
}

//! Voxel Walk
//! a headless first-person walk across a small block world.
//!
//! Features:
//! 1. Builds a floor, a staircase and a few pillars out of box barriers
//! 2. Mirrors every block with a cube model for the renderer
//! 3. Drives the player with scripted input (walk, turn, jump)
//! 4. Renders through the recording backend and logs frame statistics
//!
//! Run: `cargo run -p voxel_walk -- [settings.json]`
//!
//! Set `RUST_LOG=debug` to see landing / take-off transitions.

use std::process::ExitCode;

use anyhow::Context;
use glam::Vec3;
use kestrel::render::CallLog;
use kestrel::scene::Light;
use kestrel::{BarrierKind, Engine, EngineSettings, HeadlessBackend, Mesh, MoveDirection, TextureKind};

const FRAME_STEP: f32 = 1.0 / 60.0;
const FRAMES: u32 = 600;
const PLAYER_SIZE: Vec3 = Vec3::new(0.8, 1.8, 0.8);
const EYE_OFFSET: Vec3 = Vec3::new(0.0, 0.7, 0.0);

struct Block {
    pos: Vec3,
    size: Vec3,
}

fn world_blocks() -> Vec<Block> {
    let mut blocks = vec![Block {
        pos: Vec3::new(0.0, -0.5, 0.0),
        size: Vec3::new(64.0, 1.0, 64.0),
    }];

    // staircase heading down -Z, one block per step
    for step in 0..4 {
        let h = 0.5 * (step + 1) as f32;
        blocks.push(Block {
            pos: Vec3::new(0.0, h * 0.5, -4.0 - step as f32),
            size: Vec3::new(2.0, h, 1.0),
        });
    }

    for x in [-6.0, 6.0] {
        blocks.push(Block {
            pos: Vec3::new(x, 1.5, -6.0),
            size: Vec3::new(1.0, 3.0, 1.0),
        });
    }
    blocks
}

fn build_world(engine: &mut Engine) -> anyhow::Result<()> {
    let shader = engine
        .generate_shader("block", "shaders/block.vs", "shaders/block.fs")
        .context("compiling block shader")?;
    engine.shader_use(shader)?;

    let stone = engine.load_texture("textures/stone.png", TextureKind::Diffuse)?;
    let cube = Mesh::cube(Vec3::ONE).with_textures([stone]);

    for (i, block) in world_blocks().into_iter().enumerate() {
        let barrier = engine.generate_barrier(BarrierKind::Box)?;
        engine.set_barrier_size(barrier, block.size)?;
        engine.set_barrier_pos(barrier, block.pos)?;

        let model = engine.generate_model(&format!("block_{i}"), std::slice::from_ref(&cube))?;
        engine.model_use(model)?;
        engine.model_set_position(block.pos)?;
        engine.model_set_scale(block.size)?;
    }
    engine.model_use(0)?;

    engine.generate_light(Light::new_directional(Vec3::new(-0.2, -1.0, -0.3)))?;
    engine.generate_light(Light::new_point(Vec3::new(0.0, 4.0, -4.0)))?;

    log::info!(
        "World ready: {} barriers, {} models",
        engine.barriers().len(),
        engine.models().len()
    );
    Ok(())
}

fn spawn_player(engine: &mut Engine) -> anyhow::Result<u32> {
    let player = engine.generate_creature(PLAYER_SIZE)?;
    engine.creature_use(player)?;
    engine.set_camera_offset(EYE_OFFSET)?;
    engine.set_creature_position(Vec3::new(0.0, 2.0, 2.0))?;
    Ok(player)
}

/// Scripted input for one frame.
fn drive(engine: &mut Engine, frame: u32) {
    match frame {
        60..=239 => engine.process_move(MoveDirection::Forward, 1.0),
        240..=299 => {
            if let Err(err) = engine.process_mouse_move(6.0, 0.0, true) {
                log::warn!("Mouse look ignored: {err}");
            }
        }
        300..=420 => engine.process_move(MoveDirection::Right, 0.5),
        _ => {}
    }

    if frame % 90 == 0 && engine.jump() {
        log::debug!("Frame {frame}: jump");
    }
}

fn run(engine: &mut Engine, calls: &CallLog) {
    for frame in 0..FRAMES {
        drive(engine, frame);

        if let Some(report) = engine.tick()
            && report.respawned
        {
            log::warn!("Frame {frame}: player respawned");
        }

        calls.clear();
        match engine.render_frame() {
            Ok(stats) if frame % 60 == 0 => {
                let eye = engine.camera_get_position().unwrap_or(Vec3::ZERO);
                log::info!(
                    "Frame {frame}: {} draws, eye at ({:.2}, {:.2}, {:.2})",
                    stats.draw_calls,
                    eye.x,
                    eye.y,
                    eye.z
                );
            }
            Ok(_) => {}
            Err(err) => log::error!("Frame {frame} skipped: {err}"),
        }
    }
}

fn load_settings() -> anyhow::Result<EngineSettings> {
    match std::env::args().nth(1) {
        Some(path) => {
            let json = std::fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;
            Ok(EngineSettings::from_json_str(&json)?)
        }
        None => Ok(EngineSettings::default()),
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = match load_settings() {
        Ok(settings) => settings,
        Err(err) => {
            log::error!("Invalid settings: {err:#}");
            return ExitCode::FAILURE;
        }
    };

    let (backend, calls) = HeadlessBackend::new();
    let mut engine = match Engine::with_fixed_step(settings, backend, FRAME_STEP) {
        Ok(engine) => engine,
        Err(err) => {
            log::error!("Engine init failed: {err}");
            return ExitCode::FAILURE;
        }
    };
    engine.resize(1280, 720);

    if let Err(err) = build_world(&mut engine) {
        log::error!("World setup failed: {err:#}");
        return ExitCode::FAILURE;
    }
    let player = match spawn_player(&mut engine) {
        Ok(id) => id,
        Err(err) => {
            log::error!("Failed to create player: {err:#}");
            return ExitCode::FAILURE;
        }
    };

    run(&mut engine, &calls);

    if let Some(creature) = engine.creatures().get(player) {
        log::info!(
            "Finished after {} frames at {}, grounded: {}",
            engine.frame_count(),
            creature.pbox.pos,
            creature.is_grounded()
        );
    }
    engine.free_all();
    ExitCode::SUCCESS
}

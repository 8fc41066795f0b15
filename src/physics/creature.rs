//! Creature Controller
//!
//! A creature is a dynamic box driven by input, gravity and barrier
//! collisions, with a linked camera riding at `camera_offset` from its center.
//!
//! # Contact state
//!
//! ```text
//!             no barrier reports on_top / jump
//!   Grounded ─────────────────────────────────▶ Floating
//!       ▲                                          │
//!       └──────── push-out while floating ─────────┘
//! ```
//!
//! Floating creatures integrate gravity. Grounded creatures have their
//! vertical speed zeroed every tick.

use glam::Vec3;

use super::barrier::{Barrier, BarrierKind};
use super::collision::{
    CollisionOutcome, ball_box_collision_move, ball_box_collision_test, box_box_collision_move,
};
use super::shapes::{Axis, PBox, PMovement};
use crate::pool::{Registry, impl_handled};
use crate::scene::{Camera, CameraMovement};
use crate::settings::{CreatureDefaults, PhysicsSettings};

/// Directions accepted by [`process_move`].
pub type MoveDirection = CameraMovement;

/// Reserved for alternative movement models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CreatureMode {
    #[default]
    Normal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Creature {
    pub id: u32,
    /// Camera following this creature, 0 when none
    pub camera_id: u32,
    pub pbox: PBox,
    pub movement: PMovement,
    /// Airborne flag
    pub floating: bool,
    pub camera_offset: Vec3,
    pub move_speed: f32,
    pub jump_speed: f32,
    pub mode: CreatureMode,
}

impl_handled!(Creature, Creature);

impl Creature {
    /// New airborne creature at the origin.
    #[must_use]
    pub fn new(size: Vec3, camera_id: u32, defaults: &CreatureDefaults) -> Self {
        Self {
            id: 0,
            camera_id,
            pbox: PBox::new(Vec3::ZERO, size),
            movement: PMovement::default(),
            floating: true,
            camera_offset: defaults.camera_offset,
            move_speed: defaults.move_speed,
            jump_speed: defaults.jump_speed,
            mode: CreatureMode::default(),
        }
    }

    #[inline]
    #[must_use]
    pub fn is_grounded(&self) -> bool {
        !self.floating
    }

    #[inline]
    #[must_use]
    pub fn eye_position(&self) -> Vec3 {
        self.pbox.pos + self.camera_offset
    }
}

/// Per-tick summary returned by [`update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickReport {
    pub landed: bool,
    pub took_off: bool,
    pub respawned: bool,
    pub resolved_collisions: u32,
}

/// Advances one creature by `dt` seconds.
///
/// Order of the step:
/// 1. the linked camera is moved to the eye position (previous camera
///    selection is restored afterwards)
/// 2. gravity integrates while floating, vertical speed is zeroed otherwise
/// 3. the box is resolved against every barrier
/// 4. with no barrier underneath the creature becomes floating
/// 5. creatures that fell below the limit are respawned
pub fn update(
    creature: &mut Creature,
    cameras: &mut Registry<Camera>,
    barriers: &Registry<Barrier>,
    physics: &PhysicsSettings,
    dt: f32,
) -> TickReport {
    let mut report = TickReport::default();

    if creature.camera_id != 0 {
        match cameras.select_scoped(creature.camera_id) {
            Ok(mut scope) => {
                if let Ok(camera) = scope.current_mut() {
                    camera.position = creature.eye_position();
                }
            }
            Err(err) => log::warn!("Creature {} camera not updated: {err}", creature.id),
        }
    }

    if creature.floating {
        creature.movement.speed.y -= physics.gravity * dt;
        creature.pbox.pos.y += creature.movement.speed.y * dt;
    } else {
        creature.movement.speed.y = 0.0;
    }

    let mut standing = false;
    for barrier in barriers.iter() {
        let outcome = resolve_against(creature, barrier, physics.on_top_tolerance);
        if outcome.resolved {
            report.resolved_collisions += 1;
            if creature.floating {
                creature.floating = false;
                report.landed = true;
                standing = true;
                log::debug!("Creature {} landed on barrier {}", creature.id, barrier.id);
            }
        }
        // a resting box can end up one ulp inside the floor after rounding, so
        // an upward push-out counts as support too
        let pushed_up = outcome.resolved
            && outcome.axis == Some(Axis::Y)
            && creature.pbox.pos.y > barrier.pbox.pos.y;
        standing |= outcome.on_top || pushed_up;
    }

    if !standing && !creature.floating {
        creature.floating = true;
        report.took_off = true;
        log::debug!("Creature {} lost support", creature.id);
    }

    if creature.pbox.pos.y < physics.fall_limit_y {
        log::info!(
            "Creature {} fell below {}, respawning at {}",
            creature.id,
            physics.fall_limit_y,
            physics.respawn_position
        );
        creature.pbox.pos = physics.respawn_position;
        creature.movement.speed.y = 0.0;
        report.respawned = true;
    }

    report
}

fn resolve_against(creature: &mut Creature, barrier: &Barrier, tolerance: f32) -> CollisionOutcome {
    match barrier.kind {
        BarrierKind::Box => box_box_collision_move(&barrier.pbox, &mut creature.pbox, tolerance),
        BarrierKind::Ball => {
            if ball_box_collision_test(&barrier.pball, &creature.pbox) {
                log::trace!("Creature {} touches ball barrier {}", creature.id, barrier.id);
            }
            ball_box_collision_move(&barrier.pball, &mut creature.pbox)
        }
    }
}

/// Horizontal walking basis from a camera front vector: front projected onto
/// the ground plane, and its right-hand perpendicular.
#[must_use]
pub fn walk_basis(camera_front: Vec3) -> (Vec3, Vec3) {
    let front = Vec3::new(camera_front.x, 0.0, camera_front.z)
        .try_normalize()
        .unwrap_or(Vec3::NEG_Z);
    let right = front.cross(Vec3::Y).normalize();
    (front, right)
}

/// Moves the creature relative to the camera's yaw by
/// `move_speed * dt * speed_scale`. Up and Down follow world Y.
pub fn process_move(
    creature: &mut Creature,
    camera_front: Vec3,
    direction: MoveDirection,
    speed_scale: f32,
    dt: f32,
) {
    let (front, right) = walk_basis(camera_front);
    let step = creature.move_speed * dt * speed_scale;

    let delta = match direction {
        MoveDirection::Forward => front,
        MoveDirection::Backward => -front,
        MoveDirection::Left => -right,
        MoveDirection::Right => right,
        MoveDirection::Up => Vec3::Y,
        MoveDirection::Down => Vec3::NEG_Y,
    };
    creature.pbox.pos += delta * step;
}

/// Launches a grounded creature. Returns whether the jump happened.
pub fn jump(creature: &mut Creature) -> bool {
    if creature.floating {
        return false;
    }

    creature.floating = true;
    creature.movement.speed.y = creature.jump_speed;
    true
}

//! Physics
//!
//! Axis-aligned box collision against static [`Barrier`]s and the grounded /
//! floating [`Creature`] controller built on top of it.

pub mod barrier;
pub mod collision;
pub mod creature;
pub mod shapes;

pub use barrier::{Barrier, BarrierKind};
pub use collision::{
    CollisionOutcome, ball_ball_collision_test, ball_box_collision_test, box_ball_collision_test,
    box_box_collision_move, box_box_collision_test,
};
pub use creature::{Creature, CreatureMode, MoveDirection, TickReport};
pub use shapes::{Axis, PBall, PBox, PMovement};

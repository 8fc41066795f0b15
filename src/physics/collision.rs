//! Box and ball collision.
//!
//! Only the box-box case resolves penetration. The ball variants answer
//! overlap queries; their `*_collision_move` functions are no-ops that always
//! succeed.

use super::shapes::{Axis, PBall, PBox};

/// Overlap flag with all three axes set.
pub const FULL_OVERLAP: u8 = 0b111;
/// Overlap on x and z only: the movable box sits directly above (or below)
/// the barrier.
pub const TOP_CONTACT: u8 = 0b101;

/// Result of one resolution step against a single barrier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CollisionOutcome {
    /// The movable box was pushed out of the barrier.
    pub resolved: bool,
    /// The movable box rests on a face of the barrier within tolerance.
    pub on_top: bool,
    /// Axis used for the push-out when `resolved` is set.
    pub axis: Option<Axis>,
}

/// True when the boxes overlap on all three axes.
#[must_use]
pub fn box_box_collision_test(a: &PBox, b: &PBox) -> bool {
    let min_dist = (a.size + b.size) * 0.5;
    let dist = (a.pos - b.pos).abs();
    dist.cmplt(min_dist).all()
}

/// 3-bit overlap flag between two boxes, x in the high bit.
#[must_use]
pub fn overlap_flag(barrier: &PBox, movable: &PBox) -> u8 {
    let min_dist = (barrier.size + movable.size) * 0.5;
    let dist = (barrier.pos - movable.pos).abs();

    Axis::ALL
        .into_iter()
        .filter(|axis| dist[axis.index()] < min_dist[axis.index()])
        .fold(0, |flag, axis| flag | axis.flag_bit())
}

/// Pushes `movable` out of `barrier` along a single axis.
///
/// `on_top` is decided from the overlap flag before anything moves, so it can
/// be reported without a push: the flag must be [`TOP_CONTACT`] and the
/// vertical gap within `tolerance` of touching.
///
/// On full overlap the push-out axis is the one with the largest
/// `|distance| / barrier.size` ratio (x wins ties, then y). The box is moved
/// to the barrier face on the side its center currently sits on.
pub fn box_box_collision_move(barrier: &PBox, movable: &mut PBox, tolerance: f32) -> CollisionOutcome {
    let min_dist = (barrier.size + movable.size) * 0.5;
    let dist = (barrier.pos - movable.pos).abs();
    let flag = overlap_flag(barrier, movable);

    let on_top = flag == TOP_CONTACT && (dist.y - min_dist.y).abs() < tolerance;
    if flag != FULL_OVERLAP {
        return CollisionOutcome {
            resolved: false,
            on_top,
            axis: None,
        };
    }

    let ratio = dist / barrier.size;
    let mut axis = Axis::X;
    for candidate in [Axis::Y, Axis::Z] {
        if ratio[candidate.index()] > ratio[axis.index()] {
            axis = candidate;
        }
    }

    let i = axis.index();
    movable.pos[i] = if movable.pos[i] >= barrier.pos[i] {
        barrier.pos[i] + min_dist[i]
    } else {
        barrier.pos[i] - min_dist[i]
    };

    CollisionOutcome {
        resolved: true,
        on_top,
        axis: Some(axis),
    }
}

/// True when the ball touches or intersects the box.
#[must_use]
pub fn box_ball_collision_test(b: &PBox, ball: &PBall) -> bool {
    let closest = ball.pos.clamp(b.min(), b.max());
    closest.distance_squared(ball.pos) <= ball.radius * ball.radius
}

#[inline]
#[must_use]
pub fn ball_box_collision_test(ball: &PBall, b: &PBox) -> bool {
    box_ball_collision_test(b, ball)
}

#[must_use]
pub fn ball_ball_collision_test(a: &PBall, b: &PBall) -> bool {
    a.pos.distance(b.pos) <= a.radius + b.radius
}

pub fn box_ball_collision_move(_barrier: &PBox, _movable: &mut PBall) -> CollisionOutcome {
    CollisionOutcome::default()
}

pub fn ball_box_collision_move(_barrier: &PBall, _movable: &mut PBox) -> CollisionOutcome {
    CollisionOutcome::default()
}

pub fn ball_ball_collision_move(_barrier: &PBall, _movable: &mut PBall) -> CollisionOutcome {
    CollisionOutcome::default()
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;

    #[test]
    fn overlap_flag_puts_x_in_high_bit() {
        let barrier = PBox::new(Vec3::ZERO, Vec3::splat(2.0));
        let movable = PBox::new(Vec3::new(0.5, 10.0, 10.0), Vec3::ONE);
        assert_eq!(overlap_flag(&barrier, &movable), 0b100);

        let movable = PBox::new(Vec3::new(10.0, 10.0, 0.5), Vec3::ONE);
        assert_eq!(overlap_flag(&barrier, &movable), 0b001);
    }

    #[test]
    fn ratio_ties_prefer_x() {
        let barrier = PBox::new(Vec3::ZERO, Vec3::splat(2.0));
        let mut movable = PBox::new(Vec3::ZERO, Vec3::ONE);
        let outcome = box_box_collision_move(&barrier, &mut movable, 0.01);
        assert_eq!(outcome.axis, Some(Axis::X));
        assert_eq!(movable.pos, Vec3::new(1.5, 0.0, 0.0));
    }
}

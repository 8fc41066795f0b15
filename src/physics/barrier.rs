use glam::Vec3;

use super::shapes::{PBall, PBox};
use crate::pool::impl_handled;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BarrierKind {
    #[default]
    Box,
    Ball,
}

/// Static collision geometry. Only explicit setters move it.
///
/// Both shapes are kept so a barrier can switch kind without losing its
/// placement; `kind` decides which one takes part in collision.
#[derive(Debug, Clone, PartialEq)]
pub struct Barrier {
    pub id: u32,
    pub kind: BarrierKind,
    pub pbox: PBox,
    pub pball: PBall,
}

impl_handled!(Barrier, Barrier);

impl Barrier {
    #[must_use]
    pub fn new(kind: BarrierKind) -> Self {
        Self {
            id: 0,
            kind,
            pbox: PBox::new(Vec3::ZERO, Vec3::ONE),
            pball: PBall::new(Vec3::ZERO, 0.5),
        }
    }

    pub fn set_pos(&mut self, pos: Vec3) {
        self.pbox.pos = pos;
        self.pball.pos = pos;
    }

    /// Sets the box extents; the ball radius follows the largest half-extent.
    pub fn set_size(&mut self, size: Vec3) {
        self.pbox.size = size;
        self.pball.radius = size.max_element() * 0.5;
    }

    pub fn set_radius(&mut self, radius: f32) {
        self.pball.radius = radius;
    }
}

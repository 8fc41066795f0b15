use glam::Vec3;

/// Axis-aligned box: center position and full extents.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PBox {
    pub pos: Vec3,
    pub size: Vec3,
}

impl PBox {
    #[must_use]
    pub const fn new(pos: Vec3, size: Vec3) -> Self {
        Self { pos, size }
    }

    #[inline]
    #[must_use]
    pub fn half_extents(&self) -> Vec3 {
        self.size * 0.5
    }

    #[inline]
    #[must_use]
    pub fn min(&self) -> Vec3 {
        self.pos - self.half_extents()
    }

    #[inline]
    #[must_use]
    pub fn max(&self) -> Vec3 {
        self.pos + self.half_extents()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PBall {
    pub pos: Vec3,
    pub radius: f32,
}

impl PBall {
    #[must_use]
    pub const fn new(pos: Vec3, radius: f32) -> Self {
        Self { pos, radius }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PMovement {
    pub acceleration: Vec3,
    pub speed: Vec3,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    #[inline]
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Bit of this axis in a 3-bit overlap flag, x in the high bit.
    #[inline]
    #[must_use]
    pub fn flag_bit(self) -> u8 {
        0b100 >> self.index()
    }
}

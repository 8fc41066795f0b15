use glam::Vec3;

use crate::pool::impl_handled;

/// Distance falloff `1 / (constant + linear·d + quadratic·d²)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attenuation {
    pub constant: f32,
    pub linear: f32,
    pub quadratic: f32,
}

impl Default for Attenuation {
    // covers roughly 50 units
    fn default() -> Self {
        Self {
            constant: 1.0,
            linear: 0.09,
            quadratic: 0.032,
        }
    }
}

impl Attenuation {
    #[must_use]
    pub fn factor(&self, distance: f32) -> f32 {
        1.0 / (self.constant + self.linear * distance + self.quadratic * distance * distance)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DirectionalLight {
    pub direction: Vec3,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PointLight {
    pub position: Vec3,
    pub attenuation: Attenuation,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpotLight {
    pub position: Vec3,
    pub direction: Vec3,
    /// Inner cone, degrees
    pub cut_off: f32,
    /// Outer cone, degrees
    pub outer_cut_off: f32,
    pub attenuation: Attenuation,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LightKind {
    Directional(DirectionalLight),
    Point(PointLight),
    Spot(SpotLight),
}

/// Phong light source.
#[derive(Debug, Clone, PartialEq)]
pub struct Light {
    pub id: u32,
    pub kind: LightKind,
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
}

impl_handled!(Light, Light);

impl Light {
    fn with_kind(kind: LightKind) -> Self {
        Self {
            id: 0,
            kind,
            ambient: Vec3::splat(0.05),
            diffuse: Vec3::splat(0.8),
            specular: Vec3::ONE,
        }
    }

    #[must_use]
    pub fn new_directional(direction: Vec3) -> Self {
        Self::with_kind(LightKind::Directional(DirectionalLight {
            direction: direction.normalize_or_zero(),
        }))
    }

    #[must_use]
    pub fn new_point(position: Vec3) -> Self {
        Self::with_kind(LightKind::Point(PointLight {
            position,
            attenuation: Attenuation::default(),
        }))
    }

    #[must_use]
    pub fn new_spot(position: Vec3, direction: Vec3, cut_off: f32, outer_cut_off: f32) -> Self {
        Self::with_kind(LightKind::Spot(SpotLight {
            position,
            direction: direction.normalize_or_zero(),
            cut_off,
            outer_cut_off,
            attenuation: Attenuation::default(),
        }))
    }

    #[must_use]
    pub fn with_colors(mut self, ambient: Vec3, diffuse: Vec3, specular: Vec3) -> Self {
        self.ambient = ambient;
        self.diffuse = diffuse;
        self.specular = specular;
        self
    }

    /// World position, `None` for directional lights.
    #[must_use]
    pub fn position(&self) -> Option<Vec3> {
        match &self.kind {
            LightKind::Directional(_) => None,
            LightKind::Point(point) => Some(point.position),
            LightKind::Spot(spot) => Some(spot.position),
        }
    }

    pub fn set_position(&mut self, position: Vec3) {
        match &mut self.kind {
            LightKind::Directional(_) => {}
            LightKind::Point(point) => point.position = position,
            LightKind::Spot(spot) => spot.position = position,
        }
    }
}

use crate::pool::impl_handled;
use crate::render::backend::TextureHandle;

/// Role of a texture in the lighting model. Also names its sampler uniform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureKind {
    Diffuse,
    Specular,
    Normal,
    Height,
}

impl TextureKind {
    #[must_use]
    pub fn uniform_prefix(self) -> &'static str {
        match self {
            Self::Diffuse => "texture_diffuse",
            Self::Specular => "texture_specular",
            Self::Normal => "texture_normal",
            Self::Height => "texture_height",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Texture {
    pub id: u32,
    pub path: String,
    pub kind: TextureKind,
    pub gpu: TextureHandle,
}

impl_handled!(Texture, Texture);

impl Texture {
    #[must_use]
    pub fn new(path: impl Into<String>, kind: TextureKind, gpu: TextureHandle) -> Self {
        Self {
            id: 0,
            path: path.into(),
            kind,
            gpu,
        }
    }
}

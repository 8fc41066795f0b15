use crate::pool::impl_handled;
use crate::render::backend::ProgramHandle;

/// A linked shader program. Source text stays with the render backend; the
/// engine only remembers where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Shader {
    pub id: u32,
    pub name: String,
    pub vertex_path: String,
    pub fragment_path: String,
    pub program: ProgramHandle,
}

impl_handled!(Shader, Shader);

impl Shader {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        vertex_path: impl Into<String>,
        fragment_path: impl Into<String>,
        program: ProgramHandle,
    ) -> Self {
        Self {
            id: 0,
            name: name.into(),
            vertex_path: vertex_path.into(),
            fragment_path: fragment_path.into(),
            program,
        }
    }
}

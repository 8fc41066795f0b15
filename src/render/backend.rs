//! Render Backend Boundary
//!
//! The engine core never talks to a graphics API directly. Shader compilation,
//! buffer uploads, texture decoding and draw calls go through
//! [`RenderBackend`], implemented by the host (an OpenGL context, a test
//! double, ...).
//!
//! [`HeadlessBackend`] records every call instead of drawing. It backs the
//! demo app and the renderer tests.

use std::sync::Arc;

use glam::{Mat4, Vec3};
use parking_lot::Mutex;
use rustc_hash::FxHashSet;

use crate::errors::{EngineError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProgramHandle(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u32);

/// Vertex array + vertex buffer + element buffer of one uploaded mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshBuffers {
    pub vertex_array: u32,
    pub vertex_buffer: u32,
    pub index_buffer: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    Bool(bool),
    Int(i32),
    Float(f32),
    Vec3(Vec3),
    Mat4(Mat4),
}

/// Graphics services consumed by the scene managers and the [`Renderer`](super::Renderer).
pub trait RenderBackend: Send {
    /// Compiles and links the program made of the two shader sources.
    fn compile_program(&mut self, name: &str, vertex_path: &str, fragment_path: &str)
    -> Result<ProgramHandle>;
    fn delete_program(&mut self, program: ProgramHandle);
    fn use_program(&mut self, program: ProgramHandle);
    fn set_uniform(&mut self, program: ProgramHandle, name: &str, value: UniformValue);

    /// Uploads interleaved vertex bytes and 32-bit indices.
    fn upload_mesh(&mut self, vertices: &[u8], indices: &[u32]) -> Result<MeshBuffers>;
    fn delete_mesh(&mut self, buffers: MeshBuffers);

    /// Decodes the image at `path` and uploads it.
    fn upload_texture(&mut self, path: &str) -> Result<TextureHandle>;
    fn delete_texture(&mut self, texture: TextureHandle);
    fn bind_texture(&mut self, unit: u32, texture: TextureHandle);

    fn clear(&mut self, color: Vec3);
    fn draw_indexed(&mut self, buffers: MeshBuffers, index_count: u32);
}

/// One recorded [`RenderBackend`] call.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendCall {
    CompileProgram { name: String, program: ProgramHandle },
    DeleteProgram(ProgramHandle),
    UseProgram(ProgramHandle),
    SetUniform { program: ProgramHandle, name: String, value: UniformValue },
    UploadMesh { buffers: MeshBuffers, vertex_bytes: usize, index_count: usize },
    DeleteMesh(MeshBuffers),
    UploadTexture { path: String, texture: TextureHandle },
    DeleteTexture(TextureHandle),
    BindTexture { unit: u32, texture: TextureHandle },
    Clear(Vec3),
    DrawIndexed { buffers: MeshBuffers, index_count: u32 },
}

/// Shared view of the calls a [`HeadlessBackend`] received.
#[derive(Debug, Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<BackendCall>>>);

impl CallLog {
    #[must_use]
    pub fn snapshot(&self) -> Vec<BackendCall> {
        self.0.lock().clone()
    }

    pub fn clear(&self) {
        self.0.lock().clear();
    }

    #[must_use]
    pub fn draw_count(&self) -> usize {
        self.0
            .lock()
            .iter()
            .filter(|call| matches!(call, BackendCall::DrawIndexed { .. }))
            .count()
    }

    fn push(&self, call: BackendCall) {
        self.0.lock().push(call);
    }
}

/// Backend that allocates sequential handles and records calls without drawing.
#[derive(Debug, Default)]
pub struct HeadlessBackend {
    log: CallLog,
    next_handle: u32,
    missing_paths: FxHashSet<String>,
    mesh_budget: Option<usize>,
    meshes_uploaded: usize,
}

impl HeadlessBackend {
    /// Returns the backend together with a handle on its call log.
    #[must_use]
    pub fn new() -> (Self, CallLog) {
        let backend = Self::default();
        let log = backend.log.clone();
        (backend, log)
    }

    /// Makes texture uploads and program compiles referencing `path` fail.
    #[must_use]
    pub fn with_missing_path(mut self, path: impl Into<String>) -> Self {
        self.missing_paths.insert(path.into());
        self
    }

    /// Makes every mesh upload after the first `budget` fail.
    #[must_use]
    pub fn with_mesh_budget(mut self, budget: usize) -> Self {
        self.mesh_budget = Some(budget);
        self
    }

    fn allocate(&mut self) -> u32 {
        self.next_handle += 1;
        self.next_handle
    }
}

impl RenderBackend for HeadlessBackend {
    fn compile_program(
        &mut self,
        name: &str,
        vertex_path: &str,
        fragment_path: &str,
    ) -> Result<ProgramHandle> {
        for path in [vertex_path, fragment_path] {
            if self.missing_paths.contains(path) {
                return Err(EngineError::Backend(format!("shader source not found: {path}")));
            }
        }

        let program = ProgramHandle(self.allocate());
        self.log.push(BackendCall::CompileProgram {
            name: name.to_string(),
            program,
        });
        Ok(program)
    }

    fn delete_program(&mut self, program: ProgramHandle) {
        self.log.push(BackendCall::DeleteProgram(program));
    }

    fn use_program(&mut self, program: ProgramHandle) {
        self.log.push(BackendCall::UseProgram(program));
    }

    fn set_uniform(&mut self, program: ProgramHandle, name: &str, value: UniformValue) {
        self.log.push(BackendCall::SetUniform {
            program,
            name: name.to_string(),
            value,
        });
    }

    fn upload_mesh(&mut self, vertices: &[u8], indices: &[u32]) -> Result<MeshBuffers> {
        if self.mesh_budget.is_some_and(|budget| self.meshes_uploaded >= budget) {
            return Err(EngineError::Backend("out of buffer memory".to_string()));
        }
        self.meshes_uploaded += 1;

        let buffers = MeshBuffers {
            vertex_array: self.allocate(),
            vertex_buffer: self.allocate(),
            index_buffer: self.allocate(),
        };
        self.log.push(BackendCall::UploadMesh {
            buffers,
            vertex_bytes: vertices.len(),
            index_count: indices.len(),
        });
        Ok(buffers)
    }

    fn delete_mesh(&mut self, buffers: MeshBuffers) {
        self.log.push(BackendCall::DeleteMesh(buffers));
    }

    fn upload_texture(&mut self, path: &str) -> Result<TextureHandle> {
        if self.missing_paths.contains(path) {
            return Err(EngineError::Backend(format!("texture failed to load at path: {path}")));
        }

        let texture = TextureHandle(self.allocate());
        self.log.push(BackendCall::UploadTexture {
            path: path.to_string(),
            texture,
        });
        Ok(texture)
    }

    fn delete_texture(&mut self, texture: TextureHandle) {
        self.log.push(BackendCall::DeleteTexture(texture));
    }

    fn bind_texture(&mut self, unit: u32, texture: TextureHandle) {
        self.log.push(BackendCall::BindTexture { unit, texture });
    }

    fn clear(&mut self, color: Vec3) {
        self.log.push(BackendCall::Clear(color));
    }

    fn draw_indexed(&mut self, buffers: MeshBuffers, index_count: u32) {
        self.log.push(BackendCall::DrawIndexed {
            buffers,
            index_count,
        });
    }
}

//! The GPU driver contract.
//!
//! Everything the harness needs from the GPU is expressed as explicit calls
//! over opaque integer handles: shader-object creation and compilation,
//! program linking, buffer upload, vertex-layout declaration, uniform
//! lookup/upload, and draw submission. Nothing in this interface relies on
//! ambient "currently bound" state; every call names its target.

use glam::Mat4;
use thiserror::Error;

/// Driver error type.
///
/// Creation calls are the only fallible driver operations; everything else
/// reports through status flags and diagnostic logs, mirroring how the GL
/// API itself behaves.
#[derive(Error, Debug)]
pub enum DriverError {
    #[error("failed to create {kind}: {message}")]
    CreationFailed { kind: &'static str, message: String },
}

pub type DriverResult<T> = Result<T, DriverError>;

/// One shader unit in a pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl std::fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShaderStage::Vertex => write!(f, "vertex"),
            ShaderStage::Fragment => write!(f, "fragment"),
        }
    }
}

/// Handle to a single-stage shader object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShaderHandle(pub(crate) u64);

/// Handle to a (possibly linked) program object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProgramHandle(pub(crate) u64);

/// Handle to a GPU buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferHandle(pub(crate) u64);

/// Handle to a vertex-array/layout object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexArrayHandle(pub(crate) u64);

/// Resolved location of a named uniform within a linked program
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UniformLocation(pub(crate) u64);

/// One vertex attribute binding: shader input slot, component count, and
/// byte offset within the interleaved vertex. The stride is shared by all
/// attributes of a layout and lives on the caller's layout description.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeBinding {
    pub location: u32,
    pub components: u32,
    pub offset: u32,
}

/// The GPU driver collaborator.
///
/// Implementations: [`crate::driver::GlowBackend`] over a real GL context,
/// [`crate::driver::HeadlessBackend`] in memory for tests.
pub trait GpuDriver {
    // Shader objects

    fn create_shader(&mut self, stage: ShaderStage) -> DriverResult<ShaderHandle>;
    fn shader_source(&mut self, shader: ShaderHandle, source: &str);
    fn compile_shader(&mut self, shader: ShaderHandle);
    fn compile_succeeded(&self, shader: ShaderHandle) -> bool;
    /// Full diagnostic log for a shader object, bounded and UTF-8 safe.
    fn shader_log(&self, shader: ShaderHandle) -> String;
    fn delete_shader(&mut self, shader: ShaderHandle);

    // Programs

    fn create_program(&mut self) -> DriverResult<ProgramHandle>;
    fn attach_shader(&mut self, program: ProgramHandle, shader: ShaderHandle);
    fn detach_shader(&mut self, program: ProgramHandle, shader: ShaderHandle);
    fn link_program(&mut self, program: ProgramHandle);
    fn link_succeeded(&self, program: ProgramHandle) -> bool;
    /// Full diagnostic log for a program object.
    fn program_log(&self, program: ProgramHandle) -> String;
    fn delete_program(&mut self, program: ProgramHandle);

    // Uniforms

    /// Resolve a named uniform. `None` means the name does not exist in the
    /// linked program (the GL "-1" case); callers must tolerate it.
    fn uniform_location(
        &mut self,
        program: ProgramHandle,
        name: &str,
    ) -> Option<UniformLocation>;
    fn set_uniform_mat4(
        &mut self,
        program: ProgramHandle,
        location: UniformLocation,
        value: &Mat4,
    );

    // Buffers and vertex layout

    /// Upload an immutable vertex buffer. There is no update path.
    fn create_vertex_buffer(&mut self, data: &[u8]) -> DriverResult<BufferHandle>;
    /// Upload an immutable index buffer (32-bit indices).
    fn create_index_buffer(&mut self, data: &[u8]) -> DriverResult<BufferHandle>;
    fn delete_buffer(&mut self, buffer: BufferHandle);

    /// Create a vertex-array object binding the given buffers and attribute
    /// layout. `stride` is the byte distance between consecutive vertices.
    fn create_vertex_array(
        &mut self,
        vertex_buffer: BufferHandle,
        index_buffer: Option<BufferHandle>,
        stride: u32,
        attributes: &[AttributeBinding],
    ) -> DriverResult<VertexArrayHandle>;
    fn delete_vertex_array(&mut self, vertex_array: VertexArrayHandle);

    // Frame operations

    fn set_viewport(&mut self, width: u32, height: u32);
    fn set_clear_color(&mut self, color: [f32; 4]);
    /// Clear the color buffer, and the depth buffer when `depth` is set.
    fn clear(&mut self, depth: bool);
    fn enable_depth_test(&mut self);

    // Draw submission

    /// Indexed draw over `count` indices starting `byte_offset` bytes into
    /// the vertex array's index buffer.
    fn draw_indexed(
        &mut self,
        program: ProgramHandle,
        vertex_array: VertexArrayHandle,
        count: u32,
        byte_offset: u32,
    );
    /// Non-indexed draw over `count` vertices starting at `first`.
    fn draw_arrays(
        &mut self,
        program: ProgramHandle,
        vertex_array: VertexArrayHandle,
        first: u32,
        count: u32,
    );
}

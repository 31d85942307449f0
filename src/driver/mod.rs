//! GPU driver abstraction and its implementations.
//!
//! The core components only ever talk to [`GpuDriver`], so the same
//! compile/link and frame code runs against the real GL context and
//! against the in-memory backend used in tests.

pub mod glow_backend;
pub mod headless;
pub mod traits;

pub use glow_backend::GlowBackend;
pub use headless::{BufferKind, BufferUpload, HeadlessBackend, RecordedDraw, UniformWrite};
pub use traits::{
    AttributeBinding, BufferHandle, DriverError, DriverResult, GpuDriver, ProgramHandle,
    ShaderHandle, ShaderStage, UniformLocation, VertexArrayHandle,
};

//! A minimal real-time rendering harness.
//!
//! The crate opens a window with an attached OpenGL context, compiles and
//! links shader programs, uploads vertex/index geometry once, and runs a
//! frame loop that recomputes per-object transforms and issues draw calls.
//!
//! The two load-bearing pieces are:
//! - [`shader::ProgramBuilder`]: the fallible compile/link lifecycle with
//!   full diagnostic extraction and no resource leaks on failure paths
//! - [`pipeline::FramePipeline`]: per-frame model/view/projection
//!   composition, animated per-instance transforms, and draw submission
//!
//! Both are written against the [`driver::GpuDriver`] trait, so they run
//! unchanged on the real GL backend ([`driver::GlowBackend`]) and on the
//! in-memory [`driver::HeadlessBackend`] used by the test suite.

pub mod driver;
pub mod geometry;
pub mod harness;
pub mod mesh;
pub mod pipeline;
pub mod scene;
pub mod shader;
pub mod window;

pub use driver::{GlowBackend, GpuDriver, HeadlessBackend, ShaderStage};
pub use geometry::{Draw, GeometryBuffer};
pub use harness::{Harness, HarnessError};
pub use mesh::MeshData;
pub use pipeline::{FramePipeline, TransformLocations};
pub use scene::{InstanceSet, Scene, SpinAnimation};
pub use shader::{Program, ProgramBuilder, ProgramError, ShaderSource};
pub use window::{GlWindow, WindowError, WindowSystem};

use winit::keyboard::KeyCode;

/// Configuration for the harness.
///
/// All the constants the frame loop depends on live here instead of being
/// scattered through the rendering code. Scene content (meshes, shader
/// sources, instance positions) is supplied separately via [`Scene`].
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    /// Window title
    pub title: String,
    /// Window width in pixels
    pub width: u32,
    /// Window height in pixels
    pub height: u32,
    /// RGBA clear color applied at the start of every frame
    pub clear_color: [f32; 4],
    /// Vertical field of view in degrees
    pub fov_y_degrees: f32,
    /// Near clip plane distance
    pub near: f32,
    /// Far clip plane distance
    pub far: f32,
    /// How far the stand-in camera pulls the scene backward along -Z
    pub camera_distance: f32,
    /// Per-instance rotation offset in degrees
    pub base_angle_step_deg: f32,
    /// Rotation speed in degrees per second
    pub angular_speed_deg: f32,
    /// Key that requests a cooperative loop exit
    pub exit_key: KeyCode,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            title: "render-harness".to_string(),
            width: 800,
            height: 640,
            clear_color: [0.0, 1.0, 0.0, 1.0],
            fov_y_degrees: 45.0,
            near: 0.1,
            far: 100.0,
            camera_distance: 3.0,
            base_angle_step_deg: 20.0,
            angular_speed_deg: 50.0,
            exit_key: KeyCode::Escape,
        }
    }
}

impl HarnessConfig {
    /// Aspect ratio derived from the configured window size.
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

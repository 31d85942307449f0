//! Scene content: what gets drawn, where, and how it moves.

pub mod camera;
pub mod transform;

pub use camera::Camera;
pub use transform::SpinAnimation;

use glam::Vec3;

use crate::geometry::Draw;
use crate::mesh::MeshData;
use crate::shader::ShaderSource;

/// Ordered per-instance base positions, fixed at startup and read-only
/// during the frame loop. One draw pass happens per entry.
#[derive(Debug, Clone)]
pub struct InstanceSet {
    positions: Vec<Vec3>,
}

impl InstanceSet {
    pub fn new(positions: Vec<Vec3>) -> Self {
        Self { positions }
    }

    /// A single implicit instance with zero translation.
    pub fn single() -> Self {
        Self {
            positions: vec![Vec3::ZERO],
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }
}

/// Everything the harness needs to render one scene: shader sources, a
/// mesh with its draw list, instance placement, and the animation driving
/// per-instance rotation.
pub struct Scene {
    pub vertex_shader: ShaderSource,
    pub fragment_shader: ShaderSource,
    pub mesh: MeshData,
    pub draws: Vec<Draw>,
    pub instances: InstanceSet,
    pub animation: SpinAnimation,
    pub depth_test: bool,
}

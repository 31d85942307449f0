//! The per-frame transform pipeline.
//!
//! Composes the model/view/projection chain, uploads uniforms, and issues
//! the frame's draw calls. View and projection are uploaded once per frame
//! since they are instance-invariant; the model matrix is recomputed and
//! uploaded per instance.

use crate::driver::{GpuDriver, UniformLocation};
use crate::geometry::{Draw, GeometryBuffer};
use crate::scene::{Camera, InstanceSet, SpinAnimation};
use crate::shader::Program;

/// Cached locations of the three transform uniforms.
///
/// Resolved once after linking and reused every frame; re-resolving per
/// frame is wasted work. A `None` entry means the program does not declare
/// that uniform; the corresponding upload is skipped.
#[derive(Debug, Clone, Copy)]
pub struct TransformLocations {
    pub model: Option<UniformLocation>,
    pub view: Option<UniformLocation>,
    pub projection: Option<UniformLocation>,
}

impl TransformLocations {
    pub fn resolve<D: GpuDriver>(driver: &mut D, program: &Program) -> Self {
        let mut lookup = |name: &str| {
            let location = driver.uniform_location(program.handle(), name);
            if location.is_none() {
                log::warn!("uniform '{name}' not found in program; uploads will be skipped");
            }
            location
        };
        Self {
            model: lookup("model"),
            view: lookup("view"),
            projection: lookup("projection"),
        }
    }
}

/// Owns the frame-invariant state of the draw loop: camera parameters,
/// clear color, instance placement and the spin animation.
pub struct FramePipeline {
    camera: Camera,
    clear_color: [f32; 4],
    depth_test: bool,
    instances: InstanceSet,
    animation: SpinAnimation,
}

impl FramePipeline {
    pub fn new(
        camera: Camera,
        clear_color: [f32; 4],
        depth_test: bool,
        instances: InstanceSet,
        animation: SpinAnimation,
    ) -> Self {
        Self {
            camera,
            clear_color,
            depth_test,
            instances,
            animation,
        }
    }

    pub fn instances(&self) -> &InstanceSet {
        &self.instances
    }

    /// Render one frame: clear, upload view/projection, then per instance
    /// upload the model matrix and submit the geometry's draw list.
    ///
    /// Presentation (buffer swap) and event polling are the caller's
    /// responsibility.
    pub fn render_frame<D: GpuDriver>(
        &self,
        driver: &mut D,
        program: &Program,
        geometry: &GeometryBuffer,
        locations: &TransformLocations,
        elapsed_secs: f32,
    ) {
        driver.set_clear_color(self.clear_color);
        driver.clear(self.depth_test);

        let view = self.camera.view_matrix();
        let projection = self.camera.projection_matrix();
        if let Some(location) = locations.view {
            driver.set_uniform_mat4(program.handle(), location, &view);
        }
        if let Some(location) = locations.projection {
            driver.set_uniform_mat4(program.handle(), location, &projection);
        }

        for (index, &position) in self.instances.positions().iter().enumerate() {
            let model = self
                .animation
                .model_matrix(position, index as u32, elapsed_secs);
            if let Some(location) = locations.model {
                driver.set_uniform_mat4(program.handle(), location, &model);
            }

            for &draw in geometry.draws() {
                match draw {
                    Draw::Indexed { count, byte_offset } => driver.draw_indexed(
                        program.handle(),
                        geometry.vertex_array(),
                        count,
                        byte_offset,
                    ),
                    Draw::Arrays { first, count } => driver.draw_arrays(
                        program.handle(),
                        geometry.vertex_array(),
                        first,
                        count,
                    ),
                }
            }
        }
    }
}

//! Startup, the frame loop, and shutdown.

use thiserror::Error;

use crate::driver::{DriverError, GpuDriver};
use crate::geometry::GeometryBuffer;
use crate::pipeline::{FramePipeline, TransformLocations};
use crate::scene::{Camera, Scene};
use crate::shader::{Program, ProgramBuilder, ProgramError};
use crate::window::{WindowError, WindowSystem};
use crate::HarnessConfig;

#[derive(Error, Debug)]
pub enum HarnessError {
    #[error(transparent)]
    Window(#[from] WindowError),
    #[error(transparent)]
    Driver(#[from] DriverError),
    #[error(transparent)]
    Program(#[from] ProgramError),
}

/// Wires the windowing and GPU collaborators to the core components and
/// drives the iterate-until-close loop.
///
/// Owns both collaborators for the whole program lifetime, so the GPU
/// context is created and driven from a single thread; no operation here
/// suspends or hands work to another thread.
pub struct Harness<W: WindowSystem, D: GpuDriver> {
    window: W,
    driver: D,
    config: HarnessConfig,
}

impl<W: WindowSystem, D: GpuDriver> Harness<W, D> {
    pub fn new(window: W, driver: D, config: HarnessConfig) -> Self {
        Self {
            window,
            driver,
            config,
        }
    }

    pub fn window(&self) -> &W {
        &self.window
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Build the scene's program, upload its geometry, run the frame loop
    /// until close is requested, then release every GPU resource.
    ///
    /// Compile and link failures are fatal here: there is no fallback
    /// program, so the error propagates with its full diagnostic attached.
    pub fn run(&mut self, scene: Scene) -> Result<(), HarnessError> {
        let program =
            ProgramBuilder::build(&mut self.driver, &scene.vertex_shader, &scene.fragment_shader)?;
        let geometry = GeometryBuffer::upload(&mut self.driver, &scene.mesh, scene.draws)?;
        let locations = TransformLocations::resolve(&mut self.driver, &program);

        let (width, height) = self.window.size();
        self.driver.set_viewport(width, height);
        if scene.depth_test {
            self.driver.enable_depth_test();
        }

        let pipeline = FramePipeline::new(
            Camera::from_config(&self.config),
            self.config.clear_color,
            scene.depth_test,
            scene.instances,
            scene.animation,
        );

        log::info!(
            "entering frame loop: {} instance(s), {} draw(s) per instance",
            pipeline.instances().len(),
            geometry.draws().len()
        );
        let result = self.frame_loop(&pipeline, &program, &geometry, &locations);

        log::info!("frame loop ended; releasing GPU resources");
        geometry.destroy(&mut self.driver);
        program.delete(&mut self.driver);

        result
    }

    /// One plain iterate-until-close loop. The exit key requests a
    /// cooperative close: the current frame still completes (draws, swap
    /// and poll) and the loop stops on the next check.
    fn frame_loop(
        &mut self,
        pipeline: &FramePipeline,
        program: &Program,
        geometry: &GeometryBuffer,
        locations: &TransformLocations,
    ) -> Result<(), HarnessError> {
        while !self.window.should_close() {
            if self.window.key_pressed(self.config.exit_key) {
                self.window.set_should_close(true);
            }

            let elapsed = self.window.time();
            pipeline.render_frame(&mut self.driver, program, geometry, locations, elapsed);

            self.window.swap_buffers()?;
            self.window.poll_events();
        }
        Ok(())
    }
}

//! Shader program lifecycle.
//!
//! Sources go in, a linked [`Program`] comes out. Compilation and linking
//! are the failure-prone steps of startup, so every error carries the
//! driver's full diagnostic log, and no driver object survives a failed
//! path: stage objects are deleted on compile failure, and both stage
//! objects and the half-built program are cleaned up on link failure.

use thiserror::Error;

use crate::driver::{DriverError, GpuDriver, ProgramHandle, ShaderHandle, ShaderStage};

/// Immutable source text for one shader stage.
///
/// The text itself carries its version/profile pragma; whether it is valid
/// for the driver's shading language is a contract between the text and
/// the driver, not something checked here.
#[derive(Debug, Clone)]
pub struct ShaderSource {
    pub stage: ShaderStage,
    pub text: String,
}

impl ShaderSource {
    pub fn vertex(text: impl Into<String>) -> Self {
        Self {
            stage: ShaderStage::Vertex,
            text: text.into(),
        }
    }

    pub fn fragment(text: impl Into<String>) -> Self {
        Self {
            stage: ShaderStage::Fragment,
            text: text.into(),
        }
    }
}

/// Program build error, carrying the entire diagnostic log text.
#[derive(Error, Debug)]
pub enum ProgramError {
    #[error("{stage} shader failed to compile:\n{log}")]
    Compile { stage: ShaderStage, log: String },
    #[error("shader program failed to link:\n{log}")]
    Link { log: String },
    #[error(transparent)]
    Driver(#[from] DriverError),
}

/// A compiled single-stage shader object.
///
/// Single-use scaffolding for [`ProgramBuilder::link`]: it never outlives
/// program creation. Deleted exactly once, via [`StageObject::delete`];
/// dropping a live one only logs, since deletion needs the driver.
#[derive(Debug)]
pub struct StageObject {
    handle: ShaderHandle,
    stage: ShaderStage,
    live: bool,
}

impl StageObject {
    pub fn handle(&self) -> ShaderHandle {
        self.handle
    }

    pub fn stage(&self) -> ShaderStage {
        self.stage
    }

    /// Release the underlying shader object.
    pub fn delete<D: GpuDriver>(mut self, driver: &mut D) {
        driver.delete_shader(self.handle);
        self.live = false;
    }
}

impl Drop for StageObject {
    fn drop(&mut self) {
        if self.live {
            log::warn!("{} stage object dropped without delete; shader object leaks", self.stage);
        }
    }
}

/// A linked, usable GPU program.
///
/// Either fully valid or never constructed: link failures surface as
/// [`ProgramError::Link`] before any `Program` exists. Owned by the caller
/// for its whole lifetime and released via [`Program::delete`].
#[derive(Debug)]
pub struct Program {
    handle: ProgramHandle,
    live: bool,
}

impl Program {
    pub fn handle(&self) -> ProgramHandle {
        self.handle
    }

    /// Release the underlying program object.
    pub fn delete<D: GpuDriver>(mut self, driver: &mut D) {
        driver.delete_program(self.handle);
        self.live = false;
    }
}

impl Drop for Program {
    fn drop(&mut self) {
        if self.live {
            log::warn!("program dropped without delete; GPU program leaks");
        }
    }
}

/// Compiles shader stages and links them into programs.
pub struct ProgramBuilder;

impl ProgramBuilder {
    /// Compile a single stage.
    ///
    /// On failure the shader object is deleted here before the error is
    /// returned; the caller never has to clean up after a failed compile.
    pub fn compile_stage<D: GpuDriver>(
        driver: &mut D,
        source: &ShaderSource,
    ) -> Result<StageObject, ProgramError> {
        let handle = driver.create_shader(source.stage)?;
        driver.shader_source(handle, &source.text);
        driver.compile_shader(handle);

        if !driver.compile_succeeded(handle) {
            let log = driver.shader_log(handle);
            driver.delete_shader(handle);
            return Err(ProgramError::Compile {
                stage: source.stage,
                log,
            });
        }

        log::debug!("compiled {} shader", source.stage);
        Ok(StageObject {
            handle,
            stage: source.stage,
            live: true,
        })
    }

    /// Link one vertex and one fragment stage into a program.
    ///
    /// Both stage objects are detached and deleted whatever the outcome;
    /// on failure the half-built program object is deleted too, so no
    /// invalid handle ever escapes.
    pub fn link<D: GpuDriver>(
        driver: &mut D,
        vertex: StageObject,
        fragment: StageObject,
    ) -> Result<Program, ProgramError> {
        let program = match driver.create_program() {
            Ok(program) => program,
            Err(err) => {
                vertex.delete(driver);
                fragment.delete(driver);
                return Err(err.into());
            }
        };

        driver.attach_shader(program, vertex.handle());
        driver.attach_shader(program, fragment.handle());
        driver.link_program(program);

        driver.detach_shader(program, vertex.handle());
        driver.detach_shader(program, fragment.handle());
        vertex.delete(driver);
        fragment.delete(driver);

        if !driver.link_succeeded(program) {
            let log = driver.program_log(program);
            driver.delete_program(program);
            return Err(ProgramError::Link { log });
        }

        log::info!("linked shader program");
        Ok(Program {
            handle: program,
            live: true,
        })
    }

    /// Compile both stages and link them.
    ///
    /// The vertex stage compiles first; if it fails, the fragment source is
    /// never submitted. Linking is only ever attempted with two
    /// successfully compiled stages.
    pub fn build<D: GpuDriver>(
        driver: &mut D,
        vertex_source: &ShaderSource,
        fragment_source: &ShaderSource,
    ) -> Result<Program, ProgramError> {
        let vertex = Self::compile_stage(driver, vertex_source)?;
        let fragment = match Self::compile_stage(driver, fragment_source) {
            Ok(stage) => stage,
            Err(err) => {
                vertex.delete(driver);
                return Err(err);
            }
        };
        Self::link(driver, vertex, fragment)
    }
}

//! In-memory GPU driver.
//!
//! Models the driver-side lifecycle rules the real GL implementation
//! enforces (compile status and logs, link-time varying matching, uniform
//! name resolution) and records uploads, uniform writes and draw calls so
//! tests can assert on what a frame actually submitted.
//!
//! Failure model: a shader source compiles unless it is empty or contains
//! a `#error` directive; a program links when every fragment-stage `in`
//! varying has a matching vertex-stage `out`.

use std::collections::HashMap;

use glam::Mat4;

use crate::driver::traits::*;
use crate::geometry::Draw;

struct ShaderState {
    stage: ShaderStage,
    source: String,
    compiled: bool,
    compile_ok: bool,
}

struct ProgramState {
    attached: Vec<ShaderHandle>,
    linked: bool,
    link_ok: bool,
    log: String,
    uniforms: Vec<String>,
}

/// What kind of buffer an upload created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferKind {
    Vertex,
    Index,
}

/// One recorded buffer upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferUpload {
    pub buffer: BufferHandle,
    pub kind: BufferKind,
    pub byte_len: usize,
}

struct VertexArrayState {
    #[allow(dead_code)]
    vertex_buffer: BufferHandle,
    #[allow(dead_code)]
    index_buffer: Option<BufferHandle>,
    stride: u32,
    attributes: Vec<AttributeBinding>,
}

/// One recorded draw call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordedDraw {
    pub program: ProgramHandle,
    pub vertex_array: VertexArrayHandle,
    pub draw: Draw,
}

/// One recorded uniform upload.
#[derive(Debug, Clone)]
pub struct UniformWrite {
    pub program: ProgramHandle,
    pub name: String,
    pub value: Mat4,
}

/// In-memory [`GpuDriver`] with resource-count and submission accounting.
#[derive(Default)]
pub struct HeadlessBackend {
    shaders: HashMap<u64, ShaderState>,
    programs: HashMap<u64, ProgramState>,
    buffers: HashMap<u64, BufferKind>,
    vertex_arrays: HashMap<u64, VertexArrayState>,
    uniform_names: HashMap<u64, (ProgramHandle, String)>,
    resolved_locations: HashMap<(u64, String), UniformLocation>,

    next_id: u64,
    shaders_created_total: u64,

    uploads: Vec<BufferUpload>,
    uniform_writes: Vec<UniformWrite>,
    draw_calls: Vec<RecordedDraw>,
    viewport: Option<(u32, u32)>,
    clear_color: [f32; 4],
    depth_test: bool,
}

impl HeadlessBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    // Introspection for tests

    pub fn live_shaders(&self) -> usize {
        self.shaders.len()
    }

    pub fn live_programs(&self) -> usize {
        self.programs.len()
    }

    pub fn live_buffers(&self) -> usize {
        self.buffers.len()
    }

    pub fn live_vertex_arrays(&self) -> usize {
        self.vertex_arrays.len()
    }

    /// Total shader objects ever created, deleted or not.
    pub fn shaders_created_total(&self) -> u64 {
        self.shaders_created_total
    }

    pub fn uploads(&self) -> &[BufferUpload] {
        &self.uploads
    }

    pub fn uniform_writes(&self) -> &[UniformWrite] {
        &self.uniform_writes
    }

    pub fn draw_calls(&self) -> &[RecordedDraw] {
        &self.draw_calls
    }

    pub fn viewport(&self) -> Option<(u32, u32)> {
        self.viewport
    }

    pub fn clear_color(&self) -> [f32; 4] {
        self.clear_color
    }

    pub fn depth_test_enabled(&self) -> bool {
        self.depth_test
    }

    /// Stride and attribute bindings declared for a vertex array.
    pub fn vertex_array_layout(
        &self,
        vertex_array: VertexArrayHandle,
    ) -> Option<(u32, &[AttributeBinding])> {
        self.vertex_arrays
            .get(&vertex_array.0)
            .map(|state| (state.stride, state.attributes.as_slice()))
    }
}

/// Names declared as `<keyword> <type> <name>;` at the start of a trimmed
/// line. Enough of a GLSL reading to model varying and uniform matching.
fn declared_names(source: &str, keyword: &str) -> Vec<String> {
    source
        .lines()
        .filter_map(|line| {
            let line = line.trim().trim_end_matches(';');
            let mut tokens = line.split_whitespace();
            if tokens.next() != Some(keyword) {
                return None;
            }
            let _type_name = tokens.next()?;
            tokens.next().map(str::to_string)
        })
        .collect()
}

impl GpuDriver for HeadlessBackend {
    fn create_shader(&mut self, stage: ShaderStage) -> DriverResult<ShaderHandle> {
        let id = self.next_id();
        self.shaders_created_total += 1;
        self.shaders.insert(
            id,
            ShaderState {
                stage,
                source: String::new(),
                compiled: false,
                compile_ok: false,
            },
        );
        Ok(ShaderHandle(id))
    }

    fn shader_source(&mut self, shader: ShaderHandle, source: &str) {
        if let Some(state) = self.shaders.get_mut(&shader.0) {
            state.source = source.to_string();
        }
    }

    fn compile_shader(&mut self, shader: ShaderHandle) {
        if let Some(state) = self.shaders.get_mut(&shader.0) {
            state.compiled = true;
            state.compile_ok =
                !state.source.trim().is_empty() && !state.source.contains("#error");
        }
    }

    fn compile_succeeded(&self, shader: ShaderHandle) -> bool {
        self.shaders
            .get(&shader.0)
            .map(|state| state.compiled && state.compile_ok)
            .unwrap_or(false)
    }

    fn shader_log(&self, shader: ShaderHandle) -> String {
        let Some(state) = self.shaders.get(&shader.0) else {
            return String::new();
        };
        if !state.compiled || state.compile_ok {
            return String::new();
        }
        if state.source.trim().is_empty() {
            return format!("ERROR: 0:0: empty {} shader source", state.stage);
        }
        let directive = state
            .source
            .lines()
            .find(|line| line.contains("#error"))
            .unwrap_or("#error")
            .trim();
        format!("ERROR: 0:1: '{directive}' : user defined error")
    }

    fn delete_shader(&mut self, shader: ShaderHandle) {
        self.shaders.remove(&shader.0);
    }

    fn create_program(&mut self) -> DriverResult<ProgramHandle> {
        let id = self.next_id();
        self.programs.insert(
            id,
            ProgramState {
                attached: Vec::new(),
                linked: false,
                link_ok: false,
                log: String::new(),
                uniforms: Vec::new(),
            },
        );
        Ok(ProgramHandle(id))
    }

    fn attach_shader(&mut self, program: ProgramHandle, shader: ShaderHandle) {
        if let Some(state) = self.programs.get_mut(&program.0) {
            state.attached.push(shader);
        }
    }

    fn detach_shader(&mut self, program: ProgramHandle, shader: ShaderHandle) {
        if let Some(state) = self.programs.get_mut(&program.0) {
            state.attached.retain(|&attached| attached != shader);
        }
    }

    fn link_program(&mut self, program: ProgramHandle) {
        let Some(state) = self.programs.get(&program.0) else {
            return;
        };

        let mut vertex_outs = Vec::new();
        let mut fragment_ins = Vec::new();
        let mut uniforms = Vec::new();
        let mut log = String::new();
        let mut link_ok = true;

        for handle in &state.attached {
            let Some(shader) = self.shaders.get(&handle.0) else {
                link_ok = false;
                log = "error: attached shader object no longer exists".to_string();
                continue;
            };
            if !(shader.compiled && shader.compile_ok) {
                link_ok = false;
                log = format!("error: attached {} shader is not compiled", shader.stage);
                continue;
            }
            match shader.stage {
                ShaderStage::Vertex => vertex_outs.extend(declared_names(&shader.source, "out")),
                ShaderStage::Fragment => {
                    fragment_ins.extend(declared_names(&shader.source, "in"))
                }
            }
            uniforms.extend(declared_names(&shader.source, "uniform"));
        }

        if link_ok {
            for name in &fragment_ins {
                if !vertex_outs.contains(name) {
                    link_ok = false;
                    log = format!(
                        "error: input '{name}' of fragment stage has no matching output in previous stage"
                    );
                    break;
                }
            }
        }

        uniforms.sort();
        uniforms.dedup();

        let state = self
            .programs
            .get_mut(&program.0)
            .expect("program checked above");
        state.linked = true;
        state.link_ok = link_ok;
        state.log = log;
        state.uniforms = uniforms;
    }

    fn link_succeeded(&self, program: ProgramHandle) -> bool {
        self.programs
            .get(&program.0)
            .map(|state| state.linked && state.link_ok)
            .unwrap_or(false)
    }

    fn program_log(&self, program: ProgramHandle) -> String {
        self.programs
            .get(&program.0)
            .map(|state| state.log.clone())
            .unwrap_or_default()
    }

    fn delete_program(&mut self, program: ProgramHandle) {
        self.programs.remove(&program.0);
    }

    fn uniform_location(
        &mut self,
        program: ProgramHandle,
        name: &str,
    ) -> Option<UniformLocation> {
        let state = self.programs.get(&program.0)?;
        if !(state.linked && state.link_ok) || !state.uniforms.iter().any(|u| u == name) {
            return None;
        }

        if let Some(&location) = self.resolved_locations.get(&(program.0, name.to_string())) {
            return Some(location);
        }
        let location = UniformLocation(self.next_id());
        self.resolved_locations
            .insert((program.0, name.to_string()), location);
        self.uniform_names
            .insert(location.0, (program, name.to_string()));
        Some(location)
    }

    fn set_uniform_mat4(
        &mut self,
        program: ProgramHandle,
        location: UniformLocation,
        value: &Mat4,
    ) {
        if let Some((_, name)) = self.uniform_names.get(&location.0) {
            self.uniform_writes.push(UniformWrite {
                program,
                name: name.clone(),
                value: *value,
            });
        }
    }

    fn create_vertex_buffer(&mut self, data: &[u8]) -> DriverResult<BufferHandle> {
        let handle = BufferHandle(self.next_id());
        self.buffers.insert(handle.0, BufferKind::Vertex);
        self.uploads.push(BufferUpload {
            buffer: handle,
            kind: BufferKind::Vertex,
            byte_len: data.len(),
        });
        Ok(handle)
    }

    fn create_index_buffer(&mut self, data: &[u8]) -> DriverResult<BufferHandle> {
        let handle = BufferHandle(self.next_id());
        self.buffers.insert(handle.0, BufferKind::Index);
        self.uploads.push(BufferUpload {
            buffer: handle,
            kind: BufferKind::Index,
            byte_len: data.len(),
        });
        Ok(handle)
    }

    fn delete_buffer(&mut self, buffer: BufferHandle) {
        self.buffers.remove(&buffer.0);
    }

    fn create_vertex_array(
        &mut self,
        vertex_buffer: BufferHandle,
        index_buffer: Option<BufferHandle>,
        stride: u32,
        attributes: &[AttributeBinding],
    ) -> DriverResult<VertexArrayHandle> {
        let handle = VertexArrayHandle(self.next_id());
        self.vertex_arrays.insert(
            handle.0,
            VertexArrayState {
                vertex_buffer,
                index_buffer,
                stride,
                attributes: attributes.to_vec(),
            },
        );
        Ok(handle)
    }

    fn delete_vertex_array(&mut self, vertex_array: VertexArrayHandle) {
        self.vertex_arrays.remove(&vertex_array.0);
    }

    fn set_viewport(&mut self, width: u32, height: u32) {
        self.viewport = Some((width, height));
    }

    fn set_clear_color(&mut self, color: [f32; 4]) {
        self.clear_color = color;
    }

    fn clear(&mut self, _depth: bool) {}

    fn enable_depth_test(&mut self) {
        self.depth_test = true;
    }

    fn draw_indexed(
        &mut self,
        program: ProgramHandle,
        vertex_array: VertexArrayHandle,
        count: u32,
        byte_offset: u32,
    ) {
        self.draw_calls.push(RecordedDraw {
            program,
            vertex_array,
            draw: Draw::Indexed { count, byte_offset },
        });
    }

    fn draw_arrays(
        &mut self,
        program: ProgramHandle,
        vertex_array: VertexArrayHandle,
        first: u32,
        count: u32,
    ) {
        self.draw_calls.push(RecordedDraw {
            program,
            vertex_array,
            draw: Draw::Arrays { first, count },
        });
    }
}

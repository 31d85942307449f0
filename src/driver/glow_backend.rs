//! GL driver implementation over `glow`.
//!
//! Opaque integer handles map to native GL objects through per-type tables;
//! all `unsafe` GL calls are confined to this module. Calls that target a
//! handle bind their objects explicitly, so callers never depend on what
//! happened to be bound before.

use std::collections::HashMap;

use glam::Mat4;
use glow::HasContext;

use crate::driver::traits::*;

/// GL backend. Owns the `glow` context and the handle tables.
///
/// The context must only be used from the thread that made it current;
/// `GlowBackend` is deliberately not `Send`.
pub struct GlowBackend {
    gl: glow::Context,

    // Resource storage
    shaders: HashMap<u64, glow::NativeShader>,
    programs: HashMap<u64, glow::NativeProgram>,
    buffers: HashMap<u64, glow::NativeBuffer>,
    vertex_arrays: HashMap<u64, glow::NativeVertexArray>,
    uniform_locations: HashMap<u64, glow::NativeUniformLocation>,

    // Handle counters
    next_shader_id: u64,
    next_program_id: u64,
    next_buffer_id: u64,
    next_vertex_array_id: u64,
    next_uniform_id: u64,
}

impl GlowBackend {
    /// Wrap an already-current GL context.
    pub fn new(gl: glow::Context) -> Self {
        log::info!("GL backend ready");
        Self {
            gl,
            shaders: HashMap::new(),
            programs: HashMap::new(),
            buffers: HashMap::new(),
            vertex_arrays: HashMap::new(),
            uniform_locations: HashMap::new(),
            next_shader_id: 1,
            next_program_id: 1,
            next_buffer_id: 1,
            next_vertex_array_id: 1,
            next_uniform_id: 1,
        }
    }

    fn stage_kind(stage: ShaderStage) -> u32 {
        match stage {
            ShaderStage::Vertex => glow::VERTEX_SHADER,
            ShaderStage::Fragment => glow::FRAGMENT_SHADER,
        }
    }
}

impl GpuDriver for GlowBackend {
    fn create_shader(&mut self, stage: ShaderStage) -> DriverResult<ShaderHandle> {
        let native = unsafe { self.gl.create_shader(Self::stage_kind(stage)) }
            .map_err(|message| DriverError::CreationFailed {
                kind: "shader object",
                message,
            })?;

        let id = self.next_shader_id;
        self.next_shader_id += 1;
        self.shaders.insert(id, native);

        Ok(ShaderHandle(id))
    }

    fn shader_source(&mut self, shader: ShaderHandle, source: &str) {
        if let Some(&native) = self.shaders.get(&shader.0) {
            unsafe { self.gl.shader_source(native, source) };
        }
    }

    fn compile_shader(&mut self, shader: ShaderHandle) {
        if let Some(&native) = self.shaders.get(&shader.0) {
            unsafe { self.gl.compile_shader(native) };
        }
    }

    fn compile_succeeded(&self, shader: ShaderHandle) -> bool {
        match self.shaders.get(&shader.0) {
            Some(&native) => unsafe { self.gl.get_shader_compile_status(native) },
            None => false,
        }
    }

    fn shader_log(&self, shader: ShaderHandle) -> String {
        match self.shaders.get(&shader.0) {
            Some(&native) => unsafe { self.gl.get_shader_info_log(native) },
            None => String::new(),
        }
    }

    fn delete_shader(&mut self, shader: ShaderHandle) {
        if let Some(native) = self.shaders.remove(&shader.0) {
            unsafe { self.gl.delete_shader(native) };
        }
    }

    fn create_program(&mut self) -> DriverResult<ProgramHandle> {
        let native = unsafe { self.gl.create_program() }.map_err(|message| {
            DriverError::CreationFailed {
                kind: "program object",
                message,
            }
        })?;

        let id = self.next_program_id;
        self.next_program_id += 1;
        self.programs.insert(id, native);

        Ok(ProgramHandle(id))
    }

    fn attach_shader(&mut self, program: ProgramHandle, shader: ShaderHandle) {
        if let (Some(&program), Some(&shader)) =
            (self.programs.get(&program.0), self.shaders.get(&shader.0))
        {
            unsafe { self.gl.attach_shader(program, shader) };
        }
    }

    fn detach_shader(&mut self, program: ProgramHandle, shader: ShaderHandle) {
        if let (Some(&program), Some(&shader)) =
            (self.programs.get(&program.0), self.shaders.get(&shader.0))
        {
            unsafe { self.gl.detach_shader(program, shader) };
        }
    }

    fn link_program(&mut self, program: ProgramHandle) {
        if let Some(&native) = self.programs.get(&program.0) {
            unsafe { self.gl.link_program(native) };
        }
    }

    fn link_succeeded(&self, program: ProgramHandle) -> bool {
        match self.programs.get(&program.0) {
            Some(&native) => unsafe { self.gl.get_program_link_status(native) },
            None => false,
        }
    }

    fn program_log(&self, program: ProgramHandle) -> String {
        match self.programs.get(&program.0) {
            Some(&native) => unsafe { self.gl.get_program_info_log(native) },
            None => String::new(),
        }
    }

    fn delete_program(&mut self, program: ProgramHandle) {
        if let Some(native) = self.programs.remove(&program.0) {
            unsafe { self.gl.delete_program(native) };
        }
    }

    fn uniform_location(
        &mut self,
        program: ProgramHandle,
        name: &str,
    ) -> Option<UniformLocation> {
        let &native = self.programs.get(&program.0)?;
        let location = unsafe { self.gl.get_uniform_location(native, name) }?;

        let id = self.next_uniform_id;
        self.next_uniform_id += 1;
        self.uniform_locations.insert(id, location);

        Some(UniformLocation(id))
    }

    fn set_uniform_mat4(
        &mut self,
        program: ProgramHandle,
        location: UniformLocation,
        value: &Mat4,
    ) {
        if let (Some(&native), Some(location)) = (
            self.programs.get(&program.0),
            self.uniform_locations.get(&location.0),
        ) {
            unsafe {
                self.gl.use_program(Some(native));
                self.gl
                    .uniform_matrix_4_f32_slice(Some(location), false, &value.to_cols_array());
            }
        }
    }

    fn create_vertex_buffer(&mut self, data: &[u8]) -> DriverResult<BufferHandle> {
        let native = unsafe { self.gl.create_buffer() }.map_err(|message| {
            DriverError::CreationFailed {
                kind: "vertex buffer",
                message,
            }
        })?;

        unsafe {
            self.gl.bind_buffer(glow::ARRAY_BUFFER, Some(native));
            self.gl
                .buffer_data_u8_slice(glow::ARRAY_BUFFER, data, glow::STATIC_DRAW);
            self.gl.bind_buffer(glow::ARRAY_BUFFER, None);
        }

        let id = self.next_buffer_id;
        self.next_buffer_id += 1;
        self.buffers.insert(id, native);

        Ok(BufferHandle(id))
    }

    fn create_index_buffer(&mut self, data: &[u8]) -> DriverResult<BufferHandle> {
        let native = unsafe { self.gl.create_buffer() }.map_err(|message| {
            DriverError::CreationFailed {
                kind: "index buffer",
                message,
            }
        })?;

        // ELEMENT_ARRAY_BUFFER binding is vertex-array state, so the upload
        // goes through ARRAY_BUFFER to leave no VAO touched.
        unsafe {
            self.gl.bind_buffer(glow::ARRAY_BUFFER, Some(native));
            self.gl
                .buffer_data_u8_slice(glow::ARRAY_BUFFER, data, glow::STATIC_DRAW);
            self.gl.bind_buffer(glow::ARRAY_BUFFER, None);
        }

        let id = self.next_buffer_id;
        self.next_buffer_id += 1;
        self.buffers.insert(id, native);

        Ok(BufferHandle(id))
    }

    fn delete_buffer(&mut self, buffer: BufferHandle) {
        if let Some(native) = self.buffers.remove(&buffer.0) {
            unsafe { self.gl.delete_buffer(native) };
        }
    }

    fn create_vertex_array(
        &mut self,
        vertex_buffer: BufferHandle,
        index_buffer: Option<BufferHandle>,
        stride: u32,
        attributes: &[AttributeBinding],
    ) -> DriverResult<VertexArrayHandle> {
        let &vbo = self
            .buffers
            .get(&vertex_buffer.0)
            .ok_or_else(|| DriverError::CreationFailed {
                kind: "vertex array",
                message: "vertex buffer not found".into(),
            })?;
        let ebo = match index_buffer {
            Some(handle) => Some(*self.buffers.get(&handle.0).ok_or_else(|| {
                DriverError::CreationFailed {
                    kind: "vertex array",
                    message: "index buffer not found".into(),
                }
            })?),
            None => None,
        };

        let native = unsafe { self.gl.create_vertex_array() }.map_err(|message| {
            DriverError::CreationFailed {
                kind: "vertex array",
                message,
            }
        })?;

        unsafe {
            self.gl.bind_vertex_array(Some(native));
            self.gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
            if let Some(ebo) = ebo {
                self.gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(ebo));
            }
            for attribute in attributes {
                self.gl.vertex_attrib_pointer_f32(
                    attribute.location,
                    attribute.components as i32,
                    glow::FLOAT,
                    false,
                    stride as i32,
                    attribute.offset as i32,
                );
                self.gl.enable_vertex_attrib_array(attribute.location);
            }
            self.gl.bind_vertex_array(None);
            self.gl.bind_buffer(glow::ARRAY_BUFFER, None);
        }

        let id = self.next_vertex_array_id;
        self.next_vertex_array_id += 1;
        self.vertex_arrays.insert(id, native);

        Ok(VertexArrayHandle(id))
    }

    fn delete_vertex_array(&mut self, vertex_array: VertexArrayHandle) {
        if let Some(native) = self.vertex_arrays.remove(&vertex_array.0) {
            unsafe { self.gl.delete_vertex_array(native) };
        }
    }

    fn set_viewport(&mut self, width: u32, height: u32) {
        unsafe { self.gl.viewport(0, 0, width as i32, height as i32) };
    }

    fn set_clear_color(&mut self, color: [f32; 4]) {
        unsafe { self.gl.clear_color(color[0], color[1], color[2], color[3]) };
    }

    fn clear(&mut self, depth: bool) {
        let mut mask = glow::COLOR_BUFFER_BIT;
        if depth {
            mask |= glow::DEPTH_BUFFER_BIT;
        }
        unsafe { self.gl.clear(mask) };
    }

    fn enable_depth_test(&mut self) {
        unsafe { self.gl.enable(glow::DEPTH_TEST) };
    }

    fn draw_indexed(
        &mut self,
        program: ProgramHandle,
        vertex_array: VertexArrayHandle,
        count: u32,
        byte_offset: u32,
    ) {
        if let (Some(&program), Some(&vao)) = (
            self.programs.get(&program.0),
            self.vertex_arrays.get(&vertex_array.0),
        ) {
            unsafe {
                self.gl.use_program(Some(program));
                self.gl.bind_vertex_array(Some(vao));
                self.gl.draw_elements(
                    glow::TRIANGLES,
                    count as i32,
                    glow::UNSIGNED_INT,
                    byte_offset as i32,
                );
                self.gl.bind_vertex_array(None);
            }
        }
    }

    fn draw_arrays(
        &mut self,
        program: ProgramHandle,
        vertex_array: VertexArrayHandle,
        first: u32,
        count: u32,
    ) {
        if let (Some(&program), Some(&vao)) = (
            self.programs.get(&program.0),
            self.vertex_arrays.get(&vertex_array.0),
        ) {
            unsafe {
                self.gl.use_program(Some(program));
                self.gl.bind_vertex_array(Some(vao));
                self.gl
                    .draw_arrays(glow::TRIANGLES, first as i32, count as i32);
                self.gl.bind_vertex_array(None);
            }
        }
    }
}

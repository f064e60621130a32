/// GlGraphicsDevice - OpenGL implementation of the GraphicsDevice trait
///
/// Wraps a `glow::Context` that is current on the calling thread. Engine
/// handles carry the raw GL object names, so no lookup table is needed.

use std::num::NonZeroU32;

use cube_3d_engine::cube3d::{
    BufferHandle, Config, Error, GraphicsDevice, ProgramHandle, Result, ShaderHandle, VertexArrayHandle,
};
use cube_3d_engine::cube3d::shader::ShaderStageKind;
use cube_3d_engine::{engine_bail, engine_debug, engine_info};
use glow::HasContext;

use crate::gl_format::{gl_shader_type, FRAME_CLEAR_MASK};

/// OpenGL backend device
pub struct GlGraphicsDevice {
    gl: glow::Context,
    debug_output: bool,
}

impl GlGraphicsDevice {
    /// Wrap a context created by the windowing layer
    ///
    /// When `config.enable_debug_output` is set and the crate is built with
    /// the `gl-debug-output` feature, KHR_debug messages are forwarded to the
    /// engine logger.
    pub fn new(mut gl: glow::Context, config: &Config) -> Result<Self> {
        let (version, shading_language) = unsafe {
            (
                gl.get_parameter_string(glow::VERSION),
                gl.get_parameter_string(glow::SHADING_LANGUAGE_VERSION),
            )
        };
        if version.is_empty() {
            engine_bail!("cube3d::GlGraphicsDevice",
                Error::BackendError("no OpenGL context is current on this thread".to_string()));
        }
        engine_info!("cube3d::GlGraphicsDevice", "{}: OpenGL {} (GLSL {})",
            config.app_name, version, shading_language);

        let debug_output = Self::setup_debug_output(&mut gl, config);

        Ok(Self { gl, debug_output })
    }

    /// Load GL entry points with `loader` and wrap the resulting context
    ///
    /// # Safety
    ///
    /// A GL context must be current on the calling thread, and `loader`
    /// must return entry points of that context.
    pub unsafe fn from_loader_function<F>(loader: F, config: &Config) -> Result<Self>
    where
        F: FnMut(&str) -> *const std::os::raw::c_void,
    {
        Self::new(glow::Context::from_loader_function(loader), config)
    }

    /// Whether driver debug messages are being forwarded
    pub fn debug_output_enabled(&self) -> bool {
        self.debug_output
    }

    /// Underlying glow context, for calls the engine does not wrap
    pub fn gl(&self) -> &glow::Context {
        &self.gl
    }

    #[cfg(feature = "gl-debug-output")]
    fn setup_debug_output(gl: &mut glow::Context, config: &Config) -> bool {
        if !config.enable_debug_output {
            return false;
        }
        let installed = crate::gl_debug::install(gl);
        if installed {
            engine_debug!("cube3d::GlGraphicsDevice", "KHR_debug output forwarded to the engine logger");
        } else {
            cube_3d_engine::engine_warn!("cube3d::GlGraphicsDevice", "Debug output requested but the context lacks KHR_debug");
        }
        installed
    }

    #[cfg(not(feature = "gl-debug-output"))]
    fn setup_debug_output(_gl: &mut glow::Context, config: &Config) -> bool {
        if config.enable_debug_output {
            engine_debug!("cube3d::GlGraphicsDevice",
                "Debug output requested but the gl-debug-output feature is disabled");
        }
        false
    }
}

// ============================================================================
// Handle conversion
// ============================================================================

fn native_name(name: u32) -> Option<NonZeroU32> {
    NonZeroU32::new(name)
}

fn native_shader(handle: ShaderHandle) -> Option<glow::NativeShader> {
    native_name(handle.0).map(glow::NativeShader)
}

fn native_program(handle: ProgramHandle) -> Option<glow::NativeProgram> {
    native_name(handle.0).map(glow::NativeProgram)
}

fn native_buffer(handle: BufferHandle) -> Option<glow::NativeBuffer> {
    native_name(handle.0).map(glow::NativeBuffer)
}

fn native_vertex_array(handle: VertexArrayHandle) -> Option<glow::NativeVertexArray> {
    native_name(handle.0).map(glow::NativeVertexArray)
}

fn exhausted(call: &str, message: String) -> Error {
    Error::BackendResourceExhausted(format!("{} failed: {}", call, message))
}

impl GraphicsDevice for GlGraphicsDevice {
    // ===== SHADER OBJECTS =====

    fn create_shader(&mut self, stage: ShaderStageKind) -> Result<ShaderHandle> {
        let shader = unsafe { self.gl.create_shader(gl_shader_type(stage)) }
            .map_err(|e| exhausted("glCreateShader", e))?;
        Ok(ShaderHandle(shader.0.get()))
    }

    fn shader_source(&mut self, shader: ShaderHandle, source: &str) {
        if let Some(shader) = native_shader(shader) {
            unsafe { self.gl.shader_source(shader, source) };
        }
    }

    fn compile_shader(&mut self, shader: ShaderHandle) {
        if let Some(shader) = native_shader(shader) {
            unsafe { self.gl.compile_shader(shader) };
        }
    }

    fn shader_compile_status(&self, shader: ShaderHandle) -> bool {
        native_shader(shader).map_or(false, |shader| unsafe { self.gl.get_shader_compile_status(shader) })
    }

    fn shader_info_log(&self, shader: ShaderHandle) -> String {
        native_shader(shader)
            .map(|shader| unsafe { self.gl.get_shader_info_log(shader) })
            .unwrap_or_default()
    }

    fn delete_shader(&mut self, shader: ShaderHandle) {
        if let Some(shader) = native_shader(shader) {
            unsafe { self.gl.delete_shader(shader) };
        }
    }

    // ===== PROGRAM OBJECTS =====

    fn create_program(&mut self) -> Result<ProgramHandle> {
        let program = unsafe { self.gl.create_program() }.map_err(|e| exhausted("glCreateProgram", e))?;
        Ok(ProgramHandle(program.0.get()))
    }

    fn attach_shader(&mut self, program: ProgramHandle, shader: ShaderHandle) {
        if let (Some(program), Some(shader)) = (native_program(program), native_shader(shader)) {
            unsafe { self.gl.attach_shader(program, shader) };
        }
    }

    fn detach_shader(&mut self, program: ProgramHandle, shader: ShaderHandle) {
        if let (Some(program), Some(shader)) = (native_program(program), native_shader(shader)) {
            unsafe { self.gl.detach_shader(program, shader) };
        }
    }

    fn link_program(&mut self, program: ProgramHandle) {
        if let Some(program) = native_program(program) {
            unsafe { self.gl.link_program(program) };
        }
    }

    fn program_link_status(&self, program: ProgramHandle) -> bool {
        native_program(program).map_or(false, |program| unsafe { self.gl.get_program_link_status(program) })
    }

    fn program_info_log(&self, program: ProgramHandle) -> String {
        native_program(program)
            .map(|program| unsafe { self.gl.get_program_info_log(program) })
            .unwrap_or_default()
    }

    fn use_program(&mut self, program: Option<ProgramHandle>) {
        let program = program.and_then(native_program);
        unsafe { self.gl.use_program(program) };
    }

    fn uniform_location(&self, program: ProgramHandle, name: &str) -> Option<u32> {
        let program = native_program(program)?;
        unsafe { self.gl.get_uniform_location(program, name) }.map(|location| location.0)
    }

    fn uniform_matrix4(&mut self, location: u32, columns: &[f32; 16]) {
        let location = glow::NativeUniformLocation(location);
        unsafe { self.gl.uniform_matrix_4_f32_slice(Some(&location), false, columns) };
    }

    fn delete_program(&mut self, program: ProgramHandle) {
        if let Some(program) = native_program(program) {
            unsafe { self.gl.delete_program(program) };
        }
    }

    // ===== VERTEX DATA =====

    fn create_vertex_array(&mut self) -> Result<VertexArrayHandle> {
        let vertex_array = unsafe { self.gl.create_vertex_array() }
            .map_err(|e| exhausted("glGenVertexArrays", e))?;
        Ok(VertexArrayHandle(vertex_array.0.get()))
    }

    fn bind_vertex_array(&mut self, vertex_array: Option<VertexArrayHandle>) {
        let vertex_array = vertex_array.and_then(native_vertex_array);
        unsafe { self.gl.bind_vertex_array(vertex_array) };
    }

    fn delete_vertex_array(&mut self, vertex_array: VertexArrayHandle) {
        if let Some(vertex_array) = native_vertex_array(vertex_array) {
            unsafe { self.gl.delete_vertex_array(vertex_array) };
        }
    }

    fn create_buffer(&mut self) -> Result<BufferHandle> {
        let buffer = unsafe { self.gl.create_buffer() }.map_err(|e| exhausted("glGenBuffers", e))?;
        Ok(BufferHandle(buffer.0.get()))
    }

    fn upload_vertex_buffer(&mut self, buffer: BufferHandle, data: &[u8]) {
        let Some(buffer) = native_buffer(buffer) else {
            return;
        };
        unsafe {
            self.gl.bind_buffer(glow::ARRAY_BUFFER, Some(buffer));
            self.gl.buffer_data_u8_slice(glow::ARRAY_BUFFER, data, glow::STATIC_DRAW);
        }
    }

    fn vertex_attribute_f32(&mut self, buffer: BufferHandle, index: u32, components: i32) {
        let Some(buffer) = native_buffer(buffer) else {
            return;
        };
        unsafe {
            self.gl.bind_buffer(glow::ARRAY_BUFFER, Some(buffer));
            self.gl.vertex_attrib_pointer_f32(index, components, glow::FLOAT, false, 0, 0);
            self.gl.enable_vertex_attrib_array(index);
        }
    }

    fn delete_buffer(&mut self, buffer: BufferHandle) {
        if let Some(buffer) = native_buffer(buffer) {
            unsafe { self.gl.delete_buffer(buffer) };
        }
    }

    // ===== FRAME STATE =====

    fn set_viewport(&mut self, width: u32, height: u32) {
        let width = i32::try_from(width).unwrap_or(i32::MAX);
        let height = i32::try_from(height).unwrap_or(i32::MAX);
        unsafe { self.gl.viewport(0, 0, width, height) };
    }

    fn clear(&mut self, color: [f32; 4]) {
        unsafe {
            self.gl.clear_color(color[0], color[1], color[2], color[3]);
            self.gl.clear(FRAME_CLEAR_MASK);
        }
    }

    fn set_depth_test(&mut self, enabled: bool) {
        unsafe {
            if enabled {
                self.gl.enable(glow::DEPTH_TEST);
                self.gl.depth_func(glow::LEQUAL);
            } else {
                self.gl.disable(glow::DEPTH_TEST);
            }
        }
    }

    fn draw_triangles(&mut self, first: u32, count: u32) {
        let first = i32::try_from(first).unwrap_or(i32::MAX);
        let count = i32::try_from(count).unwrap_or(0);
        unsafe { self.gl.draw_arrays(glow::TRIANGLES, first, count) };
    }
}

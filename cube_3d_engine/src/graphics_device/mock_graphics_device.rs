/// Mock GraphicsDevice for unit tests (no GPU required)
///
/// Records every backend call as a string and simulates just enough of a
/// GLSL driver to exercise the shader core:
/// - compilation fails on unbalanced braces/parentheses or an `#error` line
/// - linking fails on uncompiled stages, a stage without `main`, or when a
///   failure was queued with `fail_next_link`
/// - active uniforms are the `uniform <type> <name>;` declarations of the
///   attached sources, located in declaration order
///
/// The device is a cheap handle over shared state, so a test can keep a
/// clone after boxing the device into a `RenderContext`.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::{Error, Result};
use crate::graphics_device::{
    GraphicsDevice, ShaderHandle, ProgramHandle, BufferHandle, VertexArrayHandle,
};
use crate::shader::ShaderStageKind;

// ============================================================================
// Mock objects
// ============================================================================

#[derive(Debug)]
struct MockShaderObject {
    stage: ShaderStageKind,
    source: String,
    compiled: bool,
    info_log: String,
}

#[derive(Debug, Default)]
struct MockProgramObject {
    attached: Vec<u32>,
    linked: bool,
    info_log: String,
    uniforms: Vec<String>,
}

#[derive(Debug, Default)]
struct MockState {
    commands: Vec<String>,
    next_id: u32,
    shaders: HashMap<u32, MockShaderObject>,
    programs: HashMap<u32, MockProgramObject>,
    buffers: HashSet<u32>,
    vertex_arrays: HashSet<u32>,
    compiled_sources: Vec<(u32, String)>,
    uniform_writes: Vec<(u32, [f32; 16])>,
    active_program: Option<u32>,
    fail_allocations: bool,
    link_failure: Option<String>,
}

impl MockState {
    fn allocate(&mut self, what: &str) -> Result<u32> {
        if self.fail_allocations {
            return Err(Error::BackendResourceExhausted(format!("mock device refused to create {}", what)));
        }
        self.next_id += 1;
        Ok(self.next_id)
    }
}

// ============================================================================
// Mock GraphicsDevice
// ============================================================================

/// Mock device that tracks created objects without GPU
#[derive(Debug, Clone, Default)]
pub struct MockGraphicsDevice {
    state: Arc<Mutex<MockState>>,
}

impl MockGraphicsDevice {
    /// Create a new mock device
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap()
    }

    // ===== INSPECTION =====

    /// Every backend call so far, in order
    pub fn commands(&self) -> Vec<String> {
        self.state().commands.clone()
    }

    /// Forget recorded commands
    pub fn clear_commands(&self) {
        self.state().commands.clear();
    }

    /// Number of recorded commands starting with `prefix`
    pub fn count_commands(&self, prefix: &str) -> usize {
        self.state().commands.iter().filter(|c| c.starts_with(prefix)).count()
    }

    /// `(shader, source)` pairs submitted to the compiler, in order
    pub fn compiled_sources(&self) -> Vec<(u32, String)> {
        self.state().compiled_sources.clone()
    }

    /// `(location, matrix)` pairs written with `uniform_matrix4`
    pub fn uniform_writes(&self) -> Vec<(u32, [f32; 16])> {
        self.state().uniform_writes.clone()
    }

    /// Program currently installed on the mock context
    pub fn active_program(&self) -> Option<u32> {
        self.state().active_program
    }

    /// Number of shader objects not yet deleted
    pub fn live_shader_count(&self) -> usize {
        self.state().shaders.len()
    }

    /// Number of program objects not yet deleted
    pub fn live_program_count(&self) -> usize {
        self.state().programs.len()
    }

    /// Number of buffer and vertex array objects not yet deleted
    pub fn live_vertex_object_count(&self) -> usize {
        let state = self.state();
        state.buffers.len() + state.vertex_arrays.len()
    }

    /// Stage a live shader object was created for
    pub fn shader_stage(&self, shader: u32) -> Option<ShaderStageKind> {
        self.state().shaders.get(&shader).map(|s| s.stage)
    }

    // ===== FAILURE INJECTION =====

    /// Make every following allocation fail with `BackendResourceExhausted`
    pub fn set_fail_allocations(&self, fail: bool) {
        self.state().fail_allocations = fail;
    }

    /// Make the next link fail with `info_log`
    pub fn fail_next_link(&self, info_log: &str) {
        self.state().link_failure = Some(info_log.to_string());
    }
}

// ============================================================================
// Simulated GLSL front end
// ============================================================================

/// Returns the compile status and info log for `source`
fn simulate_compile(source: &str) -> (bool, String) {
    let mut braces = 0i32;
    let mut parens = 0i32;
    let mut line_number = 0;

    for (index, line) in source.lines().enumerate() {
        line_number = index + 1;
        let trimmed = line.trim_start();
        if let Some(message) = trimmed.strip_prefix("#error") {
            return (false, format!("0:{}(1): error: {}", line_number, message.trim()));
        }
        for ch in line.chars() {
            match ch {
                '{' => braces += 1,
                '}' => braces -= 1,
                '(' => parens += 1,
                ')' => parens -= 1,
                _ => {}
            }
            if braces < 0 || parens < 0 {
                return (false, format!("0:{}(1): error: syntax error, unexpected '{}'", line_number, ch));
            }
        }
    }

    if braces != 0 || parens != 0 {
        return (
            false,
            format!("0:{}(1): error: syntax error, unexpected end of file", line_number.max(1)),
        );
    }

    (true, String::new())
}

/// Names declared with `uniform <type> <name>;`, in declaration order
fn declared_uniforms(source: &str) -> Vec<String> {
    let mut names = Vec::new();
    for line in source.lines() {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if let Some(index) = tokens.iter().position(|t| *t == "uniform") {
            if let Some(raw) = tokens.get(index + 2) {
                let name = raw.trim_end_matches(';');
                let name = name.split('[').next().unwrap_or(name);
                if !name.is_empty() {
                    names.push(name.to_string());
                }
            }
        }
    }
    names
}

impl GraphicsDevice for MockGraphicsDevice {
    // ===== SHADER OBJECTS =====

    fn create_shader(&mut self, stage: ShaderStageKind) -> Result<ShaderHandle> {
        let mut state = self.state();
        let id = state.allocate("shader")?;
        state.shaders.insert(id, MockShaderObject {
            stage,
            source: String::new(),
            compiled: false,
            info_log: String::new(),
        });
        state.commands.push(format!("create_shader({:?}) -> {}", stage, id));
        Ok(ShaderHandle(id))
    }

    fn shader_source(&mut self, shader: ShaderHandle, source: &str) {
        let mut state = self.state();
        if let Some(object) = state.shaders.get_mut(&shader.0) {
            object.source = source.to_string();
        }
        state.commands.push(format!("shader_source({})", shader.0));
    }

    fn compile_shader(&mut self, shader: ShaderHandle) {
        let mut state = self.state();
        let source = match state.shaders.get_mut(&shader.0) {
            Some(object) => {
                let (compiled, info_log) = simulate_compile(&object.source);
                object.compiled = compiled;
                object.info_log = info_log;
                object.source.clone()
            }
            None => String::new(),
        };
        state.compiled_sources.push((shader.0, source));
        state.commands.push(format!("compile_shader({})", shader.0));
    }

    fn shader_compile_status(&self, shader: ShaderHandle) -> bool {
        self.state().shaders.get(&shader.0).map_or(false, |s| s.compiled)
    }

    fn shader_info_log(&self, shader: ShaderHandle) -> String {
        self.state().shaders.get(&shader.0).map(|s| s.info_log.clone()).unwrap_or_default()
    }

    fn delete_shader(&mut self, shader: ShaderHandle) {
        let mut state = self.state();
        state.shaders.remove(&shader.0);
        state.commands.push(format!("delete_shader({})", shader.0));
    }

    // ===== PROGRAM OBJECTS =====

    fn create_program(&mut self) -> Result<ProgramHandle> {
        let mut state = self.state();
        let id = state.allocate("program")?;
        state.programs.insert(id, MockProgramObject::default());
        state.commands.push(format!("create_program -> {}", id));
        Ok(ProgramHandle(id))
    }

    fn attach_shader(&mut self, program: ProgramHandle, shader: ShaderHandle) {
        let mut state = self.state();
        if let Some(object) = state.programs.get_mut(&program.0) {
            object.attached.push(shader.0);
        }
        state.commands.push(format!("attach_shader({}, {})", program.0, shader.0));
    }

    fn detach_shader(&mut self, program: ProgramHandle, shader: ShaderHandle) {
        let mut state = self.state();
        if let Some(object) = state.programs.get_mut(&program.0) {
            object.attached.retain(|&id| id != shader.0);
        }
        state.commands.push(format!("detach_shader({}, {})", program.0, shader.0));
    }

    fn link_program(&mut self, program: ProgramHandle) {
        let mut state = self.state();
        state.commands.push(format!("link_program({})", program.0));

        let queued_failure = state.link_failure.take();
        let attached = match state.programs.get(&program.0) {
            Some(object) => object.attached.clone(),
            None => return,
        };

        let mut failure = queued_failure;
        let mut uniforms = Vec::new();
        if failure.is_none() && attached.is_empty() {
            failure = Some("error: no shaders attached to the program".to_string());
        }
        for id in &attached {
            if failure.is_some() {
                break;
            }
            match state.shaders.get(id) {
                Some(shader) if !shader.compiled => {
                    failure = Some("error: linking with uncompiled/unspecialized shader".to_string());
                }
                Some(shader) if !shader.source.contains("main") => {
                    failure = Some(format!("error: {} shader lacks `main'", shader.stage));
                }
                Some(shader) => {
                    for name in declared_uniforms(&shader.source) {
                        if !uniforms.contains(&name) {
                            uniforms.push(name);
                        }
                    }
                }
                None => failure = Some(format!("error: shader {} was deleted", id)),
            }
        }

        if let Some(object) = state.programs.get_mut(&program.0) {
            match failure {
                Some(info_log) => {
                    object.linked = false;
                    object.info_log = info_log;
                    object.uniforms.clear();
                }
                None => {
                    object.linked = true;
                    object.info_log = String::new();
                    object.uniforms = uniforms;
                }
            }
        }
    }

    fn program_link_status(&self, program: ProgramHandle) -> bool {
        self.state().programs.get(&program.0).map_or(false, |p| p.linked)
    }

    fn program_info_log(&self, program: ProgramHandle) -> String {
        self.state().programs.get(&program.0).map(|p| p.info_log.clone()).unwrap_or_default()
    }

    fn use_program(&mut self, program: Option<ProgramHandle>) {
        let mut state = self.state();
        state.active_program = program.map(|p| p.0);
        match program {
            Some(program) => state.commands.push(format!("use_program({})", program.0)),
            None => state.commands.push("use_program(none)".to_string()),
        }
    }

    fn uniform_location(&self, program: ProgramHandle, name: &str) -> Option<u32> {
        let mut state = self.state();
        state.commands.push(format!("uniform_location({}, {})", program.0, name));
        let object = state.programs.get(&program.0)?;
        if !object.linked {
            return None;
        }
        object.uniforms.iter().position(|u| u == name).map(|index| index as u32)
    }

    fn uniform_matrix4(&mut self, location: u32, columns: &[f32; 16]) {
        let mut state = self.state();
        state.uniform_writes.push((location, *columns));
        state.commands.push(format!("uniform_matrix4({})", location));
    }

    fn delete_program(&mut self, program: ProgramHandle) {
        let mut state = self.state();
        state.programs.remove(&program.0);
        state.commands.push(format!("delete_program({})", program.0));
    }

    // ===== VERTEX DATA =====

    fn create_vertex_array(&mut self) -> Result<VertexArrayHandle> {
        let mut state = self.state();
        let id = state.allocate("vertex array")?;
        state.vertex_arrays.insert(id);
        state.commands.push(format!("create_vertex_array -> {}", id));
        Ok(VertexArrayHandle(id))
    }

    fn bind_vertex_array(&mut self, vertex_array: Option<VertexArrayHandle>) {
        let command = match vertex_array {
            Some(vao) => format!("bind_vertex_array({})", vao.0),
            None => "bind_vertex_array(none)".to_string(),
        };
        self.state().commands.push(command);
    }

    fn delete_vertex_array(&mut self, vertex_array: VertexArrayHandle) {
        let mut state = self.state();
        state.vertex_arrays.remove(&vertex_array.0);
        state.commands.push(format!("delete_vertex_array({})", vertex_array.0));
    }

    fn create_buffer(&mut self) -> Result<BufferHandle> {
        let mut state = self.state();
        let id = state.allocate("buffer")?;
        state.buffers.insert(id);
        state.commands.push(format!("create_buffer -> {}", id));
        Ok(BufferHandle(id))
    }

    fn upload_vertex_buffer(&mut self, buffer: BufferHandle, data: &[u8]) {
        self.state().commands.push(format!("upload_vertex_buffer({}, {} bytes)", buffer.0, data.len()));
    }

    fn vertex_attribute_f32(&mut self, buffer: BufferHandle, index: u32, components: i32) {
        self.state().commands.push(format!("vertex_attribute_f32({}, {}, {})", buffer.0, index, components));
    }

    fn delete_buffer(&mut self, buffer: BufferHandle) {
        let mut state = self.state();
        state.buffers.remove(&buffer.0);
        state.commands.push(format!("delete_buffer({})", buffer.0));
    }

    // ===== FRAME STATE =====

    fn set_viewport(&mut self, width: u32, height: u32) {
        self.state().commands.push(format!("set_viewport({}x{})", width, height));
    }

    fn clear(&mut self, _color: [f32; 4]) {
        self.state().commands.push("clear".to_string());
    }

    fn set_depth_test(&mut self, enabled: bool) {
        self.state().commands.push(format!("set_depth_test({})", enabled));
    }

    fn draw_triangles(&mut self, first: u32, count: u32) {
        self.state().commands.push(format!("draw_triangles({}, {})", first, count));
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "mock_graphics_device_tests.rs"]
mod tests;

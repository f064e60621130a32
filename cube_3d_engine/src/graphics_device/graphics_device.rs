/// GraphicsDevice trait - the backend seam of the shader core
///
/// A backend wraps one graphics context (an OpenGL context in practice) and
/// exposes the handful of driver calls the shader core and the cube scene
/// need. Methods are synchronous round-trips to the driver.
///
/// Implementations are not required to be `Send`: the owning
/// `RenderContext` pins them to the thread that created the context.

use std::path::PathBuf;
use crate::error::Result;
use crate::shader::ShaderStageKind;

// ============================================================================
// Handles
// ============================================================================

/// Backend name of a shader-stage object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShaderHandle(pub u32);

/// Backend name of a program object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProgramHandle(pub u32);

/// Backend name of a buffer object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BufferHandle(pub u32);

/// Backend name of a vertex array object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VertexArrayHandle(pub u32);

// ============================================================================
// Configuration
// ============================================================================

/// Engine and backend configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Forward driver debug messages (KHR_debug) into the engine logger
    pub enable_debug_output: bool,
    /// Application name (used in log lines)
    pub app_name: String,
    /// Directory resource names are resolved against when they are not embedded
    pub resource_root: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            enable_debug_output: cfg!(debug_assertions),
            app_name: "Cube3D Application".to_string(),
            resource_root: PathBuf::from("resources"),
        }
    }
}

// ============================================================================
// GraphicsDevice trait
// ============================================================================

/// Backend driver interface
pub trait GraphicsDevice {
    // ===== SHADER OBJECTS =====

    /// Allocate a shader object for `stage`
    ///
    /// Fails with `Error::BackendResourceExhausted` when the driver refuses.
    fn create_shader(&mut self, stage: ShaderStageKind) -> Result<ShaderHandle>;

    /// Replace the source of `shader`
    fn shader_source(&mut self, shader: ShaderHandle, source: &str);

    /// Request compilation of the current source
    fn compile_shader(&mut self, shader: ShaderHandle);

    /// Compile status flag of the last compilation
    fn shader_compile_status(&self, shader: ShaderHandle) -> bool;

    /// Compiler info log (possibly empty)
    fn shader_info_log(&self, shader: ShaderHandle) -> String;

    /// Delete a shader object
    fn delete_shader(&mut self, shader: ShaderHandle);

    // ===== PROGRAM OBJECTS =====

    /// Allocate a program object
    fn create_program(&mut self) -> Result<ProgramHandle>;

    /// Attach a compiled shader to a program
    fn attach_shader(&mut self, program: ProgramHandle, shader: ShaderHandle);

    /// Detach a shader from a program
    fn detach_shader(&mut self, program: ProgramHandle, shader: ShaderHandle);

    /// Request a link of every attached shader
    fn link_program(&mut self, program: ProgramHandle);

    /// Link status flag of the last link
    fn program_link_status(&self, program: ProgramHandle) -> bool;

    /// Linker info log (possibly empty)
    fn program_info_log(&self, program: ProgramHandle) -> String;

    /// Install `program` as the active program (`None` unbinds)
    fn use_program(&mut self, program: Option<ProgramHandle>);

    /// Location of an active uniform, `None` when the name is not active
    fn uniform_location(&self, program: ProgramHandle, name: &str) -> Option<u32>;

    /// Write a column-major 4x4 matrix to a uniform of the active program
    fn uniform_matrix4(&mut self, location: u32, columns: &[f32; 16]);

    /// Delete a program object
    fn delete_program(&mut self, program: ProgramHandle);

    // ===== VERTEX DATA =====

    /// Allocate a vertex array object
    fn create_vertex_array(&mut self) -> Result<VertexArrayHandle>;

    /// Bind a vertex array (`None` unbinds)
    fn bind_vertex_array(&mut self, vertex_array: Option<VertexArrayHandle>);

    /// Delete a vertex array object
    fn delete_vertex_array(&mut self, vertex_array: VertexArrayHandle);

    /// Allocate a buffer object
    fn create_buffer(&mut self) -> Result<BufferHandle>;

    /// Upload static vertex data into `buffer`
    fn upload_vertex_buffer(&mut self, buffer: BufferHandle, data: &[u8]);

    /// Describe attribute `index` as tightly packed `f32` vectors read from `buffer`
    /// and enable it on the bound vertex array
    fn vertex_attribute_f32(&mut self, buffer: BufferHandle, index: u32, components: i32);

    /// Delete a buffer object
    fn delete_buffer(&mut self, buffer: BufferHandle);

    // ===== FRAME STATE =====

    /// Set the viewport to cover `width` x `height` pixels
    fn set_viewport(&mut self, width: u32, height: u32);

    /// Clear the color and depth buffers
    fn clear(&mut self, color: [f32; 4]);

    /// Enable or disable depth testing (LEQUAL comparison)
    fn set_depth_test(&mut self, enabled: bool);

    /// Draw `count` vertices as a triangle list, starting at `first`
    fn draw_triangles(&mut self, first: u32, count: u32);
}

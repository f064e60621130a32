/*!
# Cube 3D Engine

Shader-program lifecycle core for a small OpenGL cube renderer.

This crate owns the platform-agnostic part: loading GLSL source, compiling
shader stages, linking programs, binding uniforms and releasing every GPU
object exactly once. GPU access goes through the `GraphicsDevice` trait;
the OpenGL implementation lives in `cube_3d_engine_renderer_gl`.

## Architecture

- **ShaderSource**: Loads shader text from paths or the resource namespace
- **Shader**: One shader stage (source lines, compile, release)
- **Program**: One shader per stage, linked; uniform lookup and upload
- **RenderContext**: The device plus the context-scoped active program
- **RenderHost**: init / resize / frame / shutdown callbacks, guarded by `FrameDriver`
- **CubeScene**: The render host drawing the cube
*/

// Internal modules
mod error;
mod engine;
pub mod log;
pub mod graphics_device;
pub mod render_context;
pub mod shader;
pub mod scene;

// Main cube3d namespace module
pub mod cube3d {
    // Error types
    pub use crate::error::{Error, Result};

    // Logging entry point
    pub use crate::engine::Engine;

    // Device seam and explicit context
    pub use crate::graphics_device::{
        GraphicsDevice, Config, ShaderHandle, ProgramHandle, BufferHandle, VertexArrayHandle,
    };
    pub use crate::render_context::{RenderContext, RenderContextId};

    // Logging sub-module (types only, NOT macros)
    pub mod log {
        pub use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};
    }

    // Shader sub-module
    pub mod shader {
        pub use crate::shader::*;
    }

    // Scene sub-module
    pub mod scene {
        pub use crate::scene::*;
    }
}

// Re-export math library at crate root
pub use glam;

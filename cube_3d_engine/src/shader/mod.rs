//! Shader module: stage kinds, source loading, shader stages and linked programs.
//!
//! `Program` owns one `Shader` per `ShaderStageKind`. Every GPU call goes
//! through an explicit `RenderContext`, so neither type stores a device.

mod shader_stage;
mod shader_source;
mod shader;
mod program;

pub use shader_stage::ShaderStageKind;
pub use shader_source::{ShaderSource, SourceOrigin, EMBEDDED_SHADERS};
pub use shader::Shader;
pub use program::{Program, UniformLocation};

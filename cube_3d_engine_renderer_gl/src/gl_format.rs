/// Engine enum -> OpenGL constant tables

use cube_3d_engine::cube3d::shader::ShaderStageKind;

/// `glCreateShader` type for a stage
pub(crate) fn gl_shader_type(stage: ShaderStageKind) -> u32 {
    match stage {
        ShaderStageKind::Vertex => glow::VERTEX_SHADER,
        ShaderStageKind::TessellationControl => glow::TESS_CONTROL_SHADER,
        ShaderStageKind::TessellationEvaluation => glow::TESS_EVALUATION_SHADER,
        ShaderStageKind::Geometry => glow::GEOMETRY_SHADER,
        ShaderStageKind::Fragment => glow::FRAGMENT_SHADER,
        ShaderStageKind::Compute => glow::COMPUTE_SHADER,
    }
}

/// Buffers cleared at the start of a frame
pub(crate) const FRAME_CLEAR_MASK: u32 = glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT;

#[cfg(test)]
#[path = "gl_format_tests.rs"]
mod tests;

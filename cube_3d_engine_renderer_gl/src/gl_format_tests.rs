//! Unit tests for OpenGL constant tables
//!
//! Pure mappings, no GL context required.

use cube_3d_engine::cube3d::shader::ShaderStageKind;
use super::*;

// ============================================================================
// SHADER STAGE CONVERSION TESTS
// ============================================================================

#[test]
fn test_graphics_stages_map_to_gl_shader_types() {
    assert_eq!(gl_shader_type(ShaderStageKind::Vertex), 0x8B31);
    assert_eq!(gl_shader_type(ShaderStageKind::Fragment), 0x8B30);
    assert_eq!(gl_shader_type(ShaderStageKind::Geometry), 0x8DD9);
}

#[test]
fn test_tessellation_and_compute_stages() {
    assert_eq!(gl_shader_type(ShaderStageKind::TessellationControl), glow::TESS_CONTROL_SHADER);
    assert_eq!(gl_shader_type(ShaderStageKind::TessellationEvaluation), glow::TESS_EVALUATION_SHADER);
    assert_eq!(gl_shader_type(ShaderStageKind::Compute), glow::COMPUTE_SHADER);
}

#[test]
fn test_every_stage_has_a_distinct_type() {
    let mut types: Vec<u32> = ShaderStageKind::ALL.iter().map(|&stage| gl_shader_type(stage)).collect();
    types.sort_unstable();
    types.dedup();
    assert_eq!(types.len(), ShaderStageKind::ALL.len());
}

// ============================================================================
// FRAME STATE
// ============================================================================

#[test]
fn test_frame_clear_mask_covers_color_and_depth() {
    assert_ne!(FRAME_CLEAR_MASK & glow::COLOR_BUFFER_BIT, 0);
    assert_ne!(FRAME_CLEAR_MASK & glow::DEPTH_BUFFER_BIT, 0);
    assert_eq!(FRAME_CLEAR_MASK & glow::STENCIL_BUFFER_BIT, 0);
}

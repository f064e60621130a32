/*!
# Cube 3D Engine - OpenGL Renderer Backend

OpenGL implementation of the Cube 3D engine's `GraphicsDevice` trait.

This crate wraps a `glow::Context` created by the windowing layer. Shader,
program, buffer and vertex array calls map one-to-one onto GL entry points.
With the `gl-debug-output` feature, KHR_debug driver messages are forwarded
to the engine logger.
*/

mod gl_format;
mod gl_graphics_device;
#[cfg(feature = "gl-debug-output")]
mod gl_debug;

// Main cube3d namespace module
pub mod cube3d {
    pub use crate::gl_graphics_device::GlGraphicsDevice;
}

// Re-export debug utilities
#[cfg(feature = "gl-debug-output")]
pub use gl_debug::{debug_stats, print_debug_stats_report, DebugStats};

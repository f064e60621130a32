//! Error types for the Cube3D engine
//!
//! This module defines the error types used throughout the engine:
//! shader source loading, shader compilation, program linking, usage-order
//! mistakes and backend failures.

use std::fmt;
use crate::shader::ShaderStageKind;

/// Result type for Cube3D engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Cube3D engine errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A shader path or resource name does not name a readable file
    ResourceNotFound(String),

    /// A resource name resolved to something that cannot be read as a file
    InvalidResourceLocation(String),

    /// Shader source could not be decoded as UTF-8 text
    InvalidSource(String),

    /// A shader with zero source lines was asked to compile
    EmptySource { stage: ShaderStageKind },

    /// Source was appended to (or compile requested on) an already compiled shader
    AlreadyCompiled { stage: ShaderStageKind },

    /// The backend compiler rejected a shader stage
    CompileError { stage: ShaderStageKind, diagnostics: String },

    /// The backend linker rejected the program
    LinkError { diagnostics: String },

    /// `Program::compile` was called with no stage configured
    NoStages,

    /// The program is already linked and cannot be rebuilt
    AlreadyLinked,

    /// The program was used before a successful compile + link
    NotLinked,

    /// A uniform upload was requested while no program is bound on the context
    NoActiveProgram,

    /// A uniform write targeted a program that is not the active one
    ProgramNotActive,

    /// The backend refused to allocate a shader, program or buffer object
    BackendResourceExhausted(String),

    /// The program (or one of its shaders) was used after release
    AlreadyReleased,

    /// The shader was already released
    DoubleRelease { stage: ShaderStageKind },

    /// An object was used with a render context other than the one that created it
    ForeignContext,

    /// Render host callbacks were driven out of order
    HostState(String),

    /// Backend-specific error (OpenGL driver, context loading, etc.)
    BackendError(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::ResourceNotFound(msg) => write!(f, "Resource not found: {}", msg),
            Error::InvalidResourceLocation(msg) => write!(f, "Invalid resource location: {}", msg),
            Error::InvalidSource(msg) => write!(f, "Invalid shader source: {}", msg),
            Error::EmptySource { stage } => {
                write!(f, "{} shader is declared but missing any source code", stage)
            }
            Error::AlreadyCompiled { stage } => write!(f, "{} shader is already compiled", stage),
            Error::CompileError { stage, diagnostics } => {
                write!(f, "{} shader failed to compile:\n{}", stage, diagnostics)
            }
            Error::LinkError { diagnostics } => write!(f, "Program failed to link:\n{}", diagnostics),
            Error::NoStages => write!(f, "Program has no shader stages to compile"),
            Error::AlreadyLinked => write!(f, "Program is already linked"),
            Error::NotLinked => write!(f, "Program is not linked"),
            Error::NoActiveProgram => write!(f, "No program is active on the render context"),
            Error::ProgramNotActive => write!(f, "Program is not the active program on the render context"),
            Error::BackendResourceExhausted(msg) => write!(f, "Backend resource exhausted: {}", msg),
            Error::AlreadyReleased => write!(f, "Object was used after release"),
            Error::DoubleRelease { stage } => write!(f, "{} shader was already released", stage),
            Error::ForeignContext => write!(f, "Object belongs to a different render context"),
            Error::HostState(msg) => write!(f, "Invalid render host state: {}", msg),
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;

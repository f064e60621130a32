//! Unit tests for error.rs
//!
//! Tests Error variants and their implementations (Display, Debug, Clone, std::error::Error).

use crate::error::{Error, Result};
use crate::shader::ShaderStageKind;

// ============================================================================
// ERROR DISPLAY TESTS
// ============================================================================

#[test]
fn test_resource_not_found_display() {
    let err = Error::ResourceNotFound("shaders/missing.glsl".to_string());
    let display = format!("{}", err);
    assert!(display.contains("Resource not found"));
    assert!(display.contains("shaders/missing.glsl"));
}

#[test]
fn test_compile_error_display_names_stage_and_diagnostics() {
    let err = Error::CompileError {
        stage: ShaderStageKind::Fragment,
        diagnostics: "0:3(1): error: syntax error".to_string(),
    };
    let display = format!("{}", err);
    assert!(display.starts_with("Fragment shader failed to compile"));
    assert!(display.contains("0:3(1): error: syntax error"));
}

#[test]
fn test_link_error_display() {
    let err = Error::LinkError { diagnostics: "error: unresolved varying".to_string() };
    let display = format!("{}", err);
    assert!(display.contains("failed to link"));
    assert!(display.contains("unresolved varying"));
}

#[test]
fn test_empty_source_display() {
    let err = Error::EmptySource { stage: ShaderStageKind::Vertex };
    assert_eq!(
        format!("{}", err),
        "Vertex shader is declared but missing any source code"
    );
}

#[test]
fn test_usage_errors_display() {
    assert_eq!(format!("{}", Error::NoStages), "Program has no shader stages to compile");
    assert_eq!(format!("{}", Error::NotLinked), "Program is not linked");
    assert_eq!(format!("{}", Error::AlreadyReleased), "Object was used after release");
    assert_eq!(
        format!("{}", Error::DoubleRelease { stage: ShaderStageKind::Geometry }),
        "Geometry shader was already released"
    );
    assert_eq!(
        format!("{}", Error::ForeignContext),
        "Object belongs to a different render context"
    );
}

// ============================================================================
// ERROR TRAIT IMPLEMENTATIONS
// ============================================================================

#[test]
fn test_error_is_std_error() {
    let err = Error::NoStages;
    let _: &dyn std::error::Error = &err;
}

#[test]
fn test_error_debug() {
    let debug = format!("{:?}", Error::BackendResourceExhausted("glCreateShader".to_string()));
    assert!(debug.contains("BackendResourceExhausted"));

    let debug = format!("{:?}", Error::AlreadyCompiled { stage: ShaderStageKind::Compute });
    assert!(debug.contains("AlreadyCompiled"));
    assert!(debug.contains("Compute"));
}

#[test]
fn test_error_clone_and_eq() {
    let err1 = Error::CompileError {
        stage: ShaderStageKind::Vertex,
        diagnostics: "bad".to_string(),
    };
    let err2 = err1.clone();
    assert_eq!(err1, err2);
    assert_ne!(err1, Error::NotLinked);
}

// ============================================================================
// RESULT TYPE TESTS
// ============================================================================

#[test]
fn test_error_propagation_with_question_mark() {
    fn inner() -> Result<i32> {
        Err(Error::NotLinked)
    }

    fn outer() -> Result<i32> {
        inner()?;
        Ok(42)
    }

    assert_eq!(outer(), Err(Error::NotLinked));
}

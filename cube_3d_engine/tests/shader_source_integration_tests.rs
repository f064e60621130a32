//! Integration tests for shader source loading
//!
//! These tests go through the public `cube3d::shader` API only.
//! No GPU required.
//!
//! Run with: cargo test --test shader_source_integration_tests

use cube_3d_engine::cube3d::{Config, Error};
use cube_3d_engine::cube3d::shader::{ShaderSource, SourceOrigin, EMBEDDED_SHADERS};
use std::fs;

// ============================================================================
// CONFIGURATION
// ============================================================================

#[test]
fn test_integration_loader_uses_config_resource_root() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config { resource_root: dir.path().to_path_buf(), ..Default::default() };

    let loader = ShaderSource::new(&config);
    assert_eq!(loader.resource_root(), dir.path());
}

#[test]
fn test_integration_default_config() {
    let config = Config::default();
    assert_eq!(config.app_name, "Cube3D Application");
    assert_eq!(config.enable_debug_output, cfg!(debug_assertions));
    assert_eq!(ShaderSource::default().resource_root(), config.resource_root.as_path());
}

// ============================================================================
// LOADING
// ============================================================================

#[test]
fn test_integration_embedded_shaders_are_complete_programs() {
    assert_eq!(EMBEDDED_SHADERS.len(), 2);

    let loader = ShaderSource::default();
    let vertex = loader.load_from_resource("shaders/simple_vertex.glsl").unwrap().concat();
    let fragment = loader.load_from_resource("shaders/simple_fragment.glsl").unwrap().concat();

    assert!(vertex.contains("uniform mat4 mv_matrix;"));
    assert!(vertex.contains("uniform mat4 proj_matrix;"));
    assert!(vertex.contains("out vec4 varying_color;"));
    assert!(fragment.contains("in vec4 varying_color;"));
}

#[test]
fn test_integration_embedded_resource_wins_over_file() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("shaders")).unwrap();
    fs::write(dir.path().join("shaders/simple_vertex.glsl"), "// shadowed\n").unwrap();

    let loader = ShaderSource::with_resource_root(dir.path());
    let lines = loader.load_from_resource("shaders/simple_vertex.glsl").unwrap();
    assert!(lines[0].starts_with("#version 430"));
}

#[test]
fn test_integration_path_and_resource_origins_agree() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("custom")).unwrap();
    let path = dir.path().join("custom/outline.frag");
    fs::write(&path, "#version 430\nout vec4 color;\nvoid main(void) { color = vec4(1.0); }\n").unwrap();

    let loader = ShaderSource::with_resource_root(dir.path());
    let by_path = loader.load(&SourceOrigin::Path(path)).unwrap();
    let by_name = loader.load(&SourceOrigin::Resource("custom/outline.frag".to_string())).unwrap();

    assert_eq!(by_path, by_name);
    assert_eq!(by_path.len(), 3);
}

#[test]
fn test_integration_loading_errors() {
    let dir = tempfile::tempdir().unwrap();
    let loader = ShaderSource::with_resource_root(dir.path());

    assert!(matches!(
        loader.load(&SourceOrigin::Resource("shaders/absent.glsl".to_string())),
        Err(Error::ResourceNotFound(_))
    ));
    assert!(matches!(
        loader.load(&SourceOrigin::Resource("../outside.glsl".to_string())),
        Err(Error::InvalidResourceLocation(_))
    ));
    assert!(matches!(
        loader.load(&SourceOrigin::Path(dir.path().join("absent.glsl"))),
        Err(Error::ResourceNotFound(_))
    ));
}

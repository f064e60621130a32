/// Shader source loading
///
/// Sources are kept line by line so diagnostics can be traced back to the
/// text that was submitted. Each line keeps its own terminator: the backend
/// receives the concatenation, and dropping newlines would glue tokens from
/// neighbouring lines together.

use std::fmt;
use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};
use crate::graphics_device::Config;

/// Shaders built into the binary, addressed by resource name
pub const EMBEDDED_SHADERS: &[(&str, &str)] = &[
    ("shaders/simple_vertex.glsl", include_str!("../../shaders/simple_vertex.glsl")),
    ("shaders/simple_fragment.glsl", include_str!("../../shaders/simple_fragment.glsl")),
];

/// Where a shader's source came from (kept for diagnostics)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceOrigin {
    /// Arbitrary filesystem path
    Path(PathBuf),
    /// Name in the resource namespace (embedded table, then resource root)
    Resource(String),
}

impl fmt::Display for SourceOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceOrigin::Path(path) => write!(f, "\"{}\"", path.display()),
            SourceOrigin::Resource(name) => write!(f, "resource \"{}\"", name),
        }
    }
}

/// Shader source loader
///
/// Every call re-reads its input; nothing is cached.
#[derive(Debug, Clone)]
pub struct ShaderSource {
    resource_root: PathBuf,
}

impl ShaderSource {
    /// Loader resolving resources against `config.resource_root`
    pub fn new(config: &Config) -> Self {
        Self::with_resource_root(config.resource_root.clone())
    }

    /// Loader resolving resources against `resource_root`
    pub fn with_resource_root(resource_root: impl Into<PathBuf>) -> Self {
        Self { resource_root: resource_root.into() }
    }

    /// Directory non-embedded resource names are resolved against
    pub fn resource_root(&self) -> &Path {
        &self.resource_root
    }

    /// Load lines from either kind of origin
    pub fn load(&self, origin: &SourceOrigin) -> Result<Vec<String>> {
        match origin {
            SourceOrigin::Path(path) => self.load_from_path(path),
            SourceOrigin::Resource(name) => self.load_from_resource(name),
        }
    }

    /// Load lines from a filesystem path
    ///
    /// # Errors
    ///
    /// - `ResourceNotFound` if `path` does not name a readable file
    /// - `InvalidSource` if the content is not UTF-8
    pub fn load_from_path(&self, path: impl AsRef<Path>) -> Result<Vec<String>> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|e| {
            Error::ResourceNotFound(format!("\"{}\" doesn't match a readable file name ({})", path.display(), e))
        })?;
        let text = String::from_utf8(bytes)
            .map_err(|e| Error::InvalidSource(format!("\"{}\" is not UTF-8 text ({})", path.display(), e)))?;
        Ok(split_lines(&text))
    }

    /// Load lines from the resource namespace
    ///
    /// Embedded shaders win over files with the same name under the resource root.
    ///
    /// # Errors
    ///
    /// - `InvalidResourceLocation` for empty, absolute or parent-relative names,
    ///   or when the name resolves to something that is not a readable file
    /// - `ResourceNotFound` when nothing matches the name
    pub fn load_from_resource(&self, name: &str) -> Result<Vec<String>> {
        validate_resource_name(name)?;

        if let Some((_, text)) = EMBEDDED_SHADERS.iter().find(|(embedded, _)| *embedded == name) {
            return Ok(split_lines(text));
        }

        let resolved = self.resource_root.join(name);
        if !resolved.exists() {
            return Err(Error::ResourceNotFound(format!("No resource matches {}", name)));
        }
        if !resolved.is_file() {
            return Err(Error::InvalidResourceLocation(format!(
                "resource {} resolved to \"{}\", which is not a file",
                name,
                resolved.display()
            )));
        }

        self.load_from_path(&resolved).map_err(|error| match error {
            Error::ResourceNotFound(msg) => Error::InvalidResourceLocation(msg),
            other => other,
        })
    }
}

impl Default for ShaderSource {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

/// Split text into lines, each keeping its trailing `\n` if it had one
fn split_lines(text: &str) -> Vec<String> {
    text.split_inclusive('\n').map(str::to_string).collect()
}

fn validate_resource_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::InvalidResourceLocation("empty resource name".to_string()));
    }
    let escapes = Path::new(name).components().any(|component| {
        matches!(component, Component::ParentDir | Component::RootDir | Component::Prefix(_))
    });
    if escapes {
        return Err(Error::InvalidResourceLocation(format!(
            "resource name {} must stay inside the resource namespace",
            name
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "shader_source_tests.rs"]
mod tests;

/// Shader pipeline stage
///
/// Variants are declared in pipeline order, so ordered collections keyed by
/// stage iterate vertex first and compute last. The mapping to backend stage
/// constants lives in the backend crate as a fixed table.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ShaderStageKind {
    /// Vertex shader
    Vertex,
    /// Tessellation control shader
    TessellationControl,
    /// Tessellation evaluation shader
    TessellationEvaluation,
    /// Geometry shader
    Geometry,
    /// Fragment/Pixel shader
    Fragment,
    /// Compute shader
    Compute,
}

impl ShaderStageKind {
    /// Every stage, in pipeline order
    pub const ALL: [ShaderStageKind; 6] = [
        ShaderStageKind::Vertex,
        ShaderStageKind::TessellationControl,
        ShaderStageKind::TessellationEvaluation,
        ShaderStageKind::Geometry,
        ShaderStageKind::Fragment,
        ShaderStageKind::Compute,
    ];

    /// Human-readable stage name
    pub fn name(&self) -> &'static str {
        match self {
            ShaderStageKind::Vertex => "Vertex",
            ShaderStageKind::TessellationControl => "Tessellation control",
            ShaderStageKind::TessellationEvaluation => "Tessellation evaluation",
            ShaderStageKind::Geometry => "Geometry",
            ShaderStageKind::Fragment => "Fragment",
            ShaderStageKind::Compute => "Compute",
        }
    }
}

impl fmt::Display for ShaderStageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

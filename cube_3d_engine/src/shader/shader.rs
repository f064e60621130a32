/// Shader - one compiled shader-stage object
///
/// A Shader is created empty, receives source lines any number of times,
/// compiles exactly once and is released exactly once. Compiler diagnostics
/// are always handed to the engine logger, and the compile-status flag
/// decides success: a rejected stage is an error, never just a log line.

use std::marker::PhantomData;
use crate::error::{Error, Result};
use crate::graphics_device::ShaderHandle;
use crate::render_context::{RenderContext, RenderContextId};
use crate::shader::{ShaderSource, ShaderStageKind, SourceOrigin};
use crate::{engine_bail, engine_debug, engine_info, engine_warn};

/// One shader stage, bound to the context (and thread) that created it
///
/// ```compile_fail
/// use cube_3d_engine::cube3d::shader::Shader;
///
/// fn requires_send<T: Send>() {}
/// requires_send::<Shader>();
/// ```
pub struct Shader {
    stage: ShaderStageKind,
    handle: Option<ShaderHandle>,
    context: RenderContextId,
    source_lines: Vec<String>,
    source_origin: Option<SourceOrigin>,
    compiled: bool,
    _not_send: PhantomData<*const ()>,
}

impl Shader {
    /// Allocate a backend shader object for `stage`
    ///
    /// # Errors
    ///
    /// `BackendResourceExhausted` if the backend refuses the allocation.
    pub fn create(context: &mut RenderContext, stage: ShaderStageKind) -> Result<Self> {
        let handle = match context.device_mut().create_shader(stage) {
            Ok(handle) => handle,
            Err(error) => engine_bail!("cube3d::Shader", error),
        };

        engine_debug!("cube3d::Shader", "Created {} shader {}", stage, handle.0);

        Ok(Self {
            stage,
            handle: Some(handle),
            context: context.id(),
            source_lines: Vec::new(),
            source_origin: None,
            compiled: false,
            _not_send: PhantomData,
        })
    }

    // ===== ACCESSORS =====

    /// Stage this shader was created for
    pub fn stage(&self) -> ShaderStageKind {
        self.stage
    }

    /// Backend handle, `None` once released
    pub fn handle(&self) -> Option<ShaderHandle> {
        self.handle
    }

    /// Context that allocated the backend object
    pub fn context_id(&self) -> RenderContextId {
        self.context
    }

    /// Accumulated source lines, in append order
    pub fn source_lines(&self) -> &[String] {
        &self.source_lines
    }

    /// Path or resource the source was loaded from, if any
    pub fn source_origin(&self) -> Option<&SourceOrigin> {
        self.source_origin.as_ref()
    }

    /// Whether compilation succeeded
    pub fn is_compiled(&self) -> bool {
        self.compiled
    }

    /// Whether the backend object was released
    pub fn is_released(&self) -> bool {
        self.handle.is_none()
    }

    // ===== SOURCE =====

    /// Append source lines (chainable)
    ///
    /// Lines are taken verbatim; include the `\n` terminators when passing
    /// several lines.
    ///
    /// # Errors
    ///
    /// `AlreadyCompiled` once the shader is compiled.
    pub fn append_source<I, S>(&mut self, lines: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if self.compiled {
            engine_bail!("cube3d::Shader", Error::AlreadyCompiled { stage: self.stage });
        }
        self.source_lines.extend(lines.into_iter().map(Into::into));
        Ok(self)
    }

    /// Load source from `origin` and append it (chainable)
    ///
    /// Loader errors are propagated unchanged.
    pub fn load_source(&mut self, sources: &ShaderSource, origin: &SourceOrigin) -> Result<&mut Self> {
        if self.compiled {
            engine_bail!("cube3d::Shader", Error::AlreadyCompiled { stage: self.stage });
        }
        let lines = match sources.load(origin) {
            Ok(lines) => lines,
            Err(error) => {
                crate::engine_error!("cube3d::Shader",
                    "Error reading in source for {} shader from {}: {}", self.stage, origin, error);
                return Err(error);
            }
        };

        self.source_origin = Some(origin.clone());
        self.append_source(lines)
    }

    // ===== LIFECYCLE =====

    /// Compile the accumulated source
    ///
    /// # Errors
    ///
    /// - `EmptySource` if no line was appended (the backend is not called)
    /// - `AlreadyCompiled` on a second call
    /// - `CompileError` if the backend reports failure
    /// - `AlreadyReleased` after release
    /// - `ForeignContext` if `context` did not create this shader
    pub fn compile(&mut self, context: &mut RenderContext) -> Result<()> {
        let handle = self.live_handle()?;
        context.ensure_owner(self.context, "cube3d::Shader")?;
        if self.compiled {
            engine_bail!("cube3d::Shader", Error::AlreadyCompiled { stage: self.stage });
        }
        if self.source_lines.is_empty() {
            engine_bail!("cube3d::Shader", Error::EmptySource { stage: self.stage });
        }

        let source = self.source_lines.concat();
        let device = context.device_mut();
        device.shader_source(handle, &source);
        device.compile_shader(handle);

        let diagnostics = device.shader_info_log(handle);
        if !device.shader_compile_status(handle) {
            engine_bail!("cube3d::Shader", Error::CompileError {
                stage: self.stage,
                diagnostics: self.describe_diagnostics(diagnostics),
            });
        }

        if diagnostics.trim().is_empty() {
            engine_debug!("cube3d::Shader", "{} shader{} compiled ({} lines)",
                self.stage, self.origin_suffix(), self.source_lines.len());
        } else {
            engine_info!("cube3d::Shader", "{} shader{} compiled with diagnostics:\n{}",
                self.stage, self.origin_suffix(), diagnostics.trim_end());
        }

        self.compiled = true;
        Ok(())
    }

    /// Delete the backend object
    ///
    /// # Errors
    ///
    /// - `DoubleRelease` if the shader was already released
    /// - `ForeignContext` if `context` did not create this shader; the shader
    ///   stays live
    pub fn release(&mut self, context: &mut RenderContext) -> Result<()> {
        let Some(handle) = self.handle else {
            engine_bail!("cube3d::Shader", Error::DoubleRelease { stage: self.stage });
        };
        context.ensure_owner(self.context, "cube3d::Shader")?;
        context.device_mut().delete_shader(handle);
        self.handle = None;
        engine_debug!("cube3d::Shader", "Released {} shader {}", self.stage, handle.0);
        Ok(())
    }

    // ===== INTERNAL =====

    /// Handle of a shader that was not released yet
    pub(crate) fn live_handle(&self) -> Result<ShaderHandle> {
        match self.handle {
            Some(handle) => Ok(handle),
            None => engine_bail!("cube3d::Shader", Error::AlreadyReleased),
        }
    }

    fn origin_suffix(&self) -> String {
        match &self.source_origin {
            Some(origin) => format!(" from {}", origin),
            None => String::new(),
        }
    }

    /// Compiler output, or a placeholder when the driver returned none
    fn describe_diagnostics(&self, diagnostics: String) -> String {
        if diagnostics.trim().is_empty() {
            format!("{} shader{} failed to compile without diagnostics", self.stage, self.origin_suffix())
        } else {
            diagnostics
        }
    }
}

impl Drop for Shader {
    fn drop(&mut self) {
        if let Some(handle) = self.handle {
            engine_warn!("cube3d::Shader",
                "{} shader {} dropped without release; the backend object leaks", self.stage, handle.0);
        }
    }
}

#[cfg(test)]
#[path = "shader_tests.rs"]
mod tests;

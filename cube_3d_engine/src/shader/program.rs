/// Program - linked set of shader stages
///
/// A Program owns at most one Shader per stage. `compile()` compiles every
/// stage that is not compiled yet, attaches them all, links, and detaches
/// them again. Uniform locations are looked up on demand and cached per
/// linked program.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::marker::PhantomData;
use glam::Mat4;
use rustc_hash::FxHashMap;

use crate::error::{Error, Result};
use crate::graphics_device::ProgramHandle;
use crate::render_context::{RenderContext, RenderContextId};
use crate::shader::{Shader, ShaderStageKind};
use crate::{engine_bail, engine_debug, engine_info, engine_warn};

// ============================================================================
// UniformLocation
// ============================================================================

/// Location of a uniform inside a linked program
///
/// Names that are not active uniforms resolve to [`UniformLocation::NOT_FOUND`]
/// instead of an error, matching the GL convention of returning `-1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UniformLocation(i32);

impl UniformLocation {
    /// Sentinel for names that are not active uniforms
    pub const NOT_FOUND: UniformLocation = UniformLocation(-1);

    pub(crate) fn from_backend(location: Option<u32>) -> Self {
        location
            .and_then(|raw| i32::try_from(raw).ok())
            .map_or(Self::NOT_FOUND, UniformLocation)
    }

    /// Whether the name matched an active uniform
    pub fn is_found(self) -> bool {
        self.0 >= 0
    }

    /// Raw value, `-1` when not found
    pub fn raw(self) -> i32 {
        self.0
    }

    /// Location to hand to the backend, `None` for the sentinel
    pub fn backend_location(self) -> Option<u32> {
        u32::try_from(self.0).ok()
    }
}

// ============================================================================
// Program
// ============================================================================

/// Linked program, bound to the context (and thread) that created it
///
/// Every call that reaches the backend checks the context it is given and
/// fails with `ForeignContext` for any other one. The type is not `Send`:
///
/// ```compile_fail
/// use cube_3d_engine::cube3d::shader::Program;
///
/// fn requires_send<T: Send>() {}
/// requires_send::<Program>();
/// ```
pub struct Program {
    handle: Option<ProgramHandle>,
    context: RenderContextId,
    stages: BTreeMap<ShaderStageKind, Shader>,
    linked: bool,
    uniform_cache: FxHashMap<String, UniformLocation>,
    _not_send: PhantomData<*const ()>,
}

impl Program {
    /// Allocate a backend program object
    ///
    /// # Errors
    ///
    /// `BackendResourceExhausted` if the backend refuses the allocation.
    pub fn create(context: &mut RenderContext) -> Result<Self> {
        let handle = match context.device_mut().create_program() {
            Ok(handle) => handle,
            Err(error) => engine_bail!("cube3d::Program", error),
        };

        engine_debug!("cube3d::Program", "Created program {}", handle.0);

        Ok(Self {
            handle: Some(handle),
            context: context.id(),
            stages: BTreeMap::new(),
            linked: false,
            uniform_cache: FxHashMap::default(),
            _not_send: PhantomData,
        })
    }

    // ===== ACCESSORS =====

    /// Backend handle, `None` once released
    pub fn handle(&self) -> Option<ProgramHandle> {
        self.handle
    }

    /// Context that allocated the backend object
    pub fn context_id(&self) -> RenderContextId {
        self.context
    }

    /// Whether the last compile + link succeeded
    pub fn is_linked(&self) -> bool {
        self.linked
    }

    pub fn is_released(&self) -> bool {
        self.handle.is_none()
    }

    /// Number of configured stages
    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    /// Configured stage of `kind`, without creating it
    pub fn shader(&self, kind: ShaderStageKind) -> Option<&Shader> {
        self.stages.get(&kind)
    }

    // ===== STAGES =====

    /// Get the stage of `kind`, creating it on first request
    ///
    /// # Errors
    ///
    /// - `AlreadyLinked` when a new stage is requested on a linked program
    /// - `BackendResourceExhausted` if the shader object cannot be allocated
    /// - `AlreadyReleased` after release
    /// - `ForeignContext` if `context` did not create this program
    pub fn stage(&mut self, context: &mut RenderContext, kind: ShaderStageKind) -> Result<&mut Shader> {
        self.owned_handle(context)?;

        match self.stages.entry(kind) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                if self.linked {
                    engine_bail!("cube3d::Program", Error::AlreadyLinked);
                }
                let shader = Shader::create(context, kind)?;
                Ok(entry.insert(shader))
            }
        }
    }

    // ===== LINKING =====

    /// Compile every stage, then link them into the program
    ///
    /// Stages compile in `ShaderStageKind` order and the first failure aborts.
    /// The link info log is always reported to the engine logger.
    ///
    /// # Errors
    ///
    /// - `NoStages` if no stage was configured
    /// - `CompileError` / `EmptySource` from the first failing stage
    /// - `LinkError` if the backend rejects the link
    /// - `AlreadyLinked` if the program is already linked
    /// - `AlreadyReleased` after release
    /// - `ForeignContext` if `context` did not create this program
    pub fn compile(&mut self, context: &mut RenderContext) -> Result<()> {
        let handle = self.owned_handle(context)?;
        if self.linked {
            engine_bail!("cube3d::Program", Error::AlreadyLinked);
        }
        if self.stages.is_empty() {
            engine_bail!("cube3d::Program", Error::NoStages);
        }

        for shader in self.stages.values_mut() {
            if !shader.is_compiled() {
                shader.compile(context)?;
            }
        }

        let mut attached = Vec::with_capacity(self.stages.len());
        for shader in self.stages.values() {
            attached.push(shader.live_handle()?);
        }

        let device = context.device_mut();
        for &shader in &attached {
            device.attach_shader(handle, shader);
        }
        device.link_program(handle);
        let diagnostics = device.program_info_log(handle);
        let linked = device.program_link_status(handle);
        for &shader in &attached {
            device.detach_shader(handle, shader);
        }

        if !linked {
            let diagnostics = if diagnostics.trim().is_empty() {
                format!("program {} failed to link without diagnostics", handle.0)
            } else {
                diagnostics
            };
            engine_bail!("cube3d::Program", Error::LinkError { diagnostics });
        }

        if diagnostics.trim().is_empty() {
            engine_debug!("cube3d::Program", "Program {} linked ({} stages)", handle.0, attached.len());
        } else {
            engine_info!("cube3d::Program", "Program {} linked with diagnostics:\n{}",
                handle.0, diagnostics.trim_end());
        }

        self.linked = true;
        self.uniform_cache.clear();
        Ok(())
    }

    // ===== USE =====

    /// Make this program the context's active program
    ///
    /// # Errors
    ///
    /// `NotLinked` before a successful compile, `AlreadyReleased` after release,
    /// `ForeignContext` on a context that did not create this program.
    pub fn use_program(&self, context: &mut RenderContext) -> Result<()> {
        let handle = self.linked_handle(context)?;
        context.bind_program(handle);
        Ok(())
    }

    /// Look up `name` among the active uniforms
    ///
    /// Unknown names return [`UniformLocation::NOT_FOUND`].
    ///
    /// # Errors
    ///
    /// As for `use_program`.
    pub fn uniform_location(&mut self, context: &RenderContext, name: &str) -> Result<UniformLocation> {
        let handle = self.linked_handle(context)?;

        if let Some(location) = self.uniform_cache.get(name) {
            return Ok(*location);
        }

        let location = UniformLocation::from_backend(context.device().uniform_location(handle, name));
        self.uniform_cache.insert(name.to_string(), location);
        Ok(location)
    }

    /// Write a 4x4 matrix uniform of this program
    ///
    /// Unknown names are skipped with a warning.
    ///
    /// # Errors
    ///
    /// - `ProgramNotActive` unless this program is the context's active program
    /// - `NotLinked` / `AlreadyReleased` / `ForeignContext` as for `use_program`
    pub fn set_uniform_mat4(&mut self, context: &mut RenderContext, name: &str, matrix: &Mat4) -> Result<()> {
        let handle = self.linked_handle(context)?;
        if context.active_program() != Some(handle) {
            engine_bail!("cube3d::Program", Error::ProgramNotActive);
        }

        let location = self.uniform_location(context, name)?;
        if !location.is_found() {
            engine_warn!("cube3d::Program",
                "Uniform {} is not active in program {}, write skipped", name, handle.0);
            return Ok(());
        }

        context.upload_uniform_mat4(location, matrix)
    }

    // ===== RELEASE =====

    /// Delete the program and every stage it owns
    ///
    /// All stages are released even if one fails; the first error is returned.
    ///
    /// # Errors
    ///
    /// `AlreadyReleased` on a second call. `ForeignContext` if `context` did
    /// not create this program; nothing is deleted in that case.
    pub fn release(&mut self, context: &mut RenderContext) -> Result<()> {
        let handle = self.owned_handle(context)?;

        context.device_mut().delete_program(handle);
        context.forget_program(handle);
        self.handle = None;
        self.linked = false;
        self.uniform_cache.clear();

        let mut first_error = None;
        for (_, mut shader) in std::mem::take(&mut self.stages) {
            if let Err(error) = shader.release(context) {
                first_error.get_or_insert(error);
            }
        }

        engine_debug!("cube3d::Program", "Released program {}", handle.0);

        match first_error {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    // ===== INTERNAL =====

    fn live_handle(&self) -> Result<ProgramHandle> {
        match self.handle {
            Some(handle) => Ok(handle),
            None => engine_bail!("cube3d::Program", Error::AlreadyReleased),
        }
    }

    /// Live handle, checked against the context about to use it
    fn owned_handle(&self, context: &RenderContext) -> Result<ProgramHandle> {
        let handle = self.live_handle()?;
        context.ensure_owner(self.context, "cube3d::Program")?;
        Ok(handle)
    }

    fn linked_handle(&self, context: &RenderContext) -> Result<ProgramHandle> {
        let handle = self.owned_handle(context)?;
        if !self.linked {
            engine_bail!("cube3d::Program", Error::NotLinked);
        }
        Ok(handle)
    }
}

impl Drop for Program {
    fn drop(&mut self) {
        if let Some(handle) = self.handle {
            engine_warn!("cube3d::Program",
                "Program {} dropped without release; the backend object leaks", handle.0);
        }
    }
}

#[cfg(test)]
#[path = "program_tests.rs"]
mod tests;

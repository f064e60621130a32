//! Render context - explicit handle over one graphics context
//!
//! The backend has one implicit "currently active program" per context.
//! `RenderContext` makes that state explicit: `Program::use_program` records
//! itself here, uniform uploads read it, and releasing the active program
//! clears it.
//!
//! A `RenderContext` is neither `Send` nor `Sync`. GL calls are only valid on
//! the thread that made the context current, and every shader/program
//! operation needs `&mut RenderContext`, so the compiler keeps them there:
//!
//! ```compile_fail
//! use cube_3d_engine::cube3d::RenderContext;
//!
//! fn requires_send<T: Send>(_: T) {}
//!
//! fn move_to_other_thread(context: RenderContext) {
//!     requires_send(context);
//! }
//! ```
//!
//! Every shader, program and mesh records the id of the context that
//! allocated it and rejects any other context with `Error::ForeignContext`.

use std::marker::PhantomData;
use std::sync::atomic::{AtomicU64, Ordering};
use glam::Mat4;
use crate::error::{Error, Result};
use crate::graphics_device::{GraphicsDevice, ProgramHandle};
use crate::shader::UniformLocation;

static NEXT_CONTEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a `RenderContext`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RenderContextId(u64);

/// Owner of the backend device and of the context-scoped active program
pub struct RenderContext {
    id: RenderContextId,
    device: Box<dyn GraphicsDevice>,
    active_program: Option<ProgramHandle>,
    _not_send: PhantomData<*const ()>,
}

impl RenderContext {
    /// Wrap a backend device; must be called on the thread owning the context
    pub fn new(device: Box<dyn GraphicsDevice>) -> Self {
        Self {
            id: RenderContextId(NEXT_CONTEXT_ID.fetch_add(1, Ordering::Relaxed)),
            device,
            active_program: None,
            _not_send: PhantomData,
        }
    }

    pub fn id(&self) -> RenderContextId {
        self.id
    }

    /// Fail unless `owner` is this context
    pub(crate) fn ensure_owner(&self, owner: RenderContextId, source: &str) -> Result<()> {
        if owner != self.id {
            crate::engine_bail!(source, Error::ForeignContext);
        }
        Ok(())
    }

    /// Backend access for collaborators (vertex upload, frame state)
    pub fn device(&self) -> &dyn GraphicsDevice {
        self.device.as_ref()
    }

    /// Mutable backend access for collaborators
    pub fn device_mut(&mut self) -> &mut dyn GraphicsDevice {
        self.device.as_mut()
    }

    /// Program installed by the last `Program::use_program`, if any
    pub fn active_program(&self) -> Option<ProgramHandle> {
        self.active_program
    }

    /// Install `program` on the backend and remember it as active
    pub(crate) fn bind_program(&mut self, program: ProgramHandle) {
        self.device.use_program(Some(program));
        self.active_program = Some(program);
    }

    /// Forget `program` if it is the active one (called when it is deleted)
    pub(crate) fn forget_program(&mut self, program: ProgramHandle) {
        if self.active_program == Some(program) {
            self.clear_active_program();
        }
    }

    /// Unbind any active program
    pub fn clear_active_program(&mut self) {
        if self.active_program.take().is_some() {
            self.device.use_program(None);
        }
    }

    /// Write a 4x4 matrix (column-major) to `location` of the active program
    ///
    /// The "not found" location is skipped with a warning instead of being
    /// handed to the backend.
    ///
    /// # Errors
    ///
    /// `Error::NoActiveProgram` if no program is bound.
    pub fn upload_uniform_mat4(&mut self, location: UniformLocation, matrix: &Mat4) -> Result<()> {
        if self.active_program.is_none() {
            crate::engine_bail!("cube3d::RenderContext", Error::NoActiveProgram);
        }

        let Some(raw) = location.backend_location() else {
            crate::engine_warn!("cube3d::RenderContext",
                "Skipping matrix upload to a uniform location that was not found");
            return Ok(());
        };

        self.device.uniform_matrix4(raw, &matrix.to_cols_array());
        Ok(())
    }
}

#[cfg(test)]
#[path = "render_context_tests.rs"]
mod tests;

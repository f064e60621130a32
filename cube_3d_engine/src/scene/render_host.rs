/// RenderHost - lifecycle callbacks of a windowing/rendering host
///
/// A windowing layer owns the GL context and calls back into the scene:
/// once at init, on every resize, once per frame and once at shutdown.
/// `FrameDriver` wraps a host and enforces that order, so a host never
/// sees a frame before init or a second shutdown.

use std::fmt;
use crate::error::{Error, Result};
use crate::render_context::RenderContext;
use crate::{engine_bail, engine_debug, engine_info};

/// Callbacks driven by the windowing layer, always on the context thread
pub trait RenderHost {
    /// Create programs and upload geometry
    fn on_init(&mut self, context: &mut RenderContext) -> Result<()>;

    /// The drawable was resized to `width` x `height` pixels
    fn on_resize(&mut self, context: &mut RenderContext, width: u32, height: u32) -> Result<()>;

    /// Render one frame
    fn on_frame(&mut self, context: &mut RenderContext) -> Result<()>;

    /// Release every backend object created by the host
    fn on_shutdown(&mut self, context: &mut RenderContext) -> Result<()>;
}

// ============================================================================
// FrameDriver
// ============================================================================

/// Lifecycle phase of a driven host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostPhase {
    /// `init` not called yet
    Created,
    /// Initialized; resize and frame calls are accepted
    Running,
    /// `on_init` failed; only `shutdown` is accepted
    Failed,
    /// Shut down; nothing is accepted
    ShutDown,
}

impl fmt::Display for HostPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HostPhase::Created => "created",
            HostPhase::Running => "running",
            HostPhase::Failed => "failed",
            HostPhase::ShutDown => "shut down",
        };
        f.write_str(name)
    }
}

/// Call-order guard around a `RenderHost`
pub struct FrameDriver<H: RenderHost> {
    host: H,
    phase: HostPhase,
    frame_count: u64,
}

impl<H: RenderHost> FrameDriver<H> {
    pub fn new(host: H) -> Self {
        Self {
            host,
            phase: HostPhase::Created,
            frame_count: 0,
        }
    }

    // ===== ACCESSORS =====

    pub fn phase(&self) -> HostPhase {
        self.phase
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Frames rendered successfully since init
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Give the host back (e.g. after shutdown)
    pub fn into_host(self) -> H {
        self.host
    }

    // ===== LIFECYCLE =====

    /// Initialize the host; accepted once
    ///
    /// On failure the error is logged and the driver enters `Failed`.
    pub fn init(&mut self, context: &mut RenderContext) -> Result<()> {
        self.expect_phase(HostPhase::Created, "init")?;

        match self.host.on_init(context) {
            Ok(()) => {
                self.phase = HostPhase::Running;
                engine_info!("cube3d::FrameDriver", "Render host initialized");
                Ok(())
            }
            Err(error) => {
                self.phase = HostPhase::Failed;
                engine_bail!("cube3d::FrameDriver", error);
            }
        }
    }

    /// Forward a resize; only while running
    pub fn resize(&mut self, context: &mut RenderContext, width: u32, height: u32) -> Result<()> {
        self.expect_phase(HostPhase::Running, "resize")?;
        engine_debug!("cube3d::FrameDriver", "Resize to {}x{}", width, height);
        self.host.on_resize(context, width, height)
    }

    /// Render one frame; only while running
    pub fn frame(&mut self, context: &mut RenderContext) -> Result<()> {
        self.expect_phase(HostPhase::Running, "frame")?;
        self.host.on_frame(context)?;
        self.frame_count += 1;
        Ok(())
    }

    /// Shut the host down; accepted once
    ///
    /// A host that was never initialized has nothing to release, so
    /// `on_shutdown` only runs for running or failed hosts.
    pub fn shutdown(&mut self, context: &mut RenderContext) -> Result<()> {
        let previous = self.phase;
        if previous == HostPhase::ShutDown {
            engine_bail!("cube3d::FrameDriver",
                Error::HostState("shutdown called on a host that is already shut down".to_string()));
        }

        self.phase = HostPhase::ShutDown;
        if previous == HostPhase::Created {
            return Ok(());
        }

        self.host.on_shutdown(context)?;
        engine_info!("cube3d::FrameDriver", "Render host shut down after {} frames", self.frame_count);
        Ok(())
    }

    fn expect_phase(&self, expected: HostPhase, call: &str) -> Result<()> {
        if self.phase != expected {
            engine_bail!("cube3d::FrameDriver", Error::HostState(format!(
                "{} called on a host that is {} (expected {})", call, self.phase, expected
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "frame_driver_tests.rs"]
mod tests;

//! Host lifecycle and render-surface contracts

use cadence_core::Result;

/// The lifecycle a host supplies to the loop controller
///
/// The controller owns the instance and drives it from the scheduler thread:
/// `start` runs exactly once before the first time measurement, `update` once
/// per simulation tick with the fixed step, and `render` at most once per
/// iteration that produced at least one tick, after that iteration's updates.
///
/// Errors are not caught or retried — a failing callback terminates the
/// scheduler thread and surfaces from `stop()` (or the next `start()`).
pub trait Game: Send {
    /// Called once when the loop starts
    fn start(&mut self) -> Result<()>;

    /// Called once per simulation tick; `dt` is the configured fixed step
    fn update(&mut self, dt: f64) -> Result<()>;

    /// Called after the ticks of an iteration, before the redraw request
    fn render(&mut self) -> Result<()>;
}

/// The drawable area that owns presentation
///
/// Requests are fire-and-forget: the platform may coalesce or drop them, and
/// the scheduler never waits for a paint to complete.
pub trait Surface: Send + Sync {
    /// Ask the platform to schedule a repaint
    fn request_redraw(&self);

    /// Ask the platform to direct input events at this surface
    fn request_focus(&self);
}

impl Surface for winit::window::Window {
    fn request_redraw(&self) {
        winit::window::Window::request_redraw(self);
    }

    fn request_focus(&self) {
        self.focus_window();
    }
}

/// Surface for headless hosts and tests; ignores every request
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSurface;

impl Surface for NullSurface {
    fn request_redraw(&self) {}
    fn request_focus(&self) {}
}

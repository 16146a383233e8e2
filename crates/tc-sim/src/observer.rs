//! World observer trait for progress reporting and data collection.

use tc_world::{PhysicsReport, World};

/// Callbacks invoked by [`Sim`][crate::Sim] and the
/// [`GameLoop`][crate::GameLoop] consumer as events are applied.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.  Observers run on the consumer, so they
/// must not block.
///
/// # Example — delivery counter
///
/// ```rust,ignore
/// struct Deliveries(usize);
///
/// impl WorldObserver for Deliveries {
///     fn on_physics(&mut self, report: &PhysicsReport) {
///         self.0 += report.delivered.len();
///     }
/// }
/// ```
pub trait WorldObserver: Send {
    /// Called after every physics tick, including paused ones (whose
    /// report has `advanced == SimTime::ZERO`).
    fn on_physics(&mut self, _report: &PhysicsReport) {}

    /// Called after each top-level event has been applied.
    fn on_event(&mut self, _kind: &'static str, _world: &World) {}
}

/// A [`WorldObserver`] that does nothing.
pub struct NoopObserver;

impl WorldObserver for NoopObserver {}

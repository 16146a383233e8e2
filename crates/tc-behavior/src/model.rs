//! The `AiSystem` trait — the slow-tick extension point.

use crate::{Event, Snapshot};

/// A decision maker run once per AI tick.
///
/// `decide` only reads the [`Snapshot`]; every change it wants is returned
/// as an [`Event`] and applied later by the world's single consumer.  State
/// an implementation keeps between ticks (rate limiters, outstanding event
/// outcomes) lives in `self`.
///
/// Systems run off the consumer's thread, hence `Send + 'static`.
pub trait AiSystem: Send + 'static {
    /// Name used in logs.
    fn name(&self) -> &'static str;

    /// Produce this tick's events.  An empty `Vec` means "nothing to do".
    fn decide(&mut self, snapshot: &Snapshot) -> Vec<Event>;
}

impl<A: AiSystem + ?Sized> AiSystem for Box<A> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn decide(&mut self, snapshot: &Snapshot) -> Vec<Event> {
        (**self).decide(snapshot)
    }
}

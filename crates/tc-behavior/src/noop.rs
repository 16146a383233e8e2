//! An AI system that never acts.

use crate::{AiSystem, Event, Snapshot};

/// An [`AiSystem`] that always returns no events.
///
/// Useful in tests that drive the world purely through explicit events.
pub struct NoopAi;

impl AiSystem for NoopAi {
    fn name(&self) -> &'static str {
        "noop"
    }

    fn decide(&mut self, _snapshot: &Snapshot) -> Vec<Event> {
        vec![]
    }
}

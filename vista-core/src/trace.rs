//! Instrumentation hook for the interaction engines.
//!
//! Trackers call into an optional [`TraceSink`] at each step. Every method
//! defaults to a no-op, so a sink only implements the events it cares about.
//! Tests use this to count per-element callbacks; hosts can forward it to a
//! profiler or logger.

use crate::transform::TiltTransform;

/// Identifies an element inside one tracker, assigned at registration time.
///
/// Ids are only unique within the tracker that issued them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotId(pub u32);

/// Why an element was revealed
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RevealCause {
    /// A visibility tick reported it past the threshold
    Visible,
    /// No visibility primitive was available, so it was revealed on register
    FailOpen,
}

/// Why a pointer move produced no transform
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TiltSkip {
    /// The element's box had no area or a non-finite edge
    DegenerateBounds,
    /// The pointer position itself was not finite
    NonFinitePointer,
}

/// Receives engine events. All methods default to no-ops.
pub trait TraceSink {
    /// An element entered a reveal watch set.
    fn watch_started(&mut self, _id: SlotId) {}

    /// A visibility entry for a watched element was processed.
    fn visibility_processed(&mut self, _id: SlotId, _ratio: f32) {}

    /// An element flipped to revealed and left the watch set.
    fn revealed(&mut self, _id: SlotId, _cause: RevealCause) {}

    /// A reveal tracker released its watch set.
    fn reveal_teardown(&mut self, _released: usize) {}

    /// Pointer tracking was attached to an element.
    fn tilt_attached(&mut self, _id: SlotId) {}

    /// A pointer move produced a new transform.
    fn tilt_applied(&mut self, _id: SlotId, _transform: &TiltTransform) {}

    /// A pointer move was dropped without touching the element.
    fn tilt_skipped(&mut self, _id: SlotId, _reason: TiltSkip) {}

    /// Pointer left an element and its transform was cleared.
    fn tilt_reset(&mut self, _id: SlotId) {}

    /// A tilt interactor released its targets.
    fn tilt_teardown(&mut self, _released: usize) {}
}

/// Wraps an optional boxed sink so call sites stay one line each.
#[derive(Default)]
pub(crate) struct Tracer {
    sink: Option<Box<dyn TraceSink>>,
}

impl Tracer {
    pub(crate) fn set(&mut self, sink: Box<dyn TraceSink>) {
        self.sink = Some(sink);
    }

    #[inline]
    pub(crate) fn emit(&mut self, f: impl FnOnce(&mut dyn TraceSink)) {
        if let Some(sink) = self.sink.as_deref_mut() {
            f(sink);
        }
    }
}

impl core::fmt::Debug for Tracer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer")
            .field("attached", &self.sink.is_some())
            .finish()
    }
}

//! Pointer-relative tilt
//!
//! While the pointer is over a registered element, every move recomputes a
//! rotation proportional to the pointer's offset from the element's center.
//! Leaving the element restores the identity transform. Nothing is smoothed
//! or remembered between moves.
use crate::config::TiltConfig;
use crate::geometry::{Point, Rect};
use crate::trace::{SlotId, TiltSkip, TraceSink, Tracer};
use crate::transform::{Rotation, TiltTransform};

/// Transient per-element hover state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TiltState {
    pub pointer_active: bool,
    pub rotation: Rotation,
    pub scale: f32,
}

impl TiltState {
    pub fn idle() -> Self {
        Self {
            pointer_active: false,
            rotation: Rotation::zero(),
            scale: 1.0,
        }
    }
}

impl Default for TiltState {
    fn default() -> Self {
        Self::idle()
    }
}

/// A registered element and its current hover state
#[derive(Debug, Clone)]
pub struct TiltTarget<H> {
    handle: H,
    id: SlotId,
    state: TiltState,
}

impl<H> TiltTarget<H> {
    pub fn handle(&self) -> &H {
        &self.handle
    }

    pub fn id(&self) -> SlotId {
        self.id
    }

    pub fn state(&self) -> TiltState {
        self.state
    }
}

/// Compute the tilt for a pointer at `pointer` over `bounds`.
///
/// Returns `None` for boxes with no width or height, or non-finite input.
pub fn compute_tilt(config: &TiltConfig, bounds: &Rect, pointer: Point) -> Option<TiltTransform> {
    if bounds.is_degenerate() || !pointer.x.is_finite() || !pointer.y.is_finite() {
        return None;
    }

    let nx = ((pointer.x - bounds.left) / bounds.width - 0.5).clamp(-0.5, 0.5);
    let ny = ((pointer.y - bounds.top) / bounds.height - 0.5).clamp(-0.5, 0.5);

    // `+ 0.0` folds negative zero so the center reads as a clean 0
    let rotation = Rotation::new(
        ny * config.max_tilt_deg + 0.0,
        nx * -config.max_tilt_deg + 0.0,
    );

    Some(TiltTransform::new(rotation, config.hover_scale, config.perspective))
}

/// Tracks pointer tilt over a set of elements
pub struct TiltInteractor<H> {
    config: TiltConfig,
    targets: Vec<TiltTarget<H>>,
    next_id: u32,
    tracer: Tracer,
}

impl<H> TiltInteractor<H>
where
    H: PartialEq + Clone,
{
    pub fn new(config: TiltConfig) -> Self {
        Self {
            config,
            targets: Vec::new(),
            next_id: 0,
            tracer: Tracer::default(),
        }
    }

    pub fn with_trace_sink(mut self, sink: Box<dyn TraceSink>) -> Self {
        self.tracer.set(sink);
        self
    }

    pub fn config(&self) -> &TiltConfig {
        &self.config
    }

    pub fn targets(&self) -> &[TiltTarget<H>] {
        &self.targets
    }

    /// Current hover state of `handle`, if registered
    pub fn state(&self, handle: &H) -> Option<TiltState> {
        self.find(handle).map(|target| target.state)
    }

    /// Attach pointer tracking to `elements`.
    ///
    /// Returns only the handles that were not already registered, so the host
    /// attaches exactly one listener pair per element.
    pub fn register<I>(&mut self, elements: I) -> Vec<H>
    where
        I: IntoIterator<Item = H>,
    {
        let mut attached = Vec::new();

        for handle in elements {
            if self.find(&handle).is_some() {
                continue;
            }

            let id = SlotId(self.next_id);
            self.next_id += 1;
            self.targets.push(TiltTarget {
                handle: handle.clone(),
                id,
                state: TiltState::idle(),
            });
            self.tracer.emit(|s| s.tilt_attached(id));
            attached.push(handle);
        }

        attached
    }

    /// Handle a pointer move over `handle`.
    ///
    /// Returns the transform to apply, or `None` when the element is not
    /// registered or its bounds are degenerate (the previous transform is
    /// left as is).
    pub fn pointer_move(&mut self, handle: &H, bounds: Rect, pointer: Point) -> Option<TiltTransform> {
        let config = self.config;
        let index = self.targets.iter().position(|t| &t.handle == handle)?;
        let id = self.targets[index].id;

        let Some(transform) = compute_tilt(&config, &bounds, pointer) else {
            let reason = if bounds.is_degenerate() {
                log::trace!("skipping tilt for degenerate bounds {bounds:?}");
                TiltSkip::DegenerateBounds
            } else {
                log::trace!("skipping tilt for non-finite pointer {pointer:?}");
                TiltSkip::NonFinitePointer
            };
            self.tracer.emit(|s| s.tilt_skipped(id, reason));
            return None;
        };

        self.targets[index].state = TiltState {
            pointer_active: true,
            rotation: transform.rotation,
            scale: transform.scale,
        };
        self.tracer.emit(|s| s.tilt_applied(id, &transform));

        Some(transform)
    }

    /// Handle the pointer leaving `handle`: returns the identity transform,
    /// whether or not a move was seen first.
    pub fn pointer_leave(&mut self, handle: &H) -> Option<TiltTransform> {
        let target = self.targets.iter_mut().find(|t| &t.handle == handle)?;
        target.state = TiltState::idle();
        let id = target.id;
        self.tracer.emit(|s| s.tilt_reset(id));

        Some(TiltTransform::identity())
    }

    /// Release every target. Later events for them are ignored.
    pub fn teardown(&mut self) {
        if self.targets.is_empty() {
            return;
        }

        let released = self.targets.len();
        self.targets.clear();
        log::trace!("tilt interactor torn down, released {released} element(s)");
        self.tracer.emit(|s| s.tilt_teardown(released));
    }

    fn find(&self, handle: &H) -> Option<&TiltTarget<H>> {
        self.targets.iter().find(|t| &t.handle == handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::testing::CountingSink;

    fn card() -> Rect {
        Rect::new(100.0, 200.0, 400.0, 300.0)
    }

    fn interactor() -> TiltInteractor<&'static str> {
        let mut interactor = TiltInteractor::new(TiltConfig::default());
        interactor.register(["hero", "team"]);
        interactor
    }

    #[test]
    fn test_center_is_flat() {
        let transform = compute_tilt(&TiltConfig::default(), &card(), Point::new(300.0, 350.0)).unwrap();
        assert_eq!(transform.rotation, Rotation::zero());
        assert_eq!(transform.scale, 1.02);
        assert_eq!(transform.perspective, Some(900.0));
    }

    #[test]
    fn test_corner_angles() {
        let config = TiltConfig::default();
        // Top-left corner: pointer up and to the left
        let transform = compute_tilt(&config, &card(), Point::new(100.0, 200.0)).unwrap();
        assert!((transform.rotation.x_deg + 3.0).abs() < 1e-5);
        assert!((transform.rotation.y_deg - 3.0).abs() < 1e-5);

        // Three quarters across, one quarter down
        let transform = compute_tilt(&config, &card(), Point::new(400.0, 275.0)).unwrap();
        assert!((transform.rotation.x_deg + 1.5).abs() < 1e-5);
        assert!((transform.rotation.y_deg + 1.5).abs() < 1e-5);
    }

    #[test]
    fn test_rotation_stays_in_bounds() {
        let config = TiltConfig::default();
        let bounds = card();
        for step_x in 0..20 {
            for step_y in 0..20 {
                let pointer = Point::new(
                    bounds.left + bounds.width * step_x as f32 / 20.0,
                    bounds.top + bounds.height * step_y as f32 / 20.0,
                );
                let transform = compute_tilt(&config, &bounds, pointer).unwrap();
                assert!(transform.rotation.x_deg.abs() <= 6.0);
                assert!(transform.rotation.y_deg.abs() <= 6.0);
            }
        }

        // A stale box can put the pointer outside; the offset is clamped
        let transform = compute_tilt(&config, &bounds, Point::new(-5000.0, 9000.0)).unwrap();
        assert_eq!(transform.rotation, Rotation::new(3.0, 3.0));
    }

    #[test]
    fn test_degenerate_box_is_skipped() {
        let sink = CountingSink::default();
        let mut interactor = TiltInteractor::new(TiltConfig::default()).with_trace_sink(Box::new(sink.clone()));
        interactor.register([7u32]);

        let zero_width = Rect::new(10.0, 10.0, 0.0, 50.0);
        assert_eq!(interactor.pointer_move(&7, zero_width, Point::new(10.0, 20.0)), None);
        assert_eq!(interactor.state(&7), Some(TiltState::idle()));
        assert_eq!(sink.0.borrow().skipped, vec![TiltSkip::DegenerateBounds]);

        // An earlier transform survives a degenerate event
        interactor.pointer_move(&7, card(), Point::new(120.0, 210.0)).unwrap();
        let before = interactor.state(&7).unwrap();
        interactor.pointer_move(&7, Rect::new(0.0, 0.0, 40.0, 0.0), Point::new(1.0, 1.0));
        assert_eq!(interactor.state(&7), Some(before));
    }

    #[test]
    fn test_non_finite_pointer_is_skipped() {
        let sink = CountingSink::default();
        let mut interactor = TiltInteractor::new(TiltConfig::default()).with_trace_sink(Box::new(sink.clone()));
        interactor.register([7u32]);

        assert_eq!(interactor.pointer_move(&7, card(), Point::new(f32::NAN, 250.0)), None);
        assert_eq!(interactor.pointer_move(&7, card(), Point::new(150.0, f32::INFINITY)), None);
        assert_eq!(interactor.state(&7), Some(TiltState::idle()));
        assert_eq!(
            sink.0.borrow().skipped,
            vec![TiltSkip::NonFinitePointer, TiltSkip::NonFinitePointer]
        );
    }

    #[test]
    fn test_every_move_recomputes() {
        let sink = CountingSink::default();
        let mut interactor = TiltInteractor::new(TiltConfig::default()).with_trace_sink(Box::new(sink.clone()));
        interactor.register(["hero"]);

        let moves = [Point::new(110.0, 210.0), Point::new(490.0, 490.0), Point::new(300.0, 350.0)];
        for pointer in moves {
            interactor.pointer_move(&"hero", card(), pointer).unwrap();
        }

        // Last write wins
        let state = interactor.state(&"hero").unwrap();
        assert!(state.pointer_active);
        assert_eq!(state.rotation, Rotation::zero());
        assert_eq!(sink.0.borrow().applied.get(&SlotId(0)), Some(&3));
    }

    #[test]
    fn test_leave_resets_to_identity() {
        let mut interactor = interactor();
        interactor.pointer_move(&"hero", card(), Point::new(480.0, 220.0)).unwrap();

        let transform = interactor.pointer_leave(&"hero").unwrap();
        assert!(transform.is_identity());
        assert_eq!(interactor.state(&"hero"), Some(TiltState::idle()));

        // Leave without any preceding move
        let transform = interactor.pointer_leave(&"team").unwrap();
        assert!(transform.is_identity());
    }

    #[test]
    fn test_register_is_idempotent() {
        let sink = CountingSink::default();
        let mut interactor = TiltInteractor::new(TiltConfig::default()).with_trace_sink(Box::new(sink.clone()));

        assert_eq!(interactor.register(["a", "b"]), vec!["a", "b"]);
        assert_eq!(interactor.register(["b", "c"]), vec!["c"]);
        assert_eq!(interactor.targets().len(), 3);
        assert_eq!(sink.0.borrow().attached, 3);
    }

    #[test]
    fn test_teardown_safety() {
        let sink = CountingSink::default();
        let mut interactor: TiltInteractor<&str> =
            TiltInteractor::new(TiltConfig::default()).with_trace_sink(Box::new(sink.clone()));

        // Before any register
        interactor.teardown();

        interactor.register(["hero", "team"]);
        interactor.teardown();
        interactor.teardown();

        assert_eq!(interactor.pointer_move(&"hero", card(), Point::new(150.0, 250.0)), None);
        assert_eq!(interactor.pointer_leave(&"team"), None);

        let counts = sink.0.borrow();
        assert_eq!(counts.tilt_teardowns, vec![2]);
        assert!(counts.applied.is_empty());
        assert_eq!(counts.resets, 0);
    }

    #[test]
    fn test_unknown_target_is_ignored() {
        let mut interactor = interactor();
        assert_eq!(interactor.pointer_move(&"footer", card(), Point::new(150.0, 250.0)), None);
        assert_eq!(interactor.pointer_leave(&"footer"), None);
    }
}

//! One-shot reveal on viewport entry
//!
//! A [`RevealTracker`] watches host-owned [`WatchedElement`]s through a
//! [`VisibilityObserver`]. The first time an element is reported at or past
//! the configured threshold it is flipped to revealed, unobserved and dropped
//! from the watch set. It is never watched again.
//!
//! Elements are identified by their handle, not by the wrapper: two
//! `WatchedElement`s around the same handle share one watch slot, and a
//! handle this tracker has revealed is refused on later registrations.
//!
//! Without an observer the tracker fails open: every registered element is
//! revealed immediately so content is never left hidden.
use std::cell::Cell;
use std::rc::{Rc, Weak};

use crate::config::RevealConfig;
use crate::geometry::{intersection_ratio, Rect};
use crate::trace::{RevealCause, SlotId, TraceSink, Tracer};

/// A host-owned element with a one-way `revealed` flag
#[derive(Debug)]
pub struct WatchedElement<H> {
    handle: H,
    revealed: Cell<bool>,
}

impl<H> WatchedElement<H> {
    pub fn new(handle: H) -> Self {
        Self {
            handle,
            revealed: Cell::new(false),
        }
    }

    pub fn handle(&self) -> &H {
        &self.handle
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed.get()
    }

    /// Returns true only on the transition from hidden to revealed
    fn mark_revealed(&self) -> bool {
        !self.revealed.replace(true)
    }
}

/// One visibility measurement delivered by the host
#[derive(Debug, Clone, PartialEq)]
pub struct VisibilityEntry<H> {
    pub target: H,
    pub is_intersecting: bool,
    /// Visible fraction of the target, in `[0, 1]`
    pub ratio: f32,
}

impl<H> VisibilityEntry<H> {
    pub fn new(target: H, is_intersecting: bool, ratio: f32) -> Self {
        Self {
            target,
            is_intersecting,
            ratio,
        }
    }
}

/// The platform's visibility-observation primitive
pub trait VisibilityObserver<H> {
    fn observe(&mut self, target: &H);
    fn unobserve(&mut self, target: &H);
    fn disconnect(&mut self);
}

/// Observer that measures visibility from plain rectangles.
///
/// Used by hosts without a native intersection observer: the host reports the
/// viewport and each target's bounds, and [`sample`](Self::sample) produces
/// the entries an intersection observer would have delivered.
#[derive(Debug, Clone)]
pub struct GeometryObserver<H> {
    targets: Vec<H>,
}

impl<H: PartialEq + Clone> GeometryObserver<H> {
    pub fn new() -> Self {
        Self {
            targets: Vec::new(),
        }
    }

    pub fn targets(&self) -> &[H] {
        &self.targets
    }

    /// Measure every observed target against `config`'s root.
    ///
    /// Targets whose bounds are unknown (`None`) are left out of the batch.
    pub fn sample<F>(&self, viewport: &Rect, config: &RevealConfig, bounds_of: F) -> Vec<VisibilityEntry<H>>
    where
        F: Fn(&H) -> Option<Rect>,
    {
        self.targets
            .iter()
            .filter_map(|target| {
                let bounds = bounds_of(target)?;
                let entry = match intersection_ratio(&bounds, viewport, &config.root_margin) {
                    Some(ratio) => VisibilityEntry::new(target.clone(), true, ratio),
                    None => VisibilityEntry::new(target.clone(), false, 0.0),
                };
                Some(entry)
            })
            .collect()
    }
}

impl<H: PartialEq + Clone> Default for GeometryObserver<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: PartialEq + Clone> VisibilityObserver<H> for GeometryObserver<H> {
    fn observe(&mut self, target: &H) {
        if !self.targets.contains(target) {
            self.targets.push(target.clone());
        }
    }

    fn unobserve(&mut self, target: &H) {
        self.targets.retain(|t| t != target);
    }

    fn disconnect(&mut self) {
        self.targets.clear();
    }
}

struct Slot<H> {
    id: SlotId,
    handle: H,
    element: Weak<WatchedElement<H>>,
}

/// Watches elements and reveals each one exactly once
pub struct RevealTracker<H, O>
where
    O: VisibilityObserver<H>,
{
    config: RevealConfig,
    observer: Option<O>,
    watched: Vec<Slot<H>>,
    /// Handles revealed by this tracker, refused on re-register
    revealed: Vec<H>,
    next_id: u32,
    connected: bool,
    tracer: Tracer,
}

impl<H, O> RevealTracker<H, O>
where
    H: PartialEq + Clone,
    O: VisibilityObserver<H>,
{
    /// Create a tracker. Pass `None` when the platform has no visibility
    /// primitive; registration then reveals immediately.
    pub fn new(config: RevealConfig, observer: Option<O>) -> Self {
        Self {
            config,
            observer,
            watched: Vec::new(),
            revealed: Vec::new(),
            next_id: 0,
            connected: false,
            tracer: Tracer::default(),
        }
    }

    pub fn with_trace_sink(mut self, sink: Box<dyn TraceSink>) -> Self {
        self.tracer.set(sink);
        self
    }

    pub fn config(&self) -> &RevealConfig {
        &self.config
    }

    pub fn observer(&self) -> Option<&O> {
        self.observer.as_ref()
    }

    /// Number of elements still waiting to be revealed
    pub fn watched_len(&self) -> usize {
        self.watched.len()
    }

    /// Begin observing `elements`.
    ///
    /// Already revealed and already watched handles are skipped, whichever
    /// wrapper they arrive in. Returns the elements revealed right away
    /// because no observer is available; the host applies its revealed
    /// styling to those.
    pub fn register<'a, I>(&mut self, elements: I) -> Vec<Rc<WatchedElement<H>>>
    where
        I: IntoIterator<Item = &'a Rc<WatchedElement<H>>>,
        H: 'a,
    {
        let mut revealed = Vec::new();

        for element in elements {
            let handle = element.handle();
            if element.is_revealed() || self.has_revealed(handle) || self.is_watching(handle) {
                continue;
            }

            let id = SlotId(self.next_id);
            self.next_id += 1;

            let Some(observer) = self.observer.as_mut() else {
                if element.mark_revealed() {
                    self.revealed.push(handle.clone());
                    self.tracer.emit(|s| s.revealed(id, RevealCause::FailOpen));
                    revealed.push(Rc::clone(element));
                }
                continue;
            };

            observer.observe(handle);
            self.watched.push(Slot {
                id,
                handle: handle.clone(),
                element: Rc::downgrade(element),
            });
            self.connected = true;
            self.tracer.emit(|s| s.watch_started(id));
        }

        if !revealed.is_empty() {
            log::debug!(
                "no visibility observer available, revealed {} element(s) immediately",
                revealed.len()
            );
        }

        revealed
    }

    /// Process one batch of visibility entries.
    ///
    /// Entries for elements that are not being watched, including ones that
    /// were already revealed or released by [`teardown`](Self::teardown), are
    /// ignored. Returns the elements revealed by this batch.
    pub fn on_tick<I>(&mut self, entries: I) -> Vec<Rc<WatchedElement<H>>>
    where
        I: IntoIterator<Item = VisibilityEntry<H>>,
    {
        let mut revealed = Vec::new();
        let threshold = self.config.threshold;

        for entry in entries {
            let Some(index) = self.position_of(&entry.target) else {
                continue;
            };

            let id = self.watched[index].id;
            self.tracer.emit(|s| s.visibility_processed(id, entry.ratio));

            if !entry.is_intersecting || entry.ratio < threshold {
                continue;
            }

            let slot = self.watched.swap_remove(index);
            if let Some(observer) = self.observer.as_mut() {
                observer.unobserve(&slot.handle);
            }
            let Some(element) = slot.element.upgrade() else {
                continue;
            };

            self.revealed.push(slot.handle);
            if element.mark_revealed() {
                self.tracer.emit(|s| s.revealed(id, RevealCause::Visible));
                revealed.push(element);
            }
        }

        revealed
    }

    /// Stop all observation and release every watched element.
    /// Calling this more than once, or before any registration, is a no-op.
    /// Handles revealed before the teardown stay refused.
    pub fn teardown(&mut self) {
        if !self.connected && self.watched.is_empty() {
            return;
        }

        if let Some(observer) = self.observer.as_mut() {
            observer.disconnect();
        }
        let released = self.watched.len();
        self.watched.clear();
        self.connected = false;

        log::trace!("reveal tracker torn down, released {released} element(s)");
        self.tracer.emit(|s| s.reveal_teardown(released));
    }

    fn is_watching(&self, handle: &H) -> bool {
        self.watched.iter().any(|slot| &slot.handle == handle)
    }

    fn has_revealed(&self, handle: &H) -> bool {
        self.revealed.contains(handle)
    }

    /// Find the slot for `target`, pruning slots whose element the host dropped
    fn position_of(&mut self, target: &H) -> Option<usize> {
        let observer = &mut self.observer;
        self.watched.retain(|slot| {
            let alive = slot.element.strong_count() > 0;
            if !alive {
                if let Some(observer) = observer.as_mut() {
                    observer.unobserve(&slot.handle);
                }
            }
            alive
        });
        self.watched.iter().position(|slot| &slot.handle == target)
    }
}

impl<H> RevealTracker<H, GeometryObserver<H>>
where
    H: PartialEq + Clone,
{
    /// Measure every watched element against `viewport` and process the
    /// resulting batch in one tick.
    pub fn poll<F>(&mut self, viewport: &Rect, bounds_of: F) -> Vec<Rc<WatchedElement<H>>>
    where
        F: Fn(&H) -> Option<Rect>,
    {
        let entries = match self.observer.as_ref() {
            Some(observer) => observer.sample(viewport, &self.config, bounds_of),
            None => return Vec::new(),
        };
        self.on_tick(entries)
    }
}

impl<H, O> Drop for RevealTracker<H, O>
where
    O: VisibilityObserver<H>,
{
    fn drop(&mut self) {
        // Disconnect from the platform even if the host never tore down.
        if self.connected {
            if let Some(observer) = self.observer.as_mut() {
                observer.disconnect();
            }
        }
    }
}

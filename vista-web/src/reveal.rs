//! `IntersectionObserver` bridge for the reveal tracker
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use js_sys::{Array, Reflect};
use vista_core::{RevealConfig, RevealTracker, VisibilityEntry, VisibilityObserver, WatchedElement};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit};

type ObserverCallback = Closure<dyn FnMut(Array, IntersectionObserver)>;
type DomTracker = RevealTracker<Element, DomObserver>;

/// Whether the running browser exposes `IntersectionObserver`
fn intersection_observer_supported() -> bool {
    web_sys::window()
        .and_then(|window| Reflect::has(&window, &JsValue::from_str("IntersectionObserver")).ok())
        .unwrap_or(false)
}

/// A browser `IntersectionObserver` plus the closure it calls back into
pub struct DomObserver {
    inner: IntersectionObserver,
    _callback: ObserverCallback,
}

impl DomObserver {
    /// Returns `None` when the platform has no intersection observer or
    /// refuses the options; the tracker then fails open.
    fn new(config: &RevealConfig, callback: ObserverCallback) -> Option<Self> {
        if !intersection_observer_supported() {
            log::debug!("IntersectionObserver unavailable");
            return None;
        }

        let init = IntersectionObserverInit::new();
        init.set_threshold(&JsValue::from_f64(f64::from(config.threshold)));
        init.set_root_margin(&config.root_margin.to_css());

        match IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init) {
            Ok(inner) => Some(Self {
                inner,
                _callback: callback,
            }),
            Err(err) => {
                log::warn!("failed to create IntersectionObserver: {err:?}");
                None
            }
        }
    }
}

impl VisibilityObserver<Element> for DomObserver {
    fn observe(&mut self, target: &Element) {
        self.inner.observe(target);
    }

    fn unobserve(&mut self, target: &Element) {
        self.inner.unobserve(target);
    }

    fn disconnect(&mut self) {
        self.inner.disconnect();
    }
}

fn apply_revealed(elements: &[Rc<WatchedElement<Element>>], class_name: &str) {
    for element in elements {
        if let Err(err) = element.handle().class_list().add_1(class_name) {
            log::warn!("failed to add reveal class: {err:?}");
        }
    }
}

/// Reveal-on-scroll for a group of elements.
///
/// Each revealed element gets `class_name` added once; the page stylesheet
/// owns the actual transition.
#[wasm_bindgen]
pub struct RevealHandle {
    tracker: Rc<RefCell<DomTracker>>,
    /// One wrapper per registered node, reused across `register` calls
    elements: Vec<Rc<WatchedElement<Element>>>,
    class_name: String,
    /// Set when a teardown found the tracker borrowed
    teardown_pending: Rc<Cell<bool>>,
}

/// Run a teardown that was requested while the tracker was busy
fn finish_pending_teardown(tracker: &RefCell<DomTracker>, pending: &Cell<bool>) {
    if !pending.get() {
        return;
    }
    if let Ok(mut tracker) = tracker.try_borrow_mut() {
        pending.set(false);
        tracker.teardown();
        log::debug!("deferred reveal teardown completed");
    }
}

#[wasm_bindgen]
impl RevealHandle {
    /// `root_margin` uses CSS shorthand, e.g. `"0px 0px -50px 0px"`.
    #[wasm_bindgen(constructor)]
    pub fn new(threshold: f32, root_margin: &str, class_name: &str) -> Result<RevealHandle, JsValue> {
        let config = RevealConfig::with_margin_str(threshold, root_margin)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(Self::with_config(config, class_name))
    }

    /// The service card grid preset, revealing with the `card-visible` class
    #[wasm_bindgen(js_name = cardGrid)]
    pub fn card_grid() -> RevealHandle {
        Self::with_config(RevealConfig::card_grid(), "card-visible")
    }

    /// The showcase row preset, revealing with the `in-view` class
    pub fn showcase() -> RevealHandle {
        Self::with_config(RevealConfig::showcase(), "in-view")
    }

    /// Start watching every `Element` in `elements`; other values are skipped.
    /// Nodes registered before, or already carrying the reveal class, are
    /// left alone.
    pub fn register(&mut self, elements: &Array) {
        let mut batch: Vec<Rc<WatchedElement<Element>>> = Vec::new();
        for value in elements.iter() {
            let Ok(element) = value.dyn_into::<Element>() else {
                continue;
            };
            let known = self.elements.iter().chain(&batch).any(|w| w.handle() == &element);
            if known || element.class_list().contains(&self.class_name) {
                continue;
            }
            batch.push(Rc::new(WatchedElement::new(element)));
        }
        if batch.is_empty() {
            return;
        }

        let revealed = match self.tracker.try_borrow_mut() {
            Ok(mut tracker) => tracker.register(&batch),
            Err(_) => {
                log::warn!("register called while the tracker was busy, {} element(s) ignored", batch.len());
                return;
            }
        };
        apply_revealed(&revealed, &self.class_name);
        self.elements.extend(batch);
    }

    /// Number of registered elements that have been revealed
    #[wasm_bindgen(js_name = revealedCount)]
    pub fn revealed_count(&self) -> usize {
        self.elements.iter().filter(|e| e.is_revealed()).count()
    }

    /// Number of registered elements
    #[wasm_bindgen(js_name = registeredCount)]
    pub fn registered_count(&self) -> usize {
        self.elements.len()
    }

    /// Stop observing and release every element. Safe to call repeatedly.
    ///
    /// If the tracker is busy in a visibility callback, the disconnect runs as
    /// soon as that callback returns.
    pub fn teardown(&mut self) {
        match self.tracker.try_borrow_mut() {
            Ok(mut tracker) => tracker.teardown(),
            Err(_) => {
                log::warn!("reveal tracker busy, deferring teardown");
                self.teardown_pending.set(true);
            }
        }
        self.elements.clear();
    }
}

impl RevealHandle {
    pub fn with_config(config: RevealConfig, class_name: &str) -> Self {
        let class = class_name.to_string();
        let teardown_pending = Rc::new(Cell::new(false));
        let tracker = Rc::new_cyclic(|weak: &Weak<RefCell<DomTracker>>| {
            let weak = weak.clone();
            let class = class.clone();
            let pending = Rc::clone(&teardown_pending);
            let callback: ObserverCallback = Closure::new(move |entries: Array, _observer: IntersectionObserver| {
                // Torn down and dropped: nothing left to update
                let Some(tracker) = weak.upgrade() else {
                    return;
                };
                let batch = entries
                    .iter()
                    .filter_map(|entry| entry.dyn_into::<IntersectionObserverEntry>().ok())
                    .map(|entry| {
                        VisibilityEntry::new(entry.target(), entry.is_intersecting(), entry.intersection_ratio() as f32)
                    });

                let revealed = match tracker.try_borrow_mut() {
                    Ok(mut tracker) => tracker.on_tick(batch),
                    Err(_) => {
                        log::warn!("visibility tick arrived while the tracker was busy");
                        return;
                    }
                };
                apply_revealed(&revealed, &class);
                finish_pending_teardown(&tracker, &pending);
            });

            RefCell::new(RevealTracker::new(config, DomObserver::new(&config, callback)))
        });

        Self {
            tracker,
            elements: Vec::new(),
            class_name: class,
            teardown_pending,
        }
    }
}

impl Drop for RevealHandle {
    fn drop(&mut self) {
        self.teardown();
    }
}

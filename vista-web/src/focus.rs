//! Hover focus slot exposed to the page
use std::cell::RefCell;
use std::rc::Rc;

use gloo_events::EventListener;
use js_sys::{Array, Function};
use vista_core::FocusIndex;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::Element;

fn focus_value(focus: &FocusIndex) -> JsValue {
    match focus.current() {
        Some(index) => JsValue::from(index as u32),
        None => JsValue::NULL,
    }
}

/// Which item of an ordered collection is under the pointer
#[wasm_bindgen]
pub struct FocusSlot {
    focus: Rc<RefCell<FocusIndex>>,
    bound: Vec<Element>,
    listeners: Vec<EventListener>,
}

#[wasm_bindgen]
impl FocusSlot {
    #[wasm_bindgen(constructor)]
    pub fn new() -> FocusSlot {
        Self {
            focus: Rc::new(RefCell::new(FocusIndex::new())),
            bound: Vec::new(),
            listeners: Vec::new(),
        }
    }

    pub fn enter(&self, index: u32) {
        self.focus.borrow_mut().on_enter(index as usize);
    }

    pub fn leave(&self, index: u32) {
        self.focus.borrow_mut().on_leave(index as usize);
    }

    pub fn current(&self) -> Option<u32> {
        self.focus.borrow().current().map(|index| index as u32)
    }

    /// Track `mouseenter`/`mouseleave` on `elements`, using each element's
    /// position in the array as its index. `on_change` is called with the new
    /// index (or `null`) whenever the slot changes.
    ///
    /// Elements that are already bound keep their first index and callback.
    pub fn bind(&mut self, elements: &Array, on_change: Function) {
        for (index, value) in elements.iter().enumerate() {
            let Ok(element) = value.dyn_into::<Element>() else {
                continue;
            };
            if self.bound.contains(&element) {
                continue;
            }

            let focus = Rc::clone(&self.focus);
            let callback = on_change.clone();
            self.listeners.push(EventListener::new(&element, "mouseenter", move |_event| {
                let value = {
                    let mut focus = focus.borrow_mut();
                    focus.on_enter(index);
                    focus_value(&focus)
                };
                notify(&callback, &value);
            }));

            let focus = Rc::clone(&self.focus);
            let callback = on_change.clone();
            self.listeners.push(EventListener::new(&element, "mouseleave", move |_event| {
                let (changed, value) = {
                    let mut focus = focus.borrow_mut();
                    let before = focus.current();
                    focus.on_leave(index);
                    (before != focus.current(), focus_value(&focus))
                };
                if changed {
                    notify(&callback, &value);
                }
            }));
            self.bound.push(element);
        }
    }

    /// Number of live listeners, two per bound element
    #[wasm_bindgen(js_name = listenerCount)]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Remove bound listeners and clear the slot
    pub fn teardown(&mut self) {
        self.listeners.clear();
        self.bound.clear();
        *self.focus.borrow_mut() = FocusIndex::new();
    }
}

impl Default for FocusSlot {
    fn default() -> Self {
        Self::new()
    }
}

fn notify(callback: &Function, value: &JsValue) {
    if let Err(err) = callback.call1(&JsValue::NULL, value) {
        log::warn!("focus change callback threw: {err:?}");
    }
}

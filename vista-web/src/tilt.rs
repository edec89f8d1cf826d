//! DOM pointer listeners for the tilt interactor
use std::cell::RefCell;
use std::rc::Rc;

use gloo_events::EventListener;
use js_sys::Array;
use vista_core::{Point, Rect, TiltConfig, TiltInteractor, TiltTransform};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{HtmlElement, MouseEvent};

fn write_transform(element: &HtmlElement, transform: &TiltTransform) {
    if let Err(err) = element.style().set_property("transform", &transform.to_css()) {
        log::warn!("failed to write transform: {err:?}");
    }
}

fn client_bounds(element: &HtmlElement) -> Rect {
    let rect = element.get_bounding_client_rect();
    Rect::new(
        rect.left() as f32,
        rect.top() as f32,
        rect.width() as f32,
        rect.height() as f32,
    )
}

/// Pointer tilt for a group of elements.
///
/// Every registered element gets exactly one `mousemove` and one
/// `mouseleave` listener. All of them are removed on teardown.
#[wasm_bindgen]
pub struct TiltHandle {
    interactor: Rc<RefCell<TiltInteractor<HtmlElement>>>,
    listeners: Vec<EventListener>,
}

#[wasm_bindgen]
impl TiltHandle {
    #[wasm_bindgen(constructor)]
    pub fn new(max_tilt_deg: f32, hover_scale: f32) -> Result<TiltHandle, JsValue> {
        let config = TiltConfig::new(max_tilt_deg, hover_scale);
        config.validate().map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(Self::with_config(config))
    }

    /// 6 degree tilt with a 1.02 hover scale
    #[wasm_bindgen(js_name = withDefaults)]
    pub fn with_defaults() -> TiltHandle {
        Self::with_config(TiltConfig::default())
    }

    /// Attach tilt to every `HTMLElement` in `elements`. Elements that are
    /// already registered keep their existing listeners.
    pub fn register(&mut self, elements: &Array) {
        let candidates: Vec<HtmlElement> = elements
            .iter()
            .filter_map(|value| value.dyn_into::<HtmlElement>().ok())
            .collect();

        let attached = self.interactor.borrow_mut().register(candidates);
        for element in attached {
            self.listen(element);
        }
    }

    /// Number of live listeners, two per registered element
    #[wasm_bindgen(js_name = listenerCount)]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Detach every listener. Safe to call repeatedly.
    pub fn teardown(&mut self) {
        // Dropping a listener removes it from its element
        self.listeners.clear();
        if let Ok(mut interactor) = self.interactor.try_borrow_mut() {
            interactor.teardown();
        }
    }
}

impl TiltHandle {
    pub fn with_config(config: TiltConfig) -> Self {
        Self {
            interactor: Rc::new(RefCell::new(TiltInteractor::new(config))),
            listeners: Vec::new(),
        }
    }

    fn listen(&mut self, element: HtmlElement) {
        let interactor = Rc::clone(&self.interactor);
        let target = element.clone();
        let on_move = EventListener::new(&element, "mousemove", move |event| {
            let Some(event) = event.dyn_ref::<MouseEvent>() else {
                return;
            };
            let pointer = Point::new(event.client_x() as f32, event.client_y() as f32);
            let transform = interactor
                .borrow_mut()
                .pointer_move(&target, client_bounds(&target), pointer);
            if let Some(transform) = transform {
                write_transform(&target, &transform);
            }
        });

        let interactor = Rc::clone(&self.interactor);
        let target = element.clone();
        let on_leave = EventListener::new(&element, "mouseleave", move |_event| {
            let transform = interactor.borrow_mut().pointer_leave(&target);
            if let Some(transform) = transform {
                write_transform(&target, &transform);
            }
        });

        self.listeners.push(on_move);
        self.listeners.push(on_leave);
    }
}

impl Drop for TiltHandle {
    fn drop(&mut self) {
        self.teardown();
    }
}

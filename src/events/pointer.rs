use crate::core::{Camera, PointerTracker};
use crate::input;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys as web;

#[derive(Clone)]
pub struct PointerWiring {
    pub canvas: web::HtmlCanvasElement,
    pub pointer: Rc<RefCell<PointerTracker>>,
    pub camera: Rc<RefCell<Camera>>,
}

pub fn wire_pointer_handlers(w: PointerWiring) {
    wire_track("pointermove", &w);
    wire_track("pointerdown", &w);
    wire_release(&w);
}

fn wire_track(event: &str, w: &PointerWiring) {
    let w = w.clone();
    let closure = wasm_bindgen::closure::Closure::wrap(Box::new(move |ev: web::PointerEvent| {
        let (local, viewport) = input::pointer_canvas_css(&ev, &w.canvas);
        let camera = *w.camera.borrow();
        w.pointer.borrow_mut().move_to(local, viewport, &camera);
    }) as Box<dyn FnMut(_)>);

    if let Some(wnd) = web::window() {
        _ = wnd.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
    }
    closure.forget();
}

fn wire_release(w: &PointerWiring) {
    let pointer = w.pointer.clone();
    let on_cancel = wasm_bindgen::closure::Closure::wrap(Box::new(move |_ev: web::PointerEvent| {
        pointer.borrow_mut().leave();
    }) as Box<dyn FnMut(_)>);

    // touches end when the finger lifts; a mouse stays tracked until it leaves the page
    let pointer = w.pointer.clone();
    let on_up = wasm_bindgen::closure::Closure::wrap(Box::new(move |ev: web::PointerEvent| {
        if input::is_touch(&ev) {
            pointer.borrow_mut().leave();
        }
    }) as Box<dyn FnMut(_)>);

    let pointer = w.pointer.clone();
    let on_leave = wasm_bindgen::closure::Closure::wrap(Box::new(move |_ev: web::PointerEvent| {
        pointer.borrow_mut().leave();
    }) as Box<dyn FnMut(_)>);

    if let Some(wnd) = web::window() {
        _ = wnd.add_event_listener_with_callback("pointercancel", on_cancel.as_ref().unchecked_ref());
        _ = wnd.add_event_listener_with_callback("pointerup", on_up.as_ref().unchecked_ref());
        if let Some(root) = wnd.document().and_then(|d| d.document_element()) {
            _ = root.add_event_listener_with_callback("pointerleave", on_leave.as_ref().unchecked_ref());
        }
    }
    on_cancel.forget();
    on_up.forget();
    on_leave.forget();
}

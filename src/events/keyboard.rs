use crate::audio::{self, AudioEngine};
use crate::constants::VOLUME_STEP;
use crate::core::{audio_command_for_key, step_volume, AudioCommand};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys as web;

pub fn handle_global_keydown(ev: &web::KeyboardEvent, engine: &Rc<RefCell<AudioEngine>>) {
    if ev.repeat() || ev.ctrl_key() || ev.meta_key() || ev.alt_key() {
        return;
    }
    let Some(command) = audio_command_for_key(&ev.key()) else {
        return;
    };
    match command {
        AudioCommand::TogglePlayback => audio::toggle(engine),
        AudioCommand::VolumeUp | AudioCommand::VolumeDown => {
            let mut eng = engine.borrow_mut();
            let v = step_volume(eng.volume(), command, VOLUME_STEP);
            eng.set_volume(v);
            log::info!("[audio] volume {:.2}", v);
        }
    }
    if command.suppresses_default() {
        ev.prevent_default();
    }
}

pub fn wire_global_keydown(engine: Rc<RefCell<AudioEngine>>) {
    let closure = wasm_bindgen::closure::Closure::wrap(Box::new(move |ev: web::KeyboardEvent| {
        handle_global_keydown(&ev, &engine);
    }) as Box<dyn FnMut(_)>);
    if let Some(window) = web::window() {
        _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
    }
    closure.forget();
}

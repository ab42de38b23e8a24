#![cfg(target_arch = "wasm32")]
use crate::audio::AudioEngine;
use crate::constants::*;
use crate::core::{
    Camera, ExcitationTracker, HoverClock, ParticleParams, PointerTracker, SignalBus, SimClock,
};
use instant::Instant;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

mod audio;
mod constants;
pub mod core;
mod dom;
mod events;
mod frame;
mod input;
mod render;

/// Shared state reachable from the exported host controls.
struct AppHandle {
    params: Rc<RefCell<ParticleParams>>,
    audio: Option<Rc<RefCell<AudioEngine>>>,
}

thread_local! {
    static APP: RefCell<Option<AppHandle>> = const { RefCell::new(None) };
}

fn with_audio(f: impl FnOnce(&Rc<RefCell<AudioEngine>>)) {
    APP.with(|app| match app.borrow().as_ref().and_then(|a| a.audio.as_ref()) {
        Some(engine) => f(engine),
        None => log::warn!("[audio] no audio engine"),
    });
}

fn wire_canvas_resize(canvas: &web::HtmlCanvasElement) {
    dom::sync_canvas_backing_size(canvas);
    let canvas_resize = canvas.clone();
    let resize_closure = Closure::wrap(Box::new(move || {
        dom::sync_canvas_backing_size(&canvas_resize);
    }) as Box<dyn FnMut()>);
    if let Some(window) = web::window() {
        _ = window
            .add_event_listener_with_callback("resize", resize_closure.as_ref().unchecked_ref());
    }
    resize_closure.forget();
}

fn read_params(canvas: &web::HtmlCanvasElement) -> ParticleParams {
    match canvas.get_attribute(PARAMS_ATTR) {
        None => ParticleParams::landing(),
        Some(json) => ParticleParams::from_json(&json).unwrap_or_else(|e| {
            log::warn!("[params] ignoring {}: {}", PARAMS_ATTR, e);
            ParticleParams::landing()
        }),
    }
}

fn subscribe_css_effects(bus: &mut SignalBus, document: &web::Document) {
    let doc = document.clone();
    bus.subscribe_glitch(move |intensity| {
        dom::set_root_css_var(&doc, GLITCH_CSS_VAR, intensity);
    });
    let doc = document.clone();
    bus.subscribe_audio_data(move |ev| {
        dom::set_root_css_var(&doc, AMPLITUDE_CSS_VAR, ev.amplitude);
    });
}

fn build_audio(document: &web::Document, src: String) -> Option<Rc<RefCell<AudioEngine>>> {
    let engine = match AudioEngine::new() {
        Ok(e) => Rc::new(RefCell::new(e)),
        Err(e) => {
            log::error!("[audio] {}", e);
            return None;
        }
    };
    let engine_click = engine.clone();
    dom::add_click_listener(document, AUDIO_TOGGLE_ID, move || {
        audio::toggle(&engine_click);
    });
    events::wire_global_keydown(engine.clone());

    let engine_init = engine.clone();
    spawn_local(async move {
        if !audio::init(&engine_init, &src).await {
            log::warn!("[audio] running without audio reactivity");
        }
    });
    Some(engine)
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("particle-field starting");

    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}

async fn init() -> anyhow::Result<()> {
    static STARTED: AtomicBool = AtomicBool::new(false);
    if STARTED.swap(true, Ordering::SeqCst) {
        return Ok(());
    }

    let document = dom::window_document().ok_or_else(|| anyhow::anyhow!("no document"))?;
    let canvas: web::HtmlCanvasElement = document
        .get_element_by_id(CANVAS_ID)
        .ok_or_else(|| anyhow::anyhow!("missing #{}", CANVAS_ID))?
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;

    // Maintain canvas internal pixel size to match CSS size * devicePixelRatio
    wire_canvas_resize(&canvas);

    let params = Rc::new(RefCell::new(read_params(&canvas)));
    let audio_src = canvas
        .get_attribute(AUDIO_SRC_ATTR)
        .unwrap_or_else(|| DEFAULT_AUDIO_SRC.to_string());

    let mut camera = Camera::looking_at_origin(CAMERA_Z, CAMERA_FOV_DEG, 1.0);
    camera.set_aspect(canvas.width(), canvas.height());
    let camera = Rc::new(RefCell::new(camera));
    let pointer = Rc::new(RefCell::new(PointerTracker::default()));
    dom::claim_touch_gestures(&canvas);
    events::wire_pointer_handlers(events::PointerWiring {
        canvas: canvas.clone(),
        pointer: pointer.clone(),
        camera: camera.clone(),
    });

    let audio = build_audio(&document, audio_src);
    APP.with(|app| {
        *app.borrow_mut() = Some(AppHandle {
            params: params.clone(),
            audio: audio.clone(),
        });
    });

    let mut bus = SignalBus::new();
    subscribe_css_effects(&mut bus, &document);

    let mut rng = StdRng::from_entropy();
    let grid_size = params.borrow().grid_size();
    let gpu = frame::init_gpu(&canvas, grid_size, &mut rng).await;
    let initial_speed = params.borrow().speed;

    let frame_ctx = Rc::new(RefCell::new(frame::FrameContext {
        canvas,
        gpu,
        audio,
        pointer,
        camera,
        params,
        bus,
        clock: SimClock::new(initial_speed),
        hover: HoverClock::default(),
        excitation: ExcitationTracker::new(),
        rng,
        last_instant: Instant::now(),
        last_glitch: 0.0,
    }));
    frame::start_loop(frame_ctx);
    Ok(())
}

#[wasm_bindgen]
pub fn set_speed(speed: f32) {
    APP.with(|app| {
        if let Some(a) = app.borrow().as_ref() {
            a.params.borrow_mut().speed = speed;
        }
    });
}

/// Replaces the particle parameters; fields missing from `json` take their defaults.
#[wasm_bindgen]
pub fn set_params(json: &str) -> bool {
    let parsed = match ParticleParams::from_json(json) {
        Ok(p) => p,
        Err(e) => {
            log::warn!("[params] rejected: {}", e);
            return false;
        }
    };
    APP.with(|app| match app.borrow().as_ref() {
        Some(a) => {
            *a.params.borrow_mut() = parsed;
            true
        }
        None => false,
    })
}

#[wasm_bindgen]
pub fn audio_play() {
    with_audio(audio::play);
}

#[wasm_bindgen]
pub fn audio_pause() {
    with_audio(|e| e.borrow_mut().pause());
}

#[wasm_bindgen]
pub fn audio_resume() {
    with_audio(|e| e.borrow_mut().resume());
}

#[wasm_bindgen]
pub fn audio_resume_context() {
    with_audio(|e| e.borrow_mut().resume_context());
}

#[wasm_bindgen]
pub fn audio_stop() {
    with_audio(|e| e.borrow_mut().stop());
}

#[wasm_bindgen]
pub fn audio_set_volume(value: f32) {
    with_audio(|e| e.borrow_mut().set_volume(value));
}

#[wasm_bindgen]
pub fn audio_dispose() {
    with_audio(|e| e.borrow_mut().dispose());
}

use crate::audio::AudioEngine;
use crate::constants::MAX_FRAME_DT_SEC;
use crate::core::{
    AudioDataEvent, AudioEnvelope, Camera, ControlSignals, ExcitationTracker, HoverClock,
    ParticleParams, PointerTracker, SignalBus, SimClock,
};
use crate::render;
use instant::Instant;
use rand::rngs::StdRng;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub struct FrameContext<'a> {
    pub canvas: web::HtmlCanvasElement,
    pub gpu: Option<render::GpuState<'a>>,
    pub audio: Option<Rc<RefCell<AudioEngine>>>,

    pub pointer: Rc<RefCell<PointerTracker>>,
    pub camera: Rc<RefCell<Camera>>,
    pub params: Rc<RefCell<ParticleParams>>,
    pub bus: SignalBus,

    pub clock: SimClock,
    pub hover: HoverClock,
    pub excitation: ExcitationTracker,
    pub rng: StdRng,

    pub last_instant: Instant,
    pub last_glitch: f32,
}

impl<'a> FrameContext<'a> {
    pub fn frame(&mut self) {
        let now = Instant::now();
        let dt_sec = (now - self.last_instant).as_secs_f32().min(MAX_FRAME_DT_SEC);
        self.last_instant = now;

        let (envelope, playing) = match &self.audio {
            Some(audio) => {
                let mut eng = audio.borrow_mut();
                eng.poll();
                (eng.audio_data(), eng.is_playing())
            }
            None => (AudioEnvelope::ZERO, false),
        };
        let (pointer_world, pointer_active) = {
            let p = self.pointer.borrow();
            (p.world(), p.is_active())
        };
        let hover = self.hover.tick(dt_sec, pointer_active);

        let excitation = if playing && pointer_active {
            self.excitation.update(&envelope)
        } else {
            self.excitation.decay()
        };
        self.publish(excitation, &envelope, hover, playing);

        let params = self.params.borrow().clone();
        let time = self.clock.advance(dt_sec, params.speed);
        let signals = ControlSignals::compose(
            &params,
            time,
            dt_sec,
            pointer_world,
            pointer_active,
            excitation,
            hover,
        );

        let w = self.canvas.width();
        let h = self.canvas.height();
        self.camera.borrow_mut().set_aspect(w, h);
        let camera = *self.camera.borrow();
        if let Some(g) = &mut self.gpu {
            g.set_grid_size(params.grid_size(), &mut self.rng);
            g.resize_if_needed(w, h);
            match g.render(&signals, &camera) {
                Ok(()) => {}
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => g.reconfigure(),
                Err(e) => log::error!("render error: {:?}", e),
            }
        }
    }

    fn publish(&mut self, excitation: f32, envelope: &AudioEnvelope, hover: f32, playing: bool) {
        // the glitch channel goes quiet once the excitation has settled at zero
        if self.excitation.is_running() || excitation != self.last_glitch {
            self.bus.publish_glitch(excitation);
            self.last_glitch = excitation;
        }
        if playing {
            self.bus
                .publish_audio_data(&AudioDataEvent::new(envelope, hover));
        }
    }
}

pub async fn init_gpu(
    canvas: &web::HtmlCanvasElement,
    grid_size: u32,
    rng: &mut StdRng,
) -> Option<render::GpuState<'static>> {
    // leak a canvas clone to satisfy 'static lifetime for surface
    let leaked_canvas = Box::leak(Box::new(canvas.clone()));
    match render::GpuState::new(leaked_canvas, grid_size, rng).await {
        Ok(g) => Some(g),
        Err(e) => {
            log::error!("WebGPU init error: {:?}", e);
            None
        }
    }
}

pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext<'static>>>) {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    let frame_ctx_tick = frame_ctx.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        frame_ctx_tick.borrow_mut().frame();
        request_frame(&tick_clone);
    }) as Box<dyn FnMut()>));
    request_frame(&tick);
}

fn request_frame(tick: &Rc<RefCell<Option<Closure<dyn FnMut()>>>>) {
    if let (Some(w), Some(cb)) = (web::window(), tick.borrow().as_ref()) {
        _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}

use crate::core::constants::FFT_SIZE;
use crate::core::{
    AudioEnvelope, ClockState, PlayOutcome, PlaybackBackend, SourceId, SpectrumAnalyzer,
    Transport, TransportError,
};
use instant::Instant;
use std::cell::RefCell;
use std::rc::Rc;
use thiserror::Error;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys as web;

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("audio context error: {0}")]
    Context(String),
    #[error("failed to fetch {path}: {reason}")]
    Fetch { path: String, reason: String },
    #[error("failed to fetch {path}: HTTP {status}")]
    Http { path: String, status: u16 },
    #[error("failed to decode audio: {0}")]
    Decode(String),
}

fn js_err(e: JsValue) -> String {
    format!("{:?}", e)
}

fn create_gain(
    audio_ctx: &web::AudioContext,
    value: f32,
    label: &str,
) -> Result<web::GainNode, AudioError> {
    match web::GainNode::new(audio_ctx) {
        Ok(g) => {
            g.gain().set_value(value);
            Ok(g)
        }
        Err(e) => {
            log::error!("{} GainNode error: {:?}", label, e);
            Err(AudioError::Context(js_err(e)))
        }
    }
}

fn create_analyser(audio_ctx: &web::AudioContext) -> Result<web::AnalyserNode, AudioError> {
    match web::AnalyserNode::new(audio_ctx) {
        Ok(a) => {
            a.set_fft_size(FFT_SIZE);
            Ok(a)
        }
        Err(e) => {
            log::error!("AnalyserNode error: {:?}", e);
            Err(AudioError::Context(js_err(e)))
        }
    }
}

/// WebAudio graph: looping buffer sources -> gain -> analyser -> destination.
pub struct WebAudioBackend {
    ctx: web::AudioContext,
    gain: web::GainNode,
    analyser: web::AnalyserNode,
    buffer: Option<web::AudioBuffer>,
    sources: Vec<(SourceId, web::AudioBufferSourceNode)>,
    next_id: u32,
}

impl WebAudioBackend {
    pub fn new() -> Result<Self, AudioError> {
        let ctx = web::AudioContext::new().map_err(|e| AudioError::Context(js_err(e)))?;
        let gain = create_gain(&ctx, 0.0, "master")?;
        let analyser = create_analyser(&ctx)?;
        _ = gain.connect_with_audio_node(&analyser);
        _ = analyser.connect_with_audio_node(&ctx.destination());
        Ok(Self {
            ctx,
            gain,
            analyser,
            buffer: None,
            sources: Vec::new(),
            next_id: 0,
        })
    }

    pub fn context(&self) -> &web::AudioContext {
        &self.ctx
    }

    pub fn analyser(&self) -> &web::AnalyserNode {
        &self.analyser
    }

    pub fn set_buffer(&mut self, buffer: Option<web::AudioBuffer>) {
        self.buffer = buffer;
    }
}

impl PlaybackBackend for WebAudioBackend {
    fn clock(&self) -> ClockState {
        match self.ctx.state() {
            web::AudioContextState::Running => ClockState::Running,
            web::AudioContextState::Suspended => ClockState::Suspended,
            _ => ClockState::Closed,
        }
    }

    fn has_asset(&self) -> bool {
        self.buffer.is_some()
    }

    fn start_source(&mut self) -> Result<SourceId, TransportError> {
        let buffer = self.buffer.as_ref().ok_or(TransportError::NoAsset)?;
        let src = self
            .ctx
            .create_buffer_source()
            .map_err(|e| TransportError::SourceStart(js_err(e)))?;
        src.set_buffer(Some(buffer));
        src.set_loop(true);
        src.connect_with_audio_node(&self.gain)
            .map_err(|e| TransportError::SourceStart(js_err(e)))?;
        #[allow(deprecated)]
        src.start()
            .map_err(|e| TransportError::SourceStart(js_err(e)))?;
        let id = SourceId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.sources.push((id, src));
        Ok(id)
    }

    fn release_source(&mut self, id: SourceId) {
        if let Some(i) = self.sources.iter().position(|(sid, _)| *sid == id) {
            let (_, src) = self.sources.swap_remove(i);
            #[allow(deprecated)]
            {
                _ = src.stop();
            }
            _ = src.disconnect();
        }
    }

    fn ramp_gain(&mut self, from: Option<f32>, to: f32, seconds: f64) {
        let now = self.ctx.current_time();
        let param = self.gain.gain();
        let start = from.unwrap_or_else(|| param.value());
        _ = param.cancel_scheduled_values(now);
        _ = param.set_value_at_time(start, now);
        _ = param.linear_ramp_to_value_at_time(to, now + seconds);
    }

    fn set_gain(&mut self, value: f32) {
        let now = self.ctx.current_time();
        let param = self.gain.gain();
        _ = param.cancel_scheduled_values(now);
        _ = param.set_value_at_time(value, now);
    }

    fn request_resume(&mut self) {
        _ = self.ctx.resume();
    }

    fn suspend(&mut self) {
        _ = self.ctx.suspend();
    }

    fn close(&mut self) {
        let ids: Vec<SourceId> = self.sources.iter().map(|(id, _)| *id).collect();
        for id in ids {
            self.release_source(id);
        }
        _ = self.ctx.close();
    }
}

/// Owned audio engine: transport plus per-frame spectrum analysis.
pub struct AudioEngine {
    transport: Transport<WebAudioBackend>,
    analyzer: SpectrumAnalyzer,
    bins: Vec<u8>,
    epoch: Instant,
}

impl AudioEngine {
    pub fn new() -> Result<Self, AudioError> {
        let backend = WebAudioBackend::new()?;
        let bins = vec![0u8; backend.analyser().frequency_bin_count() as usize];
        Ok(Self {
            transport: Transport::new(backend),
            analyzer: SpectrumAnalyzer::new(),
            bins,
            epoch: Instant::now(),
        })
    }

    // Wall-clock seconds; the audio clock stops while suspended.
    fn now(&self) -> f64 {
        self.epoch.elapsed().as_secs_f64()
    }

    pub fn is_initialized(&self) -> bool {
        self.transport.backend().has_asset()
    }

    pub fn is_playing(&self) -> bool {
        self.transport.is_playing()
    }

    pub fn resume_context(&mut self) {
        self.transport.resume_clock();
    }

    pub fn pause(&mut self) {
        let now = self.now();
        self.transport.pause(now);
    }

    pub fn resume(&mut self) {
        self.transport.resume();
    }

    pub fn stop(&mut self) {
        let now = self.now();
        self.transport.stop(now);
    }

    pub fn set_volume(&mut self, value: f32) {
        self.transport.set_volume(value);
    }

    pub fn volume(&self) -> f32 {
        self.transport.backend().gain.gain().value()
    }

    pub fn dispose(&mut self) {
        let now = self.now();
        self.transport.dispose(now);
    }

    /// Runs fade-completion work (suspend, source teardown) that is due.
    pub fn poll(&mut self) {
        let now = self.now();
        self.transport.poll(now);
    }

    pub fn audio_data(&mut self) -> AudioEnvelope {
        if !self.transport.is_playing() || !self.is_initialized() {
            return AudioEnvelope::ZERO;
        }
        self.transport
            .backend()
            .analyser()
            .get_byte_frequency_data(&mut self.bins);
        self.analyzer.process(&self.bins)
    }
}

/// Starts playback, waiting for the context to resume first when it is suspended.
pub fn play(engine: &Rc<RefCell<AudioEngine>>) {
    let outcome = engine.borrow_mut().transport.play();
    if outcome != PlayOutcome::AwaitingResume {
        return;
    }
    let ctx = engine.borrow().transport.backend().context().clone();
    let engine = engine.clone();
    spawn_local(async move {
        let resumed = match ctx.resume() {
            Ok(promise) => JsFuture::from(promise).await.is_ok(),
            Err(_) => false,
        };
        let mut eng = engine.borrow_mut();
        if resumed {
            eng.transport.finish_play();
        } else {
            log::error!("[audio] could not resume audio context");
            eng.transport.abort_play();
        }
    });
}

/// Play when stopped, pause when audible, resume when paused.
pub fn toggle(engine: &Rc<RefCell<AudioEngine>>) {
    let (playing, paused) = {
        let eng = engine.borrow();
        (eng.transport.is_playing(), eng.transport.is_paused())
    };
    if !playing {
        play(engine);
    } else if paused {
        engine.borrow_mut().resume();
    } else {
        engine.borrow_mut().pause();
    }
}

/// Fetches and decodes `path`. On failure the engine keeps no asset and stays
/// silent until a later successful call.
pub async fn init(engine: &Rc<RefCell<AudioEngine>>, path: &str) -> bool {
    let ctx = {
        let eng = engine.borrow();
        if eng.transport.is_disposed() {
            log::warn!("[audio] init() after dispose");
            return false;
        }
        eng.transport.backend().context().clone()
    };
    match fetch_and_decode(&ctx, path).await {
        Ok(buffer) => {
            let mut eng = engine.borrow_mut();
            eng.transport.backend_mut().set_buffer(Some(buffer));
            eng.analyzer.reset();
            log::info!("[audio] decoded {}", path);
            true
        }
        Err(e) => {
            log::error!("[audio] {}", e);
            let mut eng = engine.borrow_mut();
            eng.transport.backend_mut().set_buffer(None);
            eng.analyzer.reset();
            false
        }
    }
}

async fn fetch_and_decode(
    ctx: &web::AudioContext,
    path: &str,
) -> Result<web::AudioBuffer, AudioError> {
    let fetch_err = |e: JsValue| AudioError::Fetch {
        path: path.to_string(),
        reason: js_err(e),
    };
    let window = web::window().ok_or_else(|| AudioError::Fetch {
        path: path.to_string(),
        reason: "no window".into(),
    })?;
    let resp_value = JsFuture::from(window.fetch_with_str(path))
        .await
        .map_err(fetch_err)?;
    let resp: web::Response = resp_value.dyn_into().map_err(fetch_err)?;
    if !resp.ok() {
        return Err(AudioError::Http {
            path: path.to_string(),
            status: resp.status(),
        });
    }
    let bytes = JsFuture::from(resp.array_buffer().map_err(fetch_err)?)
        .await
        .map_err(fetch_err)?;
    let array_buffer: js_sys::ArrayBuffer = bytes.dyn_into().map_err(fetch_err)?;
    let decoded = JsFuture::from(
        ctx.decode_audio_data(&array_buffer)
            .map_err(|e| AudioError::Decode(js_err(e)))?,
    )
    .await
    .map_err(|e| AudioError::Decode(js_err(e)))?;
    decoded
        .dyn_into::<web::AudioBuffer>()
        .map_err(|e| AudioError::Decode(js_err(e)))
}

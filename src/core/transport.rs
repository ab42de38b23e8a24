use thiserror::Error;

// Gain envelope for playback transitions (seconds / linear gain)
pub const PLAY_GAIN: f32 = 0.3;
pub const FADE_IN_SEC: f64 = 0.5;
pub const PAUSE_FADE_SEC: f64 = 0.3;
pub const RESUME_FADE_SEC: f64 = 0.3;
pub const STOP_FADE_SEC: f64 = 0.5;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum TransportError {
    #[error("no decoded audio asset")]
    NoAsset,
    #[error("failed to start playback source: {0}")]
    SourceStart(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClockState {
    Running,
    Suspended,
    Closed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SourceId(pub u32);

/// Audio graph operations the transport drives. Implemented over WebAudio in the
/// web build and by a recording fake in tests.
pub trait PlaybackBackend {
    fn clock(&self) -> ClockState;
    fn has_asset(&self) -> bool;
    /// Creates a looping source wired into the gain stage and starts it.
    fn start_source(&mut self) -> Result<SourceId, TransportError>;
    /// Stops and disconnects `id`. Must tolerate ids that are already gone.
    fn release_source(&mut self, id: SourceId);
    /// Ramps gain to `to` over `seconds`, starting at `from` or at the current value.
    fn ramp_gain(&mut self, from: Option<f32>, to: f32, seconds: f64);
    fn set_gain(&mut self, value: f32);
    fn request_resume(&mut self);
    fn suspend(&mut self);
    fn close(&mut self);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayOutcome {
    Started,
    /// The clock is suspended; call `finish_play` once it resumes.
    AwaitingResume,
    Ignored,
    NotReady,
    Failed,
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Deferred {
    Suspend,
    Release(SourceId),
}

#[derive(Clone, Copy, Debug)]
struct Scheduled {
    due: f64,
    action: Deferred,
}

/// Play/pause/resume/stop rules with fades and deferred teardown.
///
/// Time is passed in explicitly (seconds on any monotonic clock); deferred work
/// queued by `pause` and `stop` runs from `poll`.
pub struct Transport<B: PlaybackBackend> {
    backend: B,
    playing: bool,
    transitioning: bool,
    disposed: bool,
    current: Option<SourceId>,
    scheduled: Vec<Scheduled>,
}

impl<B: PlaybackBackend> Transport<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            playing: false,
            transitioning: false,
            disposed: false,
            current: None,
            scheduled: Vec::new(),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn is_transitioning(&self) -> bool {
        self.transitioning
    }

    /// Logically playing but faded out by `pause` (suspended or about to be).
    pub fn is_paused(&self) -> bool {
        self.playing
            && (self.backend.clock() == ClockState::Suspended
                || self.scheduled.iter().any(|s| s.action == Deferred::Suspend))
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    fn ready(&self) -> bool {
        !self.disposed && self.backend.has_asset() && self.backend.clock() != ClockState::Closed
    }

    pub fn play(&mut self) -> PlayOutcome {
        if !self.ready() {
            log::warn!("[audio] play() before the engine is initialized");
            return PlayOutcome::NotReady;
        }
        if self.playing || self.transitioning {
            log::debug!("[audio] play() ignored: already playing or transitioning");
            return PlayOutcome::Ignored;
        }
        if self.backend.clock() == ClockState::Suspended {
            self.transitioning = true;
            return PlayOutcome::AwaitingResume;
        }
        self.start_playback()
    }

    /// Second half of a `play` that had to wait for the clock.
    pub fn finish_play(&mut self) -> PlayOutcome {
        if !self.transitioning {
            return PlayOutcome::Ignored;
        }
        let outcome = if self.ready() {
            self.start_playback()
        } else {
            PlayOutcome::NotReady
        };
        self.transitioning = false;
        outcome
    }

    /// Clears the transition guard when resuming the clock failed.
    pub fn abort_play(&mut self) {
        self.transitioning = false;
    }

    fn start_playback(&mut self) -> PlayOutcome {
        // a suspend left over from an earlier pause would silence the new source
        self.cancel_suspend();
        match self.backend.start_source() {
            Ok(id) => {
                self.backend.ramp_gain(Some(0.0), PLAY_GAIN, FADE_IN_SEC);
                self.current = Some(id);
                self.playing = true;
                log::info!("[audio] playback started");
                PlayOutcome::Started
            }
            Err(e) => {
                log::error!("[audio] {}", e);
                PlayOutcome::Failed
            }
        }
    }

    /// Fades out and suspends the clock after the fade. The source survives.
    pub fn pause(&mut self, now: f64) {
        if !self.playing {
            self.warn_if_unready("pause");
            return;
        }
        self.backend.ramp_gain(None, 0.0, PAUSE_FADE_SEC);
        self.schedule(now + PAUSE_FADE_SEC, Deferred::Suspend);
    }

    /// Returns true when a suspended clock was asked to resume.
    pub fn resume(&mut self) -> bool {
        if !self.playing && !self.ready() {
            self.warn_if_unready("resume");
            return false;
        }
        if self.disposed || self.backend.clock() != ClockState::Suspended {
            // a pause whose suspend has not fired yet is undone here as well
            let had_pending = self.cancel_suspend();
            if had_pending && self.playing {
                self.backend.ramp_gain(None, PLAY_GAIN, RESUME_FADE_SEC);
            }
            return false;
        }
        self.cancel_suspend();
        self.backend.request_resume();
        if self.playing {
            self.backend.ramp_gain(Some(0.0), PLAY_GAIN, RESUME_FADE_SEC);
        }
        true
    }

    /// Unsuspends the clock without touching gain. Idempotent.
    pub fn resume_clock(&mut self) {
        if !self.disposed && self.backend.clock() == ClockState::Suspended {
            self.backend.request_resume();
        }
    }

    /// Marks playback stopped immediately and releases the source after the fade.
    pub fn stop(&mut self, now: f64) {
        if !self.playing {
            self.warn_if_unready("stop");
            return;
        }
        self.playing = false;
        self.backend.ramp_gain(None, 0.0, STOP_FADE_SEC);
        if let Some(id) = self.current.take() {
            self.schedule(now + STOP_FADE_SEC, Deferred::Release(id));
        }
        log::info!("[audio] playback stopping");
    }

    pub fn set_volume(&mut self, value: f32) {
        if self.disposed {
            log::warn!("[audio] set_volume() after dispose");
            return;
        }
        self.backend.set_gain(value);
    }

    /// Runs deferred actions that are due at `now`.
    pub fn poll(&mut self, now: f64) {
        if self.scheduled.is_empty() {
            return;
        }
        let (due, pending): (Vec<Scheduled>, Vec<Scheduled>) =
            self.scheduled.drain(..).partition(|s| s.due <= now);
        self.scheduled = pending;
        for s in due {
            self.run(s.action);
        }
    }

    /// Stops playback, releases every source right away and closes the clock.
    pub fn dispose(&mut self, now: f64) {
        if self.disposed {
            return;
        }
        if self.playing {
            self.stop(now);
        }
        for s in std::mem::take(&mut self.scheduled) {
            if let Deferred::Release(id) = s.action {
                self.backend.release_source(id);
            }
        }
        self.transitioning = false;
        self.backend.close();
        self.disposed = true;
        log::info!("[audio] disposed");
    }

    fn run(&mut self, action: Deferred) {
        match action {
            Deferred::Suspend => {
                if self.backend.clock() == ClockState::Running {
                    self.backend.suspend();
                }
            }
            Deferred::Release(id) => self.backend.release_source(id),
        }
    }

    // Calls made before an asset is decoded or after dispose are no-ops.
    fn warn_if_unready(&self, op: &str) {
        if !self.ready() {
            log::warn!("[audio] {}() ignored: engine not initialized or disposed", op);
        }
    }

    fn schedule(&mut self, due: f64, action: Deferred) {
        self.scheduled.push(Scheduled { due, action });
    }

    fn cancel_suspend(&mut self) -> bool {
        let before = self.scheduled.len();
        self.scheduled.retain(|s| s.action != Deferred::Suspend);
        before != self.scheduled.len()
    }

    pub fn pending_actions(&self) -> usize {
        self.scheduled.len()
    }
}

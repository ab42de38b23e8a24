// Host-side tests for playback transport rules, driven through a recording backend.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]

mod transport {
    include!("../src/core/transport.rs");
}

use transport::*;

#[derive(Clone, Debug, PartialEq)]
enum Call {
    Start(SourceId),
    Release(SourceId),
    Ramp(Option<f32>, f32, f64),
    Gain(f32),
    Resume,
    Suspend,
    Close,
}

struct FakeBackend {
    clock: ClockState,
    asset: bool,
    next: u32,
    live: Vec<SourceId>,
    calls: Vec<Call>,
}

impl FakeBackend {
    fn new(clock: ClockState) -> Self {
        Self {
            clock,
            asset: true,
            next: 1,
            live: Vec::new(),
            calls: Vec::new(),
        }
    }

    fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.iter().filter(|c| pred(c)).count()
    }
}

impl PlaybackBackend for FakeBackend {
    fn clock(&self) -> ClockState {
        self.clock
    }
    fn has_asset(&self) -> bool {
        self.asset
    }
    fn start_source(&mut self) -> Result<SourceId, TransportError> {
        let id = SourceId(self.next);
        self.next += 1;
        self.live.push(id);
        self.calls.push(Call::Start(id));
        Ok(id)
    }
    fn release_source(&mut self, id: SourceId) {
        self.live.retain(|s| *s != id);
        self.calls.push(Call::Release(id));
    }
    fn ramp_gain(&mut self, from: Option<f32>, to: f32, seconds: f64) {
        self.calls.push(Call::Ramp(from, to, seconds));
    }
    fn set_gain(&mut self, value: f32) {
        self.calls.push(Call::Gain(value));
    }
    fn request_resume(&mut self) {
        self.clock = ClockState::Running;
        self.calls.push(Call::Resume);
    }
    fn suspend(&mut self) {
        self.clock = ClockState::Suspended;
        self.calls.push(Call::Suspend);
    }
    fn close(&mut self) {
        self.clock = ClockState::Closed;
        self.calls.push(Call::Close);
    }
}

fn running() -> Transport<FakeBackend> {
    Transport::new(FakeBackend::new(ClockState::Running))
}

#[test]
fn play_fades_in_from_silence() {
    let mut t = running();
    assert_eq!(t.play(), PlayOutcome::Started);
    assert!(t.is_playing());
    assert_eq!(
        t.backend().calls,
        vec![
            Call::Start(SourceId(1)),
            Call::Ramp(Some(0.0), PLAY_GAIN, FADE_IN_SEC)
        ]
    );
}

#[test]
fn play_without_asset_is_not_ready() {
    let mut backend = FakeBackend::new(ClockState::Running);
    backend.asset = false;
    let mut t = Transport::new(backend);
    assert_eq!(t.play(), PlayOutcome::NotReady);
    assert!(!t.is_playing());
    assert!(t.backend().calls.is_empty());
}

#[test]
fn second_play_is_ignored() {
    let mut t = running();
    t.play();
    assert_eq!(t.play(), PlayOutcome::Ignored);
    assert_eq!(t.backend().count(|c| matches!(c, Call::Start(_))), 1);
}

#[test]
fn suspended_clock_defers_start_until_resumed() {
    let mut t = Transport::new(FakeBackend::new(ClockState::Suspended));
    assert_eq!(t.play(), PlayOutcome::AwaitingResume);
    assert!(t.is_transitioning());
    // re-entrant play while the resume is in flight
    assert_eq!(t.play(), PlayOutcome::Ignored);

    t.backend_mut().request_resume();
    assert_eq!(t.finish_play(), PlayOutcome::Started);
    assert!(!t.is_transitioning());
    assert!(t.is_playing());
    assert_eq!(t.finish_play(), PlayOutcome::Ignored);
}

#[test]
fn aborted_resume_clears_the_guard() {
    let mut t = Transport::new(FakeBackend::new(ClockState::Suspended));
    t.play();
    t.abort_play();
    assert!(!t.is_transitioning());
    assert_eq!(t.play(), PlayOutcome::AwaitingResume);
}

#[test]
fn stop_twice_is_a_noop() {
    let mut t = running();
    t.play();
    t.stop(0.0);
    assert!(!t.is_playing());
    let calls = t.backend().calls.len();
    t.stop(0.1);
    assert_eq!(t.backend().calls.len(), calls);
    assert_eq!(t.pending_actions(), 1);
}

#[test]
fn stop_releases_source_after_fade() {
    let mut t = running();
    t.play();
    t.stop(1.0);
    assert!(t
        .backend()
        .calls
        .contains(&Call::Ramp(None, 0.0, STOP_FADE_SEC)));
    t.poll(1.2);
    assert_eq!(t.backend().live, vec![SourceId(1)]);
    t.poll(1.0 + STOP_FADE_SEC);
    assert!(t.backend().live.is_empty());
    assert_eq!(t.pending_actions(), 0);
}

#[test]
fn replay_before_release_keeps_the_new_source() {
    let mut t = running();
    t.play();
    t.stop(0.0);
    assert_eq!(t.play(), PlayOutcome::Started);
    t.poll(1.0);
    assert_eq!(t.backend().live, vec![SourceId(2)]);
    assert!(t.is_playing());
}

#[test]
fn pause_suspends_after_fade() {
    let mut t = running();
    t.play();
    t.pause(2.0);
    assert!(t.is_paused());
    assert!(t.is_playing());
    t.poll(2.1);
    assert_eq!(t.backend().clock, ClockState::Running);
    t.poll(2.0 + PAUSE_FADE_SEC);
    assert_eq!(t.backend().clock, ClockState::Suspended);
    assert!(t.is_paused());
    // the source is kept across a pause
    assert_eq!(t.backend().live, vec![SourceId(1)]);
}

#[test]
fn resume_restarts_clock_and_fades_in() {
    let mut t = running();
    t.play();
    t.pause(0.0);
    t.poll(1.0);
    assert!(t.resume());
    assert_eq!(t.backend().clock, ClockState::Running);
    assert_eq!(
        t.backend().calls.last(),
        Some(&Call::Ramp(Some(0.0), PLAY_GAIN, RESUME_FADE_SEC))
    );
    assert!(!t.is_paused());
}

#[test]
fn resume_cancels_pending_suspend() {
    let mut t = running();
    t.play();
    t.pause(0.0);
    assert!(!t.resume());
    assert_eq!(t.pending_actions(), 0);
    t.poll(5.0);
    assert_eq!(t.backend().count(|c| *c == Call::Suspend), 0);
    assert_eq!(
        t.backend().calls.last(),
        Some(&Call::Ramp(None, PLAY_GAIN, RESUME_FADE_SEC))
    );
}

#[test]
fn pause_then_stop_then_play_stays_running() {
    let mut t = running();
    t.play();
    t.pause(0.0);
    t.stop(0.1);
    assert_eq!(t.play(), PlayOutcome::Started);
    t.poll(1.0);
    assert_eq!(t.backend().clock, ClockState::Running);
    assert_eq!(t.backend().count(|c| *c == Call::Suspend), 0);
    assert!(!t.is_paused());
    assert_eq!(t.backend().live, vec![SourceId(2)]);
}

#[test]
fn transport_calls_without_asset_are_noops() {
    let mut backend = FakeBackend::new(ClockState::Suspended);
    backend.asset = false;
    let mut t = Transport::new(backend);
    t.pause(0.0);
    assert!(!t.resume());
    t.stop(0.0);
    t.poll(1.0);
    assert!(t.backend().calls.is_empty());
    assert_eq!(t.pending_actions(), 0);
    assert_eq!(t.backend().clock, ClockState::Suspended);
}

#[test]
fn pause_when_stopped_does_nothing() {
    let mut t = running();
    t.pause(0.0);
    assert_eq!(t.pending_actions(), 0);
    assert!(t.backend().calls.is_empty());
}

#[test]
fn volume_goes_straight_to_gain() {
    let mut t = running();
    t.set_volume(0.7);
    assert_eq!(t.backend().calls, vec![Call::Gain(0.7)]);
}

#[test]
fn dispose_releases_everything_and_is_idempotent() {
    let mut t = running();
    t.play();
    t.dispose(0.0);
    assert!(t.is_disposed());
    assert!(!t.is_playing());
    assert!(t.backend().live.is_empty());
    assert_eq!(t.backend().clock, ClockState::Closed);
    assert_eq!(t.pending_actions(), 0);

    let calls = t.backend().calls.len();
    t.dispose(1.0);
    t.stop(1.0);
    t.set_volume(0.5);
    assert_eq!(t.backend().calls.len(), calls);
    assert_eq!(t.play(), PlayOutcome::NotReady);
}

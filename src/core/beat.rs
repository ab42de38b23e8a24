use super::analysis::AudioEnvelope;
use super::constants::*;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BeatParams {
    pub threshold: f32, // rise over the smoothed energy that counts as a hit
    pub floor: f32,     // minimum absolute energy for a hit
    pub gain: f32,
    pub cap: f32,
    pub decay: f32, // hold multiplier per frame without a hit
}

pub const BASS_BEAT: BeatParams = BeatParams {
    threshold: 0.08,
    floor: 0.15,
    gain: 2.0,
    cap: 1.0,
    decay: 0.88,
};

pub const MID_BEAT: BeatParams = BeatParams {
    threshold: 0.06,
    floor: 0.12,
    gain: 1.5,
    cap: 0.8,
    decay: 0.90,
};

/// Transient detector for one band.
#[derive(Clone, Copy, Debug)]
pub struct BandBeat {
    params: BeatParams,
    prev: f32,
    hold: f32,
}

impl BandBeat {
    pub fn new(params: BeatParams) -> Self {
        Self {
            params,
            prev: 0.0,
            hold: 0.0,
        }
    }

    /// Feeds one frame of band energy; returns true when a hit was detected.
    pub fn update(&mut self, raw: f32) -> bool {
        let p = self.params;
        let hit = raw - self.prev > p.threshold && raw > p.floor;
        self.prev = self.prev * BEAT_PREV_KEEP + raw * BEAT_RAW_WEIGHT;
        if hit {
            self.hold = (raw * p.gain).min(p.cap);
        } else {
            self.hold *= p.decay;
        }
        hit
    }

    pub fn hold(&self) -> f32 {
        self.hold
    }

    pub fn smoothed(&self) -> f32 {
        self.prev
    }

    pub fn reset(&mut self) {
        self.prev = 0.0;
        self.hold = 0.0;
    }
}

/// Folds band beats and overall energy into the excitation scalar.
#[derive(Clone, Debug)]
pub struct ExcitationTracker {
    bass: BandBeat,
    mid: BandBeat,
    value: f32,
    running: bool,
}

impl Default for ExcitationTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl ExcitationTracker {
    pub fn new() -> Self {
        Self {
            bass: BandBeat::new(BASS_BEAT),
            mid: BandBeat::new(MID_BEAT),
            value: 0.0,
            running: false,
        }
    }

    /// Active tick: audio is playing and the pointer is over the canvas.
    pub fn update(&mut self, env: &AudioEnvelope) -> f32 {
        self.bass.update(env.bass);
        self.mid.update(env.mid);
        let beat = self.bass.hold().max(self.mid.hold());
        let [wb, wm, wt] = ENERGY_WEIGHTS;
        let energy = wb * env.bass + wm * env.mid + wt * env.treble;
        let target = beat.max(energy * ENERGY_SCALE);
        self.running = true;
        self.smooth_toward(target)
    }

    /// Moves the excitation one frame toward `target` using attack/release rates.
    pub fn smooth_toward(&mut self, target: f32) -> f32 {
        let rate = if target > self.value {
            EXCITATION_ATTACK
        } else {
            EXCITATION_RELEASE
        };
        self.value += (target - self.value) * rate;
        self.value
    }

    /// Idle tick: geometric decay until the value is negligible, then halt.
    pub fn decay(&mut self) -> f32 {
        if !self.running {
            return self.value;
        }
        self.value *= EXCITATION_IDLE_DECAY;
        if self.value < EXCITATION_HALT {
            self.value = 0.0;
            self.running = false;
            self.bass.reset();
            self.mid.reset();
        }
        self.value
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn beat_holds(&self) -> (f32, f32) {
        (self.bass.hold(), self.mid.hold())
    }
}

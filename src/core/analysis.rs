use super::constants::*;
use std::collections::VecDeque;

/// Per-frame audio energies in [0, 1] plus the raw band means they came from.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AudioEnvelope {
    pub amplitude: f32,
    pub bass: f32,
    pub mid: f32,
    pub treble: f32,
    pub raw_bass: f32,
    pub raw_mid: f32,
    pub raw_treble: f32,
}

impl AudioEnvelope {
    pub const ZERO: AudioEnvelope = AudioEnvelope {
        amplitude: 0.0,
        bass: 0.0,
        mid: 0.0,
        treble: 0.0,
        raw_bass: 0.0,
        raw_mid: 0.0,
        raw_treble: 0.0,
    };
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BandRange {
    pub min: f32,
    pub max: f32,
}

/// Value at fraction `p` of an ascending-sorted slice (`sorted[floor(len * p)]`).
pub fn percentile(sorted: &[f32], p: f32) -> f32 {
    if sorted.is_empty() {
        return 0.0;
    }
    let idx = ((sorted.len() as f32 * p).floor() as usize).min(sorted.len() - 1);
    sorted[idx]
}

/// Maps `value` into [0, 1] against `range`, with the range floored at `MIN_RANGE`.
pub fn normalize(value: f32, range: BandRange) -> f32 {
    let span = (range.max - range.min).max(MIN_RANGE);
    ((value - range.min) / span).clamp(0.0, 1.0)
}

/// Rolling history and adaptive min/max for one frequency band.
#[derive(Clone, Debug, Default)]
pub struct BandNormalizer {
    history: VecDeque<f32>,
    range: Option<BandRange>,
}

impl BandNormalizer {
    pub fn new() -> Self {
        Self {
            history: VecDeque::with_capacity(HISTORY_CAPACITY),
            range: None,
        }
    }

    pub fn push(&mut self, raw: f32) {
        if self.history.len() == HISTORY_CAPACITY {
            self.history.pop_front();
        }
        self.history.push_back(raw);
    }

    /// Re-estimates the range from the current window. The first estimate is
    /// taken as is; later ones are blended in with `RANGE_EMA`.
    pub fn adapt(&mut self) {
        if self.history.len() < MIN_CALIBRATION_SAMPLES {
            return;
        }
        let mut sorted: Vec<f32> = self.history.iter().copied().collect();
        sorted.sort_by(|a, b| a.total_cmp(b));
        let fresh = BandRange {
            min: percentile(&sorted, PERCENTILE_LOW),
            max: percentile(&sorted, PERCENTILE_HIGH),
        };
        self.range = Some(match self.range {
            None => fresh,
            Some(r) => BandRange {
                min: r.min + (fresh.min - r.min) * RANGE_EMA,
                max: r.max + (fresh.max - r.max) * RANGE_EMA,
            },
        });
    }

    pub fn normalize(&self, raw: f32) -> f32 {
        match self.range {
            Some(range) => normalize(raw, range),
            None => (raw * UNCALIBRATED_GAIN).min(1.0),
        }
    }

    pub fn range(&self) -> Option<BandRange> {
        self.range
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn reset(&mut self) {
        self.history.clear();
        self.range = None;
    }
}

/// Turns byte frequency frames into an `AudioEnvelope` with per-band normalization.
#[derive(Clone, Debug, Default)]
pub struct SpectrumAnalyzer {
    bass: BandNormalizer,
    mid: BandNormalizer,
    treble: BandNormalizer,
}

impl SpectrumAnalyzer {
    pub fn new() -> Self {
        Self {
            bass: BandNormalizer::new(),
            mid: BandNormalizer::new(),
            treble: BandNormalizer::new(),
        }
    }

    pub fn process(&mut self, bins: &[u8]) -> AudioEnvelope {
        if bins.is_empty() {
            return AudioEnvelope::ZERO;
        }
        let amplitude = mean_energy(bins);
        let third = bins.len() / 3;
        if third == 0 {
            return AudioEnvelope {
                amplitude,
                ..AudioEnvelope::ZERO
            };
        }
        let raw_bass = mean_energy(&bins[..third]);
        let raw_mid = mean_energy(&bins[third..2 * third]);
        let raw_treble = mean_energy(&bins[2 * third..]);

        self.bass.push(raw_bass);
        self.mid.push(raw_mid);
        self.treble.push(raw_treble);
        self.bass.adapt();
        self.mid.adapt();
        self.treble.adapt();

        AudioEnvelope {
            amplitude,
            bass: self.bass.normalize(raw_bass),
            mid: self.mid.normalize(raw_mid),
            treble: self.treble.normalize(raw_treble),
            raw_bass,
            raw_mid,
            raw_treble,
        }
    }

    pub fn bands(&self) -> [&BandNormalizer; 3] {
        [&self.bass, &self.mid, &self.treble]
    }

    pub fn reset(&mut self) {
        self.bass.reset();
        self.mid.reset();
        self.treble.reset();
    }
}

#[inline]
fn mean_energy(bins: &[u8]) -> f32 {
    let sum: u32 = bins.iter().map(|&b| b as u32).sum();
    sum as f32 / (bins.len() as f32 * 255.0)
}

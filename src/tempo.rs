/// Fixed sixteenth-note resolution: four steps per quarter-note beat.
pub const STEPS_PER_BEAT: f64 = 4.0;

pub const DEFAULT_MIN_BPM: f64 = 60.0;
pub const DEFAULT_MAX_BPM: f64 = 200.0;
pub const DEFAULT_BPM: f64 = 120.0;

/// Playback tempo, clamped to a configurable inclusive BPM range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tempo {
    bpm: f64,
    min_bpm: f64,
    max_bpm: f64,
}

impl Tempo {
    pub fn new(bpm: f64) -> Self {
        Self::with_range(bpm, DEFAULT_MIN_BPM, DEFAULT_MAX_BPM)
    }

    pub fn with_range(bpm: f64, min_bpm: f64, max_bpm: f64) -> Self {
        let mut tempo = Self {
            bpm: min_bpm,
            min_bpm,
            max_bpm,
        };
        tempo.set_bpm(bpm);
        tempo
    }

    pub fn bpm(&self) -> f64 {
        self.bpm
    }

    /// Out-of-range values clamp rather than fail, matching the slider the
    /// value ultimately comes from.
    pub fn set_bpm(&mut self, bpm: f64) {
        self.bpm = bpm.clamp(self.min_bpm, self.max_bpm);
    }

    pub fn seconds_per_step(&self) -> f64 {
        60.0 / self.bpm / STEPS_PER_BEAT
    }
}

impl Default for Tempo {
    fn default() -> Self {
        Self::new(DEFAULT_BPM)
    }
}

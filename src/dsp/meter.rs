use std::sync::atomic::{AtomicI64, AtomicU32, Ordering};

use crate::atomic::AtomicF32;
use crate::chain::node::{AudioBlock, ProcessSpec, Processor};
use crate::config::MeterConfig;

/*
Peak Metering
=============

A peak meter answers one question: "how loud has it been lately?" It shows the
largest absolute sample value it has seen, then slowly lets the reading fall
so the display follows the signal down again.

Vocabulary
----------

  peak level      Largest |sample| seen since the last new peak, linear
                  (1.0 = full scale = 0 dBFS).

  hold            How long a fresh peak stays put before it starts to fall
                  (decay delay). Gives the eye time to read it.

  decay step      One multiplicative drop of the level (×0.9). Steps happen
                  at a fixed interval once the hold has expired.


Timeline
--------

    level
    1.0 ┤████████████████▖
        │                ▝▀▀▀▀▖
        │                     ▝▀▀▀▀▖
        │                          ▝▀▀▀▀▖
        └─────────────────┬────┬────┬────→ time
        peak            0.5s 0.6s 0.7s
                        (hold)

Everything is counted in samples, so timing is exact regardless of block size:

    samples_for_delay    = decay_delay_seconds    × sample_rate
    samples_per_step     = decay_interval_seconds × sample_rate


Per-Block Update
----------------

  1. block_peak = max |sample| over every channel and sample
  2. samples_since_peak += block length
  3. if past the hold AND a full step interval has elapsed since the last
     step: level ×= decay_factor, then pull the counter back by whole
     intervals so later steps stay phase-locked to the first step
  4. if block_peak > level: level = block_peak, counter = 0

Only one step is applied per block. With the usual 64 - 2048 sample blocks an
interval (4410 samples at 44.1 kHz) is never shorter than a block, so nothing
is lost. A block several seconds long under-decays; that is accepted.


Threading
---------

The audio thread runs `process_block`; anything may read `peak_db`, and the
control thread may call `reset_peak` to start a fresh measurement. Each field
is its own atomic word and there is no lock. A reset that lands while a block
is mid-update can be overwritten by that block's result. The next refresh
corrects it, so the race is left in place.
*/

/// Reported when the level is below `SILENCE_THRESHOLD`.
pub const SILENCE_DB: f32 = -200.0;

/// Linear level under which the meter reads `SILENCE_DB`.
pub const SILENCE_THRESHOLD: f32 = 1e-10;

/// Decaying peak detector, shared between audio and control threads.
#[derive(Debug)]
pub struct PeakMeter {
    peak_level: AtomicF32,
    samples_since_peak: AtomicI64,
    sample_rate: AtomicU32,
    config: MeterConfig,
}

impl PeakMeter {
    pub const DEFAULT_SAMPLE_RATE: u32 = 44_100;

    pub fn new(config: MeterConfig) -> Self {
        Self {
            peak_level: AtomicF32::new(0.0),
            samples_since_peak: AtomicI64::new(0),
            sample_rate: AtomicU32::new(Self::DEFAULT_SAMPLE_RATE),
            config: config.sanitized(),
        }
    }

    /// Adopt the host sample rate and start a fresh measurement.
    ///
    /// Takes `&self` so an `Arc`-shared meter can be prepared by its owning
    /// chain; `Processor::prepare` goes through here too.
    pub fn prepare_shared(&self, spec: &ProcessSpec) {
        self.set_sample_rate(spec.sample_rate.max(0.0) as u32);
        self.reset_peak();
    }

    pub fn set_sample_rate(&self, sample_rate: u32) {
        self.sample_rate.store(sample_rate, Ordering::Relaxed);
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate.load(Ordering::Relaxed)
    }

    /// Feed one multi-channel block.
    pub fn process_block(&self, block: &AudioBlock<'_>) {
        self.update(block.peak_abs(), block.num_samples());
    }

    /// Feed one mono block.
    pub fn process_samples(&self, samples: &[f32]) {
        let block_peak = samples.iter().fold(0.0f32, |peak, s| peak.max(s.abs()));
        self.update(block_peak, samples.len());
    }

    /// Advance the meter by `num_samples` whose loudest value was `block_peak`.
    pub fn update(&self, block_peak: f32, num_samples: usize) {
        let sample_rate = self.sample_rate() as f64;
        let samples_for_delay = (self.config.decay_delay_seconds as f64 * sample_rate) as i64;
        let samples_per_step =
            ((self.config.decay_interval_seconds as f64 * sample_rate) as i64).max(1);

        let mut count = self.samples_since_peak.load(Ordering::Relaxed) + num_samples as i64;

        if count > samples_for_delay {
            let after_delay = count - samples_for_delay;
            if after_delay >= samples_per_step {
                let decayed = self.peak_level.load() * self.config.decay_factor;
                self.peak_level.store(decayed);
                count = samples_for_delay + after_delay % samples_per_step;
            }
        }

        if block_peak > self.peak_level.load() {
            self.peak_level.store(block_peak);
            count = 0;
        }

        self.samples_since_peak.store(count, Ordering::Relaxed);
    }

    /// Current level in dBFS, floored at `SILENCE_DB`.
    pub fn peak_db(&self) -> f32 {
        let peak = self.peak_level.load();
        if peak < SILENCE_THRESHOLD {
            SILENCE_DB
        } else {
            20.0 * peak.log10()
        }
    }

    /// Current level, linear.
    pub fn peak_level(&self) -> f32 {
        self.peak_level.load()
    }

    pub fn samples_since_peak(&self) -> i64 {
        self.samples_since_peak.load(Ordering::Relaxed)
    }

    /// Start a fresh measurement.
    pub fn reset_peak(&self) {
        self.peak_level.store(0.0);
        self.samples_since_peak.store(0, Ordering::Relaxed);
    }
}

impl Default for PeakMeter {
    fn default() -> Self {
        Self::new(MeterConfig::default())
    }
}

impl Processor for PeakMeter {
    fn prepare(&mut self, spec: &ProcessSpec) {
        self.prepare_shared(spec);
    }

    /// Metering only reads the block.
    fn process(&mut self, block: &mut AudioBlock<'_>) {
        self.process_block(block);
    }

    fn reset(&mut self) {
        self.reset_peak();
    }
}

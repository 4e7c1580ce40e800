use std::sync::Arc;

use rtrb::{Consumer, Producer, RingBuffer};

use crate::atomic::AtomicF32;
use crate::chain::node::{AudioBlock, ProcessSpec, Processor};
use crate::config::VoiceConfig;
use crate::dsp::binomial::BinomialTable;
use crate::dsp::harmonics::HarmonicProfile;
use crate::dsp::oscillator::{phase_increment, PhaseOscillator};
use crate::dsp::polynomial::{Coefficients, PolynomialEvaluator};

/*
Waveshaping Oscillator
======================

    phase ──→ sin(2π·phase) ──→ f(x) ──→ every output channel
                 carrier        polynomial

A sine carrier is pushed through the harmonic polynomial from `dsp::harmonics`.
Because the polynomial is a weighted sum of Chebyshev terms, the output contains
exactly the harmonics whose gains were set. The result is mono and copied to
every channel.

Two Halves
----------

`WaveshapingOscillator::new` returns a pair:

  WaveshapingOscillator   lives on the audio thread. Owns the carrier and
                          the active polynomial; runs `process`.

  OscillatorHandle        lives on the control thread. Owns the harmonic
                          gain vector, runs the solver, publishes results.

Shared Scalars
--------------

Frequency, phase and sample rate are single atomic words in an `Arc`:

  frequency     written by the handle (and re-clamped by `prepare`)
  phase         written by the audio side once per block, readable anywhere
  sample_rate   written by `prepare`, read by the handle to clamp frequency

Publishing Coefficients
-----------------------

A coefficient set is far larger than one word, so it cannot be swapped
atomically in place. Instead the handle solves a complete `Coefficients` value
off to the side and pushes it by value into a lock-free SPSC ring buffer:

    control thread                       audio thread
    ──────────────                       ────────────
    gains changed
    solve() → Coefficients
    push(coeffs) ─────── ring ─────────→ start of process():
                                           pop all, keep newest
                                           evaluator.set_coefficients()
                                         per-sample loop

The audio side only ever sees whole values. Solving never happens inside
`process`.

If the ring is full (audio thread stalled), the newest set is parked in the
handle and retried on the next publish or `flush()`.
*/

#[derive(Debug)]
struct OscillatorShared {
    frequency: AtomicF32,
    phase: AtomicF32,
    sample_rate: AtomicF32,
}

/// Audio-thread half: carrier + active waveshaping polynomial.
pub struct WaveshapingOscillator {
    carrier: PhaseOscillator,
    shaper: PolynomialEvaluator,
    shared: Arc<OscillatorShared>,
    rx: Consumer<Coefficients>,
    sample_rate: f32,
}

/// Control-thread half: frequency and harmonic controls.
pub struct OscillatorHandle {
    shared: Arc<OscillatorShared>,
    tx: Producer<Coefficients>,
    profile: HarmonicProfile,
    binomials: &'static BinomialTable,
    latest: Coefficients,
    pending: Option<Coefficients>,
    warned_full: bool,
}

/// Clamp to ±Nyquist when the sample rate is known; NaN becomes 0 Hz.
fn clamp_frequency(hz: f32, sample_rate: f32) -> f32 {
    if hz.is_nan() {
        return 0.0;
    }
    if sample_rate > 0.0 {
        let nyquist = sample_rate * 0.5;
        hz.clamp(-nyquist, nyquist)
    } else {
        hz
    }
}

impl WaveshapingOscillator {
    pub fn new(
        config: &VoiceConfig,
        binomials: &'static BinomialTable,
    ) -> (Self, OscillatorHandle) {
        let config = config.clone().sanitized();
        let profile = HarmonicProfile::new(config.harmonic_count, config.rolloff_sharpness);
        let initial = profile.solve(binomials);

        let shared = Arc::new(OscillatorShared {
            frequency: AtomicF32::new(config.frequency),
            phase: AtomicF32::new(0.0),
            sample_rate: AtomicF32::new(0.0),
        });
        let (tx, rx) = RingBuffer::<Coefficients>::new(config.queue_size);

        log::debug!(
            "waveshaping oscillator: {} harmonics (rolloff {}), {} Hz",
            profile.harmonic_count(),
            profile.rolloff_sharpness(),
            config.frequency
        );

        let oscillator = Self {
            carrier: PhaseOscillator::new(),
            shaper: PolynomialEvaluator::new(initial),
            shared: Arc::clone(&shared),
            rx,
            sample_rate: 0.0,
        };

        let handle = OscillatorHandle {
            shared,
            tx,
            profile,
            binomials,
            latest: initial,
            pending: None,
            warned_full: false,
        };

        (oscillator, handle)
    }

    /// Swap in the newest published coefficient set, if any.
    fn receive_coefficients(&mut self) {
        while let Ok(coefficients) = self.rx.pop() {
            self.shaper.set_coefficients(coefficients);
        }
    }

    /// Shape one carrier value with the active polynomial.
    #[inline]
    pub fn evaluate(&self, x: f32) -> f32 {
        self.shaper.evaluate(x)
    }

    pub fn coefficients(&self) -> &Coefficients {
        self.shaper.coefficients()
    }

    pub fn phase(&self) -> f32 {
        self.carrier.phase()
    }

    pub fn frequency(&self) -> f32 {
        self.shared.frequency.load()
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }
}

impl Processor for WaveshapingOscillator {
    fn prepare(&mut self, spec: &ProcessSpec) {
        self.sample_rate = spec.sample_rate.max(0.0) as f32;
        self.shared.sample_rate.store(self.sample_rate);

        // Only write back when the clamp changed something. A `set_frequency`
        // landing between the load and the store can still be lost; `process`
        // clamps on read, so the next control write settles it.
        let current = self.shared.frequency.load();
        let clamped = clamp_frequency(current, self.sample_rate);
        if clamped.to_bits() != current.to_bits() {
            self.shared.frequency.store(clamped);
        }

        self.carrier.reset();
        self.shared.phase.store(0.0);
        self.receive_coefficients();

        log::debug!(
            "oscillator prepared: {} Hz sample rate, frequency {} Hz",
            self.sample_rate,
            clamped
        );
    }

    fn process(&mut self, block: &mut AudioBlock<'_>) {
        self.receive_coefficients();

        if self.sample_rate <= 0.0 {
            block.fill(0.0);
            return;
        }

        let frequency = clamp_frequency(self.shared.frequency.load(), self.sample_rate);
        let increment = phase_increment(frequency, self.sample_rate);
        let num_samples = block.num_samples();

        let (first, rest) = block.split_first_channel();
        self.carrier.render(first, increment);
        self.shaper.evaluate_buffer(first);
        for channel in rest.chunks_exact_mut(num_samples.max(1)) {
            channel.copy_from_slice(first);
        }

        self.shared.phase.store(self.carrier.phase());
    }

    fn reset(&mut self) {
        self.carrier.reset();
        self.shared.phase.store(0.0);
    }
}

impl OscillatorHandle {
    /// Set the oscillator frequency (Hz).
    ///
    /// Clamped to ±Nyquist once the oscillator has been prepared; before that
    /// the value is stored as-is and `prepare` clamps it.
    pub fn set_frequency(&mut self, hz: f32) {
        let clamped = clamp_frequency(hz, self.shared.sample_rate.load());
        self.shared.frequency.store(clamped);
    }

    pub fn frequency(&self) -> f32 {
        self.shared.frequency.load()
    }

    /// Phase at the end of the most recent block.
    pub fn phase(&self) -> f32 {
        self.shared.phase.load()
    }

    /// Sample rate from the last `prepare`, 0.0 before that.
    pub fn sample_rate(&self) -> f32 {
        self.shared.sample_rate.load()
    }

    /// Replace the whole harmonic gain vector and publish the new polynomial.
    pub fn set_harmonic_gains(&mut self, gains: &[f32]) {
        self.profile.set_gains(gains);
        self.publish();
    }

    /// Even-harmonic shape (0.0 - 1.0).
    pub fn set_shape_x(&mut self, x: f32) {
        self.profile.apply_shape_x(x);
        self.publish();
    }

    /// Odd-harmonic shape (0.0 - 1.0).
    pub fn set_shape_y(&mut self, y: f32) {
        self.profile.apply_shape_y(y);
        self.publish();
    }

    pub fn current_harmonic_gains(&self) -> &[f32] {
        self.profile.gains()
    }

    /// The most recently solved set (may not have reached the audio side yet).
    pub fn coefficients(&self) -> &Coefficients {
        &self.latest
    }

    /// True when a solved set is still waiting for room in the queue.
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Retry a parked coefficient set. Returns true once nothing is pending.
    pub fn flush(&mut self) -> bool {
        let Some(coefficients) = self.pending else {
            return true;
        };

        match self.tx.push(coefficients) {
            Ok(()) => {
                self.pending = None;
                self.warned_full = false;
                true
            }
            Err(_) => {
                if !self.warned_full {
                    log::warn!("coefficient queue full; holding newest set until the audio side drains");
                    self.warned_full = true;
                }
                false
            }
        }
    }

    fn publish(&mut self) {
        self.latest = self.profile.solve(self.binomials);
        self.pending = Some(self.latest);
        self.flush();
    }
}

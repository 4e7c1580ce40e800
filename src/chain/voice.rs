use std::sync::Arc;

use crate::chain::gain::{GainHandle, GainStage};
use crate::chain::node::{AudioBlock, ProcessSpec, Processor};
use crate::chain::oscillator::{OscillatorHandle, WaveshapingOscillator};
use crate::config::VoiceConfig;
use crate::dsp::binomial::BinomialTable;
use crate::dsp::meter::PeakMeter;

/*
Voice Chain
===========

One complete voice, in processing order:

    ┌────────────┐   ┌─────────────┐   ┌──────┐   ┌──────────────┐
    │ oscillator │──→│ input meter │──→│ gain │──→│ output meter │──→ host
    └────────────┘   └─────────────┘   └──────┘   └──────────────┘
                         pre-gain        vol/pan      post-gain

The two meters show how hot the raw waveshaped signal is and what actually
leaves the voice.

`VoiceChain::new` returns the audio half (`VoiceChain`, moved into the audio
callback) and the control half (`VoiceControl`, kept by whoever turns the
knobs). The meters are shared through `Arc` so both halves can see them.
*/

/// Audio-thread half of a voice.
pub struct VoiceChain {
    oscillator: WaveshapingOscillator,
    input_meter: Arc<PeakMeter>,
    gain: GainStage,
    output_meter: Arc<PeakMeter>,
}

/// Control-thread half of a voice.
pub struct VoiceControl {
    pub oscillator: OscillatorHandle,
    pub gain: GainHandle,
    pub input_meter: Arc<PeakMeter>,
    pub output_meter: Arc<PeakMeter>,
}

impl VoiceChain {
    /// Build a voice on the process-wide binomial table.
    pub fn new(config: &VoiceConfig) -> (Self, VoiceControl) {
        Self::with_binomials(config, BinomialTable::shared())
    }

    pub fn with_binomials(
        config: &VoiceConfig,
        binomials: &'static BinomialTable,
    ) -> (Self, VoiceControl) {
        let config = config.clone().sanitized();

        let (oscillator, oscillator_handle) = WaveshapingOscillator::new(&config, binomials);
        let (gain, gain_handle) = GainStage::new(config.volume, config.pan);
        let input_meter = Arc::new(PeakMeter::new(config.meter));
        let output_meter = Arc::new(PeakMeter::new(config.meter));

        let chain = Self {
            oscillator,
            input_meter: Arc::clone(&input_meter),
            gain,
            output_meter: Arc::clone(&output_meter),
        };

        let control = VoiceControl {
            oscillator: oscillator_handle,
            gain: gain_handle,
            input_meter,
            output_meter,
        };

        (chain, control)
    }

    pub fn oscillator(&self) -> &WaveshapingOscillator {
        &self.oscillator
    }

    pub fn input_meter(&self) -> &PeakMeter {
        &self.input_meter
    }

    pub fn output_meter(&self) -> &PeakMeter {
        &self.output_meter
    }
}

impl Processor for VoiceChain {
    fn prepare(&mut self, spec: &ProcessSpec) {
        log::info!(
            "preparing voice: {} Hz, up to {} samples, {} channels",
            spec.sample_rate,
            spec.max_block_size,
            spec.num_channels
        );

        self.oscillator.prepare(spec);
        self.input_meter.prepare_shared(spec);
        self.gain.prepare(spec);
        self.output_meter.prepare_shared(spec);
    }

    fn process(&mut self, block: &mut AudioBlock<'_>) {
        self.oscillator.process(block);
        self.input_meter.process_block(block);
        self.gain.process(block);
        self.output_meter.process_block(block);
    }

    fn reset(&mut self) {
        self.oscillator.reset();
        self.input_meter.reset_peak();
        self.gain.reset();
        self.output_meter.reset_peak();
    }
}

impl VoiceControl {
    /// Restart both peak measurements (periodic display refresh).
    pub fn refresh_meters(&self) {
        self.input_meter.reset_peak();
        self.output_meter.reset_peak();
    }

    /// Pre-gain level in dBFS.
    pub fn input_db(&self) -> f32 {
        self.input_meter.peak_db()
    }

    /// Post-gain level in dBFS.
    pub fn output_db(&self) -> f32 {
        self.output_meter.peak_db()
    }
}

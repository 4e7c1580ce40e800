use std::thread;

use rosemary_dsp::dsp::meter::SILENCE_DB;
use rosemary_dsp::{AudioBlock, ProcessSpec, Processor, VoiceChain, VoiceConfig};
use rustfft::{num_complex::Complex, FftPlanner};

const SAMPLE_RATE: f64 = 48_000.0;
const BLOCK: usize = 480;
// 480 Hz over 4800 samples puts the fundamental exactly on bin 48.
const FREQUENCY: f32 = 480.0;
const FFT_LEN: usize = 4_800;
const FUNDAMENTAL_BIN: usize = 48;

fn voice(volume: f32) -> (VoiceChain, rosemary_dsp::VoiceControl) {
    let config = VoiceConfig {
        frequency: FREQUENCY,
        volume,
        ..VoiceConfig::default()
    };
    let (mut chain, control) = VoiceChain::new(&config);
    chain.prepare(&ProcessSpec::new(SAMPLE_RATE, BLOCK, 1));
    (chain, control)
}

fn render_mono(chain: &mut VoiceChain, len: usize) -> Vec<f32> {
    let mut out = vec![0.0; len];
    for block in out.chunks_mut(BLOCK) {
        chain.process(&mut AudioBlock::mono(block));
    }
    out
}

fn spectrum(samples: &[f32]) -> Vec<f32> {
    let mut planner = FftPlanner::<f32>::new();
    let fft = planner.plan_fft_forward(samples.len());
    let mut buffer: Vec<Complex<f32>> = samples.iter().map(|&s| Complex::new(s, 0.0)).collect();
    fft.process(&mut buffer);
    buffer[..samples.len() / 2]
        .iter()
        .map(|c| c.norm() / samples.len() as f32)
        .collect()
}

fn strongest_bin(magnitudes: &[f32]) -> usize {
    magnitudes
        .iter()
        .enumerate()
        .skip(1)
        .fold((0, 0.0f32), |best, (bin, &m)| if m > best.1 { (bin, m) } else { best })
        .0
}

#[test]
fn default_voice_is_a_pure_sine() {
    let (mut chain, _control) = voice(1.0);
    let samples = render_mono(&mut chain, FFT_LEN);
    assert!(samples.iter().all(|s| s.abs() <= 1.0 + 1e-4));

    let magnitudes = spectrum(&samples);
    assert_eq!(strongest_bin(&magnitudes), FUNDAMENTAL_BIN);

    let fundamental = magnitudes[FUNDAMENTAL_BIN];
    for harmonic in 2..8 {
        let m = magnitudes[FUNDAMENTAL_BIN * harmonic];
        assert!(m < fundamental * 1e-3, "harmonic {harmonic}: {m}");
    }
}

#[test]
fn second_harmonic_gain_moves_energy_to_double_frequency() {
    let (mut chain, mut control) = voice(1.0);
    control.oscillator.set_harmonic_gains(&[0.0, 1.0]);

    let samples = render_mono(&mut chain, FFT_LEN);
    let magnitudes = spectrum(&samples);

    assert_eq!(strongest_bin(&magnitudes), 2 * FUNDAMENTAL_BIN);
    assert!(magnitudes[FUNDAMENTAL_BIN] < magnitudes[2 * FUNDAMENTAL_BIN] * 1e-2);
}

#[test]
fn odd_gains_produce_no_even_harmonics() {
    let (mut chain, mut control) = voice(1.0);
    control.oscillator.set_harmonic_gains(&[1.0, 0.0, 0.5, 0.0, 0.25]);

    let samples = render_mono(&mut chain, FFT_LEN);
    let magnitudes = spectrum(&samples);
    let fundamental = magnitudes[FUNDAMENTAL_BIN];
    assert!(fundamental > 1e-3);

    // An odd polynomial of a sine has no DC and no even partials
    assert!(magnitudes[0] < 1e-3);
    for harmonic in [2, 4, 6, 8] {
        let m = magnitudes[FUNDAMENTAL_BIN * harmonic];
        assert!(m < 1e-3, "harmonic {harmonic}: {m}");
    }
}

#[test]
fn control_thread_updates_reach_audio_thread() {
    let (mut chain, control) = voice(1.0);
    let before = *chain.oscillator().coefficients();

    let control = thread::spawn(move || {
        let mut control = control;
        control.oscillator.set_frequency(960.0);
        control.oscillator.set_shape_x(1.0);
        control.gain.set_volume(0.25);
        control
    })
    .join()
    .expect("control thread panicked");

    render_mono(&mut chain, BLOCK);
    assert_ne!(*chain.oscillator().coefficients(), before);
    assert_eq!(chain.oscillator().coefficients(), control.oscillator.coefficients());
    assert_eq!(chain.oscillator().frequency(), 960.0);
    assert!(control.output_db() < control.input_db());
}

#[test]
fn nyquist_clamp_applies_after_prepare() {
    let (_chain, mut control) = voice(1.0);
    control.oscillator.set_frequency(100_000.0);
    assert_eq!(control.oscillator.frequency(), 24_000.0);

    control.oscillator.set_frequency(-100_000.0);
    assert_eq!(control.oscillator.frequency(), -24_000.0);
}

#[test]
fn stereo_pan_and_meters() {
    let config = VoiceConfig {
        frequency: FREQUENCY,
        volume: 1.0,
        pan: 1.0,
        ..VoiceConfig::default()
    };
    let (mut chain, control) = VoiceChain::new(&config);
    chain.prepare(&ProcessSpec::new(SAMPLE_RATE, BLOCK, 2));

    let mut data = vec![0.0; 2 * BLOCK];
    for _ in 0..4 {
        chain.process(&mut AudioBlock::new(&mut data, 2));
    }

    let block = AudioBlock::new(&mut data, 2);
    assert!(block.channel(0).iter().all(|s| s.abs() < 1e-6));
    assert!(block.channel(1).iter().any(|s| s.abs() > 0.9));
    assert!(control.output_db() > -0.1);
}

#[test]
fn meter_holds_then_decays_once_per_interval() {
    let (mut chain, control) = voice(1.0);
    render_mono(&mut chain, BLOCK);
    let held = control.output_meter.peak_level();
    assert!(held > 0.99);

    // Silence from here on
    control.gain.set_volume(0.0);

    // 0.5 s of silence: still holding
    render_mono(&mut chain, 24_000 - BLOCK);
    assert_eq!(control.output_meter.peak_level(), held);

    // A full decay interval past the hold gives exactly one step
    render_mono(&mut chain, 4_800 + BLOCK);
    let decayed = control.output_meter.peak_level();
    assert!(decayed < held);
    assert!((decayed - held * 0.9).abs() < 1e-6);
}

#[test]
fn silent_start_reads_floor() {
    let (mut chain, control) = voice(0.0);
    render_mono(&mut chain, 4 * BLOCK);
    assert_eq!(control.output_db(), SILENCE_DB);
    assert!(control.input_db() > -0.1);
}

//! Offline render + FFT, printing the level of each harmonic.

use color_eyre::eyre::{eyre, Result as EyreResult};
use rosemary_dsp::{AudioBlock, ProcessSpec, Processor, VoiceChain, MAX_BLOCK_SIZE};
use rustfft::{num_complex::Complex, FftPlanner};

use super::Args;

const FLOOR_DB: f32 = -120.0;

pub fn run(args: &Args, mut chain: VoiceChain) -> EyreResult<()> {
    if args.sample_rate == 0 {
        return Err(eyre!("sample rate must be positive"));
    }
    let fundamental = args.frequency.abs();
    if fundamental <= 0.0 {
        return Err(eyre!("analysis needs a non-zero frequency"));
    }

    // One second gives 1 Hz bins
    let len = args.sample_rate as usize;
    let sample_rate = args.sample_rate as f64;
    chain.prepare(&ProcessSpec::new(sample_rate, MAX_BLOCK_SIZE, 1));

    let mut samples = vec![0.0f32; len];
    for block in samples.chunks_mut(MAX_BLOCK_SIZE) {
        chain.process(&mut AudioBlock::mono(block));
    }

    let mut planner = FftPlanner::<f32>::new();
    let fft = planner.plan_fft_forward(len);
    let mut buffer: Vec<Complex<f32>> = samples.iter().map(|&s| Complex::new(s, 0.0)).collect();
    fft.process(&mut buffer);

    let nyquist_bin = len / 2;
    let bin_hz = args.sample_rate as f32 / len as f32;

    println!("=== harmonic spectrum ({} Hz) ===", fundamental);
    println!("DC     {:>8.1} dB", to_db(buffer[0].norm() / len as f32));

    for harmonic in 1..=args.harmonics.max(1) {
        let bin = (harmonic as f32 * fundamental / bin_hz).round() as usize;
        if bin >= nyquist_bin {
            break;
        }
        let magnitude = 2.0 * buffer[bin].norm() / len as f32;
        println!(
            "H{:<3}  {:>8.1} dB  ({:.1} Hz)",
            harmonic,
            to_db(magnitude),
            bin as f32 * bin_hz
        );
    }

    Ok(())
}

fn to_db(magnitude: f32) -> f32 {
    if magnitude > 0.0 {
        (20.0 * magnitude.log10()).max(FLOOR_DB)
    } else {
        FLOOR_DB
    }
}

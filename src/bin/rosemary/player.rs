//! Realtime playback through the default output device.

use std::time::{Duration, Instant};

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use rosemary_dsp::{AudioBlock, ProcessSpec, Processor, VoiceChain, VoiceControl, MAX_BLOCK_SIZE};

use super::Args;

const METER_REFRESH: Duration = Duration::from_millis(250);

pub fn run(args: &Args, mut chain: VoiceChain, control: VoiceControl) -> EyreResult<()> {
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| eyre!("no default output device available"))?;
    let config = device
        .default_output_config()
        .wrap_err("failed to fetch default output config")?;

    if config.sample_format() != cpal::SampleFormat::F32 {
        return Err(eyre!(
            "unsupported output sample format {:?}",
            config.sample_format()
        ));
    }

    let sample_rate = config.sample_rate().0 as f64;
    let channels = config.channels() as usize;

    println!("=== rosemary ===");
    println!("Sample rate: {} Hz", sample_rate);
    println!("Channels: {}", channels);
    println!("Frequency: {} Hz", args.frequency);
    println!();

    chain.prepare(&ProcessSpec::new(sample_rate, MAX_BLOCK_SIZE, channels));

    // Planar scratch, interleaved into the device buffer after each block
    let mut scratch = vec![0.0f32; MAX_BLOCK_SIZE * channels];

    let stream = device
        .build_output_stream(
            &config.into(),
            move |data: &mut [f32], _| {
                let total_frames = data.len() / channels;
                let mut frames_written = 0;

                while frames_written < total_frames {
                    let frames = (total_frames - frames_written).min(MAX_BLOCK_SIZE);
                    let planar = &mut scratch[..frames * channels];
                    chain.process(&mut AudioBlock::new(planar, channels));

                    let out_off = frames_written * channels;
                    for ch in 0..channels {
                        let source = &planar[ch * frames..(ch + 1) * frames];
                        for (i, &s) in source.iter().enumerate() {
                            data[out_off + i * channels + ch] = s;
                        }
                    }

                    frames_written += frames;
                }
            },
            |err| log::error!("audio stream error: {}", err),
            None,
        )
        .wrap_err("failed to build output stream")?;

    stream.play().wrap_err("failed to start output stream")?;

    let deadline = Instant::now() + Duration::from_secs_f32(args.duration.max(0.0));
    while Instant::now() < deadline {
        std::thread::sleep(METER_REFRESH);
        log::info!(
            "in {:>7.1} dB | out {:>7.1} dB | phase {:.3}",
            control.input_db(),
            control.output_db(),
            control.oscillator.phase()
        );
        control.refresh_meters();
    }

    Ok(())
}

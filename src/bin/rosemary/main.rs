//! rosemary - play or analyze a harmonic waveshaping voice
//!
//! Run with: cargo run -- --shape-x 0.6 --shape-y 0.3
//!           cargo run -- --gains 1,0,0.5 --analyze

mod analyze;
mod player;

use clap::Parser;
use rosemary_dsp::{VoiceChain, VoiceConfig, VoiceControl, MAX_HARMONICS};

#[derive(Parser, Debug, Clone)]
#[command(author, version, about)]
pub struct Args {
    /// Oscillator frequency in Hz
    #[arg(long, default_value_t = 220.0)]
    pub frequency: f32,

    /// Number of harmonics the shape controls drive
    #[arg(long, default_value_t = 16)]
    pub harmonics: usize,

    /// Even-harmonic shape (0.0 - 1.0)
    #[arg(long)]
    pub shape_x: Option<f32>,

    /// Odd-harmonic shape (0.0 - 1.0)
    #[arg(long)]
    pub shape_y: Option<f32>,

    /// Explicit harmonic gains, fundamental first (e.g. 1,0,0.5)
    #[arg(long, value_delimiter = ',', num_args = 1..)]
    pub gains: Vec<f32>,

    /// Output volume (0.0 - 1.0)
    #[arg(long, default_value_t = 0.5)]
    pub volume: f32,

    /// Pan (0.0 = left, 0.5 = center, 1.0 = right)
    #[arg(long, default_value_t = 0.5)]
    pub pan: f32,

    /// Playback length in seconds
    #[arg(long, default_value_t = 5.0)]
    pub duration: f32,

    /// Sample rate for offline analysis
    #[arg(long, default_value_t = 48_000)]
    pub sample_rate: u32,

    /// Render offline and print the harmonic spectrum instead of playing
    #[arg(long, default_value_t = false)]
    pub analyze: bool,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let args = Args::parse();
    let (chain, control) = build_voice(&args);

    if args.analyze {
        analyze::run(&args, chain)
    } else {
        player::run(&args, chain, control)
    }
}

/// Build a voice and apply the harmonic arguments to it.
fn build_voice(args: &Args) -> (VoiceChain, VoiceControl) {
    let config = VoiceConfig {
        harmonic_count: args.harmonics.clamp(1, MAX_HARMONICS),
        frequency: args.frequency,
        volume: args.volume,
        pan: args.pan,
        ..VoiceConfig::default()
    };
    let (chain, mut control) = VoiceChain::new(&config);

    if !args.gains.is_empty() {
        control.oscillator.set_harmonic_gains(&args.gains);
    }
    if let Some(x) = args.shape_x {
        control.oscillator.set_shape_x(x);
    }
    if let Some(y) = args.shape_y {
        control.oscillator.set_shape_y(y);
    }

    log::info!(
        "harmonic gains: {:?}",
        control.oscillator.current_harmonic_gains()
    );

    (chain, control)
}

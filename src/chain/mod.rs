//! Block-processing stages and their composition into a voice.
//!
//! Each stage implements [`node::Processor`]. Stages that take control input
//! come as an audio-side/control-side pair, so the control thread never
//! touches the audio thread's data directly.

/// Volume and equal-power pan stage.
pub mod gain;
/// `Processor` trait, `ProcessSpec` and the planar `AudioBlock` view.
pub mod node;
/// Harmonic waveshaping oscillator and its control handle.
pub mod oscillator;
/// Oscillator → meter → gain → meter.
pub mod voice;

pub use gain::{GainHandle, GainStage};
pub use node::{AudioBlock, ProcessSpec, Processor};
pub use oscillator::{OscillatorHandle, WaveshapingOscillator};
pub use voice::{VoiceChain, VoiceControl};

mod atomic;
pub mod chain; // Processor stages and the voice chain
pub mod config;
pub mod dsp;

pub use chain::{AudioBlock, ProcessSpec, Processor, VoiceChain, VoiceControl};
pub use config::{MeterConfig, VoiceConfig};

pub const MAX_BLOCK_SIZE: usize = 2048;
pub const MAX_HARMONICS: usize = 32;

//! Construction-time settings for a voice chain.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::dsp::harmonics::{DEFAULT_HARMONIC_COUNT, ROLLOFF_SHARPNESS};
use crate::MAX_HARMONICS;

/// Peak meter hold and decay timing.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeterConfig {
    /// Hold time after a new peak before decay starts (seconds).
    pub decay_delay_seconds: f32,
    /// Multiplier applied on each decay step.
    pub decay_factor: f32,
    /// Time between decay steps (seconds).
    pub decay_interval_seconds: f32,
}

impl MeterConfig {
    pub const DEFAULT_DECAY_DELAY_SECONDS: f32 = 0.5;
    pub const DEFAULT_DECAY_FACTOR: f32 = 0.9;
    pub const DEFAULT_DECAY_INTERVAL_SECONDS: f32 = 0.1;

    /// Replace unusable values with the defaults.
    pub fn sanitized(self) -> Self {
        let decay_delay_seconds = if self.decay_delay_seconds.is_finite() {
            self.decay_delay_seconds.max(0.0)
        } else {
            Self::DEFAULT_DECAY_DELAY_SECONDS
        };

        let decay_factor = if self.decay_factor.is_finite() {
            self.decay_factor.clamp(0.0, 1.0)
        } else {
            Self::DEFAULT_DECAY_FACTOR
        };

        let decay_interval_seconds =
            if self.decay_interval_seconds.is_finite() && self.decay_interval_seconds > 0.0 {
                self.decay_interval_seconds
            } else {
                Self::DEFAULT_DECAY_INTERVAL_SECONDS
            };

        Self {
            decay_delay_seconds,
            decay_factor,
            decay_interval_seconds,
        }
    }
}

impl Default for MeterConfig {
    fn default() -> Self {
        Self {
            decay_delay_seconds: Self::DEFAULT_DECAY_DELAY_SECONDS,
            decay_factor: Self::DEFAULT_DECAY_FACTOR,
            decay_interval_seconds: Self::DEFAULT_DECAY_INTERVAL_SECONDS,
        }
    }
}

/// Everything `VoiceChain::new` needs up front.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, PartialEq)]
pub struct VoiceConfig {
    /// Length of the harmonic gain vector (1 ..= MAX_HARMONICS).
    pub harmonic_count: usize,
    /// How fast the shape controls roll off upper harmonics.
    pub rolloff_sharpness: f32,
    /// Initial oscillator frequency (Hz).
    pub frequency: f32,
    /// Initial output volume (0.0 - 1.0). Starts silent.
    pub volume: f32,
    /// Initial pan (0.0 = left, 0.5 = center, 1.0 = right).
    pub pan: f32,
    /// Depth of the coefficient publish queue.
    pub queue_size: usize,
    pub meter: MeterConfig,
}

impl VoiceConfig {
    pub const DEFAULT_FREQUENCY: f32 = 440.0;
    pub const DEFAULT_QUEUE_SIZE: usize = 16;

    /// Clamp every field into its usable range.
    pub fn sanitized(self) -> Self {
        Self {
            harmonic_count: self.harmonic_count.clamp(1, MAX_HARMONICS),
            rolloff_sharpness: if self.rolloff_sharpness.is_finite()
                && self.rolloff_sharpness >= 0.0
            {
                self.rolloff_sharpness
            } else {
                ROLLOFF_SHARPNESS
            },
            frequency: if self.frequency.is_finite() {
                self.frequency
            } else {
                Self::DEFAULT_FREQUENCY
            },
            volume: clamp_unit(self.volume, 0.0),
            pan: clamp_unit(self.pan, 0.5),
            queue_size: self.queue_size.max(1),
            meter: self.meter.sanitized(),
        }
    }
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            harmonic_count: DEFAULT_HARMONIC_COUNT,
            rolloff_sharpness: ROLLOFF_SHARPNESS,
            frequency: Self::DEFAULT_FREQUENCY,
            volume: 0.0,
            pan: 0.5,
            queue_size: Self::DEFAULT_QUEUE_SIZE,
            meter: MeterConfig::default(),
        }
    }
}

/// Clamp to [0, 1], substituting `fallback` for NaN.
pub(crate) fn clamp_unit(value: f32, fallback: f32) -> f32 {
    if value.is_nan() {
        fallback
    } else {
        value.clamp(0.0, 1.0)
    }
}

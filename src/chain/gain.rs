use std::sync::Arc;

use crate::atomic::AtomicF32;
use crate::chain::node::{AudioBlock, ProcessSpec, Processor};
use crate::config::clamp_unit;
use crate::dsp::gain::{apply_gain, channel_gain};

#[derive(Debug)]
struct GainShared {
    volume: AtomicF32,
    pan: AtomicF32,
}

/// Volume + equal-power pan, applied in place.
///
/// Volume and pan are read once at the top of each block. There is no
/// smoothing; a change lands on the next block boundary.
pub struct GainStage {
    shared: Arc<GainShared>,
}

/// Control-side setters for a [`GainStage`]. Cheap to clone.
#[derive(Clone)]
pub struct GainHandle {
    shared: Arc<GainShared>,
}

impl GainStage {
    pub fn new(volume: f32, pan: f32) -> (Self, GainHandle) {
        let shared = Arc::new(GainShared {
            volume: AtomicF32::new(clamp_unit(volume, 0.0)),
            pan: AtomicF32::new(clamp_unit(pan, 0.5)),
        });

        (
            Self {
                shared: Arc::clone(&shared),
            },
            GainHandle { shared },
        )
    }
}

impl Processor for GainStage {
    fn prepare(&mut self, _spec: &ProcessSpec) {}

    fn process(&mut self, block: &mut AudioBlock<'_>) {
        let volume = self.shared.volume.load();
        let pan = self.shared.pan.load();
        let num_channels = block.num_channels();

        for channel in 0..num_channels {
            let gain = channel_gain(channel, num_channels, volume, pan);
            apply_gain(block.channel_mut(channel), gain);
        }
    }

    fn reset(&mut self) {}
}

impl GainHandle {
    /// Output volume, clamped to [0, 1].
    pub fn set_volume(&self, volume: f32) {
        self.shared.volume.store(clamp_unit(volume, 0.0));
    }

    /// Pan position, clamped to [0, 1] (0.5 = center).
    pub fn set_pan(&self, pan: f32) {
        self.shared.pan.store(clamp_unit(pan, 0.5));
    }

    pub fn volume(&self) -> f32 {
        self.shared.volume.load()
    }

    pub fn pan(&self) -> f32 {
        self.shared.pan.load()
    }
}

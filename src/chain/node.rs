/// Host stream parameters handed to `Processor::prepare`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProcessSpec {
    pub sample_rate: f64,
    pub max_block_size: usize,
    pub num_channels: usize,
}

impl ProcessSpec {
    pub fn new(sample_rate: f64, max_block_size: usize, num_channels: usize) -> Self {
        Self {
            sample_rate,
            max_block_size,
            num_channels,
        }
    }
}

/// Planar multi-channel view over one contiguous buffer.
///
/// Channel `c` occupies `data[c * num_samples .. (c + 1) * num_samples]`.
pub struct AudioBlock<'a> {
    data: &'a mut [f32],
    num_channels: usize,
    num_samples: usize,
}

impl<'a> AudioBlock<'a> {
    /// Split `data` into `num_channels` equal channels. Trailing samples that
    /// don't fill a whole frame are left out of the view.
    pub fn new(data: &'a mut [f32], num_channels: usize) -> Self {
        let num_samples = if num_channels == 0 {
            0
        } else {
            data.len() / num_channels
        };
        let (data, _) = data.split_at_mut(num_samples * num_channels);

        Self {
            data,
            num_channels,
            num_samples,
        }
    }

    pub fn mono(data: &'a mut [f32]) -> Self {
        Self::new(data, 1)
    }

    pub fn num_channels(&self) -> usize {
        self.num_channels
    }

    pub fn num_samples(&self) -> usize {
        self.num_samples
    }

    pub fn channel(&self, channel: usize) -> &[f32] {
        let start = channel * self.num_samples;
        &self.data[start..start + self.num_samples]
    }

    pub fn channel_mut(&mut self, channel: usize) -> &mut [f32] {
        let start = channel * self.num_samples;
        &mut self.data[start..start + self.num_samples]
    }

    pub fn channels(&self) -> impl Iterator<Item = &[f32]> {
        self.data.chunks_exact(self.num_samples.max(1))
    }

    /// First channel, and every other channel as one slice.
    pub fn split_first_channel(&mut self) -> (&mut [f32], &mut [f32]) {
        self.data.split_at_mut(self.num_samples)
    }

    pub fn fill(&mut self, value: f32) {
        self.data.fill(value);
    }

    /// Largest |sample| across every channel.
    pub fn peak_abs(&self) -> f32 {
        self.data.iter().fold(0.0f32, |peak, s| peak.max(s.abs()))
    }

    pub fn as_slice(&self) -> &[f32] {
        self.data
    }
}

/// Block-processing contract shared by every stage of the chain.
///
/// `prepare` runs before the first `process` and whenever the host changes
/// sample rate or block size. `process` runs once per audio callback and must
/// not allocate, lock, or block.
pub trait Processor: Send {
    fn prepare(&mut self, spec: &ProcessSpec);

    fn process(&mut self, block: &mut AudioBlock<'_>);

    /// Clear transient state without touching the sample rate.
    fn reset(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn planar_layout() {
        let mut data = vec![0.0, 1.0, 2.0, 10.0, 11.0, 12.0];
        let block = AudioBlock::new(&mut data, 2);
        assert_eq!(block.num_samples(), 3);
        assert_eq!(block.channel(0), &[0.0, 1.0, 2.0]);
        assert_eq!(block.channel(1), &[10.0, 11.0, 12.0]);
        assert_eq!(block.channels().count(), 2);
    }

    #[test]
    fn ragged_tail_is_excluded() {
        let mut data = vec![1.0; 7];
        let block = AudioBlock::new(&mut data, 2);
        assert_eq!(block.num_samples(), 3);
        assert_eq!(block.as_slice().len(), 6);
    }

    #[test]
    fn empty_blocks_are_harmless() {
        let mut data: Vec<f32> = Vec::new();
        let mut block = AudioBlock::new(&mut data, 2);
        assert_eq!(block.num_samples(), 0);
        assert_eq!(block.channels().count(), 0);
        assert_eq!(block.peak_abs(), 0.0);
        block.fill(1.0);

        let mut data = vec![1.0; 4];
        let block = AudioBlock::new(&mut data, 0);
        assert_eq!(block.num_channels(), 0);
        assert_eq!(block.channels().count(), 0);
    }

    #[test]
    fn peak_spans_all_channels() {
        let mut data = vec![0.1, -0.2, 0.3, -0.9];
        let block = AudioBlock::new(&mut data, 2);
        assert_eq!(block.peak_abs(), 0.9);
    }

    #[test]
    fn split_first_channel_separates_rest() {
        let mut data = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let mut block = AudioBlock::new(&mut data, 3);
        let (first, rest) = block.split_first_channel();
        assert_eq!(first, &[1.0, 2.0]);
        assert_eq!(rest, &[3.0, 4.0, 5.0, 6.0]);
    }
}

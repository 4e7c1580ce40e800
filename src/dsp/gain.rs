use std::f32::consts::FRAC_PI_2;

/*
Equal-Power Panning
===================

Panning with plain linear gains (left = 1 - pan, right = pan) makes the sound
dip in the middle: at center both sides play at 0.5, which is about 3 dB
quieter than either extreme. Using a quarter sine/cosine keeps the total
power constant:

    angle = pan · π/2
    left  = cos(angle) · volume
    right = sin(angle) · volume

    left² + right² = volume²    for every pan position

    pan   left    right
    0.0   1.000   0.000    hard left
    0.5   0.707   0.707    center (-3 dB each side)
    1.0   0.000   1.000    hard right

Channel layouts:
  mono          volume only, no pan
  stereo        channel 0 = left, channel 1 = right
  multichannel  even channels take the left gain, odd channels the right
*/

/// (left, right) gains for `volume` and `pan`, both in [0, 1].
#[inline]
pub fn equal_power_gains(volume: f32, pan: f32) -> (f32, f32) {
    let angle = pan * FRAC_PI_2;
    (angle.cos() * volume, angle.sin() * volume)
}

/// Gain for one channel of a `num_channels` layout.
#[inline]
pub fn channel_gain(channel: usize, num_channels: usize, volume: f32, pan: f32) -> f32 {
    if num_channels <= 1 {
        return volume;
    }

    let (left, right) = equal_power_gains(volume, pan);
    if channel % 2 == 0 {
        left
    } else {
        right
    }
}

/// Scale a buffer in place.
pub fn apply_gain(buffer: &mut [f32], gain: f32) {
    for sample in buffer.iter_mut() {
        *sample *= gain;
    }
}

use std::sync::atomic::{AtomicU32, Ordering};

/// f32 stored as its bit pattern in an `AtomicU32`.
///
/// Loads and stores are single-word and lock-free. There is no
/// read-modify-write; every field that uses this has exactly one writer.
#[derive(Debug, Default)]
pub(crate) struct AtomicF32(AtomicU32);

impl AtomicF32 {
    pub(crate) fn new(value: f32) -> Self {
        Self(AtomicU32::new(value.to_bits()))
    }

    #[inline]
    pub(crate) fn load(&self) -> f32 {
        f32::from_bits(self.0.load(Ordering::Relaxed))
    }

    #[inline]
    pub(crate) fn store(&self, value: f32) {
        self.0.store(value.to_bits(), Ordering::Relaxed);
    }
}

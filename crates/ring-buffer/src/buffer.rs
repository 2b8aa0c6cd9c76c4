//! Lock-Free Channel Ring Implementation

use std::sync::atomic::{AtomicI16, AtomicU64, Ordering};

/// Default ring capacity (1024 samples = ~1 s at 1 kHz)
pub const DEFAULT_CAPACITY: usize = 1024;

/// Lock-free SPSC ring of signed 16-bit samples for one channel.
///
/// Writes never fail: once `capacity` samples have been pushed, every push
/// overwrites the oldest entry. Each slot is an atomic cell, so a reader can
/// never observe a half-written sample.
pub struct ChannelRing {
    /// Pre-allocated storage
    slots: Box<[AtomicI16]>,
    /// Total samples pushed. Published last by `push`; the write cursor
    /// (`head`) is derived from it.
    written: AtomicU64,
}

impl ChannelRing {
    /// Create a new ring with given capacity
    ///
    /// # Panics
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "Ring capacity must be > 0");
        let slots: Vec<AtomicI16> = (0..capacity).map(|_| AtomicI16::new(0)).collect();
        Self {
            slots: slots.into_boxed_slice(),
            written: AtomicU64::new(0),
        }
    }

    /// Create a ring with default capacity (1024 samples)
    pub fn with_default_capacity() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }

    /// Push a sample into the ring (overwrites oldest if full)
    ///
    /// Must only be called from a single writer.
    pub fn push(&self, value: i16) {
        let written = self.written.load(Ordering::Relaxed);
        let head = self.slot_index(written);

        self.slots[head].store(value, Ordering::Relaxed);

        // Advancing the cursor is the last step; Release pairs with the
        // Acquire loads on the reader side.
        self.written.store(written + 1, Ordering::Release);
    }

    /// Most recently pushed sample, or `None` before the first push
    pub fn latest(&self) -> Option<i16> {
        let written = self.written.load(Ordering::Acquire);
        if written == 0 {
            return None;
        }
        let idx = self.slot_index(written - 1);
        Some(self.slots[idx].load(Ordering::Relaxed))
    }

    /// Copy of the retained samples, oldest first
    ///
    /// Under a concurrent writer the oldest entries may already have been
    /// replaced by newer ones; every returned value is still a complete sample.
    pub fn snapshot(&self) -> Vec<i16> {
        let written = self.written.load(Ordering::Acquire);
        let len = self.retained(written);
        let start = written - len as u64;

        (0..len as u64)
            .map(|i| self.slots[self.slot_index(start + i)].load(Ordering::Relaxed))
            .collect()
    }

    /// Index of the next slot to be written, in `[0, capacity)`
    pub fn head(&self) -> usize {
        self.slot_index(self.written.load(Ordering::Acquire))
    }

    /// Number of samples currently retained (`min(pushes, capacity)`)
    pub fn len(&self) -> usize {
        self.retained(self.written.load(Ordering::Acquire))
    }

    /// Check if nothing has been pushed yet
    pub fn is_empty(&self) -> bool {
        self.written.load(Ordering::Acquire) == 0
    }

    /// Check if the ring has wrapped at least once
    pub fn is_full(&self) -> bool {
        self.len() == self.capacity()
    }

    /// Get the ring capacity
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Total samples pushed since creation, including overwritten ones
    pub fn total_written(&self) -> u64 {
        self.written.load(Ordering::Relaxed)
    }

    fn slot_index(&self, position: u64) -> usize {
        (position % self.slots.len() as u64) as usize
    }

    fn retained(&self, written: u64) -> usize {
        written.min(self.slots.len() as u64) as usize
    }
}

impl Default for ChannelRing {
    fn default() -> Self {
        Self::with_default_capacity()
    }
}

impl std::fmt::Debug for ChannelRing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChannelRing")
            .field("capacity", &self.capacity())
            .field("head", &self.head())
            .field("len", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_empty_ring_has_no_latest() {
        let ring = ChannelRing::new(8);
        assert_eq!(ring.latest(), None);
        assert!(ring.is_empty());
        assert_eq!(ring.head(), 0);
        assert!(ring.snapshot().is_empty());
    }

    #[test]
    fn test_overwrite_oldest() {
        let ring = ChannelRing::new(4);

        for value in [5, -5, 100, -100, 7] {
            ring.push(value);
        }

        assert_eq!(ring.latest(), Some(7));
        assert_eq!(ring.snapshot(), vec![-5, 100, -100, 7]);
        assert_eq!(ring.len(), 4);
        assert!(ring.is_full());
        assert_eq!(ring.total_written(), 5);
    }

    #[test]
    fn test_head_wraps() {
        let ring = ChannelRing::new(3);

        ring.push(1);
        ring.push(2);
        assert_eq!(ring.head(), 2);

        ring.push(3);
        assert_eq!(ring.head(), 0);
        assert_eq!(ring.latest(), Some(3));
    }

    #[test]
    fn test_extreme_values() {
        let ring = ChannelRing::new(2);
        ring.push(i16::MIN);
        assert_eq!(ring.latest(), Some(i16::MIN));
        ring.push(i16::MAX);
        assert_eq!(ring.latest(), Some(i16::MAX));
    }

    #[test]
    #[should_panic]
    fn test_zero_capacity_panics() {
        let _ = ChannelRing::new(0);
    }

    #[test]
    fn test_concurrent_reader_sees_pushed_values() {
        use std::sync::Arc;

        let ring = Arc::new(ChannelRing::new(16));
        let writer = Arc::clone(&ring);

        let handle = std::thread::spawn(move || {
            for i in 0..10_000i32 {
                writer.push((i % 1000) as i16);
            }
        });

        // Every observed value must be one the writer actually produced
        for _ in 0..10_000 {
            if let Some(value) = ring.latest() {
                assert!((0..1000).contains(&value));
            }
        }

        handle.join().unwrap();
        assert_eq!(ring.latest(), Some(999));
    }

    proptest! {
        #[test]
        fn prop_latest_is_last_push(values in prop::collection::vec(any::<i16>(), 1..200), cap in 1usize..64) {
            let ring = ChannelRing::new(cap);
            for &v in &values {
                ring.push(v);
                prop_assert_eq!(ring.latest(), Some(v));
            }
        }

        #[test]
        fn prop_retains_last_capacity_values(values in prop::collection::vec(any::<i16>(), 0..300), cap in 1usize..64) {
            let ring = ChannelRing::new(cap);
            for &v in &values {
                ring.push(v);
            }
            let keep = values.len().min(cap);
            let expected = values[values.len() - keep..].to_vec();
            prop_assert_eq!(ring.snapshot(), expected);
            prop_assert!(ring.head() < cap);
        }
    }
}

//! Lock-free bounded SPSC ring buffer.
//!
//! A fixed-capacity power-of-two ring carrying values from exactly one
//! producer context to exactly one consumer context without mutual
//! exclusion. The producer owns the write index, the consumer owns the read
//! index; the only cross-context communication is each side publishing its
//! index with release ordering and observing the other's with acquire
//! ordering.
//!
//! One slot is sacrificed to distinguish full from empty: with capacity `N`
//! the ring holds at most `N - 1` unread values. A push into a full ring
//! returns the rejected value and changes nothing — the producer runs in
//! interrupt context where blocking is not an option, so overflow loses the
//! newest event by design.
//!
//! # Example
//!
//! ```
//! use pedal_core::ring::EventRing;
//!
//! static RING: EventRing<u32, 8> = EventRing::new();
//!
//! let (mut tx, mut rx) = RING.split().unwrap();
//! tx.push(7).unwrap();
//! assert_eq!(rx.pop(), Some(7));
//! assert_eq!(rx.pop(), None);
//! ```

use core::cell::UnsafeCell;
use core::mem::MaybeUninit;

use portable_atomic::{AtomicBool, AtomicUsize, Ordering};

/// Fixed-capacity SPSC ring. `N` must be a power of two.
///
/// Designed to live in a `static` and be split once into its
/// [`Producer`]/[`Consumer`] halves, one per execution context.
pub struct EventRing<T, const N: usize> {
    slots: [UnsafeCell<MaybeUninit<T>>; N],
    /// Next slot to write; advanced only by the producer.
    write: AtomicUsize,
    /// Next slot to read; advanced only by the consumer.
    read: AtomicUsize,
    taken: AtomicBool,
}

// The ring hands each T to exactly one side at a time; the atomics order the
// handoff.
unsafe impl<T: Send, const N: usize> Sync for EventRing<T, N> {}

impl<T, const N: usize> EventRing<T, N> {
    const CAPACITY_OK: () = assert!(N.is_power_of_two() && N >= 2, "capacity must be a power of two");

    /// Create an empty ring.
    #[must_use]
    pub const fn new() -> Self {
        let () = Self::CAPACITY_OK;
        Self {
            // MaybeUninit: slots hold no value until the producer writes one
            slots: [const { UnsafeCell::new(MaybeUninit::uninit()) }; N],
            write: AtomicUsize::new(0),
            read: AtomicUsize::new(0),
            taken: AtomicBool::new(false),
        }
    }

    /// Split the ring into its producer and consumer halves.
    ///
    /// Succeeds exactly once; later calls return `None`. This is what makes
    /// the single-producer/single-consumer contract hold: each half is the
    /// only handle that can touch its index.
    pub fn split(&self) -> Option<(Producer<'_, T, N>, Consumer<'_, T, N>)> {
        if self.taken.swap(true, Ordering::AcqRel) {
            return None;
        }
        Some((Producer { ring: self }, Consumer { ring: self }))
    }

    #[inline]
    const fn wrap(index: usize) -> usize {
        (index + 1) & (N - 1)
    }
}

impl<T, const N: usize> Default for EventRing<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, const N: usize> Drop for EventRing<T, N> {
    fn drop(&mut self) {
        // &mut self: both halves are gone, plain loads are fine.
        let mut read = self.read.load(Ordering::Relaxed);
        let write = self.write.load(Ordering::Relaxed);
        while read != write {
            // SAFETY: slots in [read, write) were initialized by the
            // producer and not yet consumed.
            unsafe { (*self.slots[read].get()).assume_init_drop() };
            read = Self::wrap(read);
        }
    }
}

/// Write half of an [`EventRing`]. Exactly one exists per ring.
pub struct Producer<'a, T, const N: usize> {
    ring: &'a EventRing<T, N>,
}

impl<'a, T, const N: usize> Producer<'a, T, N> {
    /// Push a value, or give it back if the ring is full.
    ///
    /// Never blocks. The release store of the write index is the publish
    /// point: the slot's contents are visible to the consumer before the
    /// index movement is.
    pub fn push(&mut self, value: T) -> Result<(), T> {
        let ring = self.ring;
        let write = ring.write.load(Ordering::Relaxed);
        let next = EventRing::<T, N>::wrap(write);
        // Acquire pairs with the consumer's release in `pop`: the slot we
        // are about to overwrite has really been vacated.
        if next == ring.read.load(Ordering::Acquire) {
            return Err(value);
        }
        // SAFETY: `write` is owned by this (sole) producer and the slot is
        // outside [read, write), so the consumer is not reading it.
        unsafe { (*ring.slots[write].get()).write(value) };
        ring.write.store(next, Ordering::Release);
        Ok(())
    }

    /// Whether a push would currently be rejected.
    #[must_use]
    pub fn is_full(&self) -> bool {
        let next = EventRing::<T, N>::wrap(self.ring.write.load(Ordering::Relaxed));
        next == self.ring.read.load(Ordering::Acquire)
    }
}

/// Read half of an [`EventRing`]. Exactly one exists per ring.
pub struct Consumer<'a, T, const N: usize> {
    ring: &'a EventRing<T, N>,
}

impl<'a, T, const N: usize> Consumer<'a, T, N> {
    /// Whether there is nothing to read.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ring.read.load(Ordering::Relaxed) == self.ring.write.load(Ordering::Acquire)
    }

    /// Peek at the oldest unread value without consuming it.
    #[must_use]
    pub fn front(&self) -> Option<&T> {
        if self.is_empty() {
            return None;
        }
        let read = self.ring.read.load(Ordering::Relaxed);
        // SAFETY: non-empty, so the slot at `read` was published by the
        // producer; the acquire load in `is_empty` ordered its contents.
        Some(unsafe { (*self.ring.slots[read].get()).assume_init_ref() })
    }

    /// Take the oldest unread value.
    ///
    /// The release store of the read index hands the slot back to the
    /// producer only after the value has been read out of it.
    pub fn pop(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        let read = self.ring.read.load(Ordering::Relaxed);
        // SAFETY: as in `front`; the value is moved out exactly once because
        // the index advances before the slot can be observed again.
        let value = unsafe { (*self.ring.slots[read].get()).assume_init_read() };
        self.ring
            .read
            .store(EventRing::<T, N>::wrap(read), Ordering::Release);
        Some(value)
    }

    /// Number of unread values.
    #[must_use]
    pub fn len(&self) -> usize {
        let read = self.ring.read.load(Ordering::Relaxed);
        let write = self.ring.write.load(Ordering::Acquire);
        write.wrapping_sub(read) & (N - 1)
    }
}

//! Interrupt-context edge producer.

use crate::ring::Producer;
use crate::traits::EdgeMask;
use crate::types::{EdgeEvent, Pedal};

/// The interrupt-context half of the discrete pedal path.
///
/// On each hardware edge the handler clears its pending flag (hardware
/// specific, done before calling in) and hands over here: mask the source,
/// timestamp, enqueue. O(1), allocation-free, and non-reentrant per pedal —
/// the mask guarantees the same pedal cannot fire again until the debounce
/// engine re-arms it.
///
/// `on_edge` never re-arms and never touches the state machine; re-arming
/// is exclusively the engine's release/timeout paths. That asymmetry is
/// what prevents a pedal from producing a second event while its first is
/// unresolved.
pub struct EdgeCapture<'a, M, const N: usize> {
    producer: Producer<'a, EdgeEvent, N>,
    mask: M,
}

impl<'a, M: EdgeMask, const N: usize> EdgeCapture<'a, M, N> {
    /// Build the capture front-end from the ring's producer half and the
    /// platform's mask control.
    pub fn new(producer: Producer<'a, EdgeEvent, N>, mask: M) -> Self {
        Self { producer, mask }
    }

    /// Record one hardware edge at tick `now`.
    ///
    /// If the ring is full the event is lost silently; the producer must
    /// not block and the engine's timeout path keeps the system live.
    pub fn on_edge(&mut self, pedal: Pedal, now: u32) {
        self.mask.mask(pedal);
        let _ = self.producer.push(EdgeEvent { pedal, at: now });
    }
}

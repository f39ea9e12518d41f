//! Platform seams: pin queries, interrupt masking, message output, indicator.

use crate::types::{OutboundMessage, Pedal};

/// Synchronous level query for the discrete pedal pins.
///
/// `is_asserted` must reflect the live electrical level at the moment of the
/// call; the debounce engine uses it to re-check a pin after the debounce
/// window.
pub trait PedalPins {
    /// Whether the pedal's contact reads as closed right now.
    fn is_asserted(&self, pedal: Pedal) -> bool;
}

/// Control over the per-pedal edge interrupt sources.
///
/// The mask register is shared across all pedal sources, so implementations
/// must perform `rearm` as a read-modify-write with interrupts globally
/// suppressed for the duration of that single operation; a torn update could
/// fail to re-arm the intended pedal or disturb another. `mask` is only
/// called from the pedal's own handler, which cannot race itself.
pub trait EdgeMask {
    /// Suppress further edge interrupts for this pedal.
    fn mask(&mut self, pedal: Pedal);
    /// Re-enable edge interrupts for this pedal.
    fn rearm(&mut self, pedal: Pedal);
}

/// Destination for outbound messages.
///
/// Fire-and-forget: the engine never learns about transport-side loss. A
/// full outbound buffer drops the message (bounded buffering trades
/// completeness for liveness, same policy as the event ring); implementations
/// may log the drop.
pub trait MessageSink {
    fn send(&mut self, msg: OutboundMessage);
}

/// Visual press indicator (an LED in the reference hardware).
pub trait Indicator {
    fn set_active(&mut self, on: bool);
}

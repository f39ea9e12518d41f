//! Core pedal types: Pedal, EdgeEvent, PedalPhase, PedalAction, OutboundMessage.

use midi_proto::MidiMessage;

/// Identity of one discrete pedal input.
///
/// The set is fixed for the process lifetime; [`Pedal::index`] gives a
/// stable array index for per-pedal state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Pedal {
    A,
    B,
    C,
    D,
}

impl Pedal {
    /// Number of discrete pedals.
    pub const COUNT: usize = 4;

    /// All pedals, in index order.
    pub const ALL: [Pedal; Pedal::COUNT] = [Pedal::A, Pedal::B, Pedal::C, Pedal::D];

    /// Stable index for per-pedal arrays.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// One accepted hardware edge, produced in interrupt context.
///
/// The debounce phase lives in the engine's per-pedal slot, not in the
/// queued record; the event only says *which* pedal fired and *when*.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EdgeEvent {
    pub pedal: Pedal,
    /// Capture timestamp in ticks; wraps at the counter width.
    pub at: u32,
}

/// Debounce state of one pedal.
///
/// `Idle` is both initial and terminal; while the phase is not `Idle` the
/// pedal's interrupt source is masked.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PedalPhase {
    #[default]
    Idle,
    /// Edge captured, not yet confirmed.
    Worked,
    /// Confirmed press, awaiting time-based release.
    Pressed,
}

/// Per-pedal outbound message template, fixed at compile time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PedalAction {
    /// MIDI Note On with a fixed velocity; no explicit release message
    /// (note-off is implied by the device's retrigger semantics).
    Note { note: u8, velocity: u8 },
    /// HID key-down with the given usage code; an explicit key-up is sent
    /// on release.
    Key { scancode: u8 },
}

/// A message leaving the engine, ready for the transport layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OutboundMessage {
    /// A 3-byte MIDI channel message.
    Midi(MidiMessage),
    /// A keyboard report with the given key held.
    KeyPress(u8),
    /// An empty keyboard report (all keys up).
    KeyRelease,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pedal_indices_are_dense() {
        for (i, pedal) in Pedal::ALL.iter().enumerate() {
            assert_eq!(pedal.index(), i);
        }
    }

    #[test]
    fn test_phase_default_is_idle() {
        assert_eq!(PedalPhase::default(), PedalPhase::Idle);
    }
}

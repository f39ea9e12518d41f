//! Compile-time configuration.
//!
//! Everything here is fixed at build time; there is no runtime mutation of
//! thresholds or mappings. Tick-based values assume the 100 µs tick the
//! firmware's time driver is configured for.

use crate::types::{Pedal, PedalAction};

/// Tick rate the threshold constants are expressed in (100 µs per tick).
pub const TICK_HZ: u32 = 10_000;

/// Event ring capacity. Power of two; one slot is sacrificed, and masking
/// bounds outstanding events to one per pedal anyway.
pub const RING_CAPACITY: usize = 8;

/// Debounce window: a captured edge is re-checked against the live pin
/// level once this many ticks have passed (80 ms).
pub const DEBOUNCE_TICKS: u32 = 800;

/// A confirmed press is considered released this many ticks after its edge,
/// regardless of the live pin level (200 ms).
pub const RELEASE_TICKS: u32 = 2000;

/// An unconfirmed edge whose pin never re-asserted is discarded as a false
/// trigger after this many ticks (300 ms).
pub const TIMEOUT_TICKS: u32 = 3000;

/// ADC readings below this are treated as this floor value; near-zero
/// sensor noise must not read as a valid low position.
pub const ADC_FLOOR: i32 = 300;

/// Minimum change from the last accepted reading before a new sample is
/// accepted at all.
pub const ADC_HYSTERESIS: i32 = 14;

/// Divisor mapping the raw ADC range onto controller values.
pub const ADC_SCALE: i32 = 30;

/// Subtracted after scaling, before clamping to 0..=127.
pub const ADC_OFFSET: i32 = 9;

/// MIDI channel for the expression pedal's Control Change stream.
pub const EXPRESSION_CHANNEL: u8 = 0;

/// Controller number for the expression pedal (sustain).
pub const EXPRESSION_CONTROLLER: u8 = midi_proto::message::controller::SUSTAIN;

/// MIDI channel the note pedals play on.
pub const NOTE_CHANNEL: u8 = 1;

/// Per-pedal outbound templates. A and B play notes; C and D type the
/// right/left arrow keys (HID usage codes 0x4F / 0x50).
pub const PEDAL_ACTIONS: [PedalAction; Pedal::COUNT] = [
    PedalAction::Note { note: 60, velocity: 44 },
    PedalAction::Note { note: 61, velocity: 33 },
    PedalAction::Key { scancode: 0x4F },
    PedalAction::Key { scancode: 0x50 },
];

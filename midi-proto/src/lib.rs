//! MIDI 1.0 channel message formatting for the pedal bridge.
//!
//! This crate provides stateless formatting of the fixed 3-byte MIDI channel
//! messages the bridge emits, plus the 14-bit high-resolution codec used when
//! a value wider than MIDI's native 7-bit data field has to travel as two
//! linked standard messages.
//!
//! # Overview
//!
//! - [`message`]: the 3-byte tuple ([`MidiMessage`]) and its constructors
//! - [`hires`]: 14-bit split/merge, the CC MSB/LSB pair convention, the
//!   CC 88 velocity-prefix convention, and the companion decoders
//!
//! # Message Format
//!
//! Every message is a fixed 3-byte tuple:
//!
//! ```text
//! <status> <data1> <data2>
//! ```
//!
//! - `status` - message kind in the high nibble, MIDI channel in the low
//! - `data1` - note or controller number (0-127)
//! - `data2` - velocity or controller value (0-127)
//!
//! # 14-bit Values
//!
//! Two linking conventions are supported:
//!
//! 1. **CC pairs**: controllers 0-31 carry the MSB; the LSB follows on
//!    `controller + 32`. Sent MSB first.
//! 2. **Velocity prefix**: CC 88 (High Resolution Velocity Prefix) carries
//!    the velocity MSB immediately before a note message carrying the LSB.
//!
//! # Example
//!
//! ```
//! use midi_proto::{MidiMessage, hires};
//!
//! let msg = MidiMessage::note_on(1, 60, 44);
//! assert_eq!(msg.to_bytes(), [0x91, 60, 44]);
//!
//! let [msb, lsb] = hires::cc_14bit(0, hires::controller::EXPRESSION, 12345);
//! assert_eq!(hires::merge14(msb.data2, lsb.data2), 12345);
//! ```
//!
//! # Features
//!
//! - **`std`**: Enable standard library support (for host testing)
//! - **`defmt`**: Enable defmt formatting (for embedded logging)
//!
//! # No-std Support
//!
//! This crate is `#![no_std]` by default and uses no heap allocations.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "std")]
extern crate std;

pub mod hires;
pub mod message;

// Re-export main types at crate root
pub use hires::{CcHiResDecoder, HiResCc, NoteHiResDecoder, NoteEvent};
pub use message::MidiMessage;

//! 14-bit high-resolution value codec.
//!
//! MIDI data bytes are 7-bit, so a 14-bit value travels as two linked
//! standard messages. Two conventions exist and both are implemented here:
//!
//! 1. **CC pairs**: controllers 0-31 carry the MSB, the matching LSB follows
//!    on `controller + 32`. Sent MSB first.
//! 2. **Velocity prefix**: CC 88 carries the velocity MSB immediately before
//!    a Note On/Off carrying the velocity LSB.
//!
//! The companion decoders buffer an arriving MSB and commit on the matching
//! LSB as `(MSB << 7) | LSB`. A new MSB always overwrites a pending one for
//! the same key; an MSB never followed by its LSB is never committed and
//! stays buffered.

use crate::message::{self, MidiMessage};

/// Maximum 14-bit value.
pub const MAX_14BIT: u16 = 16383;
/// Center value (pitch-bend neutral).
pub const CENTER_14BIT: u16 = 8192;

/// Controllers that have a defined MSB/LSB pair (MSB number; LSB is +32).
pub mod controller {
    pub const BANK_SELECT: u8 = 0;
    pub const MODULATION: u8 = 1;
    pub const BREATH: u8 = 2;
    pub const VOLUME: u8 = 7;
    pub const PAN: u8 = 10;
    pub const EXPRESSION: u8 = 11;

    /// Offset between an MSB controller number and its LSB companion.
    pub const LSB_OFFSET: u8 = 32;
}

/// Split a 14-bit value into `(msb, lsb)` seven-bit halves.
#[inline]
#[must_use]
pub const fn split14(value: u16) -> (u8, u8) {
    (((value >> 7) & 0x7F) as u8, (value & 0x7F) as u8)
}

/// Merge seven-bit halves back into the 14-bit value.
#[inline]
#[must_use]
pub const fn merge14(msb: u8, lsb: u8) -> u16 {
    (((msb & 0x7F) as u16) << 7) | ((lsb & 0x7F) as u16)
}

/// Widen a 7-bit value to 14-bit by placing it in the MSB half.
#[inline]
#[must_use]
pub const fn widen7(value: u8) -> u16 {
    ((value & 0x7F) as u16) << 7
}

/// Narrow a 14-bit value to 7-bit, keeping the MSB half.
#[inline]
#[must_use]
pub const fn narrow14(value: u16) -> u8 {
    ((value >> 7) & 0x7F) as u8
}

/// Widen a 12-bit ADC reading (0-4095) to 14-bit.
#[inline]
#[must_use]
pub const fn adc12_to_14bit(raw: u16) -> u16 {
    (raw & 0x0FFF) << 2
}

/// Widen a 10-bit ADC reading (0-1023) to 14-bit.
#[inline]
#[must_use]
pub const fn adc10_to_14bit(raw: u16) -> u16 {
    (raw & 0x03FF) << 4
}

/// Map a percentage (0-100, saturating) onto the 14-bit range.
#[inline]
#[must_use]
pub const fn percent_to_14bit(percent: u8) -> u16 {
    let p = if percent > 100 { 100 } else { percent };
    ((p as u32 * MAX_14BIT as u32) / 100) as u16
}

/// Encode a 14-bit Control Change as an MSB/LSB message pair, MSB first.
///
/// `cc_msb` must be one of the paired controllers (0-31); the value is
/// clamped to [`MAX_14BIT`].
#[must_use]
pub const fn cc_14bit(channel: u8, cc_msb: u8, value: u16) -> [MidiMessage; 2] {
    let value = if value > MAX_14BIT { MAX_14BIT } else { value };
    let (msb, lsb) = split14(value);
    let cc_msb = cc_msb & 0x1F;
    [
        MidiMessage::control_change(channel, cc_msb, msb),
        MidiMessage::control_change(channel, cc_msb + controller::LSB_OFFSET, lsb),
    ]
}

/// Encode a Note On with 14-bit velocity via the CC 88 prefix convention.
///
/// Produces the prefix message (velocity MSB) followed by the Note On
/// (velocity LSB). The pair must be sent in order, back to back.
#[must_use]
pub const fn note_on_hires(channel: u8, note: u8, velocity: u16) -> [MidiMessage; 2] {
    let velocity = if velocity > MAX_14BIT { MAX_14BIT } else { velocity };
    let (msb, lsb) = split14(velocity);
    [
        MidiMessage::control_change(channel, message::controller::HIRES_VELOCITY_PREFIX, msb),
        MidiMessage::note_on(channel, note, lsb),
    ]
}

/// Encode a Note Off with 14-bit release velocity via the CC 88 prefix.
#[must_use]
pub const fn note_off_hires(channel: u8, note: u8, velocity: u16) -> [MidiMessage; 2] {
    let velocity = if velocity > MAX_14BIT { MAX_14BIT } else { velocity };
    let (msb, lsb) = split14(velocity);
    [
        MidiMessage::control_change(channel, message::controller::HIRES_VELOCITY_PREFIX, msb),
        MidiMessage::note_off(channel, note, lsb),
    ]
}

/// A recovered 14-bit controller value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HiResCc {
    /// MSB controller number (0-31).
    pub controller: u8,
    /// Merged 14-bit value.
    pub value: u16,
}

/// Decoder for the CC MSB/LSB pair convention.
///
/// Buffers an arriving MSB keyed by controller number. On a following
/// matching LSB the two halves are committed as `(MSB << 7) | LSB` and the
/// pending entry is cleared. A fresh MSB for the same controller overwrites
/// the pending one (last-MSB-wins). There is no timeout: an orphan MSB stays
/// buffered until its LSB or the next MSB arrives.
#[derive(Debug, Default)]
pub struct CcHiResDecoder {
    pending: [Option<u8>; 32],
}

impl CcHiResDecoder {
    #[must_use]
    pub const fn new() -> Self {
        Self { pending: [None; 32] }
    }

    /// Feed one received Control Change. Returns the merged value when this
    /// message completes a pair; `None` while waiting or for unpaired
    /// controllers.
    pub fn feed(&mut self, cc_num: u8, value: u8) -> Option<HiResCc> {
        match cc_num {
            0..=31 => {
                self.pending[cc_num as usize] = Some(value & 0x7F);
                None
            }
            32..=63 => {
                let msb_num = cc_num - controller::LSB_OFFSET;
                self.pending[msb_num as usize].take().map(|msb| HiResCc {
                    controller: msb_num,
                    value: merge14(msb, value),
                })
            }
            _ => None,
        }
    }
}

/// A decoded note event with 14-bit velocity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NoteEvent {
    pub note: u8,
    /// 14-bit velocity; widened from 7-bit when no prefix was pending.
    pub velocity: u16,
    /// Note On with nonzero velocity.
    pub on: bool,
}

/// Decoder for the CC 88 velocity-prefix convention.
///
/// CC 88 arms the pending velocity MSB. The next Note On/Off consumes it;
/// a note arriving with no prefix pending gets its 7-bit velocity widened
/// with [`widen7`].
#[derive(Debug, Default)]
pub struct NoteHiResDecoder {
    prefix: Option<u8>,
}

impl NoteHiResDecoder {
    #[must_use]
    pub const fn new() -> Self {
        Self { prefix: None }
    }

    /// Feed one received message. Returns a [`NoteEvent`] for Note On/Off;
    /// `None` for the prefix itself and for unrelated messages.
    pub fn feed(&mut self, msg: MidiMessage) -> Option<NoteEvent> {
        match msg.kind() {
            message::STATUS_CONTROL_CHANGE
                if msg.data1 == message::controller::HIRES_VELOCITY_PREFIX =>
            {
                self.prefix = Some(msg.data2);
                None
            }
            message::STATUS_NOTE_ON | message::STATUS_NOTE_OFF => {
                let velocity = match self.prefix.take() {
                    Some(msb) => merge14(msb, msg.data2),
                    None => widen7(msg.data2),
                };
                Some(NoteEvent {
                    note: msg.data1,
                    velocity,
                    on: msg.kind() == message::STATUS_NOTE_ON && msg.data2 != 0,
                })
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_merge_round_trip_full_range() {
        for value in 0..=MAX_14BIT {
            let (msb, lsb) = split14(value);
            assert!(msb <= 0x7F && lsb <= 0x7F);
            assert_eq!(merge14(msb, lsb), value);
        }
    }

    #[test]
    fn test_cc_14bit_pair_layout() {
        let [msb, lsb] = cc_14bit(0, controller::EXPRESSION, 12345);
        assert_eq!(msb.to_bytes(), [0xB0, 11, (12345u16 >> 7) as u8]);
        assert_eq!(lsb.to_bytes(), [0xB0, 43, (12345u16 & 0x7F) as u8]);
    }

    #[test]
    fn test_cc_14bit_clamps() {
        let [msb, lsb] = cc_14bit(0, controller::VOLUME, u16::MAX);
        assert_eq!(merge14(msb.data2, lsb.data2), MAX_14BIT);
    }

    #[test]
    fn test_note_on_hires_prefix_first() {
        let [prefix, note] = note_on_hires(0, 60, 12077);
        assert_eq!(prefix.to_bytes(), [0xB0, 88, 94]);
        assert_eq!(note.to_bytes(), [0x90, 60, 45]);
    }

    #[test]
    fn test_cc_decoder_merges_pair() {
        let mut dec = CcHiResDecoder::new();
        assert_eq!(dec.feed(7, 94), None);
        assert_eq!(
            dec.feed(39, 45),
            Some(HiResCc { controller: 7, value: merge14(94, 45) })
        );
        // Pair consumed; a lone LSB does nothing.
        assert_eq!(dec.feed(39, 45), None);
    }

    #[test]
    fn test_cc_decoder_last_msb_wins() {
        let mut dec = CcHiResDecoder::new();
        dec.feed(11, 10);
        dec.feed(11, 20);
        let got = dec.feed(43, 0).unwrap();
        assert_eq!(got.value, merge14(20, 0));
    }

    #[test]
    fn test_cc_decoder_ignores_unpaired_controllers() {
        let mut dec = CcHiResDecoder::new();
        assert_eq!(dec.feed(64, 127), None);
        assert_eq!(dec.feed(88, 12), None);
    }

    #[test]
    fn test_note_decoder_with_prefix() {
        let mut dec = NoteHiResDecoder::new();
        assert_eq!(
            dec.feed(MidiMessage::control_change(0, 88, 94)),
            None
        );
        let ev = dec.feed(MidiMessage::note_on(0, 60, 45)).unwrap();
        assert_eq!(ev.note, 60);
        assert_eq!(ev.velocity, merge14(94, 45));
        assert!(ev.on);
    }

    #[test]
    fn test_note_decoder_widens_without_prefix() {
        let mut dec = NoteHiResDecoder::new();
        let ev = dec.feed(MidiMessage::note_on(0, 60, 100)).unwrap();
        assert_eq!(ev.velocity, widen7(100));
    }

    #[test]
    fn test_note_decoder_zero_velocity_is_off() {
        let mut dec = NoteHiResDecoder::new();
        let ev = dec.feed(MidiMessage::note_on(0, 60, 0)).unwrap();
        assert!(!ev.on);
    }

    #[test]
    fn test_adc_widening() {
        assert_eq!(adc12_to_14bit(4095), 16380);
        assert_eq!(adc10_to_14bit(1023), 16368);
        assert_eq!(percent_to_14bit(100), MAX_14BIT);
        assert_eq!(percent_to_14bit(200), MAX_14BIT);
        assert_eq!(percent_to_14bit(0), 0);
    }

    #[test]
    fn test_widen_narrow() {
        assert_eq!(narrow14(widen7(127)), 127);
        assert_eq!(narrow14(widen7(0)), 0);
    }
}

//! Per-pedal debounce/timeout state machines.

use midi_proto::MidiMessage;

use crate::config::{
    DEBOUNCE_TICKS, NOTE_CHANNEL, RELEASE_TICKS, TIMEOUT_TICKS,
};
use crate::ring::Consumer;
use crate::traits::{EdgeMask, Indicator, MessageSink, PedalPins};
use crate::types::{EdgeEvent, OutboundMessage, Pedal, PedalAction, PedalPhase};

#[derive(Clone, Copy, Default)]
struct Slot {
    phase: PedalPhase,
    armed_at: u32,
}

/// The polling-loop half of the discrete pedal path.
///
/// One independent state machine per pedal: `Idle -> Worked -> Pressed ->
/// Idle`, with the `Worked -> Idle` timeout path for false triggers. Each
/// [`poll`](Self::poll) first drains the ring (each event arms its pedal's
/// machine), then applies the time-gated rules to every non-idle pedal:
///
/// 1. `Worked` past the debounce window: re-sample the pin. Still asserted
///    means a genuine press — emit the pedal's message, light the
///    indicator. Deasserted means bounce — leave it for the timeout rule.
/// 2. `Pressed` past the release window: released by time alone, whatever
///    the pin reads. Re-arm the interrupt, send the key-up where the
///    template calls for one.
/// 3. `Worked` past the timeout window with the pin still deasserted:
///    false trigger. Re-arm, emit nothing.
///
/// Re-arming here (and nowhere else) is what closes the capture-side mask
/// invariant: a pedal stays deaf from its edge until its machine returns to
/// `Idle`, which rule 2 or 3 guarantees within
/// `max(RELEASE_TICKS, TIMEOUT_TICKS)`.
pub struct DebounceEngine<'a, P, M, S, L, const N: usize> {
    consumer: Consumer<'a, EdgeEvent, N>,
    pins: P,
    mask: M,
    sink: S,
    indicator: L,
    actions: [PedalAction; Pedal::COUNT],
    slots: [Slot; Pedal::COUNT],
}

impl<'a, P, M, S, L, const N: usize> DebounceEngine<'a, P, M, S, L, N>
where
    P: PedalPins,
    M: EdgeMask,
    S: MessageSink,
    L: Indicator,
{
    /// Build the engine from the ring's consumer half, the platform seams,
    /// and the per-pedal message templates.
    pub fn new(
        consumer: Consumer<'a, EdgeEvent, N>,
        pins: P,
        mask: M,
        sink: S,
        indicator: L,
        actions: [PedalAction; Pedal::COUNT],
    ) -> Self {
        Self {
            consumer,
            pins,
            mask,
            sink,
            indicator,
            actions,
            slots: [Slot::default(); Pedal::COUNT],
        }
    }

    /// Run one poll iteration at tick `now`.
    ///
    /// Bounded work: at most one drain of the ring plus one rule application
    /// per pedal, so the caller's loop can keep servicing the transport.
    pub fn poll(&mut self, now: u32) {
        while let Some(event) = self.consumer.pop() {
            let slot = &mut self.slots[event.pedal.index()];
            // Masking makes a second event for an unresolved pedal
            // impossible; should one appear anyway, the newest edge wins.
            slot.phase = PedalPhase::Worked;
            slot.armed_at = event.at;
        }

        for pedal in Pedal::ALL {
            let slot = &mut self.slots[pedal.index()];
            let elapsed = now.wrapping_sub(slot.armed_at);

            match slot.phase {
                PedalPhase::Idle => {}
                PedalPhase::Worked if elapsed > DEBOUNCE_TICKS => {
                    if self.pins.is_asserted(pedal) {
                        slot.phase = PedalPhase::Pressed;
                        let press = match self.actions[pedal.index()] {
                            PedalAction::Note { note, velocity } => OutboundMessage::Midi(
                                MidiMessage::note_on(NOTE_CHANNEL, note, velocity),
                            ),
                            PedalAction::Key { scancode } => OutboundMessage::KeyPress(scancode),
                        };
                        self.sink.send(press);
                        self.indicator.set_active(true);
                    } else if elapsed > TIMEOUT_TICKS {
                        // False trigger: the pin never re-asserted.
                        slot.phase = PedalPhase::Idle;
                        self.mask.rearm(pedal);
                        self.indicator.set_active(false);
                    }
                }
                PedalPhase::Pressed if elapsed > RELEASE_TICKS => {
                    // Time-based release; the live pin level is not consulted.
                    slot.phase = PedalPhase::Idle;
                    self.mask.rearm(pedal);
                    if matches!(self.actions[pedal.index()], PedalAction::Key { .. }) {
                        self.sink.send(OutboundMessage::KeyRelease);
                    }
                    self.indicator.set_active(false);
                }
                _ => {}
            }
        }
    }

    /// Current phase of one pedal's machine.
    #[must_use]
    pub fn phase(&self, pedal: Pedal) -> PedalPhase {
        self.slots[pedal.index()].phase
    }

    /// Whether every pedal is idle (armed and waiting for an edge).
    #[must_use]
    pub fn is_quiescent(&self) -> bool {
        self.slots
            .iter()
            .all(|slot| matches!(slot.phase, PedalPhase::Idle))
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::config::PEDAL_ACTIONS;
    use crate::ring::{EventRing, Producer};
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::vec::Vec;

    #[derive(Clone, Default)]
    struct MockPins {
        asserted: Rc<RefCell<[bool; Pedal::COUNT]>>,
    }

    impl MockPins {
        fn set(&self, pedal: Pedal, level: bool) {
            self.asserted.borrow_mut()[pedal.index()] = level;
        }
    }

    impl PedalPins for MockPins {
        fn is_asserted(&self, pedal: Pedal) -> bool {
            self.asserted.borrow()[pedal.index()]
        }
    }

    #[derive(Clone, Default)]
    struct MockMask {
        rearmed: Rc<RefCell<Vec<Pedal>>>,
    }

    impl EdgeMask for MockMask {
        fn mask(&mut self, _pedal: Pedal) {}
        fn rearm(&mut self, pedal: Pedal) {
            self.rearmed.borrow_mut().push(pedal);
        }
    }

    #[derive(Clone, Default)]
    struct MockSink {
        sent: Rc<RefCell<Vec<OutboundMessage>>>,
    }

    impl MessageSink for MockSink {
        fn send(&mut self, msg: OutboundMessage) {
            self.sent.borrow_mut().push(msg);
        }
    }

    #[derive(Clone, Default)]
    struct MockIndicator {
        on: Rc<RefCell<bool>>,
    }

    impl Indicator for MockIndicator {
        fn set_active(&mut self, on: bool) {
            *self.on.borrow_mut() = on;
        }
    }

    struct Harness<'a> {
        tx: Producer<'a, EdgeEvent, 8>,
        engine: DebounceEngine<'a, MockPins, MockMask, MockSink, MockIndicator, 8>,
        pins: MockPins,
        rearmed: Rc<RefCell<Vec<Pedal>>>,
        sent: Rc<RefCell<Vec<OutboundMessage>>>,
        led: Rc<RefCell<bool>>,
    }

    fn harness(ring: &EventRing<EdgeEvent, 8>) -> Harness<'_> {
        let (tx, rx) = ring.split().unwrap();
        let pins = MockPins::default();
        let mask = MockMask::default();
        let sink = MockSink::default();
        let indicator = MockIndicator::default();
        let rearmed = mask.rearmed.clone();
        let sent = sink.sent.clone();
        let led = indicator.on.clone();
        let engine = DebounceEngine::new(rx, pins.clone(), mask, sink, indicator, PEDAL_ACTIONS);
        Harness {
            tx,
            engine,
            pins,
            rearmed,
            sent,
            led,
        }
    }

    #[test]
    fn test_no_transition_inside_debounce_window() {
        let ring = EventRing::new();
        let mut h = harness(&ring);

        h.tx.push(EdgeEvent { pedal: Pedal::A, at: 0 }).unwrap();
        h.pins.set(Pedal::A, true);
        h.engine.poll(800);

        assert_eq!(h.engine.phase(Pedal::A), PedalPhase::Worked);
        assert!(h.sent.borrow().is_empty());
    }

    #[test]
    fn test_press_confirmed_after_debounce() {
        let ring = EventRing::new();
        let mut h = harness(&ring);

        h.tx.push(EdgeEvent { pedal: Pedal::A, at: 0 }).unwrap();
        h.pins.set(Pedal::A, true);
        h.engine.poll(801);

        assert_eq!(h.engine.phase(Pedal::A), PedalPhase::Pressed);
        assert_eq!(
            *h.sent.borrow(),
            [OutboundMessage::Midi(MidiMessage::note_on(NOTE_CHANNEL, 60, 44))]
        );
        assert!(*h.led.borrow());
        // Not re-armed until release.
        assert!(h.rearmed.borrow().is_empty());
    }

    #[test]
    fn test_press_emitted_exactly_once() {
        let ring = EventRing::new();
        let mut h = harness(&ring);

        h.tx.push(EdgeEvent { pedal: Pedal::B, at: 0 }).unwrap();
        h.pins.set(Pedal::B, true);
        h.engine.poll(801);
        h.engine.poll(900);
        h.engine.poll(1500);

        assert_eq!(h.sent.borrow().len(), 1);
    }

    #[test]
    fn test_bounce_then_timeout_emits_nothing() {
        let ring = EventRing::new();
        let mut h = harness(&ring);

        h.tx.push(EdgeEvent { pedal: Pedal::A, at: 0 }).unwrap();
        // Pin reads deasserted at the debounce check: bounce.
        h.engine.poll(801);
        assert_eq!(h.engine.phase(Pedal::A), PedalPhase::Worked);

        h.engine.poll(3001);
        assert_eq!(h.engine.phase(Pedal::A), PedalPhase::Idle);
        assert!(h.sent.borrow().is_empty());
        assert_eq!(*h.rearmed.borrow(), [Pedal::A]);
        assert!(!*h.led.borrow());
    }

    #[test]
    fn test_late_assert_still_confirms_before_timeout() {
        let ring = EventRing::new();
        let mut h = harness(&ring);

        h.tx.push(EdgeEvent { pedal: Pedal::A, at: 0 }).unwrap();
        h.engine.poll(801); // bounce
        h.pins.set(Pedal::A, true);
        h.engine.poll(2500); // pin recovered before the timeout rule fires

        assert_eq!(h.engine.phase(Pedal::A), PedalPhase::Pressed);
        assert_eq!(h.sent.borrow().len(), 1);
    }

    #[test]
    fn test_release_is_time_based() {
        let ring = EventRing::new();
        let mut h = harness(&ring);

        h.tx.push(EdgeEvent { pedal: Pedal::A, at: 0 }).unwrap();
        h.pins.set(Pedal::A, true);
        h.engine.poll(801);
        assert_eq!(h.engine.phase(Pedal::A), PedalPhase::Pressed);

        // Pin still held; release fires on elapsed time alone.
        h.engine.poll(2001);
        assert_eq!(h.engine.phase(Pedal::A), PedalPhase::Idle);
        assert_eq!(*h.rearmed.borrow(), [Pedal::A]);
        // Note pedals send no explicit release message.
        assert_eq!(h.sent.borrow().len(), 1);
        assert!(!*h.led.borrow());
    }

    #[test]
    fn test_key_pedal_sends_key_up_on_release() {
        let ring = EventRing::new();
        let mut h = harness(&ring);

        h.tx.push(EdgeEvent { pedal: Pedal::C, at: 0 }).unwrap();
        h.pins.set(Pedal::C, true);
        h.engine.poll(801);
        h.engine.poll(2001);

        assert_eq!(
            *h.sent.borrow(),
            [OutboundMessage::KeyPress(0x4F), OutboundMessage::KeyRelease]
        );
    }

    #[test]
    fn test_pedals_resolve_independently() {
        let ring = EventRing::new();
        let mut h = harness(&ring);

        h.tx.push(EdgeEvent { pedal: Pedal::A, at: 0 }).unwrap();
        h.tx.push(EdgeEvent { pedal: Pedal::D, at: 600 }).unwrap();
        h.pins.set(Pedal::A, true);
        h.pins.set(Pedal::D, true);

        h.engine.poll(801);
        assert_eq!(h.engine.phase(Pedal::A), PedalPhase::Pressed);
        assert_eq!(h.engine.phase(Pedal::D), PedalPhase::Worked);

        h.engine.poll(1401);
        assert_eq!(h.engine.phase(Pedal::D), PedalPhase::Pressed);
        assert_eq!(h.sent.borrow().len(), 2);

        h.engine.poll(2001);
        assert_eq!(h.engine.phase(Pedal::A), PedalPhase::Idle);
        assert_eq!(h.engine.phase(Pedal::D), PedalPhase::Pressed);
        assert!(!h.engine.is_quiescent());

        h.engine.poll(2601);
        assert!(h.engine.is_quiescent());
    }

    #[test]
    fn test_elapsed_math_survives_tick_wrap() {
        let ring = EventRing::new();
        let mut h = harness(&ring);

        let at = u32::MAX - 100;
        h.tx.push(EdgeEvent { pedal: Pedal::A, at }).unwrap();
        h.pins.set(Pedal::A, true);

        // 801 ticks later the counter has wrapped past zero.
        h.engine.poll(at.wrapping_add(801));
        assert_eq!(h.engine.phase(Pedal::A), PedalPhase::Pressed);

        h.engine.poll(at.wrapping_add(2001));
        assert_eq!(h.engine.phase(Pedal::A), PedalPhase::Idle);
    }
}

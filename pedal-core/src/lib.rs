//! Platform-agnostic pedal event engine.
//!
//! This crate turns asynchronous hardware stimuli — switch-closure edges on
//! four discrete pedals and a continuously sampled expression pedal — into a
//! bounded, ordered stream of outbound messages, without any platform
//! dependencies. It can be used both in embedded `no_std` environments and
//! on host for testing.
//!
//! # Overview
//!
//! - [`ring`]: lock-free bounded SPSC ring ([`EventRing`]) handing edge
//!   events from interrupt context to the polling loop
//! - [`capture`]: the interrupt-context producer ([`EdgeCapture`])
//! - [`debounce`]: per-pedal debounce/timeout state machines
//!   ([`DebounceEngine`])
//! - [`analog`]: hysteresis-gated expression-pedal filter ([`AnalogFilter`])
//! - [`traits`]: the seams to the platform ([`PedalPins`], [`EdgeMask`],
//!   [`MessageSink`], [`Indicator`])
//! - [`config`]: compile-time thresholds and the per-pedal message table
//!
//! # Data Flow
//!
//! ```text
//! hardware edge -> EdgeCapture -> EventRing -> DebounceEngine -> MessageSink
//! sample ready  -> AnalogFilter ---------------------------------^
//! ```
//!
//! # Concurrency Contract
//!
//! [`EdgeCapture`] and [`AnalogFilter::process`] run in interrupt context and
//! never block; [`DebounceEngine::poll`] runs in the cooperative polling
//! loop. The ring is the only discrete-path state crossing the two contexts
//! and carries acquire/release ordering at its publish/consume points. While
//! a pedal's machine is not `Idle` its interrupt source stays masked; only
//! the engine's release and timeout paths re-arm it, which bounds every
//! pedal's outage to `max(RELEASE_TICKS, TIMEOUT_TICKS)`.
//!
//! # Features
//!
//! - **`std`**: Enable standard library support (for host testing)
//! - **`defmt`**: Enable defmt formatting (for embedded logging)

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "std")]
extern crate std;

pub mod analog;
pub mod capture;
pub mod config;
pub mod debounce;
pub mod ring;
pub mod traits;
pub mod types;

// Re-export main types at crate root
pub use analog::AnalogFilter;
pub use capture::EdgeCapture;
pub use debounce::DebounceEngine;
pub use ring::{Consumer, EventRing, Producer};
pub use traits::{EdgeMask, Indicator, MessageSink, PedalPins};
pub use types::{EdgeEvent, OutboundMessage, Pedal, PedalAction, PedalPhase};

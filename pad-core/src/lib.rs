//! Platform-agnostic input pipeline and power policy for GPIO gamepads.
//!
//! This crate holds everything that does not touch real hardware: it can be
//! used on a microcontroller in `no_std` and on a host for testing.
//!
//! # Overview
//!
//! - [`debounce`]: per-pin filter producing press/release edges ([`Channel`])
//! - [`mapper`]: channel → logical button routing ([`ButtonMapper`])
//! - [`direction`]: four-way switch → direction vector → hat ([`DirectionTranslator`])
//! - [`coalescer`]: one report per cycle, only on change ([`ReportCoalescer`])
//! - [`power`]: connection tracking and idle sleep ([`IdleSleepController`])
//! - [`controller`]: the fixed-rate cycle tying it all together ([`Controller`])
//! - [`sink`], [`board`]: traits the platform implements ([`ReportSink`], [`PinBank`], [`PowerControl`])
//! - [`config`]: the static pad table ([`PadConfig`])
//!
//! # Example
//!
//! ```ignore
//! use embassy_time::Instant;
//! use pad_core::Controller;
//!
//! let mut controller = Controller::new(PAD, usb_sink, board, Instant::now())?;
//! controller.run().await // never returns; ends in deep sleep
//! ```
//!
//! # Features
//!
//! - **`std`**: Enable standard library support (for host testing)
//! - **`defmt`**: Log through defmt (for embedded logging)
//! - **`log`**: Log through the `log` facade
//!
//! Without a logging feature all log statements compile to nothing.
//!
//! # No-std Support
//!
//! This crate is `#![no_std]` by default and uses no heap allocations,
//! making it suitable for embedded systems with limited resources.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "std")]
extern crate std;

// This must go first so the macros are visible to the other modules.
mod fmt;

pub mod board;
pub mod coalescer;
pub mod config;
pub mod controller;
pub mod debounce;
pub mod direction;
pub mod mapper;
pub mod power;
pub mod sink;
pub mod types;

#[cfg(test)]
mod mock;

// Re-export main types at crate root
pub use board::{Board, PinBank, PowerControl, PowerError};
pub use coalescer::ReportCoalescer;
pub use config::{ConfigError, PadConfig};
pub use controller::{Controller, ControllerError, CycleOutcome};
pub use debounce::Channel;
pub use direction::{compute, Direction, DirectionPins, DirectionTranslator};
pub use mapper::{ButtonMapper, ButtonMapping};
pub use power::{IdleSleepController, PowerDecision, PowerPolicy, PowerState};
pub use sink::{ControllerType, ReportSink, SinkConfig, SinkError, TX_POWER_LEVELS};
pub use types::{DirectionState, Edge, HatValue, PinId};

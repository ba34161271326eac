//! GPIO buttons to USB gamepad for RP2040.
//!
//! This crate provides the embedded side of a wired arcade-style pad: six
//! buttons and a four-way switch on GPIOs, reported to the host as a USB HID
//! joystick, with deep sleep after a minute without a host.
//!
//! # Overview
//!
//! The firmware runs on a Raspberry Pi Pico (RP2040) and:
//! 1. Samples every switch at 60 Hz through a 5 ms debounce
//! 2. Maps buttons to HID buttons and the four-way switch to a hat
//! 3. Sends at most one report per cycle, only when something changed
//! 4. Goes dormant when no host has been attached for 60 s, and wakes on START
//!
//! # Hardware Configuration
//!
//! See [`config`] for the pin table.
//!
//! # Architecture
//!
//! The firmware uses the Embassy async runtime with two tasks:
//!
//! - **USB Task**: Manages the USB device stack until the pad goes to sleep
//! - **Main Task**: Runs the [`Controller`] cycle
//!
//! Connection state flows from the USB task to the controller through a
//! [`UsbLink`], which also carries the shutdown handshake before sleep.
//!
//! # Modules
//!
//! - [`board`]: GPIO bank and dormant sleep ([`RpBoard`])
//! - [`usb_output`]: USB HID output ([`UsbHidOutput`], [`PadReport`])
//! - [`config`]: pins, timing and USB identity
//!
//! # Features
//!
//! - **`dev-panic`** (default): Use `panic-probe` for development (prints panic info via RTT)
//! - **`prod-panic`**: Use `panic-reset` for production (silent reset)
//!
//! # Re-exports
//!
//! This crate re-exports the public items of [`pad_core`] for convenience,
//! so consumers only need to depend on this crate.

#![no_std]

pub use pad_core::{
    Board, Controller, ControllerError, ControllerType, CycleOutcome, HatValue, PadConfig,
    PinBank, PinId, PowerControl, PowerError, PowerState, ReportSink, SinkConfig, SinkError,
};

pub mod board;
pub mod config;
pub mod usb_output;

pub use board::RpBoard;
pub use usb_output::{configure_usb_hid, PadReport, UsbHidOutput, UsbLink};

//! Compile-time pad configuration.
//!
//! | Function | GPIO |
//! |----------|------|
//! | Buttons A, B, C, D, SELECT, START | 10, 9, 8, 7, 6, 5 |
//! | Directions LEFT, RIGHT, DOWN, UP | 3, 2, 1, 0 |
//! | Extra grounds (driven low) | 4, 21 |
//! | Wake | 5 (START), active low |
//!
//! The wake button must be wired to a real ground: the extra grounds float
//! while the chip sleeps.

use embassy_time::Duration;
use pad_core::{ButtonMapping, ControllerType, DirectionPins, PadConfig, PinId, PowerPolicy};

/// Sampling rate of the control loop.
pub const CYCLE_RATE_HZ: u64 = 60;

/// How long a switch must hold still before it counts.
pub const DEBOUNCE: Duration = Duration::from_millis(5);

/// Contiguous time without a host before sleeping.
pub const IDLE_TIMEOUT: Duration = Duration::from_secs(60);

/// Number of buttons on the pad.
pub const BUTTON_COUNT: usize = 6;

/// Buttons A, B, C, D, SELECT, START.
pub const BUTTON_PINS: [PinId; BUTTON_COUNT] = [10, 9, 8, 7, 6, 5];

pub const DIRECTION_PINS: DirectionPins = DirectionPins {
    left: 3,
    right: 2,
    down: 1,
    up: 0,
};

/// Not for production: these pins are driven low to act as grounds.
pub const EXTRA_GROUNDS: &[PinId] = &[4, 21];

pub const WAKE_PIN: PinId = 5;

/// Channel → logical button. SELECT and START sit on buttons 7 and 8.
pub const MAPPINGS: [ButtonMapping; BUTTON_COUNT] = [
    ButtonMapping::standard(0, 1),
    ButtonMapping::standard(1, 2),
    ButtonMapping::standard(2, 3),
    ButtonMapping::standard(3, 4),
    ButtonMapping::standard(4, 7),
    ButtonMapping::standard(5, 8),
];

/// USB vendor id (pid.codes test VID).
pub const VENDOR_ID: u16 = 0x1209;

/// Product id announced to the host.
pub const PRODUCT_ID: u16 = 0xe388;

pub const MANUFACTURER: &str = "Partlyhuman";
pub const PRODUCT: &str = "ESP.RA.DIO Joystick";

/// The complete pad table.
pub const PAD: PadConfig<BUTTON_COUNT> = PadConfig {
    button_pins: BUTTON_PINS,
    mappings: MAPPINGS,
    direction_pins: DIRECTION_PINS,
    extra_grounds: EXTRA_GROUNDS,
    debounce: DEBOUNCE,
    cycle_rate_hz: CYCLE_RATE_HZ,
    power: PowerPolicy {
        idle_timeout: IDLE_TIMEOUT,
        wake_pin: WAKE_PIN,
        wake_active_high: false,
    },
    controller_type: ControllerType::Joystick,
    product_id: PRODUCT_ID,
    // The only valid values are: -12, -9, -6, -3, 0, 3, 6 and 9
    tx_power_dbm: 6,
};

// A broken table fails the build instead of halting at boot.
const _: () = match PAD.validate() {
    Ok(()) => {}
    Err(_) => panic!("invalid pad table in config.rs"),
};

//! Board collaborator traits: pin bank and power control.

use crate::types::PinId;

/// Error type for power control operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PowerError {
    /// The board does not own this pin.
    UnknownPin,
    /// The platform refused the request.
    Rejected,
}

/// Raw digital I/O on the board's GPIOs.
///
/// Reads return the electrical level: `true` is high.
pub trait PinBank {
    /// Input with the internal pull-up enabled.
    fn configure_input_pullup(&mut self, pin: PinId);

    /// Output driven low (used as an extra ground).
    fn configure_output_low(&mut self, pin: PinId);

    /// Floating input, no pulls, no drive.
    fn configure_high_impedance(&mut self, pin: PinId);

    /// Sample the current level.
    fn read(&mut self, pin: PinId) -> bool;
}

/// Low-power entry and wake configuration.
pub trait PowerControl {
    /// Enable the pull-up that keeps the wake pin idle while sleeping.
    fn enable_pullup(&mut self, pin: PinId) -> Result<(), PowerError>;

    /// Wake from sleep when `pin` sits at the given level.
    fn arm_gpio_wake(&mut self, pin: PinId, active_high: bool) -> Result<(), PowerError>;

    /// Push out any buffered diagnostic output.
    fn flush_diagnostics(&mut self) {}

    /// Enter deep sleep. Waking restarts the program from the top.
    fn deep_sleep_now(&mut self) -> !;
}

/// A board provides both pins and power control.
pub trait Board: PinBank + PowerControl {}

impl<T: PinBank + PowerControl> Board for T {}

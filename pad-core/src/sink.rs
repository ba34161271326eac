//! Report sink trait and error types.

use core::future::Future;

use crate::types::HatValue;

/// Error type for report sink operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SinkError {
    /// Transport I/O error.
    Io,
    /// Sink not started, or host not attached.
    NotReady,
    /// The sink cannot provide what the configuration asks for.
    Unsupported,
    /// The host did not take the report in time; it was dropped.
    Timeout,
}

/// Kind of device the sink announces to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ControllerType {
    Joystick,
    Gamepad,
    MultiAxis,
}

/// Everything a sink needs to describe the controller to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SinkConfig {
    pub controller_type: ControllerType,
    pub product_id: u16,
    /// Radio transmit power in dBm. Transports without a radio ignore it.
    pub tx_power_dbm: i8,
    pub button_count: u8,
    pub hat_count: u8,
    /// One bit per analog axis. Always zero here: no analog axes.
    pub axis_mask: u8,
    /// One bit per special button slot in use.
    pub special_button_mask: u8,
    /// Transmit on every state change instead of on `send_report`.
    pub auto_report: bool,
}

/// Transmit power levels a radio sink accepts, in dBm.
pub const TX_POWER_LEVELS: [i8; 8] = [-12, -9, -6, -3, 0, 3, 6, 9];

/// Destination for controller state.
///
/// Press, release and hat updates only change the sink's in-memory report.
/// Nothing is transmitted until [`ReportSink::send_report`] is called, so one
/// cycle's worth of changes goes out as a single report.
///
/// # `no_std` Compatibility
///
/// All implementations must be `#![no_std]` compatible with no heap allocation.
pub trait ReportSink {
    /// Start the sink with the given configuration.
    fn begin(&mut self, config: &SinkConfig) -> Result<(), SinkError>;

    /// Whether a host is attached and listening.
    fn is_connected(&self) -> bool;

    /// Mark standard button `id` as pressed.
    fn press(&mut self, id: u8);

    /// Mark standard button `id` as released.
    fn release(&mut self, id: u8);

    /// Mark special button slot `id` as pressed.
    fn press_special(&mut self, id: u8);

    /// Mark special button slot `id` as released.
    fn release_special(&mut self, id: u8);

    /// Set the hat switch position.
    fn set_hat(&mut self, hat: HatValue);

    /// Transmit the current report.
    fn send_report(&mut self) -> impl Future<Output = Result<(), SinkError>>;

    /// Shut the sink down before sleeping.
    fn end(&mut self) -> impl Future<Output = ()>;
}

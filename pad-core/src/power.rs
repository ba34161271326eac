//! Connection tracking and the idle → sleep decision.

use embassy_time::{Duration, Instant};

use crate::types::PinId;

/// When to sleep and how to wake.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PowerPolicy {
    /// Contiguous disconnection that triggers sleep.
    pub idle_timeout: Duration,
    /// Pin that wakes the device.
    pub wake_pin: PinId,
    /// Level on `wake_pin` that wakes the device.
    pub wake_active_high: bool,
}

/// Lifecycle state of the device.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PowerState {
    /// Host attached, inputs are processed.
    Active,
    /// Host gone, counting down to sleep.
    IdleWatch,
    /// Sleep was requested. Terminal.
    Sleeping,
}

/// What the current cycle should do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PowerDecision {
    /// Sample inputs and report.
    Run,
    /// Do nothing this cycle.
    Skip,
    /// Enter sleep now.
    Sleep,
}

/// Idle/sleep state machine.
///
/// The timeout measures contiguous disconnection: every connected
/// observation moves `last_connected_at` forward.
#[derive(Clone, Copy, Debug)]
pub struct IdleSleepController {
    idle_timeout: Duration,
    state: PowerState,
    last_connected_at: Instant,
}

impl IdleSleepController {
    /// Start in [`PowerState::Active`] with the idle clock running from `now`.
    #[must_use]
    pub const fn new(idle_timeout: Duration, now: Instant) -> Self {
        Self {
            idle_timeout,
            state: PowerState::Active,
            last_connected_at: now,
        }
    }

    #[inline]
    #[must_use]
    pub const fn state(&self) -> PowerState {
        self.state
    }

    /// Last instant the host was seen (or process start).
    #[inline]
    #[must_use]
    pub const fn last_connected_at(&self) -> Instant {
        self.last_connected_at
    }

    /// Feed this cycle's connection state.
    pub fn observe(&mut self, connected: bool, now: Instant) -> PowerDecision {
        if self.state == PowerState::Sleeping {
            return PowerDecision::Skip;
        }

        if connected {
            if self.state != PowerState::Active {
                info!("host connected");
            }
            self.state = PowerState::Active;
            self.last_connected_at = now;
            return PowerDecision::Run;
        }

        let idle_for = now.saturating_duration_since(self.last_connected_at);
        if idle_for >= self.idle_timeout {
            info!("idle for {} s, sleeping", idle_for.as_secs());
            self.state = PowerState::Sleeping;
            return PowerDecision::Sleep;
        }

        if self.state == PowerState::Active {
            info!(
                "host disconnected, sleeping in {} ms",
                (self.idle_timeout - idle_for).as_millis()
            );
            self.state = PowerState::IdleWatch;
        }
        PowerDecision::Skip
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TIMEOUT: Duration = Duration::from_millis(60_000);

    fn at(ms: u64) -> Instant {
        Instant::from_millis(ms)
    }

    #[test]
    fn test_sleeps_exactly_at_timeout() {
        let mut p = IdleSleepController::new(TIMEOUT, at(0));

        assert_eq!(p.observe(false, at(0)), PowerDecision::Skip);
        assert_eq!(p.state(), PowerState::IdleWatch);
        assert_eq!(p.observe(false, at(30_000)), PowerDecision::Skip);
        assert_eq!(p.observe(false, at(59_999)), PowerDecision::Skip);
        assert_eq!(p.observe(false, at(60_000)), PowerDecision::Sleep);
        assert_eq!(p.state(), PowerState::Sleeping);
    }

    #[test]
    fn test_sleep_is_reported_once() {
        let mut p = IdleSleepController::new(TIMEOUT, at(0));
        assert_eq!(p.observe(false, at(60_000)), PowerDecision::Sleep);
        assert_eq!(p.observe(false, at(60_016)), PowerDecision::Skip);
        assert_eq!(p.observe(true, at(60_032)), PowerDecision::Skip);
        assert_eq!(p.state(), PowerState::Sleeping);
    }

    #[test]
    fn test_connected_runs() {
        let mut p = IdleSleepController::new(TIMEOUT, at(0));
        assert_eq!(p.observe(true, at(100_000)), PowerDecision::Run);
        assert_eq!(p.state(), PowerState::Active);
        assert_eq!(p.last_connected_at(), at(100_000));
    }

    #[test]
    fn test_reconnect_restarts_idle_clock() {
        let mut p = IdleSleepController::new(TIMEOUT, at(0));
        assert_eq!(p.observe(false, at(50_000)), PowerDecision::Skip);
        assert_eq!(p.observe(true, at(55_000)), PowerDecision::Run);
        assert_eq!(p.observe(false, at(55_016)), PowerDecision::Skip);

        // 60 s after start, but only 5 s after the last connection.
        assert_eq!(p.observe(false, at(60_000)), PowerDecision::Skip);
        assert_eq!(p.observe(false, at(114_999)), PowerDecision::Skip);
        assert_eq!(p.observe(false, at(115_000)), PowerDecision::Sleep);
    }

    #[test]
    fn test_disconnect_measured_from_last_connected_cycle() {
        let mut p = IdleSleepController::new(TIMEOUT, at(0));
        for t in (0..10_000).step_by(16) {
            assert_eq!(p.observe(true, at(t)), PowerDecision::Run);
        }
        // Last connected observation was at 9_984.
        assert_eq!(p.observe(false, at(10_000)), PowerDecision::Skip);
        assert_eq!(p.observe(false, at(69_983)), PowerDecision::Skip);
        assert_eq!(p.observe(false, at(69_984)), PowerDecision::Sleep);
    }

    #[test]
    fn test_never_connected_counts_from_start() {
        let mut p = IdleSleepController::new(TIMEOUT, at(1_000));
        assert_eq!(p.observe(false, at(60_999)), PowerDecision::Skip);
        assert_eq!(p.observe(false, at(61_000)), PowerDecision::Sleep);
    }
}

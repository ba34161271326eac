//! Per-pin debounce filter.

use embassy_time::{Duration, Instant};

use crate::types::{Edge, PinId};

/// A debounced digital input.
///
/// The raw level has to stay put for the whole debounce interval before the
/// stable level follows it. Each committed change is reported as an [`Edge`]
/// for exactly one call to [`Channel::update`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Channel {
    pin: PinId,
    stable_level: bool,
    last_raw_level: bool,
    last_change: Instant,
    interval: Duration,
}

impl Channel {
    /// Create a channel primed with the pin's current level.
    ///
    /// Priming means a button held at boot is not reported as a press.
    #[must_use]
    pub const fn new(pin: PinId, interval: Duration, level: bool, now: Instant) -> Self {
        Self {
            pin,
            stable_level: level,
            last_raw_level: level,
            last_change: now,
            interval,
        }
    }

    /// Feed one raw sample taken at `now`.
    pub fn update(&mut self, raw: bool, now: Instant) -> Edge {
        if raw != self.last_raw_level {
            self.last_raw_level = raw;
            self.last_change = now;
        }

        if raw == self.stable_level {
            return Edge::None;
        }

        if now.saturating_duration_since(self.last_change) < self.interval {
            return Edge::None;
        }

        self.stable_level = raw;
        if raw {
            Edge::Rose
        } else {
            Edge::Fell
        }
    }

    /// The pin this channel samples.
    #[inline]
    #[must_use]
    pub const fn pin(&self) -> PinId {
        self.pin
    }

    /// Debounced level.
    #[inline]
    #[must_use]
    pub const fn stable_level(&self) -> bool {
        self.stable_level
    }

    /// Debounced level interpreted as an active-low switch.
    #[inline]
    #[must_use]
    pub const fn is_pressed(&self) -> bool {
        !self.stable_level
    }
}

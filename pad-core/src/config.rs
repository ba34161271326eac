//! Static pad configuration and its validation.

use embassy_time::Duration;

use crate::direction::{Direction, DirectionPins};
use crate::mapper::{ButtonMapper, ButtonMapping, MAX_STANDARD_BUTTONS, SPECIAL_BUTTON_COUNT};
use crate::power::PowerPolicy;
use crate::sink::{ControllerType, SinkConfig, TX_POWER_LEVELS};
use crate::types::PinId;

/// Error type for configuration checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// A mapping points past the end of the button pin table.
    ChannelOutOfRange(usize),
    /// Two mappings share a channel.
    DuplicateChannel(usize),
    /// Two buttons of the same bank share an id.
    DuplicateButtonId(u8),
    /// Standard id outside 1..=64, or special id outside 0..8.
    ButtonIdOutOfRange(u8),
    /// The same GPIO appears twice across the pin tables.
    DuplicatePin(PinId),
    /// The cycle rate must be at least 1 Hz.
    ZeroCycleRate,
    /// Not one of [`TX_POWER_LEVELS`].
    TxPower(i8),
}

/// Everything that describes one physical pad.
///
/// `N` is the number of buttons. Mapping `i` may point at any button channel,
/// but every channel has exactly one mapping.
#[derive(Clone, Copy, Debug)]
pub struct PadConfig<const N: usize> {
    pub button_pins: [PinId; N],
    pub mappings: [ButtonMapping; N],
    pub direction_pins: DirectionPins,
    /// Outputs held low to serve as additional grounds for the switches.
    pub extra_grounds: &'static [PinId],
    pub debounce: Duration,
    pub cycle_rate_hz: u64,
    pub power: PowerPolicy,
    pub controller_type: ControllerType,
    pub product_id: u16,
    pub tx_power_dbm: i8,
}

const fn tx_power_allowed(dbm: i8) -> bool {
    let mut i = 0;
    while i < TX_POWER_LEVELS.len() {
        if TX_POWER_LEVELS[i] == dbm {
            return true;
        }
        i += 1;
    }
    false
}

impl<const N: usize> PadConfig<N> {
    /// Check every table invariant.
    ///
    /// Usable in const context, so a firmware table can be rejected at build
    /// time.
    pub const fn validate(&self) -> Result<(), ConfigError> {
        if self.cycle_rate_hz == 0 {
            return Err(ConfigError::ZeroCycleRate);
        }
        if !tx_power_allowed(self.tx_power_dbm) {
            return Err(ConfigError::TxPower(self.tx_power_dbm));
        }

        let mut i = 0;
        while i < N {
            let m = self.mappings[i];
            if m.channel >= N {
                return Err(ConfigError::ChannelOutOfRange(m.channel));
            }
            let id_ok = if m.special {
                m.id < SPECIAL_BUTTON_COUNT
            } else {
                m.id >= 1 && m.id <= MAX_STANDARD_BUTTONS
            };
            if !id_ok {
                return Err(ConfigError::ButtonIdOutOfRange(m.id));
            }
            let mut j = 0;
            while j < i {
                let other = self.mappings[j];
                if other.channel == m.channel {
                    return Err(ConfigError::DuplicateChannel(m.channel));
                }
                if other.special == m.special && other.id == m.id {
                    return Err(ConfigError::DuplicateButtonId(m.id));
                }
                j += 1;
            }
            i += 1;
        }

        let mut seen = [false; 256];
        let directions = self.direction_pins.as_array();
        let mut i = 0;
        while i < N + Direction::COUNT + self.extra_grounds.len() {
            let pin = if i < N {
                self.button_pins[i]
            } else if i < N + Direction::COUNT {
                directions[i - N]
            } else {
                self.extra_grounds[i - N - Direction::COUNT]
            };
            if seen[pin as usize] {
                return Err(ConfigError::DuplicatePin(pin));
            }
            seen[pin as usize] = true;
            i += 1;
        }

        Ok(())
    }

    /// Buttons, then directions, then extra grounds.
    pub fn all_pins(&self) -> impl Iterator<Item = PinId> + '_ {
        self.input_pins().chain(self.extra_grounds.iter().copied())
    }

    /// Pins sampled each cycle: buttons, then directions.
    pub fn input_pins(&self) -> impl Iterator<Item = PinId> + '_ {
        self.button_pins
            .iter()
            .copied()
            .chain(self.direction_pins.as_array())
    }

    /// Time between cycles.
    #[must_use]
    pub fn cycle_period(&self) -> Duration {
        Duration::from_hz(self.cycle_rate_hz.max(1))
    }

    /// The sink configuration this pad needs.
    ///
    /// Button count and special mask come from the mapping table. There is
    /// always exactly one hat, no axes, and reports are sent explicitly.
    #[must_use]
    pub fn sink_config(&self) -> SinkConfig {
        let mapper = ButtonMapper::new(self.mappings);
        SinkConfig {
            controller_type: self.controller_type,
            product_id: self.product_id,
            tx_power_dbm: self.tx_power_dbm,
            button_count: mapper.button_count(),
            hat_count: 1,
            axis_mask: 0,
            special_button_mask: mapper.special_mask(),
            auto_report: false,
        }
    }
}

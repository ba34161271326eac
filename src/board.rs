//! RP2040 GPIO bank with dormant sleep.

use core::mem;

use cortex_m::peripheral::SCB;
use defmt::{debug, warn};
use embassy_rp::gpio::{DormantWakeConfig, Flex, Pin, Pull};
use embassy_rp::watchdog::Watchdog;
use embassy_rp::Peri;
use pad_core::{PinBank, PinId, PowerControl, PowerError};

/// User GPIOs on bank 0.
pub const GPIO_COUNT: usize = 30;

/// Watchdog scratch register that survives the post-wake reset.
const WAKE_SCRATCH: usize = 0;
const WAKE_MAGIC: u32 = 0x534c_4550;

/// The pad's GPIOs plus what is needed to sleep and restart.
///
/// Pins are looked up by GPIO number so the core can address them with the
/// same ids as its configuration table.
pub struct RpBoard {
    pins: [Option<Flex<'static>>; GPIO_COUNT],
    watchdog: Watchdog,
}

impl RpBoard {
    #[must_use]
    pub fn new(watchdog: Watchdog) -> Self {
        Self {
            pins: core::array::from_fn(|_| None),
            watchdog,
        }
    }

    /// Hand a GPIO to the board. It is left unconfigured.
    pub fn attach<P: Pin>(&mut self, pin: Peri<'static, P>) {
        let id = usize::from(pin.pin());
        self.pins[id] = Some(Flex::new(pin));
    }

    /// Whether this boot follows a dormant wake. Clears the marker.
    pub fn woke_from_sleep(&mut self) -> bool {
        let woke = self.watchdog.get_scratch(WAKE_SCRATCH) == WAKE_MAGIC;
        self.watchdog.set_scratch(WAKE_SCRATCH, 0);
        woke
    }

    fn flex(&mut self, pin: PinId) -> Option<&mut Flex<'static>> {
        self.pins.get_mut(usize::from(pin)).and_then(Option::as_mut)
    }

    fn with_pin(&mut self, pin: PinId, f: impl FnOnce(&mut Flex<'static>)) {
        match self.flex(pin) {
            Some(flex) => f(flex),
            None => warn!("GPIO {} not attached", pin),
        }
    }
}

impl PinBank for RpBoard {
    fn configure_input_pullup(&mut self, pin: PinId) {
        self.with_pin(pin, |flex| {
            flex.set_as_input();
            flex.set_pull(Pull::Up);
        });
    }

    fn configure_output_low(&mut self, pin: PinId) {
        self.with_pin(pin, |flex| {
            flex.set_low();
            flex.set_as_output();
        });
    }

    fn configure_high_impedance(&mut self, pin: PinId) {
        self.with_pin(pin, |flex| {
            flex.set_as_input();
            flex.set_pull(Pull::None);
        });
    }

    fn read(&mut self, pin: PinId) -> bool {
        // A missing pin reads as an idle (released) switch.
        self.flex(pin).map_or(true, |flex| flex.is_high())
    }
}

impl PowerControl for RpBoard {
    fn enable_pullup(&mut self, pin: PinId) -> Result<(), PowerError> {
        let flex = self.flex(pin).ok_or(PowerError::UnknownPin)?;
        flex.set_as_input();
        flex.set_pull(Pull::Up);
        Ok(())
    }

    fn arm_gpio_wake(&mut self, pin: PinId, active_high: bool) -> Result<(), PowerError> {
        let flex = self.flex(pin).ok_or(PowerError::UnknownPin)?;
        let wake = flex.dormant_wake(DormantWakeConfig {
            edge_high: false,
            edge_low: false,
            level_high: active_high,
            level_low: !active_high,
        });
        // Dropping the guard would disarm the wake source; it stays armed
        // until the reset that follows the wake.
        mem::forget(wake);
        debug!("wake armed on GPIO {} (active high: {})", pin, active_high);
        Ok(())
    }

    fn flush_diagnostics(&mut self) {
        defmt::flush();
    }

    fn deep_sleep_now(&mut self) -> ! {
        self.watchdog.set_scratch(WAKE_SCRATCH, WAKE_MAGIC);

        // Stops every clock until the armed GPIO level shows up.
        #[allow(unused_unsafe)]
        unsafe {
            embassy_rp::clocks::dormant_sleep();
        }

        // Clocks are back but peripherals are in an unknown state: start over.
        SCB::sys_reset()
    }
}

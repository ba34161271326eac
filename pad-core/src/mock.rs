//! Mock collaborators and a tiny executor for host tests.

extern crate std;

use core::future::Future;
use core::pin::Pin;
use core::task::{Context, Poll, RawWaker, RawWakerVTable, Waker};
use std::vec::Vec;

use embassy_time::Duration;

use crate::board::{PinBank, PowerControl, PowerError};
use crate::config::PadConfig;
use crate::direction::DirectionPins;
use crate::mapper::ButtonMapping;
use crate::power::PowerPolicy;
use crate::sink::{ControllerType, ReportSink, SinkConfig, SinkError};
use crate::types::{HatValue, PinId};

/// The pad used throughout the tests: six buttons, a four-way switch and two
/// extra grounds.
pub const TEST_PAD: PadConfig<6> = PadConfig {
    button_pins: [10, 9, 8, 7, 6, 5],
    mappings: [
        ButtonMapping::standard(0, 1),
        ButtonMapping::standard(1, 2),
        ButtonMapping::standard(2, 3),
        ButtonMapping::standard(3, 4),
        ButtonMapping::standard(4, 7),
        ButtonMapping::standard(5, 8),
    ],
    direction_pins: DirectionPins {
        left: 3,
        right: 2,
        down: 1,
        up: 0,
    },
    extra_grounds: &[4, 21],
    debounce: Duration::from_millis(5),
    cycle_rate_hz: 60,
    power: PowerPolicy {
        idle_timeout: Duration::from_millis(60_000),
        wake_pin: 5,
        wake_active_high: false,
    },
    controller_type: ControllerType::Joystick,
    product_id: 0xe388,
    tx_power_dbm: 6,
};

pub fn test_config() -> PadConfig<6> {
    TEST_PAD
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SinkCall {
    Begin,
    Press(u8),
    Release(u8),
    PressSpecial(u8),
    ReleaseSpecial(u8),
    Hat(HatValue),
    Send,
    End,
}

pub struct MockSink {
    pub connected: bool,
    pub calls: Vec<SinkCall>,
    pub config: Option<SinkConfig>,
    pub fail_begin: Option<SinkError>,
    pub fail_send: Option<SinkError>,
}

impl MockSink {
    pub fn connected() -> Self {
        Self {
            connected: true,
            calls: Vec::new(),
            config: None,
            fail_begin: None,
            fail_send: None,
        }
    }

    pub fn disconnected() -> Self {
        Self {
            connected: false,
            ..Self::connected()
        }
    }

    pub fn count(&self, call: SinkCall) -> usize {
        self.calls.iter().filter(|c| **c == call).count()
    }
}

impl ReportSink for MockSink {
    fn begin(&mut self, config: &SinkConfig) -> Result<(), SinkError> {
        self.calls.push(SinkCall::Begin);
        if let Some(e) = self.fail_begin {
            return Err(e);
        }
        self.config = Some(*config);
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    fn press(&mut self, id: u8) {
        self.calls.push(SinkCall::Press(id));
    }

    fn release(&mut self, id: u8) {
        self.calls.push(SinkCall::Release(id));
    }

    fn press_special(&mut self, id: u8) {
        self.calls.push(SinkCall::PressSpecial(id));
    }

    fn release_special(&mut self, id: u8) {
        self.calls.push(SinkCall::ReleaseSpecial(id));
    }

    fn set_hat(&mut self, hat: HatValue) {
        self.calls.push(SinkCall::Hat(hat));
    }

    fn send_report(&mut self) -> impl Future<Output = Result<(), SinkError>> {
        self.calls.push(SinkCall::Send);
        core::future::ready(match self.fail_send {
            Some(e) => Err(e),
            None => Ok(()),
        })
    }

    fn end(&mut self) -> impl Future<Output = ()> {
        self.calls.push(SinkCall::End);
        core::future::ready(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoardCall {
    InputPullup(PinId),
    OutputLow(PinId),
    HighImpedance(PinId),
    Read(PinId),
    EnablePullup(PinId),
    ArmWake(PinId, bool),
    Flush,
}

pub struct MockBoard {
    /// Electrical level per GPIO; everything idles high (pull-ups).
    pub levels: [bool; 32],
    pub calls: Vec<BoardCall>,
    pub fail_pullup: Option<PowerError>,
    pub fail_wake: Option<PowerError>,
}

impl MockBoard {
    pub fn new() -> Self {
        Self {
            levels: [true; 32],
            calls: Vec::new(),
            fail_pullup: None,
            fail_wake: None,
        }
    }

    /// Hold a switch down (active low).
    pub fn press(&mut self, pin: PinId) {
        self.levels[usize::from(pin)] = false;
    }

    pub fn release(&mut self, pin: PinId) {
        self.levels[usize::from(pin)] = true;
    }

    pub fn reads(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, BoardCall::Read(_)))
            .count()
    }
}

impl PinBank for MockBoard {
    fn configure_input_pullup(&mut self, pin: PinId) {
        self.calls.push(BoardCall::InputPullup(pin));
    }

    fn configure_output_low(&mut self, pin: PinId) {
        self.calls.push(BoardCall::OutputLow(pin));
    }

    fn configure_high_impedance(&mut self, pin: PinId) {
        self.calls.push(BoardCall::HighImpedance(pin));
    }

    fn read(&mut self, pin: PinId) -> bool {
        self.calls.push(BoardCall::Read(pin));
        self.levels[usize::from(pin)]
    }
}

impl PowerControl for MockBoard {
    fn enable_pullup(&mut self, pin: PinId) -> Result<(), PowerError> {
        self.calls.push(BoardCall::EnablePullup(pin));
        self.fail_pullup.map_or(Ok(()), Err)
    }

    fn arm_gpio_wake(&mut self, pin: PinId, active_high: bool) -> Result<(), PowerError> {
        self.calls.push(BoardCall::ArmWake(pin, active_high));
        self.fail_wake.map_or(Ok(()), Err)
    }

    fn flush_diagnostics(&mut self) {
        self.calls.push(BoardCall::Flush);
    }

    fn deep_sleep_now(&mut self) -> ! {
        panic!("deep sleep entered in a host test");
    }
}

/// Run a future to completion (simple blocking executor).
pub fn block_on<F: Future>(mut f: F) -> F::Output {
    fn noop_raw_waker() -> RawWaker {
        fn noop(_: *const ()) {}
        fn clone(_: *const ()) -> RawWaker {
            noop_raw_waker()
        }
        static VTABLE: RawWakerVTable = RawWakerVTable::new(clone, noop, noop, noop);
        RawWaker::new(core::ptr::null(), &VTABLE)
    }

    let waker = unsafe { Waker::from_raw(noop_raw_waker()) };
    let mut cx = Context::from_waker(&waker);

    // SAFETY: We don't move f after pinning
    let mut f = unsafe { Pin::new_unchecked(&mut f) };

    match f.as_mut().poll(&mut cx) {
        Poll::Ready(result) => result,
        Poll::Pending => panic!("Mock future returned Pending unexpectedly"),
    }
}

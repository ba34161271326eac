//! Controller: ties channels, mapper, translator and power policy to the
//! board and the report sink.

use embassy_time::{Instant, Ticker};

use crate::board::Board;
use crate::coalescer::ReportCoalescer;
use crate::config::{ConfigError, PadConfig};
use crate::debounce::Channel;
use crate::direction::{Direction, DirectionTranslator};
use crate::mapper::ButtonMapper;
use crate::power::{IdleSleepController, PowerDecision, PowerPolicy, PowerState};
use crate::sink::{ReportSink, SinkError};
use crate::types::Edge;

/// What one cycle did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CycleOutcome {
    /// Host not attached; inputs were not sampled.
    Idle,
    /// Inputs sampled, nothing changed.
    Unchanged,
    /// Inputs changed and one report was sent.
    Reported,
    /// The idle timeout expired; the caller must enter sleep.
    Sleep,
}

/// Error type for controller operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ControllerError {
    /// The configuration table is inconsistent.
    Config(ConfigError),
    /// Error from the report sink.
    Sink(SinkError),
}

impl From<ConfigError> for ControllerError {
    fn from(e: ConfigError) -> Self {
        ControllerError::Config(e)
    }
}

impl From<SinkError> for ControllerError {
    fn from(e: SinkError) -> Self {
        ControllerError::Sink(e)
    }
}

/// Samples the pad at a fixed rate and forwards changes to a report sink.
///
/// Owns every piece of runtime state. `N` is the number of buttons.
///
/// # Cycle
///
/// 1. Ask the power policy whether to run, skip (host away) or sleep.
/// 2. Debounce every button and direction pin.
/// 3. Route button edges and hat changes into the sink.
/// 4. Send at most one report.
pub struct Controller<S, B, const N: usize> {
    sink: S,
    board: B,
    config: PadConfig<N>,
    buttons: [Channel; N],
    directions: [Channel; Direction::COUNT],
    mapper: ButtonMapper<N>,
    translator: DirectionTranslator,
    report: ReportCoalescer,
    power: IdleSleepController,
}

impl<S: ReportSink, B: Board, const N: usize> Controller<S, B, N> {
    /// Validate the table, configure pins, prime the channels and start the sink.
    pub fn new(
        config: PadConfig<N>,
        mut sink: S,
        mut board: B,
        now: Instant,
    ) -> Result<Self, ControllerError> {
        config.validate()?;

        for &pin in config.extra_grounds {
            board.configure_output_low(pin);
        }
        for pin in config.input_pins() {
            board.configure_input_pullup(pin);
        }

        let buttons = core::array::from_fn(|i| {
            let pin = config.button_pins[i];
            Channel::new(pin, config.debounce, board.read(pin), now)
        });
        let direction_pins = config.direction_pins.as_array();
        let directions = core::array::from_fn(|i| {
            let pin = direction_pins[i];
            Channel::new(pin, config.debounce, board.read(pin), now)
        });

        sink.begin(&config.sink_config())?;
        info!(
            "pad ready: {} buttons, {} Hz, sleep after {} s",
            N,
            config.cycle_rate_hz,
            config.power.idle_timeout.as_secs()
        );

        Ok(Self {
            sink,
            board,
            mapper: ButtonMapper::new(config.mappings),
            power: IdleSleepController::new(config.power.idle_timeout, now),
            config,
            buttons,
            directions,
            translator: DirectionTranslator::new(),
            report: ReportCoalescer::new(),
        })
    }

    /// Run cycles at the configured rate until the idle timeout puts the
    /// device to sleep.
    pub async fn run(&mut self) -> ! {
        let mut ticker = Ticker::every(self.config.cycle_period());
        loop {
            match self.cycle(Instant::now()).await {
                Ok(CycleOutcome::Sleep) => self.sleep().await,
                Ok(_) => {}
                Err(e) => error!("cycle failed: {:?}", e),
            }
            ticker.next().await;
        }
    }

    /// Run a single cycle at `now`.
    pub async fn cycle(&mut self, now: Instant) -> Result<CycleOutcome, ControllerError> {
        match self.power.observe(self.sink.is_connected(), now) {
            PowerDecision::Run => {}
            PowerDecision::Skip => return Ok(CycleOutcome::Idle),
            PowerDecision::Sleep => return Ok(CycleOutcome::Sleep),
        }

        let edges: [Edge; N] = core::array::from_fn(|i| {
            let channel = &mut self.buttons[i];
            let raw = self.board.read(channel.pin());
            channel.update(raw, now)
        });
        for channel in &mut self.directions {
            let raw = self.board.read(channel.pin());
            channel.update(raw, now);
        }
        let pressed = core::array::from_fn(|i| self.directions[i].is_pressed());

        self.report.mark_if(self.mapper.apply(&edges, &mut self.sink));
        self.report.mark_if(self.translator.update(pressed, &mut self.sink));

        if self.report.flush(&mut self.sink).await? {
            Ok(CycleOutcome::Reported)
        } else {
            Ok(CycleOutcome::Unchanged)
        }
    }

    /// Shut everything down and arm the wake pin, short of actually sleeping.
    ///
    /// Wake setup failures are logged and do not stop the sequence.
    pub async fn prepare_sleep(&mut self) {
        self.sink.end().await;

        for pin in self.config.all_pins() {
            self.board.configure_high_impedance(pin);
        }

        let PowerPolicy {
            wake_pin,
            wake_active_high,
            ..
        } = self.config.power;
        if let Err(e) = self.board.enable_pullup(wake_pin) {
            error!("failed to pull up wake pin {}: {:?}", wake_pin, e);
        }
        if let Err(e) = self.board.arm_gpio_wake(wake_pin, wake_active_high) {
            error!("failed to arm wake on pin {}: {:?}", wake_pin, e);
        }

        info!("shutdown");
        self.board.flush_diagnostics();
    }

    /// Enter deep sleep. The next thing that runs is a fresh boot.
    pub async fn sleep(&mut self) -> ! {
        self.prepare_sleep().await;
        self.board.deep_sleep_now()
    }

    /// Current lifecycle state.
    #[inline]
    pub fn power_state(&self) -> PowerState {
        self.power.state()
    }

    /// Get a reference to the report sink.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Get a mutable reference to the report sink.
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Get a reference to the board.
    pub fn board(&self) -> &B {
        &self.board
    }

    /// Get a mutable reference to the board.
    pub fn board_mut(&mut self) -> &mut B {
        &mut self.board
    }
}

//! USB HID pad output implementation.

use defmt::{debug, info, warn, Format};
use embassy_futures::select::{select, Either};
use embassy_rp::peripherals::USB;
use embassy_rp::usb::Driver;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_time::{with_timeout, Duration};
use embassy_usb::class::hid::{HidWriter, State};
use embassy_usb::{Builder, Handler, UsbDevice};
use pad_core::{ControllerType, HatValue, ReportSink, SinkConfig, SinkError};
use portable_atomic::{AtomicBool, Ordering};

/// Size of [`PadReport`] on the wire.
pub const REPORT_SIZE: usize = 3;

/// Most standard buttons the report carries.
pub const MAX_BUTTONS: u8 = 8;

/// How long `end` waits for the USB task to detach.
const STOP_TIMEOUT: Duration = Duration::from_millis(100);

/// How long a report may wait for the host to poll the endpoint. Less than
/// one 60 Hz cycle, so a stalled host cannot hold up the idle timer.
const SEND_TIMEOUT: Duration = Duration::from_millis(10);

/// HID input report.
///
/// | Byte | Content |
/// |------|---------|
/// | 0 | Buttons 1-8, bit 0 = button 1 |
/// | 1 | Hat in the low nibble (1-8 clockwise from up, 0 = centered) |
/// | 2 | Special buttons, bit 0 = slot 0 |
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq, Format)]
pub struct PadReport {
    pub buttons: u8,
    pub hat: HatValue,
    pub special: u8,
}

impl PadReport {
    /// Convert the report to bytes.
    #[must_use]
    pub fn as_bytes(&self) -> [u8; REPORT_SIZE] {
        [self.buttons, self.hat.raw() & 0x0F, self.special]
    }
}

/// Report descriptor template. Byte [`USAGE_INDEX`] is patched per
/// controller type.
///
/// - 8 buttons
/// - 1 hat switch (4 bits) plus 4 bits of padding
/// - 8 special buttons: Start, Select, Menu, Home, Back, Volume +/-, Mute
const DESCRIPTOR_TEMPLATE: &[u8] = &[
    0x05, 0x01, // Usage Page (Generic Desktop)
    0x09, 0x04, // Usage (Joystick)
    0xA1, 0x01, // Collection (Application)
    //
    // --- Buttons (8 buttons) ---
    0x05, 0x09, //   Usage Page (Button)
    0x19, 0x01, //   Usage Minimum (Button 1)
    0x29, 0x08, //   Usage Maximum (Button 8)
    0x15, 0x00, //   Logical Minimum (0)
    0x25, 0x01, //   Logical Maximum (1)
    0x95, 0x08, //   Report Count (8)
    0x75, 0x01, //   Report Size (1)
    0x81, 0x02, //   Input (Data, Variable, Absolute)
    //
    // --- Hat switch ---
    0x05, 0x01, //   Usage Page (Generic Desktop)
    0x09, 0x39, //   Usage (Hat switch)
    0x15, 0x01, //   Logical Minimum (1)
    0x25, 0x08, //   Logical Maximum (8)
    0x35, 0x00, //   Physical Minimum (0)
    0x46, 0x3B, 0x01, //   Physical Maximum (315)
    0x65, 0x14, //   Unit (Degrees)
    0x75, 0x04, //   Report Size (4)
    0x95, 0x01, //   Report Count (1)
    0x81, 0x42, //   Input (Data, Variable, Absolute, Null State)
    0x65, 0x00, //   Unit (None)
    0x75, 0x04, //   Report Size (4)
    0x95, 0x01, //   Report Count (1)
    0x81, 0x03, //   Input (Constant) - padding
    //
    // --- Special buttons ---
    0x15, 0x00, //   Logical Minimum (0)
    0x25, 0x01, //   Logical Maximum (1)
    0x75, 0x01, //   Report Size (1)
    0x95, 0x01, //   Report Count (1)
    0x09, 0x3D, //   Usage (Start)
    0x81, 0x02, //   Input (Data, Variable, Absolute)
    0x09, 0x3E, //   Usage (Select)
    0x81, 0x02, //   Input (Data, Variable, Absolute)
    0x09, 0x85, //   Usage (System Main Menu)
    0x81, 0x02, //   Input (Data, Variable, Absolute)
    0x05, 0x0C, //   Usage Page (Consumer)
    0x0A, 0x23, 0x02, //   Usage (AC Home)
    0x81, 0x02, //   Input (Data, Variable, Absolute)
    0x0A, 0x24, 0x02, //   Usage (AC Back)
    0x81, 0x02, //   Input (Data, Variable, Absolute)
    0x09, 0xE9, //   Usage (Volume Increment)
    0x81, 0x02, //   Input (Data, Variable, Absolute)
    0x09, 0xEA, //   Usage (Volume Decrement)
    0x81, 0x02, //   Input (Data, Variable, Absolute)
    0x09, 0xE2, //   Usage (Mute)
    0x81, 0x02, //   Input (Data, Variable, Absolute)
    //
    0xC0, // End Collection
];

const DESCRIPTOR_LEN: usize = DESCRIPTOR_TEMPLATE.len();
const USAGE_INDEX: usize = 3;

const fn descriptor_with_usage(usage: u8) -> [u8; DESCRIPTOR_LEN] {
    let mut out = [0; DESCRIPTOR_LEN];
    let mut i = 0;
    while i < DESCRIPTOR_LEN {
        out[i] = DESCRIPTOR_TEMPLATE[i];
        i += 1;
    }
    out[USAGE_INDEX] = usage;
    out
}

static JOYSTICK_DESCRIPTOR: [u8; DESCRIPTOR_LEN] = descriptor_with_usage(0x04);
static GAMEPAD_DESCRIPTOR: [u8; DESCRIPTOR_LEN] = descriptor_with_usage(0x05);
static MULTI_AXIS_DESCRIPTOR: [u8; DESCRIPTOR_LEN] = descriptor_with_usage(0x08);

/// Report descriptor announcing the given kind of controller.
#[must_use]
pub fn report_descriptor(kind: ControllerType) -> &'static [u8] {
    match kind {
        ControllerType::Joystick => &JOYSTICK_DESCRIPTOR,
        ControllerType::Gamepad => &GAMEPAD_DESCRIPTOR,
        ControllerType::MultiAxis => &MULTI_AXIS_DESCRIPTOR,
    }
}

/// State shared between the USB device task and the output.
///
/// The host counts as connected while the device is configured and the bus
/// is not suspended.
pub struct UsbLink {
    configured: AtomicBool,
    suspended: AtomicBool,
    shutdown: Signal<CriticalSectionRawMutex, ()>,
    stopped: Signal<CriticalSectionRawMutex, ()>,
}

impl UsbLink {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            configured: AtomicBool::new(false),
            suspended: AtomicBool::new(false),
            shutdown: Signal::new(),
            stopped: Signal::new(),
        }
    }

    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.configured.load(Ordering::Relaxed) && !self.suspended.load(Ordering::Relaxed)
    }

    /// Run the USB stack until the output is ended, then detach from the bus.
    pub async fn serve<'d>(&self, device: &mut UsbDevice<'d, Driver<'d, USB>>) {
        match select(device.run(), self.shutdown.wait()).await {
            Either::First(never) => never,
            Either::Second(()) => {}
        }
        device.disable().await;
        self.configured.store(false, Ordering::Relaxed);
        info!("USB detached");
        self.stopped.signal(());
    }

    /// Bus event handler to register with the USB builder.
    #[must_use]
    pub const fn handler(&self) -> LinkHandler<'_> {
        LinkHandler { link: self }
    }
}

impl Default for UsbLink {
    fn default() -> Self {
        Self::new()
    }
}

/// Feeds USB bus events into a [`UsbLink`].
pub struct LinkHandler<'a> {
    link: &'a UsbLink,
}

impl Handler for LinkHandler<'_> {
    fn enabled(&mut self, enabled: bool) {
        if !enabled {
            self.link.configured.store(false, Ordering::Relaxed);
        }
    }

    fn reset(&mut self) {
        self.link.configured.store(false, Ordering::Relaxed);
        self.link.suspended.store(false, Ordering::Relaxed);
    }

    fn configured(&mut self, configured: bool) {
        debug!("USB configured: {}", configured);
        self.link.configured.store(configured, Ordering::Relaxed);
    }

    fn suspended(&mut self, suspended: bool) {
        debug!("USB suspended: {}", suspended);
        self.link.suspended.store(suspended, Ordering::Relaxed);
    }
}

/// USB HID pad output.
///
/// Button and hat changes only touch the in-memory report; `send_report`
/// writes it to the interrupt endpoint.
pub struct UsbHidOutput<'d> {
    writer: HidWriter<'d, Driver<'d, USB>, REPORT_SIZE>,
    link: &'d UsbLink,
    kind: ControllerType,
    report: PadReport,
    started: bool,
}

impl<'d> UsbHidOutput<'d> {
    /// Create a new output from a HID writer set up for `kind`.
    pub fn new(
        writer: HidWriter<'d, Driver<'d, USB>, REPORT_SIZE>,
        link: &'d UsbLink,
        kind: ControllerType,
    ) -> Self {
        Self {
            writer,
            link,
            kind,
            report: PadReport::default(),
            started: false,
        }
    }

    fn button_bit(id: u8) -> Option<u8> {
        match id {
            1..=MAX_BUTTONS => Some(1 << (id - 1)),
            _ => {
                warn!("button {} not in report", id);
                None
            }
        }
    }

    fn special_bit(id: u8) -> Option<u8> {
        match id {
            0..=7 => Some(1 << id),
            _ => {
                warn!("special button {} not in report", id);
                None
            }
        }
    }
}

impl ReportSink for UsbHidOutput<'_> {
    fn begin(&mut self, config: &SinkConfig) -> Result<(), SinkError> {
        if config.controller_type != self.kind
            || config.button_count > MAX_BUTTONS
            || config.hat_count > 1
            || config.axis_mask != 0
            || config.auto_report
        {
            warn!("USB output cannot provide {:?}", config);
            return Err(SinkError::Unsupported);
        }
        debug!("ignoring tx power {} dBm on USB", config.tx_power_dbm);

        self.report = PadReport::default();
        self.started = true;
        info!(
            "USB HID output started: {:?}, {} buttons, special mask {:#x}",
            config.controller_type, config.button_count, config.special_button_mask
        );
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.started && self.link.is_connected()
    }

    fn press(&mut self, id: u8) {
        if let Some(bit) = Self::button_bit(id) {
            self.report.buttons |= bit;
        }
    }

    fn release(&mut self, id: u8) {
        if let Some(bit) = Self::button_bit(id) {
            self.report.buttons &= !bit;
        }
    }

    fn press_special(&mut self, id: u8) {
        if let Some(bit) = Self::special_bit(id) {
            self.report.special |= bit;
        }
    }

    fn release_special(&mut self, id: u8) {
        if let Some(bit) = Self::special_bit(id) {
            self.report.special &= !bit;
        }
    }

    fn set_hat(&mut self, hat: HatValue) {
        self.report.hat = hat;
    }

    async fn send_report(&mut self) -> Result<(), SinkError> {
        if !self.started {
            return Err(SinkError::NotReady);
        }
        match with_timeout(SEND_TIMEOUT, self.writer.write(&self.report.as_bytes())).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(_)) => Err(SinkError::Io),
            Err(_) => {
                warn!("host did not poll within {} ms", SEND_TIMEOUT.as_millis());
                Err(SinkError::Timeout)
            }
        }
    }

    async fn end(&mut self) {
        self.started = false;
        self.link.shutdown.signal(());
        if with_timeout(STOP_TIMEOUT, self.link.stopped.wait())
            .await
            .is_err()
        {
            warn!("USB did not detach in time");
        }
    }
}

/// Configure the USB HID class in the USB builder.
///
/// Returns the HID writer for use by the application.
pub fn configure_usb_hid<'d>(
    builder: &mut Builder<'d, Driver<'d, USB>>,
    state: &'d mut State<'d>,
    kind: ControllerType,
) -> HidWriter<'d, Driver<'d, USB>, REPORT_SIZE> {
    let config = embassy_usb::class::hid::Config {
        report_descriptor: report_descriptor(kind),
        request_handler: None,
        poll_ms: 1,
        max_packet_size: 8,
        hid_subclass: embassy_usb::class::hid::HidSubclass::No,
        hid_boot_protocol: embassy_usb::class::hid::HidBootProtocol::None,
    };

    HidWriter::new(builder, state, config)
}

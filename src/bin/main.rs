#![no_std]
#![no_main]

use defmt::{error, info};
use defmt_rtt as _;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::peripherals::USB;
use embassy_rp::usb::Driver;
use embassy_rp::watchdog::Watchdog;
use embassy_time::Instant;
use embassy_usb::class::hid::State;
use embassy_usb::{Builder, Config as UsbConfig, UsbDevice};
use gpio_to_gamepad::usb_output::LinkHandler;
use gpio_to_gamepad::{config, configure_usb_hid, Controller, RpBoard, UsbHidOutput, UsbLink};
use static_cell::StaticCell;

#[cfg(feature = "dev-panic")]
use panic_probe as _;
#[cfg(feature = "prod-panic")]
use panic_reset as _;

bind_interrupts!(struct Irqs {
    USBCTRL_IRQ => embassy_rp::usb::InterruptHandler<USB>;
});

/// Connection state and shutdown handshake between the USB task and the pad.
static USB_LINK: UsbLink = UsbLink::new();

/// USB device configuration buffer.
static CONFIG_DESCRIPTOR: StaticCell<[u8; 256]> = StaticCell::new();
static BOS_DESCRIPTOR: StaticCell<[u8; 256]> = StaticCell::new();
static MSOS_DESCRIPTOR: StaticCell<[u8; 256]> = StaticCell::new();
static CONTROL_BUF: StaticCell<[u8; 64]> = StaticCell::new();

/// HID state.
static HID_STATE: StaticCell<State> = StaticCell::new();
static LINK_HANDLER: StaticCell<LinkHandler<'static>> = StaticCell::new();

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("GPIO-to-Gamepad starting...");

    let p = embassy_rp::init(embassy_rp::config::Config::default());

    // --- Pins ---
    let mut board = RpBoard::new(Watchdog::new(p.WATCHDOG));
    if board.woke_from_sleep() {
        info!("woke from dormant sleep");
    } else {
        info!("cold boot");
    }

    board.attach(p.PIN_0);
    board.attach(p.PIN_1);
    board.attach(p.PIN_2);
    board.attach(p.PIN_3);
    board.attach(p.PIN_4);
    board.attach(p.PIN_5);
    board.attach(p.PIN_6);
    board.attach(p.PIN_7);
    board.attach(p.PIN_8);
    board.attach(p.PIN_9);
    board.attach(p.PIN_10);
    board.attach(p.PIN_21);

    // --- USB Setup ---
    let usb_driver = Driver::new(p.USB, Irqs);

    let mut usb_config = UsbConfig::new(config::VENDOR_ID, config::PRODUCT_ID);
    usb_config.manufacturer = Some(config::MANUFACTURER);
    usb_config.product = Some(config::PRODUCT);
    usb_config.serial_number = Some("001");
    usb_config.max_power = 100;
    usb_config.max_packet_size_0 = 64;

    let config_descriptor = CONFIG_DESCRIPTOR.init([0; 256]);
    let bos_descriptor = BOS_DESCRIPTOR.init([0; 256]);
    let msos_descriptor = MSOS_DESCRIPTOR.init([0; 256]);
    let control_buf = CONTROL_BUF.init([0; 64]);

    let mut builder = Builder::new(
        usb_driver,
        usb_config,
        config_descriptor,
        bos_descriptor,
        msos_descriptor,
        control_buf,
    );
    builder.handler(LINK_HANDLER.init(USB_LINK.handler()));

    // Configure HID class
    let hid_state = HID_STATE.init(State::new());
    let hid_writer = configure_usb_hid(&mut builder, hid_state, config::PAD.controller_type);

    // Build the USB device
    let usb_device = builder.build();

    // Create output
    let usb_output = UsbHidOutput::new(hid_writer, &USB_LINK, config::PAD.controller_type);

    spawner.spawn(usb_task(usb_device).unwrap());

    let mut controller = match Controller::new(config::PAD, usb_output, board, Instant::now()) {
        Ok(controller) => controller,
        Err(e) => {
            // The USB task keeps running so the device stays enumerated,
            // but no report is ever sent.
            error!("Startup failed: {:?}", e);
            return;
        }
    };

    info!("GPIO-to-Gamepad initialized, waiting for host...");
    controller.run().await
}

/// USB device task - runs the USB stack until the pad goes to sleep.
#[embassy_executor::task]
async fn usb_task(mut device: UsbDevice<'static, Driver<'static, USB>>) {
    USB_LINK.serve(&mut device).await;
}

#![no_std]
#![no_main]

use defmt::info;
use defmt_rtt as _;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::flash::{Blocking, Flash};
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::peripherals::USB;
use embassy_rp::usb::Driver;
use embassy_time::{Delay, Timer};
use embassy_usb::class::hid::State;
use embassy_usb::{Builder, Config as UsbConfig};
use pancadaria_stick::flash_storage::FLASH_SIZE;
use pancadaria_stick::{
    configure_usb_hid, DeviceContext, FlashStorage, Indicator, JoystickRequestHandler, Phase,
    ReportBridge, SioPinBank, UsbHidOutput,
};
use static_cell::StaticCell;

#[cfg(feature = "dev-panic")]
use panic_probe as _;
#[cfg(feature = "prod-panic")]
use panic_reset as _;

bind_interrupts!(struct Irqs {
    USBCTRL_IRQ => embassy_rp::usb::InterruptHandler<USB>;
});

/// USB device configuration buffer.
static CONFIG_DESCRIPTOR: StaticCell<[u8; 256]> = StaticCell::new();
static BOS_DESCRIPTOR: StaticCell<[u8; 256]> = StaticCell::new();
static MSOS_DESCRIPTOR: StaticCell<[u8; 256]> = StaticCell::new();
static CONTROL_BUF: StaticCell<[u8; 64]> = StaticCell::new();

/// HID state.
static HID_STATE: StaticCell<State> = StaticCell::new();
static REQUEST_HANDLER: StaticCell<JoystickRequestHandler> = StaticCell::new();

type JoystickBridge = ReportBridge<SioPinBank<'static>, Output<'static>, UsbHidOutput<'static>>;

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("PancadariaStick starting...");

    let p = embassy_rp::init(embassy_rp::config::Config::default());

    // --- Inputs, LED and storage ---
    let mut led = Indicator::new(Output::new(p.PIN_25, Level::Low));
    let pins = SioPinBank::new([
        Input::new(p.PIN_0, Pull::Up),  // Button 1
        Input::new(p.PIN_1, Pull::Up),  // Button 2
        Input::new(p.PIN_2, Pull::Up),  // Button 3
        Input::new(p.PIN_3, Pull::Up),  // Button 4
        Input::new(p.PIN_4, Pull::Up),  // Button 5
        Input::new(p.PIN_5, Pull::Up),  // Button 6
        Input::new(p.PIN_6, Pull::Up),  // Button 7
        Input::new(p.PIN_7, Pull::Up),  // Button 8
        Input::new(p.PIN_8, Pull::Up),  // Button 9
        Input::new(p.PIN_9, Pull::Up),  // Button 10
        Input::new(p.PIN_10, Pull::Up), // Axis up
        Input::new(p.PIN_11, Pull::Up), // Axis down
        Input::new(p.PIN_12, Pull::Up), // Axis left
        Input::new(p.PIN_13, Pull::Up), // Axis right
    ]);
    let mut storage = FlashStorage::new(Flash::<_, Blocking, FLASH_SIZE>::new_blocking(p.FLASH));

    // Give the pull-ups time to charge the lines before sampling.
    Timer::after_millis(10).await;

    // --- Boot phase: load the stored order or run the remap session ---
    let mut device = DeviceContext::boot(&pins, &mut storage);
    if device.phase() == Phase::Training {
        // Blocks the executor; USB is not up yet.
        device.train(&pins, &mut led, &mut Delay, &mut storage);
    }
    info!("Button order: {:?}", device.order());

    // --- USB Setup ---
    let usb_driver = Driver::new(p.USB, Irqs);

    let mut usb_config = UsbConfig::new(0x1209, 0x0001); // pid.codes test VID/PID
    usb_config.manufacturer = Some("Pancadaria");
    usb_config.product = Some("PancadariaStick");
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

    // Configure HID class
    let hid_state = HID_STATE.init(State::new());
    let request_handler = REQUEST_HANDLER.init(JoystickRequestHandler);
    let hid_writer = configure_usb_hid(&mut builder, hid_state, request_handler);

    // Build the USB device
    let usb_device = builder.build();

    let bridge = ReportBridge::new(device, pins, led, UsbHidOutput::new(hid_writer));

    // Spawn tasks (unwrap the SpawnToken, then spawn)
    spawner.spawn(usb_task(usb_device).unwrap());
    spawner.spawn(report_task(bridge).unwrap());

    info!("PancadariaStick initialized, waiting for host...");
}

/// USB device task - runs the USB stack.
#[embassy_executor::task]
async fn usb_task(mut device: embassy_usb::UsbDevice<'static, Driver<'static, USB>>) {
    device.run().await;
}

/// Report task - builds a report every host poll and sends it over USB HID.
#[embassy_executor::task]
async fn report_task(mut bridge: JoystickBridge) {
    // Wait for USB to be ready
    bridge.output_mut().wait_ready().await;
    info!("USB HID ready, sending reports...");

    bridge.run().await
}

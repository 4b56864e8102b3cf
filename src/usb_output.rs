//! USB HID joystick output implementation.

use core::cell::Cell;

use embassy_rp::peripherals::USB;
use embassy_rp::usb::Driver;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_usb::class::hid::{HidWriter, ReportId, RequestHandler, State};
use embassy_usb::control::OutResponse;
use embassy_usb::Builder;
use joystick_core::{JoystickReport, OutputError, OutputSink};

/// Maximum packet size of the interrupt IN endpoint.
const MAX_PACKET_SIZE: usize = 8;

/// HID writer type for the joystick interface.
pub type JoystickWriter<'d> = HidWriter<'d, Driver<'d, USB>, MAX_PACKET_SIZE>;

/// Last report handed to the host, for `GET_REPORT` requests.
static LATEST_REPORT: Mutex<CriticalSectionRawMutex, Cell<JoystickReport>> =
    Mutex::new(Cell::new(JoystickReport::neutral()));

/// Joystick HID Report Descriptor.
///
/// This descriptor defines a joystick with:
/// - 10 buttons (1 bit each) followed by 6 bits of padding
/// - X and Y axes, 8-bit, logical range 0-255 (128 = centered)
///
/// It must stay in sync with [`JoystickReport::as_bytes`].
pub const REPORT_DESCRIPTOR: &[u8] = &[
    0x05, 0x01, // Usage Page (Generic Desktop)
    0x09, 0x04, // Usage (Joystick)
    0xA1, 0x01, // Collection (Application)
    //
    // --- Buttons (10 buttons) ---
    0x05, 0x09, //   Usage Page (Button)
    0x19, 0x01, //   Usage Minimum (Button 1)
    0x29, 0x0A, //   Usage Maximum (Button 10)
    0x15, 0x00, //   Logical Minimum (0)
    0x25, 0x01, //   Logical Maximum (1)
    0x95, 0x0A, //   Report Count (10)
    0x75, 0x01, //   Report Size (1)
    0x81, 0x02, //   Input (Data, Variable, Absolute)
    //
    // --- Padding ---
    0x95, 0x01, //   Report Count (1)
    0x75, 0x06, //   Report Size (6)
    0x81, 0x03, //   Input (Constant, Variable, Absolute)
    //
    // --- Axes ---
    0x05, 0x01, //   Usage Page (Generic Desktop)
    0x09, 0x01, //   Usage (Pointer)
    0xA1, 0x00, //   Collection (Physical)
    0x09, 0x30, //     Usage (X)
    0x09, 0x31, //     Usage (Y)
    0x15, 0x00, //     Logical Minimum (0)
    0x26, 0xFF, 0x00, //     Logical Maximum (255)
    0x95, 0x02, //     Report Count (2)
    0x75, 0x08, //     Report Size (8)
    0x81, 0x02, //     Input (Data, Variable, Absolute)
    0xC0, //   End Collection
    //
    0xC0, // End Collection
];

/// Record `report` as the latest one sent to the host.
pub fn publish_report(report: JoystickReport) {
    LATEST_REPORT.lock(|latest| latest.set(report));
}

/// The latest report sent to the host.
#[must_use]
pub fn latest_report() -> JoystickReport {
    LATEST_REPORT.lock(Cell::get)
}

/// USB HID joystick output.
///
/// Wraps an embassy-usb HID writer to send joystick reports.
pub struct UsbHidOutput<'d> {
    writer: JoystickWriter<'d>,
    ready: bool,
}

impl<'d> UsbHidOutput<'d> {
    /// Create a new USB HID output from the given HID writer.
    pub fn new(writer: JoystickWriter<'d>) -> Self {
        Self {
            writer,
            ready: false,
        }
    }

    /// Wait until the device is ready (USB enumerated).
    pub async fn wait_ready(&mut self) {
        self.writer.ready().await;
        self.ready = true;
    }
}

impl OutputSink for UsbHidOutput<'_> {
    async fn send(&mut self, report: &JoystickReport) -> Result<(), OutputError> {
        publish_report(*report);
        self.writer
            .write(&report.as_bytes())
            .await
            .map_err(|_| OutputError::Io)
    }

    fn is_ready(&self) -> bool {
        self.ready
    }
}

/// HID request handler.
///
/// Reports sent by the host (`SET_REPORT`) are accepted and discarded;
/// `GET_REPORT` answers with the latest input report, which may be up to one
/// poll interval old.
pub struct JoystickRequestHandler;

impl RequestHandler for JoystickRequestHandler {
    fn get_report(&mut self, id: ReportId, buf: &mut [u8]) -> Option<usize> {
        match id {
            ReportId::In(_) if buf.len() >= JoystickReport::SIZE => {
                buf[..JoystickReport::SIZE].copy_from_slice(&latest_report().as_bytes());
                Some(JoystickReport::SIZE)
            }
            _ => None,
        }
    }

    fn set_report(&mut self, _id: ReportId, data: &[u8]) -> OutResponse {
        defmt::trace!("Ignoring host report ({} bytes)", data.len());
        OutResponse::Accepted
    }

    fn set_idle_ms(&mut self, _id: Option<ReportId>, _duration_ms: u32) {}

    fn get_idle_ms(&mut self, _id: Option<ReportId>) -> Option<u32> {
        None
    }
}

/// Configure the USB HID class in the USB builder.
///
/// Returns the HID writer for use by the application.
pub fn configure_usb_hid<'d>(
    builder: &mut Builder<'d, Driver<'d, USB>>,
    state: &'d mut State<'d>,
    request_handler: &'d mut JoystickRequestHandler,
) -> JoystickWriter<'d> {
    let config = embassy_usb::class::hid::Config {
        report_descriptor: REPORT_DESCRIPTOR,
        request_handler: Some(request_handler),
        poll_ms: 1,
        max_packet_size: MAX_PACKET_SIZE as u16,
        hid_subclass: embassy_usb::class::hid::HidSubclass::No,
        hid_boot_protocol: embassy_usb::class::hid::HidBootProtocol::None,
    };

    HidWriter::new(builder, state, config)
}

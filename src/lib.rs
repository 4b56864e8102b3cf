//! PancadariaStick: remappable USB HID joystick for RP2040.
//!
//! This crate provides the embedded side of the joystick: the GPIO pin
//! bank, flash storage for the button order and the USB HID output. All
//! input mapping logic lives in [`joystick_core`].
//!
//! # Overview
//!
//! The firmware runs on a Raspberry Pi Pico (RP2040) and:
//! 1. Checks at power-on whether buttons 9 and 10 are held
//! 2. If so, runs the blocking remap session and stores the new button order
//! 3. Otherwise loads the stored order (identity on first boot)
//! 4. Reports 10 buttons and two digital axes as a USB HID joystick
//!
//! # Hardware Configuration
//!
//! | Function    | GPIO  | Description |
//! |-------------|-------|-------------|
//! | Button 1-10 | 0-9   | To ground, internal pull-up |
//! | Axis U/D/L/R| 10-13 | To ground, internal pull-up |
//! | LED         | 25    | On-board LED (remap progress / button activity) |
//!
//! # Architecture
//!
//! Training runs before the USB device exists. Afterwards the Embassy
//! executor runs two tasks:
//!
//! - **USB Task**: Manages the USB device stack
//! - **Report Task**: Builds a report each poll and writes it to the HID endpoint
//!
//! # Modules
//!
//! - [`pin_bank`]: SIO-backed [`PinBank`](joystick_core::PinBank) ([`SioPinBank`])
//! - [`flash_storage`]: flash-backed [`MapStorage`](joystick_core::MapStorage) ([`FlashStorage`])
//! - [`usb_output`]: USB HID output ([`UsbHidOutput`], [`REPORT_DESCRIPTOR`])
//!
//! # Features
//!
//! - **`dev-panic`** (default): Use `panic-probe` for development (prints panic info via RTT)
//! - **`prod-panic`**: Use `panic-reset` for production (silent watchdog reset)

#![no_std]

#[cfg(all(feature = "dev-panic", feature = "prod-panic"))]
compile_error!("Cannot enable both `dev-panic` and `prod-panic` features - they install conflicting panic handlers");

// Re-export core types for convenience
pub use joystick_core::{
    ButtonOrderMap, DeviceContext, Indicator, JoystickReport, OutputError, OutputSink, Phase,
    ReportBridge,
};

pub mod flash_storage;
pub mod pin_bank;
pub mod usb_output;

pub use flash_storage::FlashStorage;
pub use pin_bank::SioPinBank;
pub use usb_output::{
    configure_usb_hid, JoystickRequestHandler, UsbHidOutput, REPORT_DESCRIPTOR,
};

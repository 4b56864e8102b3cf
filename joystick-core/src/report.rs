//! Joystick HID report and the per-poll report builder.

use embedded_hal::digital::OutputPin;

use crate::indicator::Indicator;
use crate::order::ButtonOrderMap;
use crate::pins::PinBank;
use crate::table::{AXIS_DOWN, AXIS_LEFT, AXIS_RIGHT, AXIS_UP, INPUT_TABLE};

/// Axis byte for the low end of travel (left / down).
pub const AXIS_MIN: u8 = 0;
/// Axis byte at rest.
pub const AXIS_CENTER: u8 = 128;
/// Axis byte for the high end of travel (right / up).
pub const AXIS_MAX: u8 = 255;

/// USB HID joystick report.
///
/// Wire layout (4 bytes):
///
/// ```text
/// B08 B07 B06 B05 B04 B03 B02 B01   buttons 1-8
///  .   .   .   .   .   .  B10 B09   buttons 9-10, padding
///  X7  X6  X5  X4  X3  X2  X1  X0   X axis
///  Y7  Y6  Y5  Y4  Y3  Y2  Y1  Y0   Y axis
/// ```
///
/// This layout matches the HID report descriptor sent to the host and must
/// not change on its own.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(C)]
pub struct JoystickReport {
    /// Buttons 1-8, bit per button.
    pub buttons_low: u8,
    /// Buttons 9-10 in bits 0-1.
    pub buttons_high: u8,
    /// X axis: 0, 128 or 255.
    pub x: u8,
    /// Y axis: 0, 128 or 255.
    pub y: u8,
}

impl JoystickReport {
    /// Size of the report in bytes.
    pub const SIZE: usize = 4;

    /// No buttons pressed, both axes centered.
    #[must_use]
    pub const fn neutral() -> Self {
        Self {
            buttons_low: 0,
            buttons_high: 0,
            x: AXIS_CENTER,
            y: AXIS_CENTER,
        }
    }

    /// Convert the report to bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> [u8; Self::SIZE] {
        [self.buttons_low, self.buttons_high, self.x, self.y]
    }

    /// Whether any button bit is set.
    #[inline]
    #[must_use]
    pub const fn any_button(&self) -> bool {
        (self.buttons_low | self.buttons_high) != 0
    }
}

impl Default for JoystickReport {
    fn default() -> Self {
        Self::neutral()
    }
}

/// Resolve a pair of opposing directions; `low` wins when both are held.
#[inline]
#[must_use]
pub const fn axis_value(low: bool, high: bool) -> u8 {
    if low {
        AXIS_MIN
    } else if high {
        AXIS_MAX
    } else {
        AXIS_CENTER
    }
}

/// Build the report for the current pin state.
///
/// Axes are read from their fixed inputs; buttons go through `order`.
#[must_use]
pub fn build_report<B: PinBank>(pins: &B, order: &ButtonOrderMap) -> JoystickReport {
    let held = |index: usize| pins.is_asserted(INPUT_TABLE[index]);

    let mut buttons_low = 0u8;
    for slot in 0..8 {
        buttons_low |= u8::from(order.is_pressed(pins, slot)) << slot;
    }

    let mut buttons_high = 0u8;
    for bit in 0..2 {
        buttons_high |= u8::from(order.is_pressed(pins, 8 + bit)) << bit;
    }

    JoystickReport {
        buttons_low,
        buttons_high,
        x: axis_value(held(AXIS_LEFT), held(AXIS_RIGHT)),
        y: axis_value(held(AXIS_DOWN), held(AXIS_UP)),
    }
}

/// Build the report and light the LED while any button is pressed.
pub fn build_and_indicate<B, P>(
    pins: &B,
    order: &ButtonOrderMap,
    led: &mut Indicator<P>,
) -> JoystickReport
where
    B: PinBank,
    P: OutputPin,
{
    let report = build_report(pins, order);
    led.set(report.any_button());
    report
}

//! GPIO-backed pin bank.
//!
//! The inputs are configured once with pull-ups through `embassy-rp`; a
//! group's level word is assembled from them on each read.
//!
//! # Pins
//!
//! | Function    | GPIO  |
//! |-------------|-------|
//! | Button 1-10 | 0-9   |
//! | Axis up     | 10    |
//! | Axis down   | 11    |
//! | Axis left   | 12    |
//! | Axis right  | 13    |

use embassy_rp::gpio::Input;
use joystick_core::{PinBank, PortGroup, INPUT_TABLE, NUM_INPUT};

/// Pin bank over the RP2040 GPIO inputs.
pub struct SioPinBank<'d> {
    /// Configured inputs, in input-table order.
    inputs: [Input<'d>; NUM_INPUT],
}

impl<'d> SioPinBank<'d> {
    /// Create the bank from the configured inputs, in input-table order.
    #[must_use]
    pub fn new(inputs: [Input<'d>; NUM_INPUT]) -> Self {
        Self { inputs }
    }
}

impl PinBank for SioPinBank<'_> {
    fn levels(&self, group: PortGroup) -> u32 {
        // Unwired pins read high, like an open switch.
        self.inputs
            .iter()
            .zip(INPUT_TABLE.iter())
            .filter(|(input, physical)| physical.group == group && input.is_low())
            .fold(u32::MAX, |word, (_, physical)| word & !physical.mask)
    }
}

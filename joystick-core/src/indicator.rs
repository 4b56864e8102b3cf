//! Status LED shared by the remap trainer and the report builder.

use embedded_hal::digital::OutputPin;

/// Electrical level that lights the LED.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Polarity {
    ActiveHigh,
    ActiveLow,
}

/// Single indicator LED.
///
/// Tracks the lit state itself so that toggling works on any
/// [`OutputPin`]. Pin errors are ignored: a failed LED write never
/// affects the input path.
pub struct Indicator<P> {
    pin: P,
    polarity: Polarity,
    lit: bool,
}

impl<P: OutputPin> Indicator<P> {
    /// LED lit by driving the pin high (e.g. the Pico on-board LED).
    pub fn new(pin: P) -> Self {
        Self::with_polarity(pin, Polarity::ActiveHigh)
    }

    /// LED lit by driving the pin low.
    pub fn active_low(pin: P) -> Self {
        Self::with_polarity(pin, Polarity::ActiveLow)
    }

    /// Create the indicator and switch it off.
    pub fn with_polarity(pin: P, polarity: Polarity) -> Self {
        let mut led = Self {
            pin,
            polarity,
            lit: true,
        };
        led.off();
        led
    }

    pub fn on(&mut self) {
        self.set(true);
    }

    pub fn off(&mut self) {
        self.set(false);
    }

    pub fn toggle(&mut self) {
        self.set(!self.lit);
    }

    /// Light the LED when `lit` is true, otherwise switch it off.
    pub fn set(&mut self, lit: bool) {
        let high = match self.polarity {
            Polarity::ActiveHigh => lit,
            Polarity::ActiveLow => !lit,
        };
        let _ = if high {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        };
        self.lit = lit;
    }

    #[inline]
    #[must_use]
    pub fn is_lit(&self) -> bool {
        self.lit
    }

    /// Release the underlying pin.
    pub fn into_inner(self) -> P {
        self.pin
    }
}

#[cfg(test)]
pub(crate) mod mock {
    use core::convert::Infallible;
    use embedded_hal::digital::{ErrorType, OutputPin};

    /// Output pin that remembers its level and counts writes.
    #[derive(Default)]
    pub struct MockLed {
        pub high: bool,
        pub writes: usize,
    }

    impl ErrorType for MockLed {
        type Error = Infallible;
    }

    impl OutputPin for MockLed {
        fn set_low(&mut self) -> Result<(), Self::Error> {
            self.high = false;
            self.writes += 1;
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Self::Error> {
            self.high = true;
            self.writes += 1;
            Ok(())
        }
    }
}

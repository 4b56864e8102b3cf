//! Device context: the state owned by the firmware from boot onwards.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::indicator::Indicator;
use crate::order::ButtonOrderMap;
use crate::pins::PinBank;
use crate::report::{build_and_indicate, JoystickReport};
use crate::storage::{load_or_identity, save, MapStorage};
use crate::trainer::{entry_requested, RemapTrainer};

/// Execution mode of the device.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    /// Blocking remap session; no reports are produced.
    Training,
    /// Non-blocking report polling.
    SteadyState,
}

/// Button order map plus the current phase.
///
/// Constructed once at boot with [`DeviceContext::boot`]. The map is only
/// written by [`DeviceContext::train`] and read by every report afterwards.
pub struct DeviceContext {
    order: ButtonOrderMap,
    phase: Phase,
}

impl DeviceContext {
    /// Decide the boot phase from the held inputs.
    ///
    /// With the remap combination held the context starts in
    /// [`Phase::Training`]; otherwise the stored map is loaded (identity if
    /// absent) and the context is ready for reports.
    pub fn boot<B, S>(pins: &B, storage: &mut S) -> Self
    where
        B: PinBank,
        S: MapStorage,
    {
        if entry_requested(pins) {
            info!("Remap combination held at boot");
            Self {
                order: ButtonOrderMap::identity(),
                phase: Phase::Training,
            }
        } else {
            Self::steady(load_or_identity(storage))
        }
    }

    /// A context already in steady state with `order`.
    #[must_use]
    pub const fn steady(order: ButtonOrderMap) -> Self {
        Self {
            order,
            phase: Phase::SteadyState,
        }
    }

    #[inline]
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[inline]
    #[must_use]
    pub fn order(&self) -> &ButtonOrderMap {
        &self.order
    }

    /// Run the remap session to completion and persist the result.
    ///
    /// Blocks for the whole session. Does nothing outside
    /// [`Phase::Training`]. A failed save is logged and the trained map is
    /// still used.
    pub fn train<B, P, D, S>(
        &mut self,
        pins: &B,
        led: &mut Indicator<P>,
        delay: &mut D,
        storage: &mut S,
    ) where
        B: PinBank,
        P: OutputPin,
        D: DelayNs,
        S: MapStorage,
    {
        if self.phase != Phase::Training {
            return;
        }

        let order = RemapTrainer::new().run(pins, led, delay);
        led.off();
        if let Err(e) = save(storage, &order) {
            error!("Failed to store button order: {:?}", e);
        }

        self.order = order;
        self.phase = Phase::SteadyState;
        info!("Entering steady state");
    }

    /// Build the report for this poll and update the activity LED.
    ///
    /// Returns a neutral report while still in [`Phase::Training`].
    pub fn build_report<B, P>(&self, pins: &B, led: &mut Indicator<P>) -> JoystickReport
    where
        B: PinBank,
        P: OutputPin,
    {
        match self.phase {
            Phase::SteadyState => build_and_indicate(pins, &self.order, led),
            Phase::Training => JoystickReport::neutral(),
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::indicator::mock::MockLed;
    use crate::pins::mock::MockPins;
    use crate::pins::PortGroup;
    use crate::storage::{load, MemoryStorage, StorageError, MAP_BLOCK_LEN};
    use crate::table::{INPUT_TABLE, NUM_BUTTONS};
    use core::cell::Cell;
    use std::rc::Rc;

    struct NoDelay;

    impl DelayNs for NoDelay {
        fn delay_ns(&mut self, _ns: u32) {}
    }

    #[test]
    fn test_boot_first_time_uses_identity() {
        let pins = MockPins::released();
        let mut storage = MemoryStorage::new();
        let device = DeviceContext::boot(&pins, &mut storage);
        assert_eq!(device.phase(), Phase::SteadyState);
        assert_eq!(device.order(), &ButtonOrderMap::identity());
    }

    #[test]
    fn test_boot_loads_stored_map() {
        let block = [1, 0, 2, 3, 4, 5, 6, 7, 8, 9];
        let pins = MockPins::pressed(&[8]);
        let mut storage = MemoryStorage::with_block(block);
        let device = DeviceContext::boot(&pins, &mut storage);
        assert_eq!(device.phase(), Phase::SteadyState);
        assert_eq!(device.order().as_raw(), &block);
    }

    #[test]
    fn test_boot_with_combination_enters_training() {
        let pins = MockPins::pressed(&[8, 9]);
        let mut storage = MemoryStorage::with_block([0; MAP_BLOCK_LEN]);
        let device = DeviceContext::boot(&pins, &mut storage);
        assert_eq!(device.phase(), Phase::Training);
    }

    #[test]
    fn test_training_context_reports_neutral() {
        let pins = MockPins::pressed(&[8, 9, 0]);
        let mut storage = MemoryStorage::new();
        let mut led = Indicator::new(MockLed::default());
        let device = DeviceContext::boot(&pins, &mut storage);
        assert_eq!(device.build_report(&pins, &mut led), JoystickReport::neutral());
        assert!(!led.is_lit());
    }

    #[test]
    fn test_train_is_noop_in_steady_state() {
        let pins = MockPins::released();
        let mut storage = MemoryStorage::new();
        let mut led = Indicator::new(MockLed::default());
        let mut device = DeviceContext::steady(ButtonOrderMap::identity());
        device.train(&pins, &mut led, &mut NoDelay, &mut storage);
        assert_eq!(device.phase(), Phase::SteadyState);
        assert_eq!(storage.writes(), 0);
    }

    /// Presses the input for the slot being trained, one per confirmation.
    struct StepPins {
        now_ms: Rc<Cell<u32>>,
    }

    impl PinBank for StepPins {
        fn levels(&self, group: PortGroup) -> u32 {
            // Hold input (9 - n) during the n-th 5 s window.
            let window = (self.now_ms.get() / 5000) as usize;
            match group {
                PortGroup::Bank0 if window < NUM_BUTTONS => {
                    !INPUT_TABLE[NUM_BUTTONS - 1 - window].mask
                }
                _ => u32::MAX,
            }
        }
    }

    struct ClockDelay {
        now_ms: Rc<Cell<u32>>,
    }

    impl DelayNs for ClockDelay {
        fn delay_ns(&mut self, ns: u32) {
            self.now_ms.set(self.now_ms.get() + ns / 1_000_000);
        }

        fn delay_ms(&mut self, ms: u32) {
            self.now_ms.set(self.now_ms.get() + ms);
        }
    }

    #[test]
    fn test_train_persists_and_switches_phase() {
        let now_ms = Rc::new(Cell::new(0));
        let pins = StepPins {
            now_ms: now_ms.clone(),
        };
        let mut delay = ClockDelay { now_ms };
        let mut storage = MemoryStorage::new();
        let mut led = Indicator::new(MockLed::default());

        let mut device = DeviceContext {
            order: ButtonOrderMap::identity(),
            phase: Phase::Training,
        };
        device.train(&pins, &mut led, &mut delay, &mut storage);

        let expected = ButtonOrderMap::from_raw([9, 8, 7, 6, 5, 4, 3, 2, 1, 0]);
        assert_eq!(device.phase(), Phase::SteadyState);
        assert_eq!(device.order(), &expected);
        assert!(device.order().is_injective());
        assert_eq!(load(&mut storage), Ok(expected));

        // Reports now use the trained order: physical 0 drives button 10.
        let pressed = MockPins::pressed(&[0]);
        let report = device.build_report(&pressed, &mut led);
        assert_eq!(report.buttons_low, 0);
        assert_eq!(report.buttons_high, 0b10);
        assert!(led.is_lit());
    }

    #[test]
    fn test_failed_save_keeps_trained_map() {
        struct ReadOnly;

        impl MapStorage for ReadOnly {
            fn read(&mut self, _buf: &mut [u8; MAP_BLOCK_LEN]) -> Result<(), StorageError> {
                Err(StorageError::NotFound)
            }

            fn write(&mut self, _data: &[u8; MAP_BLOCK_LEN]) -> Result<(), StorageError> {
                Err(StorageError::Io)
            }
        }

        let now_ms = Rc::new(Cell::new(0));
        let pins = StepPins {
            now_ms: now_ms.clone(),
        };
        let mut delay = ClockDelay { now_ms };
        let mut led = Indicator::new(MockLed::default());
        let mut device = DeviceContext {
            order: ButtonOrderMap::identity(),
            phase: Phase::Training,
        };
        device.train(&pins, &mut led, &mut delay, &mut ReadOnly);

        assert_eq!(device.phase(), Phase::SteadyState);
        assert_eq!(device.order().binding(0), Some(9));
    }
}

//! ReportBridge: steady-state polling from pins to an output sink.

use embedded_hal::digital::OutputPin;

use crate::device::DeviceContext;
use crate::indicator::Indicator;
use crate::output::{OutputError, OutputSink};
use crate::pins::PinBank;
use crate::report::JoystickReport;

/// Builds a report on every poll and forwards it to an output sink.
///
/// Owns everything the steady-state loop touches, so the firmware only has
/// to move it into a task and call [`run`](ReportBridge::run).
///
/// # Error Handling
///
/// Output errors are logged and the next poll simply tries again. Polls
/// made while the sink is not ready send nothing and leave the LED alone.
pub struct ReportBridge<B, P, O> {
    device: DeviceContext,
    pins: B,
    led: Indicator<P>,
    output: O,
}

impl<B: PinBank, P: OutputPin, O: OutputSink> ReportBridge<B, P, O> {
    /// Create a new bridge from the booted device context and its I/O.
    pub fn new(device: DeviceContext, pins: B, led: Indicator<P>, output: O) -> Self {
        Self {
            device,
            pins,
            led,
            output,
        }
    }

    /// Poll forever.
    ///
    /// This method never returns under normal operation.
    pub async fn run(&mut self) -> ! {
        loop {
            let _ = self.process_one().await;
        }
    }

    /// Build one report and send it.
    ///
    /// Returns the sent report for testing purposes, or
    /// [`OutputError::NotReady`] without building one while the sink cannot
    /// accept data.
    pub async fn process_one(&mut self) -> Result<JoystickReport, OutputError> {
        if !self.output.is_ready() {
            return Err(OutputError::NotReady);
        }
        let report = self.device.build_report(&self.pins, &mut self.led);
        trace!("Report: {:?}", report);
        match self.output.send(&report).await {
            Ok(()) => Ok(report),
            Err(e) => {
                error!("Output error: {:?}", e);
                Err(e)
            }
        }
    }

    /// Get a reference to the device context.
    pub fn device(&self) -> &DeviceContext {
        &self.device
    }

    /// Get a reference to the pin bank.
    pub fn pins(&self) -> &B {
        &self.pins
    }

    /// Get a reference to the indicator LED.
    pub fn led(&self) -> &Indicator<P> {
        &self.led
    }

    /// Get a reference to the output sink.
    pub fn output(&self) -> &O {
        &self.output
    }

    /// Get a mutable reference to the output sink.
    pub fn output_mut(&mut self) -> &mut O {
        &mut self.output
    }

    /// Decompose the bridge into its parts.
    pub fn into_parts(self) -> (DeviceContext, B, Indicator<P>, O) {
        (self.device, self.pins, self.led, self.output)
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::indicator::mock::MockLed;
    use crate::order::ButtonOrderMap;
    use crate::pins::mock::MockPins;
    use crate::table::AXIS_RIGHT;
    use core::future::Future;
    use core::pin::Pin;
    use core::task::{Context, Poll, RawWaker, RawWakerVTable, Waker};
    use std::vec::Vec;

    // Simple mock output sink
    struct MockOutput {
        sent: Vec<[u8; JoystickReport::SIZE]>,
        fail: bool,
        ready: bool,
    }

    impl MockOutput {
        fn new() -> Self {
            Self {
                sent: Vec::new(),
                fail: false,
                ready: true,
            }
        }
    }

    impl OutputSink for MockOutput {
        fn send(&mut self, report: &JoystickReport) -> impl Future<Output = Result<(), OutputError>> {
            let result = if self.fail {
                Err(OutputError::Io)
            } else {
                self.sent.push(report.as_bytes());
                Ok(())
            };
            core::future::ready(result)
        }

        fn is_ready(&self) -> bool {
            self.ready
        }
    }

    // Helper to run a future to completion (simple blocking executor)
    fn block_on<F: Future>(mut f: F) -> F::Output {
        fn noop_raw_waker() -> RawWaker {
            fn noop(_: *const ()) {}
            fn clone(_: *const ()) -> RawWaker {
                noop_raw_waker()
            }
            static VTABLE: RawWakerVTable = RawWakerVTable::new(clone, noop, noop, noop);
            RawWaker::new(core::ptr::null(), &VTABLE)
        }

        let waker = unsafe { Waker::from_raw(noop_raw_waker()) };
        let mut cx = Context::from_waker(&waker);

        // SAFETY: We don't move f after pinning
        let mut f = unsafe { Pin::new_unchecked(&mut f) };

        match f.as_mut().poll(&mut cx) {
            Poll::Ready(result) => result,
            Poll::Pending => panic!("Mock future returned Pending unexpectedly"),
        }
    }

    fn bridge(pins: MockPins) -> ReportBridge<MockPins, MockLed, MockOutput> {
        ReportBridge::new(
            DeviceContext::steady(ButtonOrderMap::identity()),
            pins,
            Indicator::new(MockLed::default()),
            MockOutput::new(),
        )
    }

    #[test]
    fn test_bridge_sends_report() {
        let mut bridge = bridge(MockPins::pressed(&[0, AXIS_RIGHT]));

        let report = block_on(bridge.process_one()).unwrap();
        assert_eq!(report.as_bytes(), [0b1, 0, 255, 128]);
        assert_eq!(bridge.output().sent, [[0b1, 0, 255, 128]]);
        assert!(bridge.led().is_lit());
    }

    #[test]
    fn test_bridge_always_sends_unchanged_reports() {
        let mut bridge = bridge(MockPins::released());

        block_on(bridge.process_one()).unwrap();
        block_on(bridge.process_one()).unwrap();
        let sent = &bridge.output().sent;
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0], sent[1]);
        assert_eq!(sent[0], [0, 0, 128, 128]);
        assert!(!bridge.led().is_lit());
    }

    #[test]
    fn test_bridge_reports_output_error() {
        let mut bridge = bridge(MockPins::pressed(&[3]));
        bridge.output_mut().fail = true;

        let result = block_on(bridge.process_one());
        assert_eq!(result, Err(OutputError::Io));
        assert!(bridge.output().sent.is_empty());
    }

    #[test]
    fn test_bridge_waits_for_ready_output() {
        let mut bridge = bridge(MockPins::pressed(&[0]));
        bridge.output_mut().ready = false;

        let result = block_on(bridge.process_one());
        assert_eq!(result, Err(OutputError::NotReady));
        assert!(bridge.output().sent.is_empty());
        assert!(!bridge.led().is_lit());

        bridge.output_mut().ready = true;
        let report = block_on(bridge.process_one()).unwrap();
        assert_eq!(report.buttons_low, 0b1);
        assert_eq!(bridge.output().sent.len(), 1);
    }

    #[test]
    fn test_bridge_follows_pin_changes() {
        let mut bridge = bridge(MockPins::released());
        block_on(bridge.process_one()).unwrap();

        bridge.pins().press(9);
        let report = block_on(bridge.process_one()).unwrap();
        assert_eq!(report.buttons_high, 0b10);
        assert!(bridge.led().is_lit());

        bridge.pins().release_all();
        let report = block_on(bridge.process_one()).unwrap();
        assert_eq!(report, JoystickReport::neutral());

        let (device, _, led, output) = bridge.into_parts();
        assert_eq!(device.order(), &ButtonOrderMap::identity());
        assert!(!led.is_lit());
        assert_eq!(output.sent.len(), 3);
    }
}

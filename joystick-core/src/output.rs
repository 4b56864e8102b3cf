//! Output sink trait and error types.

use core::future::Future;

use crate::report::JoystickReport;

/// Error type for output operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OutputError {
    /// USB/communication I/O error.
    Io,
    /// Device not ready (e.g., USB not enumerated).
    NotReady,
}

/// Async trait for joystick report sinks.
///
/// This is the "give me the next report to send" side of the USB stack:
/// `send` completes once the report has been handed over, typically when
/// the host polls the interrupt endpoint.
///
/// # `no_std` Compatibility
///
/// All implementations must be `#![no_std]` compatible with no heap allocation.
pub trait OutputSink {
    /// Send a report to the host.
    fn send(&mut self, report: &JoystickReport) -> impl Future<Output = Result<(), OutputError>>;

    /// Check if the output is ready to accept data.
    fn is_ready(&self) -> bool;
}

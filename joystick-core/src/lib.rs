//! Platform-agnostic input mapping for the PancadariaStick joystick.
//!
//! This crate holds everything between the raw pin levels and the 4-byte
//! HID report, without any chip-specific dependency. It runs on the device
//! (`no_std`, no heap) and on the host for testing.
//!
//! # Overview
//!
//! - [`pins`]: physical inputs and the [`PinBank`] trait (active-low reads)
//! - [`table`]: the fixed input table, buttons first, then the four axes
//! - [`order`]: [`ButtonOrderMap`], logical button to physical input
//! - [`trainer`]: [`RemapTrainer`], the boot-time remap session
//! - [`storage`]: load/save policy over a [`MapStorage`] block
//! - [`report`]: [`JoystickReport`] and the report builder
//! - [`indicator`]: the status LED
//! - [`device`]: [`DeviceContext`], owning the map and the phase flag
//! - [`output`]: output sink trait ([`OutputSink`])
//! - [`bridge`]: steady-state polling loop ([`ReportBridge`])
//!
//! # Boot sequence
//!
//! ```
//! use joystick_core::{DeviceContext, MemoryStorage, Phase, PinBank, PortGroup};
//!
//! struct AllReleased;
//!
//! impl PinBank for AllReleased {
//!     fn levels(&self, _group: PortGroup) -> u32 {
//!         u32::MAX
//!     }
//! }
//!
//! let mut storage = MemoryStorage::new();
//! let device = DeviceContext::boot(&AllReleased, &mut storage);
//! assert_eq!(device.phase(), Phase::SteadyState);
//! ```
//!
//! # Features
//!
//! - **`std`**: Enable standard library support (for host testing)
//! - **`defmt`**: defmt formatting and logging (for embedded use)
//! - **`log`**: logging through the `log` crate

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "std")]
extern crate std;

// This mod MUST go first, so that the others see its macros.
mod fmt;

pub mod bridge;
pub mod device;
pub mod indicator;
pub mod order;
pub mod output;
pub mod pins;
pub mod report;
pub mod storage;
pub mod table;
pub mod trainer;

// Re-export main types at crate root
pub use bridge::ReportBridge;
pub use device::{DeviceContext, Phase};
pub use indicator::{Indicator, Polarity};
pub use order::{ButtonOrderMap, UNASSIGNED};
pub use output::{OutputError, OutputSink};
pub use pins::{PhysicalInput, PinBank, PortGroup};
pub use report::{build_and_indicate, build_report, JoystickReport};
pub use storage::{load, load_or_identity, save, MapStorage, MemoryStorage, StorageError};
pub use table::{physical_for, INPUT_TABLE, NUM_BUTTONS, NUM_INPUT};
pub use trainer::{entry_requested, RemapTrainer, TrainerPhase, TrainerState};

//! Logical input table.
//!
//! Indices `0..NUM_BUTTONS` are the remappable buttons, the four entries
//! after them are the fixed directional inputs.
//!
//! | Index | Function   | GPIO |
//! |-------|------------|------|
//! | 0-9   | Button 1-10 | 0-9 |
//! | 10    | Axis up    | 10   |
//! | 11    | Axis down  | 11   |
//! | 12    | Axis left  | 12   |
//! | 13    | Axis right | 13   |

use crate::pins::{PhysicalInput, PortGroup};

/// Number of logical buttons reported to the host.
pub const NUM_BUTTONS: usize = 10;

/// Number of directional inputs following the buttons.
pub const NUM_AXIS_INPUTS: usize = 4;

/// Total number of physical inputs.
pub const NUM_INPUT: usize = NUM_BUTTONS + NUM_AXIS_INPUTS;

pub const AXIS_UP: usize = NUM_BUTTONS;
pub const AXIS_DOWN: usize = NUM_BUTTONS + 1;
pub const AXIS_LEFT: usize = NUM_BUTTONS + 2;
pub const AXIS_RIGHT: usize = NUM_BUTTONS + 3;

/// Physical wiring, indexed by raw input index.
pub const INPUT_TABLE: [PhysicalInput; NUM_INPUT] = [
    PhysicalInput::new(PortGroup::Bank0, 0),
    PhysicalInput::new(PortGroup::Bank0, 1),
    PhysicalInput::new(PortGroup::Bank0, 2),
    PhysicalInput::new(PortGroup::Bank0, 3),
    PhysicalInput::new(PortGroup::Bank0, 4),
    PhysicalInput::new(PortGroup::Bank0, 5),
    PhysicalInput::new(PortGroup::Bank0, 6),
    PhysicalInput::new(PortGroup::Bank0, 7),
    PhysicalInput::new(PortGroup::Bank0, 8),
    PhysicalInput::new(PortGroup::Bank0, 9),
    // Axes: up, down, left, right
    PhysicalInput::new(PortGroup::Bank0, 10),
    PhysicalInput::new(PortGroup::Bank0, 11),
    PhysicalInput::new(PortGroup::Bank0, 12),
    PhysicalInput::new(PortGroup::Bank0, 13),
];

/// Look up the physical input for a raw table index.
#[inline]
#[must_use]
pub fn physical_for(index: usize) -> Option<PhysicalInput> {
    INPUT_TABLE.get(index).copied()
}

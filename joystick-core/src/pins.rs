//! Pin abstraction: physical inputs and their electrical state.
//!
//! Every switch is wired between its pin and ground with a pull-up enabled,
//! so a pressed switch reads as a low level.

/// Addressable pin groups.
///
/// Each variant corresponds to one input register of the MCU. On the RP2040
/// these are the two SIO input registers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PortGroup {
    /// `GPIO_IN`: user GPIO 0-29.
    Bank0,
    /// `GPIO_HI_IN`: QSPI pins.
    Qspi,
}

/// A physical input: one bit of one port group.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PhysicalInput {
    pub group: PortGroup,
    pub mask: u32,
}

impl PhysicalInput {
    /// Input wired to `bit` of `group`.
    #[must_use]
    pub const fn new(group: PortGroup, bit: u8) -> Self {
        Self {
            group,
            mask: 1 << bit,
        }
    }
}

/// Read-only access to the pin groups.
///
/// Implementations sample the input register of a group; callers only ever
/// see the per-input [`is_asserted`](PinBank::is_asserted) result.
pub trait PinBank {
    /// Current level word of `group`, one bit per pin (1 = high).
    fn levels(&self, group: PortGroup) -> u32;

    /// Whether `input` is electrically low, i.e. its switch is closed.
    #[inline]
    fn is_asserted(&self, input: PhysicalInput) -> bool {
        self.levels(input.group) & input.mask == 0
    }
}

impl<T: PinBank + ?Sized> PinBank for &T {
    #[inline]
    fn levels(&self, group: PortGroup) -> u32 {
        (**self).levels(group)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    struct Levels(u32);

    impl PinBank for Levels {
        fn levels(&self, group: PortGroup) -> u32 {
            match group {
                PortGroup::Bank0 => self.0,
                PortGroup::Qspi => u32::MAX,
            }
        }
    }

    #[test]
    fn test_low_level_is_asserted() {
        let pins = Levels(!(1 << 5));
        assert!(pins.is_asserted(PhysicalInput::new(PortGroup::Bank0, 5)));
        assert!(!pins.is_asserted(PhysicalInput::new(PortGroup::Bank0, 4)));
    }

    #[test]
    fn test_groups_are_independent() {
        let pins = Levels(0);
        assert!(pins.is_asserted(PhysicalInput::new(PortGroup::Bank0, 3)));
        assert!(!pins.is_asserted(PhysicalInput::new(PortGroup::Qspi, 3)));
    }

    #[test]
    fn test_physical_input_mask() {
        assert_eq!(PhysicalInput::new(PortGroup::Bank0, 0).mask, 0b1);
        assert_eq!(PhysicalInput::new(PortGroup::Bank0, 13).mask, 1 << 13);
    }
}

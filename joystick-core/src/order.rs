//! Button order map: which physical input drives each logical button.

use crate::pins::PinBank;
use crate::table::{physical_for, NUM_BUTTONS};

/// Slot value meaning "no physical input bound yet".
pub const UNASSIGNED: u8 = 0xFF;

/// Logical-slot to physical-input permutation.
///
/// `order[i]` is the raw input index bound to logical button `i`. Outside
/// of training every slot is bound and no two slots share an input.
///
/// # Example
///
/// ```
/// use joystick_core::ButtonOrderMap;
///
/// let mut map = ButtonOrderMap::identity();
/// map.set_binding(0, 4);
/// assert_eq!(map.binding(0), Some(4));
/// assert!(map.is_bound_before(4, 1));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonOrderMap {
    order: [u8; NUM_BUTTONS],
}

impl ButtonOrderMap {
    /// The identity permutation, `order[i] = i`.
    #[must_use]
    pub const fn identity() -> Self {
        let mut order = [0u8; NUM_BUTTONS];
        let mut i = 0;
        while i < NUM_BUTTONS {
            order[i] = i as u8;
            i += 1;
        }
        Self { order }
    }

    /// A map with every slot unassigned (start of training).
    #[must_use]
    pub const fn unassigned() -> Self {
        Self {
            order: [UNASSIGNED; NUM_BUTTONS],
        }
    }

    /// Build a map from raw slot values without validation.
    #[must_use]
    pub const fn from_raw(order: [u8; NUM_BUTTONS]) -> Self {
        Self { order }
    }

    /// Raw slot values, one byte per slot.
    #[inline]
    #[must_use]
    pub const fn as_raw(&self) -> &[u8; NUM_BUTTONS] {
        &self.order
    }

    /// Restore the identity permutation.
    pub fn reset(&mut self) {
        *self = Self::identity();
    }

    /// Bind logical `slot` to physical input `physical`.
    ///
    /// Uniqueness is the caller's responsibility. Out-of-range slots are
    /// ignored.
    pub fn set_binding(&mut self, slot: usize, physical: u8) {
        if let Some(entry) = self.order.get_mut(slot) {
            *entry = physical;
        }
    }

    /// Physical input bound to `slot`, if any.
    #[inline]
    #[must_use]
    pub fn binding(&self, slot: usize) -> Option<u8> {
        self.order
            .get(slot)
            .copied()
            .filter(|&physical| physical != UNASSIGNED)
    }

    /// Whether logical button `slot` is currently pressed.
    ///
    /// Unassigned or out-of-range slots read as released.
    #[inline]
    #[must_use]
    pub fn is_pressed<B: PinBank>(&self, pins: &B, slot: usize) -> bool {
        self.binding(slot)
            .and_then(|physical| physical_for(physical as usize))
            .is_some_and(|input| pins.is_asserted(input))
    }

    /// Whether `physical` is already bound to a slot before `slot`.
    #[must_use]
    pub fn is_bound_before(&self, physical: u8, slot: usize) -> bool {
        self.order
            .iter()
            .take(slot.min(NUM_BUTTONS))
            .any(|&bound| bound != UNASSIGNED && bound == physical)
    }

    /// No two bound slots share a physical input.
    #[must_use]
    pub fn is_injective(&self) -> bool {
        (0..NUM_BUTTONS).all(|slot| match self.binding(slot) {
            Some(physical) => !self.is_bound_before(physical, slot),
            None => true,
        })
    }
}

impl Default for ButtonOrderMap {
    fn default() -> Self {
        Self::identity()
    }
}

//! Boot-time remap trainer.
//!
//! Holding the two highest buttons (physical inputs 8 and 9) at power-on
//! enters remap mode. The LED blinks to announce it, then each logical
//! button in turn is bound to the first physical input held continuously
//! for [`HOLD_THRESHOLD`] samples:
//!
//! - while a valid candidate is held the LED stays on;
//! - while scanning the LED blinks;
//! - on confirmation the LED goes off for [`CONFIRM_PAUSE_MS`], after the
//!   full `HOLD_THRESHOLD * SCAN_INTERVAL_MS` hold.
//!
//! Inputs already bound to an earlier slot are skipped. There is no
//! time-out: training only ends when every slot is bound.
//!
//! The trainer is a plain state machine; [`RemapTrainer::step`] performs one
//! sample and returns how long to wait before the next one, and
//! [`RemapTrainer::run`] drives it with a blocking delay.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::indicator::Indicator;
use crate::order::ButtonOrderMap;
use crate::pins::PinBank;
use crate::table::{physical_for, INPUT_TABLE, NUM_BUTTONS, NUM_INPUT};

/// Raw inputs that must both be held at boot to enter remap mode.
pub const ENTRY_INPUTS: [usize; 2] = [NUM_BUTTONS - 2, NUM_BUTTONS - 1];

/// LED toggles announcing remap mode.
pub const ANNOUNCE_TOGGLES: u8 = 20;

/// Interval between announce toggles.
pub const ANNOUNCE_INTERVAL_MS: u32 = 100;

/// Interval between scan samples.
pub const SCAN_INTERVAL_MS: u32 = 50;

/// Consecutive samples a candidate must be held to be confirmed (~1 s).
pub const HOLD_THRESHOLD: u8 = 20;

/// LED-off pause after a slot is confirmed.
pub const CONFIRM_PAUSE_MS: u32 = 1000;

/// Whether the remap entry combination is held right now.
#[must_use]
pub fn entry_requested<B: PinBank>(pins: &B) -> bool {
    ENTRY_INPUTS.iter().all(|&index| {
        physical_for(index).is_some_and(|input| pins.is_asserted(input))
    })
}

/// Trainer phases.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TrainerPhase {
    /// Not started.
    Idle,
    /// Announcing remap mode; toggles still to perform.
    Blinking { remaining: u8 },
    /// Sampling candidates for the target slot.
    Scanning,
    /// Candidate confirmed, binding after the pause.
    Confirmed,
    /// Every slot bound.
    Done,
}

/// Progress of a training session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TrainerState {
    pub phase: TrainerPhase,
    /// Logical slot being assigned.
    pub target_slot: usize,
    /// Raw input index currently sampled.
    pub candidate: usize,
    /// Consecutive samples the candidate has been held.
    pub hold: u8,
}

impl TrainerState {
    const fn idle() -> Self {
        Self {
            phase: TrainerPhase::Idle,
            target_slot: 0,
            candidate: 0,
            hold: 0,
        }
    }
}

/// Interactive reassignment of all logical buttons.
pub struct RemapTrainer {
    state: TrainerState,
    order: ButtonOrderMap,
}

impl RemapTrainer {
    /// A trainer in [`TrainerPhase::Idle`] with every slot unassigned.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: TrainerState::idle(),
            order: ButtonOrderMap::unassigned(),
        }
    }

    #[inline]
    #[must_use]
    pub fn state(&self) -> &TrainerState {
        &self.state
    }

    /// The map built so far. Slots not yet reached are unassigned.
    #[inline]
    #[must_use]
    pub fn order(&self) -> &ButtonOrderMap {
        &self.order
    }

    #[inline]
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.state.phase == TrainerPhase::Done
    }

    /// Advance the state machine by one step.
    ///
    /// Returns the delay in milliseconds to wait before the next step.
    pub fn step<B, P>(&mut self, pins: &B, led: &mut Indicator<P>) -> u32
    where
        B: PinBank,
        P: OutputPin,
    {
        match self.state.phase {
            TrainerPhase::Idle => {
                info!("Entering remap mode");
                self.state.phase = TrainerPhase::Blinking {
                    remaining: ANNOUNCE_TOGGLES,
                };
                0
            }
            TrainerPhase::Blinking { remaining } => {
                led.toggle();
                let remaining = remaining.saturating_sub(1);
                if remaining == 0 {
                    self.start_slot(0);
                    self.state.phase = TrainerPhase::Scanning;
                } else {
                    self.state.phase = TrainerPhase::Blinking { remaining };
                }
                ANNOUNCE_INTERVAL_MS
            }
            TrainerPhase::Scanning => self.sample(pins, led),
            TrainerPhase::Confirmed => {
                let slot = self.state.target_slot;
                let physical = self.state.candidate as u8;
                self.order.set_binding(slot, physical);
                info!("Button {} bound to input {}", slot + 1, physical);

                if slot + 1 >= NUM_BUTTONS {
                    led.off();
                    self.state.phase = TrainerPhase::Done;
                    info!("Remap complete: {:?}", self.order.as_raw());
                } else {
                    self.start_slot(slot + 1);
                    self.state.phase = TrainerPhase::Scanning;
                }
                0
            }
            TrainerPhase::Done => 0,
        }
    }

    /// Run the whole session, blocking on `delay` between steps.
    ///
    /// Returns the completed map. Never returns if the user does not bind
    /// every slot.
    pub fn run<B, P, D>(mut self, pins: &B, led: &mut Indicator<P>, delay: &mut D) -> ButtonOrderMap
    where
        B: PinBank,
        P: OutputPin,
        D: DelayNs,
    {
        while !self.is_done() {
            let wait_ms = self.step(pins, led);
            if wait_ms > 0 {
                delay.delay_ms(wait_ms);
            }
        }
        self.order
    }

    fn start_slot(&mut self, slot: usize) {
        debug!("Scanning for button {}", slot + 1);
        self.state.target_slot = slot;
        self.state.candidate = 0;
        self.state.hold = 0;
    }

    fn sample<B, P>(&mut self, pins: &B, led: &mut Indicator<P>) -> u32
    where
        B: PinBank,
        P: OutputPin,
    {
        let candidate = self.state.candidate;
        let valid = pins.is_asserted(INPUT_TABLE[candidate])
            && !self
                .order
                .is_bound_before(candidate as u8, self.state.target_slot);

        if valid {
            self.state.hold += 1;
            if self.state.hold >= HOLD_THRESHOLD {
                led.off();
                self.state.phase = TrainerPhase::Confirmed;
                // The confirming sample still covers its own scan interval.
                return SCAN_INTERVAL_MS + CONFIRM_PAUSE_MS;
            }
            led.on();
        } else {
            led.toggle();
            // A released candidate restarts the scan so bouncing
            // low-numbered inputs are looked at first.
            self.state.candidate = if self.state.hold > 0 {
                0
            } else {
                (candidate + 1) % NUM_INPUT
            };
            self.state.hold = 0;
        }
        SCAN_INTERVAL_MS
    }
}

impl Default for RemapTrainer {
    fn default() -> Self {
        Self::new()
    }
}

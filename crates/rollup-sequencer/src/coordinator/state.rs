//! Coordinator state machine and the interrupt flag shared with its [`super::CoordinatorHandle`].

use std::sync::{
    atomic::{AtomicBool, AtomicU8, Ordering},
    Arc,
};

use rollup_types::CoordinatorError;

/// Where the coordinator is within a single tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CoordinatorPhase {
    Building = 0,
    Publishing = 1,
    Interrupted = 2,
}

impl CoordinatorPhase {
    fn from_u8(v: u8) -> Self {
        match v {
            1 => Self::Publishing,
            2 => Self::Interrupted,
            _ => Self::Building,
        }
    }
}

/// Cooperative cancellation flag and current phase, shared between the running tick and its
/// [`super::CoordinatorHandle`] so `interrupt()` can be called from outside the tick.
#[derive(Debug)]
pub(crate) struct InterruptFlag {
    requested: AtomicBool,
    should_throw: AtomicBool,
    phase: AtomicU8,
}

impl Default for InterruptFlag {
    fn default() -> Self {
        Self {
            requested: AtomicBool::new(false),
            should_throw: AtomicBool::new(false),
            phase: AtomicU8::new(CoordinatorPhase::Building as u8),
        }
    }
}

impl InterruptFlag {
    pub fn phase(&self) -> CoordinatorPhase {
        CoordinatorPhase::from_u8(self.phase.load(Ordering::SeqCst))
    }

    pub fn set_phase(&self, phase: CoordinatorPhase) {
        self.phase.store(phase as u8, Ordering::SeqCst);
    }

    /// Request cancellation. A no-op once past the publishing checkpoint; if
    /// `should_throw` and the coordinator isn't `Building`, the call itself raises rather than
    /// silently queuing the request.
    pub fn request(&self, should_throw: bool) -> Result<(), CoordinatorError> {
        match self.phase() {
            CoordinatorPhase::Building => {
                self.requested.store(true, Ordering::SeqCst);
                if should_throw {
                    self.should_throw.store(true, Ordering::SeqCst);
                }
                Ok(())
            }
            CoordinatorPhase::Publishing | CoordinatorPhase::Interrupted if should_throw => {
                Err(CoordinatorError::invariant_violated(
                    "interrupt(should_throw=true) requested outside BUILDING",
                ))
            }
            CoordinatorPhase::Publishing | CoordinatorPhase::Interrupted => Ok(()),
        }
    }

    pub fn is_requested(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }

    pub fn reset(&self) {
        self.requested.store(false, Ordering::SeqCst);
        self.should_throw.store(false, Ordering::SeqCst);
        self.set_phase(CoordinatorPhase::Building);
    }

    /// Raise [`CoordinatorError::Interrupted`] if a cancellation was requested; this is what a
    /// checkpoint calls.
    pub fn checkpoint(&self) -> Result<(), CoordinatorError> {
        if self.is_requested() {
            self.set_phase(CoordinatorPhase::Interrupted);
            Err(CoordinatorError::Interrupted)
        } else {
            Ok(())
        }
    }
}

/// Mutable coordinator state, carried across ticks.
pub struct CoordinatorState {
    pub(crate) next_rollup_id: u64,
    pub(crate) interrupt: Arc<InterruptFlag>,
}

impl CoordinatorState {
    /// Construct fresh state, seeding the rollup id counter from wherever [`rollup_types::RollupDb`]
    /// persisted it, so ids stay monotonic across restarts.
    pub fn new(next_rollup_id: u64) -> Self {
        Self {
            next_rollup_id,
            interrupt: Arc::new(InterruptFlag::default()),
        }
    }

    pub fn phase(&self) -> CoordinatorPhase {
        self.interrupt.phase()
    }

    pub fn next_rollup_id(&self) -> u64 {
        self.next_rollup_id
    }

    /// Advances the rollup id counter after a successful publish.
    pub fn advance_rollup_id(&mut self) {
        self.next_rollup_id += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checkpoint_passes_until_interrupt_is_requested() {
        let flag = InterruptFlag::default();
        assert!(flag.checkpoint().is_ok());
        flag.request(false).unwrap();
        assert!(matches!(flag.checkpoint(), Err(CoordinatorError::Interrupted)));
        assert_eq!(flag.phase(), CoordinatorPhase::Interrupted);
    }

    #[test]
    fn interrupt_past_publishing_checkpoint_is_a_no_op_unless_should_throw() {
        let flag = InterruptFlag::default();
        flag.set_phase(CoordinatorPhase::Publishing);
        assert!(flag.request(false).is_ok());
        assert!(!flag.is_requested());
        assert!(flag.request(true).is_err());
    }

    #[test]
    fn reset_clears_requested_and_returns_to_building() {
        let flag = InterruptFlag::default();
        flag.request(true).unwrap();
        flag.reset();
        assert!(!flag.is_requested());
        assert_eq!(flag.phase(), CoordinatorPhase::Building);
    }
}

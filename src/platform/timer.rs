/*!
 * Timeslice-Timer Collaborator
 * One-shot preemption timer re-armed by the scheduler after every dispatch
 */

use crate::core::types::Ticks;
use std::sync::atomic::{AtomicU32, Ordering};

/// Preemption timer supplied by the timer/interrupt layer
///
/// The scheduler arms it for the dispatched task's timeslice; when it fires,
/// the timer layer invokes `Scheduler::tick`.
pub trait PreemptionTimer: Send + Sync {
    /// Request the next preemption interrupt after `ticks` timer ticks
    fn arm(&self, ticks: Ticks);
}

/// Simulated one-shot timer: stores the armed tick count where the ticker
/// loop (and tests) can read it
pub struct SliceTimer {
    armed: AtomicU32,
}

impl SliceTimer {
    pub fn new() -> Self {
        Self {
            armed: AtomicU32::new(1),
        }
    }

    /// The most recently armed tick count
    pub fn armed(&self) -> Ticks {
        self.armed.load(Ordering::Acquire)
    }
}

impl Default for SliceTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl PreemptionTimer for SliceTimer {
    fn arm(&self, ticks: Ticks) {
        self.armed.store(ticks.max(1), Ordering::Release);
    }
}

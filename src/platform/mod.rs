/*!
 * Platform Module
 * Hardware collaborator interfaces consumed by the scheduler, with
 * simulated implementations for tests and the demo binary
 */

pub mod context;
pub mod interrupts;
pub mod timer;

pub use context::{ContextHandle, ContextSwitch, SimContexts};
pub use interrupts::{CriticalSection, InterruptControl, InterruptState, SoftInterrupts};
pub use timer::{PreemptionTimer, SliceTimer};

use std::sync::Arc;

/// The bundle of hardware collaborators a scheduler is constructed against.
///
/// The scheduler never implements any of these itself: it only asks the
/// context layer for fresh slots and switches, the timer for the next
/// preemption tick, and the interrupt controller for critical sections.
#[derive(Clone)]
pub struct Platform {
    pub context: Arc<dyn ContextSwitch>,
    pub timer: Arc<dyn PreemptionTimer>,
    pub interrupts: Arc<dyn InterruptControl>,
}

impl Platform {
    pub fn new(
        context: Arc<dyn ContextSwitch>,
        timer: Arc<dyn PreemptionTimer>,
        interrupts: Arc<dyn InterruptControl>,
    ) -> Self {
        Self {
            context,
            timer,
            interrupts,
        }
    }

    /// Build a fully simulated platform and hand back the concrete pieces so
    /// callers can inspect recorded switches and armed timeslices.
    pub fn simulated() -> (Self, SimHandles) {
        let contexts = Arc::new(SimContexts::new());
        let timer = Arc::new(SliceTimer::new());
        let interrupts = Arc::new(SoftInterrupts::new());

        let platform = Self::new(contexts.clone(), timer.clone(), interrupts.clone());
        let handles = SimHandles {
            contexts,
            timer,
            interrupts,
        };
        (platform, handles)
    }
}

/// Concrete handles onto a simulated platform
#[derive(Clone)]
pub struct SimHandles {
    pub contexts: Arc<SimContexts>,
    pub timer: Arc<SliceTimer>,
    pub interrupts: Arc<SoftInterrupts>,
}

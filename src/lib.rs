/*!
 * Preemptive Multitasking Kernel Core
 * Multilevel round-robin task scheduling exposed as a library
 */

pub mod core;
pub mod platform;
pub mod sched;
pub mod wake;

// Re-exports
pub use crate::core::errors::{QueueError, TaskError};
pub use crate::core::types::{QueueResult, TaskId, TaskResult, Ticks, Timeslice};
pub use platform::{
    ContextHandle, ContextSwitch, CriticalSection, InterruptControl, Platform, PreemptionTimer,
    SimContexts, SimHandles, SliceTimer, SoftInterrupts,
};
pub use sched::{Scheduler, SchedulerConfig, SchedulerStats, TaskInfo, TaskState, TickerTask};
pub use wake::WakeQueue;

/*!
 * Multilevel Round-Robin Scheduler
 * Task pool, priority tiers, timer-driven preemption, and sleep/wake
 */

use crate::core::types::TaskId;
use crate::platform::Platform;
use log::info;
use parking_lot::Mutex;
use std::sync::Arc;

mod config;
mod level;
mod operations;
mod pool;
mod record;
mod stats;
mod ticker;

pub use config::SchedulerConfig;
pub use record::{TaskInfo, TaskState};
pub use stats::{AtomicSchedulerStats, SchedulerStats};
pub use ticker::{TickerCommand, TickerTask};

use level::RunLevel;
use pool::TaskPool;

/// Scheduler state shared by every handle, guarded by one lock.
///
/// Every read-modify-write of this struct happens inside a critical section:
/// interrupts masked via the platform's interrupt controller, mutual
/// exclusion via the lock, prior interrupt state restored on every exit
/// path. A nested timer or device interrupt can therefore never observe a
/// half-updated level list.
pub(crate) struct SchedCore {
    config: SchedulerConfig,
    pool: TaskPool,
    levels: Vec<RunLevel>,
    /// Tier currently being serviced
    current_level: usize,
    /// Membership changed since the last re-election of `current_level`
    level_dirty: bool,
    /// Task last handed the CPU; dispatching it again skips the hardware
    /// switch
    last_dispatched: Option<TaskId>,
    /// Permanently runnable task pinned at the lowest level
    idle_task: Option<TaskId>,
    bootstrapped: bool,
}

/// Multilevel priority round-robin scheduler
///
/// Owns the fixed task pool and all run levels; drives the hardware context
/// switch through the platform collaborators. Constructed once at kernel
/// start and cloned as a cheap handle wherever scheduling decisions are
/// made (foreground task code, timer tick, device wake paths).
#[derive(Clone)]
pub struct Scheduler {
    core: Arc<Mutex<SchedCore>>,
    platform: Platform,
    stats: Arc<AtomicSchedulerStats>,
}

impl Scheduler {
    /// Create a scheduler: builds the Free pool (reserving one context slot
    /// per record) and empty run levels.
    ///
    /// Configuration values are boot-time constants; an inconsistent config
    /// is a programming error, not a runtime condition.
    pub fn new(config: SchedulerConfig, platform: Platform) -> Self {
        assert!(config.levels >= 1, "at least one run level is required");
        assert!(
            config.boot_level < config.levels,
            "boot level {} out of range for {} levels",
            config.boot_level,
            config.levels
        );
        assert!(
            config.pool_capacity >= 2,
            "pool must hold at least the bootstrap and idle tasks"
        );

        let pool = TaskPool::new(
            config.pool_capacity,
            &*platform.context,
            config.default_timeslice,
        );
        let levels = (0..config.levels).map(|_| RunLevel::new()).collect();

        info!(
            "Scheduler initialized: {} levels, pool capacity {}, default timeslice {} ticks",
            config.levels,
            config.pool_capacity,
            config.default_timeslice.get()
        );

        Self {
            core: Arc::new(Mutex::new(SchedCore {
                config,
                pool,
                levels,
                current_level: config.idle_level(),
                level_dirty: false,
                last_dispatched: None,
                idle_task: None,
                bootstrapped: false,
            })),
            platform,
            stats: Arc::new(AtomicSchedulerStats::new()),
        }
    }

    /// Create a scheduler with the default configuration
    pub fn with_defaults(platform: Platform) -> Self {
        Self::new(SchedulerConfig::default(), platform)
    }

    /// The platform this scheduler drives
    pub fn platform(&self) -> &Platform {
        &self.platform
    }

    /// Get snapshot of current stats
    pub fn stats(&self) -> SchedulerStats {
        self.stats.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scheduler() -> Scheduler {
        let (platform, _) = Platform::simulated();
        Scheduler::new(SchedulerConfig::compact(4, 8), platform)
    }

    #[test]
    fn bootstrap_adopts_caller_and_schedules_idle() {
        let sched = scheduler();
        let boot = sched.bootstrap().unwrap();

        assert_eq!(sched.current(), Some(boot));
        assert_eq!(sched.task_info(boot).unwrap().state, TaskState::Running);

        let idle = sched.idle_task().unwrap();
        let info = sched.task_info(idle).unwrap();
        assert_eq!(info.state, TaskState::Running);
        assert_eq!(info.level, 3);
    }

    #[test]
    fn bootstrap_twice_is_rejected() {
        let sched = scheduler();
        sched.bootstrap().unwrap();
        assert_eq!(
            sched.bootstrap(),
            Err(crate::core::errors::TaskError::AlreadyBootstrapped)
        );
    }

    #[test]
    fn empty_scheduler_has_no_current_task() {
        let sched = scheduler();
        assert_eq!(sched.current(), None);
    }

    #[test]
    fn clone_shares_state() {
        let sched = scheduler();
        let boot = sched.bootstrap().unwrap();

        let handle = sched.clone();
        assert_eq!(handle.current(), Some(boot));
    }
}

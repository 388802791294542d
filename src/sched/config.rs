/*!
 * Scheduler Configuration
 * Boot-time constants for pool size, level count, and timeslices
 */

use crate::core::limits;
use crate::core::types::Timeslice;
use std::num::NonZeroU32;

/// Scheduler construction parameters
///
/// All values are fixed for the lifetime of the scheduler; there is no
/// runtime reconfiguration of the pool or the level count.
#[derive(Debug, Clone, Copy)]
pub struct SchedulerConfig {
    /// Number of priority tiers; the last one hosts the idle task
    pub levels: usize,
    /// Fixed maximum concurrent-task count
    pub pool_capacity: usize,
    /// Level the bootstrap task is scheduled at
    pub boot_level: usize,
    /// Timeslice assigned to freshly allocated tasks
    pub default_timeslice: Timeslice,
    /// Timeslice armed for the bootstrap task
    pub boot_timeslice: Timeslice,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            levels: limits::RUN_LEVELS,
            pool_capacity: limits::MAX_TASKS,
            boot_level: 0,
            default_timeslice: NonZeroU32::new(limits::DEFAULT_TIMESLICE_TICKS)
                .expect("default timeslice constant is nonzero"),
            boot_timeslice: NonZeroU32::new(limits::BOOT_TIMESLICE_TICKS)
                .expect("boot timeslice constant is nonzero"),
        }
    }
}

impl SchedulerConfig {
    /// Small configuration for tests and examples
    pub fn compact(levels: usize, pool_capacity: usize) -> Self {
        Self {
            levels,
            pool_capacity,
            ..Self::default()
        }
    }

    pub fn with_boot_level(mut self, level: usize) -> Self {
        self.boot_level = level;
        self
    }

    pub fn with_default_timeslice(mut self, timeslice: Timeslice) -> Self {
        self.default_timeslice = timeslice;
        self
    }

    /// Index of the idle level (lowest priority)
    pub fn idle_level(&self) -> usize {
        self.levels - 1
    }
}

/*!
 * Lock-Free Scheduler Statistics
 * Atomic counters for zero-contention stats tracking in hot scheduling paths
 */

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

/// Atomic scheduler statistics for lock-free updates
///
/// # Performance
/// - All operations use relaxed ordering; counters are monitoring data, not
///   synchronization
/// - Snapshot values may lag each other slightly under concurrent updates,
///   which is acceptable for observability
#[derive(Debug, Default)]
pub struct AtomicSchedulerStats {
    ticks: AtomicU64,
    context_switches: AtomicU64,
    preemptions: AtomicU64,
    sleeps: AtomicU64,
    wakeups: AtomicU64,
    active_tasks: AtomicUsize,
}

impl AtomicSchedulerStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Timer tick processed
    #[inline(always)]
    pub fn inc_ticks(&self) {
        self.ticks.fetch_add(1, Ordering::Relaxed);
    }

    /// Hardware context switch performed
    #[inline(always)]
    pub fn inc_context_switches(&self) {
        self.context_switches.fetch_add(1, Ordering::Relaxed);
    }

    /// Tick-driven dispatch replaced the running task
    #[inline(always)]
    pub fn inc_preemptions(&self) {
        self.preemptions.fetch_add(1, Ordering::Relaxed);
    }

    /// Task voluntarily left the Running state
    #[inline(always)]
    pub fn inc_sleeps(&self) {
        self.sleeps.fetch_add(1, Ordering::Relaxed);
    }

    /// Sleeping task promoted back to Running by a wake queue
    #[inline(always)]
    pub fn inc_wakeups(&self) {
        self.wakeups.fetch_add(1, Ordering::Relaxed);
    }

    /// Task entered a run level
    #[inline(always)]
    pub fn inc_active(&self) {
        self.active_tasks.fetch_add(1, Ordering::Relaxed);
    }

    /// Task left its run level
    #[inline(always)]
    pub fn dec_active(&self) {
        self.active_tasks.fetch_sub(1, Ordering::Relaxed);
    }

    /// Get snapshot of current stats
    #[inline]
    pub fn snapshot(&self) -> SchedulerStats {
        SchedulerStats {
            ticks: self.ticks.load(Ordering::Relaxed),
            context_switches: self.context_switches.load(Ordering::Relaxed),
            preemptions: self.preemptions.load(Ordering::Relaxed),
            sleeps: self.sleeps.load(Ordering::Relaxed),
            wakeups: self.wakeups.load(Ordering::Relaxed),
            active_tasks: self.active_tasks.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time scheduler statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SchedulerStats {
    pub ticks: u64,
    pub context_switches: u64,
    pub preemptions: u64,
    pub sleeps: u64,
    pub wakeups: u64,
    pub active_tasks: usize,
}

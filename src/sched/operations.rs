/*!
 * Scheduler Core Operations
 * Bootstrap, allocation, run/sleep transitions, and the timer tick
 */

use super::record::{TaskInfo, TaskState};
use super::{SchedCore, Scheduler};
use crate::core::errors::TaskError;
use crate::core::types::{TaskId, TaskResult, Timeslice};
use crate::platform::{ContextHandle, CriticalSection};
use log::{debug, info, trace};

/// Everything needed to hand the CPU to a task
struct Dispatch {
    task: TaskId,
    context: ContextHandle,
    timeslice: u32,
}

impl Scheduler {
    /// Bootstrap the scheduler: adopt the calling context as the first
    /// Running task at the configured boot level, create and schedule the
    /// permanently-runnable idle task at the lowest level, elect the current
    /// level, and arm the preemption timer.
    ///
    /// Returns the bootstrap task. May be called once per scheduler.
    pub fn bootstrap(&self) -> TaskResult<TaskId> {
        let _cs = CriticalSection::enter(&*self.platform.interrupts);
        let mut core = self.core.lock();

        if core.bootstrapped {
            return Err(TaskError::AlreadyBootstrapped);
        }

        // The boot task adopts the context this code is already running in;
        // its slot is filled by the context layer on the first switch away.
        let boot = core.pool.allocate()?;
        let boot_level = core.config.boot_level;
        let boot_timeslice = core.config.boot_timeslice;
        if let Some(record) = core.pool.get_mut(boot) {
            record.timeslice = boot_timeslice;
        }
        core.insert_into_level(boot, boot_level);
        self.stats.inc_active();

        let idle = core.pool.allocate()?;
        if let Some(record) = core.pool.get_mut(idle) {
            self.platform.context.reset_slot(record.context);
        }
        let idle_level = core.config.idle_level();
        core.insert_into_level(idle, idle_level);
        self.stats.inc_active();

        core.recompute_current_level();
        core.last_dispatched = Some(boot);
        core.idle_task = Some(idle);
        core.bootstrapped = true;

        self.platform.timer.arm(boot_timeslice.get());

        info!(
            "Scheduler bootstrapped: task {} running at level {}, idle task {} at level {}",
            boot, boot_level, idle, idle_level
        );
        Ok(boot)
    }

    /// Claim a Free pool slot and prepare it for scheduling: context slot
    /// reset to the clean entry state, default timeslice assigned.
    ///
    /// Exhausting the pool is fatal for the caller: the capacity is a fixed
    /// configuration constant and exceeding it is a programming error.
    pub fn allocate(&self) -> TaskResult<TaskId> {
        let _cs = CriticalSection::enter(&*self.platform.interrupts);
        let mut core = self.core.lock();

        let task = core.pool.allocate()?;
        let timeslice = core.config.default_timeslice;
        if let Some(record) = core.pool.get_mut(task) {
            record.timeslice = timeslice;
            self.platform.context.reset_slot(record.context);
        }

        info!("Task {} allocated", task);
        Ok(task)
    }

    /// Make `task` Running at `level`, or retarget/refresh an already
    /// Running task.
    ///
    /// `level: None` keeps the task's current level, `timeslice: None` keeps
    /// its current timeslice. Any call marks level membership dirty so the
    /// next tick re-elects the serviced level.
    pub fn run(
        &self,
        task: TaskId,
        level: Option<usize>,
        timeslice: Option<Timeslice>,
    ) -> TaskResult<()> {
        let _cs = CriticalSection::enter(&*self.platform.interrupts);
        let mut core = self.core.lock();
        self.run_locked(&mut core, task, level, timeslice)
    }

    /// Remove a Running task from its level and suspend it.
    ///
    /// Sleeping a task that is not Running is a no-op. When the currently
    /// scheduled task puts itself to sleep, the current level is re-elected
    /// and control transfers to the new current task; this call then only
    /// returns once the sleeper is rescheduled.
    pub fn sleep(&self, task: TaskId) -> TaskResult<()> {
        let _cs = CriticalSection::enter(&*self.platform.interrupts);
        let mut core = self.core.lock();

        let record = core.record(task).ok_or(TaskError::UnknownTask(task))?;
        if !record.is_running() {
            debug!("Sleep on non-running task {} ignored", task);
            return Ok(());
        }

        let was_current = core.current_task() == Some(task);
        core.remove_from_level(task);
        self.stats.dec_active();
        self.stats.inc_sleeps();
        info!("Task {} sleeping", task);

        if !was_current {
            return Ok(());
        }

        // The caller is giving up the CPU: re-elect and switch immediately.
        core.recompute_current_level();
        let Some(next) = core.dispatch_target() else {
            panic!("every run level empty after sleep; the idle task must always be runnable");
        };
        core.last_dispatched = Some(next.task);
        drop(core);

        self.stats.inc_context_switches();
        debug!("Sleep handoff -> task {}", next.task);
        self.platform.context.switch_to(next.context);
        Ok(())
    }

    /// Timer-tick entry point: strict round robin within the serviced
    /// level, then honor any pending re-election, re-arm the timer for the
    /// new current task, and switch unless that task was already running.
    ///
    /// Invoked by the timer collaborator only. Finding every level empty
    /// here means the idle task is gone, which has no recovery.
    pub fn tick(&self) {
        let _cs = CriticalSection::enter(&*self.platform.interrupts);
        let mut core = self.core.lock();

        self.stats.inc_ticks();
        let prev = core.last_dispatched;

        // Rotate before re-electing: the task whose slice just expired cedes
        // its turn even when it stays the only task present.
        let serviced = core.current_level;
        core.levels[serviced].advance();

        if core.level_dirty {
            core.recompute_current_level();
        }

        let Some(next) = core.dispatch_target() else {
            panic!("every run level empty on timer tick; the idle task must always be runnable");
        };
        core.last_dispatched = Some(next.task);
        drop(core);

        self.platform.timer.arm(next.timeslice);

        if prev == Some(next.task) {
            trace!("Tick: task {} continues", next.task);
            return;
        }

        self.stats.inc_context_switches();
        self.stats.inc_preemptions();
        trace!("Tick: dispatch task {}", next.task);
        self.platform.context.switch_to(next.context);
    }

    /// Promote a sleeping task back to Running at its previous level.
    ///
    /// Wake queues are the only callers; waking a task that is not
    /// Allocated reports `false` and changes nothing.
    pub(crate) fn wake(&self, task: TaskId) -> bool {
        let _cs = CriticalSection::enter(&*self.platform.interrupts);
        let mut core = self.core.lock();

        match core.record(task) {
            Some(record) if record.state == TaskState::Allocated => {}
            _ => return false,
        }

        let woken = self.run_locked(&mut core, task, None, None).is_ok();
        if woken {
            self.stats.inc_wakeups();
            info!("Task {} woken", task);
        }
        woken
    }

    /// The task currently scheduled from the serviced level
    pub fn current(&self) -> Option<TaskId> {
        self.core.lock().current_task()
    }

    /// The idle task created by `bootstrap`
    pub fn idle_task(&self) -> Option<TaskId> {
        self.core.lock().idle_task
    }

    /// Task metadata snapshot
    pub fn task_info(&self, task: TaskId) -> Option<TaskInfo> {
        let core = self.core.lock();
        core.record(task).map(|r| TaskInfo::from_record(task, r))
    }

    /// Lifecycle state of a task
    pub fn task_state(&self, task: TaskId) -> Option<TaskState> {
        self.core.lock().record(task).map(|r| r.state)
    }

    /// Tier currently being serviced
    pub fn current_level(&self) -> usize {
        self.core.lock().current_level
    }

    /// Whether level membership changed since the last re-election
    pub fn level_dirty(&self) -> bool {
        self.core.lock().level_dirty
    }

    /// Runnable tasks at `level`, in dispatch order
    pub fn tasks_at(&self, level: usize) -> Vec<TaskId> {
        let core = self.core.lock();
        core.levels
            .get(level)
            .map(|l| l.tasks().to_vec())
            .unwrap_or_default()
    }

    /// Total Running tasks across every level
    pub fn runnable(&self) -> usize {
        let core = self.core.lock();
        core.levels.iter().map(|l| l.len()).sum()
    }

    /// Pool slots that have left the Free state
    pub fn allocated(&self) -> usize {
        self.core.lock().pool.allocated()
    }

    fn run_locked(
        &self,
        core: &mut SchedCore,
        task: TaskId,
        level: Option<usize>,
        timeslice: Option<Timeslice>,
    ) -> TaskResult<()> {
        if let Some(level) = level {
            if level >= core.config.levels {
                return Err(TaskError::InvalidLevel {
                    level,
                    levels: core.config.levels,
                });
            }
        }

        let record = core.record(task).ok_or(TaskError::UnknownTask(task))?;
        let (state, task_level) = (record.state, record.level);
        let target = level.unwrap_or(task_level);

        match state {
            TaskState::Free => return Err(TaskError::NotAllocated(task)),
            TaskState::Running => {
                if target != task_level {
                    core.remove_from_level(task);
                    core.insert_into_level(task, target);
                    debug!("Task {} moved to level {}", task, target);
                }
            }
            TaskState::Allocated => {
                core.insert_into_level(task, target);
                self.stats.inc_active();
                info!("Task {} running at level {}", task, target);
            }
        }

        if let Some(slice) = timeslice {
            if let Some(record) = core.record_mut(task) {
                record.timeslice = slice;
            }
        }

        // Any run() call forces a re-election check on the next tick, even
        // when nothing moved.
        core.level_dirty = true;
        Ok(())
    }
}

impl SchedCore {
    pub(super) fn record(&self, task: TaskId) -> Option<&super::record::TaskRecord> {
        self.pool.get(task)
    }

    pub(super) fn record_mut(&mut self, task: TaskId) -> Option<&mut super::record::TaskRecord> {
        self.pool.get_mut(task)
    }

    /// Idempotent tail insert: a task already present at `level` stays where
    /// it is; otherwise it is appended behind every runnable peer.
    pub(super) fn insert_into_level(&mut self, task: TaskId, level: usize) -> bool {
        if self.levels[level].contains(task) {
            return false;
        }
        self.levels[level].push(task);
        if let Some(record) = self.pool.get_mut(task) {
            record.state = TaskState::Running;
            record.level = level;
        }
        self.level_dirty = true;
        true
    }

    /// Remove `task` from the level it belongs to, fixing up that level's
    /// rotation cursor. Absent tasks are ignored.
    pub(super) fn remove_from_level(&mut self, task: TaskId) -> bool {
        let Some(level) = self.pool.get(task).map(|r| r.level) else {
            return false;
        };
        if !self.levels[level].remove(task) {
            return false;
        }
        if self.levels[level].is_empty() {
            self.level_dirty = true;
        }
        if let Some(record) = self.pool.get_mut(task) {
            record.state = TaskState::Allocated;
        }
        true
    }

    /// Elect the highest non-empty level, falling back to the idle level,
    /// and clear the dirty flag.
    pub(super) fn recompute_current_level(&mut self) {
        self.current_level = self
            .levels
            .iter()
            .position(|l| !l.is_empty())
            .unwrap_or(self.config.idle_level());
        self.level_dirty = false;
    }

    pub(super) fn current_task(&self) -> Option<TaskId> {
        self.levels[self.current_level].current()
    }

    fn dispatch_target(&self) -> Option<Dispatch> {
        let task = self.current_task()?;
        let record = self.pool.get(task)?;
        Some(Dispatch {
            task,
            context: record.context,
            timeslice: record.timeslice.get(),
        })
    }
}

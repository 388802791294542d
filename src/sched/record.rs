/*!
 * Task Records
 * The unit of schedulable state and its lifecycle enum
 */

use crate::core::types::{TaskId, Timeslice};
use crate::platform::ContextHandle;
use serde::{Deserialize, Serialize};

/// Task lifecycle state
///
/// Transitions: Free -> Allocated (allocate), Allocated -> Running (run),
/// Running -> Allocated (sleep). Nothing returns a record to Free; the pool
/// is append-only once warmed up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskState {
    /// Pool slot is unused
    Free,
    /// Slot is claimed and initialized but not schedulable (sleeping)
    Allocated,
    /// Task appears in exactly one run level and is eligible for dispatch
    Running,
}

/// One schedulable task: context slot plus scheduling metadata
#[derive(Debug, Clone)]
pub(crate) struct TaskRecord {
    pub context: ContextHandle,
    pub state: TaskState,
    /// Run level this task belongs to; 0 is serviced first
    pub level: usize,
    /// Ticks granted each time this task is dispatched
    pub timeslice: Timeslice,
}

impl TaskRecord {
    pub fn new(context: ContextHandle, timeslice: Timeslice) -> Self {
        Self {
            context,
            state: TaskState::Free,
            level: 0,
            timeslice,
        }
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        matches!(self.state, TaskState::Running)
    }

    #[inline]
    pub fn is_free(&self) -> bool {
        matches!(self.state, TaskState::Free)
    }
}

/// Task metadata snapshot for observability and tests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TaskInfo {
    pub id: TaskId,
    pub state: TaskState,
    pub level: usize,
    pub timeslice_ticks: u32,
    pub context: ContextHandle,
}

impl TaskInfo {
    pub(crate) fn from_record(id: TaskId, record: &TaskRecord) -> Self {
        Self {
            id,
            state: record.state,
            level: record.level,
            timeslice_ticks: record.timeslice.get(),
            context: record.context,
        }
    }
}

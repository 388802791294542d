/*!
 * Task Pool
 * Fixed-capacity storage for task records; slots are scanned linearly and
 * never returned to the Free state once claimed
 */

use super::record::{TaskRecord, TaskState};
use crate::core::errors::TaskError;
use crate::core::types::{TaskId, TaskResult, Timeslice};
use crate::platform::ContextSwitch;

pub(crate) struct TaskPool {
    records: Vec<TaskRecord>,
}

impl TaskPool {
    /// Build a pool of `capacity` Free records, reserving one context slot
    /// per record from the context layer up front.
    pub fn new(capacity: usize, context: &dyn ContextSwitch, timeslice: Timeslice) -> Self {
        let records = (0..capacity)
            .map(|_| TaskRecord::new(context.allocate_slot(), timeslice))
            .collect();
        Self { records }
    }

    /// Claim the first Free slot. Fails when every slot is in use, which is
    /// a configuration error rather than a recoverable runtime condition.
    pub fn allocate(&mut self) -> TaskResult<TaskId> {
        let slot = self
            .records
            .iter()
            .position(TaskRecord::is_free)
            .ok_or(TaskError::PoolExhausted(self.records.len()))?;

        self.records[slot].state = TaskState::Allocated;
        Ok(slot as TaskId)
    }

    pub fn get(&self, id: TaskId) -> Option<&TaskRecord> {
        self.records.get(id as usize)
    }

    pub fn get_mut(&mut self, id: TaskId) -> Option<&mut TaskRecord> {
        self.records.get_mut(id as usize)
    }

    pub fn capacity(&self) -> usize {
        self.records.len()
    }

    /// Slots that have left the Free state
    pub fn allocated(&self) -> usize {
        self.records.iter().filter(|r| !r.is_free()).count()
    }
}

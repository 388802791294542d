/*!
 * Error Types
 * Centralized error handling with thiserror, miette, and serde support
 */

use crate::core::types::TaskId;
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Task and scheduler errors with serialization support
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum TaskError {
    #[error("Task pool exhausted: all {0} slots are in use")]
    #[diagnostic(
        code(task::pool_exhausted),
        help("The pool size is a boot-time constant. Exceeding it is a configuration error; raise SchedulerConfig::pool_capacity.")
    )]
    PoolExhausted(usize),

    #[error("Task {0} not found in pool")]
    #[diagnostic(
        code(task::unknown_task),
        help("The task id does not name an allocated pool slot. Check that it came from allocate() or bootstrap().")
    )]
    UnknownTask(TaskId),

    #[error("Task {0} has not been allocated")]
    #[diagnostic(
        code(task::not_allocated),
        help("Free pool slots cannot be scheduled. Call allocate() first.")
    )]
    NotAllocated(TaskId),

    #[error("Run level {level} out of range: scheduler has {levels} levels")]
    #[diagnostic(
        code(task::invalid_level),
        help("Levels are numbered 0 (highest) through levels-1 (idle). Pick one in range.")
    )]
    InvalidLevel { level: usize, levels: usize },

    #[error("Scheduler already bootstrapped")]
    #[diagnostic(
        code(task::already_bootstrapped),
        help("bootstrap() adopts the calling context exactly once per scheduler instance.")
    )]
    AlreadyBootstrapped,
}

/// Wake-queue errors with serialization support
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum QueueError {
    #[error("Wake queue full: capacity {0}")]
    #[diagnostic(
        code(queue::full),
        help("Interrupt-context producers must not block; the event is dropped. Size the queue for the burst rate of its device.")
    )]
    Full(usize),

    #[error("Wake queue empty")]
    #[diagnostic(code(queue::empty), help("Nothing buffered. Sleep until the queue wakes you."))]
    Empty,
}

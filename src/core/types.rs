/*!
 * Core Types
 * Common types used across the kernel
 */

use std::num::NonZeroU32;

/// Task ID type: the slot index of a task in the fixed pool
pub type TaskId = u32;

/// Timer tick count
pub type Ticks = u32;

/// Timeslice length in ticks, granted to a task each time it is scheduled.
/// Zero is not a valid timeslice; "keep the current value" is expressed with
/// `Option<Timeslice>` at the call sites instead.
pub type Timeslice = NonZeroU32;

/// Common result type for task and scheduler operations
pub type TaskResult<T> = Result<T, super::errors::TaskError>;

/// Common result type for wake-queue operations
pub type QueueResult<T> = Result<T, super::errors::QueueError>;

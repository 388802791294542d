/*!
 * Wake Queue
 * Bounded FIFO with ringbuf-based storage; enqueuing is the one mechanism
 * that wakes the task bound to the queue
 */

use crate::core::errors::QueueError;
use crate::core::types::{QueueResult, TaskId};
use crate::sched::Scheduler;
use log::debug;
use parking_lot::Mutex;
use ringbuf::{traits::*, HeapRb};

/// Bounded event queue, optionally bound to one sleeping consumer task.
///
/// Producers are typically interrupt handlers: `push` never blocks, and a
/// full queue drops the event instead of applying back-pressure. When data
/// lands in a queue bound to an Allocated task, that task is made Running
/// again at its previous level, behind its already-runnable peers; it does
/// not preempt anything immediately.
pub struct WakeQueue<T> {
    buffer: Mutex<HeapRb<T>>,
    waker: Option<(Scheduler, TaskId)>,
}

impl<T> WakeQueue<T> {
    /// Create an unbound queue; pushes buffer data but wake nobody.
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: Mutex::new(HeapRb::new(capacity)),
            waker: None,
        }
    }

    /// Create a queue whose non-empty transition wakes `task`.
    pub fn bound(capacity: usize, scheduler: Scheduler, task: TaskId) -> Self {
        Self {
            buffer: Mutex::new(HeapRb::new(capacity)),
            waker: Some((scheduler, task)),
        }
    }

    /// Enqueue one event.
    ///
    /// Fails with `QueueError::Full` when the ring is at capacity; the
    /// caller (normally an ISR) must drop the event rather than block.
    /// On success, a bound task that is currently sleeping becomes Running.
    pub fn push(&self, item: T) -> QueueResult<()> {
        let mut buffer = self.buffer.lock();
        if buffer.try_push(item).is_err() {
            debug!("Wake queue full; event dropped");
            return Err(QueueError::Full(buffer.capacity().get()));
        }
        drop(buffer);

        if let Some((scheduler, task)) = &self.waker {
            scheduler.wake(*task);
        }
        Ok(())
    }

    /// Dequeue the oldest event; no scheduler interaction.
    pub fn pop(&self) -> Option<T> {
        self.buffer.lock().try_pop()
    }

    /// Buffered events
    pub fn len(&self) -> usize {
        self.buffer.lock().occupied_len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.lock().is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.buffer.lock().is_full()
    }

    /// Total ring capacity
    pub fn capacity(&self) -> usize {
        self.buffer.lock().capacity().get()
    }
}

impl<T: Copy> WakeQueue<T> {
    /// Read the oldest event without consuming it; no scheduler interaction.
    pub fn peek(&self) -> Option<T> {
        self.buffer.lock().iter().next().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_pop_preserves_fifo_order() {
        let queue: WakeQueue<u32> = WakeQueue::new(4);
        queue.push(1).unwrap();
        queue.push(2).unwrap();
        queue.push(3).unwrap();

        assert_eq!(queue.pop(), Some(1));
        assert_eq!(queue.pop(), Some(2));
        assert_eq!(queue.pop(), Some(3));
        assert_eq!(queue.pop(), None);
    }

    #[test]
    fn peek_does_not_consume() {
        let queue: WakeQueue<u32> = WakeQueue::new(4);
        queue.push(7).unwrap();

        assert_eq!(queue.peek(), Some(7));
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.pop(), Some(7));
        assert_eq!(queue.peek(), None);
    }

    #[test]
    fn full_queue_drops_the_event() {
        let queue: WakeQueue<u32> = WakeQueue::new(2);
        queue.push(1).unwrap();
        queue.push(2).unwrap();

        assert_eq!(queue.push(3), Err(QueueError::Full(2)));
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.pop(), Some(1));
    }
}

/*!
 * Wake Module
 * Bounded device-event queues that can promote a sleeping task back to
 * Running
 */

mod queue;

pub use queue::WakeQueue;

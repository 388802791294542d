/*!
 * Context-Switch Collaborator
 * Opaque execution-context slots and the switch primitive the scheduler
 * drives; the real machine backs these with task-state segments and a
 * far jump, the simulation records them
 */

use log::trace;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU32, Ordering};

/// Opaque reference to one hardware execution context
///
/// The scheduler stores and compares handles but never looks inside one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContextHandle(u32);

impl ContextHandle {
    pub(crate) fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Raw slot number, for logging and diagnostics only
    pub fn raw(self) -> u32 {
        self.0
    }
}

/// Context-switch primitive supplied by the segment/hardware layer
///
/// `switch_to` atomically saves the caller's full execution context,
/// restores the target's, and transfers control; it does not return to its
/// caller until the caller's own context is selected by a later switch.
pub trait ContextSwitch: Send + Sync {
    /// Reserve a fresh context slot
    fn allocate_slot(&self) -> ContextHandle;

    /// Reset a slot to the clean entry state: general registers zeroed,
    /// interrupts enabled on entry, no I/O permissions
    fn reset_slot(&self, handle: ContextHandle);

    /// Transfer control to the given context
    fn switch_to(&self, handle: ContextHandle);
}

/// Simulated context layer: hands out sequential slots and records every
/// switch target instead of transferring control
///
/// Stands in for the TSS far-jump layer so scheduler decisions can be
/// observed from tests and the demo binary.
pub struct SimContexts {
    next_slot: AtomicU32,
    switches: Mutex<Vec<ContextHandle>>,
}

impl SimContexts {
    pub fn new() -> Self {
        Self {
            next_slot: AtomicU32::new(0),
            switches: Mutex::new(Vec::new()),
        }
    }

    /// All switch targets recorded so far, oldest first
    pub fn switches(&self) -> Vec<ContextHandle> {
        self.switches.lock().clone()
    }

    /// The most recent switch target, if any switch happened
    pub fn last_switch(&self) -> Option<ContextHandle> {
        self.switches.lock().last().copied()
    }

    /// Number of switches performed
    pub fn switch_count(&self) -> usize {
        self.switches.lock().len()
    }
}

impl Default for SimContexts {
    fn default() -> Self {
        Self::new()
    }
}

impl ContextSwitch for SimContexts {
    fn allocate_slot(&self) -> ContextHandle {
        ContextHandle::new(self.next_slot.fetch_add(1, Ordering::Relaxed))
    }

    fn reset_slot(&self, handle: ContextHandle) {
        trace!("context slot {} reset to clean entry state", handle.raw());
    }

    fn switch_to(&self, handle: ContextHandle) {
        trace!("context switch -> slot {}", handle.raw());
        self.switches.lock().push(handle);
    }
}

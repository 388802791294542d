/*!
 * Interrupt-Control Collaborator
 * Nesting-safe save/restore of the interrupt-enable state, plus an RAII
 * critical-section guard that restores on every exit path
 */

use std::sync::atomic::{AtomicBool, Ordering};

/// Saved interrupt-enable state, returned by `save_and_disable` and consumed
/// by `restore`. Opaque to callers so nested critical sections compose.
#[derive(Debug, Clone, Copy)]
pub struct InterruptState {
    enabled: bool,
}

impl InterruptState {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn was_enabled(self) -> bool {
        self.enabled
    }
}

/// Interrupt-enable control supplied by the CPU layer
///
/// `save_and_disable` followed by `restore` of the returned state must nest:
/// an inner critical section re-disabling interrupts restores the (already
/// disabled) outer state, not an unconditional enable.
pub trait InterruptControl: Send + Sync {
    /// Record the current interrupt-enable state and mask interrupts
    fn save_and_disable(&self) -> InterruptState;

    /// Restore a previously saved state
    fn restore(&self, prior: InterruptState);

    /// Whether interrupts are currently enabled
    fn enabled(&self) -> bool;
}

/// Simulated interrupt flag
///
/// Tracks the enable bit the way the real CPU's flag register would; actual
/// mutual exclusion in the portable scheduler comes from its internal lock.
pub struct SoftInterrupts {
    enabled: AtomicBool,
}

impl SoftInterrupts {
    pub fn new() -> Self {
        Self {
            enabled: AtomicBool::new(true),
        }
    }
}

impl Default for SoftInterrupts {
    fn default() -> Self {
        Self::new()
    }
}

impl InterruptControl for SoftInterrupts {
    fn save_and_disable(&self) -> InterruptState {
        let enabled = self.enabled.swap(false, Ordering::AcqRel);
        InterruptState { enabled }
    }

    fn restore(&self, prior: InterruptState) {
        self.enabled.store(prior.enabled, Ordering::Release);
    }

    fn enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }
}

/// RAII critical section: interrupts are masked for the guard's lifetime and
/// the prior enable state is restored on drop, including early returns and
/// panicking paths.
pub struct CriticalSection<'a> {
    control: &'a dyn InterruptControl,
    prior: InterruptState,
}

impl<'a> CriticalSection<'a> {
    pub fn enter(control: &'a dyn InterruptControl) -> Self {
        let prior = control.save_and_disable();
        Self { control, prior }
    }
}

impl Drop for CriticalSection<'_> {
    fn drop(&mut self) {
        self.control.restore(self.prior);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn critical_section_restores_on_exit() {
        let intr = SoftInterrupts::new();
        assert!(intr.enabled());

        {
            let _guard = CriticalSection::enter(&intr);
            assert!(!intr.enabled());
        }

        assert!(intr.enabled());
    }

    #[test]
    fn nested_sections_restore_outer_state() {
        let intr = SoftInterrupts::new();

        let outer = CriticalSection::enter(&intr);
        {
            let _inner = CriticalSection::enter(&intr);
            assert!(!intr.enabled());
        }
        // Inner exit must not re-enable inside the outer section
        assert!(!intr.enabled());

        drop(outer);
        assert!(intr.enabled());
    }
}

/*!
 * System Limits and Constants
 *
 * Centralized location for all system-wide limits and defaults.
 * All values include rationale comments explaining WHY they exist.
 */

use std::time::Duration;

// =============================================================================
// TASK POOL LIMITS
// =============================================================================

/// Maximum concurrent tasks (pool capacity)
/// One context slot is reserved per record at boot, so this is a hard
/// configuration constant, not a runtime-growable limit
pub const MAX_TASKS: usize = 1000;

/// Number of run levels (priority tiers)
/// Level 0 is serviced first; the last level hosts the permanently-runnable
/// idle task and is only reached when every other level is empty
pub const RUN_LEVELS: usize = 10;

// =============================================================================
// TIMESLICE DEFAULTS
// =============================================================================

/// Default timeslice granted to a freshly allocated task (ticks)
pub const DEFAULT_TIMESLICE_TICKS: u32 = 2;

/// Timeslice armed for the bootstrap task before the first rotation (ticks)
pub const BOOT_TIMESLICE_TICKS: u32 = 2;

/// Duration of one simulated timer tick
/// Matches a 100 Hz programmable interval timer
pub const DEFAULT_TICK: Duration = Duration::from_millis(10);

// =============================================================================
// WAKE QUEUE LIMITS
// =============================================================================

/// Default wake-queue capacity (events)
/// Sized for keyboard/mouse burst rates; producers drop on overflow rather
/// than block in interrupt context
pub const DEFAULT_WAKE_CAPACITY: usize = 128;

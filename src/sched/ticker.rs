/*!
 * Ticker Task - Autonomous Preemptive Scheduling
 *
 * Background task that stands in for the periodic hardware timer: it sleeps
 * for the armed timeslice and then fires the scheduler's tick entry point.
 *
 * # Graceful-with-Fallback Shutdown Pattern
 *
 * Drop can't be async, so task handles can't be awaited during cleanup.
 * The ticker therefore supports two shutdown paths:
 *
 * 1. **Preferred:** `shutdown().await` - sends the shutdown command, awaits
 *    the handle, sets an atomic flag, and consumes self.
 * 2. **Fallback:** `Drop` - if the flag was never set, aborts the task
 *    immediately and logs a warning.
 *
 * The task always stops, even when shutdown() is forgotten, and shutdown()
 * consuming self makes double-shutdown unrepresentable.
 */

use super::Scheduler;
use crate::platform::SliceTimer;
use log::{info, trace, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Control messages for the ticker task
#[derive(Debug, Clone)]
pub enum TickerCommand {
    /// Change the duration of one tick
    SetTickDuration(Duration),
    /// Pause preemption (foreground code can still run/sleep/yield)
    Pause,
    /// Resume preemption
    Resume,
    /// Fire one tick immediately
    Trigger,
    /// Shut the ticker down
    Shutdown,
}

/// Handle to the background ticker
///
/// **Shutdown Pattern: Graceful-with-Fallback**
/// - Preferred: call `shutdown().await` for graceful termination
/// - Fallback: Drop aborts the task if shutdown wasn't called
pub struct TickerTask {
    command_tx: mpsc::UnboundedSender<TickerCommand>,
    handle: Option<tokio::task::JoinHandle<()>>,
    /// Tracks whether graceful shutdown was initiated (lock-free)
    shutdown_initiated: Arc<AtomicBool>,
}

impl TickerTask {
    /// Spawn the ticker against a scheduler and its armed-slice timer.
    ///
    /// `tick` is the duration of one timer tick; the loop sleeps for
    /// `tick * armed_ticks` between preemption points, so a task with a
    /// longer timeslice genuinely holds the CPU longer.
    pub fn spawn(scheduler: Scheduler, timer: Arc<SliceTimer>, tick: Duration) -> Self {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let shutdown_initiated = Arc::new(AtomicBool::new(false));

        let handle = tokio::spawn(async move {
            run_ticker_loop(scheduler, timer, tick, command_rx).await;
        });

        info!("Ticker task spawned - timer-driven preemption enabled");

        Self {
            command_tx,
            handle: Some(handle),
            shutdown_initiated,
        }
    }

    /// Spawn the ticker with the default tick duration
    pub fn spawn_with_defaults(scheduler: Scheduler, timer: Arc<SliceTimer>) -> Self {
        Self::spawn(scheduler, timer, crate::core::limits::DEFAULT_TICK)
    }

    /// Change the duration of one tick
    pub fn set_tick_duration(&self, tick: Duration) {
        let _ = self.command_tx.send(TickerCommand::SetTickDuration(tick));
    }

    /// Pause preemption
    pub fn pause(&self) {
        let _ = self.command_tx.send(TickerCommand::Pause);
    }

    /// Resume preemption
    pub fn resume(&self) {
        let _ = self.command_tx.send(TickerCommand::Resume);
    }

    /// Fire one tick immediately
    pub fn trigger(&self) {
        let _ = self.command_tx.send(TickerCommand::Trigger);
    }

    /// Shut the ticker down gracefully
    ///
    /// **Preferred shutdown method** - waits for the loop to exit cleanly.
    /// Consumes self to prevent use-after-shutdown and double-shutdown.
    pub async fn shutdown(mut self) {
        // Mark shutdown as initiated (prevents abort in Drop)
        self.shutdown_initiated.store(true, Ordering::SeqCst);

        let _ = self.command_tx.send(TickerCommand::Shutdown);

        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                warn!("Ticker task shutdown error: {}", e);
            } else {
                info!("Ticker task shutdown complete");
            }
        }
    }
}

/// Core ticker loop: sleep for the armed slice, preempt, repeat
async fn run_ticker_loop(
    scheduler: Scheduler,
    timer: Arc<SliceTimer>,
    mut tick: Duration,
    mut command_rx: mpsc::UnboundedReceiver<TickerCommand>,
) {
    let mut active = true;

    info!("Ticker loop started with {:?} tick", tick);

    loop {
        let slice = tick * timer.armed();

        tokio::select! {
            // The armed timeslice elapsed: preemption point
            _ = tokio::time::sleep(slice) => {
                if active {
                    scheduler.tick();
                    trace!("Ticker fired after {:?}", slice);
                }
            }

            // Handle control commands
            Some(cmd) = command_rx.recv() => {
                match cmd {
                    TickerCommand::SetTickDuration(new_tick) => {
                        info!("Tick duration updated: {:?}", new_tick);
                        tick = new_tick;
                    }

                    TickerCommand::Pause => {
                        info!("Ticker paused");
                        active = false;
                    }

                    TickerCommand::Resume => {
                        info!("Ticker resumed");
                        active = true;
                    }

                    TickerCommand::Trigger => {
                        scheduler.tick();
                        trace!("Manual tick trigger");
                    }

                    TickerCommand::Shutdown => {
                        info!("Ticker shutting down");
                        break;
                    }
                }
            }
        }
    }
}

impl Drop for TickerTask {
    fn drop(&mut self) {
        // Graceful shutdown path was used - nothing to do
        if self.shutdown_initiated.load(Ordering::SeqCst) {
            return;
        }

        // Fallback path: graceful shutdown wasn't called
        if let Some(handle) = self.handle.take() {
            warn!(
                "TickerTask dropped without calling shutdown() - aborting task immediately. \
                 Use `ticker.shutdown().await` for graceful cleanup."
            );
            handle.abort();
        }
    }
}

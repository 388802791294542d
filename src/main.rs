/*!
 * Preempt Kernel - Demo Entry Point
 *
 * Boots the scheduler against the simulated platform:
 * - Multilevel round-robin dispatch
 * - Timer-driven preemption via the ticker task
 * - Sleep/wake through a device-style wake queue
 */

use log::info;
use preempt_kernel::core::limits;
use preempt_kernel::{Platform, Scheduler, SchedulerConfig, TickerTask, WakeQueue};
use std::error::Error;
use std::num::NonZeroU32;
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("Preempt kernel starting...");
    info!("================================================");

    info!("Building simulated platform (contexts, timer, interrupts)...");
    let (platform, sim) = Platform::simulated();

    info!("Initializing scheduler...");
    let config = SchedulerConfig::compact(10, 64).with_boot_level(1);
    let scheduler = Scheduler::new(config, platform);

    info!("Bootstrapping: adopting this context as the first task...");
    let boot = scheduler.bootstrap()?;
    info!(
        "Bootstrap task {} running at level 1, idle task pinned at level 9",
        boot
    );

    info!("Spawning worker tasks...");
    let shell = scheduler.allocate()?;
    scheduler.run(shell, Some(1), NonZeroU32::new(3))?;

    let compositor = scheduler.allocate()?;
    scheduler.run(compositor, Some(1), None)?;

    let logger = scheduler.allocate()?;
    scheduler.run(logger, Some(2), None)?;

    info!("Binding a keyboard-style wake queue to a sleeping reader...");
    let reader = scheduler.allocate()?;
    scheduler.run(reader, Some(1), None)?;
    let keyboard: WakeQueue<u32> =
        WakeQueue::bound(limits::DEFAULT_WAKE_CAPACITY, scheduler.clone(), reader);
    scheduler.sleep(reader)?;

    info!("Starting ticker ({:?} tick)...", limits::DEFAULT_TICK);
    let ticker = TickerTask::spawn_with_defaults(scheduler.clone(), sim.timer.clone());

    tokio::time::sleep(Duration::from_millis(150)).await;

    info!("Keyboard interrupt: scancode lands in the wake queue...");
    keyboard.push(0x1c)?;
    info!(
        "Reader task {} is {:?} again",
        reader,
        scheduler.task_state(reader)
    );

    tokio::time::sleep(Duration::from_millis(150)).await;

    info!("Reader drains its queue: {:?}", keyboard.pop());

    ticker.shutdown().await;

    let stats = scheduler.stats();
    info!("Final stats: {}", serde_json::to_string_pretty(&stats)?);
    info!(
        "Recorded {} context switches across {} allocated tasks",
        sim.contexts.switch_count(),
        scheduler.allocated()
    );
    info!("Preempt kernel demo complete");

    Ok(())
}

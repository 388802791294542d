/*!
 * Ticker Tests
 * Timer-driven preemption running against the live scheduler
 */

use preempt_kernel::{Platform, Scheduler, SchedulerConfig, TickerTask, WakeQueue};
use std::time::Duration;

#[tokio::test]
async fn test_ticker_rotates_all_runnable_tasks() {
    let (platform, sim) = Platform::simulated();
    let sched = Scheduler::new(SchedulerConfig::compact(4, 8).with_boot_level(1), platform);
    let boot = sched.bootstrap().unwrap();

    let a = sched.allocate().unwrap();
    let b = sched.allocate().unwrap();
    sched.run(a, Some(1), None).unwrap();
    sched.run(b, Some(1), None).unwrap();

    let ticker = TickerTask::spawn(sched.clone(), sim.timer.clone(), Duration::from_millis(1));
    tokio::time::sleep(Duration::from_millis(100)).await;
    ticker.shutdown().await;

    // Every runnable task was handed the CPU at least once
    let switched_to = sim.contexts.switches();
    for task in [boot, a, b] {
        let ctx = sched.task_info(task).unwrap().context;
        assert!(
            switched_to.contains(&ctx),
            "task {} never held the CPU",
            task
        );
    }
    assert!(sched.stats().ticks > 0);
    assert!(sched.stats().preemptions > 0);
}

#[tokio::test]
async fn test_sleeping_task_stays_off_cpu_until_woken() {
    let (platform, sim) = Platform::simulated();
    let sched = Scheduler::new(SchedulerConfig::compact(4, 8).with_boot_level(1), platform);
    sched.bootstrap().unwrap();

    let worker = sched.allocate().unwrap();
    sched.run(worker, Some(1), None).unwrap();
    sched.sleep(worker).unwrap();
    let worker_ctx = sched.task_info(worker).unwrap().context;

    let ticker = TickerTask::spawn(sched.clone(), sim.timer.clone(), Duration::from_millis(1));
    tokio::time::sleep(Duration::from_millis(30)).await;

    // Never dispatched while sleeping
    assert!(!sim.contexts.switches().contains(&worker_ctx));

    let queue = WakeQueue::bound(4, sched.clone(), worker);
    queue.push(1u32).unwrap();
    tokio::time::sleep(Duration::from_millis(30)).await;
    ticker.shutdown().await;

    // Woken: the round-robin path picked it up again
    assert!(
        sim.contexts.switches().contains(&worker_ctx),
        "woken task was never rescheduled"
    );
}

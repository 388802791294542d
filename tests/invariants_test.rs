/*!
 * Invariant Tests
 * Property tests over random operation interleavings: a task is in exactly
 * one run level iff it is Running, and the serviced level is always the
 * highest non-empty one once re-elected
 */

use preempt_kernel::{Platform, Scheduler, SchedulerConfig, TaskId, TaskState, WakeQueue};
use proptest::prelude::*;

const LEVELS: usize = 4;
const POOL: usize = 8;

#[derive(Debug, Clone)]
enum Op {
    Alloc,
    Run { task: usize, level: usize },
    Sleep { task: usize },
    Wake { task: usize },
    Tick,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        1 => Just(Op::Alloc),
        3 => (0..POOL, 0..LEVELS).prop_map(|(task, level)| Op::Run { task, level }),
        2 => (0..POOL).prop_map(|task| Op::Sleep { task }),
        2 => (0..POOL).prop_map(|task| Op::Wake { task }),
        3 => Just(Op::Tick),
    ]
}

/// Pick a target among the tasks allocated so far, never the idle task:
/// the idle task is permanently runnable by construction and correct use
/// never sleeps or relocates it.
fn pick(ids: &[TaskId], index: usize) -> Option<TaskId> {
    if ids.is_empty() {
        None
    } else {
        Some(ids[index % ids.len()])
    }
}

fn check_invariants(sched: &Scheduler) {
    let mut placements: Vec<(TaskId, usize)> = Vec::new();
    for level in 0..LEVELS {
        for task in sched.tasks_at(level) {
            placements.push((task, level));
        }
    }

    for id in 0..POOL as TaskId {
        let occurrences = placements.iter().filter(|&&(t, _)| t == id).count();
        match sched.task_state(id) {
            Some(TaskState::Running) => assert_eq!(
                occurrences, 1,
                "running task {} must sit in exactly one level",
                id
            ),
            _ => assert_eq!(
                occurrences, 0,
                "non-running task {} must not sit in any level",
                id
            ),
        }
    }

    // Every placed task agrees with its record about where it sits
    for &(task, level) in &placements {
        assert_eq!(sched.task_info(task).unwrap().level, level);
    }

    // Once membership is clean, the serviced level is the highest non-empty
    // one, and it always yields a dispatchable task
    if !sched.level_dirty() {
        let min = (0..LEVELS)
            .find(|&l| !sched.tasks_at(l).is_empty())
            .unwrap_or(LEVELS - 1);
        assert_eq!(sched.current_level(), min);
        assert!(sched.current().is_some());
    }
}

proptest! {
    #[test]
    fn scheduler_invariants_hold_under_random_ops(
        ops in proptest::collection::vec(op_strategy(), 1..120)
    ) {
        let (platform, _) = Platform::simulated();
        let sched = Scheduler::new(
            SchedulerConfig::compact(LEVELS, POOL).with_boot_level(1),
            platform,
        );
        let boot = sched.bootstrap().unwrap();

        // Targets for run/sleep/wake; the idle task stays untouched
        let mut ids: Vec<TaskId> = vec![boot];

        for op in ops {
            match op {
                Op::Alloc => {
                    if let Ok(id) = sched.allocate() {
                        ids.push(id);
                    }
                }
                Op::Run { task, level } => {
                    if let Some(id) = pick(&ids, task) {
                        sched.run(id, Some(level), None).unwrap();
                    }
                }
                Op::Sleep { task } => {
                    if let Some(id) = pick(&ids, task) {
                        sched.sleep(id).unwrap();
                    }
                }
                Op::Wake { task } => {
                    if let Some(id) = pick(&ids, task) {
                        let queue = WakeQueue::bound(2, sched.clone(), id);
                        let _ = queue.push(0u32);
                    }
                }
                Op::Tick => sched.tick(),
            }
            check_invariants(&sched);
        }
    }

    #[test]
    fn cursor_survives_removals_and_tail_inserts(
        // Interleave sleeps of earlier peers with tail wakes while one task
        // is being serviced; the cursor must keep naming a live task
        toggles in proptest::collection::vec(any::<bool>(), 1..40)
    ) {
        let (platform, _) = Platform::simulated();
        let sched = Scheduler::new(
            SchedulerConfig::compact(LEVELS, POOL).with_boot_level(1),
            platform,
        );
        sched.bootstrap().unwrap();

        let a = sched.allocate().unwrap();
        let b = sched.allocate().unwrap();
        sched.run(a, Some(1), None).unwrap();
        sched.run(b, Some(1), None).unwrap();

        for toggle in toggles {
            if toggle {
                sched.sleep(a).unwrap();
                let queue = WakeQueue::bound(2, sched.clone(), a);
                let _ = queue.push(0u32);
            } else {
                sched.tick();
            }

            let current = sched.current();
            prop_assert!(current.is_some() || sched.level_dirty());
            if let Some(task) = current {
                prop_assert_eq!(sched.task_state(task), Some(TaskState::Running));
            }
        }
    }
}

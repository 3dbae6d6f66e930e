//! Property tests for the timer set.

use proptest::prelude::*;
use taskmeter_core::{TaskDef, TickOutcome, TimerSet};

fn tasks(n: u32) -> Vec<TaskDef> {
    (1..=n)
        .map(|id| TaskDef {
            id,
            title: format!("Task {id}"),
            description: String::new(),
        })
        .collect()
}

#[derive(Debug, Clone)]
enum Op {
    Toggle(u32),
    Tick,
    StopAll,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        2 => (0u32..6).prop_map(Op::Toggle),
        4 => Just(Op::Tick),
        1 => Just(Op::StopAll),
    ]
}

proptest! {
    #[test]
    fn remaining_stays_within_bounds(initial in 0u64..20, ops in prop::collection::vec(op(), 0..200)) {
        let mut set = TimerSet::new(&tasks(4), initial);
        for op in ops {
            match op {
                Op::Toggle(id) => { set.toggle(id); }
                Op::Tick => { set.tick(); }
                Op::StopAll => set.stop_all(),
            }
            for timer in set.timers() {
                prop_assert!(timer.remaining_secs() <= initial);
            }
            prop_assert!(set.total_elapsed_secs() <= initial * 4);
        }
    }

    #[test]
    fn tick_moves_running_timers_by_exactly_one(initial in 1u64..50, elapsed in 0u64..60, start in prop::collection::vec(any::<bool>(), 4)) {
        let mut set = TimerSet::new(&tasks(4), initial);
        for (i, on) in start.iter().enumerate() {
            let id = i as u32 + 1;
            set.set_elapsed(id, elapsed);
            if *on {
                set.toggle(id);
            }
        }
        let before = set.clone();
        let outcomes = set.tick();

        for (old, new) in before.timers().iter().zip(set.timers()) {
            if !old.is_running() {
                prop_assert_eq!(old, new);
            } else if old.remaining_secs() > 0 {
                prop_assert_eq!(new.remaining_secs(), old.remaining_secs() - 1);
                prop_assert!(new.is_running());
                prop_assert!(outcomes.contains(&TickOutcome::Decremented { id: new.id, remaining_secs: new.remaining_secs() }), "missing Decremented outcome");
            } else {
                prop_assert_eq!(new.remaining_secs(), 0);
                prop_assert!(!new.is_running());
                prop_assert!(outcomes.contains(&TickOutcome::AutoStopped { id: new.id }), "missing AutoStopped outcome");
            }
        }
    }
}

//! Property tests for the playback engine's invariants
//!
//! Sequences are generated as `(duration_ms, is_boundary)` pairs; operations
//! are generated as arbitrary, possibly invalid, control calls.

use proptest::prelude::*;
use stepline::{Engine, Mode};

use super::common::fixtures::{drain_cursors, letters, prefix, EffectLog};

fn sequence_shape() -> impl Strategy<Value = Vec<(u64, bool)>> {
    prop::collection::vec((0u64..50, any::<bool>()), 1..16)
}

#[derive(Debug, Clone, Copy)]
enum Op {
    Start(Mode),
    Pause,
    Resume,
    TogglePause,
    Tick,
    FirePending,
    Rewind(usize),
    RewindOne,
    Reset,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        1 => Just(Op::Start(Mode::Stepped)),
        1 => Just(Op::Start(Mode::Continuous)),
        1 => Just(Op::Pause),
        1 => Just(Op::Resume),
        1 => Just(Op::TogglePause),
        4 => Just(Op::Tick),
        4 => Just(Op::FirePending),
        1 => (0usize..6).prop_map(Op::Rewind),
        1 => Just(Op::RewindOne),
        1 => Just(Op::Reset),
    ]
}

fn strictly_increasing(values: &[usize]) -> bool {
    values.windows(2).all(|pair| pair[0] < pair[1])
}

proptest! {
    /// An uninterrupted continuous run visits every cursor value in order.
    #[test]
    fn continuous_run_visits_every_cursor(shape in sequence_shape()) {
        let log = EffectLog::new();
        let mut engine = Engine::new(letters(&shape, &log));
        let mut visited = vec![engine.state().cursor()];

        prop_assert!(engine.start(Mode::Continuous).is_applied());
        visited.extend(drain_cursors(&mut engine));

        let expected: Vec<usize> = (0..=shape.len()).collect();
        prop_assert_eq!(visited, expected);
        prop_assert!(engine.state().finished());
        prop_assert!(!engine.state().running());
        prop_assert_eq!(engine.state().accumulated(), &prefix(shape.len()));
        prop_assert_eq!(log.entries(), (0..shape.len()).collect::<Vec<_>>());
    }

    /// Rewinding to a checkpoint reproduces the text first seen there, every time,
    /// without running a single observable effect.
    #[test]
    fn rewind_reproduces_checkpoint_state(
        shape in sequence_shape(),
        repeats in 1usize..4,
    ) {
        let log = EffectLog::new();
        let mut engine = Engine::new(letters(&shape, &log));
        engine.start(Mode::Stepped);
        drain_cursors(&mut engine);

        // Text seen the first time each checkpoint was reached
        let mut seen = vec![String::new()];
        while !engine.state().finished() {
            seen.push(engine.state().accumulated().clone());
            engine.resume();
            drain_cursors(&mut engine);
        }

        // Walk forward again to the last checkpoint, then rewind through all of them
        engine.start(Mode::Stepped);
        drain_cursors(&mut engine);
        while engine.state().paused() && engine.checkpoints().current_index() + 1 < seen.len() {
            engine.resume();
            drain_cursors(&mut engine);
        }
        prop_assume!(!engine.state().finished());

        let forward_effects = log.len();
        for target in (0..=engine.checkpoints().current_index()).rev() {
            for _ in 0..repeats {
                prop_assert!(engine.rewind(target).is_applied());
                prop_assert_eq!(engine.state().accumulated(), &seen[target]);
                prop_assert_eq!(engine.state().cursor(), engine.checkpoints().entries()[target]);
                prop_assert!(!engine.state().replaying());
            }
        }
        prop_assert_eq!(log.len(), forward_effects);
    }

    /// Arbitrary control traffic never breaks the engine's invariants.
    #[test]
    fn control_traffic_preserves_invariants(
        shape in sequence_shape(),
        ops in prop::collection::vec(op(), 0..64),
    ) {
        let log = EffectLog::new();
        let mut engine = Engine::new(letters(&shape, &log));
        let len = shape.len();
        let mut forward_steps = 0usize;

        for op in ops {
            let before = engine.state().cursor();
            let mut rewound = false;

            match op {
                Op::Start(mode) => {
                    let was_finished = engine.state().finished();
                    engine.start(mode);
                    rewound = was_finished;
                }
                Op::Pause => {
                    engine.pause();
                }
                Op::Resume => {
                    engine.resume();
                }
                Op::TogglePause => {
                    engine.toggle_pause();
                }
                Op::Tick => {
                    if engine.tick().ran_step() {
                        forward_steps += 1;
                    }
                }
                Op::FirePending => {
                    if let Some(pending) = engine.pending() {
                        if engine.fire(pending.id).ran_step() {
                            forward_steps += 1;
                        }
                    }
                }
                Op::Rewind(target) => {
                    rewound = engine.rewind(target).is_applied();
                }
                Op::RewindOne => {
                    rewound = engine.rewind_one_checkpoint().is_applied();
                }
                Op::Reset => {
                    engine.reset();
                    rewound = true;
                }
            }

            let state = engine.state();
            let checkpoints = engine.checkpoints().entries();

            // Cursor only moves backwards through reset or rewind
            if !rewound {
                prop_assert!(state.cursor() >= before);
            }
            prop_assert!(state.cursor() <= len);
            prop_assert_eq!(state.accumulated(), &prefix(state.cursor()));
            prop_assert!(!state.replaying());

            if state.finished() {
                prop_assert_eq!(state.cursor(), len);
                prop_assert!(!state.running());
            }

            prop_assert_eq!(checkpoints[0], 0);
            prop_assert!(strictly_increasing(checkpoints));
            prop_assert!(engine.checkpoints().current_index() < checkpoints.len());

            // Observable effects ran exactly once per forward step
            prop_assert_eq!(log.len(), forward_steps);
        }
    }

    /// Truncation never leaves entries past the given index.
    #[test]
    fn truncate_after_bounds_store(
        cursors in prop::collection::vec(1usize..100, 0..20),
        index in 0usize..25,
    ) {
        let mut store = stepline::CheckpointStore::new();
        for cursor in cursors {
            store.record(cursor);
            prop_assert!(strictly_increasing(store.entries()));
        }
        store.truncate_after(index);
        prop_assert!(store.len() <= index + 1);
        prop_assert_eq!(store.current_index(), store.len() - 1);
        prop_assert!(strictly_increasing(store.entries()));
    }

    /// Resetting twice is the same as resetting once.
    #[test]
    fn reset_is_idempotent(
        shape in sequence_shape(),
        ops in prop::collection::vec(op(), 0..32),
    ) {
        let log = EffectLog::new();
        let mut engine = Engine::new(letters(&shape, &log));
        for op in ops {
            match op {
                Op::Start(mode) => { engine.start(mode); }
                Op::Resume => { engine.resume(); }
                Op::FirePending | Op::Tick => { engine.tick(); }
                _ => {}
            }
        }

        engine.reset();
        let once = engine.snapshot();
        engine.reset();
        let twice = engine.snapshot();

        prop_assert_eq!(&once, &twice);
        prop_assert_eq!(twice.cursor, 0);
        prop_assert_eq!(twice.checkpoints, vec![0]);
        prop_assert_eq!(twice.accumulated, String::new());
        prop_assert!(engine.pending().is_none());
    }
}

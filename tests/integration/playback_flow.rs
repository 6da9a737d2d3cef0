//! End-to-end playback through the engine and the async player

use std::time::Duration;

use stepline::{
    build_step_sequence, Control, DemoPlan, EffectSink, Engine, Ignored, Mode, Player,
    PlayerOptions, Visual,
};

use super::common::fixtures::{letters, EffectLog};

#[test]
fn three_step_stepped_run() {
    let log = EffectLog::new();
    let mut engine = Engine::new(letters(&[(10, false), (10, true), (10, false)], &log));

    engine.start(Mode::Stepped);
    engine.drain();
    assert!(engine.state().paused());
    assert_eq!(engine.state().cursor(), 2);
    assert_eq!(engine.state().accumulated(), "ab");
    assert_eq!(engine.checkpoints().entries(), &[0, 2]);

    engine.resume();
    engine.drain();
    assert_eq!(engine.state().accumulated(), "abc");
    assert!(engine.state().finished());
    assert_eq!(log.entries(), vec![0, 1, 2]);
}

#[test]
fn three_step_rewind_before_resuming() {
    let log = EffectLog::new();
    let mut engine = Engine::new(letters(&[(10, false), (10, true), (10, false)], &log));

    engine.start(Mode::Stepped);
    engine.drain();
    assert!(engine.rewind_one_checkpoint().is_applied());

    assert_eq!(engine.state().accumulated(), "");
    assert_eq!(engine.state().cursor(), 0);
    assert_eq!(engine.checkpoints().entries(), &[0]);
    assert_eq!(log.len(), 2);
}

#[test]
fn five_steps_two_boundaries() {
    let log = EffectLog::new();
    let shape: &[(u64, bool)] = &[(10, false), (10, true), (10, false), (10, true), (10, false)];
    let mut engine = Engine::new(letters(shape, &log));

    engine.start(Mode::Stepped);
    engine.drain();
    engine.resume();
    engine.drain();
    assert_eq!(engine.state().accumulated(), "abcd");
    assert_eq!(engine.checkpoints().entries(), &[0, 2, 4]);
    assert_eq!(engine.checkpoints().current_index(), 2);

    assert!(engine.rewind_one_checkpoint().is_applied());
    assert_eq!(engine.state().accumulated(), "ab");
    assert_eq!(engine.checkpoints().entries(), &[0, 2]);
    assert_eq!(engine.checkpoints().current_index(), 1);
    assert_eq!(log.len(), 4);

    // Forward again takes the same path and runs effects afresh
    engine.resume();
    engine.drain();
    assert_eq!(engine.state().accumulated(), "abcd");
    assert_eq!(engine.checkpoints().entries(), &[0, 2, 4]);
    assert_eq!(log.entries(), vec![0, 1, 2, 3, 2, 3]);

    engine.resume();
    engine.drain();
    assert!(engine.state().finished());
    assert_eq!(
        engine.rewind_one_checkpoint(),
        Control::Ignored(Ignored::Finished)
    );
}

#[test]
fn switching_to_continuous_from_a_checkpoint_runs_to_the_end() {
    let log = EffectLog::new();
    let shape: &[(u64, bool)] = &[(0, true), (0, true), (0, true), (0, false)];
    let mut engine = Engine::new(letters(shape, &log));

    engine.start(Mode::Stepped);
    engine.drain();
    assert_eq!(engine.state().cursor(), 1);

    engine.start(Mode::Continuous);
    engine.drain();
    assert!(engine.state().finished());
    assert_eq!(engine.checkpoints().entries(), &[0, 1]);
}

#[tokio::test(start_paused = true)]
async fn player_rewinds_between_boundaries() {
    let log = EffectLog::new();
    let shape: &[(u64, bool)] = &[(50, false), (50, true), (50, false), (50, true), (50, false)];
    let handle = Player::spawn(
        Engine::new(letters(shape, &log)),
        PlayerOptions::default(),
    );

    handle.start(Mode::Stepped);
    let first = handle.wait_until(|s| s.paused && s.cursor == 2).await.unwrap();
    assert_eq!(first.checkpoints, vec![0, 2]);

    handle.resume();
    let second = handle.wait_until(|s| s.paused && s.cursor == 4).await.unwrap();
    assert_eq!(second.accumulated, "abcd");
    assert_eq!(second.checkpoint_index, 2);

    handle.rewind();
    let rewound = handle.wait_until(|s| s.cursor == 2).await.unwrap();
    assert!(rewound.paused);
    assert!(!rewound.replaying);
    assert_eq!(rewound.accumulated, "ab");
    assert_eq!(rewound.checkpoints, vec![0, 2]);

    // Nothing moves while paused
    tokio::time::sleep(Duration::from_secs(2)).await;
    assert_eq!(handle.snapshot().cursor, 2);
    assert_eq!(log.len(), 4);

    handle.resume();
    handle.wait_until(|s| s.paused && s.cursor == 4).await.unwrap();
    handle.resume();
    let done = handle.wait_finished().await.unwrap();
    assert_eq!(done.accumulated, "abcde");
    assert_eq!(log.entries(), vec![0, 1, 2, 3, 2, 3, 4]);
    handle.shutdown();
}

#[tokio::test(start_paused = true)]
async fn demo_plan_plays_to_the_answer() {
    let (effects, mut visuals) = EffectSink::channel();
    let sequence = build_step_sequence(&DemoPlan::default(), effects).unwrap();
    let handle = Player::spawn(Engine::new(sequence), PlayerOptions::default().with_speed(0.0));

    handle.start(Mode::Continuous);
    let done = handle.wait_finished().await.unwrap();
    handle.shutdown();

    assert_eq!(done.accumulated.answer, "The capital of France is Paris.");
    assert_eq!(done.accumulated.prompt.as_deref(), Some("What is the capital of France"));
    assert!(done.accumulated.final_status);
    assert_eq!(done.length, 159);

    let mut finished = 0;
    while let Ok(visual) = visuals.try_recv() {
        if matches!(visual, Visual::Finished) {
            finished += 1;
        }
    }
    assert_eq!(finished, 1);
}

#[tokio::test(start_paused = true)]
async fn demo_plan_stepped_rewind_restores_transcript() {
    let sequence = build_step_sequence(&DemoPlan::default(), EffectSink::discard()).unwrap();
    let handle = Player::spawn(Engine::new(sequence), PlayerOptions::default().with_speed(0.0));

    handle.start(Mode::Stepped);
    let entered = handle.wait_until(|s| s.paused && s.checkpoint_index == 1).await.unwrap();
    assert!(entered.accumulated.prompt.is_some());
    assert!(entered.accumulated.answer.is_empty());

    handle.resume();
    let first_word = handle.wait_until(|s| s.paused && s.checkpoint_index == 2).await.unwrap();
    assert_eq!(first_word.accumulated.answer, "The");

    handle.rewind();
    let back = handle
        .wait_until(|s| s.paused && s.checkpoint_index == 1)
        .await
        .unwrap();
    assert_eq!(back.accumulated, entered.accumulated);
    assert_eq!(back.cursor, entered.cursor);
    handle.shutdown();
}

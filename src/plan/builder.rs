//! Turns a [`DemoPlan`] into the step sequence the engine plays.

use std::time::Duration;

use rand::Rng;
use serde::Serialize;
use tokio::sync::mpsc;

use super::rounds::{default_rounds, Round, DEFAULT_PROMPT};
use super::transcript::{Transcript, CANDIDATE_ROWS};
use crate::engine::{PlanError, Step, StepContext, StepSequence};

/// Delays between demo steps
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timing {
    pub typing: Duration,
    pub post_enter_pause: Duration,
    pub cycle_tick: Duration,
    /// Word-cycling ticks before the first round settles
    pub first_round_cycle_ticks: usize,
    /// Word-cycling ticks for every later round
    pub round_cycle_ticks: usize,
    pub settle_stagger: Duration,
    pub select_transfer: Duration,
    pub between_rounds: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            typing: Duration::from_millis(55),
            post_enter_pause: Duration::from_millis(400),
            cycle_tick: Duration::from_millis(110),
            first_round_cycle_ticks: 18,
            round_cycle_ticks: 10,
            settle_stagger: Duration::from_millis(240),
            select_transfer: Duration::from_millis(1200),
            between_rounds: Duration::from_millis(520),
        }
    }
}

/// Declarative description of the demo timeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoPlan {
    pub prompt: String,
    pub timing: Timing,
    /// The last round's top token ends generation instead of being appended
    pub rounds: Vec<Round>,
}

impl Default for DemoPlan {
    fn default() -> Self {
        Self {
            prompt: DEFAULT_PROMPT.to_string(),
            timing: Timing::default(),
            rounds: default_rounds(),
        }
    }
}

impl DemoPlan {
    pub fn validate(&self) -> Result<(), PlanError> {
        if self.prompt.is_empty() {
            return Err(PlanError::EmptyPrompt);
        }
        if self.rounds.is_empty() {
            return Err(PlanError::NoRounds);
        }
        for (round, r) in self.rounds.iter().enumerate() {
            if let Some(row) = r.cycle.iter().position(|words| words.is_empty()) {
                return Err(PlanError::EmptyCycle { round, row });
            }
        }
        Ok(())
    }
}

/// One star of a burst, as offsets from the burst centre.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Star {
    pub dx: f32,
    pub dy: f32,
    pub delay_ms: f32,
}

/// Observable effects emitted by live (non-replay) steps.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Visual {
    StarBurst { row: usize, stars: Vec<Star> },
    FlyingToken { token: String, chunk: String },
    Finished,
}

const BURST_STARS: usize = 12;

fn star_burst(row: usize) -> Visual {
    let mut rng = rand::rng();
    let stars = (0..BURST_STARS)
        .map(|i| {
            let angle = std::f32::consts::TAU * i as f32 / BURST_STARS as f32;
            let distance = 34.0 + rng.random::<f32>() * 26.0;
            Star {
                dx: angle.cos() * distance,
                dy: angle.sin() * distance,
                delay_ms: rng.random::<f32>() * 120.0,
            }
        })
        .collect();
    Visual::StarBurst { row, stars }
}

/// Where live steps send their [`Visual`]s.
#[derive(Debug, Clone, Default)]
pub struct EffectSink {
    tx: Option<mpsc::UnboundedSender<Visual>>,
}

impl EffectSink {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Visual>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx: Some(tx) }, rx)
    }

    /// A sink that drops everything
    pub fn discard() -> Self {
        Self { tx: None }
    }

    pub fn emit(&self, visual: Visual) {
        if let Some(tx) = &self.tx {
            let _ = tx.send(visual);
        }
    }
}

type Ctx<'a> = StepContext<'a, Transcript>;

/// Build the demo step sequence. Called once per configuration.
pub fn build_step_sequence(
    plan: &DemoPlan,
    effects: EffectSink,
) -> Result<StepSequence<Transcript>, PlanError> {
    plan.validate()?;
    let timing = &plan.timing;
    let mut steps: Vec<Step<Transcript>> = Vec::new();

    steps.push(
        Step::new(Duration::ZERO, |ctx: &mut Ctx<'_>| {
            ctx.accumulated_mut().typing = true;
        })
        .labeled("init_typing"),
    );

    for ch in plan.prompt.chars() {
        steps.push(
            Step::new(timing.typing, move |ctx: &mut Ctx<'_>| {
                ctx.accumulated_mut().input.push(ch);
            })
            .labeled("type_char"),
        );
    }

    let prompt = plan.prompt.clone();
    steps.push(
        Step::new(timing.post_enter_pause, move |ctx: &mut Ctx<'_>| {
            let t = ctx.accumulated_mut();
            t.prompt = Some(prompt.clone());
            t.input.clear();
            t.typing = false;
            t.cursor_visible = true;
        })
        .labeled("press_enter")
        .boundary(),
    );

    let last = plan.rounds.len() - 1;
    for (index, round) in plan.rounds.iter().copied().enumerate() {
        let ticks = if index == 0 {
            timing.first_round_cycle_ticks
        } else {
            timing.round_cycle_ticks
        };
        for tick in 0..ticks {
            steps.push(
                Step::new(timing.cycle_tick, move |ctx: &mut Ctx<'_>| {
                    cycle_words(ctx, &round, tick);
                })
                .labeled("cycle_words"),
            );
        }

        for row in 0..CANDIDATE_ROWS {
            steps.push(
                Step::new(timing.settle_stagger, move |ctx: &mut Ctx<'_>| {
                    let slot = &mut ctx.accumulated_mut().rows[row];
                    slot.token = round.tokens[row].to_string();
                    slot.bar = round.bars[row];
                })
                .labeled("settle_row"),
            );
        }

        if index == last {
            let sink = effects.clone();
            steps.push(
                Step::new(timing.select_transfer, move |ctx: &mut Ctx<'_>| {
                    select_end_of_sequence(ctx, &sink);
                })
                .labeled("select_eos"),
            );
            let sink = effects.clone();
            steps.push(
                Step::new(Duration::ZERO, move |ctx: &mut Ctx<'_>| {
                    ctx.live(|| sink.emit(Visual::Finished));
                })
                .labeled("finish"),
            );
        } else {
            let sink = effects.clone();
            steps.push(
                Step::new(timing.select_transfer, move |ctx: &mut Ctx<'_>| {
                    select_and_transfer(ctx, &sink);
                })
                .labeled("select_transfer")
                .boundary(),
            );
            steps.push(
                Step::new(timing.between_rounds, |ctx: &mut Ctx<'_>| {
                    let t = ctx.accumulated_mut();
                    t.fading = false;
                    t.clear_rows();
                })
                .labeled("prep_next_round"),
            );
        }
    }

    StepSequence::new(steps)
}

fn cycle_words(ctx: &mut Ctx<'_>, round: &Round, tick: usize) {
    let t = ctx.accumulated_mut();
    for (row, words) in round.cycle.iter().enumerate() {
        if let Some(word) = words.get(tick % words.len()) {
            t.rows[row].token = (*word).to_string();
        }
    }
}

fn choose_top_row(t: &mut Transcript) {
    t.chosen = Some(0);
    t.fading = true;
}

fn select_and_transfer(ctx: &mut Ctx<'_>, sink: &EffectSink) {
    let token = ctx.accumulated().rows[0].token.trim().to_string();
    if token.is_empty() {
        return;
    }

    let t = ctx.accumulated_mut();
    choose_top_row(t);
    let before = t.answer.len();
    t.append_token(&token);
    let chunk = t.answer[before..].to_string();

    ctx.live(|| {
        sink.emit(star_burst(0));
        sink.emit(Visual::FlyingToken { token, chunk });
    });
}

fn select_end_of_sequence(ctx: &mut Ctx<'_>, sink: &EffectSink) {
    let t = ctx.accumulated_mut();
    choose_top_row(t);
    t.cursor_visible = false;
    t.final_status = true;
    ctx.live(|| sink.emit(star_burst(0)));
}

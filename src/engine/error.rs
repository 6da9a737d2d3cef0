use thiserror::Error;

/// Construction-time faults in a step plan.
///
/// These are surfaced to whoever builds the plan; the engine itself only ever
/// receives a sequence that passed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    #[error("Step sequence is empty")]
    EmptySequence,
    #[error("Negative duration for {field}: {value}ms")]
    NegativeDuration { field: &'static str, value: i64 },
    #[error("Prompt is empty")]
    EmptyPrompt,
    #[error("Plan has no generation rounds")]
    NoRounds,
    #[error("Round {round} has no cycle words for row {row}")]
    EmptyCycle { round: usize, row: usize },
}

//! The token-generation demo: what the engine plays out of the box.
//!
//! A prompt is typed, submitted, and answered one token per round. Each round
//! flashes candidate words, settles three candidates with probability bars,
//! then moves the top one into the answer.

pub mod builder;
pub mod rounds;
pub mod transcript;

pub use builder::{build_step_sequence, DemoPlan, EffectSink, Star, Timing, Visual};
pub use rounds::{default_rounds, Round, DEFAULT_PROMPT, EOS};
pub use transcript::{answer_chunk, CandidateRow, Transcript, CANDIDATE_ROWS};

//! Deterministic step-timeline playback with checkpoint rewind.
//!
//! A [`StepSequence`] is walked one step per [`Engine::tick`]. In stepped mode
//! boundary steps pause playback and record a checkpoint; rewinding to a
//! checkpoint resets the state and silently replays history up to it.

pub mod checkpoint;
pub mod control;
pub mod error;
mod replay;
pub mod scheduler;
pub mod state;
pub mod step;

pub use checkpoint::CheckpointStore;
pub use control::{Continuation, Control, Ignored, TickOutcome};
pub use error::PlanError;
pub use scheduler::Engine;
pub use state::{Mode, PlaybackSnapshot, PlaybackState};
pub use step::{Step, StepAction, StepContext, StepSequence};

pub mod config;
pub mod engine;
pub mod plan;
pub mod render;
pub mod runtime;
pub mod util;

pub use config::Config;
pub use engine::{
    CheckpointStore, Control, Engine, Ignored, Mode, PlanError, PlaybackSnapshot, Step,
    StepContext, StepSequence, TickOutcome,
};
pub use plan::{build_step_sequence, DemoPlan, EffectSink, Transcript, Visual};
pub use runtime::{Player, PlayerHandle, PlayerOptions};

use std::time::Duration;

/// Result of a control operation.
///
/// Invalid transitions leave state untouched and report why; callers are free
/// to drop the reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Applied,
    Ignored(Ignored),
}

impl Control {
    pub fn is_applied(&self) -> bool {
        matches!(self, Control::Applied)
    }
}

/// Why a control operation was a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ignored {
    AlreadyRunning,
    AlreadyPaused,
    NotRunning,
    NotPaused,
    Finished,
    NoEarlierCheckpoint,
    UnknownCheckpoint,
}

impl Ignored {
    pub fn as_str(&self) -> &'static str {
        match self {
            Ignored::AlreadyRunning => "already running",
            Ignored::AlreadyPaused => "already paused",
            Ignored::NotRunning => "not running",
            Ignored::NotPaused => "not paused",
            Ignored::Finished => "finished",
            Ignored::NoEarlierCheckpoint => "no earlier checkpoint",
            Ignored::UnknownCheckpoint => "unknown checkpoint",
        }
    }
}

/// The single scheduled resumption of `tick`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Continuation {
    pub id: u64,
    pub delay: Duration,
}

/// What a call to `tick` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// A step ran and the next tick is due after the continuation's delay
    Scheduled(Continuation),
    /// A boundary step ran in stepped mode; playback paused at `cursor`
    AutoPaused { cursor: usize },
    /// The last step ran
    Finished,
    /// Preconditions not met; nothing ran
    Idle,
}

impl TickOutcome {
    pub fn ran_step(&self) -> bool {
        !matches!(self, TickOutcome::Idle)
    }
}

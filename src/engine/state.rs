use serde::{Deserialize, Serialize};

/// Whether boundary steps auto-pause playback.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    /// Run to completion, ignoring boundaries
    #[default]
    Continuous,
    /// Pause and checkpoint after every boundary step
    Stepped,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Continuous => "continuous",
            Mode::Stepped => "stepped",
        }
    }
}

/// The single mutable record describing where playback is.
#[derive(Debug, Clone)]
pub struct PlaybackState<S> {
    pub(super) running: bool,
    pub(super) paused: bool,
    pub(super) finished: bool,
    pub(super) mode: Mode,
    pub(super) cursor: usize,
    pub(super) replaying: bool,
    pub(super) accumulated: S,
}

impl<S: Default> PlaybackState<S> {
    /// Fully initial values, keeping only the mode.
    pub(super) fn initial(mode: Mode) -> Self {
        Self {
            running: false,
            paused: false,
            finished: false,
            mode,
            cursor: 0,
            replaying: false,
            accumulated: S::default(),
        }
    }
}

impl<S> PlaybackState<S> {
    pub fn running(&self) -> bool {
        self.running
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    pub fn finished(&self) -> bool {
        self.finished
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Index of the next step to execute
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn replaying(&self) -> bool {
        self.replaying
    }

    pub fn accumulated(&self) -> &S {
        &self.accumulated
    }
}

/// Read-only copy of the playback state handed to the UI layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaybackSnapshot<S> {
    pub running: bool,
    pub paused: bool,
    pub finished: bool,
    pub mode: Mode,
    pub cursor: usize,
    /// Number of steps in the loaded sequence
    pub length: usize,
    pub replaying: bool,
    pub checkpoints: Vec<usize>,
    pub checkpoint_index: usize,
    pub accumulated: S,
}

impl<S> PlaybackSnapshot<S> {
    pub fn can_start(&self) -> bool {
        !self.running || self.finished
    }

    pub fn can_pause(&self) -> bool {
        self.running && !self.paused && !self.finished
    }

    pub fn can_resume(&self) -> bool {
        self.paused && !self.finished
    }

    pub fn can_rewind(&self) -> bool {
        self.paused && self.checkpoint_index > 0 && !self.finished
    }
}

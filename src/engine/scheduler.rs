//! Forward playback: the engine, its control surface, and `tick`.
//!
//! The engine never sleeps. Each executed step leaves behind at most one
//! pending [`Continuation`]; whoever owns the engine waits out its delay and
//! hands the id back through [`Engine::fire`]. Pausing, rewinding and resetting
//! drop the pending continuation, so a timer that fires late runs nothing.

use std::time::Duration;

use tracing::{debug, info};

use super::checkpoint::CheckpointStore;
use super::control::{Continuation, Control, Ignored, TickOutcome};
use super::state::{Mode, PlaybackSnapshot, PlaybackState};
use super::step::{StepContext, StepSequence};

pub struct Engine<S> {
    pub(super) sequence: StepSequence<S>,
    pub(super) state: PlaybackState<S>,
    pub(super) checkpoints: CheckpointStore,
    pub(super) pending: Option<Continuation>,
    next_continuation: u64,
}

impl<S: Default> Engine<S> {
    pub fn new(sequence: StepSequence<S>) -> Self {
        Self {
            sequence,
            state: PlaybackState::initial(Mode::default()),
            checkpoints: CheckpointStore::new(),
            pending: None,
            next_continuation: 1,
        }
    }

    /// Swap in a new configuration's sequence. Implies `reset`.
    pub fn load(&mut self, sequence: StepSequence<S>) {
        self.sequence = sequence;
        self.reset();
    }

    /// Back to the initial state. Safe to call at any time.
    pub fn reset(&mut self) {
        self.pending = None;
        self.state = PlaybackState::initial(self.state.mode);
        self.checkpoints.reset();
        info!(steps = self.sequence.len(), "Playback reset");
    }

    /// Begin (or resume) playback under `mode`.
    ///
    /// A finished timeline is reset first. A timeline that is already running
    /// and not paused is left alone.
    pub fn start(&mut self, mode: Mode) -> Control {
        if self.state.finished {
            self.reset();
        } else if self.state.running && !self.state.paused {
            return self.ignore("start", Ignored::AlreadyRunning);
        }

        self.state.mode = mode;
        self.state.running = true;
        self.state.paused = false;
        self.arm(Duration::ZERO);
        info!(mode = mode.as_str(), cursor = self.state.cursor, "Playback started");
        Control::Applied
    }

    pub fn pause(&mut self) -> Control {
        if self.state.finished {
            return self.ignore("pause", Ignored::Finished);
        }
        if !self.state.running {
            return self.ignore("pause", Ignored::NotRunning);
        }
        if self.state.paused {
            return self.ignore("pause", Ignored::AlreadyPaused);
        }

        self.state.paused = true;
        self.pending = None;
        debug!(cursor = self.state.cursor, "Playback paused");
        Control::Applied
    }

    pub fn resume(&mut self) -> Control {
        if self.state.finished {
            return self.ignore("resume", Ignored::Finished);
        }
        if !self.state.running {
            return self.ignore("resume", Ignored::NotRunning);
        }
        if !self.state.paused {
            return self.ignore("resume", Ignored::NotPaused);
        }

        self.state.paused = false;
        self.arm(Duration::ZERO);
        debug!(cursor = self.state.cursor, "Playback resumed");
        Control::Applied
    }

    /// Pause when playing, resume when paused.
    pub fn toggle_pause(&mut self) -> Control {
        if self.state.paused {
            self.resume()
        } else {
            self.pause()
        }
    }

    /// Execute the step at the cursor.
    ///
    /// This is the only place forward progress happens. The step's action
    /// always runs to completion before anything else can observe the engine.
    pub fn tick(&mut self) -> TickOutcome {
        let state = &self.state;
        if !state.running || state.paused || state.finished || state.cursor >= self.sequence.len()
        {
            return TickOutcome::Idle;
        }

        self.pending = None;
        let Some(index) = self.execute_next() else {
            return TickOutcome::Idle;
        };
        let (delay, boundary) = match self.sequence.get(index) {
            Some(step) => (step.duration(), step.is_boundary()),
            None => return TickOutcome::Idle,
        };

        if self.state.cursor == self.sequence.len() {
            self.state.finished = true;
            self.state.running = false;
            self.state.paused = false;
            info!(steps = self.sequence.len(), "Playback finished");
            return TickOutcome::Finished;
        }

        if boundary && self.state.mode == Mode::Stepped {
            self.state.paused = true;
            self.checkpoints.record(self.state.cursor);
            debug!(
                cursor = self.state.cursor,
                checkpoint = self.checkpoints.current_index(),
                "Paused at boundary"
            );
            return TickOutcome::AutoPaused {
                cursor: self.state.cursor,
            };
        }

        TickOutcome::Scheduled(self.arm(delay))
    }

    /// Run `tick` if `id` is still the pending continuation.
    pub fn fire(&mut self, id: u64) -> TickOutcome {
        match self.pending {
            Some(pending) if pending.id == id => self.tick(),
            _ => {
                debug!(id, "Dropping stale continuation");
                TickOutcome::Idle
            }
        }
    }

    /// Fire continuations back to back, ignoring their delays, until playback
    /// pauses or finishes. Returns the number of steps executed.
    pub fn drain(&mut self) -> usize {
        let mut executed = 0;
        while let Some(pending) = self.pending {
            if self.fire(pending.id).ran_step() {
                executed += 1;
            }
        }
        executed
    }

    /// Read step at the cursor, advance the cursor, then run the action.
    pub(super) fn execute_next(&mut self) -> Option<usize> {
        let index = self.state.cursor;
        let step = self.sequence.get(index)?;
        self.state.cursor += 1;
        let mut ctx = StepContext::new(index, self.state.replaying, &mut self.state.accumulated);
        step.run(&mut ctx);
        Some(index)
    }

    fn arm(&mut self, delay: Duration) -> Continuation {
        let continuation = Continuation {
            id: self.next_continuation,
            delay,
        };
        self.next_continuation += 1;
        self.pending = Some(continuation);
        continuation
    }

    pub(super) fn ignore(&self, operation: &'static str, reason: Ignored) -> Control {
        debug!(
            operation,
            reason = reason.as_str(),
            cursor = self.state.cursor,
            "Ignoring control operation"
        );
        Control::Ignored(reason)
    }
}

impl<S> Engine<S> {
    pub fn state(&self) -> &PlaybackState<S> {
        &self.state
    }

    pub fn checkpoints(&self) -> &CheckpointStore {
        &self.checkpoints
    }

    pub fn sequence(&self) -> &StepSequence<S> {
        &self.sequence
    }

    /// The scheduled resumption, if one is outstanding
    pub fn pending(&self) -> Option<Continuation> {
        self.pending
    }

    pub fn can_start(&self) -> bool {
        !self.state.running || self.state.finished
    }

    pub fn can_pause(&self) -> bool {
        self.state.running && !self.state.paused && !self.state.finished
    }

    pub fn can_resume(&self) -> bool {
        self.state.paused && !self.state.finished
    }

    pub fn can_rewind(&self) -> bool {
        self.state.paused && self.checkpoints.current_index() > 0 && !self.state.finished
    }
}

impl<S: Clone> Engine<S> {
    pub fn snapshot(&self) -> PlaybackSnapshot<S> {
        PlaybackSnapshot {
            running: self.state.running,
            paused: self.state.paused,
            finished: self.state.finished,
            mode: self.state.mode,
            cursor: self.state.cursor,
            length: self.sequence.len(),
            replaying: self.state.replaying,
            checkpoints: self.checkpoints.entries().to_vec(),
            checkpoint_index: self.checkpoints.current_index(),
            accumulated: self.state.accumulated.clone(),
        }
    }
}

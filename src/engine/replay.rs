//! Rewind by deterministic re-execution.
//!
//! No state snapshots are kept. Rewinding resets the playback state and runs
//! every step before the target checkpoint again with `replaying` set, which
//! suppresses each action's observable effects. The accumulated aggregate is
//! only reproduced faithfully if every action mutates it deterministically.

use tracing::info;

use super::control::{Control, Ignored};
use super::scheduler::Engine;
use super::state::PlaybackState;

impl<S: Default> Engine<S> {
    /// Rewind to the checkpoint at `target_index`.
    ///
    /// Only allowed while paused, before the timeline finishes, and for a
    /// checkpoint at or before the current one. Checkpoints after the target
    /// are discarded.
    pub fn rewind(&mut self, target_index: usize) -> Control {
        if self.state.finished {
            return self.ignore("rewind", Ignored::Finished);
        }
        if !self.state.running || !self.state.paused {
            return self.ignore("rewind", Ignored::NotPaused);
        }
        if target_index > self.checkpoints.current_index() {
            return self.ignore("rewind", Ignored::UnknownCheckpoint);
        }
        let Some(target_cursor) = self.checkpoints.get(target_index) else {
            return self.ignore("rewind", Ignored::UnknownCheckpoint);
        };

        self.pending = None;
        let mode = self.state.mode;
        self.state = PlaybackState::initial(mode);
        self.state.running = true;
        self.state.paused = true;

        self.state.replaying = true;
        let mut replayed = 0usize;
        while self.state.cursor < target_cursor {
            if self.execute_next().is_none() {
                break;
            }
            replayed += 1;
        }
        self.state.replaying = false;

        self.checkpoints.truncate_after(target_index);
        info!(
            checkpoint = target_index,
            cursor = target_cursor,
            replayed,
            "Rewound playback"
        );
        Control::Applied
    }

    /// Rewind to the checkpoint before the current one.
    pub fn rewind_one_checkpoint(&mut self) -> Control {
        match self.checkpoints.previous(self.checkpoints.current_index()) {
            Some(target) => self.rewind(target),
            None => self.ignore("rewind", Ignored::NoEarlierCheckpoint),
        }
    }
}

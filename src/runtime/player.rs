//! Background task that drives an [`Engine`] in wall-clock time.
//!
//! The task is the engine's only owner. UI code talks to it through a
//! [`PlayerHandle`]: commands go in over an unbounded channel and a fresh
//! [`PlaybackSnapshot`] comes back on a watch channel after every change.

use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::time::Instant;
use tracing::{debug, Instrument};
use uuid::Uuid;

use crate::engine::{Control, Engine, Mode, PlaybackSnapshot, StepSequence, TickOutcome};

/// Longest wall-clock wait for a single step, whatever the speed
pub const MAX_STEP_WAIT: Duration = Duration::from_secs(24 * 60 * 60);

/// Options for a spawned player
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerOptions {
    /// Playback rate. `2.0` halves every delay; `0.0` skips waiting entirely.
    pub speed: f64,
}

impl Default for PlayerOptions {
    fn default() -> Self {
        Self { speed: 1.0 }
    }
}

impl PlayerOptions {
    pub fn with_speed(mut self, speed: f64) -> Self {
        self.speed = speed;
        self
    }

    /// Wall-clock wait for a declared step delay, capped at [`MAX_STEP_WAIT`]
    pub fn scale(&self, delay: Duration) -> Duration {
        if !(self.speed.is_finite() && self.speed > 0.0) {
            return Duration::ZERO;
        }
        Duration::try_from_secs_f64(delay.as_secs_f64() / self.speed)
            .map_or(MAX_STEP_WAIT, |wait| wait.min(MAX_STEP_WAIT))
    }
}

/// Commands accepted by the player task
pub enum PlayerCommand<S> {
    Start(Mode),
    Pause,
    Resume,
    TogglePause,
    Rewind,
    Reset,
    Load(StepSequence<S>),
    Shutdown,
}

/// Handle for controlling and observing a running player
pub struct PlayerHandle<S> {
    id: Uuid,
    cmd_tx: mpsc::UnboundedSender<PlayerCommand<S>>,
    state_rx: watch::Receiver<PlaybackSnapshot<S>>,
}

impl<S> Clone for PlayerHandle<S> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            cmd_tx: self.cmd_tx.clone(),
            state_rx: self.state_rx.clone(),
        }
    }
}

impl<S: Clone> PlayerHandle<S> {
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Send a command; returns false if the player has shut down
    pub fn send(&self, cmd: PlayerCommand<S>) -> bool {
        self.cmd_tx.send(cmd).is_ok()
    }

    pub fn start(&self, mode: Mode) -> bool {
        self.send(PlayerCommand::Start(mode))
    }

    pub fn pause(&self) -> bool {
        self.send(PlayerCommand::Pause)
    }

    pub fn resume(&self) -> bool {
        self.send(PlayerCommand::Resume)
    }

    pub fn toggle_pause(&self) -> bool {
        self.send(PlayerCommand::TogglePause)
    }

    pub fn rewind(&self) -> bool {
        self.send(PlayerCommand::Rewind)
    }

    pub fn reset(&self) -> bool {
        self.send(PlayerCommand::Reset)
    }

    pub fn load(&self, sequence: StepSequence<S>) -> bool {
        self.send(PlayerCommand::Load(sequence))
    }

    pub fn shutdown(&self) -> bool {
        self.send(PlayerCommand::Shutdown)
    }

    /// Latest published snapshot
    pub fn snapshot(&self) -> PlaybackSnapshot<S> {
        self.state_rx.borrow().clone()
    }

    /// A receiver that is notified on every published snapshot
    pub fn subscribe(&self) -> watch::Receiver<PlaybackSnapshot<S>> {
        self.state_rx.clone()
    }

    /// Wait for the first snapshot (current one included) matching `predicate`.
    /// Returns `None` if the player stops first.
    pub async fn wait_until<F>(&self, mut predicate: F) -> Option<PlaybackSnapshot<S>>
    where
        F: FnMut(&PlaybackSnapshot<S>) -> bool,
    {
        let mut rx = self.state_rx.clone();
        let snapshot = rx.wait_for(|snapshot| predicate(snapshot)).await.ok()?;
        Some(snapshot.clone())
    }

    pub async fn wait_finished(&self) -> Option<PlaybackSnapshot<S>> {
        self.wait_until(|snapshot| snapshot.finished).await
    }
}

#[derive(Debug, Clone, Copy)]
struct Armed {
    id: u64,
    deadline: Instant,
}

pub struct Player<S> {
    id: Uuid,
    engine: Engine<S>,
    options: PlayerOptions,
    cmd_rx: mpsc::UnboundedReceiver<PlayerCommand<S>>,
    state_tx: watch::Sender<PlaybackSnapshot<S>>,
    armed: Option<Armed>,
}

impl<S> Player<S>
where
    S: Default + Clone + Send + Sync + 'static,
{
    /// Spawn the player task and return a handle to control it
    pub fn spawn(engine: Engine<S>, options: PlayerOptions) -> PlayerHandle<S> {
        let id = Uuid::new_v4();
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (state_tx, state_rx) = watch::channel(engine.snapshot());

        let player = Self {
            id,
            engine,
            options,
            cmd_rx,
            state_tx,
            armed: None,
        };

        let span = tracing::info_span!("player", %id);
        tokio::spawn(player.run().instrument(span));

        PlayerHandle {
            id,
            cmd_tx,
            state_rx,
        }
    }

    async fn run(mut self) {
        loop {
            self.sync_timer();
            let deadline = self.armed.map(|armed| armed.deadline);

            tokio::select! {
                cmd = self.cmd_rx.recv() => {
                    match cmd {
                        Some(PlayerCommand::Shutdown) | None => break,
                        Some(cmd) => self.apply(cmd),
                    }
                }
                _ = sleep_until(deadline) => {
                    if let Some(armed) = self.armed.take() {
                        let outcome = self.engine.fire(armed.id);
                        if let TickOutcome::AutoPaused { cursor } = outcome {
                            debug!(cursor, "Player paused at boundary");
                        }
                    }
                }
            }

            self.state_tx.send_replace(self.engine.snapshot());
        }
        debug!(id = %self.id, "Player stopped");
    }

    fn apply(&mut self, cmd: PlayerCommand<S>) {
        let control = match cmd {
            PlayerCommand::Start(mode) => self.engine.start(mode),
            PlayerCommand::Pause => self.engine.pause(),
            PlayerCommand::Resume => self.engine.resume(),
            PlayerCommand::TogglePause => self.engine.toggle_pause(),
            PlayerCommand::Rewind => self.engine.rewind_one_checkpoint(),
            PlayerCommand::Reset => {
                self.engine.reset();
                Control::Applied
            }
            PlayerCommand::Load(sequence) => {
                self.engine.load(sequence);
                Control::Applied
            }
            PlayerCommand::Shutdown => Control::Applied,
        };
        if let Control::Ignored(reason) = control {
            debug!(reason = reason.as_str(), "Player command ignored");
        }
    }

    /// Keep the single armed timer in step with the engine's pending continuation.
    fn sync_timer(&mut self) {
        self.armed = match (self.engine.pending(), self.armed) {
            (Some(pending), Some(armed)) if pending.id == armed.id => Some(armed),
            (Some(pending), _) => Some(Armed {
                id: pending.id,
                deadline: Instant::now() + self.options.scale(pending.delay),
            }),
            (None, _) => None,
        };
    }
}

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

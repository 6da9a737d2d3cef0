//! Steps and the immutable sequence the scheduler walks.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use super::error::PlanError;

/// Procedure run when a step executes.
pub type StepAction<S> = Arc<dyn Fn(&mut StepContext<'_, S>) + Send + Sync>;

/// What a step action is allowed to see while it runs.
///
/// Actions get the accumulated aggregate and the replay flag, never the engine,
/// so they cannot drive the scheduler from inside a step.
pub struct StepContext<'a, S> {
    index: usize,
    replaying: bool,
    accumulated: &'a mut S,
}

impl<'a, S> StepContext<'a, S> {
    pub fn new(index: usize, replaying: bool, accumulated: &'a mut S) -> Self {
        Self {
            index,
            replaying,
            accumulated,
        }
    }

    /// Index of the step being executed
    pub fn index(&self) -> usize {
        self.index
    }

    /// True while history is being silently re-executed
    pub fn replaying(&self) -> bool {
        self.replaying
    }

    pub fn accumulated(&self) -> &S {
        self.accumulated
    }

    pub fn accumulated_mut(&mut self) -> &mut S {
        self.accumulated
    }

    /// Run an observable effect. Skipped entirely during replay.
    pub fn live(&self, effect: impl FnOnce()) {
        if !self.replaying {
            effect();
        }
    }
}

/// One timed unit of the timeline.
pub struct Step<S> {
    duration: Duration,
    boundary: bool,
    label: &'static str,
    action: StepAction<S>,
}

impl<S> Step<S> {
    pub fn new<F>(duration: Duration, action: F) -> Self
    where
        F: Fn(&mut StepContext<'_, S>) + Send + Sync + 'static,
    {
        Self {
            duration,
            boundary: false,
            label: "step",
            action: Arc::new(action),
        }
    }

    /// Mark this step as a natural pause point for stepped playback
    pub fn boundary(mut self) -> Self {
        self.boundary = true;
        self
    }

    pub fn labeled(mut self, label: &'static str) -> Self {
        self.label = label;
        self
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn is_boundary(&self) -> bool {
        self.boundary
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn run(&self, ctx: &mut StepContext<'_, S>) {
        (self.action)(ctx);
    }
}

impl<S> Clone for Step<S> {
    fn clone(&self) -> Self {
        Self {
            duration: self.duration,
            boundary: self.boundary,
            label: self.label,
            action: Arc::clone(&self.action),
        }
    }
}

impl<S> fmt::Debug for Step<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Step")
            .field("label", &self.label)
            .field("duration", &self.duration)
            .field("boundary", &self.boundary)
            .finish_non_exhaustive()
    }
}

/// Ordered, immutable list of steps built once per configuration.
///
/// Cloning shares the underlying steps.
pub struct StepSequence<S> {
    steps: Arc<[Step<S>]>,
}

impl<S> StepSequence<S> {
    pub fn new(steps: Vec<Step<S>>) -> Result<Self, PlanError> {
        if steps.is_empty() {
            return Err(PlanError::EmptySequence);
        }
        Ok(Self {
            steps: steps.into(),
        })
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Always false for a validated sequence
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Step<S>> {
        self.steps.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Step<S>> {
        self.steps.iter()
    }

    /// Sum of all declared step delays
    pub fn total_duration(&self) -> Duration {
        self.steps.iter().map(Step::duration).sum()
    }

    pub fn boundary_count(&self) -> usize {
        self.steps.iter().filter(|step| step.is_boundary()).count()
    }
}

impl<S> Clone for StepSequence<S> {
    fn clone(&self) -> Self {
        Self {
            steps: Arc::clone(&self.steps),
        }
    }
}

impl<S> fmt::Debug for StepSequence<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepSequence")
            .field("len", &self.steps.len())
            .field("boundaries", &self.boundary_count())
            .finish()
    }
}

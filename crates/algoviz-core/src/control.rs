//! Run controller: the session's run state and the commands that change it.
//!
//! The controller is shared (`Arc`) between whoever issues commands and the
//! run being driven. Runs never read the flags directly; they hold a
//! [`RunToken`] and ask the controller at each checkpoint whether they may
//! continue. Each `start` bumps a generation counter, so a run left over from
//! an earlier start sees its token go stale and aborts.

use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::catalog::{Family, RunKind};
use crate::config::clamp_step;
use crate::error::Cancelled;

/// Lifecycle of the session's current run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    /// Steps proceed.
    Running,
    /// Steps are frozen at their next checkpoint.
    Paused,
    /// Terminal until the next `start`.
    Stopped,
}

/// Proof that a run was started; checked at every checkpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunToken {
    generation: u64,
    kind: RunKind,
}

impl RunToken {
    /// Generation this token was issued for.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Kind of run this token belongs to.
    pub fn kind(&self) -> RunKind {
        self.kind
    }
}

#[derive(Debug)]
struct Inner {
    state: RunState,
    generation: u64,
    active: Option<RunKind>,
    step: Duration,
}

/// Shared run state for one visualization session.
#[derive(Debug)]
pub struct RunController {
    inner: Mutex<Inner>,
}

impl Default for RunController {
    fn default() -> Self {
        Self::new()
    }
}

impl RunController {
    /// Create a controller with nothing running and no step delay.
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                state: RunState::Stopped,
                generation: 0,
                active: None,
                step: Duration::ZERO,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // Inner is plain data; a panic elsewhere cannot leave it half-written.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Begin a new run. Clears `stopped` and `paused` and invalidates every
    /// token issued before.
    pub fn start(&self, kind: RunKind) -> RunToken {
        let mut inner = self.lock();
        inner.generation += 1;
        inner.state = RunState::Running;
        inner.active = Some(kind);
        tracing::debug!(generation = inner.generation, %kind, "run started");
        RunToken {
            generation: inner.generation,
            kind,
        }
    }

    /// Invalidate the active run's token without touching the run state.
    ///
    /// The stale run aborts silently at its next checkpoint. Used before
    /// handing the session to a new run.
    pub fn supersede(&self) -> u64 {
        let mut inner = self.lock();
        inner.generation += 1;
        inner.active = None;
        inner.generation
    }

    /// Pause the current run. Returns false if nothing was running.
    pub fn pause(&self) -> bool {
        let mut inner = self.lock();
        if inner.state == RunState::Running {
            inner.state = RunState::Paused;
            true
        } else {
            false
        }
    }

    /// Resume a paused run. Returns false if the run was not paused.
    pub fn resume(&self) -> bool {
        let mut inner = self.lock();
        if inner.state == RunState::Paused {
            inner.state = RunState::Running;
            true
        } else {
            false
        }
    }

    /// Flip between paused and running; a stopped session stays stopped.
    pub fn toggle_pause(&self) -> RunState {
        let mut inner = self.lock();
        inner.state = match inner.state {
            RunState::Running => RunState::Paused,
            RunState::Paused => RunState::Running,
            RunState::Stopped => RunState::Stopped,
        };
        inner.state
    }

    /// Stop the session. Returns the family of the run that was active, so
    /// the caller can apply that family's visual reset.
    pub fn stop(&self) -> Option<Family> {
        let mut inner = self.lock();
        inner.state = RunState::Stopped;
        inner.active.map(RunKind::family)
    }

    /// Mark a run as finished. Ignored for stale tokens.
    pub fn finish(&self, token: &RunToken) {
        let mut inner = self.lock();
        if inner.generation == token.generation {
            inner.active = None;
        }
    }

    /// Delay between animation steps. Read at every step, so a change
    /// applies to the run in progress.
    pub fn step(&self) -> Duration {
        self.lock().step
    }

    /// Set the step delay as is.
    pub fn set_step(&self, step: Duration) {
        self.lock().step = step;
    }

    /// Set the step delay from a user control, clamped to 10..=500 ms.
    /// Returns the delay applied.
    pub fn set_step_delay_ms(&self, ms: u64) -> u64 {
        let ms = clamp_step(ms);
        self.set_step(Duration::from_millis(ms));
        tracing::debug!(step_delay_ms = ms, "step delay changed");
        ms
    }

    /// Current run state.
    pub fn state(&self) -> RunState {
        self.lock().state
    }

    /// Current generation.
    pub fn generation(&self) -> u64 {
        self.lock().generation
    }

    /// The run currently holding the session, if any.
    pub fn active(&self) -> Option<RunKind> {
        self.lock().active
    }

    /// Checkpoint test: may the run holding `token` proceed?
    ///
    /// Returns the current state (`Running` or `Paused`) or the reason the
    /// run must be abandoned.
    pub fn check(&self, token: &RunToken) -> Result<RunState, Cancelled> {
        let inner = self.lock();
        if inner.generation != token.generation {
            return Err(Cancelled::Superseded);
        }
        match inner.state {
            RunState::Stopped => Err(Cancelled::Stopped),
            state => Ok(state),
        }
    }

    /// Snapshot for status reporting.
    pub fn status(&self) -> ControlStatus {
        let inner = self.lock();
        ControlStatus {
            state: inner.state,
            generation: inner.generation,
            active: inner.active,
            step_delay_ms: inner.step.as_millis() as u64,
        }
    }
}

/// Controller status for sending to a frontend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlStatus {
    pub state: RunState,
    pub generation: u64,
    pub active: Option<RunKind>,
    pub step_delay_ms: u64,
}

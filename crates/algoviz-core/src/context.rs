//! Per-run context handed to every algorithm step.

use std::sync::Arc;
use std::time::Duration;

use crate::catalog::RunKind;
use crate::control::{RunController, RunToken};
use crate::error::Result;
use crate::graph::Graph;
use crate::pacer;
use crate::port::{Emphasis, RenderPort};

/// Everything a running algorithm may touch besides its data: the
/// controller and token for checkpoints, and the port.
#[derive(Clone)]
pub struct RunContext {
    control: Arc<RunController>,
    token: RunToken,
    port: Arc<dyn RenderPort>,
}

impl RunContext {
    /// Start a run of `kind` on `control` and build its context.
    pub fn start(control: Arc<RunController>, kind: RunKind, port: Arc<dyn RenderPort>) -> Self {
        let token = control.start(kind);
        Self {
            control,
            token,
            port,
        }
    }

    /// The run's token.
    pub fn token(&self) -> &RunToken {
        &self.token
    }

    /// The run's kind.
    pub fn kind(&self) -> RunKind {
        self.token.kind()
    }

    /// Current delay between steps.
    pub fn step(&self) -> Duration {
        self.control.step()
    }

    /// The rendering port.
    pub fn port(&self) -> &dyn RenderPort {
        self.port.as_ref()
    }

    /// Checkpoint without sleeping.
    pub fn check(&self) -> Result<()> {
        self.control.check(&self.token)?;
        Ok(())
    }

    /// Cancellable delay of one step.
    pub async fn tick(&self) -> Result<()> {
        self.delay(self.step()).await
    }

    /// Cancellable delay of `duration`.
    pub async fn delay(&self, duration: Duration) -> Result<()> {
        pacer::delay(&self.control, &self.token, duration).await?;
        Ok(())
    }

    /// Uncancellable pause used by presentation passes that must run to the
    /// end once started.
    pub async fn hold(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }

    /// Draw the sequence with `highlighted` emphasized, then wait one step.
    pub async fn show_sequence(
        &self,
        values: &[f64],
        highlighted: &[usize],
        emphasis: Emphasis,
    ) -> Result<()> {
        self.port.render_sequence(values, highlighted, emphasis);
        self.tick().await
    }

    /// Draw the graph with its current tags, then wait one step.
    pub async fn show_graph(&self, graph: &Graph) -> Result<()> {
        self.port.render_graph(graph.nodes(), graph.edges());
        self.tick().await
    }

    /// Release the session if this run still owns it.
    pub fn finish(&self) {
        self.control.finish(&self.token);
    }
}

impl std::fmt::Debug for RunContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunContext")
            .field("token", &self.token)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Cancelled, Error};
    use crate::port::{Frame, FrameLog};

    #[tokio::test(start_paused = true)]
    async fn show_sequence_renders_then_waits() {
        let control = Arc::new(RunController::new());
        control.set_step(Duration::from_millis(20));
        let log = Arc::new(FrameLog::new());
        let ctx = RunContext::start(control, RunKind::Bubble, log.clone());

        let began = tokio::time::Instant::now();
        ctx.show_sequence(&[2.0, 1.0], &[0, 1], Emphasis::Compare)
            .await
            .unwrap();

        assert_eq!(began.elapsed(), Duration::from_millis(20));
        assert!(matches!(log.last(), Some(Frame::Sequence { .. })));
    }

    #[tokio::test(start_paused = true)]
    async fn step_change_applies_to_next_tick() {
        let control = Arc::new(RunController::new());
        control.set_step(Duration::from_millis(200));
        let ctx = RunContext::start(control.clone(), RunKind::Quick, Arc::new(FrameLog::new()));

        let began = tokio::time::Instant::now();
        ctx.tick().await.unwrap();
        control.set_step_delay_ms(10);
        ctx.tick().await.unwrap();

        assert_eq!(began.elapsed(), Duration::from_millis(210));
    }

    #[tokio::test]
    async fn stopped_context_fails_checkpoints() {
        let control = Arc::new(RunController::new());
        let ctx = RunContext::start(control.clone(), RunKind::Linear, Arc::new(FrameLog::new()));
        control.stop();

        assert!(matches!(ctx.check(), Err(Error::Cancelled(Cancelled::Stopped))));
        assert!(ctx.tick().await.unwrap_err().is_cancelled());
    }

    #[tokio::test]
    async fn finish_releases_session() {
        let control = Arc::new(RunController::new());
        let ctx = RunContext::start(control.clone(), RunKind::Jump, Arc::new(FrameLog::new()));
        assert_eq!(control.active(), Some(RunKind::Jump));
        ctx.finish();
        assert_eq!(control.active(), None);
    }
}

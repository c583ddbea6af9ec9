//! Delay/interrupt primitive.
//!
//! [`delay`] is the only point where a run suspends and the only point where
//! it can be cancelled. The requested duration is slept in
//! [`CHECK_INTERVAL`] slices so stop and pause are noticed within one slice.
//! While paused, elapsed time is not accounted: the run waits in
//! [`PAUSE_POLL`] steps and then sleeps whatever remained of its delay.

use std::time::Duration;

use tokio::time::sleep;

use crate::control::{RunController, RunState, RunToken};
use crate::error::Cancelled;

/// Granularity of stop/pause checks inside a delay.
pub const CHECK_INTERVAL: Duration = Duration::from_millis(10);

/// Poll period while a run is paused.
pub const PAUSE_POLL: Duration = Duration::from_millis(100);

/// Suspend the run holding `token` for about `duration`.
///
/// Fails with [`Cancelled`] as soon as the session is stopped or the token
/// goes stale, including at entry and while paused.
pub async fn delay(
    control: &RunController,
    token: &RunToken,
    duration: Duration,
) -> Result<(), Cancelled> {
    let mut elapsed = Duration::ZERO;
    loop {
        if control.check(token)? == RunState::Paused {
            wait_while_paused(control, token).await?;
        }
        // Also reached after the final slice.
        if elapsed >= duration {
            return Ok(());
        }
        let slice = CHECK_INTERVAL.min(duration - elapsed);
        sleep(slice).await;
        elapsed += slice;
    }
}

/// Park until the run is resumed, stopped, or superseded.
async fn wait_while_paused(control: &RunController, token: &RunToken) -> Result<(), Cancelled> {
    while control.check(token)? == RunState::Paused {
        sleep(PAUSE_POLL).await;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::RunKind;
    use std::sync::Arc;
    use tokio::time::Instant;

    #[tokio::test(start_paused = true)]
    async fn sleeps_for_requested_duration() {
        let control = RunController::new();
        let token = control.start(RunKind::Bubble);

        let began = Instant::now();
        delay(&control, &token, Duration::from_millis(250)).await.unwrap();
        assert_eq!(began.elapsed(), Duration::from_millis(250));
    }

    #[tokio::test(start_paused = true)]
    async fn zero_delay_still_checks_at_entry() {
        let control = RunController::new();
        let token = control.start(RunKind::Bubble);
        control.stop();

        let result = delay(&control, &token, Duration::ZERO).await;
        assert_eq!(result, Err(Cancelled::Stopped));
    }

    #[tokio::test(start_paused = true)]
    async fn stop_is_observed_within_one_slice() {
        let control = Arc::new(RunController::new());
        let token = control.start(RunKind::Quick);

        let stopper = Arc::clone(&control);
        tokio::spawn(async move {
            sleep(Duration::from_millis(35)).await;
            stopper.stop();
        });

        let began = Instant::now();
        let result = delay(&control, &token, Duration::from_secs(5)).await;
        assert_eq!(result, Err(Cancelled::Stopped));
        assert!(began.elapsed() <= Duration::from_millis(35) + CHECK_INTERVAL);
    }

    #[tokio::test(start_paused = true)]
    async fn pause_freezes_elapsed_time() {
        let control = Arc::new(RunController::new());
        let token = control.start(RunKind::Merge);
        control.pause();

        let resumer = Arc::clone(&control);
        tokio::spawn(async move {
            sleep(Duration::from_millis(1000)).await;
            resumer.resume();
        });

        let began = Instant::now();
        delay(&control, &token, Duration::from_millis(100)).await.unwrap();
        // At least the full pause plus the whole requested delay.
        assert!(began.elapsed() >= Duration::from_millis(1100));
    }

    #[tokio::test(start_paused = true)]
    async fn stop_while_paused_cancels() {
        let control = Arc::new(RunController::new());
        let token = control.start(RunKind::Dfs);
        control.pause();

        let stopper = Arc::clone(&control);
        tokio::spawn(async move {
            sleep(Duration::from_millis(300)).await;
            stopper.stop();
        });

        let result = delay(&control, &token, Duration::from_millis(50)).await;
        assert_eq!(result, Err(Cancelled::Stopped));
    }

    #[tokio::test(start_paused = true)]
    async fn stale_token_is_superseded() {
        let control = RunController::new();
        let token = control.start(RunKind::Linear);
        control.start(RunKind::Binary);

        let result = delay(&control, &token, Duration::from_millis(10)).await;
        assert_eq!(result, Err(Cancelled::Superseded));
    }
}

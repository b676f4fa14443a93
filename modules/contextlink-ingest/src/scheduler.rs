use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{error, info};

use crate::error::PipelineError;

/// Run `pass` on a fixed period, starting at `start`, forever.
///
/// Each pass is awaited before the next tick is taken, so two passes of the
/// same loop never overlap. A slow pass delays the schedule rather than
/// triggering a burst of catch-up passes.
pub async fn run_periodically<F, Fut, T>(name: &'static str, start: Instant, period: Duration, mut pass: F)
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, PipelineError>>,
    T: Display,
{
    let mut ticker = interval_at(start, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        info!(pass = name, "Starting scheduled pass");
        match pass().await {
            Ok(stats) => info!(pass = name, "Scheduled pass finished. {stats}"),
            Err(e) => error!(pass = name, error = %e, "Scheduled pass failed"),
        }
    }
}

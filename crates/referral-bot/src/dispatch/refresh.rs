//! Refresh scheduling
//!
//! One task owns the validate → pause → publish sequence. It wakes on a
//! fixed interval and on explicit refresh requests; requests arriving while
//! a recompute is in flight coalesce into a single follow-up run instead of
//! racing it.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{error, info, instrument};

use referral_service::{LeaderboardService, ServiceContext, ValidationService};

/// Pause between validation and publication. Crude pacing against the
/// platform API, not a correctness mechanism.
const PUBLISH_DELAY: Duration = Duration::from_secs(1);

/// Requests a refresh from anywhere in the dispatcher. Cheap to clone.
#[derive(Clone)]
pub struct RefreshHandle {
    tx: mpsc::Sender<()>,
}

impl RefreshHandle {
    /// Ask for a validate-and-publish run. A request that lands while one is
    /// already queued or running merges into it.
    pub fn request(&self) {
        // Capacity-1 channel: a full buffer means a run is already pending.
        let _ = self.tx.try_send(());
    }
}

/// The scheduled validate-and-publish task.
pub struct RefreshScheduler {
    handle: RefreshHandle,
    task: JoinHandle<()>,
}

impl RefreshScheduler {
    /// Spawn the scheduler. The first interval tick fires one full period
    /// out; the startup publish arrives through a ready-triggered request
    /// instead.
    pub fn spawn(ctx: ServiceContext, interval: Duration) -> Self {
        let (tx, mut rx) = mpsc::channel::<()>(1);

        let task = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + interval, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {}
                    request = rx.recv() => {
                        if request.is_none() {
                            break;
                        }
                    }
                }
                run_refresh(&ctx).await;
            }
        });

        Self {
            handle: RefreshHandle { tx },
            task,
        }
    }

    /// Handle for requesting refreshes.
    pub fn handle(&self) -> RefreshHandle {
        self.handle.clone()
    }

    /// Cancel the task. An in-flight recompute is not interrupted midway by
    /// request, only by process teardown.
    pub fn shutdown(self) {
        self.task.abort();
    }
}

/// One full refresh: validate, pause, publish. Failures are logged and
/// absorbed; the next trigger reconciles.
#[instrument(skip(ctx))]
async fn run_refresh(ctx: &ServiceContext) {
    match ValidationService::new(ctx).run_full_pass().await {
        Ok(report) => {
            info!(
                validated = report.validated,
                invalid = report.invalid,
                "Scheduled validation complete"
            );
        }
        Err(e) => {
            error!(error = %e, "Scheduled validation failed");
            return;
        }
    }

    tokio::time::sleep(PUBLISH_DELAY).await;

    if let Err(e) = LeaderboardService::new(ctx).publish().await {
        error!(error = %e, "Leaderboard publish failed");
    }
}

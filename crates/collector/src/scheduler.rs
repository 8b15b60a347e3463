//! Background job scheduling.
//!
//! Every job runs on a fixed `tokio::time::interval` inside its own
//! task. The job body is awaited inline in the tick loop, so a job can
//! never overlap itself; ticks missed while a slow run is in progress
//! are skipped rather than replayed.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use nemon_db::DbPool;
use nemon_gateway::CommandGateway;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::alerts::{evaluate_alerts, AlertConfig};
use crate::{bgp, interface, retention};

/// How often the retention sweep runs.
const RETENTION_SWEEP_INTERVAL: Duration = Duration::from_secs(24 * 3600);

/// Spawn a cancellable fixed-interval job.
///
/// The first run happens immediately; later runs at `period`, skipping
/// any tick that falls while the previous run is still executing.
pub fn spawn_job<F, Fut>(
    name: &'static str,
    period: Duration,
    cancel: CancellationToken,
    mut job: F,
) -> JoinHandle<()>
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        tracing::info!(job = name, period_secs = period.as_secs(), "Job started");

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!(job = name, "Job stopping");
                    break;
                }
                _ = interval.tick() => {
                    job().await;
                }
            }
        }
    })
}

/// The running background jobs and their shared cancellation token.
pub struct JobSet {
    cancel: CancellationToken,
    handles: Vec<(&'static str, JoinHandle<()>)>,
}

impl JobSet {
    /// Cancel all jobs and wait up to `grace` for each to finish.
    pub async fn shutdown(self, grace: Duration) {
        self.cancel.cancel();
        for (name, handle) in self.handles {
            if tokio::time::timeout(grace, handle).await.is_err() {
                tracing::warn!(job = name, "Job did not stop within grace period");
            }
        }
    }
}

/// Start the four background jobs: BGP collection and interface
/// collection at the base interval, alert checks at twice that, and
/// the retention sweep daily.
pub fn start(
    gateway: Arc<CommandGateway>,
    pool: DbPool,
    alert_config: AlertConfig,
    collection_interval: Duration,
) -> JobSet {
    let cancel = CancellationToken::new();
    let mut handles = Vec::new();

    {
        let gateway = Arc::clone(&gateway);
        let pool = pool.clone();
        handles.push((
            "collect-bgp",
            spawn_job("collect-bgp", collection_interval, cancel.clone(), move || {
                let gateway = Arc::clone(&gateway);
                let pool = pool.clone();
                async move {
                    if let Err(e) = bgp::run_cycle(&gateway, &pool).await {
                        tracing::error!(error = %e, "BGP collection cycle failed");
                    }
                }
            }),
        ));
    }

    {
        let gateway = Arc::clone(&gateway);
        let pool = pool.clone();
        handles.push((
            "collect-interfaces",
            spawn_job(
                "collect-interfaces",
                collection_interval,
                cancel.clone(),
                move || {
                    let gateway = Arc::clone(&gateway);
                    let pool = pool.clone();
                    async move {
                        if let Err(e) = interface::run_cycle(&gateway, &pool).await {
                            tracing::error!(error = %e, "Interface collection cycle failed");
                        }
                    }
                },
            ),
        ));
    }

    {
        let pool = pool.clone();
        handles.push((
            "check-alerts",
            spawn_job(
                "check-alerts",
                collection_interval * 2,
                cancel.clone(),
                move || {
                    let pool = pool.clone();
                    let config = alert_config.clone();
                    async move {
                        evaluate_alerts(&pool, &config, Utc::now()).await;
                    }
                },
            ),
        ));
    }

    {
        handles.push((
            "retention-sweep",
            spawn_job(
                "retention-sweep",
                RETENTION_SWEEP_INTERVAL,
                cancel.clone(),
                move || {
                    let pool = pool.clone();
                    async move {
                        if let Err(e) = retention::sweep(&pool, Utc::now()).await {
                            tracing::error!(error = %e, "Retention sweep failed");
                        }
                    }
                },
            ),
        ));
    }

    JobSet { cancel, handles }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn slow_job_never_overlaps_and_skips_missed_ticks() {
        let running = Arc::new(AtomicUsize::new(0));
        let max_concurrent = Arc::new(AtomicUsize::new(0));
        let runs = Arc::new(AtomicUsize::new(0));
        let cancel = CancellationToken::new();

        let handle = spawn_job("test-job", Duration::from_secs(10), cancel.clone(), {
            let running = Arc::clone(&running);
            let max_concurrent = Arc::clone(&max_concurrent);
            let runs = Arc::clone(&runs);
            move || {
                let running = Arc::clone(&running);
                let max_concurrent = Arc::clone(&max_concurrent);
                let runs = Arc::clone(&runs);
                async move {
                    let now = running.fetch_add(1, Ordering::SeqCst) + 1;
                    max_concurrent.fetch_max(now, Ordering::SeqCst);
                    runs.fetch_add(1, Ordering::SeqCst);
                    // Each run spans two scheduled ticks.
                    tokio::time::sleep(Duration::from_secs(25)).await;
                    running.fetch_sub(1, Ordering::SeqCst);
                }
            }
        });

        tokio::time::sleep(Duration::from_secs(100)).await;
        cancel.cancel();
        handle.await.unwrap();

        assert_eq!(max_concurrent.load(Ordering::SeqCst), 1, "runs must not overlap");
        // Runs start at t=0, 30, 60, 90: intermediate ticks are skipped,
        // not replayed in a burst.
        assert_eq!(runs.load(Ordering::SeqCst), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_job_stops_without_running_again() {
        let runs = Arc::new(AtomicUsize::new(0));
        let cancel = CancellationToken::new();

        let handle = spawn_job("test-job", Duration::from_secs(10), cancel.clone(), {
            let runs = Arc::clone(&runs);
            move || {
                let runs = Arc::clone(&runs);
                async move {
                    runs.fetch_add(1, Ordering::SeqCst);
                }
            }
        });

        // Let the immediate first run happen, then cancel.
        tokio::time::sleep(Duration::from_secs(1)).await;
        cancel.cancel();
        handle.await.unwrap();

        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }
}

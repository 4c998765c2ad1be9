use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use reqwest::{StatusCode, Url};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::model::{Entity, Snapshot};
use crate::poll_stats::PollStats;

/// Everything that can go wrong fetching one snapshot. Never leaves the
/// poller: each one is logged and the previous snapshot stays in place.
#[derive(Debug, thiserror::Error)]
pub enum RetrievalFailure {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("upstream answered {0}")]
    Status(StatusCode),
    #[error("malformed body: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Owns the container snapshot and the schedule that keeps it fresh.
///
/// The snapshot is published through a `watch` channel: every commit swaps
/// in a new `Arc<Snapshot>` and wakes all subscribers, which re-render.
pub struct Poller {
    shared: Arc<Shared>,
    period: Duration,
    schedule: Option<JoinHandle<()>>,
}

struct Shared {
    client: reqwest::Client,
    endpoint: Url,
    snapshot_tx: watch::Sender<Arc<Snapshot>>,
    stats: PollStats,
    cancel: CancellationToken,
}

impl Poller {
    /// # Panics
    ///
    /// If `period` is zero; the schedule needs a non-zero tick.
    pub fn new(client: reqwest::Client, endpoint: Url, period: Duration) -> Self {
        assert!(!period.is_zero(), "poll period must be non-zero");
        let (snapshot_tx, _) = watch::channel(Arc::new(Snapshot::default()));

        Self {
            shared: Arc::new(Shared {
                client,
                endpoint,
                snapshot_tx,
                stats: PollStats::default(),
                cancel: CancellationToken::new(),
            }),
            period,
            schedule: None,
        }
    }

    pub fn from_config(cfg: &Config) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = cfg.request_timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self::new(
            builder.build()?,
            cfg.containers_url.clone(),
            cfg.poll_interval,
        ))
    }

    /// Retrieves immediately, then once per period until [`Poller::stop`].
    pub fn start(&mut self) {
        if self.schedule.is_some() {
            tracing::warn!("poller already started");
            return;
        }

        let shared = self.shared.clone();
        let period = self.period;
        tracing::info!(endpoint = %shared.endpoint, ?period, "starting container poller");

        self.schedule = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    biased;
                    _ = shared.cancel.cancelled() => break,
                    // First tick completes immediately.
                    _ = ticker.tick() => {
                        // Retrievals may overlap; the last one to finish wins.
                        tokio::spawn(shared.clone().retrieve_once());
                    }
                }
            }

            tracing::debug!("poll schedule exited");
        }));
    }

    /// Cancels the schedule. No retrieval starts after this returns. One still
    /// in flight is dropped on completion, unless it already passed its
    /// cancellation check, in which case it is applied like any other commit.
    pub async fn stop(&mut self) {
        self.shared.cancel.cancel();

        if let Some(handle) = self.schedule.take() {
            if let Err(e) = handle.await {
                tracing::warn!(?e, "poll schedule task ended abnormally");
            }
            tracing::info!("container poller stopped");
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<Snapshot>> {
        self.shared.snapshot_tx.subscribe()
    }

    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.shared.snapshot_tx.borrow().clone()
    }

    pub fn stats(&self) -> PollStats {
        self.shared.stats.clone()
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.shared.cancel.cancel();
    }
}

impl Shared {
    async fn retrieve_once(self: Arc<Self>) {
        if self.cancel.is_cancelled() {
            return;
        }
        self.stats.record_attempt();

        let result = self.fetch().await;

        if self.cancel.is_cancelled() {
            tracing::debug!("poller stopped while retrieving; discarding result");
            return;
        }

        match result {
            Ok(snapshot) => self.commit(snapshot),
            Err(e) => {
                self.stats.record_failure(Utc::now());
                tracing::warn!(endpoint = %self.endpoint, "failed to fetch containers: {e}");
            }
        }
    }

    async fn fetch(&self) -> Result<Snapshot, RetrievalFailure> {
        let response = self.client.get(self.endpoint.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RetrievalFailure::Status(status));
        }

        let body = response.bytes().await?;
        let entities: Vec<Entity> = serde_json::from_slice(&body)?;
        Ok(Snapshot::from(entities))
    }

    fn commit(&self, snapshot: Snapshot) {
        let dupes = snapshot.duplicate_names();
        if !dupes.is_empty() {
            tracing::warn!(?dupes, "upstream returned duplicate container names");
        }

        tracing::debug!(containers = snapshot.len(), "replacing snapshot");
        self.stats.record_success(Utc::now());
        self.snapshot_tx.send_replace(Arc::new(snapshot));
    }
}

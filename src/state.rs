use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

use crate::model::Snapshot;
use crate::poll_stats::PollStats;

/// Read side of the poller, shared with every request handler.
#[derive(Clone)]
pub struct AppState {
    pub(crate) snapshots: watch::Receiver<Arc<Snapshot>>,
    pub(crate) stats: PollStats,
    pub(crate) poll_interval: Duration,
}

impl AppState {
    pub fn current(&self) -> Arc<Snapshot> {
        self.snapshots.borrow().clone()
    }
}

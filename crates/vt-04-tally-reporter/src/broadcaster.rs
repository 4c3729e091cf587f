//! Push reporter: one shared ticker, many subscribers.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;

use futures::{Stream, StreamExt};
use shared_types::TallyRecord;
use tally_telemetry::{metric_inc, PUSH_SUBSCRIBERS, PUSH_TICKS};
use tokio::sync::{broadcast, watch};
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;
use tracing::{debug, error, info};

use crate::reporter::TallyReporter;

/// Period between pushed snapshots.
pub const DEFAULT_PUSH_INTERVAL: Duration = Duration::from_millis(500);

/// A ranked tally shared by every subscriber of one tick.
pub type Snapshot = Arc<Vec<TallyRecord>>;

/// Shared ticker fanning ranked snapshots out to subscribers.
#[derive(Clone)]
pub struct TallyBroadcaster {
    reporter: TallyReporter,
    sender: broadcast::Sender<Snapshot>,
    interval: Duration,
}

impl TallyBroadcaster {
    pub fn new(reporter: TallyReporter, interval: Duration) -> Self {
        // Capacity 1: a lagging receiver only ever sees the newest snapshot.
        let (sender, _) = broadcast::channel(1);
        Self {
            reporter,
            sender,
            interval,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Start receiving snapshots from the next tick on.
    pub fn subscribe(&self) -> TallySubscription {
        metric_inc!(PUSH_SUBSCRIBERS);
        debug!(subscribers = self.sender.receiver_count() + 1, "Push subscriber added");
        TallySubscription {
            stream: BroadcastStream::new(self.sender.subscribe()),
        }
    }

    /// Run one tick.
    ///
    /// # Returns
    ///
    /// Number of subscribers the snapshot reached; 0 if skipped.
    pub async fn tick(&self) -> usize {
        if self.sender.receiver_count() == 0 {
            metric_inc!(PUSH_TICKS, &["skipped"]);
            return 0;
        }

        match self.reporter.snapshot().await {
            Ok(records) => {
                metric_inc!(PUSH_TICKS, &["broadcast"]);
                // Err only means every receiver dropped since the check.
                self.sender.send(Arc::new(records)).unwrap_or(0)
            }
            Err(e) => {
                metric_inc!(PUSH_TICKS, &["failed"]);
                error!(error = %e, "Failed to read tally for push");
                0
            }
        }
    }

    /// Tick every `interval` until `shutdown` flips to `true` or its
    /// sender is dropped. The first tick fires one interval after start.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!(interval_ms = self.interval.as_millis() as u64, "Push ticker started");

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.tick().await;
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        info!("Push ticker stopped");
    }
}

/// Handle to the push stream. Dropping it unsubscribes.
pub struct TallySubscription {
    stream: BroadcastStream<Snapshot>,
}

impl TallySubscription {
    /// Next snapshot, skipping any this subscriber fell behind on.
    ///
    /// `None` once the broadcaster is gone.
    pub async fn recv(&mut self) -> Option<Snapshot> {
        self.next().await
    }
}

impl Stream for TallySubscription {
    type Item = Snapshot;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        loop {
            match Pin::new(&mut self.stream).poll_next(cx) {
                Poll::Ready(Some(Ok(snapshot))) => return Poll::Ready(Some(snapshot)),
                Poll::Ready(Some(Err(BroadcastStreamRecvError::Lagged(skipped)))) => {
                    debug!(skipped, "Push subscriber lagged");
                }
                Poll::Ready(None) => return Poll::Ready(None),
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}

impl Drop for TallySubscription {
    fn drop(&mut self) {
        PUSH_SUBSCRIBERS.dec();
        debug!("Push subscriber removed");
    }
}

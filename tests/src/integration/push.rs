//! # Push Snapshots
//!
//! Votes accepted over HTTP show up in the next periodic snapshot sent to
//! every subscriber; a subscriber that goes away stops receiving.

#[cfg(test)]
mod tests {
    use crate::integration::fixtures::Harness;
    use std::time::Duration;
    use tokio::sync::watch;

    fn pairs(snapshot: &[shared_types::TallyRecord]) -> Vec<(&str, u64)> {
        snapshot.iter().map(|r| (r.name.as_str(), r.count)).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_subscribers_see_ranked_votes() {
        let app = Harness::direct();
        let broadcaster = app.container.broadcaster.clone();
        let mut first = broadcaster.subscribe();
        let mut second = broadcaster.subscribe();

        let (stop_tx, stop_rx) = watch::channel(false);
        let ticker = tokio::spawn({
            let broadcaster = broadcaster.clone();
            async move { broadcaster.run(stop_rx).await }
        });

        app.post_vote(None, r#"{"names":["opal","pia","pia"]}"#).await;

        let a = first.recv().await.unwrap();
        let b = second.recv().await.unwrap();
        assert_eq!(pairs(&a), vec![("pia", 2), ("opal", 1)]);
        assert_eq!(a, b);

        app.post_vote(None, r#"{"names":["opal","opal"]}"#).await;
        let next = first.recv().await.unwrap();
        assert_eq!(pairs(&next), vec![("opal", 3), ("pia", 2)]);

        stop_tx.send(true).unwrap();
        ticker.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_subscriber_stops_ticks() {
        let app = Harness::direct();
        let broadcaster = app.container.broadcaster.clone();

        let subscription = broadcaster.subscribe();
        assert_eq!(broadcaster.tick().await, 1);
        drop(subscription);

        assert_eq!(broadcaster.subscriber_count(), 0);
        assert_eq!(broadcaster.tick().await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_subscriber_gets_latest_snapshot() {
        let app = Harness::direct();
        let broadcaster = app.container.broadcaster.clone();
        let mut slow = broadcaster.subscribe();

        for name in ["quinn", "rose", "sam"] {
            app.post_vote(None, &format!(r#"{{"names":["{name}"]}}"#)).await;
            broadcaster.tick().await;
            tokio::time::advance(Duration::from_millis(500)).await;
        }

        let latest = slow.recv().await.unwrap();
        assert_eq!(latest.len(), 3);
    }
}

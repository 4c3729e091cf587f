//! # Ingestion Flows
//!
//! `POST /vote` through the full router into the store, read back with
//! `GET /votes`, for both ingestion paths.
//!
//! ```text
//! direct: router ─→ TallyService ─→ store
//! queued: router ─→ VotePublisher ─→ queue ─→ VoteConsumer ─→ TallyService ─→ store
//! ```

#[cfg(test)]
mod tests {
    use crate::integration::fixtures::Harness;
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn test_direct_votes_visible_immediately() {
        let app = Harness::direct();

        let (status, body) = app
            .post_vote(None, r#"{"names":["Alice","bob","ALICE"]}"#)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"message": "Votes saved successfully"}));

        assert_eq!(
            app.tallies().await,
            vec![("alice".to_string(), 2), ("bob".to_string(), 1)]
        );
    }

    #[tokio::test]
    async fn test_queued_votes_applied_by_consumer() {
        let mut app = Harness::queued();

        for body in [
            r#"{"names":["Carol"]}"#,
            r#"{"names":["carol","Dave"]}"#,
            r#"{"names":[]}"#,
        ] {
            let (status, _) = app.post_vote(None, body).await;
            assert_eq!(status, StatusCode::OK);
        }

        assert_eq!(app.drain().await, 3);
        assert_eq!(
            app.tallies().await,
            vec![("carol".to_string(), 2), ("dave".to_string(), 1)]
        );
    }

    #[tokio::test]
    async fn test_invalid_body_counts_nothing_on_either_path() {
        for mut app in [Harness::direct(), Harness::queued()] {
            for body in [
                "not json",
                r#"{"name":"x"}"#,
                r#"{"names":"x"}"#,
                r#"{"names":["ok",""]}"#,
                r#"{"names":["ok",7]}"#,
            ] {
                let (status, reply) = app.post_vote(None, body).await;
                assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
                assert_eq!(reply, json!({"error": "Invalid request body"}));
            }

            app.drain().await;
            assert!(app.tallies().await.is_empty());
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_requests_all_counted() {
        let app = Harness::direct();

        let mut handles = Vec::new();
        for i in 0..50 {
            let client = app.client.clone();
            let name = if i % 2 == 0 { "Eve" } else { "eve" };
            handles.push(tokio::spawn(async move {
                client
                    .post_vote(None, &format!(r#"{{"names":["{name}","frank"]}}"#))
                    .await
                    .0
            }));
        }
        for handle in handles {
            assert_eq!(handle.await.unwrap(), StatusCode::OK);
        }

        assert_eq!(
            app.tallies().await,
            vec![("eve".to_string(), 50), ("frank".to_string(), 50)]
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_queued_requests_all_counted() {
        let mut app = Harness::queued();

        let mut handles = Vec::new();
        for _ in 0..40 {
            let client = app.client.clone();
            handles.push(tokio::spawn(async move {
                client
                    .post_vote(None, r#"{"names":["grace"]}"#)
                    .await
                    .0
            }));
        }
        for handle in handles {
            assert_eq!(handle.await.unwrap(), StatusCode::OK);
        }

        assert_eq!(app.drain().await, 40);
        assert_eq!(app.tallies().await, vec![("grace".to_string(), 40)]);
    }

    #[tokio::test]
    async fn test_ranking_breaks_ties_by_name() {
        let app = Harness::direct();
        app.post_vote(None, r#"{"names":["zoe","amy","zoe","mia","amy"]}"#)
            .await;

        assert_eq!(
            app.tallies().await,
            vec![
                ("amy".to_string(), 2),
                ("zoe".to_string(), 2),
                ("mia".to_string(), 1),
            ]
        );
    }
}

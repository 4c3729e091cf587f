//! # One-Time Access Codes
//!
//! A code admits exactly one `POST /vote`, however many requests race for
//! it, and `GET /codeExists/:code` shares the same record.

#[cfg(test)]
mod tests {
    use crate::integration::fixtures::Harness;
    use axum::http::StatusCode;
    use serde_json::{json, Value};
    use vt_05_api_gateway::IngestMode;

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_racing_requests_single_winner() {
        let app = Harness::with_required_code(IngestMode::Direct);

        let mut handles = Vec::new();
        for _ in 0..32 {
            let client = app.client.clone();
            handles.push(tokio::spawn(async move {
                client.post_vote(Some("ticket-7"), r#"{"names":["ivy"]}"#).await
            }));
        }

        let mut accepted = 0;
        for handle in handles {
            let (status, body) = handle.await.unwrap();
            match status {
                StatusCode::OK => accepted += 1,
                StatusCode::BAD_REQUEST => assert_eq!(body, json!({"error": "Invalid code"})),
                other => panic!("unexpected status {other}"),
            }
        }

        assert_eq!(accepted, 1);
        assert_eq!(app.tallies().await, vec![("ivy".to_string(), 1)]);
    }

    #[tokio::test]
    async fn test_code_exists_then_vote_rejected() {
        let app = Harness::with_required_code(IngestMode::Direct);

        assert_eq!(app.get("/codeExists/abc").await, (StatusCode::OK, Value::Bool(false)));
        assert_eq!(app.get("/codeExists/abc").await, (StatusCode::OK, Value::Bool(true)));

        let (status, _) = app.post_vote(Some("abc"), r#"{"names":["jay"]}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(app.tallies().await.is_empty());
    }

    #[tokio::test]
    async fn test_voting_consumes_code_for_lookup() {
        let app = Harness::with_required_code(IngestMode::Direct);

        let (status, _) = app.post_vote(Some("fresh"), r#"{"names":["kim"]}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(app.get("/codeExists/fresh").await.1, Value::Bool(true));
    }

    #[tokio::test]
    async fn test_invalid_body_does_not_burn_code() {
        let app = Harness::with_required_code(IngestMode::Direct);

        let (status, _) = app.post_vote(Some("keep"), "{}").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = app.post_vote(Some("keep"), r#"{"names":["lee"]}"#).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_missing_code_rejected_when_required() {
        let app = Harness::with_required_code(IngestMode::Direct);
        let (status, body) = app.post_vote(None, r#"{"names":["max"]}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "Invalid code"}));
    }

    #[tokio::test]
    async fn test_queued_mode_checks_code_before_publishing() {
        let mut app = Harness::with_required_code(IngestMode::Queued);

        assert_eq!(app.post_vote(Some("q1"), r#"{"names":["ned"]}"#).await.0, StatusCode::OK);
        assert_eq!(
            app.post_vote(Some("q1"), r#"{"names":["ned"]}"#).await.0,
            StatusCode::BAD_REQUEST
        );

        assert_eq!(app.drain().await, 1);
        assert_eq!(app.tallies().await, vec![("ned".to_string(), 1)]);
    }
}

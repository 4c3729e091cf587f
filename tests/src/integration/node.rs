//! # Full Node Over Sockets
//!
//! Boots [`tally_node::NodeRuntime`] on an ephemeral port and talks to it
//! with a real HTTP client and a real WebSocket client.

#[cfg(test)]
mod tests {
    use futures::{SinkExt, StreamExt};
    use serde_json::{json, Value};
    use std::net::SocketAddr;
    use std::time::Duration;
    use tally_node::{NodeConfig, NodeRuntime};
    use tokio::sync::oneshot;
    use tokio::task::JoinHandle;
    use tokio::time::timeout;
    use tokio_tungstenite::{connect_async, tungstenite::Message};
    use vt_05_api_gateway::IngestMode;

    struct RunningNode {
        addr: SocketAddr,
        stop: oneshot::Sender<()>,
        task: JoinHandle<anyhow::Result<()>>,
    }

    async fn boot(config: NodeConfig) -> RunningNode {
        let runtime = NodeRuntime::new(NodeConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 0,
            ..config
        })
        .unwrap();
        let listener = runtime.bind().await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (stop, stopped) = oneshot::channel::<()>();

        let task = tokio::spawn(runtime.run_until(listener, async move {
            let _ = stopped.await;
        }));

        RunningNode { addr, stop, task }
    }

    impl RunningNode {
        fn url(&self, path: &str) -> String {
            format!("http://{}{path}", self.addr)
        }

        async fn stop(self) {
            self.stop.send(()).unwrap();
            timeout(Duration::from_secs(5), self.task)
                .await
                .expect("node stops in time")
                .unwrap()
                .unwrap();
        }
    }

    async fn vote(client: &reqwest::Client, node: &RunningNode, names: &[&str]) -> u16 {
        client
            .post(node.url("/vote"))
            .json(&json!({ "names": names }))
            .send()
            .await
            .unwrap()
            .status()
            .as_u16()
    }

    #[tokio::test]
    async fn test_http_round_trip() {
        let node = boot(NodeConfig::default()).await;
        let client = reqwest::Client::new();

        assert_eq!(vote(&client, &node, &["Tom", "tom", "Uma"]).await, 200);

        let tallies: Value = client
            .get(node.url("/votes"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(
            tallies,
            json!([{"name": "tom", "count": 2}, {"name": "uma", "count": 1}])
        );

        let health: Value = client
            .get(node.url("/health"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(health["status"], "ok");

        node.stop().await;
    }

    #[tokio::test]
    async fn test_queued_votes_survive_shutdown_drain() {
        let node = boot(NodeConfig {
            ingest: IngestMode::Queued,
            ..NodeConfig::default()
        })
        .await;
        let client = reqwest::Client::new();

        for _ in 0..20 {
            assert_eq!(vote(&client, &node, &["val"]).await, 200);
        }

        // Eventually consistent: poll until the consumer catches up.
        let mut count = 0;
        for _ in 0..50 {
            let tallies: Value = client
                .get(node.url("/votes"))
                .send()
                .await
                .unwrap()
                .json()
                .await
                .unwrap();
            count = tallies[0]["count"].as_u64().unwrap_or(0);
            if count == 20 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        assert_eq!(count, 20);

        node.stop().await;
    }

    #[tokio::test]
    async fn test_websocket_receives_pushed_snapshot() {
        let node = boot(NodeConfig {
            push_interval: Duration::from_millis(50),
            ..NodeConfig::default()
        })
        .await;
        let client = reqwest::Client::new();

        let (mut ws, _) = connect_async(format!("ws://{}/ws", node.addr))
            .await
            .unwrap();
        assert_eq!(vote(&client, &node, &["Wes"]).await, 200);

        let snapshot = timeout(Duration::from_secs(2), async {
            loop {
                let frame = ws.next().await.expect("stream open").unwrap();
                if let Message::Text(_) = frame {
                    let value: Value = serde_json::from_str(frame.to_text().unwrap()).unwrap();
                    if value.as_array().is_some_and(|a| !a.is_empty()) {
                        return value;
                    }
                }
            }
        })
        .await
        .expect("snapshot within two seconds");
        assert_eq!(snapshot, json!([{"name": "wes", "count": 1}]));

        ws.close(None).await.unwrap();
        node.stop().await;
    }

    #[tokio::test]
    async fn test_port_refused_after_stop() {
        let node = boot(NodeConfig::default()).await;
        let addr = node.addr;
        node.stop().await;

        assert!(tokio::net::TcpStream::connect(addr).await.is_err());
    }
}

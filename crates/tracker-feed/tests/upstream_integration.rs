//! Integration tests for the upstream clients against simulated servers.

use std::time::Duration;

use mockito::Matcher;
use tokio::net::TcpListener;
use tracker_feed::{FeedError, PlanClient, PositionFetcher, SnapshotSource, UpstreamClient};

const FEED_BODY: &str = r#"{
    "type": "FeatureCollection",
    "features": [
        {
            "type": "Feature",
            "geometry": {"type": "Point", "coordinates": [153.02, -27.47]},
            "properties": {
                "name": "QFA12",
                "trk": 45.6,
                "popupContent": "<dl><dt>Altitude</dt><dd>5000 ft</dd><dt>Speed</dt><dd>210 kts</dd></dl>",
                "tk": "X1"
            }
        },
        {
            "type": "Feature",
            "geometry": {"type": "Point", "coordinates": [151.2]},
            "properties": {"name": "BAD", "tk": "X2"}
        }
    ]
}"#;

fn client(timeout: Duration) -> UpstreamClient {
    UpstreamClient::with_referer("https://tx.example.com/", timeout).unwrap()
}

/// Accepts connections and never answers.
async fn silent_server() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });
    format!("http://{}", addr)
}

/// Address with nothing listening.
fn closed_address() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

#[tokio::test]
async fn test_fetch_snapshot_end_to_end() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/tx/geo")
        .match_header("user-agent", "Mozilla/5.0")
        .match_header("referer", "https://tx.example.com/")
        .match_header("x-requested-with", "XMLHttpRequest")
        .match_header("accept", Matcher::Regex("application/json".to_string()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(FEED_BODY)
        .create_async()
        .await;

    let fetcher = PositionFetcher::new(
        client(Duration::from_secs(5)),
        format!("{}/tx/geo", server.url()),
    );
    let snapshot = fetcher.fetch_snapshot().await;

    mock.assert_async().await;
    assert_eq!(snapshot.len(), 1);

    let record = &snapshot.records()[0];
    assert_eq!(record.lat, -27.47);
    assert_eq!(record.lng, 153.02);
    assert_eq!(record.altitude, 5000);
    assert_eq!(record.speed, 210);
    assert_eq!(record.heading, 46);
    assert_eq!(record.track_key, "X1");
}

#[tokio::test]
async fn test_fetch_snapshot_malformed_body_is_empty() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/tx/geo")
        .with_status(200)
        .with_body("<html>maintenance</html>")
        .create_async()
        .await;

    let fetcher = PositionFetcher::new(
        client(Duration::from_secs(5)),
        format!("{}/tx/geo", server.url()),
    );

    assert!(matches!(fetcher.fetch_features().await, Err(FeedError::Parse(_))));
    assert!(fetcher.fetch_snapshot().await.is_empty());
}

#[tokio::test]
async fn test_fetch_snapshot_http_error_is_empty() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/tx/geo")
        .with_status(503)
        .with_body("busy")
        .expect_at_least(1)
        .create_async()
        .await;

    let fetcher = PositionFetcher::new(
        client(Duration::from_secs(5)),
        format!("{}/tx/geo", server.url()),
    );

    let err = fetcher.fetch_features().await.unwrap_err();
    assert_eq!(err.status(), Some(503));
    assert!(fetcher.fetch_snapshot().await.is_empty());
}

#[tokio::test]
async fn test_fetch_snapshot_timeout_is_empty() {
    let base = silent_server().await;
    let fetcher = PositionFetcher::new(client(Duration::from_millis(200)), format!("{}/tx/geo", base));

    assert!(fetcher.fetch_snapshot().await.is_empty());
}

#[tokio::test]
async fn test_fetch_plan_relays_body() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/tx/plan")
        .match_query(Matcher::UrlEncoded("key".to_string(), "ABC".to_string()))
        .match_header("x-requested-with", "XMLHttpRequest")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"route":["YBBN","YSSY"]}"#)
        .create_async()
        .await;

    let plans = PlanClient::new(
        client(Duration::from_secs(5)),
        format!("{}/tx/plan", server.url()),
    );
    let body = plans.fetch_plan("ABC").await.unwrap();

    mock.assert_async().await;
    assert_eq!(body.bytes, br#"{"route":["YBBN","YSSY"]}"#.to_vec());
    assert_eq!(body.content_type.as_deref(), Some("application/json"));
}

#[tokio::test]
async fn test_fetch_plan_encodes_key() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/tx/plan")
        .match_query(Matcher::UrlEncoded("key".to_string(), "A B&C".to_string()))
        .with_status(200)
        .with_body("{}")
        .create_async()
        .await;

    let plans = PlanClient::new(
        client(Duration::from_secs(5)),
        format!("{}/tx/plan", server.url()),
    );
    plans.fetch_plan("A B&C").await.unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn test_fetch_plan_rejected_keeps_status_and_body() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/tx/plan")
        .match_query(Matcher::Any)
        .with_status(404)
        .with_header("content-type", "application/json")
        .with_body(r#"{"error":"unknown track"}"#)
        .create_async()
        .await;

    let plans = PlanClient::new(
        client(Duration::from_secs(5)),
        format!("{}/tx/plan", server.url()),
    );

    match plans.fetch_plan("ABC").await {
        Err(FeedError::Rejected {
            status,
            reason,
            body,
        }) => {
            assert_eq!(status, 404);
            assert_eq!(reason, "Not Found");
            assert_eq!(body, serde_json::json!({"error": "unknown track"}));
        }
        other => panic!("expected rejection, got {:?}", other),
    }
}

#[tokio::test]
async fn test_fetch_plan_timeout_is_unavailable() {
    let base = silent_server().await;
    let plans = PlanClient::new(client(Duration::from_millis(200)), format!("{}/tx/plan", base));

    let err = plans.fetch_plan("ABC").await.unwrap_err();
    assert!(err.is_unavailable(), "unexpected error: {:?}", err);
}

#[tokio::test]
async fn test_fetch_plan_connection_refused_is_unavailable() {
    let plans = PlanClient::new(
        client(Duration::from_secs(2)),
        format!("{}/tx/plan", closed_address()),
    );

    let err = plans.fetch_plan("ABC").await.unwrap_err();
    assert!(err.is_unavailable(), "unexpected error: {:?}", err);
}

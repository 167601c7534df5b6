use rask_log_producer::domain::{DeliveryFault, DeliveryResult, LogEvent, LogLevel};
use rask_log_producer::sender::{ClientConfig, DeliveryClient, MemorySink};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{header, method, path},
};

fn sample_event() -> LogEvent {
    let mut metadata = HashMap::new();
    metadata.insert("env".to_string(), "production".to_string());
    LogEvent::new(
        "python-demo-service",
        LogLevel::Info,
        "User login successful",
        metadata,
    )
    .unwrap()
}

fn client_for(endpoint: String, sink: Arc<MemorySink>) -> DeliveryClient {
    let config = ClientConfig {
        endpoint,
        ..Default::default()
    };
    DeliveryClient::new(config, sink).unwrap()
}

/// An address nothing listens on: bind an ephemeral port, then release it.
fn closed_local_endpoint() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{port}/ingest")
}

#[tokio::test]
async fn test_deliver_200_is_delivered() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/ingest"))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let sink = Arc::new(MemorySink::new());
    let client = client_for(format!("{}/ingest", mock_server.uri()), sink.clone());

    let result = client.deliver(&sample_event()).await;

    assert!(matches!(result, DeliveryResult::Delivered { status: 200, .. }));
    assert_eq!(
        sink.lines(),
        vec!["Sent [info]: User login successful -> 200".to_string()]
    );
}

#[tokio::test]
async fn test_deliver_500_is_surfaced_not_judged() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/ingest"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&mock_server)
        .await;

    let sink = Arc::new(MemorySink::new());
    let client = client_for(format!("{}/ingest", mock_server.uri()), sink.clone());

    let result = client.deliver(&sample_event()).await;

    assert_eq!(result.status(), Some(500));
    assert!(result.is_delivered());

    let stats = client.stats();
    assert_eq!(stats.delivered, 1);
    assert_eq!(stats.rejected, 1);
    assert_eq!(stats.failed, 0);
    assert!(sink.lines()[0].ends_with("-> 500"));
}

#[tokio::test]
async fn test_wire_body_has_the_four_fields() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/ingest"))
        .respond_with(ResponseTemplate::new(202))
        .mount(&mock_server)
        .await;

    let client = client_for(
        format!("{}/ingest", mock_server.uri()),
        Arc::new(MemorySink::new()),
    );
    client.deliver(&sample_event()).await;

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);

    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    let object = body.as_object().unwrap();
    assert_eq!(object.len(), 4);
    assert_eq!(body["service"], "python-demo-service");
    assert_eq!(body["level"], "info");
    assert_eq!(body["message"], "User login successful");
    assert_eq!(body["metadata"]["env"], "production");
}

#[tokio::test]
async fn test_deliver_times_out_within_budget() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/ingest"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&mock_server)
        .await;

    let sink = Arc::new(MemorySink::new());
    let client = client_for(format!("{}/ingest", mock_server.uri()), sink.clone());

    let start = Instant::now();
    let result = client.deliver(&sample_event()).await;
    let elapsed = start.elapsed();

    match result {
        DeliveryResult::Failed(DeliveryFault::Timeout { after }) => {
            assert_eq!(after, Duration::from_millis(500));
        }
        other => panic!("Expected timeout fault, got: {other:?}"),
    }
    assert!(elapsed >= Duration::from_millis(400), "returned too early: {elapsed:?}");
    assert!(elapsed < Duration::from_millis(1500), "returned too late: {elapsed:?}");
    assert_eq!(
        sink.lines(),
        vec!["Failed [info]: User login successful -> request timed out after 500ms".to_string()]
    );
}

#[tokio::test]
async fn test_deliver_to_closed_port_fails_without_panicking() {
    let sink = Arc::new(MemorySink::new());
    let client = client_for(closed_local_endpoint(), sink.clone());

    let result = client.deliver(&sample_event()).await;

    match result {
        DeliveryResult::Failed(DeliveryFault::Connect(description)) => {
            assert!(!description.is_empty());
        }
        other => panic!("Expected connect fault, got: {other:?}"),
    }
    assert_eq!(client.stats().failed, 1);
    assert_eq!(sink.len(), 1);
    assert!(sink.lines()[0].starts_with("Failed [info]: User login successful -> "));
}

#[tokio::test]
async fn test_deliver_to_unresolvable_host_fails() {
    let sink = Arc::new(MemorySink::new());
    let client = client_for(
        "http://logstream.nonexistent.invalid/ingest".to_string(),
        sink.clone(),
    );

    let start = Instant::now();
    let result = client.deliver(&sample_event()).await;

    assert!(!result.is_delivered());
    assert!(result.fault().is_some());
    assert!(start.elapsed() < Duration::from_secs(2));
    assert_eq!(sink.len(), 1);
}

#[tokio::test]
async fn test_attempts_are_independent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/ingest"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/ingest"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let client = client_for(
        format!("{}/ingest", mock_server.uri()),
        Arc::new(MemorySink::new()),
    );

    let first = client.deliver(&sample_event()).await;
    let second = client.deliver(&sample_event()).await;

    assert_eq!(first.status(), Some(503));
    assert_eq!(second.status(), Some(200));
    // No retry: exactly one request per deliver call.
    assert_eq!(mock_server.received_requests().await.unwrap().len(), 2);
}

use signal_bridge::config::EndpointConfig;
use signal_bridge::core::{ChannelSeries, Packet, Point, TimestampFormat};
use signal_bridge::transport::{HttpSender, TransportSender};
use signal_bridge::BridgeError;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn endpoint_for(server: &MockServer) -> EndpointConfig {
    EndpointConfig {
        host: server.address().ip().to_string(),
        port: server.address().port(),
        path: "/api/v1/signal".to_string(),
        timeout_ms: 2000,
    }
}

fn packet() -> Packet {
    Packet {
        series: vec![
            ChannelSeries {
                channel_id: "Fp1".into(),
                points: vec![Point { t: 1699.5, v: 61.0 }, Point { t: 1700.0, v: 62.0 }],
            },
            ChannelSeries {
                channel_id: "O1".into(),
                points: vec![Point { t: 1699.5, v: 58.0 }, Point { t: 1700.0, v: 57.0 }],
            },
        ],
    }
}

#[tokio::test]
async fn test_posts_json_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/signal"))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let sender = HttpSender::new(&endpoint_for(&server), TimestampFormat::Millis).unwrap();
    let outcome = sender.send(&packet()).await.unwrap();
    assert_eq!(outcome.status, 200);
    assert!(outcome.bytes > 0);

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body[0]["channelId"], "Fp1");
    assert_eq!(body[1]["channelId"], "O1");
    assert_eq!(body[0]["points"][0]["t"].as_i64(), Some(1699));
    assert_eq!(body[0]["points"][1]["v"].as_f64(), Some(62.0));
}

#[tokio::test]
async fn test_non_success_status_is_rejection() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let sender = HttpSender::new(&endpoint_for(&server), TimestampFormat::Millis).unwrap();
    let err = sender.send(&packet()).await.unwrap_err();

    assert!(matches!(err, BridgeError::TransportRejected { status: 503 }));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_unreachable_collector_is_transport_failure() {
    let endpoint = EndpointConfig {
        host: "127.0.0.1".into(),
        port: 9,
        path: "/api/v1/signal".into(),
        timeout_ms: 500,
    };

    let sender = HttpSender::new(&endpoint, TimestampFormat::Millis).unwrap();
    let err = sender.send(&packet()).await.unwrap_err();
    assert!(matches!(err, BridgeError::Transport(_)));
}

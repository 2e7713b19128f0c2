use std::time::Duration;

use remaining_time_engine::{
    FailureKind, JobClient, PollSettings, PrinterConfig, ReqwestJobClient, API_KEY_HEADER,
    JOB_PATH,
};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const JOB_BODY: &str = concat!(
    r#"{"state":"Printing","#,
    r#""progress":{"completion":12.5,"printTime":300,"printTimeLeft":2100}}"#
);

fn config_for(server: &MockServer, poll: PollSettings) -> PrinterConfig {
    let address = server.address();
    PrinterConfig {
        server_name: "Test printer".to_string(),
        server_address: address.ip().to_string(),
        server_port: address.port(),
        api_key: "0123456789ABCDEF".to_string(),
        wifi_ssid: "workshop".to_string(),
        wifi_password: "hunter22".to_string(),
        poll,
    }
}

#[tokio::test]
async fn client_sends_api_key_to_job_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(JOB_PATH))
        .and(header(API_KEY_HEADER, "0123456789ABCDEF"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(JOB_BODY, "application/json"))
        .expect(1)
        .mount(&server)
        .await;

    let config = config_for(&server, PollSettings::default());
    let client = ReqwestJobClient::new(&config).expect("client");
    assert_eq!(client.url(), format!("{}{}", server.uri(), JOB_PATH));

    let response = client.fetch_job().await.expect("fetch ok");
    assert_eq!(response.status, 200);
    assert!(response.is_success());
    assert_eq!(response.body, JOB_BODY.as_bytes());
}

#[tokio::test]
async fn unauthorized_is_returned_as_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(JOB_PATH))
        .respond_with(ResponseTemplate::new(401).set_body_string("Invalid API key"))
        .mount(&server)
        .await;

    let client = ReqwestJobClient::new(&config_for(&server, PollSettings::default())).unwrap();
    let response = client.fetch_job().await.expect("status is not a transport error");
    assert_eq!(response.status, 401);
    assert!(!response.is_success());
    assert!(response.body.is_empty());
}

#[tokio::test]
async fn slow_response_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(JOB_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_string(JOB_BODY),
        )
        .mount(&server)
        .await;

    let poll = PollSettings {
        request_timeout_ms: 50,
        ..PollSettings::default()
    };
    let client = ReqwestJobClient::new(&config_for(&server, poll)).unwrap();
    let err = client.fetch_job().await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Timeout);
}

#[tokio::test]
async fn oversized_body_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(JOB_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Type", "application/json")
                .set_body_string("01234567890"),
        )
        .mount(&server)
        .await;

    let poll = PollSettings {
        max_body_bytes: 10,
        ..PollSettings::default()
    };
    let client = ReqwestJobClient::new(&config_for(&server, poll)).unwrap();
    let err = client.fetch_job().await.unwrap_err();
    assert_eq!(
        err.kind,
        FailureKind::TooLarge {
            max_bytes: 10,
            actual: Some(11)
        }
    );
}

#[tokio::test]
async fn refused_connection_is_a_transport_failure() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let config = PrinterConfig {
        server_name: "Gone".to_string(),
        server_address: "127.0.0.1".to_string(),
        server_port: port,
        api_key: "0123456789ABCDEF".to_string(),
        wifi_ssid: "workshop".to_string(),
        wifi_password: "hunter22".to_string(),
        poll: PollSettings::default(),
    };
    let client = ReqwestJobClient::new(&config).unwrap();
    let err = client.fetch_job().await.unwrap_err();
    assert!(
        matches!(err.kind, FailureKind::Connect | FailureKind::Network),
        "unexpected failure kind {:?}",
        err.kind
    );
}

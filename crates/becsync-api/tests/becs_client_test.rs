// Integration tests for `BecsClient` using wiremock.
#![allow(clippy::unwrap_used)]


use secrecy::SecretString;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use becsync_api::{BecsClient, Error, TransportConfig};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, BecsClient) {
    let server = MockServer::start().await;
    let url = Url::parse(&server.uri()).unwrap();
    let client = BecsClient::new(url, &TransportConfig::default()).unwrap();
    (server, client)
}

async fn login(server: &MockServer, client: &mut BecsClient) {
    Mock::given(method("POST"))
        .and(path("/api/session/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "sessionid": "s-123" })))
        .mount(server)
        .await;
    client
        .login("syncer", &SecretString::from("hunter2"))
        .await
        .unwrap();
}

// ── Tests ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_object_find_carries_session_header() {
    let (server, mut client) = setup().await;
    login(&server, &mut client).await;

    let body = json!({
        "objects": [{
            "oid": 50,
            "class": "element-attach",
            "name": "SW1",
            "parentoid": 10,
            "elementtype": "ibos",
            "parameters": [{ "name": "model", "values": ["ASR8048"] }]
        }]
    });

    Mock::given(method("POST"))
        .and(path("/api/object/find"))
        .and(header("X-BECS-Session", "s-123"))
        .and(body_json(json!({ "oid": 50 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let obj = client.object_find(50).await.unwrap().unwrap();
    assert_eq!(obj.oid, 50);
    assert_eq!(obj.class, "element-attach");
    assert_eq!(obj.first_parameter("model"), Some("ASR8048"));
}

#[tokio::test]
async fn test_object_find_unknown_oid_is_none() {
    let (server, mut client) = setup().await;
    login(&server, &mut client).await;

    Mock::given(method("POST"))
        .and(path("/api/object/find"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "objects": [] })))
        .mount(&server)
        .await;

    assert!(client.object_find(999).await.unwrap().is_none());
}

#[tokio::test]
async fn test_object_tree_find_returns_all_objects() {
    let (server, mut client) = setup().await;
    login(&server, &mut client).await;

    let body = json!({
        "objects": [
            { "oid": 50, "class": "element-attach", "name": "sw1", "parentoid": 1 },
            { "oid": 51, "class": "interface", "name": "ethernet1", "parentoid": 50 },
            { "oid": 52, "class": "resource-inet", "name": "", "parentoid": 51,
              "resource": { "address": "10.0.0.1", "prefixlen": 32 } },
        ]
    });

    Mock::given(method("POST"))
        .and(path("/api/object/tree-find"))
        .and(body_json(json!({ "oid": 1 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let objects = client.object_tree_find(1).await.unwrap();
    assert_eq!(objects.len(), 3);
    assert_eq!(objects[2].resource.as_ref().unwrap().prefixlen, 32);
}

#[tokio::test]
async fn test_call_without_login_fails() {
    let (_server, client) = setup().await;
    let err = client.object_find(1).await.unwrap_err();
    assert!(matches!(err, Error::NotLoggedIn));
}

#[tokio::test]
async fn test_login_rejected() {
    let (server, mut client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/session/login"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = client
        .login("syncer", &SecretString::from("wrong"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Authentication { .. }));
}

#[tokio::test]
async fn test_server_error_maps_to_api_error() {
    let (server, mut client) = setup().await;
    login(&server, &mut client).await;

    Mock::given(method("POST"))
        .and(path("/api/object/find"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({ "message": "internal fault" })),
        )
        .mount(&server)
        .await;

    let err = client.object_find(1).await.unwrap_err();
    match err {
        Error::Api { message, status } => {
            assert_eq!(status, 500);
            assert_eq!(message, "internal fault");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

// Integration tests for `NetboxClient` using wiremock.
#![allow(clippy::unwrap_used)]


use secrecy::SecretString;
use serde_json::json;
use url::Url;
use wiremock::matchers::{
    body_partial_json, header, method, path, query_param, query_param_is_missing,
};
use wiremock::{Mock, MockServer, ResponseTemplate};

use becsync_api::netbox::models::{DeviceUpdate, InterfaceUpdate};
use becsync_api::{Error, NetboxClient, TransportConfig};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, NetboxClient) {
    let server = MockServer::start().await;
    let url = Url::parse(&server.uri()).unwrap();
    let client = NetboxClient::new(
        url,
        &SecretString::from("nb-token"),
        &TransportConfig::default(),
    )
    .unwrap();
    (server, client)
}

fn page(results: serde_json::Value, next: Option<String>) -> serde_json::Value {
    json!({
        "count": results.as_array().map_or(0, Vec::len),
        "next": next,
        "results": results,
    })
}

// ── Tests ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_devices_follows_pagination() {
    let (server, client) = setup().await;

    let page2_url = format!("{}/api/dcim/devices/?tag=becs&offset=1", server.uri());

    Mock::given(method("GET"))
        .and(path("/api/dcim/devices/"))
        .and(query_param("tag", "becs"))
        .and(query_param_is_missing("offset"))
        .and(header("Authorization", "Token nb-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(
            json!([{ "id": 1, "name": "sw1.example.com", "enabled": true,
                     "custom_fields": { "becs_oid": 50 } }]),
            Some(page2_url),
        )))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/dcim/devices/"))
        .and(query_param("offset", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(
            json!([{ "id": 2, "name": "sw2.example.com", "enabled": false }]),
            None,
        )))
        .expect(1)
        .mount(&server)
        .await;

    let devices = client.list_devices(Some("becs")).await.unwrap();
    assert_eq!(devices.len(), 2);
    assert_eq!(devices[0].custom_fields.becs_oid, Some(50));
    assert!(devices[1].custom_fields.becs_oid.is_none());
}

#[tokio::test]
async fn test_get_device_absent_is_none() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/dcim/devices/"))
        .and(query_param("name", "nope.example.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(json!([]), None)))
        .mount(&server)
        .await;

    assert!(client.get_device("nope.example.com").await.unwrap().is_none());
}

#[tokio::test]
async fn test_update_device_sends_only_changed_fields() {
    let (server, client) = setup().await;

    Mock::given(method("PATCH"))
        .and(path("/api/dcim/devices/7/"))
        .and(body_partial_json(json!({ "enabled": false })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 7, "name": "sw1.example.com", "enabled": false
        })))
        .expect(1)
        .mount(&server)
        .await;

    let update = DeviceUpdate {
        enabled: Some(false),
        ..DeviceUpdate::default()
    };
    // The serialized body must not mention untouched fields at all.
    let raw = serde_json::to_value(&update).unwrap();
    assert_eq!(raw, json!({ "enabled": false }));

    let device = client.update_device(7, &update).await.unwrap();
    assert!(!device.enabled);
}

#[tokio::test]
async fn test_clear_primary_ip4_serializes_null() {
    let update = DeviceUpdate {
        primary_ip4: Some(None),
        ..DeviceUpdate::default()
    };
    let raw = serde_json::to_value(&update).unwrap();
    assert_eq!(raw, json!({ "primary_ip4": null }));
}

#[tokio::test]
async fn test_interface_rename_patch() {
    let (server, client) = setup().await;

    Mock::given(method("PATCH"))
        .and(path("/api/dcim/interfaces/33/"))
        .and(body_partial_json(json!({ "name": "gigabitethernet1" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 33,
            "device": { "id": 7, "name": "sw1.example.com", "slug": "" },
            "name": "gigabitethernet1",
            "type": { "value": "1000base-t" },
            "enabled": true,
            "label": "becs_oid=51"
        })))
        .mount(&server)
        .await;

    let update = InterfaceUpdate {
        name: Some("gigabitethernet1".into()),
        ..InterfaceUpdate::default()
    };
    let iface = client.update_interface(33, &update).await.unwrap();
    assert_eq!(iface.name, "gigabitethernet1");
    assert_eq!(iface.type_.unwrap().value, "1000base-t");
}

#[tokio::test]
async fn test_delete_device_accepts_204() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/api/dcim/devices/7/"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    client.delete_device(7).await.unwrap();
}

#[tokio::test]
async fn test_rejected_mutation_maps_to_api_error() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/ipam/ip-addresses/"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({ "detail": "duplicate address" })),
        )
        .mount(&server)
        .await;

    let create =
        becsync_api::netbox::models::IpAddressCreate::on_interface(33, "10.0.0.1/32", 52);
    let err = client.create_ip_address(&create).await.unwrap_err();
    assert!(err.is_rejection());
    match err {
        Error::Api { message, status } => {
            assert_eq!(status, 400);
            assert_eq!(message, "duplicate address");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_device_type_with_interface_templates() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/dcim/device-types/"))
        .and(query_param("manufacturer", "waystream"))
        .and(query_param("model", "ASR8048"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(
            json!([{
                "id": 4, "model": "ASR8048",
                "custom_fields": { "monitor_icinga": true, "backup_oxidized": true }
            }]),
            None,
        )))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/dcim/interface-templates/"))
        .and(query_param("devicetype_id", "4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(
            json!([
                { "id": 1, "name": "ethernet1", "type": { "value": "1000base-t" } },
                { "id": 2, "name": "loopback0", "type": { "value": "virtual" } },
            ]),
            None,
        )))
        .mount(&server)
        .await;

    let dt = client
        .get_device_type("waystream", "ASR8048")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(dt.custom_fields.backup_oxidized, Some(true));

    let templates = client.list_interface_templates(dt.id).await.unwrap();
    assert_eq!(templates.len(), 2);
    assert_eq!(templates[0].type_.as_ref().unwrap().value, "1000base-t");
}

#[tokio::test]
async fn test_get_by_slug() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/dcim/sites/"))
        .and(query_param("slug", "default"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(
            json!([{ "id": 9, "name": "Default", "slug": "default" }]),
            None,
        )))
        .mount(&server)
        .await;

    let site = client.get_by_slug("dcim/sites", "default").await.unwrap().unwrap();
    assert_eq!(site.id, 9);
}

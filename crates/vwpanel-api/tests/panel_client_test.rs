#![allow(clippy::unwrap_used)]
// Integration tests for `PanelClient` using wiremock.

use secrecy::SecretString;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use vwpanel_api::{Credentials, EnvVar, Error, PanelClient, SslSlot, SslUploadRequest};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, PanelClient) {
    let server = MockServer::start().await;
    let client = PanelClient::with_client(
        reqwest::Client::new(),
        Url::parse(&server.uri()).unwrap(),
        "/plugins/vw",
        Some(Credentials::Token(SecretString::from("t0ken".to_string()))),
    );
    (server, client)
}

fn plugin_path(suffix: &str) -> String {
    format!("/plugins/vw/{suffix}")
}

// ── Env tests ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_get_env() {
    let (server, client) = setup().await;

    let body = json!({
        "filePath": "/configs/.env",
        "variables": [
            { "key": "", "isSection": true, "originalLine": "## General settings" },
            {
                "key": "DOMAIN",
                "value": "https://vw.example.com",
                "enabled": true,
                "description": "Public URL",
                "originalLine": "DOMAIN=https://vw.example.com"
            },
            { "key": "SIGNUPS_ALLOWED", "enabled": false }
        ]
    });

    Mock::given(method("GET"))
        .and(path(plugin_path("api/env")))
        .and(header("authorization", "Bearer t0ken"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let env = client.get_env().await.unwrap();

    assert_eq!(env.file_path, "/configs/.env");
    assert_eq!(env.variables.len(), 3);
    assert!(env.variables[0].is_section);
    assert_eq!(env.variables[1].description, "Public URL");
    assert_eq!(env.variables[2].value, "");
    assert!(!env.variables[2].enabled);
}

#[tokio::test]
async fn test_save_env_sends_variables() {
    let (server, client) = setup().await;

    let vars = vec![EnvVar {
        key: "WEBSOCKET_ENABLED".into(),
        value: "true".into(),
        enabled: true,
        ..EnvVar::default()
    }];

    Mock::given(method("PUT"))
        .and(path(plugin_path("api/env")))
        .and(body_json(json!({
            "variables": [{
                "key": "WEBSOCKET_ENABLED",
                "value": "true",
                "enabled": true,
                "description": "",
                "isComment": false,
                "isSection": false,
                "originalLine": ""
            }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "Environment variables saved successfully",
            "filePath": "/configs/.env"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let resp = client.save_env(&vars).await.unwrap();

    assert_eq!(resp.success, Some(true));
    assert_eq!(resp.file_path.as_deref(), Some("/configs/.env"));
    assert!(resp.variables.is_none());
}

#[tokio::test]
async fn test_ping() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(plugin_path("test")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "ok",
            "message": "Vaultwarden .env Editor plugin is running"
        })))
        .mount(&server)
        .await;

    let pong = client.ping().await.unwrap();
    assert_eq!(pong.status, "ok");
}

// ── SSL tests ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_ssl_status() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(plugin_path("api/ssl/status")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "cert": {
                "name": "cert.pem",
                "size": 2048,
                "modTime": "2024-06-15 10:30:00",
                "exists": true
            },
            "key": { "exists": false }
        })))
        .mount(&server)
        .await;

    let status = client.ssl_status().await.unwrap();

    assert!(status.cert.exists);
    assert_eq!(status.cert.name, "cert.pem");
    assert_eq!(status.cert.size, 2048);
    assert!(!status.key.exists);
    assert_eq!(status.key.name, "");
}

#[tokio::test]
async fn test_upload_ssl_uses_type_query() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path(plugin_path("api/ssl/upload")))
        .and(query_param("type", "key"))
        .and(body_json(json!({
            "filename": "server.key",
            "fileData": "a2V5",
            "size": 3
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "Key file uploaded successfully",
            "filename": "/ssl/key.key"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let req = SslUploadRequest {
        filename: "server.key".into(),
        file_data: "a2V5".into(),
        size: 3,
    };
    let resp = client.upload_ssl(SslSlot::Key, &req).await.unwrap();

    assert_eq!(
        resp.message.as_deref(),
        Some("Key file uploaded successfully")
    );
    assert_eq!(resp.filename.as_deref(), Some("/ssl/key.key"));
}

#[tokio::test]
async fn test_delete_ssl() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path(plugin_path("api/ssl/delete")))
        .and(query_param("type", "cert"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "Cert file deleted successfully"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let resp = client.delete_ssl(SslSlot::Cert).await.unwrap();
    assert_eq!(resp.success, Some(true));
}

// ── Error tests ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_plain_text_error_body_is_surfaced() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path(plugin_path("api/ssl/delete")))
        .respond_with(ResponseTemplate::new(404).set_body_string("Key file not found\n"))
        .mount(&server)
        .await;

    let err = client.delete_ssl(SslSlot::Key).await.unwrap_err();

    assert!(err.is_not_found(), "got: {err:?}");
    assert_eq!(err.status(), Some(404));
    assert_eq!(err.reason(), "Key file not found");
    match err {
        Error::Api { message, .. } => assert_eq!(message, "Key file not found"),
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_empty_error_body_falls_back_to_status() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = client.get_env().await.unwrap_err();
    assert!(err.reason().contains("500"), "got: {err}");
}

#[tokio::test]
async fn test_unauthorized() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let result = client.ssl_status().await;
    assert!(
        matches!(result, Err(Error::Authentication { .. })),
        "expected Authentication error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_malformed_body() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(plugin_path("api/env")))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>login</html>"))
        .mount(&server)
        .await;

    let result = client.get_env().await;
    match result {
        Err(Error::Deserialization { ref body, .. }) => assert!(body.contains("login")),
        other => panic!("expected Deserialization error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_basic_auth_header() {
    let server = MockServer::start().await;
    let client = PanelClient::with_client(
        reqwest::Client::new(),
        Url::parse(&server.uri()).unwrap(),
        "/plugins/vw",
        Some(Credentials::Basic {
            username: "admin".into(),
            password: SecretString::from("admin".to_string()),
        }),
    );

    // base64("admin:admin")
    Mock::given(method("GET"))
        .and(header("authorization", "Basic YWRtaW46YWRtaW4="))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "ok" })))
        .expect(1)
        .mount(&server)
        .await;

    client.ping().await.unwrap();
}

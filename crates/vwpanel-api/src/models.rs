// Wire types for the plugin API.
//
// Field names follow the plugin's camelCase JSON. Everything the server
// may omit is defaulted so partial payloads still decode.

use serde::{Deserialize, Deserializer, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// One line-level unit of the env file, in the server's flat shape.
///
/// Exactly these seven fields cross the wire in both directions. The
/// discriminants (`is_comment`, `is_section`) are booleans here; the core
/// crate turns them into a closed enum.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvVar {
    #[serde(default, deserialize_with = "nullable_string")]
    pub key: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub value: String,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default, deserialize_with = "nullable_string")]
    pub description: String,
    #[serde(default)]
    pub is_comment: bool,
    #[serde(default)]
    pub is_section: bool,
    #[serde(default, deserialize_with = "nullable_string")]
    pub original_line: String,
}

/// `GET /api/env`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvResponse {
    #[serde(default)]
    pub variables: Vec<EnvVar>,
    #[serde(default)]
    pub file_path: String,
}

/// `PUT /api/env` body.
#[derive(Debug, Serialize)]
pub(crate) struct SaveEnvRequest<'a> {
    pub variables: &'a [EnvVar],
}

/// `PUT /api/env` response. The server echoes what it wrote; every field
/// is optional so older plugin builds still decode.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveEnvResponse {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub file_path: Option<String>,
    #[serde(default)]
    pub variables: Option<Vec<EnvVar>>,
}

/// One of the two TLS file positions.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum SslSlot {
    Cert,
    Key,
}

impl SslSlot {
    pub const ALL: [Self; 2] = [Self::Cert, Self::Key];

    /// Human label for headings.
    pub fn label(self) -> &'static str {
        match self {
            Self::Cert => "Certificate",
            Self::Key => "Private Key",
        }
    }
}

/// Metadata for one stored TLS file. `name`, `size` and `mod_time` are
/// only meaningful when `exists` is true.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SslFileInfo {
    pub name: String,
    pub size: u64,
    pub mod_time: String,
    pub exists: bool,
}

/// `GET /api/ssl/status`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SslStatusResponse {
    pub cert: SslFileInfo,
    pub key: SslFileInfo,
}

/// `PUT /api/ssl/upload` body. `file_data` is standard base64.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SslUploadRequest {
    pub filename: String,
    pub file_data: String,
    pub size: u64,
}

/// Generic `{success, message}` acknowledgement used by the SSL endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MessageResponse {
    pub success: Option<bool>,
    pub message: Option<String>,
    /// Destination path on upload.
    pub filename: Option<String>,
}

/// `GET /test`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PingResponse {
    pub status: String,
    pub message: String,
}

/// Treat an explicit JSON `null` like an absent string.
fn nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn env_var_defaults_missing_fields() {
        let v: EnvVar = serde_json::from_value(json!({ "key": "FOO", "enabled": true })).unwrap();
        assert_eq!(v.key, "FOO");
        assert_eq!(v.value, "");
        assert!(v.enabled);
        assert!(!v.is_comment);
    }

    #[test]
    fn env_var_null_value_is_empty() {
        let v: EnvVar = serde_json::from_value(json!({ "key": "FOO", "value": null })).unwrap();
        assert_eq!(v.value, "");
    }

    #[test]
    fn slot_parses_and_prints_lowercase() {
        assert_eq!("CERT".parse::<SslSlot>().unwrap(), SslSlot::Cert);
        assert_eq!(SslSlot::Key.to_string(), "key");
        assert_eq!(SslSlot::Cert.as_ref(), "cert");
    }

    #[test]
    fn upload_request_uses_camel_case() {
        let req = SslUploadRequest {
            filename: "chain.pem".into(),
            file_data: "AAA=".into(),
            size: 2,
        };
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({ "filename": "chain.pem", "fileData": "AAA=", "size": 2 })
        );
    }
}

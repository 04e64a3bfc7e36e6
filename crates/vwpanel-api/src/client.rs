// Plugin API HTTP client
//
// Wraps `reqwest::Client` with plugin-prefixed URL construction, credential
// injection, and response decoding. Endpoint groups (env, ssl) are inherent
// methods in separate files so this module stays about transport mechanics.

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::auth::Credentials;
use crate::error::Error;
use crate::transport::TransportConfig;

/// Route prefix the router mounts the Vaultwarden plugin under.
pub const DEFAULT_PLUGIN_PATH: &str = "/plugins/vw";

/// Longest slice of an error body kept in messages.
const BODY_PREVIEW: usize = 200;

/// Raw HTTP client for the plugin API.
///
/// Every path is resolved under `{base_url}{plugin_path}`. Non-2xx
/// responses become [`Error::Api`] carrying the plain-text body the plugin
/// writes for its failures.
#[derive(Debug, Clone)]
pub struct PanelClient {
    http: reqwest::Client,
    base_url: Url,
    plugin_path: String,
    credentials: Option<Credentials>,
}

impl PanelClient {
    /// Create a new client from a `TransportConfig`.
    pub fn new(
        base_url: Url,
        plugin_path: impl Into<String>,
        credentials: Option<Credentials>,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(http, base_url, plugin_path, credentials))
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(
        http: reqwest::Client,
        base_url: Url,
        plugin_path: impl Into<String>,
        credentials: Option<Credentials>,
    ) -> Self {
        Self {
            http,
            base_url,
            plugin_path: plugin_path.into(),
            credentials,
        }
    }

    /// The API base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The plugin route prefix.
    pub fn plugin_path(&self) -> &str {
        &self.plugin_path
    }

    /// Whether requests carry any credentials.
    pub fn has_credentials(&self) -> bool {
        self.credentials.is_some()
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build `{base}{plugin_path}/{path}`, tolerating stray slashes on
    /// every segment.
    pub(crate) fn plugin_url(&self, path: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let prefix = self.plugin_path.trim_matches('/');
        let path = path.trim_start_matches('/');
        let full = if prefix.is_empty() {
            format!("{base}/{path}")
        } else {
            format!("{base}/{prefix}/{path}")
        };
        Ok(Url::parse(&full)?)
    }

    // ── Request helpers ──────────────────────────────────────────────

    fn authorize(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.credentials {
            Some(credentials) => credentials.apply(builder),
            None => builder,
        }
    }

    /// Send a GET request and decode the JSON body.
    pub(crate) async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("GET {}", url);

        let resp = self.authorize(self.http.get(url)).send().await?;
        Self::parse_response(resp).await
    }

    /// Send a PUT request with a JSON body and decode the JSON response.
    pub(crate) async fn put<T: DeserializeOwned>(
        &self,
        url: Url,
        body: &(impl Serialize + Sync),
    ) -> Result<T, Error> {
        debug!("PUT {}", url);

        let resp = self
            .authorize(self.http.put(url).json(body))
            .send()
            .await?;
        Self::parse_response(resp).await
    }

    /// Send a DELETE request and decode the JSON response.
    pub(crate) async fn delete<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("DELETE {}", url);

        let resp = self.authorize(self.http.delete(url)).send().await?;
        Self::parse_response(resp).await
    }

    /// Map the status line, then decode the body as `T`.
    async fn parse_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
        let status = resp.status();
        trace!(%status, "response received");

        if status == reqwest::StatusCode::UNAUTHORIZED {
            let body = resp.text().await.unwrap_or_default();
            let message = error_message(&body)
                .unwrap_or_else(|| "missing or invalid credentials".into());
            return Err(Error::Authentication { message });
        }

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let message = error_message(&body).unwrap_or_else(|| format!("HTTP {status}"));
            return Err(Error::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = resp.text().await?;

        serde_json::from_str(&body).map_err(|e| {
            let preview = preview(&body);
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body: body.clone(),
            }
        })
    }
}

/// Trimmed error body, or `None` when the server sent nothing useful.
fn error_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(preview(trimmed).to_owned())
    }
}

/// At most `BODY_PREVIEW` bytes, cut on a char boundary.
fn preview(body: &str) -> &str {
    if body.len() <= BODY_PREVIEW {
        return body;
    }
    let mut end = BODY_PREVIEW;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    &body[..end]
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client(base: &str, prefix: &str) -> PanelClient {
        PanelClient::with_client(
            reqwest::Client::new(),
            Url::parse(base).unwrap(),
            prefix,
            None,
        )
    }

    #[test]
    fn plugin_url_joins_segments() {
        let c = client("http://router.lan", DEFAULT_PLUGIN_PATH);
        assert_eq!(
            c.plugin_url("api/env").unwrap().as_str(),
            "http://router.lan/plugins/vw/api/env"
        );
    }

    #[test]
    fn plugin_url_tolerates_slashes() {
        let c = client("http://router.lan:8080/", "/plugins/vw/");
        assert_eq!(
            c.plugin_url("/api/ssl/status").unwrap().as_str(),
            "http://router.lan:8080/plugins/vw/api/ssl/status"
        );
    }

    #[test]
    fn plugin_url_without_prefix() {
        let c = client("http://127.0.0.1:9000", "");
        assert_eq!(
            c.plugin_url("test").unwrap().as_str(),
            "http://127.0.0.1:9000/test"
        );
    }

    #[test]
    fn preview_cuts_on_char_boundary() {
        let body = "é".repeat(150);
        let cut = preview(&body);
        assert!(cut.len() <= BODY_PREVIEW);
        assert!(body.starts_with(cut));
    }

    #[test]
    fn blank_error_body_is_none() {
        assert_eq!(error_message("  \n"), None);
        assert_eq!(
            error_message("Invalid request body\n").as_deref(),
            Some("Invalid request body")
        );
    }
}

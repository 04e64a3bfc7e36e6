// Env file endpoints
//
// Whole-document read and replace of the Vaultwarden `.env`, plus the
// plugin's liveness probe.

use tracing::debug;

use crate::client::PanelClient;
use crate::error::Error;
use crate::models::{EnvResponse, EnvVar, PingResponse, SaveEnvRequest, SaveEnvResponse};

impl PanelClient {
    /// Check that the plugin is running.
    ///
    /// `GET /test`
    pub async fn ping(&self) -> Result<PingResponse, Error> {
        let url = self.plugin_url("test")?;
        debug!("pinging plugin");
        self.get(url).await
    }

    /// Fetch every line of the env file, plus the path it was read from.
    ///
    /// `GET /api/env`
    ///
    /// The plugin falls back to `.env.template` when no `.env` exists yet,
    /// so `file_path` tells the two apart.
    pub async fn get_env(&self) -> Result<EnvResponse, Error> {
        let url = self.plugin_url("api/env")?;
        debug!("fetching env file");
        self.get(url).await
    }

    /// Replace the whole env file.
    ///
    /// `PUT /api/env` with `{"variables": [...]}`
    pub async fn save_env(&self, variables: &[EnvVar]) -> Result<SaveEnvResponse, Error> {
        let url = self.plugin_url("api/env")?;
        debug!(count = variables.len(), "saving env file");
        self.put(url, &SaveEnvRequest { variables }).await
    }
}

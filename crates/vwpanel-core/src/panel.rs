// ── Panel facade ──
//
// One API client, one status banner, and the two managers built on
// them. This is what a presentation layer holds.

use std::sync::Arc;

use tracing::debug;
use vwpanel_api::{PanelClient, PingResponse};

use crate::certs::CertificateManager;
use crate::config::PanelConfig;
use crate::error::{CoreError, MissingSettings};
use crate::status::StatusBanner;
use crate::sync::ConfigSynchronizer;

#[derive(Debug)]
pub struct Panel {
    client: PanelClient,
    banner: StatusBanner,
    env: Arc<ConfigSynchronizer>,
    certs: CertificateManager,
}

impl Panel {
    /// Build the client from `config`. Missing settings are remembered,
    /// not rejected.
    pub fn new(config: &PanelConfig) -> Result<Self, CoreError> {
        let client = config.build_client()?;
        Ok(Self::with_client(client, config.missing()))
    }

    pub fn with_client(client: PanelClient, missing: MissingSettings) -> Self {
        let banner = StatusBanner::new();
        let env = Arc::new(ConfigSynchronizer::new(
            client.clone(),
            missing,
            banner.clone(),
        ));
        let certs = CertificateManager::new(client.clone(), banner.clone(), Arc::clone(&env));
        Self {
            client,
            banner,
            env,
            certs,
        }
    }

    pub fn env(&self) -> &ConfigSynchronizer {
        &self.env
    }

    pub fn certs(&self) -> &CertificateManager {
        &self.certs
    }

    pub fn banner(&self) -> &StatusBanner {
        &self.banner
    }

    /// Check the plugin answers at all.
    pub async fn ping(&self) -> Result<PingResponse, CoreError> {
        Ok(self.client.ping().await?)
    }

    /// Reload the env file and the slot status concurrently. The env
    /// error wins when both fail.
    pub async fn refresh(&self) -> Result<(), CoreError> {
        debug!("refreshing panel");
        let (env, ssl) = tokio::join!(self.env.load(), self.certs.refresh_status());
        env?;
        ssl?;
        Ok(())
    }
}

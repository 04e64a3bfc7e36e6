// vwpanel-api: Async Rust client for the Vaultwarden plugin API

pub mod auth;
pub mod client;
pub mod env;
pub mod error;
pub mod models;
pub mod ssl;
pub mod transport;

pub use auth::Credentials;
pub use client::{DEFAULT_PLUGIN_PATH, PanelClient};
pub use error::Error;
pub use models::{
    EnvResponse, EnvVar, MessageResponse, PingResponse, SaveEnvResponse, SslFileInfo, SslSlot,
    SslStatusResponse, SslUploadRequest,
};
pub use transport::{TlsMode, TransportConfig};

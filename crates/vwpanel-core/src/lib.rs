// vwpanel-core: env file sync and TLS file management on top of vwpanel-api
//
// `ConfigSynchronizer` owns the entry list, `CertificateManager` owns the
// two TLS slots, and `Panel` wires both to one client and one status
// banner. State is published through `tokio::sync::watch` channels.

pub mod certs;
pub mod config;
pub mod error;
pub mod model;
pub mod panel;
pub mod status;
pub mod sync;
pub mod tracker;

pub use certs::{ALLOWED_EXTENSIONS, CertificateManager, PendingDelete, validate_upload_path};
pub use config::PanelConfig;
pub use error::{CoreError, MissingSettings};
pub use model::{
    Comment, ConfigEntry, EntryGroup, Section, SlotStatus, SslStatus, Variable, group_by_section,
};
pub use panel::Panel;
pub use status::{StatusBanner, StatusKind, StatusMessage};
pub use sync::{ConfigSynchronizer, LoadPhase};
pub use tracker::{ActionState, ActionTracker, InFlightGuard};

// Re-exported so callers need no direct dependency on the API crate.
pub use vwpanel_api::{
    Credentials, DEFAULT_PLUGIN_PATH, PingResponse, SslFileInfo, SslSlot, TlsMode,
};

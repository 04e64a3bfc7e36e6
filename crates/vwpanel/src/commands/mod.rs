//! Command dispatch: bridges CLI args -> panel operations -> output formatting.

pub mod config_cmd;
pub mod env;
pub mod ssl;
pub mod status;
pub mod util;

use vwpanel_core::Panel;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a router-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, panel: &Panel, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Env(args) => env::handle(panel, args, global).await,
        Command::Ssl(args) => ssl::handle(panel, args, global).await,
        Command::Status => status::handle_status(panel, global).await,
        Command::Ping => status::handle_ping(panel, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}

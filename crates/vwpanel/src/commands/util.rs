//! Shared helpers for command handlers.

use std::io::{self, IsTerminal};

use vwpanel_core::SslSlot;

use crate::cli::SlotArg;
use crate::error::CliError;

/// Prompt for confirmation, auto-approving if `--yes` was passed.
///
/// Without a terminal to ask on, `--yes` is required.
pub fn confirm(message: &str, action: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: action.into(),
        });
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(io::Error::other(e)))?;
    Ok(confirmed)
}

pub fn slot_from_arg(arg: SlotArg) -> SslSlot {
    match arg {
        SlotArg::Cert => SslSlot::Cert,
        SlotArg::Key => SslSlot::Key,
    }
}

//! TLS certificate and key command handlers.

use std::io::{self, IsTerminal};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tabled::Tabled;

use vwpanel_core::{Panel, SlotStatus, SslSlot, SslStatus};

use crate::cli::{GlobalOpts, SslArgs, SslCommand};
use crate::commands::util;
use crate::error::CliError;
use crate::output;

// ── Views ───────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub(crate) struct SlotView {
    pub slot: SslSlot,
    pub present: bool,
    pub name: Option<String>,
    pub size: Option<u64>,
    pub modified: Option<String>,
    pub age: Option<String>,
}

impl SlotView {
    fn new(slot: SslSlot, status: &SlotStatus) -> Self {
        Self {
            slot,
            present: status.is_present(),
            name: status.file().map(|f| f.name.clone()),
            size: status.file().map(|f| f.size),
            modified: status.file().map(|f| f.mod_time.clone()),
            age: status.age(),
        }
    }
}

#[derive(Tabled)]
struct SlotRow {
    #[tabled(rename = "Slot")]
    slot: &'static str,
    #[tabled(rename = "State")]
    state: &'static str,
    #[tabled(rename = "File")]
    name: String,
    #[tabled(rename = "Size")]
    size: String,
    #[tabled(rename = "Modified")]
    modified: String,
}

pub(crate) fn slot_views(status: &SslStatus) -> Vec<SlotView> {
    SslSlot::ALL
        .into_iter()
        .map(|slot| SlotView::new(slot, status.slot(slot)))
        .collect()
}

fn to_row(view: &SlotView, status: &SslStatus) -> SlotRow {
    SlotRow {
        slot: view.slot.label(),
        state: if view.present { "present" } else { "missing" },
        name: view.name.clone().unwrap_or_default(),
        size: status.slot(view.slot).size_label().unwrap_or_default(),
        modified: match (&view.modified, &view.age) {
            (Some(modified), Some(age)) => format!("{modified} ({age})"),
            (modified, _) => modified.clone().unwrap_or_default(),
        },
    }
}

fn spinner(message: String, quiet: bool) -> ProgressBar {
    if quiet || !io::stderr().is_terminal() {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new_spinner().with_message(message);
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        bar.set_style(style);
    }
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(panel: &Panel, args: SslArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let certs = panel.certs();

    match args.command {
        SslCommand::Status => {
            let status = certs.refresh_status().await?;
            let views = slot_views(&status);
            let out = output::render_list(
                &global.output,
                &views,
                |v| to_row(v, &status),
                |v| {
                    let state = if v.present { "present" } else { "missing" };
                    format!("{}\t{state}", v.slot)
                },
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        SslCommand::Upload { slot, file } => {
            let slot = util::slot_from_arg(slot);
            let bar = spinner(
                format!("Uploading {} from {}", slot.label(), file.display()),
                global.quiet,
            );
            let result = certs.upload_slot(slot, &file).await;
            bar.finish_and_clear();

            let message = result?;
            output::print_status(&message, global.quiet);
            Ok(())
        }

        SslCommand::Delete { slot } => {
            let slot = util::slot_from_arg(slot);
            let pending = certs.request_delete(slot);
            if !util::confirm(&pending.prompt(), &format!("ssl delete {slot}"), global.yes)? {
                tracing::info!(%slot, "delete cancelled");
                return Ok(());
            }
            let message = pending.confirm().await?;
            output::print_status(&message, global.quiet);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use vwpanel_core::SslFileInfo;

    use super::*;

    fn status() -> SslStatus {
        SslStatus {
            cert: SlotStatus::Present(SslFileInfo {
                name: "cert.pem".into(),
                size: 2048,
                mod_time: "2024-05-01 12:00:00".into(),
                exists: true,
            }),
            key: SlotStatus::Missing,
        }
    }

    #[test]
    fn rows_cover_both_slots_in_order() {
        let status = status();
        let views = slot_views(&status);
        assert_eq!(views.len(), 2);

        let cert = to_row(&views[0], &status);
        assert_eq!(cert.slot, "Certificate");
        assert_eq!(cert.state, "present");
        assert_eq!(cert.size, "2.0 KB");
        assert!(cert.modified.starts_with("2024-05-01 12:00:00 ("), "{}", cert.modified);
        assert!(cert.modified.ends_with("d ago)"), "{}", cert.modified);

        let key = to_row(&views[1], &status);
        assert_eq!(key.slot, "Private Key");
        assert_eq!(key.state, "missing");
        assert!(key.name.is_empty());
    }
}

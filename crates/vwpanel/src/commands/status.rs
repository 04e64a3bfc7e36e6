//! `status` and `ping` handlers.

use serde::Serialize;

use vwpanel_core::{ConfigEntry, Panel};

use crate::cli::GlobalOpts;
use crate::commands::ssl::{SlotView, slot_views};
use crate::error::CliError;
use crate::output::{self, paint_heading, paint_state, should_color};

#[derive(Debug, Serialize)]
struct Summary {
    file_path: String,
    variables: usize,
    enabled: usize,
    sections: usize,
    tls_ready: bool,
    slots: Vec<SlotView>,
}

impl Summary {
    fn new(file_path: String, entries: &[ConfigEntry], slots: Vec<SlotView>, tls_ready: bool) -> Self {
        let variables = entries.iter().filter_map(ConfigEntry::as_variable);
        Self {
            file_path,
            variables: variables.clone().count(),
            enabled: variables.filter(|v| v.enabled).count(),
            sections: entries.iter().filter(|e| e.is_section()).count(),
            tls_ready,
            slots,
        }
    }

    fn detail(&self, color: bool) -> String {
        let mut lines = vec![
            paint_heading("Env file", color),
            format!("  Path:      {}", self.file_path),
            format!(
                "  Variables: {} ({} enabled, {} sections)",
                self.variables, self.enabled, self.sections
            ),
            String::new(),
            paint_heading("TLS", color),
        ];
        for slot in &self.slots {
            let state = paint_state(
                if slot.present { "present" } else { "missing" },
                slot.present,
                color,
            );
            let name = slot.name.as_deref().unwrap_or_default();
            lines.push(format!("  {:<12} {state} {name}", slot.slot.label()));
        }
        let ready = paint_state(
            if self.tls_ready { "ready" } else { "incomplete" },
            self.tls_ready,
            color,
        );
        lines.push(format!("  {:<12} {ready}", "HTTPS"));
        lines.join("\n")
    }
}

pub async fn handle_status(panel: &Panel, global: &GlobalOpts) -> Result<(), CliError> {
    panel.refresh().await?;

    let ssl = panel.certs().status();
    let summary = Summary::new(
        panel.env().file_path(),
        &panel.env().entries(),
        slot_views(&ssl),
        ssl.is_ready(),
    );
    let color = should_color(&global.color);
    let out = output::render_single(
        &global.output,
        &summary,
        |s| s.detail(color),
        |s| format!("{}\t{}\t{}", s.file_path, s.variables, s.tls_ready),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

#[derive(Debug, Serialize)]
struct PingView {
    status: String,
    message: String,
}

pub async fn handle_ping(panel: &Panel, global: &GlobalOpts) -> Result<(), CliError> {
    let resp = panel.ping().await?;
    let view = PingView {
        status: resp.status,
        message: resp.message,
    };
    let out = output::render_single(
        &global.output,
        &view,
        |v| format!("{}: {}", v.status, v.message),
        |v| v.status.clone(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

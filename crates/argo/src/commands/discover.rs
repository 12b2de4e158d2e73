//! Discover command handler.

use std::io::IsTerminal;
use std::time::Duration;

use futures::future::join_all;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tabled::Tabled;
use tracing::warn;

use argo_config::Config;
use argo_core::{DeviceDescriptor, Scanner};

use crate::cli::{DiscoverArgs, GlobalOpts, OutputFormat};
use crate::config;
use crate::error::CliError;
use crate::output;

// ── Result model ────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct FoundDevice {
    host: Option<String>,
    usn: Option<String>,
    location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    friendly_name: Option<String>,
}

impl FoundDevice {
    fn new(device: &DeviceDescriptor, friendly_name: Option<String>) -> Self {
        Self {
            host: device.host(),
            usn: device.usn().map(str::to_owned),
            location: device.location_url().map(str::to_owned),
            friendly_name,
        }
    }
}

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct DeviceRow {
    #[tabled(rename = "Host")]
    host: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "USN")]
    usn: String,
}

impl From<&FoundDevice> for DeviceRow {
    fn from(d: &FoundDevice) -> Self {
        Self {
            host: d.host.clone().unwrap_or_else(|| "-".into()),
            name: d.friendly_name.clone().unwrap_or_else(|| "-".into()),
            usn: d.usn.clone().unwrap_or_default(),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    args: DiscoverArgs,
    cfg: &Config,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let discovery = config::discovery_config(global, cfg, args.timeout_secs);
    let spinner = spinner(global.quiet, "Searching for BLOBbox appliances...");

    let result = Scanner::new(discovery).scan().await;
    if let Some(ref bar) = spinner {
        bar.finish_and_clear();
    }
    let devices = result?;

    let names = if args.names {
        join_all(devices.iter().map(friendly_name)).await
    } else {
        vec![None; devices.len()]
    };
    let found: Vec<FoundDevice> = devices
        .iter()
        .zip(names)
        .map(|(device, name)| FoundDevice::new(device, name))
        .collect();

    if found.is_empty() && matches!(global.output, OutputFormat::Table) {
        if !global.quiet {
            eprintln!("No appliances found");
        }
        return Ok(());
    }

    let out = output::render_list(
        global.output,
        &found,
        |d| DeviceRow::from(d),
        |d| d.host.clone().unwrap_or_default(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

/// A device's friendly name; fetch failures are logged and shown as blank.
async fn friendly_name(device: &DeviceDescriptor) -> Option<String> {
    match device.friendly_name().await {
        Ok(name) => name,
        Err(e) => {
            warn!(device = %device, error = %e, "could not fetch friendly name");
            None
        }
    }
}

fn spinner(quiet: bool, message: &'static str) -> Option<ProgressBar> {
    if quiet || !std::io::stderr().is_terminal() {
        return None;
    }
    let bar = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        bar.set_style(style);
    }
    bar.set_message(message);
    bar.enable_steady_tick(Duration::from_millis(100));
    Some(bar)
}

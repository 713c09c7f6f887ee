//! Signature pad command-line host.
//!
//! Replays a gesture script onto a fresh canvas, saves the signature and
//! prints the saved asset as JSON.

use std::io::Read;
use std::path::Path;

use anyhow::Context;
use clap::Parser;
use signature_core::parse_script;
use signature_pad::{CliArgs, PadConfig, SignaturePad};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing with optional JSON output.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,signature_pad=debug"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true);

    // RUST_LOG_FORMAT=json switches to structured output
    if std::env::var("RUST_LOG_FORMAT").as_deref() == Ok("json") {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer.json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

fn read_script(path: &Path) -> anyhow::Result<String> {
    if path.as_os_str() == "-" {
        let mut script = String::new();
        std::io::stdin()
            .read_to_string(&mut script)
            .context("failed to read gesture script from stdin")?;
        Ok(script)
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("failed to read gesture script {}", path.display()))
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let args = CliArgs::parse();
    let script_path = args.script.clone();
    let config = PadConfig::from(args);
    tracing::debug!("Pad config: {config:?}");

    let events = parse_script(&read_script(&script_path)?).context("invalid gesture script")?;
    tracing::info!("Replaying {} events", events.len());

    let mut pad = SignaturePad::from_config(config)?;
    let rejected = pad.replay(&events);
    if rejected > 0 {
        tracing::warn!("{rejected} commands were rejected");
    }

    let saved = pad.save().context("failed to save signature")?;
    println!("{}", serde_json::to_string_pretty(&saved)?);
    Ok(())
}

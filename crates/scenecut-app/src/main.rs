//! Scenecut - clip timeline script runner
//!
//! Replays a JSON edit script through an editor session and writes the
//! resulting export request to stdout.
//!
//! Usage: scenecut <script.json> [--config <editor.json>]

mod script;

use std::io::Write;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use scenecut_timeline::EditorConfig;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::script::EditScript;

fn main() -> Result<()> {
    // Initialize logging; stdout carries the export body
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut args = std::env::args().skip(1);
    let mut script_path = None;
    let mut config_path = None;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                config_path = Some(PathBuf::from(args.next().context("--config needs a path")?));
            }
            _ if script_path.is_none() => script_path = Some(PathBuf::from(arg)),
            _ => bail!("unexpected argument '{arg}'"),
        }
    }
    let script_path = script_path.context("usage: scenecut <script.json> [--config <editor.json>]")?;

    let mut script = EditScript::load(&script_path)?;
    if let Some(path) = config_path {
        script.config = EditorConfig::load_from_file(&path)
            .with_context(|| format!("loading config {}", path.display()))?;
    }
    info!(
        script = %script_path.display(),
        assets = script.assets.len(),
        steps = script.steps.len(),
        "replaying edit script"
    );

    let replay = script.replay()?;
    let request = replay.session.export(script.export.settings())?;

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(&request.to_json()?)?;
    writeln!(stdout)?;

    if replay.rejected > 0 {
        info!(rejected = replay.rejected, "some steps were skipped");
    }
    Ok(())
}

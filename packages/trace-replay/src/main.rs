mod config;
mod logging;
mod replay;

use std::path::PathBuf;
use std::process::ExitCode;

use glyph_trace::{FileStore, MasteryTracker, TraceScorer, TracingSettings};

use config::Config;
use replay::{load_catalog, parse_strokes, read_file, ReplayError, ReplayResult};

const USAGE: &str = "usage: trace-replay <catalog.json> <glyph-id> <strokes.json>";

fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    let config = Config::from_env();
    let _log_guard = logging::init_tracing(&config.log_level);

    let args: Vec<String> = std::env::args().skip(1).collect();
    let [catalog_path, glyph_id, strokes_path] = args.as_slice() else {
        eprintln!("{USAGE}");
        return ExitCode::from(2);
    };

    match run(
        &config,
        PathBuf::from(catalog_path),
        glyph_id,
        PathBuf::from(strokes_path),
    ) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "replay failed");
            eprintln!("{}", failure_line(&e));
            ExitCode::FAILURE
        }
    }
}

/// Stderr line for a failed run, printed whatever the log filter is
fn failure_line(err: &ReplayError) -> String {
    format!("trace-replay: {err}")
}

fn run(
    config: &Config,
    catalog_path: PathBuf,
    glyph_id: &str,
    strokes_path: PathBuf,
) -> ReplayResult<()> {
    let catalog = load_catalog(&catalog_path)?;
    let strokes = parse_strokes(&read_file(&strokes_path)?)?;

    let settings = TracingSettings {
        sensitivity: config.sensitivity,
        ..TracingSettings::default()
    };
    let mut scorer = TraceScorer::new(catalog, settings);

    let store = FileStore::open(&config.store_dir)?;
    let mut tracker = MasteryTracker::with_key(store, &config.progress_key);

    let report = replay::replay(&mut scorer, &mut tracker, glyph_id, &strokes)?;
    println!("{}", serde_json::to_string_pretty(&report)?);

    if let Some(err) = tracker.last_persist_error() {
        tracing::warn!(error = %err, store = %config.store_dir.display(), "progress not persisted");
    }
    Ok(())
}

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};

use crate::analysis::FrameAnalysis;
use crate::db::{Database, StoredAnalysis};
use crate::metrics::SessionMetrics;
use crate::progress::compare_recent;
use crate::sensing::{AnalysisController, SessionRunner};
use crate::settings::{AnalyzerSettings, SettingsStore};

const ENABLE_LOGS: bool = true;

use crate::{log_error, log_info};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Settings file (JSON); defaults apply when it does not exist
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// SQLite file for analysis history, overriding the settings file
    #[arg(long, global = true)]
    pub history_db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Analyze a JSONL pose export and print the swing report
    Analyze {
        /// Pose export, one JSON object per frame
        input: PathBuf,

        /// Name stored with the analysis in the history
        #[arg(long)]
        label: Option<String>,

        /// Also write every frame's detector results to this JSONL file
        #[arg(long)]
        frames: Option<PathBuf>,
    },
    /// List stored analyses, newest first
    History {
        #[arg(short, long, default_value_t = 10)]
        limit: usize,
    },
    /// Compare the latest stored swing with the one before it
    Compare {
        /// How many recent swings feed the long-run trend
        #[arg(short, long, default_value_t = 5)]
        limit: usize,
    },
    /// Print the effective settings
    Settings {
        /// Write them back to the --config file, keeping a --history-db override
        #[arg(long)]
        save: bool,
    },
}

pub async fn dispatch(args: Args) -> Result<()> {
    let store = args.config.clone().map(SettingsStore::new).transpose()?;
    let settings = store
        .as_ref()
        .map(SettingsStore::settings)
        .unwrap_or_default();
    let history_db = args.history_db.or_else(|| settings.history_db.clone());

    match args.command {
        Command::Analyze {
            input,
            label,
            frames,
        } => {
            let db = history_db.map(Database::new).transpose()?;
            analyze(&input, &settings, db.as_ref(), label, frames.as_deref()).await
        }
        Command::History { limit } => {
            let db = open_history(history_db)?;
            let analyses = db.recent_analyses(limit).await?;
            print_json(&analyses)
        }
        Command::Compare { limit } => {
            let db = open_history(history_db)?;
            let comparison = compare_recent(&db, limit).await?;
            print_json(&comparison)
        }
        Command::Settings { save } => {
            let effective = AnalyzerSettings {
                history_db,
                ..settings
            };
            if save {
                let store = store.context("--save needs a settings file; pass --config")?;
                store.update(effective.clone())?;
                log_info!("settings written to {}", store.path().display());
            }
            print_json(&effective)
        }
    }
}

fn open_history(path: Option<PathBuf>) -> Result<Database> {
    let path = path.context("no history database configured; pass --history-db")?;
    Database::new(path)
}

async fn analyze(
    input: &Path,
    settings: &AnalyzerSettings,
    db: Option<&Database>,
    label: Option<String>,
    frames_out: Option<&Path>,
) -> Result<()> {
    let runner = SessionRunner::new(settings.detection.clone())
        .with_progress_log_every(settings.progress_log_every);

    let controller = match AnalysisController::open(input, runner) {
        Ok(controller) => controller,
        Err(err) => {
            log_error!("cannot analyze {}: {err:#}", input.display());
            return print_json(&SessionMetrics::error(format!("{err:#}")));
        }
    };

    let cancel = controller.cancellation_token();
    let interrupt = tokio::spawn(async move {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                log_info!("interrupt received, stopping analysis");
                cancel.cancel();
            }
            _ = cancel.cancelled() => {}
        }
    });

    let outcome = controller.finish().await;
    interrupt.abort();
    let outcome = outcome?;

    if let Some(path) = frames_out {
        write_frames(path, &outcome.frames)?;
    }

    if let Some(db) = db {
        if outcome.metrics.is_error() {
            log_info!("analysis produced no figures, not recording it");
        } else {
            let record = StoredAnalysis::from_metrics(&outcome.metrics, label, Utc::now())?;
            db.insert_analysis(&record)
                .await
                .context("failed to record analysis")?;
            log_info!("recorded analysis {}", record.id);
        }
    }

    print_json(&outcome.metrics)
}

fn write_frames(path: &Path, frames: &[FrameAnalysis]) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create frame dump {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    for frame in frames {
        serde_json::to_writer(&mut writer, frame)?;
        writer.write_all(b"\n")?;
    }
    writer
        .flush()
        .with_context(|| format!("failed to write frame dump {}", path.display()))
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{json}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_analyze_with_globals_after_subcommand() {
        let args = Args::try_parse_from([
            "swingsage",
            "analyze",
            "swing.jsonl",
            "--label",
            "driver",
            "--history-db",
            "h.db",
        ])
        .unwrap();

        assert_eq!(args.history_db, Some(PathBuf::from("h.db")));
        match args.command {
            Command::Analyze { input, label, frames } => {
                assert_eq!(input, PathBuf::from("swing.jsonl"));
                assert_eq!(label.as_deref(), Some("driver"));
                assert!(frames.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn parses_settings_save() {
        let args =
            Args::try_parse_from(["swingsage", "--config", "s.json", "settings", "--save"]).unwrap();
        assert_eq!(args.config, Some(PathBuf::from("s.json")));
        assert!(matches!(args.command, Command::Settings { save: true }));
    }

    #[tokio::test]
    async fn settings_save_records_history_override() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = dir.path().join("settings.json");
        let history = dir.path().join("history.db");

        dispatch(Args {
            config: Some(config.clone()),
            history_db: Some(history.clone()),
            command: Command::Settings { save: true },
        })
        .await
        .unwrap();

        let saved = SettingsStore::new(config).unwrap().settings();
        assert_eq!(saved.history_db, Some(history));
    }

    #[tokio::test]
    async fn settings_save_without_config_fails() {
        let result = dispatch(Args {
            config: None,
            history_db: None,
            command: Command::Settings { save: true },
        })
        .await;
        assert!(result.is_err());
    }

    #[test]
    fn history_limit_defaults_to_ten() {
        let args = Args::try_parse_from(["swingsage", "history"]).unwrap();
        assert!(matches!(args.command, Command::History { limit: 10 }));
    }
}

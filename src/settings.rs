use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    sync::RwLock,
};

use crate::analysis::DetectionConfig;
use crate::sensing::DEFAULT_PROGRESS_LOG_EVERY;

const ENABLE_LOGS: bool = true;

use crate::log_warn;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnalyzerSettings {
    pub detection: DetectionConfig,
    /// Where finished analyses are recorded; `None` disables history.
    pub history_db: Option<PathBuf>,
    pub progress_log_every: usize,
}

impl Default for AnalyzerSettings {
    fn default() -> Self {
        Self {
            detection: DetectionConfig::default(),
            history_db: None,
            progress_log_every: DEFAULT_PROGRESS_LOG_EVERY,
        }
    }
}

pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<AnalyzerSettings>,
}

impl SettingsStore {
    /// A missing file yields defaults; malformed JSON yields defaults with a warning.
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_else(|err| {
                log_warn!("ignoring malformed settings in {}: {}", path.display(), err);
                AnalyzerSettings::default()
            })
        } else {
            AnalyzerSettings::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn settings(&self) -> AnalyzerSettings {
        match self.data.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn update(&self, settings: AnalyzerSettings) -> Result<()> {
        let mut guard = match self.data.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        self.persist(&settings)?;
        *guard = settings;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, data: &AnalyzerSettings) -> Result<()> {
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }
}

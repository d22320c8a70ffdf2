//! Study configuration loading and parsing
//!
//! A study file describes which code transforms run before epoching, e.g.:
//!
//! ```toml
//! name = "dpx"
//!
//! [[merge]]
//! codes = [72, 73]
//! target = 71
//!
//! [recode.cues]
//! A = [70]
//! B = [71]
//!
//! [recode.probes]
//! X = [76]
//!
//! [[recode.combined]]
//! cue = "A"
//! probe = "X"
//! code = 1
//!
//! [event_id]
//! AX = 1
//! ```

use anyhow::{Context, Result};
use eeg_trigger_recoder::{EventIdMap, RecoderConfig, RemapTable, TriggerCode};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Main study configuration (loaded from a TOML file)
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct StudyConfig {
    /// Study name used in logs and summaries
    #[serde(default)]
    pub name: Option<String>,
    /// Code merges, applied first and in order
    #[serde(default)]
    pub merge: Vec<MergeConfig>,
    /// Total remap table, applied after merging
    #[serde(default)]
    pub remap: Option<RemapTable>,
    /// Cue→probe recoding, applied last
    #[serde(default)]
    pub recode: Option<RecoderConfig>,
    /// Condition labels for the final codes
    #[serde(default)]
    pub event_id: EventIdMap,
}

/// Collapse `codes` into `target`
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct MergeConfig {
    pub codes: Vec<TriggerCode>,
    pub target: TriggerCode,
}

impl StudyConfig {
    /// Parse a study configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse study configuration")
    }

    /// Name for logs, falling back to "unnamed"
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("unnamed")
    }
}

/// Load a study configuration from a TOML file
pub fn load_config(path: &Path) -> Result<StudyConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: StudyConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    log::debug!("Loaded study '{}' from {:?}", config.display_name(), path);
    Ok(config)
}

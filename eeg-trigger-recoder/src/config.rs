//! Recoder configuration types
//!
//! This module defines the configuration needed to collapse cue→probe
//! sequences: which raw codes belong to which cue and probe category, and
//! which combined code each (cue, probe) pairing produces.

use crate::types::{RecodeError, Result, TriggerCode};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Named sets of raw codes considered equivalent for recoding
pub type CategoryGroups = BTreeMap<String, BTreeSet<TriggerCode>>;

/// Output code for one (cue category, probe category) pairing
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct CombinedCode {
    /// Cue category name
    pub cue: String,
    /// Probe category name
    pub probe: String,
    /// Code written at the probe position
    pub code: TriggerCode,
}

/// Configuration for the cue→probe recoder
///
/// Deserializes from TOML such as:
///
/// ```toml
/// [cues]
/// A = [70]
/// B = [71, 72, 73, 74, 75]
///
/// [probes]
/// X = [76]
///
/// [[combined]]
/// cue = "A"
/// probe = "X"
/// code = 1
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RecoderConfig {
    /// Cue categories (first stage of the sequence)
    #[serde(default)]
    pub cues: CategoryGroups,

    /// Probe categories (second stage of the sequence)
    #[serde(default)]
    pub probes: CategoryGroups,

    /// Combined codes for (cue, probe) pairings
    #[serde(default)]
    pub combined: Vec<CombinedCode>,
}

impl RecoderConfig {
    /// Create an empty configuration (recoding becomes a pass-through)
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: add codes to a cue category
    pub fn add_cue(
        mut self,
        name: impl Into<String>,
        codes: impl IntoIterator<Item = TriggerCode>,
    ) -> Self {
        self.cues.entry(name.into()).or_default().extend(codes);
        self
    }

    /// Builder method: add codes to a probe category
    pub fn add_probe(
        mut self,
        name: impl Into<String>,
        codes: impl IntoIterator<Item = TriggerCode>,
    ) -> Self {
        self.probes.entry(name.into()).or_default().extend(codes);
        self
    }

    /// Builder method: map a (cue, probe) pairing to a combined code
    pub fn map_pair(
        mut self,
        cue: impl Into<String>,
        probe: impl Into<String>,
        code: TriggerCode,
    ) -> Self {
        self.combined.push(CombinedCode {
            cue: cue.into(),
            probe: probe.into(),
            code,
        });
        self
    }

    /// Look up the combined code for a pairing
    pub fn combined_code(&self, cue: &str, probe: &str) -> Option<TriggerCode> {
        self.combined
            .iter()
            .find(|c| c.cue == cue && c.probe == probe)
            .map(|c| c.code)
    }

    /// Check the configuration for structural errors
    ///
    /// Every raw code may belong to at most one category across cues and
    /// probes combined. Combined-code entries must name declared categories
    /// and may not assign two different codes to the same pairing. An
    /// incomplete table is allowed here; a missing pairing only fails when
    /// it is actually encountered during a scan.
    pub fn validate(&self) -> Result<()> {
        let mut owner: BTreeMap<TriggerCode, String> = BTreeMap::new();
        let groups = self
            .cues
            .iter()
            .map(|(name, codes)| (format!("cue '{}'", name), codes))
            .chain(self.probes.iter().map(|(name, codes)| (format!("probe '{}'", name), codes)));

        for (label, codes) in groups {
            for &code in codes {
                if let Some(existing) = owner.get(&code) {
                    return Err(RecodeError::InvalidConfiguration(format!(
                        "code {} belongs to both {} and {}",
                        code, existing, label
                    )));
                }
                owner.insert(code, label.clone());
            }
        }

        let mut seen: BTreeMap<(&str, &str), TriggerCode> = BTreeMap::new();
        for entry in &self.combined {
            if !self.cues.contains_key(&entry.cue) {
                return Err(RecodeError::InvalidConfiguration(format!(
                    "combined code {} refers to undeclared cue '{}'",
                    entry.code, entry.cue
                )));
            }
            if !self.probes.contains_key(&entry.probe) {
                return Err(RecodeError::InvalidConfiguration(format!(
                    "combined code {} refers to undeclared probe '{}'",
                    entry.code, entry.probe
                )));
            }
            match seen.insert((entry.cue.as_str(), entry.probe.as_str()), entry.code) {
                Some(previous) if previous != entry.code => {
                    return Err(RecodeError::InvalidConfiguration(format!(
                        "pair ({}, {}) mapped to both {} and {}",
                        entry.cue, entry.probe, previous, entry.code
                    )));
                }
                _ => {}
            }
        }

        Ok(())
    }
}

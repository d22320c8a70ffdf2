//! Event-id label dictionary
//!
//! Maps condition labels to trigger codes. Labels may be hierarchical, with
//! tags separated by `/` (`"B/1"`, `"B/2"`, ...). Selecting by a partial
//! label returns every code whose tags include all the queried tags, so
//! `"B"` selects `B/1` through `B/5`.

use crate::types::{RecodeError, Result, TriggerCode};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

const TAG_SEPARATOR: char = '/';

/// Label → code dictionary handed to segmentation tooling
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, TriggerCode>", into = "BTreeMap<String, TriggerCode>")]
pub struct EventIdMap {
    labels: BTreeMap<String, TriggerCode>,
}

impl EventIdMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a label
    ///
    /// Labels must be unique, contain no empty tags, and map to distinct
    /// codes so that [`EventIdMap::label_of`] is unambiguous.
    pub fn insert(&mut self, label: impl Into<String>, code: TriggerCode) -> Result<()> {
        let label = label.into();
        if label.split(TAG_SEPARATOR).any(|tag| tag.is_empty()) {
            return Err(RecodeError::InvalidConfiguration(format!(
                "event label '{}' has an empty tag",
                label
            )));
        }
        if self.labels.contains_key(&label) {
            return Err(RecodeError::InvalidConfiguration(format!(
                "event label '{}' defined twice",
                label
            )));
        }
        if let Some(other) = self.label_of(code) {
            return Err(RecodeError::InvalidConfiguration(format!(
                "code {} assigned to both '{}' and '{}'",
                code, other, label
            )));
        }
        self.labels.insert(label, code);
        Ok(())
    }

    /// Build a dictionary from (label, code) pairs
    pub fn from_pairs<I, S>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, TriggerCode)>,
        S: Into<String>,
    {
        let mut map = Self::new();
        for (label, code) in pairs {
            map.insert(label, code)?;
        }
        Ok(map)
    }

    /// Code of an exact label
    pub fn code_of(&self, label: &str) -> Option<TriggerCode> {
        self.labels.get(label).copied()
    }

    /// Label assigned to a code
    pub fn label_of(&self, code: TriggerCode) -> Option<&str> {
        self.labels
            .iter()
            .find(|(_, &c)| c == code)
            .map(|(label, _)| label.as_str())
    }

    /// Codes matching a full or partial label, sorted ascending
    ///
    /// Fails with [`RecodeError::UnknownLabel`] if nothing matches.
    pub fn select(&self, query: &str) -> Result<Vec<TriggerCode>> {
        let wanted: BTreeSet<&str> = query.split(TAG_SEPARATOR).collect();
        let codes: BTreeSet<TriggerCode> = self
            .labels
            .iter()
            .filter(|(label, _)| {
                let tags: BTreeSet<&str> = label.split(TAG_SEPARATOR).collect();
                wanted.is_subset(&tags)
            })
            .map(|(_, &code)| code)
            .collect();

        if codes.is_empty() {
            return Err(RecodeError::UnknownLabel(query.to_string()));
        }
        Ok(codes.into_iter().collect())
    }

    /// Positions in `sequence` whose code matches `query`
    pub fn select_positions(&self, sequence: &[TriggerCode], query: &str) -> Result<Vec<usize>> {
        let codes = self.select(query)?;
        Ok(sequence
            .iter()
            .enumerate()
            .filter(|(_, code)| codes.contains(code))
            .map(|(position, _)| position)
            .collect())
    }

    /// Codes present in `sequence` that have no label
    pub fn unlabelled_codes(&self, sequence: &[TriggerCode]) -> BTreeSet<TriggerCode> {
        let known: BTreeSet<TriggerCode> = self.labels.values().copied().collect();
        sequence.iter().filter(|code| !known.contains(code)).copied().collect()
    }

    /// Iterate over (label, code) pairs in label order
    pub fn iter(&self) -> impl Iterator<Item = (&str, TriggerCode)> {
        self.labels.iter().map(|(label, &code)| (label.as_str(), code))
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

impl TryFrom<BTreeMap<String, TriggerCode>> for EventIdMap {
    type Error = RecodeError;

    fn try_from(labels: BTreeMap<String, TriggerCode>) -> Result<Self> {
        Self::from_pairs(labels)
    }
}

impl From<EventIdMap> for BTreeMap<String, TriggerCode> {
    fn from(map: EventIdMap) -> Self {
        map.labels
    }
}

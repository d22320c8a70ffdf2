//! Element-wise code remapping and merging
//!
//! [`remap`] replaces every code through a table that must cover all codes
//! present. [`merge_codes`] collapses a set of equivalent codes into one and
//! leaves everything else alone.

use crate::types::{event_codes, Event, MissingKey, RecodeError, Result, TriggerCode};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Mapping from raw code to target code
///
/// Serialized as a list of `[from, to]` pairs, since TOML tables only
/// allow string keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "Vec<(TriggerCode, TriggerCode)>",
    into = "Vec<(TriggerCode, TriggerCode)>"
)]
pub struct RemapTable {
    entries: BTreeMap<TriggerCode, TriggerCode>,
}

impl RemapTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: add one mapping (replaces an existing one for `from`)
    pub fn with(mut self, from: TriggerCode, to: TriggerCode) -> Self {
        self.entries.insert(from, to);
        self
    }

    /// Insert one mapping, returning the previous target for `from`
    pub fn insert(&mut self, from: TriggerCode, to: TriggerCode) -> Option<TriggerCode> {
        self.entries.insert(from, to)
    }

    /// Target code for `from`
    pub fn get(&self, from: TriggerCode) -> Option<TriggerCode> {
        self.entries.get(&from).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over (from, to) pairs in ascending `from` order
    pub fn iter(&self) -> impl Iterator<Item = (TriggerCode, TriggerCode)> + '_ {
        self.entries.iter().map(|(&from, &to)| (from, to))
    }

    /// True if no two codes map to the same target
    pub fn is_bijection(&self) -> bool {
        let targets: BTreeSet<TriggerCode> = self.entries.values().copied().collect();
        targets.len() == self.entries.len()
    }

    /// Inverse table, defined only when the table is a bijection
    pub fn inverse(&self) -> Result<RemapTable> {
        let mut inverse = RemapTable::new();
        for (from, to) in self.iter() {
            if let Some(other) = inverse.insert(to, from) {
                return Err(RecodeError::InvalidConfiguration(format!(
                    "codes {} and {} both map to {}; table has no inverse",
                    other, from, to
                )));
            }
        }
        Ok(inverse)
    }

    /// Remap the code column of an event slice in place
    ///
    /// On error the slice is left unchanged.
    pub fn remap_events(&self, events: &mut [Event]) -> Result<()> {
        let codes = event_codes(events);
        let remapped = remap(&codes, self)?;
        for (event, code) in events.iter_mut().zip(remapped) {
            event.code = code;
        }
        Ok(())
    }
}

impl TryFrom<Vec<(TriggerCode, TriggerCode)>> for RemapTable {
    type Error = RecodeError;

    /// Build a table from pairs, rejecting a code listed twice
    fn try_from(pairs: Vec<(TriggerCode, TriggerCode)>) -> Result<Self> {
        let mut table = RemapTable::new();
        for (from, to) in pairs {
            if table.insert(from, to).is_some() {
                return Err(RecodeError::InvalidConfiguration(format!(
                    "code {} mapped twice",
                    from
                )));
            }
        }
        Ok(table)
    }
}

impl From<RemapTable> for Vec<(TriggerCode, TriggerCode)> {
    fn from(table: RemapTable) -> Self {
        table.entries.into_iter().collect()
    }
}

impl FromIterator<(TriggerCode, TriggerCode)> for RemapTable {
    fn from_iter<I: IntoIterator<Item = (TriggerCode, TriggerCode)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Replace every code through `table`
///
/// The table must be total over the codes present in `sequence`; the first
/// code without an entry fails with [`RecodeError::MissingMapping`].
pub fn remap(sequence: &[TriggerCode], table: &RemapTable) -> Result<Vec<TriggerCode>> {
    sequence
        .iter()
        .enumerate()
        .map(|(position, &code)| {
            table.get(code).ok_or(RecodeError::MissingMapping {
                position,
                key: MissingKey::Code(code),
            })
        })
        .collect()
}

/// Replace every code found in `codes` by `target`
pub fn merge_codes(
    sequence: &[TriggerCode],
    codes: &[TriggerCode],
    target: TriggerCode,
) -> Vec<TriggerCode> {
    let merge: BTreeSet<TriggerCode> = codes.iter().copied().collect();
    sequence
        .iter()
        .map(|code| if merge.contains(code) { target } else { *code })
        .collect()
}

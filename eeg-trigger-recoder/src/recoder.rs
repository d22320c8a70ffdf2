//! Cue→probe sequence recoder
//!
//! Collapses two-stage stimulus sequences into combined condition codes.
//! A cue code arms the recoder; the next probe code is replaced by the
//! combined code for the (cue, probe) pairing. Cue positions are never
//! rewritten, and every code outside the declared categories passes through.
//!
//! The scan state lives entirely inside one call, so a single [`Recoder`]
//! can be shared across threads and applied to independent sequences.

use crate::config::{CategoryGroups, RecoderConfig};
use crate::types::{event_codes, Event, MissingKey, RecodeError, Result, TriggerCode};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Combined-code table keyed by (cue category, probe category)
pub type RecodeTable = BTreeMap<(String, String), TriggerCode>;

/// Category membership of a raw code (index into the name tables)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    Cue(usize),
    Probe(usize),
}

/// Scan state between a cue and its probe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PendingCue {
    NoCue,
    CuePending { category: usize, position: usize },
}

/// Data-quality findings from one recoding pass
///
/// None of these are errors: the affected positions keep their raw codes so
/// downstream consumers can decide what to discard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RecodeReport {
    /// Probe positions that received a combined code
    pub combined: Vec<usize>,
    /// Probe positions seen while no cue was pending
    pub orphan_probes: Vec<usize>,
    /// Cue positions seen while another cue was already pending
    pub repeated_cues: Vec<usize>,
    /// Position of a cue still pending at the end of the sequence
    pub dangling_cue: Option<usize>,
}

impl RecodeReport {
    /// True if every cue was followed by exactly one probe and vice versa
    pub fn is_clean(&self) -> bool {
        self.orphan_probes.is_empty()
            && self.repeated_cues.is_empty()
            && self.dangling_cue.is_none()
    }
}

/// Output of [`Recoder::recode_with_report`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recoded {
    /// Recoded sequence, same length as the input
    pub codes: Vec<TriggerCode>,
    /// Data-quality findings for this pass
    pub report: RecodeReport,
}

/// Validated cue→probe recoder
#[derive(Debug, Clone)]
pub struct Recoder {
    cue_names: Vec<String>,
    probe_names: Vec<String>,
    roles: HashMap<TriggerCode, Role>,
    table: HashMap<(usize, usize), TriggerCode>,
}

impl Recoder {
    /// Build a recoder from a configuration
    ///
    /// Fails with [`RecodeError::InvalidConfiguration`] before any scanning
    /// if category groups overlap or the combined-code table is inconsistent.
    pub fn new(config: &RecoderConfig) -> Result<Self> {
        config.validate()?;

        let cue_names: Vec<String> = config.cues.keys().cloned().collect();
        let probe_names: Vec<String> = config.probes.keys().cloned().collect();

        let mut roles = HashMap::new();
        for (idx, codes) in config.cues.values().enumerate() {
            roles.extend(codes.iter().map(|&code| (code, Role::Cue(idx))));
        }
        for (idx, codes) in config.probes.values().enumerate() {
            roles.extend(codes.iter().map(|&code| (code, Role::Probe(idx))));
        }

        let mut table = HashMap::new();
        for entry in &config.combined {
            // validate() guarantees both names are declared
            let cue = cue_names.iter().position(|n| *n == entry.cue);
            let probe = probe_names.iter().position(|n| *n == entry.probe);
            if let (Some(cue), Some(probe)) = (cue, probe) {
                table.insert((cue, probe), entry.code);
            }
        }

        log::debug!(
            "Recoder ready: {} cue categories, {} probe categories, {} combined codes",
            cue_names.len(),
            probe_names.len(),
            table.len()
        );

        Ok(Self {
            cue_names,
            probe_names,
            roles,
            table,
        })
    }

    /// Recode a sequence, returning only the new codes
    ///
    /// # Example
    /// ```
    /// use eeg_trigger_recoder::{Recoder, RecoderConfig};
    ///
    /// let config = RecoderConfig::new()
    ///     .add_cue("A", [70])
    ///     .add_probe("X", [76])
    ///     .map_pair("A", "X", 1);
    /// let recoder = Recoder::new(&config).unwrap();
    /// assert_eq!(recoder.recode(&[70, 76]).unwrap(), vec![70, 1]);
    /// ```
    pub fn recode(&self, sequence: &[TriggerCode]) -> Result<Vec<TriggerCode>> {
        self.recode_with_report(sequence).map(|recoded| recoded.codes)
    }

    /// Recode a sequence and collect data-quality findings
    ///
    /// Fails with [`RecodeError::MissingMapping`] at the first probe whose
    /// pairing with the pending cue has no combined code.
    pub fn recode_with_report(&self, sequence: &[TriggerCode]) -> Result<Recoded> {
        let mut codes = Vec::with_capacity(sequence.len());
        let mut report = RecodeReport::default();
        let mut pending = PendingCue::NoCue;

        for (position, &code) in sequence.iter().enumerate() {
            let role = self.roles.get(&code).copied();
            match (pending, role) {
                (PendingCue::NoCue, Some(Role::Cue(category))) => {
                    pending = PendingCue::CuePending { category, position };
                    codes.push(code);
                }
                (PendingCue::CuePending { category: cue, .. }, Some(Role::Probe(probe))) => {
                    let combined = self.table.get(&(cue, probe)).copied().ok_or_else(|| {
                        RecodeError::MissingMapping {
                            position,
                            key: MissingKey::Pair {
                                cue: self.cue_names[cue].clone(),
                                probe: self.probe_names[probe].clone(),
                            },
                        }
                    })?;
                    pending = PendingCue::NoCue;
                    report.combined.push(position);
                    codes.push(combined);
                }
                (PendingCue::CuePending { category, .. }, Some(Role::Cue(_))) => {
                    log::warn!(
                        "Cue code {} at position {} while cue '{}' is pending; passed through",
                        code,
                        position,
                        self.cue_names[category]
                    );
                    report.repeated_cues.push(position);
                    codes.push(code);
                }
                (PendingCue::NoCue, Some(Role::Probe(_))) => {
                    report.orphan_probes.push(position);
                    codes.push(code);
                }
                (_, None) => codes.push(code),
            }
        }

        if let PendingCue::CuePending { position, .. } = pending {
            log::debug!("Cue at position {} has no following probe", position);
            report.dangling_cue = Some(position);
        }

        Ok(Recoded { codes, report })
    }

    /// Recode the code column of an event slice in place
    ///
    /// Onsets and previous values are untouched. On error the slice is left
    /// unchanged.
    pub fn recode_events(&self, events: &mut [Event]) -> Result<RecodeReport> {
        let codes = event_codes(events);
        let recoded = self.recode_with_report(&codes)?;
        for (event, code) in events.iter_mut().zip(recoded.codes) {
            event.code = code;
        }
        Ok(recoded.report)
    }

    /// Cue category names, sorted
    pub fn cue_categories(&self) -> &[String] {
        &self.cue_names
    }

    /// Probe category names, sorted
    pub fn probe_categories(&self) -> &[String] {
        &self.probe_names
    }
}

/// One-shot recoding with explicit groups and table
///
/// Equivalent to building a [`Recoder`] from the given groups and calling
/// [`Recoder::recode`]. Prefer a reusable [`Recoder`] when recoding many
/// sequences with the same configuration.
pub fn recode(
    sequence: &[TriggerCode],
    cue_groups: &CategoryGroups,
    probe_groups: &CategoryGroups,
    recode_table: &RecodeTable,
) -> Result<Vec<TriggerCode>> {
    let mut config = RecoderConfig {
        cues: cue_groups.clone(),
        probes: probe_groups.clone(),
        combined: Vec::with_capacity(recode_table.len()),
    };
    for ((cue, probe), &code) in recode_table {
        config = config.map_pair(cue.as_str(), probe.as_str(), code);
    }
    Recoder::new(&config)?.recode(sequence)
}

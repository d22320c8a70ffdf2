//! Per-sequence pipeline and parallel batch runner
//!
//! A [`Pipeline`] is built once from a [`StudyConfig`], validating every
//! table up front, and then applied to any number of independent trigger
//! sequences. Steps run in a fixed order: merges, remap, cue→probe recode.

use crate::config::{MergeConfig, StudyConfig};
use anyhow::Context;
use eeg_trigger_recoder::{
    code_counts, event_codes, merge_codes, remap, Event, EventIdMap, RecodeError, RecodeReport,
    Recoder, RemapTable, Result, TriggerCode,
};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// One named trigger sequence (typically one subject's recording)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceInput {
    pub name: String,
    pub codes: Vec<TriggerCode>,
}

impl SequenceInput {
    pub fn new(name: impl Into<String>, codes: Vec<TriggerCode>) -> Self {
        Self {
            name: name.into(),
            codes,
        }
    }
}

/// Result of running the pipeline over one sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedSequence {
    /// Final codes, same length as the input
    pub codes: Vec<TriggerCode>,
    /// Recoder findings, if a recode step is configured
    pub report: Option<RecodeReport>,
    /// Final codes without an event-id label (empty when no labels are configured)
    pub unlabelled: BTreeSet<TriggerCode>,
}

/// Outcome for one batch entry
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceOutcome {
    pub name: String,
    pub result: Result<ProcessedSequence>,
}

/// Validated study pipeline
#[derive(Debug, Clone)]
pub struct Pipeline {
    name: String,
    merges: Vec<MergeConfig>,
    remap: Option<RemapTable>,
    recoder: Option<Recoder>,
    event_id: EventIdMap,
}

impl Pipeline {
    /// Build a pipeline, failing fast on any configuration error
    pub fn from_config(config: &StudyConfig) -> Result<Self> {
        for merge in &config.merge {
            if merge.codes.is_empty() {
                return Err(RecodeError::InvalidConfiguration(format!(
                    "merge into {} lists no codes",
                    merge.target
                )));
            }
        }

        let recoder = config.recode.as_ref().map(Recoder::new).transpose()?;

        if let Some(recode) = &config.recode {
            if !config.event_id.is_empty() {
                for combined in &recode.combined {
                    if config.event_id.label_of(combined.code).is_none() {
                        log::warn!(
                            "Combined code {} ({}, {}) has no event label",
                            combined.code,
                            combined.cue,
                            combined.probe
                        );
                    }
                }
            }
        }

        if config.merge.is_empty() && config.remap.is_none() && recoder.is_none() {
            log::warn!(
                "Pipeline '{}' has no merge, remap or recode step; codes pass through unchanged",
                config.display_name()
            );
        }

        log::info!(
            "Pipeline '{}': {} merges, remap {}, recode {}",
            config.display_name(),
            config.merge.len(),
            if config.remap.is_some() { "on" } else { "off" },
            if recoder.is_some() { "on" } else { "off" }
        );

        Ok(Self {
            name: config.display_name().to_string(),
            merges: config.merge.clone(),
            remap: config.remap.clone(),
            recoder,
            event_id: config.event_id.clone(),
        })
    }

    /// Build a pipeline from TOML text
    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        let config = StudyConfig::from_toml_str(content)?;
        Self::from_config(&config).context("Invalid study configuration")
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn event_id(&self) -> &EventIdMap {
        &self.event_id
    }

    /// Run every configured step over one sequence
    pub fn process(&self, sequence: &[TriggerCode]) -> Result<ProcessedSequence> {
        let mut codes = sequence.to_vec();

        for merge in &self.merges {
            codes = merge_codes(&codes, &merge.codes, merge.target);
        }

        if let Some(table) = &self.remap {
            codes = remap(&codes, table)?;
        }

        let report = match &self.recoder {
            Some(recoder) => {
                let recoded = recoder.recode_with_report(&codes)?;
                codes = recoded.codes;
                Some(recoded.report)
            }
            None => None,
        };

        let unlabelled = if self.event_id.is_empty() {
            BTreeSet::new()
        } else {
            self.event_id.unlabelled_codes(&codes)
        };

        Ok(ProcessedSequence {
            codes,
            report,
            unlabelled,
        })
    }

    /// Run the pipeline over the code column of an event slice in place
    ///
    /// On error the slice is left unchanged.
    pub fn process_events(&self, events: &mut [Event]) -> Result<ProcessedSequence> {
        let codes = event_codes(events);
        let processed = self.process(&codes)?;
        for (event, &code) in events.iter_mut().zip(&processed.codes) {
            event.code = code;
        }
        Ok(processed)
    }

    /// Process independent sequences in parallel
    ///
    /// Outcomes are returned in input order. A failing sequence is reported
    /// in its own outcome and does not affect the others.
    pub fn process_batch(&self, inputs: &[SequenceInput]) -> Vec<SequenceOutcome> {
        log::info!("Pipeline '{}': processing {} sequences", self.name, inputs.len());

        inputs
            .par_iter()
            .map(|input| {
                let result = self.process(&input.codes);
                match &result {
                    Ok(processed) => log::debug!(
                        "Sequence '{}': {} events processed",
                        input.name,
                        processed.codes.len()
                    ),
                    Err(e) => log::error!("Sequence '{}' failed: {}", input.name, e),
                }
                SequenceOutcome {
                    name: input.name.clone(),
                    result,
                }
            })
            .collect()
    }
}

/// Failed batch entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedSequence {
    pub name: String,
    pub error: String,
}

/// Aggregate over a batch of outcomes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub sequences: usize,
    pub succeeded: usize,
    pub failed: Vec<FailedSequence>,
    pub combined: usize,
    pub orphan_probes: usize,
    pub repeated_cues: usize,
    pub dangling_cues: usize,
    /// Final code distribution across all successful sequences
    pub code_counts: BTreeMap<TriggerCode, usize>,
    /// Union of unlabelled final codes
    pub unlabelled: BTreeSet<TriggerCode>,
}

impl BatchSummary {
    pub fn from_outcomes(outcomes: &[SequenceOutcome]) -> Self {
        let mut summary = BatchSummary {
            sequences: outcomes.len(),
            ..Self::default()
        };

        for outcome in outcomes {
            match &outcome.result {
                Ok(processed) => {
                    summary.succeeded += 1;
                    if let Some(report) = &processed.report {
                        summary.combined += report.combined.len();
                        summary.orphan_probes += report.orphan_probes.len();
                        summary.repeated_cues += report.repeated_cues.len();
                        summary.dangling_cues += usize::from(report.dangling_cue.is_some());
                    }
                    for (code, count) in code_counts(&processed.codes) {
                        *summary.code_counts.entry(code).or_insert(0) += count;
                    }
                    summary.unlabelled.extend(processed.unlabelled.iter().copied());
                }
                Err(e) => summary.failed.push(FailedSequence {
                    name: outcome.name.clone(),
                    error: e.to_string(),
                }),
            }
        }

        summary
    }

    /// Pretty-printed JSON
    pub fn to_json(&self) -> anyhow::Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize batch summary")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presets;

    #[test]
    fn test_dpx_pipeline() {
        let pipeline = Pipeline::from_config(&presets::dpx_study().unwrap()).unwrap();
        let processed = pipeline.process(&[70, 76, 71, 77, 128]).unwrap();
        assert_eq!(processed.codes, vec![70, 1, 71, 4, 128]);
        assert_eq!(processed.report.unwrap().combined, vec![1, 3]);
        assert_eq!(processed.unlabelled.into_iter().collect::<Vec<_>>(), vec![70, 71, 128]);
    }

    #[test]
    fn test_steps_run_in_order() {
        // Merge first, then remap the merged code, then recode
        let config = StudyConfig {
            merge: vec![MergeConfig {
                codes: vec![11, 12],
                target: 10,
            }],
            remap: Some([(10, 70), (20, 76), (5, 5)].into_iter().collect()),
            recode: Some(presets::dpx_recoder_config()),
            ..StudyConfig::default()
        };
        let pipeline = Pipeline::from_config(&config).unwrap();
        let processed = pipeline.process(&[12, 5, 20]).unwrap();
        assert_eq!(processed.codes, vec![70, 5, 1]);
        assert!(processed.unlabelled.is_empty());
    }

    #[test]
    fn test_empty_merge_rejected() {
        let config = StudyConfig {
            merge: vec![MergeConfig {
                codes: vec![],
                target: 1,
            }],
            ..StudyConfig::default()
        };
        assert!(matches!(
            Pipeline::from_config(&config),
            Err(RecodeError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_process_events() {
        let pipeline = Pipeline::from_config(&presets::music_genre_study().unwrap()).unwrap();
        let mut events = vec![Event::new(1000, 2), Event::new(3000, 12)];
        pipeline.process_events(&mut events).unwrap();
        assert_eq!(events, vec![Event::new(1000, 6), Event::new(3000, 2)]);

        let mut events = vec![Event::new(1000, 2), Event::new(3000, 21)];
        assert!(pipeline.process_events(&mut events).is_err());
        assert_eq!(events[0].code, 2);
    }

    #[test]
    fn test_batch_summary() {
        let pipeline = Pipeline::from_config(&presets::dpx_study().unwrap()).unwrap();
        let partial = Pipeline::from_toml_str(
            r#"
            [recode.cues]
            A = [70]
            [recode.probes]
            X = [76]
            "#,
        )
        .unwrap();

        let inputs = vec![
            SequenceInput::new("sub-01", vec![70, 76, 70, 71, 77]),
            SequenceInput::new("sub-02", vec![76, 73]),
        ];
        let outcomes = pipeline.process_batch(&inputs);
        let summary = BatchSummary::from_outcomes(&outcomes);
        assert_eq!(summary.sequences, 2);
        assert_eq!(summary.succeeded, 2);
        assert_eq!(summary.combined, 2);
        assert_eq!(summary.repeated_cues, 1);
        assert_eq!(summary.orphan_probes, 1);
        assert_eq!(summary.dangling_cues, 1);
        assert_eq!(summary.code_counts[&70], 2);

        let failed = BatchSummary::from_outcomes(&partial.process_batch(&inputs));
        assert_eq!(failed.succeeded, 1);
        assert_eq!(failed.failed.len(), 1);
        assert_eq!(failed.failed[0].name, "sub-01");
    }
}

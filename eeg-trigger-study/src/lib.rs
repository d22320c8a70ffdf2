//! EEG Trigger Study Layer
//!
//! This is the study-level layer on top of the eeg-trigger-recoder library.
//! It adds:
//! - Study configuration files (TOML)
//! - Presets for the DPX cue/probe task and the music-genre study
//! - A validated per-sequence pipeline (merge → remap → recode)
//! - Parallel batch processing over many subjects, with a JSON summary
//!
//! # Example Usage
//!
//! ```
//! use eeg_trigger_study::{presets, BatchSummary, Pipeline, SequenceInput};
//!
//! let pipeline = Pipeline::from_config(&presets::dpx_study().unwrap()).unwrap();
//! let outcomes = pipeline.process_batch(&[
//!     SequenceInput::new("sub-01", vec![70, 76, 72, 79]),
//!     SequenceInput::new("sub-02", vec![75, 76, 70]),
//! ]);
//!
//! let summary = BatchSummary::from_outcomes(&outcomes);
//! assert_eq!(summary.combined, 3);
//! assert_eq!(summary.dangling_cues, 1);
//! ```

pub mod config;
pub mod pipeline;
pub mod presets;

pub use config::{load_config, MergeConfig, StudyConfig};
pub use pipeline::{
    BatchSummary, FailedSequence, Pipeline, ProcessedSequence, SequenceInput, SequenceOutcome,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//! EEG Trigger Recoder Library
//!
//! A stateless, reusable library for rewriting the trigger codes recorded on
//! an EEG stimulus channel before the events are handed to epoching.
//!
//! # Architecture
//!
//! This library is intentionally minimal and focused on code sequences:
//! - Collapses cue→probe stimulus sequences into combined condition codes
//! - Remaps codes through a total lookup table (e.g. reordering conditions)
//! - Merges sets of equivalent codes into one
//! - Resolves hierarchical condition labels (`"B"` selects `"B/1"`..`"B/5"`)
//!
//! The library does NOT:
//! - Read recordings or decode marker channels
//! - Cut epochs or touch signal data
//! - Load configuration files or run batches
//!
//! Study-level configuration and batch processing live in the application
//! layer (eeg-trigger-study).
//!
//! # Example Usage
//!
//! ```
//! use eeg_trigger_recoder::{Recoder, RecoderConfig};
//!
//! // Dot Pattern Expectancy task: cue A or B, then probe X or Y
//! let config = RecoderConfig::new()
//!     .add_cue("A", [70])
//!     .add_cue("B", 71..=75)
//!     .add_probe("X", [76])
//!     .add_probe("Y", 77..=81)
//!     .map_pair("A", "X", 1)
//!     .map_pair("B", "X", 2)
//!     .map_pair("A", "Y", 3)
//!     .map_pair("B", "Y", 4);
//!
//! let recoder = Recoder::new(&config).unwrap();
//! let recoded = recoder.recode_with_report(&[70, 76, 73, 79, 71]).unwrap();
//!
//! assert_eq!(recoded.codes, vec![70, 1, 73, 4, 71]);
//! assert_eq!(recoded.report.dangling_cue, Some(4));
//! ```

// Public modules
pub mod config;
pub mod event_id;
pub mod recoder;
pub mod remap;
pub mod summary;
pub mod types;

// Re-export main types for convenience
pub use config::{CategoryGroups, CombinedCode, RecoderConfig};
pub use event_id::EventIdMap;
pub use recoder::{recode, RecodeReport, RecodeTable, Recoded, Recoder};
pub use remap::{merge_codes, remap, RemapTable};
pub use summary::code_counts;
pub use types::{event_codes, Event, MissingKey, RecodeError, Result, TriggerCode};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_basics() {
        // Smoke test: an empty configuration passes everything through
        let recoder = Recoder::new(&RecoderConfig::new()).unwrap();
        assert_eq!(recoder.recode(&[70, 76, 1]).unwrap(), vec![70, 76, 1]);
        assert!(!VERSION.is_empty());
    }
}

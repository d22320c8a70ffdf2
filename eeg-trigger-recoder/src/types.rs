//! Core types for the trigger recoder library
//!
//! This module defines the values the recoder consumes and emits. A trigger
//! sequence is a plain slice of codes; external import tooling may also hand
//! over full event triples, which the transforms rewrite in place.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Integer marker recorded on a stimulus channel
pub type TriggerCode = u32;

/// Result type for recoder operations
pub type Result<T> = std::result::Result<T, RecodeError>;

/// One decoded marker-channel event
///
/// Mirrors the three columns produced by marker-channel decoding:
/// onset in samples, the channel value just before the onset, and the code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Onset in samples from the start of the recording
    pub sample: u64,
    /// Stimulus channel value immediately before the onset (usually 0)
    pub previous: TriggerCode,
    /// Trigger code of this event
    pub code: TriggerCode,
}

impl Event {
    /// Create a new event with a cleared previous value
    pub fn new(sample: u64, code: TriggerCode) -> Self {
        Self {
            sample,
            previous: 0,
            code,
        }
    }
}

/// Extract the code column of an event slice
pub fn event_codes(events: &[Event]) -> Vec<TriggerCode> {
    events.iter().map(|e| e.code).collect()
}

/// The table key that had no entry when a mapping was required
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MissingKey {
    /// A (cue category, probe category) pair absent from the combined-code table
    Pair { cue: String, probe: String },
    /// A raw code absent from a remap table
    Code(TriggerCode),
}

impl fmt::Display for MissingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissingKey::Pair { cue, probe } => write!(f, "pair ({}, {})", cue, probe),
            MissingKey::Code(code) => write!(f, "code {}", code),
        }
    }
}

/// Errors that can occur while configuring or running a transform
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecodeError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Missing mapping for {key} at position {position}")]
    MissingMapping { position: usize, key: MissingKey },

    #[error("Unknown event label: {0}")]
    UnknownLabel(String),
}

impl RecodeError {
    /// Position of the offending element, if the error refers to one
    pub fn position(&self) -> Option<usize> {
        match self {
            RecodeError::MissingMapping { position, .. } => Some(*position),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_new() {
        let event = Event::new(512, 70);
        assert_eq!(event.sample, 512);
        assert_eq!(event.previous, 0);
        assert_eq!(event.code, 70);
    }

    #[test]
    fn test_event_codes() {
        let events = vec![Event::new(10, 70), Event::new(300, 76)];
        assert_eq!(event_codes(&events), vec![70, 76]);
    }

    #[test]
    fn test_error_display() {
        let err = RecodeError::MissingMapping {
            position: 1,
            key: MissingKey::Pair {
                cue: "A".into(),
                probe: "X".into(),
            },
        };
        assert_eq!(err.to_string(), "Missing mapping for pair (A, X) at position 1");
        assert_eq!(err.position(), Some(1));

        let err = RecodeError::MissingMapping {
            position: 4,
            key: MissingKey::Code(21),
        };
        assert_eq!(err.to_string(), "Missing mapping for code 21 at position 4");
        assert_eq!(RecodeError::UnknownLabel("Z".into()).position(), None);
    }
}

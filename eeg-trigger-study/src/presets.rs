//! Built-in study presets
//!
//! Trigger layouts for the two paradigms this workspace was written for:
//! the Dot Pattern Expectancy (DPX) cue/probe task and the twenty-genre
//! music listening study.

use crate::config::StudyConfig;
use eeg_trigger_recoder::{EventIdMap, RecoderConfig, RemapTable, Result, TriggerCode};

/// Cue A: the highly predictive dot pattern
pub const DPX_CUE_A: TriggerCode = 70;
/// Cue B: ambiguous dot patterns, one code per pattern
pub const DPX_CUE_B: [TriggerCode; 5] = [71, 72, 73, 74, 75];
/// Probe X: the frequent probe
pub const DPX_PROBE_X: TriggerCode = 76;
/// Probe Y: infrequent probes, one code per pattern
pub const DPX_PROBE_Y: [TriggerCode; 5] = [77, 78, 79, 80, 81];

/// Genre labels in their semantic code order (code = index + 1)
pub const GENRES: [&str; 20] = [
    "alternative",
    "punk",
    "heavymetal",
    "rocknroll",
    "psychedelic",
    "baroque",
    "classic",
    "modernclassic",
    "renaissance",
    "romantic",
    "deephouse",
    "drumandbass",
    "dubstep",
    "techno",
    "trance",
    "funk",
    "hiphop",
    "reggae",
    "rnb",
    "soul",
];

/// Stimulus software code (alphabetical genre order) → semantic code
const GENRE_REORDER: [(TriggerCode, TriggerCode); 20] = [
    (1, 1),
    (2, 6),
    (3, 7),
    (4, 11),
    (5, 12),
    (6, 13),
    (7, 16),
    (8, 3),
    (9, 17),
    (10, 8),
    (11, 5),
    (12, 2),
    (13, 18),
    (14, 9),
    (15, 19),
    (16, 4),
    (17, 10),
    (18, 20),
    (19, 14),
    (20, 15),
];

/// DPX recoding: AX=1, BX=2, AY=3, BY=4 at the probe position
pub fn dpx_recoder_config() -> RecoderConfig {
    RecoderConfig::new()
        .add_cue("A", [DPX_CUE_A])
        .add_cue("B", DPX_CUE_B)
        .add_probe("X", [DPX_PROBE_X])
        .add_probe("Y", DPX_PROBE_Y)
        .map_pair("A", "X", 1)
        .map_pair("B", "X", 2)
        .map_pair("A", "Y", 3)
        .map_pair("B", "Y", 4)
}

/// Labels for the combined DPX conditions
pub fn dpx_condition_labels() -> Result<EventIdMap> {
    EventIdMap::from_pairs([("AX", 1), ("BX", 2), ("AY", 3), ("BY", 4)])
}

/// Labels for cue-locked DPX epochs; `"B"` selects all five B patterns
pub fn dpx_cue_labels() -> Result<EventIdMap> {
    let b_patterns = DPX_CUE_B
        .iter()
        .enumerate()
        .map(|(i, &code)| (format!("B/{}", i + 1), code));
    EventIdMap::from_pairs(std::iter::once(("A".to_string(), DPX_CUE_A)).chain(b_patterns))
}

/// Complete DPX study: recode cue→probe pairs, label the four conditions
pub fn dpx_study() -> Result<StudyConfig> {
    Ok(StudyConfig {
        name: Some("dpx".to_string()),
        recode: Some(dpx_recoder_config()),
        event_id: dpx_condition_labels()?,
        ..StudyConfig::default()
    })
}

/// Alphabetical → semantic genre reordering table
pub fn music_genre_remap() -> RemapTable {
    GENRE_REORDER.into_iter().collect()
}

/// Genre labels keyed to their semantic codes
pub fn music_genre_labels() -> Result<EventIdMap> {
    EventIdMap::from_pairs(
        GENRES
            .iter()
            .enumerate()
            .map(|(i, &genre)| (genre, i as TriggerCode + 1)),
    )
}

/// Complete music study: reorder genre codes, label the twenty genres
pub fn music_genre_study() -> Result<StudyConfig> {
    Ok(StudyConfig {
        name: Some("music-genres".to_string()),
        remap: Some(music_genre_remap()),
        event_id: music_genre_labels()?,
        ..StudyConfig::default()
    })
}

// Behavioural checks for the recoding and remapping transforms
use eeg_trigger_recoder::{
    remap, MissingKey, RecodeError, Recoder, RecoderConfig, RemapTable, TriggerCode,
};
use proptest::prelude::*;

fn dpx_config() -> RecoderConfig {
    RecoderConfig::new()
        .add_cue("A", [70])
        .add_cue("B", 71..=75)
        .add_probe("X", [76])
        .add_probe("Y", 77..=81)
        .map_pair("A", "X", 1)
        .map_pair("B", "X", 2)
        .map_pair("A", "Y", 3)
        .map_pair("B", "Y", 4)
}

/// Trigger sequences of up to `max_len` codes drawn from `alphabet`
fn sequence_of(
    alphabet: &[TriggerCode],
    max_len: usize,
) -> impl Strategy<Value = Vec<TriggerCode>> {
    prop::collection::vec(prop::sample::select(alphabet.to_vec()), 0..max_len)
}

proptest! {
    #[test]
    fn prop_length_is_preserved(
        sequence in sequence_of(&[1, 2, 70, 71, 73, 75, 76, 77, 81, 128], 40)
    ) {
        let recoder = Recoder::new(&dpx_config()).unwrap();
        let out = recoder.recode(&sequence).unwrap();
        prop_assert_eq!(out.len(), sequence.len());
    }

    #[test]
    fn prop_only_combined_positions_change(
        sequence in sequence_of(&[70, 72, 74, 76, 78, 80, 128], 30)
    ) {
        let recoder = Recoder::new(&dpx_config()).unwrap();
        let recoded = recoder.recode_with_report(&sequence).unwrap();
        for (i, (&before, &after)) in sequence.iter().zip(&recoded.codes).enumerate() {
            if recoded.report.combined.contains(&i) {
                prop_assert!((1..=4).contains(&after), "position {}: {} -> {}", i, before, after);
            } else {
                prop_assert_eq!(before, after, "position {} changed without a combined code", i);
            }
        }
    }

    #[test]
    fn prop_empty_groups_pass_everything_through(
        sequence in sequence_of(&[0, 1, 70, 76, 255], 25)
    ) {
        let recoder = Recoder::new(&RecoderConfig::new()).unwrap();
        prop_assert_eq!(recoder.recode(&sequence).unwrap(), sequence);
    }

    #[test]
    fn prop_bijective_remap_round_trips(
        sequence in sequence_of(&(1..=20).collect::<Vec<_>>(), 30)
    ) {
        let table: RemapTable = (1..=20).map(|code| (code, 21 - code)).collect();
        let inverse = table.inverse().unwrap();

        let forward = remap(&sequence, &table).unwrap();
        prop_assert_eq!(forward.len(), sequence.len());
        prop_assert_eq!(remap(&forward, &inverse).unwrap(), sequence);
    }
}

#[test]
fn cue_then_probe_collapses() {
    let _ = env_logger::builder().is_test(true).try_init();
    let recoder = Recoder::new(&dpx_config()).unwrap();
    assert_eq!(recoder.recode(&[70, 76]).unwrap(), vec![70, 1]);
}

#[test]
fn unmatched_cue_and_probe_pass_through() {
    let recoder = Recoder::new(&dpx_config()).unwrap();
    assert_eq!(recoder.recode(&[70]).unwrap(), vec![70]);
    assert_eq!(recoder.recode(&[76]).unwrap(), vec![76]);
}

#[test]
fn second_cue_does_not_overwrite_pending() {
    let recoder = Recoder::new(&dpx_config()).unwrap();
    let recoded = recoder.recode_with_report(&[70, 71, 76]).unwrap();
    assert_eq!(recoded.codes, vec![70, 71, 1]);
    assert_eq!(recoded.report.repeated_cues, vec![1]);
}

#[test]
fn overlapping_groups_fail_before_scanning() {
    let config = dpx_config().add_probe("Z", [70]);
    assert!(matches!(
        Recoder::new(&config),
        Err(RecodeError::InvalidConfiguration(_))
    ));
}

#[test]
fn missing_pair_reports_probe_position() {
    let config = RecoderConfig::new().add_cue("A", [70]).add_probe("X", [76]);
    let recoder = Recoder::new(&config).unwrap();
    let err = recoder.recode(&[70, 76]).unwrap_err();
    assert_eq!(err.position(), Some(1));
    assert!(matches!(
        err,
        RecodeError::MissingMapping { key: MissingKey::Pair { .. }, .. }
    ));
}

#[test]
fn recoder_is_shareable_across_threads() {
    let recoder = Recoder::new(&dpx_config()).unwrap();
    let inputs: Vec<Vec<TriggerCode>> = vec![
        vec![70, 76, 71, 77, 128],
        vec![76, 73, 1, 80, 70],
        vec![70, 71, 76, 75, 76],
        vec![],
    ];
    let expected: Vec<_> = inputs.iter().map(|s| recoder.recode(s).unwrap()).collect();

    let shared = &recoder;
    let results: Vec<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = inputs
            .iter()
            .map(|s| scope.spawn(move || shared.recode(s).unwrap()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    assert_eq!(results, expected);
}

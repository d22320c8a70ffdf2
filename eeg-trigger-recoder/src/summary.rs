//! Event distribution helpers

use crate::types::TriggerCode;
use std::collections::BTreeMap;

/// Number of occurrences of each code, keyed in ascending code order
pub fn code_counts(sequence: &[TriggerCode]) -> BTreeMap<TriggerCode, usize> {
    let mut counts = BTreeMap::new();
    for &code in sequence {
        *counts.entry(code).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_counts() {
        let counts = code_counts(&[128, 70, 128, 1, 128]);
        assert_eq!(counts.len(), 3);
        assert_eq!(counts[&128], 3);
        assert_eq!(counts[&70], 1);
        assert_eq!(counts.keys().copied().collect::<Vec<_>>(), vec![1, 70, 128]);
        assert!(code_counts(&[]).is_empty());
    }
}

//! Execution results.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Measurement outcome frequencies, keyed by classical bitstring.
///
/// Keys are kept in lexicographic order, so iteration and serialization are
/// deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Counts(BTreeMap<String, u64>);

impl Counts {
    /// Create empty counts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `count` observations of `bitstring`.
    pub fn insert(&mut self, bitstring: impl Into<String>, count: u64) {
        *self.0.entry(bitstring.into()).or_insert(0) += count;
    }

    /// Observations of `bitstring`, zero when never seen.
    pub fn get(&self, bitstring: &str) -> u64 {
        self.0.get(bitstring).copied().unwrap_or(0)
    }

    /// Sum of all counts.
    pub fn total_shots(&self) -> u64 {
        self.0.values().sum()
    }

    /// Number of distinct outcomes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no outcome was recorded.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Outcomes in lexicographic order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// The outcome with the highest count. Ties go to the lexicographically
    /// smallest bitstring.
    pub fn most_frequent(&self) -> Option<(&str, u64)> {
        self.iter().fold(None, |best, (bits, count)| match best {
            Some((_, best_count)) if best_count >= count => best,
            _ => Some((bits, count)),
        })
    }

    /// Outcomes by descending count, ties in lexicographic order.
    pub fn sorted(&self) -> Vec<(&str, u64)> {
        let mut entries: Vec<_> = self.iter().collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        entries
    }

    /// Borrow the underlying map.
    pub fn as_map(&self) -> &BTreeMap<String, u64> {
        &self.0
    }
}

impl FromIterator<(String, u64)> for Counts {
    fn from_iter<I: IntoIterator<Item = (String, u64)>>(iter: I) -> Self {
        let mut counts = Self::new();
        for (bits, count) in iter {
            counts.insert(bits, count);
        }
        counts
    }
}

/// Result of a completed job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// Outcome frequencies.
    pub counts: Counts,
    /// Number of shots executed.
    pub shots: u32,
    /// Wall-clock execution time reported by the backend.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execution_time_ms: Option<u64>,
}

impl ExecutionResult {
    /// Create a result.
    pub fn new(counts: Counts, shots: u32) -> Self {
        Self {
            counts,
            shots,
            execution_time_ms: None,
        }
    }

    /// Attach the execution time.
    #[must_use]
    pub fn with_execution_time(mut self, ms: u64) -> Self {
        self.execution_time_ms = Some(ms);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_accumulates() {
        let mut counts = Counts::new();
        counts.insert("01", 3);
        counts.insert("01", 2);
        counts.insert("11", 1);
        assert_eq!(counts.get("01"), 5);
        assert_eq!(counts.get("10"), 0);
        assert_eq!(counts.total_shots(), 6);
        assert_eq!(counts.len(), 2);
    }

    #[test]
    fn test_most_frequent_tie_break() {
        let counts: Counts = [("11".to_string(), 4), ("01".to_string(), 4), ("00".to_string(), 1)]
            .into_iter()
            .collect();
        assert_eq!(counts.most_frequent(), Some(("01", 4)));
        assert_eq!(counts.sorted(), vec![("01", 4), ("11", 4), ("00", 1)]);
        assert_eq!(Counts::new().most_frequent(), None);
    }

    #[test]
    fn test_serializes_as_sorted_object() {
        let mut counts = Counts::new();
        counts.insert("10", 7);
        counts.insert("00", 9);
        let json = serde_json::to_string(&counts).unwrap();
        assert_eq!(json, r#"{"00":9,"10":7}"#);
    }
}

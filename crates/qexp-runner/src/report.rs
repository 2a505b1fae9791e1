//! Outcome summaries shared by the persister and the console.

use std::fmt::{self, Write};

use qexp_hal::Counts;

/// Longest histogram bar, in characters.
const BAR_WIDTH: usize = 50;

/// The most frequent outcome of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct Dominant {
    pub bits: String,
    pub count: u64,
    /// `count / shots`.
    pub probability: f64,
}

impl Dominant {
    /// Highest count wins; ties go to the lexicographically smallest
    /// bitstring. `None` for an empty table.
    pub fn of(counts: &Counts, shots: u32) -> Option<Self> {
        counts.most_frequent().map(|(bits, count)| Self {
            bits: bits.to_string(),
            count,
            probability: if shots == 0 {
                0.0
            } else {
                count as f64 / f64::from(shots)
            },
        })
    }
}

impl fmt::Display for Dominant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "|{}> ({:.2}%)", self.bits, self.probability * 100.0)
    }
}

/// Text histogram: one bar per outcome in bitstring order, then the
/// dominant outcome.
pub fn render_histogram(title: &str, counts: &Counts, shots: u32) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{title} ({shots} shots)");
    let _ = writeln!(out);

    let max = counts.iter().map(|(_, c)| c).max().unwrap_or(0);
    for (bits, count) in counts.iter() {
        let pct = if shots == 0 {
            0.0
        } else {
            count as f64 / f64::from(shots) * 100.0
        };
        let bar_len = if max == 0 {
            0
        } else {
            usize::try_from(count * BAR_WIDTH as u64 / max).unwrap_or(BAR_WIDTH)
        };
        let _ = writeln!(
            out,
            "{bits}  {count:>8}  {pct:>6.2}%  {}",
            "█".repeat(bar_len)
        );
    }

    if let Some(dominant) = Dominant::of(counts, shots) {
        let _ = writeln!(out);
        let _ = writeln!(out, "Dominant state: {dominant}");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(entries: &[(&str, u64)]) -> Counts {
        entries.iter().map(|(b, c)| ((*b).to_string(), *c)).collect()
    }

    #[test]
    fn test_dominant_format() {
        let c = counts(&[("00", 520), ("11", 504)]);
        let dominant = Dominant::of(&c, 1024).unwrap();
        assert_eq!(dominant.bits, "00");
        assert_eq!(dominant.to_string(), "|00> (50.78%)");
    }

    #[test]
    fn test_dominant_tie_takes_smallest_bitstring() {
        let c = counts(&[("11", 512), ("01", 512)]);
        assert_eq!(Dominant::of(&c, 1024).unwrap().bits, "01");
    }

    #[test]
    fn test_dominant_of_empty() {
        assert!(Dominant::of(&Counts::new(), 10).is_none());
    }

    #[test]
    fn test_histogram_lines() {
        let c = counts(&[("00", 75), ("11", 25)]);
        let text = render_histogram("bell", &c, 100);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "bell (100 shots)");
        assert!(lines[2].starts_with("00"));
        assert!(lines[2].contains("75.00%"));
        assert_eq!(lines[2].matches('█').count(), BAR_WIDTH);
        assert!(lines[3].starts_with("11"));
        assert!(text.ends_with("Dominant state: |00> (75.00%)\n"));
    }
}

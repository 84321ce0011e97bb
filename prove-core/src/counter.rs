use std::collections::HashMap;

use tracing::trace;

/// Counts how many units were registered under each base description.
///
/// One counter belongs to one suite's registration pass and is dropped with
/// it; counts only ever grow.
#[derive(Debug, Default)]
pub struct UniquenessCounter {
    counts: HashMap<String, u32>,
}

impl UniquenessCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the next sequence number for `base`, starting at 1.
    pub fn next(&mut self, base: &str) -> u32 {
        let count = self.counts.entry(base.to_string()).or_insert(0);
        *count += 1;
        trace!(base, sequence = *count, "drew sequence number");
        *count
    }

    /// How many numbers have been drawn for `base` so far.
    pub fn current(&self, base: &str) -> u32 {
        self.counts.get(base).copied().unwrap_or(0)
    }

    pub fn buckets(&self) -> usize {
        self.counts.len()
    }
}

/// `"{base} ({n})"`, or `"({n})"` for an empty base.
pub fn unique_name(base: &str, sequence: u32) -> String {
    if base.is_empty() {
        format!("({sequence})")
    } else {
        format!("{base} ({sequence})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_draw_is_one_and_draws_increase() {
        let mut counter = UniquenessCounter::new();
        assert_eq!(counter.next("same"), 1);
        assert_eq!(counter.next("same"), 2);
        assert_eq!(counter.next("other"), 1);
        assert_eq!(counter.next("same"), 3);
        assert_eq!(counter.current("same"), 3);
        assert_eq!(counter.current("missing"), 0);
        assert_eq!(counter.buckets(), 2);
    }

    #[test]
    fn empty_base_is_its_own_bucket() {
        let mut counter = UniquenessCounter::new();
        assert_eq!(counter.next(""), 1);
        assert_eq!(counter.next(""), 2);
        assert_eq!(unique_name("", 2), "(2)");
    }

    #[test]
    fn unique_name_appends_sequence() {
        assert_eq!(unique_name("adds numbers", 1), "adds numbers (1)");
    }
}

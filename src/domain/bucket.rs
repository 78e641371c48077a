//! Insertion-ordered count buckets.
//!
//! Ranking must break count ties by encounter order, so the bucket keeps
//! its entries in first-seen order alongside a key index. Keys are
//! case-sensitive and stored as given; callers trim before inserting.

use std::collections::HashMap;

/// A mapping from dimension key (day, tag, or neighborhood) to count,
/// preserving first-insertion order.
#[derive(Debug, Clone, Default)]
pub struct Bucket {
    entries: Vec<(String, u64)>,
    index: HashMap<String, usize>,
}

impl Bucket {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one to the count for `key`, creating it at the end on first sight.
    pub fn increment(&mut self, key: &str) {
        match self.index.get(key) {
            Some(&i) => self.entries[i].1 += 1,
            None => {
                self.index.insert(key.to_string(), self.entries.len());
                self.entries.push((key.to_string(), 1));
            }
        }
    }

    pub fn get(&self, key: &str) -> u64 {
        self.index.get(key).map_or(0, |&i| self.entries[i].1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in first-insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Entries sorted by count descending. The sort is stable: equal counts
    /// keep their encounter order, never a secondary alphabetical key.
    pub fn rank_descending(&self) -> Vec<(String, u64)> {
        let mut ranked = self.entries.clone();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
    }

    /// The largest count, or 0 for an empty bucket. Presentation flags every
    /// entry equal to this value, not just the first.
    pub fn max_count(&self) -> u64 {
        self.entries.iter().map(|(_, v)| *v).max().unwrap_or(0)
    }
}

impl<'a> Extend<&'a str> for Bucket {
    fn extend<T: IntoIterator<Item = &'a str>>(&mut self, keys: T) {
        for key in keys {
            self.increment(key);
        }
    }
}

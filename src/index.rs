//! Generic in-memory search over a flattened record set.
//!
//! A query is evaluated in fixed order, stopping at the first strategy that
//! yields records:
//!
//! 1. exact primary-key match (case-insensitive), returns a single record
//! 2. exact producer-local code match (case-sensitive), returns every holder
//! 3. case-insensitive substring scan over all matchable fields, ranked
//!
//! Steps 1 and 2 bypass ranking. Their lookup tables are re-checked against the
//! records before use; an entry that does not hold up is a soft miss and the
//! next strategy runs.

use feruca::Collator;
use std::borrow::Cow;
use std::collections::HashMap;

use crate::catalog::AccelerationHints;

pub trait Searchable: Clone {
    /// Identifier matched exactly by step 1.
    fn primary_key(&self) -> Cow<'_, str>;

    /// Display name used for ranking.
    fn name(&self) -> &str;

    /// Producer-local code matched exactly by step 2.
    fn local_code(&self) -> Option<&str> {
        None
    }

    /// Every string the substring scan looks at.
    fn matchable_fields(&self) -> Vec<Cow<'_, str>>;
}

#[derive(Debug, Clone)]
pub struct SearchIndex<T> {
    records: Vec<T>,
    by_key: HashMap<String, usize>,
    by_folded_key: HashMap<String, usize>,
    by_code: HashMap<String, Vec<usize>>,
    hints: AccelerationHints,
}

impl<T> Default for SearchIndex<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            by_key: HashMap::new(),
            by_folded_key: HashMap::new(),
            by_code: HashMap::new(),
            hints: AccelerationHints::default(),
        }
    }
}

impl<T: Searchable> SearchIndex<T> {
    pub fn new(records: Vec<T>) -> Self {
        let mut by_key = HashMap::new();
        let mut by_folded_key = HashMap::new();
        let mut by_code: HashMap<String, Vec<usize>> = HashMap::new();

        for (pos, record) in records.iter().enumerate() {
            let key = record.primary_key();
            by_folded_key.entry(key.to_lowercase()).or_insert(pos);
            by_key.entry(key.into_owned()).or_insert(pos);
            if let Some(code) = record.local_code() {
                by_code.entry(code.to_string()).or_default().push(pos);
            }
        }

        Self {
            records,
            by_key,
            by_folded_key,
            by_code,
            hints: AccelerationHints::default(),
        }
    }

    pub fn with_hints(mut self, hints: AccelerationHints) -> Self {
        self.hints = hints;
        self
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[T] {
        &self.records
    }

    /// Owned copy of every record, in cache order.
    pub fn get_all(&self) -> Vec<T> {
        self.records.clone()
    }

    /// Exact, case-sensitive primary-key lookup.
    pub fn get_by_key(&self, key: &str) -> Option<&T> {
        self.by_key
            .get(key)
            .and_then(|&pos| self.records.get(pos))
            .filter(|r| r.primary_key() == key)
    }

    pub fn search(&self, query: &str) -> Vec<&T> {
        let query = query.trim();
        if query.is_empty() {
            return Vec::new();
        }
        let folded = query.to_lowercase();

        if let Some(record) = self.exact_key_match(&folded) {
            tracing::debug!(query, "exact key match");
            return vec![record];
        }

        let by_code = self.exact_code_match(query);
        if !by_code.is_empty() {
            tracing::debug!(query, matches = by_code.len(), "exact code match");
            return by_code;
        }

        let mut matches = self.substring_scan(&folded);
        rank(&mut matches, &folded);
        tracing::debug!(query, matches = matches.len(), "substring scan");
        matches
    }

    pub fn search_limited(&self, query: &str, limit: Option<usize>) -> Vec<&T> {
        let mut matches = self.search(query);
        if let Some(limit) = limit {
            matches.truncate(limit);
        }
        matches
    }

    /// Every record whose local code equals `code` exactly, in cache order.
    pub fn get_by_local_code(&self, code: &str) -> Vec<&T> {
        self.by_code
            .get(code)
            .into_iter()
            .flatten()
            .filter_map(|&pos| self.records.get(pos))
            .filter(|r| r.local_code() == Some(code))
            .collect()
    }

    fn exact_key_match(&self, folded: &str) -> Option<&T> {
        let found = self
            .by_folded_key
            .get(folded)
            .and_then(|&pos| self.records.get(pos))
            .filter(|r| r.primary_key().to_lowercase() == folded);

        if found.is_none() && self.hints.ids.contains(folded) {
            tracing::debug!(key = folded, "id hint names a record missing from the index");
        }
        found
    }

    fn exact_code_match(&self, code: &str) -> Vec<&T> {
        let matches = self.get_by_local_code(code);

        if let Some(hinted) = self.hints.company_ids.get(code) {
            let confirmed = hinted
                .iter()
                .filter_map(|id| self.get_by_key(id))
                .filter(|r| r.local_code() == Some(code))
                .count();
            if confirmed != hinted.len() || confirmed != matches.len() {
                tracing::debug!(
                    code,
                    hinted = hinted.len(),
                    confirmed,
                    indexed = matches.len(),
                    "code hint disagrees with the index"
                );
            }
        }
        matches
    }

    fn substring_scan(&self, folded: &str) -> Vec<&T> {
        self.records
            .iter()
            .filter(|r| {
                r.matchable_fields()
                    .iter()
                    .any(|f| f.to_lowercase().contains(folded))
            })
            .collect()
    }
}

/// Exact name first, then names starting with the query, each group ordered
/// by case-folded name under Unicode collation. Equal names keep cache order.
fn rank<T: Searchable>(matches: &mut Vec<&T>, folded: &str) {
    let mut keyed: Vec<(u8, String, &T)> = matches
        .drain(..)
        .map(|r| {
            let name = r.name().to_lowercase();
            let class = if name == folded {
                0
            } else if name.starts_with(folded) {
                1
            } else {
                2
            };
            (class, name, r)
        })
        .collect();

    let mut collator = Collator::default();
    keyed.sort_by(|a, b| {
        a.0.cmp(&b.0)
            .then_with(|| collator.collate(a.1.as_str(), b.1.as_str()))
    });
    matches.extend(keyed.into_iter().map(|(_, _, r)| r));
}

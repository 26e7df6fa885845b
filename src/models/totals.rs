//! Insertion-ordered totals keyed by category name or date

use std::collections::HashMap;

use super::money::Money;

/// Accumulated amounts keyed by a label, iterated in insertion order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Totals {
    entries: Vec<(String, Money)>,
    index: HashMap<String, usize>,
}

/// Why an amount could not be added to a bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddError {
    UnknownKey,
    Overflow,
}

/// Per-category totals, in declared category order
pub type CategoryTotals = Totals;

/// Per-date totals, in first-seen date order
pub type DateTotals = Totals;

impl Totals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a zero bucket for `key` unless it already exists
    pub fn seed(&mut self, key: &str) {
        if !self.index.contains_key(key) {
            self.index.insert(key.to_string(), self.entries.len());
            self.entries.push((key.to_string(), Money::zero()));
        }
    }

    /// Add to an existing bucket
    pub fn add_existing(&mut self, key: &str, amount: Money) -> Result<(), AddError> {
        let i = *self.index.get(key).ok_or(AddError::UnknownKey)?;
        let entry = &mut self.entries[i].1;
        *entry = entry.checked_add(amount).ok_or(AddError::Overflow)?;
        Ok(())
    }

    /// Add to a bucket, creating it at the end on first use
    pub fn add(&mut self, key: &str, amount: Money) -> Result<(), AddError> {
        self.seed(key);
        self.add_existing(key, amount)
    }

    /// Round every bucket to cents
    pub fn round_cents(&mut self) {
        for (_, amount) in &mut self.entries {
            *amount = amount.round_cents();
        }
    }

    pub fn get(&self, key: &str) -> Option<Money> {
        self.index.get(key).map(|&i| self.entries[i].1)
    }

    /// Iterate over `(label, amount)` pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, Money)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Sum of every bucket, `None` on overflow
    pub fn total(&self) -> Option<Money> {
        self.entries
            .iter()
            .try_fold(Money::zero(), |acc, (_, v)| acc.checked_add(*v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

//! Cosine similarity over sparse rows.
//!
//! Every vector handled here has non-negative components, so scores land
//! in `[0, 1]`. Zero vectors score 0 against anything.

use std::collections::BTreeSet;

/// Sparse vector stored as `(index, value)` pairs sorted by index
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVector {
    entries: Vec<(usize, f64)>,
}

impl SparseVector {
    /// Builds a vector from unordered entries, summing duplicate indices and
    /// dropping zeros
    pub fn from_entries(mut entries: Vec<(usize, f64)>) -> Self {
        entries.sort_by_key(|(index, _)| *index);

        let mut merged: Vec<(usize, f64)> = Vec::with_capacity(entries.len());
        for (index, value) in entries {
            match merged.last_mut() {
                Some((last, acc)) if *last == index => *acc += value,
                _ => merged.push((index, value)),
            }
        }
        merged.retain(|(_, value)| *value != 0.0);

        Self { entries: merged }
    }

    pub fn entries(&self) -> &[(usize, f64)] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> f64 {
        self.entries
            .binary_search_by_key(&index, |(i, _)| *i)
            .map(|pos| self.entries[pos].1)
            .unwrap_or(0.0)
    }

    pub fn squared_norm(&self) -> f64 {
        self.entries.iter().map(|(_, v)| v * v).sum()
    }

    /// Scales the vector to unit L2 length. Zero vectors are left as-is.
    pub fn normalize(&mut self) {
        let norm = self.squared_norm().sqrt();
        if norm > 0.0 {
            for (_, value) in &mut self.entries {
                *value /= norm;
            }
        }
    }

    /// Dot product via a merge walk over both sorted entry lists
    pub fn dot(&self, other: &SparseVector) -> f64 {
        let (mut i, mut j) = (0, 0);
        let mut sum = 0.0;
        while i < self.entries.len() && j < other.entries.len() {
            let (a_index, a_value) = self.entries[i];
            let (b_index, b_value) = other.entries[j];
            match a_index.cmp(&b_index) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    sum += a_value * b_value;
                    i += 1;
                    j += 1;
                }
            }
        }
        sum
    }
}

/// Cosine similarity of two sparse vectors with non-negative components
pub fn cosine_similarity(a: &SparseVector, b: &SparseVector) -> f64 {
    let denominator = (a.squared_norm() * b.squared_norm()).sqrt();
    if denominator == 0.0 {
        return 0.0;
    }
    (a.dot(b) / denominator).clamp(0.0, 1.0)
}

/// Cosine similarity of two binary vectors given as their sets of set bits:
/// `|A ∩ B| / sqrt(|A| * |B|)`
pub fn binary_cosine_similarity<T: Ord>(a: &BTreeSet<T>, b: &BTreeSet<T>) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let intersection = a.intersection(b).count() as f64;
    let denominator = ((a.len() * b.len()) as f64).sqrt();
    (intersection / denominator).clamp(0.0, 1.0)
}

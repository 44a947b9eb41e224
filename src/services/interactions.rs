use std::collections::{BTreeMap, BTreeSet};

use super::similarity::binary_cosine_similarity;

/// Sparse binary user × movie matrix built from like edges.
///
/// Rows are exactly the users with at least one edge, columns exactly the
/// movies with at least one edge. A cell is set iff the edge exists.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserItemMatrix {
    rows: BTreeMap<i64, BTreeSet<i64>>,
    columns: BTreeSet<i64>,
}

impl UserItemMatrix {
    /// Builds the matrix from `(user_id, movie_id)` edges. Duplicate edges
    /// collapse into one cell.
    pub fn from_edges(edges: &[(i64, i64)]) -> Self {
        let mut rows: BTreeMap<i64, BTreeSet<i64>> = BTreeMap::new();
        let mut columns = BTreeSet::new();

        for &(user_id, movie_id) in edges {
            rows.entry(user_id).or_default().insert(movie_id);
            columns.insert(movie_id);
        }

        Self { rows, columns }
    }

    pub fn contains_user(&self, user_id: i64) -> bool {
        self.rows.contains_key(&user_id)
    }

    /// Movies liked by `user_id`, if the user has a row
    pub fn row(&self, user_id: i64) -> Option<&BTreeSet<i64>> {
        self.rows.get(&user_id)
    }

    pub fn user_count(&self) -> usize {
        self.rows.len()
    }

    pub fn movie_count(&self) -> usize {
        self.columns.len()
    }

    /// Cosine similarity between two users' rows. Missing rows score 0.
    pub fn user_similarity(&self, a: i64, b: i64) -> f64 {
        match (self.rows.get(&a), self.rows.get(&b)) {
            (Some(row_a), Some(row_b)) => binary_cosine_similarity(row_a, row_b),
            _ => 0.0,
        }
    }

    /// The neighborhood of `target`: other users whose similarity is strictly
    /// above `min_similarity`, most similar first (ties by user id), at most
    /// `limit` of them.
    pub fn nearest_neighbors(&self, target: i64, min_similarity: f64, limit: usize) -> Vec<(i64, f64)> {
        let Some(target_row) = self.rows.get(&target) else {
            return Vec::new();
        };

        let mut neighbors: Vec<(i64, f64)> = self
            .rows
            .iter()
            .filter(|(user_id, _)| **user_id != target)
            .map(|(user_id, row)| (*user_id, binary_cosine_similarity(target_row, row)))
            .filter(|(_, similarity)| *similarity > min_similarity)
            .collect();

        neighbors.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        neighbors.truncate(limit);
        neighbors
    }
}

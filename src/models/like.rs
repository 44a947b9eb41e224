use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An implicit positive signal: a user liked a movie.
///
/// At most one like exists per (user, movie) pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Like {
    pub id: i64,
    pub user_id: i64,
    pub movie_id: i64,
    pub created_at: DateTime<Utc>,
}

impl Like {
    pub fn new(id: i64, user_id: i64, movie_id: i64) -> Self {
        Self {
            id,
            user_id,
            movie_id,
            created_at: Utc::now(),
        }
    }

    /// The (user, movie) edge this like contributes to the interaction matrix
    pub fn edge(&self) -> (i64, i64) {
        (self.user_id, self.movie_id)
    }
}

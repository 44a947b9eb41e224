//! Store abstractions consumed by the recommendation engine
//!
//! The engine only reads. Each call is a point-in-time read with no
//! transactional snapshot across calls.
use async_trait::async_trait;

use crate::{
    error::AppResult,
    models::{Like, Movie, User},
};

/// Catalog store: movies and their static metadata
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MovieRepository: Send + Sync {
    async fn get_by_id(&self, movie_id: i64) -> AppResult<Option<Movie>>;

    /// One page of the catalog plus the catalog size
    async fn get_all(&self, page: u32, per_page: u32) -> AppResult<(Vec<Movie>, u64)>;

    /// One page of movies ordered by like count, then vote average, both descending
    async fn get_popular(&self, page: u32, per_page: u32) -> AppResult<(Vec<Movie>, u64)>;
}

/// Interaction store: implicit user-movie likes
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LikeRepository: Send + Sync {
    /// One page of a user's likes, newest first, plus the user's like count
    async fn get_by_user(
        &self,
        user_id: i64,
        page: u32,
        per_page: u32,
    ) -> AppResult<(Vec<Like>, u64)>;

    async fn get_by_user_and_movie(&self, user_id: i64, movie_id: i64) -> AppResult<Option<Like>>;

    /// Every (user_id, movie_id) edge
    async fn get_all_edges(&self) -> AppResult<Vec<(i64, i64)>>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn get_by_id(&self, user_id: i64) -> AppResult<Option<User>>;
}

use std::sync::Arc;

use crate::{
    db::MovieRepository,
    error::AppResult,
    models::{Pagination, RecommendationResult, User},
};

use super::fallback_label;

/// Ranks the catalog by like count, then vote average. Not personalized.
#[derive(Clone)]
pub struct PopularityStrategy {
    movies: Arc<dyn MovieRepository>,
}

impl PopularityStrategy {
    pub const NAME: &'static str = "Popularity-Based";
    pub const DESCRIPTION: &'static str =
        "Recommends movies based on overall popularity (number of likes from all users)";

    pub fn new(movies: Arc<dyn MovieRepository>) -> Self {
        Self { movies }
    }

    pub async fn recommend(
        &self,
        _user: &User,
        pagination: Pagination,
    ) -> AppResult<RecommendationResult> {
        self.ranked(pagination, Self::NAME.to_string()).await
    }

    /// The popularity ranking, labelled as a fallback of `strategy_name`
    pub async fn fallback_for(
        &self,
        strategy_name: &str,
        pagination: Pagination,
    ) -> AppResult<RecommendationResult> {
        self.ranked(pagination, fallback_label(strategy_name)).await
    }

    async fn ranked(
        &self,
        pagination: Pagination,
        algorithm_used: String,
    ) -> AppResult<RecommendationResult> {
        let (movies, total) = self
            .movies
            .get_popular(pagination.page, pagination.page_size)
            .await?;

        Ok(RecommendationResult {
            movies,
            total,
            algorithm_used,
            page: pagination.page,
            page_size: pagination.page_size,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::InMemoryStore;
    use crate::models::Movie;

    async fn store() -> InMemoryStore {
        let store = InMemoryStore::new();
        for id in 1..=5 {
            store
                .insert_movie(Movie::new(id, format!("Movie {}", id), vec![]).with_vote_average(id as f64))
                .await;
        }
        store.add_like(1, 2).await;
        store.add_like(2, 2).await;
        store.add_like(1, 4).await;
        store
    }

    #[tokio::test]
    async fn test_ranks_by_likes_then_votes() {
        let strategy = PopularityStrategy::new(Arc::new(store().await));
        let user = User::new(1, "a@example.com", "a");

        let result = strategy.recommend(&user, Pagination::clamped(1, 10)).await.unwrap();

        assert_eq!(result.movie_ids(), vec![2, 4, 5, 3, 1]);
        assert_eq!(result.total, 5);
        assert_eq!(result.algorithm_used, "Popularity-Based");
    }

    #[tokio::test]
    async fn test_ignores_user() {
        let strategy = PopularityStrategy::new(Arc::new(store().await));
        let a = User::new(1, "a@example.com", "a");
        let b = User::new(2, "b@example.com", "b");

        let first = strategy.recommend(&a, Pagination::clamped(1, 3)).await.unwrap();
        let second = strategy.recommend(&b, Pagination::clamped(1, 3)).await.unwrap();
        assert_eq!(first.movie_ids(), second.movie_ids());
    }

    #[tokio::test]
    async fn test_fallback_label() {
        let strategy = PopularityStrategy::new(Arc::new(store().await));

        let result = strategy
            .fallback_for("Collaborative Filtering", Pagination::clamped(2, 2))
            .await
            .unwrap();

        assert_eq!(result.algorithm_used, "Collaborative Filtering (fallback to popularity)");
        assert_eq!(result.movie_ids(), vec![5, 3]);
        assert_eq!(result.page, 2);
    }
}

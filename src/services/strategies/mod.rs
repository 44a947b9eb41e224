//! Ranking strategies.
//!
//! The set of strategies is closed: [`Strategy`] wraps each concrete
//! algorithm behind the same `recommend` / `name` / `description` surface.
//! Every strategy degrades to a popularity ranking instead of failing when
//! it lacks signal, so the only errors that escape are store errors.

use std::collections::BTreeSet;

use crate::{
    db::{LikeRepository, MovieRepository},
    error::AppResult,
    models::{Movie, Pagination, RecommendationResult, User},
};

pub mod collaborative;
pub mod content_based;
pub mod popularity;

pub use collaborative::CollaborativeStrategy;
pub use content_based::ContentBasedStrategy;
pub use popularity::PopularityStrategy;

/// One of the registered ranking algorithms
#[derive(Clone)]
pub enum Strategy {
    Popularity(PopularityStrategy),
    Collaborative(CollaborativeStrategy),
    ContentBased(ContentBasedStrategy),
}

impl Strategy {
    /// Ranks movies for `user` and returns the requested page
    pub async fn recommend(
        &self,
        user: &User,
        pagination: Pagination,
    ) -> AppResult<RecommendationResult> {
        match self {
            Strategy::Popularity(strategy) => strategy.recommend(user, pagination).await,
            Strategy::Collaborative(strategy) => strategy.recommend(user, pagination).await,
            Strategy::ContentBased(strategy) => strategy.recommend(user, pagination).await,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Strategy::Popularity(_) => PopularityStrategy::NAME,
            Strategy::Collaborative(_) => CollaborativeStrategy::NAME,
            Strategy::ContentBased(_) => ContentBasedStrategy::NAME,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Strategy::Popularity(_) => PopularityStrategy::DESCRIPTION,
            Strategy::Collaborative(_) => CollaborativeStrategy::DESCRIPTION,
            Strategy::ContentBased(_) => ContentBasedStrategy::DESCRIPTION,
        }
    }
}

/// Label for a result produced by the popularity fallback of `strategy_name`
pub fn fallback_label(strategy_name: &str) -> String {
    format!("{} (fallback to popularity)", strategy_name)
}

/// Distinct movie ids the user liked, reading at most `cap` likes
pub(crate) async fn liked_movie_ids(
    likes: &dyn LikeRepository,
    user_id: i64,
    cap: u32,
) -> AppResult<BTreeSet<i64>> {
    let (user_likes, _) = likes.get_by_user(user_id, 1, cap).await?;
    Ok(user_likes.into_iter().map(|like| like.movie_id).collect())
}

/// Resolves ranked ids into movies, preserving order.
///
/// Ids that no longer resolve were deleted after ranking and are dropped.
pub(crate) async fn hydrate(movies: &dyn MovieRepository, ids: &[i64]) -> AppResult<Vec<Movie>> {
    let mut hydrated = Vec::with_capacity(ids.len());
    for &movie_id in ids {
        match movies.get_by_id(movie_id).await? {
            Some(movie) => hydrated.push(movie),
            None => tracing::debug!(movie_id, "Dropping ranked movie that no longer exists"),
        }
    }
    Ok(hydrated)
}

/// Paginates a full ranked id list and hydrates the requested page.
///
/// `total` is the ranked length, not the number of movies that hydrated.
pub(crate) async fn ranked_page(
    movies: &dyn MovieRepository,
    ranked: &[i64],
    pagination: Pagination,
    algorithm_used: String,
) -> AppResult<RecommendationResult> {
    let page_movies = hydrate(movies, pagination.slice(ranked)).await?;

    Ok(RecommendationResult {
        movies: page_movies,
        total: ranked.len() as u64,
        algorithm_used,
        page: pagination.page,
        page_size: pagination.page_size,
    })
}

/// Sorts `(id, score)` pairs by score descending, ties by ascending id
pub(crate) fn sort_by_score(scored: &mut [(i64, f64)]) {
    scored.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{InMemoryStore, MockMovieRepository};

    #[test]
    fn test_fallback_label() {
        assert_eq!(
            fallback_label("Collaborative Filtering"),
            "Collaborative Filtering (fallback to popularity)"
        );
    }

    #[test]
    fn test_sort_by_score_breaks_ties_by_id() {
        let mut scored = vec![(5, 0.5), (2, 0.9), (3, 0.5), (1, 0.1)];
        sort_by_score(&mut scored);
        let ids: Vec<i64> = scored.iter().map(|(id, _)| *id).collect();
        assert_eq!(ids, vec![2, 3, 5, 1]);
    }

    #[tokio::test]
    async fn test_ranked_page_drops_stale_ids_but_keeps_total() {
        let mut movies = MockMovieRepository::new();
        movies
            .expect_get_by_id()
            .returning(|id| Ok((id != 2).then(|| Movie::new(id, format!("Movie {}", id), vec![]))));

        let result = ranked_page(
            &movies,
            &[1, 2, 3, 4],
            Pagination::clamped(1, 3),
            "Test".to_string(),
        )
        .await
        .unwrap();

        assert_eq!(result.movie_ids(), vec![1, 3]);
        assert_eq!(result.total, 4);
        assert_eq!(result.page_size, 3);
    }

    #[tokio::test]
    async fn test_movie_removed_after_ranking_is_dropped() {
        let store = InMemoryStore::new();
        for id in 1..=3 {
            store.insert_movie(Movie::new(id, format!("Movie {}", id), vec![])).await;
        }
        let ranked = [3, 2, 1];
        assert!(store.remove_movie(2).await);

        let result = ranked_page(&store, &ranked, Pagination::clamped(1, 10), "Test".to_string())
            .await
            .unwrap();

        assert_eq!(result.movie_ids(), vec![3, 1]);
        assert_eq!(result.total, 3);
    }
}

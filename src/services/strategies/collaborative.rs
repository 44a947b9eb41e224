use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use crate::{
    config::CollaborativeConfig,
    db::{LikeRepository, MovieRepository},
    error::AppResult,
    models::{Pagination, RecommendationResult, User},
    services::interactions::UserItemMatrix,
};

use super::{liked_movie_ids, ranked_page, sort_by_score, PopularityStrategy};

/// User-based k-nearest-neighbor collaborative filtering over likes.
///
/// Neighbors are the users whose like rows are most cosine-similar to the
/// target's. Each movie a neighbor liked, and the target has not, scores the
/// sum of the similarities of the neighbors who liked it.
#[derive(Clone)]
pub struct CollaborativeStrategy {
    movies: Arc<dyn MovieRepository>,
    likes: Arc<dyn LikeRepository>,
    popularity: PopularityStrategy,
    config: CollaborativeConfig,
}

impl CollaborativeStrategy {
    pub const NAME: &'static str = "Collaborative Filtering";
    pub const DESCRIPTION: &'static str = "Recommends movies based on users with similar taste \
         using collaborative filtering with cosine similarity";

    pub fn new(
        movies: Arc<dyn MovieRepository>,
        likes: Arc<dyn LikeRepository>,
        config: CollaborativeConfig,
    ) -> Self {
        Self {
            popularity: PopularityStrategy::new(Arc::clone(&movies)),
            movies,
            likes,
            config,
        }
    }

    pub async fn recommend(
        &self,
        user: &User,
        pagination: Pagination,
    ) -> AppResult<RecommendationResult> {
        let liked = liked_movie_ids(self.likes.as_ref(), user.id, self.config.max_user_likes).await?;
        if liked.is_empty() {
            tracing::info!(user_id = user.id, reason = "no likes", "Collaborative falling back to popularity");
            return self.popularity.fallback_for(Self::NAME, pagination).await;
        }

        let edges = self.likes.get_all_edges().await?;
        if edges.len() < self.config.min_common_movies {
            tracing::info!(
                user_id = user.id,
                edges = edges.len(),
                min_common_movies = self.config.min_common_movies,
                "Collaborative falling back to popularity"
            );
            return self.popularity.fallback_for(Self::NAME, pagination).await;
        }

        let matrix = UserItemMatrix::from_edges(&edges);
        if !matrix.contains_user(user.id) {
            tracing::info!(user_id = user.id, reason = "user not in matrix", "Collaborative falling back to popularity");
            return self.popularity.fallback_for(Self::NAME, pagination).await;
        }

        let ranked = rank_candidates(&matrix, user.id, &liked, &self.config);

        tracing::debug!(
            user_id = user.id,
            users = matrix.user_count(),
            movies = matrix.movie_count(),
            candidates = ranked.len(),
            "Collaborative candidates ranked"
        );

        let ids: Vec<i64> = ranked.into_iter().map(|(movie_id, _)| movie_id).collect();
        ranked_page(self.movies.as_ref(), &ids, pagination, Self::NAME.to_string()).await
    }
}

/// Scores every movie liked by a neighbor of `target` and not in `liked`,
/// highest score first (ties by ascending movie id).
///
/// Scores are additive: a movie gains the full similarity of each neighbor
/// who liked it.
pub fn rank_candidates(
    matrix: &UserItemMatrix,
    target: i64,
    liked: &BTreeSet<i64>,
    config: &CollaborativeConfig,
) -> Vec<(i64, f64)> {
    let neighbors = matrix.nearest_neighbors(
        target,
        config.min_user_similarity,
        config.max_similar_users,
    );

    let mut scores: HashMap<i64, f64> = HashMap::new();
    for (neighbor, similarity) in neighbors {
        let Some(row) = matrix.row(neighbor) else {
            continue;
        };
        for movie_id in row.difference(liked) {
            *scores.entry(*movie_id).or_insert(0.0) += similarity;
        }
    }

    let mut ranked: Vec<(i64, f64)> = scores.into_iter().collect();
    sort_by_score(&mut ranked);
    ranked
}

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::{
    db::{LikeRepository, UserRepository},
    error::{AppError, AppResult},
    models::{
        AlgorithmInfo, MovieResponse, Pagination, RecommendationAlgorithm, RecommendationPage,
    },
};

use super::registry::StrategyRegistry;

/// Entry point for recommendation requests
///
/// Resolves the user, runs the selected strategy through the registry and
/// turns its result into a client-facing page with per-movie like flags.
#[derive(Clone)]
pub struct RecommendationService {
    registry: Arc<StrategyRegistry>,
    users: Arc<dyn UserRepository>,
    likes: Arc<dyn LikeRepository>,
}

impl RecommendationService {
    pub fn new(
        registry: Arc<StrategyRegistry>,
        users: Arc<dyn UserRepository>,
        likes: Arc<dyn LikeRepository>,
    ) -> Self {
        Self {
            registry,
            users,
            likes,
        }
    }

    /// Generates a page of recommendations for `user_id`.
    ///
    /// `page` is clamped to at least 1 and `page_size` into `[1, 100]`.
    pub async fn get_recommendations(
        &self,
        user_id: i64,
        algorithm: RecommendationAlgorithm,
        page: i64,
        page_size: i64,
    ) -> AppResult<RecommendationPage> {
        let pagination = Pagination::clamped(page, page_size);
        let strategy = self.registry.resolve(algorithm)?;

        let user = self
            .users
            .get_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User with ID {} not found", user_id)))?;

        tracing::info!(
            user_id,
            algorithm = %algorithm,
            page = pagination.page,
            page_size = pagination.page_size,
            "Generating recommendations"
        );

        let result = strategy.recommend(&user, pagination).await?;

        let mut items = Vec::with_capacity(result.movies.len());
        for movie in result.movies {
            let is_liked = self
                .likes
                .get_by_user_and_movie(user_id, movie.id)
                .await?
                .is_some();
            items.push(MovieResponse::from_movie(movie, is_liked));
        }

        tracing::info!(
            user_id,
            algorithm_used = %result.algorithm_used,
            total = result.total,
            returned = items.len(),
            "Recommendations generated"
        );

        Ok(RecommendationPage {
            items,
            total: result.total,
            page: result.page,
            page_size: result.page_size,
            total_pages: pagination.total_pages(result.total),
            algorithm_used: result.algorithm_used,
        })
    }

    pub fn default_algorithm(&self) -> RecommendationAlgorithm {
        self.registry.default_algorithm()
    }

    /// Discovery metadata for every registered algorithm. Touches no store.
    pub fn list_algorithms(&self) -> BTreeMap<String, AlgorithmInfo> {
        self.registry.available_algorithms()
    }
}

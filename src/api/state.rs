use std::sync::Arc;

use crate::{
    config::RecommenderConfig,
    db::{LikeRepository, MovieRepository, UserRepository},
    services::{RecommendationService, StrategyRegistry},
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub recommendations: RecommendationService,
}

impl AppState {
    /// Wires the strategy registry and recommendation service over one store
    /// that serves movies, likes and users.
    pub fn new<S>(store: S, config: &RecommenderConfig) -> Self
    where
        S: MovieRepository + LikeRepository + UserRepository + Clone + 'static,
    {
        let movies: Arc<dyn MovieRepository> = Arc::new(store.clone());
        let likes: Arc<dyn LikeRepository> = Arc::new(store.clone());
        let users: Arc<dyn UserRepository> = Arc::new(store);

        let registry = StrategyRegistry::new(movies, Arc::clone(&likes), config);

        Self {
            recommendations: RecommendationService::new(Arc::new(registry), users, likes),
        }
    }
}

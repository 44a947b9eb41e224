use std::collections::BTreeMap;
use std::sync::Arc;

use crate::{
    config::RecommenderConfig,
    db::{LikeRepository, MovieRepository},
    error::{AppError, AppResult},
    models::{AlgorithmInfo, RecommendationAlgorithm},
};

use super::strategies::{CollaborativeStrategy, ContentBasedStrategy, PopularityStrategy, Strategy};

/// Immutable map from algorithm selector to strategy, built once at startup
#[derive(Clone)]
pub struct StrategyRegistry {
    strategies: BTreeMap<RecommendationAlgorithm, Strategy>,
    default_algorithm: RecommendationAlgorithm,
}

impl StrategyRegistry {
    /// Registers every known algorithm over the given stores
    pub fn new(
        movies: Arc<dyn MovieRepository>,
        likes: Arc<dyn LikeRepository>,
        config: &RecommenderConfig,
    ) -> Self {
        let strategies = RecommendationAlgorithm::ALL
            .into_iter()
            .map(|algorithm| {
                let strategy = match algorithm {
                    RecommendationAlgorithm::Popularity => {
                        Strategy::Popularity(PopularityStrategy::new(Arc::clone(&movies)))
                    }
                    RecommendationAlgorithm::Collaborative => {
                        Strategy::Collaborative(CollaborativeStrategy::new(
                            Arc::clone(&movies),
                            Arc::clone(&likes),
                            config.collaborative.clone(),
                        ))
                    }
                    RecommendationAlgorithm::ContentBased => {
                        Strategy::ContentBased(ContentBasedStrategy::new(
                            Arc::clone(&movies),
                            Arc::clone(&likes),
                            config.content_based.clone(),
                        ))
                    }
                };
                (algorithm, strategy)
            })
            .collect();

        Self {
            strategies,
            default_algorithm: config.default_algorithm,
        }
    }

    /// Builds a registry from an explicit strategy set
    pub fn from_strategies(
        strategies: impl IntoIterator<Item = (RecommendationAlgorithm, Strategy)>,
        default_algorithm: RecommendationAlgorithm,
    ) -> Self {
        Self {
            strategies: strategies.into_iter().collect(),
            default_algorithm,
        }
    }

    pub fn default_algorithm(&self) -> RecommendationAlgorithm {
        self.default_algorithm
    }

    pub fn get_strategy(&self, algorithm: RecommendationAlgorithm) -> Option<&Strategy> {
        self.strategies.get(&algorithm)
    }

    /// The strategy registered for `algorithm`, or the default one.
    ///
    /// Fails with [`AppError::Configuration`] when neither is registered.
    pub fn resolve(&self, algorithm: RecommendationAlgorithm) -> AppResult<&Strategy> {
        if let Some(strategy) = self.strategies.get(&algorithm) {
            return Ok(strategy);
        }

        tracing::warn!(
            requested = %algorithm,
            default = %self.default_algorithm,
            "Algorithm not registered, using default"
        );

        self.strategies.get(&self.default_algorithm).ok_or_else(|| {
            tracing::error!(
                requested = %algorithm,
                default = %self.default_algorithm,
                "No recommendation strategy available"
            );
            AppError::Configuration("No recommendation strategy available".to_string())
        })
    }

    /// Name and description of every registered strategy, keyed by selector
    pub fn available_algorithms(&self) -> BTreeMap<String, AlgorithmInfo> {
        self.strategies
            .iter()
            .map(|(algorithm, strategy)| {
                (
                    algorithm.as_str().to_string(),
                    AlgorithmInfo {
                        name: strategy.name().to_string(),
                        description: strategy.description().to_string(),
                    },
                )
            })
            .collect()
    }
}

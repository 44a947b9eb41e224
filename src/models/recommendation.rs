use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

use crate::error::AppError;

use super::{Movie, MovieResponse};

/// Selector for a ranking strategy
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationAlgorithm {
    Popularity,
    Collaborative,
    ContentBased,
}

impl RecommendationAlgorithm {
    /// Every selector, in registration order
    pub const ALL: [RecommendationAlgorithm; 3] = [
        RecommendationAlgorithm::Popularity,
        RecommendationAlgorithm::Collaborative,
        RecommendationAlgorithm::ContentBased,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RecommendationAlgorithm::Popularity => "popularity",
            RecommendationAlgorithm::Collaborative => "collaborative",
            RecommendationAlgorithm::ContentBased => "content_based",
        }
    }
}

impl Display for RecommendationAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RecommendationAlgorithm {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|algorithm| algorithm.as_str() == s.trim().to_lowercase())
            .ok_or_else(|| AppError::InvalidInput(format!("Unsupported algorithm: {}", s)))
    }
}

/// Ranked, paginated output of a single strategy run
#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationResult {
    /// Hydrated movies for the requested page, in rank order
    pub movies: Vec<Movie>,
    /// Candidate count before pagination and hydration
    pub total: u64,
    /// Label of the algorithm that actually produced the ranking
    pub algorithm_used: String,
    pub page: u32,
    pub page_size: u32,
}

impl RecommendationResult {
    pub fn movie_ids(&self) -> Vec<i64> {
        self.movies.iter().map(|m| m.id).collect()
    }
}

/// Discovery metadata for one strategy
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AlgorithmInfo {
    pub name: String,
    pub description: String,
}

/// Recommendation response returned to clients
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecommendationPage {
    pub items: Vec<MovieResponse>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
    pub total_pages: u64,
    pub algorithm_used: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_algorithm_serialization() {
        let json = serde_json::to_string(&RecommendationAlgorithm::ContentBased).unwrap();
        assert_eq!(json, "\"content_based\"");

        let parsed: RecommendationAlgorithm = serde_json::from_str("\"collaborative\"").unwrap();
        assert_eq!(parsed, RecommendationAlgorithm::Collaborative);
    }

    #[test]
    fn test_algorithm_from_str() {
        assert_eq!(
            "popularity".parse::<RecommendationAlgorithm>().unwrap(),
            RecommendationAlgorithm::Popularity
        );
        assert_eq!(
            " Content_Based ".parse::<RecommendationAlgorithm>().unwrap(),
            RecommendationAlgorithm::ContentBased
        );
        assert!("matrix_factorization".parse::<RecommendationAlgorithm>().is_err());
    }

    #[test]
    fn test_display_matches_selector() {
        for algorithm in RecommendationAlgorithm::ALL {
            assert_eq!(algorithm.to_string(), algorithm.as_str());
        }
    }
}

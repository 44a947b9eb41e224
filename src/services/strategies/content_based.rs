use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use crate::{
    config::ContentBasedConfig,
    db::{LikeRepository, MovieRepository},
    error::AppResult,
    models::{Movie, Pagination, RecommendationResult, User},
    services::{
        features::{feature_document, TfidfError, TfidfVectorizer},
        similarity::cosine_similarity,
    },
};

use super::{liked_movie_ids, ranked_page, sort_by_score, PopularityStrategy};

const TFIDF_WEIGHT: f64 = 0.7;
const GENRE_WEIGHT: f64 = 0.3;
const GENRE_OVERLAP_BONUS: f64 = 1.2;

/// Content-based filtering over TF-IDF movie features.
///
/// A candidate scores its best cosine similarity against any single liked
/// movie. When text is too sparse to separate candidates, genre overlap with
/// the liked set is blended in.
#[derive(Clone)]
pub struct ContentBasedStrategy {
    movies: Arc<dyn MovieRepository>,
    likes: Arc<dyn LikeRepository>,
    popularity: PopularityStrategy,
    config: ContentBasedConfig,
}

impl ContentBasedStrategy {
    pub const NAME: &'static str = "Content-Based Filtering";
    pub const DESCRIPTION: &'static str = "Recommends movies similar to those you've already \
         liked based on genres, title, and overview using TF-IDF and cosine similarity. \
         Adaptively adjusts similarity thresholds to handle diverse user preferences and \
         ensures minimum recommendation counts.";

    pub fn new(
        movies: Arc<dyn MovieRepository>,
        likes: Arc<dyn LikeRepository>,
        config: ContentBasedConfig,
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
            tracing::info!(user_id = user.id, reason = "no likes", "Content-based falling back to popularity");
            return self.popularity.fallback_for(Self::NAME, pagination).await;
        }

        let (catalog, _) = self.movies.get_all(1, self.config.max_catalog_items).await?;
        if catalog.len() < 2 {
            tracing::info!(
                user_id = user.id,
                catalog = catalog.len(),
                "Content-based falling back to popularity"
            );
            return self.popularity.fallback_for(Self::NAME, pagination).await;
        }

        let scores = score_candidates(&catalog, &liked, &self.config);
        let ranked = select_recommendations(scores, &self.config);

        tracing::debug!(
            user_id = user.id,
            catalog = catalog.len(),
            recommendations = ranked.len(),
            "Content-based candidates ranked"
        );

        ranked_page(self.movies.as_ref(), &ranked, pagination, Self::NAME.to_string()).await
    }
}

/// Similarity of every catalog movie outside `liked` to the liked set
pub fn score_candidates(
    catalog: &[Movie],
    liked: &BTreeSet<i64>,
    config: &ContentBasedConfig,
) -> Vec<(i64, f64)> {
    let liked_movies: Vec<&Movie> = catalog.iter().filter(|m| liked.contains(&m.id)).collect();
    let documents: Vec<String> = catalog.iter().map(feature_document).collect();

    let rows = match TfidfVectorizer::new(config.max_features).fit_transform(&documents) {
        Ok(rows) => rows,
        Err(TfidfError::EmptyVocabulary) => {
            tracing::debug!("Empty TF-IDF vocabulary, scoring by genre overlap only");
            let genre_scores = genre_similarities(catalog, &liked_movies);
            return catalog
                .iter()
                .filter(|m| !liked.contains(&m.id))
                .map(|m| (m.id, genre_scores.get(&m.id).copied().unwrap_or(0.0)))
                .collect();
        }
    };

    let liked_rows: Vec<usize> = catalog
        .iter()
        .enumerate()
        .filter(|(_, m)| liked.contains(&m.id))
        .map(|(index, _)| index)
        .collect();

    let mut scores: Vec<(i64, f64)> = catalog
        .iter()
        .enumerate()
        .filter(|(_, m)| !liked.contains(&m.id))
        .map(|(index, m)| {
            let best = liked_rows
                .iter()
                .map(|&liked_index| cosine_similarity(&rows[liked_index], &rows[index]))
                .fold(0.0, f64::max);
            (m.id, best)
        })
        .collect();

    let best_overall = scores.iter().map(|(_, score)| *score).fold(0.0, f64::max);
    if !scores.is_empty() && best_overall < config.genre_blend_below {
        tracing::debug!(best_overall, "Sparse TF-IDF signal, blending in genre overlap");
        let genre_scores = genre_similarities(catalog, &liked_movies);
        for (movie_id, score) in &mut scores {
            if let Some(genre_score) = genre_scores.get(movie_id) {
                *score = TFIDF_WEIGHT * *score + GENRE_WEIGHT * genre_score;
            }
        }
    }

    scores
}

/// Genre overlap of each catalog movie with the liked movies.
///
/// Each of a movie's genres contributes its share of all liked-genre
/// occurrences; the sum is divided by the movie's genre count, then boosted
/// by 1.2 (capped at 1.0) when any genre overlaps. Empty when the liked
/// movies carry no genres.
pub fn genre_similarities(catalog: &[Movie], liked_movies: &[&Movie]) -> HashMap<i64, f64> {
    let mut liked_genres: HashMap<&str, usize> = HashMap::new();
    for movie in liked_movies {
        for genre in &movie.genres {
            *liked_genres.entry(genre.as_str()).or_insert(0) += 1;
        }
    }

    if liked_genres.is_empty() {
        return HashMap::new();
    }
    let total_liked: usize = liked_genres.values().sum();

    catalog
        .iter()
        .map(|movie| {
            let genres: BTreeSet<&str> = movie.genres.iter().map(String::as_str).collect();
            if genres.is_empty() {
                return (movie.id, 0.0);
            }

            let overlap: f64 = genres
                .iter()
                .filter_map(|genre| liked_genres.get(genre))
                .map(|count| *count as f64 / total_liked as f64)
                .sum();
            let mut similarity = overlap / genres.len() as f64;
            if similarity > 0.0 {
                similarity = (similarity * GENRE_OVERLAP_BONUS).min(1.0);
            }
            (movie.id, similarity)
        })
        .collect()
}

/// Ranks scored candidates with adaptive thresholding.
///
/// Keeps candidates strictly above the threshold, halving it while fewer
/// than `min_recommendations` survive and it is still above the floor. If
/// that never yields enough, every candidate is kept. The result is capped
/// at `max_recommendations`.
pub fn select_recommendations(mut scores: Vec<(i64, f64)>, config: &ContentBasedConfig) -> Vec<i64> {
    sort_by_score(&mut scores);

    let mut selected: Vec<i64> = Vec::new();
    let mut threshold = config.similarity_threshold;

    while selected.len() < config.min_recommendations
        && threshold > config.threshold_floor
        && !scores.is_empty()
    {
        selected = scores
            .iter()
            .filter(|(_, score)| *score > threshold)
            .map(|(movie_id, _)| *movie_id)
            .collect();

        if selected.len() < config.min_recommendations {
            threshold *= 0.5;
        }
    }

    if selected.len() < config.min_recommendations && !scores.is_empty() {
        tracing::debug!(
            threshold,
            above_threshold = selected.len(),
            "Threshold relaxation exhausted, taking best candidates"
        );
        selected = scores.iter().map(|(movie_id, _)| *movie_id).collect();
    }

    selected.truncate(config.max_recommendations);
    selected
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A catalog item as seen by the recommendation engine
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Movie {
    pub id: i64,
    pub tmdb_id: Option<i64>,
    pub title: String,
    pub overview: Option<String>,
    /// Release date as stored (YYYY-MM-DD)
    pub release_date: Option<String>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub vote_average: f64,
    pub vote_count: i64,
    pub popularity: f64,
    pub genres: Vec<String>,
    pub runtime: Option<i32>,
    pub original_language: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Movie {
    /// Creates a movie with only the fields that matter for ranking
    pub fn new(id: i64, title: impl Into<String>, genres: Vec<String>) -> Self {
        let now = Utc::now();
        Self {
            id,
            tmdb_id: None,
            title: title.into(),
            overview: None,
            release_date: None,
            poster_path: None,
            backdrop_path: None,
            vote_average: 0.0,
            vote_count: 0,
            popularity: 0.0,
            genres,
            runtime: None,
            original_language: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_overview(mut self, overview: impl Into<String>) -> Self {
        self.overview = Some(overview.into());
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.original_language = Some(language.into());
        self
    }

    pub fn with_vote_average(mut self, vote_average: f64) -> Self {
        self.vote_average = vote_average;
        self
    }

    /// Decodes the serialized genre list stored alongside a movie.
    ///
    /// Malformed or missing payloads decode to an empty list.
    pub fn genres_from_json(raw: Option<&str>) -> Vec<String> {
        raw.and_then(|json| serde_json::from_str(json).ok())
            .unwrap_or_default()
    }

    /// Release year, taken from the first four characters of the release date
    pub fn year(&self) -> Option<String> {
        self.release_date
            .as_deref()
            .filter(|date| date.len() >= 4)
            .and_then(|date| date.get(..4))
            .map(str::to_string)
    }
}

/// Movie as returned to clients, flagged with the requesting user's like
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieResponse {
    pub id: i64,
    pub tmdb_id: Option<i64>,
    pub title: String,
    pub overview: Option<String>,
    pub release_date: Option<String>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub vote_average: f64,
    pub vote_count: i64,
    pub popularity: f64,
    pub genres: Vec<String>,
    pub runtime: Option<i32>,
    pub original_language: Option<String>,
    pub year: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_liked: bool,
}

impl MovieResponse {
    pub fn from_movie(movie: Movie, is_liked: bool) -> Self {
        let year = movie.year();
        Self {
            id: movie.id,
            tmdb_id: movie.tmdb_id,
            title: movie.title,
            overview: movie.overview,
            release_date: movie.release_date,
            poster_path: movie.poster_path,
            backdrop_path: movie.backdrop_path,
            vote_average: movie.vote_average,
            vote_count: movie.vote_count,
            popularity: movie.popularity,
            genres: movie.genres,
            runtime: movie.runtime,
            original_language: movie.original_language,
            year,
            created_at: movie.created_at,
            updated_at: movie.updated_at,
            is_liked,
        }
    }
}

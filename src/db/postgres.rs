use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{postgres::PgPoolOptions, FromRow, PgPool};

use crate::{
    db::{LikeRepository, MovieRepository, UserRepository},
    error::AppResult,
    models::{Like, Movie, User},
};

/// Creates a PostgreSQL connection pool
///
/// Establishes a pool of database connections for efficient reuse.
/// The pool automatically manages connection lifecycle and limits.
pub async fn create_pool(database_url: &str, max_connections: u32) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;

    Ok(pool)
}

/// Applies the bundled schema migrations
pub async fn run_migrations(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

const MOVIE_COLUMNS: &str = "m.id, m.tmdb_id, m.title, m.overview, m.release_date, \
     m.poster_path, m.backdrop_path, m.vote_average, m.vote_count, m.popularity, \
     m.genres, m.runtime, m.original_language, m.created_at, m.updated_at";

#[derive(Debug, FromRow)]
struct MovieRow {
    id: i64,
    tmdb_id: Option<i64>,
    title: String,
    overview: Option<String>,
    release_date: Option<String>,
    poster_path: Option<String>,
    backdrop_path: Option<String>,
    vote_average: f64,
    vote_count: i64,
    popularity: f64,
    genres: Option<String>,
    runtime: Option<i32>,
    original_language: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<MovieRow> for Movie {
    fn from(row: MovieRow) -> Self {
        Movie {
            id: row.id,
            tmdb_id: row.tmdb_id,
            title: row.title,
            overview: row.overview,
            release_date: row.release_date,
            poster_path: row.poster_path,
            backdrop_path: row.backdrop_path,
            vote_average: row.vote_average,
            vote_count: row.vote_count,
            popularity: row.popularity,
            genres: Movie::genres_from_json(row.genres.as_deref()),
            runtime: row.runtime,
            original_language: row.original_language,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct LikeRow {
    id: i64,
    user_id: i64,
    movie_id: i64,
    created_at: DateTime<Utc>,
}

impl From<LikeRow> for Like {
    fn from(row: LikeRow) -> Self {
        Like {
            id: row.id,
            user_id: row.user_id,
            movie_id: row.movie_id,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct UserRow {
    id: i64,
    email: String,
    username: String,
    is_active: bool,
    created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            email: row.email,
            username: row.username,
            is_active: row.is_active,
            created_at: row.created_at,
        }
    }
}

fn limit_offset(page: u32, per_page: u32) -> (i64, i64) {
    let limit = per_page as i64;
    let offset = (page.max(1) as i64 - 1) * limit;
    (limit, offset)
}

/// PostgreSQL-backed catalog, interaction and user stores
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MovieRepository for PgStore {
    async fn get_by_id(&self, movie_id: i64) -> AppResult<Option<Movie>> {
        let row = sqlx::query_as::<_, MovieRow>(&format!(
            "SELECT {MOVIE_COLUMNS} FROM movies m WHERE m.id = $1"
        ))
        .bind(movie_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Movie::from))
    }

    async fn get_all(&self, page: u32, per_page: u32) -> AppResult<(Vec<Movie>, u64)> {
        let (limit, offset) = limit_offset(page, per_page);

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM movies")
            .fetch_one(&self.pool)
            .await?;

        let rows = sqlx::query_as::<_, MovieRow>(&format!(
            "SELECT {MOVIE_COLUMNS} FROM movies m ORDER BY m.created_at DESC, m.id ASC LIMIT $1 OFFSET $2"
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok((rows.into_iter().map(Movie::from).collect(), total as u64))
    }

    async fn get_popular(&self, page: u32, per_page: u32) -> AppResult<(Vec<Movie>, u64)> {
        let (limit, offset) = limit_offset(page, per_page);

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM movies")
            .fetch_one(&self.pool)
            .await?;

        let rows = sqlx::query_as::<_, MovieRow>(&format!(
            r#"
            SELECT {MOVIE_COLUMNS}
            FROM movies m
            LEFT JOIN likes l ON l.movie_id = m.id
            GROUP BY m.id
            ORDER BY COUNT(l.id) DESC, m.vote_average DESC, m.id ASC
            LIMIT $1 OFFSET $2
            "#
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok((rows.into_iter().map(Movie::from).collect(), total as u64))
    }
}

#[async_trait]
impl LikeRepository for PgStore {
    async fn get_by_user(
        &self,
        user_id: i64,
        page: u32,
        per_page: u32,
    ) -> AppResult<(Vec<Like>, u64)> {
        let (limit, offset) = limit_offset(page, per_page);

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM likes WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;

        let rows = sqlx::query_as::<_, LikeRow>(
            r#"
            SELECT id, user_id, movie_id, created_at
            FROM likes
            WHERE user_id = $1
            ORDER BY created_at DESC, id DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok((rows.into_iter().map(Like::from).collect(), total as u64))
    }

    async fn get_by_user_and_movie(&self, user_id: i64, movie_id: i64) -> AppResult<Option<Like>> {
        let row = sqlx::query_as::<_, LikeRow>(
            "SELECT id, user_id, movie_id, created_at FROM likes WHERE user_id = $1 AND movie_id = $2",
        )
        .bind(user_id)
        .bind(movie_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Like::from))
    }

    async fn get_all_edges(&self) -> AppResult<Vec<(i64, i64)>> {
        let edges = sqlx::query_as::<_, (i64, i64)>("SELECT user_id, movie_id FROM likes")
            .fetch_all(&self.pool)
            .await?;

        Ok(edges)
    }
}

#[async_trait]
impl UserRepository for PgStore {
    async fn get_by_id(&self, user_id: i64) -> AppResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, email, username, is_active, created_at FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(User::from))
    }
}

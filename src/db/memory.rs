use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{
    db::{LikeRepository, MovieRepository, UserRepository},
    error::AppResult,
    models::{Like, Movie, User},
};

/// In-process store with the same read semantics as the Postgres store
#[derive(Clone, Default)]
pub struct InMemoryStore {
    inner: Arc<RwLock<InMemoryStoreInner>>,
}

#[derive(Default)]
struct InMemoryStoreInner {
    movies: BTreeMap<i64, Movie>,
    users: BTreeMap<i64, User>,
    /// Keyed by (user_id, movie_id), enforcing one like per pair
    likes: BTreeMap<(i64, i64), Like>,
    next_like_id: i64,
}

fn page_window<T: Clone>(items: &[T], page: u32, per_page: u32) -> Vec<T> {
    let start = (page.max(1) as usize - 1).saturating_mul(per_page as usize);
    items
        .iter()
        .skip(start)
        .take(per_page as usize)
        .cloned()
        .collect()
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_movie(&self, movie: Movie) {
        let mut inner = self.inner.write().await;
        inner.movies.insert(movie.id, movie);
    }

    /// Removes a movie and every like pointing at it
    pub async fn remove_movie(&self, movie_id: i64) -> bool {
        let mut inner = self.inner.write().await;
        inner.likes.retain(|(_, liked), _| *liked != movie_id);
        inner.movies.remove(&movie_id).is_some()
    }

    pub async fn insert_user(&self, user: User) {
        let mut inner = self.inner.write().await;
        inner.users.insert(user.id, user);
    }

    /// Records a like. Returns `false` if the pair was already liked.
    pub async fn add_like(&self, user_id: i64, movie_id: i64) -> bool {
        let mut inner = self.inner.write().await;
        if inner.likes.contains_key(&(user_id, movie_id)) {
            return false;
        }
        inner.next_like_id += 1;
        let like = Like::new(inner.next_like_id, user_id, movie_id);
        inner.likes.insert((user_id, movie_id), like);
        true
    }
}

#[async_trait]
impl MovieRepository for InMemoryStore {
    async fn get_by_id(&self, movie_id: i64) -> AppResult<Option<Movie>> {
        let inner = self.inner.read().await;
        Ok(inner.movies.get(&movie_id).cloned())
    }

    async fn get_all(&self, page: u32, per_page: u32) -> AppResult<(Vec<Movie>, u64)> {
        let inner = self.inner.read().await;
        let movies: Vec<Movie> = inner.movies.values().cloned().collect();
        Ok((page_window(&movies, page, per_page), movies.len() as u64))
    }

    async fn get_popular(&self, page: u32, per_page: u32) -> AppResult<(Vec<Movie>, u64)> {
        let inner = self.inner.read().await;

        let mut like_counts: HashMap<i64, usize> = HashMap::new();
        for (_, movie_id) in inner.likes.keys() {
            *like_counts.entry(*movie_id).or_insert(0) += 1;
        }

        let mut movies: Vec<&Movie> = inner.movies.values().collect();
        movies.sort_by(|a, b| {
            let a_likes = like_counts.get(&a.id).copied().unwrap_or(0);
            let b_likes = like_counts.get(&b.id).copied().unwrap_or(0);
            b_likes
                .cmp(&a_likes)
                .then_with(|| b.vote_average.total_cmp(&a.vote_average))
                .then_with(|| a.id.cmp(&b.id))
        });

        let movies: Vec<Movie> = movies.into_iter().cloned().collect();
        Ok((page_window(&movies, page, per_page), movies.len() as u64))
    }
}

#[async_trait]
impl LikeRepository for InMemoryStore {
    async fn get_by_user(
        &self,
        user_id: i64,
        page: u32,
        per_page: u32,
    ) -> AppResult<(Vec<Like>, u64)> {
        let inner = self.inner.read().await;
        let mut likes: Vec<Like> = inner
            .likes
            .values()
            .filter(|like| like.user_id == user_id)
            .cloned()
            .collect();
        likes.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));

        Ok((page_window(&likes, page, per_page), likes.len() as u64))
    }

    async fn get_by_user_and_movie(&self, user_id: i64, movie_id: i64) -> AppResult<Option<Like>> {
        let inner = self.inner.read().await;
        Ok(inner.likes.get(&(user_id, movie_id)).cloned())
    }

    async fn get_all_edges(&self) -> AppResult<Vec<(i64, i64)>> {
        let inner = self.inner.read().await;
        Ok(inner.likes.values().map(Like::edge).collect())
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn get_by_id(&self, user_id: i64) -> AppResult<Option<User>> {
        let inner = self.inner.read().await;
        Ok(inner.users.get(&user_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(id: i64, vote_average: f64) -> Movie {
        Movie::new(id, format!("Movie {}", id), vec![]).with_vote_average(vote_average)
    }

    #[tokio::test]
    async fn test_add_like_is_unique_per_pair() {
        let store = InMemoryStore::new();
        assert!(store.add_like(1, 10).await);
        assert!(!store.add_like(1, 10).await);

        let edges = store.get_all_edges().await.unwrap();
        assert_eq!(edges, vec![(1, 10)]);
        assert!(store.get_by_user_and_movie(1, 10).await.unwrap().is_some());
        assert!(store.get_by_user_and_movie(1, 20).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_get_popular_orders_by_likes_then_votes() {
        let store = InMemoryStore::new();
        store.insert_movie(movie(1, 9.0)).await;
        store.insert_movie(movie(2, 5.0)).await;
        store.insert_movie(movie(3, 7.0)).await;

        store.add_like(1, 2).await;
        store.add_like(2, 2).await;
        store.add_like(1, 3).await;

        let (movies, total) = store.get_popular(1, 10).await.unwrap();
        let ids: Vec<i64> = movies.iter().map(|m| m.id).collect();
        assert_eq!(total, 3);
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[tokio::test]
    async fn test_get_popular_ties_broken_by_vote_average() {
        let store = InMemoryStore::new();
        store.insert_movie(movie(1, 6.0)).await;
        store.insert_movie(movie(2, 8.0)).await;

        let (movies, _) = store.get_popular(1, 10).await.unwrap();
        assert_eq!(movies[0].id, 2);
    }

    #[tokio::test]
    async fn test_get_all_paginates() {
        let store = InMemoryStore::new();
        for id in 1..=5 {
            store.insert_movie(movie(id, 0.0)).await;
        }

        let (page, total) = store.get_all(2, 2).await.unwrap();
        assert_eq!(total, 5);
        assert_eq!(page.iter().map(|m| m.id).collect::<Vec<_>>(), vec![3, 4]);
    }

    #[tokio::test]
    async fn test_get_by_user() {
        let store = InMemoryStore::new();
        store.add_like(1, 10).await;
        store.add_like(1, 20).await;
        store.add_like(2, 10).await;

        let (likes, total) = store.get_by_user(1, 1, 1000).await.unwrap();
        assert_eq!(total, 2);
        assert!(likes.iter().all(|like| like.user_id == 1));
    }

    #[tokio::test]
    async fn test_remove_movie_drops_its_likes() {
        let store = InMemoryStore::new();
        store.insert_movie(movie(1, 0.0)).await;
        store.add_like(7, 1).await;

        assert!(store.remove_movie(1).await);
        assert!(store.get_all_edges().await.unwrap().is_empty());
        assert!(MovieRepository::get_by_id(&store, 1).await.unwrap().is_none());
    }
}

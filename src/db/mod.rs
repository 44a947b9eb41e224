pub mod memory;
pub mod postgres;
mod repositories;

pub use memory::InMemoryStore;
pub use postgres::{create_pool, run_migrations, PgStore};
pub use repositories::{LikeRepository, MovieRepository, UserRepository};

#[cfg(test)]
pub use repositories::{MockLikeRepository, MockMovieRepository, MockUserRepository};

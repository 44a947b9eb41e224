mod like;
mod movie;
mod pagination;
mod recommendation;
mod user;

pub use like::Like;
pub use movie::{Movie, MovieResponse};
pub use pagination::{Pagination, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
pub use recommendation::{
    AlgorithmInfo, RecommendationAlgorithm, RecommendationPage, RecommendationResult,
};
pub use user::User;

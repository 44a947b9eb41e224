pub mod features;
pub mod interactions;
pub mod recommendations;
pub mod registry;
pub mod similarity;
pub mod strategies;

pub use recommendations::RecommendationService;
pub use registry::StrategyRegistry;

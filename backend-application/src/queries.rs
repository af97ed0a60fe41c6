pub mod metrics_queries;
pub mod player_queries;

pub use metrics_queries::*;
pub use player_queries::*;

pub mod activity_handlers;
pub mod campaign_handlers;
pub mod ops_handlers;
pub mod query_handlers;

pub use activity_handlers::*;
pub use campaign_handlers::*;
pub use ops_handlers::*;
pub use query_handlers::*;

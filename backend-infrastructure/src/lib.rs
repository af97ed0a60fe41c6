pub mod cache;
pub mod config;
pub mod repositories;
pub mod services;

pub use cache::*;
pub use config::*;
pub use repositories::*;
pub use services::*;

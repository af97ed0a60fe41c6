// Repository, cache and channel port traits (interfaces)
// Define what the domain needs from infrastructure

pub mod cache;
pub mod channels;
pub mod repositories;

pub use cache::*;
pub use channels::*;
pub use repositories::*;

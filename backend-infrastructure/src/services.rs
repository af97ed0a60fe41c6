pub mod channel_service;
pub mod sweep_service;

pub use channel_service::*;
pub use sweep_service::*;

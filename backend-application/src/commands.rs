pub mod activity_commands;
pub mod campaign_commands;
pub mod dispatch_commands;

pub use activity_commands::*;
pub use campaign_commands::*;
pub use dispatch_commands::*;

pub mod scorer;
pub mod selector;
pub mod template;

pub use scorer::*;
pub use selector::*;
pub use template::*;

pub mod campaign_files;
pub mod clickhouse_store;

pub use campaign_files::*;
pub use clickhouse_store::*;

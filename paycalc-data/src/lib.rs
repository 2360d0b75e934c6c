pub mod loader;
pub mod tables;

pub use loader::{BracketLoader, BracketLoaderError, BracketRecord};
pub use tables::{SUPPORTED_YEARS, builtin_table, builtin_tables};

//! CLI command handlers, one per file.

mod db_build;
mod get;

pub use db_build::run_db_build;
pub use get::run_get;

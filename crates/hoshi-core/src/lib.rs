pub mod config;
pub mod logging;

pub mod api;
pub mod cache;
pub mod models;
pub mod net;
pub mod pool;
pub mod traits;

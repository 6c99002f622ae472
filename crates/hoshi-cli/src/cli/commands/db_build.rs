//! `hoshi db-build` – provision the bot database tables.

use anyhow::Result;
use hoshi_core::config::HoshiConfig;
use hoshi_core::pool::Pool;

pub async fn run_db_build(cfg: &HoshiConfig) -> Result<()> {
    let db = match &cfg.database_path {
        Some(path) => Pool::open_at(path).await?,
        None => Pool::open_default().await?,
    };
    db.build_tables().await?;
    println!("Tables built.");
    Ok(())
}

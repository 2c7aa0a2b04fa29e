//! Food AI server binary.
//!
//! Loads every model artifact, then serves the prediction endpoints until
//! SIGTERM or Ctrl+C. A missing artifact aborts startup.

use foodai::server::ServerConfig;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = ServerConfig::load()?;

    foodai::server::start_server(config).await?;

    Ok(())
}

//! Service entry-point: configuration, tracing, and server startup.

use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use geonote::server::{ServerSettings, run};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ServerSettings::from_env().map_err(std::io::Error::other)?;
    run(settings).await
}

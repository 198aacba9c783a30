//! HTTP server assembly: state construction, routing, and startup.

use std::sync::Arc;

use actix_web::{App, HttpServer, web};
use tracing::{info, warn};
#[cfg(debug_assertions)]
use utoipa::OpenApi;

use crate::domain::ports::{FixtureTokenVerifier, MessageStore, TokenVerifier};
use crate::domain::{MessageService, NearbyPolicy};
#[cfg(debug_assertions)]
use crate::doc::ApiDoc;
use crate::inbound::http::error::json_error_handler;
use crate::inbound::http::health::{HealthState, live, ready};
use crate::inbound::http::messages::{delete_message, nearby_messages, post_message};
use crate::inbound::http::state::HttpState;
use crate::outbound::memory::MemoryScanStore;
use crate::outbound::persistence::{DbPool, DieselMessageStore, DieselScanStore, PoolConfig};

pub mod config;

pub use config::{ConfigError, ServerSettings, StoreBackend};

/// Wire a message service over the given store into an HTTP state bundle.
///
/// The same service instance serves both the command and the query port.
pub fn build_http_state<S>(
    store: Arc<S>,
    policy: NearbyPolicy,
    verifier: Arc<dyn TokenVerifier>,
) -> HttpState
where
    S: MessageStore + 'static,
{
    let service = Arc::new(MessageService::with_policy(store, policy));
    HttpState::new(service.clone(), service, verifier)
}

/// Select the token verifier for this process.
///
/// Token issuance is out of scope for this service; deployments front it
/// with an identity layer and swap in a real verifier. The bundled fixture
/// verifier accepts one well-known token, so release builds refuse to start
/// unless the operator opts in explicitly.
fn fixture_verifier(opt_in: bool, debug_build: bool) -> std::io::Result<Arc<dyn TokenVerifier>> {
    if !opt_in && !debug_build {
        return Err(std::io::Error::other(
            "no token verifier configured; set GEONOTE_ALLOW_FIXTURE_AUTH=1 \
             to accept the shared fixture token (development only)",
        ));
    }
    warn!("using the fixture token verifier; do not expose this instance publicly");
    Ok(Arc::new(FixtureTokenVerifier::with_default_user()))
}

async fn connect_pool(database_url: &str) -> std::io::Result<DbPool> {
    DbPool::new(PoolConfig::new(database_url))
        .await
        .map_err(std::io::Error::other)
}

async fn state_for(settings: &ServerSettings) -> std::io::Result<HttpState> {
    let policy = NearbyPolicy {
        radius_meters: settings.radius_meters,
        max_age: settings.retention,
    };

    let verifier = fixture_verifier(settings.allow_fixture_auth, cfg!(debug_assertions))?;

    match &settings.backend {
        StoreBackend::Memory => {
            info!("starting with the in-memory store");
            let store = Arc::new(MemoryScanStore::with_retention(settings.retention));
            Ok(build_http_state(store, policy, verifier))
        }
        StoreBackend::Scan { database_url } => {
            info!("starting with the postgres scan backend");
            let pool = connect_pool(database_url).await?;
            let store = Arc::new(DieselScanStore::with_retention(pool, settings.retention));
            Ok(build_http_state(store, policy, verifier))
        }
        StoreBackend::Postgres { database_url } => {
            info!("starting with the postgres indexed backend");
            let pool = connect_pool(database_url).await?;
            let store = Arc::new(DieselMessageStore::new(pool));
            Ok(build_http_state(store, policy, verifier))
        }
    }
}

#[cfg(debug_assertions)]
async fn openapi_json() -> web::Json<utoipa::openapi::OpenApi> {
    web::Json(ApiDoc::openapi())
}

/// Run the HTTP server until shutdown.
///
/// # Errors
/// Returns an error when the store cannot be initialised or the listener
/// fails to bind.
pub async fn run(settings: ServerSettings) -> std::io::Result<()> {
    let state = web::Data::new(state_for(&settings).await?);
    let health_state = web::Data::new(HealthState::new());
    let server_health_state = health_state.clone();

    let server = HttpServer::new(move || {
        let api = web::scope("/api/v1")
            .service(post_message)
            .service(nearby_messages)
            .service(delete_message);

        #[allow(unused_mut)]
        let mut app = App::new()
            .app_data(state.clone())
            .app_data(server_health_state.clone())
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .service(api)
            .service(ready)
            .service(live);

        #[cfg(debug_assertions)]
        {
            app = app.route("/api-docs/openapi.json", web::get().to(openapi_json));
        }

        app
    })
    .bind(settings.bind_addr)?;

    health_state.mark_ready();
    info!(addr = %settings.bind_addr, "listening");
    server.run().await
}

mod core;
mod features;
mod modules;
mod shared;

use crate::core::config::Config;
use crate::core::openapi::ApiDoc;
use crate::core::{database, middleware};
use crate::features::analytics::{routes as analytics_routes, AnalyticsService};
use crate::features::auth::routes as auth_routes;
use crate::features::auth::{AuthService, InMemoryTokenStore, TokenStore};
use crate::features::departments::{routes as departments_routes, DepartmentService};
use crate::features::incidents::handlers::IncidentsState;
use crate::features::incidents::providers::{
    DescriptionProvider, DescriptionProviderChain, GeminiProvider, GeocodeProviderChain,
    GoogleGeocoder, LocationProvider, NominatimGeocoder,
};
use crate::features::incidents::routes as incidents_routes;
use crate::features::incidents::services::{EnrichmentService, IncidentService};
use crate::modules::storage::LocalUploadStore;
use axum::extract::DefaultBodyLimit;
use axum::Router;
use std::sync::Arc;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::services::ServeDir;
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;

fn main() -> anyhow::Result<()> {
    // Build Tokio runtime with configurable worker threads
    let worker_threads = std::env::var("TOKIO_WORKER_THREADS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|p| p.get())
                .unwrap_or(4)
        });

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(worker_threads)
        .max_blocking_threads(worker_threads * 4)
        .enable_all()
        .build()?;

    runtime.block_on(async_main(worker_threads))
}

async fn async_main(worker_threads: usize) -> anyhow::Result<()> {
    // Load .env file BEFORE initializing logger so RUST_LOG is available
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;

    tracing::info!(
        "System info: tokio_worker_threads={}, pid={}",
        worker_threads,
        std::process::id()
    );

    // Create database connection pool and run migrations
    let pool = database::create_pool(&config.database).await?;
    tracing::info!("Database connection pool created");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .map_err(|e| anyhow::anyhow!("Migration failed: {}", e))?;
    tracing::info!("Database migrations completed");

    // Opaque bearer tokens live in process memory; a restart logs everyone out
    let token_store: Arc<dyn TokenStore> = Arc::new(InMemoryTokenStore::new());
    let auth_service = Arc::new(AuthService::new(
        pool.clone(),
        Arc::clone(&token_store),
        config.auth.admin_security_key.clone(),
    ));
    tracing::info!("Auth service initialized");

    // Local disk storage for report photos
    let upload_store = Arc::new(LocalUploadStore::new(&config.upload.dir));
    upload_store.init().await.map_err(|e| anyhow::anyhow!(e))?;
    tracing::info!("Upload store initialized at {}", config.upload.dir);

    // Build provider chains. A provider without an API key is left out of
    // its chain; Nominatim needs no key and always participates. Nominatim's
    // usage policy requires an identifying user agent, so the shared client
    // carries one.
    let http_client = reqwest::Client::builder()
        .user_agent("IncidentCore/1.0 (incident-enrichment-pipeline)")
        .timeout(config.providers.timeout)
        .build()?;

    let mut location_providers: Vec<Arc<dyn LocationProvider>> = Vec::new();
    let mut description_providers: Vec<Arc<dyn DescriptionProvider>> = Vec::new();

    if let Some(key) = config.providers.gemini_api_key.clone() {
        let gemini = Arc::new(GeminiProvider::new(
            http_client.clone(),
            key,
            config.providers.gemini_base_url.clone(),
        ));
        location_providers.push(gemini.clone());
        description_providers.push(gemini);
        tracing::info!("Gemini provider enabled");
    }
    if let Some(key) = config.providers.google_maps_api_key.clone() {
        location_providers.push(Arc::new(GoogleGeocoder::new(
            http_client.clone(),
            key,
            config.providers.google_geocode_base_url.clone(),
        )));
        tracing::info!("Google geocoding provider enabled");
    }
    location_providers.push(Arc::new(NominatimGeocoder::new(
        http_client.clone(),
        config.providers.nominatim_base_url.clone(),
    )));

    let geocoder = Arc::new(GeocodeProviderChain::new(
        location_providers,
        config.providers.timeout,
    ));
    let describer = Arc::new(DescriptionProviderChain::new(
        description_providers,
        config.providers.timeout,
    ));
    tracing::info!("Provider chains initialized");

    // Domain services
    let incident_service = Arc::new(IncidentService::new(pool.clone()));
    let enrichment_service = Arc::new(EnrichmentService::new(
        Arc::clone(&incident_service),
        Arc::clone(&geocoder),
        describer,
        Arc::clone(&upload_store),
    ));
    let department_service = Arc::new(DepartmentService::new(pool.clone()));
    let analytics_service = Arc::new(AnalyticsService::new(pool.clone()));
    tracing::info!("Domain services initialized");

    let incidents_state = IncidentsState {
        enrichment: enrichment_service,
        incidents: incident_service,
        geocoder,
    };

    // Protected routes (require a valid bearer token)
    let protected_routes = Router::new()
        .merge(auth_routes::protected_routes(Arc::clone(&auth_service)))
        .merge(incidents_routes::protected_routes(incidents_state.clone()))
        .merge(analytics_routes::routes(analytics_service))
        .route_layer(axum::middleware::from_fn_with_state(
            Arc::clone(&token_store),
            middleware::auth_middleware,
        ));

    async fn health_check() -> axum::http::StatusCode {
        axum::http::StatusCode::OK
    }
    let health_route = Router::new().route("/health", axum::routing::get(health_check));

    async fn openapi_json() -> axum::Json<utoipa::openapi::OpenApi> {
        axum::Json(ApiDoc::openapi())
    }
    let docs_route =
        Router::new().route("/api-docs/openapi.json", axum::routing::get(openapi_json));

    // Public routes (no auth required)
    let public_routes = Router::new()
        .merge(auth_routes::public_routes(auth_service))
        .merge(incidents_routes::public_routes(incidents_state))
        .merge(departments_routes::routes(department_service));

    let app = Router::new()
        .merge(protected_routes)
        .merge(public_routes)
        .merge(health_route)
        .merge(docs_route)
        .nest_service("/uploads", ServeDir::new(upload_store.dir()))
        .layer(DefaultBodyLimit::max(config.upload.max_bytes))
        .layer(middleware::cors_layer(
            config.app.cors_allowed_origins.clone(),
        ))
        // Propagate X-Request-Id to response headers
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(middleware::MakeSpanWithRequestId)
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Generate X-Request-Id using UUID v7 (or use client-provided one)
        .layer(SetRequestIdLayer::x_request_id(middleware::MakeRequestUuid));

    // Start server
    let addr = config.app.server_address();
    let socket_addr: std::net::SocketAddr = addr
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid address: {}", e))?;

    // Use socket2 for TCP listener configuration
    let socket = socket2::Socket::new(
        socket2::Domain::for_address(socket_addr),
        socket2::Type::STREAM,
        Some(socket2::Protocol::TCP),
    )?;

    socket.set_reuse_address(true)?;
    #[cfg(unix)]
    socket.set_reuse_port(true)?;
    socket.set_nodelay(true)?;

    socket.set_recv_buffer_size(256 * 1024)?;
    socket.set_send_buffer_size(256 * 1024)?;

    #[cfg(target_os = "linux")]
    {
        let keepalive = socket2::TcpKeepalive::new()
            .with_time(std::time::Duration::from_secs(60))
            .with_interval(std::time::Duration::from_secs(10))
            .with_retries(3);
        socket.set_tcp_keepalive(&keepalive)?;
    }
    #[cfg(not(target_os = "linux"))]
    {
        let keepalive = socket2::TcpKeepalive::new().with_time(std::time::Duration::from_secs(60));
        socket.set_tcp_keepalive(&keepalive)?;
    }

    socket.set_nonblocking(true)?;
    socket.bind(&socket_addr.into())?;
    socket.listen(65535)?;

    let listener = tokio::net::TcpListener::from_std(socket.into())?;
    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

use actix_cors::Cors;
use actix_web::{web, App, HttpResponse, HttpServer};
use prometheus::{Encoder, TextEncoder};
use redis::aio::ConnectionManager;
use std::io;
use std::sync::Arc;
use streamers_service::cache::StreamCache;
use streamers_service::handlers::{self, StreamersHandlerState};
use streamers_service::render::TemplateRenderer;
use streamers_service::services::{StreamAggregator, StreamersService};
use streamers_service::twitch::TwitchClient;
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

struct HealthState {
    redis: ConnectionManager,
}

async fn health_summary(state: web::Data<HealthState>) -> HttpResponse {
    let mut conn = state.redis.clone();
    let ping: Result<String, redis::RedisError> =
        redis::cmd("PING").query_async(&mut conn).await;

    match ping {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({
            "status": "ok",
            "service": "streamers-service",
            "version": env!("CARGO_PKG_VERSION")
        })),
        Err(e) => HttpResponse::ServiceUnavailable().json(serde_json::json!({
            "status": "unhealthy",
            "error": format!("Redis ping failed: {}", e),
            "service": "streamers-service"
        })),
    }
}

async fn metrics_summary() -> HttpResponse {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();

    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!("Metrics encoding failed: {}", e);
        return HttpResponse::InternalServerError().finish();
    }

    HttpResponse::Ok()
        .content_type(encoder.format_type())
        .body(buffer)
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = match streamers_service::Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("Configuration loading failed: {}", e);
            eprintln!("ERROR: Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!("Starting streamers-service v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Environment: {}", config.app.env);

    // Pre-load the streamers template; a missing template is a startup
    // error, not a per-request 500.
    let renderer = match TemplateRenderer::from_file(&config.template.path) {
        Ok(renderer) => Arc::new(renderer),
        Err(e) => {
            tracing::error!("{}", e);
            return Err(io::Error::new(io::ErrorKind::Other, e.to_string()));
        }
    };

    // Connect Redis
    let redis_client = redis::Client::open(config.cache.url.clone())
        .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("Invalid REDIS_URL: {}", e)))?;
    let redis_manager = ConnectionManager::new(redis_client).await.map_err(|e| {
        io::Error::new(
            io::ErrorKind::Other,
            format!("Redis connection failed: {}", e),
        )
    })?;
    tracing::info!("Redis connection established");

    // Wire the pipeline
    let api = Arc::new(TwitchClient::new(config.twitch.api_base.clone()));
    let aggregator = StreamAggregator::new(api, config.twitch.client_id.clone());
    let cache = Arc::new(StreamCache::new(
        redis_manager.clone(),
        config.cache.ttl_secs,
    ));
    let streamers = Arc::new(StreamersService::new(
        aggregator,
        cache,
        config.twitch.client_id.clone(),
    ));

    let handler_state = web::Data::new(StreamersHandlerState {
        streamers,
        renderer,
    });
    let health_state = web::Data::new(HealthState {
        redis: redis_manager,
    });

    let bind_address = format!("{}:{}", config.app.host, config.app.port);
    tracing::info!("Listening on {}", bind_address);

    HttpServer::new(move || {
        // Public read-only data, served to extension frontends on arbitrary
        // origins.
        let cors = Cors::permissive();

        App::new()
            .wrap(TracingLogger::default())
            .wrap(cors)
            .app_data(handler_state.clone())
            .app_data(health_state.clone())
            .route("/health", web::get().to(health_summary))
            .route("/metrics", web::get().to(metrics_summary))
            .route("/streamers", web::get().to(handlers::get_streamers))
            .route("/streamers.json", web::get().to(handlers::get_streamers))
    })
    .bind(&bind_address)?
    .run()
    .await
}

// File: services/bookline_backend/src/main.rs
mod service_factory;

use axum::{routing::get, Router};
use bookline_booking::handlers::BookingState;
use bookline_booking::routes as booking_routes;
use bookline_common::logging;
use bookline_common::services::ServiceFactory;
use bookline_config::load_config;
use http::header::CONTENT_TYPE;
use http::{HeaderValue, Method};
use service_factory::BooklineServiceFactory;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

#[tokio::main]
async fn main() {
    let config = Arc::new(load_config().expect("Failed to load config"));
    logging::init();

    let factory = BooklineServiceFactory::new(config.clone())
        .await
        .expect("Failed to initialize services");

    let repository = factory
        .booking_repository()
        .expect("Booking repository is required");
    let notifier = factory.notification_service();

    let booking_state = Arc::new(BookingState {
        config: config.clone(),
        repository,
        notifier,
    });

    let api_router = Router::new()
        .route("/", get(|| async { "Welcome to the Bookline API!" }))
        .merge(booking_routes::routes(booking_state));

    let mut app = Router::new()
        .nest("/api", api_router)
        .layer(TraceLayer::new_for_http());

    // Only whitelisted browser origins may call the API
    if let Some(cors_config) = config.cors.as_ref() {
        let origins: Vec<HeaderValue> = cors_config
            .allowed_origins
            .iter()
            .filter_map(|origin| {
                origin
                    .parse::<HeaderValue>()
                    .map_err(|_| warn!("Ignoring invalid CORS origin: {}", origin))
                    .ok()
            })
            .collect();

        let cors = CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers([CONTENT_TYPE])
            .allow_credentials(true);
        app = app.layer(cors);
    }

    // Bind and serve
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await.unwrap();
    println!("Starting server at http://{}", addr);
    println!("API endpoints available at http://{}/api", addr);

    axum::serve(listener, app.into_make_service())
        .await
        .unwrap();
}

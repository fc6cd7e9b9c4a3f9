//! API Router with Swagger UI

use std::sync::Arc;
use std::time::Instant;

use axum::{middleware, routing::get, Router};
use metrics_exporter_prometheus::PrometheusHandle;
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::application::ReservationService;
use crate::domain::reservation::ReservationStore;

use super::common::ErrorResponse;
use super::modules::health::{self, HealthState};
use super::modules::metrics::{http_metrics_middleware, prometheus_metrics, MetricsState};
use super::modules::request_id::request_id_middleware;
use super::modules::reservations::{self, reservation_routes, ReservationAppState};

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        reservations::search_reservations,
        reservations::get_reservation,
        reservations::create_reservation,
        reservations::update_reservation,
        reservations::cancel_reservation,
        reservations::approve_reservation,
        reservations::check_availability,
    ),
    components(
        schemas(
            ErrorResponse,
            health::HealthResponse,
            health::ComponentHealth,
            reservations::ReservationRequest,
            reservations::ReservationDto,
            reservations::AvailabilityResponse,
        )
    ),
    tags(
        (name = "Health", description = "Server health check endpoints"),
        (name = "Reservations", description = "Room reservation lifecycle: create, update, cancel, approve, search"),
    ),
    info(
        title = "Room Reservations API",
        version = "1.0.0",
        description = "REST API for booking rooms and approving reservations",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Create the API router with all routes
pub fn create_api_router(
    service: Arc<ReservationService<dyn ReservationStore>>,
    db: DatabaseConnection,
    prometheus_handle: PrometheusHandle,
) -> Router {
    let health_state = HealthState {
        db,
        started_at: Arc::new(Instant::now()),
    };
    let metrics_state = MetricsState {
        handle: prometheus_handle,
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let swagger_routes = SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi());

    let health_routes = Router::new()
        .route("/health", get(health::health_check))
        .with_state(health_state);

    let metrics_routes = Router::new()
        .route("/metrics", get(prometheus_metrics))
        .with_state(metrics_state);

    Router::new()
        .merge(swagger_routes)
        .merge(health_routes)
        .merge(metrics_routes)
        .merge(reservation_routes(ReservationAppState { service }))
        .layer(middleware::from_fn(http_metrics_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

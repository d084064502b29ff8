//! API router with Swagger UI

use std::sync::Arc;
use std::time::Instant;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::application::AvailabilityService;
use crate::shared::retry::RetryConfig;

use super::common::ApiResponse;
use super::modules::availability::{self, AvailabilityAppState};
use super::modules::health::{self, HealthState};
use super::modules::metrics::{http_metrics_middleware, prometheus_metrics, MetricsState};
use super::modules::request_id::request_id_middleware;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        availability::block_dates,
        availability::unblock_dates,
        availability::list_blocked_ranges,
    ),
    components(
        schemas(
            ApiResponse<String>,
            health::HealthResponse,
            health::DatabaseHealth,
            availability::DateRangeRequest,
            availability::BlockedRangeDto,
            availability::ReconcileResponse,
        )
    ),
    tags(
        (name = "Health", description = "Service and database health"),
        (name = "Availability", description = "Room date-range blocking and release"),
    ),
    info(
        title = "Room Availability API",
        version = "1.0.0",
        description = "Blocked date ranges of rooms, kept disjoint per room",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Availability routes with their state applied, without global layers.
pub fn availability_routes(state: AvailabilityAppState) -> Router {
    Router::new()
        .route(
            "/api/v1/rooms/{room_id}/availability/block",
            post(availability::block_dates),
        )
        .route(
            "/api/v1/rooms/{room_id}/availability/unblock",
            post(availability::unblock_dates),
        )
        .route(
            "/api/v1/rooms/{room_id}/availability/blocked",
            get(availability::list_blocked_ranges),
        )
        .with_state(state)
}

/// Create the API router with all routes
///
/// `/metrics` is only mounted when a Prometheus handle is supplied.
pub fn create_api_router(
    service: Arc<AvailabilityService>,
    db: DatabaseConnection,
    retry: RetryConfig,
    prometheus: Option<PrometheusHandle>,
) -> Router {
    let health_routes = Router::new()
        .route("/health", get(health::health_check))
        .with_state(HealthState {
            db,
            started_at: Arc::new(Instant::now()),
        });

    let mut router = Router::new()
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(health_routes)
        .merge(availability_routes(AvailabilityAppState { service, retry }));

    if let Some(handle) = prometheus {
        router = router.merge(
            Router::new()
                .route("/metrics", get(prometheus_metrics))
                .with_state(MetricsState { handle }),
        );
    }

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    router
        .layer(middleware::from_fn(http_metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(request_id_middleware))
        .layer(cors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use sea_orm::Database;
    use tower::ServiceExt;

    use crate::application::SyncMode;
    use crate::infrastructure::memory::InMemoryRepositoryProvider;
    use crate::infrastructure::sync::NoopInventorySync;

    async fn router() -> Router {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        let service = Arc::new(AvailabilityService::new(
            Arc::new(InMemoryRepositoryProvider::new()),
            Arc::new(NoopInventorySync),
            SyncMode::BestEffort,
        ));
        create_api_router(service, db, RetryConfig::default(), None)
    }

    #[tokio::test]
    async fn health_and_openapi_are_served() {
        let app = router().await;

        let resp = app
            .clone()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(resp.headers().contains_key("x-request-id"));

        let resp = app
            .oneshot(
                Request::builder()
                    .uri("/api-docs/openapi.json")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let doc: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert!(doc["paths"]["/api/v1/rooms/{room_id}/availability/block"].is_object());
    }

    #[tokio::test]
    async fn metrics_route_absent_without_handle() {
        let resp = router()
            .await
            .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}

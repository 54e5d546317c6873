//! Application setup and server configuration.

use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    middleware,
    routing::{get, post},
    Router,
};
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::RateLimit;
use crate::domains::auth::{AdminGateway, JwtService};
use crate::domains::resources::{PublicReader, ResourceStore};
use crate::kernel::ServerDeps;
use crate::server::middleware::jwt_auth_middleware;
use crate::server::routes::{
    compact_resources, create_resource, delete_resource, health_handler, list_resources,
    move_resource, reorder_resources, update_resource,
};

/// Shared application state
#[derive(Clone)]
pub struct AxumAppState {
    pub store: ResourceStore,
    pub gateway: AdminGateway,
    pub public_reader: PublicReader,
    pub jwt_service: Arc<JwtService>,
}

impl AxumAppState {
    pub fn from_deps(deps: &ServerDeps) -> Self {
        Self {
            store: deps.store(),
            gateway: deps.admin_gateway(),
            public_reader: deps.public_reader(),
            jwt_service: deps.jwt_service.clone(),
        }
    }
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    let allow_origin = if origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
}

/// Build the Axum application router
pub fn build_app(
    deps: ServerDeps,
    allowed_origins: Vec<String>,
    rate_limit: Option<RateLimit>,
) -> Router {
    let app_state = AxumAppState::from_deps(&deps);

    // Clone jwt_service for middleware closure
    let jwt_service_for_middleware = app_state.jwt_service.clone();

    let mut router = Router::new()
        .route(
            "/resources",
            get(list_resources)
                .post(create_resource)
                .put(update_resource)
                .delete(delete_resource),
        )
        .route("/resources/move", post(move_resource))
        .route("/resources/reorder", post(reorder_resources))
        .route("/resources/compact", post(compact_resources));

    // Rate limit the resource routes only; /health stays unthrottled
    if let Some(limit) = rate_limit {
        let config = GovernorConfigBuilder::default()
            .per_second(limit.per_second)
            .burst_size(limit.burst_size)
            .use_headers()
            .finish();

        match config {
            Some(config) => {
                router = router.layer(GovernorLayer {
                    config: Arc::new(config),
                });
            }
            None => tracing::warn!(
                per_second = limit.per_second,
                burst_size = limit.burst_size,
                "Invalid rate limit configuration, rate limiting disabled"
            ),
        }
    }

    router
        .route("/health", get(health_handler))
        // Middleware layers (applied in reverse order - last added runs first)
        .layer(middleware::from_fn(move |req, next| {
            jwt_auth_middleware(jwt_service_for_middleware.clone(), req, next)
        }))
        .layer(Extension(app_state))
        .layer(cors_layer(&allowed_origins))
        .layer(TraceLayer::new_for_http())
}

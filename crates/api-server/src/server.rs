//! HTTP server wiring for the dashboard API.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::routing::get;
use axum::Router;
use pulse_core::config::AppConfig;
use pulse_outreach::TemplateCatalog;
use pulse_store::CustomerStore;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::rest::{self, AppState};
use crate::swagger::ApiDoc;

/// REST server for the customer dashboard.
pub struct ApiServer {
    config: AppConfig,
    store: Arc<dyn CustomerStore>,
    catalog: Arc<TemplateCatalog>,
}

impl ApiServer {
    pub fn new(
        config: AppConfig,
        store: Arc<dyn CustomerStore>,
        catalog: Arc<TemplateCatalog>,
    ) -> Self {
        Self {
            config,
            store,
            catalog,
        }
    }

    /// Build the router with all routes and middleware attached.
    pub fn router(&self) -> Router {
        let state = AppState {
            store: self.store.clone(),
            catalog: self.catalog.clone(),
            config: self.config.clone(),
            start_time: Instant::now(),
        };

        Router::new()
            // Dashboard endpoints
            .route("/v1/customers", get(rest::list_customers))
            .route("/v1/customers/inactive", get(rest::list_inactive_customers))
            .route("/v1/stats", get(rest::customer_stats))
            .route("/v1/outreach/:band", get(rest::outreach_preview))
            .route("/v1/templates", get(rest::list_templates))
            // Operational endpoints
            .route("/health", get(rest::health_check))
            .route("/ready", get(rest::readiness))
            .route("/live", get(rest::liveness))
            // API documentation
            .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
            // Middleware
            .layer(CompressionLayer::new())
            .layer(CorsLayer::permissive())
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }

    /// Start the HTTP server (blocks until shutdown).
    pub async fn start_http(&self) -> anyhow::Result<()> {
        let addr = SocketAddr::new(self.config.api.host.parse()?, self.config.api.http_port);

        info!(addr = %addr, "Starting HTTP server");

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, self.router()).await?;

        Ok(())
    }

    /// Start the metrics exporter on a separate port.
    pub async fn start_metrics(&self) -> anyhow::Result<()> {
        let builder = metrics_exporter_prometheus::PrometheusBuilder::new();
        builder
            .with_http_listener(SocketAddr::new(
                self.config.api.host.parse()?,
                self.config.metrics.port,
            ))
            .install()?;

        info!(port = self.config.metrics.port, "Metrics exporter started");
        Ok(())
    }
}

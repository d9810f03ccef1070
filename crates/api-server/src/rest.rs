//! REST API handlers for the customer dashboard.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use pulse_core::config::AppConfig;
use pulse_core::types::{ClassifiedCustomer, RecencyBand, RecencySnapshot};
use pulse_outreach::{render_for, MessageTemplate, RenderedMessage, TemplateCatalog};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};
use utoipa::{IntoParams, ToSchema};

use pulse_store::CustomerStore;

/// Shared application state for REST handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn CustomerStore>,
    pub catalog: Arc<TemplateCatalog>,
    pub config: AppConfig,
    pub start_time: Instant,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CustomerQuery {
    /// Case-insensitive substring matched against name and tax id.
    pub search: Option<String>,
    /// Band label ("0-30", ..., "365+") to filter on.
    pub band: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct InactiveQuery {
    /// Day count a customer must exceed to be listed. Defaults from config.
    pub threshold_days: Option<i64>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PreviewQuery {
    /// Maximum rendered messages to return. Defaults from config.
    pub limit: Option<usize>,
}

#[derive(Serialize, ToSchema)]
pub struct CustomerListResponse {
    /// Records in the store before filtering.
    pub total: u64,
    /// Records matching the search and band filters.
    pub matched: u64,
    pub customers: Vec<ClassifiedCustomer>,
}

#[derive(Serialize, ToSchema)]
pub struct InactiveListResponse {
    pub threshold_days: i64,
    pub matched: u64,
    pub customers: Vec<ClassifiedCustomer>,
}

#[derive(Serialize, ToSchema)]
pub struct OutreachPreviewResponse {
    pub band: RecencyBand,
    /// Customers currently classified into the band.
    pub total_in_band: u64,
    pub messages: Vec<RenderedMessage>,
}

#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub node_id: String,
    pub uptime_secs: u64,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn bad_request(error: &str, message: String) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: error.to_string(),
            message,
        }),
    )
}

fn store_failure(err: pulse_core::PulseError) -> ApiError {
    error!(error = %err, "customer store query failed");
    metrics::counter!("api.store_errors").increment(1);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: "store_unavailable".to_string(),
            message: "Failed to read customer records".to_string(),
        }),
    )
}

fn parse_band(label: &str) -> Result<RecencyBand, ApiError> {
    label.parse::<RecencyBand>().map_err(|err| {
        warn!(band = label, "rejected unknown band label");
        metrics::counter!("api.validation_errors").increment(1);
        bad_request("unknown_band", err.to_string())
    })
}

/// GET /v1/customers: classified customer table rows with combined
/// search and band filtering.
#[utoipa::path(
    get,
    path = "/v1/customers",
    tag = "Customers",
    params(CustomerQuery),
    responses(
        (status = 200, description = "Matching customers in stable order", body = CustomerListResponse),
        (status = 400, description = "Unknown band label", body = ErrorResponse),
    )
)]
pub async fn list_customers(
    State(state): State<AppState>,
    Query(query): Query<CustomerQuery>,
) -> Result<Json<CustomerListResponse>, ApiError> {
    metrics::counter!("api.customers.requests").increment(1);

    let band_filter = query.band.as_deref().map(parse_band).transpose()?;

    let records = state
        .store
        .list_recent_purchases()
        .map_err(store_failure)?;
    let total = records.len() as u64;

    let now = Utc::now();
    let matched = pulse_recency::search(&records, query.search.as_deref().unwrap_or(""));
    let customers: Vec<ClassifiedCustomer> = matched
        .iter()
        .map(|record| pulse_recency::classify(record, now))
        .filter(|classified| band_filter.map_or(true, |band| classified.band == Some(band)))
        .collect();

    Ok(Json(CustomerListResponse {
        total,
        matched: customers.len() as u64,
        customers,
    }))
}

/// GET /v1/customers/inactive: customers past the inactivity threshold,
/// most inactive first.
#[utoipa::path(
    get,
    path = "/v1/customers/inactive",
    tag = "Customers",
    params(InactiveQuery),
    responses(
        (status = 200, description = "Inactive customers sorted by day count descending", body = InactiveListResponse),
    )
)]
pub async fn list_inactive_customers(
    State(state): State<AppState>,
    Query(query): Query<InactiveQuery>,
) -> Result<Json<InactiveListResponse>, ApiError> {
    metrics::counter!("api.inactive.requests").increment(1);

    let threshold_days = query
        .threshold_days
        .unwrap_or(state.config.recency.inactive_threshold_days);
    let records = state
        .store
        .list_recent_purchases()
        .map_err(store_failure)?;
    let customers = pulse_recency::list_inactive(&records, threshold_days, Utc::now());

    Ok(Json(InactiveListResponse {
        threshold_days,
        matched: customers.len() as u64,
        customers,
    }))
}

/// GET /v1/stats: aggregate recency statistics over the current snapshot.
#[utoipa::path(
    get,
    path = "/v1/stats",
    tag = "Statistics",
    responses(
        (status = 200, description = "Aggregate statistics and chart tallies", body = RecencySnapshot),
    )
)]
pub async fn customer_stats(
    State(state): State<AppState>,
) -> Result<Json<RecencySnapshot>, ApiError> {
    metrics::counter!("api.stats.requests").increment(1);

    let records = state
        .store
        .list_recent_purchases()
        .map_err(store_failure)?;
    Ok(Json(pulse_recency::aggregate(&records, Utc::now())))
}

/// GET /v1/outreach/{band}: rendered outreach messages for the band's
/// customers, capped at the preview limit.
#[utoipa::path(
    get,
    path = "/v1/outreach/{band}",
    tag = "Outreach",
    params(
        ("band" = String, Path, description = "Band label, e.g. \"91-180\""),
        PreviewQuery,
    ),
    responses(
        (status = 200, description = "Copy-ready messages for the band", body = OutreachPreviewResponse),
        (status = 400, description = "Unknown band label", body = ErrorResponse),
        (status = 404, description = "No template registered for the band", body = ErrorResponse),
    )
)]
pub async fn outreach_preview(
    State(state): State<AppState>,
    Path(band): Path<String>,
    Query(query): Query<PreviewQuery>,
) -> Result<Json<OutreachPreviewResponse>, ApiError> {
    metrics::counter!("api.outreach.requests").increment(1);

    let band = parse_band(&band)?;
    let template = state.catalog.get(band).ok_or_else(|| {
        (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: "template_not_found".to_string(),
                message: format!("no template registered for band {band}"),
            }),
        )
    })?;

    let customers = state
        .store
        .list_by_band(band, Utc::now())
        .map_err(store_failure)?;
    let limit = query.limit.unwrap_or(state.config.outreach.preview_limit);
    let messages: Vec<RenderedMessage> = customers
        .iter()
        .take(limit)
        .filter_map(|customer| render_for(template, customer, &state.config.outreach.store_name))
        .collect();

    Ok(Json(OutreachPreviewResponse {
        band,
        total_in_band: customers.len() as u64,
        messages,
    }))
}

/// GET /v1/templates: the outreach template catalog.
#[utoipa::path(
    get,
    path = "/v1/templates",
    tag = "Outreach",
    responses(
        (status = 200, description = "Templates in ascending band order", body = [MessageTemplate]),
    )
)]
pub async fn list_templates(State(state): State<AppState>) -> Json<Vec<MessageTemplate>> {
    let templates: Vec<MessageTemplate> =
        state.catalog.list().into_iter().cloned().collect();
    Json(templates)
}

/// GET /health: Health check endpoint.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Operations",
    responses((status = 200, description = "Service health", body = HealthResponse))
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        node_id: state.config.node_id.clone(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}

/// GET /ready: Readiness probe for Kubernetes.
#[utoipa::path(
    get,
    path = "/ready",
    tag = "Operations",
    responses((status = 200, description = "Ready to accept traffic"))
)]
pub async fn readiness(State(state): State<AppState>) -> StatusCode {
    if state.start_time.elapsed().as_secs() > 0 {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

/// GET /live: Liveness probe for Kubernetes.
#[utoipa::path(
    get,
    path = "/live",
    tag = "Operations",
    responses((status = 200, description = "Process is alive"))
)]
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_band_accepts_wire_labels() {
        assert_eq!(parse_band("0-30").unwrap(), RecencyBand::New);
        assert_eq!(parse_band("365+").unwrap(), RecencyBand::Lost);
    }

    #[test]
    fn test_parse_band_rejects_unknown_label() {
        let (status, body) = parse_band("30-60").unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.error, "unknown_band");
    }
}

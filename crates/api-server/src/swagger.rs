//! OpenAPI specification and Swagger UI configuration.

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "CustomerPulse API",
        version = "0.1.0",
        description = "Customer purchase-recency dashboard backend.\n\nClassifies customers into recency bands, aggregates statistics for the dashboard charts, and renders per-customer outreach messages.",
        license(name = "MIT"),
    ),
    tags(
        (name = "Customers", description = "Classified customer table queries"),
        (name = "Statistics", description = "Aggregate recency statistics and chart tallies"),
        (name = "Outreach", description = "Message templates and per-customer rendering"),
        (name = "Operations", description = "Health, readiness, and liveness probes"),
    ),
    paths(
        // Customers
        crate::rest::list_customers,
        crate::rest::list_inactive_customers,
        // Statistics
        crate::rest::customer_stats,
        // Outreach
        crate::rest::outreach_preview,
        crate::rest::list_templates,
        // Operations
        crate::rest::health_check,
        crate::rest::readiness,
        crate::rest::liveness,
    ),
    components(schemas(
        // Domain types
        pulse_core::types::PurchaseRecord,
        pulse_core::types::RecencyBand,
        pulse_core::types::ClassifiedCustomer,
        pulse_core::types::MonthBucket,
        pulse_core::types::RecencySnapshot,
        // Outreach types
        pulse_outreach::MessageTemplate,
        pulse_outreach::TemplateVariable,
        pulse_outreach::TemplateStatus,
        pulse_outreach::RenderedMessage,
        // API envelopes
        crate::rest::CustomerListResponse,
        crate::rest::InactiveListResponse,
        crate::rest::OutreachPreviewResponse,
        crate::rest::ErrorResponse,
        crate::rest::HealthResponse,
    ))
)]
pub struct ApiDoc;

//! HTTP surface for the usage report
//!
//! Two read-only routes, kept deliberately thin over [`UsageReporter`]:
//!
//! - `GET /os-simple-tenant-usage?start=<ts>&end=<ts>&detailed=<0|1>` —
//!   summaries for all tenants
//! - `GET /os-simple-tenant-usage/{tenant_id}?start=<ts>&end=<ts>` — one
//!   tenant's detailed summary
//!
//! Query timestamps accept the layouts of [`crate::window::ACCEPTED_FORMATS`].
//! Malformed or inverted ranges come back as 400 with the accepted formats in
//! the message; authorization denials as 403 before any computation runs.

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;

use crate::error::{Result, UsageError};
use crate::types::TenantId;
use crate::usage::{TenantUsageSummary, UsageReporter};
use crate::window::{parse_window, Clock};

/// Opaque caller identity, taken from the `x-identity` request header
///
/// The reporting module does not interpret identities; it hands them to the
/// authorization collaborator and acts on the verdict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller(pub Option<String>);

impl Caller {
    /// Extract the caller identity from request headers
    pub fn from_headers(headers: &HeaderMap) -> Self {
        Self(
            headers
                .get("x-identity")
                .and_then(|v| v.to_str().ok())
                .map(str::to_string),
        )
    }
}

/// Authorization collaborator
///
/// Policy-engine seam: an opaque allow/deny per report kind. Denials fail
/// with [`UsageError::Forbidden`].
#[async_trait::async_trait]
pub trait Authorizer: Send + Sync {
    /// May the caller list usage across all tenants?
    async fn authorize_list(&self, caller: &Caller) -> Result<()>;

    /// May the caller view usage for one specific tenant?
    async fn authorize_show(&self, caller: &Caller, tenant_id: &TenantId) -> Result<()>;
}

/// Authorizer that admits every caller
///
/// Suitable for development and tests; deployments front this service with a
/// real policy engine behind [`Authorizer`].
#[derive(Debug, Default, Clone, Copy)]
pub struct AllowAll;

#[async_trait::async_trait]
impl Authorizer for AllowAll {
    async fn authorize_list(&self, _caller: &Caller) -> Result<()> {
        Ok(())
    }

    async fn authorize_show(&self, _caller: &Caller, _tenant_id: &TenantId) -> Result<()> {
        Ok(())
    }
}

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    /// Report engine
    pub reporter: Arc<UsageReporter>,
    /// Authorization collaborator
    pub authorizer: Arc<dyn Authorizer>,
    /// Clock collaborator
    pub clock: Arc<dyn Clock>,
}

/// Query parameters shared by both routes
#[derive(Debug, Default, Clone, Deserialize)]
pub struct UsageQuery {
    /// Window start, textual; defaults to now when absent
    pub start: Option<String>,
    /// Window end, textual; defaults to now when absent
    pub end: Option<String>,
    /// Detailed mode flag; true only for the exact value "1"
    pub detailed: Option<String>,
}

impl UsageQuery {
    fn detailed(&self) -> bool {
        self.detailed.as_deref() == Some("1")
    }
}

/// Response body of the all-tenants route
#[derive(Debug, Serialize, Deserialize)]
pub struct TenantUsagesResponse {
    /// One summary per tenant with qualifying usage, first-seen order
    pub tenant_usages: Vec<TenantUsageSummary>,
}

/// Response body of the single-tenant route
#[derive(Debug, Serialize, Deserialize)]
pub struct TenantUsageResponse {
    /// The tenant's summary; zeroed when nothing qualified
    pub tenant_usage: TenantUsageSummary,
}

/// Error wrapper mapping [`UsageError`] onto HTTP statuses
#[derive(Debug)]
pub struct ApiError(pub UsageError);

impl ApiError {
    /// The HTTP status this error surfaces as
    pub fn status(&self) -> StatusCode {
        match self.0 {
            UsageError::InvalidDatetime(_) | UsageError::StartAfterStop => {
                StatusCode::BAD_REQUEST
            }
            UsageError::Forbidden(_) => StatusCode::FORBIDDEN,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<UsageError> for ApiError {
    fn from(err: UsageError) -> Self {
        Self(err)
    }
}

/// JSON error body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human-readable explanation
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            // don't leak internals to the caller
            error!("internal error serving usage report: {}", self.0);
            "internal error".to_string()
        } else {
            self.0.to_string()
        };
        (status, Json(ErrorBody { message })).into_response()
    }
}

/// `GET /os-simple-tenant-usage` — usage summaries for all tenants
pub async fn index(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<UsageQuery>,
) -> std::result::Result<Json<TenantUsagesResponse>, ApiError> {
    let caller = Caller::from_headers(&headers);
    state.authorizer.authorize_list(&caller).await?;

    let now = state.clock.now_utc();
    let window = parse_window(query.start.as_deref(), query.end.as_deref(), now)?.clip_to(now);

    let tenant_usages = state
        .reporter
        .tenant_usages(&window, None, query.detailed(), now)
        .await?;
    Ok(Json(TenantUsagesResponse { tenant_usages }))
}

/// `GET /os-simple-tenant-usage/{tenant_id}` — one tenant's detailed summary
pub async fn show(
    State(state): State<AppState>,
    Path(tenant_id): Path<String>,
    headers: HeaderMap,
    Query(query): Query<UsageQuery>,
) -> std::result::Result<Json<TenantUsageResponse>, ApiError> {
    let tenant_id = TenantId::new(tenant_id);
    let caller = Caller::from_headers(&headers);
    state.authorizer.authorize_show(&caller, &tenant_id).await?;

    let now = state.clock.now_utc();
    let window = parse_window(query.start.as_deref(), query.end.as_deref(), now)?.clip_to(now);

    let mut summaries = state
        .reporter
        .tenant_usages(&window, Some(&tenant_id), true, now)
        .await?;

    // zero qualifying instances is an empty report, not an error
    let tenant_usage = if summaries.is_empty() {
        TenantUsageSummary::empty(tenant_id, &window, true)
    } else {
        summaries.swap_remove(0)
    };
    Ok(Json(TenantUsageResponse { tenant_usage }))
}

/// Build the usage-report router over shared state
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/os-simple-tenant-usage", get(index))
        .route("/os-simple-tenant-usage/{tenant_id}", get(show))
        .with_state(state)
}

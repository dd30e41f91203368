//! REST API handlers for the wizard flow and operational endpoints.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::warn;
use utoipa::ToSchema;
use uuid::Uuid;

use door_core::types::{BudgetTier, TransportMode, TripRequest, UserDetails};
use door_outbound::ReverseGeocoder;
use door_planner::{CaptureOutcome, CaptureService, TripOutcome, TripPlannerForm, TripService, UserDetailsForm};
use door_voice_bridge::VoiceBridgeHandle;
use door_wizard::gallery::{self, Destination};
use door_wizard::{WizardController, WizardStep};

/// Maximum string field length accepted at the API boundary.
const MAX_FIELD_LEN: usize = 256;

/// Shared application state for REST handlers.
#[derive(Clone)]
pub struct AppState {
    pub controller: Arc<WizardController>,
    pub capture: Arc<CaptureService>,
    pub trips: Arc<TripService>,
    pub geocoder: Arc<ReverseGeocoder>,
    pub voice: VoiceBridgeHandle,
    pub node_id: String,
    pub start_time: Instant,
}

#[derive(Serialize, ToSchema)]
pub struct SessionResponse {
    pub session_id: Uuid,
    pub step: WizardStep,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserDetails>,
}

#[derive(Deserialize, ToSchema)]
pub struct StepRequest {
    pub step: WizardStep,
}

#[derive(Deserialize, ToSchema)]
pub struct UserDetailsRequest {
    pub name: String,
    pub email: String,
}

#[derive(Deserialize, ToSchema)]
pub struct DestinationSelectRequest {
    pub index: usize,
}

/// Trip-planner submission body. Dates and duration arrive as the form left
/// them; coordinates are forwarded only when the browser granted location.
#[derive(Deserialize, ToSchema)]
pub struct TripPlanRequest {
    #[serde(default)]
    pub destination: String,
    #[serde(default)]
    pub current_city: String,
    pub start_date: Option<chrono::NaiveDate>,
    pub end_date: Option<chrono::NaiveDate>,
    pub duration_days: Option<u16>,
    #[serde(default)]
    pub budget: BudgetTier,
    #[serde(default)]
    pub travel_style: Vec<String>,
    #[serde(default = "default_group_size")]
    pub group_size: String,
    pub transport_mode: Option<TransportMode>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

fn default_group_size() -> String {
    "2".to_string()
}

#[derive(Serialize, ToSchema)]
pub struct TripResponse {
    pub request: TripRequest,
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

fn error(status: StatusCode, error: &str, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: error.to_string(),
            message: message.into(),
        }),
    )
}

fn session_not_found(id: &Uuid) -> ApiError {
    error(
        StatusCode::NOT_FOUND,
        "session_not_found",
        format!("No session {id}"),
    )
}

/// Validate free-text fields at the API boundary.
fn validate_field_lengths(fields: &[(&str, &str)]) -> Result<(), ApiError> {
    for (label, value) in fields {
        if value.len() > MAX_FIELD_LEN {
            metrics::counter!("api.validation_errors").increment(1);
            return Err(error(
                StatusCode::BAD_REQUEST,
                "field_too_long",
                format!("'{label}' exceeds maximum length"),
            ));
        }
    }
    Ok(())
}

/// POST /v1/sessions — Start a wizard session at the hero step.
#[utoipa::path(
    post,
    path = "/v1/sessions",
    tag = "Wizard",
    responses(
        (status = 200, description = "Session created", body = SessionResponse),
    )
)]
pub async fn create_session(State(state): State<AppState>) -> Json<SessionResponse> {
    let session_id = state.controller.start_session();
    metrics::counter!("wizard.sessions_started").increment(1);
    Json(SessionResponse {
        session_id,
        step: WizardStep::Hero,
        user: None,
    })
}

/// GET /v1/sessions/{id} — Current step and captured identity.
#[utoipa::path(
    get,
    path = "/v1/sessions/{id}",
    tag = "Wizard",
    params(("id" = Uuid, Path, description = "Session identifier")),
    responses(
        (status = 200, description = "Session snapshot", body = SessionResponse),
        (status = 404, description = "Unknown session", body = ErrorResponse),
    )
)]
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>, ApiError> {
    let session = state.controller.session(&id).ok_or_else(|| session_not_found(&id))?;
    Ok(Json(SessionResponse {
        session_id: session.id,
        step: session.step,
        user: session.user,
    }))
}

/// POST /v1/sessions/{id}/step — Request a step transition. Out-of-reach
/// targets are ignored and the unchanged step is returned.
#[utoipa::path(
    post,
    path = "/v1/sessions/{id}/step",
    tag = "Wizard",
    params(("id" = Uuid, Path, description = "Session identifier")),
    request_body = StepRequest,
    responses(
        (status = 200, description = "Resulting step", body = SessionResponse),
        (status = 404, description = "Unknown session", body = ErrorResponse),
    )
)]
pub async fn change_step(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<StepRequest>,
) -> Result<Json<SessionResponse>, ApiError> {
    let step = state
        .controller
        .go_to(&id, request.step)
        .map_err(|_| session_not_found(&id))?;
    Ok(Json(SessionResponse {
        session_id: id,
        step,
        user: None,
    }))
}

/// POST /v1/sessions/{id}/user-details — Capture the visitor's identity and
/// advance past the user-details step.
#[utoipa::path(
    post,
    path = "/v1/sessions/{id}/user-details",
    tag = "Capture",
    params(("id" = Uuid, Path, description = "Session identifier")),
    request_body = UserDetailsRequest,
    responses(
        (status = 200, description = "Identity captured, wizard advanced", body = SessionResponse),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 404, description = "Unknown session", body = ErrorResponse),
        (status = 409, description = "Identity already captured", body = ErrorResponse),
        (status = 502, description = "Webhook delivery failed", body = ErrorResponse),
    )
)]
pub async fn submit_user_details(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UserDetailsRequest>,
) -> Result<Json<SessionResponse>, ApiError> {
    if state.controller.session(&id).is_none() {
        return Err(session_not_found(&id));
    }
    validate_field_lengths(&[("name", &request.name), ("email", &request.email)])?;

    let mut form = UserDetailsForm::new();
    form.name = request.name;
    form.email = request.email;

    match state.capture.submit(&id.to_string(), &mut form).await {
        CaptureOutcome::Accepted(details) => {
            let step = state
                .controller
                .set_user_details(&id, details.clone())
                .map_err(|e| {
                    warn!(session_id = %id, error = %e, "identity already captured");
                    error(StatusCode::CONFLICT, "already_captured", e.to_string())
                })?;
            Ok(Json(SessionResponse {
                session_id: id,
                step,
                user: Some(details),
            }))
        }
        CaptureOutcome::Invalid => {
            metrics::counter!("api.validation_errors").increment(1);
            Err(error(
                StatusCode::BAD_REQUEST,
                "invalid_user_details",
                "Name and a valid email address are required",
            ))
        }
        CaptureOutcome::InFlight => Err(error(
            StatusCode::CONFLICT,
            "submission_in_flight",
            "A submission is already pending",
        )),
        CaptureOutcome::Failed => {
            metrics::counter!("api.webhook_failures").increment(1);
            Err(error(
                StatusCode::BAD_GATEWAY,
                "webhook_failed",
                "Something went wrong. Please try again.",
            ))
        }
    }
}

/// GET /v1/destinations — The gallery catalog.
#[utoipa::path(
    get,
    path = "/v1/destinations",
    tag = "Wizard",
    responses(
        (status = 200, description = "Gallery entries", body = [Destination]),
    )
)]
pub async fn list_destinations() -> Json<Vec<Destination>> {
    Json(gallery::catalog())
}

/// POST /v1/sessions/{id}/destination — Gallery click: advance to the
/// planner. The selection itself is not recorded.
#[utoipa::path(
    post,
    path = "/v1/sessions/{id}/destination",
    tag = "Wizard",
    params(("id" = Uuid, Path, description = "Session identifier")),
    request_body = DestinationSelectRequest,
    responses(
        (status = 200, description = "Wizard advanced", body = SessionResponse),
        (status = 400, description = "Unknown gallery index", body = ErrorResponse),
        (status = 404, description = "Unknown session", body = ErrorResponse),
    )
)]
pub async fn select_destination(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<DestinationSelectRequest>,
) -> Result<Json<SessionResponse>, ApiError> {
    if state.controller.session(&id).is_none() {
        return Err(session_not_found(&id));
    }
    state
        .controller
        .select_destination(&id, request.index)
        .map_err(|e| error(StatusCode::BAD_REQUEST, "invalid_destination", e.to_string()))?;

    let step = state
        .controller
        .current_step(&id)
        .map_err(|_| session_not_found(&id))?;
    Ok(Json(SessionResponse {
        session_id: id,
        step,
        user: None,
    }))
}

/// POST /v1/sessions/{id}/trip — Submit the trip-planner form.
#[utoipa::path(
    post,
    path = "/v1/sessions/{id}/trip",
    tag = "Capture",
    params(("id" = Uuid, Path, description = "Session identifier")),
    request_body = TripPlanRequest,
    responses(
        (status = 200, description = "Trip request forwarded", body = TripResponse),
        (status = 400, description = "Mandatory fields missing", body = ErrorResponse),
        (status = 404, description = "Unknown session", body = ErrorResponse),
        (status = 502, description = "Webhook delivery failed", body = ErrorResponse),
    )
)]
pub async fn submit_trip(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<TripPlanRequest>,
) -> Result<Json<TripResponse>, ApiError> {
    let user = state
        .controller
        .user_details(&id)
        .map_err(|_| session_not_found(&id))?;
    validate_field_lengths(&[
        ("destination", &request.destination),
        ("current_city", &request.current_city),
        ("group_size", &request.group_size),
    ])?;

    let mut form = TripPlannerForm::new();
    form.destination = request.destination;
    form.current_city = request.current_city;
    form.start_date = request.start_date;
    form.end_date = request.end_date;
    form.duration_days = request.duration_days;
    form.budget = request.budget;
    form.travel_style = request.travel_style;
    form.group_size = request.group_size;
    form.transport_mode = request.transport_mode;

    // Browser-granted coordinates fill an empty origin city before the
    // mandatory-field check runs.
    if let (Some(latitude), Some(longitude)) = (request.latitude, request.longitude) {
        form.autofill_city(&state.geocoder, latitude, longitude).await;
    }

    match state.trips.submit(&id.to_string(), &mut form, user.as_ref()).await {
        TripOutcome::Accepted(request) => Ok(Json(TripResponse { request: *request })),
        TripOutcome::MissingFields(missing) => {
            metrics::counter!("api.validation_errors").increment(1);
            Err(error(
                StatusCode::BAD_REQUEST,
                "missing_fields",
                format!("Please fill in: {}", missing.join(", ")),
            ))
        }
        TripOutcome::InFlight => Err(error(
            StatusCode::CONFLICT,
            "submission_in_flight",
            "A submission is already pending",
        )),
        TripOutcome::Failed => {
            metrics::counter!("api.webhook_failures").increment(1);
            Err(error(
                StatusCode::BAD_GATEWAY,
                "webhook_failed",
                "Our planner backend had a problem. Please try again.",
            ))
        }
    }
}

/// GET /health — Health check endpoint.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Operations",
    responses((status = 200, description = "Service healthy", body = HealthResponse))
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        node_id: state.node_id.clone(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}

/// GET /ready — Readiness probe.
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

/// GET /live — Liveness probe.
#[utoipa::path(
    get,
    path = "/live",
    tag = "Operations",
    responses((status = 200, description = "Process alive"))
)]
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

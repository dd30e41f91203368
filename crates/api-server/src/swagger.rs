//! OpenAPI specification and Swagger UI configuration.

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Anywhere Door API",
        version = "0.1.0",
        description = "AI-powered travel planning funnel.\n\nDrives the step-gated wizard (hero, user details, destinations, trip planner), forwards captured details to the workflow webhook, and bridges the embedded voice widget.",
        license(name = "MIT"),
    ),
    tags(
        (name = "Wizard", description = "Session lifecycle and step navigation"),
        (name = "Capture", description = "User-details and trip-planner submissions"),
        (name = "Voice", description = "Voice-widget bridge inbound endpoints"),
        (name = "Operations", description = "Health, readiness, and liveness probes"),
    ),
    paths(
        // Wizard
        crate::rest::create_session,
        crate::rest::get_session,
        crate::rest::change_step,
        crate::rest::list_destinations,
        crate::rest::select_destination,
        // Capture
        crate::rest::submit_user_details,
        crate::rest::submit_trip,
        // Voice
        crate::voice_rest::voice_submit,
        crate::voice_rest::voice_message,
        crate::voice_rest::voice_transcript,
        // Operations
        crate::rest::health_check,
        crate::rest::readiness,
        crate::rest::liveness,
    ),
    components(schemas(
        // Domain types
        door_core::types::UserDetails,
        door_core::types::TripRequest,
        door_core::types::BudgetTier,
        door_core::types::TransportMode,
        door_wizard::types::WizardStep,
        door_wizard::gallery::Destination,
        // REST request/response types
        crate::rest::SessionResponse,
        crate::rest::StepRequest,
        crate::rest::UserDetailsRequest,
        crate::rest::DestinationSelectRequest,
        crate::rest::TripPlanRequest,
        crate::rest::TripResponse,
        crate::rest::ErrorResponse,
        crate::rest::HealthResponse,
        crate::voice_rest::TranscriptRequest,
    ))
)]
pub struct ApiDoc;

//! Voice bridge REST endpoints — the service-side stand-ins for the
//! widget's global entry point and the window message listener. Everything
//! here is accepted immediately and handled by the bridge's single consumer.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use utoipa::ToSchema;

use door_voice_bridge::VoiceInbound;

use crate::rest::AppState;

#[derive(Deserialize, ToSchema)]
pub struct TranscriptRequest {
    pub text: String,
}

/// POST /v1/voice/submit — The widget's direct submission entry point.
#[utoipa::path(
    post,
    path = "/v1/voice/submit",
    tag = "Voice",
    responses((status = 202, description = "Payload queued for forwarding"))
)]
pub async fn voice_submit(
    State(state): State<AppState>,
    Json(payload): Json<serde_json::Value>,
) -> StatusCode {
    metrics::counter!("voice.direct_submissions").increment(1);
    state.voice.push(VoiceInbound::DirectSubmit(payload));
    StatusCode::ACCEPTED
}

/// POST /v1/voice/message — A cross-context widget message; forwarded only
/// when it carries a known marker or payload key.
#[utoipa::path(
    post,
    path = "/v1/voice/message",
    tag = "Voice",
    responses((status = 202, description = "Message queued for inspection"))
)]
pub async fn voice_message(
    State(state): State<AppState>,
    Json(payload): Json<serde_json::Value>,
) -> StatusCode {
    metrics::counter!("voice.messages_received").increment(1);
    state.voice.push(VoiceInbound::WindowMessage(payload));
    StatusCode::ACCEPTED
}

/// POST /v1/voice/transcript — Free-text conversation content routed
/// through the heuristic field extractor.
#[utoipa::path(
    post,
    path = "/v1/voice/transcript",
    tag = "Voice",
    request_body = TranscriptRequest,
    responses((status = 202, description = "Transcript queued for extraction"))
)]
pub async fn voice_transcript(
    State(state): State<AppState>,
    Json(request): Json<TranscriptRequest>,
) -> StatusCode {
    metrics::counter!("voice.transcripts_received").increment(1);
    state.voice.push(VoiceInbound::Transcript(request.text));
    StatusCode::ACCEPTED
}

//! Axum Handlers for the REST API
//!
//! Catalog listings, session lifecycle, the conversation endpoint and the
//! random patient generator. Every session owns a `TurnEngine`; its lock is
//! released while the persona "thinks" so that ending the session during the
//! pause is possible, in which case the reply is dropped.

use axum::{
    extract::{Path, Query, State, rejection::QueryRejection},
    http::{StatusCode, Uri, header},
    response::{IntoResponse, Json, Response},
};
use chrono::Utc;
use std::sync::Arc;
use synthetic_patients_core::export::ExportError;
use synthetic_patients_core::generator::BatchExportError;
use synthetic_patients_core::{
    EngineError, ExportFormat, GeneratorError, PatientBatch, PatientGenerator, Picker,
    SeededPicker, SessionSummary, ThreadRngPicker, TurnEngine,
};
use tokio::sync::Mutex;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::{
    models::{
        ConversationPayload, ConversationResponse, CreateSessionPayload, ErrorResponse,
        ExportPatientsPayload, ExportQuery, FeatureFlags, GeneratePatientsPayload,
        GeneratedPatients, HealthResponse, PatientSummary, ScenarioInfo, ServiceStatus,
        SessionCreated, StatusResponse,
    },
    state::AppState,
};

const APPLICATION: &str = "Synthetic Patients";
const DESCRIPTION: &str = "Simulated difficult medical conversations for clinical education";

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    InternalServerError(anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, Json(ErrorResponse { message })).into_response()
            }
            ApiError::NotFound(message) => {
                (StatusCode::NOT_FOUND, Json(ErrorResponse { message })).into_response()
            }
            ApiError::Conflict(message) => {
                (StatusCode::CONFLICT, Json(ErrorResponse { message })).into_response()
            }
            ApiError::InternalServerError(err) => {
                error!("Internal Server Error: {:?}", err);
                let message = "An internal server error occurred.".to_string();
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse { message }),
                )
                    .into_response()
            }
        }
    }
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::NotFound { .. } => Self::NotFound(err.to_string()),
            EngineError::InvalidState(_) => Self::Conflict(err.to_string()),
            EngineError::InvalidInput(_) => Self::BadRequest(err.to_string()),
        }
    }
}

impl From<GeneratorError> for ApiError {
    fn from(err: GeneratorError) -> Self {
        Self::BadRequest(err.to_string())
    }
}

impl From<BatchExportError> for ApiError {
    fn from(err: BatchExportError) -> Self {
        match err {
            BatchExportError::Generator(e) => e.into(),
            BatchExportError::Export(e) => e.into(),
        }
    }
}

impl From<ExportError> for ApiError {
    fn from(err: ExportError) -> Self {
        match err {
            ExportError::UnknownFormat(_) => Self::BadRequest(err.to_string()),
            other => Self::InternalServerError(other.into()),
        }
    }
}

fn export_format(
    query: Result<Query<ExportQuery>, QueryRejection>,
) -> Result<ExportFormat, ApiError> {
    let Query(ExportQuery { format }) = query.map_err(|rejection| {
        ApiError::BadRequest(format!(
            "Unsupported export format, expected 'json' or 'csv': {}",
            rejection.body_text()
        ))
    })?;
    Ok(format)
}

fn attachment(format: ExportFormat, file_name: String, body: String) -> impl IntoResponse {
    let disposition = format!("attachment; filename=\"{}\"", file_name);
    (
        [
            (header::CONTENT_TYPE, format.content_type().to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
}

async fn session_engine(state: &AppState, id: Uuid) -> Result<Arc<Mutex<TurnEngine>>, ApiError> {
    state
        .sessions
        .get(id)
        .await
        .ok_or_else(|| ApiError::NotFound(format!("Session with id '{}' not found", id)))
}

/// Liveness check.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    )
)]
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: Utc::now(),
        uptime_seconds: state.started_at.elapsed().as_secs_f64(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        environment: state.config.environment.clone(),
        services: ServiceStatus {
            web_server: "running".to_string(),
            static_files: "serving".to_string(),
        },
    })
}

/// Application metadata and feature flags.
#[utoipa::path(
    get,
    path = "/api/status",
    responses(
        (status = 200, description = "Application status", body = StatusResponse)
    )
)]
pub async fn status() -> Json<StatusResponse> {
    Json(StatusResponse {
        application: APPLICATION.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        description: DESCRIPTION.to_string(),
        features: FeatureFlags {
            patient_scenarios: true,
            conversation_engine: true,
            educational_analytics: true,
            patient_generator: true,
            multimodal_ai: false,
        },
    })
}

/// List the available patient personas.
#[utoipa::path(
    get,
    path = "/api/patients",
    responses(
        (status = 200, description = "Patient personas", body = [PatientSummary])
    )
)]
pub async fn list_patients(State(state): State<Arc<AppState>>) -> Json<Vec<PatientSummary>> {
    Json(
        state
            .personas
            .iter()
            .map(|p| PatientSummary::from(p.as_ref()))
            .collect(),
    )
}

/// List the scenario catalog.
#[utoipa::path(
    get,
    path = "/api/scenarios",
    responses(
        (status = 200, description = "Scenario catalog", body = [ScenarioInfo])
    )
)]
pub async fn list_scenarios(State(state): State<Arc<AppState>>) -> Json<Vec<ScenarioInfo>> {
    Json(state.scenarios.iter().map(ScenarioInfo::from).collect())
}

/// Start a consultation with a patient persona.
#[utoipa::path(
    post,
    path = "/api/sessions",
    request_body = CreateSessionPayload,
    responses(
        (status = 201, description = "Session created successfully", body = SessionCreated),
        (status = 404, description = "Unknown patient", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn create_session(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateSessionPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let mut engine = TurnEngine::new(
        state.personas.clone(),
        state.scenarios.clone(),
        Box::new(ThreadRngPicker),
    );
    let greeting = engine.start(&payload.patient_id)?;
    let session_id = greeting.session_id;
    state.sessions.insert(session_id, engine).await;

    info!(%session_id, patient_id = %payload.patient_id, "Session created");
    Ok((StatusCode::CREATED, Json(SessionCreated::from(greeting))))
}

/// Send an operator message and receive the persona's reply.
#[utoipa::path(
    post,
    path = "/api/conversation",
    request_body = ConversationPayload,
    responses(
        (status = 200, description = "Persona reply with feedback", body = ConversationResponse),
        (status = 400, description = "Missing or invalid message", body = ErrorResponse),
        (status = 404, description = "Session not found", body = ErrorResponse),
        (status = 409, description = "Session ended or a reply is still pending", body = ErrorResponse)
    )
)]
pub async fn converse(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ConversationPayload>,
) -> Result<Json<ConversationResponse>, ApiError> {
    let text = synthetic_patients_core::engine::operator_message(payload.message.as_ref())?;
    let engine = session_engine(&state, payload.session_id).await?;

    // If this request is cancelled during the pause, dropping `pending`
    // releases the reply and the session's next message delivers it.
    let pending = engine.lock().await.begin_turn(text)?;

    let delay = state.config.thinking_delay;
    if !delay.is_zero() {
        debug!(session_id = %payload.session_id, ?delay, "Persona is thinking");
        tokio::time::sleep(delay).await;
    }

    let outcome = engine.lock().await.complete_turn(pending).ok_or_else(|| {
        ApiError::Conflict("The session ended before the reply was delivered".to_string())
    })?;
    Ok(Json(ConversationResponse::from(outcome)))
}

/// Summary of a session, live or ended.
#[utoipa::path(
    get,
    path = "/api/sessions/{id}/summary",
    responses(
        (status = 200, description = "Session summary"),
        (status = 404, description = "Session not found", body = ErrorResponse)
    ),
    params(
        ("id" = Uuid, Path, description = "Session ID")
    )
)]
pub async fn session_summary(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionSummary>, ApiError> {
    let engine = session_engine(&state, id).await?;
    let summary = engine.lock().await.summary()?;
    Ok(Json(summary))
}

/// End a session. The transcript stays available for summary and export.
#[utoipa::path(
    post,
    path = "/api/sessions/{id}/end",
    responses(
        (status = 200, description = "Final session summary"),
        (status = 404, description = "Session not found", body = ErrorResponse),
        (status = 409, description = "Session already ended", body = ErrorResponse)
    ),
    params(
        ("id" = Uuid, Path, description = "Session ID")
    )
)]
pub async fn end_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionSummary>, ApiError> {
    let engine = session_engine(&state, id).await?;
    let summary = engine.lock().await.end()?;
    Ok(Json(summary))
}

/// Download the session transcript.
#[utoipa::path(
    get,
    path = "/api/sessions/{id}/export",
    responses(
        (status = 200, description = "Session record as a JSON or CSV attachment"),
        (status = 400, description = "Unsupported export format", body = ErrorResponse),
        (status = 404, description = "Session not found", body = ErrorResponse)
    ),
    params(
        ("id" = Uuid, Path, description = "Session ID"),
        ("format" = Option<String>, Query, description = "`json` (default) or `csv`")
    )
)]
pub async fn export_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    query: Result<Query<ExportQuery>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let format = export_format(query)?;
    let engine = session_engine(&state, id).await?;
    let record = engine.lock().await.export()?;
    let body = record.render(format)?;
    Ok(attachment(format, record.file_name(format), body))
}

/// Generate a batch of random patient records.
#[utoipa::path(
    post,
    path = "/api/generator/patients",
    request_body = GeneratePatientsPayload,
    responses(
        (status = 200, description = "Generated patients", body = GeneratedPatients),
        (status = 400, description = "Count outside 1..=100", body = ErrorResponse)
    )
)]
pub async fn generate_patients(
    Json(payload): Json<GeneratePatientsPayload>,
) -> Result<Json<GeneratedPatients>, ApiError> {
    let picker: Box<dyn Picker> = match payload.seed {
        Some(seed) => Box::new(SeededPicker::new(seed)),
        None => Box::new(ThreadRngPicker),
    };
    let batch = PatientGenerator::new(picker).batch(payload.count, payload.age_range, Utc::now())?;

    info!(
        count = batch.patients.len(),
        age_range = %payload.age_range,
        seeded = payload.seed.is_some(),
        "Generated synthetic patients"
    );
    Ok(Json(GeneratedPatients::from(batch)))
}

/// Export generated patients as a JSON or CSV attachment.
#[utoipa::path(
    post,
    path = "/api/generator/export",
    request_body = ExportPatientsPayload,
    responses(
        (status = 200, description = "`synthetic_patients_<date>` attachment"),
        (status = 400, description = "No patients, or unsupported format", body = ErrorResponse)
    ),
    params(
        ("format" = Option<String>, Query, description = "`json` (default) or `csv`")
    )
)]
pub async fn export_patients(
    query: Result<Query<ExportQuery>, QueryRejection>,
    Json(payload): Json<ExportPatientsPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let format = export_format(query)?;
    let batch = PatientBatch::from_patients(payload.patients, Utc::now());
    let body = batch.render(format)?;
    Ok(attachment(format, batch.file_name(format), body))
}

/// JSON 404 for anything that is neither an API route nor a static file.
pub async fn not_found(uri: Uri) -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            message: format!("Route {} not found", uri.path()),
        }),
    )
}

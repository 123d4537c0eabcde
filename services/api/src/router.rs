//! Axum Router Configuration
//!
//! This module defines the complete HTTP routing for the application,
//! including the REST API, static file serving, and OpenAPI documentation.

use crate::{
    handlers,
    models::{
        ConversationPayload, ConversationResponse, CreateSessionPayload, ErrorResponse,
        ExportPatientsPayload, ExportQuery, FeatureFlags, GeneratePatientsPayload,
        GeneratedPatients, HealthResponse, PatientSummary, ScenarioInfo, ServiceStatus,
        SessionCreated, StatusResponse,
    },
    state::AppState,
};

use axum::{
    Router,
    handler::HandlerWithoutStateExt,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::services::ServeDir;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health,
        handlers::status,
        handlers::list_patients,
        handlers::list_scenarios,
        handlers::create_session,
        handlers::converse,
        handlers::session_summary,
        handlers::end_session,
        handlers::export_session,
        handlers::generate_patients,
        handlers::export_patients,
    ),
    components(
        schemas(
            HealthResponse, ServiceStatus, StatusResponse, FeatureFlags, PatientSummary,
            ScenarioInfo, CreateSessionPayload, SessionCreated, ConversationPayload,
            ConversationResponse, ExportQuery, ErrorResponse, GeneratePatientsPayload,
            GeneratedPatients, ExportPatientsPayload
        )
    ),
    tags(
        (name = "Synthetic Patients API", description = "Simulated patient consultations for medical education")
    )
)]
pub struct ApiDoc;

/// Creates the main Axum router for the application.
pub fn create_router(app_state: Arc<AppState>) -> Router {
    let static_files = ServeDir::new(&app_state.config.static_dir)
        .not_found_service(handlers::not_found.into_service());

    let api_router = Router::new()
        .route("/health", get(handlers::health))
        .route("/api/status", get(handlers::status))
        .route("/api/patients", get(handlers::list_patients))
        .route("/api/scenarios", get(handlers::list_scenarios))
        .route("/api/sessions", post(handlers::create_session))
        .route("/api/conversation", post(handlers::converse))
        .route("/api/sessions/{id}/summary", get(handlers::session_summary))
        .route("/api/sessions/{id}/end", post(handlers::end_session))
        .route("/api/sessions/{id}/export", get(handlers::export_session))
        .route("/api/generator/patients", post(handlers::generate_patients))
        .route("/api/generator/export", post(handlers::export_patients))
        .with_state(app_state);

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(api_router)
        .fallback_service(static_files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use axum::response::Response;
    use serde_json::{Value, json};
    use std::time::Duration;
    use synthetic_patients_core::{PersonaStore, ScenarioCatalog};
    use tower::ServiceExt;
    use tracing::Level;

    fn test_state(static_dir: std::path::PathBuf, thinking_delay: Duration) -> Arc<AppState> {
        let config = Config {
            bind_address: "127.0.0.1:0".parse().unwrap(),
            log_level: Level::INFO,
            environment: "test".to_string(),
            static_dir,
            personas_path: None,
            thinking_delay,
            session_idle_ttl: Duration::from_secs(1800),
            ended_session_ttl: Duration::from_secs(300),
        };
        Arc::new(AppState::new(
            config,
            PersonaStore::builtin(),
            ScenarioCatalog::builtin(),
        ))
    }

    fn app() -> Router {
        create_router(test_state(
            "/definitely/not/a/static/dir".into(),
            Duration::ZERO,
        ))
    }

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn send(app: &Router, request: Request<Body>) -> Response {
        app.clone().oneshot(request).await.unwrap()
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn start_session(app: &Router, patient_id: &str) -> String {
        let response = send(app, post_json("/api/sessions", json!({ "patient_id": patient_id }))).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        body_json(response).await["session_id"]
            .as_str()
            .unwrap()
            .to_string()
    }

    #[tokio::test]
    async fn test_health() {
        let response = send(&app(), get("/health")).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["environment"], "test");
        assert_eq!(body["services"]["web_server"], "running");
    }

    #[tokio::test]
    async fn test_status_reports_features() {
        let body = body_json(send(&app(), get("/api/status")).await).await;
        assert_eq!(body["features"]["conversation_engine"], true);
        assert_eq!(body["features"]["patient_generator"], true);
        assert_eq!(body["features"]["multimodal_ai"], false);
    }

    #[tokio::test]
    async fn test_list_patients_and_scenarios() {
        let app = app();
        let patients = body_json(send(&app, get("/api/patients")).await).await;
        let patients = patients.as_array().unwrap();
        assert_eq!(patients.len(), 7);
        assert!(patients.iter().any(|p| p["id"] == "jennifer-chen"));

        let scenarios = body_json(send(&app, get("/api/scenarios")).await).await;
        assert_eq!(scenarios.as_array().unwrap().len(), 6);
    }

    #[tokio::test]
    async fn test_create_session_returns_greeting() {
        let app = app();
        let response = send(
            &app,
            post_json("/api/sessions", json!({ "patient_id": "ahmed-al-farsi" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let body = body_json(response).await;
        assert_eq!(body["greeting"]["speaker"], "persona");
        assert_eq!(body["context"]["name"], "Ahmed Al-Farsi");
        assert_eq!(body["context"]["phase"], "greeting");
        assert_eq!(body["suggested_replies"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_create_session_unknown_patient() {
        let response = send(
            &app(),
            post_json("/api/sessions", json!({ "patient_id": "nobody" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["message"], "Persona 'nobody' not found");
    }

    #[tokio::test]
    async fn test_conversation_flow() {
        let app = app();
        let session_id = start_session(&app, "ahmed-al-farsi").await;

        let response = send(
            &app,
            post_json(
                "/api/conversation",
                json!({
                    "session_id": session_id,
                    "message": "I understand this must be very difficult, and I want to support your family."
                }),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["category"], "grateful");
        assert_eq!(body["emotional_state"], "trusting");
        assert_eq!(body["analysis"]["empathy"], 3);
        assert_eq!(
            body["feedback"]["strengths"][0],
            "Good use of empathetic language"
        );

        let summary = body_json(send(&app, get(&format!("/api/sessions/{session_id}/summary"))).await).await;
        assert_eq!(summary["exchange_count"], 1);
        assert_eq!(summary["active"], true);
    }

    #[tokio::test]
    async fn test_conversation_rejects_non_string_message() {
        let app = app();
        let session_id = start_session(&app, "maria-santos").await;

        for payload in [
            json!({ "session_id": session_id, "message": 42 }),
            json!({ "session_id": session_id }),
        ] {
            let response = send(&app, post_json("/api/conversation", payload)).await;
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        }

        let summary = body_json(send(&app, get(&format!("/api/sessions/{session_id}/summary"))).await).await;
        assert_eq!(summary["exchange_count"], 0);
    }

    #[tokio::test]
    async fn test_conversation_unknown_session() {
        let response = send(
            &app(),
            post_json(
                "/api/conversation",
                json!({ "session_id": "550e8400-e29b-41d4-a716-446655440000", "message": "Hello" }),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_end_session_blocks_further_messages() {
        let app = app();
        let session_id = start_session(&app, "james-wilson").await;

        let uri = format!("/api/sessions/{session_id}/end");
        let response = send(&app, post_json(&uri, json!({}))).await;
        assert_eq!(response.status(), StatusCode::OK);
        let summary = body_json(response).await;
        assert_eq!(summary["active"], false);
        assert_eq!(summary["current_phase"], "closure");

        let response = send(&app, post_json(&uri, json!({}))).await;
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let response = send(
            &app,
            post_json(
                "/api/conversation",
                json!({ "session_id": session_id, "message": "Hello?" }),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_reply_is_dropped_when_session_ends_while_thinking() {
        let app = create_router(test_state(
            "/definitely/not/a/static/dir".into(),
            Duration::from_millis(200),
        ));
        let session_id = start_session(&app, "maria-santos").await;

        let pending = tokio::spawn({
            let app = app.clone();
            let session_id = session_id.clone();
            async move {
                send(
                    &app,
                    post_json(
                        "/api/conversation",
                        json!({ "session_id": session_id, "message": "How are you?" }),
                    ),
                )
                .await
            }
        });

        tokio::time::sleep(Duration::from_millis(50)).await;
        let response = send(
            &app,
            post_json(&format!("/api/sessions/{session_id}/end"), json!({})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = pending.await.unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let summary = body_json(send(&app, get(&format!("/api/sessions/{session_id}/summary"))).await).await;
        assert_eq!(summary["message_count"], 2);
    }

    #[tokio::test]
    async fn test_cancelled_request_does_not_block_next_message() {
        let app = create_router(test_state(
            "/definitely/not/a/static/dir".into(),
            Duration::from_millis(200),
        ));
        let session_id = start_session(&app, "maria-santos").await;

        let cancelled = tokio::time::timeout(
            Duration::from_millis(20),
            send(
                &app,
                post_json(
                    "/api/conversation",
                    json!({ "session_id": session_id, "message": "How are you?" }),
                ),
            ),
        )
        .await;
        assert!(cancelled.is_err());

        let response = send(
            &app,
            post_json(
                "/api/conversation",
                json!({ "session_id": session_id, "message": "Are you still there?" }),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let summary = body_json(send(&app, get(&format!("/api/sessions/{session_id}/summary"))).await).await;
        assert_eq!(summary["message_count"], 5);
        assert_eq!(summary["exchange_count"], 2);
    }

    #[tokio::test]
    async fn test_export_formats() {
        let app = app();
        let session_id = start_session(&app, "jennifer-chen").await;
        send(
            &app,
            post_json(
                "/api/conversation",
                json!({ "session_id": session_id, "message": "How is work going?" }),
            ),
        )
        .await;

        let response = send(&app, get(&format!("/api/sessions/{session_id}/export"))).await;
        assert_eq!(response.status(), StatusCode::OK);
        let disposition = response.headers()[header::CONTENT_DISPOSITION]
            .to_str()
            .unwrap()
            .to_string();
        assert!(disposition.starts_with("attachment; filename=\"conversation_jennifer-chen_"));
        assert!(disposition.ends_with(".json\""));
        let record = body_json(response).await;
        assert_eq!(record["turns"].as_array().unwrap().len(), 3);

        let response = send(
            &app,
            get(&format!("/api/sessions/{session_id}/export?format=csv")),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/csv; charset=utf-8"
        );
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let csv = String::from_utf8(bytes.to_vec()).unwrap();
        assert_eq!(csv.lines().count(), 4);

        let response = send(
            &app,
            get(&format!("/api/sessions/{session_id}/export?format=xml")),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert!(
            body["message"]
                .as_str()
                .unwrap()
                .starts_with("Unsupported export format")
        );
    }

    #[tokio::test]
    async fn test_generate_patients() {
        let app = app();
        let request = json!({ "count": 4, "age_range": "pediatric", "seed": 12 });
        let response = send(&app, post_json("/api/generator/patients", request.clone())).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["count"], 4);
        let patients = body["patients"].as_array().unwrap();
        assert_eq!(patients.len(), 4);
        for patient in patients {
            assert!(patient["age"].as_u64().unwrap() <= 17);
            assert!(patient["id"].as_str().unwrap().starts_with("PT-"));
        }

        let again = body_json(send(&app, post_json("/api/generator/patients", request)).await).await;
        assert_eq!(again["patients"][0]["id"], patients[0]["id"]);

        let response = send(&app, post_json("/api/generator/patients", json!({ "count": 0 }))).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let response = send(&app, post_json("/api/generator/patients", json!({ "count": 101 }))).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_export_generated_patients() {
        let app = app();
        let generated = body_json(
            send(&app, post_json("/api/generator/patients", json!({ "count": 2, "seed": 1 }))).await,
        )
        .await;
        let payload = json!({ "patients": generated["patients"] });

        let response = send(&app, post_json("/api/generator/export?format=csv", payload.clone())).await;
        assert_eq!(response.status(), StatusCode::OK);
        let disposition = response.headers()[header::CONTENT_DISPOSITION]
            .to_str()
            .unwrap()
            .to_string();
        assert!(disposition.starts_with("attachment; filename=\"synthetic_patients_"));
        assert!(disposition.ends_with(".csv\""));
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(String::from_utf8(bytes.to_vec()).unwrap().lines().count(), 3);

        let response = send(&app, post_json("/api/generator/export", payload)).await;
        assert_eq!(response.status(), StatusCode::OK);
        let exported = body_json(response).await;
        assert_eq!(exported, generated["patients"]);

        let response = send(&app, post_json("/api/generator/export", json!({ "patients": [] }))).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["message"], "No patients to export");
    }

    #[tokio::test]
    async fn test_unknown_route_is_json_404() {
        let response = send(&app(), get("/no/such/page")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["message"], "Route /no/such/page not found");
    }

    #[tokio::test]
    async fn test_static_files_are_served() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<h1>Synthetic Patients</h1>").unwrap();

        let app = create_router(test_state(dir.path().to_path_buf(), Duration::ZERO));
        let response = send(&app, get("/index.html")).await;
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"<h1>Synthetic Patients</h1>");
    }

    #[test]
    fn test_openapi_lists_routes() {
        let doc = ApiDoc::openapi();
        for path in [
            "/health",
            "/api/patients",
            "/api/conversation",
            "/api/sessions/{id}/export",
            "/api/generator/patients",
            "/api/generator/export",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}

//! API Models
//!
//! Request and response bodies of the REST API, annotated for OpenAPI
//! generation with `utoipa`. Engine types that carry no schema of their own are
//! documented as free-form objects.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use synthetic_patients_core::feedback::{Analysis, FeedbackReport};
use synthetic_patients_core::scenario::Difficulty;
use synthetic_patients_core::{
    AgeRange, EmotionalState, ExportFormat, Greeting, PatientBatch, Persona, PersonaContext,
    Phase, ResponseCategory, Scenario, SyntheticPatient, Turn, TurnOutcome,
};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, PartialEq)]
pub struct ServiceStatus {
    #[schema(example = "running")]
    pub web_server: String,
    #[schema(example = "serving")]
    pub static_files: String,
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, PartialEq)]
pub struct HealthResponse {
    #[schema(example = "healthy")]
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub uptime_seconds: f64,
    pub version: String,
    #[schema(example = "development")]
    pub environment: String,
    pub services: ServiceStatus,
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, PartialEq)]
pub struct FeatureFlags {
    pub patient_scenarios: bool,
    pub conversation_engine: bool,
    pub educational_analytics: bool,
    pub patient_generator: bool,
    pub multimodal_ai: bool,
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, PartialEq)]
pub struct StatusResponse {
    pub application: String,
    pub version: String,
    pub description: String,
    pub features: FeatureFlags,
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, PartialEq)]
pub struct PatientSummary {
    #[schema(example = "ahmed-al-farsi")]
    pub id: String,
    #[schema(example = "Ahmed Al-Farsi")]
    pub name: String,
    pub age: u32,
    #[schema(example = "cancer-diagnosis")]
    pub scenario: String,
    pub diagnosis: String,
}

impl From<&Persona> for PatientSummary {
    fn from(persona: &Persona) -> Self {
        Self {
            id: persona.id.clone(),
            name: persona.display_name(),
            age: persona.demographics.age,
            scenario: persona.scenario.clone(),
            diagnosis: persona.medical_history.diagnosis.clone(),
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, PartialEq)]
pub struct ScenarioInfo {
    #[schema(example = "end-of-life")]
    pub id: String,
    pub name: String,
    pub description: String,
    #[schema(value_type = String, example = "high")]
    pub difficulty: Difficulty,
    pub learning_objectives: Vec<String>,
}

impl From<&Scenario> for ScenarioInfo {
    fn from(scenario: &Scenario) -> Self {
        Self {
            id: scenario.id.clone(),
            name: scenario.name.clone(),
            description: scenario.description.clone(),
            difficulty: scenario.difficulty,
            learning_objectives: scenario.learning_objectives.clone(),
        }
    }
}

#[derive(Deserialize, ToSchema)]
pub struct CreateSessionPayload {
    #[schema(example = "ahmed-al-farsi")]
    pub patient_id: String,
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, PartialEq)]
pub struct SessionCreated {
    #[schema(value_type = String, format = Uuid)]
    pub session_id: Uuid,
    #[schema(value_type = Object)]
    pub greeting: Turn,
    #[schema(value_type = Object)]
    pub context: PersonaContext,
    pub suggested_replies: Vec<String>,
    pub learning_objectives: Vec<String>,
}

impl From<Greeting> for SessionCreated {
    fn from(greeting: Greeting) -> Self {
        Self {
            session_id: greeting.session_id,
            greeting: greeting.turn,
            context: greeting.context,
            suggested_replies: greeting.suggested_replies,
            learning_objectives: greeting.learning_objectives,
        }
    }
}

/// `message` is kept loosely typed so that a missing or non-string value is
/// reported as a validation error rather than a body rejection.
#[derive(Deserialize, ToSchema)]
pub struct ConversationPayload {
    #[schema(value_type = String, format = Uuid)]
    pub session_id: Uuid,
    #[schema(value_type = String, example = "I understand this must be very difficult.")]
    pub message: Option<serde_json::Value>,
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, PartialEq)]
pub struct ConversationResponse {
    pub patient_response: String,
    #[schema(value_type = String, example = "grateful")]
    pub category: ResponseCategory,
    #[schema(value_type = String, example = "trusting")]
    pub emotional_state: EmotionalState,
    #[schema(value_type = String, example = "exploration")]
    pub phase: Phase,
    #[schema(value_type = Object)]
    pub analysis: Analysis,
    #[schema(value_type = Object)]
    pub feedback: FeedbackReport,
    pub suggestions: Vec<String>,
    #[schema(value_type = Object)]
    pub context: PersonaContext,
}

impl From<TurnOutcome> for ConversationResponse {
    fn from(outcome: TurnOutcome) -> Self {
        Self {
            patient_response: outcome.reply.text,
            category: outcome.category,
            emotional_state: outcome.context.emotional_state,
            phase: outcome.context.phase,
            analysis: outcome.analysis,
            feedback: outcome.feedback,
            suggestions: outcome.suggested_replies,
            context: outcome.context,
        }
    }
}

#[derive(Deserialize, ToSchema, Debug, Default, PartialEq)]
pub struct ExportQuery {
    /// `json` (default) or `csv`.
    #[serde(default)]
    #[schema(value_type = String, example = "csv")]
    pub format: ExportFormat,
}

fn default_patient_count() -> usize {
    3
}

#[derive(Deserialize, ToSchema, Debug, PartialEq)]
pub struct GeneratePatientsPayload {
    /// Between 1 and 100.
    #[serde(default = "default_patient_count")]
    #[schema(example = 3)]
    pub count: usize,
    /// `pediatric`, `adult`, `elderly` or `all` (default).
    #[serde(default)]
    #[schema(value_type = String, example = "adult")]
    pub age_range: AgeRange,
    /// Seed for a reproducible batch.
    pub seed: Option<u64>,
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, PartialEq)]
pub struct GeneratedPatients {
    pub generated_at: DateTime<Utc>,
    pub count: usize,
    #[schema(value_type = Vec<Object>)]
    pub patients: Vec<SyntheticPatient>,
}

impl From<PatientBatch> for GeneratedPatients {
    fn from(batch: PatientBatch) -> Self {
        Self {
            generated_at: batch.generated_at,
            count: batch.patients.len(),
            patients: batch.patients,
        }
    }
}

/// Patients previously returned by the generator, sent back for export.
#[derive(Deserialize, ToSchema, Debug)]
pub struct ExportPatientsPayload {
    #[schema(value_type = Vec<Object>)]
    pub patients: Vec<SyntheticPatient>,
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, PartialEq)]
pub struct ErrorResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use synthetic_patients_core::{PersonaStore, ScenarioCatalog};

    #[test]
    fn test_patient_summary_from_persona() {
        let persona = PersonaStore::builtin().get("maria-santos").unwrap();
        let summary = PatientSummary::from(persona.as_ref());

        assert_eq!(summary.id, "maria-santos");
        assert_eq!(summary.name, "Maria Santos");
        assert_eq!(summary.scenario, "end-of-life");
        assert_eq!(summary.age, persona.demographics.age);
    }

    #[test]
    fn test_scenario_info_serialization() {
        let catalog = ScenarioCatalog::builtin();
        let scenario = catalog.get("pediatric-abuse").unwrap();
        let json = serde_json::to_value(ScenarioInfo::from(scenario)).unwrap();

        assert_eq!(json["id"], "pediatric-abuse");
        assert_eq!(json["difficulty"], "high");
        assert_eq!(json["learning_objectives"].as_array().unwrap().len(), 4);
    }

    #[test]
    fn test_conversation_payload_accepts_any_message_value() {
        let id = "550e8400-e29b-41d4-a716-446655440000";
        let payload: ConversationPayload =
            serde_json::from_str(&format!(r#"{{"session_id": "{id}", "message": 42}}"#)).unwrap();
        assert_eq!(payload.session_id, Uuid::parse_str(id).unwrap());
        assert_eq!(payload.message, Some(serde_json::json!(42)));

        let payload: ConversationPayload =
            serde_json::from_str(&format!(r#"{{"session_id": "{id}"}}"#)).unwrap();
        assert!(payload.message.is_none());
    }

    #[test]
    fn test_invalid_session_id_is_rejected() {
        let result: Result<ConversationPayload, _> =
            serde_json::from_str(r#"{"session_id": "not-a-uuid", "message": "hi"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_export_query_format_is_tagged() {
        let query: ExportQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(query.format, ExportFormat::Json);

        let query: ExportQuery = serde_json::from_str(r#"{"format": "csv"}"#).unwrap();
        assert_eq!(query.format, ExportFormat::Csv);

        assert!(serde_json::from_str::<ExportQuery>(r#"{"format": "xml"}"#).is_err());
    }

    #[test]
    fn test_generate_payload_defaults() {
        let payload: GeneratePatientsPayload = serde_json::from_str("{}").unwrap();
        assert_eq!(
            payload,
            GeneratePatientsPayload {
                count: 3,
                age_range: AgeRange::All,
                seed: None,
            }
        );

        let payload: GeneratePatientsPayload =
            serde_json::from_str(r#"{"count": 10, "age_range": "elderly", "seed": 4}"#).unwrap();
        assert_eq!(payload.age_range, AgeRange::Elderly);
        assert_eq!(payload.seed, Some(4));

        assert!(
            serde_json::from_str::<GeneratePatientsPayload>(r#"{"age_range": "teen"}"#).is_err()
        );
    }

    #[test]
    fn test_health_response_round_trip() {
        let health = HealthResponse {
            status: "healthy".to_string(),
            timestamp: Utc::now(),
            uptime_seconds: 12.5,
            version: "0.1.0".to_string(),
            environment: "development".to_string(),
            services: ServiceStatus {
                web_server: "running".to_string(),
                static_files: "serving".to_string(),
            },
        };

        let json = serde_json::to_string(&health).unwrap();
        let deserialized: HealthResponse = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, health);
    }
}

//! Error types for the conversation core.

use thiserror::Error;

/// Recoverable failures reported back to the caller of the engine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Unknown persona or scenario identifier.
    #[error("{kind} '{id}' not found")]
    NotFound { kind: &'static str, id: String },

    /// The operation does not fit the current session lifecycle.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// The operator message was missing or not a string.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl EngineError {
    pub fn persona_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            kind: "Persona",
            id: id.into(),
        }
    }

    pub fn scenario_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            kind: "Scenario",
            id: id.into(),
        }
    }
}

/// Failures while loading a persona catalog from disk.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read persona file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse persona file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Persona '{persona_id}' references unknown scenario '{scenario}'")]
    UnknownScenario { persona_id: String, scenario: String },

    #[error("Duplicate persona id '{0}'")]
    DuplicatePersona(String),
}

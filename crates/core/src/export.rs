//! Session export as a JSON record or a CSV transcript.

use crate::session::{Session, SessionSummary, Speaker, Turn};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Transcript is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("Unsupported export format '{0}', expected 'json' or 'csv'")]
    UnknownFormat(String),
}

/// File format for exported records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Json,
    Csv,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::Csv => "text/csv; charset=utf-8",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            other => Err(ExportError::UnknownFormat(other.to_string())),
        }
    }
}

/// Transportable copy of a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub persona_id: String,
    pub persona_name: String,
    pub scenario: String,
    pub exported_at: DateTime<Utc>,
    pub turns: Vec<Turn>,
    pub summary: SessionSummary,
}

pub fn export(session: &Session, now: DateTime<Utc>) -> SessionRecord {
    let persona = session.persona();
    SessionRecord {
        persona_id: persona.id.clone(),
        persona_name: persona.display_name(),
        scenario: persona.scenario.clone(),
        exported_at: now,
        turns: session.turns().to_vec(),
        summary: session.summary(now),
    }
}

#[derive(Serialize)]
struct TranscriptRow<'a> {
    index: usize,
    speaker: &'static str,
    timestamp: String,
    phase: &'static str,
    emotional_state: &'static str,
    empathy: Option<usize>,
    informative: Option<bool>,
    triggers: String,
    text: &'a str,
}

impl SessionRecord {
    pub fn to_json_pretty(&self) -> Result<String, ExportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(raw: &str) -> Result<Self, ExportError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// One row per turn. Analysis columns are empty for persona turns and the
    /// emotional state column is empty for operator turns.
    pub fn to_csv(&self) -> Result<String, ExportError> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        for (index, turn) in self.turns.iter().enumerate() {
            let analysis = turn.analysis.as_ref();
            writer.serialize(TranscriptRow {
                index,
                speaker: match turn.speaker {
                    Speaker::Operator => "operator",
                    Speaker::Persona => "persona",
                },
                timestamp: turn.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true),
                phase: turn.phase.as_str(),
                emotional_state: turn.emotional_state.map(|s| s.as_str()).unwrap_or(""),
                empathy: analysis.map(|a| a.empathy),
                informative: analysis.map(|a| a.informative),
                triggers: analysis.map(|a| a.triggers.join("; ")).unwrap_or_default(),
                text: &turn.text,
            })?;
        }
        let bytes = writer.into_inner().map_err(|e| e.into_error())?;
        Ok(String::from_utf8(bytes)?)
    }

    pub fn render(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Json => self.to_json_pretty(),
            ExportFormat::Csv => self.to_csv(),
        }
    }

    /// `conversation_<persona-id>_<YYYY-MM-DD>.<extension>`
    pub fn file_name(&self, format: ExportFormat) -> String {
        format!(
            "conversation_{}_{}.{}",
            self.persona_id,
            self.exported_at.format("%Y-%m-%d"),
            format.extension()
        )
    }
}

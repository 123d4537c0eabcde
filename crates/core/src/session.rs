//! Session state: the ordered turn history and running metrics of one
//! consultation.

use crate::feedback::{Analysis, empathy_rating};
use crate::persona::Persona;
use crate::phase::{EmotionalState, Phase};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    Operator,
    Persona,
}

impl fmt::Display for Speaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Speaker::Operator => write!(f, "operator"),
            Speaker::Persona => write!(f, "persona"),
        }
    }
}

/// One message in the consultation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub speaker: Speaker,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    /// Phase in effect when the turn was recorded.
    pub phase: Phase,
    /// Persona turns only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emotional_state: Option<EmotionalState>,
    /// Operator turns only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<Analysis>,
}

impl Turn {
    pub fn operator(text: String, phase: Phase, analysis: Analysis, at: DateTime<Utc>) -> Self {
        Self {
            speaker: Speaker::Operator,
            text,
            timestamp: at,
            phase,
            emotional_state: None,
            analysis: Some(analysis),
        }
    }

    pub fn persona(
        text: String,
        phase: Phase,
        emotional_state: EmotionalState,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            speaker: Speaker::Persona,
            text,
            timestamp: at,
            phase,
            emotional_state: Some(emotional_state),
            analysis: None,
        }
    }
}

/// Counters updated as turns are appended.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SessionMetrics {
    pub message_count: usize,
    pub operator_messages: usize,
    /// Running mean of the empathy count over operator messages.
    pub average_empathy: f64,
}

impl SessionMetrics {
    fn record(&mut self, turn: &Turn) {
        self.message_count += 1;
        if let Some(analysis) = &turn.analysis {
            self.operator_messages += 1;
            let n = self.operator_messages as f64;
            self.average_empathy += (analysis.empathy as f64 - self.average_empathy) / n;
        }
    }
}

/// A consultation with one persona.
///
/// Created by [`crate::TurnEngine::start`] and only mutated by the engine.
#[derive(Debug, Clone)]
pub struct Session {
    id: Uuid,
    persona: Arc<Persona>,
    turns: Vec<Turn>,
    phase: Phase,
    emotional_state: EmotionalState,
    metrics: SessionMetrics,
    started_at: DateTime<Utc>,
    active: bool,
}

impl Session {
    pub(crate) fn new(persona: Arc<Persona>, started_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            persona,
            turns: Vec::new(),
            phase: Phase::Greeting,
            emotional_state: EmotionalState::Neutral,
            metrics: SessionMetrics::default(),
            started_at,
            active: true,
        }
    }

    pub(crate) fn push(&mut self, turn: Turn) {
        self.metrics.record(&turn);
        self.turns.push(turn);
    }

    pub(crate) fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
    }

    pub(crate) fn set_emotional_state(&mut self, state: EmotionalState) {
        self.emotional_state = state;
    }

    pub(crate) fn close(&mut self) {
        self.phase = Phase::Closure;
        self.active = false;
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn persona(&self) -> &Arc<Persona> {
        &self.persona
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn emotional_state(&self) -> EmotionalState {
        self.emotional_state
    }

    pub fn metrics(&self) -> &SessionMetrics {
        &self.metrics
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Computes the read-only summary as of `now`.
    pub fn summary(&self, now: DateTime<Utc>) -> SessionSummary {
        let analyses: Vec<&Analysis> = self
            .turns
            .iter()
            .filter_map(|t| t.analysis.as_ref())
            .collect();
        let average_empathy = if analyses.is_empty() {
            0.0
        } else {
            analyses.iter().map(|a| a.empathy as f64).sum::<f64>() / analyses.len() as f64
        };

        let mut phases_visited = Vec::new();
        let mut emotional_states_visited = Vec::new();
        for turn in &self.turns {
            if !phases_visited.contains(&turn.phase) {
                phases_visited.push(turn.phase);
            }
            if let Some(state) = turn.emotional_state {
                if !emotional_states_visited.contains(&state) {
                    emotional_states_visited.push(state);
                }
            }
        }

        let operator_texts = self
            .turns
            .iter()
            .filter(|t| t.speaker == Speaker::Operator)
            .map(|t| t.text.as_str());

        SessionSummary {
            session_id: self.id,
            persona_id: self.persona.id.clone(),
            persona_name: self.persona.display_name(),
            scenario: self.persona.scenario.clone(),
            exchange_count: self.turns.len() / 2,
            message_count: self.metrics.message_count,
            average_empathy,
            empathy_rating: empathy_rating(operator_texts),
            phases_visited,
            emotional_states_visited,
            current_phase: self.phase,
            current_emotional_state: self.emotional_state,
            started_at: self.started_at,
            duration_seconds: (now - self.started_at).num_seconds().max(0),
            active: self.active,
        }
    }
}

/// Aggregate view of a session for dashboards and exports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub session_id: Uuid,
    pub persona_id: String,
    pub persona_name: String,
    pub scenario: String,
    /// `floor(turns / 2)`.
    pub exchange_count: usize,
    pub message_count: usize,
    /// Mean empathy count over operator turns, 0 when there are none.
    pub average_empathy: f64,
    /// 1–10 dashboard rating.
    pub empathy_rating: f64,
    /// Distinct phases in first-seen order.
    pub phases_visited: Vec<Phase>,
    /// Distinct persona emotional states in first-seen order.
    pub emotional_states_visited: Vec<EmotionalState>,
    pub current_phase: Phase,
    pub current_emotional_state: EmotionalState,
    pub started_at: DateTime<Utc>,
    pub duration_seconds: i64,
    pub active: bool,
}

impl SessionSummary {
    /// Duration formatted as `MM:SS`.
    pub fn duration_label(&self) -> String {
        format!(
            "{:02}:{:02}",
            self.duration_seconds / 60,
            self.duration_seconds % 60
        )
    }
}

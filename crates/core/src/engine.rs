//! Turn Engine
//!
//! Owns the active [`Session`] and turns operator input into persona replies.
//! Each operator turn runs the feedback scorer, derives a
//! [`ResponseCategory`], picks a reply and advances the phase and emotional
//! state machines.
//!
//! A reply can be produced in two steps so that a caller can pause between
//! them (the "thinking" delay of the UI): [`TurnEngine::begin_turn`] records
//! the operator turn and prepares the reply, [`TurnEngine::complete_turn`]
//! appends it. A reply prepared for a session that has since been ended or
//! replaced is discarded. A reply whose [`PendingReply`] is dropped without
//! being completed is delivered at the start of the next operator turn.

use crate::error::EngineError;
use crate::events::EngineEvent;
use crate::export::{SessionRecord, export};
use crate::feedback::{Analysis, FeedbackReport, analyze};
use crate::persona::{Persona, PersonaStore};
use crate::phase::{EmotionalState, Phase};
use crate::scenario::{ScenarioCatalog, ScenarioKind};
use crate::selector::{Picker, ResponseCategory, ResponseSelector};
use crate::session::{Session, SessionSummary, Turn};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// What the UI shows next to the persona's portrait.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonaContext {
    pub name: String,
    pub age: u32,
    pub scenario: String,
    pub diagnosis: String,
    pub emotional_state: EmotionalState,
    pub phase: Phase,
    pub cultural_factors: String,
    pub primary_concerns: Vec<String>,
}

/// Result of [`TurnEngine::start`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Greeting {
    pub session_id: Uuid,
    pub turn: Turn,
    pub context: PersonaContext,
    pub suggested_replies: Vec<String>,
    pub learning_objectives: Vec<String>,
}

/// Result of one operator turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnOutcome {
    pub reply: Turn,
    pub category: ResponseCategory,
    pub analysis: Analysis,
    pub feedback: FeedbackReport,
    pub suggested_replies: Vec<String>,
    pub context: PersonaContext,
}

/// Handle to a persona reply that has been chosen but not yet appended.
///
/// The reply itself stays with the engine. Dropping the handle releases it,
/// so the next operator turn delivers it instead of being rejected.
#[derive(Debug)]
#[must_use = "a pending reply must be handed back to `complete_turn`"]
pub struct PendingReply {
    epoch: u64,
    ticket: u64,
    session_id: Uuid,
    text: String,
    held: Arc<AtomicBool>,
}

impl PendingReply {
    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

impl Drop for PendingReply {
    fn drop(&mut self) {
        self.held.store(false, Ordering::Release);
    }
}

/// The engine's side of a [`PendingReply`].
#[derive(Debug)]
struct PreparedReply {
    ticket: u64,
    held: Arc<AtomicBool>,
    session_id: Uuid,
    text: String,
    category: ResponseCategory,
    analysis: Analysis,
    next_phase: Phase,
    next_emotion: EmotionalState,
}

/// Maps a scored operator message to the persona's reaction.
///
/// Triggers win over empathy, empathy wins over informativeness. When none
/// apply the current emotional state is kept.
pub fn react(analysis: &Analysis, current: EmotionalState) -> (ResponseCategory, EmotionalState) {
    if analysis.hit_trigger() {
        (ResponseCategory::Defensive, EmotionalState::Anxious)
    } else if analysis.is_empathetic() {
        (ResponseCategory::Grateful, EmotionalState::Trusting)
    } else if analysis.informative {
        (ResponseCategory::Inquisitive, EmotionalState::Engaged)
    } else {
        (ResponseCategory::Neutral, current)
    }
}

/// Extracts the operator message from a loosely-typed request body.
pub fn operator_message(value: Option<&serde_json::Value>) -> Result<&str, EngineError> {
    match value {
        Some(serde_json::Value::String(text)) => Ok(text),
        Some(other) => Err(EngineError::InvalidInput(format!(
            "message must be a string, got {}",
            json_kind(other)
        ))),
        None => Err(EngineError::InvalidInput("message is required".to_string())),
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

/// Drives a single consultation at a time.
#[derive(Debug)]
pub struct TurnEngine {
    personas: Arc<PersonaStore>,
    scenarios: Arc<ScenarioCatalog>,
    selector: ResponseSelector,
    session: Option<Session>,
    /// Bumped whenever the session is replaced or ended; stale pending
    /// replies carry an older value.
    epoch: u64,
    tickets: u64,
    outstanding: Option<PreparedReply>,
    events: Option<mpsc::UnboundedSender<EngineEvent>>,
}

impl TurnEngine {
    pub fn new(
        personas: Arc<PersonaStore>,
        scenarios: Arc<ScenarioCatalog>,
        picker: Box<dyn Picker>,
    ) -> Self {
        Self {
            personas,
            scenarios,
            selector: ResponseSelector::new(picker),
            session: None,
            epoch: 0,
            tickets: 0,
            outstanding: None,
            events: None,
        }
    }

    /// Forwards speech and avatar events to `tx`.
    pub fn with_events(mut self, tx: mpsc::UnboundedSender<EngineEvent>) -> Self {
        self.events = Some(tx);
        self
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.session.as_ref().is_some_and(Session::is_active)
    }

    /// Starts a fresh session with `persona_id` and returns its greeting.
    ///
    /// An unknown id fails with `NotFound` and leaves the current session as
    /// it was.
    pub fn start(&mut self, persona_id: &str) -> Result<Greeting, EngineError> {
        let persona = self.personas.get(persona_id)?;
        let scenario = self.scenarios.get(&persona.scenario)?;
        let learning_objectives = scenario.learning_objectives.clone();

        if let Some(previous) = &self.session {
            debug!(session_id = %previous.id(), "Replacing previous session");
        }
        self.epoch += 1;
        self.outstanding = None;

        let now = Utc::now();
        let mut session = Session::new(persona.clone(), now);
        let text = self.selector.greeting(&persona);
        let turn = Turn::persona(text, session.phase(), session.emotional_state(), now);
        session.push(turn.clone());

        info!(
            session_id = %session.id(),
            persona_id = %persona.id,
            scenario = %persona.scenario,
            "Started consultation"
        );

        let greeting = Greeting {
            session_id: session.id(),
            context: self.context_for(&session)?,
            suggested_replies: suggestions(session.phase()),
            learning_objectives,
            turn,
        };
        self.session = Some(session);
        self.speak(&greeting.turn);
        Ok(greeting)
    }

    /// Processes one operator message and returns the persona's reply.
    pub fn submit(&mut self, operator_text: &str) -> Result<TurnOutcome, EngineError> {
        let pending = self.begin_turn(operator_text)?;
        self.complete_turn(pending).ok_or_else(|| {
            EngineError::InvalidState("reply was discarded before delivery".to_string())
        })
    }

    /// Records the operator turn and prepares the persona's reply.
    ///
    /// Fails with `InvalidState` when no session is active or when the
    /// handle for a previous reply is still held. A previous reply whose
    /// handle was dropped is appended first.
    pub fn begin_turn(&mut self, operator_text: &str) -> Result<PendingReply, EngineError> {
        if self
            .outstanding
            .as_ref()
            .is_some_and(|o| o.held.load(Ordering::Acquire))
        {
            return Err(EngineError::InvalidState(
                "the persona is still replying to the previous message".to_string(),
            ));
        }
        if let Some(abandoned) = self.outstanding.take() {
            debug!(
                session_id = %abandoned.session_id,
                ticket = abandoned.ticket,
                "Delivering reply whose caller went away"
            );
            let _ = self.deliver(abandoned);
        }

        let session = active_mut(&mut self.session)?;
        let persona = session.persona().clone();

        let text = operator_text.trim();
        let analysis = analyze(text, &persona);
        let (category, next_emotion) = react(&analysis, session.emotional_state());
        let next_phase = analysis.phase.unwrap_or(session.phase());

        session.push(Turn::operator(
            text.to_string(),
            session.phase(),
            analysis.clone(),
            Utc::now(),
        ));
        let session_id = session.id();

        debug!(
            %session_id,
            empathy = analysis.empathy,
            informative = analysis.informative,
            triggers = ?analysis.triggers,
            %category,
            "Scored operator message"
        );

        let text = self.selector.select(&persona, category);
        self.tickets += 1;
        let held = Arc::new(AtomicBool::new(true));
        self.outstanding = Some(PreparedReply {
            ticket: self.tickets,
            held: held.clone(),
            session_id,
            text: text.clone(),
            category,
            analysis,
            next_phase,
            next_emotion,
        });
        self.emit(EngineEvent::ListeningStarted);

        Ok(PendingReply {
            epoch: self.epoch,
            ticket: self.tickets,
            session_id,
            text,
            held,
        })
    }

    /// Appends a prepared reply to its session.
    ///
    /// Returns `None` and drops the reply when its session has since been
    /// ended or replaced.
    pub fn complete_turn(&mut self, pending: PendingReply) -> Option<TurnOutcome> {
        if pending.epoch != self.epoch {
            debug!(
                session_id = %pending.session_id,
                "Discarding reply for a session that is no longer current"
            );
            return None;
        }
        let Some(prepared) = self.outstanding.take_if(|o| o.ticket == pending.ticket) else {
            debug!(
                session_id = %pending.session_id,
                ticket = pending.ticket,
                "Reply was already delivered"
            );
            return None;
        };
        self.deliver(prepared)
    }

    fn deliver(&mut self, prepared: PreparedReply) -> Option<TurnOutcome> {
        let Some(session) = self.session.as_mut().filter(|s| s.is_active()) else {
            debug!(session_id = %prepared.session_id, "Discarding reply, no active session");
            return None;
        };

        let previous_emotion = session.emotional_state();
        session.set_phase(prepared.next_phase);
        session.set_emotional_state(prepared.next_emotion);

        let reply = Turn::persona(
            prepared.text,
            session.phase(),
            session.emotional_state(),
            Utc::now(),
        );
        session.push(reply.clone());

        let scenario = ScenarioKind::from_id(&session.persona().scenario);
        let phase = session.phase();
        let context = match self.session.as_ref().map(|s| self.context_for(s)) {
            Some(Ok(context)) => context,
            Some(Err(e)) => {
                warn!(error = %e, "Could not build persona context");
                return None;
            }
            None => return None,
        };

        if previous_emotion != prepared.next_emotion {
            self.emit(EngineEvent::EmotionChanged {
                from: previous_emotion,
                to: prepared.next_emotion,
            });
        }
        self.speak(&reply);

        Some(TurnOutcome {
            feedback: FeedbackReport::from_analysis(&prepared.analysis, scenario),
            suggested_replies: suggestions(phase),
            category: prepared.category,
            analysis: prepared.analysis,
            context,
            reply,
        })
    }

    /// Read-only snapshot of the current (or most recently ended) session.
    pub fn summary(&self) -> Result<SessionSummary, EngineError> {
        self.session
            .as_ref()
            .map(|s| s.summary(Utc::now()))
            .ok_or_else(|| EngineError::InvalidState("no session has been started".to_string()))
    }

    /// Ends the active session and returns its final summary.
    pub fn end(&mut self) -> Result<SessionSummary, EngineError> {
        let session = active_mut(&mut self.session)?;
        session.close();
        let summary = session.summary(Utc::now());
        self.epoch += 1;
        self.outstanding = None;

        info!(
            session_id = %summary.session_id,
            exchanges = summary.exchange_count,
            average_empathy = summary.average_empathy,
            duration = %summary.duration_label(),
            "Ended consultation"
        );
        Ok(summary)
    }

    /// Serializable record of the current (or most recently ended) session.
    pub fn export(&self) -> Result<SessionRecord, EngineError> {
        self.session
            .as_ref()
            .map(|s| export(s, Utc::now()))
            .ok_or_else(|| EngineError::InvalidState("no session has been started".to_string()))
    }

    /// Persona context for the current session.
    pub fn context(&self) -> Result<PersonaContext, EngineError> {
        let session = self
            .session
            .as_ref()
            .ok_or_else(|| EngineError::InvalidState("no session has been started".to_string()))?;
        self.context_for(session)
    }

    fn context_for(&self, session: &Session) -> Result<PersonaContext, EngineError> {
        let persona: &Persona = session.persona();
        let scenario = self.scenarios.get(&persona.scenario)?;
        Ok(PersonaContext {
            name: persona.display_name(),
            age: persona.demographics.age,
            scenario: scenario.name.clone(),
            diagnosis: persona.medical_history.diagnosis.clone(),
            emotional_state: session.emotional_state(),
            phase: session.phase(),
            cultural_factors: persona.psychosocial.cultural_factors.clone(),
            primary_concerns: persona.conversation.primary_concerns.clone(),
        })
    }

    fn speak(&self, turn: &Turn) {
        self.emit(EngineEvent::SpeakingStarted {
            text: turn.text.clone(),
            emotion: turn.emotional_state.unwrap_or_default(),
        });
        self.emit(EngineEvent::SpeakingFinished);
    }

    fn emit(&self, event: EngineEvent) {
        if let Some(tx) = &self.events {
            if tx.send(event).is_err() {
                warn!("Failed to send engine event: receiver dropped.");
            }
        }
    }
}

fn active_mut(session: &mut Option<Session>) -> Result<&mut Session, EngineError> {
    session
        .as_mut()
        .filter(|s| s.is_active())
        .ok_or_else(|| EngineError::InvalidState("no active session".to_string()))
}

fn suggestions(phase: Phase) -> Vec<String> {
    phase
        .suggested_replies()
        .iter()
        .map(|s| s.to_string())
        .collect()
}

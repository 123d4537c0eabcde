//! Synthetic Patients core
//!
//! Scripted patient personas and the turn-based consultation loop that drives
//! them: the operator (a clinician in training) types a message, the
//! [`feedback`] module scores it, the [`selector`] picks the persona's reply
//! and the [`engine::TurnEngine`] advances the conversational phase and the
//! persona's emotional state. Sessions can be exported as JSON or CSV
//! through the [`export`] module.
//!
//! The [`generator`] module builds batches of random patient records
//! (demographics, history, vital signs, insurance) for test data.

pub mod engine;
pub mod error;
pub mod events;
pub mod export;
pub mod feedback;
pub mod generator;
pub mod persona;
pub mod phase;
pub mod scenario;
pub mod selector;
pub mod session;

pub use engine::{Greeting, PendingReply, PersonaContext, TurnEngine, TurnOutcome};
pub use error::{CatalogError, EngineError};
pub use events::EngineEvent;
pub use export::{ExportError, ExportFormat, SessionRecord};
pub use generator::{AgeRange, GeneratorError, PatientBatch, PatientGenerator, SyntheticPatient};
pub use persona::{Persona, PersonaStore};
pub use phase::{EmotionalState, Phase};
pub use scenario::{Scenario, ScenarioCatalog, ScenarioKind};
pub use selector::{Picker, ResponseCategory, ResponseSelector, SeededPicker, ThreadRngPicker};
pub use session::{Session, SessionSummary, Speaker, Turn};

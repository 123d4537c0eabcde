//! Persona domain module.
//!
//! - `model`: the persona record and its nested profile sections
//! - `preset`: the personas shipped with the demo
//! - `store`: the immutable id → persona lookup the engine reads from

mod model;
mod preset;
mod store;

pub use model::{
    BeliefSystem, ConversationProfile, Demographics, MedicalHistory, Persona, PsychosocialProfile,
};
pub use preset::builtin_personas;
pub use store::PersonaStore;

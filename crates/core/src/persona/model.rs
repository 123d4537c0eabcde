use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A synthetic patient profile.
///
/// Loaded once and never mutated. Sessions hold it behind an `Arc`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Persona {
    pub id: String,
    /// Key into the scenario catalog.
    pub scenario: String,
    pub demographics: Demographics,
    pub medical_history: MedicalHistory,
    pub psychosocial: PsychosocialProfile,
    pub beliefs: BeliefSystem,
    pub conversation: ConversationProfile,
}

impl Persona {
    pub fn display_name(&self) -> String {
        format!(
            "{} {}",
            self.demographics.first_name, self.demographics.last_name
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Demographics {
    pub first_name: String,
    pub last_name: String,
    pub age: u32,
    pub gender: String,
    pub ethnicity: String,
    pub occupation: String,
    pub education: String,
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default)]
    pub residence_history: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicalHistory {
    pub chief_complaint: String,
    pub diagnosis: String,
    #[serde(default)]
    pub symptoms: Vec<String>,
    #[serde(default)]
    pub prior_treatments: Vec<String>,
    pub recommended_treatment: String,
    pub prognosis: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PsychosocialProfile {
    pub personality: String,
    pub coping_style: String,
    pub cultural_factors: String,
    pub support_system: String,
    #[serde(default)]
    pub concerns: Vec<String>,
    pub emotional_state: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeliefSystem {
    pub religious_affiliation: String,
    pub health_beliefs: String,
    pub family_values: String,
    pub life_philosophy: String,
    /// Scenario-specific views, e.g. `death_and_dying` or `addiction_views`.
    #[serde(default)]
    pub views: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationProfile {
    pub communication_style: String,
    #[serde(default)]
    pub primary_concerns: Vec<String>,
    /// Questions the persona asks when the operator is being informative.
    #[serde(default)]
    pub typical_questions: Vec<String>,
    /// Phrases that make the persona defensive when the operator uses them.
    #[serde(default)]
    pub emotional_triggers: Vec<String>,
    pub preferred_approach: String,
    /// Greetings in the persona's own voice. When empty the scenario's
    /// greeting pool is used.
    #[serde(default)]
    pub opening_lines: Vec<String>,
    /// Extra lines offered alongside the generic neutral replies.
    #[serde(default)]
    pub signature_replies: Vec<String>,
}

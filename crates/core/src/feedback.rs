//! Heuristic scoring of operator messages.
//!
//! Everything here is plain substring matching on lower-cased text. The
//! functions are pure: the same text and persona always give the same result.

use crate::persona::Persona;
use crate::phase::Phase;
use crate::scenario::ScenarioKind;
use serde::{Deserialize, Serialize};

const EMPATHY_TERMS: [&str; 6] = ["understand", "feel", "difficult", "sorry", "imagine", "support"];
const INFORMATIVE_TERMS: [&str; 4] = ["explain", "tell me about", "what", "how"];
const PATIENT_CENTERED_TERMS: [&str; 2] = ["you", "your"];

/// Empathy counts above this are treated as clearly empathetic.
pub const EMPATHY_THRESHOLD: usize = 1;

/// Snapshot of what the scorer found in one operator message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Analysis {
    /// Number of distinct empathy terms present.
    pub empathy: usize,
    pub informative: bool,
    /// Patient-centered ("you"/"your") language was used.
    pub appropriate: bool,
    /// Phase signalled by the message, `None` when no phase keyword matched.
    pub phase: Option<Phase>,
    /// Persona trigger phrases found in the message, in persona order.
    pub triggers: Vec<String>,
}

impl Analysis {
    pub fn is_empathetic(&self) -> bool {
        self.empathy > EMPATHY_THRESHOLD
    }

    pub fn hit_trigger(&self) -> bool {
        !self.triggers.is_empty()
    }
}

/// Scores `text` against the fixed vocabularies and `persona`'s triggers.
pub fn analyze(text: &str, persona: &Persona) -> Analysis {
    let lowered = text.to_lowercase();

    let empathy = EMPATHY_TERMS
        .iter()
        .filter(|term| lowered.contains(*term))
        .count();
    let informative = INFORMATIVE_TERMS.iter().any(|t| lowered.contains(t));
    let appropriate = PATIENT_CENTERED_TERMS.iter().any(|t| lowered.contains(t));
    let triggers = persona
        .conversation
        .emotional_triggers
        .iter()
        .filter(|trigger| lowered.contains(&trigger.to_lowercase()))
        .cloned()
        .collect();

    Analysis {
        empathy,
        informative,
        appropriate,
        phase: Phase::detect(&lowered),
        triggers,
    }
}

/// Coaching shown to the operator after each turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct FeedbackReport {
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    pub communication_tips: Vec<String>,
}

impl FeedbackReport {
    pub fn from_analysis(analysis: &Analysis, scenario: ScenarioKind) -> Self {
        let mut report = Self::default();

        if analysis.is_empathetic() {
            report
                .strengths
                .push("Good use of empathetic language".to_string());
        } else {
            report
                .improvements
                .push("Consider acknowledging the patient's emotions".to_string());
        }

        if analysis.informative {
            report
                .strengths
                .push("Asking appropriate questions".to_string());
        }

        if analysis.hit_trigger() {
            report
                .improvements
                .push("Be mindful of patient's emotional triggers".to_string());
            report.communication_tips.push(
                "Consider addressing patient concerns before providing information".to_string(),
            );
        }

        match scenario {
            ScenarioKind::CancerDiagnosis => report.communication_tips.push(
                "Use clear, simple language when explaining medical information".to_string(),
            ),
            ScenarioKind::EndOfLife => report
                .communication_tips
                .push("Allow for silence and emotional processing".to_string()),
            ScenarioKind::MentalHealth
            | ScenarioKind::SubstanceAbuse
            | ScenarioKind::SexualHealth
            | ScenarioKind::PediatricAbuse
            | ScenarioKind::Other => {}
        }

        report
    }
}

/// The 1–10 empathy rating shown on the session dashboard.
///
/// Starts at 5.0 and nudges up for supportive vocabulary and down for very
/// short or dismissive messages, clamped to `[1.0, 10.0]`.
pub fn empathy_rating<'a>(operator_messages: impl IntoIterator<Item = &'a str>) -> f64 {
    let mut score: f64 = 5.0;
    for message in operator_messages {
        let content = message.to_lowercase();
        let has = |a: &str, b: &str| content.contains(a) || content.contains(b);

        if has("understand", "hear") {
            score += 0.2;
        }
        if has("feel", "emotion") {
            score += 0.3;
        }
        if has("support", "help") {
            score += 0.2;
        }
        if has("family", "loved ones") {
            score += 0.2;
        }
        if content.chars().count() < 20 {
            score -= 0.1;
        }
        if has("just", "simply") {
            score -= 0.1;
        }
    }
    score.clamp(1.0, 10.0)
}

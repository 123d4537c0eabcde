//! Scenario catalog: the clinical-conversation categories personas belong to.

use crate::error::EngineError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Low,
    Medium,
    High,
}

/// A named conversation category with its learning objectives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub id: String,
    pub name: String,
    pub description: String,
    pub difficulty: Difficulty,
    pub learning_objectives: Vec<String>,
}

/// Scenario identifiers the engine has dedicated behaviour for.
///
/// Greeting pools and scenario tips are selected by matching on this rather
/// than by string keys. Unrecognised identifiers map to [`ScenarioKind::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScenarioKind {
    CancerDiagnosis,
    EndOfLife,
    MentalHealth,
    SubstanceAbuse,
    SexualHealth,
    PediatricAbuse,
    Other,
}

impl ScenarioKind {
    pub fn from_id(id: &str) -> Self {
        match id {
            "cancer-diagnosis" => Self::CancerDiagnosis,
            "end-of-life" => Self::EndOfLife,
            "mental-health" => Self::MentalHealth,
            "substance-abuse" => Self::SubstanceAbuse,
            "sexual-health" => Self::SexualHealth,
            "pediatric-abuse" => Self::PediatricAbuse,
            _ => Self::Other,
        }
    }
}

/// Immutable lookup table of scenarios, ordered by id.
#[derive(Debug, Clone, Default)]
pub struct ScenarioCatalog {
    scenarios: BTreeMap<String, Scenario>,
}

impl ScenarioCatalog {
    pub fn new(scenarios: impl IntoIterator<Item = Scenario>) -> Self {
        Self {
            scenarios: scenarios
                .into_iter()
                .map(|s| (s.id.clone(), s))
                .collect(),
        }
    }

    /// The six scenarios shipped with the demo.
    pub fn builtin() -> Self {
        Self::new([
            scenario(
                "end-of-life",
                "End-of-Life Discussions",
                "Conversations about goals of care, resuscitation preferences, and terminal diagnoses",
                Difficulty::High,
                &[
                    "Communicate terminal diagnosis with empathy",
                    "Discuss goals of care preferences",
                    "Navigate family dynamics in decision making",
                    "Address emotional responses to prognosis",
                ],
            ),
            scenario(
                "cancer-diagnosis",
                "New Cancer Diagnosis",
                "Initial cancer diagnosis delivery and treatment planning discussions",
                Difficulty::High,
                &[
                    "Deliver difficult diagnosis clearly and compassionately",
                    "Explain treatment options and prognosis",
                    "Address patient concerns and questions",
                    "Plan next steps and follow-up care",
                ],
            ),
            scenario(
                "mental-health",
                "Mental Health Assessment",
                "Sensitive conversations about depression, anxiety, and suicidal ideation",
                Difficulty::Medium,
                &[
                    "Screen for mental health conditions",
                    "Assess suicide risk appropriately",
                    "Provide supportive counseling",
                    "Make appropriate referrals",
                ],
            ),
            scenario(
                "substance-abuse",
                "Substance Use Discussions",
                "Conversations about alcohol, drug use, and addiction treatment",
                Difficulty::Medium,
                &[
                    "Conduct non-judgmental substance use screening",
                    "Motivate behavior change",
                    "Discuss treatment options",
                    "Address harm reduction strategies",
                ],
            ),
            scenario(
                "sexual-health",
                "Sexual Health Conversations",
                "Discussions about sexual behaviors, STI testing, and reproductive health",
                Difficulty::Medium,
                &[
                    "Take sexual history professionally",
                    "Discuss STI prevention and testing",
                    "Address sexual dysfunction concerns",
                    "Provide contraception counseling",
                ],
            ),
            scenario(
                "pediatric-abuse",
                "Suspected Child Abuse",
                "Sensitive conversations with parents/caregivers about suspected abuse",
                Difficulty::High,
                &[
                    "Recognize signs of potential abuse",
                    "Conduct sensitive interviews",
                    "Maintain child safety as priority",
                    "Navigate reporting requirements",
                ],
            ),
        ])
    }

    pub fn get(&self, id: &str) -> Result<&Scenario, EngineError> {
        self.scenarios
            .get(id)
            .ok_or_else(|| EngineError::scenario_not_found(id))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.scenarios.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Scenario> {
        self.scenarios.values()
    }

    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }
}

fn scenario(
    id: &str,
    name: &str,
    description: &str,
    difficulty: Difficulty,
    objectives: &[&str],
) -> Scenario {
    Scenario {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        difficulty,
        learning_objectives: objectives.iter().map(|o| o.to_string()).collect(),
    }
}

//! Persona reply selection.
//!
//! Replies are drawn uniformly at random from small fixed pools so that the
//! persona does not repeat itself mechanically. The randomness comes from a
//! [`Picker`], which tests replace with a seeded or scripted implementation.

use crate::persona::Persona;
use crate::scenario::ScenarioKind;
use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Chooses one index out of `len` candidates.
#[cfg_attr(test, mockall::automock)]
pub trait Picker: Send {
    /// Returns an index in `0..len`. `len` is never zero.
    fn pick(&mut self, len: usize) -> usize;
}

/// Uses the thread-local generator on every call.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRngPicker;

impl Picker for ThreadRngPicker {
    fn pick(&mut self, len: usize) -> usize {
        rand::rng().random_range(0..len)
    }
}

/// Deterministic picker for reproducible sessions.
#[derive(Debug, Clone)]
pub struct SeededPicker {
    rng: StdRng,
}

impl SeededPicker {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Picker for SeededPicker {
    fn pick(&mut self, len: usize) -> usize {
        self.rng.random_range(0..len)
    }
}

/// The kind of reply the persona gives, derived from the operator's message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ResponseCategory {
    #[default]
    Neutral,
    Grateful,
    Defensive,
    Inquisitive,
}

impl ResponseCategory {
    /// Parses a category name. Anything unrecognised is treated as neutral.
    pub fn parse(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "grateful" => Self::Grateful,
            "defensive" => Self::Defensive,
            "inquisitive" => Self::Inquisitive,
            _ => Self::Neutral,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Neutral => "neutral",
            Self::Grateful => "grateful",
            Self::Defensive => "defensive",
            Self::Inquisitive => "inquisitive",
        }
    }
}

impl fmt::Display for ResponseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub const NEUTRAL_REPLIES: [&str; 3] = [
    "I see. Can you tell me more about what that means for me?",
    "That's helpful to know. What should I be expecting next?",
    "I understand. What are my options at this point?",
];

pub const GRATEFUL_REPLIES: [&str; 3] = [
    "Thank you for taking the time to explain this to me.",
    "I really appreciate your honesty and patience.",
    "It means a lot that you're being so thorough with me.",
];

pub const DEFENSIVE_REPLIES: [&str; 3] = [
    "I'm not sure I'm ready to hear about that right now.",
    "This is a lot to take in. Can we slow down a bit?",
    "I need some time to think about what you're saying.",
];

/// Appended to the persona's own typical questions.
pub const GENERIC_QUESTIONS: [&str; 2] = [
    "What would you recommend if this were your family member?",
    "How much time do I have to make these decisions?",
];

const CANCER_DIAGNOSIS_GREETINGS: [&str; 3] = [
    "Hello, Doctor. Thank you for seeing me today. I've been anxious about this appointment.",
    "Good morning. Dr. Wang told me you'd be explaining more about my condition?",
    "Hi there. I appreciate you taking the time to meet with me about the surgery.",
];

const END_OF_LIFE_GREETINGS: [&str; 3] = [
    "Hello, Doctor. My family is here with me today - I hope that's okay.",
    "Good afternoon. I've been thinking a lot about what we discussed last time.",
    "Thank you for coming to see me. I know you're very busy.",
];

const MENTAL_HEALTH_GREETINGS: [&str; 3] = [
    "Hi. I'm not really sure why I'm here... my wife made this appointment.",
    "Hello. This is my first time talking to someone about... personal things.",
    "Good morning. I guess we should talk about how I've been feeling lately.",
];

const SUBSTANCE_ABUSE_GREETINGS: [&str; 3] = [
    "Hi Doctor. This is just a routine checkup, right?",
    "Hello. I filled out those forms, but some questions seemed... personal.",
    "Good morning. I hope we can keep this conversation confidential.",
];

/// Greeting lines for a scenario.
///
/// Scenarios without their own pool reuse the cancer-diagnosis greetings.
pub fn greeting_pool(kind: ScenarioKind) -> &'static [&'static str] {
    match kind {
        ScenarioKind::CancerDiagnosis => &CANCER_DIAGNOSIS_GREETINGS,
        ScenarioKind::EndOfLife => &END_OF_LIFE_GREETINGS,
        ScenarioKind::MentalHealth => &MENTAL_HEALTH_GREETINGS,
        ScenarioKind::SubstanceAbuse => &SUBSTANCE_ABUSE_GREETINGS,
        ScenarioKind::SexualHealth | ScenarioKind::PediatricAbuse | ScenarioKind::Other => {
            &CANCER_DIAGNOSIS_GREETINGS
        }
    }
}

/// Greeting lines for a persona: its own opening lines if it has any,
/// otherwise the pool of its scenario.
pub fn greeting_lines(persona: &Persona) -> Vec<String> {
    let own = &persona.conversation.opening_lines;
    if !own.is_empty() {
        return own.clone();
    }
    greeting_pool(ScenarioKind::from_id(&persona.scenario))
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// Candidate replies for `category`, in a stable order.
///
/// Neutral replies are the generic lines followed by the persona's signature
/// replies. Inquisitive replies are its typical questions followed by the
/// generic questions.
pub fn candidates(persona: &Persona, category: ResponseCategory) -> Vec<String> {
    let conversation = &persona.conversation;
    let (generic, own): (&[&str], &[String]) = match category {
        ResponseCategory::Neutral => (&NEUTRAL_REPLIES, &conversation.signature_replies),
        ResponseCategory::Grateful => (&GRATEFUL_REPLIES, &[]),
        ResponseCategory::Defensive => (&DEFENSIVE_REPLIES, &[]),
        ResponseCategory::Inquisitive => {
            return conversation
                .typical_questions
                .iter()
                .cloned()
                .chain(GENERIC_QUESTIONS.iter().map(|q| q.to_string()))
                .collect();
        }
    };
    generic
        .iter()
        .map(|s| s.to_string())
        .chain(own.iter().cloned())
        .collect()
}

/// Picks persona lines using an injected [`Picker`].
pub struct ResponseSelector {
    picker: Box<dyn Picker>,
}

impl ResponseSelector {
    pub fn new(picker: Box<dyn Picker>) -> Self {
        Self { picker }
    }

    pub fn select(&mut self, persona: &Persona, category: ResponseCategory) -> String {
        let pool = candidates(persona, category);
        self.choose(&pool).to_string()
    }

    pub fn greeting(&mut self, persona: &Persona) -> String {
        let pool = greeting_lines(persona);
        self.choose(&pool).to_string()
    }

    fn choose<'a, S: AsRef<str>>(&mut self, pool: &'a [S]) -> &'a str {
        // Pools are never empty: every category carries generic lines.
        let index = self.picker.pick(pool.len()).min(pool.len() - 1);
        pool[index].as_ref()
    }
}

impl fmt::Debug for ResponseSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResponseSelector").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persona::PersonaStore;
    use mockall::predicate::eq;

    fn persona() -> std::sync::Arc<Persona> {
        PersonaStore::builtin().get("james-wilson").unwrap()
    }

    #[test]
    fn test_parse_falls_back_to_neutral() {
        assert_eq!(ResponseCategory::parse("grateful"), ResponseCategory::Grateful);
        assert_eq!(ResponseCategory::parse(" Defensive "), ResponseCategory::Defensive);
        assert_eq!(ResponseCategory::parse("inquisitive"), ResponseCategory::Inquisitive);
        assert_eq!(ResponseCategory::parse("furious"), ResponseCategory::Neutral);
        assert_eq!(ResponseCategory::parse(""), ResponseCategory::Neutral);
    }

    #[test]
    fn test_generic_pools_have_three_lines() {
        let persona = persona();
        for category in [
            ResponseCategory::Neutral,
            ResponseCategory::Grateful,
            ResponseCategory::Defensive,
        ] {
            assert_eq!(candidates(&persona, category).len(), 3);
        }
    }

    #[test]
    fn test_inquisitive_pool_is_typical_questions_then_generic() {
        let persona = persona();
        let pool = candidates(&persona, ResponseCategory::Inquisitive);
        assert_eq!(pool.len(), persona.conversation.typical_questions.len() + 2);
        assert_eq!(pool[0], "Do I really need medication for this?");
        assert_eq!(pool[pool.len() - 2], GENERIC_QUESTIONS[0]);
        assert_eq!(pool[pool.len() - 1], GENERIC_QUESTIONS[1]);
    }

    #[test]
    fn test_select_uses_picker_index() {
        let mut picker = MockPicker::new();
        picker.expect_pick().with(eq(3)).times(1).return_const(2usize);
        let mut selector = ResponseSelector::new(Box::new(picker));

        let reply = selector.select(&persona(), ResponseCategory::Grateful);
        assert_eq!(reply, GRATEFUL_REPLIES[2]);
    }

    #[test]
    fn test_select_clamps_out_of_range_index() {
        let mut picker = MockPicker::new();
        picker.expect_pick().return_const(99usize);
        let mut selector = ResponseSelector::new(Box::new(picker));

        let reply = selector.select(&persona(), ResponseCategory::Defensive);
        assert_eq!(reply, DEFENSIVE_REPLIES[2]);
    }

    #[test]
    fn test_greeting_pools_and_fallback() {
        assert_eq!(greeting_pool(ScenarioKind::EndOfLife), &END_OF_LIFE_GREETINGS);
        assert_eq!(
            greeting_pool(ScenarioKind::PediatricAbuse),
            &CANCER_DIAGNOSIS_GREETINGS
        );
        assert_eq!(greeting_pool(ScenarioKind::Other), &CANCER_DIAGNOSIS_GREETINGS);
    }

    #[test]
    fn test_persona_opening_lines_replace_scenario_pool() {
        let store = PersonaStore::builtin();
        let robert = store.get("robert-thompson").unwrap();
        let lines = greeting_lines(&robert);
        assert_eq!(lines, robert.conversation.opening_lines);
        assert!(lines[0].starts_with("Doc, I appreciate you being straight with me."));

        let maria = store.get("maria-santos").unwrap();
        assert_eq!(greeting_lines(&maria), END_OF_LIFE_GREETINGS.map(String::from));

        let mut selector = ResponseSelector::new(Box::new(ThreadRngPicker));
        assert_eq!(selector.greeting(&robert), lines[0]);
    }

    #[test]
    fn test_signature_replies_extend_neutral_pool() {
        let sarah = PersonaStore::builtin().get("sarah-martinez").unwrap();
        let pool = candidates(&sarah, ResponseCategory::Neutral);
        assert_eq!(pool.len(), NEUTRAL_REPLIES.len() + 6);
        assert_eq!(pool[0], NEUTRAL_REPLIES[0]);
        assert_eq!(
            pool[NEUTRAL_REPLIES.len() + 3],
            "What about having children? Will the treatment affect my fertility?"
        );
        assert_eq!(candidates(&sarah, ResponseCategory::Grateful).len(), 3);

        let mut picker = MockPicker::new();
        picker.expect_pick().with(eq(9)).times(1).return_const(8usize);
        let mut selector = ResponseSelector::new(Box::new(picker));
        assert_eq!(
            selector.select(&sarah, ResponseCategory::Neutral),
            sarah.conversation.signature_replies[5]
        );
    }

    #[test]
    fn test_seeded_pickers_agree() {
        let mut a = ResponseSelector::new(Box::new(SeededPicker::new(42)));
        let mut b = ResponseSelector::new(Box::new(SeededPicker::new(42)));
        let persona = persona();
        for _ in 0..10 {
            assert_eq!(
                a.select(&persona, ResponseCategory::Inquisitive),
                b.select(&persona, ResponseCategory::Inquisitive)
            );
        }
    }

    #[test]
    fn test_thread_rng_stays_in_pool() {
        let mut selector = ResponseSelector::new(Box::new(ThreadRngPicker));
        let persona = persona();
        for _ in 0..20 {
            let reply = selector.select(&persona, ResponseCategory::Neutral);
            assert!(NEUTRAL_REPLIES.contains(&reply.as_str()));
        }
    }
}

//! Conversational phase and persona emotional state.
//!
//! Both are replaced wholesale after every operator turn. Their history only
//! survives in the per-turn snapshots kept by the session.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse stage of the consultation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Greeting,
    Exploration,
    Information,
    Decision,
    /// Only entered when the session is explicitly ended.
    Closure,
}

/// Keyword sets checked against lower-cased operator text, in priority order.
const PHASE_KEYWORDS: [(Phase, &[&str]); 4] = [
    (Phase::Greeting, &["hello", "hi", "good morning"]),
    (Phase::Information, &["tell me", "explain", "what"]),
    (Phase::Decision, &["decide", "choice", "options"]),
    (Phase::Exploration, &["feel", "understand", "support"]),
];

impl Phase {
    /// Returns the phase signalled by `lowercase_text`, if any.
    ///
    /// Matching is plain substring search, so "hi" also fires inside words
    /// such as "this". The caller keeps its current phase on `None`.
    pub fn detect(lowercase_text: &str) -> Option<Phase> {
        PHASE_KEYWORDS
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|k| lowercase_text.contains(k)))
            .map(|(phase, _)| *phase)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Greeting => "greeting",
            Self::Exploration => "exploration",
            Self::Information => "information",
            Self::Decision => "decision",
            Self::Closure => "closure",
        }
    }

    /// Openers the operator could use next, shown as clickable hints.
    pub fn suggested_replies(&self) -> &'static [&'static str] {
        match self {
            Self::Greeting => &[
                "Hello, how are you feeling today?",
                "Thank you for coming in. What brings you here today?",
                "I'm glad we have this time to talk. How can I help you?",
            ],
            Self::Exploration => &[
                "How are you feeling about all of this?",
                "What's most important to you as we think about next steps?",
                "Who else is involved in helping you with these decisions?",
            ],
            Self::Decision => &[
                "What are your thoughts about the treatment options?",
                "What factors are most important to you in making this decision?",
                "How much time would you like to make this decision?",
            ],
            Self::Information | Self::Closure => &[
                "Can you tell me more about your concerns?",
                "What questions do you have about your condition?",
                "What would be most helpful for you to know right now?",
            ],
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the persona currently feels towards the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EmotionalState {
    #[default]
    Neutral,
    Anxious,
    Trusting,
    Engaged,
}

impl EmotionalState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Neutral => "neutral",
            Self::Anxious => "anxious",
            Self::Trusting => "trusting",
            Self::Engaged => "engaged",
        }
    }
}

impl fmt::Display for EmotionalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_phase_is_greeting() {
        assert_eq!(Phase::default(), Phase::Greeting);
        assert_eq!(EmotionalState::default(), EmotionalState::Neutral);
    }

    #[test]
    fn test_detect_follows_priority_order() {
        // Greeting keywords win over everything else.
        assert_eq!(
            Phase::detect("hello, can you explain your options?"),
            Some(Phase::Greeting)
        );
        // Information beats decision and exploration.
        assert_eq!(
            Phase::detect("what options do you feel good about"),
            Some(Phase::Information)
        );
        assert_eq!(Phase::detect("we need to decide soon"), Some(Phase::Decision));
        assert_eq!(Phase::detect("we will support you"), Some(Phase::Exploration));
    }

    #[test]
    fn test_detect_is_substring_based() {
        // "hi" inside "this" still counts as a greeting keyword.
        assert_eq!(Phase::detect("this is hard"), Some(Phase::Greeting));
    }

    #[test]
    fn test_detect_none_without_keywords() {
        assert_eq!(Phase::detect(""), None);
        assert_eq!(Phase::detect("okay"), None);
    }

    #[test]
    fn test_closure_is_never_detected() {
        for text in ["goodbye", "take care", "see you next week", "we are done"] {
            assert_ne!(Phase::detect(text), Some(Phase::Closure));
        }
    }

    #[test]
    fn test_suggested_replies_closure_falls_back_to_information() {
        assert_eq!(
            Phase::Closure.suggested_replies(),
            Phase::Information.suggested_replies()
        );
        assert_eq!(Phase::Greeting.suggested_replies().len(), 3);
    }

    #[test]
    fn test_serialization_is_snake_case() {
        assert_eq!(
            serde_json::to_string(&Phase::Information).unwrap(),
            "\"information\""
        );
        assert_eq!(
            serde_json::to_string(&EmotionalState::Trusting).unwrap(),
            "\"trusting\""
        );
        let parsed: Phase = serde_json::from_str("\"decision\"").unwrap();
        assert_eq!(parsed, Phase::Decision);
    }

    #[test]
    fn test_display() {
        assert_eq!(Phase::Exploration.to_string(), "exploration");
        assert_eq!(EmotionalState::Anxious.to_string(), "anxious");
    }
}

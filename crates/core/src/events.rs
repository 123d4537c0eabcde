use crate::phase::EmotionalState;

/// Events the engine emits for downstream speech and avatar consumers.
///
/// The engine never produces audio or animation itself. A runtime that wants
/// to drive text-to-speech or an animated avatar subscribes to these through
/// the channel passed to [`crate::TurnEngine::with_events`].
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// The persona is about to say `text` in the given emotional state.
    SpeakingStarted {
        text: String,
        emotion: EmotionalState,
    },
    /// The persona finished its line.
    SpeakingFinished,
    /// The operator has the floor; avatars should switch to listening.
    ListeningStarted,
    /// The persona's emotional state changed after an operator turn.
    EmotionChanged {
        from: EmotionalState,
        to: EmotionalState,
    },
}

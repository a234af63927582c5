use crate::error::SessionError;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum RecordingState {
    #[default]
    Idle,
    Recording,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordingEvent {
    /// User pressed "start"; guarded by `check_start`
    Start,
    /// One timer period elapsed
    Tick,
    /// User pressed "stop"
    Stop,
    /// Timer reached the hard cap
    LimitReached,
}

/// Why a recording ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    User,
    LimitReached,
    QuestionChanged,
    Teardown,
}

impl StopReason {
    pub fn event(self) -> RecordingEvent {
        match self {
            Self::LimitReached => RecordingEvent::LimitReached,
            _ => RecordingEvent::Stop,
        }
    }
}

/// Every legal transition; anything else is ignored
pub const TRANSITIONS: &[(RecordingState, RecordingEvent, RecordingState)] = &[
    (RecordingState::Idle, RecordingEvent::Start, RecordingState::Recording),
    (RecordingState::Recording, RecordingEvent::Tick, RecordingState::Recording),
    (RecordingState::Recording, RecordingEvent::Stop, RecordingState::Idle),
    (RecordingState::Recording, RecordingEvent::LimitReached, RecordingState::Idle),
];

pub fn next_state(from: RecordingState, event: RecordingEvent) -> Option<RecordingState> {
    TRANSITIONS
        .iter()
        .find(|(f, e, _)| *f == from && *e == event)
        .map(|&(_, _, to)| to)
}

/// Guard for `Idle → Recording`
pub fn check_start(current_question: &str, engine_available: bool) -> Result<(), SessionError> {
    if current_question.trim().is_empty() {
        return Err(SessionError::validation("Please get a question first"));
    }
    if !engine_available {
        return Err(SessionError::EngineUnavailable);
    }
    Ok(())
}

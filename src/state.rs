//! Shared session state
//!
//! `SessionStore` is the one mutable object shared by every component. Reads
//! are open to anyone through snapshots; writes go through a `StateHandle`
//! bound to a single `Writer`, and each `StateAction` declares which writer
//! owns the fields it touches. A handle refuses actions owned by someone else.

use crate::emotion::EmotionLabel;
use serde::Serialize;
use std::sync::{Arc, RwLock};
use tracing::{debug, error};

/// Server-side interview record id
pub type InterviewId = i64;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SessionState {
    pub is_recording: bool,
    /// Only meaningful while `is_recording` is true
    pub recording_seconds: u32,
    pub current_question: String,
    pub current_emotion: EmotionLabel,
    /// Percentage in [0, 100]
    pub current_emotion_confidence: f32,
    pub question_count: u32,
    pub current_interview_id: Option<InterviewId>,
}

/// Components allowed to write session state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Writer {
    /// Recording state machine: recording flag, timer, current question
    Recorder,
    /// Submission workflow: interview id
    Submission,
    /// Emotion sampling loop: current emotion and confidence
    Sampler,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StateAction {
    QuestionLoaded(String),
    RecordingStarted,
    RecordingTicked,
    RecordingStopped,
    InterviewAssigned(InterviewId),
    EmotionSampled {
        emotion: EmotionLabel,
        confidence: f32,
    },
}

impl StateAction {
    pub fn owner(&self) -> Writer {
        match self {
            Self::QuestionLoaded(_)
            | Self::RecordingStarted
            | Self::RecordingTicked
            | Self::RecordingStopped => Writer::Recorder,
            Self::InterviewAssigned(_) => Writer::Submission,
            Self::EmotionSampled { .. } => Writer::Sampler,
        }
    }

    fn apply(self, state: &mut SessionState) {
        match self {
            Self::QuestionLoaded(question) => {
                state.current_question = question;
                state.question_count += 1;
            }
            Self::RecordingStarted => {
                state.is_recording = true;
                state.recording_seconds = 0;
            }
            Self::RecordingTicked => {
                if state.is_recording {
                    state.recording_seconds += 1;
                }
            }
            Self::RecordingStopped => {
                state.is_recording = false;
            }
            Self::InterviewAssigned(id) => {
                state.current_interview_id = Some(id);
            }
            Self::EmotionSampled {
                emotion,
                confidence,
            } => {
                state.current_emotion = emotion;
                state.current_emotion_confidence = confidence.clamp(0.0, 100.0);
            }
        }
    }
}

#[derive(Clone, Default)]
pub struct SessionStore {
    state: Arc<RwLock<SessionState>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> SessionState {
        self.state.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Write access for one component
    pub fn handle(&self, writer: Writer) -> StateHandle {
        StateHandle {
            writer,
            store: self.clone(),
        }
    }
}

#[derive(Clone)]
pub struct StateHandle {
    writer: Writer,
    store: SessionStore,
}

impl StateHandle {
    pub fn writer(&self) -> Writer {
        self.writer
    }

    pub fn snapshot(&self) -> SessionState {
        self.store.snapshot()
    }

    /// Apply an action owned by this handle's writer and return the new state.
    ///
    /// Returns `None` (state untouched) if the action belongs to another writer.
    pub fn dispatch(&self, action: StateAction) -> Option<SessionState> {
        if action.owner() != self.writer {
            error!(
                "{:?} attempted to dispatch {:?}, which is owned by {:?}",
                self.writer,
                action,
                action.owner()
            );
            return None;
        }

        debug!("{:?} dispatch {:?}", self.writer, action);
        let mut state = self.store.state.write().unwrap_or_else(|e| e.into_inner());
        action.apply(&mut state);
        Some(state.clone())
    }
}

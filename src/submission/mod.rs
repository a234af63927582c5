//! Answer submission → scored feedback

use crate::api::{AnswerSubmission, FeedbackResult, InterviewApi};
use crate::emotion::EmotionLabel;
use crate::error::SessionError;
use crate::state::{StateAction, StateHandle, Writer};
use crate::toast::Toaster;
use crate::ui::{ring_offset, submit_control, FeedbackView, Ui, IDLE_TRANSCRIPT};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

/// Client-side checks run before any request is made
pub fn validate_answer(transcript: &str, min_chars: usize) -> Result<(), SessionError> {
    let answer = transcript.trim();
    if answer.is_empty() || answer == IDLE_TRANSCRIPT {
        return Err(SessionError::validation("Please record an answer first"));
    }
    if answer.chars().count() <= min_chars {
        return Err(SessionError::validation(
            "Answer is too short. Please provide a more detailed response.",
        ));
    }
    Ok(())
}

pub struct SubmissionWorkflow {
    api: Arc<dyn InterviewApi>,
    state: StateHandle,
    ui: Ui,
    toaster: Toaster,
    min_chars: usize,
    in_flight: AtomicBool,
}

impl SubmissionWorkflow {
    pub fn new(
        api: Arc<dyn InterviewApi>,
        state: StateHandle,
        ui: Ui,
        toaster: Toaster,
        min_chars: usize,
    ) -> Self {
        debug_assert_eq!(state.writer(), Writer::Submission);
        Self {
            api,
            state,
            ui,
            toaster,
            min_chars,
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    pub async fn submit(
        &self,
        question: &str,
        transcript: &str,
        emotion: EmotionLabel,
        confidence: f32,
    ) -> Result<FeedbackResult, SessionError> {
        if let Err(e) = validate_answer(transcript, self.min_chars) {
            self.toaster.show(e.toast_kind(), e.to_string());
            return Err(e);
        }
        let Some(_in_flight) = InFlight::acquire(&self.in_flight) else {
            let e = SessionError::validation("Submission already in progress");
            self.toaster.show(e.toast_kind(), e.to_string());
            return Err(e);
        };

        let before = self.state.snapshot();
        let submission = AnswerSubmission {
            question: question.to_string(),
            answer: transcript.trim().to_string(),
            emotion,
            emotion_confidence: confidence,
            interview_id: before.current_interview_id,
        };

        let mut busy = self.ui.busy(submit_control);
        let result = self.api.submit_answer(&submission).await;

        // The page may have moved on while the request was out
        let after = self.state.snapshot();
        let stale = after.question_count != before.question_count;
        if stale || after.is_recording {
            busy.restore_enabled(false);
        }
        drop(busy);

        match result {
            Ok(feedback) => {
                info!(
                    "Interview {} scored {} (semantic {}, voice {})",
                    feedback.interview_id,
                    feedback.score,
                    feedback.semantic_score,
                    feedback.voice_score
                );
                self.state
                    .dispatch(StateAction::InterviewAssigned(feedback.interview_id));

                if stale {
                    info!("Question changed during submission, not showing feedback");
                    self.toaster.info("Previous answer submitted");
                    return Ok(feedback);
                }

                let view = FeedbackView {
                    score: feedback.score,
                    semantic_score: feedback.semantic_score,
                    voice_score: feedback.voice_score,
                    feedback: feedback.feedback.clone(),
                    ring_offset: ring_offset(feedback.score),
                };
                self.ui.update(|ui| ui.feedback = Some(view));
                self.toaster.success("Answer submitted successfully!");
                Ok(feedback)
            }
            Err(e) => {
                warn!("Submission failed: {}", e);
                let message = match &e {
                    SessionError::ServerRejection(msg) => msg.clone(),
                    other => format!("Failed to submit answer: {}", other),
                };
                self.toaster.error(message);
                Err(e)
            }
        }
    }
}

/// Marks a submission as in flight until dropped, including when the
/// submitting future is cancelled mid-request
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        if flag.swap(true, Ordering::SeqCst) {
            None
        } else {
            Some(Self(flag))
        }
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_answer() {
        assert!(validate_answer("", 10).is_err());
        assert!(validate_answer("   ", 10).is_err());
        assert!(validate_answer(IDLE_TRANSCRIPT, 10).is_err());
        assert!(validate_answer("ten chars!", 10).is_err());
        assert!(validate_answer("eleven char", 10).is_ok());
    }

    #[test]
    fn test_in_flight_clears_on_drop() {
        let flag = AtomicBool::new(false);
        let first = InFlight::acquire(&flag);
        assert!(first.is_some());
        assert!(InFlight::acquire(&flag).is_none());
        drop(first);
        assert!(!flag.load(Ordering::SeqCst));
        assert!(InFlight::acquire(&flag).is_some());
    }
}

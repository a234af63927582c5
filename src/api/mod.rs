//! Remote interview services
//!
//! The question bank, emotion classifier, answer scorer and resume analyzer
//! are opaque remote endpoints. `InterviewApi` is the seam the workflows talk
//! to; `HttpInterviewApi` is the production implementation.

mod client;
pub mod messages;

pub use client::HttpInterviewApi;
pub use messages::AnswerSubmission;

use crate::emotion::EmotionLabel;
use crate::error::SessionError;
use crate::resume::ResumeFile;
use crate::state::InterviewId;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EmotionSample {
    pub emotion: EmotionLabel,
    pub confidence: f32,
}

/// Scored evaluation of one answer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedbackResult {
    pub interview_id: InterviewId,
    pub score: f64,
    pub semantic_score: f64,
    pub voice_score: f64,
    pub feedback: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResumeAnalysis {
    pub score: f64,
    pub experience_years: u32,
    pub skills: Vec<String>,
    pub suggestions: Vec<String>,
}

#[async_trait::async_trait]
pub trait InterviewApi: Send + Sync {
    async fn fetch_question(&self) -> Result<String, SessionError>;

    /// Classify one frame (a base64 data URL)
    async fn classify_emotion(
        &self,
        image: String,
        interview_id: Option<InterviewId>,
    ) -> Result<EmotionSample, SessionError>;

    async fn submit_answer(
        &self,
        submission: &AnswerSubmission,
    ) -> Result<FeedbackResult, SessionError>;

    async fn analyze_resume(&self, file: &ResumeFile) -> Result<ResumeAnalysis, SessionError>;
}

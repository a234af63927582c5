use crate::emotion::EmotionLabel;
use crate::state::InterviewId;
use serde::{Deserialize, Serialize};

/// Response of `GET question`
#[derive(Debug, Serialize, Deserialize)]
pub struct QuestionResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Frame sent to the emotion classifier
#[derive(Debug, Serialize, Deserialize)]
pub struct EmotionRequest {
    /// Base64 data URL of a JPEG frame
    pub image: String,
    pub interview_id: Option<InterviewId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmotionResponse {
    pub emotion: EmotionLabel,
    pub confidence: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerSubmission {
    pub question: String,
    pub answer: String,
    pub emotion: EmotionLabel,
    pub emotion_confidence: f32,
    /// Interview created by an earlier submission in this session
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interview_id: Option<InterviewId>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub success: bool,
    #[serde(default)]
    pub interview_id: Option<InterviewId>,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub semantic_score: Option<f64>,
    #[serde(default)]
    pub voice_score: Option<f64>,
    #[serde(default)]
    pub feedback: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ResumeResponse {
    pub success: bool,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub experience_years: Option<u32>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub suggestions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

use super::messages::{
    AnswerSubmission, EmotionRequest, EmotionResponse, QuestionResponse, ResumeResponse,
    SubmitResponse,
};
use super::{EmotionSample, FeedbackResult, InterviewApi, ResumeAnalysis};
use crate::config::ApiConfig;
use crate::error::SessionError;
use crate::resume::ResumeFile;
use crate::state::InterviewId;
use anyhow::{Context, Result};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Multipart field the resume analyzer reads the upload from
const RESUME_FIELD: &str = "resume";

pub struct HttpInterviewApi {
    client: Client,
    config: ApiConfig,
}

impl HttpInterviewApi {
    pub fn new(config: ApiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        info!("Interview API at {}", config.base_url);

        Ok(Self { client, config })
    }

    fn url(&self, path: &str) -> String {
        self.config.url(path)
    }
}

/// Parse a JSON body regardless of status; error bodies carry `success:false`
async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, SessionError> {
    let status = response.status();
    let text = response.text().await?;
    debug!("Response status={} body_len={}", status, text.len());

    serde_json::from_str(&text).map_err(|e| {
        if status.is_success() {
            SessionError::Network(format!("Invalid response: {}", e))
        } else {
            SessionError::Network(format!("Server returned status {}", status))
        }
    })
}

fn rejection(error: Option<String>, fallback: &str) -> SessionError {
    SessionError::ServerRejection(error.unwrap_or_else(|| fallback.to_string()))
}

#[async_trait::async_trait]
impl InterviewApi for HttpInterviewApi {
    async fn fetch_question(&self) -> Result<String, SessionError> {
        let response = self
            .client
            .get(self.url(&self.config.question_path))
            .send()
            .await?;
        let body: QuestionResponse = read_json(response).await?;

        match body {
            QuestionResponse {
                success: true,
                question: Some(question),
                ..
            } => Ok(question),
            QuestionResponse { error, .. } => Err(rejection(error, "Failed to load question")),
        }
    }

    async fn classify_emotion(
        &self,
        image: String,
        interview_id: Option<InterviewId>,
    ) -> Result<EmotionSample, SessionError> {
        let response = self
            .client
            .post(self.url(&self.config.emotion_path))
            .json(&EmotionRequest {
                image,
                interview_id,
            })
            .send()
            .await?;
        let body: EmotionResponse = read_json(response).await?;

        if let Some(error) = &body.error {
            warn!("Emotion classifier reported: {}", error);
        }

        Ok(EmotionSample {
            emotion: body.emotion,
            confidence: body.confidence,
        })
    }

    async fn submit_answer(
        &self,
        submission: &AnswerSubmission,
    ) -> Result<FeedbackResult, SessionError> {
        info!("Submitting answer ({} chars)", submission.answer.len());

        let response = self
            .client
            .post(self.url(&self.config.submit_path))
            .json(submission)
            .send()
            .await?;
        let body: SubmitResponse = read_json(response).await?;

        match body {
            SubmitResponse {
                success: true,
                interview_id: Some(interview_id),
                score: Some(score),
                semantic_score,
                voice_score,
                feedback,
                ..
            } => Ok(FeedbackResult {
                interview_id,
                score,
                semantic_score: semantic_score.unwrap_or_default(),
                voice_score: voice_score.unwrap_or_default(),
                feedback: feedback.unwrap_or_default(),
            }),
            SubmitResponse { error, .. } => Err(rejection(error, "Failed to submit answer")),
        }
    }

    async fn analyze_resume(&self, file: &ResumeFile) -> Result<ResumeAnalysis, SessionError> {
        info!("Uploading resume {} ({} bytes)", file.name, file.data.len());

        let part = Part::bytes(file.data.clone())
            .file_name(file.name.clone())
            .mime_str(file.content_type())?;
        let form = Form::new().part(RESUME_FIELD, part);

        let response = self
            .client
            .post(self.url(&self.config.resume_path))
            .multipart(form)
            .send()
            .await?;
        let body: ResumeResponse = read_json(response).await?;

        match body {
            ResumeResponse {
                success: true,
                score: Some(score),
                experience_years,
                skills,
                suggestions,
                ..
            } => Ok(ResumeAnalysis {
                score,
                experience_years: experience_years.unwrap_or_default(),
                skills,
                suggestions,
            }),
            ResumeResponse { error, .. } => Err(rejection(error, "Failed to analyze resume")),
        }
    }
}

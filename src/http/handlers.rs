use super::scoring;
use super::state::{AnswerRecord, BackendState, EmotionLog, InterviewRecord};
use crate::api::messages::{
    AnswerSubmission, EmotionRequest, EmotionResponse, QuestionResponse, ResumeResponse,
    SubmitResponse,
};
use crate::emotion::EmotionLabel;
use crate::resume::{ResumeFile, ResumeFormat};
use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use chrono::Utc;
use tracing::{debug, info, warn};

/// Field of the multipart upload carrying the resume
const RESUME_FIELD: &str = "resume";

/// Stand-in classifier output, cycled per sample
const EMOTION_PATTERN: &[(EmotionLabel, f32)] = &[
    (EmotionLabel::Neutral, 72.0),
    (EmotionLabel::Confident, 81.0),
    (EmotionLabel::Happy, 77.0),
    (EmotionLabel::Confident, 85.0),
    (EmotionLabel::Nervous, 64.0),
    (EmotionLabel::Neutral, 70.0),
];

fn resume_error(status: StatusCode, message: &str) -> axum::response::Response {
    (
        status,
        Json(ResumeResponse {
            success: false,
            score: None,
            experience_years: None,
            skills: Vec::new(),
            suggestions: Vec::new(),
            error: Some(message.to_string()),
        }),
    )
        .into_response()
}

/// GET /api/get_question
pub async fn get_question(State(state): State<BackendState>) -> impl IntoResponse {
    let question = state.next_question();
    debug!("Serving question: {}", question);
    Json(QuestionResponse {
        success: true,
        question: Some(question.to_string()),
        error: None,
    })
}

/// POST /process_emotion
pub async fn process_emotion(
    State(state): State<BackendState>,
    Json(req): Json<EmotionRequest>,
) -> impl IntoResponse {
    if !req.image.starts_with("data:image/") {
        warn!("Emotion frame is not a data URL");
        return (
            StatusCode::BAD_REQUEST,
            Json(EmotionResponse {
                emotion: EmotionLabel::Neutral,
                confidence: 50.0,
                error: Some("Invalid image data".to_string()),
            }),
        );
    }

    let (emotion, confidence) = EMOTION_PATTERN[state.next_sample() % EMOTION_PATTERN.len()];

    if let Some(interview_id) = req.interview_id {
        state.emotion_logs.write().await.push(EmotionLog {
            interview_id,
            emotion,
            confidence,
            date: Utc::now(),
        });
    }

    (
        StatusCode::OK,
        Json(EmotionResponse {
            emotion,
            confidence,
            error: None,
        }),
    )
}

/// POST /submit_answer
pub async fn submit_answer(
    State(state): State<BackendState>,
    Json(req): Json<AnswerSubmission>,
) -> impl IntoResponse {
    if req.question.trim().is_empty() || req.answer.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(SubmitResponse {
                success: false,
                interview_id: None,
                score: None,
                semantic_score: None,
                voice_score: None,
                feedback: None,
                error: Some("Question and answer are required".to_string()),
            }),
        );
    }

    let semantic = scoring::semantic_score(&req.answer, &req.question);
    let voice = scoring::voice_score(&req.answer);
    let score = scoring::fuse_scores(semantic, voice, req.emotion, req.emotion_confidence);
    let feedback = scoring::feedback(score, req.emotion);

    let mut interviews = state.interviews.write().await;
    let interview_id = match req.interview_id {
        Some(id) if interviews.contains_key(&id) => id,
        _ => state.allocate_interview_id(),
    };
    let record = interviews
        .entry(interview_id)
        .or_insert_with(|| InterviewRecord::new(interview_id));
    record.answers.push(AnswerRecord {
        question: req.question,
        answer: req.answer,
        score,
        emotion: req.emotion,
        feedback: feedback.clone(),
        date: Utc::now(),
    });
    let answered = record.answers.len();
    drop(interviews);

    info!(
        "Interview {} answer #{} scored {} (semantic {}, voice {})",
        interview_id, answered, score, semantic, voice
    );

    (
        StatusCode::OK,
        Json(SubmitResponse {
            success: true,
            interview_id: Some(interview_id),
            score: Some(score as f64),
            semantic_score: Some(semantic as f64),
            voice_score: Some(voice as f64),
            feedback: Some(feedback),
            error: None,
        }),
    )
}

/// POST /upload_resume
pub async fn upload_resume(mut multipart: Multipart) -> axum::response::Response {
    let mut upload = None;
    loop {
        match multipart.next_field().await {
            Ok(Some(field)) => {
                if field.name() != Some(RESUME_FIELD) {
                    continue;
                }
                let name = field.file_name().unwrap_or_default().to_string();
                let mime = field.content_type().map(str::to_string);
                match field.bytes().await {
                    Ok(data) => {
                        upload = Some(ResumeFile::new(name, mime.as_deref(), data.to_vec()));
                        break;
                    }
                    Err(e) => {
                        warn!("Failed to read resume upload: {}", e);
                        return resume_error(StatusCode::BAD_REQUEST, "Failed to read upload");
                    }
                }
            }
            Ok(None) => break,
            Err(e) => {
                warn!("Malformed multipart body: {}", e);
                return resume_error(StatusCode::BAD_REQUEST, "No file uploaded");
            }
        }
    }

    let Some(file) = upload else {
        return resume_error(StatusCode::BAD_REQUEST, "No file uploaded");
    };
    if file.name.is_empty() {
        return resume_error(StatusCode::BAD_REQUEST, "No file selected");
    }
    let Some(format) = file.format() else {
        return resume_error(
            StatusCode::BAD_REQUEST,
            "Only PDF and DOCX files are supported",
        );
    };

    // Text extraction is out of scope; readable runs of the raw bytes are
    // enough for keyword spotting.
    let text = String::from_utf8_lossy(&file.data);
    let skills = scoring::detect_skills(&text);
    let experience_years = scoring::detect_experience_years(&text);
    let suggestions = scoring::resume_suggestions(&text, &skills);
    let score = scoring::resume_score(&text, &skills, experience_years);

    info!(
        "Analyzed {} resume {}: score {}, {} skills",
        match format {
            ResumeFormat::Pdf => "PDF",
            ResumeFormat::Docx => "DOCX",
        },
        file.name,
        score,
        skills.len()
    );

    (
        StatusCode::OK,
        Json(ResumeResponse {
            success: true,
            score: Some(score as f64),
            experience_years: Some(experience_years),
            skills,
            suggestions,
            error: None,
        }),
    )
        .into_response()
}

/// GET /health
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answer(question: &str, interview_id: Option<i64>) -> AnswerSubmission {
        AnswerSubmission {
            question: question.to_string(),
            answer: "I plan my week around the hardest problem first".to_string(),
            emotion: EmotionLabel::Confident,
            emotion_confidence: 80.0,
            interview_id,
        }
    }

    #[tokio::test]
    async fn test_answers_accumulate_under_one_interview() {
        let state = BackendState::new();

        submit_answer(State(state.clone()), Json(answer("How do you prioritize?", None))).await;
        submit_answer(
            State(state.clone()),
            Json(answer("How do you handle stress?", Some(1))),
        )
        .await;

        let interviews = state.interviews.read().await;
        assert_eq!(interviews.len(), 1);
        let record = &interviews[&1];
        let questions: Vec<&str> = record.answers.iter().map(|a| a.question.as_str()).collect();
        assert_eq!(
            questions,
            vec!["How do you prioritize?", "How do you handle stress?"]
        );
        assert!(record.average_score().is_some());
    }

    #[tokio::test]
    async fn test_unknown_interview_id_starts_a_new_interview() {
        let state = BackendState::new();

        submit_answer(State(state.clone()), Json(answer("Tell me about yourself.", Some(7)))).await;

        let interviews = state.interviews.read().await;
        assert!(interviews.contains_key(&1));
        assert!(!interviews.contains_key(&7));
    }
}

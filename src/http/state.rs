use crate::emotion::EmotionLabel;
use crate::state::InterviewId;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

pub const QUESTION_BANK: &[&str] = &[
    "Tell me about yourself.",
    "What are your greatest strengths?",
    "What are your weaknesses?",
    "Why do you want to work here?",
    "Where do you see yourself in 5 years?",
    "Why should we hire you?",
    "What motivates you?",
    "Tell me about a challenge you've faced and how you overcame it.",
    "Describe a time when you worked as part of a team.",
    "How do you handle stress and pressure?",
    "What is your greatest professional achievement?",
    "Tell me about a time you showed leadership.",
    "How do you prioritize your work?",
    "Describe your ideal work environment.",
    "How do you handle criticism?",
    "What makes you unique?",
    "How do you stay organized?",
    "Tell me about a successful project you led.",
    "How do you handle multiple deadlines?",
    "How do you learn new skills?",
    "Describe a time you had to adapt to change.",
    "Tell me about a time you solved a complex problem.",
    "What's your approach to problem-solving?",
    "How do you approach learning new technologies?",
];

/// One practice session; every answer submitted under its id
#[derive(Debug, Clone, Serialize)]
pub struct InterviewRecord {
    pub id: InterviewId,
    pub answers: Vec<AnswerRecord>,
    pub started_at: DateTime<Utc>,
}

impl InterviewRecord {
    pub fn new(id: InterviewId) -> Self {
        Self {
            id,
            answers: Vec::new(),
            started_at: Utc::now(),
        }
    }

    /// Mean score over all answers so far
    pub fn average_score(&self) -> Option<f64> {
        if self.answers.is_empty() {
            return None;
        }
        let total: u32 = self.answers.iter().map(|a| a.score).sum();
        Some(total as f64 / self.answers.len() as f64)
    }
}

/// A scored answer
#[derive(Debug, Clone, Serialize)]
pub struct AnswerRecord {
    pub question: String,
    pub answer: String,
    pub score: u32,
    pub emotion: EmotionLabel,
    pub feedback: String,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EmotionLog {
    pub interview_id: InterviewId,
    pub emotion: EmotionLabel,
    pub confidence: f32,
    pub date: DateTime<Utc>,
}

/// Shared state for the development backend handlers
#[derive(Clone)]
pub struct BackendState {
    pub interviews: Arc<RwLock<HashMap<InterviewId, InterviewRecord>>>,
    pub emotion_logs: Arc<RwLock<Vec<EmotionLog>>>,
    next_question: Arc<AtomicUsize>,
    next_interview_id: Arc<AtomicI64>,
    samples: Arc<AtomicUsize>,
}

impl BackendState {
    pub fn new() -> Self {
        Self {
            interviews: Arc::new(RwLock::new(HashMap::new())),
            emotion_logs: Arc::new(RwLock::new(Vec::new())),
            next_question: Arc::new(AtomicUsize::new(0)),
            next_interview_id: Arc::new(AtomicI64::new(1)),
            samples: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Questions are handed out in bank order, wrapping around
    pub fn next_question(&self) -> &'static str {
        let index = self.next_question.fetch_add(1, Ordering::SeqCst);
        QUESTION_BANK[index % QUESTION_BANK.len()]
    }

    pub fn allocate_interview_id(&self) -> InterviewId {
        self.next_interview_id.fetch_add(1, Ordering::SeqCst)
    }

    /// Sequence number of the next emotion sample
    pub fn next_sample(&self) -> usize {
        self.samples.fetch_add(1, Ordering::SeqCst)
    }
}

impl Default for BackendState {
    fn default() -> Self {
        Self::new()
    }
}

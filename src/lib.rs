pub mod api;
pub mod config;
pub mod emotion;
pub mod error;
pub mod http;
pub mod media;
pub mod recording;
pub mod resume;
pub mod session;
pub mod sim;
pub mod speech;
pub mod state;
pub mod submission;
pub mod toast;
pub mod ui;

pub use api::{EmotionSample, FeedbackResult, HttpInterviewApi, InterviewApi, ResumeAnalysis};
pub use config::Config;
pub use emotion::{EmotionLabel, EmotionSampler};
pub use error::SessionError;
pub use http::{create_router, spawn_backend, BackendState};
pub use media::{CameraDevice, MediaCapture, VideoStream};
pub use recording::{Recorder, RecordingState, StopReason};
pub use resume::{FileSource, ResumeFile, ResumeWorkflow};
pub use session::InterviewSession;
pub use speech::{SpeechRecognizer, Transcriber};
pub use state::{InterviewId, SessionState, SessionStore};
pub use submission::SubmissionWorkflow;
pub use toast::{ToastKind, Toaster};
pub use ui::{Ui, UiState};

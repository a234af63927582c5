use crate::api::{FeedbackResult, InterviewApi};
use crate::config::Config;
use crate::emotion::EmotionSampler;
use crate::error::SessionError;
use crate::media::{CameraDevice, MediaCapture};
use crate::recording::{Recorder, StopReason};
use crate::speech::{RecognitionOptions, SpeechRecognizer, Transcriber};
use crate::state::{SessionState, SessionStore, Writer};
use crate::submission::SubmissionWorkflow;
use crate::toast::Toaster;
use crate::ui::{results_url, CameraStatus, Ui, IDLE_TRANSCRIPT};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// One interview-practice page: camera, transcription, emotion sampling,
/// the recording state machine and answer submission, wired together.
pub struct InterviewSession {
    config: Config,
    store: SessionStore,
    ui: Ui,
    toaster: Toaster,
    api: Arc<dyn InterviewApi>,
    media: Arc<tokio::sync::Mutex<MediaCapture>>,
    transcriber: Arc<Transcriber>,
    sampler: EmotionSampler,
    recorder: Recorder,
    submission: SubmissionWorkflow,
    forwarder: Mutex<Option<JoinHandle<()>>>,
    torn_down: AtomicBool,
}

impl InterviewSession {
    /// Build the session. Must be called from within a tokio runtime.
    pub fn new(
        config: Config,
        api: Arc<dyn InterviewApi>,
        camera: Arc<dyn CameraDevice>,
        recognizer: Arc<dyn SpeechRecognizer>,
    ) -> Self {
        let store = SessionStore::new();
        let ui = Ui::new();
        let toaster = Toaster::new(&config.toast);

        let media = Arc::new(tokio::sync::Mutex::new(MediaCapture::new(
            camera,
            &config.emotion,
        )));
        let transcriber = Arc::new(Transcriber::new(
            recognizer,
            RecognitionOptions::from(&config.session),
            toaster.clone(),
        ));
        let sampler = EmotionSampler::new(
            Arc::clone(&media),
            Arc::clone(&api),
            store.handle(Writer::Sampler),
            ui.clone(),
            config.emotion.sample_interval(),
        );
        let recorder = Recorder::new(
            store.handle(Writer::Recorder),
            Arc::clone(&transcriber),
            ui.clone(),
            toaster.clone(),
            config.session.clone(),
        );
        let submission = SubmissionWorkflow::new(
            Arc::clone(&api),
            store.handle(Writer::Submission),
            ui.clone(),
            toaster.clone(),
            config.session.min_answer_chars,
        );

        if !transcriber.is_available() {
            warn!("Speech recognition unavailable; recording disabled");
            toaster.warning(SessionError::EngineUnavailable.to_string());
        }

        let forwarder = tokio::spawn(forward_transcript(transcriber.subscribe(), ui.clone()));

        Self {
            config,
            store,
            ui,
            toaster,
            api,
            media,
            transcriber,
            sampler,
            recorder,
            submission,
            forwarder: Mutex::new(Some(forwarder)),
            torn_down: AtomicBool::new(false),
        }
    }

    /// Acquire the camera and arm emotion sampling
    pub async fn start_camera(&self) -> Result<(), SessionError> {
        let result = self.media.lock().await.acquire().await;

        match result {
            Ok(opened) => {
                self.ui.update(|ui| ui.camera_status = CameraStatus::Active);
                if opened {
                    self.sampler.arm();
                    self.toaster.success("Camera started");
                }
                Ok(())
            }
            Err(e) => {
                error!("Camera error: {}", e);
                self.ui.update(|ui| ui.camera_status = CameraStatus::Error);
                self.toaster.error(format!(
                    "{}. Please allow camera access and try again.",
                    e
                ));
                Err(e)
            }
        }
    }

    /// Fetch and display the next question
    pub async fn load_question(&self) -> Result<String, SessionError> {
        match self.api.fetch_question().await {
            Ok(question) => {
                let state = self.recorder.load_question(question.clone());
                info!("Question #{}: {}", state.question_count, question);
                Ok(question)
            }
            Err(e) => {
                warn!("Question fetch failed: {}", e);
                self.toaster.error("Failed to load question");
                Err(e)
            }
        }
    }

    /// Record button
    pub fn toggle_recording(&self) -> Result<(), SessionError> {
        self.recorder.toggle()
    }

    pub async fn submit_answer(&self) -> Result<FeedbackResult, SessionError> {
        if self.recorder.is_recording() {
            let e = SessionError::validation("Stop recording before submitting");
            self.toaster.show(e.toast_kind(), e.to_string());
            return Err(e);
        }

        let state = self.store.snapshot();
        let transcript = self.transcriber.text();
        self.submission
            .submit(
                &state.current_question,
                &transcript,
                state.current_emotion,
                state.current_emotion_confidence,
            )
            .await
    }

    /// End the session and navigate to the results view
    pub async fn finish(&self) -> Result<String, SessionError> {
        let state = self.store.snapshot();
        if state.question_count == 0 {
            let e = SessionError::validation("Please answer at least one question first");
            self.toaster.show(e.toast_kind(), e.to_string());
            return Err(e);
        }

        let url = results_url(&self.config.api.results_path, state.current_interview_id);
        info!("Finishing session, navigating to {}", url);
        self.teardown().await;

        let target = url.clone();
        self.ui.update(|ui| ui.navigation = Some(target));
        Ok(url)
    }

    /// Page teardown: release the camera, disarm sampling, stop recognition.
    /// Each step runs whether or not it was active.
    pub async fn teardown(&self) {
        let first = !self.torn_down.swap(true, Ordering::SeqCst);

        self.recorder.stop(StopReason::Teardown);
        self.transcriber.stop();
        let disarmed = self.sampler.disarm();
        let released = self.media.lock().await.release();
        if let Some(forwarder) = self
            .forwarder
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take()
        {
            forwarder.abort();
        }

        if first {
            info!(
                "Session torn down (camera released: {}, sampler disarmed: {})",
                released, disarmed
            );
        }
    }

    pub fn ui(&self) -> &Ui {
        &self.ui
    }

    pub fn toaster(&self) -> &Toaster {
        &self.toaster
    }

    pub fn state(&self) -> SessionState {
        self.store.snapshot()
    }

    pub fn recorder(&self) -> &Recorder {
        &self.recorder
    }

    pub fn transcriber(&self) -> &Transcriber {
        &self.transcriber
    }

    pub fn sampler(&self) -> &EmotionSampler {
        &self.sampler
    }

    pub async fn camera_active(&self) -> bool {
        self.media.lock().await.is_active()
    }
}

/// Mirror transcript updates into the transcript display
async fn forward_transcript(mut transcript: tokio::sync::watch::Receiver<String>, ui: Ui) {
    while transcript.changed().await.is_ok() {
        let text = transcript.borrow_and_update().clone();
        ui.update(|ui| {
            ui.transcript_text = if text.is_empty() {
                IDLE_TRANSCRIPT.to_string()
            } else {
                text
            };
        });
    }
}

use super::machine::{check_start, next_state, RecordingEvent, RecordingState, StopReason};
use crate::config::SessionConfig;
use crate::error::SessionError;
use crate::speech::Transcriber;
use crate::state::{SessionState, StateAction, StateHandle, Writer};
use crate::toast::Toaster;
use crate::ui::{
    format_timer, Ui, IDLE_TRANSCRIPT, START_RECORDING_LABEL, STOP_RECORDING_LABEL,
};
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

struct Inner {
    machine: Mutex<RecordingState>,
    state: StateHandle,
    transcriber: Arc<Transcriber>,
    ui: Ui,
    toaster: Toaster,
    config: SessionConfig,
    ticker: Mutex<Option<JoinHandle<()>>>,
}

/// Owns the recording state machine and its timer
#[derive(Clone)]
pub struct Recorder {
    inner: Arc<Inner>,
}

impl Recorder {
    pub fn new(
        state: StateHandle,
        transcriber: Arc<Transcriber>,
        ui: Ui,
        toaster: Toaster,
        config: SessionConfig,
    ) -> Self {
        debug_assert_eq!(state.writer(), Writer::Recorder);
        Self {
            inner: Arc::new(Inner {
                machine: Mutex::new(RecordingState::Idle),
                state,
                transcriber,
                ui,
                toaster,
                config,
                ticker: Mutex::new(None),
            }),
        }
    }

    pub fn state(&self) -> RecordingState {
        *lock(&self.inner.machine)
    }

    pub fn is_recording(&self) -> bool {
        self.state() == RecordingState::Recording
    }

    /// `Idle → Recording`. Rejected with a warning toast and no state change
    /// if no question is loaded or speech recognition is unavailable.
    pub fn start(&self) -> Result<(), SessionError> {
        let inner = &self.inner;
        let mut machine = lock(&inner.machine);

        let Some(next) = next_state(*machine, RecordingEvent::Start) else {
            warn!("Recording already in progress");
            return Ok(());
        };

        let snapshot = inner.state.snapshot();
        if let Err(e) = check_start(&snapshot.current_question, inner.transcriber.is_available())
            .and_then(|_| inner.transcriber.start())
        {
            warn!("Cannot start recording: {}", e);
            inner.toaster.show(e.toast_kind(), e.to_string());
            return Err(e);
        }

        *machine = next;
        inner.state.dispatch(StateAction::RecordingStarted);

        let weak = Arc::downgrade(inner);
        *lock(&inner.ticker) = Some(tokio::spawn(run_ticker(weak, inner.config.tick_interval())));

        inner.ui.update(|ui| {
            ui.recording_indicator = true;
            ui.record_control.label = STOP_RECORDING_LABEL.to_string();
            ui.timer_text = format_timer(0);
            ui.submit_control.enabled = false;
        });

        info!("Recording started");
        Ok(())
    }

    /// `Recording → Idle`. Returns false if nothing was recording.
    pub fn stop(&self, reason: StopReason) -> bool {
        self.inner.finish(reason)
    }

    /// Record button handler
    pub fn toggle(&self) -> Result<(), SessionError> {
        if self.is_recording() {
            self.stop(StopReason::User);
            Ok(())
        } else {
            self.start()
        }
    }

    /// Make `question` current: ends any recording, clears the transcript
    /// and hides feedback from the previous answer.
    pub fn load_question(&self, question: String) -> SessionState {
        let inner = &self.inner;
        inner.finish(StopReason::QuestionChanged);
        inner.transcriber.reset();

        let display = question.clone();
        let state = inner
            .state
            .dispatch(StateAction::QuestionLoaded(question))
            .unwrap_or_else(|| inner.state.snapshot());

        let number = format!("#{}", state.question_count);
        let can_record = inner.transcriber.is_available();
        inner.ui.update(|ui| {
            ui.question_text = display;
            ui.question_number = number;
            ui.transcript_text = IDLE_TRANSCRIPT.to_string();
            ui.feedback = None;
            ui.submit_control.enabled = false;
            ui.record_control.enabled = can_record;
            ui.finish_control.enabled = true;
        });

        state
    }
}

impl Inner {
    /// Returns false once the ticker should stop
    fn on_tick(&self) -> bool {
        if *lock(&self.machine) != RecordingState::Recording {
            return false;
        }

        let Some(state) = self.state.dispatch(StateAction::RecordingTicked) else {
            return false;
        };
        let seconds = state.recording_seconds;
        self.ui.update(|ui| ui.timer_text = format_timer(seconds));
        debug!("Recording {}s", seconds);

        if seconds >= self.config.max_recording_secs {
            self.toaster.warning(format!(
                "Maximum recording time reached ({} seconds)",
                self.config.max_recording_secs
            ));
            self.finish(StopReason::LimitReached);
            return false;
        }

        true
    }

    fn finish(&self, reason: StopReason) -> bool {
        let mut machine = lock(&self.machine);
        let Some(next) = next_state(*machine, reason.event()) else {
            return false;
        };
        *machine = next;

        self.transcriber.stop();
        if let Some(ticker) = lock(&self.ticker).take() {
            ticker.abort();
        }
        self.state.dispatch(StateAction::RecordingStopped);

        let answer_len = self.transcriber.text().chars().count();
        let can_submit = answer_len > self.config.min_answer_chars;

        self.ui.update(|ui| {
            ui.recording_indicator = false;
            ui.record_control.label = START_RECORDING_LABEL.to_string();
            ui.submit_control.enabled = can_submit;
        });

        info!(
            "Recording stopped ({:?}, {} chars, submit {})",
            reason,
            answer_len,
            if can_submit { "enabled" } else { "disabled" }
        );
        true
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        if let Some(ticker) = lock(&self.ticker).take() {
            ticker.abort();
        }
    }
}

async fn run_ticker(inner: Weak<Inner>, period: std::time::Duration) {
    let mut ticker = tokio::time::interval(period);
    // The first tick completes immediately
    ticker.tick().await;
    loop {
        ticker.tick().await;
        let Some(inner) = inner.upgrade() else {
            break;
        };
        if !inner.on_tick() {
            break;
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimRecognizer;
    use crate::speech::RecognitionOptions;
    use crate::state::SessionStore;
    use crate::toast::ToastKind;
    use std::time::Duration;

    struct Fixture {
        recorder: Recorder,
        store: SessionStore,
        ui: Ui,
        toaster: Toaster,
    }

    fn fixture(recognizer: SimRecognizer) -> Fixture {
        let store = SessionStore::new();
        let ui = Ui::new();
        let toaster = Toaster::default();
        let config = SessionConfig::default();
        let transcriber = Arc::new(Transcriber::new(
            Arc::new(recognizer),
            RecognitionOptions::from(&config),
            toaster.clone(),
        ));
        let recorder = Recorder::new(
            store.handle(Writer::Recorder),
            transcriber,
            ui.clone(),
            toaster.clone(),
            config,
        );
        Fixture {
            recorder,
            store,
            ui,
            toaster,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_requires_question() {
        let f = fixture(SimRecognizer::new());
        assert!(f.recorder.start().is_err());
        assert_eq!(f.recorder.state(), RecordingState::Idle);
        assert!(!f.store.snapshot().is_recording);
        assert!(f.toaster.contains(ToastKind::Warning, "question"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_requires_engine() {
        let f = fixture(SimRecognizer::unavailable());
        f.recorder.load_question("Why rust?".into());
        assert_eq!(f.recorder.start(), Err(SessionError::EngineUnavailable));
        assert_eq!(f.recorder.state(), RecordingState::Idle);
        assert!(!f.toaster.messages().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_hard_cap_stops_at_limit() {
        let f = fixture(SimRecognizer::new());
        f.recorder.load_question("Why rust?".into());
        f.recorder.start().unwrap();
        assert!(f.ui.snapshot().recording_indicator);

        tokio::time::sleep(Duration::from_millis(29_500)).await;
        assert!(f.recorder.is_recording());
        assert_eq!(f.store.snapshot().recording_seconds, 29);

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(!f.recorder.is_recording());
        let state = f.store.snapshot();
        assert!(!state.is_recording);
        assert_eq!(state.recording_seconds, 30);
        assert_eq!(f.ui.snapshot().timer_text, "00:30");
        assert!(f.toaster.contains(ToastKind::Warning, "Maximum recording time"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_resets_seconds() {
        let f = fixture(SimRecognizer::new());
        f.recorder.load_question("Why rust?".into());
        f.recorder.start().unwrap();
        tokio::time::sleep(Duration::from_millis(5_500)).await;
        f.recorder.toggle().unwrap();
        assert_eq!(f.store.snapshot().recording_seconds, 5);

        f.recorder.toggle().unwrap();
        assert_eq!(f.store.snapshot().recording_seconds, 0);
        assert_eq!(f.ui.snapshot().timer_text, "00:00");
        f.recorder.stop(StopReason::User);
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_enabled_only_for_long_answer() {
        let f = fixture(SimRecognizer::new().with_run(vec!["too short"]));
        f.recorder.load_question("Why rust?".into());
        f.recorder.start().unwrap();
        tokio::time::sleep(Duration::from_secs(1)).await;
        f.recorder.stop(StopReason::User);
        assert!(!f.ui.snapshot().submit_control.enabled);

        let f = fixture(SimRecognizer::new().with_run(vec!["memory safety without gc"]));
        f.recorder.load_question("Why rust?".into());
        f.recorder.start().unwrap();
        tokio::time::sleep(Duration::from_secs(1)).await;
        f.recorder.stop(StopReason::User);
        assert!(f.ui.snapshot().submit_control.enabled);
    }

    #[tokio::test(start_paused = true)]
    async fn test_load_question_stops_recording_and_resets() {
        let f = fixture(SimRecognizer::new().with_run(vec!["an answer long enough"]));
        f.recorder.load_question("First?".into());
        f.recorder.start().unwrap();
        tokio::time::sleep(Duration::from_secs(1)).await;

        let state = f.recorder.load_question("Second?".into());
        assert_eq!(state.question_count, 2);
        assert!(!f.recorder.is_recording());

        let ui = f.ui.snapshot();
        assert_eq!(ui.question_number, "#2");
        assert_eq!(ui.transcript_text, IDLE_TRANSCRIPT);
        assert!(!ui.submit_control.enabled);
        assert!(ui.feedback.is_none());
    }
}

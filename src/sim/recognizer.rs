use crate::error::SessionError;
use crate::speech::{
    RecognitionOptions, RecognitionResult, RecognizerError, RecognizerEvent, SpeechRecognizer,
};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;

#[derive(Debug, Clone, PartialEq)]
pub enum SimStep {
    /// Speak a phrase: delivered as an interim result, then finalized
    Say(String),
    Fail(RecognizerError),
}

/// Speech engine that plays back scripted runs
///
/// Each scripted run ends on its own once its steps are played, like an
/// engine timing out after silence. Once the script is exhausted, runs stay
/// open and silent until the caller stops them.
pub struct SimRecognizer {
    available: bool,
    runs: Mutex<VecDeque<Vec<SimStep>>>,
    start_failures: Mutex<VecDeque<SessionError>>,
    step_delay: Duration,
    started: Arc<AtomicUsize>,
}

impl SimRecognizer {
    pub fn new() -> Self {
        Self {
            available: true,
            runs: Mutex::new(VecDeque::new()),
            start_failures: Mutex::new(VecDeque::new()),
            step_delay: Duration::from_millis(100),
            started: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Runtime without speech recognition support
    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::new()
        }
    }

    pub fn with_step_delay(mut self, delay: Duration) -> Self {
        self.step_delay = delay;
        self
    }

    pub fn with_run(self, phrases: Vec<&str>) -> Self {
        let steps = phrases
            .into_iter()
            .map(|p| SimStep::Say(p.to_string()))
            .collect();
        self.with_steps(steps)
    }

    pub fn with_error(self, error: RecognizerError) -> Self {
        self.with_steps(vec![SimStep::Fail(error)])
    }

    pub fn with_steps(self, steps: Vec<SimStep>) -> Self {
        self.runs
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(steps);
        self
    }

    /// Once the scripted runs are used up, the next `start` fails, like an
    /// engine whose microphone was unplugged mid-session
    pub fn with_start_failure(self, error: SessionError) -> Self {
        self.start_failures
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(error);
        self
    }

    /// Number of runs started so far
    pub fn runs_started(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }
}

impl Default for SimRecognizer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl SpeechRecognizer for SimRecognizer {
    fn is_available(&self) -> bool {
        self.available
    }

    async fn start(
        &self,
        _options: &RecognitionOptions,
    ) -> Result<mpsc::Receiver<RecognizerEvent>, SessionError> {
        if !self.available {
            return Err(SessionError::EngineUnavailable);
        }
        let runs_left = !self
            .runs
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .is_empty();
        if !runs_left {
            let failure = self
                .start_failures
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .pop_front();
            if let Some(error) = failure {
                return Err(error);
            }
        }
        self.started.fetch_add(1, Ordering::SeqCst);

        let script = self
            .runs
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front();
        let delay = self.step_delay;
        let (tx, rx) = mpsc::channel(32);

        tokio::spawn(async move {
            let Some(steps) = script else {
                tx.closed().await;
                return;
            };

            let mut results: Vec<RecognitionResult> = Vec::new();
            for step in steps {
                match step {
                    SimStep::Say(phrase) => {
                        tokio::time::sleep(delay).await;
                        let mut interim = results.clone();
                        interim.push(RecognitionResult::interim(phrase.clone()));
                        if tx.send(RecognizerEvent::Results(interim)).await.is_err() {
                            return;
                        }

                        tokio::time::sleep(delay).await;
                        results.push(RecognitionResult::final_text(phrase));
                        if tx.send(RecognizerEvent::Results(results.clone())).await.is_err() {
                            return;
                        }
                    }
                    SimStep::Fail(error) => {
                        tokio::time::sleep(delay).await;
                        if tx.send(RecognizerEvent::Error(error)).await.is_err() {
                            return;
                        }
                    }
                }
            }
            // Dropping the sender ends the run
        });

        Ok(rx)
    }

    fn name(&self) -> &str {
        "simulated recognizer"
    }
}

//! Continuous speech transcription
//!
//! `Transcriber` supervises a `SpeechRecognizer`. Recognizer runs end on their
//! own after silence or timeouts; while the transcriber is armed it opens a new
//! run immediately, so callers see one continuous transcript for the whole
//! recording.

mod transcript;

pub use transcript::{RecognitionResult, TranscriptBuffer};

use crate::config::SessionConfig;
use crate::error::SessionError;
use crate::toast::Toaster;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub struct RecognitionOptions {
    pub language: String,
    pub interim_results: bool,
    pub continuous: bool,
}

impl From<&SessionConfig> for RecognitionOptions {
    fn from(config: &SessionConfig) -> Self {
        Self {
            language: config.language.clone(),
            interim_results: config.interim_results,
            continuous: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RecognizerError {
    /// Nothing was heard; expected during pauses
    NoSpeech,
    AudioCapture,
    NotAllowed,
    Network,
    Other(String),
}

impl fmt::Display for RecognizerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoSpeech => f.write_str("no-speech"),
            Self::AudioCapture => f.write_str("audio-capture"),
            Self::NotAllowed => f.write_str("not-allowed"),
            Self::Network => f.write_str("network"),
            Self::Other(code) => f.write_str(code),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RecognizerEvent {
    /// Every result of the current run so far
    Results(Vec<RecognitionResult>),
    Error(RecognizerError),
}

/// Speech-to-text engine trait
///
/// A run lasts until the engine closes its event channel (it ended on its
/// own) or the receiver is dropped (the caller stopped it).
#[async_trait::async_trait]
pub trait SpeechRecognizer: Send + Sync {
    /// Whether the runtime provides speech recognition at all
    fn is_available(&self) -> bool;

    /// Begin one recognition run
    async fn start(
        &self,
        options: &RecognitionOptions,
    ) -> Result<mpsc::Receiver<RecognizerEvent>, SessionError>;

    /// Engine name for logging
    fn name(&self) -> &str;
}

pub struct Transcriber {
    recognizer: Arc<dyn SpeechRecognizer>,
    options: RecognitionOptions,
    toaster: Toaster,
    armed: Arc<watch::Sender<bool>>,
    buffer: Arc<Mutex<TranscriptBuffer>>,
    transcript: Arc<watch::Sender<String>>,
    task: Mutex<Option<JoinHandle<()>>>,
    restarts: Arc<AtomicUsize>,
}

impl Transcriber {
    pub fn new(
        recognizer: Arc<dyn SpeechRecognizer>,
        options: RecognitionOptions,
        toaster: Toaster,
    ) -> Self {
        let (armed, _) = watch::channel(false);
        let (transcript, _) = watch::channel(String::new());
        Self {
            recognizer,
            options,
            toaster,
            armed: Arc::new(armed),
            buffer: Arc::new(Mutex::new(TranscriptBuffer::new())),
            transcript: Arc::new(transcript),
            task: Mutex::new(None),
            restarts: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn is_available(&self) -> bool {
        self.recognizer.is_available()
    }

    pub fn is_running(&self) -> bool {
        *self.armed.borrow()
    }

    /// Start continuous recognition. Must be called from within a tokio runtime.
    pub fn start(&self) -> Result<(), SessionError> {
        if !self.is_available() {
            return Err(SessionError::EngineUnavailable);
        }
        if self.is_running() {
            warn!("Transcriber already running");
            return Ok(());
        }

        info!(
            "Starting speech recognition ({}, {})",
            self.recognizer.name(),
            self.options.language
        );

        let mut task = lock(&self.task);
        if let Some(previous) = task.take() {
            previous.abort();
        }
        lock(&self.buffer).commit();
        self.armed.send_replace(true);

        let supervisor = Supervisor {
            recognizer: Arc::clone(&self.recognizer),
            options: self.options.clone(),
            toaster: self.toaster.clone(),
            arm: Arc::clone(&self.armed),
            armed: self.armed.subscribe(),
            buffer: Arc::clone(&self.buffer),
            transcript: Arc::clone(&self.transcript),
            restarts: Arc::clone(&self.restarts),
        };
        *task = Some(tokio::spawn(supervisor.run()));

        Ok(())
    }

    /// Stop recognition. Safe to call when not running.
    pub fn stop(&self) {
        let was_running = self.armed.send_replace(false);
        if let Some(task) = lock(&self.task).take() {
            task.abort();
        }
        lock(&self.buffer).commit();
        if was_running {
            info!("Speech recognition stopped");
        }
    }

    /// Discard the transcript (new question)
    pub fn reset(&self) {
        lock(&self.buffer).clear();
        self.transcript.send_replace(String::new());
    }

    /// Full accumulated transcript
    pub fn text(&self) -> String {
        self.transcript.borrow().clone()
    }

    /// Receives the full transcript on every recognizer event
    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.transcript.subscribe()
    }

    /// How many times the engine was restarted after ending on its own
    pub fn restart_count(&self) -> usize {
        self.restarts.load(Ordering::SeqCst)
    }
}

impl Drop for Transcriber {
    fn drop(&mut self) {
        self.stop();
    }
}

struct Supervisor {
    recognizer: Arc<dyn SpeechRecognizer>,
    options: RecognitionOptions,
    toaster: Toaster,
    arm: Arc<watch::Sender<bool>>,
    armed: watch::Receiver<bool>,
    buffer: Arc<Mutex<TranscriptBuffer>>,
    transcript: Arc<watch::Sender<String>>,
    restarts: Arc<AtomicUsize>,
}

impl Supervisor {
    async fn run(mut self) {
        debug!("Recognition supervisor started");

        'runs: while *self.armed.borrow() {
            let mut events = match self.recognizer.start(&self.options).await {
                Ok(events) => events,
                Err(e) => {
                    warn!("Recognizer failed to start: {}", e);
                    self.toaster
                        .warning(format!("Could not start speech recognition: {}", e));
                    self.arm.send_replace(false);
                    break;
                }
            };

            loop {
                tokio::select! {
                    event = events.recv() => match event {
                        Some(RecognizerEvent::Results(results)) => {
                            let text = {
                                let mut buffer = lock(&self.buffer);
                                buffer.set_current(results);
                                buffer.text()
                            };
                            self.transcript.send_replace(text);
                        }
                        Some(RecognizerEvent::Error(RecognizerError::NoSpeech)) => {
                            debug!("No speech detected");
                        }
                        Some(RecognizerEvent::Error(e)) => {
                            self.toaster
                                .warning(format!("Speech recognition error: {}", e));
                        }
                        // The engine ended this run on its own
                        None => break,
                    },
                    changed = self.armed.changed() => {
                        if changed.is_err() || !*self.armed.borrow() {
                            lock(&self.buffer).commit();
                            break 'runs;
                        }
                    }
                }
            }

            lock(&self.buffer).commit();

            if *self.armed.borrow() {
                let count = self.restarts.fetch_add(1, Ordering::SeqCst) + 1;
                info!("Recognizer ended on its own, restarting (restart #{})", count);
                tokio::task::yield_now().await;
            }
        }

        debug!("Recognition supervisor stopped");
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

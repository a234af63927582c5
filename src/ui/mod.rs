//! UI surface model
//!
//! The page is represented as a `UiState` value published on a watch channel.
//! Workflows mutate it through `Ui::update`; renderers and tests subscribe or
//! take snapshots.

mod modal;

pub use modal::{ModalEvent, ModalState};

use crate::emotion::EmotionLabel;
use crate::state::InterviewId;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::watch;

/// Transcript area text while nothing has been recognized
pub const IDLE_TRANSCRIPT: &str = "Your answer will appear here as you speak...";

pub const START_RECORDING_LABEL: &str = "Start Recording";
pub const STOP_RECORDING_LABEL: &str = "Stop Recording";
pub const SUBMIT_LABEL: &str = "Submit Answer";
pub const ANALYZE_LABEL: &str = "Analyze Resume";
pub const LOADING_LABEL: &str = "Analyzing...";

/// Circumference of the score ring (radius 45)
pub const RING_CIRCUMFERENCE: f64 = 2.0 * std::f64::consts::PI * 45.0;

/// Stroke offset of the score ring for a score in [0, 100]
pub fn ring_offset(score: f64) -> f64 {
    RING_CIRCUMFERENCE - (score / 100.0) * RING_CIRCUMFERENCE
}

/// `MM:SS` timer text
pub fn format_timer(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum CameraStatus {
    #[default]
    NotStarted,
    Active,
    /// Acquisition failed; distinct from never having started
    Error,
}

impl CameraStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::NotStarted => "Camera Off",
            Self::Active => "Camera Active",
            Self::Error => "Camera Error",
        }
    }
}

/// A clickable control
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Control {
    pub enabled: bool,
    pub label: String,
    pub loading: bool,
}

impl Control {
    pub fn new(label: &str, enabled: bool) -> Self {
        Self {
            enabled,
            label: label.to_string(),
            loading: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmotionView {
    pub glyph: String,
    /// e.g. "Current: Happy (77% confidence)"
    pub text: String,
    /// Bar widths per label, in percent
    pub distribution: Vec<(EmotionLabel, f32)>,
}

impl Default for EmotionView {
    fn default() -> Self {
        Self {
            glyph: EmotionLabel::Neutral.glyph().to_string(),
            text: "Current: Detecting...".to_string(),
            distribution: EmotionLabel::ALL.iter().map(|&l| (l, 0.0)).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedbackView {
    pub score: f64,
    pub semantic_score: f64,
    pub voice_score: f64,
    pub feedback: String,
    pub ring_offset: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResumeView {
    pub score: f64,
    pub experience_years: u32,
    pub skills: Vec<String>,
    pub suggestions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UiState {
    pub camera_status: CameraStatus,
    pub record_control: Control,
    pub recording_indicator: bool,
    pub timer_text: String,
    pub question_text: String,
    /// e.g. "#2"
    pub question_number: String,
    pub transcript_text: String,
    pub submit_control: Control,
    pub finish_control: Control,
    pub emotion: EmotionView,
    pub feedback: Option<FeedbackView>,
    pub resume_file_name: Option<String>,
    pub analyze_control: Control,
    pub resume: Option<ResumeView>,
    pub modal: ModalState,
    /// Set when the page should navigate away
    pub navigation: Option<String>,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            camera_status: CameraStatus::NotStarted,
            record_control: Control::new(START_RECORDING_LABEL, false),
            recording_indicator: false,
            timer_text: format_timer(0),
            question_text: "Click \"Get Question\" to start".to_string(),
            question_number: String::new(),
            transcript_text: IDLE_TRANSCRIPT.to_string(),
            submit_control: Control::new(SUBMIT_LABEL, false),
            finish_control: Control::new("Finish Interview", false),
            emotion: EmotionView::default(),
            feedback: None,
            resume_file_name: None,
            analyze_control: Control::new(ANALYZE_LABEL, false),
            resume: None,
            modal: ModalState::default(),
            navigation: None,
        }
    }
}

/// Results view URL for a finished session
pub fn results_url(results_path: &str, interview_id: Option<InterviewId>) -> String {
    match interview_id {
        Some(id) => format!("{}?id={}", results_path, id),
        None => results_path.to_string(),
    }
}

#[derive(Clone)]
pub struct Ui {
    tx: Arc<watch::Sender<UiState>>,
}

impl Ui {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(UiState::default());
        Self { tx: Arc::new(tx) }
    }

    pub fn update(&self, f: impl FnOnce(&mut UiState)) {
        self.tx.send_modify(f);
    }

    pub fn snapshot(&self) -> UiState {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<UiState> {
        self.tx.subscribe()
    }

    pub fn modal_event(&self, event: ModalEvent) {
        self.update(|ui| ui.modal.handle(event));
    }

    /// Put a control into its loading state until the guard is dropped
    pub fn busy(&self, select: ControlSelector) -> BusyGuard {
        let mut label = String::new();
        let mut enabled = false;
        self.update(|ui| {
            let control = select(ui);
            label = std::mem::replace(&mut control.label, LOADING_LABEL.to_string());
            enabled = std::mem::replace(&mut control.enabled, false);
            control.loading = true;
        });
        BusyGuard {
            ui: self.clone(),
            select,
            label,
            enabled,
        }
    }
}

pub type ControlSelector = fn(&mut UiState) -> &mut Control;

pub fn submit_control(ui: &mut UiState) -> &mut Control {
    &mut ui.submit_control
}

pub fn analyze_control(ui: &mut UiState) -> &mut Control {
    &mut ui.analyze_control
}

/// Restores a control's label and its enabled state from before the busy
/// period on drop, whatever the outcome
pub struct BusyGuard {
    ui: Ui,
    select: ControlSelector,
    label: String,
    enabled: bool,
}

impl BusyGuard {
    /// Override the enabled state restored on drop, for when the page moved
    /// on while the control was busy
    pub fn restore_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        let select = self.select;
        let label = std::mem::take(&mut self.label);
        let enabled = self.enabled;
        self.ui.update(move |ui| {
            let control = select(ui);
            control.label = label;
            control.enabled = enabled;
            control.loading = false;
        });
    }
}

impl Default for Ui {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ring_offset_for_score() {
        let offset = ring_offset(82.0);
        let expected = 2.0 * std::f64::consts::PI * 45.0 * (1.0 - 0.82);
        assert!((offset - expected).abs() < 1e-9);
        assert!((offset - 50.89).abs() < 0.01);
        assert_eq!(ring_offset(100.0), 0.0);
        assert_eq!(ring_offset(0.0), RING_CIRCUMFERENCE);
    }

    #[test]
    fn test_timer_text() {
        assert_eq!(format_timer(0), "00:00");
        assert_eq!(format_timer(30), "00:30");
        assert_eq!(format_timer(75), "01:15");
    }

    #[test]
    fn test_results_url() {
        assert_eq!(results_url("/results", Some(12)), "/results?id=12");
        assert_eq!(results_url("/results", None), "/results");
    }

    #[test]
    fn test_camera_status_labels_are_distinct() {
        assert_ne!(CameraStatus::NotStarted.label(), CameraStatus::Error.label());
        assert_eq!(CameraStatus::Error.label(), "Camera Error");
    }

    #[test]
    fn test_busy_guard_restores_control() {
        let ui = Ui::new();
        ui.update(|s| s.submit_control.enabled = true);
        {
            let _busy = ui.busy(submit_control);
            let state = ui.snapshot();
            assert!(state.submit_control.loading);
            assert!(!state.submit_control.enabled);
            assert_eq!(state.submit_control.label, LOADING_LABEL);
        }
        let state = ui.snapshot();
        assert!(!state.submit_control.loading);
        assert!(state.submit_control.enabled);
        assert_eq!(state.submit_control.label, SUBMIT_LABEL);
    }

    #[test]
    fn test_busy_guard_keeps_control_disabled_when_overridden() {
        let ui = Ui::new();
        ui.update(|s| s.submit_control.enabled = true);
        {
            let mut busy = ui.busy(submit_control);
            busy.restore_enabled(false);
        }
        let state = ui.snapshot();
        assert!(!state.submit_control.enabled);
        assert!(!state.submit_control.loading);
        assert_eq!(state.submit_control.label, SUBMIT_LABEL);

        // A control that was disabled before stays disabled
        let ui = Ui::new();
        drop(ui.busy(analyze_control));
        assert!(!ui.snapshot().analyze_control.enabled);
    }

    #[tokio::test]
    async fn test_subscribers_see_updates() {
        let ui = Ui::new();
        let mut rx = ui.subscribe();
        ui.update(|s| s.transcript_text = "hello".into());
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().transcript_text, "hello");
    }
}

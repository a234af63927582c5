use super::EmotionLabel;
use crate::api::{EmotionSample, InterviewApi};
use crate::media::MediaCapture;
use crate::state::{StateAction, StateHandle, Writer};
use crate::ui::Ui;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

/// Display distribution: the reported label gets its confidence, the rest
/// share the remainder evenly.
pub fn distribution(reported: EmotionLabel, confidence: f32) -> Vec<(EmotionLabel, f32)> {
    let confidence = confidence.clamp(0.0, 100.0);
    let filler = (100.0 - confidence) / (EmotionLabel::ALL.len() - 1) as f32;
    EmotionLabel::ALL
        .iter()
        .map(|&label| {
            let value = if label == reported { confidence } else { filler };
            (label, value)
        })
        .collect()
}

pub fn describe(sample: &EmotionSample) -> String {
    format!(
        "Current: {} ({:.0}% confidence)",
        sample.emotion.display_name(),
        sample.confidence
    )
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SamplerStats {
    pub requested: usize,
    pub applied: usize,
    /// Ticks skipped because the previous request was still in flight
    pub skipped: usize,
}

struct Shared {
    media: Arc<tokio::sync::Mutex<MediaCapture>>,
    api: Arc<dyn InterviewApi>,
    state: StateHandle,
    ui: Ui,
    in_flight: AtomicBool,
    request: Mutex<Option<JoinHandle<()>>>,
    requested: AtomicUsize,
    applied: AtomicUsize,
    skipped: AtomicUsize,
}

/// Periodic frame → classifier → session state loop
///
/// Runs independently of the recording state machine; armed once the camera
/// is up and disarmed on teardown.
pub struct EmotionSampler {
    shared: Arc<Shared>,
    interval: Duration,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl EmotionSampler {
    pub fn new(
        media: Arc<tokio::sync::Mutex<MediaCapture>>,
        api: Arc<dyn InterviewApi>,
        state: StateHandle,
        ui: Ui,
        interval: Duration,
    ) -> Self {
        debug_assert_eq!(state.writer(), Writer::Sampler);
        Self {
            shared: Arc::new(Shared {
                media,
                api,
                state,
                ui,
                in_flight: AtomicBool::new(false),
                request: Mutex::new(None),
                requested: AtomicUsize::new(0),
                applied: AtomicUsize::new(0),
                skipped: AtomicUsize::new(0),
            }),
            interval,
            task: Mutex::new(None),
        }
    }

    /// Start sampling. Returns false if already armed.
    pub fn arm(&self) -> bool {
        let mut task = self.task.lock().unwrap_or_else(|e| e.into_inner());
        if task.is_some() {
            return false;
        }

        info!("Emotion sampling armed (every {:?})", self.interval);
        let shared = Arc::clone(&self.shared);
        let period = self.interval;
        *task = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately; sampling starts one period in
            ticker.tick().await;
            loop {
                ticker.tick().await;
                Shared::sample(&shared).await;
            }
        }));

        true
    }

    /// Cancel the interval and any request still in flight
    pub fn disarm(&self) -> bool {
        let task = self.task.lock().unwrap_or_else(|e| e.into_inner()).take();
        let Some(task) = task else {
            return false;
        };
        task.abort();

        if let Some(request) = self
            .shared
            .request
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take()
        {
            request.abort();
        }
        self.shared.in_flight.store(false, Ordering::SeqCst);

        info!("Emotion sampling disarmed");
        true
    }

    pub fn is_armed(&self) -> bool {
        self.task
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .is_some()
    }

    pub fn stats(&self) -> SamplerStats {
        SamplerStats {
            requested: self.shared.requested.load(Ordering::SeqCst),
            applied: self.shared.applied.load(Ordering::SeqCst),
            skipped: self.shared.skipped.load(Ordering::SeqCst),
        }
    }
}

impl Drop for EmotionSampler {
    fn drop(&mut self) {
        self.disarm();
    }
}

impl Shared {
    async fn sample(this: &Arc<Self>) {
        if this.in_flight.swap(true, Ordering::SeqCst) {
            this.skipped.fetch_add(1, Ordering::SeqCst);
            debug!("Previous emotion sample still in flight, skipping tick");
            return;
        }

        let frame = this.media.lock().await.snapshot();
        let frame = match frame {
            Ok(frame) => frame,
            Err(e) => {
                debug!("No frame for emotion sample: {}", e);
                this.in_flight.store(false, Ordering::SeqCst);
                return;
            }
        };

        let interview_id = this.state.snapshot().current_interview_id;
        let image = frame.to_data_url();
        this.requested.fetch_add(1, Ordering::SeqCst);

        let shared = Arc::clone(this);
        let request = tokio::spawn(async move {
            let result = shared.api.classify_emotion(image, interview_id).await;
            match result {
                Ok(sample) => shared.apply(sample),
                Err(e) => warn!("Emotion sample failed: {}", e),
            }
            shared.in_flight.store(false, Ordering::SeqCst);
        });
        *this.request.lock().unwrap_or_else(|e| e.into_inner()) = Some(request);
    }

    fn apply(&self, sample: EmotionSample) {
        self.state.dispatch(StateAction::EmotionSampled {
            emotion: sample.emotion,
            confidence: sample.confidence,
        });
        self.applied.fetch_add(1, Ordering::SeqCst);

        let text = describe(&sample);
        debug!("{}", text);
        self.ui.update(|ui| {
            ui.emotion.glyph = sample.emotion.glyph().to_string();
            ui.emotion.text = text;
            ui.emotion.distribution = distribution(sample.emotion, sample.confidence);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_sample() {
        let sample = EmotionSample {
            emotion: EmotionLabel::Happy,
            confidence: 77.0,
        };
        assert_eq!(describe(&sample), "Current: Happy (77% confidence)");
    }

    #[test]
    fn test_distribution_reports_true_confidence() {
        let dist = distribution(EmotionLabel::Nervous, 70.0);
        assert_eq!(dist.len(), 4);
        for (label, value) in dist {
            if label == EmotionLabel::Nervous {
                assert_eq!(value, 70.0);
            } else {
                assert!((value - 10.0).abs() < 1e-4);
            }
        }
    }
}

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub session: SessionConfig,
    pub emotion: EmotionConfig,
    pub toast: ToastConfig,
    pub server: ServerConfig,
}

/// Remote endpoints the client talks to
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub question_path: String,
    pub emotion_path: String,
    pub submit_path: String,
    pub resume_path: String,
    /// Results view the session navigates to when finished
    pub results_path: String,
    pub request_timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            question_path: "/api/get_question".to_string(),
            emotion_path: "/process_emotion".to_string(),
            submit_path: "/submit_answer".to_string(),
            resume_path: "/upload_resume".to_string(),
            results_path: "/results".to_string(),
            request_timeout_secs: 30,
        }
    }
}

impl ApiConfig {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Hard cap on a single recording (seconds)
    pub max_recording_secs: u32,
    pub tick_ms: u64,
    /// Answers must be strictly longer than this to be submitted
    pub min_answer_chars: usize,
    pub language: String,
    pub interim_results: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_recording_secs: 30,
            tick_ms: 1000,
            min_answer_chars: 10,
            language: "en-US".to_string(),
            interim_results: true,
        }
    }
}

impl SessionConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EmotionConfig {
    pub sample_interval_ms: u64,
    pub snapshot_width: u32,
    pub snapshot_height: u32,
    pub jpeg_quality: f32,
}

impl Default for EmotionConfig {
    fn default() -> Self {
        Self {
            sample_interval_ms: 2000,
            snapshot_width: 640,
            snapshot_height: 480,
            jpeg_quality: 0.8,
        }
    }
}

impl EmotionConfig {
    pub fn sample_interval(&self) -> Duration {
        Duration::from_millis(self.sample_interval_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ToastConfig {
    pub display_ms: u64,
    pub exit_animation_ms: u64,
}

impl Default for ToastConfig {
    fn default() -> Self {
        Self {
            display_ms: 4000,
            exit_animation_ms: 300,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            port: 5000,
        }
    }
}

impl Config {
    /// Load from a config file (any format the `config` crate understands)
    /// with `HIRISCOPE__SECTION__KEY` environment overrides.
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::Environment::with_prefix("HIRISCOPE").separator("__"))
            .build()
            .with_context(|| format!("Failed to read config from {}", path))?;

        let cfg: Self = settings
            .try_deserialize()
            .context("Failed to deserialize config")?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject values the session timers cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.session.tick_ms == 0 {
            bail!("session.tick_ms must be greater than zero");
        }
        if self.emotion.sample_interval_ms == 0 {
            bail!("emotion.sample_interval_ms must be greater than zero");
        }
        if self.session.max_recording_secs == 0 {
            bail!("session.max_recording_secs must be greater than zero");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_match_session_limits() {
        let cfg = Config::default();
        assert_eq!(cfg.session.max_recording_secs, 30);
        assert_eq!(cfg.session.min_answer_chars, 10);
        assert_eq!(cfg.emotion.sample_interval(), Duration::from_secs(2));
        assert_eq!(cfg.toast.display_ms, 4000);
        assert_eq!(cfg.emotion.snapshot_width, 640);
        assert_eq!(cfg.emotion.snapshot_height, 480);
    }

    #[test]
    fn test_load_partial_file_keeps_defaults() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("hiriscope.toml");
        let mut file = std::fs::File::create(&path)?;
        writeln!(file, "[api]\nbase_url = \"http://interview.local/\"")?;
        writeln!(file, "[session]\nmax_recording_secs = 45")?;

        let cfg = Config::load(path.to_str().unwrap())?;
        assert_eq!(cfg.session.max_recording_secs, 45);
        assert_eq!(cfg.session.language, "en-US");
        assert_eq!(
            cfg.api.url(&cfg.api.submit_path),
            "http://interview.local/submit_answer"
        );
        Ok(())
    }

    #[test]
    fn test_load_rejects_zero_intervals() -> Result<()> {
        let dir = tempfile::tempdir()?;

        let path = dir.path().join("ticks.toml");
        std::fs::write(&path, "[session]\ntick_ms = 0\n")?;
        let err = Config::load(path.to_str().unwrap()).unwrap_err();
        assert!(err.to_string().contains("tick_ms"));

        let path = dir.path().join("sampling.toml");
        std::fs::write(&path, "[emotion]\nsample_interval_ms = 0\n")?;
        let err = Config::load(path.to_str().unwrap()).unwrap_err();
        assert!(err.to_string().contains("sample_interval_ms"));

        assert!(Config::default().validate().is_ok());
        Ok(())
    }
}

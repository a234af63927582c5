// End-to-end tests for the interview session controller
//
// Each test binds the development backend on an ephemeral port and drives an
// InterviewSession through the HTTP client with simulated devices.

use anyhow::Result;
use hiriscope::api::EmotionSample;
use hiriscope::emotion::describe;
use hiriscope::http::QUESTION_BANK;
use hiriscope::sim::{SimCamera, SimRecognizer};
use hiriscope::ui::{ring_offset, CameraStatus};
use hiriscope::{
    spawn_backend, Config, FileSource, HttpInterviewApi, InterviewApi, InterviewSession,
    ResumeFile, ResumeWorkflow, SessionError, ToastKind,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

async fn start_backend() -> Result<(Config, JoinHandle<()>)> {
    let mut config = Config::default();
    config.emotion.sample_interval_ms = 100;
    let (addr, _, handle) = spawn_backend(&config, "127.0.0.1:0").await?;
    config.api.base_url = format!("http://{}", addr);
    Ok((config, handle))
}

fn api(config: &Config) -> Result<Arc<dyn InterviewApi>> {
    Ok(Arc::new(HttpInterviewApi::new(config.api.clone())?))
}

#[tokio::test]
async fn test_questions_are_numbered_in_order() -> Result<()> {
    let (config, _backend) = start_backend().await?;
    let session = InterviewSession::new(
        config.clone(),
        api(&config)?,
        Arc::new(SimCamera::new()),
        Arc::new(SimRecognizer::new()),
    );

    let first = session.load_question().await?;
    assert_eq!(first, QUESTION_BANK[0]);
    assert_eq!(session.ui().snapshot().question_number, "#1");

    let second = session.load_question().await?;
    assert_eq!(second, QUESTION_BANK[1]);
    let ui = session.ui().snapshot();
    assert_eq!(ui.question_number, "#2");
    assert_eq!(ui.question_text, QUESTION_BANK[1]);
    assert_eq!(session.state().question_count, 2);

    session.teardown().await;
    Ok(())
}

#[tokio::test]
async fn test_record_submit_and_finish() -> Result<()> {
    let (config, _backend) = start_backend().await?;
    let recognizer = SimRecognizer::new().with_run(vec![
        "My greatest strengths are patience",
        "and clear communication because I listen first",
    ]);
    let session = InterviewSession::new(
        config.clone(),
        api(&config)?,
        Arc::new(SimCamera::new()),
        Arc::new(recognizer),
    );

    session.load_question().await?;
    session.toggle_recording()?;
    assert!(session.state().is_recording);

    // Both phrases are finalized after four steps of 100ms
    tokio::time::sleep(Duration::from_millis(700)).await;
    session.toggle_recording()?;
    assert!(!session.state().is_recording);

    let ui = session.ui().snapshot();
    assert!(ui.transcript_text.starts_with("My greatest strengths"));
    assert!(ui.submit_control.enabled);

    let result = session.submit_answer().await?;
    assert_eq!(result.interview_id, 1);
    assert!((30.0..=98.0).contains(&result.score));

    let feedback = session.ui().snapshot().feedback.expect("feedback shown");
    assert_eq!(feedback.score, result.score);
    assert!((feedback.ring_offset - ring_offset(result.score)).abs() < 1e-9);
    assert!(session
        .toaster()
        .contains(ToastKind::Success, "Answer submitted successfully!"));

    // A second answer in the same session reuses the interview
    let again = session.submit_answer().await?;
    assert_eq!(again.interview_id, 1);

    let url = session.finish().await?;
    assert_eq!(url, "/results?id=1");
    assert_eq!(session.ui().snapshot().navigation.as_deref(), Some("/results?id=1"));
    Ok(())
}

#[tokio::test]
async fn test_emotion_samples_update_display() -> Result<()> {
    let (config, _backend) = start_backend().await?;
    let camera = Arc::new(SimCamera::new());
    let session = InterviewSession::new(
        config.clone(),
        api(&config)?,
        camera.clone(),
        Arc::new(SimRecognizer::new()),
    );

    session.start_camera().await?;
    assert_eq!(session.ui().snapshot().camera_status, CameraStatus::Active);

    tokio::time::sleep(Duration::from_millis(600)).await;
    session.teardown().await;

    let stats = session.sampler().stats();
    assert!(stats.applied >= 1, "at least one sample should land");
    assert!(camera.frames_captured() >= 1);

    let state = session.state();
    let expected = describe(&EmotionSample {
        emotion: state.current_emotion,
        confidence: state.current_emotion_confidence,
    });
    let ui = session.ui().snapshot();
    assert_eq!(ui.emotion.text, expected);
    assert!(ui.emotion.text.ends_with("% confidence)"));
    assert_eq!(ui.emotion.glyph, state.current_emotion.glyph());
    Ok(())
}

#[tokio::test]
async fn test_teardown_releases_everything() -> Result<()> {
    let (config, _backend) = start_backend().await?;
    let camera = Arc::new(SimCamera::new());
    let session = InterviewSession::new(
        config.clone(),
        api(&config)?,
        camera.clone(),
        Arc::new(SimRecognizer::new()),
    );

    session.start_camera().await?;
    session.load_question().await?;
    session.toggle_recording()?;
    assert_eq!(camera.active_streams(), 1);
    assert!(session.transcriber().is_running());

    session.teardown().await;
    assert_eq!(camera.active_streams(), 0);
    assert!(!session.camera_active().await);
    assert!(!session.sampler().is_armed());
    assert!(!session.transcriber().is_running());
    assert!(!session.recorder().is_recording());

    // Idempotent
    session.teardown().await;
    assert_eq!(camera.active_streams(), 0);
    Ok(())
}

#[tokio::test]
async fn test_camera_denied_shows_error_state() -> Result<()> {
    let (config, _backend) = start_backend().await?;
    let session = InterviewSession::new(
        config.clone(),
        api(&config)?,
        Arc::new(SimCamera::denied()),
        Arc::new(SimRecognizer::new()),
    );

    let result = session.start_camera().await;
    assert_eq!(result, Err(SessionError::PermissionDenied));

    let ui = session.ui().snapshot();
    assert_eq!(ui.camera_status, CameraStatus::Error);
    assert_eq!(ui.camera_status.label(), "Camera Error");
    assert!(session.toaster().contains(ToastKind::Error, "camera"));
    assert!(!session.sampler().is_armed());

    // The rest of the page keeps working
    session.load_question().await?;
    assert_eq!(session.ui().snapshot().question_number, "#1");
    Ok(())
}

#[tokio::test]
async fn test_resume_upload_flow() -> Result<()> {
    let (config, _backend) = start_backend().await?;
    let session = InterviewSession::new(
        config.clone(),
        api(&config)?,
        Arc::new(SimCamera::new()),
        Arc::new(SimRecognizer::new()),
    );
    let workflow = ResumeWorkflow::new(
        api(&config)?,
        session.ui().clone(),
        session.toaster().clone(),
    );

    // Rejected client-side
    let text = ResumeFile::new("resume.txt", Some("text/plain"), b"hello".to_vec());
    assert!(workflow.select(text, FileSource::DragDrop).is_err());
    assert!(session
        .toaster()
        .contains(ToastKind::Warning, "Please upload a PDF or DOCX file"));
    assert!(!session.ui().snapshot().analyze_control.enabled);

    let pdf = ResumeFile::new(
        "resume.pdf",
        Some("application/pdf"),
        b"Summary: 5 years of experience with Rust, Python and Docker. Led three projects."
            .to_vec(),
    );
    workflow.select(pdf, FileSource::Picker)?;
    assert!(session.ui().snapshot().analyze_control.enabled);

    let analysis = workflow.analyze().await?;
    assert_eq!(analysis.experience_years, 5);
    assert!(analysis.skills.contains(&"Rust".to_string()));
    assert!((30.0..=98.0).contains(&analysis.score));

    let ui = session.ui().snapshot();
    assert_eq!(ui.resume.map(|r| r.score), Some(analysis.score));
    assert!(!ui.analyze_control.loading);
    assert_eq!(ui.analyze_control.label, "Analyze Resume");
    assert!(session
        .toaster()
        .contains(ToastKind::Success, "Resume analyzed successfully!"));
    Ok(())
}

#[tokio::test]
async fn test_backend_rejects_unsupported_upload() -> Result<()> {
    let (config, _backend) = start_backend().await?;
    let client = api(&config)?;

    let file = ResumeFile::new("notes.txt", None, b"plain text".to_vec());
    let result = client.analyze_resume(&file).await;
    assert_eq!(
        result,
        Err(SessionError::ServerRejection(
            "Only PDF and DOCX files are supported".to_string()
        ))
    );
    Ok(())
}

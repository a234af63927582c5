use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use hiriscope::sim::{SimCamera, SimRecognizer};
use hiriscope::{
    spawn_backend, Config, FileSource, HttpInterviewApi, InterviewApi, InterviewSession,
    ResumeFile, ResumeWorkflow,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hiriscope", version, about = "Interview practice session controller")]
struct Cli {
    /// Config file path, without extension
    #[arg(long, default_value = "config/hiriscope")]
    config: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the development backend
    Serve,
    /// Run a scripted interview with simulated devices
    Demo {
        /// Backend to talk to; an in-process backend is started if omitted
        #[arg(long)]
        base_url: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let cfg = Config::load(&cli.config)?;

    info!("HiRiscope v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Command::Serve => serve(cfg).await,
        Command::Demo { base_url } => demo(cfg, base_url).await,
    }
}

async fn serve(cfg: Config) -> Result<()> {
    let addr = format!("{}:{}", cfg.server.bind, cfg.server.port);
    let (_, _, handle) = spawn_backend(&cfg, &addr).await?;
    handle.await.context("Development backend task failed")?;
    Ok(())
}

async fn demo(mut cfg: Config, base_url: Option<String>) -> Result<()> {
    let _backend = match base_url {
        Some(url) => {
            cfg.api.base_url = url;
            None
        }
        None => {
            let (addr, _, handle) = spawn_backend(&cfg, "127.0.0.1:0").await?;
            cfg.api.base_url = format!("http://{}", addr);
            Some(handle)
        }
    };

    let api: Arc<dyn InterviewApi> = Arc::new(HttpInterviewApi::new(cfg.api.clone())?);
    let recognizer = SimRecognizer::new()
        .with_step_delay(Duration::from_millis(700))
        .with_run(vec![
            "I enjoy building reliable systems",
            "and my greatest strengths are patience and clear communication",
        ])
        .with_run(vec!["because I like to finish what I start"]);

    let session = InterviewSession::new(
        cfg,
        Arc::clone(&api),
        Arc::new(SimCamera::new()),
        Arc::new(recognizer),
    );

    let mut changes = session.ui().subscribe();
    let logger = tokio::spawn(async move {
        while changes.changed().await.is_ok() {
            let ui = changes.borrow_and_update().clone();
            match serde_json::to_string(&ui) {
                Ok(json) => info!(target: "hiriscope::ui", "{}", json),
                Err(e) => warn!("Failed to serialize UI state: {}", e),
            }
        }
    });

    if session.start_camera().await.is_err() {
        warn!("Continuing without camera");
    }
    session.load_question().await?;
    session.toggle_recording()?;
    tokio::time::sleep(Duration::from_secs(6)).await;
    session.toggle_recording()?;

    match session.submit_answer().await {
        Ok(result) => info!("Score {} ({})", result.score, result.feedback),
        Err(e) => warn!("Submission failed: {}", e),
    }

    let resume = ResumeWorkflow::new(
        Arc::clone(&api),
        session.ui().clone(),
        session.toaster().clone(),
    );
    let file = ResumeFile::new(
        "resume.pdf",
        None,
        b"Summary: engineer with 6 years in Rust, Python and AWS. Led projects. Education: BSc."
            .to_vec(),
    );
    if resume.select(file, FileSource::Picker).is_ok() {
        if let Err(e) = resume.analyze().await {
            warn!("Resume analysis failed: {}", e);
        }
    }

    let url = session.finish().await?;
    info!("Finished, results at {}", url);

    // Let the logger drain the final UI update
    tokio::time::sleep(Duration::from_millis(50)).await;
    logger.abort();
    Ok(())
}

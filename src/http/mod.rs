//! Development backend
//!
//! A heuristic stand-in for the remote interview services, so the session
//! controller can be exercised end to end:
//! - GET /api/get_question - Next question from a rotating bank
//! - POST /process_emotion - Deterministic emotion classification
//! - POST /submit_answer - Score fusion and feedback
//! - POST /upload_resume - Keyword-based resume analysis
//! - GET /health - Health check

mod handlers;
mod routes;
pub mod scoring;
mod state;

pub use routes::create_router;
pub use state::{AnswerRecord, BackendState, EmotionLog, InterviewRecord, QUESTION_BANK};

use crate::config::Config;
use anyhow::{Context, Result};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// Bind the backend on `addr` and serve it in a background task.
/// Returns the bound address, which differs from `addr` when port 0 is used.
pub async fn spawn_backend(
    config: &Config,
    addr: &str,
) -> Result<(SocketAddr, BackendState, JoinHandle<()>)> {
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind development backend to {}", addr))?;
    let local = listener.local_addr()?;

    let state = BackendState::new();
    let app = create_router(&config.api, state.clone());
    info!("Development backend listening on {}", local);

    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            error!("Development backend stopped: {}", e);
        }
    });

    Ok((local, state, handle))
}

//! Interview session management
//!
//! This module provides the `InterviewSession` hub that coordinates:
//! - Camera capture and periodic emotion sampling
//! - Continuous speech transcription
//! - The recording state machine and its time cap
//! - Answer submission and session finish

mod session;

pub use session::InterviewSession;

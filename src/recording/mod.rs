//! Recording session state machine
//!
//! `Idle → Recording → Idle`. Entering starts the transcriber and a one
//! second tick timer; leaving (by the user, the time cap, a new question or
//! teardown) stops both and decides whether the answer can be submitted.

mod machine;
mod recorder;

pub use machine::{
    check_start, next_state, RecordingEvent, RecordingState, StopReason, TRANSITIONS,
};
pub use recorder::Recorder;

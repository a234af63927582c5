//! Simulated devices
//!
//! Scripted stand-ins for the camera and the speech engine, used by the demo
//! command and the test suites.

mod camera;
mod recognizer;

pub use camera::SimCamera;
pub use recognizer::{SimRecognizer, SimStep};

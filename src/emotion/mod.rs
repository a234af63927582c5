//! Emotion labels and the periodic sampling loop

mod label;
mod sampler;

pub use label::EmotionLabel;
pub use sampler::{describe, distribution, EmotionSampler, SamplerStats};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Emotional state reported by the remote classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmotionLabel {
    Confident,
    Happy,
    #[default]
    Neutral,
    Nervous,
}

impl EmotionLabel {
    /// All labels in display order
    pub const ALL: [EmotionLabel; 4] = [
        EmotionLabel::Confident,
        EmotionLabel::Happy,
        EmotionLabel::Neutral,
        EmotionLabel::Nervous,
    ];

    pub fn glyph(self) -> &'static str {
        match self {
            Self::Confident => "😎",
            Self::Happy => "😊",
            Self::Neutral => "😐",
            Self::Nervous => "😰",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Confident => "confident",
            Self::Happy => "happy",
            Self::Neutral => "neutral",
            Self::Nervous => "nervous",
        }
    }

    /// Capitalized name shown in the UI
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Confident => "Confident",
            Self::Happy => "Happy",
            Self::Neutral => "Neutral",
            Self::Nervous => "Nervous",
        }
    }
}

impl fmt::Display for EmotionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names() {
        let label: EmotionLabel = serde_json::from_str("\"nervous\"").unwrap();
        assert_eq!(label, EmotionLabel::Nervous);
        assert_eq!(
            serde_json::to_string(&EmotionLabel::Confident).unwrap(),
            "\"confident\""
        );
        assert!(serde_json::from_str::<EmotionLabel>("\"angry\"").is_err());
    }

    #[test]
    fn test_every_label_has_a_glyph() {
        for label in EmotionLabel::ALL {
            assert!(!label.glyph().is_empty());
            assert_eq!(label.display_name().to_lowercase(), label.as_str());
        }
    }
}

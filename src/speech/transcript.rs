use serde::{Deserialize, Serialize};

/// One recognizer result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecognitionResult {
    pub text: String,
    pub is_final: bool,
}

impl RecognitionResult {
    pub fn interim(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_final: false,
        }
    }

    pub fn final_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_final: true,
        }
    }
}

/// Accumulated transcript for the current question
///
/// `current` mirrors the result list of the engine run in progress (the
/// engine re-sends the whole list on every event). When a run ends, its
/// results are moved into `committed` so text survives engine restarts.
#[derive(Debug, Clone, Default)]
pub struct TranscriptBuffer {
    committed: Vec<String>,
    current: Vec<RecognitionResult>,
}

impl TranscriptBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_current(&mut self, results: Vec<RecognitionResult>) {
        self.current = results;
    }

    /// Close out the current run
    pub fn commit(&mut self) {
        self.committed
            .extend(self.current.drain(..).map(|r| r.text));
    }

    pub fn clear(&mut self) {
        self.committed.clear();
        self.current.clear();
    }

    /// Full transcript, chunks joined by single spaces
    pub fn text(&self) -> String {
        self.committed
            .iter()
            .map(String::as_str)
            .chain(self.current.iter().map(|r| r.text.as_str()))
            .map(str::trim)
            .filter(|chunk| !chunk.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_text_not_delta() {
        let mut buffer = TranscriptBuffer::new();
        buffer.set_current(vec![RecognitionResult::interim("I have")]);
        assert_eq!(buffer.text(), "I have");

        buffer.set_current(vec![
            RecognitionResult::final_text("I have five years"),
            RecognitionResult::interim(" of rust"),
        ]);
        assert_eq!(buffer.text(), "I have five years of rust");
    }

    #[test]
    fn test_commit_survives_next_run() {
        let mut buffer = TranscriptBuffer::new();
        buffer.set_current(vec![RecognitionResult::final_text("first run")]);
        buffer.commit();
        buffer.set_current(vec![RecognitionResult::interim("second")]);
        assert_eq!(buffer.text(), "first run second");

        buffer.clear();
        assert_eq!(buffer.text(), "");
    }
}

//! Voice dictation into the chat input
//!
//! The recognizer is platform-provided; `Dictation` only tracks whether it
//! is listening and folds transcripts into the draft.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SpeechError {
    #[error("Voice input is not supported on this platform.")]
    Unsupported,
    #[error("Speech recognizer failed: {0}")]
    Recognizer(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecognitionConfig {
    pub language: String,
    pub continuous: bool,
    pub interim_results: bool,
}

impl Default for RecognitionConfig {
    fn default() -> Self {
        Self {
            language: "en-US".to_string(),
            continuous: false,
            interim_results: false,
        }
    }
}

/// Platform speech-to-text engine
pub trait SpeechRecognizer {
    fn is_supported(&self) -> bool;
    fn start(&mut self, config: &RecognitionConfig) -> Result<(), SpeechError>;
    fn stop(&mut self);
}

/// Dictation state for one input box
#[derive(Debug)]
pub struct Dictation<R> {
    recognizer: R,
    listening: bool,
    draft: String,
}

impl<R: SpeechRecognizer> Dictation<R> {
    pub fn new(recognizer: R) -> Self {
        Self {
            recognizer,
            listening: false,
            draft: String::new(),
        }
    }

    pub fn is_listening(&self) -> bool {
        self.listening
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn set_draft(&mut self, draft: impl Into<String>) {
        self.draft = draft.into();
    }

    /// Hand the draft over for sending, leaving it empty
    pub fn take_draft(&mut self) -> String {
        std::mem::take(&mut self.draft)
    }

    /// Start listening, or stop if already listening
    pub fn toggle(&mut self) -> Result<(), SpeechError> {
        if !self.recognizer.is_supported() {
            return Err(SpeechError::Unsupported);
        }
        if self.listening {
            self.recognizer.stop();
            self.listening = false;
        } else {
            self.recognizer.start(&RecognitionConfig::default())?;
            self.listening = true;
        }
        tracing::debug!(listening = self.listening, "Dictation toggled");
        Ok(())
    }

    pub fn on_result(&mut self, transcript: &str) {
        if !self.draft.is_empty() {
            self.draft.push(' ');
        }
        self.draft.push_str(transcript);
    }

    pub fn on_end(&mut self) {
        self.listening = false;
    }

    /// Stop listening and return the error to show next to the input
    pub fn on_error(&mut self, error: &str) -> SpeechError {
        tracing::warn!(error, "Speech recognition error");
        self.listening = false;
        SpeechError::Recognizer(error.to_string())
    }
}

/// Recognizer for platforms without speech input
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRecognizer;

impl SpeechRecognizer for NoRecognizer {
    fn is_supported(&self) -> bool {
        false
    }

    fn start(&mut self, _config: &RecognitionConfig) -> Result<(), SpeechError> {
        Err(SpeechError::Unsupported)
    }

    fn stop(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct FakeRecognizer {
        starts: Vec<RecognitionConfig>,
        stops: usize,
    }

    impl SpeechRecognizer for FakeRecognizer {
        fn is_supported(&self) -> bool {
            true
        }

        fn start(&mut self, config: &RecognitionConfig) -> Result<(), SpeechError> {
            self.starts.push(config.clone());
            Ok(())
        }

        fn stop(&mut self) {
            self.stops += 1;
        }
    }

    #[test]
    fn test_toggle_starts_then_stops() {
        let mut dictation = Dictation::new(FakeRecognizer::default());
        dictation.toggle().unwrap();
        assert!(dictation.is_listening());
        assert_eq!(dictation.recognizer.starts, vec![RecognitionConfig::default()]);
        assert_eq!(dictation.recognizer.starts[0].language, "en-US");

        dictation.toggle().unwrap();
        assert!(!dictation.is_listening());
        assert_eq!(dictation.recognizer.stops, 1);
    }

    #[test]
    fn test_results_append_with_single_space() {
        let mut dictation = Dictation::new(FakeRecognizer::default());
        dictation.on_result("sharp pain");
        assert_eq!(dictation.draft(), "sharp pain");
        dictation.on_result("in my knee");
        assert_eq!(dictation.draft(), "sharp pain in my knee");
        assert_eq!(dictation.take_draft(), "sharp pain in my knee");
        assert_eq!(dictation.draft(), "");
    }

    #[test]
    fn test_end_and_error_stop_listening() {
        let mut dictation = Dictation::new(FakeRecognizer::default());
        dictation.toggle().unwrap();
        dictation.on_end();
        assert!(!dictation.is_listening());

        dictation.toggle().unwrap();
        let error = dictation.on_error("no-speech");
        assert!(!dictation.is_listening());
        assert_eq!(error.to_string(), "Speech recognizer failed: no-speech");
    }

    #[test]
    fn test_unsupported_platform() {
        let mut dictation = Dictation::new(NoRecognizer);
        assert_eq!(dictation.toggle(), Err(SpeechError::Unsupported));
        assert!(!dictation.is_listening());
    }
}

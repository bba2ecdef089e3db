//! Default language oracle backed by `whatlang`.

use super::{LanguageGuess, LanguageOracle};
use whatlang::{Detector, Lang};

/// Trigram-based oracle. Language codes are ISO 639-3 (`fra`, `spa`, ...).
pub struct WhatlangOracle {
    detector: Detector,
}

impl WhatlangOracle {
    pub fn new() -> Self {
        Self {
            detector: Detector::new(),
        }
    }
}

impl Default for WhatlangOracle {
    fn default() -> Self {
        Self::new()
    }
}

impl LanguageOracle for WhatlangOracle {
    fn rank(&self, text: &str) -> Vec<LanguageGuess> {
        match self.detector.detect(text) {
            Some(info) => vec![LanguageGuess::new(info.lang().code(), info.confidence())],
            None => Vec::new(),
        }
    }
}

/// English name for a language code, if the code is known.
pub fn language_name(code: &str) -> Option<&'static str> {
    Lang::from_code(code).map(|lang| lang.eng_name())
}

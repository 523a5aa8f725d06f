use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RequestError {
    #[error("unknown generation mode: {0}")]
    UnknownMode(String),
}

/// Granularity of the generated text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Paragraphs,
    Sentences,
    Words,
    ListItems,
}

impl Mode {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Paragraphs => "paragraphs",
            Self::Sentences => "sentences",
            Self::Words => "words",
            Self::ListItems => "list_items",
        }
    }

    pub fn all() -> [Mode; 4] {
        [Self::Paragraphs, Self::Sentences, Self::Words, Self::ListItems]
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Mode {
    type Err = RequestError;

    /// Accepts the English mode names plus the French labels used by the
    /// generation form.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "paragraphs" | "paragraph" | "p" | "paragraphes" => Ok(Self::Paragraphs),
            "sentences" | "sentence" | "s" | "phrases" => Ok(Self::Sentences),
            "words" | "word" | "w" | "mots" => Ok(Self::Words),
            "list_items" | "list" | "items" | "l" | "liste" => Ok(Self::ListItems),
            other => Err(RequestError::UnknownMode(other.to_string())),
        }
    }
}

/// Largest number of units a single request may ask for.
pub const MAX_COUNT: usize = 500;

/// A generation request as handed over by a form, CLI or API caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub mode: Mode,
    pub count: usize,
}

impl GenerationRequest {
    /// Build a request, correcting a non-positive count to 1 and capping
    /// it at [`MAX_COUNT`].
    pub fn new(mode: Mode, count: i64) -> Self {
        Self {
            mode,
            count: usize::try_from(count)
                .ok()
                .filter(|c| *c >= 1)
                .unwrap_or(1)
                .min(MAX_COUNT),
        }
    }

    /// Build a request from raw form values. An unparsable count is
    /// treated like a non-positive one.
    pub fn from_form(mode: &str, count: &str) -> Result<Self, RequestError> {
        let mode = mode.parse()?;
        let count = count.trim().parse::<i64>().unwrap_or(1);
        Ok(Self::new(mode, count))
    }
}

/// The rendered result of one generation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationOutput {
    /// Plain text, units separated by a single space.
    pub text: String,
    /// The same units wrapped in mode-appropriate HTML.
    pub markup: String,
    /// Human-readable resume line.
    pub summary: String,
}

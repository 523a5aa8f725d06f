/// Ligature post-processing — ordered regex substitutions on finished text.

use regex::Regex;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LigatureError {
    #[error("invalid ligature pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
}

/// A compiled substitution rule.
#[derive(Debug, Clone)]
pub struct LigatureRule {
    pub pattern: Regex,
    /// Replacement text; `$1` / `${1}` refer to capture groups.
    pub replacement: String,
}

/// Ordered ligature rules. Each rule sees the output of the previous one.
#[derive(Debug, Clone, Default)]
pub struct LigatureSet {
    rules: Vec<LigatureRule>,
}

impl LigatureSet {
    /// Compile `(pattern, replacement)` pairs, keeping their order.
    pub fn from_pairs<I, P, R>(pairs: I) -> Result<Self, LigatureError>
    where
        I: IntoIterator<Item = (P, R)>,
        P: AsRef<str>,
        R: Into<String>,
    {
        let rules = pairs
            .into_iter()
            .map(|(pattern, replacement)| {
                let pattern = pattern.as_ref();
                Regex::new(pattern)
                    .map(|regex| LigatureRule {
                        pattern: regex,
                        replacement: replacement.into(),
                    })
                    .map_err(|source| LigatureError::Pattern {
                        pattern: pattern.to_string(),
                        source,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rules })
    }

    /// Load rules from a RON list of `(pattern, replacement)` pairs.
    pub fn load_from_ron(path: &Path) -> Result<Self, LigatureError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse_ron(&contents)
    }

    pub fn parse_ron(input: &str) -> Result<Self, LigatureError> {
        let pairs: Vec<(String, String)> = ron::from_str(input)?;
        Self::from_pairs(pairs)
    }

    /// Append the rules of `other` after these ones.
    pub fn extend(&mut self, other: LigatureSet) {
        self.rules.extend(other.rules);
    }

    /// Apply every rule in order, each replacing all of its matches.
    pub fn apply(&self, text: &str) -> String {
        let mut output = text.to_string();
        for rule in &self.rules {
            output = rule
                .pattern
                .replace_all(&output, rule.replacement.as_str())
                .into_owned();
        }
        output
    }

    pub fn rules(&self) -> &[LigatureRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

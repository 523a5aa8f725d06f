use serde::{Deserialize, Serialize};

/// Grammatical gender of a resolved section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Gender {
    Masculine,
    Feminine,
}

impl Default for Gender {
    fn default() -> Self {
        Self::Masculine
    }
}

impl Gender {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Masculine => "masculin",
            Self::Feminine => "féminin",
        }
    }
}

/// Grammatical number of a resolved section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Number {
    Singular,
    Plural,
}

impl Default for Number {
    fn default() -> Self {
        Self::Singular
    }
}

impl Number {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Singular => "singulier",
            Self::Plural => "pluriel",
        }
    }
}

/// Agreement preset threaded through a sentence.
///
/// Empty until the `protagonists` section resolves; from then on every
/// later section of the same sentence is resolved with its gender and
/// number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Agreement {
    pub gender: Option<Gender>,
    pub number: Option<Number>,
}

impl Agreement {
    pub fn new(gender: Gender, number: Number) -> Self {
        Self {
            gender: Some(gender),
            number: Some(number),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.gender.is_none() && self.number.is_none()
    }
}

/// A section after resolution: its text plus the agreement it carries.
///
/// `kind` is the subtype name for a single partial and the section name
/// once compound partials have been merged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSection {
    pub kind: String,
    pub text: String,
    pub gender: Gender,
    pub number: Number,
}

impl ResolvedSection {
    pub fn agreement(&self) -> Agreement {
        Agreement::new(self.gender, self.number)
    }
}

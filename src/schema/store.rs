use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use super::agreement::{Gender, Number};

/// Name of the section whose agreement is threaded through the rest of a
/// sentence.
pub const PROTAGONISTS: &str = "protagonists";

/// One whitespace-separated token of a sentence structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Token {
    /// Literal text, emitted as-is.
    Literal(String),
    /// `{name}` or, when optional, `{?name}`.
    Category {
        name: String,
        optional: bool,
        suffix: String,
    },
    /// `{@name}`.
    Section { name: String, suffix: String },
}

/// A parsed sentence template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Structure {
    pub source: String,
    pub tokens: Vec<Token>,
}

/// A sub-component pool inside a gendered category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slot {
    /// Probability in [0, 1] that a value is drawn instead of the default.
    #[serde(default = "always")]
    pub required: f64,
    pub values: Vec<String>,
    #[serde(default)]
    pub default: Option<String>,
}

fn always() -> f64 {
    1.0
}

/// Component name → slot, for one gender and number.
pub type Components = BTreeMap<String, Slot>;

/// Gender → number → components.
pub type Forms = BTreeMap<Gender, BTreeMap<Number, Components>>;

/// A named word pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WordCategory {
    Flat(Vec<String>),
    Gendered(Forms),
}

impl WordCategory {
    pub fn flat_values(&self) -> Option<&[String]> {
        match self {
            Self::Flat(values) => Some(values),
            Self::Gendered(_) => None,
        }
    }

    pub fn forms(&self) -> Option<&Forms> {
        match self {
            Self::Flat(_) => None,
            Self::Gendered(forms) => Some(forms),
        }
    }

    /// Every candidate string of the category, in declaration order for
    /// flat pools and in gender/number/component order otherwise.
    pub fn all_values(&self) -> Vec<&str> {
        match self {
            Self::Flat(values) => values.iter().map(String::as_str).collect(),
            Self::Gendered(forms) => forms
                .values()
                .flat_map(|numbers| numbers.values())
                .flat_map(|components| components.values())
                .flat_map(|slot| slot.values.iter().map(String::as_str))
                .collect(),
        }
    }
}

/// One choice inside a composite section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SectionOption {
    Single(String),
    /// Several partials joined by a separator and merged.
    Compound(Vec<String>),
}

impl SectionOption {
    pub fn subtypes(&self) -> &[String] {
        match self {
            Self::Single(name) => std::slice::from_ref(name),
            Self::Compound(names) => names,
        }
    }
}

/// A grammatical unit referenced from structures with `{@name}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SectionType {
    /// Draws straight from a flat category.
    Direct(String),
    Composite {
        options: Vec<SectionOption>,
        #[serde(default)]
        separators: Vec<String>,
        /// Component order used when assembling a partial's text.
        structure: Vec<String>,
    },
}

/// The read-only grammar: structures, word pools and sections.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TemplateStore {
    pub structures: Vec<Structure>,
    pub categories: HashMap<String, WordCategory>,
    pub sections: HashMap<String, SectionType>,
    /// Categories whose values make up the single-word pool.
    pub words: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(values: &[&str]) -> Slot {
        Slot {
            required: 1.0,
            values: values.iter().map(|v| v.to_string()).collect(),
            default: None,
        }
    }

    #[test]
    fn flat_category_values() {
        let category = WordCategory::Flat(vec!["hier".to_string(), "demain".to_string()]);
        assert_eq!(category.all_values(), vec!["hier", "demain"]);
        assert!(category.forms().is_none());
        assert_eq!(category.flat_values().map(|v| v.len()), Some(2));
    }

    #[test]
    fn gendered_category_values_follow_key_order() {
        let mut forms = Forms::new();
        forms.insert(
            Gender::Feminine,
            BTreeMap::from([(
                Number::Singular,
                Components::from([("noun".to_string(), slot(&["voisine"]))]),
            )]),
        );
        forms.insert(
            Gender::Masculine,
            BTreeMap::from([
                (
                    Number::Plural,
                    Components::from([("noun".to_string(), slot(&["voisins"]))]),
                ),
                (
                    Number::Singular,
                    Components::from([
                        ("noun".to_string(), slot(&["voisin"])),
                        ("article".to_string(), slot(&["le"])),
                    ]),
                ),
            ]),
        );
        let category = WordCategory::Gendered(forms);
        assert_eq!(
            category.all_values(),
            vec!["le", "voisin", "voisins", "voisine"]
        );
        assert!(category.flat_values().is_none());
    }

    #[test]
    fn section_option_subtypes() {
        let single = SectionOption::Single("person".to_string());
        assert_eq!(single.subtypes(), ["person".to_string()]);

        let compound = SectionOption::Compound(vec!["name".to_string(), "person".to_string()]);
        assert_eq!(compound.subtypes().len(), 2);
    }

    #[test]
    fn slot_required_defaults_to_always() {
        let slot: Slot = ron::from_str(r#"(values: ["le"])"#).unwrap();
        assert_eq!(slot.required, 1.0);
        assert_eq!(slot.default, None);
    }
}

/// Template store runtime — token parsing, RON loading, validation and merging.

use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

use crate::schema::store::{SectionType, Structure, TemplateStore, Token, WordCategory};

#[derive(Debug, Error)]
pub enum GrammarError {
    #[error("template parse error in '{template}': {reason}")]
    TemplateParse { template: String, reason: String },
    #[error("invalid reference: {0}")]
    InvalidReference(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
}

impl Structure {
    /// Parse a structure string into tokens.
    ///
    /// Tokens are separated by whitespace. Syntax per token:
    /// - `{name}` → category reference
    /// - `{?name}` → optional category reference
    /// - `{@name}` → section reference
    /// - a reference may be followed by literal punctuation: `{@places},`
    /// - everything else → literal
    pub fn parse(input: &str) -> Result<Structure, GrammarError> {
        let tokens = input
            .split_whitespace()
            .map(|raw| {
                parse_token(raw).map_err(|reason| GrammarError::TemplateParse {
                    template: input.to_string(),
                    reason,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        if tokens.is_empty() {
            return Err(GrammarError::TemplateParse {
                template: input.to_string(),
                reason: "empty structure".to_string(),
            });
        }

        Ok(Structure {
            source: input.to_string(),
            tokens,
        })
    }

    /// Names of every category referenced by this structure.
    pub fn category_refs(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().filter_map(|token| match token {
            Token::Category { name, .. } => Some(name.as_str()),
            _ => None,
        })
    }

    /// Names of every section referenced by this structure.
    pub fn section_refs(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().filter_map(|token| match token {
            Token::Section { name, .. } => Some(name.as_str()),
            _ => None,
        })
    }
}

fn parse_token(raw: &str) -> Result<Token, String> {
    let Some(open) = raw.find('{') else {
        if raw.contains('}') {
            return Err(format!("unmatched closing brace in '{raw}'"));
        }
        return Ok(Token::Literal(raw.to_string()));
    };

    if open != 0 {
        return Err(format!("reference must start the token in '{raw}'"));
    }

    let rest = &raw[1..];
    let close = rest
        .find('}')
        .ok_or_else(|| format!("unclosed brace in '{raw}'"))?;
    let content = &rest[..close];
    let suffix = &rest[close + 1..];

    if content.contains('{') {
        return Err(format!("nested braces are not allowed in '{raw}'"));
    }
    if suffix.contains('{') || suffix.contains('}') {
        return Err(format!("only one reference per token in '{raw}'"));
    }

    let (name, section, optional) = if let Some(name) = content.strip_prefix('@') {
        (name, true, false)
    } else if let Some(name) = content.strip_prefix('?') {
        (name, false, true)
    } else {
        (content, false, false)
    };

    if name.is_empty() {
        return Err(format!("empty reference in '{raw}'"));
    }

    let name = name.to_string();
    let suffix = suffix.to_string();
    Ok(if section {
        Token::Section { name, suffix }
    } else {
        Token::Category {
            name,
            optional,
            suffix,
        }
    })
}

// RON deserialization helper: structures are written as plain strings.

#[derive(Debug, Deserialize)]
struct RonStore {
    #[serde(default)]
    structures: Vec<String>,
    #[serde(default)]
    categories: HashMap<String, WordCategory>,
    #[serde(default)]
    sections: HashMap<String, SectionType>,
    #[serde(default)]
    words: Vec<String>,
}

impl TemplateStore {
    /// Load a template store from a RON file. The store is not validated;
    /// call [`TemplateStore::validate`] once every part has been merged.
    pub fn load_from_ron(path: &Path) -> Result<TemplateStore, GrammarError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse_ron(&contents)
    }

    /// Parse a template store from a RON string.
    pub fn parse_ron(input: &str) -> Result<TemplateStore, GrammarError> {
        let raw: RonStore = ron::from_str(input)?;
        let structures = raw
            .structures
            .iter()
            .map(|s| Structure::parse(s))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(TemplateStore {
            structures,
            categories: raw.categories,
            sections: raw.sections,
            words: raw.words,
        })
    }

    /// Merge another store into this one. Categories and sections from
    /// `other` override those of `self` with the same name; structures and
    /// word sources are appended.
    pub fn merge(&mut self, other: TemplateStore) {
        self.structures.extend(other.structures);
        self.categories.extend(other.categories);
        self.sections.extend(other.sections);
        for source in other.words {
            if !self.words.contains(&source) {
                self.words.push(source);
            }
        }
    }

    /// Check that every name referenced by a structure, section or word
    /// source resolves to a definition of the right shape.
    pub fn validate(&self) -> Result<(), GrammarError> {
        for structure in &self.structures {
            for name in structure.category_refs() {
                self.require_flat(name, &format!("structure '{}'", structure.source))?;
            }
            for name in structure.section_refs() {
                if !self.sections.contains_key(name) {
                    return Err(GrammarError::InvalidReference(format!(
                        "structure '{}' references unknown section '{}'",
                        structure.source, name
                    )));
                }
            }
        }

        for (name, section) in &self.sections {
            match section {
                SectionType::Direct(category) => {
                    self.require_flat(category, &format!("section '{name}'"))?;
                }
                SectionType::Composite {
                    options, structure, ..
                } => {
                    if structure.is_empty() {
                        return Err(GrammarError::InvalidReference(format!(
                            "section '{name}' has an empty component structure"
                        )));
                    }
                    for subtype in options.iter().flat_map(|option| option.subtypes()) {
                        match self.categories.get(subtype) {
                            Some(WordCategory::Gendered(_)) => {}
                            Some(WordCategory::Flat(_)) => {
                                return Err(GrammarError::InvalidReference(format!(
                                    "section '{name}' uses flat category '{subtype}' as a subtype"
                                )));
                            }
                            None => {
                                return Err(GrammarError::InvalidReference(format!(
                                    "section '{name}' references unknown subtype '{subtype}'"
                                )));
                            }
                        }
                    }
                }
            }
        }

        for source in &self.words {
            if !self.categories.contains_key(source) {
                return Err(GrammarError::InvalidReference(format!(
                    "word source references unknown category '{source}'"
                )));
            }
        }

        Ok(())
    }

    fn require_flat(&self, name: &str, context: &str) -> Result<(), GrammarError> {
        match self.categories.get(name) {
            Some(WordCategory::Flat(_)) => Ok(()),
            Some(WordCategory::Gendered(_)) => Err(GrammarError::InvalidReference(format!(
                "{context} draws directly from gendered category '{name}'"
            ))),
            None => Err(GrammarError::InvalidReference(format!(
                "{context} references unknown category '{name}'"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::store::SectionOption;

    fn category(name: &str) -> Token {
        Token::Category {
            name: name.to_string(),
            optional: false,
            suffix: String::new(),
        }
    }

    #[test]
    fn parse_literal_only() {
        let s = Structure::parse("il pleut").unwrap();
        assert_eq!(
            s.tokens,
            vec![
                Token::Literal("il".to_string()),
                Token::Literal("pleut".to_string())
            ]
        );
    }

    #[test]
    fn parse_category_ref() {
        let s = Structure::parse("devant {objects} hier").unwrap();
        assert_eq!(s.tokens.len(), 3);
        assert_eq!(s.tokens[1], category("objects"));
    }

    #[test]
    fn parse_optional_ref() {
        let s = Structure::parse("{?connectors} rien").unwrap();
        assert_eq!(
            s.tokens[0],
            Token::Category {
                name: "connectors".to_string(),
                optional: true,
                suffix: String::new(),
            }
        );
    }

    #[test]
    fn parse_section_ref_with_suffix() {
        let s = Structure::parse("{@places}, {@protagonists} dorment.").unwrap();
        assert_eq!(
            s.tokens[0],
            Token::Section {
                name: "places".to_string(),
                suffix: ",".to_string(),
            }
        );
        assert_eq!(
            s.tokens[1],
            Token::Section {
                name: "protagonists".to_string(),
                suffix: String::new(),
            }
        );
        assert_eq!(s.tokens[2], Token::Literal("dorment.".to_string()));
    }

    #[test]
    fn parse_references_collected() {
        let s = Structure::parse("{times}, {@protagonists} {@actions} {objects} {?adverbs}.")
            .unwrap();
        assert_eq!(
            s.category_refs().collect::<Vec<_>>(),
            vec!["times", "objects", "adverbs"]
        );
        assert_eq!(
            s.section_refs().collect::<Vec<_>>(),
            vec!["protagonists", "actions"]
        );
    }

    #[test]
    fn parse_empty_braces_error() {
        assert!(Structure::parse("mauvais {} ici").is_err());
        assert!(Structure::parse("mauvais {@} ici").is_err());
        assert!(Structure::parse("mauvais {?} ici").is_err());
    }

    #[test]
    fn parse_nested_braces_error() {
        assert!(Structure::parse("mauvais {a{b}} ici").is_err());
    }

    #[test]
    fn parse_unclosed_brace_error() {
        assert!(Structure::parse("mauvais {ouvert ici").is_err());
    }

    #[test]
    fn parse_unmatched_close_error() {
        assert!(Structure::parse("mauvais } ici").is_err());
    }

    #[test]
    fn parse_prefixed_reference_error() {
        assert!(Structure::parse("d'{places}").is_err());
    }

    #[test]
    fn parse_empty_structure_error() {
        assert!(Structure::parse("   ").is_err());
    }

    #[test]
    fn load_test_store_from_ron() {
        let path = std::path::PathBuf::from("tests/fixtures/test_store.ron");
        let store = TemplateStore::load_from_ron(&path).unwrap();
        assert_eq!(store.structures.len(), 3);
        assert!(store.categories.contains_key("places"));
        assert!(store.categories.contains_key("person"));
        assert!(store.sections.contains_key("protagonists"));
        store.validate().unwrap();
    }

    #[test]
    fn validate_rejects_unknown_category() {
        let store = TemplateStore::parse_ron(
            r#"(
                structures: ["{nowhere} rien."],
                categories: {},
            )"#,
        )
        .unwrap();
        let err = store.validate().unwrap_err();
        assert!(err.to_string().contains("nowhere"), "{err}");
    }

    #[test]
    fn validate_rejects_unknown_section() {
        let store = TemplateStore::parse_ron(r#"(structures: ["{@ghosts} passent."])"#).unwrap();
        assert!(matches!(
            store.validate(),
            Err(GrammarError::InvalidReference(_))
        ));
    }

    #[test]
    fn validate_rejects_flat_subtype() {
        let store = TemplateStore::parse_ron(
            r#"(
                categories: { "places": Flat(["ici"]) },
                sections: {
                    "protagonists": Composite(
                        options: [Single("places")],
                        structure: ["noun"],
                    ),
                },
            )"#,
        )
        .unwrap();
        let err = store.validate().unwrap_err();
        assert!(err.to_string().contains("flat category"), "{err}");
    }

    #[test]
    fn validate_rejects_gendered_category_token() {
        let store = TemplateStore::parse_ron(
            r#"(
                structures: ["{person} dort."],
                categories: {
                    "person": Gendered({
                        Masculine: { Singular: { "noun": (values: ["voisin"]) } },
                    }),
                },
            )"#,
        )
        .unwrap();
        assert!(store.validate().is_err());
    }

    #[test]
    fn validate_rejects_unknown_word_source() {
        let store = TemplateStore::parse_ron(r#"(words: ["times"])"#).unwrap();
        assert!(store.validate().is_err());
    }

    #[test]
    fn merge_precedence() {
        let mut base = TemplateStore::parse_ron(
            r#"(
                structures: ["{places} d'abord."],
                categories: {
                    "places": Flat(["ici"]),
                    "times": Flat(["hier"]),
                },
                words: ["places"],
            )"#,
        )
        .unwrap();
        let overrides = TemplateStore::parse_ron(
            r#"(
                structures: ["{times} ensuite."],
                categories: { "places": Flat(["là-bas", "ailleurs"]) },
                words: ["places", "times"],
            )"#,
        )
        .unwrap();

        base.merge(overrides);

        assert_eq!(base.structures.len(), 2);
        assert_eq!(
            base.categories["places"].flat_values().map(|v| v.len()),
            Some(2)
        );
        assert!(base.categories.contains_key("times"));
        assert_eq!(base.words, vec!["places".to_string(), "times".to_string()]);
        base.validate().unwrap();
    }

    #[test]
    fn composite_options_deserialize() {
        let store = TemplateStore::parse_ron(
            r#"(
                sections: {
                    "protagonists": Composite(
                        options: [Single("name"), Compound(["name", "person"])],
                        separators: [" et "],
                        structure: ["article", "noun"],
                    ),
                },
            )"#,
        )
        .unwrap();
        match &store.sections["protagonists"] {
            SectionType::Composite { options, separators, .. } => {
                assert_eq!(options[0], SectionOption::Single("name".to_string()));
                assert_eq!(options[1].subtypes().len(), 2);
                assert_eq!(separators, &vec![" et ".to_string()]);
            }
            other => panic!("expected composite section, got {other:?}"),
        }
    }

    #[test]
    fn template_store_default() {
        let store = TemplateStore::default();
        assert!(store.structures.is_empty());
        assert!(store.validate().is_ok());
    }
}

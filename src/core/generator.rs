/// Text generator — words, sentences, paragraphs and list items.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;
use thiserror::Error;
use tracing::debug;

use crate::core::context::GenerationContext;
use crate::core::grammar::GrammarError;
use crate::core::section::resolve_section;
use crate::schema::request::Mode;
use crate::schema::store::{TemplateStore, Token, PROTAGONISTS};

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("empty candidate pool: {0}")]
    EmptyPool(String),
    #[error("unknown category: {0}")]
    UnknownCategory(String),
    #[error("unknown section: {0}")]
    UnknownSection(String),
    #[error("category '{0}' cannot be drawn from this way")]
    WrongShape(String),
}

/// Fewest sentences in a paragraph.
pub const MIN_PARAGRAPH_SENTENCES: usize = 2;
/// Most sentences in a paragraph.
pub const MAX_PARAGRAPH_SENTENCES: usize = 8;

/// Generates text from a validated template store.
#[derive(Debug, Clone)]
pub struct Generator {
    store: TemplateStore,
    word_pool: Vec<String>,
}

impl Generator {
    /// Validate the store and build the flattened word pool.
    pub fn new(store: TemplateStore) -> Result<Self, GrammarError> {
        store.validate()?;

        let word_pool = store
            .words
            .iter()
            .filter_map(|source| store.categories.get(source))
            .flat_map(|category| category.all_values())
            .filter(|value| !value.trim().is_empty())
            .map(str::to_string)
            .collect();

        Ok(Self { store, word_pool })
    }

    pub fn store(&self) -> &TemplateStore {
        &self.store
    }

    pub fn word_pool(&self) -> &[String] {
        &self.word_pool
    }

    /// Generate `count` units of `mode` with fresh repeat-avoidance state.
    pub fn generate(
        &self,
        mode: Mode,
        count: usize,
        rng: &mut StdRng,
    ) -> Result<Vec<String>, GenerationError> {
        let mut ctx = GenerationContext::new();
        self.generate_with(mode, count, &mut ctx, rng)
    }

    /// Generate `count` units of `mode` against an existing context.
    pub fn generate_with(
        &self,
        mode: Mode,
        count: usize,
        ctx: &mut GenerationContext,
        rng: &mut StdRng,
    ) -> Result<Vec<String>, GenerationError> {
        (0..count.max(1))
            .map(|_| match mode {
                Mode::Paragraphs => self.paragraph(ctx, rng),
                Mode::Sentences => self.sentence(ctx, rng),
                Mode::Words => self.word(rng),
                Mode::ListItems => self.list_item(ctx, rng),
            })
            .collect()
    }

    /// One word from the flattened word pool. Multi-word entries yield
    /// one of their words.
    pub fn word(&self, rng: &mut StdRng) -> Result<String, GenerationError> {
        let entry = self
            .word_pool
            .choose(rng)
            .ok_or_else(|| GenerationError::EmptyPool("words".to_string()))?;
        let words: Vec<&str> = entry.split_whitespace().collect();
        Ok(words.choose(rng).copied().unwrap_or(entry.as_str()).to_string())
    }

    /// One sentence from a uniformly chosen structure.
    pub fn sentence(
        &self,
        ctx: &mut GenerationContext,
        rng: &mut StdRng,
    ) -> Result<String, GenerationError> {
        ctx.begin_sentence();

        let structure = self
            .store
            .structures
            .choose(rng)
            .ok_or_else(|| GenerationError::EmptyPool("structures".to_string()))?;
        debug!(structure = %structure.source, "sentence structure");

        let mut parts: Vec<String> = Vec::with_capacity(structure.tokens.len());
        for token in &structure.tokens {
            match token {
                Token::Literal(text) => parts.push(text.clone()),
                Token::Category {
                    name,
                    optional,
                    suffix,
                } => {
                    if *optional && !rng.gen_ratio(1, 6) {
                        continue;
                    }
                    let text = self.draw_category(name, ctx, rng)?;
                    parts.push(format!("{text}{suffix}"));
                }
                Token::Section { name, suffix } => {
                    let preset = ctx.agreement;
                    let resolved = resolve_section(&self.store, name, preset, ctx, rng)?;
                    if name == PROTAGONISTS {
                        ctx.agreement = resolved.agreement();
                    }
                    if !resolved.text.is_empty() {
                        parts.push(format!("{}{}", resolved.text, suffix));
                    }
                }
            }
        }

        parts.retain(|part| !part.is_empty());
        Ok(capitalize(&parts.join(" ")))
    }

    /// The sentences of one paragraph: between 2 and 8 of them.
    pub fn paragraph_sentences(
        &self,
        ctx: &mut GenerationContext,
        rng: &mut StdRng,
    ) -> Result<Vec<String>, GenerationError> {
        let count = rng.gen_range(MIN_PARAGRAPH_SENTENCES..=MAX_PARAGRAPH_SENTENCES);
        (0..count).map(|_| self.sentence(ctx, rng)).collect()
    }

    pub fn paragraph(
        &self,
        ctx: &mut GenerationContext,
        rng: &mut StdRng,
    ) -> Result<String, GenerationError> {
        Ok(self.paragraph_sentences(ctx, rng)?.join(" "))
    }

    pub fn list_item(
        &self,
        ctx: &mut GenerationContext,
        rng: &mut StdRng,
    ) -> Result<String, GenerationError> {
        self.sentence(ctx, rng)
    }

    fn draw_category(
        &self,
        name: &str,
        ctx: &mut GenerationContext,
        rng: &mut StdRng,
    ) -> Result<String, GenerationError> {
        let values = self
            .store
            .categories
            .get(name)
            .ok_or_else(|| GenerationError::UnknownCategory(name.to_string()))?
            .flat_values()
            .ok_or_else(|| GenerationError::WrongShape(name.to_string()))?;
        Ok(ctx.draw_recent(name, values, rng)?.to_string())
    }
}

/// Uppercase the first character of a string.
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(c) => {
            let upper: String = c.to_uppercase().collect();
            format!("{}{}", upper, chars.as_str())
        }
    }
}

/// The generation pipeline: request → generator → ligatures → markup + summary.
///
/// Wires together the template store, the generator, the ligature pass
/// and the summary builder behind a seeded engine.

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::core::generator::{GenerationError, Generator};
use crate::core::grammar::GrammarError;
use crate::core::ligature::{LigatureError, LigatureSet};
use crate::core::markup;
use crate::core::summary;
use crate::schema::request::{GenerationOutput, GenerationRequest, Mode, MAX_COUNT};
use crate::schema::store::TemplateStore;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("grammar error: {0}")]
    Grammar(#[from] GrammarError),
    #[error("generation error: {0}")]
    Generation(#[from] GenerationError),
    #[error("ligature error: {0}")]
    Ligature(#[from] LigatureError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Directory holding one sub-directory per language.
pub const DEFAULT_DATA_DIR: &str = "lang_data";

/// The top-level engine. Built via `FauxTexteEngine::builder()`.
#[derive(Debug, Clone)]
pub struct FauxTexteEngine {
    generator: Generator,
    ligatures: LigatureSet,
    seed: u64,
    generation_count: u64,
}

/// Builder for constructing a `FauxTexteEngine`.
pub struct FauxTexteEngineBuilder {
    languages: Vec<String>,
    data_dir: PathBuf,
    store_dir: Option<PathBuf>,
    ligatures_path: Option<PathBuf>,
    seed: Option<u64>,
    /// Directly provided store (for testing without files).
    store: Option<TemplateStore>,
    /// Directly provided ligatures (for testing without files).
    ligatures: Option<LigatureSet>,
}

impl FauxTexteEngine {
    pub fn builder() -> FauxTexteEngineBuilder {
        FauxTexteEngineBuilder {
            languages: Vec::new(),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            store_dir: None,
            ligatures_path: None,
            seed: None,
            store: None,
            ligatures: None,
        }
    }

    /// Serve a generation request: text, markup and summary line.
    pub fn generate(
        &mut self,
        request: &GenerationRequest,
    ) -> Result<GenerationOutput, PipelineError> {
        let count = request.count.clamp(1, MAX_COUNT);
        let units = self.generate_units(request.mode, count)?;
        let text = units.join(" ");

        Ok(GenerationOutput {
            markup: markup::render(request.mode, &units),
            summary: summary::summarize(request.mode, count, &text),
            text,
        })
    }

    /// Generate post-processed units without rendering them.
    ///
    /// Every call starts from fresh repeat-avoidance state and its own RNG,
    /// seeded from the engine seed and the number of previous calls.
    pub fn generate_units(
        &mut self,
        mode: Mode,
        count: usize,
    ) -> Result<Vec<String>, PipelineError> {
        let run_seed = self.seed.wrapping_add(self.generation_count);
        let mut rng = StdRng::seed_from_u64(run_seed);
        info!(
            mode = %mode,
            count,
            seed = self.seed,
            generation = self.generation_count,
            "generation started"
        );
        self.generation_count += 1;

        let units: Vec<String> = self
            .generator
            .generate(mode, count, &mut rng)?
            .iter()
            .map(|unit| self.ligatures.apply(unit))
            .collect();

        debug!(units = units.len(), "generation finished");
        Ok(units)
    }

    /// Generated units joined by a single space.
    pub fn generate_text(&mut self, mode: Mode, count: usize) -> Result<String, PipelineError> {
        Ok(self.generate_units(mode, count)?.join(" "))
    }

    /// Restart the engine's sequence from a new seed.
    pub fn reseed(&mut self, seed: u64) {
        self.seed = seed;
        self.generation_count = 0;
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn generator(&self) -> &Generator {
        &self.generator
    }

    pub fn ligatures(&self) -> &LigatureSet {
        &self.ligatures
    }
}

impl FauxTexteEngineBuilder {
    /// Load `<data_dir>/<name>/store.ron` and `ligatures.ron`.
    pub fn language(mut self, name: &str) -> Self {
        self.languages.push(name.to_string());
        self
    }

    pub fn data_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.data_dir = path.into();
        self
    }

    /// Merge every `.ron` store in a directory, in file name order.
    pub fn store_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.store_dir = Some(path.into());
        self
    }

    pub fn ligatures_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.ligatures_path = Some(path.into());
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Provide a store directly (for testing without files).
    pub fn with_store(mut self, store: TemplateStore) -> Self {
        self.store = Some(store);
        self
    }

    /// Provide ligatures directly (for testing without files).
    pub fn with_ligatures(mut self, ligatures: LigatureSet) -> Self {
        self.ligatures = Some(ligatures);
        self
    }

    pub fn build(self) -> Result<FauxTexteEngine, PipelineError> {
        let mut store = self.store.unwrap_or_default();
        let mut ligatures = self.ligatures.unwrap_or_default();

        for language in &self.languages {
            let dir = self.data_dir.join(language);

            let store_path = dir.join("store.ron");
            if store_path.exists() {
                store.merge(TemplateStore::load_from_ron(&store_path)?);
            } else {
                warn!(path = %store_path.display(), "language store not found");
            }

            let ligatures_path = dir.join("ligatures.ron");
            if ligatures_path.exists() {
                ligatures.extend(LigatureSet::load_from_ron(&ligatures_path)?);
            } else {
                warn!(path = %ligatures_path.display(), "language ligatures not found");
            }
        }

        // Local overrides: later files win.
        if let Some(ref dir) = self.store_dir {
            if dir.exists() {
                load_ron_files_from_dir(dir, |path| {
                    store.merge(TemplateStore::load_from_ron(path)?);
                    Ok(())
                })?;
            } else {
                warn!(path = %dir.display(), "store directory not found");
            }
        }

        if let Some(ref path) = self.ligatures_path {
            ligatures.extend(LigatureSet::load_from_ron(path)?);
        }

        let generator = Generator::new(store)?;
        let seed = self.seed.unwrap_or_else(rand::random);
        info!(
            structures = generator.store().structures.len(),
            categories = generator.store().categories.len(),
            sections = generator.store().sections.len(),
            ligatures = ligatures.len(),
            seed,
            "engine built"
        );

        Ok(FauxTexteEngine {
            generator,
            ligatures,
            seed,
            generation_count: 0,
        })
    }
}

/// Load all .ron files from a directory in file name order, calling
/// `loader` for each.
fn load_ron_files_from_dir<F>(dir: &Path, mut loader: F) -> Result<(), PipelineError>
where
    F: FnMut(&Path) -> Result<(), PipelineError>,
{
    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().and_then(|s| s.to_str()) == Some("ron") {
            paths.push(path);
        }
    }
    paths.sort();
    for path in &paths {
        loader(path)?;
    }
    Ok(())
}

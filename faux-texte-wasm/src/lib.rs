//! WASM bindings for faux-texte — powers the generation form of the web page.

use wasm_bindgen::prelude::*;

use faux_texte::core::ligature::LigatureSet;
use faux_texte::core::pipeline::FauxTexteEngine;
use faux_texte::schema::request::{GenerationRequest, Mode};
use faux_texte::schema::store::TemplateStore;

// ---------------------------------------------------------------------------
// Embedded language data — compiled into the WASM binary
// ---------------------------------------------------------------------------
mod data {
    pub const FR_STORE: &str = include_str!("../../lang_data/fr/store.ron");
    pub const FR_LIGATURES: &str = include_str!("../../lang_data/fr/ligatures.ron");
}

#[derive(serde::Serialize)]
struct ModeInfo {
    id: &'static str,
    label: &'static str,
}

fn mode_label(mode: Mode) -> &'static str {
    match mode {
        Mode::Paragraphs => "paragraphes",
        Mode::Sentences => "phrases",
        Mode::Words => "mots",
        Mode::ListItems => "liste",
    }
}

// ---------------------------------------------------------------------------
// FauxTexte — the main exported struct
// ---------------------------------------------------------------------------
#[wasm_bindgen]
pub struct FauxTexte {
    engine: FauxTexteEngine,
}

#[wasm_bindgen]
impl FauxTexte {
    /// Create a generator over the embedded French data.
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u64) -> Result<FauxTexte, JsError> {
        let store = TemplateStore::parse_ron(data::FR_STORE)
            .map_err(|e| JsError::new(&format!("Store parse error: {e}")))?;
        let ligatures = LigatureSet::parse_ron(data::FR_LIGATURES)
            .map_err(|e| JsError::new(&format!("Ligature parse error: {e}")))?;

        let engine = FauxTexteEngine::builder()
            .seed(seed)
            .with_store(store)
            .with_ligatures(ligatures)
            .build()
            .map_err(|e| JsError::new(&format!("Engine build error: {e}")))?;

        Ok(FauxTexte { engine })
    }

    /// Serve a form submission. `count` is the raw field value; anything
    /// that is not a positive integer is treated as 1.
    ///
    /// Returns JSON:
    /// ```json
    /// { "text": "...", "markup": "<p>...</p>", "summary": "2 paragraphes, ..." }
    /// ```
    pub fn generate(&mut self, mode: &str, count: &str) -> Result<String, JsError> {
        let request = GenerationRequest::from_form(mode, count)
            .map_err(|e| JsError::new(&format!("Invalid request: {e}")))?;
        let output = self
            .engine
            .generate(&request)
            .map_err(|e| JsError::new(&format!("Generation error: {e}")))?;
        serde_json::to_string(&output)
            .map_err(|e| JsError::new(&format!("Serialization error: {e}")))
    }

    /// Return a JSON array of `{ id, label }` for the form's mode selector.
    pub fn modes() -> String {
        let modes: Vec<ModeInfo> = Mode::all()
            .into_iter()
            .map(|mode| ModeInfo {
                id: mode.name(),
                label: mode_label(mode),
            })
            .collect();
        serde_json::to_string(&modes).unwrap_or_else(|_| "[]".to_string())
    }

    /// Restart the sequence from a new seed.
    pub fn reset(&mut self, seed: u64) {
        self.engine.reseed(seed);
    }
}

/// Store Linter — validates a template store and reports weak spots.
///
/// Usage: store_linter <store_path> [--strict]

use clap::Parser;
use faux_texte::core::context::RECENT_CAPACITY;
use faux_texte::schema::store::{SectionType, TemplateStore, WordCategory, PROTAGONISTS};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::process;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "store_linter", version, about = "Validate a faux-texte template store")]
struct Cli {
    /// Store file, or a directory whose .ron files are merged in name order.
    store_path: PathBuf,

    /// Treat warnings as errors.
    #[arg(long)]
    strict: bool,
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();

    if !cli.store_path.exists() {
        eprintln!("ERROR: Path '{}' does not exist", cli.store_path.display());
        process::exit(1);
    }

    let (store, load_errors) = load_stores(&cli.store_path);

    println!(
        "Loaded {} structures, {} categories, {} sections",
        store.structures.len(),
        store.categories.len(),
        store.sections.len()
    );

    let (mut errors, warnings) = lint_store(&store);
    errors.splice(0..0, load_errors);

    println!("\n=== Store Lint Report ===\n");

    if errors.is_empty() && warnings.is_empty() {
        println!("All checks passed!");
    }

    for warning in &warnings {
        println!("WARNING: {}", warning);
    }

    for error in &errors {
        println!("ERROR: {}", error);
    }

    println!(
        "\nSummary: {} errors, {} warnings",
        errors.len(),
        warnings.len()
    );

    if errors.is_empty() && !(cli.strict && !warnings.is_empty()) {
        process::exit(0);
    } else {
        process::exit(1);
    }
}

/// Load a store file, or merge every store of a directory tree in name
/// order. Files that cannot be read or parsed are returned as errors.
fn load_stores(path: &Path) -> (TemplateStore, Vec<String>) {
    let mut store = TemplateStore::default();
    let mut errors = Vec::new();
    if path.is_dir() {
        load_stores_recursive(path, &mut store, &mut errors);
    } else {
        load_store_file(path, &mut store, &mut errors);
    }
    (store, errors)
}

fn load_stores_recursive(dir: &Path, store: &mut TemplateStore, errors: &mut Vec<String>) {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            errors.push(format!("cannot read directory {}: {}", dir.display(), e));
            return;
        }
    };
    let mut paths = Vec::new();
    for entry in entries {
        match entry {
            Ok(entry) => paths.push(entry.path()),
            Err(e) => errors.push(format!("cannot read entry in {}: {}", dir.display(), e)),
        }
    }
    paths.sort();

    for path in paths {
        if path.is_dir() {
            load_stores_recursive(&path, store, errors);
        } else if path.extension().and_then(|s| s.to_str()) == Some("ron")
            && path.file_name().and_then(|s| s.to_str()) != Some("ligatures.ron")
        {
            load_store_file(&path, store, errors);
        } else {
            debug!(path = %path.display(), "skipped");
        }
    }
}

fn load_store_file(path: &Path, store: &mut TemplateStore, errors: &mut Vec<String>) {
    match TemplateStore::load_from_ron(path) {
        Ok(loaded) => {
            println!("  Loaded: {}", path.display());
            store.merge(loaded);
        }
        Err(e) => errors.push(format!("failed to load {}: {}", path.display(), e)),
    }
}

fn lint_store(store: &TemplateStore) -> (Vec<String>, Vec<String>) {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    if let Err(e) = store.validate() {
        errors.push(e.to_string());
    }

    if store.structures.is_empty() {
        errors.push("store defines no sentence structures".to_string());
    }

    if !store.sections.contains_key(PROTAGONISTS) {
        warnings.push(format!(
            "no '{PROTAGONISTS}' section: sentences will not carry agreement"
        ));
    }

    // Pool sizes
    let mut names: Vec<&String> = store.categories.keys().collect();
    names.sort();
    for name in &names {
        match &store.categories[*name] {
            WordCategory::Flat(values) => {
                if values.is_empty() {
                    errors.push(format!("category '{name}' is empty"));
                } else if values.len() <= RECENT_CAPACITY {
                    warnings.push(format!(
                        "category '{name}' has only {} values; repeats cannot be avoided",
                        values.len()
                    ));
                }
            }
            WordCategory::Gendered(forms) => {
                for (gender, numbers) in forms {
                    for (number, components) in numbers {
                        for (component, slot) in components {
                            let at = format!(
                                "'{name}' {} {} '{component}'",
                                gender.label(),
                                number.label()
                            );
                            if slot.values.is_empty() {
                                errors.push(format!("slot {at} has no values"));
                            }
                            if !(0.0..=1.0).contains(&slot.required) {
                                warnings.push(format!(
                                    "slot {at} has probability {} outside [0, 1]",
                                    slot.required
                                ));
                            }
                        }
                    }
                }
            }
        }
    }

    // Sections
    let mut section_names: Vec<&String> = store.sections.keys().collect();
    section_names.sort();
    for name in &section_names {
        if let SectionType::Composite {
            options,
            separators,
            structure,
        } = &store.sections[*name]
        {
            if options.is_empty() {
                errors.push(format!("section '{name}' has no options"));
            }
            let compound = options.iter().any(|option| option.subtypes().len() > 1);
            if compound && separators.is_empty() {
                errors.push(format!(
                    "section '{name}' has compound options but no separators"
                ));
            }

            // Components the structure lists but no subtype ever defines.
            let defined: BTreeSet<&str> = options
                .iter()
                .flat_map(|option| option.subtypes())
                .filter_map(|subtype| store.categories.get(subtype)?.forms())
                .flat_map(|forms| forms.values())
                .flat_map(|numbers| numbers.values())
                .flat_map(|components| components.keys().map(String::as_str))
                .collect();
            for component in structure {
                if !defined.contains(component.as_str()) {
                    warnings.push(format!(
                        "section '{name}' lists component '{component}' that no subtype defines"
                    ));
                }
            }
        }
    }

    // Unused definitions
    let mut used_categories: BTreeSet<&str> = store.words.iter().map(String::as_str).collect();
    let mut used_sections: BTreeSet<&str> = BTreeSet::new();
    for structure in &store.structures {
        used_categories.extend(structure.category_refs());
        used_sections.extend(structure.section_refs());
    }
    for section in store.sections.values() {
        match section {
            SectionType::Direct(category) => {
                used_categories.insert(category);
            }
            SectionType::Composite { options, .. } => {
                used_categories.extend(
                    options
                        .iter()
                        .flat_map(|option| option.subtypes())
                        .map(String::as_str),
                );
            }
        }
    }
    for name in &names {
        if !used_categories.contains(name.as_str()) {
            warnings.push(format!("category '{name}' is never used"));
        }
    }
    for name in &section_names {
        if !used_sections.contains(name.as_str()) {
            warnings.push(format!("section '{name}' is never referenced"));
        }
    }

    (errors, warnings)
}

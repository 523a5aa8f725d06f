/// Section resolution — partial assembly, agreement and compound merging.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::core::context::GenerationContext;
use crate::core::generator::GenerationError;
use crate::schema::agreement::{Agreement, Gender, Number, ResolvedSection};
use crate::schema::store::{SectionOption, SectionType, TemplateStore};

/// Resolve the section `name` under an agreement preset.
///
/// Composite sections pick one option uniformly. A single subtype resolves
/// to one partial; a compound option resolves every subtype with the same
/// preset and merges the partials. Direct sections draw from their flat
/// category and take their agreement from the preset.
pub fn resolve_section(
    store: &TemplateStore,
    name: &str,
    preset: Agreement,
    ctx: &mut GenerationContext,
    rng: &mut StdRng,
) -> Result<ResolvedSection, GenerationError> {
    let section = store
        .sections
        .get(name)
        .ok_or_else(|| GenerationError::UnknownSection(name.to_string()))?;

    match section {
        SectionType::Direct(category) => resolve_direct(store, category, preset, ctx, rng),
        SectionType::Composite {
            options,
            separators,
            structure,
        } => {
            let option = options
                .choose(rng)
                .ok_or_else(|| GenerationError::EmptyPool(format!("{name}.options")))?;
            match option {
                SectionOption::Single(subtype) => {
                    resolve_partial(store, subtype, structure, preset, ctx, rng)
                }
                SectionOption::Compound(subtypes) => {
                    let partials = subtypes
                        .iter()
                        .map(|subtype| resolve_partial(store, subtype, structure, preset, ctx, rng))
                        .collect::<Result<Vec<_>, _>>()?;
                    merge_partials(name, partials, separators, rng)
                }
            }
        }
    }
}

fn resolve_direct(
    store: &TemplateStore,
    category: &str,
    preset: Agreement,
    ctx: &mut GenerationContext,
    rng: &mut StdRng,
) -> Result<ResolvedSection, GenerationError> {
    let values = store
        .categories
        .get(category)
        .ok_or_else(|| GenerationError::UnknownCategory(category.to_string()))?
        .flat_values()
        .ok_or_else(|| GenerationError::WrongShape(category.to_string()))?;
    let text = ctx.draw_recent(category, values, rng)?;

    Ok(ResolvedSection {
        kind: category.to_string(),
        text: text.to_string(),
        gender: preset.gender.unwrap_or_default(),
        number: preset.number.unwrap_or_default(),
    })
}

/// Resolve one subtype of a composite section into a partial.
///
/// The preset gender and number are kept when the subtype defines them;
/// otherwise gender is a fair coin among the defined genders and number a
/// uniform choice among the numbers defined for that gender. Components
/// are assembled in `structure` order; components the chosen form lacks
/// are skipped.
pub fn resolve_partial(
    store: &TemplateStore,
    subtype: &str,
    structure: &[String],
    preset: Agreement,
    ctx: &mut GenerationContext,
    rng: &mut StdRng,
) -> Result<ResolvedSection, GenerationError> {
    let forms = store
        .categories
        .get(subtype)
        .ok_or_else(|| GenerationError::UnknownCategory(subtype.to_string()))?
        .forms()
        .ok_or_else(|| GenerationError::WrongShape(subtype.to_string()))?;

    let gender = match preset.gender.filter(|g| forms.contains_key(g)) {
        Some(gender) => gender,
        None => {
            let defined: Vec<Gender> = forms.keys().copied().collect();
            *defined
                .choose(rng)
                .ok_or_else(|| GenerationError::EmptyPool(subtype.to_string()))?
        }
    };

    let numbers = &forms[&gender];
    let number = match preset.number.filter(|n| numbers.contains_key(n)) {
        Some(number) => number,
        None => {
            let defined: Vec<Number> = numbers.keys().copied().collect();
            *defined
                .choose(rng)
                .ok_or_else(|| GenerationError::EmptyPool(format!("{subtype}.{}", gender.label())))?
        }
    };

    let components = &numbers[&number];
    let mut parts: Vec<String> = Vec::with_capacity(structure.len());
    for component in structure {
        let Some(slot) = components.get(component) else {
            continue;
        };
        let required = if slot.required.is_nan() {
            0.0
        } else {
            slot.required.clamp(0.0, 1.0)
        };
        if rng.gen_bool(required) {
            let pool = format!("{subtype}.{component}");
            parts.push(ctx.draw_unused(&pool, &slot.values, rng)?.to_string());
        } else if let Some(default) = &slot.default {
            parts.push(default.clone());
        }
    }
    parts.retain(|part| !part.is_empty());

    Ok(ResolvedSection {
        kind: subtype.to_string(),
        text: parts.join(" "),
        gender,
        number,
    })
}

/// Merge compound partials into one section.
///
/// Each later partial is appended after a separator drawn from
/// `separators`; a gender mismatch makes the whole masculine, and the
/// merged number is always plural.
pub fn merge_partials(
    section: &str,
    partials: Vec<ResolvedSection>,
    separators: &[String],
    rng: &mut StdRng,
) -> Result<ResolvedSection, GenerationError> {
    let mut partials = partials.into_iter();
    let mut merged = partials
        .next()
        .ok_or_else(|| GenerationError::EmptyPool(format!("{section}.options")))?;

    for next in partials {
        if next.gender != merged.gender {
            merged.gender = Gender::Masculine;
        }
        let separator = separators
            .choose(rng)
            .ok_or_else(|| GenerationError::EmptyPool(format!("{section}.separators")))?;
        merged.text.push_str(separator);
        merged.text.push_str(&next.text);
    }

    merged.number = Number::Plural;
    merged.kind = section.to_string();
    Ok(merged)
}

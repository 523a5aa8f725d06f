/// Pipeline integration tests — end-to-end generation over the French data.

use faux_texte::core::pipeline::FauxTexteEngine;
use faux_texte::core::summary;
use faux_texte::schema::request::{GenerationRequest, Mode};

fn french_engine(seed: u64) -> FauxTexteEngine {
    FauxTexteEngine::builder()
        .language("fr")
        .seed(seed)
        .build()
        .unwrap()
}

#[test]
fn french_engine_builds_from_data_dir() {
    let engine = french_engine(1);
    assert!(!engine.generator().store().structures.is_empty());
    assert!(!engine.ligatures().is_empty());
}

#[test]
fn paragraphs_end_to_end() {
    let mut engine = french_engine(7);
    let output = engine
        .generate(&GenerationRequest::new(Mode::Paragraphs, 3))
        .unwrap();

    assert_eq!(output.markup.matches("<p>").count(), 3);
    assert_eq!(output.markup.matches("</p> <p>").count(), 2);
    assert!(output.summary.starts_with("3 paragraphes, "), "{}", output.summary);
    assert!(output.summary.ends_with(" générés par Faux Texte."));
}

#[test]
fn sentences_are_capitalized_and_terminated() {
    let mut engine = french_engine(11);
    let units = engine.generate_units(Mode::Sentences, 40).unwrap();
    assert_eq!(units.len(), 40);
    for sentence in &units {
        let first = sentence.chars().next().unwrap();
        assert!(first.is_uppercase(), "{}", sentence);
        assert!(sentence.ends_with('.'), "{}", sentence);
        assert!(!sentence.contains("  "), "{}", sentence);
        assert!(!sentence.contains(" ,"), "{}", sentence);
    }
}

#[test]
fn words_come_from_the_word_pool() {
    let mut engine = french_engine(3);
    let pool: Vec<String> = engine
        .generator()
        .word_pool()
        .iter()
        .flat_map(|entry| entry.split_whitespace().map(str::to_string))
        .collect();

    let output = engine.generate(&GenerationRequest::new(Mode::Words, 25)).unwrap();
    let words: Vec<&str> = output.text.split(' ').collect();
    assert_eq!(words.len(), 25);
    for word in words {
        // Ligatures may have rewritten the word.
        let known = pool
            .iter()
            .any(|p| p == word || engine.ligatures().apply(p) == word);
        assert!(known, "unexpected word: {}", word);
    }
    assert!(output.summary.starts_with("25 mots, "), "{}", output.summary);
}

#[test]
fn list_items_end_to_end() {
    let mut engine = french_engine(5);
    let output = engine
        .generate(&GenerationRequest::new(Mode::ListItems, 6))
        .unwrap();
    assert!(output.markup.starts_with("<ul><li>"));
    assert!(output.markup.ends_with("</li></ul>"));
    assert_eq!(output.markup.matches("<li>").count(), 6);
    assert!(output.summary.starts_with("une liste de 6 éléments, "));
}

#[test]
fn summary_counts_match_text() {
    let mut engine = french_engine(21);
    for mode in Mode::all() {
        let output = engine.generate(&GenerationRequest::new(mode, 4)).unwrap();
        let letters = format!("{} lettres", summary::letter_count(&output.text));
        assert!(output.summary.contains(&letters), "{}", output.summary);
        if mode != Mode::Words {
            let words = format!("{} mots", summary::word_count(&output.text));
            assert!(output.summary.contains(&words), "{}", output.summary);
        }
    }
}

#[test]
fn ligatures_are_applied_and_stable() {
    let mut engine = french_engine(99);
    for _ in 0..10 {
        let text = engine.generate_text(Mode::Paragraphs, 4).unwrap();
        assert!(!text.contains("oeu") && !text.contains("Oeu"), "{}", text);
        assert_eq!(engine.ligatures().apply(&text), text);
    }
}

#[test]
fn non_positive_counts_yield_one_unit() {
    let mut engine = french_engine(8);
    for count in ["0", "-4", "", "beaucoup"] {
        let request = GenerationRequest::from_form("phrases", count).unwrap();
        assert_eq!(request.count, 1);
        let output = engine.generate(&request).unwrap();
        assert!(output.summary.starts_with("1 phrase, "), "{}", output.summary);
    }
}

#[test]
fn unknown_mode_is_rejected() {
    assert!(GenerationRequest::from_form("chapitres", "3").is_err());
}

#[test]
fn same_seed_same_output() {
    let mut engine1 = french_engine(2026);
    let mut engine2 = french_engine(2026);
    for mode in Mode::all() {
        let request = GenerationRequest::new(mode, 3);
        assert_eq!(
            engine1.generate(&request).unwrap(),
            engine2.generate(&request).unwrap()
        );
    }
}

#[test]
fn every_unit_gets_its_own_wrapper() {
    let mut engine = french_engine(7);

    let output = engine
        .generate(&GenerationRequest::new(Mode::Sentences, 3))
        .unwrap();
    assert_eq!(output.markup.matches("<p>").count(), 3, "{}", output.markup);
    assert_eq!(output.markup.matches("</p> <p>").count(), 2);

    let output = engine.generate(&GenerationRequest::new(Mode::Words, 5)).unwrap();
    assert_eq!(output.markup.matches("<span>").count(), 5, "{}", output.markup);
}

#[test]
fn markup_is_escaped() {
    let mut engine = french_engine(4);
    let output = engine
        .generate(&GenerationRequest::new(Mode::Sentences, 20))
        .unwrap();
    let sentences: Vec<&str> = output
        .markup
        .split(" <p>")
        .map(|unit| unit.trim_start_matches("<p>").trim_end_matches("</p>"))
        .collect();
    assert_eq!(sentences.len(), 20);
    for sentence in sentences {
        assert!(!sentence.contains('<') && !sentence.contains('>'), "{}", sentence);
    }
}

/// Summary line — French resume of what was generated.

use crate::schema::request::Mode;

/// Closing phrase of every summary line.
pub const ATTRIBUTION: &str = "générés par Faux Texte";

/// Number of whitespace-separated tokens.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Number of letters once every non-letter character is stripped.
pub fn letter_count(text: &str) -> usize {
    text.chars().filter(|c| c.is_alphabetic()).count()
}

/// Build the resume line for `count` units of `mode` producing `text`.
///
/// `"3 paragraphes, 152 mots, 812 lettres générés par Faux Texte."`;
/// Word mode omits the word count since it repeats the quantity.
pub fn summarize(mode: Mode, count: usize, text: &str) -> String {
    let quantity = match mode {
        Mode::Paragraphs => counted(count, "paragraphe", "paragraphes"),
        Mode::Sentences => counted(count, "phrase", "phrases"),
        Mode::Words => counted(count, "mot", "mots"),
        Mode::ListItems => format!("une liste de {}", counted(count, "élément", "éléments")),
    };

    let mut line = quantity;
    if mode != Mode::Words {
        line.push_str(", ");
        line.push_str(&counted(word_count(text), "mot", "mots"));
    }
    line.push_str(", ");
    line.push_str(&counted(letter_count(text), "lettre", "lettres"));
    line.push(' ');
    line.push_str(ATTRIBUTION);
    line.push('.');
    line
}

/// French pluralization: 0 and 1 take the singular.
fn counted(n: usize, singular: &str, plural: &str) -> String {
    format!("{} {}", n, if n > 1 { plural } else { singular })
}

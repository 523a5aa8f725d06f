/// HTML markup for generated units.

use crate::schema::request::Mode;

/// Wrap each generated unit in mode-appropriate HTML.
///
/// - paragraphs and sentences: one `<p>` per unit, separated by a space;
/// - words: one `<span>` per unit, separated by a space;
/// - list items: `<li>` per unit, no separator, inside a `<ul>`.
pub fn render(mode: Mode, units: &[String]) -> String {
    match mode {
        Mode::Paragraphs | Mode::Sentences => wrap_each(units, "p", " "),
        Mode::Words => wrap_each(units, "span", " "),
        Mode::ListItems => format!("<ul>{}</ul>", wrap_each(units, "li", "")),
    }
}

fn wrap_each(units: &[String], tag: &str, separator: &str) -> String {
    units
        .iter()
        .map(|unit| format!("<{tag}>{}</{tag}>", escape(unit)))
        .collect::<Vec<_>>()
        .join(separator)
}

/// Escape the characters HTML gives meaning to.
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Placeholder page example — fills a small HTML page with French faux text.
///
/// A title, a lead sentence, three paragraphs and a bullet list, followed by
/// the summary line of each block.
///
/// Run with: cargo run --example placeholder_page [output.html]

use faux_texte::core::pipeline::FauxTexteEngine;
use faux_texte::schema::request::{GenerationOutput, GenerationRequest, Mode};
use tracing_subscriber::EnvFilter;

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let output_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "placeholder.html".to_string());

    let mut engine = FauxTexteEngine::builder()
        .language("fr")
        .seed(2026)
        .build()
        .expect("Failed to build engine");

    let title = generate(&mut engine, Mode::Words, 4);
    let lead = generate(&mut engine, Mode::Sentences, 1);
    let body = generate(&mut engine, Mode::Paragraphs, 3);
    let list = generate(&mut engine, Mode::ListItems, 5);

    let mut page = String::new();
    page.push_str("<!DOCTYPE html>\n<html lang=\"fr\">\n<head>\n<meta charset=\"utf-8\">\n");
    page.push_str(&format!("<title>{}</title>\n</head>\n<body>\n", title.text));
    page.push_str(&format!("<h1>{}</h1>\n", title.text));
    page.push_str(&format!("<div class=\"lead\">{}</div>\n", lead.markup));
    page.push_str(&format!("<article>{}</article>\n", body.markup));
    page.push_str(&format!("<aside>{}</aside>\n", list.markup));
    page.push_str("<footer>\n");
    for block in [&lead, &body, &list] {
        page.push_str(&format!("<small>{}</small><br>\n", block.summary));
    }
    page.push_str("</footer>\n</body>\n</html>\n");

    std::fs::write(&output_path, &page).expect("Failed to write page");

    println!("========================================");
    println!("   {}", title.text);
    println!("========================================");
    println!();
    println!("{}", lead.text);
    println!();
    println!("{}", body.text);
    println!();
    println!("{}", list.summary);
    println!();
    println!("Page written to {}", output_path);
}

fn generate(engine: &mut FauxTexteEngine, mode: Mode, count: i64) -> GenerationOutput {
    engine
        .generate(&GenerationRequest::new(mode, count))
        .expect("Generation failed")
}

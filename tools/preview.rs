/// Preview — interactive generation shell for trying out a language's data.
///
/// Usage: preview [--data-dir <dir>] [--language <name>] [--store <dir>] [--seed <n>]
///
/// Commands:
///   p <n>       — generate n paragraphs
///   s <n>       — generate n sentences
///   w <n>       — generate n words
///   l <n>       — generate a list of n items
///   seed <n>    — restart from seed n
///   markup      — toggle HTML output
///   help        — list commands
///   quit        — exit

use clap::Parser;
use faux_texte::core::pipeline::{FauxTexteEngine, DEFAULT_DATA_DIR};
use faux_texte::schema::request::GenerationRequest;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "preview", version, about = "Interactive faux-texte generation shell")]
struct Cli {
    /// Directory holding one sub-directory per language.
    #[arg(long, default_value = DEFAULT_DATA_DIR)]
    data_dir: PathBuf,

    /// Language to load from the data directory.
    #[arg(short, long, default_value = "fr")]
    language: String,

    /// Extra directory of store overrides, merged after the language.
    #[arg(long)]
    store: Option<PathBuf>,

    /// Initial RNG seed.
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let mut builder = FauxTexteEngine::builder()
        .data_dir(&cli.data_dir)
        .language(&cli.language)
        .seed(cli.seed);
    if let Some(ref dir) = cli.store {
        builder = builder.store_dir(dir);
    }
    let mut engine = match builder.build() {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            std::process::exit(1);
        }
    };

    let store = engine.generator().store();
    println!(
        "Loaded {} structures, {} categories, {} sections, {} ligatures",
        store.structures.len(),
        store.categories.len(),
        store.sections.len(),
        engine.ligatures().len()
    );
    println!("Seed: {}", engine.seed());
    println!("Type 'help' for commands.\n");

    let mut show_markup = false;
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("preview> ");
        stdout.flush().ok();

        let mut line = String::new();
        if stdin.lock().read_line(&mut line).is_err() || line.is_empty() {
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let parts: Vec<&str> = line.split_whitespace().collect();
        let cmd = parts[0].to_lowercase();

        match cmd.as_str() {
            "quit" | "exit" | "q" => {
                println!("Au revoir.");
                break;
            }
            "help" | "h" | "?" => print_help(),
            "markup" => {
                show_markup = !show_markup;
                println!("Markup {}", if show_markup { "on" } else { "off" });
            }
            "seed" => {
                let Some(arg) = parts.get(1) else {
                    println!("Current seed: {}", engine.seed());
                    continue;
                };
                match arg.parse::<u64>() {
                    Ok(seed) => {
                        engine.reseed(seed);
                        println!("Seed set to {}", seed);
                    }
                    Err(_) => println!("Invalid seed: {}", arg),
                }
            }
            _ => {
                let count = parts.get(1).copied().unwrap_or("1");
                let Ok(request) = GenerationRequest::from_form(&cmd, count) else {
                    println!("Unknown command: '{}'. Type 'help' for available commands.", cmd);
                    continue;
                };

                match engine.generate(&request) {
                    Ok(output) => {
                        println!();
                        if show_markup {
                            println!("{}", output.markup);
                        } else {
                            println!("{}", output.text);
                        }
                        println!("\n[{}]\n", output.summary);
                    }
                    Err(e) => println!("ERROR: {}", e),
                }
            }
        }
    }
}

fn print_help() {
    println!("Commands:");
    println!("  p <n>       Generate n paragraphs");
    println!("  s <n>       Generate n sentences");
    println!("  w <n>       Generate n words");
    println!("  l <n>       Generate a list of n items");
    println!("  seed <n>    Restart from seed n");
    println!("  markup      Toggle HTML output");
    println!("  help        Show this help");
    println!("  quit        Exit");
    println!();
    println!("Mode names may also be spelled out: paragraphes, phrases, mots, liste.");
}

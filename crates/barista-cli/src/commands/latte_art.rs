use barista_core::catalog::{find_latte_art, latte_art_patterns, LatteArtPattern};
use barista_core::ValidationError;
use clap::Subcommand;

use super::print_json;

#[derive(Subcommand)]
pub enum LatteArtAction {
    /// List latte-art patterns
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show a pattern's steps
    Show {
        /// Pattern id or name (e.g. "heart")
        pattern: String,
    },
}

pub fn lookup(key: &str) -> Result<LatteArtPattern, ValidationError> {
    find_latte_art(key).ok_or_else(|| ValidationError::NotFound {
        kind: "latte-art pattern".into(),
        id: key.to_string(),
    })
}

pub fn run(action: LatteArtAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        LatteArtAction::List { json } => {
            let patterns = latte_art_patterns();
            if json {
                print_json(&patterns)?;
            } else {
                for p in &patterns {
                    println!("{:<13} {:<13} {:?}", p.id, p.name, p.difficulty);
                }
            }
        }
        LatteArtAction::Show { pattern } => {
            let p = lookup(&pattern)?;
            println!("{} ({:?})", p.name, p.difficulty);
            println!("{}", p.description);
            for (i, step) in p.steps.iter().enumerate() {
                println!("  {}. {step}", i + 1);
            }
        }
    }
    Ok(())
}

use barista_core::catalog::BREW_METHODS;
use clap::Subcommand;
use serde_json::json;

use super::{clock, lookup_method, print_json};

#[derive(Subcommand)]
pub enum MethodAction {
    /// List brew methods
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show a method with its default recipe
    Show {
        /// Method id or name (e.g. "v60", "French Press")
        method: String,
    },
}

pub fn run(action: MethodAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        MethodAction::List { json } => {
            if json {
                print_json(BREW_METHODS)?;
            } else {
                for m in BREW_METHODS {
                    println!(
                        "{:<13} {:<13} {:<7} {:?} body, {}",
                        m.id,
                        m.name,
                        format!("{:?}", m.difficulty),
                        m.body,
                        clock(m.default_recipe().total_duration()),
                    );
                }
            }
        }
        MethodAction::Show { method } => {
            let m = lookup_method(&method)?;
            print_json(&json!({
                "method": m,
                "recipe": m.default_recipe(),
            }))?;
        }
    }
    Ok(())
}

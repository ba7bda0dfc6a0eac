use barista_core::assistant::keyring_store::{self, API_KEY_ENTRY};
use clap::Subcommand;

#[derive(Subcommand)]
pub enum AuthAction {
    /// Store the Gemini API key in the OS keyring
    Set {
        /// API key
        key: String,
    },
    /// Remove the stored API key
    Clear,
    /// Check whether an API key is available
    Status,
}

pub fn run(action: AuthAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        AuthAction::Set { key } => {
            let key = key.trim();
            if key.is_empty() {
                return Err("API key must not be empty".into());
            }
            keyring_store::set(API_KEY_ENTRY, key)?;
            println!("API key stored");
        }
        AuthAction::Clear => {
            keyring_store::delete(API_KEY_ENTRY)?;
            println!("API key removed");
        }
        AuthAction::Status => {
            println!(
                "{}",
                if keyring_store::resolve_api_key().is_ok() {
                    "authenticated"
                } else {
                    "not authenticated"
                }
            );
        }
    }
    Ok(())
}

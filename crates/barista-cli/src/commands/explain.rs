use barista_core::storage::Config;
use barista_core::{BrewAssistant, GeminiClient};
use clap::Args;

use super::profile::ProfileOverrides;
use super::runtime;

#[derive(Args)]
pub struct ExplainArgs {
    #[command(flatten)]
    pub profile: ProfileOverrides,
}

pub fn run(args: ExplainArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let profile = args.profile.apply(config.profile.clone());
    let client = GeminiClient::from_config(config.assistant)?;

    let text = runtime()?.block_on(client.explain_flavor_profile(&profile))?;
    println!("{text}");
    Ok(())
}

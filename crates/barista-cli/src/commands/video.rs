use std::path::PathBuf;

use barista_core::assistant::prompts;
use barista_core::storage::{Config, Database};
use barista_core::{BrewAssistant, GeminiClient, ImageInput};
use clap::Args;

use super::brew::ActiveBrew;
use super::{latte_art, runtime};

#[derive(Args)]
pub struct VideoArgs {
    /// Free-form prompt; defaults to one built from the loaded recipe
    #[arg(long)]
    pub prompt: Option<String>,
    /// Use a latte-art pattern's tutorial prompt
    #[arg(long, conflicts_with = "prompt")]
    pub latte_art: Option<String>,
    /// Reference image (png, jpeg, webp)
    #[arg(long)]
    pub image: Option<PathBuf>,
    /// Where to write the video
    #[arg(short, long, default_value = "barista-video.mp4")]
    pub output: PathBuf,
}

fn resolve_prompt(args: &VideoArgs) -> Result<String, Box<dyn std::error::Error>> {
    if let Some(prompt) = &args.prompt {
        return Ok(prompt.clone());
    }
    if let Some(key) = &args.latte_art {
        return Ok(latte_art::lookup(key)?.video_prompt);
    }
    let db = Database::open()?;
    let active = ActiveBrew::require(&db)?;
    Ok(prompts::recipe_video_prompt(active.session.current()))
}

pub fn run(args: VideoArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let prompt = resolve_prompt(&args)?;
    let image = args.image.as_deref().map(ImageInput::from_path).transpose()?;
    let client = GeminiClient::from_config(config.assistant)?;

    eprintln!("Generating video (this can take a few minutes)...");
    let bytes = runtime()?.block_on(client.generate_video(image.as_ref(), &prompt))?;
    std::fs::write(&args.output, &bytes)?;
    println!("{} ({} bytes)", args.output.display(), bytes.len());
    Ok(())
}

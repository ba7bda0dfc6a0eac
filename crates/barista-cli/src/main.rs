use clap::{CommandFactory, Parser, Subcommand};

mod commands;
mod logging;

#[derive(Parser)]
#[command(name = "barista", version, about = "Barista brew companion CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse brew methods
    Method {
        #[command(subcommand)]
        action: commands::method::MethodAction,
    },
    /// Show, generate or rescale recipes
    Recipe {
        #[command(subcommand)]
        action: commands::recipe::RecipeAction,
    },
    /// Brew timer control
    Brew {
        #[command(subcommand)]
        action: commands::brew::BrewAction,
    },
    /// Saved recipes and latte-art patterns
    Favorites {
        #[command(subcommand)]
        action: commands::favorites::FavoritesAction,
    },
    /// Recently brewed recipes
    History {
        #[command(subcommand)]
        action: commands::history::HistoryAction,
    },
    /// Bean profile used for generation and explanations
    Profile {
        #[command(subcommand)]
        action: commands::profile::ProfileAction,
    },
    /// Explain the flavor profile of the current beans
    Explain(commands::explain::ExplainArgs),
    /// Ask the barista tutor
    Tutor(commands::tutor::TutorArgs),
    /// Generate an instructional video
    Video(commands::video::VideoArgs),
    /// Latte-art tutorials
    LatteArt {
        #[command(subcommand)]
        action: commands::latte_art::LatteArtAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// API key management
    Auth {
        #[command(subcommand)]
        action: commands::auth::AuthAction,
    },
    /// Print shell completions
    Completions {
        /// Target shell
        shell: clap_complete::Shell,
    },
}

fn main() {
    logging::init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Method { action } => commands::method::run(action),
        Commands::Recipe { action } => commands::recipe::run(action),
        Commands::Brew { action } => commands::brew::run(action),
        Commands::Favorites { action } => commands::favorites::run(action),
        Commands::History { action } => commands::history::run(action),
        Commands::Profile { action } => commands::profile::run(action),
        Commands::Explain(args) => commands::explain::run(args),
        Commands::Tutor(args) => commands::tutor::run(args),
        Commands::Video(args) => commands::video::run(args),
        Commands::LatteArt { action } => commands::latte_art::run(action),
        Commands::Config { action } => commands::config::run(action),
        Commands::Auth { action } => commands::auth::run(action),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "barista", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

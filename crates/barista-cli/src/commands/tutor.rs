use std::io::{BufRead, Write};

use barista_core::storage::{Config, Database};
use barista_core::{BrewAssistant, ChatMessage, GeminiClient};
use clap::Args;

use super::runtime;

const TUTOR_KEY: &str = "tutor_history";

#[derive(Args)]
pub struct TutorArgs {
    /// Question to ask; omit for an interactive session
    pub message: Option<String>,
    /// Forget the previous conversation first
    #[arg(long)]
    pub reset: bool,
}

fn load_history(db: &Database) -> Vec<ChatMessage> {
    if let Ok(Some(json)) = db.kv_get(TUTOR_KEY) {
        if let Ok(history) = serde_json::from_str(&json) {
            return history;
        }
    }
    Vec::new()
}

fn save_history(db: &Database, history: &[ChatMessage]) -> Result<(), Box<dyn std::error::Error>> {
    db.kv_set(TUTOR_KEY, &serde_json::to_string(history)?)?;
    Ok(())
}

pub fn run(args: TutorArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let db = Database::open()?;
    if args.reset {
        db.kv_delete(TUTOR_KEY)?;
    }
    let client = GeminiClient::from_config(config.assistant)?;
    let rt = runtime()?;
    let mut history = load_history(&db);

    type AskResult = Result<(), Box<dyn std::error::Error>>;
    let ask = |message: String, history: &mut Vec<ChatMessage>| -> AskResult {
        let message = message.trim().to_string();
        if message.is_empty() {
            return Ok(());
        }
        let reply = rt.block_on(client.tutor_reply(history, &message))?;
        println!("{reply}");
        history.push(ChatMessage::user(message));
        history.push(ChatMessage::model(reply));
        save_history(&db, history)
    };

    if let Some(message) = args.message {
        return ask(message, &mut history);
    }

    let stdin = std::io::stdin();
    loop {
        print!("you> ");
        std::io::stdout().flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        if matches!(line.trim(), "exit" | "quit") {
            break;
        }
        if let Err(e) = ask(line, &mut history) {
            eprintln!("error: {e}");
        }
    }
    Ok(())
}

pub mod gemini;
pub mod keyring_store;
pub mod prompts;
pub mod traits;

pub use gemini::GeminiClient;
pub use traits::{BrewAssistant, ChatMessage, ChatRole, ImageInput};

use std::future::Future;
use std::path::Path;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::brew::Recipe;
use crate::error::AssistantError;
use crate::profile::CoffeeProfile;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Model,
}

impl ChatRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatRole::User => "user",
            ChatRole::Model => "model",
        }
    }
}

/// One turn of a tutor conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
    /// Epoch milliseconds.
    pub timestamp: i64,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self::now(ChatRole::User, content)
    }

    pub fn model(content: impl Into<String>) -> Self {
        Self::now(ChatRole::Model, content)
    }

    fn now(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: Utc::now().timestamp_millis(),
        }
    }
}

/// Reference image for video generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageInput {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

impl ImageInput {
    pub fn new(bytes: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            bytes,
            mime_type: mime_type.into(),
        }
    }

    /// Read an image file, guessing the MIME type from its extension.
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        let mime_type = match ext.as_deref() {
            Some("jpg") | Some("jpeg") => "image/jpeg",
            Some("webp") => "image/webp",
            Some("gif") => "image/gif",
            _ => "image/png",
        };
        Ok(Self::new(bytes, mime_type))
    }
}

/// A generative service that can write recipes, explain beans, answer
/// brewing questions and render instructional clips.
pub trait BrewAssistant: Send + Sync {
    /// Design a recipe for `method` tuned to the bean profile.
    ///
    /// The returned recipe has no identity and a gapless step timeline.
    fn generate_recipe(
        &self,
        method: &str,
        profile: &CoffeeProfile,
        emphasized_flavors: &[String],
    ) -> impl Future<Output = Result<Recipe, AssistantError>> + Send;

    /// Short educational text about why the bean tastes the way it does.
    fn explain_flavor_profile(
        &self,
        profile: &CoffeeProfile,
    ) -> impl Future<Output = Result<String, AssistantError>> + Send;

    /// Answer `message` given the earlier turns of the conversation.
    fn tutor_reply(
        &self,
        history: &[ChatMessage],
        message: &str,
    ) -> impl Future<Output = Result<String, AssistantError>> + Send;

    /// Render a video from `prompt` (optionally seeded by `image`) and return its bytes.
    fn generate_video(
        &self,
        image: Option<&ImageInput>,
        prompt: &str,
    ) -> impl Future<Output = Result<Vec<u8>, AssistantError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_message_serializes_lowercase_role() {
        let msg = ChatMessage::user("Why is my pour-over sour?");
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["role"], "user");
        assert!(json["timestamp"].as_i64().unwrap() > 0);
    }

    #[test]
    fn image_mime_from_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("beans.JPG");
        std::fs::write(&path, [0xFF, 0xD8]).unwrap();
        let image = ImageInput::from_path(&path).unwrap();
        assert_eq!(image.mime_type, "image/jpeg");
        assert_eq!(image.bytes, vec![0xFF, 0xD8]);
    }
}

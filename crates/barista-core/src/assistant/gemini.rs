//! Gemini REST client: structured recipe generation, explanations, tutor
//! chat and long-running video generation.

use std::time::Duration;

use base64::Engine as _;
use reqwest::Client;
use serde_json::{json, Value};

use super::keyring_store;
use super::prompts;
use super::traits::{BrewAssistant, ChatMessage, ImageInput};
use crate::brew::Recipe;
use crate::error::{AssistantError, ValidationError};
use crate::profile::CoffeeProfile;
use crate::storage::AssistantConfig;

const API_KEY_HEADER: &str = "x-goog-api-key";

pub struct GeminiClient {
    http: Client,
    api_key: String,
    config: AssistantConfig,
}

impl GeminiClient {
    pub fn new(
        api_key: impl Into<String>,
        config: AssistantConfig,
    ) -> Result<Self, AssistantError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(AssistantError::MissingApiKey);
        }
        let http = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self {
            http,
            api_key,
            config,
        })
    }

    /// Build a client with the key from the environment or keyring.
    pub fn from_config(config: AssistantConfig) -> Result<Self, AssistantError> {
        let key = keyring_store::resolve_api_key()?;
        Self::new(key, config)
    }

    pub fn config(&self) -> &AssistantConfig {
        &self.config
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.api_base.trim_end_matches('/'), path)
    }

    async fn post_json(&self, url: &str, body: &Value) -> Result<Value, AssistantError> {
        let resp = self
            .http
            .post(url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(body)
            .send()
            .await?;
        Self::read_json(resp).await
    }

    async fn get_json(&self, url: &str) -> Result<Value, AssistantError> {
        let resp = self
            .http
            .get(url)
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await?;
        Self::read_json(resp).await
    }

    async fn read_json(resp: reqwest::Response) -> Result<Value, AssistantError> {
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(AssistantError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(resp.json().await?)
    }

    /// Call `generateContent` and return the concatenated text parts.
    async fn generate_text(&self, body: Value) -> Result<Option<String>, AssistantError> {
        let url = self.endpoint(&format!("models/{}:generateContent", self.config.model));
        tracing::debug!(model = %self.config.model, "generateContent");
        let data = self.post_json(&url, &body).await?;
        Ok(response_text(&data))
    }

    async fn poll_operation(&self, mut operation: Value) -> Result<Value, AssistantError> {
        let mut polls = 0u32;
        while !operation["done"].as_bool().unwrap_or(false) {
            if polls >= self.config.max_polls {
                return Err(AssistantError::PollTimeout { polls });
            }
            let name = operation["name"]
                .as_str()
                .ok_or_else(|| AssistantError::Malformed("operation without name".into()))?
                .to_string();
            tokio::time::sleep(Duration::from_secs(self.config.poll_interval_secs)).await;
            operation = self.get_json(&self.endpoint(&name)).await?;
            polls += 1;
            tracing::debug!(operation = %name, polls, "polled video operation");
        }
        if let Some(err) = operation.get("error") {
            return Err(AssistantError::Malformed(format!("video operation failed: {err}")));
        }
        Ok(operation)
    }

    async fn download(&self, uri: &str) -> Result<Vec<u8>, AssistantError> {
        let mut url = url::Url::parse(uri)
            .map_err(|e| AssistantError::Malformed(format!("bad video uri '{uri}': {e}")))?;
        url.query_pairs_mut().append_pair("key", &self.api_key);

        let resp = self.http.get(url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(AssistantError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(resp.bytes().await?.to_vec())
    }
}

impl BrewAssistant for GeminiClient {
    async fn generate_recipe(
        &self,
        method: &str,
        profile: &CoffeeProfile,
        emphasized_flavors: &[String],
    ) -> Result<Recipe, AssistantError> {
        let prompt = prompts::recipe_prompt(method, profile, emphasized_flavors);
        let body = json!({
            "contents": [user_content(&prompt)],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": recipe_schema(),
            },
        });
        let text = self
            .generate_text(body)
            .await?
            .ok_or_else(|| AssistantError::EmptyResponse("generateContent".into()))?;
        parse_recipe(&text)
    }

    async fn explain_flavor_profile(
        &self,
        profile: &CoffeeProfile,
    ) -> Result<String, AssistantError> {
        let prompt = prompts::explanation_prompt(profile);
        let body = json!({ "contents": [user_content(&prompt)] });
        let text = self.generate_text(body).await?;
        Ok(text.unwrap_or_else(|| prompts::EXPLANATION_FALLBACK.to_string()))
    }

    async fn tutor_reply(
        &self,
        history: &[ChatMessage],
        message: &str,
    ) -> Result<String, AssistantError> {
        let mut contents: Vec<Value> = history
            .iter()
            .map(|m| {
                json!({
                    "role": m.role.as_str(),
                    "parts": [{ "text": m.content }],
                })
            })
            .collect();
        contents.push(user_content(message));

        let body = json!({
            "systemInstruction": { "parts": [{ "text": prompts::BARISTA_SYSTEM_INSTRUCTION }] },
            "contents": contents,
        });
        self.generate_text(body)
            .await?
            .ok_or_else(|| AssistantError::EmptyResponse("tutor".into()))
    }

    async fn generate_video(
        &self,
        image: Option<&ImageInput>,
        prompt: &str,
    ) -> Result<Vec<u8>, AssistantError> {
        let mut instance = json!({ "prompt": prompt });
        if let Some(image) = image {
            let encoded = base64::engine::general_purpose::STANDARD.encode(&image.bytes);
            instance["image"] = json!({
                "bytesBase64Encoded": encoded,
                "mimeType": image.mime_type,
            });
        }
        let body = json!({
            "instances": [instance],
            "parameters": {
                "sampleCount": 1,
                "resolution": self.config.video_resolution,
                "aspectRatio": self.config.video_aspect_ratio,
            },
        });

        let url = self.endpoint(&format!("models/{}:predictLongRunning", self.config.video_model));
        tracing::info!(model = %self.config.video_model, "starting video generation");
        let operation = self.post_json(&url, &body).await?;
        let finished = self.poll_operation(operation).await?;

        let uri = video_uri(&finished).ok_or(AssistantError::NoVideo)?;
        tracing::info!("video ready, downloading");
        self.download(&uri).await
    }
}

fn user_content(text: &str) -> Value {
    json!({ "role": "user", "parts": [{ "text": text }] })
}

fn response_text(data: &Value) -> Option<String> {
    let parts = data["candidates"][0]["content"]["parts"].as_array()?;
    let text: String = parts.iter().filter_map(|p| p["text"].as_str()).collect();
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

fn video_uri(operation: &Value) -> Option<String> {
    let response = &operation["response"];
    response["generateVideoResponse"]["generatedSamples"][0]["video"]["uri"]
        .as_str()
        .or_else(|| response["generatedVideos"][0]["video"]["uri"].as_str())
        .map(str::to_string)
}

/// Decode a generated recipe, repairing a broken timeline rather than rejecting it.
fn parse_recipe(text: &str) -> Result<Recipe, AssistantError> {
    let recipe: Recipe =
        serde_json::from_str(text).map_err(|e| AssistantError::Malformed(e.to_string()))?;
    let mut recipe = recipe.without_identity();

    match recipe.validate() {
        Ok(()) => Ok(recipe),
        Err(ValidationError::EmptyCollection(_)) => {
            Err(AssistantError::Malformed("recipe has no steps".into()))
        }
        Err(e) => {
            tracing::warn!("generated recipe timeline repaired: {e}");
            recipe.normalize_timeline();
            Ok(recipe)
        }
    }
}

fn recipe_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "method": { "type": "STRING" },
            "coffeeAmount": { "type": "NUMBER", "description": "Grams of coffee" },
            "waterAmount": { "type": "NUMBER", "description": "Total grams of water" },
            "waterTemp": { "type": "NUMBER", "description": "Temperature in Celsius" },
            "grindSize": { "type": "STRING", "description": "e.g. Medium-Fine, Coarse" },
            "ratio": { "type": "STRING", "description": "e.g. 1:16" },
            "description": { "type": "STRING", "description": "Brief overview of why this recipe works for this bean" },
            "flavorExpectation": { "type": "STRING", "description": "What flavors will be highlighted" },
            "steps": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "timeStart": { "type": "NUMBER", "description": "Second mark to start this step (0 based)" },
                        "duration": { "type": "NUMBER", "description": "Duration of the action in seconds" },
                        "action": { "type": "STRING", "description": "Short title like 'Bloom' or 'First Pour'" },
                        "description": { "type": "STRING", "description": "Detailed instruction" },
                        "waterAmount": { "type": "NUMBER", "description": "Target cumulative water weight at end of step (optional)" },
                    },
                    "required": ["timeStart", "duration", "action", "description"],
                },
            },
        },
        "required": [
            "method", "coffeeAmount", "waterAmount", "waterTemp", "grindSize",
            "steps", "ratio", "description", "flavorExpectation",
        ],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_text_joins_parts() {
        let data = json!({
            "candidates": [{ "content": { "parts": [{ "text": "Hello " }, { "text": "barista" }] } }]
        });
        assert_eq!(response_text(&data).as_deref(), Some("Hello barista"));
        assert_eq!(response_text(&json!({ "candidates": [] })), None);
    }

    #[test]
    fn parse_recipe_repairs_gaps_and_drops_identity() {
        let text = r#"{
            "id": "should-go", "method": "Chemex", "coffeeAmount": 30, "waterAmount": 500,
            "waterTemp": 94, "grindSize": "Medium-Coarse", "ratio": "1:16.7",
            "description": "", "flavorExpectation": "",
            "steps": [
                {"timeStart": 0, "duration": 45, "action": "Bloom", "description": ""},
                {"timeStart": 50, "duration": 60, "action": "Pour", "description": ""}
            ]
        }"#;
        let recipe = parse_recipe(text).unwrap();
        assert_eq!(recipe.id, None);
        assert_eq!(recipe.steps[1].time_start, 45);
        assert!(recipe.validate().is_ok());
    }

    #[test]
    fn parse_recipe_rejects_empty_steps() {
        let text = r#"{"method": "V60", "coffeeAmount": 15, "waterAmount": 250, "waterTemp": 93,
            "grindSize": "Fine", "ratio": "1:16", "steps": []}"#;
        assert!(matches!(parse_recipe(text), Err(AssistantError::Malformed(_))));
        assert!(matches!(parse_recipe("not json"), Err(AssistantError::Malformed(_))));
    }

    #[test]
    fn video_uri_reads_rest_shape() {
        let op = json!({
            "done": true,
            "response": { "generateVideoResponse": { "generatedSamples": [{ "video": { "uri": "https://x/v?alt=media" } }] } }
        });
        assert_eq!(video_uri(&op).as_deref(), Some("https://x/v?alt=media"));
        assert_eq!(video_uri(&json!({ "done": true })), None);
    }

    #[test]
    fn blank_key_is_rejected() {
        assert!(matches!(
            GeminiClient::new("  ", AssistantConfig::default()),
            Err(AssistantError::MissingApiKey)
        ));
    }
}

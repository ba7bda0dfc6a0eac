//! Thin wrapper around the OS keyring for credential storage.

use crate::error::AssistantError;

const SERVICE: &str = "barista";

/// Keyring entry holding the Gemini API key.
pub const API_KEY_ENTRY: &str = "gemini_api_key";

/// Environment variables checked before the keyring, in order.
pub const API_KEY_ENV_VARS: &[&str] = &["GEMINI_API_KEY", "API_KEY"];

pub fn get(key: &str) -> Result<Option<String>, AssistantError> {
    let entry = keyring::Entry::new(SERVICE, key)?;
    match entry.get_password() {
        Ok(pw) => Ok(Some(pw)),
        Err(keyring::Error::NoEntry) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn set(key: &str, value: &str) -> Result<(), AssistantError> {
    let entry = keyring::Entry::new(SERVICE, key)?;
    entry.set_password(value)?;
    Ok(())
}

pub fn delete(key: &str) -> Result<(), AssistantError> {
    let entry = keyring::Entry::new(SERVICE, key)?;
    match entry.delete_credential() {
        Ok(()) => Ok(()),
        Err(keyring::Error::NoEntry) => Ok(()),
        Err(e) => Err(e.into()),
    }
}

/// Find the API key: environment first, then the keyring.
pub fn resolve_api_key() -> Result<String, AssistantError> {
    if let Some(key) = api_key_from_env(|name| std::env::var(name).ok()) {
        return Ok(key);
    }
    match get(API_KEY_ENTRY) {
        Ok(Some(key)) if !key.trim().is_empty() => Ok(key),
        Ok(_) => Err(AssistantError::MissingApiKey),
        Err(e) => {
            tracing::debug!("keyring lookup failed: {e}");
            Err(AssistantError::MissingApiKey)
        }
    }
}

fn api_key_from_env(lookup: impl Fn(&str) -> Option<String>) -> Option<String> {
    API_KEY_ENV_VARS
        .iter()
        .filter_map(|name| lookup(name))
        .map(|v| v.trim().to_string())
        .find(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_prefers_gemini_key() {
        let key = api_key_from_env(|name| match name {
            "GEMINI_API_KEY" => Some("primary".into()),
            "API_KEY" => Some("fallback".into()),
            _ => None,
        });
        assert_eq!(key.as_deref(), Some("primary"));
    }

    #[test]
    fn env_skips_blank_values() {
        let key = api_key_from_env(|name| match name {
            "GEMINI_API_KEY" => Some("  ".into()),
            "API_KEY" => Some("fallback".into()),
            _ => None,
        });
        assert_eq!(key.as_deref(), Some("fallback"));
        assert!(api_key_from_env(|_| None).is_none());
    }
}

pub mod auth;
pub mod brew;
pub mod config;
pub mod explain;
pub mod favorites;
pub mod history;
pub mod latte_art;
pub mod method;
pub mod profile;
pub mod recipe;
pub mod tutor;
pub mod video;

use barista_core::catalog::{self, BrewMethod};
use barista_core::ValidationError;
use serde::Serialize;

/// Single-threaded runtime for the commands that talk to the network or run live.
pub fn runtime() -> Result<tokio::runtime::Runtime, Box<dyn std::error::Error>> {
    Ok(tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?)
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn lookup_method(key: &str) -> Result<&'static BrewMethod, ValidationError> {
    catalog::find_method(key).ok_or_else(|| ValidationError::NotFound {
        kind: "brew method".into(),
        id: key.to_string(),
    })
}

/// `m:ss`
pub fn clock(secs: u32) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}

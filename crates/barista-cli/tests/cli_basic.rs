//! Basic CLI E2E tests.
//!
//! Each test runs the built `barista` binary against its own temporary
//! home directory, so config and the database start empty.

use std::process::Command;

struct Sandbox {
    home: tempfile::TempDir,
}

impl Sandbox {
    fn new() -> Self {
        Self {
            home: tempfile::tempdir().expect("Failed to create temp home"),
        }
    }

    /// Run a CLI command and return (stdout, stderr, exit code).
    fn run(&self, args: &[&str]) -> (String, String, i32) {
        let output = Command::new(env!("CARGO_BIN_EXE_barista"))
            .args(args)
            .env("HOME", self.home.path())
            .env_remove("BARISTA_ENV")
            .env_remove("BARISTA_LOG")
            .output()
            .expect("Failed to execute CLI command");

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        let code = output.status.code().unwrap_or(-1);
        (stdout, stderr, code)
    }

    fn ok(&self, args: &[&str]) -> String {
        let (stdout, stderr, code) = self.run(args);
        assert_eq!(code, 0, "CLI command failed: {args:?}\n{stderr}");
        stdout
    }

    fn json(&self, args: &[&str]) -> serde_json::Value {
        let stdout = self.ok(args);
        serde_json::from_str(&stdout).expect("Failed to parse JSON output")
    }
}

fn durations(recipe: &serde_json::Value) -> Vec<u64> {
    recipe["steps"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["duration"].as_u64().unwrap())
        .collect()
}

#[test]
fn test_method_list() {
    let cli = Sandbox::new();
    let out = cli.ok(&["method", "list"]);
    assert!(out.contains("v60"));
    assert!(out.contains("French Press"));
    assert_eq!(out.lines().count(), 6);
}

#[test]
fn test_method_show_includes_default_recipe() {
    let cli = Sandbox::new();
    let shown = cli.json(&["method", "show", "v60"]);
    assert_eq!(shown["method"]["name"], "Hario V60");
    assert_eq!(durations(&shown["recipe"]), vec![45, 30, 30, 60]);
}

#[test]
fn test_recipe_rescale_method_default() {
    let cli = Sandbox::new();
    let recipe = cli.json(&["recipe", "rescale", "330", "--method", "v60"]);
    assert_eq!(durations(&recipe), vec![90, 60, 60, 120]);
}

#[test]
fn test_recipe_rescale_rejects_out_of_range() {
    let cli = Sandbox::new();
    let (_, stderr, code) = cli.run(&["recipe", "rescale", "30", "--method", "v60"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("between 60 and 600"), "{stderr}");
}

#[test]
fn test_brew_requires_a_recipe() {
    let cli = Sandbox::new();
    let (_, stderr, code) = cli.run(&["brew", "status"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("no recipe loaded"), "{stderr}");
}

#[test]
fn test_brew_lifecycle() {
    let cli = Sandbox::new();
    let started = cli.json(&["brew", "start", "v60"]);
    assert_eq!(started["type"], "brew_started");
    assert_eq!(started["total_secs"], 165);

    let status = cli.json(&["brew", "status"]);
    assert_eq!(status["type"], "state_snapshot");
    assert_eq!(status["state"], "running");

    assert_eq!(cli.json(&["brew", "pause"])["type"], "brew_paused");
    assert_eq!(cli.json(&["brew", "toggle"])["type"], "brew_resumed");
    assert_eq!(cli.json(&["brew", "reset"])["type"], "brew_reset");

    let status = cli.json(&["brew", "status"]);
    assert_eq!(status["state"], "idle");
    assert_eq!(status["elapsed_secs"], 0);
}

#[test]
fn test_rescale_loaded_recipe_then_restore() {
    let cli = Sandbox::new();
    cli.ok(&["brew", "start", "v60"]);

    let adjusted = cli.json(&["recipe", "rescale", "330"]);
    assert_eq!(durations(&adjusted), vec![90, 60, 60, 120]);
    let status = cli.json(&["brew", "status"]);
    assert_eq!(status["state"], "running");
    assert_eq!(status["total_secs"], 330);
    assert_eq!(status["step_index"], 0);

    let restored = cli.json(&["recipe", "restore"]);
    assert_eq!(durations(&restored), vec![45, 30, 30, 60]);
}

#[test]
fn test_favorites_toggle_latte_art() {
    let cli = Sandbox::new();
    assert!(cli.ok(&["favorites", "save", "--latte-art", "heart"]).contains("saved heart"));

    let favorites = cli.json(&["favorites", "list", "--json"]);
    assert_eq!(favorites[0]["type"], "latte_art");
    assert_eq!(favorites[0]["id"], "heart");

    assert!(cli.ok(&["favorites", "save", "--latte-art", "heart"]).contains("removed"));
    assert_eq!(cli.json(&["favorites", "list", "--json"]), serde_json::json!([]));
}

#[test]
fn test_favorite_loaded_recipe_and_load_it_back() {
    let cli = Sandbox::new();
    cli.ok(&["brew", "start", "chemex"]);
    cli.ok(&["favorites", "save"]);

    let favorites = cli.json(&["favorites", "list", "--json"]);
    let id = favorites[0]["id"].as_str().unwrap().to_string();
    assert_eq!(favorites[0]["type"], "recipe");

    let loaded = cli.json(&["favorites", "load", &id]);
    assert_eq!(loaded["method"], "Chemex");
    cli.ok(&["favorites", "remove", &id]);
    let (_, _, code) = cli.run(&["favorites", "remove", &id]);
    assert_ne!(code, 0);
}

#[test]
fn test_removing_loaded_favorite_clears_its_id() {
    let cli = Sandbox::new();
    cli.ok(&["brew", "start", "v60"]);
    cli.ok(&["favorites", "save"]);

    let shown = cli.json(&["recipe", "show"]);
    let id = shown["id"].as_str().unwrap().to_string();
    assert!(shown.get("dateSaved").is_some());

    cli.ok(&["favorites", "remove", &id]);
    let shown = cli.json(&["recipe", "show"]);
    assert!(shown.get("id").is_none(), "{shown}");
    assert!(shown.get("dateSaved").is_none(), "{shown}");
}

#[test]
fn test_history_starts_empty() {
    let cli = Sandbox::new();
    assert!(cli.ok(&["history", "list"]).contains("no brews logged yet"));
    let (_, _, code) = cli.run(&["history", "load", "missing"]);
    assert_ne!(code, 0);
    cli.ok(&["history", "clear"]);
}

#[test]
fn test_config_get_set() {
    let cli = Sandbox::new();
    assert_eq!(cli.ok(&["config", "get", "timer.grace_secs"]).trim(), "5");
    cli.ok(&["config", "set", "timer.grace_secs", "8"]);
    assert_eq!(cli.ok(&["config", "get", "timer.grace_secs"]).trim(), "8");

    let (_, _, code) = cli.run(&["config", "get", "timer.nope"]);
    assert_ne!(code, 0);

    cli.ok(&["config", "reset"]);
    assert_eq!(cli.ok(&["config", "get", "timer.grace_secs"]).trim(), "5");
}

#[test]
fn test_profile_note_toggle() {
    let cli = Sandbox::new();
    assert!(cli.ok(&["profile", "note", "Citrus"]).contains("added"));
    let profile = cli.json(&["profile", "show"]);
    assert_eq!(profile["tasting_notes"], serde_json::json!(["Citrus"]));
    assert!(cli.ok(&["profile", "note", "citrus"]).contains("removed"));

    let profile = cli.json(&["profile", "set", "--roast", "dark", "--origin", "Brazil"]);
    assert_eq!(profile["roast_level"], "Dark");
    assert_eq!(profile["origin"], "Brazil");
}

#[test]
fn test_latte_art_show() {
    let cli = Sandbox::new();
    let out = cli.ok(&["latte-art", "show", "tulip"]);
    assert!(out.starts_with("The Tulip"));
    assert!(out.contains("  1. "));
}

#[test]
fn test_completions() {
    let cli = Sandbox::new();
    assert!(cli.ok(&["completions", "bash"]).contains("barista"));
}

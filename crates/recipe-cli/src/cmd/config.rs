use crate::output::print_json;
use anyhow::Context;
use clap::Subcommand;
use recipe_core::config::{Config, WarnLevel, DELAY_PRESETS};
use std::path::Path;

// ---------------------------------------------------------------------------
// Subcommand types
// ---------------------------------------------------------------------------

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Show the current settings
    Show,

    /// Validate the config for common mistakes
    Validate,

    /// Change one setting
    Set {
        /// auto_advance, auto_advance_delay_seconds or sort
        key: String,
        value: String,
    },
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub fn run(root: &Path, subcmd: ConfigSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        ConfigSubcommand::Show => show(root, json),
        ConfigSubcommand::Validate => validate(root, json),
        ConfigSubcommand::Set { key, value } => set(root, &key, &value, json),
    }
}

// ---------------------------------------------------------------------------
// show
// ---------------------------------------------------------------------------

fn show(root: &Path, json: bool) -> anyhow::Result<()> {
    let config = Config::load_or_default(root).context("failed to load config")?;

    if json {
        print_json(&config)?;
        return Ok(());
    }

    let walkthrough = &config.walkthrough;
    println!("auto_advance:               {}", walkthrough.auto_advance);
    println!(
        "auto_advance_delay_seconds: {}",
        walkthrough.auto_advance_delay_seconds
    );
    println!("sort:                       {}", config.library.sort);
    Ok(())
}

// ---------------------------------------------------------------------------
// validate
// ---------------------------------------------------------------------------

fn validate(root: &Path, json: bool) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load config")?;
    let warnings = config.validate();

    if json {
        let value = serde_json::json!({
            "warnings": warnings,
        });
        print_json(&value)?;
    } else if warnings.is_empty() {
        println!("Config is valid. No warnings.");
    } else {
        for w in &warnings {
            let prefix = match w.level {
                WarnLevel::Warning => "warning",
                WarnLevel::Error => "error",
            };
            println!("[{prefix}] {}", w.message);
        }
    }

    if warnings.iter().any(|w| w.level == WarnLevel::Error) {
        anyhow::bail!("config validation found errors");
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// set
// ---------------------------------------------------------------------------

fn set(root: &Path, key: &str, value: &str, json: bool) -> anyhow::Result<()> {
    let mut config = Config::load_or_default(root).context("failed to load config")?;
    if !config.set(key, value)? {
        anyhow::bail!(
            "unknown config key '{key}'; valid: auto_advance, auto_advance_delay_seconds, sort"
        );
    }
    config.save(root).context("failed to save config")?;

    if json {
        print_json(&serde_json::json!({ "key": key, "value": value }))?;
    } else {
        println!("Set {key} = {value}");
        let delay = config.walkthrough.auto_advance_delay_seconds;
        if !DELAY_PRESETS.contains(&delay) {
            println!("note: {delay}s is not one of the presets {DELAY_PRESETS:?}");
        }
    }
    Ok(())
}

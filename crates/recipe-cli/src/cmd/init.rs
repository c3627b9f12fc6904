use crate::output::print_json;
use anyhow::Context;
use recipe_core::{config::Config, io, paths};
use std::path::Path;

pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let library = paths::library_dir(root);
    io::ensure_dir(&library).with_context(|| format!("failed to create {}", library.display()))?;

    let created_config = Config::default()
        .save_if_missing(root)
        .context("failed to write config.yaml")?;

    if json {
        print_json(&serde_json::json!({
            "root": root.display().to_string(),
            "created_config": created_config,
        }))?;
        return Ok(());
    }

    println!("Initializing recipe library in: {}", root.display());
    println!(
        "  {}  {}",
        if created_config { "created:" } else { "exists: " },
        paths::CONFIG_FILE
    );
    println!("  ready:    {}/", paths::LIBRARY_DIR);
    Ok(())
}

use crate::error::{RecipeError, Result};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const RECIPES_DIR: &str = ".recipes";
pub const LIBRARY_DIR: &str = ".recipes/library";
pub const CONFIG_FILE: &str = ".recipes/config.yaml";

pub const RECIPE_EXT: &str = "yaml";
pub const EXPORT_EXT: &str = "rcp.json";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn recipes_dir(root: &Path) -> PathBuf {
    root.join(RECIPES_DIR)
}

pub fn library_dir(root: &Path) -> PathBuf {
    root.join(LIBRARY_DIR)
}

pub fn recipe_path(root: &Path, slug: &str) -> PathBuf {
    library_dir(root).join(format!("{slug}.{RECIPE_EXT}"))
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

/// Default export filename for a recipe, e.g. `lasagna.rcp.json`.
pub fn export_filename(slug: &str) -> String {
    format!("{slug}.{EXPORT_EXT}")
}

// ---------------------------------------------------------------------------
// Slug validation
// ---------------------------------------------------------------------------

static SLUG_RE: OnceLock<Regex> = OnceLock::new();

fn slug_re() -> &'static Regex {
    SLUG_RE.get_or_init(|| {
        Regex::new(r"^[a-z0-9][a-z0-9\-]*[a-z0-9]$|^[a-z0-9]$").expect("slug pattern is valid")
    })
}

pub fn validate_slug(slug: &str) -> Result<()> {
    if slug.is_empty() || slug.len() > 64 || !slug_re().is_match(slug) {
        return Err(RecipeError::InvalidSlug(slug.to_string()));
    }
    Ok(())
}

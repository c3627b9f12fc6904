use recipe_core::paths::RECIPES_DIR;
use std::path::{Path, PathBuf};

/// Resolve the recipe library root.
///
/// Priority:
/// 1. `--root` flag / `RECIPE_ROOT` env var (passed in as `explicit`)
/// 2. Walk upward from `cwd` looking for `.recipes/`
/// 3. The user's home directory
/// 4. Fall back to `cwd`
pub fn resolve_root(explicit: Option<&Path>) -> PathBuf {
    if let Some(p) = explicit {
        return p.to_path_buf();
    }

    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    if let Some(found) = find_library(&cwd) {
        return found;
    }

    home::home_dir().unwrap_or(cwd)
}

/// Nearest ancestor of `start` (inclusive) holding a `.recipes/` directory.
fn find_library(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(RECIPES_DIR).is_dir())
        .map(Path::to_path_buf)
}

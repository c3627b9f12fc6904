use crate::countdown::CountdownTime;
use crate::error::{RecipeError, Result};
use crate::paths;
use crate::types::{SortOrder, StepCategory};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Steps
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Ingredient {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            quantity: None,
            notes: None,
        }
    }

    pub fn with_quantity(mut self, quantity: impl Into<String>) -> Self {
        self.quantity = Some(quantity.into());
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrepStep {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl PrepStep {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            notes: None,
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CookingStep {
    pub title: String,
    /// Countdown target as `HH:MM:SS`. Kept as text so a hand-edited file
    /// with a bad value still loads; the walkthrough treats it as no timer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_ultimatum: Option<String>,
}

impl CookingStep {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            time_ultimatum: None,
        }
    }

    pub fn with_time(mut self, time: impl Into<String>) -> Self {
        self.time_ultimatum = Some(time.into());
        self
    }

    /// The parsed countdown target, if present and well-formed.
    pub fn countdown(&self) -> Option<CountdownTime> {
        self.time_ultimatum
            .as_deref()
            .and_then(|t| CountdownTime::parse(t).ok())
    }
}

// ---------------------------------------------------------------------------
// Recipe
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
    #[serde(default)]
    pub prep_steps: Vec<PrepStep>,
    #[serde(default)]
    pub cooking_steps: Vec<CookingStep>,
}

impl Recipe {
    pub fn new(slug: impl Into<String>, title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            slug: slug.into(),
            title: title.into(),
            created_at: now,
            updated_at: now,
            ingredients: Vec::new(),
            prep_steps: Vec::new(),
            cooking_steps: Vec::new(),
        }
    }

    // ---------------------------------------------------------------------------
    // Persistence
    // ---------------------------------------------------------------------------

    pub fn create(root: &Path, slug: impl Into<String>, title: impl Into<String>) -> Result<Self> {
        let slug = slug.into();
        paths::validate_slug(&slug)?;

        if paths::recipe_path(root, &slug).exists() {
            return Err(RecipeError::RecipeExists(slug));
        }

        let recipe = Self::new(slug, title);
        recipe.save(root)?;
        Ok(recipe)
    }

    pub fn load(root: &Path, slug: &str) -> Result<Self> {
        paths::validate_slug(slug)?;
        let path = paths::recipe_path(root, slug);
        if !path.exists() {
            return Err(RecipeError::RecipeNotFound(slug.to_string()));
        }
        let data = std::fs::read_to_string(&path)?;
        let recipe: Recipe = serde_yaml::from_str(&data)?;
        Ok(recipe)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::recipe_path(root, &self.slug);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    pub fn delete(root: &Path, slug: &str) -> Result<()> {
        paths::validate_slug(slug)?;
        let path = paths::recipe_path(root, slug);
        if !crate::io::remove_if_present(&path)? {
            return Err(RecipeError::RecipeNotFound(slug.to_string()));
        }
        Ok(())
    }

    /// All recipes in the library, oldest first.
    pub fn list(root: &Path) -> Result<Vec<Self>> {
        let dir = paths::library_dir(root);
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut recipes = Vec::new();
        for entry in std::fs::read_dir(&dir)? {
            let entry = entry?;
            let path = entry.path();
            if !entry.file_type()?.is_file()
                || path.extension().and_then(|e| e.to_str()) != Some(paths::RECIPE_EXT)
            {
                continue;
            }
            let Some(slug) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            match Self::load(root, slug) {
                Ok(r) => recipes.push(r),
                Err(RecipeError::RecipeNotFound(_)) => {}
                Err(RecipeError::InvalidSlug(_)) => {
                    tracing::debug!(file = %path.display(), "skipping file with invalid slug");
                }
                Err(e) => return Err(e),
            }
        }
        recipes.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(recipes)
    }

    /// Write the recipe as pretty JSON for sharing.
    pub fn export_json(&self, path: &Path) -> Result<()> {
        let data = serde_json::to_string_pretty(self)?;
        crate::io::atomic_write(path, data.as_bytes())
    }

    /// Read an exported recipe and add it to the library.
    pub fn import_json(root: &Path, path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        let recipe: Recipe = serde_json::from_str(&data)?;
        paths::validate_slug(&recipe.slug)?;
        if paths::recipe_path(root, &recipe.slug).exists() {
            return Err(RecipeError::RecipeExists(recipe.slug));
        }
        recipe.save(root)?;
        Ok(recipe)
    }

    // ---------------------------------------------------------------------------
    // Step editing
    // ---------------------------------------------------------------------------

    pub fn add_ingredient(&mut self, ingredient: Ingredient) {
        self.ingredients.push(ingredient);
        self.updated_at = Utc::now();
    }

    pub fn add_prep_step(&mut self, step: PrepStep) {
        self.prep_steps.push(step);
        self.updated_at = Utc::now();
    }

    /// Add a cooking step. A time, if given, must be `HH:MM:SS`.
    pub fn add_cooking_step(&mut self, step: CookingStep) -> Result<()> {
        if let Some(time) = &step.time_ultimatum {
            CountdownTime::parse(time)?;
        }
        self.cooking_steps.push(step);
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Remove the step at a 0-based index within its category.
    pub fn remove_step(&mut self, category: StepCategory, index: usize) -> Result<()> {
        let len = self.count(category);
        if index >= len {
            return Err(RecipeError::StepNotFound {
                category,
                index: index + 1,
            });
        }
        match category {
            StepCategory::Ingredient => {
                self.ingredients.remove(index);
            }
            StepCategory::PrepStep => {
                self.prep_steps.remove(index);
            }
            StepCategory::CookingStep => {
                self.cooking_steps.remove(index);
            }
        }
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn update_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
        self.updated_at = Utc::now();
    }

    // ---------------------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------------------

    pub fn count(&self, category: StepCategory) -> usize {
        match category {
            StepCategory::Ingredient => self.ingredients.len(),
            StepCategory::PrepStep => self.prep_steps.len(),
            StepCategory::CookingStep => self.cooking_steps.len(),
        }
    }

    pub fn total_steps(&self) -> usize {
        self.ingredients.len() + self.prep_steps.len() + self.cooking_steps.len()
    }

    /// A walkthrough needs at least one step.
    pub fn is_playable(&self) -> bool {
        self.total_steps() > 0
    }

    pub fn ensure_playable(&self) -> Result<()> {
        if self.is_playable() {
            Ok(())
        } else {
            Err(RecipeError::EmptyRecipe(self.slug.clone()))
        }
    }
}

/// Order recipes for display.
pub fn sorted(mut recipes: Vec<Recipe>, order: SortOrder) -> Vec<Recipe> {
    match order {
        SortOrder::MostRecent => recipes.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        SortOrder::Alphabetical => recipes.sort_by(|a, b| a.title.cmp(&b.title)),
    }
    recipes
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use tempfile::TempDir;

    #[test]
    fn recipe_create_load() {
        let dir = TempDir::new().unwrap();
        let recipe = Recipe::create(dir.path(), "lasagna", "Lasagna").unwrap();
        assert_eq!(recipe.slug, "lasagna");
        assert_eq!(recipe.total_steps(), 0);

        let loaded = Recipe::load(dir.path(), "lasagna").unwrap();
        assert_eq!(loaded.title, "Lasagna");
        assert_eq!(loaded.id, recipe.id);
    }

    #[test]
    fn recipe_create_duplicate_fails() {
        let dir = TempDir::new().unwrap();
        Recipe::create(dir.path(), "soup", "Soup").unwrap();
        assert!(matches!(
            Recipe::create(dir.path(), "soup", "Soup Again"),
            Err(RecipeError::RecipeExists(_))
        ));
    }

    #[test]
    fn recipe_create_invalid_slug() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            Recipe::create(dir.path(), "Bad Slug", "Bad"),
            Err(RecipeError::InvalidSlug(_))
        ));
    }

    #[test]
    fn recipe_load_missing() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            Recipe::load(dir.path(), "nope"),
            Err(RecipeError::RecipeNotFound(_))
        ));
    }

    #[test]
    fn recipe_delete() {
        let dir = TempDir::new().unwrap();
        Recipe::create(dir.path(), "toast", "Toast").unwrap();
        Recipe::delete(dir.path(), "toast").unwrap();
        assert!(Recipe::load(dir.path(), "toast").is_err());
        assert!(matches!(
            Recipe::delete(dir.path(), "toast"),
            Err(RecipeError::RecipeNotFound(_))
        ));
    }

    #[test]
    fn slug_cannot_escape_library_dir() {
        let dir = TempDir::new().unwrap();
        crate::config::Config::default().save(dir.path()).unwrap();
        let config = paths::config_path(dir.path());
        assert!(config.exists());

        assert!(matches!(
            Recipe::delete(dir.path(), "../config"),
            Err(RecipeError::InvalidSlug(_))
        ));
        assert!(matches!(
            Recipe::load(dir.path(), "../config"),
            Err(RecipeError::InvalidSlug(_))
        ));
        assert!(config.exists());
    }

    #[test]
    fn list_skips_files_with_invalid_slugs() {
        let dir = TempDir::new().unwrap();
        Recipe::create(dir.path(), "soup", "Soup").unwrap();
        let stray = paths::library_dir(dir.path()).join("Not A Slug.yaml");
        std::fs::write(&stray, "title: stray\n").unwrap();

        let slugs: Vec<_> = Recipe::list(dir.path())
            .unwrap()
            .into_iter()
            .map(|r| r.slug)
            .collect();
        assert_eq!(slugs, ["soup"]);
    }

    #[test]
    fn steps_roundtrip_through_yaml() {
        let dir = TempDir::new().unwrap();
        let mut recipe = Recipe::create(dir.path(), "pasta", "Pasta").unwrap();
        recipe.add_ingredient(Ingredient::new("Spaghetti").with_quantity("200 g"));
        recipe.add_prep_step(PrepStep::new("Boil water").with_notes("Salt it"));
        recipe
            .add_cooking_step(CookingStep::new("Cook pasta").with_time("00:09:00"))
            .unwrap();
        recipe.save(dir.path()).unwrap();

        let loaded = Recipe::load(dir.path(), "pasta").unwrap();
        assert_eq!(loaded.ingredients[0].quantity.as_deref(), Some("200 g"));
        assert_eq!(loaded.prep_steps[0].notes.as_deref(), Some("Salt it"));
        assert_eq!(
            loaded.cooking_steps[0].countdown().unwrap().total_seconds(),
            540
        );
        assert_eq!(loaded.total_steps(), 3);
    }

    #[test]
    fn optional_fields_not_serialized_when_absent() {
        let mut recipe = Recipe::new("plain", "Plain");
        recipe.add_ingredient(Ingredient::new("Salt"));
        let yaml = serde_yaml::to_string(&recipe).unwrap();
        assert!(!yaml.contains("quantity"));
        assert!(!yaml.contains("notes"));
    }

    #[test]
    fn add_cooking_step_rejects_bad_time() {
        let mut recipe = Recipe::new("r", "R");
        assert!(matches!(
            recipe.add_cooking_step(CookingStep::new("Bake").with_time("45 min")),
            Err(RecipeError::InvalidTime(_))
        ));
        assert!(recipe.cooking_steps.is_empty());
    }

    #[test]
    fn malformed_time_in_file_loads_as_no_countdown() {
        let yaml = r#"
id: 7f1c5e9e-3b2a-4c55-9d7e-2f0a4b6c8d10
slug: stew
title: Stew
created_at: 2026-01-01T00:00:00Z
updated_at: 2026-01-01T00:00:00Z
cooking_steps:
  - title: Simmer
    time_ultimatum: "1 hour"
"#;
        let recipe: Recipe = serde_yaml::from_str(yaml).unwrap();
        assert!(recipe.ingredients.is_empty());
        assert_eq!(recipe.cooking_steps[0].countdown(), None);
    }

    #[test]
    fn remove_step_bounds() {
        let mut recipe = Recipe::new("r", "R");
        recipe.add_prep_step(PrepStep::new("Chop"));
        recipe.add_prep_step(PrepStep::new("Dice"));
        recipe.remove_step(StepCategory::PrepStep, 0).unwrap();
        assert_eq!(recipe.prep_steps[0].title, "Dice");
        assert!(matches!(
            recipe.remove_step(StepCategory::PrepStep, 1),
            Err(RecipeError::StepNotFound { index: 2, .. })
        ));
        assert!(recipe.remove_step(StepCategory::Ingredient, 0).is_err());
    }

    #[test]
    fn list_sorts_oldest_first_and_skips_other_files() {
        let dir = TempDir::new().unwrap();
        let mut a = Recipe::new("a", "Apple Pie");
        a.created_at = Utc::now() - Duration::days(2);
        a.save(dir.path()).unwrap();
        let b = Recipe::new("b", "Banana Bread");
        b.save(dir.path()).unwrap();
        std::fs::write(paths::library_dir(dir.path()).join("README.txt"), "hi").unwrap();

        let list = Recipe::list(dir.path()).unwrap();
        let slugs: Vec<&str> = list.iter().map(|r| r.slug.as_str()).collect();
        assert_eq!(slugs, ["a", "b"]);
    }

    #[test]
    fn list_empty_library() {
        let dir = TempDir::new().unwrap();
        assert!(Recipe::list(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn sorted_by_order() {
        let mut older = Recipe::new("zucchini", "Zucchini Fritters");
        older.created_at = Utc::now() - Duration::hours(1);
        let newer = Recipe::new("apple", "Apple Crumble");

        let recent = sorted(vec![older.clone(), newer.clone()], SortOrder::MostRecent);
        assert_eq!(recent[0].slug, "apple");

        let alpha = sorted(vec![older, newer], SortOrder::Alphabetical);
        assert_eq!(alpha[0].title, "Apple Crumble");
        assert_eq!(alpha[1].title, "Zucchini Fritters");
    }

    #[test]
    fn export_import_json() {
        let src = TempDir::new().unwrap();
        let dst = TempDir::new().unwrap();
        let mut recipe = Recipe::create(src.path(), "chili", "Chili").unwrap();
        recipe.add_ingredient(Ingredient::new("Beans").with_quantity("2 cans"));
        recipe.save(src.path()).unwrap();

        let file = src.path().join(paths::export_filename("chili"));
        recipe.export_json(&file).unwrap();

        let imported = Recipe::import_json(dst.path(), &file).unwrap();
        assert_eq!(imported.id, recipe.id);
        assert_eq!(Recipe::load(dst.path(), "chili").unwrap().ingredients.len(), 1);

        assert!(matches!(
            Recipe::import_json(dst.path(), &file),
            Err(RecipeError::RecipeExists(_))
        ));
    }

    #[test]
    fn ensure_playable_rejects_empty() {
        let recipe = Recipe::new("empty", "Empty");
        assert!(!recipe.is_playable());
        assert!(matches!(
            recipe.ensure_playable(),
            Err(RecipeError::EmptyRecipe(_))
        ));
    }
}

use crate::output::{card_line, print_json, print_table};
use anyhow::Context;
use recipe_core::{
    card::build_cards,
    config::Config,
    multiplier::{display_title, parse_multiplier},
    recipe::{self as recipe_ops, Recipe},
    types::StepCategory,
};
use std::path::Path;

pub fn create(root: &Path, slug: &str, title: Option<&str>, json: bool) -> anyhow::Result<()> {
    let title = title.unwrap_or(slug);
    let recipe = Recipe::create(root, slug, title)
        .with_context(|| format!("failed to create recipe '{slug}'"))?;

    if json {
        print_json(&recipe)?;
    } else {
        println!("Created recipe '{}': {}", recipe.slug, recipe.title);
    }
    Ok(())
}

pub fn list(root: &Path, json: bool) -> anyhow::Result<()> {
    let config = Config::load_or_default(root).context("failed to load config")?;
    let recipes = recipe_ops::sorted(
        Recipe::list(root).context("failed to list recipes")?,
        config.library.sort,
    );

    if json {
        let items: Vec<_> = recipes
            .iter()
            .map(|r| {
                serde_json::json!({
                    "slug": r.slug,
                    "title": r.title,
                    "ingredients": r.ingredients.len(),
                    "prep_steps": r.prep_steps.len(),
                    "cooking_steps": r.cooking_steps.len(),
                    "created_at": r.created_at,
                })
            })
            .collect();
        print_json(&items)?;
        return Ok(());
    }

    if recipes.is_empty() {
        println!("No recipes. Create one with: recipe create <slug> --title <title>");
        return Ok(());
    }

    let rows = recipes
        .iter()
        .map(|r| {
            vec![
                r.slug.clone(),
                r.title.clone(),
                r.ingredients.len().to_string(),
                r.prep_steps.len().to_string(),
                r.cooking_steps.len().to_string(),
            ]
        })
        .collect();
    print_table(&["SLUG", "TITLE", "ING", "PREP", "COOK"], rows);
    Ok(())
}

pub fn show(root: &Path, slug: &str, multiplier: Option<&str>, json: bool) -> anyhow::Result<()> {
    let recipe = Recipe::load(root, slug).with_context(|| format!("recipe '{slug}' not found"))?;
    if let Some(m) = multiplier {
        parse_multiplier(m)?;
    }
    let cards = build_cards(&recipe, multiplier);

    if json {
        print_json(&serde_json::json!({
            "slug": recipe.slug,
            "title": display_title(&recipe.title, multiplier),
            "multiplier": multiplier,
            "cards": cards,
        }))?;
        return Ok(());
    }

    println!("{}", display_title(&recipe.title, multiplier));
    for category in StepCategory::all() {
        let in_category: Vec<_> = cards.iter().filter(|c| c.category == *category).collect();
        if in_category.is_empty() {
            continue;
        }
        println!();
        for card in in_category {
            println!("  {}", card_line(card));
        }
    }
    if !recipe.is_playable() {
        println!("\n(no steps yet)");
    }
    Ok(())
}

pub fn delete(root: &Path, slug: &str, json: bool) -> anyhow::Result<()> {
    Recipe::delete(root, slug).with_context(|| format!("failed to delete recipe '{slug}'"))?;

    if json {
        print_json(&serde_json::json!({ "slug": slug, "deleted": true }))?;
    } else {
        println!("Deleted recipe '{slug}'");
    }
    Ok(())
}

pub fn rename(root: &Path, slug: &str, title: &str, json: bool) -> anyhow::Result<()> {
    let mut recipe =
        Recipe::load(root, slug).with_context(|| format!("recipe '{slug}' not found"))?;
    recipe.update_title(title);
    recipe.save(root).context("failed to save recipe")?;

    if json {
        print_json(&serde_json::json!({ "slug": slug, "title": title }))?;
    } else {
        println!("Renamed '{slug}' to: {title}");
    }
    Ok(())
}

pub fn export(root: &Path, slug: &str, path: &Path, json: bool) -> anyhow::Result<()> {
    let recipe = Recipe::load(root, slug).with_context(|| format!("recipe '{slug}' not found"))?;
    let target = if path.is_dir() {
        path.join(recipe_core::paths::export_filename(slug))
    } else {
        path.to_path_buf()
    };
    recipe
        .export_json(&target)
        .with_context(|| format!("failed to write {}", target.display()))?;

    if json {
        print_json(&serde_json::json!({
            "slug": slug,
            "path": target.display().to_string(),
        }))?;
    } else {
        println!("Exported '{slug}' to {}", target.display());
    }
    Ok(())
}

pub fn import(root: &Path, path: &Path, json: bool) -> anyhow::Result<()> {
    let recipe = Recipe::import_json(root, path)
        .with_context(|| format!("failed to import {}", path.display()))?;

    if json {
        print_json(&recipe)?;
    } else {
        println!("Imported recipe '{}': {}", recipe.slug, recipe.title);
    }
    Ok(())
}

use crate::output::print_json;
use anyhow::Context;
use clap::Subcommand;
use recipe_core::{
    recipe::{CookingStep, Ingredient, PrepStep, Recipe},
    types::StepCategory,
};
use std::path::Path;

// ---------------------------------------------------------------------------
// Subcommand types
// ---------------------------------------------------------------------------

#[derive(Subcommand)]
pub enum IngredientSubcommand {
    /// Add an ingredient to a recipe
    Add {
        slug: String,
        #[arg(required = true)]
        title: Vec<String>,
        /// Quantity, e.g. "2 cups"
        #[arg(long)]
        qty: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum PrepSubcommand {
    /// Add a prep step to a recipe
    Add {
        slug: String,
        #[arg(required = true)]
        title: Vec<String>,
        #[arg(long)]
        notes: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum CookSubcommand {
    /// Add a cooking step to a recipe
    Add {
        slug: String,
        #[arg(required = true)]
        title: Vec<String>,
        /// Countdown for the step, HH:MM:SS
        #[arg(long)]
        time: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum StepSubcommand {
    /// Remove a step by category and 1-based position
    Remove {
        slug: String,
        /// ingredient, prep or cook
        category: String,
        index: usize,
    },
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

pub fn run_ingredient(root: &Path, subcmd: IngredientSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        IngredientSubcommand::Add {
            slug,
            title,
            qty,
            notes,
        } => {
            let mut ingredient = Ingredient::new(title.join(" "));
            ingredient.quantity = qty;
            ingredient.notes = notes;
            edit(root, &slug, StepCategory::Ingredient, json, |r| {
                r.add_ingredient(ingredient);
                Ok(())
            })
        }
    }
}

pub fn run_prep(root: &Path, subcmd: PrepSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        PrepSubcommand::Add { slug, title, notes } => {
            let mut step = PrepStep::new(title.join(" "));
            step.notes = notes;
            edit(root, &slug, StepCategory::PrepStep, json, |r| {
                r.add_prep_step(step);
                Ok(())
            })
        }
    }
}

pub fn run_cook(root: &Path, subcmd: CookSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        CookSubcommand::Add { slug, title, time } => {
            let mut step = CookingStep::new(title.join(" "));
            step.time_ultimatum = time;
            edit(root, &slug, StepCategory::CookingStep, json, |r| {
                r.add_cooking_step(step)
            })
        }
    }
}

pub fn run(root: &Path, subcmd: StepSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        StepSubcommand::Remove {
            slug,
            category,
            index,
        } => remove(root, &slug, &category, index, json),
    }
}

// ---------------------------------------------------------------------------
// add
// ---------------------------------------------------------------------------

fn edit(
    root: &Path,
    slug: &str,
    category: StepCategory,
    json: bool,
    apply: impl FnOnce(&mut Recipe) -> recipe_core::Result<()>,
) -> anyhow::Result<()> {
    let mut recipe =
        Recipe::load(root, slug).with_context(|| format!("recipe '{slug}' not found"))?;
    apply(&mut recipe)?;
    recipe.save(root).context("failed to save recipe")?;

    let position = recipe.count(category);
    if json {
        print_json(&serde_json::json!({
            "slug": slug,
            "category": category,
            "index": position,
        }))?;
    } else {
        println!("Added {} {position} to '{slug}'", category.label());
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// remove
// ---------------------------------------------------------------------------

fn remove(root: &Path, slug: &str, category: &str, index: usize, json: bool) -> anyhow::Result<()> {
    let category: StepCategory = category.parse()?;
    if index == 0 {
        anyhow::bail!("step positions start at 1");
    }

    let mut recipe =
        Recipe::load(root, slug).with_context(|| format!("recipe '{slug}' not found"))?;
    recipe.remove_step(category, index - 1)?;
    recipe.save(root).context("failed to save recipe")?;

    if json {
        print_json(&serde_json::json!({
            "slug": slug,
            "category": category,
            "index": index,
            "removed": true,
        }))?;
    } else {
        println!("Removed {} {index} from '{slug}'", category.label());
    }
    Ok(())
}

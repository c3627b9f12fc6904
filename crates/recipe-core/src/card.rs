use crate::multiplier::apply_multiplier;
use crate::recipe::Recipe;
use crate::types::StepCategory;
use serde::Serialize;

/// Display content for one walkthrough step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Card {
    pub category: StepCategory,
    /// e.g. "Ingredient 2", "Cooking Step 1".
    pub label: String,
    pub title: String,
    /// Scaled quantity for ingredients, time ultimatum for cooking steps.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Build one card per step, in walkthrough order.
pub fn build_cards(recipe: &Recipe, multiplier: Option<&str>) -> Vec<Card> {
    let mut cards = Vec::with_capacity(recipe.total_steps());

    for (i, ing) in recipe.ingredients.iter().enumerate() {
        let detail = match (&ing.quantity, multiplier) {
            (Some(q), Some(m)) => Some(apply_multiplier(q, m)),
            (q, _) => q.clone(),
        };
        cards.push(Card {
            category: StepCategory::Ingredient,
            label: label(StepCategory::Ingredient, i),
            title: ing.title.clone(),
            detail,
            notes: ing.notes.clone(),
        });
    }

    for (i, prep) in recipe.prep_steps.iter().enumerate() {
        cards.push(Card {
            category: StepCategory::PrepStep,
            label: label(StepCategory::PrepStep, i),
            title: prep.title.clone(),
            detail: None,
            notes: prep.notes.clone(),
        });
    }

    for (i, cook) in recipe.cooking_steps.iter().enumerate() {
        cards.push(Card {
            category: StepCategory::CookingStep,
            label: label(StepCategory::CookingStep, i),
            title: cook.title.clone(),
            detail: cook.time_ultimatum.clone(),
            notes: None,
        });
    }

    cards
}

fn label(category: StepCategory, index: usize) -> String {
    format!("{} {}", category.label(), index + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipe::{CookingStep, Ingredient, PrepStep};

    fn recipe() -> Recipe {
        let mut r = Recipe::new("pancakes", "Pancakes");
        r.add_ingredient(Ingredient::new("Flour").with_quantity("2 cups"));
        r.add_ingredient(Ingredient::new("Eggs").with_notes("room temperature"));
        r.add_prep_step(PrepStep::new("Whisk").with_notes("no lumps"));
        r.add_cooking_step(CookingStep::new("Fry").with_time("00:02:00"))
            .unwrap();
        r
    }

    #[test]
    fn cards_follow_walkthrough_order() {
        let cards = build_cards(&recipe(), None);
        let labels: Vec<&str> = cards.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(
            labels,
            ["Ingredient 1", "Ingredient 2", "Prep Step 1", "Cooking Step 1"]
        );
        assert_eq!(cards[0].detail.as_deref(), Some("2 cups"));
        assert_eq!(cards[1].notes.as_deref(), Some("room temperature"));
        assert_eq!(cards[3].detail.as_deref(), Some("00:02:00"));
        assert_eq!(cards[3].notes, None);
    }

    #[test]
    fn multiplier_scales_quantities_only() {
        let cards = build_cards(&recipe(), Some("2"));
        assert_eq!(cards[0].detail.as_deref(), Some("4 cups"));
        // Ingredient without a quantity stays without one.
        assert_eq!(cards[1].detail, None);
        assert_eq!(cards[3].detail.as_deref(), Some("00:02:00"));
    }
}

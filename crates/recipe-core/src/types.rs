use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// StepCategory
// ---------------------------------------------------------------------------

/// The three partitions of a walkthrough, in walkthrough order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepCategory {
    Ingredient,
    PrepStep,
    CookingStep,
}

impl StepCategory {
    pub fn all() -> &'static [StepCategory] {
        &[
            StepCategory::Ingredient,
            StepCategory::PrepStep,
            StepCategory::CookingStep,
        ]
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn next(self) -> Option<StepCategory> {
        Self::all().get(self.index() + 1).copied()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StepCategory::Ingredient => "ingredient",
            StepCategory::PrepStep => "prep_step",
            StepCategory::CookingStep => "cooking_step",
        }
    }

    /// Card label prefix, e.g. "Prep Step" in "Prep Step 2".
    pub fn label(self) -> &'static str {
        match self {
            StepCategory::Ingredient => "Ingredient",
            StepCategory::PrepStep => "Prep Step",
            StepCategory::CookingStep => "Cooking Step",
        }
    }
}

impl fmt::Display for StepCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for StepCategory {
    type Err = crate::error::RecipeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ingredient" | "ing" => Ok(StepCategory::Ingredient),
            "prep_step" | "prep-step" | "prep" => Ok(StepCategory::PrepStep),
            "cooking_step" | "cooking-step" | "cook" => Ok(StepCategory::CookingStep),
            _ => Err(crate::error::RecipeError::InvalidCategory(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// SortOrder
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    MostRecent,
    Alphabetical,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::MostRecent => "most_recent",
            SortOrder::Alphabetical => "alphabetical",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SortOrder {
    type Err = crate::error::RecipeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "most_recent" | "most-recent" | "recent" => Ok(SortOrder::MostRecent),
            "alphabetical" | "alpha" => Ok(SortOrder::Alphabetical),
            _ => Err(crate::error::RecipeError::InvalidSortOrder(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_order_follows_walkthrough() {
        assert!(StepCategory::Ingredient < StepCategory::PrepStep);
        assert!(StepCategory::PrepStep < StepCategory::CookingStep);
        assert_eq!(StepCategory::Ingredient.next(), Some(StepCategory::PrepStep));
        assert_eq!(StepCategory::CookingStep.next(), None);
    }

    #[test]
    fn category_parses_aliases() {
        assert_eq!("cook".parse::<StepCategory>().unwrap(), StepCategory::CookingStep);
        assert_eq!("prep-step".parse::<StepCategory>().unwrap(), StepCategory::PrepStep);
        assert!("garnish".parse::<StepCategory>().is_err());
    }

    #[test]
    fn sort_order_yaml_snake_case() {
        let yaml = serde_yaml::to_string(&SortOrder::MostRecent).unwrap();
        assert_eq!(yaml.trim(), "most_recent");
        let parsed: SortOrder = serde_yaml::from_str("alphabetical").unwrap();
        assert_eq!(parsed, SortOrder::Alphabetical);
    }
}

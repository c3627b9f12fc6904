use crate::recipe::Recipe;
use crate::types::StepCategory;

/// Maps an overall walkthrough position to its category and the index
/// within that category. Ingredients come first, then prep steps, then
/// cooking steps.
///
/// Positions outside `0..total_steps()` are a caller bug and panic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepSequence {
    counts: [usize; 3],
}

impl StepSequence {
    pub fn new(ingredients: usize, prep_steps: usize, cooking_steps: usize) -> Self {
        Self {
            counts: [ingredients, prep_steps, cooking_steps],
        }
    }

    pub fn from_recipe(recipe: &Recipe) -> Self {
        Self::new(
            recipe.ingredients.len(),
            recipe.prep_steps.len(),
            recipe.cooking_steps.len(),
        )
    }

    pub fn total_steps(&self) -> usize {
        self.counts.iter().sum()
    }

    pub fn count(&self, category: StepCategory) -> usize {
        self.counts[category.index()]
    }

    /// Number of steps in all categories before `category`.
    pub fn offset(&self, category: StepCategory) -> usize {
        self.counts[..category.index()].iter().sum()
    }

    pub fn category_at(&self, position: usize) -> StepCategory {
        self.check(position);
        let ingredients = self.count(StepCategory::Ingredient);
        let prep_steps = self.count(StepCategory::PrepStep);
        if position < ingredients {
            StepCategory::Ingredient
        } else if position < ingredients + prep_steps {
            StepCategory::PrepStep
        } else {
            StepCategory::CookingStep
        }
    }

    pub fn category_local_index(&self, position: usize) -> usize {
        position - self.offset(self.category_at(position))
    }

    pub fn is_first_of_category(&self, position: usize) -> bool {
        self.category_local_index(position) == 0
    }

    pub fn is_last_of_category(&self, position: usize) -> bool {
        let category = self.category_at(position);
        self.category_local_index(position) == self.count(category) - 1
    }

    fn check(&self, position: usize) {
        let total = self.total_steps();
        assert!(
            position < total,
            "walkthrough position {position} out of range 0..{total}"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use StepCategory::*;

    #[test]
    fn category_boundaries() {
        let seq = StepSequence::new(3, 2, 4);
        assert_eq!(seq.total_steps(), 9);
        for p in 0..=2 {
            assert_eq!(seq.category_at(p), Ingredient);
        }
        for p in 3..=4 {
            assert_eq!(seq.category_at(p), PrepStep);
        }
        for p in 5..=8 {
            assert_eq!(seq.category_at(p), CookingStep);
        }
        assert_eq!(seq.category_local_index(5), 0);
        assert_eq!(seq.category_local_index(8), 3);
        assert_eq!(seq.category_local_index(4), 1);
    }

    #[test]
    fn first_and_last_of_category() {
        let seq = StepSequence::new(3, 2, 4);
        assert!(seq.is_first_of_category(0));
        assert!(seq.is_last_of_category(2));
        assert!(seq.is_first_of_category(3));
        assert!(seq.is_last_of_category(4));
        assert!(seq.is_first_of_category(5));
        assert!(!seq.is_last_of_category(7));
        assert!(seq.is_last_of_category(8));
    }

    #[test]
    fn empty_middle_category_is_skipped() {
        let seq = StepSequence::new(1, 0, 1);
        assert_eq!(seq.category_at(0), Ingredient);
        assert_eq!(seq.category_at(1), CookingStep);
        assert_eq!(seq.offset(CookingStep), 1);
        assert_eq!(seq.count(PrepStep), 0);
    }

    #[test]
    fn only_cooking_steps() {
        let seq = StepSequence::new(0, 0, 2);
        assert_eq!(seq.category_at(0), CookingStep);
        assert_eq!(seq.category_local_index(1), 1);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn out_of_range_panics() {
        StepSequence::new(1, 1, 1).category_at(3);
    }
}

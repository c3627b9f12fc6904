use crate::types::StepCategory;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RecipeError {
    #[error("not initialized: run 'recipe init'")]
    NotInitialized,

    #[error("recipe not found: {0}")]
    RecipeNotFound(String),

    #[error("recipe already exists: {0}")]
    RecipeExists(String),

    #[error("invalid slug '{0}': must be lowercase alphanumeric with hyphens")]
    InvalidSlug(String),

    #[error("invalid time '{0}': expected HH:MM:SS")]
    InvalidTime(String),

    #[error("invalid multiplier '{0}': expected a positive number")]
    InvalidMultiplier(String),

    #[error("{category} {index} not found")]
    StepNotFound { category: StepCategory, index: usize },

    #[error("recipe '{0}' has no steps to walk through")]
    EmptyRecipe(String),

    #[error("invalid step category: {0}")]
    InvalidCategory(String),

    #[error("invalid value '{value}' for config key '{key}'")]
    InvalidConfigValue { key: String, value: String },

    #[error("invalid sort order: {0}")]
    InvalidSortOrder(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, RecipeError>;

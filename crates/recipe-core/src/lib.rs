pub mod card;
pub mod config;
pub mod countdown;
pub mod error;
pub mod io;
pub mod multiplier;
pub mod paths;
pub mod recipe;
pub mod sequence;
pub mod sim;
pub mod types;
pub mod walkthrough;

pub use error::{RecipeError, Result};

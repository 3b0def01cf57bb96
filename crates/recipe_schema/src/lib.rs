//! # Recipe Schema
//!
//! This crate holds the schema.org `Recipe` data model produced from a
//! YouTube cooking video: the recipe extracted by the language model
//! ([`BaseRecipe`]), the video metadata attached to it ([`VideoInfo`]) and the
//! final JSON-LD document ([`Recipe`]).
//!
//! It also provides the JSON Schema used to constrain the model's structured
//! output to exactly the [`BaseRecipe`] shape.

mod domain;
mod schema;

pub use domain::{
    BaseRecipe, HowToSection, HowToSectionType, HowToStep, HowToStepType, Recipe,
    RecipeCategory, RecipeInstruction, RecipeType, SchemaContext, VideoInfo,
};
pub use schema::{base_recipe_json_schema, BASE_RECIPE_SCHEMA_NAME};

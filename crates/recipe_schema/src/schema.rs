use serde_json::{json, Value};

use crate::RecipeCategory;

/// Name under which the schema is registered with structured output requests
pub const BASE_RECIPE_SCHEMA_NAME: &str = "BaseRecipe";

fn how_to_step_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "@type": { "type": "string", "enum": ["HowToStep"] },
            "text": { "type": "string" }
        },
        "required": ["@type", "text"],
        "additionalProperties": false
    })
}

fn how_to_section_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "@type": { "type": "string", "enum": ["HowToSection"] },
            "name": { "type": "string" },
            "itemListElement": {
                "type": "array",
                "items": how_to_step_schema()
            }
        },
        "required": ["@type", "name", "itemListElement"],
        "additionalProperties": false
    })
}

/// JSON Schema describing [`crate::BaseRecipe`].
///
/// Every property is required and no additional properties are allowed so the
/// document is accepted by strict structured-output endpoints.
pub fn base_recipe_json_schema() -> Value {
    let categories = RecipeCategory::ALL
        .iter()
        .map(RecipeCategory::as_str)
        .collect::<Vec<_>>();

    json!({
        "type": "object",
        "properties": {
            "@context": { "type": "string", "enum": ["https://schema.org"] },
            "@type": { "type": "string", "enum": ["Recipe"] },
            "name": { "type": "string" },
            "cookTime": { "type": "string" },
            "description": { "type": "string" },
            "keywords": { "type": "string" },
            "prepTime": { "type": "string" },
            "recipeCategory": { "type": "string", "enum": categories },
            "recipeCuisine": { "type": "string" },
            "recipeIngredient": {
                "type": "array",
                "items": { "type": "string" }
            },
            "recipeInstructions": {
                "type": "array",
                "items": {
                    "anyOf": [how_to_step_schema(), how_to_section_schema()]
                }
            }
        },
        "required": [
            "@context",
            "@type",
            "name",
            "cookTime",
            "description",
            "keywords",
            "prepTime",
            "recipeCategory",
            "recipeCuisine",
            "recipeIngredient",
            "recipeInstructions"
        ],
        "additionalProperties": false
    })
}

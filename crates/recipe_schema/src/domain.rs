use std::{fmt, ops::Deref};

use serde::{Deserialize, Serialize};

/// The `@context` of every document this crate produces
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SchemaContext {
    #[default]
    #[serde(rename = "https://schema.org")]
    SchemaOrg,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecipeType {
    #[default]
    Recipe,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum HowToStepType {
    #[default]
    HowToStep,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum HowToSectionType {
    #[default]
    HowToSection,
}

/// Metadata about the source video of a recipe
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoInfo {
    pub title: String,
    pub author: String,
    pub thumbnail_url: String,
}

/// A single cooking action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HowToStep {
    #[serde(rename = "@type", default)]
    pub kind: HowToStepType,
    pub text: String,
}

impl HowToStep {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            kind: HowToStepType::HowToStep,
            text: text.into(),
        }
    }
}

/// A named group of steps. Sections never nest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HowToSection {
    #[serde(rename = "@type", default)]
    pub kind: HowToSectionType,
    pub name: String,
    #[serde(rename = "itemListElement")]
    pub item_list_element: Vec<HowToStep>,
}

impl HowToSection {
    pub fn new(name: impl Into<String>, steps: Vec<HowToStep>) -> Self {
        Self {
            kind: HowToSectionType::HowToSection,
            name: name.into(),
            item_list_element: steps,
        }
    }
}

/// An entry of `recipeInstructions`.
///
/// The variants are told apart by their `@type` literal: a `HowToSection`
/// object can never be read as a `HowToStep` and vice versa.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecipeInstruction {
    Step(HowToStep),
    Section(HowToSection),
}

impl From<HowToStep> for RecipeInstruction {
    fn from(step: HowToStep) -> Self {
        RecipeInstruction::Step(step)
    }
}

impl From<HowToSection> for RecipeInstruction {
    fn from(section: HowToSection) -> Self {
        RecipeInstruction::Section(section)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecipeCategory {
    #[serde(rename = "appetizer")]
    Appetizer,
    #[serde(rename = "main course")]
    MainCourse,
    #[serde(rename = "side dish")]
    SideDish,
    #[serde(rename = "dessert")]
    Dessert,
    #[serde(rename = "beverage")]
    Beverage,
    #[serde(rename = "snack")]
    Snack,
}

impl RecipeCategory {
    pub const ALL: [RecipeCategory; 6] = [
        RecipeCategory::Appetizer,
        RecipeCategory::MainCourse,
        RecipeCategory::SideDish,
        RecipeCategory::Dessert,
        RecipeCategory::Beverage,
        RecipeCategory::Snack,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RecipeCategory::Appetizer => "appetizer",
            RecipeCategory::MainCourse => "main course",
            RecipeCategory::SideDish => "side dish",
            RecipeCategory::Dessert => "dessert",
            RecipeCategory::Beverage => "beverage",
            RecipeCategory::Snack => "snack",
        }
    }
}

impl fmt::Display for RecipeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The recipe as returned by the language model, before any video
/// metadata is attached.
///
/// `cook_time` and `prep_time` are ISO-8601 durations (`PT30M`) and
/// `keywords` is a single comma separated string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseRecipe {
    #[serde(rename = "@context", default)]
    pub context: SchemaContext,
    #[serde(rename = "@type", default)]
    pub kind: RecipeType,
    pub name: String,
    pub cook_time: String,
    pub description: String,
    pub keywords: String,
    pub prep_time: String,
    pub recipe_category: RecipeCategory,
    pub recipe_cuisine: String,
    pub recipe_ingredient: Vec<String>,
    pub recipe_instructions: Vec<RecipeInstruction>,
}

/// The final JSON-LD document: a [`BaseRecipe`] plus the video thumbnail
/// as `image` and the uploader as `author`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    #[serde(flatten)]
    base: BaseRecipe,
    pub image: String,
    pub author: String,
}

impl Recipe {
    pub fn from_base_recipe(base_recipe: BaseRecipe, video_info: &VideoInfo) -> Self {
        Recipe {
            base: base_recipe,
            image: video_info.thumbnail_url.clone(),
            author: video_info.author.clone(),
        }
    }

    pub fn into_base_recipe(self) -> BaseRecipe {
        self.base
    }

    /// Serializes the recipe with its schema.org key aliases (`@context`, `@type`)
    pub fn to_json_ld(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn to_json_ld_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl Deref for Recipe {
    type Target = BaseRecipe;

    fn deref(&self) -> &Self::Target {
        &self.base
    }
}

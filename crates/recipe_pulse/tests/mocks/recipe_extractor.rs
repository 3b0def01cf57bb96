use std::sync::{Arc, Mutex};

use recipe_pulse::{
    recipe_schema::{
        BaseRecipe, HowToSection, HowToStep, RecipeCategory, RecipeType, SchemaContext,
    },
    RecipeExtractor,
};

pub fn fried_onions() -> BaseRecipe {
    BaseRecipe {
        context: SchemaContext::SchemaOrg,
        kind: RecipeType::Recipe,
        name: "Fried Onions".into(),
        cook_time: "PT15M".into(),
        description: "Sweet onions fried until deeply golden.".into(),
        keywords: "onion, fried, easy".into(),
        prep_time: "PT5M".into(),
        recipe_category: RecipeCategory::SideDish,
        recipe_cuisine: "American".into(),
        recipe_ingredient: vec!["2 onions".into(), "3 tbsp vegetable oil".into()],
        recipe_instructions: vec![
            HowToStep::new("Chop the onions.").into(),
            HowToSection::new("Cooking", vec![HowToStep::new("Fry until golden.")]).into(),
        ],
    }
}

#[derive(Clone)]
pub struct MockRecipeExtractor {
    pub recipe: BaseRecipe,
    /// (title, transcript) of every call
    pub calls: Arc<Mutex<Vec<(String, String)>>>,
    pub fail_with: Option<String>,
}

impl MockRecipeExtractor {
    pub fn new(recipe: BaseRecipe) -> Self {
        Self {
            recipe,
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_with: None,
        }
    }

    pub fn failing(msg: &str) -> Self {
        Self {
            fail_with: Some(msg.to_string()),
            ..Self::new(fried_onions())
        }
    }
}

impl RecipeExtractor for MockRecipeExtractor {
    type Error = anyhow::Error;

    async fn extract_recipe(
        &self,
        title: &str,
        transcript: &str,
    ) -> Result<BaseRecipe, Self::Error> {
        self.calls
            .lock()
            .unwrap()
            .push((title.to_string(), transcript.to_string()));
        if let Some(ref msg) = self.fail_with {
            return Err(anyhow::anyhow!("{}", msg));
        }
        Ok(self.recipe.clone())
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A saved recipe. Optional fields stay `None` rather than empty strings so
/// display code can skip absent sections.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Recipe {
    pub id: Uuid,
    pub name: String,
    pub protein_source: Option<String>,
    pub ingredients: Option<String>,
    pub instructions: Option<String>,
    pub notes: Option<String>,
    pub prep_time: Option<String>,
    pub batch_friendly: bool,
    pub baby_adaptable: bool,
    pub one_pan: bool,
    pub favorite: bool,
    pub nutritional_profile: Option<String>,
    pub url: Option<String>,
    pub image_url: Option<String>,
    pub use_count: u32,
    pub created_at: DateTime<Utc>,
}

impl Recipe {
    pub fn new(name: &str) -> Self {
        Recipe {
            id: Uuid::new_v4(),
            name: name.to_string(),
            protein_source: None,
            ingredients: None,
            instructions: None,
            notes: None,
            prep_time: None,
            batch_friendly: false,
            baby_adaptable: false,
            one_pan: false,
            favorite: false,
            nutritional_profile: None,
            url: None,
            image_url: None,
            use_count: 0,
            created_at: Utc::now(),
        }
    }
}

/// Payload the extraction prompt asks the model to produce for an imported
/// recipe. Fields default to empty so a sparse response still decodes.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ImportedRecipe {
    pub name: String,
    #[serde(default)]
    pub protein_source: String,
    #[serde(default)]
    pub ingredients: String,
    #[serde(default)]
    pub instructions: String,
    #[serde(default)]
    pub prep_time: String,
    #[serde(default)]
    pub notes: String,
}

impl ImportedRecipe {
    /// Convert to a library record, mapping empty strings to `None`.
    pub fn into_recipe(self, url: &str) -> Recipe {
        fn non_empty(value: String) -> Option<String> {
            if value.trim().is_empty() {
                None
            } else {
                Some(value)
            }
        }

        let mut recipe = Recipe::new(&self.name);
        recipe.protein_source = non_empty(self.protein_source);
        recipe.ingredients = non_empty(self.ingredients);
        recipe.instructions = non_empty(self.instructions);
        recipe.prep_time = non_empty(self.prep_time);
        recipe.notes = non_empty(self.notes);
        recipe.url = Some(url.to_string());
        recipe
    }
}

/// The first `{` through the last `}` of a model response, which is how the
/// extraction prompt's JSON object is located inside surrounding chatter.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}

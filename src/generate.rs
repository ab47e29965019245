use anyhow::{anyhow, Context, Result};
use chrono::{Local, NaiveDate};
use tracing::debug;

use crate::api_connection::connection::ApiConnectionError;
use crate::api_connection::endpoints::{CompletionConfig, Provider};
use crate::family::{self, FamilyMember};
use crate::grocery::{self, GroceryItem};
use crate::recipes::{extract_json_object, ImportedRecipe};

/// Smaller output budget for the short nutrition summaries.
pub const NUTRITION_MAX_TOKENS: u32 = 1024;

/// How much fetched page HTML is handed to the extraction prompt.
pub const HTML_PROMPT_LIMIT: usize = 15_000;

/// Response format to request for grocery generation. Json is the default;
/// Markdown remains for callers that want the line-delimited shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroceryFormat {
    Json,
    Markdown,
}

impl GroceryFormat {
    pub fn parse(input: &str) -> Option<GroceryFormat> {
        match input.trim().to_lowercase().as_str() {
            "json" => Some(GroceryFormat::Json),
            "markdown" | "md" => Some(GroceryFormat::Markdown),
            _ => None,
        }
    }
}

pub fn meal_plan_prompt(profiles: &str, weekly_context: &str) -> String {
    let context_section = if weekly_context.trim().is_empty() {
        String::new()
    } else {
        format!("This week's context from the user: {}", weekly_context)
    };

    format!(
        "{profiles}
Create a 7-day meal plan for this family. For each day include breakfast, lunch, dinner, and 1-2 snacks.

Format each day like this:
**Monday**
- Breakfast: [meal]
- Lunch: [meal]
- Dinner: [meal]
- Snacks: [snack ideas]
- Baby's portions: [how to prepare for baby]

Keep meals simple and practical. Prioritize iron-rich foods, protein, and foods that work for the whole family.

{context_section}"
    )
}

pub fn grocery_prompt(plan_text: &str, household: &str, format: GroceryFormat) -> String {
    match format {
        GroceryFormat::Json => format!(
            "Based on this weekly meal plan:

{plan_text}

Create a grocery list organized by store section (Produce, Protein, Dairy, Pantry & Dry Goods, Frozen).

Respond ONLY with a JSON array inside a ```json code fence. Each element must be an object with a \"category\" string and an \"items\" array of strings, like:
```json
[{{\"category\": \"Produce\", \"items\": [\"2 lbs apples\", \"1 bag spinach\"]}}]
```

Include approximate quantities. This is for {household}."
        ),
        GroceryFormat::Markdown => format!(
            "Based on this weekly meal plan:

{plan_text}

Create a grocery list organized by store section.

Format it like:
**Produce**
- item

**Protein**
- item

**Dairy**
- item

**Pantry & Dry Goods**
- item

**Frozen**
- item

Include approximate quantities. This is for {household}."
        ),
    }
}

pub fn recipe_extract_prompt(html: &str) -> String {
    format!(
        "Extract the recipe from this HTML and return it as JSON with these exact fields:
{{
  \"name\": \"recipe name\",
  \"protein_source\": \"main protein (e.g. Chicken, Salmon, Lentils, Beef)\",
  \"ingredients\": \"all ingredients, one per line\",
  \"instructions\": \"step by step instructions\",
  \"prep_time\": \"total time as a string e.g. 30 mins\",
  \"notes\": \"\"
}}

Only return the JSON, nothing else.

HTML:
{html}"
    )
}

pub fn nutrition_prompt(ingredients: &str, instructions: &str) -> String {
    let instructions = if instructions.trim().is_empty() {
        "Not provided"
    } else {
        instructions
    };
    format!(
        "Based on these ingredients and instructions, give a brief nutritional profile for this recipe. Include approximate calories per serving, protein, carbs, fats, and any notable vitamins or minerals. Keep it concise - 3 to 5 lines max.

Ingredients:
{ingredients}

Instructions:
{instructions}"
    )
}

/// Generate the raw weekly plan text from the stored family profiles plus
/// optional free-text context for the week.
pub async fn generate_meal_plan(
    provider: &Provider,
    config: &CompletionConfig,
    members: &[FamilyMember],
    weekly_context: &str,
) -> Result<String, ApiConnectionError> {
    let today = today();
    let profiles = family::render_profiles(members, today);
    let prompt = meal_plan_prompt(&profiles, weekly_context);
    debug!(members = members.len(), "requesting weekly meal plan");
    provider.complete(config, &prompt).await
}

/// Generate a grocery response for the saved plan and build checklist items
/// from it. Returns the raw response text alongside the items.
///
/// A malformed JSON payload is an error; the markdown builder is only used
/// when the caller asked for that format up front, never as a fallback.
pub async fn generate_grocery_items(
    provider: &Provider,
    config: &CompletionConfig,
    plan_text: &str,
    members: &[FamilyMember],
    format: GroceryFormat,
) -> Result<(String, Vec<GroceryItem>)> {
    let household = family::household_summary(members, today());
    let prompt = grocery_prompt(plan_text, &household, format);
    let response = provider
        .complete(config, &prompt)
        .await
        .context("grocery list generation failed")?;

    let items = match format {
        GroceryFormat::Json => grocery::build_from_fenced_json(&response)
            .context("grocery response could not be decoded")?,
        GroceryFormat::Markdown => grocery::build_from_markdown_lines(&response),
    };
    debug!(items = items.len(), "grocery list built");
    Ok((response, items))
}

/// Fetch a recipe page and extract a structured recipe from its HTML.
pub async fn import_recipe_from_url(
    provider: &Provider,
    config: &CompletionConfig,
    url: &str,
) -> Result<ImportedRecipe> {
    let html = reqwest::get(url)
        .await
        .with_context(|| format!("failed to fetch '{}'", url))?
        .text()
        .await
        .with_context(|| format!("failed to read page body from '{}'", url))?;
    extract_recipe(provider, config, &html).await
}

/// Run the extraction prompt over already-fetched HTML.
pub async fn extract_recipe(
    provider: &Provider,
    config: &CompletionConfig,
    html: &str,
) -> Result<ImportedRecipe> {
    let prompt = recipe_extract_prompt(truncate_chars(html, HTML_PROMPT_LIMIT));
    let response = provider
        .complete(config, &prompt)
        .await
        .context("recipe extraction failed")?;

    let payload = extract_json_object(&response)
        .ok_or_else(|| anyhow!("no JSON object found in the extraction response"))?;
    let imported: ImportedRecipe = serde_json::from_str(payload)
        .context("extraction response did not match the expected recipe fields")?;
    Ok(imported)
}

/// Short free-text nutritional profile for a recipe's ingredients.
pub async fn analyze_nutrition(
    provider: &Provider,
    config: &CompletionConfig,
    ingredients: &str,
    instructions: &str,
) -> Result<String, ApiConnectionError> {
    let prompt = nutrition_prompt(ingredients, instructions);
    provider
        .complete(&config.clone().with_max_tokens(NUTRITION_MAX_TOKENS), &prompt)
        .await
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Char-boundary-safe prefix of `text`, at most `limit` chars.
fn truncate_chars(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meal_plan_prompt_shape() {
        let prompt = meal_plan_prompt("Family Nutrition Profiles:\n", "busy week, craving soup");
        assert!(prompt.contains("Create a 7-day meal plan"));
        assert!(prompt.contains("**Monday**"));
        assert!(prompt.contains("- Breakfast: [meal]"));
        assert!(prompt.contains("- Baby's portions:"));
        assert!(prompt.contains("This week's context from the user: busy week, craving soup"));
    }

    #[test]
    fn test_meal_plan_prompt_omits_empty_context() {
        let prompt = meal_plan_prompt("profiles", "  ");
        assert!(!prompt.contains("This week's context"));
    }

    #[test]
    fn test_grocery_prompt_json_asks_for_fenced_array() {
        let prompt = grocery_prompt("**Monday**\n- Dinner: Chili", "2 adults", GroceryFormat::Json);
        assert!(prompt.contains("```json"));
        assert!(prompt.contains("\"category\""));
        assert!(prompt.contains("This is for 2 adults."));
    }

    #[test]
    fn test_grocery_prompt_markdown_lists_sections() {
        let prompt = grocery_prompt("plan", "the household", GroceryFormat::Markdown);
        assert!(prompt.contains("**Produce**"));
        assert!(prompt.contains("**Pantry & Dry Goods**"));
        assert!(!prompt.contains("```json"));
    }

    #[test]
    fn test_grocery_format_parse() {
        assert_eq!(GroceryFormat::parse("json"), Some(GroceryFormat::Json));
        assert_eq!(GroceryFormat::parse("Markdown"), Some(GroceryFormat::Markdown));
        assert_eq!(GroceryFormat::parse("yaml"), None);
    }

    #[test]
    fn test_recipe_extract_prompt_names_fields() {
        let prompt = recipe_extract_prompt("<html></html>");
        assert!(prompt.contains("\"protein_source\""));
        assert!(prompt.contains("Only return the JSON"));
        assert!(prompt.ends_with("<html></html>"));
    }

    #[test]
    fn test_truncate_chars_respects_boundaries() {
        assert_eq!(truncate_chars("hello", 10), "hello");
        assert_eq!(truncate_chars("hello", 3), "hel");
        // Multibyte chars count as one each and never split.
        assert_eq!(truncate_chars("héllo", 2), "hé");
    }

    #[test]
    fn test_nutrition_prompt_defaults_missing_instructions() {
        let prompt = nutrition_prompt("lentils\nonion", "");
        assert!(prompt.contains("Instructions:\nNot provided"));
    }
}

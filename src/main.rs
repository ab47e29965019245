use anyhow::{bail, Context, Result};
use chrono::{Datelike, Local, NaiveDate};
use tracing_subscriber::EnvFilter;

use meal_planner::api_connection::endpoints::{CompletionConfig, Provider};
use meal_planner::cli::{parse_args, Command, FamilyCommand, GroceryCommand, RecipeCommand};
use meal_planner::family::{baby_stage, FamilyMember, Role};
use meal_planner::generate;
use meal_planner::grocery;
use meal_planner::plan::{parse_plan, replace_meal_slot, DayName, DaySection, SlotKind, WeeklyPlanDocument};
use meal_planner::recipes::Recipe;
use meal_planner::store::{JsonFileStore, Store, DEFAULT_HOUSEHOLD};

// Define the environment variable name for the API key
const API_KEY_ENV_VAR: &str = "ANTHROPIC_API_KEY";
const STORE_PATH: &str = "meal_planner.json";

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok(); // Load .env file for API keys
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = parse_args();
    let store_path = cli.store.clone().unwrap_or_else(|| STORE_PATH.to_string());
    let store = JsonFileStore::new(&store_path, DEFAULT_HOUSEHOLD);
    let provider = Provider::anthropic(API_KEY_ENV_VAR);
    let config = CompletionConfig::from_env();

    match cli.command {
        Command::Generate { context } => {
            cmd_generate(&store, &provider, &config, context.as_deref().unwrap_or("")).await
        }
        Command::Plan { day } => cmd_plan(&store, day.as_deref()).await,
        Command::Swap { day, slot, meal } => cmd_swap(&store, &day, &slot, &meal).await,
        Command::Grocery { command } => match command {
            GroceryCommand::Generate { format } => {
                cmd_grocery_generate(&store, &provider, &config, &format).await
            }
            GroceryCommand::Show => cmd_grocery_show(&store).await,
            GroceryCommand::Add { text } => cmd_grocery_add(&store, &text).await,
            GroceryCommand::Check { id } => cmd_grocery_check(&store, id).await,
            GroceryCommand::Remove { id } => cmd_grocery_remove(&store, id).await,
            GroceryCommand::Clear => cmd_grocery_clear(&store).await,
        },
        Command::Family { command } => match command {
            FamilyCommand::List => cmd_family_list(&store).await,
            FamilyCommand::Add {
                name,
                role,
                dob,
                height,
                weight,
                activity,
                goals,
                supplements,
                notes,
            } => {
                cmd_family_add(
                    &store,
                    &name,
                    &role,
                    dob.as_deref(),
                    height,
                    weight,
                    activity,
                    goals,
                    supplements,
                    notes,
                )
                .await
            }
            FamilyCommand::Edit {
                name,
                role,
                dob,
                height,
                weight,
                activity,
                goals,
                supplements,
                notes,
            } => {
                cmd_family_edit(
                    &store,
                    &name,
                    role.as_deref(),
                    dob.as_deref(),
                    height,
                    weight,
                    activity,
                    goals,
                    supplements,
                    notes,
                )
                .await
            }
            FamilyCommand::Remove { name } => cmd_family_remove(&store, &name).await,
        },
        Command::Recipe { command } => match command {
            RecipeCommand::List => cmd_recipe_list(&store).await,
            RecipeCommand::Show { name } => cmd_recipe_show(&store, &name).await,
            RecipeCommand::Add {
                name,
                protein,
                ingredients,
                instructions,
                notes,
                prep_time,
                batch_friendly,
                baby_adaptable,
                one_pan,
            } => {
                cmd_recipe_add(
                    &store,
                    &name,
                    protein,
                    ingredients,
                    instructions,
                    notes,
                    prep_time,
                    batch_friendly,
                    baby_adaptable,
                    one_pan,
                )
                .await
            }
            RecipeCommand::Import { url } => cmd_recipe_import(&store, &provider, &config, &url).await,
            RecipeCommand::Analyze { name } => {
                cmd_recipe_analyze(&store, &provider, &config, &name).await
            }
            RecipeCommand::Made { name } => cmd_recipe_made(&store, &name).await,
            RecipeCommand::Favorite { name } => cmd_recipe_favorite(&store, &name).await,
            RecipeCommand::Remove { name } => cmd_recipe_remove(&store, &name).await,
        },
    }
}

async fn cmd_generate(
    store: &dyn Store,
    provider: &Provider,
    config: &CompletionConfig,
    weekly_context: &str,
) -> Result<()> {
    let members = store.list_members().await?;
    if members.is_empty() {
        println!("No family profiles saved yet; generating a plan without them.");
    }

    println!("Generating this week's meal plan...");
    let plan_text = generate::generate_meal_plan(provider, config, &members, weekly_context)
        .await
        .context("meal plan generation failed")?;

    // A new plan supersedes the old grocery list.
    let mut document = store.load_document().await?;
    document.plan_text = plan_text.clone();
    document.grocery_items.clear();
    store.save_document(&document).await?;

    let parsed = parse_plan(&plan_text);
    if parsed.is_empty() {
        println!("Plan saved, but no day sections were recognized. Raw text:\n\n{}", plan_text);
    } else {
        print_plan(&parsed);
    }
    Ok(())
}

async fn cmd_plan(store: &dyn Store, day: Option<&str>) -> Result<()> {
    let document = store.load_document().await?;
    if document.plan_text.trim().is_empty() {
        println!("No meal plan saved yet. Run `meal_planner generate` first.");
        return Ok(());
    }

    let parsed = parse_plan(&document.plan_text);
    match day {
        None => {
            if parsed.is_empty() {
                println!("No meals found in the saved plan.");
            } else {
                print_plan(&parsed);
            }
        }
        Some(raw) => {
            let day = if raw.eq_ignore_ascii_case("today") {
                DayName::from_weekday(Local::now().weekday())
            } else {
                DayName::parse(raw).with_context(|| format!("unknown day '{}'", raw))?
            };
            match parsed.day(day) {
                Some(section) => print_day(section),
                None => println!("No meals found for {}.", day),
            }
        }
    }
    Ok(())
}

async fn cmd_swap(store: &dyn Store, day_raw: &str, slot_raw: &str, meal: &str) -> Result<()> {
    let day = DayName::parse(day_raw).with_context(|| format!("unknown day '{}'", day_raw))?;
    let slot =
        SlotKind::parse(slot_raw).with_context(|| format!("unknown meal slot '{}'", slot_raw))?;

    let mut document = store.load_document().await?;
    if document.plan_text.trim().is_empty() {
        bail!("no meal plan saved yet; run `meal_planner generate` first");
    }

    let updated = replace_meal_slot(&document.plan_text, day, slot, meal);
    if updated == document.plan_text {
        println!("No {} entry found under {}; nothing changed.", slot.label(), day);
        return Ok(());
    }

    document.plan_text = updated;
    store.save_document(&document).await?;
    println!("{} on {} is now: {}", slot.label(), day, meal);
    Ok(())
}

async fn cmd_grocery_generate(
    store: &dyn Store,
    provider: &Provider,
    config: &CompletionConfig,
    format_raw: &str,
) -> Result<()> {
    let format = generate::GroceryFormat::parse(format_raw)
        .with_context(|| format!("unknown grocery format '{}'", format_raw))?;

    let mut document = store.load_document().await?;
    if document.plan_text.trim().is_empty() {
        bail!("no meal plan saved yet; run `meal_planner generate` first");
    }

    let members = store.list_members().await?;
    println!("Building your grocery list...");
    let (_raw, items) =
        generate::generate_grocery_items(provider, config, &document.plan_text, &members, format)
            .await?;

    document.grocery_items = items;
    store.save_document(&document).await?;
    print_grocery(&document.grocery_items);
    Ok(())
}

async fn cmd_grocery_show(store: &dyn Store) -> Result<()> {
    let document = store.load_document().await?;
    if document.grocery_items.is_empty() {
        println!("No items yet. Generate a meal plan to get started!");
    } else {
        print_grocery(&document.grocery_items);
    }
    Ok(())
}

async fn cmd_grocery_add(store: &dyn Store, text: &str) -> Result<()> {
    if text.trim().is_empty() {
        bail!("item text is empty");
    }
    let mut document = store.load_document().await?;
    document.grocery_items = grocery::add_item(document.grocery_items, text);
    store.save_document(&document).await?;
    println!("Added: {}", text.trim());
    Ok(())
}

async fn cmd_grocery_check(store: &dyn Store, id: u64) -> Result<()> {
    let mut document = store.load_document().await?;
    if !document.grocery_items.iter().any(|item| item.id == id) {
        bail!("no grocery item with id {}", id);
    }
    document.grocery_items = grocery::toggle_item(document.grocery_items, id);
    store.save_document(&document).await?;
    print_grocery(&document.grocery_items);
    Ok(())
}

async fn cmd_grocery_remove(store: &dyn Store, id: u64) -> Result<()> {
    let mut document = store.load_document().await?;
    if !document.grocery_items.iter().any(|item| item.id == id) {
        bail!("no grocery item with id {}", id);
    }
    document.grocery_items = grocery::remove_item(document.grocery_items, id);
    store.save_document(&document).await?;
    println!("Removed item {}.", id);
    Ok(())
}

async fn cmd_grocery_clear(store: &dyn Store) -> Result<()> {
    let mut document = store.load_document().await?;
    document.grocery_items.clear();
    store.save_document(&document).await?;
    println!("Grocery list cleared.");
    Ok(())
}

async fn cmd_family_list(store: &dyn Store) -> Result<()> {
    let members = store.list_members().await?;
    if members.is_empty() {
        println!("No family profiles yet. Add one with `meal_planner family add`.");
        return Ok(());
    }
    let today = Local::now().date_naive();
    for member in &members {
        print_member(member, today);
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
async fn cmd_family_add(
    store: &dyn Store,
    name: &str,
    role_raw: &str,
    dob: Option<&str>,
    height: Option<String>,
    weight: Option<String>,
    activity: Option<String>,
    goals: Option<String>,
    supplements: Option<String>,
    notes: Option<String>,
) -> Result<()> {
    let role = Role::parse(role_raw).with_context(|| format!("unknown role '{}'", role_raw))?;
    let members = store.list_members().await?;
    if find_member(&members, name).is_some() {
        bail!("a member named '{}' already exists; use `family edit`", name);
    }

    let mut member = FamilyMember::new(name, role);
    member.date_of_birth = parse_dob(dob)?;
    member.height = height;
    member.weight = weight;
    member.activity_level = activity;
    member.goals = goals;
    member.supplements = supplements;
    member.notes = notes;

    store.upsert_member(&member).await?;
    println!("Saved profile for {}.", member.name);
    Ok(())
}

#[allow(clippy::too_many_arguments)]
async fn cmd_family_edit(
    store: &dyn Store,
    name: &str,
    role_raw: Option<&str>,
    dob: Option<&str>,
    height: Option<String>,
    weight: Option<String>,
    activity: Option<String>,
    goals: Option<String>,
    supplements: Option<String>,
    notes: Option<String>,
) -> Result<()> {
    let members = store.list_members().await?;
    let mut member = find_member(&members, name)
        .with_context(|| format!("no member named '{}'", name))?
        .clone();

    if let Some(raw) = role_raw {
        member.role = Role::parse(raw).with_context(|| format!("unknown role '{}'", raw))?;
    }
    if dob.is_some() {
        member.date_of_birth = parse_dob(dob)?;
    }
    if height.is_some() {
        member.height = height;
    }
    if weight.is_some() {
        member.weight = weight;
    }
    if activity.is_some() {
        member.activity_level = activity;
    }
    if goals.is_some() {
        member.goals = goals;
    }
    if supplements.is_some() {
        member.supplements = supplements;
    }
    if notes.is_some() {
        member.notes = notes;
    }

    store.upsert_member(&member).await?;
    println!("Updated profile for {}.", member.name);
    Ok(())
}

async fn cmd_family_remove(store: &dyn Store, name: &str) -> Result<()> {
    let members = store.list_members().await?;
    let member = find_member(&members, name)
        .with_context(|| format!("no member named '{}'", name))?;
    store.delete_member(member.id).await?;
    println!("Removed {}.", member.name);
    Ok(())
}

async fn cmd_recipe_list(store: &dyn Store) -> Result<()> {
    let recipes = store.list_recipes().await?;
    if recipes.is_empty() {
        println!("No recipes yet. Add your first one!");
        return Ok(());
    }

    let favorites: Vec<&Recipe> = recipes.iter().filter(|r| r.favorite).collect();
    let rest: Vec<&Recipe> = recipes.iter().filter(|r| !r.favorite).collect();

    if !favorites.is_empty() {
        println!("FAVORITES");
        for recipe in favorites {
            print_recipe_line(recipe);
        }
        println!();
    }
    if !rest.is_empty() {
        println!("ALL RECIPES");
        for recipe in rest {
            print_recipe_line(recipe);
        }
    }
    Ok(())
}

async fn cmd_recipe_show(store: &dyn Store, name: &str) -> Result<()> {
    let recipes = store.list_recipes().await?;
    let recipe = find_recipe(&recipes, name)
        .with_context(|| format!("no recipe named '{}'", name))?;

    println!("{}", recipe.name);
    if let Some(protein) = &recipe.protein_source {
        println!("Protein: {}", protein);
    }
    let mut tags = Vec::new();
    if recipe.batch_friendly {
        tags.push("batch friendly");
    }
    if recipe.baby_adaptable {
        tags.push("baby adaptable");
    }
    if recipe.one_pan {
        tags.push("one pan");
    }
    if !tags.is_empty() {
        println!("Tags: {}", tags.join(", "));
    }
    if let Some(prep_time) = &recipe.prep_time {
        println!("Prep time: {}", prep_time);
    }
    if let Some(ingredients) = &recipe.ingredients {
        println!("\nIngredients:\n{}", ingredients);
    }
    if let Some(instructions) = &recipe.instructions {
        println!("\nInstructions:\n{}", instructions);
    }
    if let Some(nutrition) = &recipe.nutritional_profile {
        println!("\nNutrition:\n{}", nutrition);
    }
    if let Some(notes) = &recipe.notes {
        println!("\nNotes:\n{}", notes);
    }
    if let Some(url) = &recipe.url {
        println!("\nOriginal recipe: {}", url);
    }
    println!("\nMade {}x", recipe.use_count);
    Ok(())
}

#[allow(clippy::too_many_arguments)]
async fn cmd_recipe_add(
    store: &dyn Store,
    name: &str,
    protein: Option<String>,
    ingredients: Option<String>,
    instructions: Option<String>,
    notes: Option<String>,
    prep_time: Option<String>,
    batch_friendly: bool,
    baby_adaptable: bool,
    one_pan: bool,
) -> Result<()> {
    let mut recipe = Recipe::new(name);
    recipe.protein_source = protein;
    recipe.ingredients = ingredients;
    recipe.instructions = instructions;
    recipe.notes = notes;
    recipe.prep_time = prep_time;
    recipe.batch_friendly = batch_friendly;
    recipe.baby_adaptable = baby_adaptable;
    recipe.one_pan = one_pan;

    store.insert_recipe(&recipe).await?;
    println!("Saved recipe '{}'.", recipe.name);
    Ok(())
}

async fn cmd_recipe_import(
    store: &dyn Store,
    provider: &Provider,
    config: &CompletionConfig,
    url: &str,
) -> Result<()> {
    println!("Importing recipe from {}...", url);
    let imported = generate::import_recipe_from_url(provider, config, url)
        .await
        .context("could not fetch a recipe from that URL; try adding it manually")?;
    let recipe = imported.into_recipe(url);
    store.insert_recipe(&recipe).await?;
    println!("Imported '{}'.", recipe.name);
    Ok(())
}

async fn cmd_recipe_analyze(
    store: &dyn Store,
    provider: &Provider,
    config: &CompletionConfig,
    name: &str,
) -> Result<()> {
    let recipes = store.list_recipes().await?;
    let mut recipe = find_recipe(&recipes, name)
        .with_context(|| format!("no recipe named '{}'", name))?
        .clone();
    let ingredients = recipe
        .ingredients
        .clone()
        .with_context(|| format!("recipe '{}' has no ingredients to analyze", recipe.name))?;

    println!("Analyzing nutrition for '{}'...", recipe.name);
    let nutrition = generate::analyze_nutrition(
        provider,
        config,
        &ingredients,
        recipe.instructions.as_deref().unwrap_or(""),
    )
    .await
    .context("nutrition analysis failed")?;

    println!("\n{}", nutrition);
    recipe.nutritional_profile = Some(nutrition);
    store.update_recipe(&recipe).await?;
    Ok(())
}

async fn cmd_recipe_made(store: &dyn Store, name: &str) -> Result<()> {
    let recipes = store.list_recipes().await?;
    let mut recipe = find_recipe(&recipes, name)
        .with_context(|| format!("no recipe named '{}'", name))?
        .clone();
    recipe.use_count += 1;
    store.update_recipe(&recipe).await?;
    println!("'{}' made {}x.", recipe.name, recipe.use_count);
    Ok(())
}

async fn cmd_recipe_favorite(store: &dyn Store, name: &str) -> Result<()> {
    let recipes = store.list_recipes().await?;
    let mut recipe = find_recipe(&recipes, name)
        .with_context(|| format!("no recipe named '{}'", name))?
        .clone();
    recipe.favorite = !recipe.favorite;
    store.update_recipe(&recipe).await?;
    if recipe.favorite {
        println!("'{}' marked as a favorite.", recipe.name);
    } else {
        println!("'{}' removed from favorites.", recipe.name);
    }
    Ok(())
}

async fn cmd_recipe_remove(store: &dyn Store, name: &str) -> Result<()> {
    let recipes = store.list_recipes().await?;
    let recipe = find_recipe(&recipes, name)
        .with_context(|| format!("no recipe named '{}'", name))?;
    store.delete_recipe(recipe.id).await?;
    println!("Removed '{}'.", recipe.name);
    Ok(())
}

fn find_member<'a>(members: &'a [FamilyMember], name: &str) -> Option<&'a FamilyMember> {
    members
        .iter()
        .find(|member| member.name.eq_ignore_ascii_case(name))
}

fn find_recipe<'a>(recipes: &'a [Recipe], name: &str) -> Option<&'a Recipe> {
    recipes
        .iter()
        .find(|recipe| recipe.name.eq_ignore_ascii_case(name))
}

fn parse_dob(dob: Option<&str>) -> Result<Option<NaiveDate>> {
    match dob {
        None => Ok(None),
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map(Some)
            .with_context(|| format!("invalid date of birth '{}', expected YYYY-MM-DD", raw)),
    }
}

fn print_plan(document: &WeeklyPlanDocument) {
    for section in &document.days {
        print_day(section);
    }
}

fn print_day(section: &DaySection) {
    println!("\n{}", section.day);
    for kind in SlotKind::ALL {
        if let Some(value) = section.slot(kind) {
            if !value.is_empty() {
                println!("  {}: {}", kind.label(), value);
            }
        }
    }
}

fn print_grocery(items: &[grocery::GroceryItem]) {
    for (category, members) in grocery::group_for_display(items) {
        println!("\n{}", category.to_uppercase());
        for item in members {
            let mark = if item.checked { "x" } else { " " };
            println!("  [{}] {} ({})", mark, item.text, item.id);
        }
    }
}

fn print_member(member: &FamilyMember, today: NaiveDate) {
    println!("\n{} ({})", member.name, member.role);
    if let Some(height) = &member.height {
        println!("  Height: {}", height);
    }
    if let Some(weight) = &member.weight {
        println!("  Weight: {}", weight);
    }
    if let Some(activity) = &member.activity_level {
        println!("  Activity: {}", activity);
    }
    if let Some(goals) = &member.goals {
        println!("  Goals: {}", goals);
    }
    if let Some(supplements) = &member.supplements {
        println!("  Supplements: {}", supplements);
    }
    if member.role == Role::Baby {
        if let Some(date_of_birth) = member.date_of_birth {
            let stage = baby_stage(date_of_birth, today);
            println!("  {}", stage.stage);
            println!("  {}", stage.preparation);
        }
    }
    if let Some(notes) = &member.notes {
        println!("  Notes: {}", notes);
    }
}

fn print_recipe_line(recipe: &Recipe) {
    let mut details = Vec::new();
    if let Some(protein) = &recipe.protein_source {
        details.push(protein.clone());
    }
    if let Some(prep_time) = &recipe.prep_time {
        details.push(prep_time.clone());
    }
    details.push(format!("used {}x", recipe.use_count));
    println!("  {} ({})", recipe.name, details.join(", "));
}

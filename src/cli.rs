use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(author, version, about = "Family meal planning from the terminal", long_about = None)]
pub struct Cli {
    /// Path to the household data file
    #[arg(long, global = true)]
    pub store: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate this week's meal plan from the family profiles
    Generate {
        /// Free-text context for the week (cravings, schedule, training plans)
        #[arg(long)]
        context: Option<String>,
    },
    /// Show the saved meal plan
    Plan {
        /// Day to show: a weekday name, "today", or omit for the whole week
        day: Option<String>,
    },
    /// Swap one meal on one day for something else
    Swap {
        /// Day of the week, e.g. "monday"
        day: String,
        /// Meal slot: breakfast, lunch, dinner, snacks or baby
        slot: String,
        /// Replacement meal text
        meal: String,
    },
    /// Grocery checklist operations
    Grocery {
        #[command(subcommand)]
        command: GroceryCommand,
    },
    /// Family profile operations
    Family {
        #[command(subcommand)]
        command: FamilyCommand,
    },
    /// Recipe library operations
    Recipe {
        #[command(subcommand)]
        command: RecipeCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum GroceryCommand {
    /// Build the grocery list from the saved meal plan
    Generate {
        /// Response format to request: json or markdown
        #[arg(long, default_value = "json")]
        format: String,
    },
    /// Show the checklist grouped by store section
    Show,
    /// Add a single item
    Add {
        /// Item text, e.g. "2 lbs apples"
        text: String,
    },
    /// Toggle an item's checkbox
    Check {
        /// Item id as shown by `grocery show`
        id: u64,
    },
    /// Delete a single item
    Remove {
        /// Item id as shown by `grocery show`
        id: u64,
    },
    /// Delete every item
    Clear,
}

#[derive(Subcommand, Debug)]
pub enum FamilyCommand {
    /// List the saved profiles
    List,
    /// Add a family member
    Add {
        name: String,
        /// Role: mom, dad, baby or adult
        #[arg(long, default_value = "adult")]
        role: String,
        /// Date of birth (YYYY-MM-DD), used for the baby feeding stage
        #[arg(long)]
        dob: Option<String>,
        #[arg(long)]
        height: Option<String>,
        #[arg(long)]
        weight: Option<String>,
        #[arg(long)]
        activity: Option<String>,
        #[arg(long)]
        goals: Option<String>,
        #[arg(long)]
        supplements: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Update fields on an existing member
    Edit {
        name: String,
        #[arg(long)]
        role: Option<String>,
        #[arg(long)]
        dob: Option<String>,
        #[arg(long)]
        height: Option<String>,
        #[arg(long)]
        weight: Option<String>,
        #[arg(long)]
        activity: Option<String>,
        #[arg(long)]
        goals: Option<String>,
        #[arg(long)]
        supplements: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Remove a member by name
    Remove { name: String },
}

#[derive(Subcommand, Debug)]
pub enum RecipeCommand {
    /// List saved recipes, favorites first
    List,
    /// Show one recipe in full
    Show { name: String },
    /// Add a recipe by hand
    Add {
        name: String,
        #[arg(long)]
        protein: Option<String>,
        #[arg(long)]
        ingredients: Option<String>,
        #[arg(long)]
        instructions: Option<String>,
        #[arg(long)]
        notes: Option<String>,
        #[arg(long)]
        prep_time: Option<String>,
        #[arg(long)]
        batch_friendly: bool,
        #[arg(long)]
        baby_adaptable: bool,
        #[arg(long)]
        one_pan: bool,
    },
    /// Import a recipe from a URL
    Import { url: String },
    /// Fill in the nutritional profile for a recipe
    Analyze { name: String },
    /// Record that a recipe was cooked
    Made { name: String },
    /// Toggle a recipe's favorite star
    Favorite { name: String },
    /// Remove a recipe by name
    Remove { name: String },
}

pub fn parse_args() -> Cli {
    Cli::parse()
}

use std::error::Error;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// Category shown for items stored without one. Defaulting happens at
/// display time; stored categories stay exactly as built.
pub const DEFAULT_CATEGORY: &str = "Other";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct GroceryItem {
    pub id: u64,
    pub text: String,
    pub checked: bool,
    pub category: String,
}

/// One store section of a structured grocery response.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct CategorizedGroup {
    pub category: String,
    pub items: Vec<String>,
}

#[derive(Debug)]
pub enum GroceryListError {
    /// The structured grocery payload did not decode as the expected JSON
    /// array. Callers must surface this; there is no fallback parse.
    MalformedPayload(serde_json::Error),
}

impl fmt::Display for GroceryListError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroceryListError::MalformedPayload(err) => {
                write!(f, "malformed grocery payload: {}", err)
            }
        }
    }
}

impl Error for GroceryListError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            GroceryListError::MalformedPayload(err) => Some(err),
        }
    }
}

impl From<serde_json::Error> for GroceryListError {
    fn from(err: serde_json::Error) -> Self {
        GroceryListError::MalformedPayload(err)
    }
}

/// Process-unique item ids: one monotonic counter seeded from the epoch
/// millisecond clock at first use. Stable for the lifetime of a list and
/// never reused within a process.
fn next_item_id() -> u64 {
    static COUNTER: OnceLock<AtomicU64> = OnceLock::new();
    let counter = COUNTER.get_or_init(|| {
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_millis() as u64)
            .unwrap_or(0);
        AtomicU64::new(seed)
    });
    counter.fetch_add(1, Ordering::Relaxed)
}

/// Strip leading/trailing triple-backtick fence markers, with or without a
/// `json` language tag, from a model response.
pub fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    if trimmed.starts_with("```json") && trimmed.ends_with("```") {
        trimmed
            .trim_start_matches("```json")
            .trim_end_matches("```")
            .trim()
    } else if trimmed.starts_with("```") && trimmed.ends_with("```") {
        trimmed
            .trim_start_matches("```")
            .trim_end_matches("```")
            .trim()
    } else {
        trimmed
    }
}

/// Decode a fenced JSON grocery payload into its store-section groups.
pub fn parse_categorized_payload(text: &str) -> Result<Vec<CategorizedGroup>, GroceryListError> {
    let payload = strip_code_fences(text);
    serde_json::from_str(payload).map_err(GroceryListError::MalformedPayload)
}

/// Flatten structured groups into checklist items, in input order, all
/// unchecked, each with a fresh unique id.
pub fn build_from_categorized_groups(groups: &[CategorizedGroup]) -> Vec<GroceryItem> {
    let mut items = Vec::new();
    for group in groups {
        for text in &group.items {
            items.push(GroceryItem {
                id: next_item_id(),
                text: text.clone(),
                checked: false,
                category: group.category.clone(),
            });
        }
    }
    items
}

/// Decode + flatten in one step for callers holding the raw fenced response.
pub fn build_from_fenced_json(text: &str) -> Result<Vec<GroceryItem>, GroceryListError> {
    Ok(build_from_categorized_groups(&parse_categorized_payload(
        text,
    )?))
}

/// Line-delimited fallback: a line wholly wrapped in `**` sets the current
/// category, a `- ` line becomes an item under it. Ids are line positions;
/// each build replaces the previous list wholesale.
pub fn build_from_markdown_lines(text: &str) -> Vec<GroceryItem> {
    let mut items = Vec::new();
    let mut current_category = String::new();

    for (index, line) in text.split('\n').enumerate() {
        if line.starts_with("**") && line.ends_with("**") {
            current_category = line.replace("**", "");
        } else if let Some(rest) = line.strip_prefix("- ") {
            items.push(GroceryItem {
                id: index as u64,
                text: rest.to_string(),
                checked: false,
                category: current_category.clone(),
            });
        }
    }

    items
}

/// Append a single user-added item.
pub fn add_item(mut items: Vec<GroceryItem>, text: &str) -> Vec<GroceryItem> {
    items.push(GroceryItem {
        id: next_item_id(),
        text: text.trim().to_string(),
        checked: false,
        category: DEFAULT_CATEGORY.to_string(),
    });
    items
}

/// Flip one item's checkbox; every other item is untouched.
pub fn toggle_item(items: Vec<GroceryItem>, id: u64) -> Vec<GroceryItem> {
    items
        .into_iter()
        .map(|mut item| {
            if item.id == id {
                item.checked = !item.checked;
            }
            item
        })
        .collect()
}

/// Drop one item by id.
pub fn remove_item(items: Vec<GroceryItem>, id: u64) -> Vec<GroceryItem> {
    items.into_iter().filter(|item| item.id != id).collect()
}

/// Group items by category for display, in first-seen order. Items stored
/// with an empty category render under [`DEFAULT_CATEGORY`].
pub fn group_for_display(items: &[GroceryItem]) -> Vec<(String, Vec<&GroceryItem>)> {
    let mut groups: Vec<(String, Vec<&GroceryItem>)> = Vec::new();
    for item in items {
        let category = if item.category.is_empty() {
            DEFAULT_CATEGORY
        } else {
            item.category.as_str()
        };
        match groups.iter_mut().find(|(name, _)| name == category) {
            Some((_, members)) => members.push(item),
            None => groups.push((category.to_string(), vec![item])),
        }
    }
    groups
}

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::PathBuf;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::fs;
use uuid::Uuid;

use crate::family::FamilyMember;
use crate::grocery::GroceryItem;
use crate::recipes::Recipe;

/// The single-tenant household key. There is no multi-plan support; every
/// operation reads and writes this one record.
pub const DEFAULT_HOUSEHOLD: &str = "default";

/// The persisted plan state. Raw plan text is the source of truth; parsed
/// views are always rebuilt from it.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct HouseholdDocument {
    pub plan_text: String,
    pub grocery_items: Vec<GroceryItem>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
struct HouseholdRecord {
    #[serde(default)]
    document: HouseholdDocument,
    #[serde(default)]
    members: Vec<FamilyMember>,
    #[serde(default)]
    recipes: Vec<Recipe>,
}

#[derive(Debug, Serialize, Deserialize, Default)]
struct StoreFile {
    households: HashMap<String, HouseholdRecord>,
}

/// Keyed read/write access to the hosted household data. Concurrent writers
/// are last-write-wins with no conflict detection.
#[async_trait]
pub trait Store: Send + Sync {
    async fn load_document(&self) -> Result<HouseholdDocument>;
    async fn save_document(&self, document: &HouseholdDocument) -> Result<()>;

    async fn list_members(&self) -> Result<Vec<FamilyMember>>;
    async fn upsert_member(&self, member: &FamilyMember) -> Result<()>;
    async fn delete_member(&self, id: Uuid) -> Result<bool>;

    async fn list_recipes(&self) -> Result<Vec<Recipe>>;
    async fn insert_recipe(&self, recipe: &Recipe) -> Result<()>;
    async fn update_recipe(&self, recipe: &Recipe) -> Result<bool>;
    async fn delete_recipe(&self, id: Uuid) -> Result<bool>;
}

/// Store backed by one JSON file of household records, read and written
/// whole on every operation.
pub struct JsonFileStore {
    path: PathBuf,
    household: String,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>, household: &str) -> Self {
        JsonFileStore {
            path: path.into(),
            household: household.to_string(),
        }
    }

    async fn read_file(&self) -> Result<StoreFile> {
        match fs::read_to_string(&self.path).await {
            Ok(raw) => serde_json::from_str(&raw)
                .with_context(|| format!("store file '{}' is not valid JSON", self.path.display())),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(StoreFile::default()),
            Err(err) => Err(err).with_context(|| {
                format!("failed to read store file '{}'", self.path.display())
            }),
        }
    }

    async fn write_file(&self, file: &StoreFile) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await.with_context(|| {
                    format!("failed to create store directory '{}'", parent.display())
                })?;
            }
        }
        let raw = serde_json::to_string_pretty(file).context("failed to encode store file")?;
        fs::write(&self.path, raw)
            .await
            .with_context(|| format!("failed to write store file '{}'", self.path.display()))
    }

    async fn update_record<F>(&self, apply: F) -> Result<()>
    where
        F: FnOnce(&mut HouseholdRecord) + Send,
    {
        let mut file = self.read_file().await?;
        let record = file.households.entry(self.household.clone()).or_default();
        apply(record);
        self.write_file(&file).await
    }

    async fn read_record(&self) -> Result<HouseholdRecord> {
        let mut file = self.read_file().await?;
        Ok(file.households.remove(&self.household).unwrap_or_default())
    }
}

#[async_trait]
impl Store for JsonFileStore {
    async fn load_document(&self) -> Result<HouseholdDocument> {
        Ok(self.read_record().await?.document)
    }

    async fn save_document(&self, document: &HouseholdDocument) -> Result<()> {
        let document = document.clone();
        self.update_record(move |record| record.document = document)
            .await
    }

    async fn list_members(&self) -> Result<Vec<FamilyMember>> {
        let mut members = self.read_record().await?.members;
        members.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(members)
    }

    async fn upsert_member(&self, member: &FamilyMember) -> Result<()> {
        let member = member.clone();
        self.update_record(move |record| {
            match record.members.iter_mut().find(|m| m.id == member.id) {
                Some(existing) => *existing = member,
                None => record.members.push(member),
            }
        })
        .await
    }

    async fn delete_member(&self, id: Uuid) -> Result<bool> {
        let mut removed = false;
        self.update_record(|record| {
            let before = record.members.len();
            record.members.retain(|m| m.id != id);
            removed = record.members.len() != before;
        })
        .await?;
        Ok(removed)
    }

    async fn list_recipes(&self) -> Result<Vec<Recipe>> {
        let mut recipes = self.read_record().await?.recipes;
        recipes.sort_by(|a, b| {
            b.use_count
                .cmp(&a.use_count)
                .then(a.created_at.cmp(&b.created_at))
        });
        Ok(recipes)
    }

    async fn insert_recipe(&self, recipe: &Recipe) -> Result<()> {
        let recipe = recipe.clone();
        self.update_record(move |record| record.recipes.push(recipe))
            .await
    }

    async fn update_recipe(&self, recipe: &Recipe) -> Result<bool> {
        let recipe = recipe.clone();
        let mut updated = false;
        self.update_record(|record| {
            if let Some(existing) = record.recipes.iter_mut().find(|r| r.id == recipe.id) {
                *existing = recipe;
                updated = true;
            }
        })
        .await?;
        Ok(updated)
    }

    async fn delete_recipe(&self, id: Uuid) -> Result<bool> {
        let mut removed = false;
        self.update_record(|record| {
            let before = record.recipes.len();
            record.recipes.retain(|r| r.id != id);
            removed = record.recipes.len() != before;
        })
        .await?;
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::family::Role;

    fn temp_store() -> (tempfile::TempDir, JsonFileStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("household.json"), DEFAULT_HOUSEHOLD);
        (dir, store)
    }

    #[tokio::test]
    async fn test_missing_file_loads_empty_document() {
        let (_dir, store) = temp_store();
        let document = store.load_document().await.unwrap();
        assert_eq!(document, HouseholdDocument::default());
        assert!(store.list_members().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_document_round_trip() {
        let (_dir, store) = temp_store();
        let document = HouseholdDocument {
            plan_text: "**Monday**\n- Breakfast: Oats".to_string(),
            grocery_items: vec![GroceryItem {
                id: 7,
                text: "Oats".to_string(),
                checked: true,
                category: "Pantry & Dry Goods".to_string(),
            }],
        };
        store.save_document(&document).await.unwrap();
        assert_eq!(store.load_document().await.unwrap(), document);
    }

    #[tokio::test]
    async fn test_member_upsert_and_delete() {
        let (_dir, store) = temp_store();
        let mut member = FamilyMember::new("Jess", Role::Mom);
        store.upsert_member(&member).await.unwrap();

        member.goals = Some("more protein".to_string());
        store.upsert_member(&member).await.unwrap();

        let members = store.list_members().await.unwrap();
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].goals.as_deref(), Some("more protein"));

        assert!(store.delete_member(member.id).await.unwrap());
        assert!(!store.delete_member(member.id).await.unwrap());
        assert!(store.list_members().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_recipes_sorted_by_use_count() {
        let (_dir, store) = temp_store();
        let mut rarely_used = Recipe::new("Soup");
        rarely_used.use_count = 1;
        let mut favorite_dinner = Recipe::new("Tacos");
        favorite_dinner.use_count = 5;

        store.insert_recipe(&rarely_used).await.unwrap();
        store.insert_recipe(&favorite_dinner).await.unwrap();

        let recipes = store.list_recipes().await.unwrap();
        assert_eq!(recipes[0].name, "Tacos");
        assert_eq!(recipes[1].name, "Soup");
    }

    #[tokio::test]
    async fn test_update_recipe_reports_missing_id() {
        let (_dir, store) = temp_store();
        let recipe = Recipe::new("Chili");
        assert!(!store.update_recipe(&recipe).await.unwrap());

        store.insert_recipe(&recipe).await.unwrap();
        let mut updated = recipe.clone();
        updated.favorite = true;
        assert!(store.update_recipe(&updated).await.unwrap());
        assert!(store.list_recipes().await.unwrap()[0].favorite);
    }
}

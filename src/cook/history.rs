//! Completed-recipe history
//!
//! One row per recipe id, bumped every time the recipe is finished.

use serde::{Deserialize, Serialize};

use super::recipe::Recipe;
use crate::persistence::{KeyValueStore, StoreError, load_json, save_json};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletedRecipe {
    pub id: String,
    pub name: String,
    /// Unix timestamp (ms) of the latest completion
    pub completed_at: f64,
    pub times_completed: u32,
}

#[derive(Debug, Clone)]
pub struct CookHistory<S> {
    store: S,
}

impl<S: KeyValueStore> CookHistory<S> {
    const STORAGE_KEY: &'static str = "completed_recipes";

    pub fn new(store: S) -> Self {
        Self { store }
    }

    fn load(&self) -> Result<Vec<CompletedRecipe>, StoreError> {
        Ok(load_json(&self.store, Self::STORAGE_KEY)?.unwrap_or_default())
    }

    /// Load for a write; undecodable rows are replaced by the next save
    fn load_or_reset(&self) -> Result<Vec<CompletedRecipe>, StoreError> {
        match self.load() {
            Err(StoreError::Serde { source, .. }) => {
                log::warn!("Cook history unreadable, starting fresh: {source}");
                Ok(Vec::new())
            }
            other => other,
        }
    }

    /// Insert or bump the row for `recipe`
    pub fn record(
        &mut self,
        recipe: &Recipe,
        completed_at: f64,
    ) -> Result<CompletedRecipe, StoreError> {
        let mut rows = self.load_or_reset()?;
        let row = match rows.iter_mut().find(|r| r.id == recipe.id) {
            Some(existing) => {
                existing.times_completed = existing.times_completed.saturating_add(1);
                existing.completed_at = completed_at;
                existing.clone()
            }
            None => {
                let row = CompletedRecipe {
                    id: recipe.id.clone(),
                    name: recipe.name.clone(),
                    completed_at,
                    times_completed: 1,
                };
                rows.push(row.clone());
                row
            }
        };
        save_json(&mut self.store, Self::STORAGE_KEY, &rows)?;
        log::info!("{} completed {} time(s)", row.name, row.times_completed);
        Ok(row)
    }

    /// Every row, most recent completion first; empty when unreadable
    pub fn list(&self) -> Vec<CompletedRecipe> {
        match self.load() {
            Ok(mut rows) => {
                rows.sort_by(|a, b| b.completed_at.total_cmp(&a.completed_at));
                rows
            }
            Err(e) => {
                log::error!("Failed to fetch completed recipes: {e}");
                Vec::new()
            }
        }
    }

    pub fn times_completed(&self, recipe_id: &str) -> u32 {
        self.list()
            .iter()
            .find(|r| r.id == recipe_id)
            .map_or(0, |r| r.times_completed)
    }

    pub fn clear(&mut self) -> Result<(), StoreError> {
        self.store.remove(Self::STORAGE_KEY)?;
        log::info!("Cleared cook history");
        Ok(())
    }
}

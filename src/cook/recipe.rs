//! Recipe catalog
//!
//! Recipes are static data bundled as JSON.

use serde::{Deserialize, Serialize};

const BUNDLED_RECIPES: &str = include_str!("../../assets/recipes.json");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecipeCategory {
    Pasta,
    Chicken,
    Beef,
    Breakfast,
    Rice,
    Soup,
    Eggs,
    Sandwich,
    Vegetarian,
    Dessert,
}

impl RecipeCategory {
    pub const ALL: [RecipeCategory; 10] = [
        RecipeCategory::Pasta,
        RecipeCategory::Chicken,
        RecipeCategory::Beef,
        RecipeCategory::Breakfast,
        RecipeCategory::Rice,
        RecipeCategory::Soup,
        RecipeCategory::Eggs,
        RecipeCategory::Sandwich,
        RecipeCategory::Vegetarian,
        RecipeCategory::Dessert,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            RecipeCategory::Pasta => "Pasta",
            RecipeCategory::Chicken => "Chicken",
            RecipeCategory::Beef => "Beef",
            RecipeCategory::Breakfast => "Breakfast",
            RecipeCategory::Rice => "Rice",
            RecipeCategory::Soup => "Soup",
            RecipeCategory::Eggs => "Eggs",
            RecipeCategory::Sandwich => "Sandwich",
            RecipeCategory::Vegetarian => "Vegetarian",
            RecipeCategory::Dessert => "Dessert",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DifficultyLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl DifficultyLevel {
    pub fn display_name(&self) -> &'static str {
        match self {
            DifficultyLevel::Beginner => "Beginner",
            DifficultyLevel::Intermediate => "Intermediate",
            DifficultyLevel::Advanced => "Advanced",
        }
    }

    /// XP multiplier applied to a recipe's base XP
    pub fn xp_multiplier(&self) -> f64 {
        match self {
            DifficultyLevel::Beginner => 1.0,
            DifficultyLevel::Intermediate => 1.5,
            DifficultyLevel::Advanced => 2.0,
        }
    }

    /// Top tier; counts toward the advanced-recipes achievement
    pub fn is_top_tier(&self) -> bool {
        *self == DifficultyLevel::Advanced
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeStep {
    pub text: String,
    /// Suggested timer in seconds, if this step has one
    #[serde(default)]
    pub duration: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: String,
    pub name: String,
    pub image: String,
    pub category: RecipeCategory,
    pub difficulty: DifficultyLevel,
    pub base_xp: u32,
    pub steps: Vec<RecipeStep>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Catalog {
    pub recipes: Vec<Recipe>,
}

impl Catalog {
    /// Load a catalog from JSON
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed into recipes.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// The catalog shipped with the app (empty if the bundle is broken)
    pub fn bundled() -> Self {
        Self::from_json(BUNDLED_RECIPES).unwrap_or_else(|e| {
            log::error!("Bundled recipes unreadable: {e}");
            Self::default()
        })
    }

    pub fn get(&self, id: &str) -> Option<&Recipe> {
        self.recipes.iter().find(|r| r.id == id)
    }

    pub fn in_category(&self, category: RecipeCategory) -> impl Iterator<Item = &Recipe> {
        self.recipes.iter().filter(move |r| r.category == category)
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }
}

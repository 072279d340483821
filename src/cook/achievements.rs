//! Achievement catalog
//!
//! Each achievement is a threshold on one progression counter. Unlock status
//! is never stored here; only the set of unlocked ids lives in the
//! progression state.

use super::progression::ProgressionState;
use super::recipe::RecipeCategory;

/// What an achievement checks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Criteria {
    RecipesCompleted { min: u32 },
    PerfectTimers { min: u32 },
    CategoryCompleted { category: RecipeCategory, min: u32 },
    AdvancedRecipes { min: u32 },
}

impl Criteria {
    pub fn is_met(&self, state: &ProgressionState) -> bool {
        match *self {
            Criteria::RecipesCompleted { min } => state.recipes_completed >= min,
            Criteria::PerfectTimers { min } => state.perfect_timers >= min,
            Criteria::CategoryCompleted { category, min } => state.category_count(category) >= min,
            Criteria::AdvancedRecipes { min } => state.advanced_recipes >= min,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Achievement {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub criteria: Criteria,
}

pub const ACHIEVEMENTS: &[Achievement] = &[
    Achievement {
        id: "first_dish",
        name: "First Dish!",
        description: "Complete your first recipe.",
        icon: "🥄",
        criteria: Criteria::RecipesCompleted { min: 1 },
    },
    Achievement {
        id: "steady_chef",
        name: "Steady Chef",
        description: "Complete 10 recipes.",
        icon: "🍳",
        criteria: Criteria::RecipesCompleted { min: 10 },
    },
    Achievement {
        id: "pro_chef",
        name: "Pro Chef",
        description: "Complete 20 recipes.",
        icon: "👨‍🍳",
        criteria: Criteria::RecipesCompleted { min: 20 },
    },
    Achievement {
        id: "perfect_timing_1",
        name: "Perfect Timing I",
        description: "Get 3 perfect timers.",
        icon: "⏱️",
        criteria: Criteria::PerfectTimers { min: 3 },
    },
    Achievement {
        id: "perfect_timing_2",
        name: "Perfect Timing II",
        description: "Get 10 perfect timers.",
        icon: "⏲️",
        criteria: Criteria::PerfectTimers { min: 10 },
    },
    Achievement {
        id: "pasta_lover",
        name: "Pasta Lover",
        description: "Complete 3 pasta recipes.",
        icon: "🍝",
        criteria: Criteria::CategoryCompleted {
            category: RecipeCategory::Pasta,
            min: 3,
        },
    },
    Achievement {
        id: "breakfast_champ",
        name: "Breakfast Champion",
        description: "Complete 3 breakfast recipes.",
        icon: "🥞",
        criteria: Criteria::CategoryCompleted {
            category: RecipeCategory::Breakfast,
            min: 3,
        },
    },
    Achievement {
        id: "dessert_fan",
        name: "Dessert Fan",
        description: "Complete 3 dessert recipes.",
        icon: "🍰",
        criteria: Criteria::CategoryCompleted {
            category: RecipeCategory::Dessert,
            min: 3,
        },
    },
    Achievement {
        id: "advanced_cook",
        name: "Advanced Chef",
        description: "Complete 5 advanced recipes.",
        icon: "🔥",
        criteria: Criteria::AdvancedRecipes { min: 5 },
    },
];

//! XP, rank and achievement progression
//!
//! A completed recipe is the only event that moves progression. The next
//! state is computed off to the side and swapped in whole, so observers and
//! storage never see a half-applied completion. A failed save is logged and
//! the in-memory state is kept.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::achievements::{ACHIEVEMENTS, Achievement};
use super::rank::{ChefRank, xp_to_next_rank};
use super::recipe::{Recipe, RecipeCategory};
use crate::persistence::{KeyValueStore, StoreError, load_json, save_json};

/// Bonus XP for finishing a timer within the perfect window
pub const PERFECT_TIMER_BONUS: u32 = 30;
/// Bonus XP for using a timer at all
pub const USED_TIMER_BONUS: u32 = 10;

/// Cumulative counters; every field only ever grows
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressionState {
    pub total_xp: u32,
    pub recipes_completed: u32,
    pub perfect_timers: u32,
    pub advanced_recipes: u32,
    pub category_counts: BTreeMap<RecipeCategory, u32>,
    pub unlocked: BTreeSet<String>,
}

impl ProgressionState {
    pub fn category_count(&self, category: RecipeCategory) -> u32 {
        self.category_counts.get(&category).copied().unwrap_or(0)
    }

    pub fn rank(&self) -> ChefRank {
        ChefRank::for_xp(self.total_xp)
    }

    pub fn xp_to_next_rank(&self) -> Option<u32> {
        xp_to_next_rank(self.total_xp)
    }

    pub fn is_unlocked(&self, id: &str) -> bool {
        self.unlocked.contains(id)
    }

    /// Unlocked achievements in catalog order
    pub fn unlocked_achievements(&self) -> Vec<&'static Achievement> {
        ACHIEVEMENTS
            .iter()
            .filter(|a| self.is_unlocked(a.id))
            .collect()
    }

    /// State after completing `recipe`, plus what changed
    pub fn after_completion(
        &self,
        recipe: &Recipe,
        used_timer: bool,
        perfect_timer: bool,
    ) -> (ProgressionState, CompletionOutcome) {
        let mut next = self.clone();

        next.recipes_completed = next.recipes_completed.saturating_add(1);
        if perfect_timer {
            next.perfect_timers = next.perfect_timers.saturating_add(1);
        }
        if recipe.difficulty.is_top_tier() {
            next.advanced_recipes = next.advanced_recipes.saturating_add(1);
        }
        let count = next.category_counts.entry(recipe.category).or_insert(0);
        *count = count.saturating_add(1);

        let xp = recipe_xp(recipe) + timer_bonus(used_timer, perfect_timer);
        next.total_xp = next.total_xp.saturating_add(xp);

        let newly_unlocked: Vec<&'static Achievement> = ACHIEVEMENTS
            .iter()
            .filter(|a| !next.is_unlocked(a.id) && a.criteria.is_met(&next))
            .collect();
        for achievement in &newly_unlocked {
            next.unlocked.insert(achievement.id.to_string());
        }

        let outcome = CompletionOutcome {
            recipe_id: recipe.id.clone(),
            xp_awarded: xp,
            total_xp: next.total_xp,
            previous_rank: self.rank(),
            rank: next.rank(),
            newly_unlocked,
        };
        (next, outcome)
    }
}

/// `floor(base_xp x difficulty multiplier)`
pub fn recipe_xp(recipe: &Recipe) -> u32 {
    (f64::from(recipe.base_xp) * recipe.difficulty.xp_multiplier()).floor() as u32
}

/// 30 for a perfect timer, 10 for a used one, 0 otherwise
pub fn timer_bonus(used_timer: bool, perfect_timer: bool) -> u32 {
    if perfect_timer {
        PERFECT_TIMER_BONUS
    } else if used_timer {
        USED_TIMER_BONUS
    } else {
        0
    }
}

/// Result of one completion event
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionOutcome {
    pub recipe_id: String,
    pub xp_awarded: u32,
    pub total_xp: u32,
    pub previous_rank: ChefRank,
    pub rank: ChefRank,
    pub newly_unlocked: Vec<&'static Achievement>,
}

impl CompletionOutcome {
    pub fn ranked_up(&self) -> bool {
        self.rank > self.previous_rank
    }
}

/// Gets told about every applied completion
pub trait ProgressionObserver {
    fn on_completion(&mut self, outcome: &CompletionOutcome, state: &ProgressionState);
}

impl<F> ProgressionObserver for F
where
    F: FnMut(&CompletionOutcome, &ProgressionState),
{
    fn on_completion(&mut self, outcome: &CompletionOutcome, state: &ProgressionState) {
        self(outcome, state)
    }
}

/// Progression state bound to its store and observers
pub struct Progression<S> {
    state: ProgressionState,
    store: S,
    observers: Vec<Box<dyn ProgressionObserver>>,
}

impl<S: KeyValueStore> Progression<S> {
    /// Storage key
    const STORAGE_KEY: &'static str = "progression";

    /// Load saved progression, starting fresh when missing or unreadable
    pub fn load(store: S) -> Self {
        let state = match load_json(&store, Self::STORAGE_KEY) {
            Ok(Some(state)) => {
                log::info!("Loaded progression");
                state
            }
            Ok(None) => {
                log::info!("No progression found, starting fresh");
                ProgressionState::default()
            }
            Err(e) => {
                log::warn!("Progression unreadable, starting fresh: {e}");
                ProgressionState::default()
            }
        };
        Self {
            state,
            store,
            observers: Vec::new(),
        }
    }

    pub fn state(&self) -> &ProgressionState {
        &self.state
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn subscribe(&mut self, observer: Box<dyn ProgressionObserver>) {
        self.observers.push(observer);
    }

    /// Apply a completed recipe, save, then notify observers
    pub fn notify_completion(
        &mut self,
        recipe: &Recipe,
        used_timer: bool,
        perfect_timer: bool,
    ) -> CompletionOutcome {
        let (next, outcome) = self.state.after_completion(recipe, used_timer, perfect_timer);
        self.state = next;

        log::info!(
            "Completed {}: +{} XP (total {}, {})",
            outcome.recipe_id,
            outcome.xp_awarded,
            outcome.total_xp,
            outcome.rank.display_name()
        );
        for achievement in &outcome.newly_unlocked {
            log::info!("Achievement unlocked: {}", achievement.name);
        }

        if let Err(e) = self.save() {
            log::error!("Failed to save progression: {e}");
        }

        for observer in &mut self.observers {
            observer.on_completion(&outcome, &self.state);
        }
        outcome
    }

    pub fn save(&mut self) -> Result<(), StoreError> {
        save_json(&mut self.store, Self::STORAGE_KEY, &self.state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cook::recipe::{DifficultyLevel, RecipeStep};
    use crate::persistence::MemoryStore;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recipe(category: RecipeCategory, difficulty: DifficultyLevel, base_xp: u32) -> Recipe {
        Recipe {
            id: format!("{category:?}-{difficulty:?}").to_lowercase(),
            name: "Test Dish".into(),
            image: "test".into(),
            category,
            difficulty,
            base_xp,
            steps: vec![RecipeStep {
                text: "Cook it.".into(),
                duration: Some(60),
            }],
        }
    }

    fn pancakes() -> Recipe {
        recipe(RecipeCategory::Breakfast, DifficultyLevel::Beginner, 80)
    }

    #[test]
    fn test_xp_for_beginner_then_perfect() {
        let mut progression = Progression::load(MemoryStore::new());

        let first = progression.notify_completion(&pancakes(), false, false);
        assert_eq!(first.xp_awarded, 80);
        assert_eq!(progression.state().total_xp, 80);

        let second = progression.notify_completion(&pancakes(), true, true);
        assert_eq!(second.xp_awarded, 110);
        assert_eq!(progression.state().total_xp, 190);
        assert_eq!(progression.state().perfect_timers, 1);
    }

    #[test]
    fn test_used_timer_bonus() {
        assert_eq!(timer_bonus(false, false), 0);
        assert_eq!(timer_bonus(true, false), 10);
        assert_eq!(timer_bonus(true, true), 30);
        assert_eq!(timer_bonus(false, true), 30);
    }

    #[test]
    fn test_recipe_xp_floors() {
        // 125 x 1.5 = 187.5
        let r = recipe(RecipeCategory::Beef, DifficultyLevel::Intermediate, 125);
        assert_eq!(recipe_xp(&r), 187);
        let cake = recipe(RecipeCategory::Dessert, DifficultyLevel::Advanced, 150);
        assert_eq!(recipe_xp(&cake), 300);
    }

    #[test]
    fn test_first_dish_unlocks_once() {
        let mut progression = Progression::load(MemoryStore::new());

        let first = progression.notify_completion(&pancakes(), false, false);
        let ids: Vec<&str> = first.newly_unlocked.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec!["first_dish"]);
        assert!(progression.state().is_unlocked("first_dish"));

        for _ in 0..5 {
            let outcome = progression.notify_completion(&pancakes(), false, false);
            assert!(outcome.newly_unlocked.iter().all(|a| a.id != "first_dish"));
        }
    }

    #[test]
    fn test_counters() {
        let mut progression = Progression::load(MemoryStore::new());
        let cake = recipe(RecipeCategory::Dessert, DifficultyLevel::Advanced, 150);

        progression.notify_completion(&cake, true, false);
        progression.notify_completion(&pancakes(), false, false);

        let state = progression.state();
        assert_eq!(state.recipes_completed, 2);
        assert_eq!(state.advanced_recipes, 1);
        assert_eq!(state.perfect_timers, 0);
        assert_eq!(state.category_count(RecipeCategory::Dessert), 1);
        assert_eq!(state.category_count(RecipeCategory::Breakfast), 1);
        assert_eq!(state.category_count(RecipeCategory::Pasta), 0);
        assert_eq!(state.total_xp, 310 + 80);
    }

    #[test]
    fn test_category_and_rank_unlocks() {
        let mut progression = Progression::load(MemoryStore::new());
        let cake = recipe(RecipeCategory::Dessert, DifficultyLevel::Advanced, 150);

        // 330 XP each with a perfect timer
        let a = progression.notify_completion(&cake, true, true);
        assert!(!a.ranked_up());
        let b = progression.notify_completion(&cake, true, true);
        assert!(b.ranked_up());
        assert_eq!(b.previous_rank, ChefRank::Apprentice);
        assert_eq!(b.rank, ChefRank::LineCook);

        let c = progression.notify_completion(&cake, true, true);
        let ids: Vec<&str> = c.newly_unlocked.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec!["perfect_timing_1", "dessert_fan"]);
        assert_eq!(progression.state().total_xp, 990);
        assert_eq!(progression.state().xp_to_next_rank(), Some(510));
    }

    #[test]
    fn test_state_survives_reload() {
        let mut progression = Progression::load(MemoryStore::new());
        progression.notify_completion(&pancakes(), true, false);
        let saved = progression.state().clone();

        let reloaded = Progression::load(progression.store().clone());
        assert_eq!(reloaded.state(), &saved);
        assert_eq!(reloaded.state().unlocked_achievements().len(), 1);
    }

    #[test]
    fn test_failed_save_keeps_memory_state() {
        let mut progression = Progression::load(MemoryStore::read_only());
        let outcome = progression.notify_completion(&pancakes(), false, false);
        assert_eq!(outcome.total_xp, 80);
        assert_eq!(progression.state().total_xp, 80);
        assert!(progression.store().is_empty());
    }

    #[test]
    fn test_corrupt_store_starts_fresh() {
        let mut store = MemoryStore::new();
        store.set("progression", "][").unwrap();
        let progression = Progression::load(store);
        assert_eq!(progression.state(), &ProgressionState::default());
    }

    #[test]
    fn test_observers_see_whole_update() {
        let seen: Rc<RefCell<Vec<(u32, u32, usize)>>> = Rc::default();
        let sink = Rc::clone(&seen);

        let mut progression = Progression::load(MemoryStore::new());
        progression.subscribe(Box::new(
            move |outcome: &CompletionOutcome, state: &ProgressionState| {
                sink.borrow_mut()
                    .push((outcome.total_xp, state.recipes_completed, state.unlocked.len()));
            },
        ));

        progression.notify_completion(&pancakes(), false, false);
        progression.notify_completion(&pancakes(), true, false);

        assert_eq!(*seen.borrow(), vec![(80, 1, 1), (170, 2, 1)]);
    }

    #[test]
    fn test_unlocks_are_never_revoked() {
        let mut state = ProgressionState::default();
        state.unlocked.insert("pro_chef".into());
        let (next, outcome) = state.after_completion(&pancakes(), false, false);
        assert!(next.is_unlocked("pro_chef"));
        assert!(outcome.newly_unlocked.iter().all(|a| a.id != "pro_chef"));
    }

    #[test]
    fn test_state_json_uses_category_names() {
        let (state, _) = ProgressionState::default().after_completion(&pancakes(), false, false);
        let json = serde_json::to_string(&state).unwrap();
        assert!(json.contains(r#""breakfast":1"#));
        let back: ProgressionState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
    }
}

//! Cook-along: recipes, guided sessions and progression
//!
//! - `recipe`: bundled recipe catalog
//! - `session`: step walker with the timer that decides used/perfect
//! - `progression`: XP, rank and achievement unlocks
//! - `history`: completed-recipe rows

pub mod achievements;
pub mod history;
pub mod progression;
pub mod rank;
pub mod recipe;
pub mod session;

pub use achievements::{ACHIEVEMENTS, Achievement, Criteria};
pub use history::{CompletedRecipe, CookHistory};
pub use progression::{CompletionOutcome, Progression, ProgressionObserver, ProgressionState};
pub use rank::ChefRank;
pub use recipe::{Catalog, DifficultyLevel, Recipe, RecipeCategory, RecipeStep};
pub use session::{Advance, CookSession, StepTimer};

use crate::persistence::KeyValueStore;

/// Store a finished recipe in the history and apply it to progression
///
/// A history write failure is logged and does not block the XP award.
pub fn record_completion<P, H>(
    progression: &mut Progression<P>,
    history: &mut CookHistory<H>,
    recipe: &Recipe,
    used_timer: bool,
    perfect_timer: bool,
    now_ms: f64,
) -> CompletionOutcome
where
    P: KeyValueStore,
    H: KeyValueStore,
{
    if let Err(e) = history.record(recipe, now_ms) {
        log::error!("Failed to save completed recipe {}: {e}", recipe.id);
    }
    progression.notify_completion(recipe, used_timer, perfect_timer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn test_session_to_progression() {
        let catalog = Catalog::bundled();
        let recipe = catalog.get("pancakes").unwrap();
        let mut progression = Progression::load(MemoryStore::new());
        let mut history = CookHistory::new(MemoryStore::new());

        let mut session = CookSession::new(recipe);
        let (used, perfect) = loop {
            match session.advance(0.0) {
                Advance::Completed {
                    used_timer,
                    perfect_timer,
                } => break (used_timer, perfect_timer),
                Advance::Step(_) => {}
                Advance::Idle => unreachable!(),
            }
        };

        let outcome =
            record_completion(&mut progression, &mut history, recipe, used, perfect, 42.0);
        assert_eq!(outcome.xp_awarded, 80);
        assert_eq!(history.times_completed("pancakes"), 1);
    }

    #[test]
    fn test_history_failure_still_awards_xp() {
        let catalog = Catalog::bundled();
        let recipe = catalog.get("pancakes").unwrap();
        let mut progression = Progression::load(MemoryStore::new());
        let mut history = CookHistory::new(MemoryStore::read_only());

        let outcome =
            record_completion(&mut progression, &mut history, recipe, true, false, 1.0);
        assert_eq!(outcome.xp_awarded, 90);
        assert!(history.list().is_empty());
    }
}

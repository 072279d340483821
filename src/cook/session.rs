//! Guided walk through one recipe
//!
//! The session decides the two flags the progression engine cares about:
//! whether a timer was started at all, and whether any step was advanced
//! right after its timer ran out. Time is passed in (ms since the epoch) so
//! the whole thing is deterministic under test.

use super::recipe::{Recipe, RecipeStep};

/// Advancing within this many ms after a timer's end counts as perfect
pub const PERFECT_WINDOW_MS: f64 = 3000.0;

pub const FIRST_STEP_PREFIX: &str = "Let's start cooking. ";
pub const NEXT_STEP_PREFIX: &str = "Next step. ";
pub const CONGRATULATIONS: &str = "Congratulations! You have finished the recipe.";

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum StepTimer {
    #[default]
    Idle,
    Running { end_ms: f64 },
    Finished { end_ms: f64 },
}

impl StepTimer {
    pub fn start(duration_secs: u32, now_ms: f64) -> Self {
        StepTimer::Running {
            end_ms: now_ms + f64::from(duration_secs) * 1000.0,
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self, StepTimer::Running { .. })
    }

    pub fn is_finished(&self) -> bool {
        matches!(self, StepTimer::Finished { .. })
    }

    /// Update against the clock; returns the remaining whole seconds
    pub fn tick(&mut self, now_ms: f64) -> Option<i64> {
        let StepTimer::Running { end_ms } = *self else {
            return self.is_finished().then_some(0);
        };
        let remaining = ((end_ms - now_ms) / 1000.0).round() as i64;
        if remaining <= 0 {
            *self = StepTimer::Finished { end_ms };
            Some(0)
        } else {
            Some(remaining)
        }
    }

    /// Finished, and `now_ms` falls within the window after the end
    pub fn is_perfect(&self, now_ms: f64) -> bool {
        match *self {
            StepTimer::Finished { end_ms } => {
                let late = now_ms - end_ms;
                (0.0..=PERFECT_WINDOW_MS).contains(&late)
            }
            _ => false,
        }
    }
}

/// What advancing did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Moved to the step at this index
    Step(usize),
    /// Left the last step; hand these flags to the progression engine
    Completed { used_timer: bool, perfect_timer: bool },
    /// Already completed
    Idle,
}

#[derive(Debug, Clone)]
pub struct CookSession<'a> {
    recipe: &'a Recipe,
    index: usize,
    timer: StepTimer,
    used_timer: bool,
    perfect_timer: bool,
    completed: bool,
}

impl<'a> CookSession<'a> {
    pub fn new(recipe: &'a Recipe) -> Self {
        Self {
            recipe,
            index: 0,
            timer: StepTimer::Idle,
            used_timer: false,
            perfect_timer: false,
            completed: false,
        }
    }

    pub fn recipe(&self) -> &'a Recipe {
        self.recipe
    }

    pub fn step_index(&self) -> usize {
        self.index
    }

    pub fn current_step(&self) -> Option<&'a RecipeStep> {
        self.recipe.steps.get(self.index)
    }

    pub fn is_last_step(&self) -> bool {
        self.index + 1 >= self.recipe.steps.len()
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn timer(&self) -> StepTimer {
        self.timer
    }

    pub fn used_timer(&self) -> bool {
        self.used_timer
    }

    pub fn perfect_timer(&self) -> bool {
        self.perfect_timer
    }

    /// Fraction of steps reached, current step included
    pub fn progress(&self) -> f64 {
        let total = self.recipe.steps.len();
        if total == 0 {
            return 0.0;
        }
        (self.index + 1).min(total) as f64 / total as f64
    }

    /// Start the current step's timer; false when the step has none or a
    /// timer is already going
    pub fn start_timer(&mut self, now_ms: f64) -> bool {
        if self.completed || self.timer != StepTimer::Idle {
            return false;
        }
        let Some(duration) = self.current_step().and_then(|s| s.duration) else {
            return false;
        };
        self.timer = StepTimer::start(duration, now_ms);
        self.used_timer = true;
        log::debug!("Timer started: {duration}s on step {}", self.index + 1);
        true
    }

    pub fn cancel_timer(&mut self) {
        self.timer = StepTimer::Idle;
    }

    pub fn tick(&mut self, now_ms: f64) -> Option<i64> {
        self.timer.tick(now_ms)
    }

    /// Next step, or complete the recipe from the last one
    pub fn advance(&mut self, now_ms: f64) -> Advance {
        if self.completed {
            return Advance::Idle;
        }
        if self.timer.is_perfect(now_ms) {
            log::debug!("Perfect timer on step {}", self.index + 1);
            self.perfect_timer = true;
        }
        self.timer = StepTimer::Idle;

        if self.is_last_step() {
            self.completed = true;
            Advance::Completed {
                used_timer: self.used_timer,
                perfect_timer: self.perfect_timer,
            }
        } else {
            self.index += 1;
            Advance::Step(self.index)
        }
    }

    /// Back one step; false on the first step
    pub fn previous(&mut self) -> bool {
        if self.completed || self.index == 0 {
            return false;
        }
        self.index -= 1;
        self.timer = StepTimer::Idle;
        true
    }

    /// Back to the first step with both flags cleared
    pub fn restart(&mut self) {
        *self = Self::new(self.recipe);
    }

    /// Line to speak for the current step
    pub fn narration(&self, first: bool) -> Option<String> {
        let prefix = if first {
            FIRST_STEP_PREFIX
        } else {
            NEXT_STEP_PREFIX
        };
        self.current_step().map(|step| format!("{prefix}{}", step.text))
    }
}

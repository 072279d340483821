//! Collision scoring
//!
//! Physics only tells us *that* two bodies touched; this module decides what
//! the touch means. Every body carries a category bit. A contact is
//! classified by OR-ing the two bits, which makes the rule table symmetric
//! (`a x b == b x a`) and means two bodies of the same category never match.

use std::ops::BitOr;

use serde::{Deserialize, Serialize};

/// Entity role used for collision-rule lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Player,
    Obstacle,
    Ground,
    Coin,
    Projectile,
    Enemy,
    Boss,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Player,
        Category::Obstacle,
        Category::Ground,
        Category::Coin,
        Category::Projectile,
        Category::Enemy,
        Category::Boss,
    ];

    /// Category bit
    pub const fn bit(self) -> u32 {
        match self {
            Category::Player => 1 << 0,
            Category::Obstacle => 1 << 1,
            Category::Ground => 1 << 2,
            Category::Coin => 1 << 3,
            Category::Projectile => 1 << 4,
            Category::Enemy => 1 << 5,
            Category::Boss => 1 << 6,
        }
    }
}

/// A set of categories packed into a bitmask
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct CategoryMask(u32);

impl CategoryMask {
    pub const EMPTY: CategoryMask = CategoryMask(0);

    pub const fn of(category: Category) -> Self {
        CategoryMask(category.bit())
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn contains(self, category: Category) -> bool {
        self.0 & category.bit() != 0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn insert(&mut self, category: Category) {
        self.0 |= category.bit();
    }
}

impl From<Category> for CategoryMask {
    fn from(category: Category) -> Self {
        CategoryMask::of(category)
    }
}

impl BitOr for Category {
    type Output = CategoryMask;

    fn bitor(self, rhs: Category) -> CategoryMask {
        CategoryMask(self.bit() | rhs.bit())
    }
}

impl BitOr<Category> for CategoryMask {
    type Output = CategoryMask;

    fn bitor(self, rhs: Category) -> CategoryMask {
        CategoryMask(self.0 | rhs.bit())
    }
}

/// A contact pair that has a rule attached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Contact {
    PlayerObstacle,
    PlayerEnemy,
    PlayerBoss,
    ProjectileObstacle,
    ProjectileEnemy,
    ProjectileBoss,
}

impl Contact {
    /// Classify an unordered category pair, `None` for pairs with no rule
    pub fn classify(a: Category, b: Category) -> Option<Contact> {
        use Category::*;

        let mask = (a | b).bits();
        let is = |x: Category, y: Category| mask == (x | y).bits();

        if is(Player, Obstacle) {
            Some(Contact::PlayerObstacle)
        } else if is(Player, Enemy) {
            Some(Contact::PlayerEnemy)
        } else if is(Player, Boss) {
            Some(Contact::PlayerBoss)
        } else if is(Projectile, Obstacle) {
            Some(Contact::ProjectileObstacle)
        } else if is(Projectile, Enemy) {
            Some(Contact::ProjectileEnemy)
        } else if is(Projectile, Boss) {
            Some(Contact::ProjectileBoss)
        } else {
            None
        }
    }
}

/// Points for a projectile destroying an obstacle
pub const OBSTACLE_KILL_SCORE: u32 = 1;
/// Points for a projectile destroying an enemy
pub const ENEMY_KILL_SCORE: u32 = 2;
/// Bonus for the hit that brings boss health to zero
pub const BOSS_KILL_SCORE: u32 = 10;

/// Player health lost per contact
pub const OBSTACLE_DAMAGE: i32 = 1;
pub const ENEMY_DAMAGE: i32 = 1;
pub const BOSS_DAMAGE: i32 = 2;

/// What a single contact does to the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CollisionEffect {
    /// Points gained
    pub score_delta: u32,
    /// Player health change (never positive)
    pub health_delta: i32,
    /// Boss health change (never positive)
    pub boss_health_delta: i32,
    /// Categories of the two bodies that leave the scene
    pub removed: CategoryMask,
}

impl CollisionEffect {
    pub const NONE: CollisionEffect = CollisionEffect {
        score_delta: 0,
        health_delta: 0,
        boss_health_delta: 0,
        removed: CategoryMask::EMPTY,
    };

    pub fn is_none(&self) -> bool {
        *self == Self::NONE
    }
}

/// Score a contact between two categories
///
/// `boss_health` is the boss health *before* this contact. A projectile that
/// touches a boss with no health left is treated as an unmatched pair.
pub fn score_collision(a: Category, b: Category, boss_health: u32) -> CollisionEffect {
    let Some(contact) = Contact::classify(a, b) else {
        return CollisionEffect::NONE;
    };

    match contact {
        Contact::PlayerObstacle => CollisionEffect {
            health_delta: -OBSTACLE_DAMAGE,
            ..CollisionEffect::NONE
        },
        Contact::PlayerEnemy => CollisionEffect {
            health_delta: -ENEMY_DAMAGE,
            ..CollisionEffect::NONE
        },
        Contact::PlayerBoss => CollisionEffect {
            health_delta: -BOSS_DAMAGE,
            ..CollisionEffect::NONE
        },
        Contact::ProjectileObstacle => CollisionEffect {
            score_delta: OBSTACLE_KILL_SCORE,
            removed: Category::Projectile | Category::Obstacle,
            ..CollisionEffect::NONE
        },
        Contact::ProjectileEnemy => CollisionEffect {
            score_delta: ENEMY_KILL_SCORE,
            removed: Category::Projectile | Category::Enemy,
            ..CollisionEffect::NONE
        },
        Contact::ProjectileBoss => {
            if boss_health == 0 {
                return CollisionEffect::NONE;
            }
            if boss_health == 1 {
                CollisionEffect {
                    score_delta: BOSS_KILL_SCORE,
                    boss_health_delta: -1,
                    removed: Category::Projectile | Category::Boss,
                    ..CollisionEffect::NONE
                }
            } else {
                CollisionEffect {
                    boss_health_delta: -1,
                    removed: CategoryMask::of(Category::Projectile),
                    ..CollisionEffect::NONE
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_player_damage_table() {
        assert_eq!(
            score_collision(Category::Player, Category::Obstacle, 10).health_delta,
            -1
        );
        assert_eq!(
            score_collision(Category::Player, Category::Enemy, 10).health_delta,
            -1
        );
        let boss = score_collision(Category::Player, Category::Boss, 10);
        assert_eq!(boss.health_delta, -2);
        assert_eq!(boss.score_delta, 0);
        assert!(boss.removed.is_empty());
    }

    #[test]
    fn test_projectile_kills() {
        let e = score_collision(Category::Projectile, Category::Obstacle, 10);
        assert_eq!(e.score_delta, 1);
        assert!(e.removed.contains(Category::Projectile));
        assert!(e.removed.contains(Category::Obstacle));

        let e = score_collision(Category::Enemy, Category::Projectile, 10);
        assert_eq!(e.score_delta, 2);
        assert!(e.removed.contains(Category::Projectile));
        assert!(e.removed.contains(Category::Enemy));
        assert_eq!(e.health_delta, 0);
    }

    #[test]
    fn test_boss_takes_ten_hits() {
        let mut boss_health = 10u32;
        let mut score = 0u32;
        let mut boss_removed = false;

        for hit in 1..=10 {
            let e = score_collision(Category::Projectile, Category::Boss, boss_health);
            assert_eq!(e.boss_health_delta, -1);
            assert!(e.removed.contains(Category::Projectile));
            boss_health = boss_health.saturating_sub(1);
            score += e.score_delta;

            if hit < 10 {
                assert_eq!(e.score_delta, 0, "hit {hit} should not score");
                assert!(!e.removed.contains(Category::Boss));
            } else {
                boss_removed = e.removed.contains(Category::Boss);
            }
        }

        assert_eq!(boss_health, 0);
        assert_eq!(score, 10);
        assert!(boss_removed);

        // Boss is gone; further hits do nothing
        assert!(score_collision(Category::Projectile, Category::Boss, 0).is_none());
    }

    #[test]
    fn test_unmatched_pairs() {
        assert!(score_collision(Category::Player, Category::Coin, 10).is_none());
        assert!(score_collision(Category::Player, Category::Ground, 10).is_none());
        assert!(score_collision(Category::Player, Category::Player, 10).is_none());
        assert!(score_collision(Category::Projectile, Category::Projectile, 10).is_none());
        assert!(score_collision(Category::Obstacle, Category::Enemy, 10).is_none());
        assert!(score_collision(Category::Projectile, Category::Player, 10).is_none());
    }

    #[test]
    fn test_mask_ops() {
        let mut mask = CategoryMask::EMPTY;
        assert!(mask.is_empty());
        mask.insert(Category::Boss);
        assert!(mask.contains(Category::Boss));
        assert!(!mask.contains(Category::Player));
        let mask = mask | Category::Player;
        assert_eq!(mask.bits(), 0b100_0001);
    }

    fn any_category() -> impl Strategy<Value = Category> {
        (0..Category::ALL.len()).prop_map(|i| Category::ALL[i])
    }

    proptest! {
        #[test]
        fn prop_rules_are_symmetric(a in any_category(), b in any_category(), hp in 0u32..12) {
            prop_assert_eq!(score_collision(a, b, hp), score_collision(b, a, hp));
        }
    }
}

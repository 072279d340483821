//! Chef ranks derived from total XP

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ChefRank {
    Apprentice,
    LineCook,
    SousChef,
    HeadChef,
    MasterChef,
    Legendary,
}

impl ChefRank {
    /// Ranks in ascending order
    pub const ALL: [ChefRank; 6] = [
        ChefRank::Apprentice,
        ChefRank::LineCook,
        ChefRank::SousChef,
        ChefRank::HeadChef,
        ChefRank::MasterChef,
        ChefRank::Legendary,
    ];

    pub fn for_xp(xp: u32) -> Self {
        match xp {
            0..500 => ChefRank::Apprentice,
            500..1500 => ChefRank::LineCook,
            1500..3000 => ChefRank::SousChef,
            3000..6000 => ChefRank::HeadChef,
            6000..10000 => ChefRank::MasterChef,
            _ => ChefRank::Legendary,
        }
    }

    /// XP at which the next rank starts; `None` at the top
    pub fn next_threshold(&self) -> Option<u32> {
        match self {
            ChefRank::Apprentice => Some(500),
            ChefRank::LineCook => Some(1500),
            ChefRank::SousChef => Some(3000),
            ChefRank::HeadChef => Some(6000),
            ChefRank::MasterChef => Some(10000),
            ChefRank::Legendary => None,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ChefRank::Apprentice => "Apprentice",
            ChefRank::LineCook => "Line Cook",
            ChefRank::SousChef => "Sous Chef",
            ChefRank::HeadChef => "Head Chef",
            ChefRank::MasterChef => "Master Chef",
            ChefRank::Legendary => "Legendary Chef",
        }
    }
}

/// XP still needed for the next rank; `None` at the top rank
pub fn xp_to_next_rank(total_xp: u32) -> Option<u32> {
    ChefRank::for_xp(total_xp)
        .next_threshold()
        .map(|next| next.saturating_sub(total_xp))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundaries() {
        assert_eq!(ChefRank::for_xp(0), ChefRank::Apprentice);
        assert_eq!(ChefRank::for_xp(499), ChefRank::Apprentice);
        assert_eq!(ChefRank::for_xp(500), ChefRank::LineCook);
        assert_eq!(ChefRank::for_xp(1499), ChefRank::LineCook);
        assert_eq!(ChefRank::for_xp(1500), ChefRank::SousChef);
        assert_eq!(ChefRank::for_xp(3000), ChefRank::HeadChef);
        assert_eq!(ChefRank::for_xp(6000), ChefRank::MasterChef);
        assert_eq!(ChefRank::for_xp(9999), ChefRank::MasterChef);
        assert_eq!(ChefRank::for_xp(10000), ChefRank::Legendary);
        assert_eq!(ChefRank::for_xp(u32::MAX), ChefRank::Legendary);
    }

    #[test]
    fn test_top_rank_has_no_next() {
        assert_eq!(ChefRank::Legendary.next_threshold(), None);
        assert_eq!(xp_to_next_rank(10000), None);
    }

    #[test]
    fn test_xp_to_next() {
        assert_eq!(xp_to_next_rank(0), Some(500));
        assert_eq!(xp_to_next_rank(499), Some(1));
        assert_eq!(xp_to_next_rank(500), Some(1000));
    }

    #[test]
    fn test_thresholds_are_ordered() {
        for pair in ChefRank::ALL.windows(2) {
            let threshold = pair[0].next_threshold().unwrap();
            assert_eq!(ChefRank::for_xp(threshold), pair[1]);
            assert_eq!(ChefRank::for_xp(threshold - 1), pair[0]);
            assert!(pair[0] < pair[1]);
        }
    }
}

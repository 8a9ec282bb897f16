//! Game rules: modes, difficulty tiers, board dealing, matching, timers

pub mod matcher;
pub mod pool;
pub mod timer;

use crate::words::Level;
use rand::prelude::*;
use std::time::Duration;

/// Rounds played at each difficulty before moving to the next tier
pub const TOTAL_ROUNDS_PER_LEVEL: u32 = 3;

/// Words on screen in Zen and category practice
pub const PRACTICE_WORDS_ON_SCREEN: usize = 5;

/// How long a correct pair stays highlighted before it is replaced
pub const MATCH_FEEDBACK_DELAY: Duration = Duration::from_millis(300);

/// How long a wrong pair stays highlighted before selections clear
pub const MISMATCH_FEEDBACK_DELAY: Duration = Duration::from_millis(500);

/// Seconds removed from the clock for a wrong pair in Timed mode
pub const MISMATCH_PENALTY_SECS: u32 = 1;

/// How a session is played. Fixed for the session's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameMode {
    /// Against the clock, through rounds and difficulty tiers
    Timed,
    /// Free practice over every word, no clock
    Zen,
    /// Free practice over a single category
    Categorized,
}

impl GameMode {
    pub fn is_timed(self) -> bool {
        self == GameMode::Timed
    }
}

/// Settings for one difficulty tier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tier {
    pub timer_seconds: u32,
    pub words_on_screen: usize,
    pub matches_per_round: u32,
    pub points_per_match: u32,
}

/// Timed-mode difficulty, ordered Easy < Medium < Hard
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    #[cfg(test)]
    /// All tiers in progression order
    pub fn all() -> &'static [Difficulty] {
        &[Difficulty::Easy, Difficulty::Medium, Difficulty::Hard]
    }

    pub fn tier(self) -> Tier {
        match self {
            Difficulty::Easy => Tier {
                timer_seconds: 90,
                words_on_screen: 4,
                matches_per_round: 8,
                points_per_match: 10,
            },
            Difficulty::Medium => Tier {
                timer_seconds: 90,
                words_on_screen: 5,
                matches_per_round: 12,
                points_per_match: 15,
            },
            Difficulty::Hard => Tier {
                timer_seconds: 120,
                words_on_screen: 6,
                matches_per_round: 16,
                points_per_match: 20,
            },
        }
    }

    /// The tier after this one, if any
    pub fn next(self) -> Option<Difficulty> {
        match self {
            Difficulty::Easy => Some(Difficulty::Medium),
            Difficulty::Medium => Some(Difficulty::Hard),
            Difficulty::Hard => None,
        }
    }

    /// Word level drawn at this difficulty
    pub fn level(self) -> Level {
        match self {
            Difficulty::Easy => Level::One,
            Difficulty::Medium => Level::Two,
            Difficulty::Hard => Level::Three,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

    /// Arabic display name
    pub fn arabic_name(self) -> &'static str {
        match self {
            Difficulty::Easy => "سهل",
            Difficulty::Medium => "متوسط",
            Difficulty::Hard => "صعب",
        }
    }
}

/// Uniform random permutation (Fisher-Yates) of a copy of `items`
pub fn shuffled<T: Clone, R: Rng + ?Sized>(items: &[T], rng: &mut R) -> Vec<T> {
    let mut out = items.to_vec();
    out.shuffle(rng);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_tier_table() {
        let easy = Difficulty::Easy.tier();
        assert_eq!(easy.timer_seconds, 90);
        assert_eq!(easy.words_on_screen, 4);
        assert_eq!(easy.matches_per_round, 8);
        assert_eq!(easy.points_per_match, 10);

        assert_eq!(Difficulty::Medium.tier().points_per_match, 15);
        assert_eq!(Difficulty::Hard.tier().timer_seconds, 120);
        assert_eq!(Difficulty::Hard.tier().words_on_screen, 6);
    }

    #[test]
    fn test_difficulty_progression() {
        assert!(Difficulty::Easy < Difficulty::Medium);
        assert!(Difficulty::Medium < Difficulty::Hard);
        assert_eq!(Difficulty::Easy.next(), Some(Difficulty::Medium));
        assert_eq!(Difficulty::Medium.next(), Some(Difficulty::Hard));
        assert_eq!(Difficulty::Hard.next(), None);
        assert_eq!(Difficulty::all().len(), 3);
    }

    #[test]
    fn test_difficulty_levels() {
        assert_eq!(Difficulty::Easy.level(), Level::One);
        assert_eq!(Difficulty::Hard.level(), Level::Three);
        assert_eq!(Difficulty::Medium.arabic_name(), "متوسط");
    }

    #[test]
    fn test_shuffled_is_permutation() {
        let mut rng = StdRng::seed_from_u64(7);
        let items: Vec<u32> = (0..20).collect();
        let mut out = shuffled(&items, &mut rng);
        assert_eq!(out.len(), items.len());
        out.sort();
        assert_eq!(out, items);
    }

    #[test]
    fn test_shuffled_seeded_is_deterministic() {
        let items: Vec<u32> = (0..20).collect();
        let a = shuffled(&items, &mut StdRng::seed_from_u64(42));
        let b = shuffled(&items, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }
}

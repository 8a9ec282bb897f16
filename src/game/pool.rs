//! Board dealing and replenishment
//!
//! Deals the two on-screen columns from the active pool and swaps in a
//! fresh word each time a pair is matched. Recently shown words are kept in
//! an exclusion set so they do not come straight back. When a pool runs dry
//! only that pool's ids are released; exclusions from other pools stay.

use super::shuffled;
use crate::words::WordPair;
use rand::prelude::*;
use std::collections::HashSet;

/// One of the two on-screen columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    /// Arabic column
    Source,
    /// English column
    Target,
}

impl Column {
    pub fn opposite(self) -> Column {
        match self {
            Column::Source => Column::Target,
            Column::Target => Column::Source,
        }
    }
}

/// Ids withheld from sampling
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionSet {
    ids: HashSet<u32>,
}

impl ExclusionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: u32) -> bool {
        self.ids.contains(&id)
    }

    pub fn insert(&mut self, id: u32) {
        self.ids.insert(id);
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Evict every id belonging to `pool`, keeping ids from other pools
    pub fn release(&mut self, pool: &[WordPair]) {
        let pool_ids: HashSet<u32> = pool.iter().map(|w| w.id).collect();
        self.ids.retain(|id| !pool_ids.contains(id));
    }

    #[cfg(test)]
    /// Number of `pool` words currently excluded
    pub fn count_in(&self, pool: &[WordPair]) -> usize {
        pool.iter().filter(|w| self.contains(w.id)).count()
    }
}

/// The two visible columns. Both always hold the same ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Board {
    pub source: Vec<WordPair>,
    pub target: Vec<WordPair>,
}

impl Board {
    pub fn column(&self, column: Column) -> &[WordPair] {
        match column {
            Column::Source => &self.source,
            Column::Target => &self.target,
        }
    }

    pub fn len(&self) -> usize {
        self.source.len()
    }

    pub fn is_empty(&self) -> bool {
        self.source.is_empty()
    }

    pub fn contains(&self, id: u32) -> bool {
        self.source.iter().any(|w| w.id == id)
    }

    /// Ids on the board, in source-column order
    pub fn ids(&self) -> Vec<u32> {
        self.source.iter().map(|w| w.id).collect()
    }
}

/// Owns the exclusion set and the column-alternation state for a session
#[derive(Debug, Clone)]
pub struct PoolManager {
    excluded: ExclusionSet,
    last_shuffled: Column,
}

impl Default for PoolManager {
    fn default() -> Self {
        Self::new()
    }
}

impl PoolManager {
    /// Fresh manager. The first replacement reshuffles the source column.
    pub fn new() -> Self {
        Self {
            excluded: ExclusionSet::new(),
            last_shuffled: Column::Target,
        }
    }

    #[cfg(test)]
    pub fn excluded(&self) -> &ExclusionSet {
        &self.excluded
    }

    #[cfg(test)]
    /// Column reshuffled by the most recent replacement
    pub fn last_shuffled(&self) -> Column {
        self.last_shuffled
    }

    /// Deal a new board of up to `screen_size` words from `pool`.
    ///
    /// If fewer than `screen_size` unexcluded words remain, the pool's ids
    /// are released and the whole pool is used. A pool smaller than
    /// `screen_size` gives a smaller board.
    pub fn initialize_round<R: Rng + ?Sized>(
        &mut self,
        pool: &[WordPair],
        screen_size: usize,
        rng: &mut R,
    ) -> Board {
        let mut available: Vec<WordPair> = pool
            .iter()
            .filter(|w| !self.excluded.contains(w.id))
            .cloned()
            .collect();

        if available.len() < screen_size {
            tracing::debug!(
                available = available.len(),
                screen_size,
                pool = pool.len(),
                "word pool exhausted, releasing pool exclusions"
            );
            self.excluded.release(pool);
            available = pool.to_vec();
        }

        available.shuffle(rng);
        available.truncate(screen_size);

        for word in &available {
            self.excluded.insert(word.id);
        }

        Board {
            source: shuffled(&available, rng),
            target: shuffled(&available, rng),
        }
    }

    /// Replace the matched word in both columns with a fresh one.
    ///
    /// Reshuffles only the column opposite to the one reshuffled last time.
    /// Returns the new word, or `None` if the pool has nothing left to offer,
    /// in which case the board is untouched.
    pub fn replace_matched<R: Rng + ?Sized>(
        &mut self,
        board: &mut Board,
        matched_id: u32,
        pool: &[WordPair],
        rng: &mut R,
    ) -> Option<WordPair> {
        let mut candidates = self.candidates(board, matched_id, pool);

        if candidates.is_empty() {
            tracing::debug!(pool = pool.len(), "replacement pool exhausted, releasing pool exclusions");
            self.excluded.release(pool);
            // words still on screen count as shown
            for id in board.ids() {
                self.excluded.insert(id);
            }
            candidates = self.candidates(board, matched_id, pool);
        }

        let fresh = candidates.choose(rng).cloned()?;
        self.excluded.insert(fresh.id);

        let column = self.last_shuffled.opposite();
        self.last_shuffled = column;

        for side in [&mut board.source, &mut board.target] {
            for slot in side.iter_mut().filter(|w| w.id == matched_id) {
                *slot = fresh.clone();
            }
        }

        match column {
            Column::Source => board.source.shuffle(rng),
            Column::Target => board.target.shuffle(rng),
        }

        Some(fresh)
    }

    fn candidates(&self, board: &Board, matched_id: u32, pool: &[WordPair]) -> Vec<WordPair> {
        pool.iter()
            .filter(|w| w.id != matched_id && !self.excluded.contains(w.id) && !board.contains(w.id))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::words::Level;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn make_pool(start: u32, count: u32) -> Vec<WordPair> {
        (start..start + count)
            .map(|id| WordPair {
                id,
                source_text: format!("ar{}", id),
                target_text: format!("en{}", id),
                level: Level::One,
            })
            .collect()
    }

    fn sorted_ids(words: &[WordPair]) -> Vec<u32> {
        let mut ids: Vec<u32> = words.iter().map(|w| w.id).collect();
        ids.sort();
        ids
    }

    fn assert_board_consistent(board: &Board) {
        let source = sorted_ids(&board.source);
        let target = sorted_ids(&board.target);
        assert_eq!(source, target, "columns hold different ids");
        let mut dedup = source.clone();
        dedup.dedup();
        assert_eq!(dedup, source, "duplicate id in a column");
    }

    #[test]
    fn test_initialize_round_fills_board() {
        let mut rng = StdRng::seed_from_u64(1);
        let pool = make_pool(1, 20);
        let mut manager = PoolManager::new();

        let board = manager.initialize_round(&pool, 4, &mut rng);
        assert_eq!(board.len(), 4);
        assert_board_consistent(&board);
        assert_eq!(manager.excluded().len(), 4);
        for id in board.ids() {
            assert!(manager.excluded().contains(id));
        }
    }

    #[test]
    fn test_small_pool_gives_small_board() {
        let mut rng = StdRng::seed_from_u64(2);
        let pool = make_pool(1, 3);
        let mut manager = PoolManager::new();

        let board = manager.initialize_round(&pool, 6, &mut rng);
        assert_eq!(board.len(), 3);
        assert_board_consistent(&board);
    }

    #[test]
    fn test_empty_pool_gives_empty_board() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut manager = PoolManager::new();
        let board = manager.initialize_round(&[], 4, &mut rng);
        assert!(board.is_empty());
    }

    #[test]
    fn test_exhaustion_releases_only_active_pool() {
        let mut rng = StdRng::seed_from_u64(4);
        let easy = make_pool(1, 6);
        let other = make_pool(100, 6);
        let mut manager = PoolManager::new();

        manager.initialize_round(&other, 4, &mut rng);
        manager.initialize_round(&easy, 4, &mut rng);
        assert_eq!(manager.excluded().count_in(&other), 4);
        assert_eq!(manager.excluded().count_in(&easy), 4);

        // only 2 easy words left unexcluded, board needs 4
        let board = manager.initialize_round(&easy, 4, &mut rng);
        assert_eq!(board.len(), 4);
        assert_eq!(manager.excluded().count_in(&easy), 4);
        assert_eq!(manager.excluded().count_in(&other), 4);
    }

    #[test]
    fn test_replace_keeps_columns_in_sync() {
        let mut rng = StdRng::seed_from_u64(5);
        let pool = make_pool(1, 30);
        let mut manager = PoolManager::new();
        let mut board = manager.initialize_round(&pool, 5, &mut rng);

        for _ in 0..100 {
            let matched = board.source[0].id;
            let fresh = manager.replace_matched(&mut board, matched, &pool, &mut rng).unwrap();
            assert_ne!(fresh.id, matched);
            assert!(!board.contains(matched));
            assert!(board.contains(fresh.id));
            assert_eq!(board.len(), 5);
            assert_board_consistent(&board);
        }
    }

    #[test]
    fn test_replace_alternates_reshuffled_column() {
        let mut rng = StdRng::seed_from_u64(6);
        let pool = make_pool(1, 30);
        let mut manager = PoolManager::new();
        let mut board = manager.initialize_round(&pool, 5, &mut rng);

        let mut expected = Column::Source;
        for _ in 0..6 {
            let matched = board.source[0].id;
            manager.replace_matched(&mut board, matched, &pool, &mut rng).unwrap();
            assert_eq!(manager.last_shuffled(), expected);
            expected = expected.opposite();
        }
    }

    #[test]
    fn test_unshuffled_source_only_substitutes() {
        let mut rng = StdRng::seed_from_u64(12);
        let pool = make_pool(1, 30);
        let mut manager = PoolManager::new();
        let mut board = manager.initialize_round(&pool, 5, &mut rng);

        // first replacement reshuffles Source, the second reshuffles Target
        let matched = board.source[0].id;
        manager.replace_matched(&mut board, matched, &pool, &mut rng).unwrap();

        let source_before: Vec<u32> = board.source.iter().map(|w| w.id).collect();
        let matched = board.source[2].id;
        let fresh = manager.replace_matched(&mut board, matched, &pool, &mut rng).unwrap();

        let expected: Vec<u32> = source_before
            .iter()
            .map(|&id| if id == matched { fresh.id } else { id })
            .collect();
        let actual: Vec<u32> = board.source.iter().map(|w| w.id).collect();
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_unshuffled_column_only_substitutes() {
        let mut rng = StdRng::seed_from_u64(9);
        let pool = make_pool(1, 30);
        let mut manager = PoolManager::new();
        let mut board = manager.initialize_round(&pool, 5, &mut rng);

        // first replacement reshuffles Source, so Target keeps its order
        let target_before: Vec<u32> = board.target.iter().map(|w| w.id).collect();
        let matched = board.target[3].id;
        let fresh = manager.replace_matched(&mut board, matched, &pool, &mut rng).unwrap();

        let expected: Vec<u32> = target_before
            .iter()
            .map(|&id| if id == matched { fresh.id } else { id })
            .collect();
        let actual: Vec<u32> = board.target.iter().map(|w| w.id).collect();
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_no_immediate_repeat() {
        let mut rng = StdRng::seed_from_u64(7);
        let pool = make_pool(1, 12);
        let mut manager = PoolManager::new();
        let mut board = manager.initialize_round(&pool, 4, &mut rng);

        // every word in the pool shows up once before any removed word returns
        let mut shown: HashSet<u32> = board.ids().into_iter().collect();
        let mut removed: HashSet<u32> = HashSet::new();
        for _ in 0..8 {
            let matched = board.source[0].id;
            removed.insert(matched);
            let fresh = manager.replace_matched(&mut board, matched, &pool, &mut rng).unwrap();
            assert!(!removed.contains(&fresh.id), "word {} came back early", fresh.id);
            assert!(shown.insert(fresh.id));
        }
        assert_eq!(shown.len(), 12);
    }

    #[test]
    fn test_replace_after_exhaustion_avoids_board_words() {
        let mut rng = StdRng::seed_from_u64(8);
        let pool = make_pool(1, 6);
        let mut manager = PoolManager::new();
        let mut board = manager.initialize_round(&pool, 4, &mut rng);

        for _ in 0..50 {
            let matched = board.target[0].id;
            let fresh = manager.replace_matched(&mut board, matched, &pool, &mut rng).unwrap();
            assert_ne!(fresh.id, matched);
            assert_board_consistent(&board);
        }
    }

    #[test]
    fn test_replace_with_nothing_left_is_noop() {
        let mut rng = StdRng::seed_from_u64(10);
        let pool = make_pool(1, 3);
        let mut manager = PoolManager::new();
        let mut board = manager.initialize_round(&pool, 4, &mut rng);
        let before = board.clone();

        let matched = board.source[0].id;
        assert!(manager.replace_matched(&mut board, matched, &pool, &mut rng).is_none());
        assert_eq!(board, before);
    }

    #[test]
    fn test_replace_from_empty_pool_is_noop() {
        let mut rng = StdRng::seed_from_u64(11);
        let pool = make_pool(1, 4);
        let mut manager = PoolManager::new();
        let mut board = manager.initialize_round(&pool, 4, &mut rng);
        let before = board.clone();

        let matched = board.source[0].id;
        assert!(manager.replace_matched(&mut board, matched, &[], &mut rng).is_none());
        assert_eq!(board, before);
    }

    #[test]
    fn test_column_opposite() {
        assert_eq!(Column::Source.opposite(), Column::Target);
        assert_eq!(Column::Target.opposite(), Column::Source);
    }
}

//! Session state machine
//!
//! One `Session` lives for the whole process. It moves between the menu,
//! category selection and a running game, and owns everything a game needs:
//! the word pool, the board, the selection latch and the countdown.
//! All changes come from discrete events (`handle`) or elapsed time
//! (`advance`) handed in by the event loop.

use crate::game::matcher::{Outcome, SelectResult, Selection, Status};
use crate::game::pool::{Board, Column, PoolManager};
use crate::game::timer::Countdown;
use crate::game::{
    Difficulty, GameMode, Tier, MISMATCH_PENALTY_SECS, PRACTICE_WORDS_ON_SCREEN,
    TOTAL_ROUNDS_PER_LEVEL,
};
use crate::stats::GlobalStats;
use crate::words::{Catalog, WordPair};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Duration;

/// Where the session currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Menu,
    CategorySelection,
    Playing,
    /// Round finished in Timed mode, waiting for the player to continue
    LevelUp,
    GameOver(GameOverReason),
    /// Timed game paused behind an "are you sure" prompt
    ConfirmExit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOverReason {
    /// The clock ran out
    TimeUp,
    /// The last round of the last difficulty was completed
    AllLevelsCleared,
}

/// Input to the state machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    SelectTimed,
    SelectZen,
    SelectCategoryMode,
    CategoryChosen(String),
    Select { column: Column, id: u32 },
    /// Leave the current screen: category list to menu, practice to menu,
    /// Timed game to the exit prompt, exit prompt back to the game
    Back,
    ConfirmExit,
    CancelExit,
    /// Continue from the round-complete dialog
    Advance,
    /// Dismiss the game-over dialog
    Acknowledge,
}

/// Progress of a Timed game
#[derive(Debug, Clone)]
pub struct TimedRun {
    pub difficulty: Difficulty,
    pub round: u32,
    pub matches_this_round: u32,
    pub matches_this_session: u32,
    pub score: u32,
    clock: Countdown,
}

impl TimedRun {
    fn new() -> Self {
        let difficulty = Difficulty::Easy;
        Self {
            difficulty,
            round: 1,
            matches_this_round: 0,
            matches_this_session: 0,
            score: 0,
            clock: Countdown::new(difficulty.tier().timer_seconds),
        }
    }

    pub fn tier(&self) -> Tier {
        self.difficulty.tier()
    }

    pub fn time_left(&self) -> u32 {
        self.clock.remaining()
    }

    #[cfg(test)]
    pub fn is_clock_running(&self) -> bool {
        self.clock.is_running()
    }

    /// Round display, e.g. "1/3"
    pub fn round_label(&self) -> String {
        format!("{}/{}", self.round, TOTAL_ROUNDS_PER_LEVEL)
    }

    fn is_last_round_of_level(&self) -> bool {
        self.round >= TOTAL_ROUNDS_PER_LEVEL
    }
}

/// Counters for Zen and category practice
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PracticeTally {
    pub correct: u32,
    pub incorrect: u32,
}

#[derive(Debug, Clone)]
enum Progress {
    Timed(TimedRun),
    Practice(PracticeTally),
}

/// A game in progress
struct Game {
    mode: GameMode,
    category: Option<String>,
    /// Every word available to this game
    words: Vec<WordPair>,
    /// `words` narrowed to the current difficulty (Timed) or all of them
    active_pool: Vec<WordPair>,
    pool: PoolManager,
    board: Board,
    selection: Selection,
    progress: Progress,
}

impl Game {
    fn timed(&self) -> Option<&TimedRun> {
        match &self.progress {
            Progress::Timed(run) => Some(run),
            Progress::Practice(_) => None,
        }
    }

    fn timed_mut(&mut self) -> Option<&mut TimedRun> {
        match &mut self.progress {
            Progress::Timed(run) => Some(run),
            Progress::Practice(_) => None,
        }
    }

    /// Recompute the active pool and deal a fresh board
    fn deal(&mut self, rng: &mut StdRng) {
        let (active_pool, screen_size) = match &self.progress {
            Progress::Timed(run) => {
                let level = run.difficulty.level();
                let pool: Vec<WordPair> =
                    self.words.iter().filter(|w| w.level == level).cloned().collect();
                (pool, run.tier().words_on_screen)
            }
            Progress::Practice(_) => (self.words.clone(), PRACTICE_WORDS_ON_SCREEN),
        };

        self.active_pool = active_pool;
        self.board = self
            .pool
            .initialize_round(&self.active_pool, screen_size, rng);
        self.selection.reset();

        tracing::debug!(
            pool = self.active_pool.len(),
            board = self.board.len(),
            "dealt new board"
        );
    }
}

/// Round-complete dialog contents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelUpPrompt {
    pub title: String,
    pub advance_label: String,
    pub score: u32,
}

/// The game session and its menus
pub struct Session {
    phase: Phase,
    catalog: Catalog,
    stats: GlobalStats,
    game: Option<Game>,
    rng: StdRng,
}

impl Session {
    /// Create a session at the main menu
    pub fn new(catalog: Catalog, stats: GlobalStats) -> Self {
        Self::with_rng(catalog, stats, StdRng::from_os_rng())
    }

    /// Create a session with a specific RNG (for testing/seeding)
    pub fn with_rng(catalog: Catalog, stats: GlobalStats, rng: StdRng) -> Self {
        Self {
            phase: Phase::Menu,
            catalog,
            stats,
            game: None,
            rng,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn stats(&self) -> &GlobalStats {
        &self.stats
    }

    pub fn mode(&self) -> Option<GameMode> {
        self.game.as_ref().map(|g| g.mode)
    }

    /// Name of the category being practised, in Categorized mode
    pub fn category(&self) -> Option<&str> {
        self.game.as_ref().and_then(|g| g.category.as_deref())
    }

    pub fn board(&self) -> Option<&Board> {
        self.game.as_ref().map(|g| &g.board)
    }

    #[cfg(test)]
    /// Words the current board is drawn from
    pub fn active_pool(&self) -> &[WordPair] {
        self.game.as_ref().map(|g| g.active_pool.as_slice()).unwrap_or(&[])
    }

    pub fn timed(&self) -> Option<&TimedRun> {
        self.game.as_ref().and_then(Game::timed)
    }

    pub fn practice(&self) -> Option<PracticeTally> {
        match self.game.as_ref().map(|g| &g.progress) {
            Some(Progress::Practice(tally)) => Some(*tally),
            _ => None,
        }
    }

    #[cfg(test)]
    /// True while a selected pair is being evaluated or input is held
    pub fn is_input_locked(&self) -> bool {
        self.game.as_ref().is_none_or(|g| g.selection.is_locked())
    }

    pub fn selected(&self, column: Column) -> Option<u32> {
        self.game.as_ref().and_then(|g| g.selection.selected(column))
    }

    /// Display status of word `id` in `column`
    pub fn status(&self, column: Column, id: u32) -> Status {
        self.game
            .as_ref()
            .map(|g| g.selection.status(column, id))
            .unwrap_or(Status::None)
    }

    /// Contents of the round-complete dialog, while in `LevelUp`
    pub fn level_up_prompt(&self) -> Option<LevelUpPrompt> {
        if self.phase != Phase::LevelUp {
            return None;
        }
        let run = self.timed()?;

        let (title, advance_label) = if run.is_last_round_of_level() {
            let label = match run.difficulty.next() {
                Some(next) => format!("Start next level ({})", next.arabic_name()),
                None => "Finish game".to_string(),
            };
            ("Level complete!".to_string(), label)
        } else {
            (
                "Round complete!".to_string(),
                format!("Start round {}", run.round + 1),
            )
        };

        Some(LevelUpPrompt {
            title,
            advance_label,
            score: run.score,
        })
    }

    /// Apply an event. Returns false if it does not apply in the current phase.
    pub fn handle(&mut self, event: Event) -> bool {
        let accepted = match (self.phase, event) {
            (Phase::Menu, Event::SelectTimed) => {
                let words = self.catalog.all_words();
                self.start(GameMode::Timed, None, words);
                true
            }
            (Phase::Menu, Event::SelectZen) => {
                let words = self.catalog.all_words();
                self.start(GameMode::Zen, None, words);
                true
            }
            (Phase::Menu, Event::SelectCategoryMode) => {
                self.phase = Phase::CategorySelection;
                true
            }
            (Phase::CategorySelection, Event::CategoryChosen(name)) => {
                match self.catalog.category(&name).map(|c| c.words.clone()) {
                    Some(words) => {
                        self.start(GameMode::Categorized, Some(name), words);
                        true
                    }
                    None => {
                        tracing::warn!(category = %name, "unknown category");
                        false
                    }
                }
            }
            (Phase::CategorySelection, Event::Back) => {
                self.phase = Phase::Menu;
                true
            }
            (Phase::Playing, Event::Select { column, id }) => self.select(column, id),
            (Phase::Playing, Event::Back) => {
                if let Some(run) = self.game.as_mut().and_then(Game::timed_mut) {
                    run.clock.stop();
                    self.phase = Phase::ConfirmExit;
                } else {
                    self.go_to_menu();
                }
                true
            }
            (Phase::ConfirmExit, Event::ConfirmExit) => {
                self.persist_timed_run();
                self.go_to_menu();
                true
            }
            (Phase::ConfirmExit, Event::CancelExit | Event::Back) => {
                if let Some(run) = self.game.as_mut().and_then(Game::timed_mut) {
                    run.clock.start();
                }
                self.phase = Phase::Playing;
                true
            }
            (Phase::LevelUp, Event::Advance) => {
                self.advance_round_or_level();
                true
            }
            (Phase::GameOver(_), Event::Acknowledge) => {
                self.go_to_menu();
                true
            }
            (phase, event) => {
                tracing::trace!(?phase, ?event, "event ignored");
                false
            }
        };

        if accepted {
            tracing::debug!(phase = ?self.phase, "handled event");
        }
        accepted
    }

    /// Feed elapsed time. Feedback delays and the countdown only run while
    /// `Playing`.
    pub fn advance(&mut self, elapsed: Duration) {
        if self.phase != Phase::Playing {
            return;
        }

        let resolved = match self.game.as_mut() {
            Some(game) => game.selection.advance(elapsed),
            None => return,
        };
        if let Some(outcome) = resolved {
            self.resolve(outcome);
        }

        if self.phase != Phase::Playing {
            return;
        }

        let expired = self
            .game
            .as_mut()
            .and_then(Game::timed_mut)
            .is_some_and(|run| run.clock.advance(elapsed));
        if expired {
            self.end_game(GameOverReason::TimeUp);
        }
    }

    fn start(&mut self, mode: GameMode, category: Option<String>, words: Vec<WordPair>) {
        let progress = if mode.is_timed() {
            Progress::Timed(TimedRun::new())
        } else {
            Progress::Practice(PracticeTally::default())
        };

        let mut game = Game {
            mode,
            category,
            words,
            active_pool: Vec::new(),
            pool: PoolManager::new(),
            board: Board::default(),
            selection: Selection::new(),
            progress,
        };
        game.deal(&mut self.rng);

        if let Some(run) = game.timed_mut() {
            run.clock.start();
        }

        tracing::info!(?mode, words = game.words.len(), "game started");
        self.game = Some(game);
        self.phase = Phase::Playing;
    }

    fn select(&mut self, column: Column, id: u32) -> bool {
        let Some(game) = self.game.as_mut() else {
            return false;
        };
        if !game.board.column(column).iter().any(|w| w.id == id) {
            return false;
        }

        match game.selection.select(column, id) {
            SelectResult::Ignored => false,
            SelectResult::Updated => true,
            SelectResult::Evaluating(outcome) => {
                tracing::debug!(?outcome, "evaluating pair");
                true
            }
        }
    }

    /// Apply a pair whose feedback delay has run out
    fn resolve(&mut self, outcome: Outcome) {
        let Some(game) = self.game.as_mut() else {
            return;
        };

        match outcome {
            Outcome::Match { id } => {
                match &mut game.progress {
                    Progress::Timed(run) => {
                        run.score += run.tier().points_per_match;
                        run.matches_this_round += 1;
                        run.matches_this_session += 1;
                    }
                    Progress::Practice(tally) => {
                        tally.correct += 1;
                        self.stats.record(0, 1);
                    }
                }

                game.pool
                    .replace_matched(&mut game.board, id, &game.active_pool, &mut self.rng);

                let round_done = game.timed().is_some_and(|run| {
                    run.matches_this_round > 0
                        && run.matches_this_round >= run.tier().matches_per_round
                });
                if round_done {
                    if let Some(run) = game.timed_mut() {
                        run.clock.stop();
                        tracing::info!(
                            round = run.round,
                            difficulty = run.difficulty.label(),
                            score = run.score,
                            "round complete"
                        );
                    }
                    game.selection.hold();
                    self.phase = Phase::LevelUp;
                }
            }
            Outcome::Mismatch { .. } => {
                let emptied = match &mut game.progress {
                    Progress::Timed(run) => run.clock.penalize(MISMATCH_PENALTY_SECS),
                    Progress::Practice(tally) => {
                        tally.incorrect += 1;
                        false
                    }
                };
                if emptied {
                    self.end_game(GameOverReason::TimeUp);
                }
            }
        }
    }

    fn advance_round_or_level(&mut self) {
        let Some(game) = self.game.as_mut() else {
            return;
        };
        let Some(run) = game.timed_mut() else {
            return;
        };

        if run.is_last_round_of_level() {
            match run.difficulty.next() {
                Some(next) => {
                    run.difficulty = next;
                    run.round = 1;
                    run.clock.reset(next.tier().timer_seconds);
                    tracing::info!(difficulty = next.label(), "level up");
                }
                None => {
                    self.end_game(GameOverReason::AllLevelsCleared);
                    return;
                }
            }
        } else {
            // the clock carries over between rounds of the same level
            run.round += 1;
        }
        run.matches_this_round = 0;
        run.clock.start();

        game.deal(&mut self.rng);
        self.phase = Phase::Playing;
    }

    fn end_game(&mut self, reason: GameOverReason) {
        if let Some(game) = self.game.as_mut() {
            game.selection.reset();
            if let Some(run) = game.timed_mut() {
                run.clock.stop();
            }
        }
        self.persist_timed_run();
        tracing::info!(?reason, "game over");
        self.phase = Phase::GameOver(reason);
    }

    /// Add the Timed game's score and matches to the lifetime totals
    fn persist_timed_run(&mut self) {
        if let Some(run) = self.game.as_ref().and_then(Game::timed) {
            self.stats
                .record(u64::from(run.score), u64::from(run.matches_this_session));
        }
    }

    fn go_to_menu(&mut self) {
        self.game = None;
        self.phase = Phase::Menu;
    }
}

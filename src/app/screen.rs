//! Application screen state management
//!
//! The `Session` decides which phase the game is in. The coordinator adds
//! what only the terminal needs on top of it: menu and list cursors, which
//! column has keyboard focus, and whether the process should exit.

use super::state::{Event, Phase, Session};
use crate::game::pool::Column;
use std::time::Duration;

/// Menu option on the main screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuOption {
    CategoryPractice,
    TimedChallenge,
    ZenPractice,
    Quit,
}

impl MenuOption {
    /// Get all menu options in order
    pub fn all() -> &'static [MenuOption] {
        &[
            MenuOption::CategoryPractice,
            MenuOption::TimedChallenge,
            MenuOption::ZenPractice,
            MenuOption::Quit,
        ]
    }

    /// Get the display label for this option
    pub fn label(&self) -> &'static str {
        match self {
            MenuOption::CategoryPractice => "Practice by Category",
            MenuOption::TimedChallenge => "Timed Challenge",
            MenuOption::ZenPractice => "Zen Practice",
            MenuOption::Quit => "Quit",
        }
    }

    /// Short line shown under the selected option
    pub fn hint(&self) -> &'static str {
        match self {
            MenuOption::CategoryPractice => "Pick a topic and match at your own pace",
            MenuOption::TimedChallenge => "Beat the clock through three difficulty levels",
            MenuOption::ZenPractice => "Every word, no clock, no pressure",
            MenuOption::Quit => "See you next time",
        }
    }
}

/// Main application coordinator
pub struct AppCoordinator {
    pub session: Session,
    /// Highlighted main menu entry
    pub menu_selected: usize,
    /// Highlighted category in the category list
    pub category_selected: usize,
    /// Column that arrow keys move in
    pub focus: Column,
    source_cursor: usize,
    target_cursor: usize,
    /// Whether the application should quit
    pub should_quit: bool,
}

impl AppCoordinator {
    /// Create a new app coordinator starting at the menu
    pub fn new(session: Session) -> Self {
        Self {
            session,
            menu_selected: 0,
            category_selected: 0,
            focus: Column::Source,
            source_cursor: 0,
            target_cursor: 0,
            should_quit: false,
        }
    }

    pub fn phase(&self) -> Phase {
        self.session.phase()
    }

    /// Quit the application
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Row highlighted in `column`, clamped to the board
    pub fn cursor(&self, column: Column) -> usize {
        let raw = match column {
            Column::Source => self.source_cursor,
            Column::Target => self.target_cursor,
        };
        let len = self.session.board().map_or(0, |b| b.len());
        raw.min(len.saturating_sub(1))
    }

    /// Handle menu navigation (up)
    pub fn menu_up(&mut self) {
        if self.menu_selected > 0 {
            self.menu_selected -= 1;
        }
    }

    /// Handle menu navigation (down)
    pub fn menu_down(&mut self) {
        if self.menu_selected < MenuOption::all().len() - 1 {
            self.menu_selected += 1;
        }
    }

    /// Handle menu selection (Enter)
    pub fn menu_select(&mut self) {
        let option = MenuOption::all()[self.menu_selected];
        let event = match option {
            MenuOption::CategoryPractice => {
                self.category_selected = 0;
                Event::SelectCategoryMode
            }
            MenuOption::TimedChallenge => Event::SelectTimed,
            MenuOption::ZenPractice => Event::SelectZen,
            MenuOption::Quit => {
                self.should_quit = true;
                return;
            }
        };
        if self.session.handle(event) && self.phase() == Phase::Playing {
            self.reset_board_cursors();
        }
    }

    /// Category list navigation (up)
    pub fn category_up(&mut self) {
        if self.category_selected > 0 {
            self.category_selected -= 1;
        }
    }

    /// Category list navigation (down)
    pub fn category_down(&mut self) {
        let count = self.session.catalog().categories().len();
        if self.category_selected < count.saturating_sub(1) {
            self.category_selected += 1;
        }
    }

    /// Start practising the highlighted category
    pub fn category_select(&mut self) {
        let name = match self.session.catalog().categories().get(self.category_selected) {
            Some(category) => category.name.clone(),
            None => return,
        };
        if self.session.handle(Event::CategoryChosen(name)) {
            self.reset_board_cursors();
        }
    }

    /// Move keyboard focus to `column`
    pub fn focus_column(&mut self, column: Column) {
        self.focus = column;
    }

    /// Move keyboard focus to the other column
    pub fn switch_column(&mut self) {
        self.focus = self.focus.opposite();
    }

    /// Move the focused column's cursor up
    pub fn cursor_up(&mut self) {
        let current = self.cursor(self.focus);
        self.set_cursor(self.focus, current.saturating_sub(1));
    }

    /// Move the focused column's cursor down
    pub fn cursor_down(&mut self) {
        let current = self.cursor(self.focus);
        let len = self.session.board().map_or(0, |b| b.len());
        if current + 1 < len {
            self.set_cursor(self.focus, current + 1);
        }
    }

    /// Select the word under the cursor in the focused column.
    ///
    /// Picking a word in one column hands focus to the other, so a pair
    /// can be made with Enter, arrows, Enter.
    pub fn select_focused(&mut self) {
        let column = self.focus;
        let id = match self
            .session
            .board()
            .and_then(|b| b.column(column).get(self.cursor(column)))
        {
            Some(word) => word.id,
            None => return,
        };

        let was_selected = self.session.selected(column) == Some(id);
        if self.session.handle(Event::Select { column, id })
            && !was_selected
            && self.session.selected(column.opposite()).is_none()
        {
            self.focus = column.opposite();
        }
    }

    /// Esc: leave the current screen, or quit from the main menu
    pub fn back(&mut self) {
        match self.phase() {
            Phase::Menu => self.should_quit = true,
            Phase::GameOver(_) => {
                self.session.handle(Event::Acknowledge);
            }
            Phase::LevelUp => {}
            _ => {
                self.session.handle(Event::Back);
            }
        }
    }

    /// Enter on a dialog: continue, acknowledge or confirm
    pub fn confirm(&mut self) {
        let event = match self.phase() {
            Phase::LevelUp => Event::Advance,
            Phase::GameOver(_) => Event::Acknowledge,
            Phase::ConfirmExit => Event::ConfirmExit,
            _ => return,
        };
        if self.session.handle(event) && self.phase() == Phase::Playing {
            self.reset_board_cursors();
        }
    }

    /// Dismiss the exit dialog and keep playing
    pub fn cancel(&mut self) {
        if self.phase() == Phase::ConfirmExit {
            self.session.handle(Event::CancelExit);
        }
    }

    /// Feed elapsed wall-clock time to the session
    pub fn tick(&mut self, elapsed: Duration) {
        self.session.advance(elapsed);
    }

    fn set_cursor(&mut self, column: Column, row: usize) {
        match column {
            Column::Source => self.source_cursor = row,
            Column::Target => self.target_cursor = row,
        }
    }

    fn reset_board_cursors(&mut self) {
        self.focus = Column::Source;
        self.source_cursor = 0;
        self.target_cursor = 0;
    }
}

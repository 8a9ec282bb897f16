//! UI rendering using ratatui
//!
//! Screens:
//! - Menu: Main menu with lifetime totals
//! - CategorySelection: List of categories to practise
//! - Playing: Two word columns with a scoreboard or practice tally
//! - LevelUp / GameOver / ConfirmExit: dialogs drawn over the game screen

use crate::app::{AppCoordinator, GameOverReason, MenuOption, Phase, Session};
use crate::game::matcher::Status;
use crate::game::pool::Column;
use crate::game::GameMode;
use crate::words::WordPair;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
};

/// Render the appropriate screen based on app state
pub fn render(frame: &mut Frame, coordinator: &AppCoordinator) {
    match coordinator.phase() {
        Phase::Menu => render_menu(frame, coordinator),
        Phase::CategorySelection => render_categories(frame, coordinator),
        Phase::Playing => render_game(frame, coordinator),
        Phase::LevelUp => {
            render_game(frame, coordinator);
            render_level_up(frame, &coordinator.session);
        }
        Phase::GameOver(reason) => {
            render_game(frame, coordinator);
            render_game_over(frame, &coordinator.session, reason);
        }
        Phase::ConfirmExit => {
            render_game(frame, coordinator);
            render_confirm_exit(frame);
        }
    }
}

/// Render the main menu
fn render_menu(frame: &mut Frame, coordinator: &AppCoordinator) {
    let area = frame.area();

    // Main layout
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Title
            Constraint::Length(2), // Lifetime totals
            Constraint::Length(1), // Spacer
            Constraint::Min(6),    // Menu options
            Constraint::Length(1), // Hint for the highlighted option
            Constraint::Length(2), // Footer
        ])
        .margin(2)
        .split(area);

    let title = Paragraph::new(vec![
        Line::from("LingoLink"),
        Line::from("لينجو لينك").style(Style::default().fg(Color::Cyan)),
    ])
    .style(Style::default().fg(Color::Yellow).bold())
    .alignment(Alignment::Center);
    frame.render_widget(title, layout[0]);

    let stats = coordinator.session.stats();
    let totals = Paragraph::new(format!(
        "Total score: {}   Total matches: {}",
        stats.total_score(),
        stats.total_matches()
    ))
    .style(Style::default().fg(Color::Magenta))
    .alignment(Alignment::Center);
    frame.render_widget(totals, layout[1]);

    // Menu options
    let selected = coordinator.menu_selected;
    let items: Vec<ListItem> = MenuOption::all()
        .iter()
        .enumerate()
        .map(|(i, opt)| {
            let style = if i == selected {
                Style::default().fg(Color::Yellow).bold()
            } else {
                Style::default().fg(Color::White)
            };
            let prefix = if i == selected { "> " } else { "  " };
            ListItem::new(format!("{}{}", prefix, opt.label())).style(style)
        })
        .collect();
    frame.render_widget(List::new(items).block(Block::default()), layout[3]);

    if let Some(option) = MenuOption::all().get(selected) {
        let hint = Paragraph::new(option.hint())
            .style(Style::default().fg(Color::Gray))
            .alignment(Alignment::Center);
        frame.render_widget(hint, layout[4]);
    }

    // Footer
    let footer = Paragraph::new("↑↓ Navigate  Enter Select  Esc/q Quit")
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(footer, layout[5]);
}

/// Render the category list
fn render_categories(frame: &mut Frame, coordinator: &AppCoordinator) {
    let area = frame.area();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(6),    // Category list
            Constraint::Length(2), // Footer
        ])
        .margin(1)
        .split(area);

    // Header
    let header = Paragraph::new("Choose a category")
        .style(Style::default().fg(Color::Cyan).bold())
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, layout[0]);

    let selected = coordinator.category_selected;
    let items: Vec<ListItem> = coordinator
        .session
        .catalog()
        .categories()
        .iter()
        .enumerate()
        .map(|(i, category)| {
            let style = if i == selected {
                Style::default().fg(Color::Yellow).bold()
            } else {
                Style::default().fg(Color::White)
            };
            let prefix = if i == selected { "> " } else { "  " };
            ListItem::new(format!(
                "{}{} ({} words)",
                prefix,
                category.name,
                category.words.len()
            ))
            .style(style)
        })
        .collect();

    if items.is_empty() {
        let empty = Paragraph::new("No categories in this word bank")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center);
        frame.render_widget(empty, layout[1]);
    } else {
        frame.render_widget(List::new(items), layout[1]);
    }

    let footer = Paragraph::new("↑↓ Navigate  Enter Start  Esc Back")
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(footer, layout[2]);
}

/// Render the in-game screen
fn render_game(frame: &mut Frame, coordinator: &AppCoordinator) {
    let area = frame.area();

    // Main layout: header + columns + footer
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header with mode, score, timer
            Constraint::Min(0),    // Word columns
            Constraint::Length(1), // Footer
        ])
        .split(area);

    render_header(frame, layout[0], &coordinator.session);
    render_columns(frame, layout[1], coordinator);

    let footer = Paragraph::new("↑↓ Move  Tab/←→ Column  Enter Select  Esc Leave")
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(footer, layout[2]);
}

/// Render the header: mode title, progress, timer
fn render_header(frame: &mut Frame, area: Rect, session: &Session) {
    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(Style::default().fg(Color::DarkGray));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    // Split header into: title | progress | timer
    let header_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(24), // Mode title
            Constraint::Min(20),    // Score or tally (centered, flexible)
            Constraint::Length(10), // Timer
        ])
        .split(inner);

    let title = match session.mode() {
        Some(GameMode::Timed) => "Timed Challenge".to_string(),
        Some(GameMode::Zen) => "Zen Practice".to_string(),
        Some(GameMode::Categorized) => session.category().unwrap_or("Category").to_string(),
        None => String::new(),
    };
    let title = Paragraph::new(title)
        .style(Style::default().fg(Color::Yellow).bold())
        .alignment(Alignment::Left);
    frame.render_widget(title, header_layout[0]);

    if let Some(run) = session.timed() {
        let progress = format!(
            "{} ({})  Round {}  Matches {}/{}  Score {}",
            run.difficulty.label(),
            run.difficulty.arabic_name(),
            run.round_label(),
            run.matches_this_round,
            run.tier().matches_per_round,
            run.score
        );
        let progress = Paragraph::new(progress)
            .style(Style::default().fg(Color::Magenta).bold())
            .alignment(Alignment::Center);
        frame.render_widget(progress, header_layout[1]);

        let time_left = run.time_left();
        let timer = Paragraph::new(format_timer(time_left))
            .style(Style::default().fg(timer_color(time_left)).bold())
            .alignment(Alignment::Right);
        frame.render_widget(timer, header_layout[2]);
    } else if let Some(tally) = session.practice() {
        let tally = Line::from(vec![
            Span::styled(
                format!("Correct {}", tally.correct),
                Style::default().fg(Color::Green).bold(),
            ),
            Span::raw("   "),
            Span::styled(
                format!("Incorrect {}", tally.incorrect),
                Style::default().fg(Color::Red).bold(),
            ),
        ]);
        frame.render_widget(
            Paragraph::new(tally).alignment(Alignment::Center),
            header_layout[1],
        );
    }
}

/// Render the two word columns side by side
fn render_columns(frame: &mut Frame, area: Rect, coordinator: &AppCoordinator) {
    let Some(board) = coordinator.session.board() else {
        return;
    };

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .margin(1)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    if board.is_empty() {
        let empty = Paragraph::new("No words to show")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center);
        frame.render_widget(empty, area);
        return;
    }

    render_word_column(frame, columns[0], coordinator, Column::Source, &board.source);
    render_word_column(frame, columns[1], coordinator, Column::Target, &board.target);
}

/// Render one column of words with selection and feedback colors
fn render_word_column(
    frame: &mut Frame,
    area: Rect,
    coordinator: &AppCoordinator,
    column: Column,
    words: &[WordPair],
) {
    let focused = coordinator.focus == column;
    let cursor = coordinator.cursor(column);

    let items: Vec<ListItem> = words
        .iter()
        .enumerate()
        .map(|(i, word)| {
            let text = match column {
                Column::Source => &word.source_text,
                Column::Target => &word.target_text,
            };
            let prefix = if focused && i == cursor { "> " } else { "  " };
            let style = status_style(coordinator.session.status(column, word.id));
            ListItem::new(format!("{}{}", prefix, text)).style(style)
        })
        .collect();

    let title = match column {
        Column::Source => "العربية",
        Column::Target => "English",
    };
    let border_color = if focused { Color::Cyan } else { Color::DarkGray };
    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color))
            .title(title),
    );
    frame.render_widget(list, area);
}

/// Render the round/level complete dialog
fn render_level_up(frame: &mut Frame, session: &Session) {
    let Some(prompt) = session.level_up_prompt() else {
        return;
    };

    let lines = vec![
        Line::from(prompt.title).style(Style::default().fg(Color::Green).bold()),
        Line::from(""),
        Line::from(format!("Score: {}", prompt.score))
            .style(Style::default().fg(Color::Yellow).bold()),
        Line::from(""),
        Line::from(format!("Enter: {}", prompt.advance_label))
            .style(Style::default().fg(Color::Cyan)),
    ];
    render_dialog(frame, lines, Color::Green);
}

/// Render the game over dialog
fn render_game_over(frame: &mut Frame, session: &Session, reason: GameOverReason) {
    let (title, message) = match reason {
        GameOverReason::TimeUp => ("TIME'S UP!", "The clock ran out."),
        GameOverReason::AllLevelsCleared => ("ALL LEVELS CLEARED!", "You finished every level."),
    };
    let score = session.timed().map_or(0, |run| run.score);
    let stats = session.stats();

    let lines = vec![
        Line::from(title).style(Style::default().fg(Color::Red).bold()),
        Line::from(message),
        Line::from(""),
        Line::from(format!("Final Score: {}", score))
            .style(Style::default().fg(Color::Yellow).bold()),
        Line::from(format!(
            "Lifetime: {} points, {} matches",
            stats.total_score(),
            stats.total_matches()
        ))
        .style(Style::default().fg(Color::Magenta)),
        Line::from(""),
        Line::from("Press Enter to return to menu").style(Style::default().fg(Color::DarkGray)),
    ];
    render_dialog(frame, lines, Color::Red);
}

/// Render the exit confirmation dialog
fn render_confirm_exit(frame: &mut Frame) {
    let lines = vec![
        Line::from("Leave this game?").style(Style::default().fg(Color::Yellow).bold()),
        Line::from(""),
        Line::from("Your score so far will be saved."),
        Line::from(""),
        Line::from("Enter/y Leave   Esc/n Keep playing").style(Style::default().fg(Color::DarkGray)),
    ];
    render_dialog(frame, lines, Color::Yellow);
}

/// Draw `lines` in a bordered box centered over the current screen
fn render_dialog(frame: &mut Frame, lines: Vec<Line>, border: Color) {
    let height = lines.len() as u16 + 2;
    let area = centered_rect(frame.area(), 50, height);

    frame.render_widget(Clear, area);
    let dialog = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border)),
    );
    frame.render_widget(dialog, area);
}

/// A `width`x`height` rect centered in `area`, shrunk to fit
fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn status_style(status: Status) -> Style {
    match status {
        Status::None => Style::default().fg(Color::White),
        Status::Selected => Style::default().fg(Color::Black).bg(Color::Cyan),
        Status::Correct => Style::default().fg(Color::Black).bg(Color::Green).bold(),
        Status::Incorrect => Style::default().fg(Color::White).bg(Color::Red).bold(),
    }
}

/// Format the timer display
fn format_timer(seconds: u32) -> String {
    let mins = seconds / 60;
    let secs = seconds % 60;
    format!("{}:{:02}", mins, secs)
}

fn timer_color(seconds: u32) -> Color {
    if seconds <= 10 {
        Color::Red
    } else if seconds <= 30 {
        Color::Yellow
    } else {
        Color::Green
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_timer() {
        assert_eq!(format_timer(90), "1:30");
        assert_eq!(format_timer(120), "2:00");
        assert_eq!(format_timer(9), "0:09");
        assert_eq!(format_timer(0), "0:00");
    }

    #[test]
    fn test_timer_color_thresholds() {
        assert_eq!(timer_color(90), Color::Green);
        assert_eq!(timer_color(30), Color::Yellow);
        assert_eq!(timer_color(10), Color::Red);
    }

    #[test]
    fn test_centered_rect_fits_area() {
        let area = Rect::new(0, 0, 40, 10);
        let rect = centered_rect(area, 50, 7);
        assert_eq!(rect.width, 40);
        assert_eq!(rect.height, 7);
        assert_eq!(rect.x, 0);
        assert_eq!(rect.y, 1);
    }
}

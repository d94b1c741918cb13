//! Top-level UI layout: one screen at a time above a 1-line status bar.

pub mod quotes_panel;
pub mod status_bar;
pub mod tips_panel;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::widgets::{Block, Borders};

use crate::app::{AppState, Screen};
use crate::theme;

/// Draw the entire UI.
pub fn draw(f: &mut Frame, app: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(f.area());

    draw_screen(f, chunks[0], app);
    status_bar::render(f, chunks[1], app);
}

fn draw_screen(f: &mut Frame, area: Rect, app: &AppState) {
    let screen = app.screen;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::panel_border(true))
        .title(format!(" {} [{}] ", screen.label(), screen.index() + 1))
        .title_style(theme::panel_title(true));

    let inner = block.inner(area);
    f.render_widget(block, area);

    match screen {
        Screen::Quotes => quotes_panel::render(f, inner, app),
        Screen::Tips => tips_panel::render(f, inner, app),
    }
}

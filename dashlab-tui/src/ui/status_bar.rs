//! Bottom status bar: screen hints and the latest notice.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::app::{AppState, Screen};
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let hints = match app.screen {
        Screen::Quotes => " 1:Quotes 2:Tips [/]:window r:reload q:quit",
        Screen::Tips => " 1:Quotes 2:Tips \u{2190}/\u{2192}:chart r:reload q:quit",
    };
    let mut spans = vec![Span::styled(hints, theme::muted())];

    if let Some(notice) = &app.status {
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(
            notice.message.as_str(),
            theme::severity(notice.severity),
        ));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

//! Quotes screen: window header, recent rows, Close price chart.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Cell, Paragraph, Row, Table};

use dashlab_core::quotes::QuoteTable;
use dashlab_core::session::QuotesOutcome;

use crate::app::AppState;
use crate::panels::SeriesChart;
use crate::theme::{self, Theme};

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Percentage(40),
            Constraint::Min(6),
        ])
        .split(area);

    render_header(f, chunks[0], app);

    let Some(report) = &app.quotes.report else {
        let msg = if app.quotes.loading {
            "Fetching quotes..."
        } else {
            "No quotes loaded yet. Press r to load."
        };
        f.render_widget(
            Paragraph::new(Span::styled(msg, theme::muted())),
            chunks[1],
        );
        return;
    };

    match report.outcome {
        QuotesOutcome::Loaded => {
            render_table(f, chunks[1], &report.table);
            let theme = Theme::default();
            let close = report.table.close_series();
            let title = format!("{} Close", report.ticker);
            f.render_widget(
                SeriesChart::new(&close, &title, "Close ($)", &theme),
                chunks[2],
            );
        }
        QuotesOutcome::Empty | QuotesOutcome::Failed => {
            let lines: Vec<Line> = report
                .notices
                .iter()
                .map(|n| Line::from(Span::styled(n.message.as_str(), theme::severity(n.severity))))
                .collect();
            f.render_widget(Paragraph::new(lines), chunks[1]);
        }
    }
}

fn render_header(f: &mut Frame, area: Rect, app: &AppState) {
    let q = &app.quotes;
    let mut spans = vec![
        Span::styled(
            q.ticker.as_str(),
            theme::accent().add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!("  {} to {}", q.start, q.end)),
    ];
    if q.loading {
        spans.push(Span::styled("  loading...", theme::warning()));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Most recent rows first, as many as fit.
fn render_table(f: &mut Frame, area: Rect, table: &QuoteTable) {
    let visible = area.height.saturating_sub(1) as usize;
    let rows: Vec<Row> = table
        .bars()
        .iter()
        .rev()
        .take(visible)
        .map(|bar| {
            Row::new(vec![
                Cell::from(bar.date.to_string()),
                Cell::from(format!("{:.2}", bar.open)),
                Cell::from(format!("{:.2}", bar.high)),
                Cell::from(format!("{:.2}", bar.low)),
                Cell::from(format!("{:.2}", bar.close)),
                Cell::from(bar.volume.to_string()),
            ])
        })
        .collect();

    let header = Row::new(["Date", "Open", "High", "Low", "Close", "Volume"])
        .style(theme::accent().add_modifier(Modifier::BOLD));
    let widths = [
        Constraint::Length(12),
        Constraint::Length(10),
        Constraint::Length(10),
        Constraint::Length(10),
        Constraint::Length(10),
        Constraint::Min(12),
    ];
    f.render_widget(Table::new(rows, widths).header(header), area);
}

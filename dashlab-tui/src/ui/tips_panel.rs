//! Tips screen: data preview on top, one chart below.

use chrono::NaiveDate;
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, Wrap};

use dashlab_core::charts::{ChartKind, ChartParams, ChartSpec, Renderability};
use dashlab_core::tips::{columns, Provenance, TipsTable};

use crate::app::AppState;
use crate::panels::{HistogramChart, ScatterChart, SeriesChart};
use crate::theme::{self, Theme};

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let Some(report) = &app.tips.report else {
        let msg = if app.tips.loading {
            "Loading tips dataset..."
        } else {
            "No tips data loaded yet. Press r to load."
        };
        f.render_widget(Paragraph::new(Span::styled(msg, theme::muted())), area);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Percentage(40),
            Constraint::Min(8),
        ])
        .split(area);

    let source = match report.provenance {
        Provenance::Local => "uploaded file",
        Provenance::Remote => "demo dataset",
        Provenance::Failed => "no data",
    };
    let kind = app.tips.chart_kind();
    let header = Line::from(vec![
        Span::styled("Tips", theme::accent().add_modifier(Modifier::BOLD)),
        Span::raw(format!("  {} rows from {}", report.table.height(), source)),
        Span::styled(
            format!(
                "  chart {}/{}: {}",
                app.tips.chart_index + 1,
                ChartKind::ALL.len(),
                kind.title()
            ),
            theme::muted(),
        ),
    ]);
    f.render_widget(Paragraph::new(header), chunks[0]);

    render_preview(f, chunks[1], &report.table, app.tips.preview_rows);

    match report.specs.iter().find(|s| s.kind == kind) {
        Some(spec) => render_chart(f, chunks[2], spec),
        None => render_reason(f, chunks[2], kind.title(), "No chart available.", false),
    }
}

fn render_preview(f: &mut Frame, area: Rect, table: &TipsTable, preview_rows: usize) {
    let names = table.column_names();
    if names.is_empty() {
        let lines = vec![
            Line::from(Span::styled("Empty table.", theme::warning())),
            Line::from(Span::styled(columns::expected_hint(), theme::muted())),
        ];
        f.render_widget(Paragraph::new(lines), area);
        return;
    }

    let shown = preview_rows.min(area.height.saturating_sub(1) as usize);
    let rows: Vec<Row> = (0..table.height().min(shown))
        .map(|i| {
            Row::new(
                names
                    .iter()
                    .map(|c| Cell::from(table.cell_text(c, i)))
                    .collect::<Vec<_>>(),
            )
        })
        .collect();

    let header = Row::new(names.iter().map(|c| Cell::from(c.clone())).collect::<Vec<_>>())
        .style(theme::accent().add_modifier(Modifier::BOLD));
    let widths: Vec<Constraint> = names
        .iter()
        .map(|c| Constraint::Min(c.len().max(8) as u16))
        .collect();
    f.render_widget(Table::new(rows, widths).header(header), area);
}

fn render_chart(f: &mut Frame, area: Rect, spec: &ChartSpec) {
    let theme = Theme::default();
    match &spec.render {
        Renderability::Renderable(ChartParams::TimeSeries(series)) => {
            let points: Vec<(NaiveDate, f64)> =
                series.points.iter().map(|p| (p.date, p.value)).collect();
            f.render_widget(
                SeriesChart::new(&points, &series.title, &series.y_label, &theme),
                area,
            );
        }
        Renderability::Renderable(ChartParams::Histogram(hist)) => {
            f.render_widget(HistogramChart::new(hist, &theme), area);
        }
        Renderability::Renderable(ChartParams::Scatter(scatter)) => {
            f.render_widget(ScatterChart::new(scatter, &theme), area);
        }
        Renderability::NotRenderable { reason } => {
            render_reason(f, area, spec.title(), reason, true);
        }
        Renderability::Empty { reason } => {
            render_reason(f, area, spec.title(), reason, false);
        }
    }
}

fn render_reason(f: &mut Frame, area: Rect, title: &str, reason: &str, warn: bool) {
    let style = if warn { theme::warning() } else { theme::muted() };
    let mut lines = vec![Line::from(Span::styled(reason, style))];
    if warn {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            columns::expected_hint(),
            theme::muted(),
        )));
    }
    let block = Block::default()
        .title(format!(" {title} "))
        .borders(Borders::ALL)
        .border_style(theme::muted());
    f.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
        area,
    );
}

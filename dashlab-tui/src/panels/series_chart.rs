//! Date-indexed line chart (Close prices, daily average tip).

use chrono::NaiveDate;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    symbols,
    text::Span,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Widget},
};

use crate::theme::Theme;

/// Line chart over calendar dates. X positions are days since the first
/// point, so gaps (weekends, days without tips) keep their width.
pub struct SeriesChart<'a> {
    points: &'a [(NaiveDate, f64)],
    title: &'a str,
    y_label: &'a str,
    theme: &'a Theme,
}

impl<'a> SeriesChart<'a> {
    pub fn new(
        points: &'a [(NaiveDate, f64)],
        title: &'a str,
        y_label: &'a str,
        theme: &'a Theme,
    ) -> Self {
        Self {
            points,
            title,
            y_label,
            theme,
        }
    }
}

impl<'a> Widget for SeriesChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let (Some(first), Some(last)) = (self.points.first(), self.points.last()) else {
            Block::default()
                .title(format!(" {} [No Data] ", self.title))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(self.theme.muted))
                .style(Style::default().bg(self.theme.background))
                .render(area, buf);
            return;
        };

        let data: Vec<(f64, f64)> = self
            .points
            .iter()
            .map(|(date, value)| ((*date - first.0).num_days() as f64, *value))
            .collect();

        let y_min = data.iter().map(|p| p.1).fold(f64::INFINITY, f64::min);
        let y_max = data.iter().map(|p| p.1).fold(f64::NEG_INFINITY, f64::max);
        let pad = if y_max > y_min {
            (y_max - y_min) * 0.05
        } else {
            1.0
        };
        let x_max = data.last().map(|p| p.0).unwrap_or(0.0).max(1.0);

        let change = last.1 - first.1;
        let block = Block::default()
            .title(format!(" {} | {} points ", self.title, self.points.len()))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.accent))
            .style(Style::default().bg(self.theme.background));

        let dataset = Dataset::default()
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(self.theme.change_color(change)))
            .data(&data);

        let muted = Style::default().fg(self.theme.muted);
        Chart::new(vec![dataset])
            .block(block)
            .x_axis(
                Axis::default()
                    .style(muted)
                    .bounds([0.0, x_max])
                    .labels(vec![
                        Span::styled(first.0.to_string(), muted),
                        Span::styled(last.0.to_string(), muted),
                    ]),
            )
            .y_axis(
                Axis::default()
                    .title(Span::styled(self.y_label, muted))
                    .style(muted)
                    .bounds([y_min - pad, y_max + pad])
                    .labels(vec![
                        Span::styled(format!("{:.2}", y_min - pad), muted),
                        Span::styled(format!("{:.2}", y_max + pad), muted),
                    ]),
            )
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panels::buffer_text;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    #[test]
    fn renders_title_and_point_count() {
        let theme = Theme::default();
        let points = vec![(d(2), 185.2), (d(3), 184.3), (d(5), 181.9)];
        let area = Rect::new(0, 0, 80, 20);
        let mut buf = Buffer::empty(area);
        SeriesChart::new(&points, "AAPL Close", "Close ($)", &theme).render(area, &mut buf);

        let content = buffer_text(&buf);
        assert!(content.contains("AAPL Close | 3 points"));
        assert!(content.contains("2024-01-02"));
    }

    #[test]
    fn empty_series_says_no_data() {
        let theme = Theme::default();
        let area = Rect::new(0, 0, 60, 10);
        let mut buf = Buffer::empty(area);
        SeriesChart::new(&[], "AAPL Close", "Close ($)", &theme).render(area, &mut buf);
        assert!(buffer_text(&buf).contains("No Data"));
    }

    #[test]
    fn single_point_renders_without_panic() {
        let theme = Theme::default();
        let points = vec![(d(2), 10.0)];
        let area = Rect::new(0, 0, 40, 12);
        let mut buf = Buffer::empty(area);
        SeriesChart::new(&points, "One", "Value", &theme).render(area, &mut buf);
    }
}

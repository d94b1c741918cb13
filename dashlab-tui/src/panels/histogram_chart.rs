//! Histogram bars with the smoothed density drawn over them.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    symbols,
    text::Span,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Widget},
};

use dashlab_core::charts::HistogramParams;

use crate::theme::Theme;

pub struct HistogramChart<'a> {
    params: &'a HistogramParams,
    theme: &'a Theme,
}

impl<'a> HistogramChart<'a> {
    pub fn new(params: &'a HistogramParams, theme: &'a Theme) -> Self {
        Self { params, theme }
    }
}

impl<'a> Widget for HistogramChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let p = self.params;
        let block = Block::default()
            .title(format!(" {} | {} bins | n = {} ", p.title, p.bins, p.total()))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.accent))
            .style(Style::default().bg(self.theme.background));

        let (Some(&x_min), Some(&x_max)) = (p.edges.first(), p.edges.last()) else {
            block.render(area, buf);
            return;
        };

        // One vertical bar per bin, at the bin centre.
        let bars: Vec<(f64, f64)> = p
            .edges
            .windows(2)
            .zip(&p.counts)
            .map(|(edge, &count)| ((edge[0] + edge[1]) / 2.0, count as f64))
            .collect();
        let density: Vec<(f64, f64)> = p.density.iter().map(|pt| (pt.x, pt.y)).collect();

        let peak = bars
            .iter()
            .map(|b| b.1)
            .chain(density.iter().map(|d| d.1))
            .fold(1.0, f64::max);

        let mut datasets = vec![Dataset::default()
            .name(p.y_label.as_str())
            .marker(symbols::Marker::Block)
            .graph_type(GraphType::Bar)
            .style(Style::default().fg(self.theme.accent))
            .data(&bars)];
        if !density.is_empty() {
            datasets.push(
                Dataset::default()
                    .name("smoothed")
                    .marker(symbols::Marker::Braille)
                    .graph_type(GraphType::Line)
                    .style(Style::default().fg(self.theme.neutral))
                    .data(&density),
            );
        }

        let muted = Style::default().fg(self.theme.muted);
        Chart::new(datasets)
            .block(block)
            .x_axis(
                Axis::default()
                    .title(Span::styled(p.x_label.as_str(), muted))
                    .style(muted)
                    .bounds([x_min, x_max])
                    .labels(vec![
                        Span::styled(format!("{x_min:.1}"), muted),
                        Span::styled(format!("{x_max:.1}"), muted),
                    ]),
            )
            .y_axis(
                Axis::default()
                    .title(Span::styled(p.y_label.as_str(), muted))
                    .style(muted)
                    .bounds([0.0, peak * 1.05])
                    .labels(vec![
                        Span::styled("0", muted),
                        Span::styled(format!("{peak:.0}"), muted),
                    ]),
            )
            .render(area, buf);
    }
}

//! Scatter plot with marker size approximated by glyph weight.
//!
//! A terminal cell cannot scale a dot, so points are bucketed by their marker
//! diameter relative to `size_max`: small points draw as braille dots, medium
//! as `•`, large as full blocks. Opacity below one dims the points.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    symbols::Marker,
    text::Span,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Widget},
};

use dashlab_core::charts::ScatterParams;

use crate::theme::Theme;

pub struct ScatterChart<'a> {
    params: &'a ScatterParams,
    theme: &'a Theme,
}

impl<'a> ScatterChart<'a> {
    pub fn new(params: &'a ScatterParams, theme: &'a Theme) -> Self {
        Self { params, theme }
    }
}

/// Bucket 0..=2 for a marker diameter.
pub fn size_bucket(marker: f64, size_max: f64) -> usize {
    if size_max <= 0.0 {
        return 0;
    }
    let frac = marker / size_max;
    if frac > 0.85 {
        2
    } else if frac > 0.6 {
        1
    } else {
        0
    }
}

const BUCKET_MARKERS: [Marker; 3] = [Marker::Braille, Marker::Dot, Marker::Block];

impl<'a> Widget for ScatterChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let p = self.params;
        let title = match &p.size_label {
            Some(label) => format!(" {} | {} points | size: {} ", p.title, p.points.len(), label),
            None => format!(" {} | {} points ", p.title, p.points.len()),
        };
        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.accent))
            .style(Style::default().bg(self.theme.background));

        if p.points.is_empty() {
            block.render(area, buf);
            return;
        }

        let mut buckets: [Vec<(f64, f64)>; 3] = Default::default();
        for point in &p.points {
            let bucket = if p.size_label.is_some() {
                size_bucket(point.marker, p.size_max)
            } else {
                0
            };
            buckets[bucket].push((point.x, point.y));
        }

        let mut style = Style::default().fg(self.theme.accent);
        if p.opacity < 1.0 {
            style = style.add_modifier(Modifier::DIM);
        }

        let datasets: Vec<Dataset> = buckets
            .iter()
            .zip(BUCKET_MARKERS)
            .filter(|(points, _)| !points.is_empty())
            .map(|(points, marker)| {
                Dataset::default()
                    .marker(marker)
                    .graph_type(GraphType::Scatter)
                    .style(style)
                    .data(points)
            })
            .collect();

        let (x_min, x_max) = bounds(p.points.iter().map(|pt| pt.x));
        let (y_min, y_max) = bounds(p.points.iter().map(|pt| pt.y));

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
                    .bounds([y_min, y_max])
                    .labels(vec![
                        Span::styled(format!("{y_min:.1}"), muted),
                        Span::styled(format!("{y_max:.1}"), muted),
                    ]),
            )
            .render(area, buf);
    }
}

/// Padded `[min, max]`; a flat range widens by one on each side.
fn bounds(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (lo, hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if hi > lo {
        let pad = (hi - lo) * 0.05;
        (lo - pad, hi + pad)
    } else {
        (lo - 1.0, hi + 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panels::buffer_text;
    use dashlab_core::charts::ScatterPoint;
    use proptest::prelude::*;

    fn params(sized: bool) -> ScatterParams {
        let points = [(16.99, 1.01, 2.0), (10.34, 1.66, 3.0), (24.59, 3.61, 4.0)]
            .into_iter()
            .map(|(x, y, s)| ScatterPoint {
                x,
                y,
                size: sized.then_some(s),
                marker: if sized { 15.0 * (s / 4.0f64).sqrt() } else { 10.0 },
            })
            .collect();
        ScatterParams {
            title: "Total bill vs tip".into(),
            x_label: "Total bill ($)".into(),
            y_label: "Tip ($)".into(),
            size_label: sized.then(|| "Party size".to_string()),
            opacity: 0.7,
            size_max: if sized { 15.0 } else { 10.0 },
            points,
        }
    }

    #[test]
    fn buckets_by_relative_marker_size() {
        assert_eq!(size_bucket(15.0, 15.0), 2);
        assert_eq!(size_bucket(15.0 * 0.75f64.sqrt(), 15.0), 2);
        assert_eq!(size_bucket(15.0 * 0.5f64.sqrt(), 15.0), 1);
        assert_eq!(size_bucket(15.0 * 0.25f64.sqrt(), 15.0), 0);
        assert_eq!(size_bucket(3.0, 0.0), 0);
    }

    #[test]
    fn plain_scatter_title() {
        let theme = Theme::default();
        let p = params(false);
        let area = Rect::new(0, 0, 80, 20);
        let mut buf = Buffer::empty(area);
        ScatterChart::new(&p, &theme).render(area, &mut buf);
        assert!(buffer_text(&buf).contains("Total bill vs tip | 3 points"));
    }

    #[test]
    fn sized_scatter_names_size_column() {
        let theme = Theme::default();
        let p = params(true);
        let area = Rect::new(0, 0, 100, 20);
        let mut buf = Buffer::empty(area);
        ScatterChart::new(&p, &theme).render(area, &mut buf);
        assert!(buffer_text(&buf).contains("size: Party size"));
    }

    #[test]
    fn flat_bounds_are_widened() {
        assert_eq!(bounds([2.0, 2.0].into_iter()), (1.0, 3.0));
    }

    proptest! {
        #[test]
        fn bucket_grows_with_marker(a in 0.0f64..15.0, b in 0.0f64..15.0) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(size_bucket(lo, 15.0) <= size_bucket(hi, 15.0));
        }
    }
}

//! Chart widgets
//!
//! - SeriesChart: date-indexed line (Close, daily average tip)
//! - HistogramChart: bars plus smoothed density
//! - ScatterChart: bill vs tip, optionally sized by party size

pub mod histogram_chart;
pub mod scatter_chart;
pub mod series_chart;

pub use histogram_chart::HistogramChart;
pub use scatter_chart::ScatterChart;
pub use series_chart::SeriesChart;

/// Flatten a buffer into one string, row by row.
#[cfg(test)]
pub fn buffer_text(buf: &ratatui::buffer::Buffer) -> String {
    let area = buf.area;
    let mut content = String::new();
    for y in area.y..area.y + area.height {
        for x in area.x..area.x + area.width {
            if let Some(cell) = buf.cell((x, y)) {
                content.push_str(cell.symbol());
            }
        }
        content.push('\n');
    }
    content
}

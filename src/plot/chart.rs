//! Top-N keyword charts rendered to SVG with Plotters.
//!
//! Keywords form a categorical x axis in rank order. The y axis always starts
//! at zero and its upper bound comes from the data.

use std::path::Path;

use plotters::prelude::*;

use crate::domain::KeywordTotal;
use crate::error::{AppError, EXIT_DATA};

const CHART_SIZE: (u32, u32) = (1000, 600);
/// Headroom above the largest total, as a fraction of it.
const Y_HEADROOM: f64 = 0.10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Line,
    Bar,
}

/// Y axis range for a set of totals: `[0, max * 1.1]`, never narrower than 1.
pub fn y_bounds(totals: &[KeywordTotal]) -> (f64, f64) {
    let max = totals.iter().map(|t| t.total).max().unwrap_or(0).max(0) as f64;
    let top = (max * (1.0 + Y_HEADROOM)).max(1.0);
    (0.0, top)
}

/// Render `totals` as a line or bar chart into an SVG file.
pub fn render_top_chart(path: &Path, title: &str, totals: &[KeywordTotal], kind: ChartKind) -> Result<(), AppError> {
    if totals.is_empty() {
        return Err(AppError::new(EXIT_DATA, "No keyword totals to chart."));
    }

    draw(path, title, totals, kind)
        .map_err(|e| AppError::export(format!("Failed to render chart '{}': {e}", path.display())))?;
    log::info!("Wrote {} ({kind:?} chart, {} keyword(s))", path.display(), totals.len());
    Ok(())
}

fn draw(path: &Path, title: &str, totals: &[KeywordTotal], kind: ChartKind) -> Result<(), Box<dyn std::error::Error>> {
    let root = SVGBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let n = totals.len() as i32;
    let (y0, y1) = y_bounds(totals);
    let labels: Vec<String> = totals.iter().map(|t| t.keyword.clone()).collect();

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 24))
        .margin(20)
        .set_label_area_size(LabelAreaPosition::Left, 70)
        .set_label_area_size(LabelAreaPosition::Bottom, 50)
        .build_cartesian_2d((0..n).into_segmented(), y0..y1)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc("keyword")
        .y_desc("value")
        .x_labels(labels.len())
        .x_label_formatter(&|v| match v {
            SegmentValue::CenterOf(i) => labels.get(*i as usize).cloned().unwrap_or_default(),
            _ => String::new(),
        })
        .label_style(("sans-serif", 14))
        .draw()?;

    let color = RGBColor(31, 119, 180);
    match kind {
        ChartKind::Line => {
            let points: Vec<(SegmentValue<i32>, f64)> = totals
                .iter()
                .enumerate()
                .map(|(i, t)| (SegmentValue::CenterOf(i as i32), t.total as f64))
                .collect();
            chart.draw_series(LineSeries::new(points.iter().cloned(), color.stroke_width(2)))?;
            chart.draw_series(points.iter().map(|p| Circle::new(p.clone(), 4, color.filled())))?;
        }
        ChartKind::Bar => {
            chart.draw_series(totals.iter().enumerate().map(|(i, t)| {
                let i = i as i32;
                let mut bar = Rectangle::new(
                    [(SegmentValue::Exact(i), 0.0), (SegmentValue::Exact(i + 1), t.total as f64)],
                    color.filled(),
                );
                bar.set_margin(0, 0, 12, 12);
                bar
            }))?;
        }
    }

    root.present()?;
    Ok(())
}

//! Expenses-by-date line chart

use std::path::{Path, PathBuf};

use log::info;
use plotters::prelude::*;

use super::chart_err;
use super::palette::RD_BU;
use super::spline::catmull_rom;
use crate::config::ChartSettings;
use crate::error::ReportResult;
use crate::models::DateTotals;

/// Interpolated samples drawn between two dates
const SAMPLES_PER_SEGMENT: usize = 12;

/// Most dates labelled on the x axis
const MAX_X_LABELS: usize = 12;

/// Dates as axis labels plus `(index, amount)` points, in first-seen order
pub fn date_series(totals: &DateTotals) -> (Vec<String>, Vec<(f64, f64)>) {
    totals
        .iter()
        .enumerate()
        .map(|(i, (date, amount))| (date.to_string(), (i as f64, amount.to_f64())))
        .unzip()
}

/// Label for an x-axis position; only whole indices carry a date
pub fn axis_label(labels: &[String], x: f64) -> String {
    let index = x.round();
    if (x - index).abs() > 1e-6 || index < 0.0 {
        return String::new();
    }
    labels.get(index as usize).cloned().unwrap_or_default()
}

/// Whole-index tick positions for `count` dates, at most [`MAX_X_LABELS`]
///
/// Long months are thinned to every n-th date, always starting at the first.
pub fn tick_positions(count: usize) -> Vec<f64> {
    let stride = count.div_ceil(MAX_X_LABELS).max(1);
    (0..count).step_by(stride).map(|i| i as f64).collect()
}

/// Vertical range covering the smoothed curve with some headroom
pub fn y_range(curve: &[(f64, f64)]) -> (f64, f64) {
    let max = curve.iter().map(|p| p.1).fold(0.0_f64, f64::max);
    let min = curve.iter().map(|p| p.1).fold(0.0_f64, f64::min);
    let top = if max > 0.0 { max * 1.1 } else { 1.0 };
    let bottom = if min < 0.0 { min * 1.1 } else { 0.0 };
    (bottom, top)
}

/// Render the per-date totals as a smoothed line chart PNG at `path`
pub fn render_date_chart(
    totals: &DateTotals,
    path: &Path,
    size: ChartSettings,
    currency_label: &str,
) -> ReportResult<PathBuf> {
    let (labels, points) = date_series(totals);
    let curve = catmull_rom(&points, SAMPLES_PER_SEGMENT);
    let (y_min, y_max) = y_range(&curve);
    let x_max = labels.len().max(1) as f64 - 0.5;
    let line_color = RD_BU[9];

    let root = BitMapBackend::new(path, (size.width, size.height)).into_drawing_area();
    root.fill(&WHITE).map_err(chart_err)?;

    let mut chart = ChartBuilder::on(&root)
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(
            (-0.5_f64..x_max).with_key_points(tick_positions(labels.len())),
            y_min..y_max,
        )
        .map_err(chart_err)?;

    let y_desc = format!("Amount ({})", currency_label);
    let formatter = |x: &f64| axis_label(&labels, *x);
    chart
        .configure_mesh()
        .x_desc("Date")
        .y_desc(y_desc.as_str())
        .x_labels(MAX_X_LABELS)
        .x_label_formatter(&formatter)
        .draw()
        .map_err(chart_err)?;

    chart
        .draw_series(LineSeries::new(curve, line_color.stroke_width(2)))
        .map_err(chart_err)?;
    chart
        .draw_series(
            points
                .iter()
                .map(|&(x, y)| Circle::new((x, y), 3, line_color.filled())),
        )
        .map_err(chart_err)?;

    root.present().map_err(chart_err)?;
    info!("Date chart written to {}", path.display());
    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;
    use printpdf::image_crate::image_dimensions;
    use tempfile::TempDir;

    fn totals() -> DateTotals {
        let mut totals = DateTotals::new();
        totals.add("2024-02-01", Money::from_cents(1500)).unwrap();
        totals.add("2024-02-02", Money::from_cents(350)).unwrap();
        totals
    }

    #[test]
    fn test_date_series_keeps_order() {
        let (labels, points) = date_series(&totals());
        assert_eq!(labels, vec!["2024-02-01", "2024-02-02"]);
        assert_eq!(points, vec![(0.0, 15.0), (1.0, 3.5)]);
    }

    #[test]
    fn test_axis_label() {
        let (labels, _) = date_series(&totals());
        assert_eq!(axis_label(&labels, 0.0), "2024-02-01");
        assert_eq!(axis_label(&labels, 1.0), "2024-02-02");
        assert_eq!(axis_label(&labels, 0.5), "");
        assert_eq!(axis_label(&labels, -1.0), "");
        assert_eq!(axis_label(&labels, 7.0), "");
    }

    #[test]
    fn test_y_range() {
        assert_eq!(y_range(&[]), (0.0, 1.0));
        let (bottom, top) = y_range(&[(0.0, 10.0), (1.0, -2.0)]);
        assert!((top - 11.0).abs() < 1e-9);
        assert!((bottom + 2.2).abs() < 1e-9);
    }

    #[test]
    fn test_tick_positions_land_on_dates() {
        assert!(tick_positions(0).is_empty());
        assert_eq!(tick_positions(3), vec![0.0, 1.0, 2.0]);
        assert_eq!(tick_positions(12).len(), 12);

        let month: Vec<String> = (1..=29).map(|d| format!("2024-02-{:02}", d)).collect();
        let ticks = tick_positions(month.len());
        assert_eq!(ticks, vec![0.0, 3.0, 6.0, 9.0, 12.0, 15.0, 18.0, 21.0, 24.0, 27.0]);
        assert!(ticks.iter().all(|&x| !axis_label(&month, x).is_empty()));
    }

    #[test]
    fn test_render_writes_png_of_configured_size() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("dates.png");

        let written =
            render_date_chart(&totals(), &path, ChartSettings::default(), "eur.").unwrap();

        assert_eq!(written, path);
        assert_eq!(image_dimensions(&path).unwrap(), (700, 450));
    }

    #[test]
    fn test_render_empty_and_single_date() {
        let temp = TempDir::new().unwrap();
        let size = ChartSettings {
            width: 320,
            height: 200,
        };

        let empty = temp.path().join("empty.png");
        render_date_chart(&DateTotals::new(), &empty, size, "eur.").unwrap();
        assert_eq!(image_dimensions(&empty).unwrap(), (320, 200));

        let mut one = DateTotals::new();
        one.add("2024-02-01", Money::from_cents(999)).unwrap();
        let single = temp.path().join("single.png");
        render_date_chart(&one, &single, size, "eur.").unwrap();
        assert_eq!(image_dimensions(&single).unwrap(), (320, 200));
    }
}

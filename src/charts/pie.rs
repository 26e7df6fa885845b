//! Category pie chart

use std::f64::consts::PI;
use std::path::{Path, PathBuf};

use log::info;
use plotters::element::Pie;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use super::palette::{color_at, contrast_text};
use super::chart_err;
use crate::config::ChartSettings;
use crate::error::ReportResult;
use crate::models::CategoryTotals;

/// One wedge of the pie
#[derive(Debug, Clone, PartialEq)]
pub struct Slice {
    pub label: String,
    pub value: f64,
    pub color: RGBColor,
}

/// Wedges for every category with a non-zero total
///
/// Colors follow declared category order, so a category keeps its color
/// whether or not its neighbours have expenses.
pub fn pie_slices(totals: &CategoryTotals) -> Vec<Slice> {
    totals
        .iter()
        .enumerate()
        .filter(|(_, (_, amount))| amount.is_positive())
        .map(|(i, (label, amount))| Slice {
            label: label.to_string(),
            value: amount.to_f64(),
            color: color_at(i),
        })
        .collect()
}

/// Angle of the first wedge edge, straight up
const START_ANGLE_DEG: f64 = -90.0;

/// Percentage text for one wedge, centered halfway along its bisector
#[derive(Debug, Clone, PartialEq)]
pub struct PercentLabel {
    pub text: String,
    pub at: (i32, i32),
    pub color: RGBColor,
}

/// Percentage labels for `slices`, each colored against its own wedge
pub fn percent_labels(slices: &[Slice], center: (i32, i32), radius: f64) -> Vec<PercentLabel> {
    let total: f64 = slices.iter().map(|s| s.value).sum();
    if total <= 0.0 {
        return Vec::new();
    }

    let mut theta = START_ANGLE_DEG.to_radians();
    slices
        .iter()
        .map(|slice| {
            let ratio = slice.value / total;
            let middle = theta + ratio * PI;
            theta += ratio * 2.0 * PI;
            let (sin, cos) = middle.sin_cos();
            PercentLabel {
                text: format!("{:.1}%", ratio * 100.0),
                at: (
                    (f64::from(center.0) + radius / 2.0 * cos).round() as i32,
                    (f64::from(center.1) + radius / 2.0 * sin).round() as i32,
                ),
                color: contrast_text(slice.color),
            }
        })
        .collect()
}

/// Render the category totals as a pie chart PNG at `path`
pub fn render_category_chart(
    totals: &CategoryTotals,
    path: &Path,
    size: ChartSettings,
) -> ReportResult<PathBuf> {
    let slices = pie_slices(totals);
    let (width, height) = (size.width, size.height);

    let root = BitMapBackend::new(path, (width, height)).into_drawing_area();
    root.fill(&WHITE).map_err(chart_err)?;

    if slices.is_empty() {
        let style = ("sans-serif", 24)
            .into_font()
            .color(&BLACK)
            .pos(Pos::new(HPos::Center, VPos::Center));
        root.draw(&Text::new(
            "No expenses",
            ((width / 2) as i32, (height / 2) as i32),
            style,
        ))
        .map_err(chart_err)?;
    } else {
        let (pie_area, legend_area) = root.split_horizontally((width * 7 / 10) as i32);

        let (pie_w, pie_h) = pie_area.dim_in_pixel();
        let center = ((pie_w / 2) as i32, (pie_h / 2) as i32);
        let radius = f64::from(pie_w.min(pie_h)) * 0.38;

        let sizes: Vec<f64> = slices.iter().map(|s| s.value).collect();
        let colors: Vec<RGBColor> = slices.iter().map(|s| s.color).collect();
        let labels: Vec<&str> = slices.iter().map(|s| s.label.as_str()).collect();

        let mut pie = Pie::new(&center, &radius, &sizes, &colors, &labels);
        pie.start_angle(START_ANGLE_DEG);
        pie.label_style(("sans-serif", 14).into_font().color(&BLACK));
        pie_area.draw(&pie).map_err(chart_err)?;

        for label in percent_labels(&slices, center, radius) {
            let style = ("sans-serif", 13)
                .into_font()
                .color(&label.color)
                .pos(Pos::new(HPos::Center, VPos::Center));
            pie_area
                .draw(&Text::new(label.text, label.at, style))
                .map_err(chart_err)?;
        }

        draw_legend(&legend_area, &slices)?;
    }

    root.present().map_err(chart_err)?;
    info!("Category chart written to {}", path.display());
    Ok(path.to_path_buf())
}

fn draw_legend(
    area: &DrawingArea<BitMapBackend<'_>, Shift>,
    slices: &[Slice],
) -> ReportResult<()> {
    let row_height = 22;
    let top = 40;

    for (i, slice) in slices.iter().enumerate() {
        let y = top + i as i32 * row_height;
        area.draw(&Rectangle::new(
            [(10, y), (24, y + 14)],
            slice.color.filled(),
        ))
        .map_err(chart_err)?;
        area.draw(&Rectangle::new([(10, y), (24, y + 14)], BLACK.stroke_width(1)))
            .map_err(chart_err)?;
        area.draw(&Text::new(
            slice.label.clone(),
            (32, y),
            ("sans-serif", 14).into_font().color(&BLACK),
        ))
        .map_err(chart_err)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::palette::RD_BU;
    use crate::error::ReportError;
    use crate::models::Money;
    use printpdf::image_crate::{image_dimensions, open};
    use tempfile::TempDir;

    #[test]
    fn test_slices_skip_zero_categories() {
        let mut totals = CategoryTotals::new();
        totals.add("Food", Money::from_cents(1500)).unwrap();
        totals.seed("Rent");
        totals.add("Transport", Money::from_cents(350)).unwrap();

        let slices = pie_slices(&totals);
        assert_eq!(slices.len(), 2);
        assert_eq!(slices[0].label, "Food");
        assert_eq!(slices[0].value, 15.0);
        assert_eq!(slices[0].color, RD_BU[0]);
        // Transport keeps its position-based color even though Rent is skipped
        assert_eq!(slices[1].label, "Transport");
        assert_eq!(slices[1].color, RD_BU[2]);
    }

    #[test]
    fn test_no_slices_when_all_zero() {
        let mut totals = CategoryTotals::new();
        totals.seed("Food");
        assert!(pie_slices(&totals).is_empty());
    }

    fn slice(label: &str, value: f64, color: RGBColor) -> Slice {
        Slice {
            label: label.to_string(),
            value,
            color,
        }
    }

    #[test]
    fn test_percent_labels_contrast_per_wedge() {
        let slices = vec![slice("Food", 1.0, RD_BU[0]), slice("Fun", 1.0, RD_BU[5])];
        let labels = percent_labels(&slices, (100, 100), 80.0);

        assert_eq!(labels.len(), 2);
        assert_eq!(labels[0].text, "50.0%");
        assert_eq!(labels[0].color, contrast_text(RD_BU[0]));
        assert_eq!(labels[1].color, contrast_text(RD_BU[5]));
        assert_ne!(labels[0].color, labels[1].color);
        // First wedge runs clockwise from the top, so its middle is on the right
        assert_eq!(labels[0].at, (140, 100));
        assert_eq!(labels[1].at, (60, 100));
    }

    #[test]
    fn test_percent_labels_single_slice() {
        let labels = percent_labels(&[slice("Food", 3.5, RD_BU[9])], (50, 50), 40.0);
        assert_eq!(labels.len(), 1);
        assert_eq!(labels[0].text, "100.0%");
        assert_eq!(labels[0].at, (50, 70));
        assert!(percent_labels(&[], (50, 50), 40.0).is_empty());
    }

    #[test]
    fn test_render_writes_png_of_configured_size() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("category.png");
        let mut totals = CategoryTotals::new();
        totals.add("Food", Money::from_cents(1500)).unwrap();
        totals.add("Transport", Money::from_cents(350)).unwrap();

        let written = render_category_chart(&totals, &path, ChartSettings::default()).unwrap();

        assert_eq!(written, path);
        assert_eq!(image_dimensions(&path).unwrap(), (700, 450));
    }

    #[test]
    fn test_render_all_zero_draws_placeholder() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("category.png");
        let mut totals = CategoryTotals::new();
        totals.seed("Food");
        totals.seed("Rent");

        render_category_chart(&totals, &path, ChartSettings::default()).unwrap();

        let image = open(&path).unwrap().to_rgb8();
        assert_eq!(image.dimensions(), (700, 450));
        assert!(image.pixels().any(|p| p.0 != [255, 255, 255]));
    }

    #[test]
    fn test_render_into_missing_dir_fails() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("missing").join("category.png");
        let mut totals = CategoryTotals::new();
        totals.add("Food", Money::from_cents(100)).unwrap();

        let err = render_category_chart(&totals, &path, ChartSettings::default()).unwrap_err();
        assert!(matches!(err, ReportError::Chart(_)));
    }
}

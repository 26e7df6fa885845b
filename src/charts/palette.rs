//! Sequential RdBu palette (dark red through white to dark blue)

use plotters::style::RGBColor;

/// Colors of the RdBu sequential scale, in order
pub const RD_BU: [RGBColor; 11] = [
    RGBColor(103, 0, 31),
    RGBColor(178, 24, 43),
    RGBColor(214, 96, 77),
    RGBColor(244, 165, 130),
    RGBColor(253, 219, 199),
    RGBColor(247, 247, 247),
    RGBColor(209, 229, 240),
    RGBColor(146, 197, 222),
    RGBColor(67, 147, 195),
    RGBColor(33, 102, 172),
    RGBColor(5, 48, 97),
];

/// Color for the `index`-th series, cycling through the palette
pub fn color_at(index: usize) -> RGBColor {
    RD_BU[index % RD_BU.len()]
}

/// Black or white, whichever reads better on `background`
pub fn contrast_text(background: RGBColor) -> RGBColor {
    let RGBColor(r, g, b) = background;
    let luma = 0.299 * f64::from(r) + 0.587 * f64::from(g) + 0.114 * f64::from(b);
    if luma > 150.0 {
        RGBColor(0, 0, 0)
    } else {
        RGBColor(255, 255, 255)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_cycles() {
        assert_eq!(color_at(0), RD_BU[0]);
        assert_eq!(color_at(10), RD_BU[10]);
        assert_eq!(color_at(11), RD_BU[0]);
        assert_eq!(color_at(13), RD_BU[2]);
    }

    #[test]
    fn test_contrast_text() {
        assert_eq!(contrast_text(RD_BU[0]), RGBColor(255, 255, 255));
        assert_eq!(contrast_text(RD_BU[5]), RGBColor(0, 0, 0));
    }
}

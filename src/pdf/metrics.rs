//! Glyph widths of the built-in Helvetica fonts
//!
//! Widths are in thousandths of the font size for printable ASCII
//! (0x20..=0x7E). Other characters fall back to the width of a digit.

use super::layout::FontStyle;

const FALLBACK_WIDTH: u16 = 556;

#[rustfmt::skip]
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

fn glyph_width(table: &[u16; 95], c: char) -> u16 {
    let code = c as u32;
    if (0x20..=0x7E).contains(&code) {
        table[(code - 0x20) as usize]
    } else {
        FALLBACK_WIDTH
    }
}

/// Width of `text` in millimetres at `size_pt`
pub fn text_width_mm(text: &str, style: FontStyle, size_pt: f32) -> f32 {
    let table = match style {
        FontStyle::Regular => &HELVETICA,
        FontStyle::Bold => &HELVETICA_BOLD,
    };
    let units: u32 = text.chars().map(|c| u32::from(glyph_width(table, c))).sum();
    units as f32 * size_pt / 1000.0 / super::layout::PT_PER_MM
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_widths() {
        assert_eq!(glyph_width(&HELVETICA, ' '), 278);
        assert_eq!(glyph_width(&HELVETICA, 'A'), 667);
        assert_eq!(glyph_width(&HELVETICA, '~'), 584);
        assert_eq!(glyph_width(&HELVETICA_BOLD, 'i'), 278);
        assert_eq!(glyph_width(&HELVETICA_BOLD, '€'), FALLBACK_WIDTH);
    }

    #[test]
    fn test_bold_is_wider() {
        let regular = text_width_mm("Monthly expenses report", FontStyle::Regular, 24.0);
        let bold = text_width_mm("Monthly expenses report", FontStyle::Bold, 24.0);
        assert!(bold > regular);
    }

    #[test]
    fn test_width_scales_with_size() {
        // Ten digits at 10pt: 10 * 556 / 1000 * 10pt = 55.6pt
        let width = text_width_mm("0123456789", FontStyle::Regular, 10.0);
        assert!((width - 55.6 / PT_PER_MM_TEST).abs() < 1e-3);
        assert_eq!(text_width_mm("", FontStyle::Bold, 12.0), 0.0);
    }

    const PT_PER_MM_TEST: f32 = 72.0 / 25.4;
}

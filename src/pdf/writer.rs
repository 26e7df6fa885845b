//! Serialize laid-out pages with printpdf

use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;

use log::{debug, info};
use printpdf::image_crate::codecs::png::PngDecoder;
use printpdf::{
    BuiltinFont, Image, ImageTransform, IndirectFontRef, Line, Mm, PdfDocument,
    PdfLayerReference, Point,
};

use super::layout::{Element, FontStyle, Page, PAGE_HEIGHT, PAGE_WIDTH};
use crate::error::{ReportError, ReportResult};

/// 0.2 mm, the usual cell border width
const BORDER_WIDTH_PT: f32 = 0.567;
const LAYER_NAME: &str = "Content";

fn pdf_err<E: std::fmt::Display>(err: E) -> ReportError {
    ReportError::Pdf(err.to_string())
}

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

impl Fonts {
    fn get(&self, style: FontStyle) -> &IndirectFontRef {
        match style {
            FontStyle::Regular => &self.regular,
            FontStyle::Bold => &self.bold,
        }
    }
}

/// Write `pages` as a PDF document at `path`
pub fn write_pdf(title: &str, pages: &[Page], path: &Path) -> ReportResult<()> {
    let (doc, first_page, first_layer) =
        PdfDocument::new(title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), LAYER_NAME);
    let fonts = Fonts {
        regular: doc.add_builtin_font(BuiltinFont::Helvetica).map_err(pdf_err)?,
        bold: doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(pdf_err)?,
    };

    let mut layer = doc.get_page(first_page).get_layer(first_layer);
    for (i, page) in pages.iter().enumerate() {
        if i > 0 {
            let (page_index, layer_index) = doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), LAYER_NAME);
            layer = doc.get_page(page_index).get_layer(layer_index);
        }
        layer.set_outline_thickness(BORDER_WIDTH_PT);
        for element in &page.elements {
            draw_element(&layer, &fonts, element)?;
        }
    }

    let bytes = doc.save_to_bytes().map_err(pdf_err)?;
    fs::write(path, bytes)?;
    info!("Report written to {} ({} pages)", path.display(), pages.len().max(1));
    Ok(())
}

/// Flip a top-down millimetre coordinate into PDF space
fn flip(y: f32) -> Mm {
    Mm(PAGE_HEIGHT - y)
}

fn draw_element(layer: &PdfLayerReference, fonts: &Fonts, element: &Element) -> ReportResult<()> {
    match element {
        Element::Text {
            x,
            y,
            size_pt,
            style,
            text,
        } => {
            layer.use_text(text.as_str(), *size_pt, Mm(*x), flip(*y), fonts.get(*style));
        }
        Element::Rect { x, y, w, h } => {
            let corners = [(*x, *y), (x + w, *y), (x + w, y + h), (*x, y + h)];
            layer.add_line(Line {
                points: corners
                    .iter()
                    .map(|&(px, py)| (Point::new(Mm(px), flip(py)), false))
                    .collect(),
                is_closed: true,
            });
        }
        Element::Image { path, x, y, w, h } => {
            draw_image(layer, path, *x, *y, *w, *h)?;
        }
    }
    Ok(())
}

/// Embed a PNG stretched to `w` × `h` millimetres with its top-left at (`x`, `y`)
fn draw_image(
    layer: &PdfLayerReference,
    path: &Path,
    x: f32,
    y: f32,
    w: f32,
    h: f32,
) -> ReportResult<()> {
    let file = File::open(path)?;
    let decoder = PngDecoder::new(BufReader::new(file)).map_err(pdf_err)?;
    let image = Image::try_from(decoder).map_err(pdf_err)?;

    let px_width = image.image.width.0 as f32;
    let px_height = image.image.height.0 as f32;
    if px_width == 0.0 || px_height == 0.0 {
        return Err(ReportError::Pdf(format!(
            "Image {} has no pixels",
            path.display()
        )));
    }

    // At this dpi the image is exactly `w` wide; height is scaled to fit
    let dpi = px_width * 25.4 / w;
    let natural_height = px_height * 25.4 / dpi;
    debug!(
        "Embedding {} ({}x{} px) at {:.1} dpi",
        path.display(),
        px_width,
        px_height,
        dpi
    );

    image.add_to_layer(
        layer.clone(),
        ImageTransform {
            translate_x: Some(Mm(x)),
            translate_y: Some(flip(y + h)),
            scale_y: Some(h / natural_height),
            dpi: Some(dpi),
            ..Default::default()
        },
    );
    Ok(())
}

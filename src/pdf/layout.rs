//! Page layout for the PDF report
//!
//! [`ReportBuilder`] keeps a cursor on an A4 page and turns titles,
//! paragraphs, charts and tables into positioned [`Element`]s. All
//! coordinates are millimetres measured from the top-left page corner.
//! Nothing touches the filesystem until [`ReportBuilder::output`].

use std::path::{Path, PathBuf};

use log::debug;

use super::metrics::text_width_mm;
use super::writer;
use crate::error::{ReportError, ReportResult};

pub const PAGE_WIDTH: f32 = 210.0;
pub const PAGE_HEIGHT: f32 = 297.0;
pub const SIDE_MARGIN: f32 = 10.0;
pub const TOP_MARGIN: f32 = 10.0;
/// Content may not extend below this distance from the bottom edge
pub const BREAK_MARGIN: f32 = 20.0;
pub const CELL_PADDING: f32 = 1.0;
pub const PT_PER_MM: f32 = 72.0 / 25.4;

pub const CHART_X: f32 = 40.0;
pub const CHART_WIDTH: f32 = 140.0;
pub const CHART_HEIGHT: f32 = 90.0;
pub const TABLE_ROW_HEIGHT: f32 = 9.0;

const TITLE_SIZE: f32 = 24.0;
const SUBTITLE_SIZE: f32 = 16.0;
const SUBTITLE_HEIGHT: f32 = 24.0;
const PARAGRAPH_SIZE: f32 = 16.0;
const PARAGRAPH_GAP: f32 = 10.0;
const TABLE_SIZE: f32 = 12.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontStyle {
    Regular,
    Bold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
}

/// Where the cursor goes after a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Next {
    /// Right of the cell, same line
    Right,
    /// Left margin, below the cell
    NextLine,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    /// Text with its baseline at `y`
    Text {
        x: f32,
        y: f32,
        size_pt: f32,
        style: FontStyle,
        text: String,
    },
    Image {
        path: PathBuf,
        x: f32,
        y: f32,
        w: f32,
        h: f32,
    },
    /// Cell border
    Rect { x: f32, y: f32, w: f32, h: f32 },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub elements: Vec<Element>,
}

impl Page {
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.elements.iter().filter_map(|e| match e {
            Element::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn rects(&self) -> impl Iterator<Item = (f32, f32, f32, f32)> + '_ {
        self.elements.iter().filter_map(|e| match *e {
            Element::Rect { x, y, w, h } => Some((x, y, w, h)),
            _ => None,
        })
    }
}

/// What `add_table` laid out
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableStats {
    /// Rendered rows, header included
    pub rows: usize,
    pub column_width: f32,
}

#[derive(Debug)]
pub struct ReportBuilder {
    title: String,
    pages: Vec<Page>,
    x: f32,
    y: f32,
    style: FontStyle,
    size_pt: f32,
}

impl Default for ReportBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportBuilder {
    /// Empty document; call [`add_page`](Self::add_page) before adding content
    pub fn new() -> Self {
        Self {
            title: String::new(),
            pages: Vec::new(),
            x: SIDE_MARGIN,
            y: TOP_MARGIN,
            style: FontStyle::Regular,
            size_pt: TABLE_SIZE,
        }
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn cursor(&self) -> (f32, f32) {
        (self.x, self.y)
    }

    pub fn set_x(&mut self, x: f32) {
        self.x = x;
    }

    pub fn add_page(&mut self) {
        self.pages.push(Page::default());
        self.x = SIDE_MARGIN;
        self.y = TOP_MARGIN;
    }

    /// Move to the left margin, `h` millimetres down
    pub fn ln(&mut self, h: f32) {
        self.x = SIDE_MARGIN;
        self.y += h;
    }

    /// Centered bold heading; also used as the document title
    pub fn set_title(&mut self, text: &str) {
        self.title = text.to_string();
        self.set_font(FontStyle::Bold, TITLE_SIZE);
        self.cell(0.0, 0.0, text, false, Align::Center, Next::NextLine);
    }

    /// Centered heading in the current style
    pub fn set_subtitle(&mut self, text: &str) {
        self.size_pt = SUBTITLE_SIZE;
        self.cell(0.0, SUBTITLE_HEIGHT, text, false, Align::Center, Next::NextLine);
    }

    pub fn add_paragraph(&mut self, text: &str) {
        self.set_x(SIDE_MARGIN);
        self.set_font(FontStyle::Bold, PARAGRAPH_SIZE);
        let h = self.font_height();
        self.cell(0.0, h, text, false, Align::Left, Next::Right);
        self.ln(PARAGRAPH_GAP);
    }

    /// Place a chart image below the cursor
    pub fn add_chart(&mut self, path: &Path) -> ReportResult<()> {
        if !path.is_file() {
            return Err(ReportError::file_not_found(path.display().to_string()));
        }
        self.set_x(CHART_X);
        self.break_page_if_needed(CHART_HEIGHT);
        let (x, y) = (self.x, self.y);
        self.current_page().elements.push(Element::Image {
            path: path.to_path_buf(),
            x,
            y,
            w: CHART_WIDTH,
            h: CHART_HEIGHT,
        });
        self.y += CHART_HEIGHT;
        Ok(())
    }

    /// Bordered table spanning the printable width
    pub fn add_table<H: AsRef<str>>(
        &mut self,
        headings: &[H],
        rows: &[Vec<String>],
    ) -> ReportResult<TableStats> {
        if headings.is_empty() {
            return Err(ReportError::Validation(
                "A table needs at least one heading".into(),
            ));
        }

        let column_width = (PAGE_WIDTH - SIDE_MARGIN * 2.0) / headings.len() as f32;
        self.set_x(SIDE_MARGIN);

        self.set_font(FontStyle::Bold, TABLE_SIZE);
        for heading in headings {
            self.table_cell(column_width, heading.as_ref());
        }
        self.ln(TABLE_ROW_HEIGHT);

        self.set_font(FontStyle::Regular, TABLE_SIZE);
        for row in rows {
            for col in row {
                self.table_cell(column_width, col);
            }
            self.ln(TABLE_ROW_HEIGHT);
        }

        Ok(TableStats {
            rows: rows.len() + 1,
            column_width,
        })
    }

    /// Serialize every page to `path`
    pub fn output(self, path: &Path) -> ReportResult<PathBuf> {
        writer::write_pdf(&self.title, &self.pages, path)?;
        Ok(path.to_path_buf())
    }

    fn set_font(&mut self, style: FontStyle, size_pt: f32) {
        self.style = style;
        self.size_pt = size_pt;
    }

    fn font_height(&self) -> f32 {
        self.size_pt / PT_PER_MM
    }

    fn table_cell(&mut self, w: f32, text: &str) {
        let available = w - 2.0 * CELL_PADDING;
        if text_width_mm(text, self.style, self.size_pt) > available {
            debug!("Table cell text overflows its column: {:?}", text);
        }
        self.cell(w, TABLE_ROW_HEIGHT, text, true, Align::Left, Next::Right);
    }

    fn current_page(&mut self) -> &mut Page {
        if self.pages.is_empty() {
            self.pages.push(Page::default());
        }
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    fn break_page_if_needed(&mut self, h: f32) {
        if self.y + h > PAGE_HEIGHT - BREAK_MARGIN && !self.current_page().elements.is_empty() {
            let x = self.x;
            debug!("Page break at y = {:.1} mm", self.y);
            self.add_page();
            self.x = x;
        }
    }

    /// Lay out one cell at the cursor; `w == 0` extends to the right margin
    fn cell(&mut self, w: f32, h: f32, text: &str, border: bool, align: Align, next: Next) {
        self.break_page_if_needed(h);

        let w = if w == 0.0 {
            PAGE_WIDTH - SIDE_MARGIN - self.x
        } else {
            w
        };
        let (x, y) = (self.x, self.y);
        let size_pt = self.size_pt;
        let style = self.style;

        if border {
            self.current_page().elements.push(Element::Rect { x, y, w, h });
        }
        if !text.is_empty() {
            let dx = match align {
                Align::Left => CELL_PADDING,
                Align::Center => (w - text_width_mm(text, style, size_pt)) / 2.0,
            };
            let baseline = y + h / 2.0 + 0.3 * size_pt / PT_PER_MM;
            self.current_page().elements.push(Element::Text {
                x: x + dx,
                y: baseline,
                size_pt,
                style,
                text: text.to_string(),
            });
        }

        match next {
            Next::Right => self.x += w,
            Next::NextLine => {
                self.x = SIDE_MARGIN;
                self.y += h;
            }
        }
    }
}

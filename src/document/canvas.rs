//! Page model for generated documents.
//!
//! Drawing happens in millimetres from the top-left corner of an A4 page.
//! The canvas records operations per page; [`super::pdf`] turns them into
//! PDF content streams.

use super::logo::EmbeddedImage;
use super::metrics::text_width_mm;

pub const A4_WIDTH_MM: f64 = 210.0;
pub const A4_HEIGHT_MM: f64 = 297.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0, 0, 0);
    pub const WHITE: Rgb = Rgb(255, 255, 255);

    pub const fn grey(level: u8) -> Rgb {
        Rgb(level, level, level)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontWeight {
    Normal,
    Bold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub size: f64,
    pub weight: FontWeight,
    pub align: Align,
    pub color: Rgb,
}

impl TextStyle {
    pub fn new(size: f64) -> Self {
        Self {
            size,
            weight: FontWeight::Normal,
            align: Align::Left,
            color: Rgb::BLACK,
        }
    }

    pub fn bold(mut self) -> Self {
        self.weight = FontWeight::Bold;
        self
    }

    pub fn centered(mut self) -> Self {
        self.align = Align::Center;
        self
    }

    pub fn right(mut self) -> Self {
        self.align = Align::Right;
        self
    }

    pub fn color(mut self, color: Rgb) -> Self {
        self.color = color;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    FillRect {
        x: f64,
        y: f64,
        w: f64,
        h: f64,
        color: Rgb,
    },
    StrokeRect {
        x: f64,
        y: f64,
        w: f64,
        h: f64,
        color: Rgb,
        line_width: f64,
    },
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        color: Rgb,
        line_width: f64,
    },
    /// `x` is the left edge after alignment has been resolved.
    Text {
        x: f64,
        y: f64,
        text: String,
        size: f64,
        weight: FontWeight,
        color: Rgb,
    },
    Image {
        x: f64,
        y: f64,
        w: f64,
        h: f64,
        index: usize,
    },
}

#[derive(Debug, Clone, Default)]
pub struct Page {
    pub ops: Vec<DrawOp>,
}

impl Page {
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

#[derive(Debug, Clone)]
pub struct Canvas {
    width: f64,
    height: f64,
    pages: Vec<Page>,
    current: usize,
    images: Vec<EmbeddedImage>,
    stroke_color: Rgb,
    line_width: f64,
}

impl Canvas {
    pub fn a4() -> Self {
        Self {
            width: A4_WIDTH_MM,
            height: A4_HEIGHT_MM,
            pages: vec![Page::default()],
            current: 0,
            images: Vec::new(),
            stroke_color: Rgb::BLACK,
            line_width: 0.2,
        }
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn images(&self) -> &[EmbeddedImage] {
        &self.images
    }

    /// Appends a page and makes it current.
    pub fn add_page(&mut self) {
        self.pages.push(Page::default());
        self.current = self.pages.len() - 1;
    }

    /// Makes an existing page current; out-of-range indexes are ignored.
    pub fn select_page(&mut self, index: usize) {
        if index < self.pages.len() {
            self.current = index;
        }
    }

    pub fn current_page(&self) -> usize {
        self.current
    }

    pub fn set_stroke(&mut self, color: Rgb, line_width: f64) {
        self.stroke_color = color;
        self.line_width = line_width;
    }

    fn push(&mut self, op: DrawOp) {
        self.pages[self.current].ops.push(op);
    }

    pub fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: Rgb) {
        self.push(DrawOp::FillRect { x, y, w, h, color });
    }

    pub fn stroke_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        let (color, line_width) = (self.stroke_color, self.line_width);
        self.push(DrawOp::StrokeRect {
            x,
            y,
            w,
            h,
            color,
            line_width,
        });
    }

    pub fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) {
        let (color, line_width) = (self.stroke_color, self.line_width);
        self.push(DrawOp::Line {
            x1,
            y1,
            x2,
            y2,
            color,
            line_width,
        });
    }

    /// Draws `text` with its baseline at `y`. Returns the baseline of the
    /// following line.
    pub fn text(&mut self, text: &str, x: f64, y: f64, style: TextStyle) -> f64 {
        let width = text_width_mm(text, style.size);
        let left = match style.align {
            Align::Left => x,
            Align::Center => x - width / 2.0,
            Align::Right => x - width,
        };
        self.push(DrawOp::Text {
            x: left,
            y,
            text: text.to_string(),
            size: style.size,
            weight: style.weight,
            color: style.color,
        });
        y + line_height(style.size)
    }

    pub fn image(&mut self, image: EmbeddedImage, x: f64, y: f64, w: f64, h: f64) {
        self.images.push(image);
        let index = self.images.len() - 1;
        self.push(DrawOp::Image { x, y, w, h, index });
    }

    /// Every text run on every page, in drawing order.
    pub fn texts(&self) -> Vec<&str> {
        self.pages.iter().flat_map(|page| page.texts()).collect()
    }
}

/// Baseline-to-baseline distance for a font size, in millimetres.
pub fn line_height(size: f64) -> f64 {
    size * 0.4
}

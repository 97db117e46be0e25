//! Page-independent drawing operations.
//!
//! Coordinates are millimetres from the top-left corner of an A4 page; text
//! `y` is the baseline. The renderer converts to PDF space.

pub const PAGE_WIDTH_MM: f32 = 210.0;
pub const PAGE_HEIGHT_MM: f32 = 297.0;

const PT_TO_MM: f32 = 0.352_78;
// Mean Helvetica advance as a share of the font size.
const AVG_GLYPH_WIDTH: f32 = 0.5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb8(pub u8, pub u8, pub u8);

impl Rgb8 {
    pub const BLACK: Self = Self(0, 0, 0);
    pub const WHITE: Self = Self(255, 255, 255);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    Text {
        x: f32,
        y: f32,
        size: f32,
        bold: bool,
        color: Rgb8,
        text: String,
    },
    FillRect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        color: Rgb8,
    },
    Line {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        width: f32,
        color: Rgb8,
    },
}

/// Style of a text run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextStyle {
    pub size: f32,
    pub bold: bool,
    pub color: Rgb8,
    pub align: Align,
}

impl TextStyle {
    pub const fn new(size: f32) -> Self {
        Self {
            size,
            bold: false,
            color: Rgb8::BLACK,
            align: Align::Left,
        }
    }

    pub const fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub const fn color(mut self, color: Rgb8) -> Self {
        self.color = color;
        self
    }

    pub const fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }
}

/// Approximate rendered width of `text` in millimetres.
pub fn text_width_mm(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size * AVG_GLYPH_WIDTH * PT_TO_MM
}

/// Characters that fit on a line of `width_mm` at `size` points.
pub fn chars_per_line(width_mm: f32, size: f32) -> usize {
    let per_char = size * AVG_GLYPH_WIDTH * PT_TO_MM;
    ((width_mm / per_char).floor() as usize).max(1)
}

/// Greedy word wrap; words longer than a line are split.
pub fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > max_chars {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let rest = word.split_off(max_chars);
            lines.push(word.into_iter().collect());
            word = rest;
        }
        let word: String = word.into_iter().collect();
        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if needed > max_chars && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(&word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Cut `text` to `max_chars`, marking the cut with `...`.
pub fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let keep = max_chars.saturating_sub(3);
    let mut out: String = text.chars().take(keep).collect();
    out.push_str("...");
    out
}

/// A multi-page document under construction.
#[derive(Clone, Debug, PartialEq)]
pub struct DocumentLayout {
    pub title: String,
    pub pages: Vec<Vec<DrawOp>>,
}

impl DocumentLayout {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            pages: vec![Vec::new()],
        }
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn add_page(&mut self) {
        self.pages.push(Vec::new());
    }

    fn current(&mut self) -> &mut Vec<DrawOp> {
        if self.pages.is_empty() {
            self.pages.push(Vec::new());
        }
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    pub fn text(&mut self, text: impl Into<String>, x: f32, y: f32, style: TextStyle) {
        let text = text.into();
        let x = match style.align {
            Align::Left => x,
            Align::Center => x - text_width_mm(&text, style.size) / 2.0,
            Align::Right => x - text_width_mm(&text, style.size),
        };
        self.current().push(DrawOp::Text {
            x,
            y,
            size: style.size,
            bold: style.bold,
            color: style.color,
            text,
        });
    }

    pub fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Rgb8) {
        self.current().push(DrawOp::FillRect {
            x,
            y,
            width,
            height,
            color,
        });
    }

    pub fn hline(&mut self, x1: f32, x2: f32, y: f32, width: f32, color: Rgb8) {
        self.line((x1, y), (x2, y), width, color);
    }

    pub fn line(&mut self, from: (f32, f32), to: (f32, f32), width: f32, color: Rgb8) {
        self.current().push(DrawOp::Line {
            x1: from.0,
            y1: from.1,
            x2: to.0,
            y2: to.1,
            width,
            color,
        });
    }

    /// Draw `text` on every page, with `{page}` and `{pages}` substituted.
    pub fn stamp_every_page(&mut self, template: &str, x: f32, y: f32, style: TextStyle) {
        let total = self.pages.len();
        for index in 0..total {
            let text = template
                .replace("{page}", &(index + 1).to_string())
                .replace("{pages}", &total.to_string());
            let width = text_width_mm(&text, style.size);
            let x = match style.align {
                Align::Left => x,
                Align::Center => x - width / 2.0,
                Align::Right => x - width,
            };
            self.pages[index].push(DrawOp::Text {
                x,
                y,
                size: style.size,
                bold: style.bold,
                color: style.color,
                text,
            });
        }
    }

    /// All text runs in page order; used by tests and the text preview.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.pages.iter().flatten().filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_on_word_boundaries() {
        assert_eq!(
            wrap_text("keep your trunk upright while sprinting", 16),
            vec!["keep your trunk", "upright while", "sprinting"]
        );
        assert_eq!(wrap_text("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
        assert!(wrap_text("   ", 10).is_empty());
    }

    #[test]
    fn truncates_with_ellipsis() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a long coach note", 10), "a long ...");
    }

    #[test]
    fn centred_text_is_shifted_left() {
        let mut doc = DocumentLayout::new("t");
        doc.text("SSTS", 100.0, 10.0, TextStyle::new(10.0).align(Align::Center));
        let DrawOp::Text { x, .. } = &doc.pages[0][0] else {
            panic!("expected text");
        };
        assert!(*x < 100.0);
    }

    #[test]
    fn stamps_page_numbers() {
        let mut doc = DocumentLayout::new("t");
        doc.add_page();
        doc.stamp_every_page("Page {page} of {pages}", 10.0, 280.0, TextStyle::new(8.0));
        let texts: Vec<&str> = doc.texts().collect();
        assert_eq!(texts, vec!["Page 1 of 2", "Page 2 of 2"]);
    }
}

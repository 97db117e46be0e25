//! Simple paginating table drawn with [`DocumentLayout`] primitives.

use super::layout::{DocumentLayout, Rgb8, TextStyle, chars_per_line, truncate};

const PT_TO_MM: f32 = 0.352_78;
const LINE_HEIGHT_FACTOR: f32 = 1.15;

#[derive(Clone, Debug, PartialEq)]
pub struct Column {
    pub title: &'static str,
    pub width: f32,
    pub bold: bool,
}

impl Column {
    pub const fn new(title: &'static str, width: f32) -> Self {
        Self {
            title,
            width,
            bold: false,
        }
    }

    pub const fn bold(mut self) -> Self {
        self.bold = true;
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TableStyle {
    pub font_size: f32,
    pub padding: f32,
    pub head_fill: Rgb8,
    pub head_text: Rgb8,
    pub body_text: Rgb8,
    pub grid: Option<Rgb8>,
    pub stripe: Option<Rgb8>,
}

impl TableStyle {
    fn row_height(&self) -> f32 {
        self.padding * 2.0 + self.font_size * PT_TO_MM * LINE_HEIGHT_FACTOR
    }

    fn baseline_offset(&self) -> f32 {
        self.padding + self.font_size * PT_TO_MM
    }
}

/// Vertical band a table may occupy on each page.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PageBand {
    /// Top of the table on continuation pages.
    pub top: f32,
    /// Rows never cross this line.
    pub bottom: f32,
}

/// Draw `rows` under a header at (`x`, `start_y`); the header repeats on
/// every continuation page. Returns the y just below the last row.
pub fn draw_table(
    doc: &mut DocumentLayout,
    x: f32,
    start_y: f32,
    columns: &[Column],
    rows: &[Vec<String>],
    style: &TableStyle,
    band: PageBand,
) -> f32 {
    let row_height = style.row_height();
    let mut y = start_y;
    if y + row_height * 2.0 > band.bottom {
        doc.add_page();
        y = band.top;
    }
    y = draw_header(doc, x, y, columns, style);
    for (index, row) in rows.iter().enumerate() {
        if y + row_height > band.bottom {
            doc.add_page();
            y = draw_header(doc, x, band.top, columns, style);
        }
        if let Some(stripe) = style.stripe
            && index % 2 == 1
        {
            doc.fill_rect(x, y, total_width(columns), row_height, stripe);
        }
        let mut cell_x = x;
        for (column, value) in columns.iter().zip(row) {
            let text = fit(value, column.width, style);
            let text_style = TextStyle::new(style.font_size).color(style.body_text);
            let text_style = if column.bold { text_style.bold() } else { text_style };
            doc.text(text, cell_x + style.padding, y + style.baseline_offset(), text_style);
            cell_x += column.width;
        }
        if let Some(grid) = style.grid {
            draw_grid_row(doc, x, y, columns, row_height, grid);
        }
        y += row_height;
    }
    y
}

fn draw_header(
    doc: &mut DocumentLayout,
    x: f32,
    y: f32,
    columns: &[Column],
    style: &TableStyle,
) -> f32 {
    let row_height = style.row_height();
    doc.fill_rect(x, y, total_width(columns), row_height, style.head_fill);
    let mut cell_x = x;
    for column in columns {
        let text = fit(column.title, column.width, style);
        doc.text(
            text,
            cell_x + style.padding,
            y + style.baseline_offset(),
            TextStyle::new(style.font_size).bold().color(style.head_text),
        );
        cell_x += column.width;
    }
    if let Some(grid) = style.grid {
        draw_grid_row(doc, x, y, columns, row_height, grid);
    }
    y + row_height
}

fn draw_grid_row(
    doc: &mut DocumentLayout,
    x: f32,
    y: f32,
    columns: &[Column],
    height: f32,
    color: Rgb8,
) {
    let right = x + total_width(columns);
    doc.hline(x, right, y, 0.1, color);
    doc.hline(x, right, y + height, 0.1, color);
    let mut edge = x;
    doc.line((edge, y), (edge, y + height), 0.1, color);
    for column in columns {
        edge += column.width;
        doc.line((edge, y), (edge, y + height), 0.1, color);
    }
}

fn fit(value: &str, width: f32, style: &TableStyle) -> String {
    truncate(value, chars_per_line(width - style.padding * 2.0, style.font_size))
}

fn total_width(columns: &[Column]) -> f32 {
    columns.iter().map(|column| column.width).sum()
}

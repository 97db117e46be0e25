//! printpdf backend for [`DocumentLayout`].

use std::path::Path;

use printpdf::path::PaintMode;
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfLayerReference, Point, Rect,
    Rgb,
};

use super::ExportError;
use super::layout::{DocumentLayout, DrawOp, PAGE_HEIGHT_MM, PAGE_WIDTH_MM, Rgb8};

const LAYER_NAME: &str = "Layer 1";
const MM_PER_PT: f32 = 0.352_78;

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

/// Render every page of `layout` into PDF bytes.
pub fn render_pdf(layout: &DocumentLayout) -> Result<Vec<u8>, ExportError> {
    let (doc, first_page, first_layer) = PdfDocument::new(
        layout.title.clone(),
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        LAYER_NAME,
    );
    let fonts = Fonts {
        regular: doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(pdf_error)?,
        bold: doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(pdf_error)?,
    };
    for (index, ops) in layout.pages.iter().enumerate() {
        let layer = if index == 0 {
            doc.get_page(first_page).get_layer(first_layer)
        } else {
            let (page, layer) = doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), LAYER_NAME);
            doc.get_page(page).get_layer(layer)
        };
        for op in ops {
            draw(&layer, op, &fonts);
        }
    }
    doc.save_to_bytes().map_err(pdf_error)
}

/// Render `layout` and write it to `path`.
pub fn write_pdf(layout: &DocumentLayout, path: &Path) -> Result<(), ExportError> {
    let bytes = render_pdf(layout)?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| ExportError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    std::fs::write(path, bytes).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn draw(layer: &PdfLayerReference, op: &DrawOp, fonts: &Fonts) {
    match op {
        DrawOp::Text {
            x,
            y,
            size,
            bold,
            color,
            text,
        } => {
            layer.set_fill_color(pdf_color(*color));
            let font = if *bold { &fonts.bold } else { &fonts.regular };
            layer.use_text(winansi_safe(text), *size, Mm(*x), flip(*y), font);
        }
        DrawOp::FillRect {
            x,
            y,
            width,
            height,
            color,
        } => {
            layer.set_fill_color(pdf_color(*color));
            let rect = Rect::new(Mm(*x), flip(*y + *height), Mm(*x + *width), flip(*y))
                .with_mode(PaintMode::Fill);
            layer.add_rect(rect);
        }
        DrawOp::Line {
            x1,
            y1,
            x2,
            y2,
            width,
            color,
        } => {
            layer.set_outline_color(pdf_color(*color));
            layer.set_outline_thickness(*width / MM_PER_PT);
            layer.add_line(Line {
                points: vec![
                    (Point::new(Mm(*x1), flip(*y1)), false),
                    (Point::new(Mm(*x2), flip(*y2)), false),
                ],
                is_closed: false,
            });
        }
    }
}

fn flip(y: f32) -> Mm {
    Mm(PAGE_HEIGHT_MM - y)
}

fn pdf_color(color: Rgb8) -> Color {
    let Rgb8(r, g, b) = color;
    Color::Rgb(Rgb::new(
        f32::from(r) / 255.0,
        f32::from(g) / 255.0,
        f32::from(b) / 255.0,
        None,
    ))
}

/// Builtin fonts only cover a single-byte encoding.
fn winansi_safe(text: &str) -> String {
    text.chars()
        .map(|ch| if ch.is_ascii() && !ch.is_ascii_control() { ch } else { '?' })
        .collect()
}

fn pdf_error(err: printpdf::Error) -> ExportError {
    ExportError::Pdf(err.to_string())
}

use crate::offer::metrics::{encode_win_ansi, wrap, Font};
use std::fmt::Write as _;

const MM_TO_PT: f32 = 72.0 / 25.4;

/// A4 portrait, in millimetres
pub const PAGE_WIDTH_MM: f32 = 210.0;
pub const PAGE_HEIGHT_MM: f32 = 297.0;
pub const MARGIN_MM: f32 = 20.0;

/// Baseline of the first line on a page
const TOP_MM: f32 = 30.0;

/// Vertical advance per line is `font size × LINE_FACTOR` millimetres
const LINE_FACTOR: f32 = 0.6;

/// Gap after every text block
const BLOCK_GAP_MM: f32 = 5.0;

/// Flowing single-column text document
///
/// Text is placed top to bottom with a cursor measured in millimetres from the
/// top edge. Blocks are word-wrapped to the column and continue on a new page
/// when the bottom margin is reached.
#[derive(Debug)]
pub struct PdfDocument {
    pages: Vec<Vec<u8>>,
    current: Vec<u8>,
    y_mm: f32,
}

impl Default for PdfDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfDocument {
    pub fn new() -> Self {
        Self {
            pages: Vec::new(),
            current: Vec::new(),
            y_mm: TOP_MM,
        }
    }

    fn column_width_pt() -> f32 {
        (PAGE_WIDTH_MM - 2.0 * MARGIN_MM) * MM_TO_PT
    }

    fn new_page(&mut self) {
        self.pages.push(std::mem::take(&mut self.current));
        self.y_mm = TOP_MM;
    }

    /// Add a wrapped block of text followed by the standard block gap
    pub fn add_text(&mut self, text: &str, size_pt: f32, font: Font) {
        let encoded = encode_win_ansi(text);
        let lines = wrap(&encoded, font, size_pt, Self::column_width_pt());
        let line_height = size_pt * LINE_FACTOR;

        for line in &lines {
            if self.y_mm + line_height > PAGE_HEIGHT_MM - MARGIN_MM {
                self.new_page();
            }
            self.write_line(line, size_pt, font);
            self.y_mm += line_height;
        }

        self.y_mm += BLOCK_GAP_MM;
    }

    /// Advance the cursor without drawing
    pub fn add_space(&mut self, mm: f32) {
        self.y_mm += mm;
        if self.y_mm > PAGE_HEIGHT_MM - MARGIN_MM {
            self.new_page();
        }
    }

    fn write_line(&mut self, line: &[u8], size_pt: f32, font: Font) {
        let x = MARGIN_MM * MM_TO_PT;
        let y = (PAGE_HEIGHT_MM - self.y_mm) * MM_TO_PT;

        self.current.extend_from_slice(
            format!("BT /{} {} Tf {:.2} {:.2} Td (", font.resource_name(), size_pt, x, y).as_bytes(),
        );
        for &byte in line {
            if matches!(byte, b'(' | b')' | b'\\') {
                self.current.push(b'\\');
            }
            self.current.push(byte);
        }
        self.current.extend_from_slice(b") Tj ET\n");
    }

    pub fn page_count(&self) -> usize {
        self.pages.len() + 1
    }

    /// Serialize to a PDF 1.4 file
    pub fn finish(mut self) -> Vec<u8> {
        self.pages.push(std::mem::take(&mut self.current));

        // 1: catalog, 2: page tree, 3-4: fonts, then a (page, content) pair per page
        let page_ids: Vec<usize> = (0..self.pages.len()).map(|i| 5 + i * 2).collect();
        let mut objects: Vec<Vec<u8>> = Vec::with_capacity(4 + self.pages.len() * 2);

        objects.push(b"<< /Type /Catalog /Pages 2 0 R >>".to_vec());

        let mut kids = String::new();
        for id in &page_ids {
            let _ = write!(kids, "{} 0 R ", id);
        }
        objects.push(
            format!(
                "<< /Type /Pages /Kids [{}] /Count {} >>",
                kids.trim_end(),
                page_ids.len()
            )
            .into_bytes(),
        );

        for font in [Font::Helvetica, Font::HelveticaBold] {
            objects.push(
                format!(
                    "<< /Type /Font /Subtype /Type1 /BaseFont /{} /Encoding /WinAnsiEncoding >>",
                    font.base_font()
                )
                .into_bytes(),
            );
        }

        let media_box = format!(
            "[0 0 {:.2} {:.2}]",
            PAGE_WIDTH_MM * MM_TO_PT,
            PAGE_HEIGHT_MM * MM_TO_PT
        );

        for (page_id, content) in page_ids.iter().zip(&self.pages) {
            objects.push(
                format!(
                    "<< /Type /Page /Parent 2 0 R /MediaBox {} /Resources << /Font << /F1 3 0 R /F2 4 0 R >> >> /Contents {} 0 R >>",
                    media_box,
                    page_id + 1
                )
                .into_bytes(),
            );

            let mut stream = format!("<< /Length {} >>\nstream\n", content.len()).into_bytes();
            stream.extend_from_slice(content);
            stream.extend_from_slice(b"\nendstream");
            objects.push(stream);
        }

        let mut out: Vec<u8> = b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n".to_vec();
        let mut offsets = Vec::with_capacity(objects.len());

        for (i, body) in objects.iter().enumerate() {
            offsets.push(out.len());
            out.extend_from_slice(format!("{} 0 obj\n", i + 1).as_bytes());
            out.extend_from_slice(body);
            out.extend_from_slice(b"\nendobj\n");
        }

        let xref_offset = out.len();
        let mut xref = format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1);
        for offset in &offsets {
            let _ = write!(xref, "{:010} 00000 n \n", offset);
        }
        let _ = write!(
            xref,
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
            objects.len() + 1,
            xref_offset
        );
        out.extend_from_slice(xref.as_bytes());

        out
    }
}

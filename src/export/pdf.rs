//! PDF Export
//!
//! Renders a [`SummaryReport`] as a letter-size PDF 1.4 document. Text is set
//! in the standard Helvetica faces, which every reader provides, so no font
//! data is embedded.

use std::fmt::Write as _;
use std::io::Write;

use crate::error::{LedgerError, LedgerResult};
use crate::reports::{LineStyle, SummaryLine, SummaryReport};

const PAGE_WIDTH: f32 = 612.0;
const PAGE_HEIGHT: f32 = 792.0;
const MARGIN: f32 = 72.0;

/// Rough Helvetica advance width as a fraction of the font size, used only
/// to decide where to wrap
const AVERAGE_GLYPH_WIDTH: f32 = 0.55;

/// First object id used for pages; 1-5 are catalog, page tree and fonts,
/// 6 is the info dictionary
const FIRST_PAGE_OBJECT: usize = 7;

/// A run of text at a fixed position on a page
#[derive(Debug, Clone, PartialEq)]
struct PlacedText {
    font: &'static str,
    size: f32,
    x: f32,
    y: f32,
    text: String,
}

fn font_for(style: LineStyle) -> (&'static str, f32) {
    match style {
        LineStyle::Title => ("F2", 18.0),
        LineStyle::Heading => ("F2", 14.0),
        LineStyle::Body => ("F1", 11.0),
        LineStyle::Footnote => ("F3", 10.0),
    }
}

/// Render the report to PDF bytes
pub fn summary_pdf_bytes(report: &SummaryReport, currency_symbol: &str) -> Vec<u8> {
    let pages = layout(&report.lines(currency_symbol));
    build_document(&report.title, &pages)
}

/// Render the report and write it to `writer`
pub fn export_summary_pdf<W: Write>(
    report: &SummaryReport,
    currency_symbol: &str,
    mut writer: W,
) -> LedgerResult<()> {
    writer
        .write_all(&summary_pdf_bytes(report, currency_symbol))
        .map_err(|e| LedgerError::Export(format!("Failed to write PDF: {}", e)))?;
    writer
        .flush()
        .map_err(|e| LedgerError::Export(format!("Failed to flush PDF: {}", e)))
}

/// Place lines top to bottom, starting a new page when the bottom margin
/// is reached
fn layout(lines: &[SummaryLine]) -> Vec<Vec<PlacedText>> {
    let mut pages = Vec::new();
    let mut current = Vec::new();
    let mut y = PAGE_HEIGHT - MARGIN;

    for line in lines {
        let (font, size) = font_for(line.style);
        let leading = size * 1.2;

        for (i, text) in wrap(&line.text, size).into_iter().enumerate() {
            let gap = if i == 0 { line.space_before } else { 0.0 };
            let mut next = y - gap - leading;

            if next < MARGIN && !current.is_empty() {
                pages.push(std::mem::take(&mut current));
                next = PAGE_HEIGHT - MARGIN - leading;
            }

            y = next;
            current.push(PlacedText {
                font,
                size,
                x: MARGIN,
                y,
                text,
            });
        }
    }

    pages.push(current);
    pages
}

/// Greedy word wrap to the printable width
fn wrap(text: &str, size: f32) -> Vec<String> {
    let max_chars = (((PAGE_WIDTH - 2.0 * MARGIN) / (size * AVERAGE_GLYPH_WIDTH)) as usize).max(1);
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();

        // Words longer than a line are split hard
        while word.len() > max_chars {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let rest = word.split_off(max_chars);
            lines.push(word.into_iter().collect());
            word = rest;
        }

        let current_len = current.chars().count();
        let needed = if current.is_empty() { word.len() } else { current_len + 1 + word.len() };
        if needed > max_chars && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.extend(word);
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

/// Encode text as a PDF literal string body in WinAnsi
fn pdf_string(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\\' | '(' | ')' => {
                out.push('\\');
                out.push(ch);
            }
            ' '..='~' => out.push(ch),
            '\u{A0}'..='\u{FF}' => {
                let _ = write!(out, "\\{:03o}", ch as u32);
            }
            _ => out.push('?'),
        }
    }
    out
}

fn page_content(texts: &[PlacedText]) -> String {
    let mut content = String::new();
    for placed in texts {
        let _ = write!(
            content,
            "BT\n/{} {:.1} Tf\n1 0 0 1 {:.2} {:.2} Tm\n({}) Tj\nET\n",
            placed.font,
            placed.size,
            placed.x,
            placed.y,
            pdf_string(&placed.text)
        );
    }
    content
}

/// Serializes numbered objects and remembers where each one starts
struct PdfBuilder {
    buffer: Vec<u8>,
    offsets: Vec<usize>,
}

impl PdfBuilder {
    fn new() -> Self {
        let mut buffer = Vec::new();
        buffer.extend_from_slice(b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n");
        Self {
            buffer,
            offsets: Vec::new(),
        }
    }

    /// Objects must be added in id order starting at 1
    fn object(&mut self, body: &str) {
        self.offsets.push(self.buffer.len());
        let id = self.offsets.len();
        self.buffer
            .extend_from_slice(format!("{} 0 obj\n{}\nendobj\n", id, body).as_bytes());
    }

    fn stream(&mut self, content: &str) {
        self.object(&format!(
            "<< /Length {} >>\nstream\n{}\nendstream",
            content.len(),
            content
        ));
    }

    fn finish(mut self, info_id: usize) -> Vec<u8> {
        let xref_offset = self.buffer.len();
        let mut tail = format!("xref\n0 {}\n0000000000 65535 f \n", self.offsets.len() + 1);
        for offset in &self.offsets {
            let _ = write!(tail, "{:010} 00000 n \n", offset);
        }
        let _ = write!(
            tail,
            "trailer\n<< /Size {} /Root 1 0 R /Info {} 0 R >>\nstartxref\n{}\n%%EOF\n",
            self.offsets.len() + 1,
            info_id,
            xref_offset
        );
        self.buffer.extend_from_slice(tail.as_bytes());
        self.buffer
    }
}

fn build_document(title: &str, pages: &[Vec<PlacedText>]) -> Vec<u8> {
    let kids: Vec<String> = (0..pages.len())
        .map(|i| format!("{} 0 R", FIRST_PAGE_OBJECT + 2 * i))
        .collect();

    let mut pdf = PdfBuilder::new();
    pdf.object("<< /Type /Catalog /Pages 2 0 R >>");
    pdf.object(&format!(
        "<< /Type /Pages /Kids [{}] /Count {} >>",
        kids.join(" "),
        pages.len()
    ));
    for base_font in ["Helvetica", "Helvetica-Bold", "Helvetica-Oblique"] {
        pdf.object(&format!(
            "<< /Type /Font /Subtype /Type1 /BaseFont /{} /Encoding /WinAnsiEncoding >>",
            base_font
        ));
    }
    pdf.object(&format!(
        "<< /Title ({}) /Producer (fundledger) >>",
        pdf_string(title)
    ));

    for (i, texts) in pages.iter().enumerate() {
        let content_id = FIRST_PAGE_OBJECT + 2 * i + 1;
        pdf.object(&format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {} {}] \
             /Resources << /Font << /F1 3 0 R /F2 4 0 R /F3 5 0 R >> >> \
             /Contents {} 0 R >>",
            PAGE_WIDTH, PAGE_HEIGHT, content_id
        ));
        pdf.stream(&page_content(texts));
    }

    pdf.finish(6)
}

//! Rendered plan to paginated PDF
//!
//! Rasterization works on the same styled lines the plan view draws, so the
//! export matches what is on screen: text wrapped at a fixed column width,
//! bold kept, colors dropped. Pages are fixed-size bands of rows written
//! with the base-14 Courier faces, so no fonts are embedded.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use ratatui::style::Modifier;
use ratatui::text::Text;
use tracing::{debug, info};

use super::ExportError;
use crate::config::ExportConfig;

pub const PDF_FILE_NAME: &str = "incident-response-plan.pdf";

/// A4 in points
const PAGE_WIDTH: u32 = 595;
const PAGE_HEIGHT: u32 = 842;
const MARGIN: u32 = 40;
const FONT_SIZE: u32 = 9;
const LEADING: u32 = 11;
const TAB_WIDTH: usize = 4;

/// One character cell of the rasterized plan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridCell {
    pub ch: char,
    pub bold: bool,
}

/// Rendered plan as rows of cells, no row wider than `columns`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CellGrid {
    columns: usize,
    rows: Vec<Vec<GridCell>>,
}

impl CellGrid {
    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> &[Vec<GridCell>] {
        &self.rows
    }

    /// True when there is no visible character anywhere
    pub fn is_blank(&self) -> bool {
        self.rows.iter().flatten().all(|cell| cell.ch.is_whitespace())
    }

    /// Page-sized bands of rows
    pub fn pages(&self, rows_per_page: usize) -> impl Iterator<Item = &[Vec<GridCell>]> {
        self.rows.chunks(rows_per_page.max(1))
    }

    pub fn page_count(&self, rows_per_page: usize) -> usize {
        self.pages(rows_per_page).count().max(1)
    }

    /// Plain text of one row, for diagnostics and tests
    pub fn row_text(&self, index: usize) -> String {
        self.rows
            .get(index)
            .map(|row| row.iter().map(|c| c.ch).collect())
            .unwrap_or_default()
    }
}

/// Page size in character cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageGeometry {
    pub columns: usize,
    pub rows: usize,
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self { columns: 90, rows: 64 }
    }
}

impl From<&ExportConfig> for PageGeometry {
    fn from(config: &ExportConfig) -> Self {
        Self {
            columns: config.page_columns.max(1),
            rows: config.page_rows.max(1),
        }
    }
}

/// Flatten styled text into a cell grid, word-wrapping at `columns`
pub fn rasterize(text: &Text<'_>, columns: usize) -> CellGrid {
    let columns = columns.max(1);
    debug!(lines = text.lines.len(), columns, "rasterize: called");
    let text_bold = text.style.add_modifier.contains(Modifier::BOLD);

    let mut rows = Vec::new();
    for line in &text.lines {
        let line_bold = text_bold || line.style.add_modifier.contains(Modifier::BOLD);
        let mut cells = Vec::new();
        for span in &line.spans {
            let bold = line_bold || span.style.add_modifier.contains(Modifier::BOLD);
            for ch in span.content.chars() {
                match ch {
                    '\t' => cells.extend(std::iter::repeat_n(GridCell { ch: ' ', bold }, TAB_WIDTH)),
                    c if c.is_control() => {}
                    c => cells.push(GridCell { ch: c, bold }),
                }
            }
        }
        rows.extend(wrap(cells, columns));
    }

    debug!(rows = rows.len(), "rasterize: done");
    CellGrid { columns, rows }
}

/// Greedy word wrap; words longer than a row are split
fn wrap(cells: Vec<GridCell>, width: usize) -> Vec<Vec<GridCell>> {
    if cells.len() <= width {
        return vec![cells];
    }

    let mut rows = Vec::new();
    let mut rest: &[GridCell] = &cells;
    while rest.len() > width {
        let window = &rest[..=width];
        match window.iter().rposition(|c| c.ch == ' ').filter(|&pos| pos > 0) {
            Some(pos) => {
                rows.push(trim_end(&rest[..pos]));
                rest = &rest[pos + 1..];
            }
            None => {
                rows.push(rest[..width].to_vec());
                rest = &rest[width..];
            }
        }
    }
    rows.push(rest.to_vec());
    rows
}

fn trim_end(cells: &[GridCell]) -> Vec<GridCell> {
    let end = cells.iter().rposition(|c| c.ch != ' ').map_or(0, |pos| pos + 1);
    cells[..end].to_vec()
}

/// WinAnsi byte for a character; anything outside the code page becomes '?'
fn encode_char(c: char) -> u8 {
    match c {
        ' '..='~' => c as u8,
        '\u{a0}'..='\u{ff}' => c as u32 as u8,
        '\u{20ac}' => 0x80,
        '\u{2026}' => 0x85,
        '\u{2018}' => 0x91,
        '\u{2019}' => 0x92,
        '\u{201c}' => 0x93,
        '\u{201d}' => 0x94,
        '\u{2022}' => 0x95,
        '\u{2013}' => 0x96,
        '\u{2014}' => 0x97,
        _ => b'?',
    }
}

/// Append a PDF literal string for `cells`
fn push_literal(out: &mut Vec<u8>, cells: &[GridCell]) {
    out.push(b'(');
    for cell in cells {
        match encode_char(cell.ch) {
            b @ (b'(' | b')' | b'\\') => out.extend_from_slice(&[b'\\', b]),
            b if b >= 0x80 => out.extend_from_slice(format!("\\{:03o}", b).as_bytes()),
            b => out.push(b),
        }
    }
    out.push(b')');
}

/// Content stream for one page band
fn page_content(rows: &[Vec<GridCell>]) -> Vec<u8> {
    let top = PAGE_HEIGHT - MARGIN - FONT_SIZE;
    let mut out = Vec::new();
    out.extend_from_slice(format!("BT\n/F1 {} Tf\n{} TL\n{} {} Td\n", FONT_SIZE, LEADING, MARGIN, top).as_bytes());

    let mut current_bold = false;
    for row in rows {
        let row = trim_end(row);
        for run in row.chunk_by(|a, b| a.bold == b.bold) {
            let bold = run[0].bold;
            if bold != current_bold {
                let font = if bold { "F2" } else { "F1" };
                out.extend_from_slice(format!("/{} {} Tf\n", font, FONT_SIZE).as_bytes());
                current_bold = bold;
            }
            push_literal(&mut out, run);
            out.extend_from_slice(b" Tj\n");
        }
        out.extend_from_slice(b"T*\n");
    }

    out.extend_from_slice(b"ET\n");
    out
}

/// Byte buffer that remembers where each object starts
struct PdfWriter {
    buf: Vec<u8>,
    offsets: Vec<usize>,
}

impl PdfWriter {
    fn new() -> Self {
        let mut buf = Vec::new();
        buf.extend_from_slice(b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n");
        Self {
            buf,
            offsets: Vec::new(),
        }
    }

    /// Objects must be added in id order starting at 1
    fn object(&mut self, body: &[u8]) {
        self.offsets.push(self.buf.len());
        let id = self.offsets.len();
        self.buf.extend_from_slice(format!("{} 0 obj\n", id).as_bytes());
        self.buf.extend_from_slice(body);
        self.buf.extend_from_slice(b"\nendobj\n");
    }

    fn stream(&mut self, content: &[u8]) {
        let mut body = format!("<< /Length {} >>\nstream\n", content.len()).into_bytes();
        body.extend_from_slice(content);
        body.extend_from_slice(b"\nendstream");
        self.object(&body);
    }

    fn finish(mut self) -> Vec<u8> {
        let xref_offset = self.buf.len();
        let size = self.offsets.len() + 1;
        self.buf
            .extend_from_slice(format!("xref\n0 {}\n0000000000 65535 f \n", size).as_bytes());
        for offset in &self.offsets {
            self.buf.extend_from_slice(format!("{:010} 00000 n \n", offset).as_bytes());
        }
        self.buf.extend_from_slice(
            format!(
                "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
                size, xref_offset
            )
            .as_bytes(),
        );
        self.buf
    }
}

/// Assemble a PDF document from the grid, one page per band of rows
pub fn render_pdf(grid: &CellGrid, geometry: PageGeometry) -> Vec<u8> {
    let bands: Vec<&[Vec<GridCell>]> = if grid.rows.is_empty() {
        vec![&grid.rows[..]]
    } else {
        grid.pages(geometry.rows).collect()
    };
    debug!(pages = bands.len(), rows = grid.rows.len(), "render_pdf: called");

    // 1 catalog, 2 page tree, 3-4 fonts, then a page and its content per band
    let page_ids: Vec<usize> = (0..bands.len()).map(|i| 5 + 2 * i).collect();
    let kids = page_ids
        .iter()
        .map(|id| format!("{} 0 R", id))
        .collect::<Vec<_>>()
        .join(" ");

    let mut pdf = PdfWriter::new();
    pdf.object(b"<< /Type /Catalog /Pages 2 0 R >>");
    pdf.object(format!("<< /Type /Pages /Kids [{}] /Count {} >>", kids, bands.len()).as_bytes());
    pdf.object(b"<< /Type /Font /Subtype /Type1 /BaseFont /Courier /Encoding /WinAnsiEncoding >>");
    pdf.object(b"<< /Type /Font /Subtype /Type1 /BaseFont /Courier-Bold /Encoding /WinAnsiEncoding >>");

    for (band, page_id) in bands.iter().zip(&page_ids) {
        pdf.object(
            format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {} {}] \
                 /Resources << /Font << /F1 3 0 R /F2 4 0 R >> >> /Contents {} 0 R >>",
                PAGE_WIDTH,
                PAGE_HEIGHT,
                page_id + 1
            )
            .as_bytes(),
        );
        pdf.stream(&page_content(band));
    }

    pdf.finish()
}

/// Write the grid as `incident-response-plan.pdf` inside `dir`
pub fn write_pdf(grid: &CellGrid, geometry: PageGeometry, dir: &Path) -> Result<PathBuf, ExportError> {
    debug!(dir = %dir.display(), "write_pdf: called");
    if grid.is_blank() {
        debug!("write_pdf: nothing to export");
        return Err(ExportError::EmptyRegion);
    }

    let path = dir.join(PDF_FILE_NAME);
    let bytes = render_pdf(grid, geometry);
    let write = || -> std::io::Result<()> {
        fs::create_dir_all(dir)?;
        let mut file = fs::File::create(&path)?;
        file.write_all(&bytes)?;
        file.sync_all()
    };
    write().map_err(|source| ExportError::PdfWrite {
        path: path.clone(),
        source,
    })?;

    info!(path = %path.display(), pages = grid.page_count(geometry.rows), "write_pdf: exported plan");
    Ok(path)
}

//! Source document loading
//!
//! `.docx` files are read straight from the OOXML package: body paragraphs in
//! document order first, then the text of every top-level table, row by row and
//! cell by cell, with merged cells repeated for each grid position they cover.
//! Plain text and Markdown are read verbatim.

use std::io::Read;
use std::path::Path;

use quick_xml::events::BytesStart;
use quick_xml::events::Event;
use quick_xml::Reader;
use tracing::debug;
use tracing::info;

use crate::errors::RabotError;
use crate::errors::Result;

/// Main document part inside a `.docx` package
const DOCUMENT_PART: &str = "word/document.xml";

/// Load the full text of the document at `path`
///
/// # Errors
/// - `DocumentError` if the file is missing or the extension is unsupported
/// - Archive or XML errors for malformed `.docx` files
pub fn load_document(path: &Path) -> Result<String> {
    if !path.is_file() {
        return Err(RabotError::DocumentError(format!(
            "document not found: {}",
            path.display()
        )));
    }

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let text = match extension.as_str() {
        "docx" => load_docx(path)?,
        "txt" | "md" | "markdown" => std::fs::read_to_string(path)?,
        other => {
            return Err(RabotError::DocumentError(format!(
                "unsupported document type '.{other}' for {} (expected .docx, .txt or .md)",
                path.display()
            )))
        }
    };

    info!(
        "Loaded {} characters from {}",
        text.chars().count(),
        path.display()
    );
    Ok(text)
}

/// Extract the text of a `.docx` file
pub fn load_docx(path: &Path) -> Result<String> {
    let file = std::fs::File::open(path)?;
    let mut archive = zip::ZipArchive::new(file)?;

    let mut xml = String::new();
    let mut part = archive.by_name(DOCUMENT_PART)?;
    part.read_to_string(&mut xml)?;
    debug!("Read {} bytes of {}", xml.len(), DOCUMENT_PART);

    extract_docx_text(&xml)
}

/// Paragraph and table text of a WordprocessingML body
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DocxContent {
    pub paragraphs: Vec<String>,
    /// Top-level tables; each cell's paragraphs joined with newlines
    pub tables: Vec<Vec<Vec<String>>>,
}

impl DocxContent {
    /// Body paragraphs followed by table cells, skipping blank entries
    #[must_use]
    pub fn to_text(&self) -> String {
        let cells = self.tables.iter().flatten().flatten();
        self.paragraphs
            .iter()
            .chain(cells)
            .filter(|t| !t.trim().is_empty())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Text of `word/document.xml`, in the order described in [`DocxContent::to_text`]
pub fn extract_docx_text(xml: &str) -> Result<String> {
    Ok(parse_document_xml(xml)?.to_text())
}

/// Element kinds the extractor cares about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Node {
    Body,
    Table,
    Row,
    Cell,
    CellProperties,
    Paragraph,
    Hyperlink,
    Run,
    Text,
    Other,
}

impl Node {
    fn from_name(name: &[u8]) -> Self {
        match name {
            b"w:body" => Self::Body,
            b"w:tbl" => Self::Table,
            b"w:tr" => Self::Row,
            b"w:tc" => Self::Cell,
            b"w:tcPr" => Self::CellProperties,
            b"w:p" => Self::Paragraph,
            b"w:hyperlink" => Self::Hyperlink,
            b"w:r" => Self::Run,
            b"w:t" => Self::Text,
            _ => Self::Other,
        }
    }
}

/// A `w:tc` before horizontal and vertical merges are resolved
#[derive(Debug, Default)]
struct RawCell {
    paragraphs: Vec<String>,
    grid_span: usize,
    continues_merge: bool,
}

#[derive(Debug, Default)]
struct TableBuilder {
    /// Stack position of the `w:tbl` element
    level: usize,
    rows: Vec<Vec<String>>,
    cells: Vec<RawCell>,
}

impl TableBuilder {
    /// Lay the finished row out on the grid. A cell spanning `n` columns
    /// appears `n` times; a vertical merge continuation repeats the cell
    /// above it.
    fn finish_row(&mut self) {
        let mut row: Vec<String> = Vec::new();
        for cell in std::mem::take(&mut self.cells) {
            let own_text = cell.paragraphs.join("\n");
            let text = if cell.continues_merge {
                self.rows
                    .last()
                    .and_then(|above| above.get(row.len()))
                    .cloned()
                    .unwrap_or(own_text)
            } else {
                own_text
            };
            for _ in 0..cell.grid_span.max(1) {
                row.push(text.clone());
            }
        }
        self.rows.push(row);
    }
}

/// Paragraph being collected and the stack position of its `w:p`
struct OpenParagraph {
    level: usize,
    text: String,
}

impl OpenParagraph {
    /// Whether `path`, the elements below the paragraph, is a run of it
    /// (possibly wrapped in a hyperlink) rather than nested content
    fn is_run(path: &[Node]) -> bool {
        matches!(path, [Node::Run] | [Node::Hyperlink, Node::Run])
    }
}

/// Walk the XML once, collecting body paragraphs and table cells.
///
/// Only direct children of `w:body` count, so content controls (`w:sdt`),
/// nested tables, text boxes and frames are skipped. A paragraph's text is
/// the text of its runs, including runs inside hyperlinks. Cells are laid out
/// on the table grid with merged cells repeated.
pub fn parse_document_xml(xml: &str) -> Result<DocxContent> {
    let mut reader = Reader::from_str(xml);
    let mut content = DocxContent::default();

    let mut stack: Vec<Node> = Vec::new();
    let mut table: Option<TableBuilder> = None;
    let mut paragraph: Option<OpenParagraph> = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let node = Node::from_name(e.name().as_ref());
                open_element(node, &e, &stack, &mut table, &mut paragraph);
                stack.push(node);
            }
            Event::Empty(e) => {
                let node = Node::from_name(e.name().as_ref());
                open_element(node, &e, &stack, &mut table, &mut paragraph);
                if let Some(open) = paragraph.as_mut() {
                    if stack.get(open.level + 1..).is_some_and(OpenParagraph::is_run) {
                        match e.name().as_ref() {
                            b"w:tab" => open.text.push('\t'),
                            b"w:br" | b"w:cr" => open.text.push('\n'),
                            _ => {}
                        }
                    }
                }
                close_element(node, &stack, &mut content, &mut table, &mut paragraph);
            }
            Event::Text(t) => {
                if let Some(open) = paragraph.as_mut() {
                    let below = stack.get(open.level + 1..).unwrap_or_default();
                    if let Some((Node::Text, path)) = below.split_last() {
                        if OpenParagraph::is_run(path) {
                            open.text.push_str(&t.unescape()?);
                        }
                    }
                }
            }
            Event::End(_) => {
                if let Some(node) = stack.pop() {
                    close_element(node, &stack, &mut content, &mut table, &mut paragraph);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(content)
}

/// Track an element opening under `stack`
fn open_element(
    node: Node,
    element: &BytesStart<'_>,
    stack: &[Node],
    table: &mut Option<TableBuilder>,
    paragraph: &mut Option<OpenParagraph>,
) {
    let level = stack.len();
    let parent = stack.last().copied();
    let table_level = table.as_ref().map(|t| t.level);

    match node {
        Node::Table if parent == Some(Node::Body) => {
            *table = Some(TableBuilder {
                level,
                ..TableBuilder::default()
            });
        }
        Node::Cell if parent == Some(Node::Row) && table_level.is_some_and(|t| level == t + 2) => {
            if let Some(table) = table.as_mut() {
                table.cells.push(RawCell::default());
            }
        }
        Node::Paragraph
            if parent == Some(Node::Body)
                || (parent == Some(Node::Cell) && table_level.is_some_and(|t| level == t + 3)) =>
        {
            *paragraph = Some(OpenParagraph {
                level,
                text: String::new(),
            });
        }
        Node::Other
            if parent == Some(Node::CellProperties) && table_level.is_some_and(|t| level == t + 4) =>
        {
            let Some(cell) = table.as_mut().and_then(|t| t.cells.last_mut()) else {
                return;
            };
            match element.name().as_ref() {
                b"w:gridSpan" => {
                    cell.grid_span = val_attribute(element)
                        .and_then(|v| v.trim().parse().ok())
                        .unwrap_or(1);
                }
                // No value means "continue"
                b"w:vMerge" => {
                    cell.continues_merge =
                        matches!(val_attribute(element).as_deref(), None | Some("continue"));
                }
                _ => {}
            }
        }
        _ => {}
    }
}

/// Finish an element whose parent is now the top of `stack`
fn close_element(
    node: Node,
    stack: &[Node],
    content: &mut DocxContent,
    table: &mut Option<TableBuilder>,
    paragraph: &mut Option<OpenParagraph>,
) {
    let level = stack.len();
    let table_level = table.as_ref().map(|t| t.level);

    match node {
        Node::Paragraph if paragraph.as_ref().is_some_and(|p| p.level == level) => {
            let Some(finished) = paragraph.take() else {
                return;
            };
            match table.as_mut() {
                Some(table) if level == table.level + 3 => {
                    if let Some(cell) = table.cells.last_mut() {
                        cell.paragraphs.push(finished.text);
                    }
                }
                _ => content.paragraphs.push(finished.text),
            }
        }
        Node::Row if table_level.map(|t| t + 1) == Some(level) => {
            if let Some(table) = table.as_mut() {
                table.finish_row();
            }
        }
        Node::Table if table_level == Some(level) => {
            if let Some(finished) = table.take() {
                content.tables.push(finished.rows);
            }
        }
        _ => {}
    }
}

fn val_attribute(element: &BytesStart<'_>) -> Option<String> {
    element
        .try_get_attribute("w:val")
        .ok()
        .flatten()
        .map(|attr| String::from_utf8_lossy(&attr.value).into_owned())
}

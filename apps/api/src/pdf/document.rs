use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream, StringFormat};
use thiserror::Error;

use super::metrics::{get_metrics, Face};

/// A4 in points.
const PAGE_WIDTH: f32 = 595.0;
const PAGE_HEIGHT: f32 = 842.0;
const MARGIN: f32 = 50.0;
const LINE_SPACING: f32 = 1.2;

#[derive(Debug, Error)]
pub enum PdfError {
    #[error("lopdf: {0}")]
    Lopdf(#[from] lopdf::Error),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb(pub f32, pub f32, pub f32);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0.0, 0.0, 0.0);
    /// #2d3748
    pub const SLATE: Rgb = Rgb(0.176, 0.216, 0.282);
    /// #4a5568
    pub const GREY: Rgb = Rgb(0.290, 0.333, 0.408);
    /// #1a202c
    pub const INK: Rgb = Rgb(0.102, 0.125, 0.173);
    /// #cbd5e0
    pub const RULE: Rgb = Rgb(0.796, 0.835, 0.878);
    /// #38a169
    pub const GREEN: Rgb = Rgb(0.220, 0.631, 0.412);
    /// #e53e3e
    pub const RED: Rgb = Rgb(0.898, 0.243, 0.243);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone)]
pub enum Block {
    Text {
        text: String,
        size: f32,
        face: Face,
        align: Align,
        indent: f32,
        color: Rgb,
    },
    /// Vertical gap in points.
    Space(f32),
    /// Full-width horizontal line.
    Rule { color: Rgb, width: f32 },
}

/// Builds a document block by block, then renders it in one pass.
#[derive(Debug, Default, Clone)]
pub struct DocumentBuilder {
    blocks: Vec<Block>,
}

impl DocumentBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn text(
        &mut self,
        text: impl Into<String>,
        size: f32,
        face: Face,
        color: Rgb,
    ) -> &mut Self {
        self.push_text(text.into(), size, face, Align::Left, 0.0, color)
    }

    pub fn title(&mut self, text: impl Into<String>, size: f32) -> &mut Self {
        self.push_text(text.into(), size, Face::Bold, Align::Center, 0.0, Rgb::BLACK)
    }

    pub fn right(&mut self, text: impl Into<String>, size: f32) -> &mut Self {
        self.push_text(text.into(), size, Face::Regular, Align::Right, 0.0, Rgb::BLACK)
    }

    pub fn indented(
        &mut self,
        text: impl Into<String>,
        size: f32,
        indent: f32,
        color: Rgb,
    ) -> &mut Self {
        self.push_text(text.into(), size, Face::Regular, Align::Left, indent, color)
    }

    /// Vertical gap measured in lines of 12pt text, like `moveDown` in layout engines.
    pub fn move_down(&mut self, lines: f32) -> &mut Self {
        self.blocks.push(Block::Space(lines * 12.0 * LINE_SPACING));
        self
    }

    pub fn rule(&mut self, color: Rgb, width: f32) -> &mut Self {
        self.blocks.push(Block::Rule { color, width });
        self
    }

    fn push_text(
        &mut self,
        text: String,
        size: f32,
        face: Face,
        align: Align,
        indent: f32,
        color: Rgb,
    ) -> &mut Self {
        self.blocks.push(Block::Text {
            text,
            size,
            face,
            align,
            indent,
            color,
        });
        self
    }

    /// Lays out every block and serialises the PDF.
    pub fn render(&self) -> Result<Vec<u8>, PdfError> {
        let pages = self.layout();
        write_document(pages)
    }

    fn layout(&self) -> Vec<Vec<Operation>> {
        let mut pages: Vec<Vec<Operation>> = vec![Vec::new()];
        let mut y = PAGE_HEIGHT - MARGIN;
        let usable = PAGE_WIDTH - 2.0 * MARGIN;

        for block in &self.blocks {
            match block {
                Block::Space(points) => {
                    y -= points;
                    if y < MARGIN {
                        pages.push(Vec::new());
                        y = PAGE_HEIGHT - MARGIN;
                    }
                }
                Block::Rule { color, width } => {
                    if y - width < MARGIN {
                        pages.push(Vec::new());
                        y = PAGE_HEIGHT - MARGIN;
                    }
                    let ops = current_page(&mut pages);
                    ops.push(Operation::new("RG", rgb_operands(*color)));
                    ops.push(Operation::new("w", vec![real(*width)]));
                    ops.push(Operation::new("m", vec![real(MARGIN), real(y)]));
                    ops.push(Operation::new("l", vec![real(PAGE_WIDTH - MARGIN), real(y)]));
                    ops.push(Operation::new("S", vec![]));
                    y -= width;
                }
                Block::Text {
                    text,
                    size,
                    face,
                    align,
                    indent,
                    color,
                } => {
                    let metrics = get_metrics(*face);
                    let width = usable - indent;
                    let line_height = size * LINE_SPACING;
                    for line in metrics.wrap(text, width / size) {
                        if y - line_height < MARGIN {
                            pages.push(Vec::new());
                            y = PAGE_HEIGHT - MARGIN;
                        }
                        y -= line_height;
                        if line.is_empty() {
                            continue;
                        }
                        let line_width = metrics.measure_pt(&line, *size);
                        let x = match align {
                            Align::Left => MARGIN + indent,
                            Align::Center => MARGIN + indent + (width - line_width).max(0.0) / 2.0,
                            Align::Right => MARGIN + indent + (width - line_width).max(0.0),
                        };
                        let baseline = y + size * 0.2;
                        let ops = current_page(&mut pages);
                        ops.push(Operation::new("rg", rgb_operands(*color)));
                        ops.push(Operation::new("BT", vec![]));
                        ops.push(Operation::new(
                            "Tf",
                            vec![face.resource_name().into(), real(*size)],
                        ));
                        ops.push(Operation::new("Td", vec![real(x), real(baseline)]));
                        ops.push(Operation::new(
                            "Tj",
                            vec![Object::String(encode_win_ansi(&line), StringFormat::Literal)],
                        ));
                        ops.push(Operation::new("ET", vec![]));
                    }
                }
            }
        }

        pages
    }
}

fn current_page(pages: &mut Vec<Vec<Operation>>) -> &mut Vec<Operation> {
    if pages.is_empty() {
        pages.push(Vec::new());
    }
    let last = pages.len() - 1;
    &mut pages[last]
}

fn real(value: f32) -> Object {
    Object::Real(value as _)
}

fn rgb_operands(color: Rgb) -> Vec<Object> {
    vec![real(color.0), real(color.1), real(color.2)]
}

fn font_dictionary(face: Face) -> lopdf::Dictionary {
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => face.base_font(),
        "Encoding" => "WinAnsiEncoding",
    }
}

fn write_document(pages: Vec<Vec<Operation>>) -> Result<Vec<u8>, PdfError> {
    let mut doc = Document::with_version("1.5");
    let pages_id: ObjectId = doc.new_object_id();

    let regular_id = doc.add_object(font_dictionary(Face::Regular));
    let bold_id = doc.add_object(font_dictionary(Face::Bold));
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            Face::Regular.resource_name() => regular_id,
            Face::Bold.resource_name() => bold_id,
        },
    });

    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
    for operations in pages {
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    let pages_dict = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => count,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), real(PAGE_WIDTH), real(PAGE_HEIGHT)],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)?;
    Ok(buffer)
}

/// Encodes text for a WinAnsi Type1 font. Latin-1 maps one-to-one; the
/// typographic punctuation French text tends to carry is remapped; anything
/// else becomes `?`.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            '\t' => b' ',
            '€' => 0x80,
            '…' => 0x85,
            'Œ' => 0x8C,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            '•' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            'œ' => 0x9C,
            c if (' '..='~').contains(&c) => c as u8,
            c if ('\u{A0}'..='\u{FF}').contains(&c) => c as u32 as u8,
            _ => b'?',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page_count(bytes: &[u8]) -> usize {
        Document::load_mem(bytes).unwrap().get_pages().len()
    }

    #[test]
    fn test_encode_win_ansi_latin1_and_punctuation() {
        assert_eq!(encode_win_ansi("Évaluation"), b"\xC9valuation".to_vec());
        assert_eq!(encode_win_ansi("d’étude"), b"d\x92\xE9tude".to_vec());
        assert_eq!(encode_win_ansi("→ ok"), b"? ok".to_vec());
    }

    #[test]
    fn test_render_single_page_document() {
        let mut doc = DocumentBuilder::new();
        doc.title("Évaluation Corrigée - Form3", 20.0)
            .move_down(1.0)
            .text("Candidat : Sara Alami", 12.0, Face::Regular, Rgb::BLACK)
            .rule(Rgb::RULE, 0.5);

        let bytes = doc.render().unwrap();
        assert!(bytes.starts_with(b"%PDF-1.5"));
        assert_eq!(page_count(&bytes), 1);
    }

    #[test]
    fn test_render_breaks_long_documents_into_pages() {
        let mut doc = DocumentBuilder::new();
        for i in 0..120 {
            doc.text(format!("Q{i}"), 12.0, Face::Bold, Rgb::SLATE)
                .indented("Réponse : B", 12.0, 20.0, Rgb::GREY);
        }
        let bytes = doc.render().unwrap();
        assert!(page_count(&bytes) > 1);
    }

    #[test]
    fn test_empty_document_still_has_a_page() {
        let bytes = DocumentBuilder::new().render().unwrap();
        assert_eq!(page_count(&bytes), 1);
    }

    #[test]
    fn test_builder_records_blocks_in_order() {
        let mut doc = DocumentBuilder::new();
        doc.title("T", 20.0).move_down(2.0).right("Date", 12.0);
        assert_eq!(doc.blocks().len(), 3);
        assert!(matches!(doc.blocks()[1], Block::Space(p) if (p - 28.8).abs() < 1e-3));
        assert!(matches!(
            &doc.blocks()[2],
            Block::Text { align: Align::Right, .. }
        ));
    }
}

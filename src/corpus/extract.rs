// Text extraction: turns a document file into its paragraphs.
//
// DOCX files are parsed with docx-rs and walked paragraph → run → text.
// Plain-text files use blank lines as paragraph separators.
//
// The TextExtractor trait lets the loader stay agnostic of the file format.

use std::path::Path;
use std::sync::LazyLock;

use anyhow::{Context, Result};
use docx_rs::{read_docx, DocumentChild, Paragraph, ParagraphChild, Run, RunChild};
use regex_lite::{Captures, Regex};

/// The file type compared by default.
pub const DEFAULT_EXTENSION: &str = ".docx";

/// Run text can come back still XML-escaped.
static ENTITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(#x[0-9a-fA-F]+|#[0-9]+|[a-zA-Z]+);").expect("valid entity regex")
});

/// Trait for reading the paragraphs of one document file.
pub trait TextExtractor {
    /// Return the document's non-empty paragraphs in reading order.
    fn paragraphs(&self, path: &Path) -> Result<Vec<String>>;
}

/// Pick the extractor for a file extension (with or without the leading dot).
pub fn extractor_for(extension: &str) -> Result<Box<dyn TextExtractor>> {
    match normalize_extension(extension).as_str() {
        ".docx" => Ok(Box::new(DocxExtractor)),
        ".txt" => Ok(Box::new(PlainTextExtractor)),
        other => anyhow::bail!("Unsupported document type: {other}. Supported: .docx, .txt"),
    }
}

/// Lowercase an extension and make sure it starts with a dot.
pub fn normalize_extension(extension: &str) -> String {
    let lower = extension.trim().to_lowercase();
    if lower.starts_with('.') {
        lower
    } else {
        format!(".{lower}")
    }
}

/// Reads Word documents (Office Open XML).
///
/// Only top-level body paragraphs are read. Tables, headers, footnotes and
/// text boxes are not part of the document's running text.
pub struct DocxExtractor;

impl DocxExtractor {
    /// Extract paragraphs from the raw bytes of a DOCX archive.
    pub fn paragraphs_from_bytes(&self, bytes: &[u8]) -> Result<Vec<String>> {
        let docx = read_docx(bytes)
            .map_err(|e| anyhow::anyhow!("Not a readable DOCX document: {e:?}"))?;

        Ok(docx
            .document
            .children
            .iter()
            .filter_map(|child| match child {
                DocumentChild::Paragraph(paragraph) => Some(paragraph_text(paragraph)),
                _ => None,
            })
            .filter(|text| !text.trim().is_empty())
            .collect())
    }
}

impl TextExtractor for DocxExtractor {
    fn paragraphs(&self, path: &Path) -> Result<Vec<String>> {
        let bytes =
            std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
        self.paragraphs_from_bytes(&bytes)
            .with_context(|| format!("Failed to extract text from {}", path.display()))
    }
}

/// Reads UTF-8 text files, one paragraph per blank-line-separated block.
pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    fn paragraphs(&self, path: &Path) -> Result<Vec<String>> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Ok(split_paragraphs(&text))
    }
}

/// Visible text of one paragraph: runs concatenated, tabs and breaks kept.
fn paragraph_text(paragraph: &Paragraph) -> String {
    let mut text = String::new();
    push_children(&paragraph.children, &mut text);
    decode_entities(&text)
}

fn push_children(children: &[ParagraphChild], text: &mut String) {
    for child in children {
        match child {
            ParagraphChild::Run(run) => push_run(run, text),
            ParagraphChild::Hyperlink(link) => push_children(&link.children, text),
            _ => {}
        }
    }
}

fn push_run(run: &Run, text: &mut String) {
    for child in &run.children {
        match child {
            RunChild::Text(t) => text.push_str(&t.text),
            RunChild::Tab(_) => text.push('\t'),
            RunChild::Break(_) => text.push('\n'),
            _ => {}
        }
    }
}

/// Split plain text into paragraphs on blank lines, joining wrapped lines.
pub fn split_paragraphs(text: &str) -> Vec<String> {
    let mut paragraphs = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            if !current.is_empty() {
                paragraphs.push(current.join(" "));
                current.clear();
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        paragraphs.push(current.join(" "));
    }

    paragraphs
}

fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }

    ENTITY
        .replace_all(text, |caps: &Captures| {
            let name = &caps[1];
            let decoded = match name {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                _ => name
                    .strip_prefix("#x")
                    .and_then(|hex| u32::from_str_radix(hex, 16).ok())
                    .or_else(|| name.strip_prefix('#').and_then(|dec| dec.parse().ok()))
                    .and_then(char::from_u32),
            };
            decoded.map_or_else(|| caps[0].to_string(), String::from)
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use docx_rs::{BreakType, Docx};
    use std::io::{Cursor, Write};
    use zip::write::SimpleFileOptions;

    fn built_docx(paragraphs: Vec<Paragraph>) -> Vec<u8> {
        let mut docx = Docx::new();
        for paragraph in paragraphs {
            docx = docx.add_paragraph(paragraph);
        }
        let mut buf = Cursor::new(Vec::new());
        docx.build().pack(&mut buf).unwrap();
        buf.into_inner()
    }

    /// A minimal package around a hand-written <w:body>, for markup the
    /// builder can't produce.
    fn raw_docx(body: &str) -> Vec<u8> {
        let parts = [
            (
                "[Content_Types].xml",
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/></Types>"#.to_string(),
            ),
            (
                "_rels/.rels",
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#.to_string(),
            ),
            (
                "word/_rels/document.xml.rels",
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"></Relationships>"#.to_string(),
            ),
            (
                "word/document.xml",
                format!(
                    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" xmlns:mc="http://schemas.openxmlformats.org/markup-compatibility/2006" xmlns:wp="http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing" xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:wps="http://schemas.microsoft.com/office/word/2010/wordprocessingShape" xmlns:v="urn:schemas-microsoft-com:vml" mc:Ignorable="wps"><w:body>{body}</w:body></w:document>"#
                ),
            ),
        ];

        let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
        for (name, content) in parts {
            zip.start_file(name, options).unwrap();
            zip.write_all(content.as_bytes()).unwrap();
        }
        zip.finish().unwrap().into_inner()
    }

    #[test]
    fn test_normalize_extension() {
        assert_eq!(normalize_extension("docx"), ".docx");
        assert_eq!(normalize_extension(".DOCX"), ".docx");
        assert_eq!(normalize_extension(" txt "), ".txt");
    }

    #[test]
    fn test_extractor_for_unknown_extension_fails() {
        assert!(extractor_for(".pdf").is_err());
        assert!(extractor_for("docx").is_ok());
        assert!(extractor_for(".TXT").is_ok());
    }

    #[test]
    fn test_runs_are_concatenated() {
        let bytes = built_docx(vec![Paragraph::new()
            .add_run(Run::new().add_text("Hello "))
            .add_run(Run::new().add_text("world"))]);
        let paragraphs = DocxExtractor.paragraphs_from_bytes(&bytes).unwrap();
        assert_eq!(paragraphs, vec!["Hello world"]);
    }

    #[test]
    fn test_empty_paragraphs_are_dropped() {
        let bytes = built_docx(vec![
            Paragraph::new(),
            Paragraph::new().add_run(Run::new().add_text("   ")),
            Paragraph::new().add_run(Run::new().add_text("Kept")),
        ]);
        let paragraphs = DocxExtractor.paragraphs_from_bytes(&bytes).unwrap();
        assert_eq!(paragraphs, vec!["Kept"]);
    }

    #[test]
    fn test_tabs_and_breaks_are_kept() {
        let bytes = built_docx(vec![Paragraph::new().add_run(
            Run::new()
                .add_text("A")
                .add_tab()
                .add_text("B")
                .add_break(BreakType::TextWrapping)
                .add_text("C"),
        )]);
        let paragraphs = DocxExtractor.paragraphs_from_bytes(&bytes).unwrap();
        assert_eq!(paragraphs, vec!["A\tB\nC"]);
    }

    #[test]
    fn test_special_characters_survive() {
        let bytes = built_docx(vec![Paragraph::new()
            .add_run(Run::new().add_text("Fish & chips <3 \"été\""))]);
        let paragraphs = DocxExtractor.paragraphs_from_bytes(&bytes).unwrap();
        assert_eq!(paragraphs, vec!["Fish & chips <3 \"été\""]);
    }

    #[test]
    fn test_text_box_does_not_split_its_paragraph() {
        let box_paragraph =
            r#"<w:txbxContent><w:p><w:r><w:t>Inside the text box.</w:t></w:r></w:p></w:txbxContent>"#;
        let body = format!(
            r#"<w:p><w:r><w:t xml:space="preserve">Before the box we write this sentence.</w:t></w:r><w:r><mc:AlternateContent><mc:Choice Requires="wps"><w:drawing><wp:inline><wp:extent cx="914400" cy="914400"/><wp:docPr id="1" name="Text Box 1"/><a:graphic><a:graphicData uri="http://schemas.microsoft.com/office/word/2010/wordprocessingShape"><wps:wsp><wps:txbx>{box_paragraph}</wps:txbx></wps:wsp></a:graphicData></a:graphic></wp:inline></w:drawing></mc:Choice><mc:Fallback><w:pict><v:shape><v:textbox>{box_paragraph}</v:textbox></v:shape></w:pict></mc:Fallback></mc:AlternateContent></w:r><w:r><w:t xml:space="preserve"> After the box the paragraph continues here.</w:t></w:r></w:p><w:p><w:r><w:t>Next paragraph.</w:t></w:r></w:p>"#
        );

        let paragraphs = DocxExtractor.paragraphs_from_bytes(&raw_docx(&body)).unwrap();

        assert_eq!(
            paragraphs.first().map(String::as_str),
            Some("Before the box we write this sentence. After the box the paragraph continues here.")
        );
        assert_eq!(paragraphs.last().map(String::as_str), Some("Next paragraph."));
        assert!(paragraphs.iter().all(|p| !p.contains("sentence.Inside")));
    }

    #[test]
    fn test_not_a_docx_is_an_error() {
        assert!(DocxExtractor.paragraphs_from_bytes(b"plain bytes").is_err());
    }

    #[test]
    fn test_unknown_entity_is_left_alone() {
        assert_eq!(decode_entities("a &bogus; b"), "a &bogus; b");
        assert_eq!(decode_entities("AT&T &amp; co"), "AT&T & co");
    }

    #[test]
    fn test_split_paragraphs_on_blank_lines() {
        let text = "First line\ncontinues here.\n\n\nSecond paragraph.\n";
        assert_eq!(
            split_paragraphs(text),
            vec!["First line continues here.", "Second paragraph."]
        );
    }
}

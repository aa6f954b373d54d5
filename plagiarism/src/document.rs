//! Document references and plain-text extraction.
//!
//! Submissions are Word documents. A `.docx` file is a zip archive whose body lives in
//! `word/document.xml`; its text is read paragraph by paragraph, one line per
//! paragraph. Plain text files are also accepted so prior work can be compared from
//! the command line.

use quick_xml::Reader;
use quick_xml::events::Event;
use serde::Serialize;
use std::fmt;
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};
use zip::ZipArchive;

use crate::error::ExtractError;

const DOCUMENT_PART: &str = "word/document.xml";

/// Where a submitted document can be retrieved from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentRef {
    Url(String),
    Path(PathBuf),
}

impl DocumentRef {
    /// `http://` and `https://` locations are URLs, anything else is a local path.
    pub fn parse(location: &str) -> Self {
        let lower = location.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            DocumentRef::Url(location.to_string())
        } else {
            DocumentRef::Path(PathBuf::from(location))
        }
    }

    /// Last path segment, without any URL query or fragment.
    pub fn file_name(&self) -> Option<String> {
        match self {
            DocumentRef::Url(url) => {
                let path = url.split(['?', '#']).next().unwrap_or(url);
                path.rsplit('/')
                    .next()
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
            }
            DocumentRef::Path(path) => path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned()),
        }
    }
}

impl fmt::Display for DocumentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentRef::Url(url) => f.write_str(url),
            DocumentRef::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Docx,
    Text,
}

impl DocumentKind {
    /// Kind from the file extension; falls back to sniffing the zip magic number when
    /// the name has no extension.
    pub fn detect(file_name: Option<&str>, bytes: &[u8]) -> Result<Self, ExtractError> {
        let extension = file_name
            .and_then(|name| Path::new(name).extension())
            .map(|ext| ext.to_string_lossy().to_ascii_lowercase());

        match extension.as_deref() {
            Some("docx") => Ok(DocumentKind::Docx),
            Some("txt") | Some("text") | Some("md") => Ok(DocumentKind::Text),
            Some(other) => Err(ExtractError::UnsupportedFormat(other.to_string())),
            None if bytes.starts_with(b"PK") => Ok(DocumentKind::Docx),
            None => Ok(DocumentKind::Text),
        }
    }
}

/// Plain text of a document.
pub fn extract_text(bytes: Vec<u8>, kind: DocumentKind) -> Result<String, ExtractError> {
    match kind {
        DocumentKind::Docx => extract_docx(&bytes),
        DocumentKind::Text => Ok(String::from_utf8(bytes)?),
    }
}

fn extract_docx(bytes: &[u8]) -> Result<String, ExtractError> {
    let mut archive =
        ZipArchive::new(Cursor::new(bytes)).map_err(|e| ExtractError::Archive(e.to_string()))?;

    let mut xml = String::new();
    archive
        .by_name(DOCUMENT_PART)
        .map_err(|_| ExtractError::MissingPart(DOCUMENT_PART))?
        .read_to_string(&mut xml)
        .map_err(|e| ExtractError::Archive(e.to_string()))?;

    Ok(docx_paragraphs(&xml)?.join("\n"))
}

/// Paragraph being read. Paragraphs nest inside text boxes, so each open `<w:p>` keeps
/// its own slot and run depth.
struct OpenParagraph {
    slot: usize,
    runs: usize,
}

/// Text of every `<w:p>` element, in the order the paragraphs open.
///
/// Only `<w:t>` content counts as text; `<w:tab/>`, `<w:br/>` and `<w:cr/>` inside a run
/// become a tab or a line break. Comments and processing instructions are skipped.
fn docx_paragraphs(xml: &str) -> Result<Vec<String>, ExtractError> {
    let mut reader = Reader::from_str(xml);

    let mut paragraphs: Vec<String> = Vec::new();
    let mut open: Vec<OpenParagraph> = Vec::new();
    let mut in_text = false;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| ExtractError::Xml(format!("at byte {}: {e}", reader.buffer_position())))?;

        match event {
            Event::Start(e) => match e.name().as_ref() {
                b"w:p" => {
                    open.push(OpenParagraph {
                        slot: paragraphs.len(),
                        runs: 0,
                    });
                    paragraphs.push(String::new());
                }
                b"w:r" => {
                    if let Some(para) = open.last_mut() {
                        para.runs += 1;
                    }
                }
                b"w:t" => in_text = true,
                _ => {}
            },
            Event::End(e) => match e.name().as_ref() {
                b"w:p" => {
                    open.pop();
                }
                b"w:r" => {
                    if let Some(para) = open.last_mut() {
                        para.runs = para.runs.saturating_sub(1);
                    }
                }
                b"w:t" => in_text = false,
                _ => {}
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"w:p" => paragraphs.push(String::new()),
                name => {
                    // tab stops in <w:pPr> are also <w:tab/>; only those inside a run are text
                    let Some(para) = open.last().filter(|p| p.runs > 0) else {
                        continue;
                    };
                    match name {
                        b"w:tab" => paragraphs[para.slot].push('\t'),
                        b"w:br" | b"w:cr" => paragraphs[para.slot].push('\n'),
                        _ => {}
                    }
                }
            },
            Event::Text(t) if in_text => {
                if let Some(para) = open.last() {
                    let text = t
                        .unescape()
                        .map_err(|e| ExtractError::Xml(e.to_string()))?;
                    paragraphs[para.slot].push_str(&text);
                }
            }
            Event::CData(c) if in_text => {
                if let Some(para) = open.last() {
                    paragraphs[para.slot].push_str(&String::from_utf8_lossy(&c.into_inner()));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(paragraphs)
}


#[cfg(test)]
mod tests {
    use super::test_support::{docx_bytes, docx_from_xml};
    use super::*;

    #[test]
    fn test_parse_document_ref() {
        assert_eq!(
            DocumentRef::parse("https://cdn.example.com/a.docx"),
            DocumentRef::Url("https://cdn.example.com/a.docx".into())
        );
        assert_eq!(
            DocumentRef::parse("work/essay.docx"),
            DocumentRef::Path(PathBuf::from("work/essay.docx"))
        );
    }

    #[test]
    fn test_document_ref_serializes_tagged() {
        assert_eq!(
            serde_json::to_value(DocumentRef::parse("https://cdn.example.com/a.docx")).unwrap(),
            serde_json::json!({ "url": "https://cdn.example.com/a.docx" })
        );
        assert_eq!(
            serde_json::to_value(DocumentRef::parse("work/a.docx")).unwrap(),
            serde_json::json!({ "path": "work/a.docx" })
        );
    }

    #[test]
    fn test_file_name_strips_query() {
        let doc = DocumentRef::parse("https://cdn.example.com/raw/upload/essay.docx?v=3#top");
        assert_eq!(doc.file_name().as_deref(), Some("essay.docx"));
        let dir = DocumentRef::parse("https://cdn.example.com/");
        assert_eq!(dir.file_name(), None);
    }

    #[test]
    fn test_detect_kind() {
        assert_eq!(DocumentKind::detect(Some("A.DOCX"), b"").unwrap(), DocumentKind::Docx);
        assert_eq!(DocumentKind::detect(Some("notes.txt"), b"").unwrap(), DocumentKind::Text);
        assert_eq!(DocumentKind::detect(None, b"PK\x03\x04").unwrap(), DocumentKind::Docx);
        assert_eq!(DocumentKind::detect(None, b"hello").unwrap(), DocumentKind::Text);
        assert!(matches!(
            DocumentKind::detect(Some("report.pdf"), b"%PDF"),
            Err(ExtractError::UnsupportedFormat(ext)) if ext == "pdf"
        ));
    }

    #[test]
    fn test_extract_docx_paragraphs() {
        let bytes = docx_bytes(&["First paragraph.", "Second &amp; last &lt;para&gt;."]);
        let text = extract_text(bytes, DocumentKind::Docx).unwrap();
        assert_eq!(text, "First paragraph.\nSecond & last <para>.");
    }

    #[test]
    fn test_extract_docx_runs_tabs_and_empty_paragraphs() {
        let xml = concat!(
            r#"<w:document><w:body>"#,
            r#"<w:p><w:pPr><w:pStyle w:val="Title"/></w:pPr><w:r><w:t>Split</w:t></w:r><w:r><w:tab/><w:t xml:space="preserve"> runs</w:t></w:r></w:p>"#,
            r#"<w:p/>"#,
            r#"<w:p w:rsidR="1"/>"#,
            r#"<w:p><w:r><w:t>line</w:t><w:br/><w:t>break &#233;&#x2019;</w:t></w:r></w:p>"#,
            r#"</w:body></w:document>"#
        );
        let text = extract_text(docx_from_xml(xml), DocumentKind::Docx).unwrap();
        assert_eq!(text, "Split\t runs\n\n\nline\nbreak é\u{2019}");
    }

    #[test]
    fn test_extract_docx_self_closing_text_element() {
        let xml = concat!(
            r#"<w:document><w:body><w:p>"#,
            r#"<w:r><w:t xml:space="preserve"/></w:r><w:r><w:t>Hello</w:t></w:r>"#,
            r#"</w:p></w:body></w:document>"#
        );
        let text = extract_text(docx_from_xml(xml), DocumentKind::Docx).unwrap();
        assert_eq!(text, "Hello");
    }

    #[test]
    fn test_extract_docx_text_box_keeps_outer_paragraph() {
        let xml = concat!(
            r#"<w:document><w:body><w:p>"#,
            r#"<w:r><w:drawing><wps:txbx><w:txbxContent>"#,
            r#"<w:p><w:r><w:t>inner</w:t></w:r></w:p>"#,
            r#"</w:txbxContent></wps:txbx></w:drawing></w:r>"#,
            r#"<w:r><w:t>outer text</w:t></w:r>"#,
            r#"</w:p></w:body></w:document>"#
        );
        let text = extract_text(docx_from_xml(xml), DocumentKind::Docx).unwrap();
        assert_eq!(text, "outer text\ninner");
    }

    #[test]
    fn test_extract_docx_ignores_comments_and_tab_stops() {
        let xml = concat!(
            r#"<w:document><w:body><w:p>"#,
            r#"<w:pPr><w:tabs><w:tab w:val="left" w:pos="720"/></w:tabs></w:pPr>"#,
            r#"<!-- <w:t>hidden</w:t> --><w:r><w:t>shown</w:t></w:r>"#,
            r#"</w:p></w:body></w:document>"#
        );
        let text = extract_text(docx_from_xml(xml), DocumentKind::Docx).unwrap();
        assert_eq!(text, "shown");
    }

    #[test]
    fn test_extract_docx_malformed_xml() {
        let xml = r#"<w:document><w:body><w:p><w:r><w:t>open</w:r></w:p></w:body></w:document>"#;
        assert!(matches!(
            extract_text(docx_from_xml(xml), DocumentKind::Docx),
            Err(ExtractError::Xml(_))
        ));
    }

    #[test]
    fn test_extract_docx_missing_body() {
        let mut buf = Vec::new();
        {
            use std::io::Write;
            let mut zip = zip::ZipWriter::new(Cursor::new(&mut buf));
            zip.start_file("other.xml", zip::write::SimpleFileOptions::default())
                .unwrap();
            zip.write_all(b"<x/>").unwrap();
            zip.finish().unwrap();
        }
        assert!(matches!(
            extract_text(buf, DocumentKind::Docx),
            Err(ExtractError::MissingPart("word/document.xml"))
        ));
    }

    #[test]
    fn test_extract_not_a_zip() {
        assert!(matches!(
            extract_text(b"plain words".to_vec(), DocumentKind::Docx),
            Err(ExtractError::Archive(_))
        ));
    }

    #[test]
    fn test_extract_text_file() {
        assert_eq!(
            extract_text("héllo".as_bytes().to_vec(), DocumentKind::Text).unwrap(),
            "héllo"
        );
        assert!(matches!(
            extract_text(vec![0xff, 0xfe], DocumentKind::Text),
            Err(ExtractError::Encoding(_))
        ));
    }
}

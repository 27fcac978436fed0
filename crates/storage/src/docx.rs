//! Plain-text extraction from Word (`.docx`) lesson files.
//!
//! A `.docx` is a zip archive; the body lives in `word/document.xml` as
//! `w:p` paragraphs made of `w:t` text runs. Paragraph texts are joined
//! with `\n`, tabs and line breaks inside a paragraph are kept.

use std::io::{Cursor, Read};

use quick_xml::Reader;
use quick_xml::events::Event;
use thiserror::Error;

const DOCUMENT_PART: &str = "word/document.xml";

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DocxError {
    #[error("not a docx archive: {0}")]
    Archive(String),

    #[error("malformed document.xml: {0}")]
    Xml(String),
}

/// Returns the paragraph text of a `.docx` file's main document.
///
/// # Errors
///
/// Returns `DocxError` if the bytes are not a zip archive with a readable
/// `word/document.xml`, or if that part is not well-formed XML.
pub fn extract_text(bytes: &[u8]) -> Result<String, DocxError> {
    let mut archive =
        zip::ZipArchive::new(Cursor::new(bytes)).map_err(|e| DocxError::Archive(e.to_string()))?;
    let mut xml = String::new();
    archive
        .by_name(DOCUMENT_PART)
        .map_err(|e| DocxError::Archive(e.to_string()))?
        .read_to_string(&mut xml)
        .map_err(|e| DocxError::Archive(e.to_string()))?;
    paragraphs_from_xml(&xml)
}

fn paragraphs_from_xml(xml: &str) -> Result<String, DocxError> {
    let mut reader = Reader::from_str(xml);
    let mut paragraphs: Vec<String> = Vec::new();
    let mut current: Option<String> = None;
    let mut in_text = false;

    loop {
        match reader.read_event().map_err(|e| DocxError::Xml(e.to_string()))? {
            Event::Start(tag) => match tag.name().as_ref() {
                b"w:p" => current = Some(String::new()),
                b"w:t" => in_text = true,
                _ => {}
            },
            Event::Empty(tag) => match tag.name().as_ref() {
                b"w:p" => paragraphs.push(String::new()),
                b"w:tab" => push_to(&mut current, "\t"),
                b"w:br" | b"w:cr" => push_to(&mut current, "\n"),
                _ => {}
            },
            Event::Text(text) if in_text => {
                let text = text.unescape().map_err(|e| DocxError::Xml(e.to_string()))?;
                push_to(&mut current, &text);
            }
            Event::End(tag) => match tag.name().as_ref() {
                b"w:t" => in_text = false,
                b"w:p" => paragraphs.extend(current.take()),
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(paragraphs.join("\n"))
}

fn push_to(paragraph: &mut Option<String>, text: &str) {
    if let Some(p) = paragraph {
        p.push_str(text);
    }
}

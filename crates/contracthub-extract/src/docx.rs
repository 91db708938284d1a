//! DOCX text extraction.
//!
//! A DOCX file is a ZIP container; body text lives in `word/document.xml`
//! as `w:t` runs grouped into `w:p` paragraphs.

use std::io::{Cursor, Read};

use quick_xml::Reader;
use quick_xml::events::Event;
use zip::ZipArchive;

use contracthub_core::error::{AppError, ErrorKind};
use contracthub_core::result::AppResult;

const DOCUMENT_PART: &str = "word/document.xml";

/// Extract body text, one line per paragraph.
pub fn extract_docx(data: &[u8]) -> AppResult<String> {
    let mut archive = ZipArchive::new(Cursor::new(data)).map_err(|e| {
        AppError::with_source(ErrorKind::Extraction, "Failed to open DOCX container", e)
    })?;

    let mut xml = String::new();
    archive
        .by_name(DOCUMENT_PART)
        .map_err(|e| {
            AppError::with_source(ErrorKind::Extraction, "DOCX is missing word/document.xml", e)
        })?
        .read_to_string(&mut xml)
        .map_err(|e| AppError::with_source(ErrorKind::Extraction, "Failed to read DOCX body", e))?;

    document_text(&xml)
}

fn document_text(xml: &str) -> AppResult<String> {
    let mut reader = Reader::from_str(xml);
    let mut text = String::new();
    let mut in_run = false;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| AppError::with_source(ErrorKind::Extraction, "Malformed DOCX XML", e))?;
        match event {
            Event::Start(e) if e.name().as_ref() == b"w:t" => in_run = true,
            Event::End(e) => match e.name().as_ref() {
                b"w:t" => in_run = false,
                b"w:p" => text.push('\n'),
                _ => {}
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"w:tab" => text.push('\t'),
                b"w:br" | b"w:cr" => text.push('\n'),
                _ => {}
            },
            Event::Text(t) if in_run => {
                let unescaped = t.unescape().map_err(|e| {
                    AppError::with_source(ErrorKind::Extraction, "Malformed DOCX XML", e)
                })?;
                text.push_str(&unescaped);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(text)
}

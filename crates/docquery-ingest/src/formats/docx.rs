//! Word-processing (DOCX) extraction.
//!
//! Reads `word/document.xml` from the OOXML package and emits one line per
//! body paragraph. Tables, images and other non-paragraph content are dropped.

use std::io::{Cursor, Read};

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use super::Extractor;
use docquery_core::{Error, Result};

const DOCUMENT_PART: &str = "word/document.xml";

static TABLE_TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<w:tbl[\s>]|</w:tbl>").expect("table tag regex"));

static PARAGRAPH_PROPS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<w:pPr[\s>].*?</w:pPr>").expect("paragraph props regex"));

static PARAGRAPH_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)<w:p(?:\s[^>]*)?/>|<w:p(?:\s[^>]*)?>(?P<body>.*?)</w:p>")
        .expect("paragraph regex")
});

static RUN_TOKEN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?s)<w:t(?:\s[^>/]*)?>(?P<text>.*?)</w:t>|(?P<tab><w:tab(?:\s[^>]*)?/>)|(?P<br><w:(?:br|cr)(?:\s[^>]*)?/>)",
    )
    .expect("run token regex")
});

static ENTITY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"&(#x[0-9a-fA-F]+|#[0-9]+|amp|lt|gt|quot|apos);").expect("entity regex"));

#[derive(Debug, Default, Clone, Copy)]
pub struct DocxExtractor;

impl DocxExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Extractor for DocxExtractor {
    fn name(&self) -> &'static str {
        "docx"
    }

    fn content_types(&self) -> &[&'static str] {
        &["application/vnd.openxmlformats-officedocument.wordprocessingml.document"]
    }

    fn extensions(&self) -> &[&'static str] {
        &["docx"]
    }

    fn extract(&self, bytes: &[u8]) -> Result<String> {
        let xml = read_document_part(bytes)?;
        Ok(paragraphs(&xml).join("\n"))
    }
}

fn read_document_part(bytes: &[u8]) -> Result<String> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| Error::Parse(format!("Invalid DOCX archive: {}", e)))?;

    let mut part = archive
        .by_name(DOCUMENT_PART)
        .map_err(|e| Error::Parse(format!("DOCX has no {}: {}", DOCUMENT_PART, e)))?;

    let mut raw = Vec::new();
    part.read_to_end(&mut raw)
        .map_err(|e| Error::Parse(format!("Failed to read {}: {}", DOCUMENT_PART, e)))?;

    Ok(super::decode_lossy(&raw))
}

/// Text of each body paragraph, in document order.
fn paragraphs(xml: &str) -> Vec<String> {
    let without_tables = strip_tables(xml);
    let body = PARAGRAPH_PROPS_RE.replace_all(&without_tables, "");

    PARAGRAPH_RE
        .captures_iter(&body)
        .map(|caps| match caps.name("body") {
            Some(inner) => paragraph_text(inner.as_str()),
            None => String::new(),
        })
        .collect()
}

/// Remove every top-level `<w:tbl>` element, nested tables included.
///
/// An unterminated table drops the rest of the document.
fn strip_tables(xml: &str) -> String {
    let mut out = String::with_capacity(xml.len());
    let mut depth = 0usize;
    let mut copied_to = 0;

    for tag in TABLE_TAG_RE.find_iter(xml) {
        if tag.as_str().starts_with("</") {
            match depth {
                0 => {}
                1 => {
                    depth = 0;
                    copied_to = tag.end();
                }
                _ => depth -= 1,
            }
        } else {
            if depth == 0 {
                out.push_str(&xml[copied_to..tag.start()]);
            }
            depth += 1;
        }
    }

    if depth == 0 {
        out.push_str(&xml[copied_to..]);
    }
    out
}

fn paragraph_text(inner: &str) -> String {
    let mut text = String::new();
    for token in RUN_TOKEN_RE.captures_iter(inner) {
        if let Some(t) = token.name("text") {
            text.push_str(&decode_entities(t.as_str()));
        } else if token.name("tab").is_some() {
            text.push('\t');
        } else if token.name("br").is_some() {
            text.push('\n');
        }
    }
    text
}

fn decode_entities(s: &str) -> String {
    ENTITY_RE
        .replace_all(s, |caps: &Captures| {
            let entity = &caps[1];
            let decoded = match entity {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                _ => entity
                    .strip_prefix("#x")
                    .map(|hex| u32::from_str_radix(hex, 16))
                    .or_else(|| entity.strip_prefix('#').map(|dec| dec.parse::<u32>()))
                    .and_then(|n| n.ok())
                    .and_then(char::from_u32),
            };
            decoded.map(String::from).unwrap_or_default()
        })
        .into_owned()
}

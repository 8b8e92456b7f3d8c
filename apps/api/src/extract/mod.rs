//! Document text extraction — turns uploaded PDF/DOCX bytes into clean text.
//!
//! Extraction tolerates individual pages or paragraphs yielding nothing and
//! fails only when the entire document produces no text.

use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::Reader;
use tracing::info;

use crate::errors::AppError;

/// Extracts text from an uploaded document based on its file extension.
/// Accepts `pdf`, `docx` and `doc` (with or without a leading dot).
pub fn extract_text(bytes: &[u8], extension: &str) -> Result<String, AppError> {
    let normalized = extension.trim_start_matches('.').to_ascii_lowercase();
    match normalized.as_str() {
        "pdf" => extract_pdf(bytes),
        "docx" | "doc" => extract_docx(bytes),
        _ => Err(AppError::UnsupportedFormat(normalized)),
    }
}

fn extract_pdf(bytes: &[u8]) -> Result<String, AppError> {
    let raw = pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| AppError::ExtractionFailed(format!("PDF parsing error: {e}")))?;

    let cleaned = clean_extracted_text(&raw);
    if cleaned.is_empty() {
        return Err(AppError::ExtractionFailed(
            "No text content could be extracted from PDF. \
             The PDF may be image-based or encrypted."
                .to_string(),
        ));
    }

    info!("Extracted {} chars from PDF", cleaned.len());
    Ok(cleaned)
}

/// A DOCX file is a zip archive; the document body lives in
/// `word/document.xml`. Text runs are collected and paragraph boundaries
/// become newlines.
fn extract_docx(bytes: &[u8]) -> Result<String, AppError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| AppError::ExtractionFailed(format!("DOCX is not a valid archive: {e}")))?;

    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|e| AppError::ExtractionFailed(format!("DOCX has no document body: {e}")))?
        .read_to_string(&mut xml)
        .map_err(|e| AppError::ExtractionFailed(format!("Failed to read DOCX body: {e}")))?;

    let mut reader = Reader::from_str(&xml);
    let mut text = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Text(t)) => {
                let fragment = t
                    .unescape()
                    .map_err(|e| AppError::ExtractionFailed(format!("Invalid DOCX XML: {e}")))?;
                text.push_str(&fragment);
            }
            Ok(Event::End(e)) if e.name().as_ref() == b"w:p" => text.push('\n'),
            Ok(Event::Empty(e)) if e.name().as_ref() == b"w:br" => text.push('\n'),
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(AppError::ExtractionFailed(format!("Invalid DOCX XML: {e}")));
            }
            _ => {}
        }
    }

    let cleaned = clean_extracted_text(&text);
    if cleaned.is_empty() {
        return Err(AppError::ExtractionFailed(
            "No text content found in DOCX".to_string(),
        ));
    }

    info!("Extracted {} chars from DOCX", cleaned.len());
    Ok(cleaned)
}

/// Cleans and normalizes extracted text: strips control characters,
/// normalizes bullet glyphs to `* `, collapses space runs, trims each line,
/// and caps blank-line runs at one.
pub fn clean_extracted_text(text: &str) -> String {
    let mut normalized = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\u{00}'..='\u{08}' | '\u{0b}' | '\u{0c}' | '\u{0e}'..='\u{1f}' => {}
            '\u{7f}'..='\u{9f}' => {}
            '•' | '·' | '◦' | '▪' | '‣' | '⚫' => normalized.push_str("* "),
            _ => normalized.push(c),
        }
    }

    let mut lines: Vec<String> = Vec::new();
    let mut blank_run = 0usize;
    for raw_line in normalized.lines() {
        let mut collapsed = String::with_capacity(raw_line.len());
        let mut prev_space = false;
        for c in raw_line.chars() {
            if c == ' ' {
                if !prev_space {
                    collapsed.push(' ');
                }
                prev_space = true;
            } else {
                prev_space = false;
                collapsed.push(c);
            }
        }

        let trimmed = collapsed.trim();
        if trimmed.is_empty() {
            blank_run += 1;
            if blank_run == 1 {
                lines.push(String::new());
            }
        } else {
            blank_run = 0;
            lines.push(trimmed.to_string());
        }
    }

    lines.join("\n").trim().to_string()
}

/// Truncates to at most `max` chars on a char boundary. Used to cap prompt
/// excerpts and uploaded text.
pub fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn docx_with_body(document_xml: &str) -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        {
            let mut writer = zip::ZipWriter::new(&mut buf);
            let options = zip::write::FileOptions::default();
            writer.start_file("word/document.xml", options).unwrap();
            writer.write_all(document_xml.as_bytes()).unwrap();
            writer.finish().unwrap();
        }
        buf.into_inner()
    }

    #[test]
    fn test_unsupported_extension_rejected() {
        let err = extract_text(b"data", ".txt").unwrap_err();
        assert!(matches!(err, AppError::UnsupportedFormat(ext) if ext == "txt"));
    }

    #[test]
    fn test_extension_normalization() {
        // Uppercase and dotted extensions route to the same parser.
        let err = extract_text(b"not a zip", ".DOCX").unwrap_err();
        assert!(matches!(err, AppError::ExtractionFailed(_)));
    }

    #[test]
    fn test_docx_paragraphs_extracted() {
        let bytes = docx_with_body(
            r#"<?xml version="1.0"?>
            <w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
              <w:body>
                <w:p><w:r><w:t>Senior Backend Engineer</w:t></w:r></w:p>
                <w:p><w:r><w:t>Built APIs with Rust and Axum</w:t></w:r></w:p>
              </w:body>
            </w:document>"#,
        );
        let text = extract_text(&bytes, "docx").unwrap();
        assert!(text.contains("Senior Backend Engineer"));
        assert!(text.contains("Built APIs with Rust and Axum"));
        assert!(text.contains('\n'));
    }

    #[test]
    fn test_docx_with_no_text_fails() {
        let bytes = docx_with_body(
            r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
              <w:body><w:p></w:p></w:body>
            </w:document>"#,
        );
        let err = extract_text(&bytes, "docx").unwrap_err();
        assert!(matches!(err, AppError::ExtractionFailed(_)));
    }

    #[test]
    fn test_invalid_pdf_fails() {
        let err = extract_text(b"definitely not a pdf", "pdf").unwrap_err();
        assert!(matches!(err, AppError::ExtractionFailed(_)));
    }

    #[test]
    fn test_clean_normalizes_bullets() {
        assert_eq!(
            clean_extracted_text("• Shipped feature\n· Fixed bug"),
            "* Shipped feature\n* Fixed bug"
        );
    }

    #[test]
    fn test_clean_strips_control_chars() {
        assert_eq!(clean_extracted_text("abc\u{0}\u{1}def"), "abcdef");
    }

    #[test]
    fn test_clean_collapses_spaces_and_blank_lines() {
        let input = "line  one\n\n\n\nline    two";
        assert_eq!(clean_extracted_text(input), "line one\n\nline two");
    }

    #[test]
    fn test_clean_trims_lines() {
        assert_eq!(clean_extracted_text("   padded   \n  text "), "padded\ntext");
    }

    #[test]
    fn test_truncate_chars_short_input_unchanged() {
        assert_eq!(truncate_chars("hello", 10), "hello");
    }

    #[test]
    fn test_truncate_chars_cuts_at_limit() {
        assert_eq!(truncate_chars("hello world", 5), "hello");
    }

    #[test]
    fn test_truncate_chars_multibyte_safe() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
    }
}

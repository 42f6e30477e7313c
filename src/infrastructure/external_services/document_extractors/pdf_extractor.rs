use async_trait::async_trait;
use lopdf::{Dictionary, Document, Object};
use rayon::iter::{IntoParallelIterator, ParallelIterator};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::{info, warn};

use crate::application::ports::document_extractor::{
    DocumentExtractionError, DocumentExtractor, ExtractedDocument, ExtractionOptions,
};
use crate::domain::entities::DocumentPage;
use crate::domain::value_objects::DocumentInfo;

// lopdf renders glyph-positioning gaps as runs of spaces.
static INLINE_WHITESPACE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"[ \t\x{A0}]+").ok());

pub struct PdfExtractor;

impl PdfExtractor {
    pub fn new() -> Self {
        Self
    }

    fn filter_func(object_id: (u32, u16), object: &mut Object) -> Option<((u32, u16), Object)> {
        static IGNORE: &[&[u8]] = &[
            b"Length",
            b"BBox",
            b"Matrix",
            b"Filter",
            b"ColorSpace",
            b"Width",
            b"Height",
            b"BitsPerComponent",
            b"PTEX.FileName",
            b"PTEX.PageNumber",
            b"PTEX.InfoDict",
            b"FontDescriptor",
            b"ExtGState",
            b"MediaBox",
        ];

        if let Object::Dictionary(dict) = object {
            let keys_to_remove: Vec<_> = dict
                .iter()
                .filter(|(key, _)| IGNORE.contains(&key.as_slice()))
                .map(|(key, _)| key.clone())
                .collect();
            for key in keys_to_remove {
                dict.remove(&key);
            }
        }

        Some((object_id, object.to_owned()))
    }

    /// Trims line ends, collapses runs of inline whitespace and drops blank lines.
    pub fn clean_page_text(raw: &str) -> String {
        raw.lines()
            .map(|line| match INLINE_WHITESPACE.as_ref() {
                Some(re) => re.replace_all(line.trim_end(), " ").into_owned(),
                None => line.trim_end().to_string(),
            })
            .filter(|line| !line.trim().is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn extract_blocking(
        path: &Path,
        options: &ExtractionOptions,
    ) -> Result<ExtractedDocument, DocumentExtractionError> {
        let mut doc = Document::load_filtered(path, Self::filter_func)
            .map_err(|e| DocumentExtractionError::CorruptedFile(e.to_string()))?;

        if doc.is_encrypted() {
            doc.decrypt(&options.password).map_err(|_e| {
                DocumentExtractionError::ExtractionFailed(
                    "Failed to decrypt PDF - invalid password".to_string(),
                )
            })?;
        }

        let page_numbers: Vec<u32> = doc.get_pages().keys().copied().collect();

        let mut extracted: Vec<Result<DocumentPage, String>> = page_numbers
            .into_par_iter()
            .map(|page_num| {
                doc.extract_text(&[page_num])
                    .map(|text| DocumentPage::new(page_num, Self::clean_page_text(&text)))
                    .map_err(|e| format!("Failed to extract text from page {}: {}", page_num, e))
            })
            .collect();

        let mut pages = Vec::with_capacity(extracted.len());
        let mut warnings = Vec::new();
        for result in extracted.drain(..) {
            match result {
                Ok(page) => pages.push(page),
                Err(e) => {
                    warn!("{}", e);
                    warnings.push(e);
                }
            }
        }
        pages.sort_by_key(|page| page.page_number());

        if pages.iter().all(|page| page.is_blank()) {
            return Err(DocumentExtractionError::NoText(path.display().to_string()));
        }

        Ok(ExtractedDocument {
            pages,
            info: Self::read_info(&doc),
            warnings,
        })
    }

    fn info_dictionary(doc: &Document) -> Option<&Dictionary> {
        match doc.trailer.get(b"Info").ok()? {
            Object::Reference(id) => doc.get_dictionary(*id).ok(),
            other => other.as_dict().ok(),
        }
    }

    fn read_info(doc: &Document) -> DocumentInfo {
        let Some(info) = Self::info_dictionary(doc) else {
            return DocumentInfo::default();
        };

        let field = |key: &[u8]| {
            info.get(key)
                .ok()
                .and_then(|value| value.as_str().ok())
                .map(decode_pdf_string)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        DocumentInfo {
            title: field(b"Title"),
            author: field(b"Author"),
            subject: field(b"Subject"),
        }
    }
}

/// PDF text strings are either UTF-16BE with a byte-order mark or single-byte.
fn decode_pdf_string(bytes: &[u8]) -> String {
    if let Some(utf16) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let units = utf16
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]));
        return char::decode_utf16(units)
            .map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER))
            .collect();
    }
    String::from_utf8_lossy(bytes).into_owned()
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentExtractor for PdfExtractor {
    async fn extract_pages(
        &self,
        file_path: &Path,
        options: ExtractionOptions,
    ) -> Result<ExtractedDocument, DocumentExtractionError> {
        if !file_path.exists() {
            return Err(DocumentExtractionError::FileNotFound(
                file_path.display().to_string(),
            ));
        }
        if !self.can_extract(file_path) {
            return Err(DocumentExtractionError::UnsupportedFormat(
                file_path.display().to_string(),
            ));
        }

        let path: PathBuf = file_path.to_path_buf();
        let document = tokio::task::spawn_blocking(move || Self::extract_blocking(&path, &options))
            .await
            .map_err(|e| DocumentExtractionError::ExtractionFailed(e.to_string()))??;

        info!(
            "Extracted {} pages from {} ({} warnings)",
            document.page_count(),
            file_path.display(),
            document.warnings.len()
        );
        Ok(document)
    }

    fn can_extract(&self, file_path: &Path) -> bool {
        file_path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{Stream, dictionary};

    fn write_pdf(path: &Path, page_lines: &[&[&str]], title: Option<&str>) {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut kids: Vec<Object> = Vec::new();
        for lines in page_lines {
            let mut operations = vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("Td", vec![72.into(), 720.into()]),
            ];
            for line in lines.iter() {
                operations.push(Operation::new("Tj", vec![Object::string_literal(*line)]));
                operations.push(Operation::new("Td", vec![0.into(), (-14).into()]));
            }
            operations.push(Operation::new("ET", vec![]));

            let content = Content { operations };
            let content_id =
                doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        if let Some(title) = title {
            let info_id = doc.add_object(dictionary! {
                "Title" => Object::string_literal(title),
            });
            doc.trailer.set("Info", info_id);
        }

        doc.save(path).unwrap();
    }

    #[tokio::test]
    async fn test_extracts_pages_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("act.pdf");
        write_pdf(
            &path,
            &[&["Part 1 Preliminary"], &["Section 36 Primary duty of care"]],
            Some("Health and Safety at Work Act 2015"),
        );

        let document = PdfExtractor::new()
            .extract_pages(&path, ExtractionOptions::default())
            .await
            .unwrap();

        assert_eq!(document.page_count(), 2);
        assert_eq!(document.pages[0].page_number(), 1);
        assert!(document.pages[0].text().contains("Preliminary"));
        assert_eq!(document.pages[1].page_number(), 2);
        assert!(document.pages[1].has_section());
        assert_eq!(
            document.info.title.as_deref(),
            Some("Health and Safety at Work Act 2015")
        );
        assert!(document.info.author.is_none());
    }

    #[tokio::test]
    async fn test_missing_info_dictionary() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("act.pdf");
        write_pdf(&path, &[&["one"], &["two"], &["three"]], None);

        let document = PdfExtractor::new()
            .extract_pages(&path, ExtractionOptions::default())
            .await
            .unwrap();

        assert_eq!(document.page_count(), 3);
        assert_eq!(document.info, DocumentInfo::default());
    }

    #[tokio::test]
    async fn test_blank_document_has_no_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scanned.pdf");
        write_pdf(&path, &[&[]], None);

        let result = PdfExtractor::new()
            .extract_pages(&path, ExtractionOptions::default())
            .await;

        assert!(matches!(result, Err(DocumentExtractionError::NoText(_))));
    }

    #[tokio::test]
    async fn test_missing_file() {
        let result = PdfExtractor::new()
            .extract_pages(Path::new("does/not/exist.pdf"), ExtractionOptions::default())
            .await;
        assert!(matches!(result, Err(DocumentExtractionError::FileNotFound(_))));
    }

    #[tokio::test]
    async fn test_garbage_file_is_corrupted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.pdf");
        std::fs::write(&path, b"definitely not a pdf").unwrap();

        let result = PdfExtractor::new()
            .extract_pages(&path, ExtractionOptions::default())
            .await;
        assert!(matches!(result, Err(DocumentExtractionError::CorruptedFile(_))));
    }

    #[test]
    fn test_clean_page_text() {
        let raw = "Part 2   Key\tprinciples   \n\n   \n36  Primary duty of care  \n";
        assert_eq!(
            PdfExtractor::clean_page_text(raw),
            "Part 2 Key principles\n36 Primary duty of care"
        );
    }

    #[test]
    fn test_decode_utf16_string() {
        let bytes = [0xFE, 0xFF, 0x00, 0x48, 0x00, 0x53, 0x00, 0x57, 0x00, 0x41];
        assert_eq!(decode_pdf_string(&bytes), "HSWA");
        assert_eq!(decode_pdf_string(b"Act"), "Act");
    }

    #[test]
    fn test_can_extract() {
        let extractor = PdfExtractor::new();
        assert!(extractor.can_extract(Path::new("Act.PDF")));
        assert!(!extractor.can_extract(Path::new("notes.txt")));
    }
}

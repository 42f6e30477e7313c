use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{PageMetadata, SOURCE_TITLE};

/// Number of leading characters inspected when flagging pages that open with a section heading.
const SECTION_SCAN_CHARS: usize = 100;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentPage {
    page_number: u32,
    text: String,
    metadata: PageMetadata,
}

impl DocumentPage {
    pub fn new(page_number: u32, text: String) -> Self {
        let head: String = text.chars().take(SECTION_SCAN_CHARS).collect();
        let metadata = PageMetadata {
            source: SOURCE_TITLE.to_string(),
            page: page_number,
            has_section: head.contains("Section"),
        };

        Self {
            page_number,
            text,
            metadata,
        }
    }

    pub fn page_number(&self) -> u32 {
        self.page_number
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn source(&self) -> &str {
        &self.metadata.source
    }

    pub fn has_section(&self) -> bool {
        self.metadata.has_section
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

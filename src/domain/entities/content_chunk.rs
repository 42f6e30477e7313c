use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentChunk {
    chunk_id: usize,
    page_number: u32,
    start_index: usize,
    chunk_size: usize,
    source: String,
    has_section: bool,
    text: String,
}

impl ContentChunk {
    pub fn new(
        chunk_id: usize,
        page_number: u32,
        start_index: usize,
        source: String,
        has_section: bool,
        text: String,
    ) -> Self {
        Self {
            chunk_id,
            page_number,
            start_index,
            chunk_size: text.chars().count(),
            source,
            has_section,
            text,
        }
    }

    pub fn chunk_id(&self) -> usize {
        self.chunk_id
    }

    pub fn page_number(&self) -> u32 {
        self.page_number
    }

    pub fn start_index(&self) -> usize {
        self.start_index
    }

    /// Length of the chunk text in characters.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn has_section(&self) -> bool {
        self.has_section
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }

    pub fn preview(&self, max_chars: usize) -> String {
        text_preview(&self.text, max_chars)
    }
}

/// First `max_chars` characters of `text`, with line breaks flattened to spaces.
pub fn text_preview(text: &str, max_chars: usize) -> String {
    text.chars()
        .take(max_chars)
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .collect::<String>()
        .trim()
        .to_string()
}

/// Human-inspection record written next to the index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkPreview {
    pub chunk_id: usize,
    pub page: u32,
    pub chunk_size: usize,
    pub preview: String,
}

impl From<&ContentChunk> for ChunkPreview {
    fn from(chunk: &ContentChunk) -> Self {
        let head: String = chunk.text().chars().take(100).collect();
        Self {
            chunk_id: chunk.chunk_id(),
            page: chunk.page_number(),
            chunk_size: chunk.chunk_size(),
            preview: format!("{}...", head),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(text: &str) -> ContentChunk {
        ContentChunk::new(7, 4, 120, "HSWA".to_string(), false, text.to_string())
    }

    #[test]
    fn test_chunk_creation() {
        let chunk = chunk("A PCBU must ensure, so far as is reasonably practicable,");

        assert_eq!(chunk.chunk_id(), 7);
        assert_eq!(chunk.page_number(), 4);
        assert_eq!(chunk.start_index(), 120);
        assert!(!chunk.is_empty());
    }

    #[test]
    fn test_chunk_size_counts_characters() {
        let chunk = chunk("Māori");
        assert_eq!(chunk.chunk_size(), 5);
    }

    #[test]
    fn test_preview_flattens_newlines() {
        let chunk = chunk("Section 36\nPrimary duty of care\n(1) A PCBU must ensure");
        assert_eq!(chunk.preview(31), "Section 36 Primary duty of care");
    }

    #[test]
    fn test_text_preview_counts_characters() {
        assert_eq!(text_preview("  Kaimahi\r\nmeans worker", 14), "Kaimahi  mea");
        assert_eq!(text_preview("Māori", 2), "Mā");
        assert_eq!(text_preview("", 10), "");
    }

    #[test]
    fn test_chunk_preview_record() {
        let text = "w".repeat(250);
        let preview = ChunkPreview::from(&chunk(&text));

        assert_eq!(preview.chunk_id, 7);
        assert_eq!(preview.page, 4);
        assert_eq!(preview.chunk_size, 250);
        assert_eq!(preview.preview.chars().count(), 103);
        assert!(preview.preview.ends_with("..."));
    }
}

use crate::config::ChunkingConfig;
use crate::domain::entities::{ContentChunk, DocumentPage};

const DEFAULT_SEPARATORS: [&str; 5] = ["\n\n", "\n", ".", " ", ""];

#[derive(Debug)]
pub enum TextSplitterError {
    InvalidConfig(String),
}

impl std::fmt::Display for TextSplitterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TextSplitterError::InvalidConfig(msg) => write!(f, "Invalid chunking config: {}", msg),
        }
    }
}

impl std::error::Error for TextSplitterError {}

pub trait RecursiveTextSplitter {
    fn split_text(&self, text: &str) -> Vec<String>;
}

/// Splits text on the first separator that occurs in it, recursing into pieces that are still
/// too long, then merges neighbouring pieces into windows of at most `chunk_size` characters
/// that overlap by up to `chunk_overlap` characters. Separators stay attached to the start of
/// the piece that follows them.
#[derive(Debug, Clone)]
pub struct RTSplitter {
    separators: Vec<&'static str>,
    chunk_size: usize,
    chunk_overlap: usize,
}

impl RTSplitter {
    pub fn new(config: ChunkingConfig) -> Result<Self, TextSplitterError> {
        if config.chunk_size == 0 {
            return Err(TextSplitterError::InvalidConfig(
                "chunk size must be greater than zero".to_string(),
            ));
        }
        if config.chunk_overlap >= config.chunk_size {
            return Err(TextSplitterError::InvalidConfig(format!(
                "chunk overlap ({}) must be smaller than chunk size ({})",
                config.chunk_overlap, config.chunk_size
            )));
        }

        Ok(Self {
            separators: DEFAULT_SEPARATORS.to_vec(),
            chunk_size: config.chunk_size,
            chunk_overlap: config.chunk_overlap,
        })
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn chunk_overlap(&self) -> usize {
        self.chunk_overlap
    }

    /// Splits `text` and pairs every chunk with its character offset in `text`.
    pub fn split_with_offsets(&self, text: &str) -> Vec<(usize, String)> {
        let mut result = Vec::new();
        let mut index = 0usize;
        let mut previous_len = 0usize;

        for chunk in self.split_text(text) {
            let search_from = (index + previous_len).saturating_sub(self.chunk_overlap);
            index = find_char_offset(text, &chunk, search_from)
                .or_else(|| find_char_offset(text, &chunk, 0))
                .unwrap_or(search_from);
            previous_len = char_len(&chunk);
            result.push((index, chunk));
        }

        result
    }

    /// Chunks every non-blank page. Chunk ids run over the whole document in page order.
    pub fn chunk_pages(&self, pages: &[DocumentPage]) -> Vec<ContentChunk> {
        let mut chunks = Vec::new();

        for page in pages.iter().filter(|p| !p.is_blank()) {
            for (start_index, text) in self.split_with_offsets(page.text()) {
                chunks.push(ContentChunk::new(
                    chunks.len(),
                    page.page_number(),
                    start_index,
                    page.source().to_string(),
                    page.has_section(),
                    text,
                ));
            }
        }

        chunks
    }

    fn recursive_split(&self, text: &str, separators: &[&'static str]) -> Vec<String> {
        let mut final_chunks = Vec::new();

        let mut separator = "";
        let mut remaining: &[&'static str] = &[];
        for (i, candidate) in separators.iter().enumerate() {
            if candidate.is_empty() {
                separator = candidate;
                break;
            }
            if text.contains(candidate) {
                separator = candidate;
                remaining = &separators[i + 1..];
                break;
            }
        }

        let mut good_splits: Vec<&str> = Vec::new();

        for piece in split_keeping_separator(text, separator) {
            if char_len(piece) < self.chunk_size {
                good_splits.push(piece);
                continue;
            }

            if !good_splits.is_empty() {
                final_chunks.extend(self.merge_splits(&good_splits));
                good_splits.clear();
            }

            if remaining.is_empty() {
                let trimmed = piece.trim();
                if !trimmed.is_empty() {
                    final_chunks.push(trimmed.to_string());
                }
            } else {
                final_chunks.extend(self.recursive_split(piece, remaining));
            }
        }

        if !good_splits.is_empty() {
            final_chunks.extend(self.merge_splits(&good_splits));
        }

        final_chunks
    }

    fn merge_splits(&self, splits: &[&str]) -> Vec<String> {
        let mut docs = Vec::new();
        let mut current: std::collections::VecDeque<&str> = std::collections::VecDeque::new();
        let mut total = 0usize;

        for piece in splits {
            let len = char_len(piece);

            if total + len > self.chunk_size {
                if !current.is_empty() {
                    if let Some(doc) = join_pieces(&current) {
                        docs.push(doc);
                    }

                    while total > self.chunk_overlap
                        || (total + len > self.chunk_size && total > 0)
                    {
                        match current.pop_front() {
                            Some(front) => total -= char_len(front),
                            None => break,
                        }
                    }
                }
            }

            current.push_back(piece);
            total += len;
        }

        if let Some(doc) = join_pieces(&current) {
            docs.push(doc);
        }

        docs
    }
}

impl Default for RTSplitter {
    fn default() -> Self {
        Self {
            separators: DEFAULT_SEPARATORS.to_vec(),
            chunk_size: ChunkingConfig::default().chunk_size,
            chunk_overlap: ChunkingConfig::default().chunk_overlap,
        }
    }
}

impl RecursiveTextSplitter for RTSplitter {
    fn split_text(&self, text: &str) -> Vec<String> {
        self.recursive_split(text, &self.separators)
    }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

fn join_pieces(pieces: &std::collections::VecDeque<&str>) -> Option<String> {
    let joined: String = pieces.iter().copied().collect();
    let trimmed = joined.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Splits on `separator`, prefixing every piece after the first with the separator that
/// preceded it. An empty separator splits into single characters. Empty pieces are dropped.
fn split_keeping_separator<'a>(text: &'a str, separator: &str) -> Vec<&'a str> {
    if separator.is_empty() {
        return text
            .char_indices()
            .map(|(i, c)| &text[i..i + c.len_utf8()])
            .collect();
    }

    let mut pieces = Vec::new();
    let mut piece_start = 0;
    for (idx, _) in text.match_indices(separator) {
        if idx > piece_start {
            pieces.push(&text[piece_start..idx]);
        }
        piece_start = idx;
    }
    if piece_start < text.len() {
        pieces.push(&text[piece_start..]);
    }

    pieces.into_iter().filter(|p| !p.is_empty()).collect()
}

/// Character offset of the first occurrence of `needle` at or after character `from`.
fn find_char_offset(haystack: &str, needle: &str, from: usize) -> Option<usize> {
    let byte_from = haystack
        .char_indices()
        .nth(from)
        .map(|(i, _)| i)
        .unwrap_or(haystack.len());

    haystack[byte_from..]
        .find(needle)
        .map(|byte_pos| from + char_len(&haystack[byte_from..byte_from + byte_pos]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn splitter(chunk_size: usize, chunk_overlap: usize) -> RTSplitter {
        RTSplitter::new(ChunkingConfig {
            chunk_size,
            chunk_overlap,
        })
        .unwrap()
    }

    fn statute_text() -> String {
        let mut text = String::new();
        for section in 1..=12 {
            text.push_str(&format!(
                "Section {}\n(1) A person conducting a business or undertaking must ensure, so far \
                 as is reasonably practicable, the health and safety of workers. (2) The duty in \
                 subsection (1) applies while the workers are at work in the business.\n\n",
                section
            ));
        }
        text
    }

    #[test]
    fn test_short_text() {
        let chunks = RTSplitter::default().split_text("Short text");
        assert_eq!(chunks, vec!["Short text".to_string()]);
    }

    #[test]
    fn test_blank_text_produces_nothing() {
        assert!(RTSplitter::default().split_text(" \n\n  ").is_empty());
    }

    #[test]
    fn test_single_character_chunks_skip_whitespace() {
        let chunks = splitter(1, 0).split_text("a b\n c");
        assert_eq!(chunks, vec!["a", "b", "c"]);

        let page = DocumentPage::new(1, "ab  cd".to_string());
        for chunk in splitter(1, 0).chunk_pages(&[page]) {
            assert!(!chunk.text().trim().is_empty());
        }
    }

    #[test]
    fn test_chunks_never_exceed_chunk_size() {
        let text = statute_text();
        for (size, overlap) in [(500, 50), (120, 20), (40, 5), (7, 2)] {
            let chunks = splitter(size, overlap).split_text(&text);
            assert!(!chunks.is_empty());
            for chunk in &chunks {
                assert!(
                    chunk.chars().count() <= size,
                    "chunk of {} chars exceeds {}: {:?}",
                    chunk.chars().count(),
                    size,
                    chunk
                );
                assert!(!chunk.trim().is_empty());
            }
        }
    }

    #[test]
    fn test_prefers_paragraph_boundaries() {
        let text = "Para one sentence.\n\nPara two sentence.";
        let chunks = splitter(25, 5).split_text(text);

        assert_eq!(chunks, vec!["Para one sentence.", "Para two sentence."]);
    }

    #[test]
    fn test_consecutive_chunks_overlap() {
        let text = (0..200)
            .map(|i| format!("term{:03}", i))
            .collect::<Vec<_>>()
            .join(" ");
        let chunks = splitter(50, 10).split_text(&text);

        assert!(chunks.len() > 1);
        for pair in chunks.windows(2) {
            let last_word = pair[0].split_whitespace().last().unwrap();
            let first_word = pair[1].split_whitespace().next().unwrap();
            assert_eq!(last_word, first_word);
        }
    }

    #[test]
    fn test_character_level_fallback_counts_chars() {
        let text = "ā".repeat(120);
        let chunked = splitter(50, 0).split_with_offsets(&text);

        let sizes: Vec<usize> = chunked.iter().map(|(_, c)| c.chars().count()).collect();
        let offsets: Vec<usize> = chunked.iter().map(|(o, _)| *o).collect();

        assert_eq!(sizes, vec![50, 50, 20]);
        assert_eq!(offsets, vec![0, 50, 100]);
    }

    #[test]
    fn test_start_offsets_point_at_chunk_text() {
        let text = statute_text();
        for (offset, chunk) in splitter(120, 20).split_with_offsets(&text) {
            let located: String = text.chars().skip(offset).take(chunk.chars().count()).collect();
            assert_eq!(located, chunk);
        }
    }

    #[test]
    fn test_paragraph_offsets() {
        let text = "Para one sentence.\n\nPara two sentence.";
        let chunked = splitter(25, 5).split_with_offsets(text);

        assert_eq!(chunked[0].0, 0);
        assert_eq!(chunked[1].0, 20);
    }

    #[test]
    fn test_rejects_overlap_not_smaller_than_size() {
        let result = RTSplitter::new(ChunkingConfig {
            chunk_size: 50,
            chunk_overlap: 50,
        });
        assert!(matches!(result, Err(TextSplitterError::InvalidConfig(_))));

        let result = RTSplitter::new(ChunkingConfig {
            chunk_size: 0,
            chunk_overlap: 0,
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_chunk_pages_numbers_across_pages() {
        let pages = vec![
            DocumentPage::new(1, "Section 1 Short title\nThis Act is the Health and Safety at Work Act 2015.".to_string()),
            DocumentPage::new(2, "   ".to_string()),
            DocumentPage::new(3, statute_text()),
        ];

        let chunks = splitter(200, 20).chunk_pages(&pages);

        assert!(chunks.len() > 2);
        assert_eq!(chunks[0].page_number(), 1);
        assert!(chunks[0].has_section());
        assert!(chunks.iter().all(|c| c.page_number() != 2));
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.chunk_id(), i);
            assert!(chunk.page_number() >= 1);
            assert!(chunk.chunk_size() <= 200);
        }
    }
}

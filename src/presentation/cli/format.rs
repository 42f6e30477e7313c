//! Plain-text rendering for the console commands.

use crate::application::use_cases::BuildStatistics;
use crate::domain::entities::SourceCitation;

pub const RULE_WIDTH: usize = 80;

pub fn rule(c: char) -> String {
    c.to_string().repeat(RULE_WIDTH)
}

/// One line per source: `  [i] Page p: <preview>...`
pub fn format_sources(sources: &[SourceCitation], preview_chars: usize) -> String {
    sources
        .iter()
        .map(|source| {
            format!(
                "  [{}] Page {}: {}...",
                source.rank,
                source.page_number,
                source.preview(preview_chars)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn format_statistics(stats: &BuildStatistics) -> String {
    let mut lines = vec![
        rule('='),
        "VECTORSTORE STATISTICS".to_string(),
        rule('='),
        format!("Document: {}", stats.document_title),
        format!("Total pages: {}", stats.total_pages),
        format!("Total chunks: {}", stats.total_chunks),
        format!("Average chunk size: {:.0} characters", stats.average_chunk_size),
        format!("Pages covered: {}", stats.pages_covered),
    ];

    if !stats.warnings.is_empty() {
        lines.push(format!("Pages skipped: {}", stats.warnings.len()));
    }

    if let Some(sample) = &stats.sample_chunk {
        lines.push(String::new());
        lines.push(format!("Sample chunk (page {}):", sample.page_number()));
        lines.push(format!("{}...", sample.preview(150)));
    }

    lines.push(format!(
        "\nBuilt in {:.1}s",
        stats.elapsed_ms as f64 / 1000.0
    ));
    lines.join("\n")
}

pub fn is_exit_command(input: &str) -> bool {
    matches!(input.trim().to_lowercase().as_str(), "quit" | "exit" | "q")
}

use crate::config::AppConfig;
use crate::infrastructure::RetrievalContainer;
use crate::presentation::INSPECTION_QUERIES;

use super::format::rule;

const PREVIEW_CHARS: usize = 200;

/// Retrieval-only check of a built index. Needs no API key.
pub async fn run(
    config: &AppConfig,
    queries: Vec<String>,
    k: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    let retrieval = RetrievalContainer::new(config).await?;

    let queries = if queries.is_empty() {
        INSPECTION_QUERIES.iter().map(|q| q.to_string()).collect()
    } else {
        queries
    };

    println!("\n{}", rule('='));
    for query in &queries {
        println!("\nQuery: {}", query);
        println!("{}", rule('-'));

        for (i, result) in retrieval.search_service.search(query, k).await?.iter().enumerate() {
            println!(
                "\nResult {} (Page {}, score {:.3}):",
                i + 1,
                result.chunk.page_number(),
                result.similarity_score
            );
            println!("   {}...", result.chunk.preview(PREVIEW_CHARS));
        }
    }
    println!("\n{}", rule('='));

    Ok(())
}

use crate::application::use_cases::BuildIndexRequest;
use crate::config::AppConfig;
use crate::infrastructure::container::build_index_use_case;

use super::format::{format_statistics, rule};

pub async fn run(config: &AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", rule('='));
    println!("WorkSafe NZ AI Assistant - Vectorstore Builder");
    println!("{}", rule('='));

    let use_case = build_index_use_case(config).await?;
    let stats = use_case
        .execute(BuildIndexRequest {
            pdf_path: config.pdf_path.clone(),
            index_dir: config.index_dir.clone(),
            chunking: config.chunking,
        })
        .await?;

    println!("{}", format_statistics(&stats));
    println!("\nVectorstore saved to {}", config.index_dir.display());
    Ok(())
}

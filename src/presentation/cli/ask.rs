use crate::config::AppConfig;
use crate::infrastructure::AppContainer;
use crate::presentation::SAMPLE_QUESTIONS;

use super::format::{format_sources, rule};

const PREVIEW_CHARS: usize = 150;

pub async fn run(config: AppConfig, questions: Vec<String>) -> Result<(), Box<dyn std::error::Error>> {
    let container = AppContainer::new(config).await?;

    let questions = if questions.is_empty() {
        SAMPLE_QUESTIONS.iter().map(|q| q.to_string()).collect()
    } else {
        questions
    };

    for question in &questions {
        println!("\n{}", rule('='));
        println!("QUESTION: {}", question);
        println!("{}", rule('='));

        let answer = container.ask_question_use_case.execute(question).await?;

        println!("\nANSWER:\n{}", answer.answer);
        println!("\nSOURCES ({} chunks retrieved):", answer.sources.len());
        println!("{}", format_sources(&answer.citations(), PREVIEW_CHARS));
    }

    Ok(())
}

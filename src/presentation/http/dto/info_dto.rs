use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct IndexInfoDto {
    pub document_title: String,
    pub vector_count: usize,
    pub dimension: Option<usize>,
    pub embedding_model: String,
    pub llm_model: String,
    pub active_sessions: usize,
    pub version: String,
}

#[derive(Debug, Serialize)]
pub struct ExamplesDto {
    pub questions: Vec<String>,
}

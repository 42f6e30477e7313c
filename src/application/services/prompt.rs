use crate::domain::entities::RetrievedChunk;

pub const PROMPT_TEMPLATE: &str = r#"You are a WorkSafe New Zealand expert assistant specializing in the Health and Safety at Work Act 2015.

Your task is to answer questions based ONLY on the provided context from the Act. You must follow these rules:

1. ALWAYS cite specific sections when making claims (e.g., "According to Section 36...")
2. If the context mentions a page number, include it in your citation
3. If the answer is not in the provided context, say "I don't have enough information in the Act to answer that."
4. Be precise and professional - this is legal/regulatory content
5. Quote directly from the Act when appropriate

Context from HSWA 2015:
{context}

Question: {question}

Answer:"#;

#[derive(Debug, Clone)]
pub struct PromptTemplate {
    template: String,
}

impl PromptTemplate {
    pub fn new(template: &str) -> Self {
        Self {
            template: template.to_string(),
        }
    }

    /// Fills `{context}` and `{question}`. Values are inserted verbatim, so braces inside the
    /// retrieved text are never treated as placeholders.
    pub fn format(&self, context: &str, question: &str) -> String {
        let mut output = String::with_capacity(self.template.len() + context.len() + question.len());
        let mut rest = self.template.as_str();

        while let Some(open) = rest.find('{') {
            output.push_str(&rest[..open]);
            let after = &rest[open..];
            if let Some(stripped) = after.strip_prefix("{context}") {
                output.push_str(context);
                rest = stripped;
            } else if let Some(stripped) = after.strip_prefix("{question}") {
                output.push_str(question);
                rest = stripped;
            } else {
                output.push('{');
                rest = &after[1..];
            }
        }
        output.push_str(rest);

        output
    }

    /// "Stuff" strategy: every retrieved chunk, in rank order, separated by a blank line.
    pub fn stuff_context(sources: &[RetrievedChunk]) -> String {
        sources
            .iter()
            .map(|retrieved| retrieved.chunk.text())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    pub fn render(&self, sources: &[RetrievedChunk], question: &str) -> String {
        self.format(&Self::stuff_context(sources), question)
    }
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self::new(PROMPT_TEMPLATE)
    }
}

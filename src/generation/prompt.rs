//! Prompt construction from retrieved chunks

use crate::providers::ScoredChunk;

/// Builds the system prompt that grounds the LLM on retrieved context
#[derive(Debug, Clone, Default)]
pub struct PromptBuilder;

impl PromptBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Format retrieved chunks into a numbered context block
    pub fn build_context(&self, chunks: &[ScoredChunk]) -> String {
        let mut context = String::new();
        for (i, chunk) in chunks.iter().enumerate() {
            let citation = match chunk.page_number {
                Some(page) => format!("{}, page {}", chunk.filename, page),
                None => chunk.filename.clone(),
            };
            context.push_str(&format!(
                "[Source {}: {}]\n{}\n\n",
                i + 1,
                citation,
                chunk.content.trim()
            ));
        }
        context.trim_end().to_string()
    }

    /// Build the full system prompt around a context block
    pub fn build_prompt(&self, context: &str) -> String {
        format!(
            "You are an assistant for question-answering tasks. \
             Use the following pieces of retrieved context to answer the question. \
             If the answer is not in the context, say \"I don't know based on the \
             provided documents.\" Keep the answer concise, three sentences maximum.\n\n\
             Context:\n{}",
            context
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn chunk(filename: &str, page: Option<u32>, content: &str) -> ScoredChunk {
        ScoredChunk {
            chunk_id: Uuid::new_v4(),
            document_id: Uuid::new_v4(),
            content: content.to_string(),
            filename: filename.to_string(),
            page_number: page,
            score: 0.9,
        }
    }

    #[test]
    fn test_context_numbers_sources_with_citations() {
        let builder = PromptBuilder::new();
        let chunks = vec![
            chunk("gale.pdf", Some(88), "Anemia is a shortage of red blood cells."),
            chunk("notes.pdf", None, "Iron supplements restore hemoglobin levels."),
        ];
        let context = builder.build_context(&chunks);
        assert!(context.contains("[Source 1: gale.pdf, page 88]"));
        assert!(context.contains("[Source 2: notes.pdf]"));
        assert!(context.contains("Anemia is a shortage"));
    }

    #[test]
    fn test_empty_chunks_give_empty_context() {
        let builder = PromptBuilder::new();
        assert!(builder.build_context(&[]).is_empty());
    }

    #[test]
    fn test_prompt_embeds_context_and_fallback_instruction() {
        let builder = PromptBuilder::new();
        let prompt = builder.build_prompt("[Source 1: gale.pdf]\nSome text");
        assert!(prompt.contains("retrieved context"));
        assert!(prompt.contains("I don't know based on the provided documents."));
        assert!(prompt.ends_with("Some text"));
    }
}

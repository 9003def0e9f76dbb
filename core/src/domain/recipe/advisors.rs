use tracing::debug;

use crate::domain::{
    common::{entities::app_errors::CoreError, prompts::render},
    document::{ports::VectorStore, value_objects::SearchRequest},
};

pub const RAG_TOP_K: usize = 2;
pub const RAG_SIMILARITY_THRESHOLD: f64 = 0.7;

/// Augments a user prompt with the closest chunks of the vector store.
pub struct QuestionAnswerAdvisor<'a, VS> {
    vector_store: &'a VS,
    template: &'a str,
    top_k: usize,
    similarity_threshold: f64,
}

impl<'a, VS> QuestionAnswerAdvisor<'a, VS>
where
    VS: VectorStore,
{
    pub fn new(vector_store: &'a VS, template: &'a str) -> Self {
        Self {
            vector_store,
            template,
            top_k: RAG_TOP_K,
            similarity_threshold: RAG_SIMILARITY_THRESHOLD,
        }
    }

    /// Returns `user_text` rendered into the advisor template together with the
    /// retrieved context, or `user_text` unchanged when nothing matched.
    pub async fn augment(&self, user_text: String) -> Result<String, CoreError> {
        let request = SearchRequest::new(user_text.clone())
            .with_top_k(self.top_k)
            .with_similarity_threshold(self.similarity_threshold);

        let documents = self.vector_store.similarity_search(request).await?;
        if documents.is_empty() {
            debug!("No document above similarity threshold, prompt left unaugmented");
            return Ok(user_text);
        }

        debug!(documents = documents.len(), "Augmenting prompt with retrieved documents");
        let context = documents
            .iter()
            .map(|d| d.content.as_str())
            .collect::<Vec<_>>()
            .join("\n");

        Ok(render(
            self.template,
            &[
                ("question_answer_context", context.as_str()),
                ("query", user_text.as_str()),
            ],
        ))
    }
}

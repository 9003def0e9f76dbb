use std::sync::Mutex;

use serde_json::json;

use crate::domain::{
    common::entities::app_errors::CoreError,
    document::{
        entities::Document,
        ports::{EmbeddingClient, VectorStore},
        value_objects::SearchRequest,
    },
    recipe::ports::{ChatClient, ChatRequest},
};

pub(crate) const PANCAKES_JSON: &str = r#"{
    "name": "Pancakes",
    "description": "Fluffy breakfast pancakes",
    "ingredients": ["2 eggs", "200 g flour", "300 ml milk"],
    "instructions": ["Whisk everything together", "Fry in a hot pan"]
}"#;

/// Chat model stand-in. Calls every registered tool once, the way a model
/// asking for tool output would, then answers with a fixed text.
pub(crate) struct FakeChatClient {
    answer: String,
    requests: Mutex<Vec<ChatRequest>>,
    tool_results: Mutex<Vec<serde_json::Value>>,
}

impl FakeChatClient {
    pub(crate) fn answering(answer: &str) -> Self {
        Self {
            answer: answer.to_string(),
            requests: Mutex::new(Vec::new()),
            tool_results: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn tool_results(&self) -> Vec<serde_json::Value> {
        self.tool_results.lock().unwrap().clone()
    }
}

impl Default for FakeChatClient {
    fn default() -> Self {
        Self::answering(PANCAKES_JSON)
    }
}

impl ChatClient for FakeChatClient {
    async fn call(&self, request: ChatRequest) -> Result<String, CoreError> {
        for tool in &request.tools {
            let result = tool.call(&json!({}))?;
            self.tool_results.lock().unwrap().push(result);
        }
        self.requests.lock().unwrap().push(request);
        Ok(self.answer.clone())
    }
}

/// Vector store stand-in that keeps every added document and returns the
/// first `top_k` of them, scored 1.0, for any query.
#[derive(Default)]
pub(crate) struct RecordingVectorStore {
    documents: Mutex<Vec<Document>>,
    add_calls: Mutex<usize>,
    searches: Mutex<Vec<SearchRequest>>,
    failure: Option<CoreError>,
}

impl RecordingVectorStore {
    pub(crate) fn failing(error: CoreError) -> Self {
        Self {
            failure: Some(error),
            ..Self::default()
        }
    }

    pub(crate) fn with_documents(documents: Vec<Document>) -> Self {
        Self {
            documents: Mutex::new(documents),
            ..Self::default()
        }
    }

    pub(crate) fn documents(&self) -> Vec<Document> {
        self.documents.lock().unwrap().clone()
    }

    pub(crate) fn add_calls(&self) -> usize {
        *self.add_calls.lock().unwrap()
    }

    pub(crate) fn searches(&self) -> Vec<SearchRequest> {
        self.searches.lock().unwrap().clone()
    }
}

impl VectorStore for RecordingVectorStore {
    async fn add(&self, documents: Vec<Document>) -> Result<(), CoreError> {
        *self.add_calls.lock().unwrap() += 1;
        if let Some(error) = &self.failure {
            return Err(error.clone());
        }
        self.documents.lock().unwrap().extend(documents);
        Ok(())
    }

    async fn similarity_search(&self, request: SearchRequest) -> Result<Vec<Document>, CoreError> {
        if let Some(error) = &self.failure {
            return Err(error.clone());
        }
        let top_k = request.top_k;
        self.searches.lock().unwrap().push(request);
        Ok(self
            .documents
            .lock()
            .unwrap()
            .iter()
            .take(top_k)
            .cloned()
            .map(|d| d.with_score(1.0))
            .collect())
    }
}

const VOCABULARY: [&str; 5] = ["egg", "flour", "milk", "pasta", "tomato"];

/// Embeds a text as the counts of a small cooking vocabulary, so texts
/// sharing ingredients end up close to each other.
#[derive(Default)]
pub(crate) struct KeywordEmbeddingClient;

impl KeywordEmbeddingClient {
    pub(crate) fn vector(text: &str) -> Vec<f32> {
        let text = text.to_lowercase();
        VOCABULARY
            .iter()
            .map(|word| text.matches(word).count() as f32)
            .collect()
    }
}

impl EmbeddingClient for KeywordEmbeddingClient {
    async fn embed(&self, inputs: Vec<String>) -> Result<Vec<Vec<f32>>, CoreError> {
        Ok(inputs.iter().map(|text| Self::vector(text)).collect())
    }
}

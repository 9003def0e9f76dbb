use std::{future::Future, sync::Arc};

use serde::Serialize;

use crate::domain::{
    common::entities::app_errors::CoreError,
    recipe::{entities::Recipe, value_objects::FetchRecipeInput},
};

/// Name, description and JSON schema of the parameters of a tool offered to the model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

/// Function the chat model may invoke while it generates an answer.
///
/// Implementations must tolerate being called any number of times within
/// one generation, including not at all.
#[cfg_attr(test, mockall::automock)]
pub trait ToolCallback: Send + Sync {
    fn definition(&self) -> ToolDefinition;

    fn call(&self, arguments: &serde_json::Value) -> Result<serde_json::Value, CoreError>;
}

/// One structured chat exchange: optional system text, the user text, the
/// expected answer schema and the tools the model may call.
#[derive(Clone)]
pub struct ChatRequest {
    pub system: Option<String>,
    pub user: String,
    pub response_schema: Option<serde_json::Value>,
    pub tools: Vec<Arc<dyn ToolCallback>>,
}

impl ChatRequest {
    pub fn new(user: String) -> Self {
        Self {
            system: None,
            user,
            response_schema: None,
            tools: Vec::new(),
        }
    }

    pub fn with_system(mut self, system: String) -> Self {
        self.system = Some(system);
        self
    }

    pub fn with_response_schema(mut self, schema: serde_json::Value) -> Self {
        self.response_schema = Some(schema);
        self
    }

    pub fn with_tool(mut self, tool: Arc<dyn ToolCallback>) -> Self {
        self.tools.push(tool);
        self
    }

    pub fn tool_names(&self) -> Vec<String> {
        self.tools.iter().map(|t| t.definition().name).collect()
    }
}

/// Chat completion client. Runs the tool loop internally and returns the
/// final text answer of the model.
#[cfg_attr(test, mockall::automock)]
pub trait ChatClient: Send + Sync {
    fn call(&self, request: ChatRequest) -> impl Future<Output = Result<String, CoreError>> + Send;
}

/// Image generation client returning the URL of the generated image.
#[cfg_attr(test, mockall::automock)]
pub trait ImageClient: Send + Sync {
    fn generate(&self, prompt: String) -> impl Future<Output = Result<String, CoreError>> + Send;
}

/// Service trait for recipe generation
#[cfg_attr(test, mockall::automock)]
pub trait RecipeService: Send + Sync {
    fn fetch_recipe(
        &self,
        input: FetchRecipeInput,
    ) -> impl Future<Output = Result<Recipe, CoreError>> + Send;
}

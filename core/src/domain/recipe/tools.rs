use serde_json::json;
use tracing::info;

use crate::domain::{
    common::entities::app_errors::CoreError,
    recipe::ports::{ToolCallback, ToolDefinition},
};

pub const AVAILABLE_INGREDIENTS_TOOL_NAME: &str = "fetch_ingredients_available_at_home";

/// Exposes the ingredients available at home to the chat model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailableIngredientsTool {
    ingredients: Vec<String>,
}

impl AvailableIngredientsTool {
    pub fn new(ingredients: Vec<String>) -> Self {
        Self { ingredients }
    }

    pub fn ingredients(&self) -> &[String] {
        &self.ingredients
    }
}

impl ToolCallback for AvailableIngredientsTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: AVAILABLE_INGREDIENTS_TOOL_NAME.to_string(),
            description: "Fetches ingredients that are available at home".to_string(),
            parameters: json!({
                "type": "object",
                "properties": {},
                "additionalProperties": false
            }),
        }
    }

    fn call(&self, _arguments: &serde_json::Value) -> Result<serde_json::Value, CoreError> {
        info!("Fetching ingredients available at home tool called by LLM");
        Ok(json!(self.ingredients))
    }
}

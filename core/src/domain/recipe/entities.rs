use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::common::entities::app_errors::CoreError;

static CODE_FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^```[A-Za-z]*\s*(.*?)\s*```$").expect("code fence pattern is valid")
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub instructions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl Recipe {
    /// Copy of this recipe carrying `image_url`; every other field is unchanged.
    pub fn with_image_url(self, image_url: String) -> Self {
        Self {
            image_url: Some(image_url),
            ..self
        }
    }

    /// Parses the structured answer of the chat model.
    ///
    /// A surrounding markdown code fence is tolerated. The recipe must have a
    /// name and at least one ingredient.
    pub fn from_model_output(raw: &str) -> Result<Self, CoreError> {
        let trimmed = raw.trim();
        let json = CODE_FENCE
            .captures(trimmed)
            .and_then(|captures| captures.get(1))
            .map_or(trimmed, |m| m.as_str());

        let recipe: Recipe = serde_json::from_str(json).map_err(|e| {
            tracing::error!("Failed to parse recipe from LLM response: {}", e);
            CoreError::ExternalServiceError(format!("Failed to parse LLM response: {}", e))
        })?;

        if recipe.name.trim().is_empty() {
            return Err(CoreError::ExternalServiceError(
                "LLM response contains a recipe without name".to_string(),
            ));
        }
        if recipe.ingredients.iter().all(|i| i.trim().is_empty()) {
            return Err(CoreError::ExternalServiceError(
                "LLM response contains a recipe without ingredients".to_string(),
            ));
        }

        Ok(recipe)
    }
}

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FetchRecipeValidator {
    #[validate(
        length(min = 1, max = 50, message = "between 1 and 50 ingredients are required"),
        custom(function = "validate_ingredient_names")
    )]
    pub ingredients: Vec<String>,

    #[serde(default)]
    pub prefer_available_ingredients: bool,

    #[serde(default)]
    pub prefer_own_recipes: bool,
}

fn validate_ingredient_names(ingredients: &[String]) -> Result<(), ValidationError> {
    if ingredients.iter().any(|ingredient| ingredient.trim().is_empty()) {
        return Err(ValidationError::new("blank_ingredient")
            .with_message("ingredients must not be blank".into()));
    }
    Ok(())
}

/// Multipart form of a recipe document upload.
#[derive(Debug, ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct UploadRecipeDocumentForm {
    /// PDF document with recipes
    #[schema(value_type = String, format = Binary)]
    pub file: Bytes,

    /// Points cut from the top of every page, 0 when omitted
    #[schema(minimum = 0)]
    pub page_top_margin: Option<u32>,

    /// Points cut from the bottom of every page, 0 when omitted
    #[schema(minimum = 0)]
    pub page_bottom_margin: Option<u32>,
}

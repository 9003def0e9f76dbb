use axum::extract::State;
use recipe_finder_core::domain::recipe::{
    entities::Recipe, ports::RecipeService, value_objects::FetchRecipeInput,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::application::http::{
    recipe::validators::FetchRecipeValidator,
    server::{
        api_entities::{
            api_error::{ApiError, ValidateJson},
            response::Response,
        },
        app_state::AppState,
    },
};

#[derive(Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct FetchRecipeResponse {
    pub data: Recipe,
}

#[utoipa::path(
    post,
    path = "",
    tag = "recipe",
    summary = "Fetch a recipe for ingredients",
    description = "Asks the chat model for a recipe using the given ingredients. The model can look up the ingredients available at home and the uploaded own recipes when the matching flags are set.",
    request_body = FetchRecipeValidator,
    responses(
        (status = 200, body = FetchRecipeResponse),
        (status = 400, description = "Malformed JSON body"),
        (status = 422, description = "Invalid ingredient list"),
        (status = 502, description = "Chat or image model failed or answered with an invalid recipe")
    )
)]
pub async fn fetch_recipe(
    State(state): State<AppState>,
    ValidateJson(payload): ValidateJson<FetchRecipeValidator>,
) -> Result<Response<FetchRecipeResponse>, ApiError> {
    let recipe = state
        .service
        .fetch_recipe(FetchRecipeInput {
            ingredients: payload
                .ingredients
                .into_iter()
                .map(|ingredient| ingredient.trim().to_string())
                .collect(),
            prefer_available_ingredients: payload.prefer_available_ingredients,
            prefer_own_recipes: payload.prefer_own_recipes,
        })
        .await
        .map_err(ApiError::from)?;

    Ok(Response::OK(FetchRecipeResponse { data: recipe }))
}

use axum::{Router, extract::DefaultBodyLimit, routing::post};
use utoipa::OpenApi;

use crate::application::http::server::app_state::AppState;

use super::handlers::{
    fetch_recipe::{__path_fetch_recipe, fetch_recipe},
    upload_recipe_document::{__path_upload_recipe_document, upload_recipe_document},
};

const MAX_UPLOAD_SIZE: usize = 50 * 1024 * 1024;

#[derive(OpenApi)]
#[openapi(paths(fetch_recipe, upload_recipe_document))]
pub struct RecipeApiDoc;

pub fn recipe_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            &format!("{}/api/v1/recipes", state.args.server.root_path),
            post(fetch_recipe),
        )
        .route(
            &format!("{}/api/v1/recipes/upload", state.args.server.root_path),
            post(upload_recipe_document),
        )
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_SIZE))
}

use utoipa::OpenApi;

use crate::application::http::{health::HealthApiDoc, recipe::router::RecipeApiDoc};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Recipe Finder API"
    ),
    nest(
        (path = "/api/v1/recipes", api = RecipeApiDoc),
        (path = "/health", api = HealthApiDoc),
    )
)]
pub struct ApiDoc;

use axum::extract::{Multipart, State, multipart::Field};
use recipe_finder_core::domain::document::{
    ports::DocumentService, value_objects::IngestDocumentInput,
};
use tracing::{error, info, warn};

use crate::application::http::{
    recipe::validators::UploadRecipeDocumentForm,
    server::{
        api_entities::{api_error::ApiError, response::Response},
        app_state::AppState,
    },
};

#[utoipa::path(
    post,
    path = "/upload",
    tag = "recipe",
    summary = "Upload a recipe document",
    description = "Reads a PDF of own recipes page by page, leaving out the configured top and bottom margins, and stores its text in the vector store so later recipe requests can prefer these recipes.",
    request_body(content = UploadRecipeDocumentForm, content_type = "multipart/form-data"),
    responses(
        (status = 204, description = "Document stored for retrieval"),
        (status = 400, description = "Missing or empty file, invalid margin or unreadable PDF"),
        (status = 413, description = "File too large"),
        (status = 502, description = "Embedding model unavailable")
    )
)]
pub async fn upload_recipe_document(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Response<()>, ApiError> {
    let mut file_name: Option<String> = None;
    let mut file: Option<bytes::Bytes> = None;
    let mut page_top_margin: Option<u32> = None;
    let mut page_bottom_margin: Option<u32> = None;

    // Parse multipart form
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        error!("Failed to read multipart field: {}", e);
        ApiError::BadRequest(format!("Failed to read multipart field: {}", e))
    })? {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "file" => {
                let Some(name) = field.file_name() else {
                    return Err(ApiError::BadRequest(
                        "Missing filename in file field".to_string(),
                    ));
                };
                file_name = Some(name.to_string());

                let data = field.bytes().await.map_err(|e| {
                    error!("Failed to read file bytes: {}", e);
                    ApiError::BadRequest(format!("Failed to read file: {}", e))
                })?;
                file = Some(data);
            }
            "pageTopMargin" => page_top_margin = Some(parse_margin(field).await?),
            "pageBottomMargin" => page_bottom_margin = Some(parse_margin(field).await?),
            _ => {
                // Ignore unknown fields
            }
        }
    }

    let form = UploadRecipeDocumentForm {
        file: file.ok_or_else(|| {
            ApiError::BadRequest("Missing 'file' field in multipart form".to_string())
        })?,
        page_top_margin,
        page_bottom_margin,
    };
    let file_name = file_name.unwrap_or_default();

    if form.file.is_empty() {
        warn!(file_name = %file_name, "Empty file upload attempted");
        return Err(ApiError::BadRequest("File cannot be empty".to_string()));
    }

    info!(file_name = %file_name, "Add recipe document for retrieval");

    state
        .service
        .ingest_document(IngestDocumentInput {
            file_name,
            data: form.file,
            page_top_margin: form.page_top_margin.unwrap_or(0),
            page_bottom_margin: form.page_bottom_margin.unwrap_or(0),
        })
        .await
        .map_err(ApiError::from)?;

    Ok(Response::NoContent)
}

async fn parse_margin(field: Field<'_>) -> Result<u32, ApiError> {
    let name = field.name().unwrap_or("margin").to_string();
    let text = field
        .text()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Failed to read {}: {}", name, e)))?;

    let text = text.trim();
    if text.is_empty() {
        return Ok(0);
    }

    text.parse::<u32>().map_err(|_| {
        ApiError::BadRequest(format!(
            "{} must be a non-negative integer, got '{}'",
            name, text
        ))
    })
}

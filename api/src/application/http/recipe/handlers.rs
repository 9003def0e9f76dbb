pub mod fetch_recipe;
pub mod upload_recipe_document;

use std::{path::PathBuf, time::Duration};

use chrono::{DateTime, Utc};
use uuid::{NoContext, Timestamp, Uuid};

pub mod entities;
pub mod prompts;
pub mod services;
#[cfg(test)]
pub(crate) mod test_utils;

pub use prompts::PromptTemplates;

#[derive(Clone, Debug)]
pub struct RecipeFinderConfig {
    pub llm: LLMConfig,
    pub image: Option<ImageConfig>,
    pub recipe: RecipeConfig,
    pub vector_store: VectorStoreConfig,
}

#[derive(Clone, Debug)]
pub struct LLMConfig {
    pub api_key: String,
    pub base_url: String,
    pub chat_model: String,
    pub temperature: f32,
    pub embedding_model: String,
    pub timeout: Duration,
}

/// Present only when image generation is enabled.
#[derive(Clone, Debug)]
pub struct ImageConfig {
    pub model: String,
    pub size: String,
}

#[derive(Clone, Debug)]
pub struct RecipeConfig {
    pub available_ingredients_in_fridge: Vec<String>,
    pub prompts_dir: Option<PathBuf>,
}

#[derive(Clone, Debug, Default)]
pub struct VectorStoreConfig {
    pub snapshot_path: Option<PathBuf>,
}

pub fn generate_timestamp() -> (DateTime<Utc>, Timestamp) {
    let now = Utc::now();
    let seconds = now.timestamp().try_into().unwrap_or(0);
    let timestamp = Timestamp::from_unix(NoContext, seconds, now.timestamp_subsec_nanos());

    (now, timestamp)
}

pub fn generate_uuid_v7() -> Uuid {
    let (_, timestamp) = generate_timestamp();
    Uuid::new_v7(timestamp)
}

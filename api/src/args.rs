use std::{path::PathBuf, time::Duration};

use clap::Parser;
use recipe_finder_core::domain::common::{
    ImageConfig, LLMConfig, RecipeConfig, RecipeFinderConfig, VectorStoreConfig,
};

#[derive(Debug, Clone, Parser)]
#[command(name = "recipe-finder-api", version, about = "Recipe Finder API")]
pub struct Args {
    #[command(flatten)]
    pub server: ServerArgs,

    #[command(flatten)]
    pub log: LogArgs,

    #[command(flatten)]
    pub llm: LlmArgs,

    #[command(flatten)]
    pub image: ImageArgs,

    #[command(flatten)]
    pub recipe: RecipeArgs,
}

#[derive(clap::Args, Debug, Clone)]
pub struct ServerArgs {
    #[arg(long = "server-host", env = "SERVER_HOST", default_value = "0.0.0.0")]
    pub host: String,

    #[arg(long = "server-port", env = "SERVER_PORT", default_value_t = 3333)]
    pub port: u16,

    #[arg(long = "server-root-path", env = "SERVER_ROOT_PATH", default_value = "")]
    pub root_path: String,

    #[arg(
        long = "allowed-origins",
        env = "ALLOWED_ORIGINS",
        value_delimiter = ',',
        default_value = "http://localhost:5173"
    )]
    pub allowed_origins: Vec<String>,

    #[arg(long = "server-tls-cert", env = "SERVER_TLS_CERT", requires = "tls_key")]
    pub tls_cert: Option<PathBuf>,

    #[arg(long = "server-tls-key", env = "SERVER_TLS_KEY", requires = "tls_cert")]
    pub tls_key: Option<PathBuf>,
}

#[derive(clap::Args, Debug, Clone)]
pub struct LogArgs {
    #[arg(long = "log-filter", env = "LOG_FILTER", default_value = "info")]
    pub filter: String,

    #[arg(long = "log-json", env = "LOG_JSON", default_value_t = false)]
    pub json: bool,
}

#[derive(clap::Args, Debug, Clone)]
pub struct LlmArgs {
    #[arg(long = "openai-api-key", env = "OPENAI_API_KEY", hide_env_values = true)]
    pub api_key: String,

    #[arg(
        long = "openai-base-url",
        env = "OPENAI_BASE_URL",
        default_value = "https://api.openai.com/v1"
    )]
    pub base_url: String,

    #[arg(long = "chat-model", env = "CHAT_MODEL", default_value = "gpt-4o")]
    pub chat_model: String,

    #[arg(long = "chat-temperature", env = "CHAT_TEMPERATURE", default_value_t = 0.7)]
    pub temperature: f32,

    #[arg(
        long = "embedding-model",
        env = "EMBEDDING_MODEL",
        default_value = "text-embedding-3-small"
    )]
    pub embedding_model: String,

    #[arg(long = "llm-timeout-secs", env = "LLM_TIMEOUT_SECS", default_value_t = 120)]
    pub timeout_secs: u64,
}

#[derive(clap::Args, Debug, Clone)]
pub struct ImageArgs {
    #[arg(
        long = "image-generation-enabled",
        env = "IMAGE_GENERATION_ENABLED",
        default_value_t = false
    )]
    pub enabled: bool,

    #[arg(long = "image-model", env = "IMAGE_MODEL", default_value = "dall-e-3")]
    pub model: String,

    #[arg(long = "image-size", env = "IMAGE_SIZE", default_value = "1024x1024")]
    pub size: String,
}

#[derive(clap::Args, Debug, Clone)]
pub struct RecipeArgs {
    #[arg(
        long = "available-ingredients-in-fridge",
        env = "AVAILABLE_INGREDIENTS_IN_FRIDGE",
        value_delimiter = ',',
        default_value = "bacon,onions"
    )]
    pub available_ingredients_in_fridge: Vec<String>,

    #[arg(long = "prompts-dir", env = "PROMPTS_DIR")]
    pub prompts_dir: Option<PathBuf>,

    #[arg(long = "vector-store-path", env = "VECTOR_STORE_PATH")]
    pub vector_store_path: Option<PathBuf>,
}

impl From<Args> for RecipeFinderConfig {
    fn from(args: Args) -> Self {
        RecipeFinderConfig {
            llm: LLMConfig {
                api_key: args.llm.api_key,
                base_url: args.llm.base_url,
                chat_model: args.llm.chat_model,
                temperature: args.llm.temperature,
                embedding_model: args.llm.embedding_model,
                timeout: Duration::from_secs(args.llm.timeout_secs),
            },
            image: args.image.enabled.then(|| ImageConfig {
                model: args.image.model,
                size: args.image.size,
            }),
            recipe: RecipeConfig {
                available_ingredients_in_fridge: args
                    .recipe
                    .available_ingredients_in_fridge
                    .into_iter()
                    .map(|ingredient| ingredient.trim().to_string())
                    .filter(|ingredient| !ingredient.is_empty())
                    .collect(),
                prompts_dir: args.recipe.prompts_dir,
            },
            vector_store: VectorStoreConfig {
                snapshot_path: args.recipe.vector_store_path,
            },
        }
    }
}

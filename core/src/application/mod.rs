use tracing::info;

use crate::{
    domain::{
        common::{
            PromptTemplates, RecipeFinderConfig, entities::app_errors::CoreError, services::Service,
        },
        document::splitter::TokenTextSplitter,
    },
    infrastructure::{
        embedding::openai_embedding_client::OpenAIEmbeddingClient,
        llm::{openai_chat_client::OpenAIChatClient, openai_image_client::OpenAIImageClient},
        pdf::pdf_extract_reader::PdfExtractDocumentReader,
        vector_store::in_memory::InMemoryVectorStore,
    },
};

pub type RecipeFinderService = Service<
    OpenAIChatClient,
    OpenAIImageClient,
    InMemoryVectorStore<OpenAIEmbeddingClient>,
    PdfExtractDocumentReader,
>;

pub async fn create_service(config: RecipeFinderConfig) -> Result<RecipeFinderService, CoreError> {
    let chat_client = OpenAIChatClient::new(&config.llm)?;
    let embedding_client = OpenAIEmbeddingClient::new(&config.llm)?;
    let image_client = config
        .image
        .as_ref()
        .map(|image| OpenAIImageClient::new(&config.llm, image))
        .transpose()?;

    let vector_store =
        InMemoryVectorStore::new(embedding_client, config.vector_store.snapshot_path.clone())
            .await?;
    let prompts = PromptTemplates::load(config.recipe.prompts_dir.as_deref()).await?;
    let splitter = TokenTextSplitter::new()?;

    info!(
        chat_model = %config.llm.chat_model,
        embedding_model = %config.llm.embedding_model,
        image_generation = image_client.is_some(),
        "Recipe finder service created"
    );

    Ok(Service::new(
        chat_client,
        image_client,
        vector_store,
        PdfExtractDocumentReader::new(),
        splitter,
        prompts,
        config.recipe.available_ingredients_in_fridge,
    ))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::domain::common::{ImageConfig, LLMConfig, RecipeConfig, VectorStoreConfig};

    fn config(api_key: &str, image: Option<ImageConfig>) -> RecipeFinderConfig {
        RecipeFinderConfig {
            llm: LLMConfig {
                api_key: api_key.to_string(),
                base_url: "http://127.0.0.1:9/v1".to_string(),
                chat_model: "gpt-4o".to_string(),
                temperature: 0.7,
                embedding_model: "text-embedding-3-small".to_string(),
                timeout: Duration::from_secs(1),
            },
            image,
            recipe: RecipeConfig {
                available_ingredients_in_fridge: vec!["bacon".to_string(), "onions".to_string()],
                prompts_dir: None,
            },
            vector_store: VectorStoreConfig::default(),
        }
    }

    #[tokio::test]
    async fn test_create_service_without_image_generation() {
        let service = create_service(config("sk-test", None)).await.unwrap();

        assert!(service.image_client.is_none());
        assert_eq!(
            service.available_ingredients_tool.ingredients(),
            ["bacon".to_string(), "onions".to_string()]
        );
        assert!(service.vector_store().is_empty().await);
    }

    #[tokio::test]
    async fn test_create_service_with_image_generation() {
        let image = ImageConfig {
            model: "dall-e-3".to_string(),
            size: "1024x1024".to_string(),
        };

        let service = create_service(config("sk-test", Some(image))).await.unwrap();

        assert!(service.image_client.is_some());
    }

    #[tokio::test]
    async fn test_create_service_requires_api_key() {
        let result = create_service(config("", None)).await;

        assert!(matches!(result, Err(CoreError::Configuration(_))));
    }
}

use std::sync::Arc;

use crate::domain::{
    common::PromptTemplates, document::splitter::TokenTextSplitter,
    recipe::tools::AvailableIngredientsTool,
};

/// Holds every collaborator the recipe and document services need.
///
/// `image_client` is `None` when image generation is not configured.
pub struct Service<CC, IM, VS, DR> {
    pub(crate) chat_client: Arc<CC>,
    pub(crate) image_client: Option<Arc<IM>>,
    pub(crate) vector_store: Arc<VS>,
    pub(crate) document_reader: Arc<DR>,
    pub(crate) splitter: Arc<TokenTextSplitter>,
    pub(crate) prompts: Arc<PromptTemplates>,
    pub(crate) available_ingredients_tool: Arc<AvailableIngredientsTool>,
}

impl<CC, IM, VS, DR> Service<CC, IM, VS, DR> {
    pub fn new(
        chat_client: CC,
        image_client: Option<IM>,
        vector_store: VS,
        document_reader: DR,
        splitter: TokenTextSplitter,
        prompts: PromptTemplates,
        available_ingredients_in_fridge: Vec<String>,
    ) -> Self {
        Self {
            chat_client: Arc::new(chat_client),
            image_client: image_client.map(Arc::new),
            vector_store: Arc::new(vector_store),
            document_reader: Arc::new(document_reader),
            splitter: Arc::new(splitter),
            prompts: Arc::new(prompts),
            available_ingredients_tool: Arc::new(AvailableIngredientsTool::new(
                available_ingredients_in_fridge,
            )),
        }
    }

    pub fn vector_store(&self) -> &VS {
        &self.vector_store
    }
}

impl<CC, IM, VS, DR> Clone for Service<CC, IM, VS, DR> {
    fn clone(&self) -> Self {
        Self {
            chat_client: Arc::clone(&self.chat_client),
            image_client: self.image_client.clone(),
            vector_store: Arc::clone(&self.vector_store),
            document_reader: Arc::clone(&self.document_reader),
            splitter: Arc::clone(&self.splitter),
            prompts: Arc::clone(&self.prompts),
            available_ingredients_tool: Arc::clone(&self.available_ingredients_tool),
        }
    }
}

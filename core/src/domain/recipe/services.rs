use std::sync::Arc;

use tracing::{error, info, instrument};

use crate::domain::{
    common::{entities::app_errors::CoreError, prompts::render, services::Service},
    document::ports::{DocumentReader, VectorStore},
    recipe::{
        advisors::QuestionAnswerAdvisor,
        entities::Recipe,
        ports::{ChatClient, ChatRequest, ImageClient, RecipeService, ToolCallback},
        schema::get_recipe_schema,
        value_objects::{FetchRecipeInput, RetrievalStrategy},
    },
};

impl<CC, IM, VS, DR> Service<CC, IM, VS, DR>
where
    CC: ChatClient,
    IM: ImageClient,
    VS: VectorStore,
    DR: DocumentReader,
{
    async fn build_chat_request(
        &self,
        strategy: RetrievalStrategy,
        ingredients: &[String],
    ) -> Result<ChatRequest, CoreError> {
        let ingredients = ingredients.join(",");
        let template = if strategy.uses_tool() {
            &self.prompts.recipe_for_available_ingredients
        } else {
            &self.prompts.recipe_for_ingredients
        };
        let mut user = render(template, &[("ingredients", ingredients.as_str())]);

        if strategy.uses_retrieval() {
            user = QuestionAnswerAdvisor::new(self.vector_store.as_ref(), &self.prompts.prefer_own_recipe)
                .augment(user)
                .await?;
        }

        let mut request = ChatRequest::new(user)
            .with_system(self.prompts.fix_json_response.clone())
            .with_response_schema(get_recipe_schema());

        if strategy.uses_tool() {
            let tool: Arc<dyn ToolCallback> = self.available_ingredients_tool.clone();
            request = request.with_tool(tool);
        }

        Ok(request)
    }

    async fn add_recipe_image(&self, recipe: Recipe) -> Result<Recipe, CoreError> {
        let Some(image_client) = &self.image_client else {
            return Ok(recipe);
        };

        info!("Generate image for recipe {}", recipe.name);
        let ingredients = recipe.ingredients.join(", ");
        let prompt = render(
            &self.prompts.image_for_recipe,
            &[
                ("recipe", recipe.name.as_str()),
                ("ingredients", ingredients.as_str()),
            ],
        );

        let image_url = image_client.generate(prompt).await?;
        if image_url.trim().is_empty() {
            error!("Image client returned an empty URL");
            return Err(CoreError::ExternalServiceError(
                "Image generation returned no image".to_string(),
            ));
        }

        Ok(recipe.with_image_url(image_url))
    }
}

impl<CC, IM, VS, DR> RecipeService for Service<CC, IM, VS, DR>
where
    CC: ChatClient,
    IM: ImageClient,
    VS: VectorStore,
    DR: DocumentReader,
{
    #[instrument(skip(self, input), fields(ingredients = ?input.ingredients))]
    async fn fetch_recipe(&self, input: FetchRecipeInput) -> Result<Recipe, CoreError> {
        let strategy = RetrievalStrategy::from(&input);
        match strategy {
            RetrievalStrategy::Plain => info!("Fetch recipe without additional information"),
            RetrievalStrategy::ToolAugmented => {
                info!("Fetch recipe with additional information from tool calling")
            }
            RetrievalStrategy::RetrievalAugmented => {
                info!("Fetch recipe with additional information from vector store")
            }
            RetrievalStrategy::Both => info!(
                "Fetch recipe with additional information from vector store and tool calling"
            ),
        }

        // 1. Build the prompt for the selected strategy
        let request = self.build_chat_request(strategy, &input.ingredients).await?;

        // 2. Call the chat model once
        let raw_response = self.chat_client.call(request).await?;

        // 3. Parse the structured answer
        let recipe = Recipe::from_model_output(&raw_response)?;

        // 4. Illustrate the recipe when an image client is configured
        self.add_recipe_image(recipe).await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{Map, json};

    use super::*;
    use crate::{
        domain::{
            common::{
                PromptTemplates,
                test_utils::{FakeChatClient, KeywordEmbeddingClient, RecordingVectorStore},
            },
            document::{
                entities::Document,
                ports::{MockDocumentReader, MockVectorStore},
                splitter::TokenTextSplitter,
            },
            recipe::{ports::MockImageClient, tools::AVAILABLE_INGREDIENTS_TOOL_NAME},
        },
        infrastructure::vector_store::in_memory::InMemoryVectorStore,
    };

    const FRIDGE: [&str; 2] = ["bacon", "onions"];

    fn input(ingredients: &[&str], available: bool, own: bool) -> FetchRecipeInput {
        FetchRecipeInput {
            ingredients: ingredients.iter().map(|s| s.to_string()).collect(),
            prefer_available_ingredients: available,
            prefer_own_recipes: own,
        }
    }

    fn service<VS>(
        chat_client: FakeChatClient,
        image_client: Option<MockImageClient>,
        vector_store: VS,
    ) -> Service<FakeChatClient, MockImageClient, VS, MockDocumentReader> {
        Service::new(
            chat_client,
            image_client,
            vector_store,
            MockDocumentReader::new(),
            TokenTextSplitter::new().unwrap(),
            PromptTemplates::default(),
            FRIDGE.iter().map(|s| s.to_string()).collect(),
        )
    }

    fn untouched_store() -> MockVectorStore {
        let mut store = MockVectorStore::new();
        store.expect_similarity_search().never();
        store.expect_add().never();
        store
    }

    fn stored_recipe(content: &str) -> Document {
        Document::new(content.to_string(), Map::new())
    }

    #[tokio::test]
    async fn test_plain_fetch_uses_ingredients_only() {
        let service = service(FakeChatClient::default(), None, untouched_store());

        let recipe = service
            .fetch_recipe(input(&["egg", "flour", "milk"], false, false))
            .await
            .unwrap();

        assert_eq!(recipe.name, "Pancakes");
        assert!(!recipe.ingredients.is_empty());
        assert!(recipe.image_url.is_none());

        let requests = service.chat_client.requests();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].user.contains("egg,flour,milk"));
        assert!(requests[0].tools.is_empty());
        assert_eq!(
            requests[0].system.as_deref(),
            Some(PromptTemplates::default().fix_json_response.as_str())
        );
        assert_eq!(requests[0].response_schema, Some(get_recipe_schema()));
    }

    #[tokio::test]
    async fn test_tool_augmented_fetch_registers_tool_only() {
        let service = service(FakeChatClient::default(), None, untouched_store());

        service
            .fetch_recipe(input(&["potatoes"], true, false))
            .await
            .unwrap();

        let requests = service.chat_client.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(
            requests[0].tool_names(),
            vec![AVAILABLE_INGREDIENTS_TOOL_NAME.to_string()]
        );
        assert!(requests[0].user.contains("available at home"));
        assert_eq!(service.chat_client.tool_results(), vec![json!(FRIDGE)]);
    }

    #[tokio::test]
    async fn test_retrieval_augmented_fetch_searches_store_without_tool() {
        let store = RecordingVectorStore::with_documents(vec![stored_recipe(
            "Aunt May's crepes: eggs, flour, milk and a pinch of salt.",
        )]);
        let service = service(FakeChatClient::default(), None, store);

        service
            .fetch_recipe(input(&["egg", "flour"], false, true))
            .await
            .unwrap();

        let searches = service.vector_store().searches();
        assert_eq!(searches.len(), 1);
        assert_eq!(searches[0].top_k, 2);
        assert_eq!(searches[0].similarity_threshold, 0.7);
        assert!(searches[0].query.contains("egg,flour"));

        let requests = service.chat_client.requests();
        assert!(requests[0].tools.is_empty());
        assert!(requests[0].user.contains("Aunt May's crepes"));
        assert!(requests[0].user.contains("egg,flour"));
    }

    #[tokio::test]
    async fn test_both_strategy_uses_tool_and_store() {
        let store = RecordingVectorStore::with_documents(vec![stored_recipe(
            "Bacon and onion tart with a buttery crust.",
        )]);
        let service = service(FakeChatClient::default(), None, store);

        service
            .fetch_recipe(input(&["flour", "butter"], true, true))
            .await
            .unwrap();

        assert_eq!(service.vector_store().searches().len(), 1);
        let requests = service.chat_client.requests();
        assert_eq!(requests[0].tools.len(), 1);
        assert!(requests[0].user.contains("Bacon and onion tart"));
        assert!(requests[0].user.contains("available at home"));
    }

    #[tokio::test]
    async fn test_empty_store_leaves_prompt_unaugmented() {
        let service = service(
            FakeChatClient::default(),
            None,
            RecordingVectorStore::default(),
        );

        service
            .fetch_recipe(input(&["egg", "flour", "milk"], false, true))
            .await
            .unwrap();

        let expected = render(
            &PromptTemplates::default().recipe_for_ingredients,
            &[("ingredients", "egg,flour,milk")],
        );
        assert_eq!(service.chat_client.requests()[0].user, expected);
    }

    #[tokio::test]
    async fn test_ingested_recipe_is_retrieved_for_matching_ingredients() {
        let store = InMemoryVectorStore::new(KeywordEmbeddingClient, None)
            .await
            .unwrap();
        store
            .add(vec![
                stored_recipe("Family crepes: beat one egg, add flour, pour in milk."),
                stored_recipe("Sunday pasta: cook pasta, simmer tomato, add more tomato."),
            ])
            .await
            .unwrap();
        let service = service(FakeChatClient::default(), None, store);

        service
            .fetch_recipe(input(&["egg", "flour", "milk"], false, true))
            .await
            .unwrap();

        let user = &service.chat_client.requests()[0].user;
        assert!(user.contains("Family crepes"));
        assert!(!user.contains("Sunday pasta"));
    }

    #[tokio::test]
    async fn test_image_client_adds_url_and_keeps_recipe() {
        let mut image_client = MockImageClient::new();
        image_client
            .expect_generate()
            .withf(|prompt| prompt.contains("Pancakes") && prompt.contains("2 eggs, 200 g flour"))
            .times(1)
            .returning(|_| Box::pin(async { Ok("https://images.example/pancakes.png".to_string()) }));
        let service = service(FakeChatClient::default(), Some(image_client), untouched_store());

        let recipe = service
            .fetch_recipe(input(&["egg", "flour", "milk"], false, false))
            .await
            .unwrap();

        let plain = Recipe::from_model_output(crate::domain::common::test_utils::PANCAKES_JSON)
            .unwrap();
        assert_eq!(recipe.name, plain.name);
        assert_eq!(recipe.ingredients, plain.ingredients);
        assert_eq!(
            recipe.image_url.as_deref(),
            Some("https://images.example/pancakes.png")
        );
    }

    #[tokio::test]
    async fn test_image_failure_propagates() {
        let mut image_client = MockImageClient::new();
        image_client.expect_generate().returning(|_| {
            Box::pin(async { Err(CoreError::ExternalServiceError("quota".to_string())) })
        });
        let service = service(FakeChatClient::default(), Some(image_client), untouched_store());

        let err = service
            .fetch_recipe(input(&["egg"], false, false))
            .await
            .unwrap_err();

        assert_eq!(err, CoreError::ExternalServiceError("quota".to_string()));
    }

    #[tokio::test]
    async fn test_empty_image_url_is_an_error() {
        let mut image_client = MockImageClient::new();
        image_client
            .expect_generate()
            .returning(|_| Box::pin(async { Ok(String::new()) }));
        let service = service(FakeChatClient::default(), Some(image_client), untouched_store());

        let err = service
            .fetch_recipe(input(&["egg"], false, false))
            .await
            .unwrap_err();

        assert!(matches!(err, CoreError::ExternalServiceError(_)));
    }

    #[tokio::test]
    async fn test_unparseable_answer_fails_without_image_call() {
        let mut image_client = MockImageClient::new();
        image_client.expect_generate().never();
        let service = service(
            FakeChatClient::answering("I would suggest pancakes."),
            Some(image_client),
            untouched_store(),
        );

        let err = service
            .fetch_recipe(input(&["egg", "flour", "milk"], false, false))
            .await
            .unwrap_err();

        assert!(matches!(err, CoreError::ExternalServiceError(_)));
        assert_eq!(service.chat_client.requests().len(), 1);
    }
}

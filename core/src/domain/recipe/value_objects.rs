/// Input of a recipe fetch. Ingredients are kept in caller order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRecipeInput {
    pub ingredients: Vec<String>,
    pub prefer_available_ingredients: bool,
    pub prefer_own_recipes: bool,
}

/// How the chat request of a recipe fetch is augmented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetrievalStrategy {
    /// Ingredient list only.
    Plain,
    /// Ingredients-at-home tool registered.
    ToolAugmented,
    /// Vector store context injected into the prompt.
    RetrievalAugmented,
    /// Tool and vector store context together.
    Both,
}

impl RetrievalStrategy {
    pub fn select(prefer_available_ingredients: bool, prefer_own_recipes: bool) -> Self {
        match (prefer_available_ingredients, prefer_own_recipes) {
            (false, false) => Self::Plain,
            (true, false) => Self::ToolAugmented,
            (false, true) => Self::RetrievalAugmented,
            (true, true) => Self::Both,
        }
    }

    pub fn uses_tool(self) -> bool {
        matches!(self, Self::ToolAugmented | Self::Both)
    }

    pub fn uses_retrieval(self) -> bool {
        matches!(self, Self::RetrievalAugmented | Self::Both)
    }
}

impl From<&FetchRecipeInput> for RetrievalStrategy {
    fn from(input: &FetchRecipeInput) -> Self {
        Self::select(input.prefer_available_ingredients, input.prefer_own_recipes)
    }
}

use std::sync::Arc;

use recipe_finder_core::application::RecipeFinderService;

use crate::args::Args;

#[derive(Clone)]
pub struct AppState {
    pub args: Arc<Args>,
    pub service: RecipeFinderService,
}

impl AppState {
    pub fn new(args: Arc<Args>, service: RecipeFinderService) -> Self {
        Self { args, service }
    }
}

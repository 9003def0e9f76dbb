use std::path::Path;

use tracing::{debug, info};

use crate::domain::common::entities::app_errors::CoreError;

const RECIPE_FOR_INGREDIENTS: &str = include_str!("../../../prompts/recipe-for-ingredients.st");
const RECIPE_FOR_AVAILABLE_INGREDIENTS: &str =
    include_str!("../../../prompts/recipe-for-available-ingredients.st");
const PREFER_OWN_RECIPE: &str = include_str!("../../../prompts/prefer-own-recipe.st");
const FIX_JSON_RESPONSE: &str = include_str!("../../../prompts/fix-json-response.st");
const IMAGE_FOR_RECIPE: &str = include_str!("../../../prompts/image-for-recipe.st");

/// Prompt texts used by the recipe service. Placeholders use the `{name}` form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplates {
    pub recipe_for_ingredients: String,
    pub recipe_for_available_ingredients: String,
    pub prefer_own_recipe: String,
    pub fix_json_response: String,
    pub image_for_recipe: String,
}

impl Default for PromptTemplates {
    fn default() -> Self {
        Self {
            recipe_for_ingredients: RECIPE_FOR_INGREDIENTS.to_string(),
            recipe_for_available_ingredients: RECIPE_FOR_AVAILABLE_INGREDIENTS.to_string(),
            prefer_own_recipe: PREFER_OWN_RECIPE.to_string(),
            fix_json_response: FIX_JSON_RESPONSE.to_string(),
            image_for_recipe: IMAGE_FOR_RECIPE.to_string(),
        }
    }
}

impl PromptTemplates {
    /// Built-in templates, each replaced by `<dir>/<name>.st` when that file exists.
    pub async fn load(dir: Option<&Path>) -> Result<Self, CoreError> {
        let mut templates = Self::default();
        let Some(dir) = dir else {
            return Ok(templates);
        };

        info!(prompts_dir = %dir.display(), "Loading prompt overrides");

        let slots: [(&str, &mut String); 5] = [
            ("recipe-for-ingredients", &mut templates.recipe_for_ingredients),
            (
                "recipe-for-available-ingredients",
                &mut templates.recipe_for_available_ingredients,
            ),
            ("prefer-own-recipe", &mut templates.prefer_own_recipe),
            ("fix-json-response", &mut templates.fix_json_response),
            ("image-for-recipe", &mut templates.image_for_recipe),
        ];

        for (name, slot) in slots {
            let path = dir.join(format!("{name}.st"));
            match tokio::fs::read_to_string(&path).await {
                Ok(text) => {
                    debug!(prompt = name, "Using prompt override");
                    *slot = text;
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    return Err(CoreError::Configuration(format!(
                        "Failed to read prompt {}: {}",
                        path.display(),
                        e
                    )));
                }
            }
        }

        Ok(templates)
    }
}

/// Replaces every `{key}` in `template` with its value in a single pass.
///
/// Substituted values are never scanned again, so a value that itself
/// contains `{key}` text is kept literally. Unknown placeholders stay as they are.
pub fn render(template: &str, params: &[(&str, &str)]) -> String {
    let mut rendered = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        rendered.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let value = after.find('}').and_then(|end| {
            let key = &after[..end];
            params
                .iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| (*value, end))
        });

        match value {
            Some((value, end)) => {
                rendered.push_str(value);
                rest = &after[end + 1..];
            }
            None => {
                rendered.push('{');
                rest = after;
            }
        }
    }

    rendered.push_str(rest);
    rendered
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_keeps_placeholders_inside_values() {
        let rendered = render(
            "{query} / {question_answer_context}",
            &[
                ("question_answer_context", "Grandma says: {query}"),
                ("query", "egg,flour"),
            ],
        );
        assert_eq!(rendered, "egg,flour / Grandma says: {query}");
    }

    #[test]
    fn test_render_keeps_unmatched_braces() {
        let rendered = render("{ {ingredients} and {unknown}", &[("ingredients", "egg")]);
        assert_eq!(rendered, "{ egg and {unknown}");
    }

    #[test]
    fn test_render_replaces_all_occurrences() {
        let rendered = render(
            "Cook {ingredients}. Only {ingredients}!",
            &[("ingredients", "egg,flour")],
        );
        assert_eq!(rendered, "Cook egg,flour. Only egg,flour!");
    }

    #[test]
    fn test_render_leaves_unknown_placeholders() {
        let rendered = render("{query} and {other}", &[("query", "pasta")]);
        assert_eq!(rendered, "pasta and {other}");
    }

    #[test]
    fn test_default_templates_carry_placeholders() {
        let templates = PromptTemplates::default();
        assert!(templates.recipe_for_ingredients.contains("{ingredients}"));
        assert!(
            templates
                .recipe_for_available_ingredients
                .contains("{ingredients}")
        );
        assert!(templates.prefer_own_recipe.contains("{query}"));
        assert!(
            templates
                .prefer_own_recipe
                .contains("{question_answer_context}")
        );
        assert!(templates.image_for_recipe.contains("{recipe}"));
    }

    #[tokio::test]
    async fn test_load_without_dir_returns_defaults() {
        let templates = PromptTemplates::load(None).await.unwrap();
        assert_eq!(templates, PromptTemplates::default());
    }

    #[tokio::test]
    async fn test_load_overrides_existing_files_only() {
        let dir = std::env::temp_dir().join(format!("prompts-{}", uuid::Uuid::new_v4()));
        tokio::fs::create_dir_all(&dir).await.unwrap();
        tokio::fs::write(dir.join("image-for-recipe.st"), "Draw {recipe}")
            .await
            .unwrap();

        let templates = PromptTemplates::load(Some(&dir)).await.unwrap();
        assert_eq!(templates.image_for_recipe, "Draw {recipe}");
        assert_eq!(
            templates.recipe_for_ingredients,
            PromptTemplates::default().recipe_for_ingredients
        );

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }
}

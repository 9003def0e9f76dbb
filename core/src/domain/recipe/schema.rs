use serde_json::json;

/// Returns the JSON schema for recipe LLM responses
pub fn get_recipe_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "name": { "type": "string" },
            "description": { "type": "string" },
            "ingredients": {
                "type": "array",
                "items": { "type": "string" }
            },
            "instructions": {
                "type": "array",
                "items": { "type": "string" }
            }
        },
        "required": ["name", "description", "ingredients", "instructions"],
        "additionalProperties": false
    })
}

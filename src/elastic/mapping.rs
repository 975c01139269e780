use serde_json::{json, Map, Value};

/// Field every text and tag attribute is copied into for embedding
pub const SEMANTIC_FIELD: &str = "semantic_field";

/// Task type the inference endpoint is registered under
pub const TEXT_EMBEDDING_TASK: &str = "text_embedding";

/// Build the `mappings` body for the recipe index
pub fn recipe_mappings(inference_id: &str) -> Value {
    let mut properties = Map::new();

    // Free text, searchable and folded into the semantic field
    for field in ["name", "ingredients", "procedure"] {
        properties.insert(field.to_string(), copied("text"));
    }

    // Exact-match tags, also folded into the semantic field
    for field in ["allergens", "category", "dietary"] {
        properties.insert(field.to_string(), copied("keyword"));
    }

    // Filterable only
    properties.insert("prep_time_minutes".to_string(), json!({ "type": "integer" }));

    properties.insert(
        SEMANTIC_FIELD.to_string(),
        json!({
            "type": "semantic_text",
            "inference_id": inference_id,
        }),
    );

    json!({ "properties": properties })
}

/// Body for `PUT /_inference/text_embedding/{id}`
pub fn inference_config(model_id: &str) -> Value {
    json!({
        "service": "elastic",
        "service_settings": { "model_id": model_id },
    })
}

fn copied(field_type: &str) -> Value {
    json!({ "type": field_type, "copy_to": SEMANTIC_FIELD })
}

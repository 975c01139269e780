use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// A recipe document as stored in the dataset and in the search index.
///
/// `semantic_field` is not part of the document: the index mapping copies the
/// text and tag fields into it at index time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub name: String,

    #[serde(default, deserialize_with = "one_or_many")]
    pub ingredients: Vec<String>,

    #[serde(default, deserialize_with = "one_or_many")]
    pub allergens: Vec<String>,

    #[serde(default, deserialize_with = "one_or_many")]
    pub procedure: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prep_time_minutes: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    #[serde(default, deserialize_with = "one_or_many")]
    pub dietary: Vec<String>,

    /// Fields outside the mapping are indexed untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Recipe {
    /// Check the fields the index mapping relies on
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("recipe name must not be empty".to_string());
        }

        if self.extra.contains_key("semantic_field") {
            return Err(format!(
                "recipe '{}' sets semantic_field, which is derived by the index",
                self.name
            ));
        }

        Ok(())
    }

    /// Whether any allergen tag matches, ignoring case
    pub fn has_allergen(&self, allergen: &str) -> bool {
        self.allergens
            .iter()
            .any(|a| a.eq_ignore_ascii_case(allergen))
    }
}

fn one_or_many<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
        Null,
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(s) => vec![s],
        OneOrMany::Many(v) => v,
        OneOrMany::Null => Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_string_or_list() {
        let recipe: Recipe = serde_json::from_value(json!({
            "name": "Shrimp Scampi",
            "ingredients": "shrimp, garlic, butter, linguine",
            "allergens": ["shellfish", "gluten", "dairy"],
            "procedure": ["Boil pasta.", "Saute shrimp in garlic butter."],
            "prep_time_minutes": 25,
            "category": "seafood",
            "dietary": null
        }))
        .unwrap();

        assert_eq!(recipe.ingredients, vec!["shrimp, garlic, butter, linguine"]);
        assert_eq!(recipe.procedure.len(), 2);
        assert!(recipe.dietary.is_empty());
        assert!(recipe.has_allergen("Shellfish"));
        assert!(!recipe.has_allergen("nuts"));
        assert!(recipe.validate().is_ok());
    }

    #[test]
    fn test_extra_fields_preserved() {
        let recipe: Recipe = serde_json::from_value(json!({
            "name": "Tomato Soup",
            "servings": 4
        }))
        .unwrap();

        assert_eq!(recipe.extra.get("servings"), Some(&json!(4)));
        let back = serde_json::to_value(&recipe).unwrap();
        assert_eq!(back["servings"], json!(4));
        assert!(back.get("prep_time_minutes").is_none());
    }

    #[test]
    fn test_validate() {
        let recipe: Recipe = serde_json::from_value(json!({ "name": "  " })).unwrap();
        assert!(recipe.validate().is_err());

        let recipe: Recipe = serde_json::from_value(json!({
            "name": "Risotto",
            "semantic_field": "anything"
        }))
        .unwrap();
        assert!(recipe.validate().is_err());
    }
}

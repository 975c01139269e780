pub mod recipe;

pub use recipe::Recipe;

use crate::elastic::mapping::SEMANTIC_FIELD;
use crate::error::{Error, Result};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

/// A dataset entry exactly as it appears in the file
pub type Document = Map<String, Value>;

fn read(path: &Path) -> Result<String> {
    debug!("Reading dataset from {}", path.display());

    std::fs::read_to_string(path)
        .map_err(|e| Error::Dataset(format!("Failed to read {}: {e}", path.display())))
}

/// Read the dataset as raw documents, the form sent to the bulk API
pub fn load_documents(path: &Path) -> Result<Vec<Document>> {
    parse_documents(&read(path)?)
}

/// Parse a dataset into raw documents.
///
/// Field values are left for the index to coerce or reject one document at a
/// time; only the overall shape is checked here.
pub fn parse_documents(content: &str) -> Result<Vec<Document>> {
    let values: Vec<Value> = serde_json::from_str(content)
        .map_err(|e| Error::Dataset(format!("Expected a JSON array of recipes: {e}")))?;

    values
        .into_iter()
        .enumerate()
        .map(|(position, value)| match value {
            Value::Object(doc) if doc.contains_key(SEMANTIC_FIELD) => Err(Error::Dataset(format!(
                "Recipe #{position} sets {SEMANTIC_FIELD}, which is derived by the index"
            ))),
            Value::Object(doc) => Ok(doc),
            _ => Err(Error::Dataset(format!(
                "Recipe #{position} is not a JSON object"
            ))),
        })
        .collect()
}

/// Read a JSON array of recipes from disk, typed and validated
pub fn load_dataset(path: &Path) -> Result<Vec<Recipe>> {
    parse_dataset(&read(path)?)
}

/// Parse and validate a dataset document into typed recipes
pub fn parse_dataset(content: &str) -> Result<Vec<Recipe>> {
    let recipes: Vec<Recipe> = serde_json::from_str(content)
        .map_err(|e| Error::Dataset(format!("Expected a JSON array of recipes: {e}")))?;

    for (position, recipe) in recipes.iter().enumerate() {
        recipe
            .validate()
            .map_err(|msg| Error::Dataset(format!("Recipe #{position}: {msg}")))?;
    }

    Ok(recipes)
}

/// Counts shown by `validate-dataset`
#[derive(Debug, Default, PartialEq)]
pub struct DatasetSummary {
    pub total: usize,
    pub by_category: BTreeMap<String, usize>,
    pub allergens: BTreeMap<String, usize>,
}

impl DatasetSummary {
    pub fn from_recipes(recipes: &[Recipe]) -> Self {
        let mut summary = Self {
            total: recipes.len(),
            ..Default::default()
        };

        for recipe in recipes {
            let category = recipe
                .category
                .clone()
                .unwrap_or_else(|| "uncategorized".to_string());
            *summary.by_category.entry(category).or_default() += 1;

            for allergen in &recipe.allergens {
                *summary
                    .allergens
                    .entry(allergen.to_lowercase())
                    .or_default() += 1;
            }
        }

        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dataset_rejects_non_array() {
        let result = parse_dataset(r#"{"name": "Pancakes"}"#);
        assert!(matches!(result, Err(Error::Dataset(_))));
    }

    #[test]
    fn test_parse_dataset_reports_position() {
        let result = parse_dataset(r#"[{"name": "Pancakes"}, {"name": ""}]"#);
        match result {
            Err(Error::Dataset(msg)) => assert!(msg.contains("#1")),
            other => panic!("expected dataset error, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_documents_leaves_values_to_the_index() {
        let docs = parse_documents(
            r#"[
                {"name": "A", "prep_time_minutes": 25},
                {"name": "B", "prep_time_minutes": "30"},
                {"title": "no name"},
                {"name": "C", "category": ["main", "seafood"]}
            ]"#,
        )
        .unwrap();

        assert_eq!(docs.len(), 4);
        assert_eq!(docs[1]["prep_time_minutes"], "30");
        assert!(docs[2].get("name").is_none());
    }

    #[test]
    fn test_parse_documents_rejects_bad_shape() {
        match parse_documents(r#"[{"name": "A"}, "B"]"#) {
            Err(Error::Dataset(msg)) => assert!(msg.contains("#1 is not a JSON object")),
            other => panic!("expected dataset error, got {other:?}"),
        }

        match parse_documents(r#"[{"name": "A", "semantic_field": "x"}]"#) {
            Err(Error::Dataset(msg)) => assert!(msg.contains("semantic_field")),
            other => panic!("expected dataset error, got {other:?}"),
        }

        assert!(parse_documents(r#"{"name": "A"}"#).is_err());
    }

    #[test]
    fn test_summary() {
        let recipes = parse_dataset(
            r#"[
                {"name": "Clam Chowder", "category": "seafood", "allergens": ["Shellfish", "dairy"]},
                {"name": "Grilled Salmon", "category": "seafood", "allergens": ["fish"]},
                {"name": "Green Salad"}
            ]"#,
        )
        .unwrap();

        let summary = DatasetSummary::from_recipes(&recipes);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.by_category["seafood"], 2);
        assert_eq!(summary.by_category["uncategorized"], 1);
        assert_eq!(summary.allergens["shellfish"], 1);
    }

    #[test]
    fn test_load_missing_file() {
        let result = load_dataset(Path::new("/nonexistent/dataset.json"));
        assert!(matches!(result, Err(Error::Dataset(_))));
    }
}

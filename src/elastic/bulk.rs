use crate::error::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Outcome of a bulk load across all chunks
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct BulkReport {
    pub indexed: usize,
    pub failures: Vec<BulkFailure>,
}

/// A document the platform rejected
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BulkFailure {
    /// Position of the document in the loaded dataset
    pub position: usize,
    pub status: u16,
    pub reason: String,
}

impl BulkReport {
    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    fn absorb(&mut self, other: BulkReport) {
        self.indexed += other.indexed;
        self.failures.extend(other.failures);
    }
}

/// Serialize documents as `index` actions in NDJSON form.
///
/// The body always ends with a newline, which the bulk endpoint requires.
pub fn build_bulk_body<T: Serialize>(index_name: &str, documents: &[T]) -> Result<String> {
    let action = serde_json::to_string(&serde_json::json!({
        "index": { "_index": index_name }
    }))?;

    let mut body = String::new();
    for doc in documents {
        body.push_str(&action);
        body.push('\n');
        body.push_str(&serde_json::to_string(doc)?);
        body.push('\n');
    }

    Ok(body)
}

#[derive(Debug, Deserialize)]
struct BulkResponse {
    #[serde(default)]
    items: Vec<HashMap<String, BulkItem>>,
}

#[derive(Debug, Deserialize)]
struct BulkItem {
    status: u16,
    #[serde(default)]
    error: Option<Value>,
}

/// Count successes and failures in one bulk response.
///
/// `offset` is the dataset position of the chunk's first document.
pub fn parse_bulk_response(body: &str, offset: usize) -> Result<BulkReport> {
    let response: BulkResponse = serde_json::from_str(body)?;
    let mut report = BulkReport::default();

    for (i, item) in response.items.into_iter().enumerate() {
        // Each item holds exactly one entry keyed by the action name
        let Some(result) = item.into_values().next() else {
            continue;
        };

        if (200..300).contains(&result.status) && result.error.is_none() {
            report.indexed += 1;
        } else {
            report.failures.push(BulkFailure {
                position: offset + i,
                status: result.status,
                reason: error_reason(result.error.as_ref()),
            });
        }
    }

    Ok(report)
}

fn error_reason(error: Option<&Value>) -> String {
    match error {
        Some(Value::Object(obj)) => {
            let kind = obj.get("type").and_then(Value::as_str).unwrap_or("error");
            match obj.get("reason").and_then(Value::as_str) {
                Some(reason) => format!("{kind}: {reason}"),
                None => kind.to_string(),
            }
        }
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => "unknown error".to_string(),
    }
}

/// Merge per-chunk reports in order
pub fn merge_reports(reports: impl IntoIterator<Item = BulkReport>) -> BulkReport {
    let mut total = BulkReport::default();
    for report in reports {
        total.absorb(report);
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_build_bulk_body() {
        let docs = vec![json!({"name": "Paella"}), json!({"name": "Gazpacho"})];
        let body = build_bulk_body("cooking-recipes", &docs).unwrap();

        let lines: Vec<&str> = body.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], r#"{"index":{"_index":"cooking-recipes"}}"#);
        assert_eq!(lines[1], r#"{"name":"Paella"}"#);
        assert!(body.ends_with('\n'));
    }

    #[test]
    fn test_parse_bulk_response_mixed() {
        let body = json!({
            "took": 12,
            "errors": true,
            "items": [
                {"index": {"_index": "cooking-recipes", "_id": "a", "status": 201}},
                {"index": {"_index": "cooking-recipes", "status": 400,
                    "error": {"type": "document_parsing_exception",
                              "reason": "failed to parse field [prep_time_minutes]"}}},
                {"index": {"_index": "cooking-recipes", "_id": "c", "status": 201}}
            ]
        })
        .to_string();

        let report = parse_bulk_response(&body, 500).unwrap();
        assert_eq!(report.indexed, 2);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.failures[0].position, 501);
        assert_eq!(report.failures[0].status, 400);
        assert!(report.failures[0]
            .reason
            .starts_with("document_parsing_exception"));
    }

    #[test]
    fn test_merge_reports() {
        let merged = merge_reports(vec![
            BulkReport {
                indexed: 500,
                failures: vec![],
            },
            BulkReport {
                indexed: 9,
                failures: vec![BulkFailure {
                    position: 503,
                    status: 429,
                    reason: "es_rejected_execution_exception".to_string(),
                }],
            },
        ]);

        assert_eq!(merged.indexed, 509);
        assert_eq!(merged.failed(), 1);
        assert!(!merged.is_clean());
    }
}

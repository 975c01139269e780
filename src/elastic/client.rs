use crate::config::Settings;
use crate::elastic::{bulk, mapping};
use crate::{Error, Result};
use reqwest::{header, Client, Response, StatusCode};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, error};

/// Elasticsearch REST client covering the few endpoints setup needs
#[derive(Clone)]
pub struct ElasticClient {
    client: Client,
    base_url: String,
}

impl ElasticClient {
    /// Create a new client authenticated with the configured API key
    pub fn new(settings: &Settings) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            header::HeaderValue::from_str(&settings.auth_header())
                .map_err(|e| Error::Config(format!("Invalid ES_API_KEY: {e}")))?,
        );

        let client = Client::builder()
            .default_headers(headers)
            .user_agent(settings.http.user_agent.clone())
            .timeout(Duration::from_secs(settings.http.timeout_seconds))
            .build()
            .map_err(|e| Error::Internal(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: settings.elastic.endpoint.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Whether an inference endpoint with this id is registered.
    ///
    /// Any non-success answer counts as absent; creation then reports the
    /// real problem if there is one.
    pub async fn inference_exists(&self, inference_id: &str) -> Result<bool> {
        let url = self.url(&format!("/_inference/{inference_id}"));
        debug!("Elasticsearch request: GET {}", url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            debug!("Inference endpoint lookup returned {}", status);
        }

        Ok(status.is_success())
    }

    /// Register a text-embedding inference endpoint
    pub async fn put_inference(&self, inference_id: &str, model_id: &str) -> Result<()> {
        let url = self.url(&format!(
            "/_inference/{}/{inference_id}",
            mapping::TEXT_EMBEDDING_TASK
        ));
        debug!("Elasticsearch request: PUT {}", url);

        let response = self
            .client
            .put(&url)
            .json(&mapping::inference_config(model_id))
            .send()
            .await?;

        check(response).await.map(|_| ())
    }

    /// Whether the index exists
    pub async fn index_exists(&self, index_name: &str) -> Result<bool> {
        let url = self.url(&format!("/{index_name}"));
        debug!("Elasticsearch request: HEAD {}", url);

        let response = self.client.head(&url).send().await?;
        match response.status() {
            StatusCode::NOT_FOUND => Ok(false),
            status if status.is_success() => Ok(true),
            status => Err(Error::Api {
                status: status.as_u16(),
                body: format!("unexpected status checking index '{index_name}'"),
            }),
        }
    }

    /// Create the recipe index with its fixed mapping
    pub async fn create_index(&self, index_name: &str, inference_id: &str) -> Result<()> {
        let url = self.url(&format!("/{index_name}"));
        debug!("Elasticsearch request: PUT {}", url);

        let body = serde_json::json!({ "mappings": mapping::recipe_mappings(inference_id) });
        let response = self.client.put(&url).json(&body).send().await?;

        check(response).await.map(|_| ())
    }

    /// Index documents through the bulk API, `chunk_size` documents per request
    pub async fn bulk_index<T: Serialize>(
        &self,
        index_name: &str,
        documents: &[T],
        chunk_size: usize,
    ) -> Result<bulk::BulkReport> {
        let url = self.url("/_bulk?refresh=true");
        let mut reports = Vec::new();

        for (chunk_no, chunk) in documents.chunks(chunk_size.max(1)).enumerate() {
            let offset = chunk_no * chunk_size.max(1);
            debug!(
                "Elasticsearch request: POST {} ({} documents from #{})",
                url,
                chunk.len(),
                offset
            );

            let body = bulk::build_bulk_body(index_name, chunk)?;
            let response = self
                .client
                .post(&url)
                .header(header::CONTENT_TYPE, "application/x-ndjson")
                .body(body)
                .send()
                .await?;

            let text = check(response).await?.text().await?;
            reports.push(bulk::parse_bulk_response(&text, offset)?);
        }

        Ok(bulk::merge_reports(reports))
    }
}

/// Turn a non-success response into `Error::Api`
async fn check(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unable to read error response".to_string());
    error!("Elasticsearch API error: {} - {}", status, body);

    Err(Error::Api {
        status: status.as_u16(),
        body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::tests::test_settings;
    use mockito::Matcher;

    #[tokio::test]
    async fn test_inference_exists() {
        let mut server = mockito::Server::new_async().await;
        let found = server
            .mock("GET", "/_inference/jina-embeddings")
            .match_header("authorization", "ApiKey test-key")
            .with_status(200)
            .with_body(r#"{"endpoints":[]}"#)
            .create_async()
            .await;

        let client = ElasticClient::new(&test_settings(&server.url(), &server.url())).unwrap();
        assert!(client.inference_exists("jina-embeddings").await.unwrap());
        found.assert_async().await;

        let _inference_get = server
            .mock("GET", "/_inference/missing")
            .with_status(404)
            .create_async()
            .await;
        assert!(!client.inference_exists("missing").await.unwrap());
    }

    #[tokio::test]
    async fn test_index_exists_unexpected_status() {
        let mut server = mockito::Server::new_async().await;
        let _index_head = server
            .mock("HEAD", "/cooking-recipes")
            .with_status(503)
            .create_async()
            .await;

        let client = ElasticClient::new(&test_settings(&server.url(), &server.url())).unwrap();
        let err = client.index_exists("cooking-recipes").await.unwrap_err();
        assert_eq!(err.status(), Some(503));
    }

    #[tokio::test]
    async fn test_bulk_index_chunks() {
        let mut server = mockito::Server::new_async().await;
        let ok_item = r#"{"index":{"status":201}}"#;
        let bulk = server
            .mock("POST", "/_bulk")
            .match_query(Matcher::UrlEncoded("refresh".into(), "true".into()))
            .match_header("content-type", "application/x-ndjson")
            .with_status(200)
            .with_body(format!(r#"{{"errors":false,"items":[{ok_item},{ok_item}]}}"#))
            .expect(2)
            .create_async()
            .await;

        let client = ElasticClient::new(&test_settings(&server.url(), &server.url())).unwrap();
        let docs: Vec<serde_json::Value> = (0..4)
            .map(|i| serde_json::json!({ "name": format!("Recipe {i}") }))
            .collect();

        let report = client.bulk_index("cooking-recipes", &docs, 2).await.unwrap();
        assert_eq!(report.indexed, 4);
        assert!(report.is_clean());
        bulk.assert_async().await;
    }
}

//! Pinecone vector index over its HTTPS API

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::domain::DomainError;
use crate::domain::knowledge_base::MetadataFilter;
use crate::domain::vector_store::{RemoteMatch, RemoteVectorIndex, VectorUpsert};
use crate::infrastructure::http::HttpClientTrait;

pub const DEFAULT_CONTROLLER_URL: &str = "https://api.pinecone.io";
pub const DEFAULT_INDEX_NAME: &str = "visabuddy-visa-kb";
const API_VERSION: &str = "2024-07";

#[derive(Debug, Deserialize)]
struct IndexList {
    #[serde(default)]
    indexes: Vec<IndexDescription>,
}

#[derive(Debug, Deserialize)]
struct IndexDescription {
    name: String,
    host: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IndexStats {
    #[serde(default)]
    total_vector_count: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpsertResponse {
    #[serde(default)]
    upserted_count: usize,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<RemoteMatch>,
}

/// Remote index backed by a Pinecone serverless or pod index
#[derive(Debug)]
pub struct PineconeIndex<C: HttpClientTrait> {
    client: C,
    api_key: String,
    index_name: String,
    controller_url: String,
    timeout: Duration,
    host: RwLock<Option<String>>,
}

impl<C: HttpClientTrait> PineconeIndex<C> {
    pub fn new(client: C, api_key: impl Into<String>, index_name: impl Into<String>) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            index_name: index_name.into(),
            controller_url: DEFAULT_CONTROLLER_URL.to_string(),
            timeout: Duration::from_secs(10),
            host: RwLock::new(None),
        }
    }

    pub fn with_controller_url(mut self, url: impl Into<String>) -> Self {
        self.controller_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn headers(&self) -> Vec<(&str, &str)> {
        vec![
            ("Api-Key", self.api_key.as_str()),
            ("X-Pinecone-API-Version", API_VERSION),
            ("Content-Type", "application/json"),
        ]
    }

    async fn bounded<T>(
        &self,
        operation: &str,
        call: impl Future<Output = Result<T, DomainError>>,
    ) -> Result<T, DomainError> {
        tokio::time::timeout(self.timeout, call).await.map_err(|_| {
            DomainError::timeout(format!(
                "Pinecone {} exceeded {}ms",
                operation,
                self.timeout.as_millis()
            ))
        })?
    }

    async fn data_url(&self, path: &str) -> Result<String, DomainError> {
        let host = self.host.read().await;
        let host = host.as_deref().ok_or_else(|| {
            DomainError::provider("pinecone", format!("Index '{}' is not connected", self.index_name))
        })?;

        if host.starts_with("http://") || host.starts_with("https://") {
            Ok(format!("{}/{}", host.trim_end_matches('/'), path))
        } else {
            Ok(format!("https://{}/{}", host, path))
        }
    }

    fn parse<T: for<'de> Deserialize<'de>>(value: serde_json::Value, what: &str) -> Result<T, DomainError> {
        serde_json::from_value(value)
            .map_err(|e| DomainError::provider("pinecone", format!("Malformed {} response: {}", what, e)))
    }

    fn filter_json(filter: &MetadataFilter) -> serde_json::Value {
        let conditions: serde_json::Map<String, serde_json::Value> = filter
            .conditions()
            .map(|(key, value)| (key.clone(), serde_json::json!({"$eq": value})))
            .collect();
        serde_json::Value::Object(conditions)
    }
}

#[async_trait]
impl<C: HttpClientTrait> RemoteVectorIndex for PineconeIndex<C> {
    fn index_name(&self) -> String {
        self.index_name.clone()
    }

    async fn connect(&self) -> Result<(), DomainError> {
        let url = format!("{}/indexes", self.controller_url);
        let response = self
            .bounded("list_indexes", self.client.get_json(&url, self.headers()))
            .await?;
        let list: IndexList = Self::parse(response, "list_indexes")?;

        let names: Vec<&str> = list.indexes.iter().map(|i| i.name.as_str()).collect();
        info!(indexes = ?names, "Available Pinecone indexes");

        let Some(index) = list.indexes.iter().find(|i| i.name == self.index_name) else {
            warn!(
                index = %self.index_name,
                "Pinecone index not found; create it with dimension 1536 and metric cosine"
            );
            return Err(DomainError::not_found(format!(
                "Pinecone index '{}' not found",
                self.index_name
            )));
        };

        *self.host.write().await = Some(index.host.clone());

        let stats_url = self.data_url("describe_index_stats").await?;
        let response = self
            .bounded(
                "describe_index_stats",
                self.client.post_json(&stats_url, self.headers(), &serde_json::json!({})),
            )
            .await?;
        let stats: IndexStats = Self::parse(response, "describe_index_stats")?;

        info!(
            index = %self.index_name,
            vectors = stats.total_vector_count,
            "Connected to Pinecone index"
        );
        Ok(())
    }

    async fn upsert(&self, vectors: Vec<VectorUpsert>) -> Result<usize, DomainError> {
        let url = self.data_url("vectors/upsert").await?;
        let body = serde_json::json!({ "vectors": vectors });

        let response = self
            .bounded("upsert", self.client.post_json(&url, self.headers(), &body))
            .await?;
        let upserted: UpsertResponse = Self::parse(response, "upsert")?;

        debug!(count = upserted.upserted_count, "Upserted vectors to Pinecone");
        Ok(upserted.upserted_count)
    }

    async fn query(
        &self,
        vector: &[f32],
        top_k: usize,
        filter: &MetadataFilter,
    ) -> Result<Vec<RemoteMatch>, DomainError> {
        let url = self.data_url("query").await?;

        let mut body = serde_json::json!({
            "vector": vector,
            "topK": top_k,
            "includeMetadata": true,
        });
        if !filter.is_empty() {
            body["filter"] = Self::filter_json(filter);
        }

        let response = self
            .bounded("query", self.client.post_json(&url, self.headers(), &body))
            .await?;
        let result: QueryResponse = Self::parse(response, "query")?;

        debug!(count = result.matches.len(), "Pinecone query complete");
        Ok(result.matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::knowledge_base::Metadata;
    use crate::infrastructure::http::{HttpClient, MockHttpClient};
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const CONTROLLER: &str = "https://api.pinecone.io/indexes";
    const STATS: &str = "https://kb-abc.svc.pinecone.io/describe_index_stats";
    const QUERY: &str = "https://kb-abc.svc.pinecone.io/query";
    const UPSERT: &str = "https://kb-abc.svc.pinecone.io/vectors/upsert";

    fn index_list() -> serde_json::Value {
        serde_json::json!({
            "indexes": [
                {"name": "other", "host": "other-abc.svc.pinecone.io", "dimension": 1536},
                {"name": "visabuddy-visa-kb", "host": "kb-abc.svc.pinecone.io", "dimension": 1536}
            ]
        })
    }

    fn connected_mock() -> MockHttpClient {
        MockHttpClient::new()
            .with_response(CONTROLLER, index_list())
            .with_response(STATS, serde_json::json!({"totalVectorCount": 42, "dimension": 1536}))
    }

    #[tokio::test]
    async fn test_connect_resolves_host() {
        let index = PineconeIndex::new(connected_mock(), "pc-key", DEFAULT_INDEX_NAME);

        index.connect().await.unwrap();

        let requests = index.client.requests();
        assert_eq!(requests[0].0, CONTROLLER);
        assert_eq!(requests[1].0, STATS);
    }

    #[tokio::test]
    async fn test_connect_missing_index_is_not_found() {
        let index = PineconeIndex::new(connected_mock(), "pc-key", "missing-index");

        let result = index.connect().await;

        assert!(matches!(result, Err(DomainError::NotFound { .. })));
        assert!(index.query(&[0.1], 3, &MetadataFilter::new()).await.is_err());
    }

    #[tokio::test]
    async fn test_query_before_connect_fails() {
        let index = PineconeIndex::new(MockHttpClient::new(), "pc-key", DEFAULT_INDEX_NAME);
        assert!(index.upsert(vec![]).await.is_err());
    }

    #[tokio::test]
    async fn test_query_builds_eq_filter() {
        let client = connected_mock().with_response(
            QUERY,
            serde_json::json!({
                "matches": [
                    {"id": "visa_us_b1/b2_chunk_1", "score": 0.91, "metadata": {"country": "USA"}},
                    {"id": "faq_0_chunk_1", "score": 0.42}
                ]
            }),
        );
        let index = PineconeIndex::new(client, "pc-key", DEFAULT_INDEX_NAME);
        index.connect().await.unwrap();

        let filter = MetadataFilter::new().eq("country", "USA").eq("visa_type", "Tourist");
        let matches = index.query(&[0.5, 0.5], 3, &filter).await.unwrap();

        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].id, "visa_us_b1/b2_chunk_1");
        assert!(matches[1].metadata.is_empty());

        let (url, body) = index.client.requests().pop().unwrap();
        assert_eq!(url, QUERY);
        assert_eq!(body["topK"], 3);
        assert_eq!(body["includeMetadata"], true);
        assert_eq!(
            body["filter"],
            serde_json::json!({"country": {"$eq": "USA"}, "visa_type": {"$eq": "Tourist"}})
        );
    }

    #[tokio::test]
    async fn test_query_without_filter_omits_it() {
        let client = connected_mock().with_response(QUERY, serde_json::json!({"matches": []}));
        let index = PineconeIndex::new(client, "pc-key", DEFAULT_INDEX_NAME);
        index.connect().await.unwrap();

        index.query(&[1.0], 5, &MetadataFilter::new()).await.unwrap();

        let (_, body) = index.client.requests().pop().unwrap();
        assert!(body.get("filter").is_none());
    }

    #[tokio::test]
    async fn test_upsert() {
        let client = connected_mock().with_response(UPSERT, serde_json::json!({"upsertedCount": 2}));
        let index = PineconeIndex::new(client, "pc-key", DEFAULT_INDEX_NAME);
        index.connect().await.unwrap();

        let vectors = vec![
            VectorUpsert {
                id: "a".into(),
                values: vec![0.1, 0.2],
                metadata: Metadata::new(),
            },
            VectorUpsert {
                id: "b".into(),
                values: vec![0.3, 0.4],
                metadata: Metadata::new(),
            },
        ];

        assert_eq!(index.upsert(vectors).await.unwrap(), 2);
        let (_, body) = index.client.requests().pop().unwrap();
        assert_eq!(body["vectors"][1]["id"], "b");
    }

    #[tokio::test]
    async fn test_against_http_server() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/indexes"))
            .and(header("Api-Key", "pc-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "indexes": [{"name": "visabuddy-visa-kb", "host": server.uri()}]
            })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/describe_index_stats"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"totalVectorCount": 0})))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/query"))
            .and(body_partial_json(serde_json::json!({"topK": 2})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "matches": [{"id": "x", "score": 0.7, "metadata": {"type": "faq"}}]
            })))
            .mount(&server)
            .await;

        let index = PineconeIndex::new(HttpClient::new(), "pc-key", DEFAULT_INDEX_NAME)
            .with_controller_url(server.uri());
        index.connect().await.unwrap();

        let matches = index.query(&[0.1, 0.2], 2, &MetadataFilter::new()).await.unwrap();
        assert_eq!(matches[0].id, "x");
    }

    #[tokio::test]
    async fn test_slow_index_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"indexes": []}))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let index = PineconeIndex::new(HttpClient::new(), "pc-key", DEFAULT_INDEX_NAME)
            .with_controller_url(server.uri())
            .with_timeout(Duration::from_millis(50));

        assert!(matches!(index.connect().await, Err(DomainError::Timeout { .. })));
    }
}

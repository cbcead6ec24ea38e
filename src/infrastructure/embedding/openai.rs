//! OpenAI embedding provider implementation

use async_trait::async_trait;

use crate::domain::DomainError;
use crate::domain::embedding::{EmbeddingProvider, EmbeddingRequest, EmbeddingResponse};
use crate::infrastructure::http::HttpClientTrait;

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com";
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";

/// OpenAI-compatible `/v1/embeddings` provider
#[derive(Debug)]
pub struct OpenAiEmbeddingProvider<C: HttpClientTrait> {
    client: C,
    auth_header: String,
    base_url: String,
    model: String,
}

impl<C: HttpClientTrait> OpenAiEmbeddingProvider<C> {
    pub fn new(client: C, api_key: impl Into<String>) -> Self {
        Self::with_base_url(client, api_key, DEFAULT_OPENAI_BASE_URL)
    }

    pub fn with_base_url(
        client: C,
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            client,
            auth_header: format!("Bearer {}", api_key.into()),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: DEFAULT_EMBEDDING_MODEL.to_string(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    fn embeddings_url(&self) -> String {
        format!("{}/v1/embeddings", self.base_url)
    }

    fn headers(&self) -> Vec<(&str, &str)> {
        vec![
            ("Authorization", self.auth_header.as_str()),
            ("Content-Type", "application/json"),
        ]
    }
}

#[async_trait]
impl<C: HttpClientTrait> EmbeddingProvider for OpenAiEmbeddingProvider<C> {
    async fn embed(&self, request: EmbeddingRequest) -> Result<EmbeddingResponse, DomainError> {
        let body = serde_json::to_value(&request)
            .map_err(|e| DomainError::internal(format!("Failed to encode request: {}", e)))?;

        let response = self
            .client
            .post_json(&self.embeddings_url(), self.headers(), &body)
            .await?;

        serde_json::from_value(response).map_err(|e| {
            DomainError::provider("openai", format!("Failed to parse embedding response: {}", e))
        })
    }

    fn provider_name(&self) -> &'static str {
        "openai"
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::http::MockHttpClient;

    const TEST_URL: &str = "https://api.openai.com/v1/embeddings";

    fn mock_response(count: usize, dimensions: usize) -> serde_json::Value {
        let data: Vec<serde_json::Value> = (0..count)
            .map(|i| {
                let embedding: Vec<f32> = (0..dimensions).map(|j| (i + j) as f32 * 0.001).collect();
                serde_json::json!({"index": i, "embedding": embedding, "object": "embedding"})
            })
            .collect();

        serde_json::json!({
            "model": "text-embedding-3-small",
            "data": data,
            "usage": {"prompt_tokens": 10, "total_tokens": 10}
        })
    }

    #[tokio::test]
    async fn test_embed_batch() {
        let client = MockHttpClient::new().with_response(TEST_URL, mock_response(2, 8));
        let provider = OpenAiEmbeddingProvider::new(client, "sk-test");

        let request = EmbeddingRequest::new(provider.model(), &["a\nb".to_string(), "c".to_string()])
            .with_dimensions(8);
        let response = provider.embed(request).await.unwrap();

        assert_eq!(response.embeddings().len(), 2);
        assert_eq!(response.embeddings()[1].vector().len(), 8);

        let requests = provider.client.requests();
        assert_eq!(requests[0].0, TEST_URL);
        assert_eq!(
            requests[0].1,
            serde_json::json!({
                "model": "text-embedding-3-small",
                "input": ["a b", "c"],
                "dimensions": 8
            })
        );
    }

    #[tokio::test]
    async fn test_custom_base_url_and_model() {
        let client = MockHttpClient::new()
            .with_response("http://localhost:9000/v1/embeddings", mock_response(1, 4));
        let provider = OpenAiEmbeddingProvider::with_base_url(client, "k", "http://localhost:9000/")
            .with_model("text-embedding-3-large");

        assert_eq!(provider.model(), "text-embedding-3-large");
        let response = provider
            .embed(EmbeddingRequest::new(provider.model(), &["x".to_string()]))
            .await
            .unwrap();
        assert_eq!(response.embeddings().len(), 1);
    }

    #[tokio::test]
    async fn test_provider_error_propagates() {
        let client = MockHttpClient::new().with_error(TEST_URL, "HTTP 429");
        let provider = OpenAiEmbeddingProvider::new(client, "sk-test");

        let result = provider
            .embed(EmbeddingRequest::new(provider.model(), &["x".to_string()]))
            .await;

        assert!(matches!(result, Err(DomainError::Provider { .. })));
    }

    #[tokio::test]
    async fn test_malformed_response() {
        let client = MockHttpClient::new().with_response(TEST_URL, serde_json::json!({"data": "nope"}));
        let provider = OpenAiEmbeddingProvider::new(client, "sk-test");

        let result = provider
            .embed(EmbeddingRequest::new(provider.model(), &["x".to_string()]))
            .await;

        assert!(result.is_err());
    }
}

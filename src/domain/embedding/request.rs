//! Embedding request types

use serde::{Deserialize, Serialize};

/// Request to generate embeddings for a batch of texts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingRequest {
    /// Model to use for embedding
    model: String,
    /// Texts to embed, in order
    input: Vec<String>,
    /// Requested output dimensions (for models that support it)
    #[serde(skip_serializing_if = "Option::is_none")]
    dimensions: Option<usize>,
}

impl EmbeddingRequest {
    /// Create a request for a batch of texts
    ///
    /// Newlines are collapsed to spaces; providers degrade on embedded newlines.
    pub fn new(model: impl Into<String>, texts: &[String]) -> Self {
        Self {
            model: model.into(),
            input: texts.iter().map(|t| t.replace('\n', " ")).collect(),
            dimensions: None,
        }
    }

    /// Set the output dimensions
    pub fn with_dimensions(mut self, dimensions: usize) -> Self {
        self.dimensions = Some(dimensions);
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn inputs(&self) -> &[String] {
        &self.input
    }

    pub fn dimensions(&self) -> Option<usize> {
        self.dimensions
    }

    pub fn len(&self) -> usize {
        self.input.len()
    }

    pub fn is_empty(&self) -> bool {
        self.input.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newlines_collapsed() {
        let request = EmbeddingRequest::new(
            "text-embedding-3-small",
            &["Fee:\n$185".to_string(), "plain".to_string()],
        );

        assert_eq!(request.inputs(), &["Fee: $185".to_string(), "plain".to_string()]);
        assert_eq!(request.len(), 2);
    }

    #[test]
    fn test_serialization_skips_unset_dimensions() {
        let request = EmbeddingRequest::new("m", &["a".to_string()]);
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json, serde_json::json!({"model": "m", "input": ["a"]}));

        let json = serde_json::to_value(request.with_dimensions(1536)).unwrap();
        assert_eq!(json["dimensions"], 1536);
    }
}

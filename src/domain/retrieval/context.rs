//! Retrieval queries and the context handed to prompt assembly

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::knowledge_base::{Metadata, MetadataFilter};

/// Which tier answered a retrieval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RetrievalSource {
    Remote,
    Cache,
    None,
}

impl RetrievalSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Remote => "remote",
            Self::Cache => "cache",
            Self::None => "none",
        }
    }
}

impl fmt::Display for RetrievalSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A retrieval request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievalQuery {
    pub query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visa_type: Option<String>,
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

fn default_top_k() -> usize {
    5
}

impl RetrievalQuery {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            country: None,
            visa_type: None,
            top_k: default_top_k(),
        }
    }

    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    pub fn with_visa_type(mut self, visa_type: impl Into<String>) -> Self {
        self.visa_type = Some(visa_type.into());
        self
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Equality filter over the fields that are set
    pub fn filter(&self) -> MetadataFilter {
        MetadataFilter::new()
            .eq_opt("country", self.country.as_deref())
            .eq_opt("visa_type", self.visa_type.as_deref())
    }
}

/// A retrieved chunk shaped for prompt assembly
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextDocument {
    /// Country, else topic, else `Unknown`
    pub source: String,
    #[serde(rename = "type")]
    pub doc_type: String,
    pub score: f32,
    pub content: String,
}

impl ContextDocument {
    pub fn from_metadata(metadata: &Metadata, score: f32, content: impl Into<String>) -> Self {
        let lookup = |key: &str| metadata.get(key).and_then(|v| v.as_str()).map(str::to_string);

        Self {
            source: lookup("country")
                .or_else(|| lookup("topic"))
                .unwrap_or_else(|| "Unknown".to_string()),
            doc_type: lookup("type").unwrap_or_else(|| "unknown".to_string()),
            score,
            content: content.into(),
        }
    }
}

/// Ranked context for a query
///
/// An empty `documents` list means no context is available; it is not an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievalContext {
    pub documents: Vec<ContextDocument>,
    pub query: String,
    pub sources: Vec<String>,
    pub count: usize,
    pub source: RetrievalSource,
}

impl RetrievalContext {
    pub fn new(query: impl Into<String>, documents: Vec<ContextDocument>, source: RetrievalSource) -> Self {
        let sources = documents.iter().map(|d| d.source.clone()).collect();
        Self {
            count: documents.len(),
            documents,
            query: query.into(),
            sources,
            source,
        }
    }

    pub fn empty(query: impl Into<String>) -> Self {
        Self::new(query, Vec::new(), RetrievalSource::None)
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// All document contents joined by spaces
    pub fn joined_content(&self) -> String {
        self.documents
            .iter()
            .map(|d| d.content.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_uses_set_fields_only() {
        let query = RetrievalQuery::new("fees").with_country("USA");
        let filter = query.filter();

        assert_eq!(filter.len(), 1);
        assert!(RetrievalQuery::new("fees").filter().is_empty());
    }

    #[test]
    fn test_context_document_source_fallbacks() {
        let mut metadata = Metadata::new();
        metadata.insert("topic".into(), "visa_refusal".into());
        let doc = ContextDocument::from_metadata(&metadata, 0.5, "text");
        assert_eq!(doc.source, "visa_refusal");
        assert_eq!(doc.doc_type, "unknown");

        metadata.insert("country".into(), "Canada".into());
        metadata.insert("type".into(), "visa_info".into());
        let doc = ContextDocument::from_metadata(&metadata, 0.5, "text");
        assert_eq!(doc.source, "Canada");
        assert_eq!(doc.doc_type, "visa_info");

        let doc = ContextDocument::from_metadata(&Metadata::new(), 0.1, "text");
        assert_eq!(doc.source, "Unknown");
    }

    #[test]
    fn test_context_serialization() {
        let doc = ContextDocument::from_metadata(&Metadata::new(), 0.25, "body");
        let context = RetrievalContext::new("q", vec![doc], RetrievalSource::Cache);
        let json = serde_json::to_value(&context).unwrap();

        assert_eq!(json["source"], "cache");
        assert_eq!(json["count"], 1);
        assert_eq!(json["sources"], serde_json::json!(["Unknown"]));
        assert_eq!(json["documents"][0]["type"], "unknown");
    }

    #[test]
    fn test_query_deserialize_defaults() {
        let query: RetrievalQuery = serde_json::from_str(r#"{"query": "visa"}"#).unwrap();
        assert_eq!(query.top_k, 5);
        assert_eq!(query.country, None);
    }
}

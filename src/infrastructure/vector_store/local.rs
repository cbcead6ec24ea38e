//! File-backed local vector store with exact cosine search

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::{debug, info, warn};

use crate::domain::DomainError;
use crate::domain::knowledge_base::{Metadata, MetadataFilter};
use crate::domain::vector_store::{self, CacheRecord, RetrievalResult, StoreStats};

pub const DEFAULT_CACHE_PATH: &str = ".cache/rag_cache.json";

/// On-disk layout of the store
#[derive(Debug, Serialize, Deserialize)]
struct CacheFile {
    documents: Vec<StoredDocument>,
    embeddings: BTreeMap<String, Vec<f32>>,
    #[serde(default)]
    metadata_index: BTreeMap<String, Metadata>,
    cached_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredDocument {
    id: String,
    text: String,
    #[serde(default)]
    metadata: Metadata,
}

/// Brute-force vector store persisted as a single JSON document
///
/// Records keep insertion order, which is also the tie-break for equal scores.
/// The backing file is rewritten whole after every batch.
#[derive(Debug)]
pub struct LocalVectorStore {
    path: PathBuf,
    records: Vec<CacheRecord>,
}

impl LocalVectorStore {
    /// Open the store at `path`; a missing or unreadable file yields an empty store
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let records = match Self::load(&path) {
            Ok(Some(records)) => {
                info!(path = %path.display(), count = records.len(), "Loaded vector cache");
                records
            }
            Ok(None) => {
                debug!(path = %path.display(), "No vector cache on disk");
                Vec::new()
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to load vector cache, starting empty");
                Vec::new()
            }
        };

        Self { path, records }
    }

    fn load(path: &Path) -> Result<Option<Vec<CacheRecord>>, DomainError> {
        if !path.exists() {
            return Ok(None);
        }

        let raw = std::fs::read_to_string(path)
            .map_err(|e| DomainError::storage(format!("Failed to read cache: {}", e)))?;
        let mut file: CacheFile = serde_json::from_str(&raw)
            .map_err(|e| DomainError::storage(format!("Corrupt cache file: {}", e)))?;

        let mut records = Vec::with_capacity(file.documents.len());
        for doc in file.documents {
            match file.embeddings.remove(&doc.id) {
                Some(embedding) => {
                    records.push(CacheRecord::new(doc.id, doc.text, embedding, doc.metadata))
                }
                None => warn!(id = %doc.id, "Cached document has no embedding, skipping"),
            }
        }

        Ok(Some(records))
    }

    fn encode(&self) -> Result<Vec<u8>, DomainError> {
        let file = CacheFile {
            documents: self
                .records
                .iter()
                .map(|r| StoredDocument {
                    id: r.id.clone(),
                    text: r.text.clone(),
                    metadata: r.metadata.clone(),
                })
                .collect(),
            embeddings: self
                .records
                .iter()
                .map(|r| (r.id.clone(), r.embedding.clone()))
                .collect(),
            metadata_index: self
                .records
                .iter()
                .map(|r| (r.id.clone(), r.metadata.clone()))
                .collect(),
            cached_at: Utc::now(),
        };

        serde_json::to_vec_pretty(&file)
            .map_err(|e| DomainError::storage(format!("Failed to encode cache: {}", e)))
    }

    /// Write the whole store to a temporary file, then rename it over the backing file
    pub async fn save(&self) -> Result<(), DomainError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| DomainError::storage(format!("Failed to create cache directory: {}", e)))?;
        }

        let json = self.encode()?;

        let temp_path = self.path.with_extension("tmp");
        fs::write(&temp_path, json)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to write cache: {}", e)))?;
        fs::rename(&temp_path, &self.path)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to replace cache: {}", e)))?;

        debug!(path = %self.path.display(), count = self.records.len(), "Saved vector cache");
        Ok(())
    }

    /// Add records and persist the full store
    ///
    /// Ids are unique within the store: a record whose id is already present
    /// replaces the earlier one in place. Records stay in memory even when
    /// persisting fails.
    pub async fn add_batch(&mut self, records: Vec<CacheRecord>) -> Result<(), DomainError> {
        let count = records.len();
        let mut positions: HashMap<String, usize> = self
            .records
            .iter()
            .enumerate()
            .map(|(i, r)| (r.id.clone(), i))
            .collect();

        let mut replaced = 0;
        for record in records {
            match positions.get(&record.id) {
                Some(&i) => {
                    warn!(id = %record.id, "Duplicate record id, keeping the latest");
                    self.records[i] = record;
                    replaced += 1;
                }
                None => {
                    positions.insert(record.id.clone(), self.records.len());
                    self.records.push(record);
                }
            }
        }

        self.save().await?;
        info!(count, replaced, total = self.records.len(), "Added records to vector cache");
        Ok(())
    }

    /// Replace every record with a freshly ingested set
    pub async fn replace_all(&mut self, records: Vec<CacheRecord>) -> Result<(), DomainError> {
        self.records.clear();
        self.add_batch(records).await
    }

    /// Top `top_k` records matching `filter`, by descending cosine similarity
    pub fn search(&self, query: &[f32], top_k: usize, filter: &MetadataFilter) -> Vec<RetrievalResult> {
        if self.records.is_empty() {
            warn!("Vector cache is empty");
            return Vec::new();
        }

        let mut scored: Vec<(&CacheRecord, f32)> = self
            .records
            .iter()
            .filter(|r| filter.matches(&r.metadata))
            .map(|r| (r, Self::cosine_similarity(query, &r.embedding)))
            .collect();

        // Stable: equal scores keep insertion order
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

        let results: Vec<RetrievalResult> = scored
            .into_iter()
            .take(top_k)
            .map(|(r, score)| RetrievalResult {
                id: r.id.clone(),
                text: r.text.clone(),
                score,
                metadata: r.metadata.clone(),
            })
            .collect();

        debug!(count = results.len(), "Cache search complete");
        results
    }

    pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
        vector_store::cosine_similarity(a, b)
    }

    pub fn stats(&self) -> StoreStats {
        StoreStats {
            total_documents: self.records.len(),
            total_embeddings: self.records.iter().filter(|r| !r.embedding.is_empty()).count(),
            backing_store: self.path.display().to_string(),
            exists: self.path.exists(),
        }
    }

    /// Remove every record and delete the backing file
    pub async fn clear(&mut self) -> Result<(), DomainError> {
        self.records.clear();

        match fs::remove_file(&self.path).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                return Err(DomainError::storage(format!("Failed to delete cache: {}", e)));
            }
        }

        info!(path = %self.path.display(), "Vector cache cleared");
        Ok(())
    }

    pub fn records(&self) -> &[CacheRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs as std_fs;
    use tempfile::TempDir;

    fn record(id: &str, embedding: Vec<f32>, country: &str) -> CacheRecord {
        let mut metadata = Metadata::new();
        metadata.insert("country".into(), country.into());
        metadata.insert("type".into(), "visa_info".into());
        CacheRecord::new(id, format!("text of {}", id), embedding, metadata)
    }

    fn store(dir: &TempDir) -> LocalVectorStore {
        LocalVectorStore::open(dir.path().join("cache").join("rag_cache.json"))
    }

    #[test]
    fn test_missing_file_yields_empty_store() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        assert!(store.is_empty());
        assert!(!store.stats().exists);
    }

    #[test]
    fn test_corrupt_file_yields_empty_store() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("rag_cache.json");
        std_fs::write(&path, "{ not json").unwrap();

        let store = LocalVectorStore::open(&path);

        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_add_batch_persists_and_reloads() {
        let dir = TempDir::new().unwrap();
        let mut first = store(&dir);
        let records = vec![
            record("a", vec![1.0, 0.0], "USA"),
            record("b", vec![0.0, 1.0], "UK"),
        ];

        first.add_batch(records.clone()).await.unwrap();
        let second = store(&dir);

        assert_eq!(second.records(), records.as_slice());
        assert!(!first.path().with_extension("tmp").exists());
    }

    #[tokio::test]
    async fn test_file_layout() {
        let dir = TempDir::new().unwrap();
        let mut store = store(&dir);
        store.add_batch(vec![record("a", vec![0.5, 0.5], "USA")]).await.unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&std_fs::read_to_string(store.path()).unwrap()).unwrap();

        assert_eq!(raw["documents"][0]["id"], "a");
        assert_eq!(raw["embeddings"]["a"], serde_json::json!([0.5, 0.5]));
        assert_eq!(raw["metadata_index"]["a"]["country"], "USA");
        assert!(raw["cached_at"].is_string());
    }

    #[tokio::test]
    async fn test_search_orders_and_limits() {
        let dir = TempDir::new().unwrap();
        let mut store = store(&dir);
        store
            .add_batch(vec![
                record("far", vec![-1.0, 0.0], "USA"),
                record("near", vec![1.0, 0.1], "USA"),
                record("mid", vec![0.5, 0.5], "USA"),
            ])
            .await
            .unwrap();

        let results = store.search(&[1.0, 0.0], 2, &MetadataFilter::new());

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].id, "near");
        assert_eq!(results[1].id, "mid");
        assert!(results[0].score >= results[1].score);
    }

    #[tokio::test]
    async fn test_equal_scores_keep_insertion_order() {
        let dir = TempDir::new().unwrap();
        let mut store = store(&dir);
        store
            .add_batch(vec![
                record("first", vec![1.0, 0.0], "USA"),
                record("second", vec![2.0, 0.0], "USA"),
                record("third", vec![3.0, 0.0], "USA"),
            ])
            .await
            .unwrap();

        let ids: Vec<String> = store
            .search(&[1.0, 0.0], 10, &MetadataFilter::new())
            .into_iter()
            .map(|r| r.id)
            .collect();

        assert_eq!(ids, vec!["first", "second", "third"]);
    }

    #[tokio::test]
    async fn test_search_applies_filter() {
        let dir = TempDir::new().unwrap();
        let mut store = store(&dir);
        store
            .add_batch(vec![
                record("us", vec![1.0, 0.0], "USA"),
                record("uk", vec![1.0, 0.0], "UK"),
            ])
            .await
            .unwrap();

        let results = store.search(&[1.0, 0.0], 5, &MetadataFilter::new().eq("country", "UK"));
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "uk");

        let none = store.search(&[1.0, 0.0], 5, &MetadataFilter::new().eq("embassy", "x"));
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_replace_all_and_clear() {
        let dir = TempDir::new().unwrap();
        let mut store = store(&dir);
        store.add_batch(vec![record("old", vec![1.0], "USA")]).await.unwrap();
        store.replace_all(vec![record("new", vec![1.0], "USA")]).await.unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(store.records()[0].id, "new");

        let stats = store.stats();
        assert_eq!(stats.total_documents, 1);
        assert_eq!(stats.total_embeddings, 1);
        assert!(stats.exists);

        store.clear().await.unwrap();
        assert!(store.is_empty());
        assert!(!store.path().exists());
        // Clearing twice is fine
        store.clear().await.unwrap();
    }

    #[tokio::test]
    async fn test_duplicate_ids_keep_latest_and_round_trip() {
        let dir = TempDir::new().unwrap();
        let mut first = store(&dir);
        first
            .add_batch(vec![
                record("dup", vec![1.0, 0.0], "USA"),
                record("other", vec![0.5, 0.5], "UK"),
            ])
            .await
            .unwrap();
        first
            .add_batch(vec![CacheRecord::new(
                "dup",
                "second",
                vec![0.0, 1.0],
                Metadata::new(),
            )])
            .await
            .unwrap();

        assert_eq!(first.len(), 2);
        assert_eq!(first.records()[0].text, "second");
        assert_eq!(first.records()[0].embedding, vec![0.0, 1.0]);

        let reopened = store(&dir);
        assert_eq!(reopened.records(), first.records());
    }

    #[tokio::test]
    async fn test_duplicate_ids_within_batch() {
        let dir = TempDir::new().unwrap();
        let mut first = store(&dir);
        first
            .add_batch(vec![
                CacheRecord::new("dup", "first", vec![1.0, 0.0], Metadata::new()),
                CacheRecord::new("dup", "second", vec![0.0, 1.0], Metadata::new()),
            ])
            .await
            .unwrap();

        let reopened = store(&dir);
        assert_eq!(reopened.len(), 1);
        assert_eq!(reopened.records()[0].text, "second");
        assert_eq!(reopened.records()[0].embedding, vec![0.0, 1.0]);
    }
}

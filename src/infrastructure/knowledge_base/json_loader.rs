//! Visa knowledge base loaded from a JSON file

use std::collections::BTreeMap;
use std::path::PathBuf;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::info;

use super::supplementary::supplementary_documents;
use crate::domain::DomainError;
use crate::domain::knowledge_base::{Document, KnowledgeBaseLoader};

pub const DEFAULT_KNOWLEDGE_BASE_PATH: &str = "data/visa_kb.json";

#[derive(Debug, Default, Deserialize)]
struct KnowledgeBaseFile {
    #[serde(default)]
    countries: BTreeMap<String, Country>,
    #[serde(default)]
    general_topics: BTreeMap<String, Topic>,
    #[serde(default)]
    faqs: Vec<Faq>,
}

#[derive(Debug, Default, Deserialize)]
struct Country {
    #[serde(default)]
    country_code: String,
    #[serde(default)]
    flag: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    visa_types: BTreeMap<String, VisaType>,
}

#[derive(Debug, Default, Deserialize)]
struct VisaType {
    requirements: Option<Text>,
    processing_time: Option<String>,
    validity: Option<String>,
    fee: Option<String>,
    documents: Option<Vec<String>>,
    tips: Option<Text>,
    embassy: Option<Embassy>,
}

#[derive(Debug, Default, Deserialize)]
struct Embassy {
    url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct Topic {
    content: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct Faq {
    #[serde(default)]
    question: String,
    #[serde(default)]
    answer: String,
}

/// Free text given either as one string or as a list of lines
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Text {
    Single(String),
    Lines(Vec<String>),
}

impl Text {
    fn render(text: &Option<Text>) -> String {
        match text {
            Some(Text::Single(s)) => s.clone(),
            Some(Text::Lines(lines)) => lines.join("\n"),
            None => "N/A".to_string(),
        }
    }
}

fn or_na(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("N/A")
}

/// Loader for the visa knowledge base JSON file
#[derive(Debug, Clone)]
pub struct JsonKnowledgeBaseLoader {
    path: PathBuf,
    include_supplementary: bool,
}

impl JsonKnowledgeBaseLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            include_supplementary: true,
        }
    }

    pub fn with_supplementary(mut self, include: bool) -> Self {
        self.include_supplementary = include;
        self
    }

    fn parse(raw: &str) -> Result<KnowledgeBaseFile, DomainError> {
        serde_json::from_str(raw)
            .map_err(|e| DomainError::knowledge_base(format!("Error parsing knowledge base JSON: {}", e)))
    }

    fn country_documents(kb: &KnowledgeBaseFile) -> Vec<Document> {
        let mut documents = Vec::new();

        for (name, country) in &kb.countries {
            let code = country.country_code.to_lowercase();
            let overview = format!(
                "{} {}\n\n{}\n\n--- VISA INFORMATION ---",
                country.flag, name, country.description
            );

            documents.push(
                Document::new(format!("country_overview_{}", code), overview.trim())
                    .with_metadata("type", "country_overview")
                    .with_metadata("country", name.as_str())
                    .with_metadata("country_code", country.country_code.as_str())
                    .with_metadata("source", "visa_kb"),
            );

            for (visa_type, info) in &country.visa_types {
                let documents_list = info
                    .documents
                    .as_ref()
                    .map(|d| d.join(", "))
                    .unwrap_or_else(|| "N/A".to_string());
                let embassy = info
                    .embassy
                    .as_ref()
                    .and_then(|e| e.url.as_deref())
                    .unwrap_or("Check official website");

                let text = format!(
                    "Country: {name}\nVisa Type: {visa_type}\n\nRequirements:\n{requirements}\n\n\
                     Processing Time: {processing}\nValidity: {validity}\nFee: {fee}\n\n\
                     Required Documents:\n{documents_list}\n\nTips & Recommendations:\n{tips}\n\n\
                     Embassy Contact:\n{embassy}",
                    requirements = Text::render(&info.requirements),
                    processing = or_na(&info.processing_time),
                    validity = or_na(&info.validity),
                    fee = or_na(&info.fee),
                    tips = Text::render(&info.tips),
                );

                documents.push(
                    Document::new(
                        format!("visa_{}_{}", code, visa_type.to_lowercase().replace(' ', "_")),
                        text,
                    )
                    .with_metadata("type", "visa_info")
                    .with_metadata("country", name.as_str())
                    .with_metadata("country_code", country.country_code.as_str())
                    .with_metadata("visa_type", visa_type.as_str())
                    .with_metadata("source", "visa_kb"),
                );
            }
        }

        documents
    }

    fn topic_documents(kb: &KnowledgeBaseFile) -> Vec<Document> {
        kb.general_topics
            .iter()
            .map(|(name, topic)| {
                Document::new(
                    format!("topic_{}", name.to_lowercase().replace(' ', "_")),
                    format!("Topic: {}\n\n{}", name, or_na(&topic.content)),
                )
                .with_metadata("type", "general_topic")
                .with_metadata("topic", name.as_str())
                .with_metadata("source", "visa_kb")
            })
            .collect()
    }

    fn faq_documents(kb: &KnowledgeBaseFile) -> Vec<Document> {
        kb.faqs
            .iter()
            .enumerate()
            .map(|(idx, faq)| {
                Document::new(
                    format!("faq_{}", idx),
                    format!("Q: {}\n\nA: {}", faq.question, faq.answer),
                )
                .with_metadata("type", "faq")
                .with_metadata("question", faq.question.as_str())
                .with_metadata("source", "visa_kb")
            })
            .collect()
    }

    /// Documents of a parsed knowledge base, in extraction order
    fn extract(&self, kb: &KnowledgeBaseFile) -> Vec<Document> {
        let mut documents = Self::country_documents(kb);
        let country_documents = documents.len();
        documents.extend(Self::topic_documents(kb));
        documents.extend(Self::faq_documents(kb));

        info!(
            country_documents,
            topics = kb.general_topics.len(),
            faqs = kb.faqs.len(),
            "Extracted knowledge base documents"
        );

        if self.include_supplementary {
            documents.extend(supplementary_documents());
        }

        documents
    }
}

#[async_trait]
impl KnowledgeBaseLoader for JsonKnowledgeBaseLoader {
    async fn load(&self) -> Result<Vec<Document>, DomainError> {
        let raw = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            DomainError::knowledge_base(format!(
                "Failed to read knowledge base {}: {}",
                self.path.display(),
                e
            ))
        })?;

        let kb = Self::parse(&raw)?;
        let documents = self.extract(&kb);

        info!(path = %self.path.display(), count = documents.len(), "Loaded knowledge base");
        Ok(documents)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

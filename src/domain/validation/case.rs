//! Retrieval validation cases

use serde::{Deserialize, Serialize};

/// Minimum share of expected keywords a case must find to pass
pub const PASS_THRESHOLD: f64 = 0.6;

/// A query paired with keywords its retrieved context should contain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationCase {
    pub query: String,
    pub expected_keywords: Vec<String>,
    pub category: String,
}

impl ValidationCase {
    pub fn new(query: impl Into<String>, expected_keywords: &[&str], category: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            expected_keywords: expected_keywords.iter().map(|k| k.to_string()).collect(),
            category: category.into(),
        }
    }

    /// Keywords found (case-insensitive substring) in the given text
    pub fn matched_keywords(&self, content: &str) -> Vec<String> {
        let content = content.to_lowercase();
        self.expected_keywords
            .iter()
            .filter(|k| content.contains(&k.to_lowercase()))
            .cloned()
            .collect()
    }

    /// Share of expected keywords present in the text
    pub fn match_ratio(&self, content: &str) -> f64 {
        if self.expected_keywords.is_empty() {
            return 0.0;
        }
        self.matched_keywords(content).len() as f64 / self.expected_keywords.len() as f64
    }
}

/// The reference battery of visa queries
pub fn default_cases() -> Vec<ValidationCase> {
    vec![
        ValidationCase::new(
            "How much does a US visitor visa cost?",
            &["USA", "visitor", "B1/B2", "fee", "cost"],
            "cost",
        ),
        ValidationCase::new(
            "What documents do I need for a UK tourist visa?",
            &["UK", "documents", "passport", "tourist"],
            "documents",
        ),
        ValidationCase::new(
            "How long does Schengen visa processing take?",
            &["Schengen", "processing", "days", "time"],
            "processing_time",
        ),
        ValidationCase::new(
            "What are the requirements for working in Spain?",
            &["Spain", "work", "employment", "requirements"],
            "work_requirements",
        ),
        ValidationCase::new(
            "How long can I stay in Australia on a visitor visa?",
            &["Australia", "visitor", "stay", "duration"],
            "stay_duration",
        ),
        ValidationCase::new(
            "What should I do if my visa application is rejected?",
            &["refusal", "rejected", "denial", "appeal"],
            "visa_refusal",
        ),
        ValidationCase::new(
            "Do I need a visa for Canada as a tourist?",
            &["Canada", "visitor", "tourist", "requirements"],
            "visa_type",
        ),
        ValidationCase::new(
            "How much financial support do I need to show for Schengen visa?",
            &["Schengen", "funds", "financial", "requirement"],
            "financial_requirements",
        ),
        ValidationCase::new(
            "What is the processing time for a US work visa?",
            &["USA", "work", "H1-B", "processing"],
            "processing_time",
        ),
        ValidationCase::new(
            "Common reasons for visa rejection and how to avoid them",
            &["refusal", "reasons", "rejection", "avoid"],
            "visa_refusal",
        ),
    ]
}

/// A filtered query whose context must contain every expected string
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterCase {
    pub name: String,
    pub query: String,
    pub country: Option<String>,
    pub visa_type: Option<String>,
    pub expected_in_result: Vec<String>,
}

pub fn default_filter_cases() -> Vec<FilterCase> {
    vec![
        FilterCase {
            name: "Filter by country (USA)".to_string(),
            query: "visitor visa requirements".to_string(),
            country: Some("USA".to_string()),
            visa_type: None,
            expected_in_result: vec!["USA".to_string(), "visitor".to_string()],
        },
        FilterCase {
            name: "Filter by visa type (Work)".to_string(),
            query: "work visa".to_string(),
            country: None,
            visa_type: Some("Work".to_string()),
            expected_in_result: vec!["work".to_string(), "employment".to_string()],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_cases() {
        let cases = default_cases();
        assert_eq!(cases.len(), 10);
        assert!(cases.iter().all(|c| !c.expected_keywords.is_empty()));
    }

    #[test]
    fn test_match_ratio_is_case_insensitive_substring() {
        let case = ValidationCase::new("q", &["USA", "B1/B2", "fee", "cost"], "cost");
        let content = "Country: usa. The b1/b2 visa FEE is $185.";

        assert_eq!(case.matched_keywords(content), vec!["USA", "B1/B2", "fee"]);
        assert!((case.match_ratio(content) - 0.75).abs() < f64::EPSILON);
    }

    #[test]
    fn test_match_ratio_without_keywords() {
        let case = ValidationCase::new("q", &[], "none");
        assert_eq!(case.match_ratio("anything"), 0.0);
    }
}

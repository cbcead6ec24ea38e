//! Validation reports

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::retrieval::{ContextDocument, RetrievalSource};

/// Outcome of one validation case
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseResult {
    pub query: String,
    pub category: String,
    pub retrieved_documents: usize,
    pub sources: Vec<String>,
    pub expected_keywords: Vec<String>,
    pub matched_keywords: Vec<String>,
    pub match_ratio: f64,
    pub passed: bool,
    pub retrieval_source: RetrievalSource,
    pub documents: Vec<ContextDocument>,
}

/// Aggregate over the whole case battery
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuiteReport {
    pub total_tests: usize,
    pub passed: usize,
    pub failed: usize,
    pub pass_rate: f64,
    pub average_match_ratio: f64,
    pub total_documents_retrieved: usize,
    pub results: Vec<CaseResult>,
}

impl SuiteReport {
    pub fn from_results(results: Vec<CaseResult>) -> Self {
        let total_tests = results.len();
        let passed = results.iter().filter(|r| r.passed).count();
        let (pass_rate, average_match_ratio) = if total_tests == 0 {
            (0.0, 0.0)
        } else {
            (
                passed as f64 / total_tests as f64,
                results.iter().map(|r| r.match_ratio).sum::<f64>() / total_tests as f64,
            )
        };

        Self {
            total_tests,
            passed,
            failed: total_tests - passed,
            pass_rate,
            average_match_ratio,
            total_documents_retrieved: results.iter().map(|r| r.retrieved_documents).sum(),
            results,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterTestResult {
    pub test: String,
    pub passed: bool,
    pub documents_retrieved: usize,
    pub sources: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterReport {
    pub filter_tests: Vec<FilterTestResult>,
    pub filter_pass_rate: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreDistribution {
    /// score > 0.8
    pub high: usize,
    /// 0.5 <= score <= 0.8
    pub medium: usize,
    /// score < 0.5
    pub low: usize,
}

impl ScoreDistribution {
    pub fn from_scores(scores: &[f32]) -> Self {
        let mut distribution = Self::default();
        for &score in scores {
            if score > 0.8 {
                distribution.high += 1;
            } else if score >= 0.5 {
                distribution.medium += 1;
            } else {
                distribution.low += 1;
            }
        }
        distribution
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityReport {
    pub total_retrieved: usize,
    /// Distinct 50-character content prefixes
    pub unique_results: usize,
    pub average_score: f32,
    pub score_distribution: ScoreDistribution,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OverallStatus {
    Passed,
    NeedsImprovement,
}

/// Combined report of the suite, filter and quality checks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemReport {
    pub timestamp: DateTime<Utc>,
    pub validation_suite: SuiteReport,
    pub filter_tests: FilterReport,
    pub quality_metrics: QualityReport,
    pub overall_status: OverallStatus,
}

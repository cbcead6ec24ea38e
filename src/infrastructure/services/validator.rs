//! Retrieval quality validation against a fixed battery of queries

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use crate::domain::retrieval::{ContextRetriever, RetrievalQuery};
use crate::domain::validation::{
    CaseResult, FilterCase, FilterReport, FilterTestResult, OverallStatus, PASS_THRESHOLD,
    QualityReport, ScoreDistribution, SuiteReport, SystemReport, ValidationCase, default_cases,
    default_filter_cases,
};

pub const SUITE_TOP_K: usize = 5;
pub const QUALITY_QUERY: &str = "visa requirements";
pub const QUALITY_TOP_K: usize = 10;

/// Characters compared when counting distinct results
const PREFIX_CHARS: usize = 50;

/// Scores retrieval by keyword coverage of the retrieved text
pub struct RetrievalValidator {
    retriever: Arc<dyn ContextRetriever>,
    cases: Vec<ValidationCase>,
    filter_cases: Vec<FilterCase>,
}

impl RetrievalValidator {
    pub fn new(retriever: Arc<dyn ContextRetriever>) -> Self {
        Self {
            retriever,
            cases: default_cases(),
            filter_cases: default_filter_cases(),
        }
    }

    pub fn with_cases(mut self, cases: Vec<ValidationCase>) -> Self {
        self.cases = cases;
        self
    }

    pub fn with_filter_cases(mut self, filter_cases: Vec<FilterCase>) -> Self {
        self.filter_cases = filter_cases;
        self
    }

    async fn run_case(&self, case: &ValidationCase) -> CaseResult {
        let context = self
            .retriever
            .retrieve_context(RetrievalQuery::new(&case.query).with_top_k(SUITE_TOP_K))
            .await;

        let content = context.joined_content();
        let matched_keywords = case.matched_keywords(&content);
        let match_ratio = case.match_ratio(&content);

        debug!(
            query = %case.query,
            match_ratio,
            source = %context.source,
            "Validation case complete"
        );

        CaseResult {
            query: case.query.clone(),
            category: case.category.clone(),
            retrieved_documents: context.count,
            sources: context.sources,
            expected_keywords: case.expected_keywords.clone(),
            matched_keywords,
            match_ratio,
            passed: match_ratio >= PASS_THRESHOLD,
            retrieval_source: context.source,
            documents: context.documents,
        }
    }

    /// Run every validation case in order
    pub async fn run_suite(&self) -> SuiteReport {
        info!(cases = self.cases.len(), "Running retrieval validation suite");

        let mut results = Vec::with_capacity(self.cases.len());
        for case in &self.cases {
            results.push(self.run_case(case).await);
        }

        let report = SuiteReport::from_results(results);
        info!(
            passed = report.passed,
            total = report.total_tests,
            pass_rate = report.pass_rate,
            "Validation suite complete"
        );
        report
    }

    /// Filtered queries; a case passes when every expected string appears
    pub async fn test_filtering(&self) -> FilterReport {
        let mut filter_tests = Vec::with_capacity(self.filter_cases.len());

        for case in &self.filter_cases {
            let mut query = RetrievalQuery::new(&case.query).with_top_k(SUITE_TOP_K);
            if let Some(country) = &case.country {
                query = query.with_country(country);
            }
            if let Some(visa_type) = &case.visa_type {
                query = query.with_visa_type(visa_type);
            }

            let context = self.retriever.retrieve_context(query).await;
            let content = context.joined_content().to_lowercase();
            let passed = case
                .expected_in_result
                .iter()
                .all(|expected| content.contains(&expected.to_lowercase()));

            filter_tests.push(FilterTestResult {
                test: case.name.clone(),
                passed,
                documents_retrieved: context.count,
                sources: context.sources,
            });
        }

        let filter_pass_rate = if filter_tests.is_empty() {
            0.0
        } else {
            filter_tests.iter().filter(|t| t.passed).count() as f64 / filter_tests.len() as f64
        };

        FilterReport {
            filter_tests,
            filter_pass_rate,
        }
    }

    /// Score statistics for a broad query
    pub async fn test_retrieval_quality(&self) -> QualityReport {
        let context = self
            .retriever
            .retrieve_context(RetrievalQuery::new(QUALITY_QUERY).with_top_k(QUALITY_TOP_K))
            .await;

        let scores: Vec<f32> = context.documents.iter().map(|d| d.score).collect();
        let unique_results = context
            .documents
            .iter()
            .map(|d| d.content.chars().take(PREFIX_CHARS).collect::<String>())
            .collect::<HashSet<_>>()
            .len();
        let average_score = if scores.is_empty() {
            0.0
        } else {
            scores.iter().sum::<f32>() / scores.len() as f32
        };

        QualityReport {
            total_retrieved: context.count,
            unique_results,
            average_score,
            score_distribution: ScoreDistribution::from_scores(&scores),
        }
    }

    /// Suite, filter and quality checks combined into one report
    pub async fn validate_system(&self) -> SystemReport {
        let validation_suite = self.run_suite().await;
        let filter_tests = self.test_filtering().await;
        let quality_metrics = self.test_retrieval_quality().await;

        let overall_status = if validation_suite.pass_rate >= PASS_THRESHOLD {
            OverallStatus::Passed
        } else {
            OverallStatus::NeedsImprovement
        };

        info!(status = ?overall_status, "System validation complete");

        SystemReport {
            timestamp: Utc::now(),
            validation_suite,
            filter_tests,
            quality_metrics,
            overall_status,
        }
    }
}

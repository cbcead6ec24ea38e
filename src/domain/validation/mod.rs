//! Retrieval quality validation - cases and reports

mod case;
mod report;

pub use case::{FilterCase, PASS_THRESHOLD, ValidationCase, default_cases, default_filter_cases};
pub use report::{
    CaseResult, FilterReport, FilterTestResult, OverallStatus, QualityReport, ScoreDistribution,
    SuiteReport, SystemReport,
};

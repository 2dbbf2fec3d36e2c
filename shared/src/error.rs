//! Error taxonomy of the recommendation core

use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Which frozen vocabulary a label belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryKind {
    Location,
    Season,
}

impl fmt::Display for CategoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryKind::Location => f.write_str("location"),
            CategoryKind::Season => f.write_str("season"),
        }
    }
}

/// Request-level failures of a recommendation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RecommendError {
    #[error("Invalid location: {0}")]
    InvalidLocation(String),

    #[error("Price model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("Unknown {kind} category: {label}")]
    UnknownCategory { kind: CategoryKind, label: String },

    #[error("No viable candidates for {location} within {horizon} days")]
    NoViableCandidates { location: String, horizon: u32 },

    #[error("Encoding error: {0}")]
    EncodingError(String),
}

impl RecommendError {
    /// Stable machine-readable code, independent of transport
    pub fn code(&self) -> &'static str {
        match self {
            RecommendError::InvalidLocation(_) => "INVALID_LOCATION",
            RecommendError::ModelUnavailable(_) => "MODEL_UNAVAILABLE",
            RecommendError::UnknownCategory { .. } => "UNKNOWN_CATEGORY",
            RecommendError::NoViableCandidates { .. } => "NO_VIABLE_CANDIDATES",
            RecommendError::EncodingError(_) => "ENCODING_ERROR",
        }
    }
}

/// Why a single candidate start date was left out of the ranking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// No historical record matches any day of the window
    NoClimateData,
    /// The model returned NaN or infinity
    NonFinitePrice,
    /// The start or harvest date is outside the supported calendar
    DateOutOfRange,
}

/// A candidate that was skipped, kept for logging
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SkippedCandidate {
    pub start_date: NaiveDate,
    pub reason: SkipReason,
}

/// Failures while loading or validating a model artifact
#[derive(Error, Debug)]
pub enum ArtifactError {
    #[error("Model artifact is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Feature columns {found:?} do not match expected {expected:?}")]
    FeatureOrder {
        expected: Vec<String>,
        found: Vec<String>,
    },

    #[error("The {0} vocabulary is empty")]
    EmptyClasses(CategoryKind),

    #[error("Duplicate {kind} class: {label}")]
    DuplicateClass { kind: CategoryKind, label: String },

    #[error("The {kind} vocabulary has no code for {label}")]
    MissingClass { kind: CategoryKind, label: String },

    #[error("Tree {tree} node {node}: {reason}")]
    InvalidTree {
        tree: usize,
        node: usize,
        reason: String,
    },

    #[error("Linear model has {found} coefficients, expected {expected}")]
    CoefficientCount { expected: usize, found: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_are_stable() {
        assert_eq!(RecommendError::InvalidLocation("x".into()).code(), "INVALID_LOCATION");
        assert_eq!(RecommendError::ModelUnavailable("x".into()).code(), "MODEL_UNAVAILABLE");
        assert_eq!(
            RecommendError::UnknownCategory {
                kind: CategoryKind::Season,
                label: "Spring".into()
            }
            .code(),
            "UNKNOWN_CATEGORY"
        );
        assert_eq!(
            RecommendError::NoViableCandidates {
                location: "Bengaluru".into(),
                horizon: 10
            }
            .code(),
            "NO_VIABLE_CANDIDATES"
        );
        assert_eq!(RecommendError::EncodingError("x".into()).code(), "ENCODING_ERROR");
    }

    #[test]
    fn test_unknown_category_message() {
        let err = RecommendError::UnknownCategory {
            kind: CategoryKind::Location,
            label: "Mysuru".into(),
        };
        assert_eq!(err.to_string(), "Unknown location category: Mysuru");
    }
}

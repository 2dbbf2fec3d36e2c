//! Price model contract and the artifact format produced by training
//!
//! A model artifact is a single JSON document carrying both the category
//! vocabulary and the fitted regression, so the two always come from the
//! same training run.

use serde::Deserialize;

use crate::error::ArtifactError;
use crate::models::{FeatureVector, FEATURE_COLUMNS, FEATURE_COUNT};
use crate::vocabulary::CategoryVocabulary;

/// Regression function from features to an expected price.
///
/// Implementations must be safe to call from many requests at once and must
/// not mutate internal state while predicting.
pub trait PricePredictor: Send + Sync {
    fn predict(&self, features: &FeatureVector) -> f64;
}

impl<F> PricePredictor for F
where
    F: Fn(&FeatureVector) -> f64 + Send + Sync,
{
    fn predict(&self, features: &FeatureVector) -> f64 {
        self(features)
    }
}

/// Serialized artifact as written by the training pipeline
#[derive(Debug, Clone, Deserialize)]
pub struct ModelArtifact {
    #[serde(default)]
    pub revision: String,
    pub feature_names: Vec<String>,
    pub location_classes: Vec<String>,
    pub season_classes: Vec<String>,
    pub model: RegressionModel,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RegressionModel {
    TreeEnsemble {
        #[serde(default)]
        base_score: f64,
        trees: Vec<Tree>,
    },
    Linear {
        intercept: f64,
        coefficients: Vec<f64>,
    },
}

#[derive(Debug, Clone, Deserialize)]
pub struct Tree {
    pub nodes: Vec<TreeNode>,
}

/// Node of a regression tree. Split nodes send a row to `yes` when
/// `x[split] < threshold`, to `no` otherwise, and to `missing` on NaN.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    Leaf {
        leaf: f64,
    },
    Split {
        split: usize,
        threshold: f64,
        yes: usize,
        no: usize,
        #[serde(default)]
        missing: Option<usize>,
    },
}

impl Tree {
    fn validate(&self, tree: usize) -> Result<(), ArtifactError> {
        let invalid = |node: usize, reason: String| ArtifactError::InvalidTree { tree, node, reason };

        if self.nodes.is_empty() {
            return Err(invalid(0, "tree has no nodes".to_string()));
        }

        for (index, node) in self.nodes.iter().enumerate() {
            let TreeNode::Split {
                split,
                threshold,
                yes,
                no,
                missing,
            } = node
            else {
                continue;
            };

            if *split >= FEATURE_COUNT {
                return Err(invalid(index, format!("split feature {} out of range", split)));
            }
            if threshold.is_nan() {
                return Err(invalid(index, "threshold is NaN".to_string()));
            }
            // Children must point forward so evaluation always terminates
            for child in [Some(*yes), Some(*no), *missing].into_iter().flatten() {
                if child <= index || child >= self.nodes.len() {
                    return Err(invalid(index, format!("child {} out of range", child)));
                }
            }
        }
        Ok(())
    }

    fn evaluate(&self, row: &[f64; FEATURE_COUNT]) -> f64 {
        let mut index = 0;
        loop {
            match self.nodes.get(index) {
                Some(TreeNode::Leaf { leaf }) => return *leaf,
                Some(TreeNode::Split {
                    split,
                    threshold,
                    yes,
                    no,
                    missing,
                }) => {
                    let value = row.get(*split).copied().unwrap_or(f64::NAN);
                    index = if value.is_nan() {
                        missing.unwrap_or(*yes)
                    } else if value < *threshold {
                        *yes
                    } else {
                        *no
                    };
                }
                None => return f64::NAN,
            }
        }
    }
}

impl RegressionModel {
    fn validate(&self) -> Result<(), ArtifactError> {
        match self {
            RegressionModel::TreeEnsemble { trees, .. } => trees
                .iter()
                .enumerate()
                .try_for_each(|(index, tree)| tree.validate(index)),
            RegressionModel::Linear { coefficients, .. } => {
                if coefficients.len() != FEATURE_COUNT {
                    return Err(ArtifactError::CoefficientCount {
                        expected: FEATURE_COUNT,
                        found: coefficients.len(),
                    });
                }
                Ok(())
            }
        }
    }

    fn evaluate(&self, row: &[f64; FEATURE_COUNT]) -> f64 {
        match self {
            RegressionModel::TreeEnsemble { base_score, trees } => {
                base_score + trees.iter().map(|tree| tree.evaluate(row)).sum::<f64>()
            }
            RegressionModel::Linear {
                intercept,
                coefficients,
            } => {
                intercept
                    + coefficients
                        .iter()
                        .zip(row.iter())
                        .map(|(c, x)| c * x)
                        .sum::<f64>()
            }
        }
    }
}

/// A validated artifact ready for inference
#[derive(Debug, Clone)]
pub struct LoadedModel {
    revision: String,
    vocabulary: CategoryVocabulary,
    model: RegressionModel,
}

impl LoadedModel {
    pub fn from_json(json: &str) -> Result<Self, ArtifactError> {
        let artifact: ModelArtifact = serde_json::from_str(json)?;
        Self::from_artifact(artifact)
    }

    /// Validate an artifact against the feature contract of this build
    pub fn from_artifact(artifact: ModelArtifact) -> Result<Self, ArtifactError> {
        if artifact.feature_names.iter().map(String::as_str).ne(FEATURE_COLUMNS) {
            return Err(ArtifactError::FeatureOrder {
                expected: FEATURE_COLUMNS.iter().map(|c| c.to_string()).collect(),
                found: artifact.feature_names,
            });
        }

        let vocabulary =
            CategoryVocabulary::from_classes(artifact.location_classes, artifact.season_classes)?;
        vocabulary.ensure_complete()?;
        artifact.model.validate()?;

        Ok(Self {
            revision: artifact.revision,
            vocabulary,
            model: artifact.model,
        })
    }

    pub fn revision(&self) -> &str {
        &self.revision
    }

    pub fn vocabulary(&self) -> &CategoryVocabulary {
        &self.vocabulary
    }
}

impl PricePredictor for LoadedModel {
    fn predict(&self, features: &FeatureVector) -> f64 {
        self.model.evaluate(&features.to_array())
    }
}

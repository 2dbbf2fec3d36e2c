//! Frozen category vocabularies shared by training and inference
//!
//! A code is the position of its label in the class list the model was
//! fitted with (label-encoder semantics). Lists are never re-sorted here.

use std::collections::HashMap;

use crate::error::{ArtifactError, CategoryKind, RecommendError};
use crate::models::{Location, Season};

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryVocabulary {
    location_classes: Vec<String>,
    season_classes: Vec<String>,
    location_codes: HashMap<String, u32>,
    season_codes: HashMap<String, u32>,
}

impl CategoryVocabulary {
    /// Build from the class lists of a training run
    pub fn from_classes(
        location_classes: Vec<String>,
        season_classes: Vec<String>,
    ) -> Result<Self, ArtifactError> {
        let location_codes = index_classes(CategoryKind::Location, &location_classes)?;
        let season_codes = index_classes(CategoryKind::Season, &season_classes)?;

        Ok(Self {
            location_classes,
            season_classes,
            location_codes,
            season_codes,
        })
    }

    /// Check that every recognized location and every season has a code
    pub fn ensure_complete(&self) -> Result<(), ArtifactError> {
        for location in Location::ALL {
            let label = location.training_label();
            if !self.location_codes.contains_key(label) {
                return Err(ArtifactError::MissingClass {
                    kind: CategoryKind::Location,
                    label: label.to_string(),
                });
            }
        }
        for season in Season::ALL {
            if !self.season_codes.contains_key(season.label()) {
                return Err(ArtifactError::MissingClass {
                    kind: CategoryKind::Season,
                    label: season.label().to_string(),
                });
            }
        }
        Ok(())
    }

    pub fn location_classes(&self) -> &[String] {
        &self.location_classes
    }

    pub fn season_classes(&self) -> &[String] {
        &self.season_classes
    }

    /// Encode a location label as shown to users or as written at training time.
    /// Known spellings are canonicalized to their training label first.
    pub fn encode_location_label(&self, label: &str) -> Result<u32, RecommendError> {
        let training_label = Location::canonicalize(label)
            .map(|location| location.training_label())
            .unwrap_or(label);
        lookup(&self.location_codes, CategoryKind::Location, training_label)
    }

    pub fn encode_location(&self, location: Location) -> Result<u32, RecommendError> {
        lookup(
            &self.location_codes,
            CategoryKind::Location,
            location.training_label(),
        )
    }

    pub fn encode_season_label(&self, label: &str) -> Result<u32, RecommendError> {
        lookup(&self.season_codes, CategoryKind::Season, label)
    }

    pub fn encode_season(&self, season: Season) -> Result<u32, RecommendError> {
        self.encode_season_label(season.label())
    }
}

fn index_classes(
    kind: CategoryKind,
    classes: &[String],
) -> Result<HashMap<String, u32>, ArtifactError> {
    if classes.is_empty() {
        return Err(ArtifactError::EmptyClasses(kind));
    }

    let mut codes = HashMap::with_capacity(classes.len());
    for (code, label) in classes.iter().enumerate() {
        if codes.insert(label.clone(), code as u32).is_some() {
            return Err(ArtifactError::DuplicateClass {
                kind,
                label: label.clone(),
            });
        }
    }
    Ok(codes)
}

fn lookup(
    codes: &HashMap<String, u32>,
    kind: CategoryKind,
    label: &str,
) -> Result<u32, RecommendError> {
    codes
        .get(label)
        .copied()
        .ok_or_else(|| RecommendError::UnknownCategory {
            kind,
            label: label.to_string(),
        })
}

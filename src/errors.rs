//! Error Reporting - Config Errors and the Record Error Collection
//!
//! Configuration errors are fatal at setup or use time. Violations are
//! recoverable: they become entries in the record's error collection and
//! the host keeps processing other attributes.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::metadata::FileRef;
use crate::validation::{ErrorKind, Verdict, ViolationContext};

/// Malformed validator configuration. Never part of a per-record verdict.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("no dimension option supplied; expected at least one of width, height, min, max")]
    NoOptions,

    #[error("{option} option must be a range")]
    NotARange { option: &'static str },

    #[error("{option} option must carry an exact value, a range, or at least one bound")]
    EmptyBounds { option: &'static str },
}

/// One entry in a record's error collection, ready for message rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorEntry {
    pub attribute: String,
    pub kind: ErrorKind,
    pub context: ViolationContext,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<FileRef>,
}

impl ErrorEntry {
    /// Default English rendering.
    ///
    /// Localized callers look the kind's key up in their own catalog and
    /// interpolate the context themselves; this is the fallback text.
    pub fn message(&self) -> String {
        use crate::validation::ErrorKind::*;
        use crate::validation::ViolationContext as Ctx;

        match (self.kind, self.context) {
            (MediaMetadataMissing, _) => "is not a valid media file".to_string(),
            (DimensionMinNotIncludedIn, Ctx::Pair { width, height }) => {
                format!("must be greater than or equal to {}x{} pixel", width, height)
            }
            (DimensionMaxNotIncludedIn, Ctx::Pair { width, height }) => {
                format!("must be less than or equal to {}x{} pixel", width, height)
            }
            (DimensionWidthNotIncludedIn, Ctx::Span { min, max }) => {
                format!("width is not included between {} and {} pixel", min, max)
            }
            (DimensionHeightNotIncludedIn, Ctx::Span { min, max }) => {
                format!("height is not included between {} and {} pixel", min, max)
            }
            (DimensionWidthNotGreaterThanOrEqualTo, Ctx::Length { length }) => {
                format!("width must be greater than or equal to {} pixel", length)
            }
            (DimensionHeightNotGreaterThanOrEqualTo, Ctx::Length { length }) => {
                format!("height must be greater than or equal to {} pixel", length)
            }
            (DimensionWidthNotLessThanOrEqualTo, Ctx::Length { length }) => {
                format!("width must be less than or equal to {} pixel", length)
            }
            (DimensionHeightNotLessThanOrEqualTo, Ctx::Length { length }) => {
                format!("height must be less than or equal to {} pixel", length)
            }
            (DimensionWidthNotEqualTo, Ctx::Length { length }) => {
                format!("width must be equal to {} pixel", length)
            }
            (DimensionHeightNotEqualTo, Ctx::Length { length }) => {
                format!("height must be equal to {} pixel", length)
            }
            // Kind and context disagree; fall back to the bare key.
            (kind, _) => kind.key().to_string(),
        }
    }
}

/// A record's error collection. The host object owns one per validation run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationErrors {
    entries: Vec<ErrorEntry>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, entry: ErrorEntry) {
        self.entries.push(entry);
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> &[ErrorEntry] {
        &self.entries
    }

    /// Entries registered against one attribute, in registration order.
    pub fn on(&self, attribute: &str) -> Vec<&ErrorEntry> {
        self.entries.iter().filter(|e| e.attribute == attribute).collect()
    }
}

/// Attach a verdict to the record's error collection.
///
/// Valid verdicts add nothing. Never fails; the caller already holds a
/// legal record/attribute pair.
pub fn report(
    errors: &mut ValidationErrors,
    attribute: &str,
    verdict: &Verdict,
    file: Option<&FileRef>,
) {
    if let Verdict::Violation { kind, context } = verdict {
        errors.add(ErrorEntry {
            attribute: attribute.to_string(),
            kind: *kind,
            context: *context,
            file: file.cloned(),
        });
    }
}

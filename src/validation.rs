//! Constraint Evaluation - Verdicts over Extracted Dimensions
//!
//! Priority order is fixed: the metadata gate first, then global min/max
//! (which fully shadow per-axis options), then width and height in that
//! order. The global pass returns on the first violation; the axis pass
//! always checks both axes and keeps the last violation.

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;
use crate::metadata::FileMetadata;
use crate::options::{AxisConstraint, DimensionOptions, NormalizedDimensions};

/// The error kinds a verdict can carry. Variant names serialize to the
/// message keys a localization catalog resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    MediaMetadataMissing,
    DimensionMinNotIncludedIn,
    DimensionMaxNotIncludedIn,
    DimensionWidthNotIncludedIn,
    DimensionHeightNotIncludedIn,
    DimensionWidthNotGreaterThanOrEqualTo,
    DimensionHeightNotGreaterThanOrEqualTo,
    DimensionWidthNotLessThanOrEqualTo,
    DimensionHeightNotLessThanOrEqualTo,
    DimensionWidthNotEqualTo,
    DimensionHeightNotEqualTo,
}

impl ErrorKind {
    pub const ALL: [ErrorKind; 11] = [
        ErrorKind::MediaMetadataMissing,
        ErrorKind::DimensionMinNotIncludedIn,
        ErrorKind::DimensionMaxNotIncludedIn,
        ErrorKind::DimensionWidthNotIncludedIn,
        ErrorKind::DimensionHeightNotIncludedIn,
        ErrorKind::DimensionWidthNotGreaterThanOrEqualTo,
        ErrorKind::DimensionHeightNotGreaterThanOrEqualTo,
        ErrorKind::DimensionWidthNotLessThanOrEqualTo,
        ErrorKind::DimensionHeightNotLessThanOrEqualTo,
        ErrorKind::DimensionWidthNotEqualTo,
        ErrorKind::DimensionHeightNotEqualTo,
    ];

    /// Message key as looked up in a localization catalog.
    pub fn key(&self) -> &'static str {
        match self {
            Self::MediaMetadataMissing => "media_metadata_missing",
            Self::DimensionMinNotIncludedIn => "dimension_min_not_included_in",
            Self::DimensionMaxNotIncludedIn => "dimension_max_not_included_in",
            Self::DimensionWidthNotIncludedIn => "dimension_width_not_included_in",
            Self::DimensionHeightNotIncludedIn => "dimension_height_not_included_in",
            Self::DimensionWidthNotGreaterThanOrEqualTo => {
                "dimension_width_not_greater_than_or_equal_to"
            }
            Self::DimensionHeightNotGreaterThanOrEqualTo => {
                "dimension_height_not_greater_than_or_equal_to"
            }
            Self::DimensionWidthNotLessThanOrEqualTo => "dimension_width_not_less_than_or_equal_to",
            Self::DimensionHeightNotLessThanOrEqualTo => {
                "dimension_height_not_less_than_or_equal_to"
            }
            Self::DimensionWidthNotEqualTo => "dimension_width_not_equal_to",
            Self::DimensionHeightNotEqualTo => "dimension_height_not_equal_to",
        }
    }
}

/// Interpolation payload for one violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ViolationContext {
    /// Both global bounds. Reported even when only one axis failed.
    Pair { width: u32, height: u32 },
    /// Inclusive range on a single axis.
    Span { min: u32, max: u32 },
    /// A single bound or exact value.
    Length { length: u32 },
    /// No interpolation values (missing metadata).
    Empty {},
}

/// Outcome of validating one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum Verdict {
    Valid,
    Violation { kind: ErrorKind, context: ViolationContext },
}

impl Verdict {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    pub fn violation(&self) -> Option<(ErrorKind, ViolationContext)> {
        match self {
            Self::Valid => None,
            Self::Violation { kind, context } => Some((*kind, *context)),
        }
    }
}

/// Validates one file's extracted dimensions against the configured
/// constraints.
pub struct DimensionValidator<R> {
    options: DimensionOptions<R>,
}

impl<R> DimensionValidator<R> {
    /// Checks the configuration up front; malformed static options never
    /// reach a validation call.
    pub fn new(options: DimensionOptions<R>) -> Result<Self, ConfigError> {
        options.check_validity()?;
        Ok(Self { options })
    }

    pub fn options(&self) -> &DimensionOptions<R> {
        &self.options
    }

    /// Gate, normalize, evaluate.
    ///
    /// Options are re-resolved against the record on every call; a computed
    /// option with an illegal shape surfaces here as a `ConfigError`, never
    /// as a verdict.
    pub fn validate(&self, record: &R, metadata: &FileMetadata) -> Result<Verdict, ConfigError> {
        let Some((width, height)) = metadata.dimensions() else {
            return Ok(Verdict::Violation {
                kind: ErrorKind::MediaMetadataMissing,
                context: ViolationContext::Empty {},
            });
        };
        let normalized = self.options.normalize(record)?;
        Ok(evaluate(&normalized, width, height))
    }
}

/// Pure evaluation of normalized constraints against positive dimensions.
///
/// When a global min or max is present the per-axis constraints are not
/// consulted at all, even if configured.
pub fn evaluate(dims: &NormalizedDimensions, width: u32, height: u32) -> Verdict {
    if dims.min.is_some() || dims.max.is_some() {
        if let Some(min) = dims.min {
            if width < min.width || height < min.height {
                return Verdict::Violation {
                    kind: ErrorKind::DimensionMinNotIncludedIn,
                    context: ViolationContext::Pair { width: min.width, height: min.height },
                };
            }
        }
        if let Some(max) = dims.max {
            if width > max.width || height > max.height {
                return Verdict::Violation {
                    kind: ErrorKind::DimensionMaxNotIncludedIn,
                    context: ViolationContext::Pair { width: max.width, height: max.height },
                };
            }
        }
        return Verdict::Valid;
    }

    // Both axes are always checked; a height violation replaces a width
    // violation.
    let mut verdict = Verdict::Valid;
    for (axis, constraint, value) in [
        (Axis::Width, dims.width, width),
        (Axis::Height, dims.height, height),
    ] {
        let Some(constraint) = constraint else { continue };
        if let Some(found) = check_axis(axis, constraint, value) {
            verdict = found;
        }
    }
    verdict
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    Width,
    Height,
}

fn check_axis(axis: Axis, constraint: AxisConstraint, value: u32) -> Option<Verdict> {
    use ErrorKind::*;

    let violation = |kind, context| Some(Verdict::Violation { kind, context });

    match constraint {
        AxisConstraint::Range { min, max } if value < min || value > max => violation(
            match axis {
                Axis::Width => DimensionWidthNotIncludedIn,
                Axis::Height => DimensionHeightNotIncludedIn,
            },
            ViolationContext::Span { min, max },
        ),
        AxisConstraint::Bounds { min: Some(min), .. } if value < min => violation(
            match axis {
                Axis::Width => DimensionWidthNotGreaterThanOrEqualTo,
                Axis::Height => DimensionHeightNotGreaterThanOrEqualTo,
            },
            ViolationContext::Length { length: min },
        ),
        AxisConstraint::Bounds { max: Some(max), .. } if value > max => violation(
            match axis {
                Axis::Width => DimensionWidthNotLessThanOrEqualTo,
                Axis::Height => DimensionHeightNotLessThanOrEqualTo,
            },
            ViolationContext::Length { length: max },
        ),
        AxisConstraint::Exact(exact) if value != exact => violation(
            match axis {
                Axis::Width => DimensionWidthNotEqualTo,
                Axis::Height => DimensionHeightNotEqualTo,
            },
            ViolationContext::Length { length: exact },
        ),
        _ => None,
    }
}

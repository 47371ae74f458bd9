//! Dimension Options - Declarative Constraints
//!
//! Raw options are flattened into a canonical form once per validation call.
//! Options may be computed from the record, so the canonical form is never
//! cached across calls.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::errors::ConfigError;

#[cfg(feature = "test-hooks")]
use std::sync::atomic::{AtomicU32, Ordering};

#[cfg(feature = "test-hooks")]
static NORMALIZE_CALL_COUNT: AtomicU32 = AtomicU32::new(0);

#[cfg(feature = "test-hooks")]
pub fn get_normalize_call_count() -> u32 {
    NORMALIZE_CALL_COUNT.load(Ordering::SeqCst)
}

#[cfg(feature = "test-hooks")]
pub fn reset_normalize_call_count() {
    NORMALIZE_CALL_COUNT.store(0, Ordering::SeqCst);
}

/// A single dimension constraint as written in configuration.
///
/// Accepts three JSON shapes: a bare number (`120`), a range
/// (`{"in": [300, 600]}`), or independent bounds (`{"min": 300, "max": 1200}`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DimensionSpec {
    /// The dimension must equal this value exactly.
    Exact(u32),
    /// Inclusive range over one axis, or `width..height` for min/max.
    Range {
        #[serde(rename = "in")]
        range: (u32, u32),
    },
    /// Independent lower/upper bounds, either may be absent.
    Bounds {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<u32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<u32>,
    },
}

impl DimensionSpec {
    pub fn exact(value: u32) -> Self {
        Self::Exact(value)
    }

    pub fn range(low: u32, high: u32) -> Self {
        Self::Range { range: (low, high) }
    }

    pub fn min(value: u32) -> Self {
        Self::Bounds { min: Some(value), max: None }
    }

    pub fn max(value: u32) -> Self {
        Self::Bounds { min: None, max: Some(value) }
    }

    pub fn bounds(min: u32, max: u32) -> Self {
        Self::Bounds { min: Some(min), max: Some(max) }
    }
}

/// One option slot: a static spec, or one computed from the record.
///
/// Computed specs are re-evaluated on every validation call so per-record
/// limits stay current.
pub enum OptionValue<R> {
    Static(DimensionSpec),
    Computed(Arc<dyn Fn(&R) -> DimensionSpec + Send + Sync>),
}

impl<R> OptionValue<R> {
    fn resolve(&self, record: &R) -> DimensionSpec {
        match self {
            Self::Static(spec) => *spec,
            Self::Computed(f) => f(record),
        }
    }
}

impl<R> Clone for OptionValue<R> {
    fn clone(&self) -> Self {
        match self {
            Self::Static(spec) => Self::Static(*spec),
            Self::Computed(f) => Self::Computed(Arc::clone(f)),
        }
    }
}

impl<R> fmt::Debug for OptionValue<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static(spec) => f.debug_tuple("Static").field(spec).finish(),
            Self::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

impl<R> From<DimensionSpec> for OptionValue<R> {
    fn from(spec: DimensionSpec) -> Self {
        Self::Static(spec)
    }
}

/// Raw validator configuration: the four recognized option slots.
///
/// `min` and `max` apply to both axes at once and must be ranges
/// (`width..height`); they shadow `width`/`height` entirely when present.
#[derive(Debug)]
pub struct DimensionOptions<R> {
    pub width: Option<OptionValue<R>>,
    pub height: Option<OptionValue<R>>,
    pub min: Option<OptionValue<R>>,
    pub max: Option<OptionValue<R>>,
}

impl<R> Clone for DimensionOptions<R> {
    fn clone(&self) -> Self {
        Self {
            width: self.width.clone(),
            height: self.height.clone(),
            min: self.min.clone(),
            max: self.max.clone(),
        }
    }
}

impl<R> Default for DimensionOptions<R> {
    fn default() -> Self {
        Self { width: None, height: None, min: None, max: None }
    }
}

impl<R> DimensionOptions<R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn width(mut self, spec: DimensionSpec) -> Self {
        self.width = Some(spec.into());
        self
    }

    pub fn height(mut self, spec: DimensionSpec) -> Self {
        self.height = Some(spec.into());
        self
    }

    pub fn min(mut self, spec: DimensionSpec) -> Self {
        self.min = Some(spec.into());
        self
    }

    pub fn max(mut self, spec: DimensionSpec) -> Self {
        self.max = Some(spec.into());
        self
    }

    pub fn width_with(mut self, f: impl Fn(&R) -> DimensionSpec + Send + Sync + 'static) -> Self {
        self.width = Some(OptionValue::Computed(Arc::new(f)));
        self
    }

    pub fn height_with(mut self, f: impl Fn(&R) -> DimensionSpec + Send + Sync + 'static) -> Self {
        self.height = Some(OptionValue::Computed(Arc::new(f)));
        self
    }

    pub fn min_with(mut self, f: impl Fn(&R) -> DimensionSpec + Send + Sync + 'static) -> Self {
        self.min = Some(OptionValue::Computed(Arc::new(f)));
        self
    }

    pub fn max_with(mut self, f: impl Fn(&R) -> DimensionSpec + Send + Sync + 'static) -> Self {
        self.max = Some(OptionValue::Computed(Arc::new(f)));
        self
    }

    /// Setup-time configuration check.
    ///
    /// At least one option slot must be filled, and every static value must
    /// have a legal shape. Computed values can only be checked once a record
    /// is available, so their shapes are verified per call in `normalize`.
    pub fn check_validity(&self) -> Result<(), ConfigError> {
        if self.width.is_none() && self.height.is_none() && self.min.is_none() && self.max.is_none()
        {
            return Err(ConfigError::NoOptions);
        }

        for (option, value) in [("width", &self.width), ("height", &self.height)] {
            if let Some(OptionValue::Static(spec)) = value {
                axis_constraint(option, *spec)?;
            }
        }
        for (option, value) in [("min", &self.min), ("max", &self.max)] {
            if let Some(OptionValue::Static(spec)) = value {
                pair_bound(option, *spec)?;
            }
        }

        Ok(())
    }

    /// Flatten the raw options into their canonical form for this record.
    ///
    /// Computed slots are resolved against the record here, every call.
    pub fn normalize(&self, record: &R) -> Result<NormalizedDimensions, ConfigError> {
        #[cfg(feature = "test-hooks")]
        NORMALIZE_CALL_COUNT.fetch_add(1, Ordering::SeqCst);

        Ok(NormalizedDimensions {
            width: self
                .width
                .as_ref()
                .map(|v| axis_constraint("width", v.resolve(record)))
                .transpose()?,
            height: self
                .height
                .as_ref()
                .map(|v| axis_constraint("height", v.resolve(record)))
                .transpose()?,
            min: self
                .min
                .as_ref()
                .map(|v| pair_bound("min", v.resolve(record)))
                .transpose()?,
            max: self
                .max
                .as_ref()
                .map(|v| pair_bound("max", v.resolve(record)))
                .transpose()?,
        })
    }
}

/// Canonical per-axis constraint.
///
/// `Range` stays distinct from `Bounds` with both ends set: the two came
/// from different option shapes and report different violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisConstraint {
    Exact(u32),
    Range { min: u32, max: u32 },
    Bounds { min: Option<u32>, max: Option<u32> },
}

/// A global bound applied to both axes, expanded from `min`/`max` range
/// sugar: the first end binds width, the last binds height.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairBound {
    pub width: u32,
    pub height: u32,
}

/// Output of normalization, the only form the evaluator consumes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizedDimensions {
    pub width: Option<AxisConstraint>,
    pub height: Option<AxisConstraint>,
    pub min: Option<PairBound>,
    pub max: Option<PairBound>,
}

fn axis_constraint(option: &'static str, spec: DimensionSpec) -> Result<AxisConstraint, ConfigError> {
    match spec {
        DimensionSpec::Exact(value) => Ok(AxisConstraint::Exact(value)),
        DimensionSpec::Range { range: (low, high) } => Ok(AxisConstraint::Range { min: low, max: high }),
        DimensionSpec::Bounds { min: None, max: None } => Err(ConfigError::EmptyBounds { option }),
        DimensionSpec::Bounds { min, max } => Ok(AxisConstraint::Bounds { min, max }),
    }
}

fn pair_bound(option: &'static str, spec: DimensionSpec) -> Result<PairBound, ConfigError> {
    match spec {
        DimensionSpec::Range { range: (first, last) } => Ok(PairBound { width: first, height: last }),
        _ => Err(ConfigError::NotARange { option }),
    }
}

/// Wire form of the options, as accepted by the CLI bridge.
///
/// Computed options have no wire representation; bridge callers always send
/// static specs.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawDimensionOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<DimensionSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<DimensionSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<DimensionSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<DimensionSpec>,
}

impl<R> From<RawDimensionOptions> for DimensionOptions<R> {
    fn from(raw: RawDimensionOptions) -> Self {
        Self {
            width: raw.width.map(Into::into),
            height: raw.height.map(Into::into),
            min: raw.min.map(Into::into),
            max: raw.max.map(Into::into),
        }
    }
}

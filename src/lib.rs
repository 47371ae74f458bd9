//! MediaGuard Core - Attachment Dimension Validation
//!
//! # The Guarantees (Non-Negotiable)
//! 1. The Metadata Gate Runs First
//! 2. Global Min/Max Shadow Axis Options
//! 3. Axes Check Width Then Height, Last Violation Wins
//! 4. Options Re-Resolve Against The Record Every Call
//! 5. Evaluation Is Pure, Error Registration Is The Only Side Effect
//! 6. Bad Configuration Fails At Setup, Never As A Verdict

pub mod errors;
pub mod metadata;
pub mod options;
pub mod pipeline;
pub mod validation;

pub use errors::{report, ConfigError, ErrorEntry, ValidationErrors};
pub use metadata::{AttachmentResolver, FileMetadata, FileRef, MetadataProvider};
pub use options::{
    AxisConstraint, DimensionOptions, DimensionSpec, NormalizedDimensions, OptionValue, PairBound,
    RawDimensionOptions,
};
pub use pipeline::{MemoryStore, ValidationPipeline};
pub use validation::{evaluate, DimensionValidator, ErrorKind, Verdict, ViolationContext};

pub const VALIDATOR_VERSION: &str = env!("CARGO_PKG_VERSION");

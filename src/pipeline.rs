//! Validation Pipeline - Single Entry Point
//!
//! Every file attached to an attribute is validated independently and
//! reported with its file identity, so a rendered message can say which
//! attachment failed.

use crate::errors::{report, ConfigError, ValidationErrors};
use crate::metadata::{AttachmentResolver, FileMetadata, FileRef, MetadataProvider};
use crate::options::DimensionOptions;
use crate::validation::{DimensionValidator, Verdict};

/// Runs the dimension validator over every attachment of one attribute.
pub struct ValidationPipeline<R> {
    attribute: String,
    validator: DimensionValidator<R>,
}

impl<R> ValidationPipeline<R> {
    /// Configuration is checked here, before any record is seen.
    pub fn new(
        attribute: impl Into<String>,
        options: DimensionOptions<R>,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            attribute: attribute.into(),
            validator: DimensionValidator::new(options)?,
        })
    }

    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    pub fn validator(&self) -> &DimensionValidator<R> {
        &self.validator
    }

    /// Validate every file attached to the attribute.
    ///
    /// Returns whether the attribute passed; violations land in `errors`,
    /// one entry per failing file. An attribute with no attachments passes
    /// here: presence is a separate validator's concern.
    pub fn run(
        &self,
        record: &R,
        resolver: &dyn AttachmentResolver<R>,
        provider: &dyn MetadataProvider,
        errors: &mut ValidationErrors,
    ) -> Result<bool, ConfigError> {
        let mut valid = true;
        for file in resolver.attachments_for(record, &self.attribute) {
            let metadata = provider.metadata_for(&file);
            let verdict = self.validator.validate(record, &metadata)?;
            if !verdict.is_valid() {
                valid = false;
                report(errors, &self.attribute, &verdict, Some(&file));
            }
        }
        Ok(valid)
    }

    /// Validate a single already-resolved file and report its verdict.
    pub fn run_one(
        &self,
        record: &R,
        file: &FileRef,
        metadata: &FileMetadata,
        errors: &mut ValidationErrors,
    ) -> Result<Verdict, ConfigError> {
        let verdict = self.validator.validate(record, metadata)?;
        report(errors, &self.attribute, &verdict, Some(file));
        Ok(verdict)
    }
}

/// In-memory attachment store, used by the CLI bridge and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    files: Vec<(String, FileRef, FileMetadata)>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attach(&mut self, attribute: impl Into<String>, file: FileRef, metadata: FileMetadata) {
        self.files.push((attribute.into(), file, metadata));
    }
}

impl<R> AttachmentResolver<R> for MemoryStore {
    fn attachments_for(&self, _record: &R, attribute: &str) -> Vec<FileRef> {
        self.files
            .iter()
            .filter(|(a, _, _)| a == attribute)
            .map(|(_, f, _)| f.clone())
            .collect()
    }
}

impl MetadataProvider for MemoryStore {
    fn metadata_for(&self, file: &FileRef) -> FileMetadata {
        self.files
            .iter()
            .find(|(_, f, _)| f.id == file.id)
            .map(|(_, _, m)| *m)
            .unwrap_or_default()
    }
}

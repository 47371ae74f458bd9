//! Contract Invariant Tests
//!
//! These tests verify the non-negotiable guarantees.

use mediaguard_core::{
    errors::{report, ConfigError, ValidationErrors},
    metadata::{FileMetadata, FileRef},
    options::{DimensionOptions, DimensionSpec},
    pipeline::{MemoryStore, ValidationPipeline},
    validation::{DimensionValidator, ErrorKind, Verdict, ViolationContext},
};

fn validator(options: DimensionOptions<()>) -> DimensionValidator<()> {
    DimensionValidator::new(options).expect("valid configuration")
}

fn verdict_for(options: DimensionOptions<()>, width: u32, height: u32) -> Verdict {
    validator(options)
        .validate(&(), &FileMetadata::new(width, height))
        .expect("no config error")
}

#[test]
fn invariant_gate_dominates_every_configuration() {
    let configs: Vec<fn() -> DimensionOptions<()>> = vec![
        || DimensionOptions::new().width(DimensionSpec::exact(100)),
        || DimensionOptions::new().height(DimensionSpec::range(10, 20)),
        || DimensionOptions::new().min(DimensionSpec::range(1, 1)),
        || DimensionOptions::new().max(DimensionSpec::range(9999, 9999)),
    ];

    for config in configs {
        for metadata in [
            FileMetadata::default(),
            FileMetadata::new(0, 100),
            FileMetadata::new(100, 0),
            FileMetadata { width: None, height: Some(100) },
        ] {
            let verdict = validator(config()).validate(&(), &metadata).unwrap();
            assert_eq!(
                verdict.violation().map(|(kind, _)| kind),
                Some(ErrorKind::MediaMetadataMissing),
            );
        }
    }
}

#[test]
fn invariant_global_min_shadows_axis_options() {
    // width alone would reject 500x500; with min present it is never consulted
    let options = DimensionOptions::new()
        .width(DimensionSpec::exact(100))
        .min(DimensionSpec::range(100, 100));

    assert!(verdict_for(options.clone(), 500, 500).is_valid());

    let verdict = verdict_for(options, 50, 500);
    assert_eq!(
        verdict.violation(),
        Some((
            ErrorKind::DimensionMinNotIncludedIn,
            ViolationContext::Pair { width: 100, height: 100 },
        ))
    );
}

#[test]
fn invariant_global_min_scenario() {
    // min 100..100 against 50x200 reports both bounds
    let options = DimensionOptions::new().min(DimensionSpec::range(100, 100));
    let verdict = verdict_for(options, 50, 200);
    assert_eq!(
        verdict.violation(),
        Some((
            ErrorKind::DimensionMinNotIncludedIn,
            ViolationContext::Pair { width: 100, height: 100 },
        ))
    );
}

#[test]
fn invariant_width_range_scenario() {
    let options = DimensionOptions::new().width(DimensionSpec::range(10, 20));
    let verdict = verdict_for(options, 25, 1);
    assert_eq!(
        verdict.violation(),
        Some((
            ErrorKind::DimensionWidthNotIncludedIn,
            ViolationContext::Span { min: 10, max: 20 },
        ))
    );
}

#[test]
fn invariant_height_exact_scenario() {
    let options = DimensionOptions::new().height(DimensionSpec::exact(50));
    let verdict = verdict_for(options, 1, 40);
    assert_eq!(
        verdict.violation(),
        Some((
            ErrorKind::DimensionHeightNotEqualTo,
            ViolationContext::Length { length: 50 },
        ))
    );
}

#[test]
fn invariant_height_violation_reported_on_dual_failure() {
    let options = DimensionOptions::new()
        .width(DimensionSpec::exact(5))
        .height(DimensionSpec::exact(5));

    let verdict = verdict_for(options, 100, 100);
    assert_eq!(
        verdict.violation().map(|(kind, _)| kind),
        Some(ErrorKind::DimensionHeightNotEqualTo),
    );
}

#[test]
fn invariant_range_and_bounds_agree_on_validity() {
    // Same limits as range sugar and as explicit bounds: identical pass/fail
    // for all inputs, even though the reported kinds differ by provenance.
    for (width, height) in [(5, 15), (10, 15), (15, 15), (20, 15), (25, 15), (15, 30)] {
        let range = DimensionOptions::new()
            .width(DimensionSpec::range(10, 20))
            .height(DimensionSpec::range(10, 20));
        let bounds = DimensionOptions::new()
            .width(DimensionSpec::bounds(10, 20))
            .height(DimensionSpec::bounds(10, 20));

        assert_eq!(
            verdict_for(range, width, height).is_valid(),
            verdict_for(bounds, width, height).is_valid(),
            "diverged at {}x{}",
            width,
            height,
        );
    }
}

#[test]
fn invariant_validation_is_idempotent() {
    let options = DimensionOptions::new().width(DimensionSpec::range(10, 20));
    let v = validator(options);
    let metadata = FileMetadata::new(25, 1);

    let first = v.validate(&(), &metadata).unwrap();
    let second = v.validate(&(), &metadata).unwrap();
    assert_eq!(first, second);
}

#[test]
fn invariant_no_options_rejected_at_setup() {
    let result = DimensionValidator::new(DimensionOptions::<()>::new());
    assert!(matches!(result, Err(ConfigError::NoOptions)));
}

#[test]
fn invariant_global_option_must_be_a_range() {
    let result =
        DimensionValidator::new(DimensionOptions::<()>::new().max(DimensionSpec::exact(100)));
    assert!(matches!(result, Err(ConfigError::NotARange { option: "max" })));
}

#[test]
fn invariant_computed_options_follow_the_record() {
    struct Record {
        plan_limit: u32,
    }

    let options = DimensionOptions::<Record>::new()
        .max_with(|r| DimensionSpec::range(r.plan_limit, r.plan_limit));
    let v = DimensionValidator::new(options).unwrap();
    let metadata = FileMetadata::new(1500, 1500);

    let free = v.validate(&Record { plan_limit: 1000 }, &metadata).unwrap();
    let pro = v.validate(&Record { plan_limit: 4000 }, &metadata).unwrap();

    assert_eq!(
        free.violation(),
        Some((
            ErrorKind::DimensionMaxNotIncludedIn,
            ViolationContext::Pair { width: 1000, height: 1000 },
        ))
    );
    assert!(pro.is_valid());
}

#[test]
fn invariant_pipeline_reports_per_file() {
    let mut store = MemoryStore::new();
    let first = FileRef::named("first.png");
    let second = FileRef::named("second.png");
    let third = FileRef::named("third.png");
    store.attach("gallery", first.clone(), FileMetadata::new(40, 120));
    store.attach("gallery", second, FileMetadata::new(100, 120));
    store.attach("gallery", third.clone(), FileMetadata::default());

    let pipeline = ValidationPipeline::new(
        "gallery",
        DimensionOptions::<()>::new().min(DimensionSpec::range(50, 50)),
    )
    .unwrap();

    let mut errors = ValidationErrors::new();
    let valid = pipeline.run(&(), &store, &store, &mut errors).unwrap();

    assert!(!valid);
    let entries = errors.on("gallery");
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].kind, ErrorKind::DimensionMinNotIncludedIn);
    assert_eq!(entries[0].file.as_ref().map(|f| f.id), Some(first.id));
    assert_eq!(entries[1].kind, ErrorKind::MediaMetadataMissing);
    assert_eq!(entries[1].file.as_ref().map(|f| f.id), Some(third.id));
}

#[test]
fn invariant_verdict_serializes_message_keys() {
    let verdict = verdict_for(DimensionOptions::new().width(DimensionSpec::range(10, 20)), 25, 1);
    let json = serde_json::to_value(&verdict).unwrap();

    assert_eq!(json["verdict"], "violation");
    assert_eq!(json["kind"], "dimension_width_not_included_in");
    assert_eq!(json["context"]["min"], 10);
    assert_eq!(json["context"]["max"], 20);

    let valid = serde_json::to_value(Verdict::Valid).unwrap();
    assert_eq!(valid["verdict"], "valid");
}

#[test]
fn invariant_report_carries_file_identity() {
    let options = DimensionOptions::new().height(DimensionSpec::exact(50));
    let verdict = verdict_for(options, 1, 40);

    let file = FileRef::named("banner.jpg");
    let mut errors = ValidationErrors::new();
    report(&mut errors, "banner", &verdict, Some(&file));

    let entry = &errors.entries()[0];
    assert_eq!(entry.attribute, "banner");
    assert_eq!(entry.file.as_ref().map(|f| f.id), Some(file.id));
    assert_eq!(entry.message(), "height must be equal to 50 pixel");
}

#[cfg(feature = "test-hooks")]
#[test]
fn invariant_options_resolved_on_every_call() {
    use mediaguard_core::options::{get_normalize_call_count, reset_normalize_call_count};

    reset_normalize_call_count();

    let v = validator(DimensionOptions::new().width(DimensionSpec::exact(100)));
    let metadata = FileMetadata::new(100, 100);
    v.validate(&(), &metadata).unwrap();
    v.validate(&(), &metadata).unwrap();

    assert_eq!(get_normalize_call_count(), 2);
}

//! MediaGuard CLI - Bridge interface for host frameworks
//!
//! Commands: check, validate, kinds
//! Outputs JSON to stdout
//! Returns non-zero on validation failure

use clap::{Parser, Subcommand};
use std::process::ExitCode;

use mediaguard_core::{
    errors::{report, ValidationErrors},
    metadata::FileMetadata,
    options::{DimensionOptions, RawDimensionOptions},
    validation::{DimensionValidator, ErrorKind},
};

#[derive(Parser)]
#[command(name = "mediaguard-cli")]
#[command(about = "MediaGuard CLI - Attachment Dimension Validation")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check an options payload without validating any file
    Check {
        /// JSON payload (RawDimensionOptions)
        #[arg(short, long)]
        options: String,
    },

    /// Validate one file's metadata against an options payload
    Validate {
        /// JSON payload (RawDimensionOptions)
        #[arg(short, long)]
        options: String,

        /// JSON payload (FileMetadata)
        #[arg(short, long)]
        metadata: String,

        /// Attribute name used in reported errors
        #[arg(short, long, default_value = "file")]
        attribute: String,
    },

    /// List the error kinds a verdict can carry
    Kinds,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check { options } => {
            let raw: RawDimensionOptions = match serde_json::from_str(&options) {
                Ok(r) => r,
                Err(e) => {
                    println!(r#"{{"ok": false, "error": "Invalid payload: {}"}}"#, e);
                    return ExitCode::FAILURE;
                }
            };

            match DimensionValidator::new(DimensionOptions::<()>::from(raw)) {
                Ok(_) => {
                    println!(r#"{{"ok": true}}"#);
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    let output = serde_json::json!({
                        "ok": false,
                        "error": e.to_string(),
                    });
                    println!("{}", serde_json::to_string(&output).unwrap());
                    ExitCode::from(2)
                }
            }
        }

        Commands::Validate { options, metadata, attribute } => {
            let raw: RawDimensionOptions = match serde_json::from_str(&options) {
                Ok(r) => r,
                Err(e) => {
                    println!(r#"{{"valid": false, "error": "Invalid options: {}"}}"#, e);
                    return ExitCode::FAILURE;
                }
            };
            let metadata: FileMetadata = match serde_json::from_str(&metadata) {
                Ok(m) => m,
                Err(e) => {
                    println!(r#"{{"valid": false, "error": "Invalid metadata: {}"}}"#, e);
                    return ExitCode::FAILURE;
                }
            };

            let validator = match DimensionValidator::new(DimensionOptions::<()>::from(raw)) {
                Ok(v) => v,
                Err(e) => {
                    let output = serde_json::json!({
                        "valid": false,
                        "error": e.to_string(),
                    });
                    println!("{}", serde_json::to_string(&output).unwrap());
                    return ExitCode::FAILURE;
                }
            };

            match validator.validate(&(), &metadata) {
                Ok(verdict) => {
                    let mut errors = ValidationErrors::new();
                    report(&mut errors, &attribute, &verdict, None);

                    let messages: Vec<_> = errors
                        .entries()
                        .iter()
                        .map(|e| {
                            serde_json::json!({
                                "attribute": e.attribute,
                                "kind": e.kind,
                                "context": e.context,
                                "message": e.message(),
                            })
                        })
                        .collect();

                    let output = serde_json::json!({
                        "valid": verdict.is_valid(),
                        "verdict": verdict,
                        "errors": messages,
                    });
                    println!("{}", serde_json::to_string_pretty(&output).unwrap());

                    if verdict.is_valid() {
                        ExitCode::SUCCESS
                    } else {
                        ExitCode::from(2) // Validation failure
                    }
                }
                Err(e) => {
                    let output = serde_json::json!({
                        "valid": false,
                        "error": e.to_string(),
                    });
                    println!("{}", serde_json::to_string(&output).unwrap());
                    ExitCode::FAILURE
                }
            }
        }

        Commands::Kinds => {
            let keys: Vec<_> = ErrorKind::ALL.iter().map(|k| k.key()).collect();
            println!("{}", serde_json::to_string_pretty(&keys).unwrap());
            ExitCode::SUCCESS
        }
    }
}

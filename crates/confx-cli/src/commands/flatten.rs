//! Flatten command
//!
//! Usage: confx flatten --input <FILE> --errors <FILE> [--schema <FILE>] [--producer <ID>]

use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use confx_core::schema::builtin::gateway_registry;
use confx_core::{
    declarative_config_flattened, ErrorFactory, RawErrorNode, RelationshipIndex,
    StaticSchemaRegistry,
};
use confx_core::{log_op_end, log_op_start};

use super::load_document;

#[derive(Debug, Args)]
pub struct FlattenArgs {
    /// Declarative configuration document (JSON or YAML)
    #[arg(long)]
    pub input: PathBuf,

    /// Validator error tree for the document (JSON or YAML)
    #[arg(long)]
    pub errors: PathBuf,

    /// Schema registry file (default: built-in gateway schema)
    #[arg(long)]
    pub schema: Option<PathBuf>,

    /// Producer id carried on the error
    #[arg(long)]
    pub producer: Option<String>,

    /// Output file path (default: stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Execute flatten command
///
/// Returns whether the error tree held any errors.
pub fn execute(args: FlattenArgs) -> Result<bool, Box<dyn std::error::Error>> {
    log_op_start!("cli_flatten");
    let started = Instant::now();

    let input = load_document(&args.input)?;
    let errors = load_document(&args.errors)?;

    let registry = match &args.schema {
        Some(path) => serde_json::from_value::<StaticSchemaRegistry>(load_document(path)?)
            .map_err(|e| format!("invalid schema in {}: {}", path.display(), e))?,
        None => gateway_registry(),
    };
    let index = RelationshipIndex::build(&registry);

    let factory = ErrorFactory::new(args.producer);
    let err = declarative_config_flattened(&factory, &index, &errors, &input)?;
    let body = serde_json::to_string_pretty(&err)?;

    if let Some(output_path) = args.output {
        std::fs::write(&output_path, format!("{}\n", body))?;
        println!("✓ Written to {}", output_path.display());
    } else {
        println!("{}", body);
    }

    log_op_end!(
        "cli_flatten",
        duration_ms = started.elapsed().as_millis() as u64,
        record_count = err.flattened_errors().map_or(0, <[_]>::len) as u64
    );
    Ok(!RawErrorNode::from_value(&errors).is_empty())
}

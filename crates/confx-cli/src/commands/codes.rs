//! Codes command
//!
//! Usage: confx codes [--json]

use clap::Args;
use confx_core::ErrorCode;
use serde_json::json;

#[derive(Debug, Args)]
pub struct CodesArgs {
    /// Print the catalog as a JSON array
    #[arg(long)]
    pub json: bool,
}

/// Execute codes command
pub fn execute(args: CodesArgs) -> Result<(), Box<dyn std::error::Error>> {
    if args.json {
        let table: Vec<_> = ErrorCode::ALL
            .iter()
            .map(|code| {
                json!({
                    "code": code.code(),
                    "constant": code.constant(),
                    "name": code.name(),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&table)?);
        return Ok(());
    }

    for code in ErrorCode::ALL {
        println!("{:>2}  {:<24}  {}", code.code(), code.constant(), code.name());
    }
    Ok(())
}

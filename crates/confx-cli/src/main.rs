//! confx CLI
//!
//! Command-line front end for correlating declarative configuration errors

use clap::{Parser, Subcommand};
use confx_core::logging_facility::{self, Profile};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "confx")]
#[command(about = "confx - Declarative configuration error correlation", long_about = None)]
struct Cli {
    /// Log profile (development or production); logging is off when absent
    #[arg(long, global = true)]
    log_profile: Option<Profile>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Flatten a validator error tree against its document
    Flatten(commands::flatten::FlattenArgs),
    /// List the error catalog
    Codes(commands::codes::CodesArgs),
}

fn main() {
    let cli = Cli::parse();

    if let Some(profile) = cli.log_profile {
        logging_facility::init(profile);
    }

    let result = match cli.command {
        Commands::Flatten(args) => commands::flatten::execute(args),
        Commands::Codes(args) => commands::codes::execute(args).map(|()| false),
    };

    match result {
        Ok(false) => {}
        Ok(true) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    }
}

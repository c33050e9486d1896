use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::api::AdsClient;
use crate::load_config::load_config;
use crate::transfer::transfer;

/// CLI for biblib-copy: duplicate an ADS library's contents into another library.
#[derive(Parser)]
#[clap(
    name = "biblib-copy",
    version,
    about = "Copy the bibcodes of one ADS library into another library"
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Copy the configured source library into the target library
    Copy {
        /// Path to the YAML config file
        #[clap(long)]
        config: PathBuf,
    },
}

/// Extracted async CLI logic entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Copy { config } => {
            let config = load_config(config)?;
            let client = AdsClient::new(&config)?;
            println!("Copy starting...");
            match transfer(&client, &config).await {
                Ok(report) => {
                    println!("Copy complete.");
                    println!("{}", report.render());
                    Ok(())
                }
                Err(e) => {
                    eprintln!("[ERROR] Copy failed: {e}");
                    Err(e.into())
                }
            }
        }
    }
}

use std::path::PathBuf;
use std::process;

use anyhow::Result;
use clap::Parser;

use crate::logging::{ColorChoice, Logger};
use crate::pipeline::{self, ConvertConfig};

#[derive(Parser)]
#[command(name = "tg2md")]
#[command(version)]
#[command(about = "Convert a Telegram chat export to monthly Markdown files", long_about = None)]
pub struct Cli {
    /// Chat export JSON file (result.json)
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Directory to create the chat folder in
    #[arg(value_name = "OUTPUT_DIR", default_value = ".")]
    pub output_dir: PathBuf,

    /// Only print warnings and errors
    #[arg(short, long)]
    pub quiet: bool,

    /// When to color console output
    #[arg(long, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,
}

impl From<Cli> for ConvertConfig {
    fn from(cli: Cli) -> Self {
        ConvertConfig {
            input: cli.input,
            output_root: cli.output_dir,
            quiet: cli.quiet,
            color: cli.color,
        }
    }
}

/// Parse arguments and run one conversion, exiting with status 1 on a fatal error
pub fn run() -> Result<()> {
    let config = ConvertConfig::from(Cli::parse());
    if let Err(e) = pipeline::run(&config) {
        Logger::new(config.color, config.quiet).error(format!("{:#}", e));
        process::exit(1);
    }
    Ok(())
}

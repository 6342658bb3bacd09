use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Default, Parser)]
#[command(name = "lucid-indent")]
#[command(version = "0.1.0")]
#[command(about = "Structural indent engine for Lucid HDL sources")]
pub struct CliArgs {
    /// Lucid source file to analyze
    pub file: Option<PathBuf>,

    /// TOML file with indent widths
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,
}

impl CliArgs {
    /// Check if the provided path exists (following symlinks)
    pub fn exists(&self) -> bool {
        if let Some(path) = &self.file {
            std::fs::metadata(path).is_ok()
        } else {
            false
        }
    }
}

pub fn parse_args() -> Result<CliArgs, Box<dyn std::error::Error>> {
    Ok(CliArgs::parse())
}

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about = "Compare column headers across tabular files", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Compare the headers of every pair of CSV/Excel files in a directory
    Compare(CompareArgs),
    /// Profile a single file's column types and write a sample extract
    Profile(ProfileArgs),
}

#[derive(Debug, Args)]
pub struct CompareArgs {
    /// Directory to scan for CSV/Excel files
    #[arg(short = 'd', long = "directory", default_value = ".")]
    pub directory: PathBuf,
    /// Directory for the comparison report (created on demand)
    #[arg(short = 'o', long = "output-dir", default_value = ".")]
    pub output_dir: PathBuf,
    /// Do not write per-file type/sample artifacts while reading headers
    #[arg(long = "skip-profile")]
    pub skip_profile: bool,
}

#[derive(Debug, Args)]
pub struct ProfileArgs {
    /// Input CSV or Excel file to profile
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Number of rows to inspect when inferring types
    #[arg(long = "sample-rows", default_value_t = 1000)]
    pub sample_rows: usize,
    /// Maximum number of rows in the sample extract
    #[arg(long = "sample-size", default_value_t = 100)]
    pub sample_size: usize,
}

pub mod cli;
pub mod diff;
pub mod discover;
pub mod header;
pub mod matching;
pub mod normalize;
pub mod profile;
pub mod reader;
pub mod report;

use std::{env, path::Path, sync::OnceLock};

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, LevelFilter};

use crate::cli::{Cli, Commands, CompareArgs, ProfileArgs};
use crate::diff::FileHeaderSource;
use crate::profile::ProfileOptions;

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("header_diff", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Compare(args) => handle_compare(&args),
        Commands::Profile(args) => handle_profile(&args),
    }
}

fn handle_compare(args: &CompareArgs) -> Result<()> {
    info!("Scanning '{}' for tabular files", args.directory.display());
    let files = discover::find_tabular_files(&args.directory);
    if files.is_empty() {
        info!(
            "No tabular files found under '{}', nothing to compare",
            args.directory.display()
        );
        return Ok(());
    }
    info!("Comparing headers across {} file(s)", files.len());

    let mut source = FileHeaderSource::new(!args.skip_profile);
    let rows = diff::diff_all(&files, &mut source);

    let dir_label = directory_label(&args.directory)?;
    let report_path = report::write_report(&rows, &dir_label, &args.output_dir)
        .with_context(|| format!("Writing report under {:?}", args.output_dir))?;
    info!(
        "Comparison report with {} row(s) written to {:?}",
        rows.len(),
        report_path
    );
    Ok(())
}

fn handle_profile(args: &ProfileArgs) -> Result<()> {
    info!("Profiling '{}'", args.input.display());
    let options = ProfileOptions {
        sample_rows: args.sample_rows,
        sample_size: args.sample_size,
        ..ProfileOptions::default()
    };
    let profile_report = profile::profile_file(&args.input, &options)
        .with_context(|| format!("Profiling {:?}", args.input))?;
    info!(
        "Type report for {} column(s) written to {:?}, sample to {:?}",
        profile_report.column_types.len(),
        profile_report.info_path,
        profile_report.sample_path
    );
    Ok(())
}

/// Report files are named after the analyzed directory's basename.
fn directory_label(directory: &Path) -> Result<String> {
    let absolute = directory
        .canonicalize()
        .with_context(|| format!("Resolving directory {directory:?}"))?;
    Ok(absolute
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| String::from("raiz")))
}

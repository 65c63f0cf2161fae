use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tree_dump::{DumpConfig, write_combined_output};

/// Concatenate every file under a directory into one text file.
#[derive(Parser, Debug)]
#[command(name = "tree-dump", version)]
struct Cli {
    /// Directory to dump [default: src]
    source_dir: Option<PathBuf>,
    /// Subtree to leave out [default: SOURCE_DIR/bin]
    exclude_dir: Option<PathBuf>,
    /// Where to write the dump [default: SOURCE_DIR/_all_source.txt]
    output_file: Option<PathBuf>,
    /// Files appended after the tree [default: Cargo.toml build.sh]
    extra_files: Vec<PathBuf>,
}

fn main() -> ExitCode {
    relay_base::init_stderr_logger();
    let cli = Cli::parse();
    let config = DumpConfig::from_args(
        cli.source_dir,
        cli.exclude_dir,
        cli.output_file,
        cli.extra_files,
    );

    match write_combined_output(&config).context("dump failed") {
        Ok(summary) => {
            println!(
                "Wrote {} in-tree files + {} extras into: {}",
                summary.in_tree_files,
                summary.extra_files,
                summary.output.display()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

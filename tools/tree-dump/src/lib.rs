//! Concatenate a directory tree into one text file.
//!
//! Every file under the source root is written in sorted path order under a
//! header naming its path relative to the root, followed by a list of extra
//! files under headers naming their absolute paths.

mod error;

pub use error::DumpError;

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

pub const DEFAULT_SOURCE_DIR: &str = "src";
pub const DEFAULT_EXCLUDE_NAME: &str = "bin";
pub const DEFAULT_OUTPUT_NAME: &str = "_all_source.txt";
pub const DEFAULT_EXTRA_FILES: [&str; 2] = ["Cargo.toml", "build.sh"];

const RULE_WIDTH: usize = 80;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DumpConfig {
    pub source_dir: PathBuf,
    /// Subtree left out of the dump.
    pub exclude_dir: PathBuf,
    pub output: PathBuf,
    /// Appended after the tree, in order.
    pub extra_files: Vec<PathBuf>,
}

impl DumpConfig {
    /// Dump `source_dir` minus its `bin` subtree into
    /// `source_dir/_all_source.txt`, with the default extras.
    pub fn new(source_dir: impl Into<PathBuf>) -> Self {
        let source_dir = source_dir.into();
        Self {
            exclude_dir: source_dir.join(DEFAULT_EXCLUDE_NAME),
            output: source_dir.join(DEFAULT_OUTPUT_NAME),
            extra_files: DEFAULT_EXTRA_FILES.iter().map(PathBuf::from).collect(),
            source_dir,
        }
    }

    /// Positional arguments in order; later defaults derive from the source
    /// directory, and an empty extra list means the default extras.
    pub fn from_args(
        source_dir: Option<PathBuf>,
        exclude_dir: Option<PathBuf>,
        output: Option<PathBuf>,
        extra_files: Vec<PathBuf>,
    ) -> Self {
        let mut config = Self::new(source_dir.unwrap_or_else(|| PathBuf::from(DEFAULT_SOURCE_DIR)));
        if let Some(exclude_dir) = exclude_dir {
            config.exclude_dir = exclude_dir;
        }
        if let Some(output) = output {
            config.output = output;
        }
        if !extra_files.is_empty() {
            config.extra_files = extra_files;
        }
        config
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DumpSummary {
    pub in_tree_files: usize,
    pub extra_files: usize,
    /// Absolute path of the written dump.
    pub output: PathBuf,
}

/// Canonical form of `path`, or of its parent joined with the file name
/// when `path` does not exist yet.
fn resolve(path: &Path) -> PathBuf {
    if let Ok(canonical) = fs::canonicalize(path) {
        return canonical;
    }
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    match (absolute.parent(), absolute.file_name()) {
        (Some(parent), Some(name)) => match fs::canonicalize(parent) {
            Ok(parent) => parent.join(name),
            Err(_) => absolute.clone(),
        },
        _ => absolute.clone(),
    }
}

fn is_pruned(entry: &DirEntry, exclude: &Path) -> bool {
    if entry.depth() == 0 || !entry.file_type().is_dir() {
        return false;
    }
    if entry.file_name().to_string_lossy().starts_with(".git") {
        return true;
    }
    resolve(entry.path()) == exclude
}

/// Files under `root` in sorted order, leaving out the `exclude` subtree,
/// VCS directories, `.DS_Store` and any path listed in `skip`. Both `root`
/// and `exclude` are expected in resolved form.
pub fn collect_files(root: &Path, exclude: &Path, skip: &[PathBuf]) -> Vec<PathBuf> {
    // the whole root lies inside the excluded subtree
    if root.starts_with(exclude) {
        return Vec::new();
    }

    let mut files = Vec::new();
    let walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_pruned(e, exclude));
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                log::warn!("skipping unreadable entry: {}", e);
                continue;
            }
        };
        if entry.file_type().is_dir() || entry.file_name() == ".DS_Store" {
            continue;
        }
        // symlinked directories are listed but never entered
        if entry.path_is_symlink() && entry.path().is_dir() {
            continue;
        }
        if skip.iter().any(|s| s == entry.path()) {
            continue;
        }
        files.push(entry.into_path());
    }
    files.sort();
    files
}

/// File content as text; invalid UTF-8 becomes replacement characters and
/// read failures become an inline error marker.
pub fn read_file_as_text(path: &Path) -> String {
    match fs::read(path) {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(e) => format!("<<ERROR READING FILE: {e}>>"),
    }
}

fn write_section(
    out: &mut impl Write,
    label: &str,
    path: &Path,
    content: &str,
) -> std::io::Result<()> {
    let rule = "=".repeat(RULE_WIDTH);
    write!(out, "\n{rule}\n{label}: {}\n{rule}\n\n{content}\n", path.display())
}

/// Write the combined dump described by `config`, replacing any existing
/// output.
pub fn write_combined_output(config: &DumpConfig) -> Result<DumpSummary, DumpError> {
    let source = fs::canonicalize(&config.source_dir)
        .map_err(|_| DumpError::MissingSource(config.source_dir.clone()))?;
    if !source.is_dir() {
        return Err(DumpError::NotADirectory(source));
    }
    let exclude = resolve(&config.exclude_dir);

    let output = std::path::absolute(&config.output).map_err(|e| DumpError::CreateOutput {
        path: config.output.clone(),
        source: e,
    })?;
    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent).map_err(|e| DumpError::CreateOutput {
            path: output.clone(),
            source: e,
        })?;
    }
    let output = resolve(&output);

    let files = collect_files(&source, &exclude, std::slice::from_ref(&output));
    log::debug!("dumping {} files from {}", files.len(), source.display());

    let file = File::create(&output).map_err(|e| DumpError::CreateOutput {
        path: output.clone(),
        source: e,
    })?;
    let mut out = BufWriter::new(file);
    let write_error = |e: std::io::Error| DumpError::Write {
        path: output.clone(),
        source: e,
    };

    write!(
        out,
        "# Combined dump of {}\n# Excluding: {}\n\n",
        source.display(),
        exclude.display()
    )
    .map_err(write_error)?;

    for path in &files {
        let relative = path.strip_prefix(&source).unwrap_or(path);
        write_section(&mut out, "FILE", relative, &read_file_as_text(path)).map_err(write_error)?;
    }

    if !config.extra_files.is_empty() {
        let rule = "#".repeat(RULE_WIDTH);
        write!(out, "\n{rule}\n# EXTRA FILES (appended after source tree)\n{rule}\n\n")
            .map_err(write_error)?;
        for extra in &config.extra_files {
            let extra = resolve(extra);
            write_section(&mut out, "EXTRA FILE", &extra, &read_file_as_text(&extra))
                .map_err(write_error)?;
        }
    }

    out.flush().map_err(write_error)?;

    Ok(DumpSummary {
        in_tree_files: files.len(),
        extra_files: config.extra_files.len(),
        output,
    })
}

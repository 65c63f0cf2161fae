use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum DumpError {
    #[error("source directory {} does not exist", .0.display())]
    MissingSource(PathBuf),
    #[error("{} is not a directory", .0.display())]
    NotADirectory(PathBuf),
    #[error("cannot create {}: {source}", .path.display())]
    CreateOutput {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("cannot write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

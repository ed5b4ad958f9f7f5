//! Source discovery for the encode pass.

use super::jobs::Job;
use crate::error::PipelineError;
use std::path::{Path, PathBuf};
use tracing::warn;
use walkdir::WalkDir;

pub const DEFAULT_SOURCE_EXTENSION: &str = "mp4";

/// Fails with `InputRootMissing` unless `input_root` is a directory.
pub fn ensure_input_root(input_root: &Path) -> Result<(), PipelineError> {
    if input_root.is_dir() {
        Ok(())
    } else {
        Err(PipelineError::InputRootMissing(input_root.to_path_buf()))
    }
}

/// Every regular file under `root`, depth first, siblings sorted by name.
/// The order only depends on the tree's contents. Symlinks are followed.
///
/// Only a failure to read `root` itself is an error. Entries below it that
/// cannot be read (permissions, dangling links, loops) are logged and skipped.
pub fn walk_files(root: &Path) -> Result<Vec<PathBuf>, PipelineError> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root).follow_links(true).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(source) if source.depth() == 0 => {
                return Err(PipelineError::Walk {
                    path: root.to_path_buf(),
                    source,
                })
            }
            Err(err) => {
                warn!("[skip] unreadable entry under {}: {}", root.display(), err);
                continue;
            }
        };
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

/// Map every source video under `input_root` to a job. `max_files > 0` keeps
/// only that many, taken from the front of the full ordered list.
pub fn discover_jobs(
    input_root: &Path,
    output_root: &Path,
    extension: &str,
    max_files: usize,
) -> Result<Vec<Job>, PipelineError> {
    let mut jobs: Vec<Job> = walk_files(input_root)?
        .into_iter()
        .filter(|path| has_extension(path, extension))
        .filter_map(|path| Job::new(input_root, output_root, path))
        .collect();

    if max_files > 0 {
        jobs.truncate(max_files);
    }
    Ok(jobs)
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
}

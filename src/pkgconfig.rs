//! Rewrites the `prefix=` line of vendored `.pc` files to an absolute path.
//!
//! The PDFium archives ship `.pc` files with a relative or build-machine
//! prefix, which makes `pkg-config --cflags pdfium` useless in place. Each
//! `pdfium-*` directory is the prefix of the files it contains.

use crate::config::LIBRARY_DIR_PREFIX;
use crate::error::BuildError;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

const PREFIX_MARKER: &str = "prefix=";
const PC_EXTENSION: &str = "pc";

/// Replace every line that starts with `prefix=` by `prefix=<prefix>`.
///
/// Lines are split on `\n` only, so a trailing newline and any `\r` on other
/// lines survive unchanged.
pub fn rewrite_prefix(content: &str, prefix: &Path) -> String {
    let replacement = format!("{PREFIX_MARKER}{}", prefix.display());
    content
        .split('\n')
        .map(|line| {
            if line.starts_with(PREFIX_MARKER) {
                replacement.as_str()
            } else {
                line
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Rewrite every `.pc` file under `<library_root>/pdfium-*`.
///
/// Returns the files whose content changed. A missing `library_root` is
/// treated as an empty tree.
pub fn fix_pc_files(library_root: &Path) -> Result<Vec<PathBuf>, BuildError> {
    let mut changed = Vec::new();
    if !library_root.is_dir() {
        debug!("no library tree at {}", library_root.display());
        return Ok(changed);
    }

    for dir in library_dirs(library_root)? {
        let prefix = std::path::absolute(&dir).map_err(|e| BuildError::io(&dir, e))?;
        for pc_file in pc_files(&dir)? {
            let content =
                fs::read_to_string(&pc_file).map_err(|e| BuildError::io(&pc_file, e))?;
            let rewritten = rewrite_prefix(&content, &prefix);
            if rewritten == content {
                debug!("{} already up to date", pc_file.display());
                continue;
            }
            fs::write(&pc_file, rewritten).map_err(|e| BuildError::io(&pc_file, e))?;
            debug!("rewrote prefix of {}", pc_file.display());
            changed.push(pc_file);
        }
    }
    Ok(changed)
}

/// Direct children of `root` named `pdfium-*`, sorted by name.
fn library_dirs(root: &Path) -> Result<Vec<PathBuf>, BuildError> {
    let mut dirs = Vec::new();
    for entry in WalkDir::new(root)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| walk_error(root, e))?;
        let is_library = entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.starts_with(LIBRARY_DIR_PREFIX));
        if is_library && entry.file_type().is_dir() {
            dirs.push(entry.into_path());
        }
    }
    Ok(dirs)
}

/// Regular files directly inside `dir` with a `.pc` extension.
fn pc_files(dir: &Path) -> Result<Vec<PathBuf>, BuildError> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| walk_error(dir, e))?;
        let path = entry.path();
        if entry.file_type().is_file() && path.extension().is_some_and(|ext| ext == PC_EXTENSION)
        {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

fn walk_error(root: &Path, err: walkdir::Error) -> BuildError {
    let path = err.path().unwrap_or(root).to_path_buf();
    let source = err
        .into_io_error()
        .unwrap_or_else(|| std::io::Error::other("filesystem loop"));
    BuildError::io(path, source)
}

//! mibcodec-std: filesystem loader, standard codecs and catalogue cache
//!
//! The plumbing around the core compiler for native use: walking MIB
//! directories, compiling every file into one store, the standard
//! primitive codec set, and a binary cache for fast catalogue startup.

use std::fs;
use std::path::{Path, PathBuf};

pub mod cache;
pub mod codecs;

pub use mibcodec_core;

use mibcodec_core::error::MibError;
use mibcodec_core::store::MibStore;

/// Recursively collect MIB files from a directory.
///
/// Includes files with no extension, or `.mib`, `.txt`, `.my` extensions.
pub fn collect_mib_files(dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    collect_files_recursive(dir, &mut files);
    files.sort();
    files
}

fn collect_files_recursive(dir: &Path, files: &mut Vec<PathBuf>) {
    if let Ok(entries) = fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                collect_files_recursive(&path, files);
            } else if path.is_file() {
                let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
                if ext.is_empty()
                    || ext.eq_ignore_ascii_case("mib")
                    || ext.eq_ignore_ascii_case("txt")
                    || ext.eq_ignore_ascii_case("my")
                {
                    files.push(path);
                }
            }
        }
    }
}

/// Outcome of a directory load: files that compiled and files that did not.
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Files compiled into the store.
    pub loaded: Vec<PathBuf>,
    /// Files skipped, with the reason.
    pub failed: Vec<(PathBuf, String)>,
}

impl LoadReport {
    /// Whether every discovered file compiled.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Compile every MIB file under `dir` into the store, then freeze it.
///
/// A file that fails to read or compile is skipped and reported; it does
/// not abort the load. Previously compiled modules always survive.
///
/// # Errors
///
/// Returns the freeze error ([`MibError::UnresolvedImport`] or
/// [`MibError::TypeCycle`]) when the loaded set cannot be linked.
pub fn load_directory(dir: &Path, store: &mut MibStore) -> Result<LoadReport, MibError> {
    let mut report = LoadReport::default();
    for path in collect_mib_files(dir) {
        let source_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("<mib>")
            .to_owned();
        match fs::read(&path) {
            Ok(bytes) => {
                match mibcodec_core::compile_module(&bytes, &source_name, store) {
                    Ok(()) => report.loaded.push(path),
                    Err(err) => report.failed.push((path, err.to_string())),
                }
            }
            Err(err) => report.failed.push((path, err.to_string())),
        }
    }
    store.freeze()?;
    Ok(report)
}

//! Access to the generated Go files being rewritten

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use gotagger_core::{TaggerError, TaggerResult};

/// Source of generated file text
///
/// The pipeline asks for each file the target map names; `Ok(None)` means
/// the file does not exist.
pub trait SourceLoader {
    fn load(&self, path: &Path) -> TaggerResult<Option<String>>;
}

/// Reads generated files from disk
#[derive(Debug, Clone, Copy, Default)]
pub struct FsSourceLoader;

impl FsSourceLoader {
    pub fn new() -> Self {
        Self
    }
}

impl SourceLoader for FsSourceLoader {
    fn load(&self, path: &Path) -> TaggerResult<Option<String>> {
        match fs::read_to_string(path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(TaggerError::SourceUnavailable(format!(
                "cannot read '{}': {e}",
                path.display()
            ))),
        }
    }
}

/// In-memory sources keyed by path
impl SourceLoader for BTreeMap<PathBuf, String> {
    fn load(&self, path: &Path) -> TaggerResult<Option<String>> {
        Ok(self.get(path).cloned())
    }
}

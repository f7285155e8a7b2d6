use crate::core::Storage;
use crate::utils::error::{GeocodeError, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

#[derive(Debug, Clone, Default)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        self.base_path.join(path)
    }
}

impl Storage for LocalStorage {
    async fn read_file(&self, path: &Path) -> Result<Vec<u8>> {
        let full_path = self.resolve(path);
        fs::read(&full_path).map_err(|e| GeocodeError::file(full_path, e))
    }

    /// Stages every file as a temp file beside its destination, then renames them
    /// into place. Nothing is renamed unless every file was staged.
    async fn write_files(&self, files: &[(PathBuf, Vec<u8>)]) -> Result<()> {
        let mut staged = Vec::with_capacity(files.len());

        for (path, data) in files {
            let full_path = self.resolve(path);
            let parent = match full_path.parent() {
                Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
                _ => PathBuf::from("."),
            };

            fs::create_dir_all(&parent).map_err(|e| GeocodeError::file(&parent, e))?;

            let mut tmp =
                NamedTempFile::new_in(&parent).map_err(|e| GeocodeError::file(&parent, e))?;
            tmp.write_all(data)
                .and_then(|_| tmp.as_file().sync_all())
                .map_err(|e| GeocodeError::file(tmp.path(), e))?;

            tracing::debug!("Staged {} ({} bytes)", full_path.display(), data.len());
            staged.push((tmp, full_path));
        }

        for (tmp, full_path) in staged {
            tmp.persist(&full_path)
                .map_err(|e| GeocodeError::file(&full_path, e.error))?;
        }

        Ok(())
    }
}

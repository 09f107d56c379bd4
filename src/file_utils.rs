use anyhow::{Context, Result, anyhow};
use log::{debug, warn};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::{NamedTempFile, TempPath};

use crate::transcription::AUDIO_EXTENSIONS;

// @module: File and directory utilities

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().is_file()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)
                .with_context(|| format!("Failed to create directory: {}", path.display()))?;
        }
        Ok(())
    }

    // @checks: Extension is one of the offered audio formats
    pub fn is_audio_file<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref()
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .is_some_and(|ext| AUDIO_EXTENSIONS.contains(&ext.as_str()))
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Write a string to a file
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        Self::write_all_or_nothing(&[(path.as_ref().to_path_buf(), content.to_string())])
    }

    /// Write every `(path, content)` pair, or none of them.
    ///
    /// Each content is first written and flushed to a temporary file in its
    /// target directory. Only when all of them are staged are they renamed
    /// over their targets. Existing targets are moved aside first and put
    /// back if a later rename fails, so an error leaves every target as it
    /// was before the call.
    pub fn write_all_or_nothing(outputs: &[(PathBuf, String)]) -> Result<()> {
        if let Some((path, _)) = outputs.iter().find(|(path, _)| path.is_dir()) {
            return Err(anyhow!("Output path is a directory: {}", path.display()));
        }

        let mut staged: Vec<(NamedTempFile, &Path)> = Vec::with_capacity(outputs.len());

        for (path, content) in outputs {
            let parent = Self::parent_dir(path);
            Self::ensure_dir(&parent)?;

            let mut temp = NamedTempFile::new_in(&parent)
                .with_context(|| format!("Failed to stage output in {}", parent.display()))?;
            temp.write_all(content.as_bytes())
                .with_context(|| format!("Failed to write staged output for {}", path.display()))?;
            temp.as_file()
                .sync_all()
                .with_context(|| format!("Failed to flush staged output for {}", path.display()))?;
            staged.push((temp, path.as_path()));
        }

        let mut committed: Vec<(&Path, Option<TempPath>)> = Vec::with_capacity(staged.len());

        for (temp, path) in staged {
            let backup = match Self::move_aside(path) {
                Ok(backup) => backup,
                Err(e) => {
                    Self::roll_back(committed);
                    return Err(e);
                }
            };

            if let Err(e) = temp.persist(path) {
                committed.push((path, backup));
                Self::roll_back(committed);
                return Err(anyhow!(
                    "Failed to move output into place at {}: {}",
                    path.display(),
                    e.error
                ));
            }
            debug!("Wrote {}", path.display());
            committed.push((path, backup));
        }

        // Dropping the backups removes the replaced files
        Ok(())
    }

    fn parent_dir(path: &Path) -> PathBuf {
        match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    // @moves: An existing target to a backup next to it
    fn move_aside(path: &Path) -> Result<Option<TempPath>> {
        if !path.exists() {
            return Ok(None);
        }

        let backup = tempfile::Builder::new()
            .prefix(".syncwai-backup-")
            .tempfile_in(Self::parent_dir(path))
            .with_context(|| format!("Failed to create backup for {}", path.display()))?
            .into_temp_path();
        fs::rename(path, &backup)
            .with_context(|| format!("Failed to back up {}", path.display()))?;

        Ok(Some(backup))
    }

    // @restores: Targets replaced so far, newest first
    fn roll_back(committed: Vec<(&Path, Option<TempPath>)>) {
        for (path, backup) in committed.into_iter().rev() {
            let restored = match &backup {
                Some(backup) => fs::rename(backup, path),
                None => fs::remove_file(path),
            };
            match restored {
                Ok(()) => debug!("Restored {}", path.display()),
                Err(e) => warn!("Failed to restore {}: {}", path.display(), e),
            }
        }
    }
}

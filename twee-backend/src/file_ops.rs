//! File operations for story folders
//!
//! Thin collaborators around the filesystem: reading and writing story
//! files, plus the recursive listing shared by the loader and the folder
//! watcher.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::defaults;
use crate::error::StoryError;

/// Read a story file to a string
pub async fn read_file(path: &Path) -> Result<String, StoryError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| StoryError::Read {
            path: path.to_path_buf(),
            source,
        })
}

/// Write rebuilt story file content back to disk
pub async fn write_file(path: &Path, content: &str) -> Result<(), StoryError> {
    tokio::fs::write(path, content)
        .await
        .map_err(|source| StoryError::Write {
            path: path.to_path_buf(),
            source,
        })
}

/// True for entry names that must never be listed or watched: hidden
/// names and dependency folders like node_modules
pub fn is_excluded_name(name: &str) -> bool {
    (name.starts_with('.') && name.len() > 1) || defaults::EXCLUDED_DIRS.contains(&name)
}

/// True when any component of `relative` is excluded. Callers hand in the
/// path relative to the story folder so ancestors outside it don't count.
pub fn is_excluded(relative: &Path) -> bool {
    relative
        .components()
        .any(|component| is_excluded_name(&component.as_os_str().to_string_lossy()))
}

/// True when the extension marks a story file (`tw`, `twee`)
pub fn has_story_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| defaults::STORY_EXTENSIONS.contains(&ext))
        .unwrap_or(false)
}

/// List all story files in the folder (recursively), in a stable order.
/// Symlinks are skipped.
pub fn list_story_files(folder: &Path) -> Result<Vec<PathBuf>, StoryError> {
    let mut files = Vec::new();

    if !folder.exists() {
        return Ok(files);
    }

    fn visit_dir(dir: &Path, files: &mut Vec<PathBuf>) -> std::io::Result<()> {
        let mut entries = fs::read_dir(dir)?.collect::<Result<Vec<_>, _>>()?;
        entries.sort_by_key(|entry| entry.file_name());
        for entry in entries {
            if is_excluded_name(&entry.file_name().to_string_lossy()) {
                continue;
            }
            let file_type = entry.file_type()?;
            // Skip symlinks to prevent infinite recursion and folder escape
            if file_type.is_symlink() {
                log::warn!("Skipping symlink during listing: {:?}", entry.path());
                continue;
            }
            let path = entry.path();
            if file_type.is_dir() {
                visit_dir(&path, files)?;
            } else if has_story_extension(&path) {
                files.push(path);
            }
        }
        Ok(())
    }

    visit_dir(folder, &mut files).map_err(|source| StoryError::List {
        path: folder.to_path_buf(),
        source,
    })?;
    Ok(files)
}

use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FolderOutcome {
    Deleted,
    NotFound,
}

#[derive(Debug, Error)]
#[error("Unable to delete {}: {source}", .path.display())]
pub struct FolderError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

/// Recursively deletes the folder at `path` if it exists
pub fn delete_folder(path: &Path) -> Result<FolderOutcome, FolderError> {
    if !path.exists() {
        log::debug!("Folder {} does not exist", path.display());
        return Ok(FolderOutcome::NotFound);
    }
    log::info!("Deleting folder {}", path.display());
    std::fs::remove_dir_all(path).map_err(|source| FolderError {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(FolderOutcome::Deleted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn deletes_nested_folder() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("Kiro");
        std::fs::create_dir_all(target.join("User").join("globalStorage")).unwrap();
        std::fs::write(target.join("User").join("settings.json"), "{}").unwrap();

        assert_eq!(delete_folder(&target).unwrap(), FolderOutcome::Deleted);
        assert!(!target.exists());
        assert!(dir.path().exists());
    }

    #[test]
    fn missing_folder() {
        let dir = tempdir().unwrap();
        assert_eq!(
            delete_folder(&dir.path().join("missing")).unwrap(),
            FolderOutcome::NotFound
        );
    }

    #[test]
    fn file_is_not_a_folder() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("Kiro");
        std::fs::write(&file, "x").unwrap();
        let err = delete_folder(&file).unwrap_err();
        assert_eq!(err.path, file);
        assert!(file.exists());
    }
}

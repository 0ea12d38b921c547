//! 基于文件系统的翻译存储
//!
//! 每种语言一个 `<dir>/<lang>.json` 文件，可作为离线环境下的 `TranslationApi`。

use std::path::{Path, PathBuf};

use super::traits::{ApiError, TranslationApi};
use crate::tree::TranslationTree;
use crate::utils::create_backup;

/// 目录翻译存储
#[derive(Debug, Clone)]
pub struct FileTranslationStore {
    dir: PathBuf,
    backup_on_save: bool,
}

impl FileTranslationStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            backup_on_save: false,
        }
    }

    /// 覆盖前是否先备份旧文件（带时间戳的 `.bak`）
    pub fn with_backup(mut self, enabled: bool) -> Self {
        self.backup_on_save = enabled;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// 语言对应的文件路径
    pub fn file_path(&self, language: &str) -> PathBuf {
        self.dir.join(format!("{}.json", language))
    }
}

impl TranslationApi for FileTranslationStore {
    fn fetch(&self, language: &str) -> Result<TranslationTree, ApiError> {
        let path = self.file_path(language);
        if !path.exists() {
            return Err(ApiError::NotFound(path.display().to_string()));
        }
        let bytes = std::fs::read(&path)?;
        Ok(TranslationTree::from_json_slice(&bytes)?)
    }

    fn persist(&self, language: &str, tree: &TranslationTree) -> Result<(), ApiError> {
        // 确保目录存在
        std::fs::create_dir_all(&self.dir)?;

        let path = self.file_path(language);
        if self.backup_on_save && path.exists() {
            let backup = create_backup(&path)
                .map_err(|e| ApiError::Io(std::io::Error::new(std::io::ErrorKind::Other, e.to_string())))?;
            tracing::debug!("已备份 {} -> {}", path.display(), backup.display());
        }

        let content = tree.to_json_string_pretty()?;
        std::fs::write(&path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_persist_and_fetch() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileTranslationStore::new(temp_dir.path().join("nested").join("locales"));

        let tree = TranslationTree::from_json_str(r#"{"b":{"x":"X"},"a":"A"}"#).unwrap();
        store.persist("en", &tree).unwrap();

        assert!(store.file_path("en").exists());
        let loaded = store.fetch("en").unwrap();
        assert_eq!(loaded, tree);
    }

    #[test]
    fn test_fetch_missing_language() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileTranslationStore::new(temp_dir.path());
        assert!(matches!(store.fetch("fr"), Err(ApiError::NotFound(_))));
    }

    #[test]
    fn test_fetch_malformed_file() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("en.json"), "[1, 2, 3]").unwrap();

        let store = FileTranslationStore::new(temp_dir.path());
        assert!(matches!(store.fetch("en"), Err(ApiError::Payload(_))));
    }

    #[test]
    fn test_backup_on_save() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileTranslationStore::new(temp_dir.path()).with_backup(true);

        let first = TranslationTree::from_json_str(r#"{"a":"1"}"#).unwrap();
        let second = TranslationTree::from_json_str(r#"{"a":"2"}"#).unwrap();
        store.persist("en", &first).unwrap();
        store.persist("en", &second).unwrap();

        let backups: Vec<_> = std::fs::read_dir(temp_dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".bak"))
            .collect();
        assert_eq!(backups.len(), 1);
        assert_eq!(store.fetch("en").unwrap(), second);
    }
}

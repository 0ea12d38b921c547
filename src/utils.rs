use thiserror::Error;
use std::path::Path;

use crate::dispatcher::PartialFailure;
use crate::tree::MalformedTreeError;

/// 自定义错误类型
#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Unknown path: {0}")]
    UnknownPath(String),

    #[error("Not an editable entry: {0}")]
    NotALeaf(String),

    #[error("Language {language} is not tracked by entry {path}")]
    UnknownLanguage { path: String, language: String },

    #[error("Failed to load language {language}: {reason}")]
    LoadFailed { language: String, reason: String },

    #[error("Stale load result (generation {got}, current {current})")]
    StaleLoad { got: u64, current: u64 },

    #[error("A save is already in progress")]
    Busy,

    #[error("No changes to save")]
    NothingToSave,

    #[error("Nothing to undo")]
    NothingToUndo,

    #[error("Nothing to redo")]
    NothingToRedo,

    #[error(transparent)]
    SaveFailed(#[from] PartialFailure),

    #[error("Malformed translation tree: {0}")]
    Malformed(#[from] MalformedTreeError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// 创建文件备份
pub fn create_backup(file_path: &Path) -> Result<std::path::PathBuf, EditorError> {
    if !file_path.exists() {
        return Err(EditorError::IoError(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "原文件不存在"
        )));
    }

    let timestamp = chrono::Local::now().format("%Y-%m-%d-%H-%M-%S");
    let backup_path = file_path.with_extension(format!("{}.bak", timestamp));

    std::fs::copy(file_path, &backup_path)
        .map_err(EditorError::IoError)?;

    Ok(backup_path)
}

/// 截断过长文本用于日志与摘要（按字符计数）
pub fn truncate_for_display(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        format!("{}...", text.chars().take(max_chars).collect::<String>())
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_create_backup() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("en.json");
        std::fs::write(&file, r#"{"a":"A"}"#).unwrap();

        let backup = create_backup(&file).unwrap();
        assert!(backup.exists());
        assert!(backup.to_string_lossy().ends_with(".bak"));
        assert_eq!(std::fs::read_to_string(backup).unwrap(), r#"{"a":"A"}"#);
    }

    #[test]
    fn test_create_backup_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let result = create_backup(&temp_dir.path().join("missing.json"));
        assert!(matches!(result, Err(EditorError::IoError(_))));
    }

    #[test]
    fn test_truncate_for_display() {
        assert_eq!(truncate_for_display("short", 10), "short");
        assert_eq!(truncate_for_display("这是一个很长的句子", 4), "这是一个...");
    }
}

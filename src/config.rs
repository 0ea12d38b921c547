//! 编辑器配置
//!
//! 从 JSON 文件读取，缺失字段使用默认值；命令行参数可覆盖其中的字段。
//!
//! ```json
//! {
//!   "api_base_url": "https://admin.example.com/api",
//!   "languages": ["en", "es", "fr"],
//!   "active_language": "es"
//! }
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::notice::DEFAULT_NOTICE_TTL_SECS;
use crate::tree::LanguageCode;
use crate::utils::EditorError;
use crate::DEFAULT_BASE_LANGUAGE;

const DEFAULT_TIMEOUT_SECS: u64 = 10;

fn default_languages() -> Vec<LanguageCode> {
    vec![DEFAULT_BASE_LANGUAGE.to_string()]
}

fn default_active_language() -> LanguageCode {
    DEFAULT_BASE_LANGUAGE.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_notice_ttl_secs() -> u64 {
    DEFAULT_NOTICE_TTL_SECS
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EditorConfig {
    /// 远程翻译 API 地址，优先于 `store_dir`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base_url: Option<String>,

    /// 本地翻译目录（`<dir>/<lang>.json`）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_dir: Option<PathBuf>,

    /// 编辑的语言，第一个为结构基准
    #[serde(default = "default_languages")]
    pub languages: Vec<LanguageCode>,

    /// 当前界面语言
    #[serde(default = "default_active_language")]
    pub active_language: LanguageCode,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_notice_ttl_secs")]
    pub notice_ttl_secs: u64,

    /// 写入本地目录前是否备份原文件
    #[serde(default)]
    pub backup_on_save: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            api_base_url: None,
            store_dir: None,
            languages: default_languages(),
            active_language: default_active_language(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            notice_ttl_secs: DEFAULT_NOTICE_TTL_SECS,
            backup_on_save: false,
        }
    }
}

impl EditorConfig {
    /// 从 JSON 文件加载配置
    pub fn load(path: &Path) -> Result<Self, EditorError> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        tracing::debug!("已加载配置 {:?}", path);
        Ok(config)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn notice_ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.notice_ttl_secs as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = EditorConfig::default();
        assert_eq!(config.languages, vec!["en"]);
        assert_eq!(config.active_language, "en");
        assert_eq!(config.timeout(), Duration::from_secs(10));
        assert_eq!(config.notice_ttl(), chrono::Duration::seconds(5));
        assert!(!config.backup_on_save);
    }

    #[test]
    fn test_load_partial_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("editor.json");
        std::fs::write(
            &path,
            r#"{"api_base_url": "http://localhost:8080", "languages": ["en", "es", "fr"], "backup_on_save": true}"#,
        )
        .unwrap();

        let config = EditorConfig::load(&path).unwrap();
        assert_eq!(config.api_base_url.as_deref(), Some("http://localhost:8080"));
        assert_eq!(config.languages, vec!["en", "es", "fr"]);
        assert_eq!(config.active_language, "en");
        assert_eq!(config.timeout_secs, 10);
        assert!(config.backup_on_save);
        assert!(config.store_dir.is_none());
    }

    #[test]
    fn test_load_invalid_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("editor.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(matches!(EditorConfig::load(&path), Err(EditorError::JsonError(_))));
        assert!(matches!(
            EditorConfig::load(&temp_dir.path().join("missing.json")),
            Err(EditorError::IoError(_))
        ));
    }
}

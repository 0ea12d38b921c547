//! 用户提示
//!
//! 加载与保存的结果以提示的形式交给界面层，提示在 TTL 之后过期。

use chrono::{DateTime, Duration, Local};
use serde::Serialize;

/// 默认提示存活时间（秒）
pub const DEFAULT_NOTICE_TTL_SECS: u64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NoticeLevel {
    Success,
    Error,
    Info,
}

impl std::fmt::Display for NoticeLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NoticeLevel::Success => write!(f, "success"),
            NoticeLevel::Error => write!(f, "error"),
            NoticeLevel::Info => write!(f, "info"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    pub raised_at: DateTime<Local>,
}

impl Notice {
    pub fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            raised_at: Local::now(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Success, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Error, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Info, message)
    }

    /// 在 `now` 时刻是否已超过存活时间
    pub fn is_expired(&self, now: DateTime<Local>, ttl: Duration) -> bool {
        now - self.raised_at >= ttl
    }
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.level, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notice_expiry() {
        let notice = Notice::success("Saved");
        let ttl = Duration::seconds(DEFAULT_NOTICE_TTL_SECS as i64);

        assert!(!notice.is_expired(notice.raised_at, ttl));
        assert!(!notice.is_expired(notice.raised_at + Duration::seconds(4), ttl));
        assert!(notice.is_expired(notice.raised_at + Duration::seconds(5), ttl));
    }

    #[test]
    fn test_notice_display() {
        let notice = Notice::error("Failed to save es");
        assert_eq!(notice.to_string(), "[error] Failed to save es");
        assert_eq!(Notice::info("x").level, NoticeLevel::Info);
    }
}

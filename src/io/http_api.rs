//! 基于 HTTP 的翻译 API 实现
//!
//! - `GET  {base}/translations/{lang}`：返回嵌套 JSON 翻译树
//! - `PUT  {base}/translations/{lang}`：请求体为嵌套 JSON 翻译树

use std::time::Duration;

use super::traits::{ApiError, TranslationApi};
use crate::tree::TranslationTree;

/// 默认请求超时
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP 翻译 API 客户端（阻塞）
#[derive(Debug, Clone)]
pub struct HttpTranslationApi {
    agent: ureq::Agent,
    base_url: String,
}

impl HttpTranslationApi {
    /// 创建客户端
    ///
    /// # 参数
    /// * `base_url` - API 根地址，如 `https://admin.example.com/api`
    /// * `timeout` - 单次请求的总超时
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        Self {
            agent,
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// 语言对应的资源地址
    pub fn endpoint(&self, language: &str) -> String {
        format!("{}/translations/{}", self.base_url.trim_end_matches('/'), language)
    }
}

fn map_ureq_error(err: ureq::Error) -> ApiError {
    match err {
        ureq::Error::Status(code, _) => ApiError::Status(code),
        ureq::Error::Transport(transport) => ApiError::Transport(transport.to_string()),
    }
}

impl TranslationApi for HttpTranslationApi {
    fn fetch(&self, language: &str) -> Result<TranslationTree, ApiError> {
        let url = self.endpoint(language);
        tracing::debug!("GET {}", url);

        let response = self
            .agent
            .get(&url)
            .set("Accept", "application/json")
            .call()
            .map_err(map_ureq_error)?;

        // 流式解析，不受 into_string 的 10 MB 上限限制
        Ok(TranslationTree::from_json_reader(response.into_reader())?)
    }

    fn persist(&self, language: &str, tree: &TranslationTree) -> Result<(), ApiError> {
        let url = self.endpoint(language);
        let body = serde_json::to_string(tree)?;
        tracing::debug!("PUT {} ({} bytes)", url, body.len());

        self.agent
            .put(&url)
            .set("Content-Type", "application/json")
            .send_string(&body)
            .map_err(map_ureq_error)?;
        Ok(())
    }
}

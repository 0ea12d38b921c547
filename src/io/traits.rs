//! IO 抽象层 - trait 定义
//!
//! 引擎只通过这些接口接触外部协作方（远程翻译 API、内置回退语言包、i18n 运行时），
//! 支持依赖注入和测试 mock。

use thiserror::Error;

use crate::tree::{LanguageCode, MalformedTreeError, TranslationTree};

/// 翻译 API 错误
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Server returned status {0}")]
    Status(u16),

    #[error("Malformed payload: {0}")]
    Payload(#[from] MalformedTreeError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// 翻译 API（事实来源）
///
/// # 职责
/// - `fetch`：获取某语言的嵌套翻译树
/// - `persist`：写回某语言的完整翻译树
///
/// 每次调用只涉及一种语言，调用之间相互独立。
pub trait TranslationApi {
    /// 获取翻译树
    ///
    /// # 参数
    /// * `language` - 语言代码
    fn fetch(&self, language: &str) -> Result<TranslationTree, ApiError>;

    /// 保存翻译树
    ///
    /// # 参数
    /// * `language` - 语言代码
    /// * `tree` - 重建后的完整翻译树
    fn persist(&self, language: &str, tree: &TranslationTree) -> Result<(), ApiError>;
}

/// 本地回退语言包
///
/// 远程获取失败时按语言提供一份静态翻译树，原样使用。
pub trait FallbackProvider {
    /// 返回语言的回退树，不支持该语言时返回 None
    fn fallback(&self, language: &str) -> Option<TranslationTree>;
}

/// i18n 运行时
///
/// 保存器只在某语言保存成功、且该语言为当前界面语言时调用 `add_or_replace_bundle`。
pub trait I18nRuntime {
    /// 当前界面语言
    fn active_language(&self) -> LanguageCode;

    /// 热替换某语言的内存资源
    fn add_or_replace_bundle(&mut self, language: &str, tree: TranslationTree);
}

impl<T: TranslationApi + ?Sized> TranslationApi for Box<T> {
    fn fetch(&self, language: &str) -> Result<TranslationTree, ApiError> {
        (**self).fetch(language)
    }

    fn persist(&self, language: &str, tree: &TranslationTree) -> Result<(), ApiError> {
        (**self).persist(language, tree)
    }
}

impl<T: TranslationApi + ?Sized> TranslationApi for &T {
    fn fetch(&self, language: &str) -> Result<TranslationTree, ApiError> {
        (**self).fetch(language)
    }

    fn persist(&self, language: &str, tree: &TranslationTree) -> Result<(), ApiError> {
        (**self).persist(language, tree)
    }
}

impl<T: FallbackProvider + ?Sized> FallbackProvider for Box<T> {
    fn fallback(&self, language: &str) -> Option<TranslationTree> {
        (**self).fallback(language)
    }
}

impl<T: FallbackProvider + ?Sized> FallbackProvider for &T {
    fn fallback(&self, language: &str) -> Option<TranslationTree> {
        (**self).fallback(language)
    }
}

impl<T: I18nRuntime + ?Sized> I18nRuntime for Box<T> {
    fn active_language(&self) -> LanguageCode {
        (**self).active_language()
    }

    fn add_or_replace_bundle(&mut self, language: &str, tree: TranslationTree) {
        (**self).add_or_replace_bundle(language, tree)
    }
}

//! 保存分发
//!
//! 每种语言独立地按顺序写回；当前界面语言写回成功后立即热替换运行时资源。
//! 语言之间没有事务：第 k 种语言失败不会回滚此前已成功保存的语言，
//! 后续语言仍会继续尝试，失败信息汇总在 [`PartialFailure`] 中。

use std::fmt;

use crate::io::{ApiError, I18nRuntime, TranslationApi};
use crate::tree::{LanguageCode, TranslationBundle};

/// 保存成功的结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaveReport {
    /// 按顺序成功保存的语言
    pub saved: Vec<LanguageCode>,
    /// 被热替换的语言（当前界面语言在本次保存之列时）
    pub hot_swapped: Option<LanguageCode>,
}

/// 单种语言的保存失败
#[derive(Debug)]
pub struct LanguageFailure {
    pub language: LanguageCode,
    pub error: ApiError,
}

/// 部分（或全部）语言保存失败
#[derive(Debug)]
pub struct PartialFailure {
    /// 已成功保存的语言，不会被回滚
    pub saved: Vec<LanguageCode>,
    pub failures: Vec<LanguageFailure>,
    pub hot_swapped: Option<LanguageCode>,
}

impl PartialFailure {
    pub fn failed_languages(&self) -> Vec<&str> {
        self.failures.iter().map(|f| f.language.as_str()).collect()
    }
}

impl fmt::Display for PartialFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Failed to save {} of {} languages: ",
            self.failures.len(),
            self.failures.len() + self.saved.len()
        )?;
        for (index, failure) in self.failures.iter().enumerate() {
            if index > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{} ({})", failure.language, failure.error)?;
        }
        if !self.saved.is_empty() {
            write!(f, "; saved: {}", self.saved.join(", "))?;
        }
        Ok(())
    }
}

impl std::error::Error for PartialFailure {}

/// 保存翻译包
///
/// # 参数
/// * `api` - 翻译 API
/// * `runtime` - i18n 运行时，只对 `active_language` 热替换
/// * `bundle` - 由扁平列表重建的翻译包
/// * `languages` - 要保存的语言，按顺序处理，重复项只保存一次
/// * `active_language` - 当前界面语言
///
/// # 返回
/// 全部成功返回 `SaveReport`，否则返回 `PartialFailure`
pub fn save<A, R>(
    api: &A,
    runtime: &mut R,
    bundle: &TranslationBundle,
    languages: &[LanguageCode],
    active_language: &str,
) -> Result<SaveReport, PartialFailure>
where
    A: TranslationApi + ?Sized,
    R: I18nRuntime + ?Sized,
{
    let mut saved: Vec<LanguageCode> = Vec::new();
    let mut failures = Vec::new();
    let mut hot_swapped = None;

    for language in languages {
        if saved.contains(language) || failures.iter().any(|f: &LanguageFailure| &f.language == language) {
            continue;
        }

        let Some(tree) = bundle.get(language) else {
            failures.push(LanguageFailure {
                language: language.clone(),
                error: ApiError::NotFound(format!("no rebuilt tree for {}", language)),
            });
            continue;
        };

        match api.persist(language, tree) {
            Ok(()) => {
                tracing::debug!("语言 {} 已保存", language);
                saved.push(language.clone());
                if language == active_language {
                    runtime.add_or_replace_bundle(language, tree.clone());
                    hot_swapped = Some(language.clone());
                    tracing::debug!("已热替换当前语言 {} 的运行时资源", language);
                }
            }
            Err(e) => {
                tracing::error!("语言 {} 保存失败: {}", language, e);
                failures.push(LanguageFailure {
                    language: language.clone(),
                    error: e,
                });
            }
        }
    }

    if failures.is_empty() {
        tracing::info!("已保存 {} 种语言", saved.len());
        Ok(SaveReport { saved, hot_swapped })
    } else {
        Err(PartialFailure {
            saved,
            failures,
            hot_swapped,
        })
    }
}

//! 翻译来源解析
//!
//! 每种语言独立地先请求远程 API，任何失败（网络错误、非成功状态、负载格式错误）
//! 都退回到打包的回退语言包，并记录警告。远程失败不会作为错误返回给调用方，
//! 只有回退语言包也不可用时整个加载才失败。

use std::collections::HashMap;

use serde::Serialize;

use crate::io::{FallbackProvider, TranslationApi};
use crate::tree::{LanguageCode, TranslationBundle, TranslationTree};
use crate::utils::EditorError;

/// 翻译树的来源（仅供展示，不持久化）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Provenance {
    Remote,
    Fallback,
}

impl std::fmt::Display for Provenance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Provenance::Remote => write!(f, "remote"),
            Provenance::Fallback => write!(f, "fallback"),
        }
    }
}

/// 解析结果：翻译包与每种语言的来源
#[derive(Debug, Clone, Default)]
pub struct ResolvedBundle {
    pub bundle: TranslationBundle,
    pub provenance: HashMap<LanguageCode, Provenance>,
}

impl ResolvedBundle {
    pub fn provenance_of(&self, language: &str) -> Option<Provenance> {
        self.provenance.get(language).copied()
    }

    /// 使用了回退语言包的语言（按名称排序）
    pub fn fallback_languages(&self) -> Vec<&str> {
        let mut languages: Vec<&str> = self
            .provenance
            .iter()
            .filter(|(_, p)| **p == Provenance::Fallback)
            .map(|(lang, _)| lang.as_str())
            .collect();
        languages.sort_unstable();
        languages
    }
}

/// 来源解析器
pub struct SourceResolver<A, F> {
    api: A,
    fallback: F,
}

impl<A: TranslationApi, F: FallbackProvider> SourceResolver<A, F> {
    pub fn new(api: A, fallback: F) -> Self {
        Self { api, fallback }
    }

    /// 解析单种语言
    ///
    /// # 返回
    /// 翻译树及其来源；远程与回退都不可用时返回 `LoadFailed`
    pub fn resolve_language(&self, language: &str) -> Result<(TranslationTree, Provenance), EditorError> {
        match self.api.fetch(language) {
            Ok(tree) => {
                tracing::debug!("语言 {} 从远程加载 ({} 条)", language, tree.leaf_count());
                Ok((tree, Provenance::Remote))
            }
            Err(remote_err) => {
                tracing::warn!("语言 {} 远程加载失败，使用内置语言包: {}", language, remote_err);
                match self.fallback.fallback(language) {
                    Some(tree) => Ok((tree, Provenance::Fallback)),
                    None => Err(EditorError::LoadFailed {
                        language: language.to_string(),
                        reason: format!("remote: {}; no bundled fallback", remote_err),
                    }),
                }
            }
        }
    }

    /// 解析一组语言
    ///
    /// 部分语言来自远程、部分来自回退是正常情况。任一语言完全不可用时返回错误，
    /// 不返回不完整的翻译包。重复的语言代码只解析一次。
    pub fn resolve(&self, languages: &[LanguageCode]) -> Result<ResolvedBundle, EditorError> {
        let mut resolved = ResolvedBundle::default();

        for language in languages {
            if resolved.bundle.contains(language) {
                continue;
            }
            let (tree, provenance) = self.resolve_language(language)?;
            resolved.bundle.insert(language.clone(), tree);
            resolved.provenance.insert(language.clone(), provenance);
        }

        tracing::info!(
            "已加载 {} 种语言（回退: {:?}）",
            resolved.bundle.len(),
            resolved.fallback_languages()
        );
        Ok(resolved)
    }
}

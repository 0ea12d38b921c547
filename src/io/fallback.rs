//! 本地回退语言包
//!
//! - `BundledFallback`：编译期嵌入的 `locales/<lang>.json`
//! - `StaticFallback`：内存中的翻译树（测试或嵌入式调用方使用）

use std::collections::HashMap;

use rust_embed::RustEmbed;

use super::traits::FallbackProvider;
use crate::tree::{LanguageCode, TranslationTree};

#[derive(RustEmbed)]
#[folder = "locales/"]
struct LocaleAssets;

/// 随程序打包的回退语言包
#[derive(Debug, Clone, Copy, Default)]
pub struct BundledFallback;

impl BundledFallback {
    /// 已打包的语言代码（按名称排序）
    pub fn available_languages() -> Vec<LanguageCode> {
        let mut languages: Vec<LanguageCode> = LocaleAssets::iter()
            .filter_map(|file| file.strip_suffix(".json").map(str::to_string))
            .collect();
        languages.sort();
        languages
    }
}

impl FallbackProvider for BundledFallback {
    fn fallback(&self, language: &str) -> Option<TranslationTree> {
        let file = LocaleAssets::get(&format!("{}.json", language))?;
        match TranslationTree::from_json_slice(file.data.as_ref()) {
            Ok(tree) => Some(tree),
            Err(e) => {
                tracing::error!("内置语言包 {} 解析失败: {}", language, e);
                None
            }
        }
    }
}

/// 内存回退语言包
#[derive(Debug, Clone, Default)]
pub struct StaticFallback {
    trees: HashMap<LanguageCode, TranslationTree>,
}

impl StaticFallback {
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加一种语言（构建器风格）
    pub fn with(mut self, language: impl Into<LanguageCode>, tree: TranslationTree) -> Self {
        self.trees.insert(language.into(), tree);
        self
    }

    pub fn insert(&mut self, language: impl Into<LanguageCode>, tree: TranslationTree) {
        self.trees.insert(language.into(), tree);
    }
}

impl FallbackProvider for StaticFallback {
    fn fallback(&self, language: &str) -> Option<TranslationTree> {
        self.trees.get(language).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_languages() {
        let languages = BundledFallback::available_languages();
        assert_eq!(languages, vec!["en", "es", "fr"]);
    }

    #[test]
    fn test_bundled_trees_share_schema() {
        let en = BundledFallback.fallback("en").unwrap();
        for language in ["es", "fr"] {
            let tree = BundledFallback.fallback(language).unwrap();
            assert_eq!(tree.leaf_paths(), en.leaf_paths(), "schema mismatch for {}", language);
        }
        assert_eq!(en.get_leaf("categories.title"), Some("Categories"));
    }

    #[test]
    fn test_bundled_unknown_language() {
        assert!(BundledFallback.fallback("xx").is_none());
    }

    #[test]
    fn test_static_fallback() {
        let tree = TranslationTree::from_json_str(r#"{"a":"A"}"#).unwrap();
        let fallback = StaticFallback::new().with("en", tree.clone());

        assert_eq!(fallback.fallback("en"), Some(tree));
        assert!(fallback.fallback("es").is_none());
    }
}

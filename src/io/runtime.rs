//! 内存 i18n 运行时
//!
//! 持有每种语言的已加载资源和当前界面语言，`add_or_replace_bundle` 之后
//! 通过 `translate` 读取的文本立即更新，无需重新加载。

use std::collections::HashMap;

use super::traits::I18nRuntime;
use crate::tree::{LanguageCode, TranslationTree};

#[derive(Debug, Clone)]
pub struct InMemoryRuntime {
    active: LanguageCode,
    bundles: HashMap<LanguageCode, TranslationTree>,
    /// 每次热替换递增，便于界面层判断是否需要重绘
    revision: u64,
}

impl InMemoryRuntime {
    pub fn new(active: impl Into<LanguageCode>) -> Self {
        Self {
            active: active.into(),
            bundles: HashMap::new(),
            revision: 0,
        }
    }

    pub fn set_active_language(&mut self, language: impl Into<LanguageCode>) {
        self.active = language.into();
    }

    pub fn bundle(&self, language: &str) -> Option<&TranslationTree> {
        self.bundles.get(language)
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// 在当前语言下按点路径取文本
    pub fn translate(&self, path: &str) -> Option<&str> {
        self.bundles.get(&self.active)?.get_leaf(path)
    }
}

impl I18nRuntime for InMemoryRuntime {
    fn active_language(&self) -> LanguageCode {
        self.active.clone()
    }

    fn add_or_replace_bundle(&mut self, language: &str, tree: TranslationTree) {
        self.bundles.insert(language.to_string(), tree);
        self.revision += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hot_swap_updates_translation() {
        let mut runtime = InMemoryRuntime::new("en");
        runtime.add_or_replace_bundle(
            "en",
            TranslationTree::from_json_str(r#"{"nav":{"home":"Home"}}"#).unwrap(),
        );
        assert_eq!(runtime.translate("nav.home"), Some("Home"));

        runtime.add_or_replace_bundle(
            "en",
            TranslationTree::from_json_str(r#"{"nav":{"home":"Start"}}"#).unwrap(),
        );
        assert_eq!(runtime.translate("nav.home"), Some("Start"));
        assert_eq!(runtime.revision(), 2);
    }

    #[test]
    fn test_translate_uses_active_language() {
        let mut runtime = InMemoryRuntime::new("en");
        runtime.add_or_replace_bundle("es", TranslationTree::from_json_str(r#"{"a":"Á"}"#).unwrap());

        assert_eq!(runtime.translate("a"), None);
        runtime.set_active_language("es");
        assert_eq!(runtime.active_language(), "es");
        assert_eq!(runtime.translate("a"), Some("Á"));
    }
}

//! 扁平条目与点路径

use std::collections::HashMap;
use std::fmt;

use serde_json::Value;

use crate::tree::{literal_text, LanguageCode, PATH_SEPARATOR};
use crate::utils::EditorError;

/// 点路径：从根到节点的键序列，以 `.` 连接
///
/// 是条目在扁平列表中的唯一标识。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DotPath(String);

impl DotPath {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// 由键序列构造
    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut path = String::new();
        for segment in segments {
            if !path.is_empty() {
                path.push(PATH_SEPARATOR);
            }
            path.push_str(segment.as_ref());
        }
        Self(path)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split(PATH_SEPARATOR)
    }

    /// 嵌套层级，顶层键为 0
    pub fn depth(&self) -> usize {
        self.0.matches(PATH_SEPARATOR).count()
    }

    /// 最后一个键
    pub fn key(&self) -> &str {
        self.0.rsplit(PATH_SEPARATOR).next().unwrap_or(&self.0)
    }

    pub fn parent(&self) -> Option<DotPath> {
        self.0
            .rfind(PATH_SEPARATOR)
            .map(|idx| DotPath(self.0[..idx].to_string()))
    }

    /// 是否为 `ancestor` 的严格后代
    pub fn is_descendant_of(&self, ancestor: &DotPath) -> bool {
        self.0.len() > ancestor.0.len()
            && self.0.starts_with(&ancestor.0)
            && self.0[ancestor.0.len()..].starts_with(PATH_SEPARATOR)
    }
}

impl fmt::Display for DotPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DotPath {
    fn from(path: &str) -> Self {
        Self(path.to_string())
    }
}

impl From<String> for DotPath {
    fn from(path: String) -> Self {
        Self(path)
    }
}

/// 叶子条目：每种已选语言一个当前值和一个原始值
///
/// 原始值只在加载、放弃修改或保存成功时重置，编辑只改变当前值。
/// 源文件中是非字符串值的语言另外记录原始 JSON 值，文本未改动时按原值写回。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeafItem {
    path: DotPath,
    level: usize,
    current_values: HashMap<LanguageCode, String>,
    original_values: HashMap<LanguageCode, String>,
    literals: HashMap<LanguageCode, Value>,
}

impl LeafItem {
    /// 创建条目，当前值与原始值相同
    pub fn new(path: DotPath, values: HashMap<LanguageCode, String>) -> Self {
        let level = path.depth();
        Self {
            path,
            level,
            current_values: values.clone(),
            original_values: values,
            literals: HashMap::new(),
        }
    }

    /// 附加各语言的非字符串原始值
    pub(crate) fn with_literals(mut self, literals: HashMap<LanguageCode, Value>) -> Self {
        self.literals = literals;
        self
    }

    pub fn path(&self) -> &DotPath {
        &self.path
    }

    pub fn level(&self) -> usize {
        self.level
    }

    pub fn current(&self, language: &str) -> Option<&str> {
        self.current_values.get(language).map(String::as_str)
    }

    pub fn original(&self, language: &str) -> Option<&str> {
        self.original_values.get(language).map(String::as_str)
    }

    /// 该语言在源文件中的非字符串原始值
    pub fn literal(&self, language: &str) -> Option<&Value> {
        self.literals.get(language)
    }

    /// 该语言当前应写回的原始值：只有文本与原始值一致时才有
    pub fn unchanged_literal(&self, language: &str) -> Option<&Value> {
        let raw = self.literals.get(language)?;
        let current = self.current_values.get(language)?;
        (literal_text(raw) == *current).then_some(raw)
    }

    pub fn current_values(&self) -> &HashMap<LanguageCode, String> {
        &self.current_values
    }

    pub fn original_values(&self) -> &HashMap<LanguageCode, String> {
        &self.original_values
    }

    /// 设置某语言的当前值，返回旧值
    ///
    /// 只接受条目创建时已跟踪的语言。
    pub fn set_current(&mut self, language: &str, value: impl Into<String>) -> Result<String, EditorError> {
        let slot = self
            .current_values
            .get_mut(language)
            .ok_or_else(|| EditorError::UnknownLanguage {
                path: self.path.to_string(),
                language: language.to_string(),
            })?;
        Ok(std::mem::replace(slot, value.into()))
    }

    pub fn is_language_modified(&self, language: &str) -> bool {
        self.current_values.get(language) != self.original_values.get(language)
    }

    /// 任一语言的当前值与原始值不同
    pub fn is_modified(&self) -> bool {
        self.current_values
            .iter()
            .any(|(lang, value)| self.original_values.get(lang) != Some(value))
    }

    /// 已修改的语言
    pub fn modified_languages(&self) -> Vec<&str> {
        let mut languages: Vec<&str> = self
            .current_values
            .keys()
            .filter(|lang| self.is_language_modified(lang))
            .map(String::as_str)
            .collect();
        languages.sort_unstable();
        languages
    }

    /// 任一语言的当前值去除空白后为空
    pub fn has_empty_value(&self) -> bool {
        self.current_values.values().any(|value| value.trim().is_empty())
    }

    /// 恢复为原始值，返回被撤回的 (语言, 撤回前的值)
    pub(crate) fn revert(&mut self) -> Vec<(LanguageCode, String)> {
        let mut reverted = Vec::new();
        for (lang, value) in self.current_values.iter_mut() {
            if let Some(original) = self.original_values.get(lang) {
                if value != original {
                    reverted.push((lang.clone(), std::mem::replace(value, original.clone())));
                }
            }
        }
        reverted.sort();
        reverted
    }

    /// 将当前值确认为新的原始值
    pub(crate) fn commit(&mut self) {
        let languages: Vec<LanguageCode> = self.current_values.keys().cloned().collect();
        for language in languages {
            if let Some(value) = self.current_values.get(&language).cloned() {
                self.set_original(&language, value);
            }
        }
    }

    /// 将某语言已写出的值确认为原始值
    ///
    /// 写出的是字符串时丢弃该语言的非字符串原始值。
    pub(crate) fn set_original(&mut self, language: &str, value: String) {
        let stale = self
            .literals
            .get(language)
            .is_some_and(|raw| literal_text(raw) != value);
        if stale {
            self.literals.remove(language);
        }
        self.original_values.insert(language.to_string(), value);
    }
}

/// 扁平列表中的条目
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlatItem {
    /// 分组标记，不携带文本
    Section { path: DotPath, level: usize },
    /// 可编辑的叶子
    Leaf(LeafItem),
}

impl FlatItem {
    pub fn section(path: DotPath) -> Self {
        let level = path.depth();
        FlatItem::Section { path, level }
    }

    pub fn path(&self) -> &DotPath {
        match self {
            FlatItem::Section { path, .. } => path,
            FlatItem::Leaf(leaf) => leaf.path(),
        }
    }

    pub fn level(&self) -> usize {
        match self {
            FlatItem::Section { level, .. } => *level,
            FlatItem::Leaf(leaf) => leaf.level(),
        }
    }

    pub fn is_section(&self) -> bool {
        matches!(self, FlatItem::Section { .. })
    }

    pub fn as_leaf(&self) -> Option<&LeafItem> {
        match self {
            FlatItem::Leaf(leaf) => Some(leaf),
            FlatItem::Section { .. } => None,
        }
    }

    pub fn as_leaf_mut(&mut self) -> Option<&mut LeafItem> {
        match self {
            FlatItem::Leaf(leaf) => Some(leaf),
            FlatItem::Section { .. } => None,
        }
    }
}

//! 变更统计
//!
//! 全部是对当前扁平列表的纯函数，不单独存储任何状态，每次查询都重新计算。

use serde::Serialize;

use crate::flat::{FlatItem, LeafItem};
use crate::utils::EditorError;

/// 编辑统计信息
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ChangeStats {
    /// 叶子条目总数
    pub total: usize,
    /// 已修改的条目数
    pub modified: usize,
    /// 存在空值的条目数
    pub empty: usize,
}

impl ChangeStats {
    pub fn has_changes(&self) -> bool {
        self.modified > 0
    }
}

impl std::fmt::Display for ChangeStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== 翻译统计信息 ===")?;
        writeln!(f, "条目总数: {}", self.total)?;
        writeln!(f, "已修改: {}", self.modified)?;
        writeln!(f, "存在空值: {}", self.empty)?;
        Ok(())
    }
}

/// 条目是否被修改（分组标记永远为否）
pub fn is_modified(item: &FlatItem) -> bool {
    item.as_leaf().is_some_and(LeafItem::is_modified)
}

/// 条目是否有任一语言为空（去除空白后）
pub fn is_empty(item: &FlatItem) -> bool {
    item.as_leaf().is_some_and(LeafItem::has_empty_value)
}

/// 统计所有叶子条目
pub fn stats(items: &[FlatItem]) -> ChangeStats {
    items
        .iter()
        .filter_map(FlatItem::as_leaf)
        .fold(ChangeStats::default(), |mut acc, leaf| {
            acc.total += 1;
            if leaf.is_modified() {
                acc.modified += 1;
            }
            if leaf.has_empty_value() {
                acc.empty += 1;
            }
            acc
        })
}

/// 仅统计某一种语言
pub fn language_stats(items: &[FlatItem], language: &str) -> ChangeStats {
    items
        .iter()
        .filter_map(FlatItem::as_leaf)
        .fold(ChangeStats::default(), |mut acc, leaf| {
            acc.total += 1;
            if leaf.is_language_modified(language) {
                acc.modified += 1;
            }
            if leaf.current(language).map_or(true, |v| v.trim().is_empty()) {
                acc.empty += 1;
            }
            acc
        })
}

/// 是否存在任何修改，决定保存操作是否可用
pub fn has_any_changes(items: &[FlatItem]) -> bool {
    items.iter().any(is_modified)
}

/// 按路径查找叶子条目
pub fn find_leaf<'a>(items: &'a [FlatItem], path: &str) -> Option<&'a LeafItem> {
    items
        .iter()
        .filter_map(FlatItem::as_leaf)
        .find(|leaf| leaf.path().as_str() == path)
}

/// 修改单个条目某语言的当前值，返回旧值
///
/// 不修改原始值，也不改变列表顺序。
pub fn apply_edit(
    items: &mut [FlatItem],
    path: &str,
    language: &str,
    value: impl Into<String>,
) -> Result<String, EditorError> {
    let item = items
        .iter_mut()
        .find(|item| item.path().as_str() == path)
        .ok_or_else(|| EditorError::UnknownPath(path.to_string()))?;
    let leaf = item
        .as_leaf_mut()
        .ok_or_else(|| EditorError::NotALeaf(path.to_string()))?;
    leaf.set_current(language, value)
}

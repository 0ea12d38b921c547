//! 编辑变更追踪模块
//!
//! 该模块实现变更追踪系统，支持撤销/重做功能。
//! 记录会话中对叶子条目的每次修改，便于回滚。

use chrono::{DateTime, Local};

use crate::flat::DotPath;
use crate::tree::LanguageCode;
use crate::utils::{truncate_for_display, EditorError};

/// 编辑变更追踪器
///
/// # 功能
/// - 记录所有叶子值修改操作
/// - 支持撤销/重做
/// - 提供变更历史查询
///
/// # 实现细节
/// - 使用两个栈实现撤销/重做：undo_stack 和 redo_stack
/// - 所有变更按时间顺序存储在 changes 向量中
/// - 栈中存储的是索引而非实际数据，避免数据拷贝
#[derive(Debug, Clone, Default)]
pub struct EditDelta {
    /// 所有变更的完整记录
    changes: Vec<LeafEdit>,
    /// 撤销栈（存储 changes 中的索引）
    undo_stack: Vec<usize>,
    /// 重做栈（存储 changes 中的索引）
    redo_stack: Vec<usize>,
}

/// 单个叶子单一语言的变更
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeafEdit {
    /// 条目路径
    pub path: DotPath,
    /// 语言代码
    pub language: LanguageCode,
    /// 修改前的值
    pub old_value: String,
    /// 修改后的值
    pub new_value: String,
    /// 应用时间
    pub applied_at: DateTime<Local>,
}

impl LeafEdit {
    pub fn new(
        path: DotPath,
        language: impl Into<LanguageCode>,
        old_value: impl Into<String>,
        new_value: impl Into<String>,
    ) -> Self {
        Self {
            path,
            language: language.into(),
            old_value: old_value.into(),
            new_value: new_value.into(),
            applied_at: Local::now(),
        }
    }
}

impl EditDelta {
    /// 创建新的变更追踪器
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加一个变更
    ///
    /// 新操作会使重做栈失效。
    pub fn add_change(&mut self, change: LeafEdit) {
        let index = self.changes.len();
        self.changes.push(change);
        self.undo_stack.push(index);
        self.redo_stack.clear();
    }

    /// 撤销最后一次操作，返回被撤销的变更
    pub fn undo(&mut self) -> Result<&LeafEdit, EditorError> {
        let index = self.undo_stack.pop().ok_or(EditorError::NothingToUndo)?;
        self.redo_stack.push(index);
        Ok(&self.changes[index])
    }

    /// 重做最后一次撤销的操作
    pub fn redo(&mut self) -> Result<&LeafEdit, EditorError> {
        let index = self.redo_stack.pop().ok_or(EditorError::NothingToRedo)?;
        self.undo_stack.push(index);
        Ok(&self.changes[index])
    }

    /// 当前有效变更的数量
    ///
    /// 注意：这是撤销栈的大小，不是总变更数
    pub fn len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.undo_stack.is_empty()
    }

    /// 按应用顺序返回当前有效的变更
    pub fn iter(&self) -> impl Iterator<Item = &LeafEdit> {
        self.undo_stack.iter().map(|&idx| &self.changes[idx])
    }

    /// 获取所有变更（包括已撤销的）
    pub fn all_changes(&self) -> &[LeafEdit] {
        &self.changes
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// 清空所有变更
    pub fn clear(&mut self) {
        self.changes.clear();
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    /// 获取特定条目的所有有效变更
    pub fn changes_for_path(&self, path: &DotPath) -> Vec<&LeafEdit> {
        self.iter().filter(|change| &change.path == path).collect()
    }

    /// 生成变更摘要
    pub fn summary(&self) -> String {
        format!(
            "变更总数: {}, 有效变更: {}, 可撤销: {}, 可重做: {}",
            self.changes.len(),
            self.undo_stack.len(),
            self.can_undo(),
            self.can_redo()
        )
    }
}

impl std::fmt::Display for LeafEdit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}] {}: \"{}\" -> \"{}\"",
            self.language,
            self.path,
            truncate_for_display(&self.old_value, 30),
            truncate_for_display(&self.new_value, 30)
        )
    }
}

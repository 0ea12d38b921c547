/// 扁平化编辑层模块
///
/// 将多语言翻译树按同一键结构展开为有序的可编辑列表，并支持反向重建。
///
/// # 架构设计
///
/// - **item**: 扁平条目类型（分组标记 / 叶子条目）与点路径
/// - **flatten**: 以基准语言为键结构来源的同步先序遍历
/// - **unflatten**: 从编辑后的列表为每种语言重建嵌套树
///
/// # 使用示例
///
/// ```rust,ignore
/// use locale_editor::flat::{flatten, unflatten};
///
/// let languages = vec!["en".to_string(), "es".to_string()];
/// let mut items = flatten(&bundle, &languages);
/// // ... 编辑 items ...
/// let rebuilt = unflatten(&items, &languages);
/// ```
pub mod item;
pub mod flatten;
pub mod unflatten;

// === 导出公共接口 ===
pub use item::{DotPath, FlatItem, LeafItem};
pub use flatten::{flatten, orphan_paths};
pub use unflatten::unflatten;

//! 搜索过滤：按路径或任一语言的文本匹配

use std::collections::HashSet;

use crate::flat::{DotPath, FlatItem};

/// 过滤扁平列表
///
/// 保留路径或任一语言当前值包含查询文本（不区分大小写）的叶子，
/// 以及这些叶子的祖先分组标记，保持原有顺序。查询为空时返回全部条目。
pub fn filter_items<'a>(items: &'a [FlatItem], query: &str) -> Vec<&'a FlatItem> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return items.iter().collect();
    }

    let mut ancestors: HashSet<DotPath> = HashSet::new();
    let mut matched: HashSet<&DotPath> = HashSet::new();

    for leaf in items.iter().filter_map(FlatItem::as_leaf) {
        let hit = leaf.path().as_str().to_lowercase().contains(&query)
            || leaf
                .current_values()
                .values()
                .any(|value| value.to_lowercase().contains(&query));
        if hit {
            matched.insert(leaf.path());
            let mut parent = leaf.path().parent();
            while let Some(path) = parent {
                parent = path.parent();
                if !ancestors.insert(path) {
                    break;
                }
            }
        }
    }

    items
        .iter()
        .filter(|item| match item {
            FlatItem::Section { path, .. } => ancestors.contains(path),
            FlatItem::Leaf(leaf) => matched.contains(leaf.path()),
        })
        .collect()
}

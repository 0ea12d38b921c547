//! 扁平化：多语言树 → 有序条目列表

use std::collections::HashMap;

use crate::tree::{join_path, LanguageCode, Section, TranslationBundle, TranslationNode};
use super::item::{DotPath, FlatItem, LeafItem};

/// 将多语言翻译包展开为扁平列表
///
/// 第一个语言是键结构来源（基准语言），对其树做先序深度优先遍历，
/// 其余语言的树同步下行：
/// - 分组：输出分组标记，再按原顺序递归子节点
/// - 叶子：输出叶子条目，每种语言取同一路径的文本，路径缺失（或该处是分组）时取空字符串
///
/// 只在基准语言中存在的路径会出现在结果中，其余语言独有的键被忽略，
/// 可用 [`orphan_paths`] 查看被忽略的路径。
///
/// # 参数
/// * `bundle` - 翻译包
/// * `languages` - 已选语言，顺序有意义
///
/// # 返回
/// 分组标记总在其后代之前；语言列表为空或基准语言缺失时返回空列表
pub fn flatten(bundle: &TranslationBundle, languages: &[LanguageCode]) -> Vec<FlatItem> {
    let Some(base) = languages.first() else {
        return Vec::new();
    };
    let Some(schema) = bundle.get(base) else {
        tracing::warn!("基准语言 {} 没有翻译树，扁平化结果为空", base);
        return Vec::new();
    };

    let counterparts: Vec<(&str, Option<&Section>)> = languages
        .iter()
        .map(|lang| (lang.as_str(), bundle.get(lang).map(|tree| tree.root())))
        .collect();

    let mut out = Vec::with_capacity(schema.leaf_count() * 2);
    walk(schema.root(), &counterparts, "", &mut out);
    out
}

fn walk<'a>(
    schema: &'a Section,
    counterparts: &[(&'a str, Option<&'a Section>)],
    prefix: &str,
    out: &mut Vec<FlatItem>,
) {
    for (key, node) in schema.iter() {
        let path = join_path(prefix, key);
        match node {
            TranslationNode::Section(children) => {
                out.push(FlatItem::section(DotPath::new(path.clone())));
                let nested: Vec<(&str, Option<&Section>)> = counterparts
                    .iter()
                    .map(|&(lang, section)| {
                        let child = section
                            .and_then(|s| s.get(key))
                            .and_then(TranslationNode::as_section);
                        (lang, child)
                    })
                    .collect();
                walk(children, &nested, &path, out);
            }
            _ => {
                let mut values = HashMap::with_capacity(counterparts.len());
                let mut literals = HashMap::new();
                for &(lang, section) in counterparts {
                    let counterpart = section.and_then(|s| s.get(key));
                    let text = counterpart.and_then(TranslationNode::as_leaf).unwrap_or_default();
                    values.insert(lang.to_string(), text.to_string());
                    if let Some(raw) = counterpart.and_then(TranslationNode::as_literal) {
                        literals.insert(lang.to_string(), raw.clone());
                    }
                }
                let item = LeafItem::new(DotPath::new(path), values).with_literals(literals);
                out.push(FlatItem::Leaf(item));
            }
        }
    }
}

/// 列出非基准语言中存在、但基准语言没有对应叶子的路径
///
/// 这些键在扁平化时被丢弃，保存后也不会写回。
pub fn orphan_paths(bundle: &TranslationBundle, languages: &[LanguageCode]) -> Vec<(LanguageCode, DotPath)> {
    let Some(base) = languages.first() else {
        return Vec::new();
    };
    let schema = bundle.get(base);

    let mut orphans = Vec::new();
    for lang in languages.iter().skip(1) {
        let Some(tree) = bundle.get(lang) else {
            continue;
        };
        for path in tree.leaf_paths() {
            let known = schema.and_then(|s| s.get_leaf(&path)).is_some();
            if !known {
                orphans.push((lang.clone(), DotPath::new(path)));
            }
        }
    }
    orphans
}

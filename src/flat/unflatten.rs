//! 反扁平化：编辑后的条目列表 → 每种语言一棵嵌套树

use crate::tree::{LanguageCode, Section, TranslationBundle, TranslationNode, TranslationTree};
use super::item::FlatItem;

/// 从扁平列表为每种语言重建翻译树
///
/// 各语言独立构建：
/// - 叶子条目按路径逐段下行，中间分组不存在时创建、存在时复用（保持首次出现的顺序），
///   末段写入该语言的当前值；值缺失时写入空字符串，键不会被省略
/// - 源文件中的数组、数字、布尔值或 `null` 未被改动时按原 JSON 值写回，改动后写为字符串
/// - 分组标记不携带文本，只保证对应分组存在，这样没有叶子的空分组也能保留下来
///
/// # 参数
/// * `items` - 扁平列表（通常由 [`super::flatten`] 生成并经过编辑）
/// * `languages` - 要重建的语言
pub fn unflatten(items: &[FlatItem], languages: &[LanguageCode]) -> TranslationBundle {
    languages
        .iter()
        .map(|lang| (lang.clone(), build_tree(items, lang)))
        .collect()
}

fn build_tree(items: &[FlatItem], language: &str) -> TranslationTree {
    let mut tree = TranslationTree::new();

    for item in items {
        match item {
            FlatItem::Section { path, .. } => {
                let mut section = tree.root_mut();
                for segment in path.segments() {
                    section = section.section_entry(segment);
                }
            }
            FlatItem::Leaf(leaf) => {
                let segments: Vec<&str> = leaf.path().segments().collect();
                let Some((last, parents)) = segments.split_last() else {
                    continue;
                };
                let section = descend(tree.root_mut(), parents);
                let node = match leaf.unchanged_literal(language) {
                    Some(raw) => TranslationNode::literal(raw.clone()),
                    None => TranslationNode::leaf(leaf.current(language).unwrap_or_default()),
                };
                section.insert(*last, node);
            }
        }
    }

    tree
}

fn descend<'a>(mut section: &'a mut Section, segments: &[&str]) -> &'a mut Section {
    for segment in segments {
        section = section.section_entry(segment);
    }
    section
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flat::{flatten, DotPath, LeafItem};
    use serde_json::json;
    use std::collections::HashMap;

    fn langs(codes: &[&str]) -> Vec<LanguageCode> {
        codes.iter().map(|c| c.to_string()).collect()
    }

    fn tree(value: serde_json::Value) -> TranslationTree {
        TranslationTree::from_json_value(&value).unwrap()
    }

    #[test]
    fn test_roundtrip_preserves_structure_and_order() {
        let en = tree(json!({
            "nav": {"home": "Home", "sales": {"title": "Sales", "new": "New sale"}},
            "empty": {},
            "footer": "Footer"
        }));
        let es = tree(json!({
            "nav": {"home": "Inicio", "sales": {"title": "Ventas", "new": "Nueva venta"}},
            "empty": {},
            "footer": "Pie"
        }));
        let languages = langs(&["en", "es"]);
        let bundle: TranslationBundle = vec![("en".to_string(), en), ("es".to_string(), es)]
            .into_iter()
            .collect();

        let items = flatten(&bundle, &languages);
        let rebuilt = unflatten(&items, &languages);

        assert_eq!(rebuilt, bundle);
        assert_eq!(flatten(&rebuilt, &languages), items);
    }

    #[test]
    fn test_edit_then_unflatten_only_changes_edited_language() {
        let languages = langs(&["en", "es"]);
        let bundle: TranslationBundle = vec![
            ("en".to_string(), tree(json!({"categories": {"title": "Categories"}}))),
            ("es".to_string(), tree(json!({"categories": {"title": "Categorías"}}))),
        ]
        .into_iter()
        .collect();

        let mut items = flatten(&bundle, &languages);
        items[1]
            .as_leaf_mut()
            .unwrap()
            .set_current("en", "My Categories")
            .unwrap();

        let rebuilt = unflatten(&items, &languages);
        assert_eq!(
            rebuilt.get("en").unwrap().to_json_value(),
            json!({"categories": {"title": "My Categories"}})
        );
        assert_eq!(rebuilt.get("es"), bundle.get("es"));
    }

    #[test]
    fn test_untouched_non_string_values_keep_json_type() {
        let languages = langs(&["en", "es"]);
        let bundle: TranslationBundle = vec![
            ("en".to_string(), tree(json!({"limits": {"max": 20, "tags": ["a", "b"]}, "beta": true}))),
            ("es".to_string(), tree(json!({"limits": {"max": "veinte", "tags": null}, "beta": false}))),
        ]
        .into_iter()
        .collect();

        let mut items = flatten(&bundle, &languages);
        let unchanged = unflatten(&items, &languages);
        assert_eq!(unchanged, bundle);

        let beta = items.iter_mut().find(|item| item.path().as_str() == "beta").unwrap();
        beta.as_leaf_mut().unwrap().set_current("en", "yes").unwrap();

        let rebuilt = unflatten(&items, &languages);
        assert_eq!(
            rebuilt.get("en").unwrap().to_json_value(),
            json!({"limits": {"max": 20, "tags": ["a", "b"]}, "beta": "yes"})
        );
        assert_eq!(
            rebuilt.get("es").unwrap().to_json_value(),
            json!({"limits": {"max": "veinte", "tags": null}, "beta": false})
        );
    }

    #[test]
    fn test_missing_value_produces_empty_leaf() {
        let mut values = HashMap::new();
        values.insert("en".to_string(), "Hello".to_string());
        let items = vec![FlatItem::Leaf(LeafItem::new(DotPath::from("greeting.hello"), values))];

        let rebuilt = unflatten(&items, &langs(&["en", "fr"]));
        assert_eq!(rebuilt.get("fr").unwrap().get_leaf("greeting.hello"), Some(""));
        assert_eq!(rebuilt.get("en").unwrap().get_leaf("greeting.hello"), Some("Hello"));
    }

    #[test]
    fn test_leaves_without_markers_create_sections_in_first_seen_order() {
        let leaf = |path: &str, text: &str| {
            let mut values = HashMap::new();
            values.insert("en".to_string(), text.to_string());
            FlatItem::Leaf(LeafItem::new(DotPath::from(path), values))
        };
        let items = vec![
            leaf("b.x", "1"),
            leaf("a", "2"),
            leaf("b.y", "3"),
            leaf("c.d.e", "4"),
        ];

        let rebuilt = unflatten(&items, &langs(&["en"]));
        assert_eq!(
            serde_json::to_string(rebuilt.get("en").unwrap()).unwrap(),
            r#"{"b":{"x":"1","y":"3"},"a":"2","c":{"d":{"e":"4"}}}"#
        );
    }

    #[test]
    fn test_no_languages_yields_empty_bundle() {
        let items = vec![FlatItem::section(DotPath::from("a"))];
        assert!(unflatten(&items, &[]).is_empty());
    }
}

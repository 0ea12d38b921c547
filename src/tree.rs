//! 翻译树数据模型
//!
//! 每种语言的翻译文本是一棵嵌套树：节点要么是叶子（文本），要么是分组（有序子节点）。
//! 树只在解析时构造一次，之后所有遍历代码都对 `TranslationNode` 做模式匹配，
//! 不再在每一步探测值的形状。

use std::collections::HashMap;
use std::fmt;

use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;
use thiserror::Error;

/// 语言代码（如 "en"、"es"），不做任何格式校验
pub type LanguageCode = String;

/// 路径分隔符
pub const PATH_SEPARATOR: char = '.';

/// 树构造错误
#[derive(Error, Debug)]
pub enum MalformedTreeError {
    #[error("Duplicate key: {0}")]
    DuplicateKey(String),

    #[error("Invalid key {0:?}: keys must be non-empty and must not contain '.'")]
    InvalidKey(String),

    #[error("Root of a translation tree must be an object")]
    RootNotSection,

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// 翻译树节点
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslationNode {
    /// 终端文本
    Leaf(String),
    /// 源文件中的非字符串值（数组、数字、布尔、null），
    /// `text` 为编辑时看到的文本，写回时输出 `raw`
    Literal { text: String, raw: Value },
    /// 内部节点，子键保持插入顺序
    Section(Section),
}

impl TranslationNode {
    /// 创建叶子节点
    pub fn leaf(text: impl Into<String>) -> Self {
        TranslationNode::Leaf(text.into())
    }

    /// 由非字符串 JSON 值创建叶子
    ///
    /// 数组取紧凑 JSON 文本，数字与布尔取其文本，`null` 为空字符串。
    pub fn literal(raw: Value) -> Self {
        let text = literal_text(&raw);
        TranslationNode::Literal { text, raw }
    }

    /// 叶子文本（`Leaf` 与 `Literal`）
    pub fn as_leaf(&self) -> Option<&str> {
        match self {
            TranslationNode::Leaf(text) | TranslationNode::Literal { text, .. } => Some(text),
            TranslationNode::Section(_) => None,
        }
    }

    /// 非字符串叶子的原始 JSON 值
    pub fn as_literal(&self) -> Option<&Value> {
        match self {
            TranslationNode::Literal { raw, .. } => Some(raw),
            _ => None,
        }
    }

    pub fn as_section(&self) -> Option<&Section> {
        match self {
            TranslationNode::Section(section) => Some(section),
            _ => None,
        }
    }

    pub fn is_section(&self) -> bool {
        matches!(self, TranslationNode::Section(_))
    }

    fn to_json_value(&self) -> Value {
        match self {
            TranslationNode::Leaf(text) => Value::String(text.clone()),
            TranslationNode::Literal { raw, .. } => raw.clone(),
            TranslationNode::Section(section) => section.to_json_value(),
        }
    }
}

/// 有序分组
///
/// 键在同一分组内唯一，顺序即首次插入顺序。
/// 翻译文件的分组通常只有几十个键，线性查找足够。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Section {
    entries: Vec<(String, TranslationNode)>,
}

impl Section {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 按键查找子节点
    pub fn get(&self, key: &str) -> Option<&TranslationNode> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, node)| node)
    }

    /// 按插入顺序遍历子节点
    pub fn iter(&self) -> impl Iterator<Item = (&str, &TranslationNode)> {
        self.entries.iter().map(|(k, node)| (k.as_str(), node))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// 插入或替换子节点（不校验键，键来自已校验的点路径）
    ///
    /// 已存在的键原位替换（保持顺序），返回旧节点；新键追加到末尾。
    pub(crate) fn insert(&mut self, key: impl Into<String>, node: TranslationNode) -> Option<TranslationNode> {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, node)),
            None => {
                self.entries.push((key, node));
                None
            }
        }
    }

    /// 校验后插入，键非法或重复时返回错误
    pub fn try_insert(&mut self, key: impl Into<String>, node: TranslationNode) -> Result<(), MalformedTreeError> {
        let key = key.into();
        validate_key(&key)?;
        if self.get(&key).is_some() {
            return Err(MalformedTreeError::DuplicateKey(key));
        }
        self.entries.push((key, node));
        Ok(())
    }

    /// 校验后获取子分组，不存在时创建
    pub fn try_section_entry(&mut self, key: &str) -> Result<&mut Section, MalformedTreeError> {
        validate_key(key)?;
        Ok(self.section_entry(key))
    }

    /// 获取子分组，不存在时创建（不校验键）
    ///
    /// 重复调用复用同一节点；若该键当前是叶子，则以空分组替换。
    pub(crate) fn section_entry(&mut self, key: &str) -> &mut Section {
        let index = match self.entries.iter().position(|(k, _)| k == key) {
            Some(index) => {
                if !self.entries[index].1.is_section() {
                    self.entries[index].1 = TranslationNode::Section(Section::new());
                }
                index
            }
            None => {
                self.entries
                    .push((key.to_string(), TranslationNode::Section(Section::new())));
                self.entries.len() - 1
            }
        };

        match &mut self.entries[index].1 {
            TranslationNode::Section(section) => section,
            _ => unreachable!("entry was converted to a section above"),
        }
    }

    /// 统计叶子数量（递归）
    pub fn leaf_count(&self) -> usize {
        self.entries
            .iter()
            .map(|(_, node)| match node {
                TranslationNode::Section(section) => section.leaf_count(),
                _ => 1,
            })
            .sum()
    }

    fn to_json_value(&self) -> Value {
        let mut map = serde_json::Map::with_capacity(self.entries.len());
        for (key, node) in &self.entries {
            map.insert(key.clone(), node.to_json_value());
        }
        Value::Object(map)
    }

    fn collect_leaf_paths(&self, prefix: &str, out: &mut Vec<String>) {
        for (key, node) in &self.entries {
            let path = join_path(prefix, key);
            match node {
                TranslationNode::Section(section) => section.collect_leaf_paths(&path, out),
                _ => out.push(path),
            }
        }
    }
}

/// 单种语言的完整翻译树（根节点必为分组）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslationTree {
    root: Section,
}

impl TranslationTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_section(root: Section) -> Self {
        Self { root }
    }

    /// 从节点构造，根必须是分组
    pub fn from_node(node: TranslationNode) -> Result<Self, MalformedTreeError> {
        match node {
            TranslationNode::Section(root) => Ok(Self { root }),
            _ => Err(MalformedTreeError::RootNotSection),
        }
    }

    /// 解析 JSON 文本
    ///
    /// 数组、数字、布尔值和 `null` 作为 [`TranslationNode::Literal`] 叶子保存：
    /// 编辑时以文本出现（`null` 为空字符串），文本未被改动时原样写回原始 JSON 值，
    /// 改动后写回字符串。
    pub fn from_json_str(json: &str) -> Result<Self, MalformedTreeError> {
        Ok(serde_json::from_str(json)?)
    }

    /// 从读取器流式解析，不限制大小
    pub fn from_json_reader<R: std::io::Read>(reader: R) -> Result<Self, MalformedTreeError> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, MalformedTreeError> {
        Ok(serde_json::from_slice(bytes)?)
    }

    pub fn from_json_value(value: &Value) -> Result<Self, MalformedTreeError> {
        Ok(TranslationTree::deserialize(value)?)
    }

    pub fn to_json_value(&self) -> Value {
        self.root.to_json_value()
    }

    pub fn to_json_string_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn root(&self) -> &Section {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Section {
        &mut self.root
    }

    /// 按点路径查找节点
    pub fn get(&self, path: &str) -> Option<&TranslationNode> {
        let mut segments = path.split(PATH_SEPARATOR);
        let first = segments.next()?;
        let mut node = self.root.get(first)?;
        for segment in segments {
            node = node.as_section()?.get(segment)?;
        }
        Some(node)
    }

    /// 按点路径查找叶子文本
    pub fn get_leaf(&self, path: &str) -> Option<&str> {
        self.get(path).and_then(TranslationNode::as_leaf)
    }

    /// 先序列出所有叶子路径
    pub fn leaf_paths(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.root.collect_leaf_paths("", &mut out);
        out
    }

    pub fn leaf_count(&self) -> usize {
        self.root.leaf_count()
    }
}

/// 多语言翻译包：语言代码 → 翻译树
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslationBundle {
    trees: HashMap<LanguageCode, TranslationTree>,
}

impl TranslationBundle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, language: impl Into<LanguageCode>, tree: TranslationTree) -> Option<TranslationTree> {
        self.trees.insert(language.into(), tree)
    }

    pub fn get(&self, language: &str) -> Option<&TranslationTree> {
        self.trees.get(language)
    }

    pub fn contains(&self, language: &str) -> bool {
        self.trees.contains_key(language)
    }

    pub fn len(&self) -> usize {
        self.trees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trees.is_empty()
    }

    /// 语言代码（无序）
    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.trees.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TranslationTree)> {
        self.trees.iter().map(|(lang, tree)| (lang.as_str(), tree))
    }

    /// 按给定语言顺序导出为 `{ lang: tree }` JSON 对象，缺失的语言被跳过
    pub fn to_json_value(&self, order: &[LanguageCode]) -> Value {
        let mut map = serde_json::Map::new();
        for language in order {
            if let Some(tree) = self.trees.get(language) {
                map.insert(language.clone(), tree.to_json_value());
            }
        }
        Value::Object(map)
    }
}

impl FromIterator<(LanguageCode, TranslationTree)> for TranslationBundle {
    fn from_iter<I: IntoIterator<Item = (LanguageCode, TranslationTree)>>(iter: I) -> Self {
        Self {
            trees: iter.into_iter().collect(),
        }
    }
}

/// 拼接点路径
pub fn join_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{}{}{}", prefix, PATH_SEPARATOR, key)
    }
}

/// 非字符串值在编辑时显示的文本
pub(crate) fn literal_text(raw: &Value) -> String {
    match raw {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        Value::Bool(flag) => flag.to_string(),
        Value::Number(number) => number.to_string(),
        other => other.to_string(),
    }
}

fn validate_key(key: &str) -> Result<(), MalformedTreeError> {
    if key.is_empty() || key.contains(PATH_SEPARATOR) {
        return Err(MalformedTreeError::InvalidKey(key.to_string()));
    }
    Ok(())
}

// === serde ===

impl Serialize for TranslationNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            TranslationNode::Leaf(text) => serializer.serialize_str(text),
            TranslationNode::Literal { raw, .. } => raw.serialize(serializer),
            TranslationNode::Section(section) => section.serialize(serializer),
        }
    }
}

impl Serialize for Section {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, node) in &self.entries {
            map.serialize_entry(key, node)?;
        }
        map.end()
    }
}

impl Serialize for TranslationTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.root.serialize(serializer)
    }
}

struct NodeVisitor;

impl<'de> Visitor<'de> for NodeVisitor {
    type Value = TranslationNode;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a translation string or a nested object")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(TranslationNode::Leaf(v.to_owned()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
        Ok(TranslationNode::Leaf(v))
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
        Ok(TranslationNode::literal(Value::Bool(v)))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(TranslationNode::literal(Value::from(v)))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(TranslationNode::literal(Value::from(v)))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Ok(TranslationNode::literal(Value::from(v)))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(TranslationNode::literal(Value::Null))
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(TranslationNode::literal(Value::Null))
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        TranslationNode::deserialize(deserializer)
    }

    // 数组不作为分组遍历，整体作为一个叶子
    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let mut items = Vec::new();
        while let Some(item) = seq.next_element::<Value>()? {
            items.push(item);
        }
        Ok(TranslationNode::literal(Value::Array(items)))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut section = Section::new();
        while let Some(key) = map.next_key::<String>()? {
            let node: TranslationNode = map.next_value()?;
            section.try_insert(key, node).map_err(de::Error::custom)?;
        }
        Ok(TranslationNode::Section(section))
    }
}

impl<'de> Deserialize<'de> for TranslationNode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(NodeVisitor)
    }
}

impl<'de> Deserialize<'de> for TranslationTree {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let node = TranslationNode::deserialize(deserializer)?;
        TranslationTree::from_node(node).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_preserves_key_order() {
        let tree = TranslationTree::from_json_str(
            r#"{"zeta": "Z", "alpha": {"b": "B", "a": "A"}, "mid": "M"}"#,
        )
        .unwrap();

        let keys: Vec<&str> = tree.root().keys().collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
        assert_eq!(tree.leaf_paths(), vec!["zeta", "alpha.b", "alpha.a", "mid"]);
    }

    #[test]
    fn test_non_string_values_become_leaves() {
        let tree = TranslationTree::from_json_value(&json!({
            "list": ["a", "b"],
            "count": 3,
            "flag": true,
            "none": null
        }))
        .unwrap();

        assert_eq!(tree.get_leaf("list"), Some(r#"["a","b"]"#));
        assert_eq!(tree.get_leaf("count"), Some("3"));
        assert_eq!(tree.get_leaf("flag"), Some("true"));
        assert_eq!(tree.get_leaf("none"), Some(""));
    }

    #[test]
    fn test_non_string_values_keep_raw_json() {
        let source = r#"{"list":["a",1],"count":3,"ratio":1.5,"flag":false,"none":null,"text":"t"}"#;
        let tree = TranslationTree::from_json_str(source).unwrap();

        assert_eq!(tree.get("count").and_then(|n| n.as_literal()), Some(&json!(3)));
        assert_eq!(tree.get("text").and_then(|n| n.as_literal()), None);
        assert_eq!(serde_json::to_string(&tree).unwrap(), source);
        assert_eq!(serde_json::to_string(&tree.to_json_value()).unwrap(), source);
    }

    #[test]
    fn test_duplicate_key_rejected() {
        let result = TranslationTree::from_json_str(r#"{"a": "1", "a": "2"}"#);
        assert!(result.is_err());

        let mut section = Section::new();
        section.try_insert("a", TranslationNode::leaf("1")).unwrap();
        assert!(matches!(
            section.try_insert("a", TranslationNode::leaf("2")),
            Err(MalformedTreeError::DuplicateKey(_))
        ));
    }

    #[test]
    fn test_dotted_key_rejected() {
        let result = TranslationTree::from_json_str(r#"{"a.b": "x"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_builders_reject_dotted_key() {
        let mut root = Section::new();
        root.try_section_entry("a")
            .unwrap()
            .try_insert("b", TranslationNode::leaf("nested"))
            .unwrap();

        // "a.b" 会与上面的嵌套路径冲突
        assert!(matches!(
            root.try_insert("a.b", TranslationNode::leaf("flat")),
            Err(MalformedTreeError::InvalidKey(_))
        ));
        assert!(matches!(
            root.try_section_entry("a.b"),
            Err(MalformedTreeError::InvalidKey(_))
        ));
        assert!(matches!(root.try_section_entry(""), Err(MalformedTreeError::InvalidKey(_))));

        let tree = TranslationTree::from_node(TranslationNode::Section(root)).unwrap();
        assert_eq!(tree.leaf_paths(), vec!["a.b"]);
        assert_eq!(tree.get_leaf("a.b"), Some("nested"));
    }

    #[test]
    fn test_root_must_be_object() {
        assert!(TranslationTree::from_json_str(r#""just text""#).is_err());
        assert!(matches!(
            TranslationTree::from_node(TranslationNode::leaf("x")),
            Err(MalformedTreeError::RootNotSection)
        ));
    }

    #[test]
    fn test_get_by_path() {
        let tree = TranslationTree::from_json_value(&json!({
            "categories": {"title": "Categories", "form": {"name": "Name"}}
        }))
        .unwrap();

        assert_eq!(tree.get_leaf("categories.title"), Some("Categories"));
        assert_eq!(tree.get_leaf("categories.form.name"), Some("Name"));
        assert!(tree.get("categories").unwrap().as_section().is_some());
        assert_eq!(tree.get_leaf("categories"), None);
        assert!(tree.get("categories.missing").is_none());
        assert!(tree.get("categories.title.deeper").is_none());
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let mut section = Section::new();
        section.insert("a", TranslationNode::leaf("1"));
        section.insert("b", TranslationNode::leaf("2"));
        let old = section.insert("a", TranslationNode::leaf("3"));

        assert_eq!(old, Some(TranslationNode::leaf("1")));
        let keys: Vec<&str> = section.keys().collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(section.get("a").and_then(|n| n.as_leaf()), Some("3"));
    }

    #[test]
    fn test_section_entry_is_idempotent() {
        let mut root = Section::new();
        root.section_entry("a").insert("x", TranslationNode::leaf("1"));
        root.section_entry("b");
        root.section_entry("a").insert("y", TranslationNode::leaf("2"));

        let keys: Vec<&str> = root.keys().collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(root.get("a").unwrap().as_section().unwrap().len(), 2);
    }

    #[test]
    fn test_serialize_roundtrip_keeps_order() {
        let source = r#"{"b":{"y":"Y","x":"X"},"a":"A"}"#;
        let tree = TranslationTree::from_json_str(source).unwrap();
        assert_eq!(serde_json::to_string(&tree).unwrap(), source);
        assert_eq!(serde_json::to_string(&tree.to_json_value()).unwrap(), source);
    }

    #[test]
    fn test_bundle_json_export_order() {
        let en = TranslationTree::from_json_str(r#"{"a":"A"}"#).unwrap();
        let es = TranslationTree::from_json_str(r#"{"a":"Á"}"#).unwrap();
        let bundle: TranslationBundle = vec![("es".to_string(), es), ("en".to_string(), en)]
            .into_iter()
            .collect();

        let order = vec!["en".to_string(), "es".to_string(), "fr".to_string()];
        let exported = serde_json::to_string(&bundle.to_json_value(&order)).unwrap();
        assert_eq!(exported, r#"{"en":{"a":"A"},"es":{"a":"Á"}}"#);
    }
}

pub mod tree;
pub mod flat;
pub mod editor;
pub mod io;
pub mod resolver;
pub mod dispatcher;
pub mod notice;
pub mod config;
pub mod utils;

// 重新导出主要结构
pub use tree::{LanguageCode, MalformedTreeError, TranslationBundle, TranslationNode, TranslationTree};
pub use flat::{flatten, unflatten, DotPath, FlatItem, LeafItem};
pub use editor::{ChangeStats, TranslationEditor};
pub use resolver::{Provenance, ResolvedBundle, SourceResolver};
pub use dispatcher::{PartialFailure, SaveReport};
pub use notice::{Notice, NoticeLevel};
pub use config::EditorConfig;
pub use utils::EditorError;

// 常量定义
/// 默认的结构基准语言
pub const DEFAULT_BASE_LANGUAGE: &str = "en";

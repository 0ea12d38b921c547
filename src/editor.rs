/// 编辑器层模块
///
/// 该模块提供有状态的编辑接口，支持变更追踪、撤销/重做等高级功能。
/// 遵循"修改-保存分离"原则，所有修改操作仅在内存中进行，需要显式调用保存。
///
/// # 架构设计
///
/// - **session**: 编辑会话，串联来源解析、扁平化、统计与保存
/// - **delta**: 变更追踪系统，支持撤销/重做
/// - **stats**: 修改/空值统计（纯函数）
/// - **filter**: 按路径或文本筛选条目
///
/// # 使用示例
///
/// ```rust,ignore
/// use locale_editor::editor::TranslationEditor;
/// use locale_editor::io::{BundledFallback, HttpTranslationApi, InMemoryRuntime, DEFAULT_TIMEOUT};
///
/// // 加载 + 编辑 + 保存工作流
/// let api = HttpTranslationApi::new("https://admin.example.com/api", DEFAULT_TIMEOUT);
/// let mut editor = TranslationEditor::new(api, BundledFallback, InMemoryRuntime::new("es"));
///
/// editor.load(&["en".to_string(), "es".to_string()])?;
/// editor.set_value("categories.title", "es", "Mis categorías")?;
/// println!("{}", editor.stats());
///
/// editor.save()?;
/// ```
pub mod delta;
pub mod stats;
pub mod filter;
pub mod session;

// === 导出公共接口 ===
pub use delta::{EditDelta, LeafEdit};
pub use stats::{apply_edit, find_leaf, has_any_changes, is_empty, is_modified, language_stats, stats, ChangeStats};
pub use filter::filter_items;
pub use session::{LoadTicket, SaveTicket, TranslationEditor};

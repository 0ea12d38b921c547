/// IO 抽象层模块
///
/// 该模块提供了外部协作方的抽象接口，遵循依赖倒置原则。
/// 支持依赖注入、测试 mock 和替换实现（HTTP、本地目录、内存等）。
///
/// # 架构设计
///
/// - **traits**: 定义 TranslationApi / FallbackProvider / I18nRuntime 接口
/// - **http_api**: 远程翻译 API 的 HTTP 实现
/// - **file_store**: 本地目录存储实现
/// - **fallback**: 随程序打包的回退语言包
/// - **runtime**: 内存 i18n 运行时
///
/// # 使用示例
///
/// ```rust,ignore
/// use locale_editor::io::{HttpTranslationApi, TranslationApi};
///
/// let api = HttpTranslationApi::new("https://admin.example.com/api", DEFAULT_TIMEOUT);
/// let tree = api.fetch("es")?;
/// ```
pub mod traits;
pub mod http_api;
pub mod file_store;
pub mod fallback;
pub mod runtime;

// === 导出 trait 定义 ===
pub use traits::{ApiError, FallbackProvider, I18nRuntime, TranslationApi};

// === 导出默认实现 ===
pub use http_api::{HttpTranslationApi, DEFAULT_TIMEOUT};
pub use file_store::FileTranslationStore;
pub use fallback::{BundledFallback, StaticFallback};
pub use runtime::InMemoryRuntime;

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use locale_editor::io::{BundledFallback, FileTranslationStore, HttpTranslationApi, InMemoryRuntime, TranslationApi};
use locale_editor::utils::truncate_for_display;
use locale_editor::{EditorConfig, FlatItem, LanguageCode, TranslationEditor};

#[derive(Parser)]
#[command(name = "locale_editor")]
#[command(about = "多语言翻译包编辑工具：加载、修改并保存嵌套 JSON 翻译")]
#[command(version = "0.1.0")]
struct Cli {
    /// 配置文件路径（JSON）
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// 远程翻译 API 地址
    #[arg(long)]
    api: Option<String>,

    /// 本地翻译目录（<dir>/<lang>.json）
    #[arg(long)]
    store: Option<PathBuf>,

    /// 编辑的语言，逗号分隔，第一个为结构基准
    #[arg(short, long, value_delimiter = ',')]
    languages: Vec<String>,

    /// 当前界面语言
    #[arg(long)]
    active: Option<String>,

    /// 显示统计信息
    #[arg(long)]
    stats: bool,

    /// 列出所有条目
    #[arg(long)]
    list: bool,

    /// 按路径或文本筛选列出的条目
    #[arg(long)]
    filter: Option<String>,

    /// 修改条目：<lang>:<path>=<value>，可重复
    #[arg(long = "set")]
    edits: Vec<String>,

    /// 将重建后的翻译包导出为 JSON 文件
    #[arg(long)]
    export: Option<PathBuf>,

    /// 静默模式(仅输出错误)
    #[arg(long)]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.quiet);

    let config = build_config(&cli)?;
    let api = build_api(&config)?;
    let runtime = InMemoryRuntime::new(config.active_language.clone());

    let mut editor = TranslationEditor::new(api, BundledFallback, runtime)
        .with_notice_ttl(config.notice_ttl());
    editor
        .load(&config.languages)
        .context("加载翻译失败")?;

    if !cli.quiet {
        for language in editor.languages() {
            if let Some(provenance) = editor.provenance(language) {
                println!("{}: {}", language, provenance);
            }
        }
    }

    let edits = cli
        .edits
        .iter()
        .map(String::as_str)
        .map(parse_edit)
        .collect::<Result<Vec<_>>>()?;
    for (language, path, value) in &edits {
        editor
            .set_value(path, language, value.as_str())
            .with_context(|| format!("无法修改 {}:{}", language, path))?;
    }

    if cli.list || cli.filter.is_some() {
        let query = cli.filter.as_deref().unwrap_or("");
        print_items(&editor.filtered(query), editor.languages());
    }

    if cli.stats {
        println!("{}", editor.stats());
        for language in editor.languages() {
            let stats = editor.language_stats(language);
            println!("{}: 已修改 {} / 空值 {}", language, stats.modified, stats.empty);
        }
    }

    if editor.has_any_changes() {
        let report = editor.save().context("保存翻译失败")?;
        if !cli.quiet {
            println!("已保存: {}", report.saved.join(", "));
            if let Some(language) = report.hot_swapped {
                println!("已热替换当前语言: {}", language);
            }
        }
    }

    if let Some(export_path) = &cli.export {
        let bundle = editor.export_bundle();
        let json = serde_json::to_string_pretty(&bundle.to_json_value(editor.languages()))?;
        std::fs::write(export_path, json)
            .with_context(|| format!("写入导出文件失败: {:?}", export_path))?;
        if !cli.quiet {
            println!("已导出到: {:?}", export_path);
        }
    }

    Ok(())
}

/// 初始化日志输出，`RUST_LOG` 优先
fn init_logging(quiet: bool) {
    let default_level = if quiet { "error" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// 读取配置文件并用命令行参数覆盖
fn build_config(cli: &Cli) -> Result<EditorConfig> {
    let mut config = match &cli.config {
        Some(path) => EditorConfig::load(path).with_context(|| format!("读取配置文件失败: {:?}", path))?,
        None => EditorConfig::default(),
    };

    if let Some(api) = &cli.api {
        config.api_base_url = Some(api.clone());
    }
    if let Some(store) = &cli.store {
        config.store_dir = Some(store.clone());
    }
    if !cli.languages.is_empty() {
        config.languages = cli.languages.clone();
    }
    if let Some(active) = &cli.active {
        config.active_language = active.clone();
    }

    if config.languages.is_empty() {
        bail!("至少需要一种语言");
    }
    Ok(config)
}

fn build_api(config: &EditorConfig) -> Result<Box<dyn TranslationApi>> {
    if let Some(base_url) = &config.api_base_url {
        return Ok(Box::new(HttpTranslationApi::new(base_url.clone(), config.timeout())));
    }
    if let Some(dir) = &config.store_dir {
        return Ok(Box::new(
            FileTranslationStore::new(dir.clone()).with_backup(config.backup_on_save),
        ));
    }
    bail!("需要指定 --api 或 --store（或在配置文件中设置）")
}

/// 解析 `<lang>:<path>=<value>`
fn parse_edit(raw: &str) -> Result<(LanguageCode, String, String)> {
    let (language, rest) = raw
        .split_once(':')
        .with_context(|| format!("格式错误（缺少语言）: {}", raw))?;
    let (path, value) = rest
        .split_once('=')
        .with_context(|| format!("格式错误（缺少 =）: {}", raw))?;
    if language.is_empty() || path.is_empty() {
        bail!("格式错误: {}", raw);
    }
    Ok((language.to_string(), path.to_string(), value.to_string()))
}

fn print_items(items: &[&FlatItem], languages: &[LanguageCode]) {
    for item in items {
        let indent = "  ".repeat(item.level());
        match item {
            FlatItem::Section { path, .. } => println!("{}[{}]", indent, path),
            FlatItem::Leaf(leaf) => {
                let marker = if leaf.is_modified() { "*" } else { " " };
                println!("{}{}{}", indent, marker, leaf.path());
                for language in languages {
                    let value = leaf.current(language).unwrap_or("");
                    println!("{}    {}: \"{}\"", indent, language, truncate_for_display(value, 60));
                }
            }
        }
    }
}

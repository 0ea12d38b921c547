//! 编辑会话
//!
//! 在纯函数引擎（flatten / stats / unflatten / save）之上保存编辑状态：
//! 已选语言、扁平列表、来源、加载与保存标志、撤销历史和待显示的提示。

use std::collections::HashMap;

use chrono::{DateTime, Local};

use super::delta::{EditDelta, LeafEdit};
use super::filter::filter_items;
use super::stats::{self, ChangeStats};
use crate::dispatcher::{self, PartialFailure, SaveReport};
use crate::flat::{flatten, orphan_paths, unflatten, DotPath, FlatItem};
use crate::io::{FallbackProvider, I18nRuntime, TranslationApi};
use crate::notice::{Notice, DEFAULT_NOTICE_TTL_SECS};
use crate::resolver::{Provenance, ResolvedBundle, SourceResolver};
use crate::tree::{LanguageCode, TranslationBundle};
use crate::utils::EditorError;

/// 一次加载请求的标记
///
/// 只有最新一次 `begin_load` 返回的标记能够提交结果。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
}

impl LoadTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// 一次保存请求
///
/// 持有 `begin_save` 时由当前值重建的翻译包；保存期间的新编辑不在其中。
#[derive(Debug, Clone)]
pub struct SaveTicket {
    bundle: TranslationBundle,
    languages: Vec<LanguageCode>,
    active_language: LanguageCode,
}

impl SaveTicket {
    pub fn bundle(&self) -> &TranslationBundle {
        &self.bundle
    }

    pub fn languages(&self) -> &[LanguageCode] {
        &self.languages
    }

    pub fn active_language(&self) -> &str {
        &self.active_language
    }
}

/// 多语言翻译编辑会话
pub struct TranslationEditor<A, F, R> {
    api: A,
    fallback: F,
    runtime: R,
    languages: Vec<LanguageCode>,
    items: Vec<FlatItem>,
    provenance: HashMap<LanguageCode, Provenance>,
    delta: EditDelta,
    loading: bool,
    saving: bool,
    generation: u64,
    notices: Vec<Notice>,
    notice_ttl: chrono::Duration,
}

impl<A, F, R> TranslationEditor<A, F, R>
where
    A: TranslationApi,
    F: FallbackProvider,
    R: I18nRuntime,
{
    pub fn new(api: A, fallback: F, runtime: R) -> Self {
        Self {
            api,
            fallback,
            runtime,
            languages: Vec::new(),
            items: Vec::new(),
            provenance: HashMap::new(),
            delta: EditDelta::new(),
            loading: false,
            saving: false,
            generation: 0,
            notices: Vec::new(),
            notice_ttl: chrono::Duration::seconds(DEFAULT_NOTICE_TTL_SECS as i64),
        }
    }

    pub fn with_notice_ttl(mut self, ttl: chrono::Duration) -> Self {
        self.notice_ttl = ttl;
        self
    }

    /// 加载一组语言（所选语言变化时也调用）
    ///
    /// 第一个语言作为结构基准。任一语言远程与回退都不可用时保持加载前的状态，
    /// 并产生一条错误提示。
    pub fn load(&mut self, languages: &[LanguageCode]) -> Result<(), EditorError> {
        let ticket = self.begin_load();
        let resolved = SourceResolver::new(&self.api, &self.fallback).resolve(languages);

        match resolved {
            Ok(resolved) => self.finish_load(ticket, languages, resolved),
            Err(e) => {
                if ticket.generation == self.generation {
                    self.loading = false;
                }
                self.notices.push(Notice::error(format!("Failed to load translations: {}", e)));
                Err(e)
            }
        }
    }

    /// 开始一次加载，之前尚未提交的加载随之失效
    pub fn begin_load(&mut self) -> LoadTicket {
        self.generation += 1;
        self.loading = true;
        LoadTicket {
            generation: self.generation,
        }
    }

    /// 提交加载结果
    ///
    /// # 返回
    /// 标记已被更新的加载取代时返回 `StaleLoad`，状态保持不变
    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        languages: &[LanguageCode],
        resolved: ResolvedBundle,
    ) -> Result<(), EditorError> {
        if ticket.generation != self.generation {
            tracing::warn!(
                "丢弃过期的加载结果 (generation {}, 当前 {})",
                ticket.generation,
                self.generation
            );
            return Err(EditorError::StaleLoad {
                got: ticket.generation,
                current: self.generation,
            });
        }

        for (language, path) in orphan_paths(&resolved.bundle, languages) {
            tracing::warn!("语言 {} 的键 {} 不在基准语言结构中，已忽略", language, path);
        }

        let mut selected: Vec<LanguageCode> = Vec::with_capacity(languages.len());
        for language in languages {
            if !selected.contains(language) {
                selected.push(language.clone());
            }
        }

        self.items = flatten(&resolved.bundle, &selected);
        self.languages = selected;
        self.provenance = resolved.provenance;
        self.delta.clear();
        self.loading = false;

        tracing::info!(
            "已载入 {} 个条目，语言: {}",
            self.items.len(),
            self.languages.join(", ")
        );
        Ok(())
    }

    /// 修改一个条目某语言的当前值
    ///
    /// # 返回
    /// 修改前的值
    pub fn set_value(
        &mut self,
        path: &str,
        language: &str,
        value: impl Into<String>,
    ) -> Result<String, EditorError> {
        let value = value.into();
        let old_value = stats::apply_edit(&mut self.items, path, language, value.clone())?;
        if old_value != value {
            self.delta
                .add_change(LeafEdit::new(DotPath::new(path), language, old_value.clone(), value));
        }
        Ok(old_value)
    }

    /// 将单个条目的所有语言恢复为原始值
    pub fn cancel_item(&mut self, path: &str) -> Result<(), EditorError> {
        let leaf = self
            .items
            .iter_mut()
            .find(|item| item.path().as_str() == path)
            .ok_or_else(|| EditorError::UnknownPath(path.to_string()))?
            .as_leaf_mut()
            .ok_or_else(|| EditorError::NotALeaf(path.to_string()))?;

        let dot_path = leaf.path().clone();
        let originals = leaf.original_values().clone();
        for (language, previous) in leaf.revert() {
            let original = originals.get(&language).cloned().unwrap_or_default();
            self.delta
                .add_change(LeafEdit::new(dot_path.clone(), language, previous, original));
        }
        Ok(())
    }

    /// 放弃全部修改
    pub fn discard(&mut self) {
        let reverted: usize = self
            .items
            .iter_mut()
            .filter_map(FlatItem::as_leaf_mut)
            .map(|leaf| leaf.revert().len())
            .sum();
        self.delta.clear();
        tracing::debug!("已放弃 {} 处修改", reverted);
    }

    /// 撤销最后一次修改
    pub fn undo(&mut self) -> Result<LeafEdit, EditorError> {
        let edit = self.delta.undo()?.clone();
        stats::apply_edit(&mut self.items, edit.path.as_str(), &edit.language, edit.old_value.clone())?;
        Ok(edit)
    }

    /// 重做最后一次撤销的修改
    pub fn redo(&mut self) -> Result<LeafEdit, EditorError> {
        let edit = self.delta.redo()?.clone();
        stats::apply_edit(&mut self.items, edit.path.as_str(), &edit.language, edit.new_value.clone())?;
        Ok(edit)
    }

    /// 保存全部语言
    ///
    /// 依次调用 [`begin_save`](Self::begin_save)、[`dispatch`](Self::dispatch)
    /// 和 [`finish_save`](Self::finish_save)。
    pub fn save(&mut self) -> Result<SaveReport, EditorError> {
        let ticket = self.begin_save()?;
        let result = self.dispatch(&ticket);
        self.finish_save(ticket, result)
    }

    /// 开始一次保存：检查状态并由当前值重建翻译包
    ///
    /// # 返回
    /// 已有保存在进行时返回 `Busy`，没有修改时返回 `NothingToSave`
    pub fn begin_save(&mut self) -> Result<SaveTicket, EditorError> {
        if self.saving {
            return Err(EditorError::Busy);
        }
        if !self.has_any_changes() {
            return Err(EditorError::NothingToSave);
        }

        self.saving = true;
        Ok(SaveTicket {
            bundle: unflatten(&self.items, &self.languages),
            languages: self.languages.clone(),
            active_language: self.runtime.active_language(),
        })
    }

    /// 将保存请求中的翻译包逐个语言写出，当前界面语言成功后热替换
    pub fn dispatch(&mut self, ticket: &SaveTicket) -> Result<SaveReport, PartialFailure> {
        dispatcher::save(
            &self.api,
            &mut self.runtime,
            &ticket.bundle,
            &ticket.languages,
            &ticket.active_language,
        )
    }

    /// 提交保存结果
    ///
    /// 成功时把写出的值确认为原始值；保存期间又被编辑的条目仍保持已修改。
    /// 任一语言失败时保留所有修改状态以便重试。
    pub fn finish_save(
        &mut self,
        ticket: SaveTicket,
        result: Result<SaveReport, PartialFailure>,
    ) -> Result<SaveReport, EditorError> {
        self.saving = false;

        match result {
            Ok(report) => {
                for leaf in self.items.iter_mut().filter_map(FlatItem::as_leaf_mut) {
                    for language in &report.saved {
                        if leaf.current(language).is_none() {
                            continue;
                        }
                        let written = ticket
                            .bundle
                            .get(language)
                            .and_then(|tree| tree.get_leaf(leaf.path().as_str()));
                        if let Some(written) = written {
                            leaf.set_original(language, written.to_string());
                        }
                    }
                }
                if self.has_any_changes() {
                    tracing::debug!("保存期间产生的修改仍待保存");
                } else {
                    self.delta.clear();
                }
                self.notices.push(Notice::success(format!(
                    "Saved translations for {}",
                    report.saved.join(", ")
                )));
                Ok(report)
            }
            Err(failure) => {
                self.notices.push(Notice::error(failure.to_string()));
                Err(EditorError::SaveFailed(failure))
            }
        }
    }

    /// 由当前值重建的翻译包（不保存）
    pub fn export_bundle(&self) -> TranslationBundle {
        unflatten(&self.items, &self.languages)
    }

    pub fn stats(&self) -> ChangeStats {
        stats::stats(&self.items)
    }

    pub fn language_stats(&self, language: &str) -> ChangeStats {
        stats::language_stats(&self.items, language)
    }

    pub fn has_any_changes(&self) -> bool {
        stats::has_any_changes(&self.items)
    }

    pub fn items(&self) -> &[FlatItem] {
        &self.items
    }

    /// 按路径或任一语言的值筛选条目
    pub fn filtered(&self, query: &str) -> Vec<&FlatItem> {
        filter_items(&self.items, query)
    }

    pub fn languages(&self) -> &[LanguageCode] {
        &self.languages
    }

    pub fn provenance(&self, language: &str) -> Option<Provenance> {
        self.provenance.get(language).copied()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    pub fn can_undo(&self) -> bool {
        self.delta.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.delta.can_redo()
    }

    pub fn history(&self) -> &EditDelta {
        &self.delta
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// 移除在 `now` 时刻已过期的提示
    pub fn prune_notices(&mut self, now: DateTime<Local>) {
        let ttl = self.notice_ttl;
        self.notices.retain(|notice| !notice.is_expired(now, ttl));
    }

    /// 手动关闭一条提示
    pub fn dismiss_notice(&mut self, index: usize) -> Option<Notice> {
        (index < self.notices.len()).then(|| self.notices.remove(index))
    }

    pub fn runtime(&self) -> &R {
        &self.runtime
    }

    pub fn runtime_mut(&mut self) -> &mut R {
        &mut self.runtime
    }

    pub fn api(&self) -> &A {
        &self.api
    }
}

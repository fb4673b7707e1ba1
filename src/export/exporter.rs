//! 导出协调模块
//!
//! 根据请求的语言标签和容器格式选择渲染模式与写入器，将章节流式
//! 写入暂存目标，成功后原子地发布到存储。每次导出相互独立、无共享
//! 可变状态；同名并发导出由存储层的原子改名保证最后写入者胜出，
//! 绝不会出现损坏的混合文件。

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::SystemTime;

use serde::{Deserialize, Serialize};

use crate::export::book::Book;
use crate::export::chapter::ChapterStore;
use crate::export::config::{ExportConfig, DEFAULT_CONFIG};
use crate::export::epub::EpubWriter;
use crate::export::error::{ExportError, Result};
use crate::export::render::RenderMode;
use crate::export::storage::Storage;
use crate::export::text::TextWriter;

/// 导出容器格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// EPUB包
    Epub,
    /// 纯文本
    Text,
}

impl ExportFormat {
    /// 格式对应的文件扩展名
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Epub => "epub",
            ExportFormat::Text => "txt",
        }
    }
}

/// 取消令牌
///
/// 克隆后的令牌共享同一取消状态。写入器在每次章节拉取前检查，
/// 取消后进行中的导出尽快放弃，暂存文件被丢弃。
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    /// 创建未取消的令牌
    pub fn new() -> Self {
        Self::default()
    }

    /// 请求取消
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    /// 是否已请求取消
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }

    /// 已取消时返回Cancelled错误
    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            return Err(ExportError::Cancelled);
        }
        Ok(())
    }
}

/// 导出协调器
///
/// 每次`export`调用无状态：{请求 → 流式写入 → (发布 | 失败)}，
/// 失败不保留任何中间状态，目标位置不会出现半成品文件。
pub struct Exporter<S: Storage> {
    storage: S,
    config: ExportConfig,
}

impl<S: Storage> Exporter<S> {
    /// 使用默认配置创建协调器
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            config: DEFAULT_CONFIG.clone(),
        }
    }

    /// 使用指定配置创建协调器
    pub fn with_config(storage: S, config: ExportConfig) -> Self {
        Self { storage, config }
    }

    /// 当前配置
    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// 将语言标签解析为渲染模式
    ///
    /// 配置的原文语言标签对应仅原文，译文语言标签对应仅译文，
    /// "mix"或"mixed"对应对照模式。匹配不区分大小写。
    pub fn resolve_mode(&self, lang: &str) -> Result<RenderMode> {
        if lang.eq_ignore_ascii_case(&self.config.original_language) {
            return Ok(RenderMode::Original);
        }
        if lang.eq_ignore_ascii_case(&self.config.translated_language) {
            return Ok(RenderMode::Translated);
        }
        if lang.eq_ignore_ascii_case("mix") || lang.eq_ignore_ascii_case("mixed") {
            return Ok(RenderMode::Mixed);
        }
        Err(ExportError::UnsupportedLanguage(lang.to_string()))
    }

    /// 执行一次导出
    ///
    /// 章节按序号顺序从存储逐章拉取，一次只有一章在处理中。
    /// 成功时文件原子地出现在`file_name`；失败或取消时暂存内容被
    /// 丢弃，`file_name`处已存在的文件（如有）保持不变。
    ///
    /// # 参数
    /// * `file_name` - 输出文件名（相对存储根位置）
    /// * `lang` - 语言标签，见`resolve_mode`
    /// * `format` - 容器格式
    /// * `book` - 书籍描述
    /// * `store` - 章节存储
    /// * `cancel` - 取消令牌
    ///
    /// # 返回值
    /// * `Result<()>` - 失败时返回具体的错误类别，绝不静默降级
    pub fn export(
        &self,
        file_name: &str,
        lang: &str,
        format: ExportFormat,
        book: &Book,
        store: &dyn ChapterStore,
        cancel: &CancelToken,
    ) -> Result<()> {
        let mode = self.resolve_mode(lang)?;
        let mut staged = self.storage.begin(file_name)?;

        let result = match format {
            ExportFormat::Epub => EpubWriter::with_config(self.config.clone()).write(
                book,
                store,
                mode,
                cancel,
                &mut *staged,
            ),
            ExportFormat::Text => {
                TextWriter::new().write(book, store, mode, cancel, &mut *staged)
            }
        };

        match result {
            Ok(()) => staged.commit(),
            Err(e) => {
                staged.discard();
                Err(e)
            }
        }
    }

    /// 查询导出文件是否存在
    pub fn exists(&self, file_name: &str) -> bool {
        self.storage.exists(file_name)
    }

    /// 查询导出文件的创建时间，不存在时返回None
    pub fn created_at(&self, file_name: &str) -> Result<Option<SystemTime>> {
        self.storage.created_at(file_name)
    }
}

//! 章节模块
//!
//! 提供章节内容的数据结构和章节存储接口。章节内容按段落组织，
//! 原文和译文各为一个有序段落序列，两者至少存在其一。

use crate::export::error::{ExportError, Result};
use std::collections::HashMap;

/// 单个章节的双语内容
///
/// 不变式：原文和译文不能同时为空。缺失的一侧表示该语言在本章不可用，
/// 渲染时按模式规则回退到另一侧。
#[derive(Debug, Clone)]
pub struct Chapter {
    ordinal: usize,
    id: String,
    title: Option<String>,
    original: Option<Vec<String>>,
    translated: Option<Vec<String>>,
}

impl Chapter {
    /// 创建新的章节
    ///
    /// 空的段落序列视同缺失。两侧均缺失时返回EmptyChapter错误。
    ///
    /// # 参数
    /// * `ordinal` - 阅读顺序（0起始）
    /// * `id` - 章节存储中的键
    /// * `original` - 原文段落序列（可选）
    /// * `translated` - 译文段落序列（可选）
    ///
    /// # 返回值
    /// * `Result<Chapter>` - 满足不变式时返回章节实例
    pub fn new(
        ordinal: usize,
        id: impl Into<String>,
        original: Option<Vec<String>>,
        translated: Option<Vec<String>>,
    ) -> Result<Self> {
        let original = original.filter(|paragraphs| !paragraphs.is_empty());
        let translated = translated.filter(|paragraphs| !paragraphs.is_empty());

        if original.is_none() && translated.is_none() {
            return Err(ExportError::EmptyChapter { ordinal });
        }

        Ok(Self {
            ordinal,
            id: id.into(),
            title: None,
            original,
            translated,
        })
    }

    /// 设置展示标题
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// 阅读顺序
    pub fn ordinal(&self) -> usize {
        self.ordinal
    }

    /// 章节键
    pub fn id(&self) -> &str {
        &self.id
    }

    /// 展示标题
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// 原文段落序列
    pub fn original(&self) -> Option<&[String]> {
        self.original.as_deref()
    }

    /// 译文段落序列
    pub fn translated(&self) -> Option<&[String]> {
        self.translated.as_deref()
    }

    /// 对译文段落逐段应用文本变换
    ///
    /// 用于渲染前的上游替换步骤（如术语表替换），原文保持不变。
    pub fn map_translated<F>(&mut self, mut transform: F)
    where
        F: FnMut(&str) -> String,
    {
        if let Some(paragraphs) = self.translated.as_mut() {
            for paragraph in paragraphs.iter_mut() {
                *paragraph = transform(paragraph);
            }
        }
    }
}

/// 章节存储接口
///
/// 导出引擎通过此接口按需拉取章节内容，一次一章。
/// 实现方可以是数据库、文件系统或内存中的任何来源。
pub trait ChapterStore {
    /// 按键获取章节
    ///
    /// # 参数
    /// * `id` - 章节键
    ///
    /// # 返回值
    /// * `Result<Chapter>` - 键未知时返回ChapterNotFound错误
    fn chapter(&self, id: &str) -> Result<Chapter>;
}

/// 内存章节存储
///
/// 按键保存完整章节，主要用于测试和小规模导出。
#[derive(Debug, Default)]
pub struct MemChapterStore {
    chapters: HashMap<String, Chapter>,
}

impl MemChapterStore {
    /// 创建空的内存存储
    pub fn new() -> Self {
        Self {
            chapters: HashMap::new(),
        }
    }

    /// 从章节列表构建内存存储
    pub fn from_chapters(chapters: Vec<Chapter>) -> Self {
        let chapters = chapters
            .into_iter()
            .map(|chapter| (chapter.id().to_string(), chapter))
            .collect();
        Self { chapters }
    }

    /// 插入章节，键为章节自身的id
    pub fn insert(&mut self, chapter: Chapter) {
        self.chapters.insert(chapter.id().to_string(), chapter);
    }
}

impl ChapterStore for MemChapterStore {
    fn chapter(&self, id: &str) -> Result<Chapter> {
        self.chapters
            .get(id)
            .cloned()
            .ok_or_else(|| ExportError::ChapterNotFound(id.to_string()))
    }
}

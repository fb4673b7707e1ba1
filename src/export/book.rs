//! 书籍元数据模块
//!
//! 提供书籍基本信息、目录结构和章节引用的定义，以及目录与章节集合的一致性校验。

use crate::export::error::{ExportError, Result};
use serde::{Deserialize, Serialize};

/// 书籍的语言呈现方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookLanguage {
    /// 仅原文
    Original,
    /// 仅译文
    Translated,
    /// 原文与译文对照
    Mixed,
}

/// 书籍基本信息
///
/// 一旦交给写入器即视为不可变，同一份元数据可用于多次导出。
#[derive(Debug, Clone)]
pub struct BookMetadata {
    /// 书名
    pub title: String,
    /// 作者（可选）
    pub author: Option<String>,
    /// 唯一标识符（如urn:uuid:...），作为包文档的unique-identifier
    pub identifier: String,
    /// 语言呈现方式
    pub language: BookLanguage,
    /// 书籍简介（可选）
    pub description: Option<String>,
}

impl BookMetadata {
    /// 创建新的书籍信息
    pub fn new(title: impl Into<String>, identifier: impl Into<String>, language: BookLanguage) -> Self {
        Self {
            title: title.into(),
            author: None,
            identifier: identifier.into(),
            language,
            description: None,
        }
    }

    /// 设置作者
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// 设置简介
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// 校验元数据是否满足打包要求
    ///
    /// 标识符是包文档合法性的必要条件，为空时拒绝导出。
    pub fn validate(&self) -> Result<()> {
        if self.identifier.trim().is_empty() {
            return Err(ExportError::MissingIdentifier);
        }
        Ok(())
    }
}

/// 章节引用
///
/// 指向章节存储中的一个章节，`ordinal`从0开始且连续，定义阅读顺序。
#[derive(Debug, Clone)]
pub struct ChapterRef {
    /// 阅读顺序（0起始，连续）
    pub ordinal: usize,
    /// 章节存储中的键
    pub id: String,
    /// 展示用标题（可选）
    pub title: Option<String>,
}

impl ChapterRef {
    /// 创建新的章节引用
    pub fn new(ordinal: usize, id: impl Into<String>) -> Self {
        Self {
            ordinal,
            id: id.into(),
            title: None,
        }
    }

    /// 设置展示标题
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// 目录条目
#[derive(Debug, Clone)]
pub enum TocEntry {
    /// 可导航条目：链接到对应序号的章节起始处
    Chapter {
        /// 章节序号
        ordinal: usize,
        /// 展示标题
        title: String,
    },
    /// 不可导航的分隔标签（如卷名），没有链接目标
    Divider {
        /// 标签文本
        label: String,
    },
}

/// 书籍目录
///
/// 有序条目列表。可导航条目按出现顺序的序号必须严格递增，
/// 且与交给写入器的章节集合一一对应。
#[derive(Debug, Clone, Default)]
pub struct TableOfContents {
    /// 目录条目列表
    pub entries: Vec<TocEntry>,
}

impl TableOfContents {
    /// 创建空目录
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// 从章节引用列表生成平铺目录
    ///
    /// 没有标题的章节使用"第N章"作为展示标题。
    pub fn from_chapters(chapters: &[ChapterRef]) -> Self {
        let entries = chapters
            .iter()
            .map(|c| TocEntry::Chapter {
                ordinal: c.ordinal,
                title: c
                    .title
                    .clone()
                    .unwrap_or_else(|| format!("第{}章", c.ordinal + 1)),
            })
            .collect();
        Self { entries }
    }

    /// 追加可导航章节条目
    pub fn push_chapter(&mut self, ordinal: usize, title: impl Into<String>) {
        self.entries.push(TocEntry::Chapter {
            ordinal,
            title: title.into(),
        });
    }

    /// 追加分隔标签条目
    pub fn push_divider(&mut self, label: impl Into<String>) {
        self.entries.push(TocEntry::Divider {
            label: label.into(),
        });
    }

    /// 按出现顺序返回所有可导航条目的(序号, 标题)
    pub fn navigable(&self) -> Vec<(usize, &str)> {
        self.entries
            .iter()
            .filter_map(|e| match e {
                TocEntry::Chapter { ordinal, title } => Some((*ordinal, title.as_str())),
                TocEntry::Divider { .. } => None,
            })
            .collect()
    }

    /// 校验目录与章节集合的一致性
    ///
    /// 检查项：
    /// 1. 章节引用的序号从0开始连续（阅读顺序即脊柱顺序）
    /// 2. 可导航条目的序号严格递增
    /// 3. 每个章节在目录中恰好出现一次，目录中没有多余条目
    ///
    /// # 参数
    /// * `chapters` - 交给写入器的章节引用列表
    ///
    /// # 返回值
    /// * `Result<()>` - 一致时返回Ok，否则返回TocMismatch错误
    pub fn validate(&self, chapters: &[ChapterRef]) -> Result<()> {
        for (index, chapter) in chapters.iter().enumerate() {
            if chapter.ordinal != index {
                return Err(ExportError::TocMismatch(format!(
                    "章节序号不连续: 第{}个章节的序号为{}",
                    index, chapter.ordinal
                )));
            }
        }

        let navigable = self.navigable();
        for pair in navigable.windows(2) {
            if pair[0].0 >= pair[1].0 {
                return Err(ExportError::TocMismatch(format!(
                    "目录条目序号未严格递增: {}出现在{}之后",
                    pair[1].0, pair[0].0
                )));
            }
        }

        if navigable.len() != chapters.len() {
            return Err(ExportError::TocMismatch(format!(
                "目录包含{}个可导航条目，但共有{}个章节",
                navigable.len(),
                chapters.len()
            )));
        }

        for (entry, chapter) in navigable.iter().zip(chapters.iter()) {
            if entry.0 != chapter.ordinal {
                return Err(ExportError::TocMismatch(format!(
                    "目录条目指向序号{}，期望章节序号{}",
                    entry.0, chapter.ordinal
                )));
            }
        }

        Ok(())
    }
}

/// 一次导出所需的完整书籍描述
#[derive(Debug, Clone)]
pub struct Book {
    /// 书籍基本信息
    pub metadata: BookMetadata,
    /// 目录
    pub toc: TableOfContents,
    /// 按阅读顺序排列的章节引用
    pub chapters: Vec<ChapterRef>,
}

impl Book {
    /// 创建新的书籍描述
    pub fn new(metadata: BookMetadata, toc: TableOfContents, chapters: Vec<ChapterRef>) -> Self {
        Self {
            metadata,
            toc,
            chapters,
        }
    }

    /// 创建书籍描述，目录由章节列表自动生成
    pub fn with_default_toc(metadata: BookMetadata, chapters: Vec<ChapterRef>) -> Self {
        let toc = TableOfContents::from_chapters(&chapters);
        Self {
            metadata,
            toc,
            chapters,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_chapters(count: usize) -> Vec<ChapterRef> {
        (0..count)
            .map(|i| ChapterRef::new(i, format!("ch{}", i)))
            .collect()
    }

    #[test]
    fn test_metadata_validate() {
        let metadata = BookMetadata::new("示例", "urn:uuid:abc", BookLanguage::Mixed);
        assert!(metadata.validate().is_ok());

        let empty = BookMetadata::new("示例", "  ", BookLanguage::Mixed);
        assert!(matches!(
            empty.validate(),
            Err(ExportError::MissingIdentifier)
        ));
    }

    #[test]
    fn test_toc_from_chapters() {
        let chapters = vec![
            ChapterRef::new(0, "a").with_title("序章"),
            ChapterRef::new(1, "b"),
        ];
        let toc = TableOfContents::from_chapters(&chapters);
        let navigable = toc.navigable();
        assert_eq!(navigable, vec![(0, "序章"), (1, "第2章")]);
    }

    #[test]
    fn test_validate_accepts_dividers() {
        let chapters = sample_chapters(2);
        let mut toc = TableOfContents::new();
        toc.push_divider("第一卷");
        toc.push_chapter(0, "第1章");
        toc.push_chapter(1, "第2章");
        assert!(toc.validate(&chapters).is_ok());
    }

    #[test]
    fn test_validate_missing_entry() {
        // 5个章节中缺少序号2的目录条目
        let chapters = sample_chapters(5);
        let mut toc = TableOfContents::new();
        for ordinal in [0, 1, 3, 4] {
            toc.push_chapter(ordinal, format!("第{}章", ordinal + 1));
        }
        assert!(matches!(
            toc.validate(&chapters),
            Err(ExportError::TocMismatch(_))
        ));
    }

    #[test]
    fn test_validate_extra_entry() {
        let chapters = sample_chapters(2);
        let mut toc = TableOfContents::new();
        toc.push_chapter(0, "第1章");
        toc.push_chapter(1, "第2章");
        toc.push_chapter(2, "不存在的章节");
        assert!(matches!(
            toc.validate(&chapters),
            Err(ExportError::TocMismatch(_))
        ));
    }

    #[test]
    fn test_validate_unsorted_entries() {
        let chapters = sample_chapters(2);
        let mut toc = TableOfContents::new();
        toc.push_chapter(1, "第2章");
        toc.push_chapter(0, "第1章");
        assert!(matches!(
            toc.validate(&chapters),
            Err(ExportError::TocMismatch(_))
        ));
    }

    #[test]
    fn test_validate_noncontiguous_ordinals() {
        let mut chapters = sample_chapters(3);
        chapters[2].ordinal = 5;
        let toc = TableOfContents::from_chapters(&chapters);
        assert!(matches!(
            toc.validate(&chapters),
            Err(ExportError::TocMismatch(_))
        ));
    }
}

//! 纯文本写入模块
//!
//! 按序号顺序拼接章节：段落之间单个换行，章节之间空一行，
//! 章节有标题时在正文前输出标题行。没有归档结构，输出为UTF-8文本。

use std::io::Write;

use crate::export::book::Book;
use crate::export::chapter::ChapterStore;
use crate::export::error::Result;
use crate::export::exporter::CancelToken;
use crate::export::render::{render, RenderMode};

/// 纯文本写入器
#[derive(Debug, Default)]
pub struct TextWriter;

impl TextWriter {
    /// 创建写入器
    pub fn new() -> Self {
        Self
    }

    /// 将整本书写入纯文本
    ///
    /// 对满足章节存储不变式的任何输入都能成功，逐章流式写出。
    ///
    /// # 参数
    /// * `book` - 书籍描述
    /// * `store` - 章节存储
    /// * `mode` - 渲染模式
    /// * `cancel` - 取消令牌，每章拉取前检查
    /// * `out` - 输出目标
    pub fn write<W: Write>(
        &self,
        book: &Book,
        store: &dyn ChapterStore,
        mode: RenderMode,
        cancel: &CancelToken,
        mut out: W,
    ) -> Result<()> {
        for (index, chapter_ref) in book.chapters.iter().enumerate() {
            cancel.check()?;

            let chapter = store.chapter(&chapter_ref.id)?;
            let paragraphs = render(&chapter, mode);

            if index > 0 {
                out.write_all(b"\n\n")?;
            }
            if let Some(title) = chapter.title().or(chapter_ref.title.as_deref()) {
                out.write_all(title.as_bytes())?;
                out.write_all(b"\n")?;
            }
            for (paragraph_index, paragraph) in paragraphs.iter().enumerate() {
                if paragraph_index > 0 {
                    out.write_all(b"\n")?;
                }
                out.write_all(paragraph.text.as_bytes())?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::book::{BookLanguage, BookMetadata, ChapterRef};
    use crate::export::chapter::{Chapter, MemChapterStore};
    use crate::export::error::ExportError;

    fn paragraphs(texts: &[&str]) -> Vec<String> {
        texts.iter().map(|t| t.to_string()).collect()
    }

    fn write_text(book: &Book, store: &MemChapterStore, mode: RenderMode) -> String {
        let mut buffer = Vec::new();
        TextWriter::new()
            .write(book, store, mode, &CancelToken::new(), &mut buffer)
            .unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_mixed_scenario_layout() {
        // 章节0交错6行，空一行，章节1回退输出2行译文
        let metadata = BookMetadata::new("示例", "urn:uuid:abc", BookLanguage::Mixed);
        let book = Book::with_default_toc(
            metadata,
            vec![ChapterRef::new(0, "ch0"), ChapterRef::new(1, "ch1")],
        );
        let store = MemChapterStore::from_chapters(vec![
            Chapter::new(
                0,
                "ch0",
                Some(paragraphs(&["原一", "原二", "原三"])),
                Some(paragraphs(&["译一", "译二", "译三"])),
            )
            .unwrap(),
            Chapter::new(1, "ch1", None, Some(paragraphs(&["译甲", "译乙"]))).unwrap(),
        ]);

        let text = write_text(&book, &store, RenderMode::Mixed);
        assert_eq!(
            text,
            "原一\n译一\n原二\n译二\n原三\n译三\n\n译甲\n译乙"
        );
    }

    #[test]
    fn test_chapter_titles_included() {
        let metadata = BookMetadata::new("示例", "urn:uuid:abc", BookLanguage::Translated);
        let book = Book::with_default_toc(
            metadata,
            vec![
                ChapterRef::new(0, "ch0").with_title("第1章"),
                ChapterRef::new(1, "ch1").with_title("第2章"),
            ],
        );
        let store = MemChapterStore::from_chapters(vec![
            Chapter::new(0, "ch0", None, Some(paragraphs(&["甲"]))).unwrap(),
            Chapter::new(1, "ch1", None, Some(paragraphs(&["乙"]))).unwrap(),
        ]);

        let text = write_text(&book, &store, RenderMode::Translated);
        assert_eq!(text, "第1章\n甲\n\n第2章\n乙");
    }

    #[test]
    fn test_missing_chapter_propagates() {
        let metadata = BookMetadata::new("示例", "urn:uuid:abc", BookLanguage::Translated);
        let book =
            Book::with_default_toc(metadata, vec![ChapterRef::new(0, "missing")]);
        let store = MemChapterStore::new();

        let mut buffer = Vec::new();
        let result = TextWriter::new().write(
            &book,
            &store,
            RenderMode::Translated,
            &CancelToken::new(),
            &mut buffer,
        );
        assert!(matches!(result, Err(ExportError::ChapterNotFound(_))));
    }
}

//! EPUB归档组装
//!
//! 将mimetype、容器描述、包文档、导航文档、样式表和逐章内容文档
//! 写入一个Zip归档。mimetype必须是第一个条目且不压缩（EPUB规范要求），
//! 其余条目使用deflate压缩。章节内容按需从章节存储拉取，一次一章，
//! 因此峰值内存由最大的单章决定而非整本书。

use std::io::{Seek, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

use crate::export::book::Book;
use crate::export::chapter::ChapterStore;
use crate::export::config::{ExportConfig, DEFAULT_CONFIG};
use crate::export::epub::{
    generate_chapter, generate_container, generate_nav, generate_ncx, generate_opf,
    generate_stylesheet, CONTAINER_PATH, CONTENT_DIR, EPUB_MIMETYPE, MIMETYPE_PATH, NAV_PATH,
    NCX_PATH, OPF_PATH, STYLE_PATH,
};
use crate::export::error::{ExportError, Result};
use crate::export::exporter::CancelToken;
use crate::export::render::{render, RenderMode};

/// EPUB包写入器
pub struct EpubWriter {
    config: ExportConfig,
}

impl EpubWriter {
    /// 使用默认配置创建写入器
    pub fn new() -> Self {
        Self {
            config: DEFAULT_CONFIG.clone(),
        }
    }

    /// 使用指定配置创建写入器
    pub fn with_config(config: ExportConfig) -> Self {
        Self { config }
    }

    /// 将整本书写入EPUB归档
    ///
    /// 写入前校验元数据标识符和目录与章节集合的一致性，
    /// 任何结构不一致都会在写入任何字节之前失败。
    ///
    /// # 参数
    /// * `book` - 书籍描述
    /// * `store` - 章节存储
    /// * `mode` - 渲染模式
    /// * `cancel` - 取消令牌，每章拉取前检查
    /// * `out` - 输出目标
    ///
    /// # 返回值
    /// * `Result<()>` - 成功时输出目标中为完整的EPUB内容
    pub fn write<W: Write + Seek>(
        &self,
        book: &Book,
        store: &dyn ChapterStore,
        mode: RenderMode,
        cancel: &CancelToken,
        out: W,
    ) -> Result<()> {
        book.metadata.validate()?;
        book.toc.validate(&book.chapters)?;
        cancel.check()?;

        let mut zip = ZipWriter::new(out);

        // 固定时间戳保证相同输入产出逐字节一致的归档
        let stored = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Stored)
            .last_modified_time(DateTime::default());
        let deflated = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .compression_level(self.config.compression_level.map(|level| level as i64))
            .last_modified_time(DateTime::default());

        // mimetype必须是第一个条目且不压缩
        zip.start_file(MIMETYPE_PATH, stored)?;
        zip.write_all(EPUB_MIMETYPE.as_bytes())?;

        zip.start_file(CONTAINER_PATH, deflated)?;
        zip.write_all(&generate_container()?)?;

        zip.start_file(OPF_PATH, deflated)?;
        zip.write_all(&generate_opf(&book.metadata, &book.chapters, &self.config)?)?;

        zip.start_file(NAV_PATH, deflated)?;
        zip.write_all(&generate_nav(&book.metadata, &book.toc, &self.config)?)?;

        zip.start_file(NCX_PATH, deflated)?;
        zip.write_all(&generate_ncx(&book.metadata, &book.toc, &self.config)?)?;

        zip.start_file(STYLE_PATH, deflated)?;
        zip.write_all(generate_stylesheet(&self.config).as_bytes())?;

        let doc_lang = self.document_language(mode);
        for chapter_ref in &book.chapters {
            cancel.check()?;

            let chapter = store.chapter(&chapter_ref.id)?;
            if chapter.ordinal() != chapter_ref.ordinal {
                return Err(ExportError::TocMismatch(format!(
                    "章节存储返回序号{}，引用期望序号{}",
                    chapter.ordinal(),
                    chapter_ref.ordinal
                )));
            }

            let paragraphs = render(&chapter, mode);
            let title = chapter.title().or(chapter_ref.title.as_deref());
            let document = generate_chapter(title, &paragraphs, mode, doc_lang, &self.config)?;

            let path = format!(
                "{}/{}",
                CONTENT_DIR,
                self.config.content_file_name(chapter_ref.ordinal)
            );
            zip.start_file(path, deflated)?;
            zip.write_all(&document)?;
        }

        zip.finish()?;
        Ok(())
    }

    /// 内容文档的主语言标签
    fn document_language(&self, mode: RenderMode) -> &str {
        match mode {
            RenderMode::Original => &self.config.original_language,
            RenderMode::Translated | RenderMode::Mixed => &self.config.translated_language,
        }
    }
}

impl Default for EpubWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::book::{BookLanguage, BookMetadata, ChapterRef, TableOfContents};
    use crate::export::chapter::{Chapter, MemChapterStore};
    use std::io::{Cursor, Read};
    use zip::ZipArchive;

    fn paragraphs(texts: &[&str]) -> Vec<String> {
        texts.iter().map(|t| t.to_string()).collect()
    }

    /// 规范中的双语样例：章节0原文译文各3段，章节1仅2段译文
    fn sample_book() -> (Book, MemChapterStore) {
        let metadata = BookMetadata::new("示例", "urn:uuid:abc", BookLanguage::Mixed);
        let chapters = vec![ChapterRef::new(0, "ch0"), ChapterRef::new(1, "ch1")];
        let book = Book::with_default_toc(metadata, chapters);

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

        (book, store)
    }

    fn write_epub(book: &Book, store: &MemChapterStore, mode: RenderMode) -> Vec<u8> {
        let mut buffer = Cursor::new(Vec::new());
        EpubWriter::new()
            .write(book, store, mode, &CancelToken::new(), &mut buffer)
            .unwrap();
        buffer.into_inner()
    }

    fn read_entry(archive: &mut ZipArchive<Cursor<Vec<u8>>>, name: &str) -> String {
        let mut content = String::new();
        archive
            .by_name(name)
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        content
    }

    #[test]
    fn test_mimetype_first_and_stored() {
        let (book, store) = sample_book();
        let bytes = write_epub(&book, &store, RenderMode::Mixed);
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();

        let first = archive.by_index(0).unwrap();
        assert_eq!(first.name(), "mimetype");
        assert_eq!(first.compression(), CompressionMethod::Stored);
        drop(first);

        let content = read_entry(&mut archive, "mimetype");
        assert_eq!(content, "application/epub+zip");
    }

    #[test]
    fn test_spine_roundtrip_ordinal_order() {
        let (book, store) = sample_book();
        let bytes = write_epub(&book, &store, RenderMode::Mixed);
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();

        let opf = read_entry(&mut archive, "OEBPS/content.opf");
        let spine = &opf[opf.find("<spine").unwrap()..];
        let first = spine.find("idref=\"chapter_0000\"").unwrap();
        let second = spine.find("idref=\"chapter_0001\"").unwrap();
        assert!(first < second);

        // 脊柱引用的内容文件都在归档中
        assert!(archive.by_name("OEBPS/chapter_0000.xhtml").is_ok());
        assert!(archive.by_name("OEBPS/chapter_0001.xhtml").is_ok());
    }

    #[test]
    fn test_mixed_scenario_chapter_contents() {
        let (book, store) = sample_book();
        let bytes = write_epub(&book, &store, RenderMode::Mixed);
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();

        // 章节0：3对段落交错，共6段
        let first = read_entry(&mut archive, "OEBPS/chapter_0000.xhtml");
        assert_eq!(first.matches("<p ").count(), 6);
        let orig_pos = first.find("原一").unwrap();
        let trans_pos = first.find("译一").unwrap();
        assert!(orig_pos < trans_pos);

        // 章节1：原文缺失，回退输出2段译文
        let second = read_entry(&mut archive, "OEBPS/chapter_0001.xhtml");
        assert_eq!(second.matches("<p ").count(), 2);
        assert!(second.contains("译甲"));
        assert!(second.contains("译乙"));
    }

    #[test]
    fn test_byte_identical_for_identical_input() {
        let (book, store) = sample_book();
        let first = write_epub(&book, &store, RenderMode::Mixed);
        let second = write_epub(&book, &store, RenderMode::Mixed);
        assert_eq!(first, second);
    }

    #[test]
    fn test_toc_mismatch_fails_before_output() {
        let (mut book, store) = sample_book();
        book.toc = {
            let mut toc = TableOfContents::new();
            toc.push_chapter(0, "第1章");
            toc
        };

        let mut buffer = Cursor::new(Vec::new());
        let result = EpubWriter::new().write(
            &book,
            &store,
            RenderMode::Mixed,
            &CancelToken::new(),
            &mut buffer,
        );
        assert!(matches!(result, Err(ExportError::TocMismatch(_))));
        assert!(buffer.into_inner().is_empty());
    }

    #[test]
    fn test_missing_identifier_rejected() {
        let (mut book, store) = sample_book();
        book.metadata.identifier = String::new();

        let mut buffer = Cursor::new(Vec::new());
        let result = EpubWriter::new().write(
            &book,
            &store,
            RenderMode::Mixed,
            &CancelToken::new(),
            &mut buffer,
        );
        assert!(matches!(result, Err(ExportError::MissingIdentifier)));
    }

    #[test]
    fn test_missing_chapter_fails_export() {
        let (mut book, store) = sample_book();
        book.chapters.push(ChapterRef::new(2, "ch2"));
        book.toc.push_chapter(2, "第3章");

        let mut buffer = Cursor::new(Vec::new());
        let result = EpubWriter::new().write(
            &book,
            &store,
            RenderMode::Mixed,
            &CancelToken::new(),
            &mut buffer,
        );
        assert!(matches!(result, Err(ExportError::ChapterNotFound(_))));
    }

    #[test]
    fn test_cancelled_before_start() {
        let (book, store) = sample_book();
        let cancel = CancelToken::new();
        cancel.cancel();

        let mut buffer = Cursor::new(Vec::new());
        let result =
            EpubWriter::new().write(&book, &store, RenderMode::Mixed, &cancel, &mut buffer);
        assert!(matches!(result, Err(ExportError::Cancelled)));
        assert!(buffer.into_inner().is_empty());
    }

    #[test]
    fn test_nav_and_ncx_present() {
        let (book, store) = sample_book();
        let bytes = write_epub(&book, &store, RenderMode::Translated);
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();

        let nav = read_entry(&mut archive, "OEBPS/nav.xhtml");
        assert!(nav.contains("epub:type=\"toc\""));
        let ncx = read_entry(&mut archive, "OEBPS/toc.ncx");
        assert!(ncx.contains("urn:uuid:abc"));
        let css = read_entry(&mut archive, "OEBPS/style.css");
        assert!(css.contains("p.orig"));
    }
}

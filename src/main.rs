use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use serde::Deserialize;

use novelpack::{
    Book, BookLanguage, BookMetadata, CancelToken, Chapter, ChapterRef, ChapterStore,
    ExportConfig, ExportError, ExportFormat, Exporter, FsStorage, Glossary, Result,
    TableOfContents,
};

/// 📖 NovelPack - 双语小说导出工具
#[derive(Parser)]
#[command(name = "novelpack")]
#[command(about = "将双语小说导出为EPUB或纯文本")]
#[command(version)]
struct Args {
    /// 书籍描述文件路径
    #[arg(help = "书籍描述文件(YAML)的路径")]
    book_file: PathBuf,

    /// 输出文件名
    #[arg(short, long, help = "输出文件名，省略时由书名和语言生成")]
    output: Option<String>,

    /// 导出语言
    #[arg(short, long, value_enum, default_value = "zh", help = "导出语言")]
    lang: ExportLang,

    /// 导出格式
    #[arg(short, long, value_enum, default_value = "epub", help = "导出格式")]
    format: FormatArg,

    /// 输出目录
    #[arg(short = 'd', long, default_value = ".", help = "输出文件的根目录")]
    out_dir: PathBuf,

    /// 术语表文件
    #[arg(short, long, help = "术语表文件(YAML)，原文术语到译名的映射")]
    glossary: Option<PathBuf>,

    /// 详细输出模式
    #[arg(short, long, help = "显示详细信息")]
    verbose: bool,
}

/// 导出语言选项
#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum ExportLang {
    /// 仅原文
    Jp,
    /// 仅译文
    Zh,
    /// 原文与译文对照
    Mix,
}

impl ExportLang {
    /// 对应的语言标签，由配置的语言对决定
    fn tag(&self, config: &ExportConfig) -> String {
        match self {
            ExportLang::Jp => config.original_language.clone(),
            ExportLang::Zh => config.translated_language.clone(),
            ExportLang::Mix => "mixed".to_string(),
        }
    }

    /// 文件名中使用的标记
    fn label(&self) -> &'static str {
        match self {
            ExportLang::Jp => "jp",
            ExportLang::Zh => "zh",
            ExportLang::Mix => "mix",
        }
    }
}

/// 导出格式选项
#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum FormatArg {
    /// EPUB包
    Epub,
    /// 纯文本
    Text,
}

impl From<FormatArg> for ExportFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Epub => ExportFormat::Epub,
            FormatArg::Text => ExportFormat::Text,
        }
    }
}

/// 书籍描述文件
#[derive(Debug, Deserialize)]
struct BookFile {
    /// 书名
    title: String,
    /// 作者（可选）
    author: Option<String>,
    /// 唯一标识符
    identifier: String,
    /// 书籍简介（可选）
    description: Option<String>,
    /// 章节列表，顺序即阅读顺序
    chapters: Vec<ChapterEntry>,
    /// 目录（可选，省略时由章节列表生成）
    toc: Option<Vec<TocFileEntry>>,
}

/// 书籍描述文件中的单个章节
#[derive(Debug, Deserialize)]
struct ChapterEntry {
    /// 章节键
    id: String,
    /// 章节标题（可选）
    title: Option<String>,
    /// 原文文本文件路径（相对书籍描述文件）
    original: Option<PathBuf>,
    /// 译文文本文件路径（相对书籍描述文件）
    translated: Option<PathBuf>,
}

/// 书籍描述文件中的目录条目
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TocFileEntry {
    /// 分隔标签，如卷名
    Divider {
        divider: String,
    },
    /// 可导航章节条目
    Chapter {
        chapter: usize,
        title: Option<String>,
    },
}

/// 基于文本文件的章节存储
///
/// 章节内容在导出过程中按需读取，每个非空行视为一个段落；
/// 配置了术语表时在返回前对译文段落应用替换。
struct FileChapterStore {
    base_dir: PathBuf,
    specs: HashMap<String, FileChapterSpec>,
    glossary: Glossary,
}

struct FileChapterSpec {
    ordinal: usize,
    title: Option<String>,
    original: Option<PathBuf>,
    translated: Option<PathBuf>,
}

impl FileChapterStore {
    fn new(base_dir: PathBuf, entries: &[ChapterEntry], glossary: Glossary) -> Self {
        let specs = entries
            .iter()
            .enumerate()
            .map(|(ordinal, entry)| {
                (
                    entry.id.clone(),
                    FileChapterSpec {
                        ordinal,
                        title: entry.title.clone(),
                        original: entry.original.clone(),
                        translated: entry.translated.clone(),
                    },
                )
            })
            .collect();
        Self {
            base_dir,
            specs,
            glossary,
        }
    }

    /// 读取段落文件，每个非空行为一个段落
    fn read_paragraphs(&self, path: &Path) -> Result<Vec<String>> {
        let full_path = self.base_dir.join(path);
        let content = fs::read_to_string(&full_path).map_err(|e| {
            ExportError::SourceUnavailable(format!("无法读取{}: {}", full_path.display(), e))
        })?;
        Ok(content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }
}

impl ChapterStore for FileChapterStore {
    fn chapter(&self, id: &str) -> Result<Chapter> {
        let spec = self
            .specs
            .get(id)
            .ok_or_else(|| ExportError::ChapterNotFound(id.to_string()))?;

        let original = spec
            .original
            .as_deref()
            .map(|path| self.read_paragraphs(path))
            .transpose()?;
        let translated = spec
            .translated
            .as_deref()
            .map(|path| self.read_paragraphs(path))
            .transpose()?;

        let mut chapter = Chapter::new(spec.ordinal, id, original, translated)?;
        if let Some(title) = &spec.title {
            chapter = chapter.with_title(title.clone());
        }
        self.glossary.apply_to_chapter(&mut chapter);
        Ok(chapter)
    }
}

fn main() {
    let args = Args::parse();

    println!("📖 NovelPack - 双语小说导出工具");
    println!("正在读取书籍描述: {}", args.book_file.display());

    match run(&args) {
        Ok(file_name) => println!("🎉 导出完成: {}", file_name),
        Err(e) => {
            eprintln!("❌ 导出失败: {}", e);
            std::process::exit(1);
        }
    }
}

fn run(args: &Args) -> Result<String> {
    let config = ExportConfig::new();

    let content = fs::read_to_string(&args.book_file)
        .map_err(|e| ExportError::ConfigError(format!("无法读取书籍描述文件: {}", e)))?;
    let book_file: BookFile = serde_yml::from_str(&content)
        .map_err(|e| ExportError::ConfigError(format!("书籍描述文件格式错误: {}", e)))?;

    let glossary = match &args.glossary {
        Some(path) => load_glossary(path)?,
        None => Glossary::new(),
    };
    if args.verbose && !glossary.is_empty() {
        println!("📕 术语表已加载: {}个术语", glossary.len());
    }

    let book = build_book(&book_file, args.lang)?;
    if args.verbose {
        println!("📚 书名: {}", book.metadata.title);
        println!("   共{}个章节", book.chapters.len());
    }

    let base_dir = args
        .book_file
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    let store = FileChapterStore::new(base_dir, &book_file.chapters, glossary);

    let format: ExportFormat = args.format.into();
    let file_name = args.output.clone().unwrap_or_else(|| {
        format!(
            "{}_{}.{}",
            book.metadata.title,
            args.lang.label(),
            format.extension()
        )
    });

    let lang_tag = args.lang.tag(&config);
    let exporter = Exporter::with_config(FsStorage::new(args.out_dir.clone()), config);
    exporter.export(
        &file_name,
        &lang_tag,
        format,
        &book,
        &store,
        &CancelToken::new(),
    )?;

    Ok(file_name)
}

/// 由书籍描述构建书籍模型
fn build_book(book_file: &BookFile, lang: ExportLang) -> Result<Book> {
    let language = match lang {
        ExportLang::Jp => BookLanguage::Original,
        ExportLang::Zh => BookLanguage::Translated,
        ExportLang::Mix => BookLanguage::Mixed,
    };

    let mut metadata = BookMetadata::new(&book_file.title, &book_file.identifier, language);
    if let Some(author) = &book_file.author {
        metadata = metadata.with_author(author.clone());
    }
    if let Some(description) = &book_file.description {
        metadata = metadata.with_description(description.clone());
    }

    let chapters: Vec<ChapterRef> = book_file
        .chapters
        .iter()
        .enumerate()
        .map(|(ordinal, entry)| {
            let mut chapter_ref = ChapterRef::new(ordinal, entry.id.clone());
            if let Some(title) = &entry.title {
                chapter_ref = chapter_ref.with_title(title.clone());
            }
            chapter_ref
        })
        .collect();

    let toc = match &book_file.toc {
        Some(entries) => {
            let mut toc = TableOfContents::new();
            for entry in entries {
                match entry {
                    TocFileEntry::Divider { divider } => toc.push_divider(divider.clone()),
                    TocFileEntry::Chapter { chapter, title } => {
                        let title = title
                            .clone()
                            .or_else(|| {
                                chapters.get(*chapter).and_then(|c| c.title.clone())
                            })
                            .unwrap_or_else(|| format!("第{}章", chapter + 1));
                        toc.push_chapter(*chapter, title);
                    }
                }
            }
            toc
        }
        None => TableOfContents::from_chapters(&chapters),
    };

    Ok(Book::new(metadata, toc, chapters))
}

/// 从YAML文件加载术语表
fn load_glossary(path: &Path) -> Result<Glossary> {
    let content = fs::read_to_string(path)
        .map_err(|e| ExportError::ConfigError(format!("无法读取术语表文件: {}", e)))?;
    let terms: HashMap<String, String> = serde_yml::from_str(&content)
        .map_err(|e| ExportError::ConfigError(format!("术语表文件格式错误: {}", e)))?;
    Ok(Glossary::from_pairs(terms))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_book_file_parsing() {
        let yaml = r#"
title: 示例
identifier: urn:uuid:abc
chapters:
  - id: ch0
    title: 第1章
    original: text/ch0_jp.txt
    translated: text/ch0_zh.txt
  - id: ch1
    translated: text/ch1_zh.txt
toc:
  - divider: 第一卷
  - chapter: 0
  - chapter: 1
    title: 完结章
"#;
        let book_file: BookFile = serde_yml::from_str(yaml).unwrap();
        assert_eq!(book_file.title, "示例");
        assert_eq!(book_file.chapters.len(), 2);
        assert!(book_file.chapters[1].original.is_none());

        let toc_entries = book_file.toc.as_ref().unwrap();
        assert!(matches!(toc_entries[0], TocFileEntry::Divider { .. }));
        assert!(matches!(toc_entries[1], TocFileEntry::Chapter { chapter: 0, .. }));
    }

    #[test]
    fn test_build_book_default_toc() {
        let yaml = r#"
title: 示例
identifier: urn:uuid:abc
chapters:
  - id: ch0
    translated: a.txt
"#;
        let book_file: BookFile = serde_yml::from_str(yaml).unwrap();
        let book = build_book(&book_file, ExportLang::Zh).unwrap();
        assert_eq!(book.metadata.language, BookLanguage::Translated);
        assert_eq!(book.toc.navigable(), vec![(0, "第1章")]);
    }

    #[test]
    fn test_file_store_reads_paragraphs_lazily() {
        let dir = tempfile::TempDir::new().unwrap();
        fs::write(dir.path().join("ch0.txt"), "第一段\n\n第二段\n").unwrap();

        let entries = vec![ChapterEntry {
            id: "ch0".to_string(),
            title: None,
            original: None,
            translated: Some(PathBuf::from("ch0.txt")),
        }];
        let store =
            FileChapterStore::new(dir.path().to_path_buf(), &entries, Glossary::new());

        let chapter = store.chapter("ch0").unwrap();
        assert_eq!(
            chapter.translated().unwrap(),
            &["第一段".to_string(), "第二段".to_string()]
        );
        assert!(matches!(
            store.chapter("missing"),
            Err(ExportError::ChapterNotFound(_))
        ));
    }
}

pub mod error;
pub mod book;
pub mod chapter;
pub mod render;
pub mod glossary;
pub mod config;
pub mod epub;
pub mod text;
pub mod storage;
pub mod exporter;

// 重新导出错误处理
pub use error::{ExportError, Result};

// 重新导出书籍模型
pub use book::{Book, BookLanguage, BookMetadata, ChapterRef, TableOfContents, TocEntry};

// 重新导出章节相关
pub use chapter::{Chapter, ChapterStore, MemChapterStore};

// 重新导出渲染相关
pub use render::{render, ParagraphLang, RenderMode, RenderedParagraph};

// 重新导出术语表
pub use glossary::Glossary;

// 重新导出配置
pub use config::{ExportConfig, DEFAULT_CONFIG};

// 重新导出写入器
pub use epub::EpubWriter;
pub use text::TextWriter;

// 重新导出存储相关
pub use storage::{FsStorage, MemStorage, StagedFile, Storage};

// 重新导出导出协调器
pub use exporter::{CancelToken, ExportFormat, Exporter};

pub mod export;

// === 核心API重新导出 ===

/// 导出协调器（主要接口）
pub use export::Exporter;

/// 错误处理
pub use export::{ExportError, Result};

// === 数据结构 ===

/// 书籍描述
pub use export::{Book, BookLanguage, BookMetadata, ChapterRef, TableOfContents, TocEntry};

/// 章节内容与存储接口
pub use export::{Chapter, ChapterStore, MemChapterStore};

/// 术语替换表
pub use export::Glossary;

// === 底层组件（高级用法） ===

/// 渲染组件
pub use export::{render, ParagraphLang, RenderMode, RenderedParagraph};

/// 写入器组件
pub use export::{EpubWriter, TextWriter};

/// 存储组件
pub use export::{FsStorage, MemStorage, StagedFile, Storage};

/// 导出控制
pub use export::{CancelToken, ExportConfig, ExportFormat};

// === 库信息 ===

/// NovelPack库的版本信息
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// NovelPack库的描述
pub const DESCRIPTION: &str = "将双语小说导出为EPUB和纯文本的库";

// === 便捷函数 ===

/// 快速创建基于文件系统的导出协调器
///
/// 这是 `Exporter::new(FsStorage::new(root))` 的便捷包装函数。
///
/// # 参数
/// * `root` - 输出文件的根目录
///
/// # 返回值
/// * `Exporter<FsStorage>` - 导出协调器实例
///
/// # 示例
///
/// ```rust
/// let exporter = novelpack::exporter("out");
/// assert!(!exporter.exists("book.epub"));
/// ```
pub fn exporter<P: Into<std::path::PathBuf>>(root: P) -> Exporter<FsStorage> {
    Exporter::new(FsStorage::new(root))
}

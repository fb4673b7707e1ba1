//! EPUB包写入模块
//!
//! 将书籍元数据和渲染后的章节内容组装为符合EPUB规范的压缩包：
//! 容器描述文件、包文档（元数据/清单/脊柱）、导航文档、
//! 逐章内容文档和共享样式表。

mod container;
mod content;
mod nav;
mod opf;
mod writer;

pub use container::generate_container;
pub use content::{generate_chapter, generate_stylesheet};
pub use nav::{generate_nav, generate_ncx};
pub use opf::generate_opf;
pub use writer::EpubWriter;

/// mimetype条目路径（必须是归档的第一个条目且不压缩）
pub const MIMETYPE_PATH: &str = "mimetype";

/// EPUB的mimetype内容
pub const EPUB_MIMETYPE: &str = "application/epub+zip";

/// 容器描述文件路径
pub const CONTAINER_PATH: &str = "META-INF/container.xml";

/// 内容根目录
pub const CONTENT_DIR: &str = "OEBPS";

/// 包文档路径
pub const OPF_PATH: &str = "OEBPS/content.opf";

/// 导航文档路径
pub const NAV_PATH: &str = "OEBPS/nav.xhtml";

/// NCX兼容导航文件路径
pub const NCX_PATH: &str = "OEBPS/toc.ncx";

/// 样式表路径
pub const STYLE_PATH: &str = "OEBPS/style.css";

//! 包文档生成
//!
//! 生成content.opf：Dublin Core元数据、清单（全部资源文件及其唯一id与
//! 媒体类型）、脊柱（权威的线性阅读顺序，引用清单id）。
//! 脊柱顺序必须等于章节序号顺序，由写入器在调用前校验。

use crate::export::book::{BookLanguage, BookMetadata, ChapterRef};
use crate::export::config::ExportConfig;
use crate::export::error::Result;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::writer::Writer;

/// dcterms:modified的固定时间戳
///
/// 使用固定值而非当前时间，保证相同输入产出逐字节一致的包文档。
const MODIFIED_STAMP: &str = "2024-01-01T00:00:00Z";

/// 生成content.opf内容
///
/// # 参数
/// * `metadata` - 书籍基本信息（标识符已校验非空）
/// * `chapters` - 按序号顺序排列的章节引用
/// * `config` - 导出配置（语言对、内容文件名前缀）
///
/// # 返回值
/// * `Result<Vec<u8>>` - content.opf的字节内容
pub fn generate_opf(
    metadata: &BookMetadata,
    chapters: &[ChapterRef],
    config: &ExportConfig,
) -> Result<Vec<u8>> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut package = BytesStart::new("package");
    package.push_attribute(("xmlns", "http://www.idpf.org/2007/opf"));
    package.push_attribute(("version", "3.0"));
    package.push_attribute(("unique-identifier", "book-id"));
    writer.write_event(Event::Start(package))?;

    write_metadata(&mut writer, metadata, config)?;
    write_manifest(&mut writer, chapters, config)?;
    write_spine(&mut writer, chapters, config)?;

    writer.write_event(Event::End(BytesEnd::new("package")))?;

    Ok(writer.into_inner())
}

/// 章节内容文件对应的清单id
pub fn content_id(config: &ExportConfig, ordinal: usize) -> String {
    format!("{}{:04}", config.content_prefix, ordinal)
}

/// 书籍以语言标签列出的呈现语言，首个为主要语言
///
/// 对照模式同时声明译文和原文两种语言，译文在前。
fn language_tags<'a>(metadata: &BookMetadata, config: &'a ExportConfig) -> Vec<&'a str> {
    match metadata.language {
        BookLanguage::Original => vec![config.original_language.as_str()],
        BookLanguage::Translated => vec![config.translated_language.as_str()],
        BookLanguage::Mixed => vec![
            config.translated_language.as_str(),
            config.original_language.as_str(),
        ],
    }
}

fn write_metadata<W: std::io::Write>(
    writer: &mut Writer<W>,
    metadata: &BookMetadata,
    config: &ExportConfig,
) -> Result<()> {
    let mut meta_elem = BytesStart::new("metadata");
    meta_elem.push_attribute(("xmlns:dc", "http://purl.org/dc/elements/1.1/"));
    writer.write_event(Event::Start(meta_elem))?;

    let mut identifier = BytesStart::new("dc:identifier");
    identifier.push_attribute(("id", "book-id"));
    writer.write_event(Event::Start(identifier))?;
    writer.write_event(Event::Text(BytesText::new(&metadata.identifier)))?;
    writer.write_event(Event::End(BytesEnd::new("dc:identifier")))?;

    writer.write_event(Event::Start(BytesStart::new("dc:title")))?;
    writer.write_event(Event::Text(BytesText::new(&metadata.title)))?;
    writer.write_event(Event::End(BytesEnd::new("dc:title")))?;

    if let Some(author) = &metadata.author {
        writer.write_event(Event::Start(BytesStart::new("dc:creator")))?;
        writer.write_event(Event::Text(BytesText::new(author)))?;
        writer.write_event(Event::End(BytesEnd::new("dc:creator")))?;
    }

    for tag in language_tags(metadata, config) {
        writer.write_event(Event::Start(BytesStart::new("dc:language")))?;
        writer.write_event(Event::Text(BytesText::new(tag)))?;
        writer.write_event(Event::End(BytesEnd::new("dc:language")))?;
    }

    if let Some(description) = &metadata.description {
        writer.write_event(Event::Start(BytesStart::new("dc:description")))?;
        writer.write_event(Event::Text(BytesText::new(description)))?;
        writer.write_event(Event::End(BytesEnd::new("dc:description")))?;
    }

    let mut modified = BytesStart::new("meta");
    modified.push_attribute(("property", "dcterms:modified"));
    writer.write_event(Event::Start(modified))?;
    writer.write_event(Event::Text(BytesText::new(MODIFIED_STAMP)))?;
    writer.write_event(Event::End(BytesEnd::new("meta")))?;

    writer.write_event(Event::End(BytesEnd::new("metadata")))?;
    Ok(())
}

fn write_manifest<W: std::io::Write>(
    writer: &mut Writer<W>,
    chapters: &[ChapterRef],
    config: &ExportConfig,
) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new("manifest")))?;

    let mut nav = BytesStart::new("item");
    nav.push_attribute(("id", "nav"));
    nav.push_attribute(("href", "nav.xhtml"));
    nav.push_attribute(("media-type", "application/xhtml+xml"));
    nav.push_attribute(("properties", "nav"));
    writer.write_event(Event::Empty(nav))?;

    let mut ncx = BytesStart::new("item");
    ncx.push_attribute(("id", "ncx"));
    ncx.push_attribute(("href", "toc.ncx"));
    ncx.push_attribute(("media-type", "application/x-dtbncx+xml"));
    writer.write_event(Event::Empty(ncx))?;

    let mut style = BytesStart::new("item");
    style.push_attribute(("id", "style"));
    style.push_attribute(("href", "style.css"));
    style.push_attribute(("media-type", "text/css"));
    writer.write_event(Event::Empty(style))?;

    for chapter in chapters {
        let id = content_id(config, chapter.ordinal);
        let href = config.content_file_name(chapter.ordinal);
        let mut item = BytesStart::new("item");
        item.push_attribute(("id", id.as_str()));
        item.push_attribute(("href", href.as_str()));
        item.push_attribute(("media-type", "application/xhtml+xml"));
        writer.write_event(Event::Empty(item))?;
    }

    writer.write_event(Event::End(BytesEnd::new("manifest")))?;
    Ok(())
}

fn write_spine<W: std::io::Write>(
    writer: &mut Writer<W>,
    chapters: &[ChapterRef],
    config: &ExportConfig,
) -> Result<()> {
    let mut spine = BytesStart::new("spine");
    spine.push_attribute(("toc", "ncx"));
    writer.write_event(Event::Start(spine))?;

    for chapter in chapters {
        let idref = content_id(config, chapter.ordinal);
        let mut itemref = BytesStart::new("itemref");
        itemref.push_attribute(("idref", idref.as_str()));
        writer.write_event(Event::Empty(itemref))?;
    }

    writer.write_event(Event::End(BytesEnd::new("spine")))?;
    Ok(())
}

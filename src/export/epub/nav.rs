//! 导航文档生成
//!
//! 由书籍目录生成两份导航文件：EPUB 3的nav.xhtml和EPUB 2兼容的toc.ncx。
//! 可导航条目链接到对应章节内容文件的起始处；分隔标签在nav.xhtml中
//! 以无链接的文本保留。NCX的navPoint必须有链接目标，因此分隔标签
//! 只出现在nav.xhtml中。

use crate::export::book::{BookMetadata, TableOfContents, TocEntry};
use crate::export::config::ExportConfig;
use crate::export::error::Result;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::writer::Writer;

/// 生成EPUB 3导航文档nav.xhtml
///
/// # 参数
/// * `metadata` - 书籍基本信息
/// * `toc` - 书籍目录（已通过一致性校验）
/// * `config` - 导出配置
///
/// # 返回值
/// * `Result<Vec<u8>>` - nav.xhtml的字节内容
pub fn generate_nav(
    metadata: &BookMetadata,
    toc: &TableOfContents,
    config: &ExportConfig,
) -> Result<Vec<u8>> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    writer.write_event(Event::DocType(BytesText::from_escaped("html")))?;

    let mut html = BytesStart::new("html");
    html.push_attribute(("xmlns", "http://www.w3.org/1999/xhtml"));
    html.push_attribute(("xmlns:epub", "http://www.idpf.org/2007/ops"));
    writer.write_event(Event::Start(html))?;

    writer.write_event(Event::Start(BytesStart::new("head")))?;
    writer.write_event(Event::Start(BytesStart::new("title")))?;
    writer.write_event(Event::Text(BytesText::new(&metadata.title)))?;
    writer.write_event(Event::End(BytesEnd::new("title")))?;
    writer.write_event(Event::End(BytesEnd::new("head")))?;

    writer.write_event(Event::Start(BytesStart::new("body")))?;

    let mut nav = BytesStart::new("nav");
    nav.push_attribute(("epub:type", "toc"));
    writer.write_event(Event::Start(nav))?;

    writer.write_event(Event::Start(BytesStart::new("h1")))?;
    writer.write_event(Event::Text(BytesText::new("目录")))?;
    writer.write_event(Event::End(BytesEnd::new("h1")))?;

    writer.write_event(Event::Start(BytesStart::new("ol")))?;
    for entry in &toc.entries {
        writer.write_event(Event::Start(BytesStart::new("li")))?;
        match entry {
            TocEntry::Chapter { ordinal, title } => {
                let href = config.content_file_name(*ordinal);
                let mut anchor = BytesStart::new("a");
                anchor.push_attribute(("href", href.as_str()));
                writer.write_event(Event::Start(anchor))?;
                writer.write_event(Event::Text(BytesText::new(title)))?;
                writer.write_event(Event::End(BytesEnd::new("a")))?;
            }
            TocEntry::Divider { label } => {
                writer.write_event(Event::Start(BytesStart::new("span")))?;
                writer.write_event(Event::Text(BytesText::new(label)))?;
                writer.write_event(Event::End(BytesEnd::new("span")))?;
            }
        }
        writer.write_event(Event::End(BytesEnd::new("li")))?;
    }
    writer.write_event(Event::End(BytesEnd::new("ol")))?;

    writer.write_event(Event::End(BytesEnd::new("nav")))?;
    writer.write_event(Event::End(BytesEnd::new("body")))?;
    writer.write_event(Event::End(BytesEnd::new("html")))?;

    Ok(writer.into_inner())
}

/// 生成EPUB 2兼容的toc.ncx
///
/// 只包含可导航条目，playOrder从1开始按出现顺序编号。
///
/// # 参数
/// * `metadata` - 书籍基本信息（uid取自标识符）
/// * `toc` - 书籍目录
/// * `config` - 导出配置
///
/// # 返回值
/// * `Result<Vec<u8>>` - toc.ncx的字节内容
pub fn generate_ncx(
    metadata: &BookMetadata,
    toc: &TableOfContents,
    config: &ExportConfig,
) -> Result<Vec<u8>> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut ncx = BytesStart::new("ncx");
    ncx.push_attribute(("xmlns", "http://www.daisy.org/z3986/2005/ncx/"));
    ncx.push_attribute(("version", "2005-1"));
    writer.write_event(Event::Start(ncx))?;

    writer.write_event(Event::Start(BytesStart::new("head")))?;
    write_head_meta(&mut writer, "dtb:uid", &metadata.identifier)?;
    write_head_meta(&mut writer, "dtb:depth", "1")?;
    write_head_meta(&mut writer, "dtb:totalPageCount", "0")?;
    write_head_meta(&mut writer, "dtb:maxPageNumber", "0")?;
    writer.write_event(Event::End(BytesEnd::new("head")))?;

    writer.write_event(Event::Start(BytesStart::new("docTitle")))?;
    writer.write_event(Event::Start(BytesStart::new("text")))?;
    writer.write_event(Event::Text(BytesText::new(&metadata.title)))?;
    writer.write_event(Event::End(BytesEnd::new("text")))?;
    writer.write_event(Event::End(BytesEnd::new("docTitle")))?;

    writer.write_event(Event::Start(BytesStart::new("navMap")))?;
    for (play_order, (ordinal, title)) in toc.navigable().into_iter().enumerate() {
        let play_order = play_order + 1;
        let id = format!("navpoint-{}", play_order);
        let order = play_order.to_string();

        let mut nav_point = BytesStart::new("navPoint");
        nav_point.push_attribute(("id", id.as_str()));
        nav_point.push_attribute(("playOrder", order.as_str()));
        writer.write_event(Event::Start(nav_point))?;

        writer.write_event(Event::Start(BytesStart::new("navLabel")))?;
        writer.write_event(Event::Start(BytesStart::new("text")))?;
        writer.write_event(Event::Text(BytesText::new(title)))?;
        writer.write_event(Event::End(BytesEnd::new("text")))?;
        writer.write_event(Event::End(BytesEnd::new("navLabel")))?;

        let src = config.content_file_name(ordinal);
        let mut content = BytesStart::new("content");
        content.push_attribute(("src", src.as_str()));
        writer.write_event(Event::Empty(content))?;

        writer.write_event(Event::End(BytesEnd::new("navPoint")))?;
    }
    writer.write_event(Event::End(BytesEnd::new("navMap")))?;

    writer.write_event(Event::End(BytesEnd::new("ncx")))?;

    Ok(writer.into_inner())
}

fn write_head_meta<W: std::io::Write>(
    writer: &mut Writer<W>,
    name: &str,
    content: &str,
) -> Result<()> {
    let mut meta = BytesStart::new("meta");
    meta.push_attribute(("name", name));
    meta.push_attribute(("content", content));
    writer.write_event(Event::Empty(meta))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::book::BookLanguage;
    use scraper::{Html, Selector};

    fn sample_metadata() -> BookMetadata {
        BookMetadata::new("示例", "urn:uuid:abc", BookLanguage::Mixed)
    }

    fn sample_toc() -> TableOfContents {
        let mut toc = TableOfContents::new();
        toc.push_divider("第一卷");
        toc.push_chapter(0, "第1章 启程");
        toc.push_chapter(1, "第2章 旅途");
        toc
    }

    #[test]
    fn test_nav_links_and_dividers() {
        let config = ExportConfig::default_config();
        let bytes = generate_nav(&sample_metadata(), &sample_toc(), &config).unwrap();
        let html = Html::parse_document(&String::from_utf8(bytes).unwrap());

        let links = Selector::parse("nav ol li a").unwrap();
        let found: Vec<_> = html.select(&links).collect();
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].value().attr("href"), Some("chapter_0000.xhtml"));
        assert_eq!(found[0].text().collect::<String>(), "第1章 启程");
        assert_eq!(found[1].value().attr("href"), Some("chapter_0001.xhtml"));

        // 分隔标签没有链接目标
        let spans = Selector::parse("nav ol li span").unwrap();
        let dividers: Vec<_> = html.select(&spans).collect();
        assert_eq!(dividers.len(), 1);
        assert_eq!(dividers[0].text().collect::<String>(), "第一卷");
    }

    #[test]
    fn test_ncx_play_order_and_targets() {
        let config = ExportConfig::default_config();
        let bytes = generate_ncx(&sample_metadata(), &sample_toc(), &config).unwrap();
        let xml = String::from_utf8(bytes).unwrap();

        assert!(xml.contains("content=\"urn:uuid:abc\""));
        assert!(xml.contains("<text>示例</text>"));
        assert!(xml.contains("playOrder=\"1\""));
        assert!(xml.contains("playOrder=\"2\""));
        assert!(xml.contains("src=\"chapter_0000.xhtml\""));
        assert!(xml.contains("src=\"chapter_0001.xhtml\""));
        // NCX中不出现分隔标签
        assert!(!xml.contains("第一卷"));
    }
}

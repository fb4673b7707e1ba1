//! 章节内容文档生成
//!
//! 将渲染后的段落序列包装为最小化的XHTML：每个段落一个块级元素，
//! 对照模式下段落带来源语言的class和xml:lang属性；章节有标题时
//! 在正文前加一个标题元素。

use crate::export::config::ExportConfig;
use crate::export::error::Result;
use crate::export::render::{ParagraphLang, RenderMode, RenderedParagraph};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::writer::Writer;

/// 生成单个章节的XHTML内容文档
///
/// # 参数
/// * `title` - 章节标题（可选，存在时输出标题元素）
/// * `paragraphs` - 渲染后的段落序列
/// * `mode` - 渲染模式（对照模式下段落带语言属性）
/// * `doc_lang` - 文档主语言标签
/// * `config` - 导出配置
///
/// # 返回值
/// * `Result<Vec<u8>>` - XHTML文档的字节内容
pub fn generate_chapter(
    title: Option<&str>,
    paragraphs: &[RenderedParagraph],
    mode: RenderMode,
    doc_lang: &str,
    config: &ExportConfig,
) -> Result<Vec<u8>> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    writer.write_event(Event::DocType(BytesText::from_escaped("html")))?;

    let mut html = BytesStart::new("html");
    html.push_attribute(("xmlns", "http://www.w3.org/1999/xhtml"));
    html.push_attribute(("xml:lang", doc_lang));
    writer.write_event(Event::Start(html))?;

    writer.write_event(Event::Start(BytesStart::new("head")))?;
    writer.write_event(Event::Start(BytesStart::new("title")))?;
    writer.write_event(Event::Text(BytesText::new(title.unwrap_or("正文"))))?;
    writer.write_event(Event::End(BytesEnd::new("title")))?;
    let mut link = BytesStart::new("link");
    link.push_attribute(("rel", "stylesheet"));
    link.push_attribute(("type", "text/css"));
    link.push_attribute(("href", "style.css"));
    writer.write_event(Event::Empty(link))?;
    writer.write_event(Event::End(BytesEnd::new("head")))?;

    writer.write_event(Event::Start(BytesStart::new("body")))?;

    if let Some(title) = title {
        let mut heading = BytesStart::new("h2");
        heading.push_attribute(("class", "chapter-title"));
        writer.write_event(Event::Start(heading))?;
        writer.write_event(Event::Text(BytesText::new(title)))?;
        writer.write_event(Event::End(BytesEnd::new("h2")))?;
    }

    for paragraph in paragraphs {
        let mut p = BytesStart::new("p");
        if mode == RenderMode::Mixed {
            let (class, lang) = match paragraph.lang {
                ParagraphLang::Original => {
                    (config.original_class.as_str(), config.original_language.as_str())
                }
                ParagraphLang::Translated => (
                    config.translated_class.as_str(),
                    config.translated_language.as_str(),
                ),
            };
            p.push_attribute(("class", class));
            p.push_attribute(("xml:lang", lang));
        }
        writer.write_event(Event::Start(p))?;
        writer.write_event(Event::Text(BytesText::new(&paragraph.text)))?;
        writer.write_event(Event::End(BytesEnd::new("p")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("body")))?;
    writer.write_event(Event::End(BytesEnd::new("html")))?;

    Ok(writer.into_inner())
}

/// 生成共享样式表
///
/// 对照模式的两类段落使用配置中的类名，原文段落以弱化样式呈现。
pub fn generate_stylesheet(config: &ExportConfig) -> String {
    format!(
        "body {{\n  margin: 1em;\n  line-height: 1.6;\n}}\nh2.chapter-title {{\n  text-align: center;\n  margin: 2em 0 1em;\n}}\np {{\n  margin: 0.2em 0;\n  text-indent: 2em;\n}}\np.{original} {{\n  color: #606060;\n  font-size: 0.92em;\n}}\np.{translated} {{\n  margin-bottom: 0.8em;\n}}\n",
        original = config.original_class,
        translated = config.translated_class,
    )
}

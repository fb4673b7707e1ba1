//! 容器描述文件生成
//!
//! 生成META-INF/container.xml，指向包文档的位置。

use crate::export::epub::OPF_PATH;
use crate::export::error::Result;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::writer::Writer;

/// 生成container.xml内容
///
/// # 返回值
/// * `Result<Vec<u8>>` - container.xml的字节内容
pub fn generate_container() -> Result<Vec<u8>> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut container = BytesStart::new("container");
    container.push_attribute(("version", "1.0"));
    container.push_attribute(("xmlns", "urn:oasis:names:tc:opendocument:xmlns:container"));
    writer.write_event(Event::Start(container))?;

    writer.write_event(Event::Start(BytesStart::new("rootfiles")))?;

    let mut rootfile = BytesStart::new("rootfile");
    rootfile.push_attribute(("full-path", OPF_PATH));
    rootfile.push_attribute(("media-type", "application/oebps-package+xml"));
    writer.write_event(Event::Empty(rootfile))?;

    writer.write_event(Event::End(BytesEnd::new("rootfiles")))?;
    writer.write_event(Event::End(BytesEnd::new("container")))?;

    Ok(writer.into_inner())
}

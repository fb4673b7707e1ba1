//! 文本渲染模块
//!
//! 根据渲染模式将章节的双语段落合成最终输出的段落序列。
//! 纯函数，无IO，不产生错误——非法输入（双侧均空）在章节构造时即被拒绝。

use crate::export::chapter::Chapter;
use serde::{Deserialize, Serialize};

/// 渲染模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    /// 仅原文；原文缺失时输出译文
    Original,
    /// 仅译文；译文缺失时输出原文
    Translated,
    /// 原文与译文逐段交错
    Mixed,
}

/// 段落的来源语言标记
///
/// 对照模式下包文档写入器据此为原文段落和译文段落使用不同样式，
/// 标记不属于段落文本本身。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParagraphLang {
    /// 来自原文序列
    Original,
    /// 来自译文序列
    Translated,
}

/// 渲染后的单个段落
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedParagraph {
    /// 段落文本
    pub text: String,
    /// 来源语言
    pub lang: ParagraphLang,
}

impl RenderedParagraph {
    fn new(text: &str, lang: ParagraphLang) -> Self {
        Self {
            text: text.to_string(),
            lang,
        }
    }
}

/// 按模式渲染章节段落
///
/// - `Original`/`Translated`: 输出所选语言的段落；该语言缺失时整体回退到
///   另一侧，绝不输出空章节。
/// - `Mixed`: 按段落下标交错，第i段先原文后译文；两侧长度不同时，
///   较短一侧耗尽后将较长一侧的剩余段落按原顺序追加。
///
/// # 参数
/// * `chapter` - 待渲染章节
/// * `mode` - 渲染模式
///
/// # 返回值
/// * `Vec<RenderedParagraph>` - 最终输出顺序的段落序列
pub fn render(chapter: &Chapter, mode: RenderMode) -> Vec<RenderedParagraph> {
    match mode {
        RenderMode::Original => single_language(
            chapter.original(),
            ParagraphLang::Original,
            chapter.translated(),
            ParagraphLang::Translated,
        ),
        RenderMode::Translated => single_language(
            chapter.translated(),
            ParagraphLang::Translated,
            chapter.original(),
            ParagraphLang::Original,
        ),
        RenderMode::Mixed => interleave(chapter),
    }
}

/// 单语模式：首选语言缺失时回退到另一侧
fn single_language(
    preferred: Option<&[String]>,
    preferred_lang: ParagraphLang,
    fallback: Option<&[String]>,
    fallback_lang: ParagraphLang,
) -> Vec<RenderedParagraph> {
    if let Some(paragraphs) = preferred {
        return tag_paragraphs(paragraphs, preferred_lang);
    }
    fallback
        .map(|paragraphs| tag_paragraphs(paragraphs, fallback_lang))
        .unwrap_or_default()
}

/// 对照模式：逐段交错，剩余部分按顺序追加
fn interleave(chapter: &Chapter) -> Vec<RenderedParagraph> {
    let original = chapter.original().unwrap_or(&[]);
    let translated = chapter.translated().unwrap_or(&[]);

    let paired = original.len().min(translated.len());
    let mut result = Vec::with_capacity(original.len() + translated.len());

    for index in 0..paired {
        result.push(RenderedParagraph::new(
            &original[index],
            ParagraphLang::Original,
        ));
        result.push(RenderedParagraph::new(
            &translated[index],
            ParagraphLang::Translated,
        ));
    }
    for paragraph in &original[paired..] {
        result.push(RenderedParagraph::new(paragraph, ParagraphLang::Original));
    }
    for paragraph in &translated[paired..] {
        result.push(RenderedParagraph::new(paragraph, ParagraphLang::Translated));
    }

    result
}

fn tag_paragraphs(paragraphs: &[String], lang: ParagraphLang) -> Vec<RenderedParagraph> {
    paragraphs
        .iter()
        .map(|paragraph| RenderedParagraph::new(paragraph, lang))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::chapter::Chapter;

    fn paragraphs(texts: &[&str]) -> Vec<String> {
        texts.iter().map(|t| t.to_string()).collect()
    }

    fn bilingual_chapter(original: &[&str], translated: &[&str]) -> Chapter {
        Chapter::new(
            0,
            "ch0",
            Some(paragraphs(original)),
            Some(paragraphs(translated)),
        )
        .unwrap()
    }

    #[test]
    fn test_original_mode_verbatim() {
        let chapter = bilingual_chapter(&["一段", "二段"], &["译一", "译二"]);
        let rendered = render(&chapter, RenderMode::Original);
        assert_eq!(rendered.len(), 2);
        assert_eq!(rendered[0].text, "一段");
        assert_eq!(rendered[0].lang, ParagraphLang::Original);
        assert_eq!(rendered[1].text, "二段");
    }

    #[test]
    fn test_original_mode_fallback() {
        let chapter = Chapter::new(0, "ch0", None, Some(paragraphs(&["译一", "译二"]))).unwrap();
        let rendered = render(&chapter, RenderMode::Original);
        // 原文缺失时回退到译文，绝不输出空章节
        assert_eq!(rendered.len(), 2);
        assert!(rendered.iter().all(|p| p.lang == ParagraphLang::Translated));
    }

    #[test]
    fn test_translated_mode_fallback() {
        let chapter = Chapter::new(0, "ch0", Some(paragraphs(&["原一"])), None).unwrap();
        let rendered = render(&chapter, RenderMode::Translated);
        assert_eq!(rendered.len(), 1);
        assert_eq!(rendered[0].lang, ParagraphLang::Original);
    }

    #[test]
    fn test_mixed_interleave_equal_lengths() {
        let chapter = bilingual_chapter(&["原一", "原二", "原三"], &["译一", "译二", "译三"]);
        let rendered = render(&chapter, RenderMode::Mixed);

        assert_eq!(rendered.len(), 6);
        let texts: Vec<&str> = rendered.iter().map(|p| p.text.as_str()).collect();
        assert_eq!(texts, vec!["原一", "译一", "原二", "译二", "原三", "译三"]);
        for (index, paragraph) in rendered.iter().enumerate() {
            let expected = if index % 2 == 0 {
                ParagraphLang::Original
            } else {
                ParagraphLang::Translated
            };
            assert_eq!(paragraph.lang, expected);
        }
    }

    #[test]
    fn test_mixed_interleave_unequal_lengths() {
        // 译文较长：配对部分交错，剩余译文按顺序追加
        let chapter = bilingual_chapter(&["原一"], &["译一", "译二", "译三"]);
        let rendered = render(&chapter, RenderMode::Mixed);

        assert_eq!(rendered.len(), 4);
        let texts: Vec<&str> = rendered.iter().map(|p| p.text.as_str()).collect();
        assert_eq!(texts, vec!["原一", "译一", "译二", "译三"]);
        assert_eq!(rendered[2].lang, ParagraphLang::Translated);
        assert_eq!(rendered[3].lang, ParagraphLang::Translated);
    }

    #[test]
    fn test_mixed_length_equals_sum() {
        let chapter = bilingual_chapter(&["a", "b", "c", "d"], &["x", "y"]);
        let rendered = render(&chapter, RenderMode::Mixed);
        assert_eq!(rendered.len(), 4 + 2);
    }

    #[test]
    fn test_mixed_single_side_only() {
        let chapter = Chapter::new(0, "ch0", None, Some(paragraphs(&["译一", "译二"]))).unwrap();
        let rendered = render(&chapter, RenderMode::Mixed);
        assert_eq!(rendered.len(), 2);
        assert!(rendered.iter().all(|p| p.lang == ParagraphLang::Translated));
    }
}

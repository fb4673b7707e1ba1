//! 术语表模块
//!
//! 已解析的术语替换表：原文术语到统一译名的映射。
//! 替换发生在渲染之前的上游步骤，只作用于译文段落；
//! 导出引擎本身不做任何替换，只消费最终文本。

use crate::export::chapter::Chapter;
use std::collections::HashMap;

/// 术语替换表
///
/// 应用时按术语长度从长到短排序，保证长术语优先于其子串被替换。
#[derive(Debug, Clone, Default)]
pub struct Glossary {
    terms: HashMap<String, String>,
}

impl Glossary {
    /// 创建空术语表
    pub fn new() -> Self {
        Self {
            terms: HashMap::new(),
        }
    }

    /// 从(术语, 译名)对构建术语表
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let terms = pairs
            .into_iter()
            .map(|(term, translation)| (term.into(), translation.into()))
            .collect();
        Self { terms }
    }

    /// 插入或覆盖一个术语
    pub fn insert(&mut self, term: impl Into<String>, translation: impl Into<String>) {
        self.terms.insert(term.into(), translation.into());
    }

    /// 术语数量
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// 对一段文本应用所有术语替换
    ///
    /// 按术语长度降序依次替换，长术语优先。
    pub fn apply(&self, text: &str) -> String {
        let mut replacements: Vec<(&str, &str)> = self
            .terms
            .iter()
            .map(|(term, translation)| (term.as_str(), translation.as_str()))
            .collect();

        replacements.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then(a.0.cmp(b.0)));

        let mut result = text.to_string();
        for (term, translation) in replacements {
            result = result.replace(term, translation);
        }
        result
    }

    /// 对章节的译文段落逐段应用术语替换，原文保持不变
    pub fn apply_to_chapter(&self, chapter: &mut Chapter) {
        if self.is_empty() {
            return;
        }
        chapter.map_translated(|paragraph| self.apply(paragraph));
    }
}

use std::io;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ExportError>;

/// 导出相关的错误类型
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO错误: {0}")]
    Io(#[from] io::Error),

    #[error("Zip文件错误: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("XML生成错误: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("缺少书籍唯一标识符")]
    MissingIdentifier,

    #[error("章节{ordinal}的原文和译文均为空")]
    EmptyChapter { ordinal: usize },

    #[error("目录与章节集合不一致: {0}")]
    TocMismatch(String),

    #[error("找不到章节: {0}")]
    ChapterNotFound(String),

    #[error("章节来源不可用: {0}")]
    SourceUnavailable(String),

    #[error("存储错误: {0}")]
    StorageFailure(String),

    #[error("不支持的导出语言: {0}")]
    UnsupportedLanguage(String),

    #[error("导出已被取消")]
    Cancelled,

    #[error("配置文件错误: {0}")]
    ConfigError(String),
}

impl ExportError {
    /// 判断此错误是否由调用方主动取消导致
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ExportError::Cancelled)
    }

    /// 判断此错误是否为书籍结构不一致（导出前即可检测）
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            ExportError::MissingIdentifier
                | ExportError::EmptyChapter { .. }
                | ExportError::TocMismatch(_)
        )
    }
}

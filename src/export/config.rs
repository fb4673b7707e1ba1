//! 导出配置模块
//!
//! 提供导出行为的配置管理功能，支持从YAML文件加载配置。
//! 语言对以BCP 47标签配置，引擎内部不写死任何具体语言。

use crate::export::error::{ExportError, Result};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fs;

/// 默认配置文件路径
const DEFAULT_CONFIG_PATH: &str = "novelpack.yaml";

/// 默认导出配置
pub static DEFAULT_CONFIG: Lazy<ExportConfig> = Lazy::new(ExportConfig::default_config);

/// 导出配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// 原文语言标签（BCP 47）
    pub original_language: String,
    /// 译文语言标签（BCP 47）
    pub translated_language: String,
    /// Zip压缩级别(0-9)，None使用zip库默认值
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compression_level: Option<u32>,
    /// 对照模式下原文段落的CSS类名
    pub original_class: String,
    /// 对照模式下译文段落的CSS类名
    pub translated_class: String,
    /// 章节内容文件名前缀
    pub content_prefix: String,
}

impl ExportConfig {
    /// 从默认配置文件中加载导出配置
    ///
    /// 配置文件默认为当前目录下的 `novelpack.yaml`
    ///
    /// # 返回值
    /// * `Result<Self>` - 加载成功返回配置实例，失败返回错误
    pub fn from_file() -> Result<Self> {
        Self::from_path(DEFAULT_CONFIG_PATH)
    }

    /// 从指定路径加载导出配置
    pub fn from_path(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| ExportError::ConfigError(format!("无法读取配置文件: {}", e)))?;

        serde_yml::from_str(&content)
            .map_err(|e| ExportError::ConfigError(format!("配置文件格式错误: {}", e)))
    }

    /// 生成默认配置文件到当前目录
    ///
    /// 配置文件将生成为当前目录下的 `novelpack.yaml`
    pub fn generate_default_config() -> Result<()> {
        let yaml_content = serde_yml::to_string(&Self::default_config())
            .map_err(|e| ExportError::ConfigError(format!("序列化配置失败: {}", e)))?;

        let content_with_header = format!(
            "# 导出配置文件\n# original_language/translated_language 为BCP 47语言标签\n# compression_level 取0-9，省略时使用zip库默认值\n\n{}",
            yaml_content
        );

        fs::write(DEFAULT_CONFIG_PATH, content_with_header)
            .map_err(|e| ExportError::ConfigError(format!("写入配置文件失败: {}", e)))?;

        Ok(())
    }

    /// 获取默认配置
    ///
    /// 默认语言对为日语原文、简体中文译文，对应平台的主要使用场景。
    pub fn default_config() -> Self {
        Self {
            original_language: "ja".to_string(),
            translated_language: "zh-CN".to_string(),
            compression_level: None,
            original_class: "orig".to_string(),
            translated_class: "trans".to_string(),
            content_prefix: "chapter_".to_string(),
        }
    }

    /// 尝试从默认配置文件加载，文件不存在时使用默认配置
    pub fn new() -> Self {
        Self::from_file().unwrap_or_else(|_| Self::default_config())
    }

    /// 章节内容文件名（序号补零保证归档内顺序稳定）
    pub fn content_file_name(&self, ordinal: usize) -> String {
        format!("{}{:04}.xhtml", self.content_prefix, ordinal)
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self::default_config()
    }
}
